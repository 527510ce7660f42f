//! Parsed, comparable server/simulator version.
//!
//! The version is the capability baseline for the whole run: every skip/run
//! decision in [`crate::features`] derives from it, so parsing it is fatal
//! when it fails.

use std::fmt;
use std::str::FromStr;

use crate::errors::VersionParseError;

#[cfg(test)]
mod version_test;

/// A dotted numeric version (`major.minor.patch`, optional `-build` suffix)
/// plus the flag recording whether it was reported by the embedded simulator.
///
/// Ordering and equality compare `(major, minor, patch, build)`
/// lexicographically; `is_simulated` is deliberately excluded. It gates
/// capabilities, it does not order releases.
#[derive(Debug, Clone, Copy)]
pub struct NodeVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub build: u64,
    is_simulated: bool,
}

impl NodeVersion {
    /// Parse a version string as reported by a deployment or the simulator.
    ///
    /// Accepts `major.minor.patch` with an optional numeric `-build` suffix;
    /// a missing build defaults to 0.
    ///
    /// # Errors
    /// Returns [`VersionParseError`] on any malformed input. Callers treat
    /// this as fatal to the run.
    pub fn parse(input: &str, is_simulated: bool) -> Result<Self, VersionParseError> {
        let malformed = |reason: &'static str| VersionParseError {
            input: input.to_string(),
            reason,
        };

        let (dotted, build_part) = match input.split_once('-') {
            Some((dotted, build)) => (dotted, Some(build)),
            None => (input, None),
        };

        let mut components = dotted.split('.');
        let mut next_component = |name: &'static str| {
            components
                .next()
                .filter(|c| !c.is_empty())
                .ok_or_else(|| malformed(name))
        };

        let major = parse_component(next_component("missing major component")?)
            .ok_or_else(|| malformed("major component is not a number"))?;
        let minor = parse_component(next_component("missing minor component")?)
            .ok_or_else(|| malformed("minor component is not a number"))?;
        let patch = parse_component(next_component("missing patch component")?)
            .ok_or_else(|| malformed("patch component is not a number"))?;

        if components.next().is_some() {
            return Err(malformed("too many dotted components"));
        }

        let build = match build_part {
            Some(build) => parse_component(build)
                .ok_or_else(|| malformed("build suffix is not a number"))?,
            None => 0,
        };

        Ok(Self {
            major,
            minor,
            patch,
            build,
            is_simulated,
        })
    }

    /// Whether this version was reported by the embedded simulator.
    pub fn is_simulated(&self) -> bool {
        self.is_simulated
    }

    /// True when this version is at or above the given release triple
    /// (build is not part of a minimum).
    pub fn at_least(&self, major: u64, minor: u64, patch: u64) -> bool {
        self.ordering_key() >= (major, minor, patch, 0)
    }

    fn ordering_key(&self) -> (u64, u64, u64, u64) {
        (self.major, self.minor, self.patch, self.build)
    }
}

fn parse_component(raw: &str) -> Option<u64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    u64::from_str(raw).ok()
}

impl PartialEq for NodeVersion {
    fn eq(&self, other: &Self) -> bool {
        self.ordering_key() == other.ordering_key()
    }
}

impl Eq for NodeVersion {}

impl PartialOrd for NodeVersion {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for NodeVersion {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.ordering_key().cmp(&other.ordering_key())
    }
}

impl fmt::Display for NodeVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}-{}",
            self.major, self.minor, self.patch, self.build
        )
    }
}
