//! Capability gating for skip-vs-run decisions.
//!
//! Each optional capability is a [`FeatureCode`]. Whether a run supports a
//! code is answered by [`FeatureGate`]: an explicit override from run
//! configuration always wins, otherwise a static table maps the code to the
//! minimum server version (and, for some codes, a simulated-mode exclusion).
//! Codes absent from the table are unsupported: the gate fails closed.

use std::collections::HashMap;
use std::fmt;

use crate::errors::SetupError;
use crate::version::NodeVersion;


/// Token identifying an optional capability of the target environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureCode {
    KeyValue,
    Xattr,
    Query,
    Search,
    Analytics,
    Durability,
    Collections,
    RangeScan,
}

impl FeatureCode {
    /// Stable lowercase name, as used by feature-override configuration keys.
    pub fn name(&self) -> &'static str {
        match self {
            FeatureCode::KeyValue => "key_value",
            FeatureCode::Xattr => "xattr",
            FeatureCode::Query => "query",
            FeatureCode::Search => "search",
            FeatureCode::Analytics => "analytics",
            FeatureCode::Durability => "durability",
            FeatureCode::Collections => "collections",
            FeatureCode::RangeScan => "range_scan",
        }
    }

    /// Resolve a configuration key back to a code.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "key_value" => Some(FeatureCode::KeyValue),
            "xattr" => Some(FeatureCode::Xattr),
            "query" => Some(FeatureCode::Query),
            "search" => Some(FeatureCode::Search),
            "analytics" => Some(FeatureCode::Analytics),
            "durability" => Some(FeatureCode::Durability),
            "collections" => Some(FeatureCode::Collections),
            "range_scan" => Some(FeatureCode::RangeScan),
            _ => None,
        }
    }
}

impl fmt::Display for FeatureCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Minimum environment a capability requires.
struct FeatureRequirement {
    min_version: (u64, u64, u64),
    unsupported_when_simulated: bool,
}

/// Version thresholds for every capability with a known baseline.
///
/// `RangeScan` has no entry on purpose: without an explicit override, a code
/// the table does not know is unsupported.
fn requirement(code: FeatureCode) -> Option<FeatureRequirement> {
    let req = |min_version, unsupported_when_simulated| FeatureRequirement {
        min_version,
        unsupported_when_simulated,
    };

    match code {
        FeatureCode::KeyValue => Some(req((1, 0, 0), false)),
        FeatureCode::Xattr => Some(req((5, 0, 0), false)),
        FeatureCode::Query => Some(req((5, 5, 0), true)),
        FeatureCode::Search => Some(req((5, 5, 0), true)),
        FeatureCode::Analytics => Some(req((6, 0, 0), true)),
        FeatureCode::Durability => Some(req((6, 5, 0), false)),
        FeatureCode::Collections => Some(req((7, 0, 0), false)),
        FeatureCode::RangeScan => None,
    }
}

/// Forced capability answers from run configuration.
///
/// Presence always wins over version inference, in both directions.
#[derive(Debug, Clone, Default)]
pub struct FeatureOverrides {
    forced: HashMap<FeatureCode, bool>,
}

impl FeatureOverrides {
    /// Build overrides from the named booleans in run configuration.
    ///
    /// # Errors
    /// Fails fast on a name no [`FeatureCode`] answers to. A typo here
    /// would silently change skip-vs-run decisions for the whole run.
    pub fn from_named(named: &HashMap<String, bool>) -> Result<Self, SetupError> {
        let mut forced = HashMap::new();
        for (name, &enabled) in named {
            let code = FeatureCode::from_name(name)
                .ok_or_else(|| SetupError::UnknownFeatureOverride(name.clone()))?;
            forced.insert(code, enabled);
        }
        Ok(Self { forced })
    }

    pub fn force(&mut self, code: FeatureCode, enabled: bool) {
        self.forced.insert(code, enabled);
    }

    pub fn get(&self, code: FeatureCode) -> Option<bool> {
        self.forced.get(&code).copied()
    }
}

/// Answers "does this run support capability X".
#[derive(Debug, Clone)]
pub struct FeatureGate {
    version: NodeVersion,
    overrides: FeatureOverrides,
}

impl FeatureGate {
    pub fn new(version: NodeVersion, overrides: FeatureOverrides) -> Self {
        Self { version, overrides }
    }

    /// Override first, then the version table; untabled codes are
    /// unsupported.
    pub fn is_supported(&self, code: FeatureCode) -> bool {
        if let Some(forced) = self.overrides.get(code) {
            return forced;
        }

        match requirement(code) {
            Some(req) => {
                if req.unsupported_when_simulated && self.version.is_simulated() {
                    return false;
                }
                let (major, minor, patch) = req.min_version;
                self.version.at_least(major, minor, patch)
            }
            None => false,
        }
    }

    pub fn version(&self) -> &NodeVersion {
        &self.version
    }
}

/// Skip the current test case when the run does not support a capability.
///
/// Prints a skip message naming the feature and returns from the enclosing
/// test function; sibling tests and run-level state are unaffected. Only
/// usable in tests returning `()`.
#[macro_export]
macro_rules! skip_if_unsupported {
    ($ctx:expr, $code:expr) => {
        if !$ctx.supports($code) {
            eprintln!("skipping test: feature '{}' unsupported or disabled", $code);
            return;
        }
    };
}
