//! Run configuration for an integration-test run.
//!
//! Read once at process start, from layered sources with priority:
//! 1. Default values (hardcoded)
//! 2. Optional TOML file named by `TESTKIT_CONFIG`
//! 3. Environment variables with prefix `TESTKIT` (highest priority),
//!    e.g. `TESTKIT__SERVER`, `TESTKIT__FEATURES__QUERY`

use std::collections::HashMap;
use std::env;

use config::Config;
use config::Environment;
use config::File;
use serde::Deserialize;

use crate::errors::SetupError;
use crate::features::FeatureOverrides;


/// Everything a run needs to decide mock-vs-real and open the shared handle.
///
/// No `server` means the run targets the embedded simulator; in that mode an
/// explicit `version` is invalid, because the simulator reports its own.
#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    /// Address of a real deployment; absent selects the embedded simulator
    #[serde(default)]
    pub server: Option<String>,

    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub password: String,

    /// Target bucket for the run
    #[serde(default = "default_bucket")]
    pub bucket: String,

    /// Working collection; absent selects the bucket's default collection
    #[serde(default)]
    pub collection: Option<String>,

    /// Explicit server version (real mode only)
    #[serde(default)]
    pub version: Option<String>,

    /// Forced capability answers, keyed by feature name
    #[serde(default)]
    pub features: HashMap<String, bool>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            server: None,
            username: String::new(),
            password: String::new(),
            bucket: default_bucket(),
            collection: None,
            version: None,
            features: HashMap::new(),
        }
    }
}

impl RunConfig {
    /// Load and validate the run configuration.
    ///
    /// # Errors
    /// Returns [`SetupError`] when a source fails to load or the merged
    /// configuration violates a constraint; both abort the run.
    pub fn load() -> Result<Self, SetupError> {
        let mut builder = Config::builder();

        if let Ok(path) = env::var("TESTKIT_CONFIG") {
            builder = builder.add_source(File::with_name(&path));
        }

        builder = builder.add_source(
            Environment::with_prefix("TESTKIT")
                .separator("__")
                .ignore_empty(true)
                .try_parsing(true),
        );

        let config: RunConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validates cross-field constraints.
    ///
    /// # Errors
    /// Returns [`SetupError`] if any configuration rules are violated
    pub fn validate(&self) -> Result<(), SetupError> {
        if self.version.is_some() && self.server.is_none() {
            return Err(SetupError::VersionWithSimulator);
        }

        // Surface feature-name typos at load time, not mid-run
        self.feature_overrides()?;

        Ok(())
    }

    /// Resolve the named feature booleans into typed overrides.
    pub fn feature_overrides(&self) -> Result<FeatureOverrides, SetupError> {
        FeatureOverrides::from_named(&self.features)
    }
}

fn default_bucket() -> String {
    "default".to_string()
}
