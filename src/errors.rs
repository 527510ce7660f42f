//! Harness error hierarchy.
//!
//! Split by blast radius: [`SetupError`] and [`TeardownError`] are run-level
//! and are never recovered locally, [`SeedError`] is local to the calling
//! test case, and the boundary enums ([`ClientError`], [`SimulatorError`],
//! [`DatasetError`]) are produced at the collaborator seams and wrapped by
//! the run-level ones.

use std::time::Duration;

/// Fatal run-level failure raised during bootstrap or suite setup.
///
/// Any variant aborts the entire run before tests execute: there is no
/// meaningful partial state to test against.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    /// Run configuration could not be loaded or deserialized
    #[error(transparent)]
    Config(#[from] config::ConfigError),

    /// An explicit version was configured together with simulator mode;
    /// the simulator supplies its own version
    #[error("an explicit server version cannot be combined with the embedded simulator")]
    VersionWithSimulator,

    /// A feature override named a capability this harness does not know
    #[error("unknown feature override '{0}'")]
    UnknownFeatureOverride(String),

    /// Embedded simulator failed to launch or accept a runtime control
    #[error(transparent)]
    Simulator(#[from] SimulatorError),

    /// Cluster handle could not be opened
    #[error("failed to connect to cluster at {address}: {source}")]
    Connect {
        address: String,
        #[source]
        source: ClientError,
    },

    /// Target bucket never reached the desired operational state
    #[error("bucket '{bucket}' did not become ready within {timeout:?}: {source}")]
    Readiness {
        bucket: String,
        timeout: Duration,
        #[source]
        source: ClientError,
    },

    /// Effective version string could not be parsed; the run has no
    /// trustworthy capability baseline without it
    #[error(transparent)]
    Version(#[from] VersionParseError),

    /// Suite lifecycle violation (setup called twice, or after teardown)
    #[error("setup is not allowed while the suite is {0}")]
    InvalidState(&'static str),
}

/// Per-test failure while seeding a fixture dataset.
///
/// Writes already applied before the failure stay in place; fixtures are
/// idempotent by key, so re-seeding the same label overwrites them.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    /// Named fixture could not be loaded
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    /// A fixture record could not be encoded as a JSON document
    #[error("failed to encode fixture record: {0}")]
    Encode(#[source] serde_json::Error),

    /// First write failure; no further records were attempted
    #[error("failed to write record '{key}': {source}")]
    Write {
        key: String,
        #[source]
        source: ClientError,
    },
}

/// Run-level failure while releasing the shared cluster state.
///
/// Surfaced even though all test cases already completed, so that resource
/// leaks are never silently ignored.
#[derive(Debug, thiserror::Error)]
pub enum TeardownError {
    /// Cluster handle refused to close cleanly
    #[error("failed to close cluster handle: {0}")]
    Close(#[source] ClientError),

    /// Simulator process did not stop cleanly
    #[error("failed to stop embedded simulator: {0}")]
    Simulator(#[source] SimulatorError),

    /// Suite lifecycle violation (teardown before setup, or twice)
    #[error("teardown is not allowed while the suite is {0}")]
    InvalidState(&'static str),
}

/// Failure at the storage/client collaborator boundary.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("connection failed: {0}")]
    Connect(String),

    #[error("operation timed out after {0:?}")]
    Timeout(Duration),

    #[error("operation failed: {0}")]
    Operation(String),
}

/// Failure at the simulated-cluster collaborator boundary.
#[derive(Debug, thiserror::Error)]
pub enum SimulatorError {
    #[error("launch failed: {0}")]
    Launch(String),

    #[error("control command rejected: {0}")]
    Control(String),

    #[error("shutdown failed: {0}")]
    Shutdown(String),
}

/// Failure at the fixture-loader collaborator boundary.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("failed to read dataset '{name}': {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse dataset '{name}': {source}")]
    Parse {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Malformed server/simulator version string.
#[derive(Debug, thiserror::Error)]
#[error("malformed version string '{input}': {reason}")]
pub struct VersionParseError {
    pub input: String,
    pub reason: &'static str,
}
