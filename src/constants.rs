use std::time::Duration;

// -
// Version negotiation

/// Fallback version assumed for a real deployment that did not declare one.
pub const DEFAULT_SERVER_VERSION: &str = "5.1.0";

// -
// Bootstrap readiness

/// Upper bound on the bucket readiness wait during bootstrap. Expiry is a
/// run-level fatal error, not a per-test skip.
pub const READINESS_TIMEOUT: Duration = Duration::from_secs(5);

// -
// Embedded simulator topology

pub const SIMULATOR_NODE_COUNT: u32 = 4;
pub const SIMULATOR_REPLICA_COUNT: u32 = 1;
/// Per-node item capacity of the simulated topology.
pub const SIMULATOR_NODE_CAPACITY: u32 = 64;

/// Bucket the simulator is provisioned with, and the bucket's implicit
/// unauthenticated credential pair.
pub const SIMULATOR_BUCKET: &str = "default";
pub const SIMULATOR_USERNAME: &str = "default";
pub const SIMULATOR_PASSWORD: &str = "";

/// The single SASL mechanism the simulator is restricted to.
pub const SIMULATOR_SASL_MECHANISM: &str = "SCRAM-SHA512";

/// Scheme of the connection descriptor handed to the connector.
pub const CONNECTION_SCHEME: &str = "cluster";
