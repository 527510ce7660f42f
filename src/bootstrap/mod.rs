//! One-shot cluster bootstrap for a test run.
//!
//! Decides mock-vs-real once, provisions the embedded simulator when needed,
//! opens the shared cluster handle, waits for the target bucket to come
//! online and publishes the run's capability baseline. Every failure here is
//! fatal to the run: a broken bootstrap means environment misconfiguration,
//! not code-under-test behavior.

use std::sync::Arc;

use tracing::info;

use crate::client::BucketHandle;
use crate::client::ClusterConnector;
use crate::client::ClusterHandle;
use crate::client::ClusterState;
use crate::client::CollectionHandle;
use crate::client::Credentials;
use crate::config::RunConfig;
use crate::constants::CONNECTION_SCHEME;
use crate::constants::DEFAULT_SERVER_VERSION;
use crate::constants::READINESS_TIMEOUT;
use crate::constants::SIMULATOR_BUCKET;
use crate::constants::SIMULATOR_NODE_CAPACITY;
use crate::constants::SIMULATOR_NODE_COUNT;
use crate::constants::SIMULATOR_PASSWORD;
use crate::constants::SIMULATOR_REPLICA_COUNT;
use crate::constants::SIMULATOR_SASL_MECHANISM;
use crate::constants::SIMULATOR_USERNAME;
use crate::errors::SetupError;
use crate::features::FeatureCode;
use crate::features::FeatureGate;
use crate::simulator::BucketSpec;
use crate::simulator::BucketType;
use crate::simulator::ControlCommand;
use crate::simulator::SimulatorHandle;
use crate::simulator::SimulatorLauncher;
use crate::simulator::Topology;
use crate::version::NodeVersion;


/// How the run reaches its cluster, decided once at configuration-parse
/// time. Downstream code matches exhaustively; nothing re-checks optionals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapStrategy {
    /// No server configured: provision the embedded simulator
    Simulated,
    /// Connect to a live deployment with configured credentials
    Real {
        address: String,
        username: String,
        password: String,
        version: String,
    },
}

impl BootstrapStrategy {
    /// Select the strategy for this run.
    ///
    /// # Errors
    /// An explicit version together with an absent server address fails
    /// fast: the simulator reports its own version.
    pub fn from_config(config: &RunConfig) -> Result<Self, SetupError> {
        match &config.server {
            None => {
                if config.version.is_some() {
                    return Err(SetupError::VersionWithSimulator);
                }
                Ok(BootstrapStrategy::Simulated)
            }
            Some(address) => Ok(BootstrapStrategy::Real {
                address: address.clone(),
                username: config.username.clone(),
                password: config.password.clone(),
                version: config
                    .version
                    .clone()
                    .unwrap_or_else(|| DEFAULT_SERVER_VERSION.to_string()),
            }),
        }
    }
}

/// Connection material derived per mode, used once to open the handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapCredentials {
    pub address: String,
    pub username: String,
    pub password: String,
}

impl BootstrapCredentials {
    /// Join the simulator's data-node ports into one connection descriptor
    /// and pair it with the simulator's well-known unauthenticated login.
    fn for_simulator(ports: &[u16]) -> Self {
        let nodes = ports
            .iter()
            .map(|port| format!("127.0.0.1:{port}"))
            .collect::<Vec<_>>()
            .join(",");

        Self {
            address: format!("{CONNECTION_SCHEME}://{nodes}"),
            username: SIMULATOR_USERNAME.to_string(),
            password: SIMULATOR_PASSWORD.to_string(),
        }
    }

    fn login(&self) -> Credentials {
        Credentials {
            username: self.username.clone(),
            password: self.password.clone(),
        }
    }
}

/// Shared state of one test run, assembled by [`ClusterBootstrap::run`] and
/// owned by the suite lifecycle.
///
/// Immutable after publication: test cases read it concurrently through
/// `Arc` clones and must never close or reconfigure the handles.
pub struct TestClusterContext {
    cluster: Arc<dyn ClusterHandle>,
    simulator: Option<Arc<dyn SimulatorHandle>>,
    version: NodeVersion,
    gate: FeatureGate,
    bucket: Arc<dyn BucketHandle>,
    collection: Arc<dyn CollectionHandle>,
}

impl TestClusterContext {
    pub fn cluster(&self) -> Arc<dyn ClusterHandle> {
        self.cluster.clone()
    }

    pub fn bucket(&self) -> Arc<dyn BucketHandle> {
        self.bucket.clone()
    }

    /// The run's working collection (configured name or bucket default).
    pub fn collection(&self) -> Arc<dyn CollectionHandle> {
        self.collection.clone()
    }

    /// Present only when the run targets the embedded simulator.
    pub fn simulator(&self) -> Option<Arc<dyn SimulatorHandle>> {
        self.simulator.clone()
    }

    pub fn version(&self) -> &NodeVersion {
        &self.version
    }

    /// Whether this run supports the capability; see
    /// [`crate::skip_if_unsupported!`] for the guard form.
    pub fn supports(&self, code: FeatureCode) -> bool {
        self.gate.is_supported(code)
    }
}

/// Performs the bootstrap sequence against injected collaborators.
pub struct ClusterBootstrap {
    config: RunConfig,
    connector: Arc<dyn ClusterConnector>,
    launcher: Arc<dyn SimulatorLauncher>,
}

impl ClusterBootstrap {
    pub fn new(
        config: RunConfig,
        connector: Arc<dyn ClusterConnector>,
        launcher: Arc<dyn SimulatorLauncher>,
    ) -> Self {
        Self {
            config,
            connector,
            launcher,
        }
    }

    /// Run the full bootstrap sequence and assemble the run context.
    ///
    /// # Errors
    /// Any failure (strategy selection, simulator provisioning, connect,
    /// version parse, readiness) is a [`SetupError`] that aborts the run.
    pub async fn run(self) -> Result<TestClusterContext, SetupError> {
        let strategy = BootstrapStrategy::from_config(&self.config)?;
        let overrides = self.config.feature_overrides()?;

        let (credentials, simulator, reported_version) = match strategy {
            BootstrapStrategy::Simulated => {
                let simulator = self.provision_simulator().await?;
                let credentials = BootstrapCredentials::for_simulator(&simulator.data_ports());
                let version = simulator.version();
                (credentials, Some(simulator), version)
            }
            BootstrapStrategy::Real {
                address,
                username,
                password,
                version,
            } => (
                BootstrapCredentials {
                    address,
                    username,
                    password,
                },
                None,
                version,
            ),
        };

        info!(
            address = %credentials.address,
            simulated = simulator.is_some(),
            "opening cluster handle"
        );

        let cluster = self
            .connector
            .connect(&credentials.address, &credentials.login())
            .await
            .map_err(|source| SetupError::Connect {
                address: credentials.address.clone(),
                source,
            })?;

        let version = NodeVersion::parse(&reported_version, simulator.is_some())?;

        let bucket = cluster.bucket(&self.config.bucket);
        bucket
            .wait_until_ready(READINESS_TIMEOUT, ClusterState::Online)
            .await
            .map_err(|source| SetupError::Readiness {
                bucket: self.config.bucket.clone(),
                timeout: READINESS_TIMEOUT,
                source,
            })?;

        let collection = match &self.config.collection {
            Some(name) => bucket.collection(name),
            None => bucket.default_collection(),
        };

        info!(version = %version, "cluster ready");

        Ok(TestClusterContext {
            cluster,
            simulator,
            version,
            gate: FeatureGate::new(version, overrides),
            bucket,
            collection,
        })
    }

    /// Launch the fixed small topology and apply the two mandatory runtime
    /// controls: cluster-map push on, SASL restricted to one strong
    /// mechanism.
    async fn provision_simulator(&self) -> Result<Arc<dyn SimulatorHandle>, SetupError> {
        let topology = Topology {
            nodes: SIMULATOR_NODE_COUNT,
            replicas: SIMULATOR_REPLICA_COUNT,
            per_node_capacity: SIMULATOR_NODE_CAPACITY,
        };
        let buckets = vec![BucketSpec {
            name: SIMULATOR_BUCKET.to_string(),
            bucket_type: BucketType::Persistent,
        }];

        info!(?topology, "launching embedded simulator");
        let simulator = self.launcher.launch(topology, buckets).await?;

        simulator
            .control(ControlCommand::SetClusterMapPush { enabled: true })
            .await?;
        simulator
            .control(ControlCommand::SetSaslMechanisms {
                mechanisms: vec![SIMULATOR_SASL_MECHANISM.to_string()],
            })
            .await?;

        Ok(simulator)
    }
}
