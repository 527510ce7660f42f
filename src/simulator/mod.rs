//! Simulated-cluster collaborator boundary.
//!
//! The simulator process itself lives elsewhere; the harness only launches
//! it, applies runtime controls, reads its self-reported version and port
//! assignments, and stops it at teardown.

use std::sync::Arc;

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use crate::errors::SimulatorError;

/// Shape of the simulated cluster to provision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Topology {
    pub nodes: u32,
    pub replicas: u32,
    pub per_node_capacity: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketType {
    /// Default persistent bucket type
    Persistent,
    /// Memory-only bucket type
    Ephemeral,
}

/// A bucket the simulator should be provisioned with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketSpec {
    pub name: String,
    pub bucket_type: BucketType,
}

/// Runtime controls the harness applies to a running simulator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlCommand {
    /// Toggle the lightweight cluster-map push mechanism
    SetClusterMapPush { enabled: bool },
    /// Restrict SASL authentication to exactly the given mechanisms
    SetSaslMechanisms { mechanisms: Vec<String> },
}

/// Starts simulator processes.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SimulatorLauncher: Send + Sync {
    async fn launch(
        &self,
        topology: Topology,
        buckets: Vec<BucketSpec>,
    ) -> Result<Arc<dyn SimulatorHandle>, SimulatorError>;
}

/// A running simulated cluster.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SimulatorHandle: Send + Sync {
    async fn control(&self, command: ControlCommand) -> Result<(), SimulatorError>;

    /// Version string the simulator reports for itself.
    fn version(&self) -> String;

    /// Data-node ports assigned at launch, one per node.
    fn data_ports(&self) -> Vec<u16>;

    async fn shutdown(&self) -> Result<(), SimulatorError>;
}
