//! Storage/client collaborator boundary.
//!
//! The wire protocol, topology propagation and SASL negotiation live behind
//! these traits; the harness consumes them as opaque services. Real adapters
//! are provided by the client crate under test, mocks and fakes by this
//! crate's own tests.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

#[cfg(test)]
use mockall::automock;

use crate::errors::ClientError;

/// Operational state a bucket can be asked to reach before use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClusterState {
    Online,
    Degraded,
    Offline,
}

/// Password authentication material for opening the cluster handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Opens cluster handles from a connection descriptor plus credentials.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ClusterConnector: Send + Sync {
    async fn connect(
        &self,
        address: &str,
        credentials: &Credentials,
    ) -> Result<Arc<dyn ClusterHandle>, ClientError>;
}

/// An opened connection to a cluster (real or simulated).
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ClusterHandle: Send + Sync {
    fn bucket(&self, name: &str) -> Arc<dyn BucketHandle>;

    async fn close(&self) -> Result<(), ClientError>;
}

/// A named storage bucket within a cluster.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait BucketHandle: Send + Sync {
    /// Block until the bucket reports `desired_state`, bounded by `timeout`.
    async fn wait_until_ready(
        &self,
        timeout: Duration,
        desired_state: ClusterState,
    ) -> Result<(), ClientError>;

    fn default_collection(&self) -> Arc<dyn CollectionHandle>;

    fn collection(&self, name: &str) -> Arc<dyn CollectionHandle>;
}

/// A collection of documents within a bucket.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CollectionHandle: Send + Sync {
    async fn upsert(&self, key: &str, document: &Value) -> Result<(), ClientError>;
}
