//! In-memory fakes for the collaborator seams, shared by the integration
//! tests. They stand in for the real client adapters and the simulator
//! process the same way the run driver would wire them in.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use cluster_testkit::BucketHandle;
use cluster_testkit::BucketSpec;
use cluster_testkit::ClientError;
use cluster_testkit::ClusterConnector;
use cluster_testkit::ClusterHandle;
use cluster_testkit::ClusterState;
use cluster_testkit::CollectionHandle;
use cluster_testkit::ControlCommand;
use cluster_testkit::Credentials;
use cluster_testkit::SimulatorError;
use cluster_testkit::SimulatorHandle;
use cluster_testkit::SimulatorLauncher;
use cluster_testkit::Topology;

/// Document store backing every fake collection of a run.
#[derive(Default)]
pub struct FakeDocumentStore {
    documents: Mutex<HashMap<String, Value>>,
}

impl FakeDocumentStore {
    pub fn len(&self) -> usize {
        self.documents.lock().len()
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.documents.lock().get(key).cloned()
    }

    fn insert(&self, key: String, document: Value) {
        self.documents.lock().insert(key, document);
    }
}

pub struct FakeCollection {
    store: Arc<FakeDocumentStore>,
}

#[async_trait]
impl CollectionHandle for FakeCollection {
    async fn upsert(&self, key: &str, document: &Value) -> Result<(), ClientError> {
        self.store.insert(key.to_string(), document.clone());
        Ok(())
    }
}

pub struct FakeBucket {
    store: Arc<FakeDocumentStore>,
}

#[async_trait]
impl BucketHandle for FakeBucket {
    async fn wait_until_ready(
        &self,
        _timeout: Duration,
        _desired_state: ClusterState,
    ) -> Result<(), ClientError> {
        Ok(())
    }

    fn default_collection(&self) -> Arc<dyn CollectionHandle> {
        Arc::new(FakeCollection {
            store: self.store.clone(),
        })
    }

    fn collection(&self, _name: &str) -> Arc<dyn CollectionHandle> {
        Arc::new(FakeCollection {
            store: self.store.clone(),
        })
    }
}

pub struct FakeCluster {
    store: Arc<FakeDocumentStore>,
}

#[async_trait]
impl ClusterHandle for FakeCluster {
    fn bucket(&self, _name: &str) -> Arc<dyn BucketHandle> {
        Arc::new(FakeBucket {
            store: self.store.clone(),
        })
    }

    async fn close(&self) -> Result<(), ClientError> {
        Ok(())
    }
}

/// Connector handing out clusters backed by one shared store, recording the
/// connection material it was given.
pub struct FakeConnector {
    store: Arc<FakeDocumentStore>,
    pub seen: Mutex<Vec<(String, Credentials)>>,
}

impl FakeConnector {
    pub fn new(store: Arc<FakeDocumentStore>) -> Self {
        Self {
            store,
            seen: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ClusterConnector for FakeConnector {
    async fn connect(
        &self,
        address: &str,
        credentials: &Credentials,
    ) -> Result<Arc<dyn ClusterHandle>, ClientError> {
        self.seen
            .lock()
            .push((address.to_string(), credentials.clone()));
        Ok(Arc::new(FakeCluster {
            store: self.store.clone(),
        }))
    }
}

/// Simulator that reports a fixed version and one data port per node.
pub struct FakeSimulator {
    version: String,
    ports: Vec<u16>,
    controls: Mutex<Vec<ControlCommand>>,
}

impl FakeSimulator {
    pub fn controls(&self) -> Vec<ControlCommand> {
        self.controls.lock().clone()
    }
}

#[async_trait]
impl SimulatorHandle for FakeSimulator {
    async fn control(&self, command: ControlCommand) -> Result<(), SimulatorError> {
        self.controls.lock().push(command);
        Ok(())
    }

    fn version(&self) -> String {
        self.version.clone()
    }

    fn data_ports(&self) -> Vec<u16> {
        self.ports.clone()
    }

    async fn shutdown(&self) -> Result<(), SimulatorError> {
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeLauncher {
    pub launched: Mutex<Vec<(Topology, Vec<BucketSpec>)>>,
    pub simulators: Mutex<Vec<Arc<FakeSimulator>>>,
}

#[async_trait]
impl SimulatorLauncher for FakeLauncher {
    async fn launch(
        &self,
        topology: Topology,
        buckets: Vec<BucketSpec>,
    ) -> Result<Arc<dyn SimulatorHandle>, SimulatorError> {
        self.launched.lock().push((topology, buckets));

        let ports = (0..topology.nodes).map(|i| 11210 + i as u16).collect();
        let simulator = Arc::new(FakeSimulator {
            version: "1.5.25".to_string(),
            ports,
            controls: Mutex::new(Vec::new()),
        });
        self.simulators.lock().push(simulator.clone());
        let handle: Arc<dyn SimulatorHandle> = simulator;
        Ok(handle)
    }
}
