use tracing_test::traced_test;

use super::*;
use crate::client::BucketHandle;
use crate::client::ClusterHandle;
use crate::client::CollectionHandle;
use crate::client::MockBucketHandle;
use crate::client::MockClusterConnector;
use crate::client::MockClusterHandle;
use crate::client::MockCollectionHandle;
use crate::errors::ClientError;
use crate::errors::SimulatorError;
use crate::simulator::MockSimulatorHandle;
use crate::simulator::MockSimulatorLauncher;
use crate::simulator::SimulatorHandle;

/// Simulator whose lifetime ends in `shutdown_result`.
fn simulator_for_run(shutdown_result: Result<(), SimulatorError>) -> MockSimulatorHandle {
    let mut simulator = MockSimulatorHandle::new();
    simulator.expect_control().returning(|_| Ok(()));
    simulator
        .expect_version()
        .return_const("1.5.25".to_string());
    simulator.expect_data_ports().return_const(vec![11210u16]);
    simulator
        .expect_shutdown()
        .times(1)
        .return_once(move || shutdown_result);
    simulator
}

fn launcher_returning(simulator: MockSimulatorHandle) -> MockSimulatorLauncher {
    let mut launcher = MockSimulatorLauncher::new();
    launcher
        .expect_launch()
        .return_once(move |_, _| Ok(Arc::new(simulator) as Arc<dyn SimulatorHandle>));
    launcher
}

fn cluster_for_run(close_result: Result<(), ClientError>) -> MockClusterHandle {
    let mut bucket = MockBucketHandle::new();
    bucket.expect_wait_until_ready().returning(|_, _| Ok(()));
    bucket
        .expect_default_collection()
        .returning(|| Arc::new(MockCollectionHandle::new()) as Arc<dyn CollectionHandle>);

    let mut cluster = MockClusterHandle::new();
    let bucket = Arc::new(bucket);
    cluster
        .expect_bucket()
        .returning(move |_| bucket.clone() as Arc<dyn BucketHandle>);
    cluster
        .expect_close()
        .times(1)
        .return_once(move || close_result);
    cluster
}

fn connector_returning(cluster: MockClusterHandle) -> MockClusterConnector {
    let mut connector = MockClusterConnector::new();
    connector
        .expect_connect()
        .return_once(move |_, _| Ok(Arc::new(cluster) as Arc<dyn ClusterHandle>));
    connector
}

fn simulated_suite(
    close_result: Result<(), ClientError>,
    shutdown_result: Result<(), SimulatorError>,
) -> SuiteLifecycle {
    SuiteLifecycle::new(
        Arc::new(connector_returning(cluster_for_run(close_result))),
        Arc::new(launcher_returning(simulator_for_run(shutdown_result))),
    )
}

#[tokio::test]
#[traced_test]
async fn setup_should_publish_the_context_exactly_once() {
    let suite = simulated_suite(Ok(()), Ok(()));

    assert!(suite.context().is_none());

    let context = suite.setup(RunConfig::default()).await.unwrap();
    assert!(context.version().is_simulated());
    assert!(suite.context().is_some());

    // Second setup is a lifecycle violation
    let second = suite.setup(RunConfig::default()).await;
    assert!(matches!(second, Err(SetupError::InvalidState("ready"))));

    suite.teardown().await.unwrap();
}

#[tokio::test]
async fn setup_failure_should_leave_the_suite_uninitialized() {
    let config = RunConfig {
        version: Some("7.0.0".to_string()),
        ..RunConfig::default()
    };

    let suite = SuiteLifecycle::new(
        Arc::new(MockClusterConnector::new()),
        Arc::new(MockSimulatorLauncher::new()),
    );

    assert!(suite.setup(config).await.is_err());
    assert!(suite.context().is_none());
}

#[tokio::test]
async fn teardown_should_close_cluster_and_simulator() {
    let suite = simulated_suite(Ok(()), Ok(()));
    suite.setup(RunConfig::default()).await.unwrap();

    suite.teardown().await.unwrap();

    assert!(suite.context().is_none());

    // The mocks verify close/shutdown ran exactly once; a second teardown
    // must not reach them again
    let second = suite.teardown().await;
    assert!(matches!(
        second,
        Err(TeardownError::InvalidState("closed"))
    ));
}

#[tokio::test]
async fn teardown_should_propagate_close_errors_and_still_stop_the_simulator() {
    let suite = simulated_suite(
        Err(ClientError::Operation("socket already gone".to_string())),
        Ok(()),
    );
    suite.setup(RunConfig::default()).await.unwrap();

    let result = suite.teardown().await;

    // shutdown ran (mock expectation), yet the close error is what surfaces
    assert!(matches!(result, Err(TeardownError::Close(_))));
    assert!(suite.context().is_none());
}

#[tokio::test]
async fn teardown_should_propagate_simulator_shutdown_errors() {
    let suite = simulated_suite(
        Ok(()),
        Err(SimulatorError::Shutdown("still serving".to_string())),
    );
    suite.setup(RunConfig::default()).await.unwrap();

    let result = suite.teardown().await;
    assert!(matches!(result, Err(TeardownError::Simulator(_))));
}

#[tokio::test]
async fn teardown_before_setup_should_fail_and_keep_the_state() {
    let suite = simulated_suite(Ok(()), Ok(()));

    let result = suite.teardown().await;
    assert!(matches!(
        result,
        Err(TeardownError::InvalidState("uninitialized"))
    ));

    // The failed teardown did not consume the run: setup still works
    suite.setup(RunConfig::default()).await.unwrap();
    suite.teardown().await.unwrap();
}
