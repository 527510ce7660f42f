//! Run-wide lifecycle for the shared cluster state.
//!
//! One [`SuiteLifecycle`] owns the run: `Uninitialized -> Ready -> Closed`,
//! no way back. Setup bootstraps exactly once and publishes the context;
//! teardown closes the handles exactly once and never swallows an error.
//! The suite's hooks are invoked sequentially by the run driver, so state
//! transitions are not contended.

use std::mem;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::info;

use crate::bootstrap::ClusterBootstrap;
use crate::bootstrap::TestClusterContext;
use crate::client::ClusterConnector;
use crate::config::RunConfig;
use crate::errors::SetupError;
use crate::errors::TeardownError;
use crate::simulator::SimulatorLauncher;

#[cfg(test)]
mod suite_test;

enum SuiteState {
    Uninitialized,
    Ready(Arc<TestClusterContext>),
    Closed,
}

impl SuiteState {
    fn name(&self) -> &'static str {
        match self {
            SuiteState::Uninitialized => "uninitialized",
            SuiteState::Ready(_) => "ready",
            SuiteState::Closed => "closed",
        }
    }
}

/// Owns the bootstrapped cluster, bucket and default collection for the
/// whole run.
///
/// Test cases receive `Arc<TestClusterContext>` clones; after [`teardown`]
/// any use of such a clone is undefined and disallowed: the handles are
/// closed and the design requires no graceful post-close behavior.
///
/// [`teardown`]: SuiteLifecycle::teardown
pub struct SuiteLifecycle {
    connector: Arc<dyn ClusterConnector>,
    launcher: Arc<dyn SimulatorLauncher>,
    state: Mutex<SuiteState>,
}

impl SuiteLifecycle {
    pub fn new(connector: Arc<dyn ClusterConnector>, launcher: Arc<dyn SimulatorLauncher>) -> Self {
        Self {
            connector,
            launcher,
            state: Mutex::new(SuiteState::Uninitialized),
        }
    }

    /// Bootstrap the cluster and publish the shared context.
    ///
    /// # Errors
    /// Fails with [`SetupError::InvalidState`] outside `Uninitialized`, or
    /// with the underlying bootstrap error, in which case the suite stays
    /// `Uninitialized` and the run must abort.
    pub async fn setup(&self, config: RunConfig) -> Result<Arc<TestClusterContext>, SetupError> {
        {
            let state = self.state.lock();
            if !matches!(*state, SuiteState::Uninitialized) {
                return Err(SetupError::InvalidState(state.name()));
            }
        }

        let bootstrap =
            ClusterBootstrap::new(config, self.connector.clone(), self.launcher.clone());
        let context = Arc::new(bootstrap.run().await?);

        info!("suite ready");
        *self.state.lock() = SuiteState::Ready(context.clone());
        Ok(context)
    }

    /// The published context while the suite is `Ready`.
    pub fn context(&self) -> Option<Arc<TestClusterContext>> {
        match &*self.state.lock() {
            SuiteState::Ready(context) => Some(context.clone()),
            _ => None,
        }
    }

    /// Close the cluster handle and, when present, stop the simulator.
    ///
    /// Both are attempted even if the first fails; the first error wins.
    ///
    /// # Errors
    /// Fails with [`TeardownError::InvalidState`] outside `Ready` (the state
    /// is left untouched), or with the propagated close/shutdown error. A
    /// teardown error is a run-level failure: resource leaks are never
    /// silently ignored.
    pub async fn teardown(&self) -> Result<(), TeardownError> {
        let context = {
            let mut state = self.state.lock();
            match mem::replace(&mut *state, SuiteState::Closed) {
                SuiteState::Ready(context) => context,
                other => {
                    let name = other.name();
                    *state = other;
                    return Err(TeardownError::InvalidState(name));
                }
            }
        };

        let closed = context
            .cluster()
            .close()
            .await
            .map_err(TeardownError::Close);

        let simulator_stopped = match context.simulator() {
            Some(simulator) => simulator
                .shutdown()
                .await
                .map_err(TeardownError::Simulator),
            None => Ok(()),
        };

        info!("suite closed");
        closed.and(simulator_stopped)
    }
}
