//! Integration-test orchestration harness for document-cluster clients.
//!
//! Prepares one shared cluster handle per test run, against a real
//! deployment or an embedded simulated cluster, and hands test cases the
//! primitives they need on top of it:
//! - capability-based skips ([`FeatureGate`], [`skip_if_unsupported!`])
//! - deadline-bounded polling ([`poll_until`]) for eventual-consistency
//!   assertions
//! - fixture seeding ([`DatasetSeeder`])
//!
//! The wire protocol, storage API and simulator process sit behind
//! collaborator traits ([`ClusterConnector`], [`SimulatorLauncher`],
//! [`DatasetLoader`]); the client crate under test supplies the real
//! adapters, this crate's tests supply mocks and fakes.

mod bootstrap;
mod client;
mod config;
mod constants;
mod dataset;
mod errors;
mod features;
mod simulator;
mod suite;
mod version;

pub mod logging;
pub mod utils;

pub use bootstrap::*;
pub use client::*;
pub use config::*;
pub use constants::*;
pub use dataset::*;
pub use errors::*;
pub use features::*;
pub use simulator::*;
pub use suite::*;
pub use utils::poll::*;
pub use version::*;
