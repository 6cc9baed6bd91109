//! Page persistence for folio.
//!
//! Keeps the remote copy of a page in step with the editor's local block
//! list, without ever making the editor wait for the network.
//!
//! - [`agent`]: depth-1 latest-wins background persistence ([`SyncHandle`])
//! - [`tracker`]: sequence-number bookkeeping, runtime-free and unit-testable
//! - [`remote`]: the `PUT /pages/{id}` contract ([`RemoteStore`]) and its
//!   HTTP and in-memory implementations
//! - [`config`]: RON-file configuration with an environment override

pub mod agent;
pub mod config;
pub mod constants;
pub mod remote;
pub mod tracker;

pub use agent::{SyncHandle, spawn_sync_agent};
pub use config::{ConfigError, SyncConfig};
pub use remote::{HttpRemoteStore, MemoryRemoteStore, PersistBody, RemoteError, RemoteStore};
pub use tracker::{Completion, SyncTracker};
