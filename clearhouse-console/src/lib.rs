//! Back-office console core
//!
//! The state and workflow layer a UI binds to: per-table mirrors kept
//! live by the change feed, the batch billing workflow shared by the
//! duty and assessment screens, payment settlement, filtering,
//! summary statistics, and the admin-side registries (clients, staff,
//! audit trail, settings). Persistence goes through
//! `clearhouse-client`; nothing here renders.

pub mod backup;
pub mod billing;
pub mod error;
pub mod filter;
pub mod ops;
pub mod share;
pub mod state;
pub mod stats;

// Re-exports
pub use error::{ConsoleError, ConsoleResult};
pub use state::{TableMirror, WriteState, spawn_mirror_task};
