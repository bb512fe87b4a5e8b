//! Shared types for the Clearhouse console
//!
//! Data models, change-feed payloads, and utility types used across
//! the store client, the console core, and the SQL tool.

pub mod feed;
pub mod models;
pub mod types;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

// Feed re-exports (for convenient access)
pub use feed::{ChangeKind, ChangeMessage};
pub use types::Entity;
