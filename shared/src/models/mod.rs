//! Data models
//!
//! One module per domain, shared between the store client and the
//! console core. Row types carry the backing tables' snake_case
//! column names; update payloads are all-`Option` patches that only
//! serialize the fields being written.

pub mod audit;
pub mod billing;
pub mod client;
pub mod settings;
pub mod staff;

// Re-exports
pub use audit::*;
pub use billing::*;
pub use client::*;
pub use settings::*;
pub use staff::*;
