//! Remote table store client
//!
//! Everything the console knows about persistence goes through the
//! [`TableStore`] trait: row-oriented select, insert, update-by-key,
//! and delete-by-key against one table per entity. Two backends exist:
//!
//! - [`HttpTableStore`] talks to the hosted backend over its REST
//!   conventions.
//! - `MemoryTableStore` (feature `in-process`) keeps tables in memory
//!   and publishes every mutation to the [`FeedHub`], which is how the
//!   console's integration tests drive the full fetch/mutate/notify
//!   loop without a network.

pub mod admin;
pub mod config;
pub mod error;
pub mod feed;
pub mod http;
#[cfg(feature = "in-process")]
pub mod memory;
pub mod table;

// Re-exports
pub use config::StoreConfig;
pub use error::{ClientError, ClientResult};
pub use feed::FeedHub;
pub use http::{AuthSession, HttpTableStore};
#[cfg(feature = "in-process")]
pub use memory::MemoryTableStore;
pub use table::{TableStore, delete_row, fetch_rows, insert_row, update_row};
