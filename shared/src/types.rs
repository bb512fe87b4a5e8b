//! Common types for the shared crate

use serde::{Serialize, de::DeserializeOwned};

/// Timestamp type (Unix milliseconds)
pub type Timestamp = i64;

/// Binding between a model and its backing table.
///
/// Every persisted row type names its table and the column it is keyed
/// by. Most tables key on `id`; the client registry keys on the
/// business identifier (`ain`).
pub trait Entity: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Table name in the backing store
    const TABLE: &'static str;

    /// Key column name
    const KEY: &'static str = "id";

    /// Whether the store assigns the key column on insert. When true,
    /// a locally generated key is stripped from insert payloads and
    /// only survives if the write never gets confirmed.
    const KEY_ASSIGNED_BY_STORE: bool = true;

    /// Key value of this row
    fn key(&self) -> String;
}
