//! Table store abstraction and typed row helpers
//!
//! The typed helpers keep the read/write contract the console is
//! written against: a failed read surfaces as an empty list with the
//! error logged, a failed write as `None`. Callers decide what an
//! absent echo means (the mirrors mark the row Failed).

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use shared::Entity;

use crate::ClientResult;

/// Row-oriented access to one table per entity
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Fetch every row of a table
    async fn select_all(&self, table: &str) -> ClientResult<Vec<Value>>;

    /// Insert a row, returning the stored row
    async fn insert(&self, table: &str, row: Value) -> ClientResult<Value>;

    /// Patch the row matching `key_col = key`, returning the patched row
    async fn update(&self, table: &str, key_col: &str, key: &str, patch: Value)
    -> ClientResult<Value>;

    /// Delete the row matching `key_col = key`, returning the deleted row
    async fn delete(&self, table: &str, key_col: &str, key: &str) -> ClientResult<Value>;
}

/// Fetch and decode all rows of an entity's table.
///
/// Read failures surface as an empty list; rows that no longer decode
/// are dropped individually.
pub async fn fetch_rows<T: Entity>(store: &dyn TableStore) -> Vec<T> {
    match store.select_all(T::TABLE).await {
        Ok(rows) => rows
            .into_iter()
            .filter_map(|row| match serde_json::from_value::<T>(row) {
                Ok(decoded) => Some(decoded),
                Err(err) => {
                    tracing::warn!(table = T::TABLE, error = %err, "Dropping undecodable row");
                    None
                }
            })
            .collect(),
        Err(err) => {
            tracing::error!(table = T::TABLE, error = %err, "Fetch failed");
            Vec::new()
        }
    }
}

/// Insert an entity row, returning the server echo
pub async fn insert_row<T: Entity>(store: &dyn TableStore, row: &T) -> Option<T> {
    let mut value = match serde_json::to_value(row) {
        Ok(v) => v,
        Err(err) => {
            tracing::error!(table = T::TABLE, error = %err, "Row failed to encode");
            return None;
        }
    };

    // Let the store mint the key; the local one only survives offline
    if T::KEY_ASSIGNED_BY_STORE {
        if let Some(obj) = value.as_object_mut() {
            obj.remove(T::KEY);
        }
    }

    match store.insert(T::TABLE, value).await {
        Ok(echo) => decode_echo::<T>(echo),
        Err(err) => {
            tracing::error!(table = T::TABLE, key = %row.key(), error = %err, "Insert failed");
            None
        }
    }
}

/// Patch an entity row by key, returning the patched row
pub async fn update_row<T: Entity, P: Serialize + Sync>(
    store: &dyn TableStore,
    key: &str,
    patch: &P,
) -> Option<T> {
    let value = match serde_json::to_value(patch) {
        Ok(v) => v,
        Err(err) => {
            tracing::error!(table = T::TABLE, error = %err, "Patch failed to encode");
            return None;
        }
    };

    match store.update(T::TABLE, T::KEY, key, value).await {
        Ok(echo) => decode_echo::<T>(echo),
        Err(err) => {
            tracing::error!(table = T::TABLE, key = %key, error = %err, "Update failed");
            None
        }
    }
}

/// Delete an entity row by key, returning the key on success
pub async fn delete_row<T: Entity>(store: &dyn TableStore, key: &str) -> Option<String> {
    match store.delete(T::TABLE, T::KEY, key).await {
        Ok(_) => Some(key.to_string()),
        Err(err) => {
            tracing::error!(table = T::TABLE, key = %key, error = %err, "Delete failed");
            None
        }
    }
}

fn decode_echo<T: Entity>(echo: Value) -> Option<T> {
    match serde_json::from_value(echo) {
        Ok(decoded) => Some(decoded),
        Err(err) => {
            tracing::error!(table = T::TABLE, error = %err, "Echoed row failed to decode");
            None
        }
    }
}
