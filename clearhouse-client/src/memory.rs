//! In-process table store backend
//!
//! Tables live in memory and every mutation is published to the
//! [`FeedHub`], so a console wired against this backend exercises the
//! same fetch/mutate/notify loop it runs against the hosted store.
//! A failure switch lets tests drive the reconciliation paths.

use std::collections::HashMap;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, Ordering},
};

use async_trait::async_trait;
use serde_json::Value;

use shared::ChangeMessage;

use crate::{ClientError, ClientResult, FeedHub, TableStore};

/// In-memory tables publishing changes to a feed hub
pub struct MemoryTableStore {
    tables: Mutex<HashMap<String, Vec<Value>>>,
    hub: Arc<FeedHub>,
    fail_writes: AtomicBool,
}

impl MemoryTableStore {
    pub fn new(hub: Arc<FeedHub>) -> Self {
        Self {
            tables: Mutex::new(HashMap::new()),
            hub,
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Make every write fail with an internal error
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self) -> ClientResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(ClientError::Internal("write rejected".to_string()))
        } else {
            Ok(())
        }
    }

    fn field_matches(row: &Value, col: &str, key: &str) -> bool {
        match row.get(col) {
            Some(Value::String(s)) => s == key,
            Some(Value::Number(n)) => n.to_string() == key,
            _ => false,
        }
    }
}

#[async_trait]
impl TableStore for MemoryTableStore {
    async fn select_all(&self, table: &str) -> ClientResult<Vec<Value>> {
        let tables = self.tables.lock().expect("table lock");
        Ok(tables.get(table).cloned().unwrap_or_default())
    }

    async fn insert(&self, table: &str, mut row: Value) -> ClientResult<Value> {
        self.check_writable()?;

        // Server-side id assignment for tables keyed on id
        if let Some(obj) = row.as_object_mut() {
            if !obj.contains_key("id") {
                obj.insert(
                    "id".to_string(),
                    Value::String(uuid::Uuid::new_v4().to_string()),
                );
            }
        }

        {
            let mut tables = self.tables.lock().expect("table lock");
            tables.entry(table.to_string()).or_default().push(row.clone());
        }

        self.hub.publish(ChangeMessage::insert(table, row.clone()));
        Ok(row)
    }

    async fn update(
        &self,
        table: &str,
        key_col: &str,
        key: &str,
        patch: Value,
    ) -> ClientResult<Value> {
        self.check_writable()?;

        let updated = {
            let mut tables = self.tables.lock().expect("table lock");
            let rows = tables
                .get_mut(table)
                .ok_or_else(|| ClientError::NotFound(table.to_string()))?;
            let row = rows
                .iter_mut()
                .find(|row| Self::field_matches(row, key_col, key))
                .ok_or_else(|| ClientError::NotFound(format!("{table}:{key}")))?;

            if let (Some(target), Some(fields)) = (row.as_object_mut(), patch.as_object()) {
                for (k, v) in fields {
                    target.insert(k.clone(), v.clone());
                }
            }
            row.clone()
        };

        self.hub.publish(ChangeMessage::update(table, updated.clone()));
        Ok(updated)
    }

    async fn delete(&self, table: &str, key_col: &str, key: &str) -> ClientResult<Value> {
        self.check_writable()?;

        let removed = {
            let mut tables = self.tables.lock().expect("table lock");
            let rows = tables
                .get_mut(table)
                .ok_or_else(|| ClientError::NotFound(table.to_string()))?;
            let idx = rows
                .iter()
                .position(|row| Self::field_matches(row, key_col, key))
                .ok_or_else(|| ClientError::NotFound(format!("{table}:{key}")))?;
            rows.remove(idx)
        };

        self.hub.publish(ChangeMessage::delete(table, removed.clone()));
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shared::ChangeKind;

    fn store() -> (MemoryTableStore, Arc<FeedHub>) {
        let hub = Arc::new(FeedHub::new());
        (MemoryTableStore::new(hub.clone()), hub)
    }

    #[tokio::test]
    async fn test_insert_assigns_id_and_notifies() {
        let (store, hub) = store();
        let mut rx = hub.subscribe("duty_payments");

        let echo = store
            .insert("duty_payments", json!({"duty": 500.0}))
            .await
            .unwrap();
        assert!(echo["id"].is_string());

        let msg = rx.recv().await.unwrap();
        assert_eq!(msg.kind, ChangeKind::Insert);
        assert_eq!(msg.new.unwrap()["duty"], 500.0);
    }

    #[tokio::test]
    async fn test_update_merges_patch_fields() {
        let (store, _hub) = store();
        let echo = store
            .insert("assessments", json!({"id": "a1", "net": 900.0, "status": "New"}))
            .await
            .unwrap();
        assert_eq!(echo["id"], "a1");

        let patched = store
            .update("assessments", "id", "a1", json!({"status": "Paid"}))
            .await
            .unwrap();
        assert_eq!(patched["status"], "Paid");
        assert_eq!(patched["net"], 900.0);
    }

    #[tokio::test]
    async fn test_delete_unknown_row_is_not_found() {
        let (store, _hub) = store();
        let err = store.delete("clients", "ain", "missing").await.unwrap_err();
        assert!(matches!(err, ClientError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_failure_switch_rejects_writes() {
        let (store, _hub) = store();
        store.set_fail_writes(true);
        let err = store.insert("clients", json!({"ain": "A1"})).await.unwrap_err();
        assert!(matches!(err, ClientError::Internal(_)));

        store.set_fail_writes(false);
        assert!(store.insert("clients", json!({"ain": "A1"})).await.is_ok());
    }

    #[tokio::test]
    async fn test_clients_key_on_ain() {
        let (store, _hub) = store();
        store
            .insert("clients", json!({"ain": "AIN-9", "name": "Karnaphuli Agents"}))
            .await
            .unwrap();
        let patched = store
            .update("clients", "ain", "AIN-9", json!({"phone": "01812000000"}))
            .await
            .unwrap();
        assert_eq!(patched["phone"], "01812000000");
    }
}
