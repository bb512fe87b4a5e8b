//! Table mirrors
//!
//! Each screen holds an ordered mirror of one backing table. The
//! mirror is fed two ways: a full fetch at session start, and the
//! change feed afterwards. Local writes go through the reconciliation
//! methods so an unconfirmed row is never indistinguishable from a
//! confirmed one.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{RwLock, broadcast};

use shared::{ChangeKind, ChangeMessage, Entity};

/// State of an in-flight local write
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteState {
    /// Applied locally, remote echo not yet received
    Pending,
    /// Remote write failed; the local value is unconfirmed
    Failed(String),
}

/// Ordered mirror of one table, keyed by the entity's key column
#[derive(Debug)]
pub struct TableMirror<T: Entity> {
    rows: Vec<T>,
    writes: HashMap<String, WriteState>,
}

impl<T: Entity> Default for TableMirror<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> TableMirror<T> {
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            writes: HashMap::new(),
        }
    }

    /// Replace the whole mirror (initial fetch)
    pub fn replace_all(&mut self, rows: Vec<T>) {
        self.rows = rows;
        self.writes.clear();
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.rows.iter().find(|row| row.key() == key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut T> {
        self.rows.iter_mut().find(|row| row.key() == key)
    }

    /// Insert, replacing in place when the key already exists. This is
    /// what makes redelivered insert notifications idempotent.
    pub fn upsert(&mut self, row: T) {
        let key = row.key();
        match self.rows.iter_mut().find(|existing| existing.key() == key) {
            Some(existing) => *existing = row,
            None => self.rows.push(row),
        }
    }

    /// Remove by key, returning the removed row
    pub fn remove(&mut self, key: &str) -> Option<T> {
        let idx = self.rows.iter().position(|row| row.key() == key)?;
        self.writes.remove(key);
        Some(self.rows.remove(idx))
    }

    /// Fold a change notification into the mirror.
    ///
    /// Insert upserts, update replaces the matching row (no-op when
    /// the key is unknown), delete removes. Applying the same message
    /// twice leaves the mirror unchanged.
    pub fn apply(&mut self, message: &ChangeMessage) {
        if message.table != T::TABLE {
            tracing::warn!(
                expected = T::TABLE,
                got = %message.table,
                "Change message routed to the wrong mirror"
            );
            return;
        }

        match message.kind {
            ChangeKind::Insert | ChangeKind::Update => {
                let Some(row) = message.new.clone() else {
                    return;
                };
                let decoded: T = match serde_json::from_value(row) {
                    Ok(v) => v,
                    Err(err) => {
                        tracing::warn!(table = T::TABLE, error = %err, "Undecodable feed row");
                        return;
                    }
                };
                match message.kind {
                    ChangeKind::Insert => self.upsert(decoded),
                    _ => {
                        let key = decoded.key();
                        if let Some(existing) = self.get_mut(&key) {
                            *existing = decoded;
                        }
                    }
                }
            }
            ChangeKind::Delete => {
                if let Some(key) = message.key(T::KEY) {
                    self.remove(&key);
                }
            }
        }
    }

    // ========== Write reconciliation ==========

    /// Mark a key as having an in-flight local write
    pub fn begin_write(&mut self, key: &str) {
        self.writes.insert(key.to_string(), WriteState::Pending);
    }

    /// Replace the local value with the server echo and clear the mark
    pub fn confirm(&mut self, key: &str, row: T) {
        self.writes.remove(key);
        self.upsert(row);
    }

    /// Keep the local value but mark it unconfirmed
    pub fn fail(&mut self, key: &str, error: impl Into<String>) {
        self.writes
            .insert(key.to_string(), WriteState::Failed(error.into()));
    }

    /// Write state of a key, if any write is outstanding or failed
    pub fn write_state(&self, key: &str) -> Option<&WriteState> {
        self.writes.get(key)
    }

    /// Keys whose last write failed
    pub fn failed_keys(&self) -> Vec<&str> {
        self.writes
            .iter()
            .filter(|(_, state)| matches!(state, WriteState::Failed(_)))
            .map(|(key, _)| key.as_str())
            .collect()
    }
}

/// Drive a shared mirror from a table's change stream.
///
/// Used for mirrors that outlive one screen (the client registry is
/// consulted by both billing screens). The task ends when the feed
/// closes; a lagged subscription only logs, since the next full fetch
/// resynchronizes.
pub fn spawn_mirror_task<T: Entity>(
    mirror: Arc<RwLock<TableMirror<T>>>,
    mut feed: broadcast::Receiver<ChangeMessage>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match feed.recv().await {
                Ok(message) => mirror.write().await.apply(&message),
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    tracing::warn!(missed, table = T::TABLE, "Change feed lagged, mirror may be stale");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shared::models::{DutyRecord, RecordStatus};

    fn record(id: &str, duty: f64) -> DutyRecord {
        DutyRecord {
            id: id.to_string(),
            date: "05/08/2026".to_string(),
            ain: "AIN-1".to_string(),
            client_name: "Meghna Traders".to_string(),
            phone: "01711000000".to_string(),
            be_year: "C-100(2026)".to_string(),
            duty,
            received: 0.0,
            status: RecordStatus::New,
            profit: 0.0,
            payment_method: None,
        }
    }

    #[test]
    fn test_insert_event_upserts() {
        let mut mirror = TableMirror::<DutyRecord>::new();
        let row = serde_json::to_value(record("d1", 500.0)).unwrap();
        let msg = ChangeMessage::insert("duty_payments", row);

        mirror.apply(&msg);
        assert_eq!(mirror.len(), 1);

        // Redelivery is idempotent
        mirror.apply(&msg);
        assert_eq!(mirror.len(), 1);
    }

    #[test]
    fn test_update_event_for_unknown_key_is_noop() {
        let mut mirror = TableMirror::<DutyRecord>::new();
        let msg = ChangeMessage::update(
            "duty_payments",
            serde_json::to_value(record("ghost", 100.0)).unwrap(),
        );
        mirror.apply(&msg);
        assert!(mirror.is_empty());
    }

    #[test]
    fn test_delete_event_removes_by_key() {
        let mut mirror = TableMirror::<DutyRecord>::new();
        mirror.upsert(record("d1", 500.0));
        mirror.upsert(record("d2", 1500.0));

        let msg = ChangeMessage::delete("duty_payments", json!({"id": "d1"}));
        mirror.apply(&msg);
        assert_eq!(mirror.len(), 1);
        assert!(mirror.get("d1").is_none());

        // Applying the delete again changes nothing
        mirror.apply(&msg);
        assert_eq!(mirror.len(), 1);
    }

    #[test]
    fn test_wrong_table_messages_are_ignored() {
        let mut mirror = TableMirror::<DutyRecord>::new();
        let msg = ChangeMessage::insert("assessments", json!({"id": "a1"}));
        mirror.apply(&msg);
        assert!(mirror.is_empty());
    }

    #[test]
    fn test_reconciliation_marks() {
        let mut mirror = TableMirror::<DutyRecord>::new();
        let local = record("d1", 500.0);

        mirror.begin_write("d1");
        mirror.upsert(local.clone());
        assert_eq!(mirror.write_state("d1"), Some(&WriteState::Pending));

        mirror.fail("d1", "insert not confirmed");
        assert!(matches!(
            mirror.write_state("d1"),
            Some(WriteState::Failed(_))
        ));
        assert_eq!(mirror.failed_keys(), vec!["d1"]);
        // The local row is still visible
        assert!(mirror.get("d1").is_some());

        mirror.confirm("d1", local);
        assert!(mirror.write_state("d1").is_none());
    }
}
