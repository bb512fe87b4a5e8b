//! Change-feed payload types
//!
//! The backing store delivers one message per row mutation on each
//! subscribed table. Messages carry the raw row as JSON; typed
//! decoding happens at the mirror that consumes them.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Kind of row mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

/// A single change notification for one table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeMessage {
    /// Table the change belongs to
    pub table: String,
    /// Mutation kind
    pub kind: ChangeKind,
    /// New row (insert/update)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new: Option<Value>,
    /// Old row (delete; key columns only on some backends)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old: Option<Value>,
}

impl ChangeMessage {
    pub fn insert(table: impl Into<String>, row: Value) -> Self {
        Self {
            table: table.into(),
            kind: ChangeKind::Insert,
            new: Some(row),
            old: None,
        }
    }

    pub fn update(table: impl Into<String>, row: Value) -> Self {
        Self {
            table: table.into(),
            kind: ChangeKind::Update,
            new: Some(row),
            old: None,
        }
    }

    pub fn delete(table: impl Into<String>, old: Value) -> Self {
        Self {
            table: table.into(),
            kind: ChangeKind::Delete,
            new: None,
            old: Some(old),
        }
    }

    /// Extract the row key, preferring the new row over the old one.
    ///
    /// Keys may arrive as JSON strings or numbers depending on the
    /// column type; both normalize to a string.
    pub fn key(&self, key_col: &str) -> Option<String> {
        let row = self.new.as_ref().or(self.old.as_ref())?;
        match row.get(key_col)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_change_message_serialization() {
        let msg = ChangeMessage::insert("clients", json!({"ain": "AIN-100", "name": "Meghna Traders"}));

        let s = serde_json::to_string(&msg).unwrap();
        let parsed: ChangeMessage = serde_json::from_str(&s).unwrap();
        assert_eq!(parsed.table, "clients");
        assert_eq!(parsed.kind, ChangeKind::Insert);
        assert_eq!(parsed.key("ain").as_deref(), Some("AIN-100"));
    }

    #[test]
    fn test_delete_keys_from_old_row() {
        let msg = ChangeMessage::delete("duty_payments", json!({"id": "abc123"}));
        assert_eq!(msg.key("id").as_deref(), Some("abc123"));
        assert!(msg.new.is_none());
    }

    #[test]
    fn test_numeric_keys_normalize_to_strings() {
        let msg = ChangeMessage::update("system_settings", json!({"id": 1}));
        assert_eq!(msg.key("id").as_deref(), Some("1"));
    }

    #[test]
    fn test_kind_wire_form_is_lowercase() {
        let s = serde_json::to_string(&ChangeKind::Delete).unwrap();
        assert_eq!(s, "\"delete\"");
    }
}
