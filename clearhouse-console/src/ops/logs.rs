//! Audit trail viewer
//!
//! Strictly read-only: the console mirrors the audit table and filters
//! it, but nothing in the app writes entries.

use std::sync::Arc;

use clearhouse_client::{TableStore, fetch_rows};
use shared::ChangeMessage;
use shared::models::LogEntry;

use crate::state::TableMirror;

pub struct AuditTrail {
    store: Arc<dyn TableStore>,
    mirror: TableMirror<LogEntry>,
    filter: String,
}

impl AuditTrail {
    pub fn new(store: Arc<dyn TableStore>) -> Self {
        Self {
            store,
            mirror: TableMirror::new(),
            filter: String::new(),
        }
    }

    pub async fn load(&mut self) {
        let rows = fetch_rows::<LogEntry>(self.store.as_ref()).await;
        self.mirror.replace_all(rows);
    }

    pub fn apply_event(&mut self, message: &ChangeMessage) {
        self.mirror.apply(message);
    }

    pub fn entries(&self) -> &[LogEntry] {
        self.mirror.rows()
    }

    pub fn set_filter(&mut self, term: impl Into<String>) {
        self.filter = term.into();
    }

    /// Entries whose action or details contain the filter term
    pub fn visible(&self) -> Vec<&LogEntry> {
        let needle = self.filter.to_lowercase();
        self.mirror
            .rows()
            .iter()
            .filter(|entry| {
                needle.is_empty()
                    || entry.action.to_lowercase().contains(&needle)
                    || entry.details.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// CSV projection of the visible entries for export
    pub fn to_csv(&self) -> String {
        let mut out = String::from("Timestamp,Initiator,Action,Module,Details,Type\n");
        for entry in self.visible() {
            out.push_str(&format!(
                "{},{},{},{},{},{}\n",
                entry.timestamp,
                entry.user_name,
                entry.action,
                entry.module,
                entry.details.replace(',', ";"),
                entry.level,
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::LogLevel;

    fn entry(id: &str, action: &str, details: &str) -> LogEntry {
        LogEntry {
            id: id.to_string(),
            timestamp: "05/08/2026, 10:15:00".to_string(),
            user_name: "system".to_string(),
            action: action.to_string(),
            module: "auth".to_string(),
            details: details.to_string(),
            level: LogLevel::Info,
        }
    }

    fn trail_with(entries: Vec<LogEntry>) -> AuditTrail {
        // The store is never consulted by the filter paths
        let hub = std::sync::Arc::new(clearhouse_client::FeedHub::new());
        let store = std::sync::Arc::new(clearhouse_client::MemoryTableStore::new(hub));
        let mut trail = AuditTrail::new(store);
        trail.mirror.replace_all(entries);
        trail
    }

    #[test]
    fn test_filter_matches_action_or_details() {
        let mut trail = trail_with(vec![
            entry("1", "login", "staff signed in"),
            entry("2", "export", "backup file generated"),
        ]);

        trail.set_filter("LOGIN");
        assert_eq!(trail.visible().len(), 1);

        trail.set_filter("backup");
        assert_eq!(trail.visible().len(), 1);

        trail.set_filter("");
        assert_eq!(trail.visible().len(), 2);
    }

    #[test]
    fn test_csv_escapes_field_separator() {
        let trail = trail_with(vec![entry("1", "edit", "rate changed, rebilled")]);
        let csv = trail.to_csv();
        assert!(csv.starts_with("Timestamp,"));
        assert!(csv.contains("rate changed; rebilled"));
    }
}
