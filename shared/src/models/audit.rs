//! Audit log model
//!
//! The console only reads this table; nothing in the app writes to it.

use serde::{Deserialize, Serialize};

use crate::types::Entity;

/// Severity of a log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    #[default]
    Info,
    Warning,
    Danger,
    Success,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warning => write!(f, "warning"),
            LogLevel::Danger => write!(f, "danger"),
            LogLevel::Success => write!(f, "success"),
        }
    }
}

/// One audit log row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: String,
    /// Preformatted timestamp string as stored
    #[serde(default)]
    pub timestamp: String,
    /// Initiator ("system" for backend-originated entries)
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub module: String,
    #[serde(default)]
    pub details: String,
    #[serde(default, rename = "type")]
    pub level: LogLevel,
}

impl Entity for LogEntry {
    const TABLE: &'static str = "audit_logs";

    fn key(&self) -> String {
        self.id.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_uses_type_column() {
        let entry: LogEntry = serde_json::from_str(
            r#"{"id":"1","action":"login","module":"auth","type":"warning"}"#,
        )
        .unwrap();
        assert_eq!(entry.level, LogLevel::Warning);

        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"type\":\"warning\""));
    }
}
