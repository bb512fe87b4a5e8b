//! Backup snapshot format
//!
//! One JSON document holding the config and every mirrored table.
//! The core builds and parses the document; getting it onto or off
//! the user's disk is the surrounding shell's job.

use serde::{Deserialize, Serialize};

use shared::models::{AssessmentRecord, Client, DutyRecord, StaffUser, SystemConfig};

use crate::error::{ConsoleError, ConsoleResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupFile {
    /// When the snapshot was taken (RFC 3339)
    pub timestamp: String,
    pub config: SystemConfig,
    #[serde(default)]
    pub clients: Vec<Client>,
    #[serde(default)]
    pub duty_history: Vec<DutyRecord>,
    #[serde(default)]
    pub assessment_history: Vec<AssessmentRecord>,
    #[serde(default)]
    pub users: Vec<StaffUser>,
}

impl BackupFile {
    pub fn snapshot(
        config: SystemConfig,
        clients: Vec<Client>,
        duty_history: Vec<DutyRecord>,
        assessment_history: Vec<AssessmentRecord>,
        users: Vec<StaffUser>,
    ) -> Self {
        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            config,
            clients,
            duty_history,
            assessment_history,
            users,
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Parse a backup document. A malformed file is a validation
    /// error, surfaced to the user rather than swallowed.
    pub fn parse(text: &str) -> ConsoleResult<Self> {
        serde_json::from_str(text)
            .map_err(|err| ConsoleError::Validation(format!("invalid backup file: {err}")))
    }

    /// Suggested download name: backup_<agency>_<date>.json
    pub fn file_name(&self) -> String {
        let agency = self.config.agency_name.split_whitespace().collect::<Vec<_>>().join("_");
        let date = chrono::Local::now().format("%Y-%m-%d");
        format!("backup_{agency}_{date}.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_round_trips() {
        let snapshot = BackupFile::snapshot(
            SystemConfig::default(),
            vec![Client::new("AIN-1", "Meghna Traders", "01711000000")],
            Vec::new(),
            Vec::new(),
            Vec::new(),
        );

        let parsed = BackupFile::parse(&snapshot.to_json()).unwrap();
        assert_eq!(parsed.clients.len(), 1);
        assert_eq!(parsed.clients[0].ain, "AIN-1");
        assert_eq!(parsed.config.currency, "BDT");
    }

    #[test]
    fn test_malformed_file_is_a_validation_error() {
        let err = BackupFile::parse("{not json").unwrap_err();
        assert!(matches!(err, ConsoleError::Validation(_)));
    }

    #[test]
    fn test_partial_backup_defaults_missing_tables() {
        let parsed = BackupFile::parse(
            r#"{"timestamp": "2026-08-05T00:00:00Z", "config": {}}"#,
        )
        .unwrap();
        assert!(parsed.clients.is_empty());
        assert!(parsed.users.is_empty());
    }

    #[test]
    fn test_file_name_underscores_agency() {
        let snapshot = BackupFile::snapshot(
            SystemConfig::default(),
            Vec::new(),
            Vec::new(),
            Vec::new(),
            Vec::new(),
        );
        assert!(snapshot.file_name().starts_with("backup_Customs_Duty_Pro_Ltd."));
        assert!(snapshot.file_name().ends_with(".json"));
    }
}
