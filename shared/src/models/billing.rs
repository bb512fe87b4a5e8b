//! Billing record models
//!
//! Two record shapes share a common lifecycle: duty payments track a
//! government levy per Bill of Entry, assessment bills price the
//! agency's filing service as unit count x rate.

use serde::{Deserialize, Serialize};

use crate::types::Entity;
use crate::util;

/// Workflow status of a billing record.
///
/// Progression is New -> Completed -> Paid. Pending appears in rows
/// migrated from older data sets and is treated like Completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RecordStatus {
    #[default]
    New,
    Completed,
    Pending,
    Paid,
}

impl std::fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Duty payment ledger row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DutyRecord {
    pub id: String,
    /// Creation date, day/month/year
    #[serde(default)]
    pub date: String,
    /// Client business identifier at creation time
    #[serde(default)]
    pub ain: String,
    /// Denormalized client snapshot, not kept in sync with later edits
    #[serde(default)]
    pub client_name: String,
    #[serde(default)]
    pub phone: String,
    /// Bill of Entry reference, formatted "C-<number>(<year>)"
    #[serde(default)]
    pub be_year: String,
    /// Duty amount owed
    #[serde(default)]
    pub duty: f64,
    /// Amount collected so far
    #[serde(default)]
    pub received: f64,
    #[serde(default)]
    pub status: RecordStatus,
    /// Net benefit to the agency: received - duty once settled
    #[serde(default)]
    pub profit: f64,
    /// Set once the record is Paid
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
}

impl Entity for DutyRecord {
    const TABLE: &'static str = "duty_payments";

    fn key(&self) -> String {
        self.id.clone()
    }
}

/// Patch for a duty row (edit, settlement, status change)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DutyRecordUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub be_year: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duty: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub received: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<RecordStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profit: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
}

impl DutyRecord {
    /// Apply a patch in place (the local half of an optimistic write).
    pub fn apply(&mut self, patch: &DutyRecordUpdate) {
        if let Some(v) = &patch.ain {
            self.ain = v.clone();
        }
        if let Some(v) = &patch.client_name {
            self.client_name = v.clone();
        }
        if let Some(v) = &patch.phone {
            self.phone = v.clone();
        }
        if let Some(v) = &patch.be_year {
            self.be_year = v.clone();
        }
        if let Some(v) = patch.duty {
            self.duty = v;
        }
        if let Some(v) = patch.received {
            self.received = v;
        }
        if let Some(v) = patch.status {
            self.status = v;
        }
        if let Some(v) = patch.profit {
            self.profit = v;
        }
        if let Some(v) = &patch.payment_method {
            self.payment_method = Some(v.clone());
        }
    }
}

/// Assessment billing ledger row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentRecord {
    pub id: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub ain: String,
    #[serde(default)]
    pub client_name: String,
    #[serde(default)]
    pub phone: String,
    /// Number of Bills of Entry billed
    #[serde(default)]
    pub nos_of_be: u32,
    /// Rate per B/E
    #[serde(default)]
    pub rate: f64,
    /// nos_of_be x rate
    #[serde(default)]
    pub amount: f64,
    /// This row's share of the batch discount
    #[serde(default)]
    pub discount: f64,
    /// amount - discount; holds at persistence time
    #[serde(default)]
    pub net: f64,
    #[serde(default)]
    pub received: f64,
    #[serde(default)]
    pub status: RecordStatus,
    #[serde(default)]
    pub profit: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
}

impl Entity for AssessmentRecord {
    const TABLE: &'static str = "assessments";

    fn key(&self) -> String {
        self.id.clone()
    }
}

/// Patch for an assessment row
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssessmentRecordUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nos_of_be: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub net: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub received: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<RecordStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profit: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
}

impl AssessmentRecord {
    pub fn apply(&mut self, patch: &AssessmentRecordUpdate) {
        if let Some(v) = &patch.ain {
            self.ain = v.clone();
        }
        if let Some(v) = &patch.client_name {
            self.client_name = v.clone();
        }
        if let Some(v) = &patch.phone {
            self.phone = v.clone();
        }
        if let Some(v) = patch.nos_of_be {
            self.nos_of_be = v;
        }
        if let Some(v) = patch.rate {
            self.rate = v;
        }
        if let Some(v) = patch.amount {
            self.amount = v;
        }
        if let Some(v) = patch.discount {
            self.discount = v;
        }
        if let Some(v) = patch.net {
            self.net = v;
        }
        if let Some(v) = patch.received {
            self.received = v;
        }
        if let Some(v) = patch.status {
            self.status = v;
        }
        if let Some(v) = patch.profit {
            self.profit = v;
        }
        if let Some(v) = &patch.payment_method {
            self.payment_method = Some(v.clone());
        }
    }
}

/// Normalize a B/E number as entered: trimmed, uppercased, and
/// prefixed with "C-" when the prefix is missing.
pub fn normalize_be_number(raw: &str) -> String {
    let formatted = raw.trim().to_uppercase();
    if formatted.starts_with("C-") {
        formatted
    } else {
        format!("C-{formatted}")
    }
}

/// Draft duty line item, queued before commit. Never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DutyDraft {
    /// Session-local identifier
    pub id: i64,
    pub be_number: String,
    pub year: String,
    pub duty: f64,
}

impl DutyDraft {
    pub fn new(be_number: &str, year: impl Into<String>, duty: f64) -> Self {
        Self {
            id: util::draft_id(),
            be_number: normalize_be_number(be_number),
            year: year.into(),
            duty,
        }
    }

    /// Combined B/E reference written to the persisted row
    pub fn be_reference(&self) -> String {
        format!("{}({})", self.be_number, self.year)
    }
}

/// Draft assessment line item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentDraft {
    pub id: i64,
    pub nos_of_be: u32,
    pub rate: f64,
    /// nos_of_be x rate, fixed at entry time
    pub amount: f64,
}

impl AssessmentDraft {
    pub fn new(nos_of_be: u32, rate: f64) -> Self {
        Self {
            id: util::draft_id(),
            nos_of_be,
            rate,
            amount: f64::from(nos_of_be) * rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_form() {
        assert_eq!(serde_json::to_string(&RecordStatus::Paid).unwrap(), "\"Paid\"");
        let s: RecordStatus = serde_json::from_str("\"Completed\"").unwrap();
        assert_eq!(s, RecordStatus::Completed);
    }

    #[test]
    fn test_be_number_normalization() {
        assert_eq!(normalize_be_number("12345"), "C-12345");
        assert_eq!(normalize_be_number(" c-777 "), "C-777");
        assert_eq!(normalize_be_number("C-888"), "C-888");
    }

    #[test]
    fn test_duty_draft_reference() {
        let draft = DutyDraft::new("4521", "2026", 500.0);
        assert_eq!(draft.be_reference(), "C-4521(2026)");
    }

    #[test]
    fn test_assessment_draft_amount() {
        let draft = AssessmentDraft::new(12, 150.0);
        assert_eq!(draft.amount, 1800.0);
    }

    #[test]
    fn test_update_patch_skips_absent_fields() {
        let patch = DutyRecordUpdate {
            status: Some(RecordStatus::Paid),
            received: Some(300.0),
            ..Default::default()
        };
        let json = serde_json::to_string(&patch).unwrap();
        assert!(json.contains("\"status\":\"Paid\""));
        assert!(!json.contains("duty"));
        assert!(!json.contains("be_year"));
    }

    #[test]
    fn test_missing_columns_default_on_decode() {
        let rec: DutyRecord = serde_json::from_str(r#"{"id":"r1"}"#).unwrap();
        assert_eq!(rec.duty, 0.0);
        assert_eq!(rec.status, RecordStatus::New);
        assert!(rec.payment_method.is_none());
    }
}
