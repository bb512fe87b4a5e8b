//! Ledger filter predicates
//!
//! A record is visible iff it independently satisfies the text,
//! status, payment-method, and date-range predicates. Filter state is
//! session-local and never persisted.

use chrono::{NaiveDate, NaiveDateTime};

use shared::models::{AssessmentRecord, DutyRecord, RecordStatus};

/// Parse a stored record date: day/month/year first, ISO forms next,
/// epoch when nothing parses.
pub fn parse_record_date(raw: &str) -> NaiveDateTime {
    let epoch = chrono::DateTime::from_timestamp(0, 0)
        .expect("epoch timestamp")
        .naive_utc();

    if raw.is_empty() {
        return epoch;
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%d/%m/%Y") {
        return date.and_hms_opt(0, 0, 0).unwrap_or(epoch);
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).unwrap_or(epoch);
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return dt.naive_utc();
    }
    epoch
}

/// A row the ledger filter can be evaluated against
pub trait Filterable {
    fn date(&self) -> &str;
    fn status(&self) -> RecordStatus;
    fn payment_method(&self) -> Option<&str>;
    /// Case-insensitive search haystacks (`needle` arrives lowercased)
    fn matches_search(&self, needle: &str) -> bool;
}

impl Filterable for DutyRecord {
    fn date(&self) -> &str {
        &self.date
    }

    fn status(&self) -> RecordStatus {
        self.status
    }

    fn payment_method(&self) -> Option<&str> {
        self.payment_method.as_deref()
    }

    fn matches_search(&self, needle: &str) -> bool {
        self.client_name.to_lowercase().contains(needle)
            || self.ain.to_lowercase().contains(needle)
            || self.be_year.to_lowercase().contains(needle)
    }
}

impl Filterable for AssessmentRecord {
    fn date(&self) -> &str {
        &self.date
    }

    fn status(&self) -> RecordStatus {
        self.status
    }

    fn payment_method(&self) -> Option<&str> {
        self.payment_method.as_deref()
    }

    fn matches_search(&self, needle: &str) -> bool {
        self.client_name.to_lowercase().contains(needle)
            || self.ain.to_lowercase().contains(needle)
    }
}

/// Conjunction of the four ledger predicates. `None` means "All".
#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    pub search: String,
    pub status: Option<RecordStatus>,
    pub method: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl RecordFilter {
    pub fn matches<T: Filterable>(&self, record: &T) -> bool {
        let needle = self.search.to_lowercase();
        if !needle.is_empty() && !record.matches_search(&needle) {
            return false;
        }

        if let Some(status) = self.status {
            if record.status() != status {
                return false;
            }
        }

        if let Some(method) = &self.method {
            if record.payment_method() != Some(method.as_str()) {
                return false;
            }
        }

        if self.start_date.is_some() || self.end_date.is_some() {
            let record_date = parse_record_date(record.date());
            if let Some(start) = self.start_date {
                let start = start.and_hms_opt(0, 0, 0).expect("valid bound");
                if record_date < start {
                    return false;
                }
            }
            if let Some(end) = self.end_date {
                let end = end.and_hms_opt(23, 59, 59).expect("valid bound");
                if record_date > end {
                    return false;
                }
            }
        }

        true
    }

    /// Project the visible subset of a row slice
    pub fn visible<'a, T: Filterable>(&self, rows: &'a [T]) -> Vec<&'a T> {
        rows.iter().filter(|row| self.matches(*row)).collect()
    }

    /// Restrict both bounds to one day
    pub fn set_day(&mut self, day: NaiveDate) {
        self.start_date = Some(day);
        self.end_date = Some(day);
    }

    /// Drop every predicate
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, ain: &str, date: &str, status: RecordStatus, method: Option<&str>) -> DutyRecord {
        DutyRecord {
            id: "r".to_string(),
            date: date.to_string(),
            ain: ain.to_string(),
            client_name: name.to_string(),
            phone: String::new(),
            be_year: "C-42(2026)".to_string(),
            duty: 100.0,
            received: 0.0,
            status,
            profit: 0.0,
            payment_method: method.map(String::from),
        }
    }

    #[test]
    fn test_date_parsing_forms() {
        assert_eq!(
            parse_record_date("05/08/2026").date(),
            NaiveDate::from_ymd_opt(2026, 8, 5).unwrap()
        );
        assert_eq!(
            parse_record_date("2026-08-05").date(),
            NaiveDate::from_ymd_opt(2026, 8, 5).unwrap()
        );
        // Unparseable input falls back to epoch
        assert_eq!(
            parse_record_date("yesterday").date(),
            NaiveDate::from_ymd_opt(1970, 1, 1).unwrap()
        );
        assert_eq!(
            parse_record_date("").date(),
            NaiveDate::from_ymd_opt(1970, 1, 1).unwrap()
        );
    }

    #[test]
    fn test_text_predicate_is_case_insensitive() {
        let filter = RecordFilter {
            search: "meghna".to_string(),
            ..Default::default()
        };
        let rec = record("Meghna Traders", "AIN-1", "05/08/2026", RecordStatus::New, None);
        assert!(filter.matches(&rec));

        let filter = RecordFilter {
            search: "ain-1".to_string(),
            ..Default::default()
        };
        assert!(filter.matches(&rec));

        let filter = RecordFilter {
            search: "padma".to_string(),
            ..Default::default()
        };
        assert!(!filter.matches(&rec));
    }

    #[test]
    fn test_duty_search_includes_be_reference() {
        let rec = record("Meghna Traders", "AIN-1", "05/08/2026", RecordStatus::New, None);
        let filter = RecordFilter {
            search: "c-42".to_string(),
            ..Default::default()
        };
        assert!(filter.matches(&rec));
    }

    #[test]
    fn test_status_predicate_exact_or_all() {
        let rec = record("A", "1", "05/08/2026", RecordStatus::Paid, None);
        let all = RecordFilter::default();
        assert!(all.matches(&rec));

        let paid = RecordFilter {
            status: Some(RecordStatus::Paid),
            ..Default::default()
        };
        assert!(paid.matches(&rec));

        let pending = RecordFilter {
            status: Some(RecordStatus::Pending),
            ..Default::default()
        };
        assert!(!pending.matches(&rec));
    }

    #[test]
    fn test_method_predicate() {
        let rec = record("A", "1", "05/08/2026", RecordStatus::Paid, Some("bKash"));
        let filter = RecordFilter {
            method: Some("bKash".to_string()),
            ..Default::default()
        };
        assert!(filter.matches(&rec));

        let filter = RecordFilter {
            method: Some("Cash".to_string()),
            ..Default::default()
        };
        assert!(!filter.matches(&rec));

        // Unpaid rows have no method and never match a method filter
        let unpaid = record("A", "1", "05/08/2026", RecordStatus::New, None);
        assert!(!filter.matches(&unpaid));
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let rec = record("A", "1", "05/08/2026", RecordStatus::New, None);
        let mut filter = RecordFilter::default();
        filter.set_day(NaiveDate::from_ymd_opt(2026, 8, 5).unwrap());
        assert!(filter.matches(&rec));

        filter.start_date = Some(NaiveDate::from_ymd_opt(2026, 8, 6).unwrap());
        filter.end_date = None;
        assert!(!filter.matches(&rec));

        filter.clear();
        filter.end_date = Some(NaiveDate::from_ymd_opt(2026, 8, 4).unwrap());
        assert!(!filter.matches(&rec));
    }

    #[test]
    fn test_predicates_conjoin() {
        let rec = record(
            "Meghna Traders",
            "AIN-1",
            "05/08/2026",
            RecordStatus::Paid,
            Some("Cash"),
        );
        let mut filter = RecordFilter {
            search: "meghna".to_string(),
            status: Some(RecordStatus::Paid),
            method: Some("Cash".to_string()),
            ..Default::default()
        };
        filter.set_day(NaiveDate::from_ymd_opt(2026, 8, 5).unwrap());
        assert!(filter.matches(&rec));

        // Any single failing predicate hides the record
        filter.search = "padma".to_string();
        assert!(!filter.matches(&rec));
    }

    #[test]
    fn test_visible_projection() {
        let rows = vec![
            record("Meghna Traders", "AIN-1", "05/08/2026", RecordStatus::New, None),
            record("Padma Impex", "AIN-2", "05/08/2026", RecordStatus::Paid, None),
        ];
        let filter = RecordFilter {
            status: Some(RecordStatus::New),
            ..Default::default()
        };
        let visible = filter.visible(&rows);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].ain, "AIN-1");
    }
}
