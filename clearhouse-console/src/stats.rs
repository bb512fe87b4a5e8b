//! Summary statistics
//!
//! Pure reductions over the active tab's visible rows. Nothing is
//! stored; every value is recomputed from the row set it is handed.

use shared::models::{AssessmentRecord, Client, DutyRecord, RecordStatus};

/// Duty tab headline figures
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DutySummary {
    pub gross_duty: f64,
    pub total_collection: f64,
    pub service_profit: f64,
    pub pending_jobs: usize,
}

pub fn duty_summary(rows: &[&DutyRecord]) -> DutySummary {
    DutySummary {
        gross_duty: rows.iter().map(|r| r.duty).sum(),
        total_collection: rows.iter().map(|r| r.received).sum(),
        service_profit: rows.iter().map(|r| r.profit).sum(),
        pending_jobs: rows.iter().filter(|r| r.status != RecordStatus::Paid).count(),
    }
}

/// Assessment tab headline figures
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AssessmentSummary {
    pub total_billed: f64,
    pub total_received: f64,
    pub outstanding: f64,
    pub total_be: u64,
}

pub fn assessment_summary(rows: &[&AssessmentRecord]) -> AssessmentSummary {
    let total_billed: f64 = rows.iter().map(|r| r.net).sum();
    let total_received: f64 = rows.iter().map(|r| r.received).sum();
    AssessmentSummary {
        total_billed,
        total_received,
        outstanding: total_billed - total_received,
        total_be: rows.iter().map(|r| u64::from(r.nos_of_be)).sum(),
    }
}

/// AIN registry headline figures
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RegistrySummary {
    pub total: usize,
    pub verified: usize,
    pub active: usize,
}

pub fn registry_summary(rows: &[&Client]) -> RegistrySummary {
    RegistrySummary {
        total: rows.len(),
        verified: rows.iter().filter(|c| !c.phone.is_empty()).count(),
        active: rows.iter().filter(|c| c.active).count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn duty(duty: f64, received: f64, profit: f64, status: RecordStatus) -> DutyRecord {
        DutyRecord {
            id: "d".to_string(),
            date: String::new(),
            ain: String::new(),
            client_name: String::new(),
            phone: String::new(),
            be_year: String::new(),
            duty,
            received,
            status,
            profit,
            payment_method: None,
        }
    }

    #[test]
    fn test_duty_summary_reductions() {
        let rows = vec![
            duty(1000.0, 300.0, -700.0, RecordStatus::Paid),
            duty(500.0, 0.0, 0.0, RecordStatus::New),
            duty(1500.0, 0.0, 0.0, RecordStatus::Completed),
        ];
        let refs: Vec<&DutyRecord> = rows.iter().collect();
        let summary = duty_summary(&refs);

        assert_eq!(summary.gross_duty, 3000.0);
        assert_eq!(summary.total_collection, 300.0);
        assert_eq!(summary.service_profit, -700.0);
        assert_eq!(summary.pending_jobs, 2);
    }

    #[test]
    fn test_assessment_outstanding_is_net_minus_received() {
        let mut a = AssessmentRecord {
            id: "a".to_string(),
            date: String::new(),
            ain: String::new(),
            client_name: String::new(),
            phone: String::new(),
            nos_of_be: 10,
            rate: 100.0,
            amount: 1000.0,
            discount: 100.0,
            net: 900.0,
            received: 400.0,
            status: RecordStatus::Completed,
            profit: 900.0,
            payment_method: None,
        };
        let b = AssessmentRecord {
            nos_of_be: 5,
            net: 2700.0,
            received: 0.0,
            ..a.clone()
        };
        a.id = "a1".to_string();

        let rows = [&a, &b];
        let summary = assessment_summary(&rows);
        assert_eq!(summary.total_billed, 3600.0);
        assert_eq!(summary.total_received, 400.0);
        assert_eq!(summary.outstanding, 3200.0);
        assert_eq!(summary.total_be, 15);
    }

    #[test]
    fn test_registry_summary_counts() {
        let rows = vec![
            Client::new("A1", "Meghna Traders", "01711000000"),
            Client::new("A2", "Padma Impex", ""),
            Client {
                active: false,
                ..Client::new("A3", "Karnaphuli Agents", "01912000000")
            },
        ];
        let refs: Vec<&Client> = rows.iter().collect();
        let summary = registry_summary(&refs);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.verified, 2);
        assert_eq!(summary.active, 2);
    }

    #[test]
    fn test_empty_row_sets() {
        assert_eq!(duty_summary(&[]), DutySummary::default());
        assert_eq!(assessment_summary(&[]), AssessmentSummary::default());
        assert_eq!(registry_summary(&[]), RegistrySummary::default());
    }
}
