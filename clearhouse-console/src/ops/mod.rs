//! Console operations, one module per screen

pub mod assessment;
pub mod duty;
pub mod logs;
pub mod registry;
pub mod settings;
pub mod staff;

// Re-exports
pub use assessment::AssessmentLedger;
pub use duty::{BatchHeader, DutyLedger};
pub use logs::AuditTrail;
pub use registry::ClientRegistry;
pub use settings::SettingsManager;
pub use staff::StaffDirectory;
