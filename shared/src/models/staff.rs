//! Staff user model and capability flags

use serde::{Deserialize, Serialize};

use crate::types::Entity;

/// Staff role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StaffRole {
    Admin,
    #[default]
    Staff,
    Viewer,
}

impl std::fmt::Display for StaffRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Fixed-shape capability map. The flags gate UI affordances only;
/// nothing here is enforced server-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Permissions {
    #[serde(default)]
    pub bill_add: bool,
    #[serde(default)]
    pub bill_edit: bool,
    #[serde(default)]
    pub bill_delete: bool,
    #[serde(default)]
    pub bill_bulk_pay: bool,
    #[serde(default)]
    pub bill_export: bool,
    #[serde(default)]
    pub bill_wa_share: bool,
    #[serde(default)]
    pub invoice_print: bool,
    #[serde(default)]
    pub ain_view: bool,
    #[serde(default)]
    pub ain_add: bool,
    #[serde(default)]
    pub ain_delete: bool,
    #[serde(default)]
    pub ain_import: bool,
    #[serde(default)]
    pub ain_export: bool,
    #[serde(default)]
    pub user_manage: bool,
    #[serde(default)]
    pub user_reset_pass: bool,
    #[serde(default)]
    pub view_logs: bool,
    #[serde(default)]
    pub settings_manage: bool,
}

impl Permissions {
    /// No capability granted
    pub fn none() -> Self {
        Self::default()
    }

    /// Every capability granted
    pub fn full() -> Self {
        Self {
            bill_add: true,
            bill_edit: true,
            bill_delete: true,
            bill_bulk_pay: true,
            bill_export: true,
            bill_wa_share: true,
            invoice_print: true,
            ain_view: true,
            ain_add: true,
            ain_delete: true,
            ain_import: true,
            ain_export: true,
            user_manage: true,
            user_reset_pass: true,
            view_logs: true,
            settings_manage: true,
        }
    }

    /// Preset for a freshly created user of the given role
    pub fn for_role(role: StaffRole) -> Self {
        match role {
            StaffRole::Admin => Self::full(),
            StaffRole::Staff => Self {
                bill_add: true,
                ain_view: true,
                ..Self::none()
            },
            StaffRole::Viewer => Self {
                ain_view: true,
                ..Self::none()
            },
        }
    }

    /// Check a capability by its flag name. Unknown names deny.
    pub fn grants(&self, flag: &str) -> bool {
        match flag {
            "bill_add" => self.bill_add,
            "bill_edit" => self.bill_edit,
            "bill_delete" => self.bill_delete,
            "bill_bulk_pay" => self.bill_bulk_pay,
            "bill_export" => self.bill_export,
            "bill_wa_share" => self.bill_wa_share,
            "invoice_print" => self.invoice_print,
            "ain_view" => self.ain_view,
            "ain_add" => self.ain_add,
            "ain_delete" => self.ain_delete,
            "ain_import" => self.ain_import,
            "ain_export" => self.ain_export,
            "user_manage" => self.user_manage,
            "user_reset_pass" => self.user_reset_pass,
            "view_logs" => self.view_logs,
            "settings_manage" => self.settings_manage,
            _ => false,
        }
    }
}

/// Staff user row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffUser {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: StaffRole,
    #[serde(default)]
    pub permissions: Permissions,
    /// Display string maintained by the backend ("2 mins ago", "Never")
    #[serde(default)]
    pub last_active: String,
    #[serde(default)]
    pub active: bool,
}

impl Entity for StaffUser {
    const TABLE: &'static str = "staff_users";

    fn key(&self) -> String {
        self.id.clone()
    }
}

/// Patch for a staff row
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaffUserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<StaffRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Permissions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_active: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_presets() {
        assert!(Permissions::for_role(StaffRole::Admin).settings_manage);
        let staff = Permissions::for_role(StaffRole::Staff);
        assert!(staff.bill_add && staff.ain_view);
        assert!(!staff.bill_delete);
    }

    #[test]
    fn test_grants_by_name() {
        let p = Permissions::for_role(StaffRole::Staff);
        assert!(p.grants("bill_add"));
        assert!(!p.grants("user_manage"));
        assert!(!p.grants("no_such_flag"));
    }

    #[test]
    fn test_partial_permission_row_decodes() {
        // Older rows may carry a subset of flags
        let p: Permissions = serde_json::from_str(r#"{"bill_add": true}"#).unwrap();
        assert!(p.bill_add);
        assert!(!p.view_logs);
    }
}
