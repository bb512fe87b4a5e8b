//! System configuration
//!
//! Process-wide settings: branding, default assessment rate, payment
//! methods, theme/locale, and backing-store credentials. Loaded once
//! at session start, overlaid with the remote settings row, mutated by
//! admin actions, and persisted back explicitly on each change.

use serde::{Deserialize, Serialize};

/// Color scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

/// Visual template applied on top of the theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeTemplate {
    #[default]
    Soft,
    Paper,
    Sand,
    Ink,
}

/// Interface language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Bn,
}

/// The settings row keeps id 1; there is only ever one.
pub const SETTINGS_ROW_ID: &str = "1";

/// Table holding the single settings row
pub const SETTINGS_TABLE: &str = "system_settings";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    /// Default rate per B/E for new assessment bills
    #[serde(default)]
    pub default_rate: f64,
    #[serde(default)]
    pub agency_name: String,
    #[serde(default)]
    pub agency_address: String,
    #[serde(default)]
    pub auto_invoice: bool,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme_template: Option<ThemeTemplate>,
    #[serde(default)]
    pub language: Language,
    /// Enabled payment methods, in display order
    #[serde(default)]
    pub payment_methods: Vec<String>,
    /// Backing store connection; kept locally, never synced to the
    /// settings row
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_backup: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_maintenance: Option<String>,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            default_rate: 100.0,
            agency_name: "Customs Duty Pro Ltd.".to_string(),
            agency_address: "House #12, Road #4, Sector #7, Uttara, Dhaka-1230".to_string(),
            auto_invoice: true,
            currency: "BDT".to_string(),
            theme: Theme::Light,
            theme_template: Some(ThemeTemplate::Soft),
            language: Language::En,
            payment_methods: vec![
                "Cash".to_string(),
                "Bank".to_string(),
                "bKash".to_string(),
                "Nagad".to_string(),
            ],
            store_url: None,
            store_key: None,
            last_backup: None,
            last_maintenance: None,
        }
    }
}

/// Patch for the remote settings row. Only fields meant to survive a
/// session are represented; connection credentials and local stamps
/// stay out of it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SystemConfigUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agency_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agency_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_invoice: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme_template: Option<ThemeTemplate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_methods: Option<Vec<String>>,
}

impl SystemConfig {
    /// Overlay fields present in a remote settings row onto this
    /// config, leaving everything else untouched.
    pub fn merge(&mut self, remote: &SystemConfigUpdate) {
        if let Some(v) = remote.default_rate {
            self.default_rate = v;
        }
        if let Some(v) = &remote.agency_name {
            self.agency_name = v.clone();
        }
        if let Some(v) = &remote.agency_address {
            self.agency_address = v.clone();
        }
        if let Some(v) = remote.auto_invoice {
            self.auto_invoice = v;
        }
        if let Some(v) = &remote.currency {
            self.currency = v.clone();
        }
        if let Some(v) = remote.theme {
            self.theme = v;
        }
        if let Some(v) = remote.theme_template {
            self.theme_template = Some(v);
        }
        if let Some(v) = remote.language {
            self.language = v;
        }
        if let Some(v) = &remote.payment_methods {
            self.payment_methods = v.clone();
        }
    }

    /// The patch written back to the settings row on each change.
    pub fn synced_fields(&self) -> SystemConfigUpdate {
        SystemConfigUpdate {
            default_rate: Some(self.default_rate),
            agency_name: Some(self.agency_name.clone()),
            agency_address: Some(self.agency_address.clone()),
            auto_invoice: Some(self.auto_invoice),
            currency: Some(self.currency.clone()),
            theme: Some(self.theme),
            theme_template: self.theme_template,
            language: Some(self.language),
            payment_methods: Some(self.payment_methods.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_overlays_only_present_fields() {
        let mut config = SystemConfig::default();
        let remote = SystemConfigUpdate {
            agency_name: Some("Chattogram Clearing House".to_string()),
            default_rate: Some(250.0),
            ..Default::default()
        };
        config.merge(&remote);

        assert_eq!(config.agency_name, "Chattogram Clearing House");
        assert_eq!(config.default_rate, 250.0);
        // Untouched fields keep their defaults
        assert_eq!(config.currency, "BDT");
        assert_eq!(config.payment_methods.len(), 4);
    }

    #[test]
    fn test_synced_fields_exclude_credentials() {
        let mut config = SystemConfig::default();
        config.store_url = Some("https://store.example.co".to_string());
        config.store_key = Some("anon-key".to_string());

        let json = serde_json::to_string(&config.synced_fields()).unwrap();
        assert!(!json.contains("store_url"));
        assert!(!json.contains("anon-key"));
    }

    #[test]
    fn test_enum_wire_forms() {
        assert_eq!(serde_json::to_string(&Theme::Dark).unwrap(), "\"dark\"");
        assert_eq!(serde_json::to_string(&Language::Bn).unwrap(), "\"bn\"");
        assert_eq!(serde_json::to_string(&ThemeTemplate::Paper).unwrap(), "\"paper\"");
    }
}
