//! Client registry model (AIN database)

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::types::Entity;

/// Registered importer/exporter, keyed by its Agency Identification
/// Number. Billing records keep their own denormalized snapshot, so
/// deleting a client never cascades.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Client {
    /// Unique customs registration identifier (business key)
    #[validate(length(min = 1, message = "AIN is required"))]
    pub ain: String,
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub active: bool,
}

impl Client {
    pub fn new(ain: impl Into<String>, name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            ain: ain.into(),
            name: name.into(),
            phone: phone.into(),
            active: true,
        }
    }
}

impl Entity for Client {
    const TABLE: &'static str = "clients";
    const KEY: &'static str = "ain";
    // The AIN is entered by the operator, never minted by the store
    const KEY_ASSIGNED_BY_STORE: bool = false;

    fn key(&self) -> String {
        self.ain.clone()
    }
}

/// Patch for a client row
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clients_start_active() {
        let c = Client::new("AIN-42", "Padma Impex", "01711000000");
        assert!(c.active);
        assert_eq!(c.key(), "AIN-42");
    }

    #[test]
    fn test_validation_rejects_blank_ain() {
        let c = Client::new("", "Padma Impex", "");
        assert!(validator::Validate::validate(&c).is_err());
    }
}
