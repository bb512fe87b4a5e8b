//! Settings lifecycle
//!
//! The config is loaded once at session start (local file, falling
//! back to defaults), overlaid with the remote single-row settings
//! record, mutated in place by admin actions, and pushed back to the
//! settings row on each change. Connection credentials and local
//! stamps never leave the machine.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clearhouse_client::TableStore;
use shared::ChangeMessage;
use shared::models::{SETTINGS_ROW_ID, SETTINGS_TABLE, SystemConfig, SystemConfigUpdate};

use crate::error::{ConsoleError, ConsoleResult};

pub struct SettingsManager {
    store: Arc<dyn TableStore>,
    config: SystemConfig,
    config_path: Option<PathBuf>,
}

impl SettingsManager {
    pub fn new(store: Arc<dyn TableStore>, config: SystemConfig) -> Self {
        Self {
            store,
            config,
            config_path: None,
        }
    }

    /// Load the local config file, falling back to defaults when the
    /// file does not exist. The path is remembered for saves.
    pub fn with_config_file(store: Arc<dyn TableStore>, path: &Path) -> ConsoleResult<Self> {
        let config = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            serde_json::from_str(&content).map_err(|e| ConsoleError::Config(e.to_string()))?
        } else {
            SystemConfig::default()
        };

        Ok(Self {
            store,
            config,
            config_path: Some(path.to_path_buf()),
        })
    }

    /// Persist the local config file, when one is configured
    pub fn save_local(&self) -> ConsoleResult<()> {
        let Some(path) = &self.config_path else {
            return Ok(());
        };
        let content = serde_json::to_string_pretty(&self.config)
            .map_err(|e| ConsoleError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    /// Overlay the remote settings row. A read failure leaves the
    /// current config untouched.
    pub async fn load_remote(&mut self) {
        match self.store.select_all(SETTINGS_TABLE).await {
            Ok(rows) => {
                let Some(row) = rows.into_iter().next() else {
                    return;
                };
                match serde_json::from_value::<SystemConfigUpdate>(row) {
                    Ok(remote) => self.config.merge(&remote),
                    Err(err) => {
                        tracing::warn!(error = %err, "Undecodable settings row");
                    }
                }
            }
            Err(err) => {
                tracing::error!(error = %err, "Settings fetch failed");
            }
        }
    }

    /// Fold a settings-row change notification into the config
    pub fn apply_event(&mut self, message: &ChangeMessage) {
        if message.table != SETTINGS_TABLE {
            return;
        }
        let Some(row) = message.new.clone() else {
            return;
        };
        match serde_json::from_value::<SystemConfigUpdate>(row) {
            Ok(remote) => self.config.merge(&remote),
            Err(err) => {
                tracing::warn!(error = %err, "Undecodable settings row");
            }
        }
    }

    /// Mutate the config, then push the synced fields to the settings
    /// row and the local file. A failed remote write keeps the local
    /// change and logs.
    pub async fn update<F>(&mut self, mutate: F)
    where
        F: FnOnce(&mut SystemConfig),
    {
        mutate(&mut self.config);
        self.push_remote().await;
        if let Err(err) = self.save_local() {
            tracing::error!(error = %err, "Local config save failed");
        }
    }

    async fn push_remote(&self) {
        let patch = match serde_json::to_value(self.config.synced_fields()) {
            Ok(v) => v,
            Err(err) => {
                tracing::error!(error = %err, "Settings patch failed to encode");
                return;
            }
        };
        if let Err(err) = self
            .store
            .update(SETTINGS_TABLE, "id", SETTINGS_ROW_ID, patch)
            .await
        {
            tracing::error!(error = %err, "Settings push failed");
        }
    }

    // ========== Payment methods ==========

    /// Append a payment method. Empty and duplicate names are dropped
    /// silently.
    pub async fn add_payment_method(&mut self, method: &str) {
        let method = method.trim().to_string();
        if method.is_empty() || self.config.payment_methods.contains(&method) {
            return;
        }
        self.update(|config| config.payment_methods.push(method)).await;
    }

    pub async fn remove_payment_method(&mut self, method: &str) {
        self.update(|config| config.payment_methods.retain(|m| m != method))
            .await;
    }

    // ========== Maintenance stamps ==========

    /// Record a finished backup. Stamps are local-only.
    pub fn stamp_backup(&mut self) {
        self.config.last_backup = Some(chrono::Local::now().format("%d/%m/%Y, %H:%M:%S").to_string());
        if let Err(err) = self.save_local() {
            tracing::error!(error = %err, "Local config save failed");
        }
    }

    /// Record a finished maintenance run (vacuum, reindex)
    pub fn stamp_maintenance(&mut self, kind: &str) {
        tracing::info!(kind = %kind, "Database maintenance completed");
        self.config.last_maintenance =
            Some(chrono::Local::now().format("%d/%m/%Y, %H:%M:%S").to_string());
        if let Err(err) = self.save_local() {
            tracing::error!(error = %err, "Local config save failed");
        }
    }
}
