//! AIN registry (client database)

use std::sync::Arc;

use clearhouse_client::{TableStore, delete_row, fetch_rows, insert_row, update_row};
use shared::models::{Client, ClientUpdate};
use shared::{ChangeMessage, Entity};
use validator::Validate;

use crate::error::{ConsoleError, ConsoleResult};
use crate::state::TableMirror;
use crate::stats::{self, RegistrySummary};

pub struct ClientRegistry {
    store: Arc<dyn TableStore>,
    mirror: TableMirror<Client>,
    search: String,
    selection: Vec<String>,
}

impl ClientRegistry {
    pub fn new(store: Arc<dyn TableStore>) -> Self {
        Self {
            store,
            mirror: TableMirror::new(),
            search: String::new(),
            selection: Vec::new(),
        }
    }

    pub async fn load(&mut self) {
        let rows = fetch_rows::<Client>(self.store.as_ref()).await;
        self.mirror.replace_all(rows);
    }

    pub fn apply_event(&mut self, message: &ChangeMessage) {
        self.mirror.apply(message);
    }

    pub fn mirror(&self) -> &TableMirror<Client> {
        &self.mirror
    }

    pub fn clients(&self) -> &[Client] {
        self.mirror.rows()
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    /// Clients whose AIN or name contains the search term
    pub fn visible(&self) -> Vec<&Client> {
        let needle = self.search.to_lowercase();
        self.mirror
            .rows()
            .iter()
            .filter(|c| {
                needle.is_empty()
                    || c.ain.to_lowercase().contains(&needle)
                    || c.name.to_lowercase().contains(&needle)
            })
            .collect()
    }

    pub fn summary(&self) -> RegistrySummary {
        stats::registry_summary(&self.visible())
    }

    /// Look a client up by AIN (the entry forms' autofill)
    pub fn find(&self, ain: &str) -> Option<&Client> {
        self.mirror.get(ain)
    }

    // ========== Save ==========

    /// Create a client, or update the one previously keyed
    /// `original_ain`. AIN and name are required; a duplicate AIN is a
    /// conflict. Existing billing records keep their snapshots either
    /// way.
    pub async fn save(
        &mut self,
        original_ain: Option<&str>,
        ain: &str,
        name: &str,
        phone: &str,
    ) -> ConsoleResult<Client> {
        let client = Client::new(ain.trim(), name.trim(), phone.trim());
        client
            .validate()
            .map_err(|err| ConsoleError::Validation(err.to_string()))?;

        match original_ain {
            Some(original) => {
                if client.ain != original && self.mirror.get(&client.ain).is_some() {
                    return Err(ConsoleError::Conflict(format!("AIN {}", client.ain)));
                }
                if self.mirror.get(original).is_none() {
                    return Err(ConsoleError::NotFound(format!("client {original}")));
                }

                // Rekeying replaces the old row in place
                self.mirror.remove(original);
                self.mirror.begin_write(&client.ain);
                self.mirror.upsert(client.clone());

                let patch = ClientUpdate {
                    ain: Some(client.ain.clone()),
                    name: Some(client.name.clone()),
                    phone: Some(client.phone.clone()),
                    active: Some(true),
                };
                match update_row::<Client, _>(self.store.as_ref(), original, &patch).await {
                    Some(echo) => {
                        self.mirror.confirm(&echo.key(), echo.clone());
                        Ok(echo)
                    }
                    None => {
                        self.mirror.fail(&client.ain, "update not confirmed");
                        Ok(client)
                    }
                }
            }
            None => {
                if self.mirror.get(&client.ain).is_some() {
                    return Err(ConsoleError::Conflict(format!("AIN {}", client.ain)));
                }

                self.mirror.begin_write(&client.ain);
                self.mirror.upsert(client.clone());

                match insert_row(self.store.as_ref(), &client).await {
                    Some(echo) => {
                        self.mirror.confirm(&echo.key(), echo.clone());
                        Ok(echo)
                    }
                    None => {
                        self.mirror.fail(&client.ain, "insert not confirmed");
                        Ok(client)
                    }
                }
            }
        }
    }

    // ========== Delete ==========

    /// Remove clients optimistically; AINs the store rejects are
    /// rolled back into view and returned. Billing records referencing
    /// a deleted AIN are untouched.
    pub async fn delete(&mut self, ains: &[String]) -> Vec<String> {
        let mut rejected = Vec::new();

        for ain in ains {
            let Some(removed) = self.mirror.remove(ain) else {
                continue;
            };
            self.selection.retain(|selected| selected != ain);

            if delete_row::<Client>(self.store.as_ref(), ain).await.is_none() {
                self.mirror.upsert(removed);
                rejected.push(ain.clone());
            }
        }

        rejected
    }

    // ========== CSV import/export ==========

    /// `AIN,Name,Phone` rows for every client in the registry
    pub fn export_csv(&self) -> String {
        let mut out = String::from("AIN,Name,Phone\n");
        for client in self.mirror.rows() {
            out.push_str(&format!("{},{},{}\n", client.ain, client.name, client.phone));
        }
        out
    }

    /// Import `AIN,Name,Phone` rows, skipping the header line, rows
    /// without an AIN and name, and AINs already registered. Returns
    /// how many clients were imported.
    pub async fn import_csv(&mut self, text: &str) -> ConsoleResult<usize> {
        if text.trim().is_empty() {
            return Err(ConsoleError::Validation("empty import file".to_string()));
        }

        let mut imported = Vec::new();
        for line in text.lines().skip(1) {
            let fields: Vec<&str> = line.split(',').collect();
            if fields.len() < 2 {
                continue;
            }
            let ain = fields[0].trim();
            let name = fields[1].trim();
            let phone = fields.get(2).map(|p| p.trim()).unwrap_or("");
            if ain.is_empty() || name.is_empty() || self.mirror.get(ain).is_some() {
                continue;
            }
            imported.push(Client::new(ain, name, phone));
        }

        for client in &imported {
            let key = client.key();
            self.mirror.begin_write(&key);
            self.mirror.upsert(client.clone());

            match insert_row(self.store.as_ref(), client).await {
                Some(echo) => self.mirror.confirm(&echo.key(), echo),
                None => self.mirror.fail(&key, "insert not confirmed"),
            }
        }

        tracing::info!(count = imported.len(), "Client import finished");
        Ok(imported.len())
    }

    // ========== Selection ==========

    pub fn selected(&self) -> &[String] {
        &self.selection
    }

    pub fn toggle_select(&mut self, ain: &str) {
        if let Some(pos) = self.selection.iter().position(|s| s == ain) {
            self.selection.remove(pos);
        } else {
            self.selection.push(ain.to_string());
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }
}
