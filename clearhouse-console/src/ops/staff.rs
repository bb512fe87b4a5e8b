//! Staff directory and permission administration

use std::sync::Arc;

use clearhouse_client::{TableStore, fetch_rows, insert_row, update_row};
use shared::models::{Permissions, StaffRole, StaffUser, StaffUserUpdate};
use shared::{ChangeMessage, Entity, util};

use crate::error::{ConsoleError, ConsoleResult};
use crate::state::TableMirror;

pub struct StaffDirectory {
    store: Arc<dyn TableStore>,
    mirror: TableMirror<StaffUser>,
}

impl StaffDirectory {
    pub fn new(store: Arc<dyn TableStore>) -> Self {
        Self {
            store,
            mirror: TableMirror::new(),
        }
    }

    pub async fn load(&mut self) {
        let rows = fetch_rows::<StaffUser>(self.store.as_ref()).await;
        self.mirror.replace_all(rows);
    }

    pub fn apply_event(&mut self, message: &ChangeMessage) {
        self.mirror.apply(message);
    }

    pub fn mirror(&self) -> &TableMirror<StaffUser> {
        &self.mirror
    }

    pub fn users(&self) -> &[StaffUser] {
        self.mirror.rows()
    }

    pub fn find(&self, id: &str) -> Option<&StaffUser> {
        self.mirror.get(id)
    }

    /// Create a user, or update the one with `editing_id`. A name is
    /// required. `last_active` is preserved on edit and starts as
    /// "Never" for new users; the backend maintains it afterwards.
    pub async fn save_user(
        &mut self,
        editing_id: Option<&str>,
        name: &str,
        role: StaffRole,
        active: bool,
        permissions: Permissions,
    ) -> ConsoleResult<StaffUser> {
        if name.trim().is_empty() {
            return Err(ConsoleError::Validation("name is required".to_string()));
        }

        match editing_id {
            Some(id) => {
                let existing = self
                    .mirror
                    .get(id)
                    .ok_or_else(|| ConsoleError::NotFound(format!("user {id}")))?;
                let mut user = existing.clone();
                user.name = name.trim().to_string();
                user.role = role;
                user.permissions = permissions;
                user.active = active;

                self.mirror.begin_write(id);
                self.mirror.upsert(user.clone());

                let patch = StaffUserUpdate {
                    name: Some(user.name.clone()),
                    role: Some(role),
                    permissions: Some(permissions),
                    active: Some(active),
                    ..Default::default()
                };
                match update_row::<StaffUser, _>(self.store.as_ref(), id, &patch).await {
                    Some(echo) => {
                        self.mirror.confirm(id, echo.clone());
                        Ok(echo)
                    }
                    None => {
                        self.mirror.fail(id, "update not confirmed");
                        Ok(user)
                    }
                }
            }
            None => {
                let user = StaffUser {
                    id: util::record_id(),
                    name: name.trim().to_string(),
                    role,
                    permissions,
                    last_active: "Never".to_string(),
                    active,
                };
                let local_key = user.key();

                self.mirror.begin_write(&local_key);
                self.mirror.upsert(user.clone());

                match insert_row(self.store.as_ref(), &user).await {
                    Some(echo) => {
                        let confirmed_key = echo.key();
                        if confirmed_key != local_key {
                            self.mirror.remove(&local_key);
                        }
                        self.mirror.confirm(&confirmed_key, echo.clone());
                        Ok(echo)
                    }
                    None => {
                        self.mirror.fail(&local_key, "insert not confirmed");
                        Ok(user)
                    }
                }
            }
        }
    }

    /// Flip one user's active flag
    pub async fn set_active(&mut self, id: &str, active: bool) {
        if self.mirror.get(id).is_none() {
            return;
        }

        self.mirror.begin_write(id);
        if let Some(user) = self.mirror.get_mut(id) {
            user.active = active;
        }

        let patch = StaffUserUpdate {
            active: Some(active),
            ..Default::default()
        };
        match update_row::<StaffUser, _>(self.store.as_ref(), id, &patch).await {
            Some(echo) => self.mirror.confirm(id, echo),
            None => self.mirror.fail(id, "update not confirmed"),
        }
    }
}
