//! Duty payment ledger
//!
//! The duty screen's state: the table mirror, the entry batch, the
//! active filter, and the row selection bulk actions operate on.

use std::sync::Arc;

use clearhouse_client::{TableStore, delete_row, fetch_rows, insert_row, update_row};
use shared::models::{
    Client, DutyDraft, DutyRecord, DutyRecordUpdate, RecordStatus, normalize_be_number,
};
use shared::{ChangeMessage, Entity, util};

use crate::billing::BatchQueue;
use crate::filter::RecordFilter;
use crate::state::TableMirror;
use crate::stats::{self, DutySummary};

/// Client fields entered once and stamped on every record of a batch
#[derive(Debug, Clone, Default)]
pub struct BatchHeader {
    pub ain: String,
    pub client_name: String,
    pub phone: String,
}

pub struct DutyLedger {
    store: Arc<dyn TableStore>,
    mirror: TableMirror<DutyRecord>,
    queue: BatchQueue<DutyDraft>,
    header: BatchHeader,
    pub filter: RecordFilter,
    selection: Vec<String>,
}

impl DutyLedger {
    pub fn new(store: Arc<dyn TableStore>) -> Self {
        Self {
            store,
            mirror: TableMirror::new(),
            queue: BatchQueue::new(),
            header: BatchHeader::default(),
            filter: RecordFilter::default(),
            selection: Vec::new(),
        }
    }

    /// Initial fetch; read failures leave the ledger empty
    pub async fn load(&mut self) {
        let rows = fetch_rows::<DutyRecord>(self.store.as_ref()).await;
        self.mirror.replace_all(rows);
    }

    /// Fold a change notification into the mirror
    pub fn apply_event(&mut self, message: &ChangeMessage) {
        self.mirror.apply(message);
    }

    pub fn mirror(&self) -> &TableMirror<DutyRecord> {
        &self.mirror
    }

    pub fn records(&self) -> &[DutyRecord] {
        self.mirror.rows()
    }

    /// Rows passing the active filter
    pub fn visible(&self) -> Vec<&DutyRecord> {
        self.filter.visible(self.mirror.rows())
    }

    pub fn summary(&self) -> DutySummary {
        stats::duty_summary(&self.visible())
    }

    // ========== Entry batch ==========

    pub fn header(&self) -> &BatchHeader {
        &self.header
    }

    /// Typing an AIN fills the name/phone snapshot when it matches a
    /// registered client, and clears it otherwise.
    pub fn fill_header(&mut self, ain: &str, clients: &[Client]) {
        self.header.ain = ain.to_string();
        match clients.iter().find(|c| c.ain == ain) {
            Some(client) => {
                self.header.client_name = client.name.clone();
                self.header.phone = client.phone.clone();
            }
            None => {
                self.header.client_name.clear();
                self.header.phone.clear();
            }
        }
    }

    pub fn set_header(
        &mut self,
        ain: impl Into<String>,
        client_name: impl Into<String>,
        phone: impl Into<String>,
    ) {
        self.header = BatchHeader {
            ain: ain.into(),
            client_name: client_name.into(),
            phone: phone.into(),
        };
    }

    /// Queue a draft. Incomplete entries are dropped silently.
    pub fn add_entry(&mut self, be_number: &str, year: &str, duty: f64) -> bool {
        self.queue.add(DutyDraft::new(be_number, year, duty))
    }

    pub fn remove_entry(&mut self, draft_id: i64) -> bool {
        self.queue.remove(draft_id)
    }

    pub fn queue(&self) -> &[DutyDraft] {
        self.queue.items()
    }

    pub fn queue_subtotal(&self) -> f64 {
        self.queue.subtotal()
    }

    /// Persist the queued batch, one insert per item.
    ///
    /// Every record lands in the mirror either confirmed (server echo)
    /// or marked Failed; the queue and header clear afterwards. An
    /// empty queue is a no-op. Returns the keys now in the mirror.
    pub async fn commit_batch(&mut self) -> Vec<String> {
        if self.queue.is_empty() {
            return Vec::new();
        }

        let drafts: Vec<DutyDraft> = self.queue.items().to_vec();
        let mut committed = Vec::with_capacity(drafts.len());

        for draft in drafts {
            let record = DutyRecord {
                id: util::record_id(),
                date: util::today(),
                ain: self.header.ain.clone(),
                client_name: self.header.client_name.clone(),
                phone: self.header.phone.clone(),
                be_year: draft.be_reference(),
                duty: draft.duty,
                received: 0.0,
                status: RecordStatus::New,
                profit: 0.0,
                payment_method: None,
            };
            let local_key = record.key();

            self.mirror.begin_write(&local_key);
            self.mirror.upsert(record.clone());

            match insert_row(self.store.as_ref(), &record).await {
                Some(echo) => {
                    let confirmed_key = echo.key();
                    if confirmed_key != local_key {
                        self.mirror.remove(&local_key);
                    }
                    self.mirror.confirm(&confirmed_key, echo);
                    committed.push(confirmed_key);
                }
                None => {
                    self.mirror.fail(&local_key, "insert not confirmed");
                    committed.push(local_key);
                }
            }
        }

        tracing::info!(count = committed.len(), ain = %self.header.ain, "Duty batch posted");
        self.queue.clear();
        self.header = BatchHeader::default();
        committed
    }

    // ========== Settlement and status ==========

    /// Split one received amount evenly across the targeted records
    /// and mark them Paid. A non-finite amount or empty target set is
    /// a no-op.
    pub async fn settle(&mut self, ids: &[String], received_amount: f64, method: &str) {
        if ids.is_empty() || !received_amount.is_finite() {
            return;
        }
        let split = received_amount / ids.len() as f64;

        for id in ids {
            let Some(record) = self.mirror.get(id).cloned() else {
                continue;
            };
            let patch = DutyRecordUpdate {
                status: Some(RecordStatus::Paid),
                received: Some(split),
                profit: Some(split - record.duty),
                payment_method: Some(method.to_string()),
                ..Default::default()
            };
            self.apply_patch(id, patch).await;
        }

        self.selection.clear();
    }

    /// Workflow status change (Completed / Pending)
    pub async fn set_status(&mut self, ids: &[String], status: RecordStatus) {
        for id in ids {
            if self.mirror.get(id).is_none() {
                continue;
            }
            let patch = DutyRecordUpdate {
                status: Some(status),
                ..Default::default()
            };
            self.apply_patch(id, patch).await;
        }
    }

    /// Edit path: rewrite the client snapshot, B/E reference, and duty
    /// of an existing record.
    pub async fn edit_entry(
        &mut self,
        id: &str,
        ain: &str,
        client_name: &str,
        phone: &str,
        be_number: &str,
        year: &str,
        duty: f64,
    ) {
        if self.mirror.get(id).is_none() {
            return;
        }
        let patch = DutyRecordUpdate {
            ain: Some(ain.to_string()),
            client_name: Some(client_name.to_string()),
            phone: Some(phone.to_string()),
            be_year: Some(format!("{}({})", normalize_be_number(be_number), year)),
            duty: Some(duty),
            ..Default::default()
        };
        self.apply_patch(id, patch).await;
    }

    /// Apply a patch locally, then reconcile with the store
    async fn apply_patch(&mut self, id: &str, patch: DutyRecordUpdate) {
        self.mirror.begin_write(id);
        if let Some(record) = self.mirror.get_mut(id) {
            record.apply(&patch);
        }

        match update_row::<DutyRecord, _>(self.store.as_ref(), id, &patch).await {
            Some(echo) => self.mirror.confirm(id, echo),
            None => self.mirror.fail(id, "update not confirmed"),
        }
    }

    // ========== Delete ==========

    /// Remove records optimistically; identifiers the store rejects
    /// are rolled back into view and returned.
    pub async fn delete(&mut self, ids: &[String]) -> Vec<String> {
        let mut rejected = Vec::new();

        for id in ids {
            let Some(removed) = self.mirror.remove(id) else {
                continue;
            };
            self.selection.retain(|selected| selected != id);

            if delete_row::<DutyRecord>(self.store.as_ref(), id).await.is_none() {
                self.mirror.upsert(removed);
                rejected.push(id.clone());
            }
        }

        rejected
    }

    // ========== Selection ==========

    pub fn selected(&self) -> &[String] {
        &self.selection
    }

    pub fn toggle_select(&mut self, id: &str) {
        if let Some(pos) = self.selection.iter().position(|s| s == id) {
            self.selection.remove(pos);
        } else {
            self.selection.push(id.to_string());
        }
    }

    /// Select every visible row, or clear when all are selected
    pub fn toggle_select_all(&mut self) {
        let visible: Vec<String> = self.visible().iter().map(|r| r.id.clone()).collect();
        if self.selection.len() == visible.len() && !visible.is_empty() {
            self.selection.clear();
        } else {
            self.selection = visible;
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }
}
