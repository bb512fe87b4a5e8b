//! Assessment billing ledger
//!
//! Same workflow as the duty screen with one addition: a single
//! batch-level discount, distributed proportionally across the queue
//! at commit time.

use std::sync::Arc;

use clearhouse_client::{TableStore, delete_row, fetch_rows, insert_row, update_row};
use shared::models::{AssessmentDraft, AssessmentRecord, AssessmentRecordUpdate, Client, RecordStatus};
use shared::{ChangeMessage, Entity, util};

use crate::billing::{BatchQueue, Draft, allocate_discount};
use crate::filter::RecordFilter;
use crate::ops::duty::BatchHeader;
use crate::state::TableMirror;
use crate::stats::{self, AssessmentSummary};

pub struct AssessmentLedger {
    store: Arc<dyn TableStore>,
    mirror: TableMirror<AssessmentRecord>,
    queue: BatchQueue<AssessmentDraft>,
    header: BatchHeader,
    batch_discount: f64,
    pub filter: RecordFilter,
    selection: Vec<String>,
}

impl AssessmentLedger {
    pub fn new(store: Arc<dyn TableStore>) -> Self {
        Self {
            store,
            mirror: TableMirror::new(),
            queue: BatchQueue::new(),
            header: BatchHeader::default(),
            batch_discount: 0.0,
            filter: RecordFilter::default(),
            selection: Vec::new(),
        }
    }

    pub async fn load(&mut self) {
        let rows = fetch_rows::<AssessmentRecord>(self.store.as_ref()).await;
        self.mirror.replace_all(rows);
    }

    pub fn apply_event(&mut self, message: &ChangeMessage) {
        self.mirror.apply(message);
    }

    pub fn mirror(&self) -> &TableMirror<AssessmentRecord> {
        &self.mirror
    }

    pub fn records(&self) -> &[AssessmentRecord] {
        self.mirror.rows()
    }

    pub fn visible(&self) -> Vec<&AssessmentRecord> {
        self.filter.visible(self.mirror.rows())
    }

    pub fn summary(&self) -> AssessmentSummary {
        stats::assessment_summary(&self.visible())
    }

    // ========== Entry batch ==========

    pub fn header(&self) -> &BatchHeader {
        &self.header
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

    /// One discount for the whole batch, applied only at commit
    pub fn set_batch_discount(&mut self, discount: f64) {
        self.batch_discount = if discount.is_finite() { discount } else { 0.0 };
    }

    pub fn batch_discount(&self) -> f64 {
        self.batch_discount
    }

    /// Queue a bill of `nos_of_be` filings at `rate` per unit. Needs a
    /// client AIN and a unit count; rejected silently otherwise.
    pub fn add_entry(&mut self, nos_of_be: u32, rate: f64) -> bool {
        if self.header.ain.is_empty() {
            return false;
        }
        self.queue.add(AssessmentDraft::new(nos_of_be, rate))
    }

    pub fn remove_entry(&mut self, draft_id: i64) -> bool {
        self.queue.remove(draft_id)
    }

    pub fn queue(&self) -> &[AssessmentDraft] {
        self.queue.items()
    }

    pub fn queue_subtotal(&self) -> f64 {
        self.queue.subtotal()
    }

    /// Net payable shown alongside the queue (never below zero)
    pub fn queue_net_total(&self) -> f64 {
        (self.queue.subtotal() - self.batch_discount).max(0.0)
    }

    /// Persist the queued batch. The batch discount is distributed
    /// proportionally by each item's share of the subtotal; each
    /// record's net is amount minus its share, and profit starts as
    /// the net. Clears the queue, header, and discount afterwards.
    pub async fn commit_batch(&mut self) -> Vec<String> {
        if self.queue.is_empty() {
            return Vec::new();
        }

        let drafts: Vec<AssessmentDraft> = self.queue.items().to_vec();
        let amounts: Vec<f64> = drafts.iter().map(Draft::amount).collect();
        let shares = allocate_discount(&amounts, self.batch_discount);
        let mut committed = Vec::with_capacity(drafts.len());

        for (draft, share) in drafts.iter().zip(shares) {
            let record = AssessmentRecord {
                id: util::record_id(),
                date: util::today(),
                ain: self.header.ain.clone(),
                client_name: self.header.client_name.clone(),
                phone: self.header.phone.clone(),
                nos_of_be: draft.nos_of_be,
                rate: draft.rate,
                amount: draft.amount,
                discount: share.discount,
                net: share.net,
                received: 0.0,
                status: RecordStatus::New,
                profit: share.net,
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

        tracing::info!(
            count = committed.len(),
            discount = self.batch_discount,
            ain = %self.header.ain,
            "Assessment batch posted"
        );
        self.queue.clear();
        self.header = BatchHeader::default();
        self.batch_discount = 0.0;
        committed
    }

    // ========== Settlement and status ==========

    /// Split one received amount evenly across the targeted records
    /// and mark them Paid. Assessment profit is fixed at commit and is
    /// not rewritten here.
    pub async fn settle(&mut self, ids: &[String], received_amount: f64, method: &str) {
        if ids.is_empty() || !received_amount.is_finite() {
            return;
        }
        let split = received_amount / ids.len() as f64;

        for id in ids {
            if self.mirror.get(id).is_none() {
                continue;
            }
            let patch = AssessmentRecordUpdate {
                status: Some(RecordStatus::Paid),
                received: Some(split),
                payment_method: Some(method.to_string()),
                ..Default::default()
            };
            self.apply_patch(id, patch).await;
        }

        self.selection.clear();
    }

    pub async fn set_status(&mut self, ids: &[String], status: RecordStatus) {
        for id in ids {
            if self.mirror.get(id).is_none() {
                continue;
            }
            let patch = AssessmentRecordUpdate {
                status: Some(status),
                ..Default::default()
            };
            self.apply_patch(id, patch).await;
        }
    }

    /// Edit path: rewrite the client snapshot and the billing figures.
    /// Amount and net are rederived so `net = amount - discount` holds
    /// at persistence time.
    pub async fn edit_entry(
        &mut self,
        id: &str,
        ain: &str,
        client_name: &str,
        phone: &str,
        nos_of_be: u32,
        rate: f64,
        discount: f64,
    ) {
        if self.mirror.get(id).is_none() {
            return;
        }
        let amount = f64::from(nos_of_be) * rate;
        let patch = AssessmentRecordUpdate {
            ain: Some(ain.to_string()),
            client_name: Some(client_name.to_string()),
            phone: Some(phone.to_string()),
            nos_of_be: Some(nos_of_be),
            rate: Some(rate),
            amount: Some(amount),
            discount: Some(discount),
            net: Some(amount - discount),
            ..Default::default()
        };
        self.apply_patch(id, patch).await;
    }

    async fn apply_patch(&mut self, id: &str, patch: AssessmentRecordUpdate) {
        self.mirror.begin_write(id);
        if let Some(record) = self.mirror.get_mut(id) {
            record.apply(&patch);
        }

        match update_row::<AssessmentRecord, _>(self.store.as_ref(), id, &patch).await {
            Some(echo) => self.mirror.confirm(id, echo),
            None => self.mirror.fail(id, "update not confirmed"),
        }
    }

    // ========== Delete ==========

    pub async fn delete(&mut self, ids: &[String]) -> Vec<String> {
        let mut rejected = Vec::new();

        for id in ids {
            let Some(removed) = self.mirror.remove(id) else {
                continue;
            };
            self.selection.retain(|selected| selected != id);

            if delete_row::<AssessmentRecord>(self.store.as_ref(), id).await.is_none() {
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

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }
}
