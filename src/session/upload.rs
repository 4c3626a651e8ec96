//! Batch upload of staged records to the remote inventory

use crate::error::Result;
use crate::services::InventoryService;
use crate::staging::RecordStage;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Per-record upload outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// Part created, stock recorded (or the record carried no quantity)
    Created { part_id: String },
    /// Part created but the dependent stock addition failed
    CreatedNoStock { part_id: String },
    /// Remote creation failed
    Failed { reason: String },
}

impl UploadOutcome {
    /// Creation success, regardless of the stock-addition outcome.
    pub fn created(&self) -> bool {
        !matches!(self, UploadOutcome::Failed { .. })
    }
}

/// One record's entry in the session report.
#[derive(Debug, Clone)]
pub struct UploadItem {
    pub part_code: Option<String>,
    pub outcome: UploadOutcome,
}

/// Upload session report.
#[derive(Debug, Clone)]
pub struct UploadReport {
    pub started_at: DateTime<Utc>,
    pub total: usize,
    pub succeeded: usize,
    pub items: Vec<UploadItem>,
}

/// One bounded upload run: send every staged record, then clear the stage.
pub struct UploadSession<'a, S: ?Sized> {
    inventory: &'a S,
    store: &'a RecordStage,
}

impl<'a, S: InventoryService + ?Sized> UploadSession<'a, S> {
    pub fn new(inventory: &'a S, store: &'a RecordStage) -> Self {
        Self { inventory, store }
    }

    /// Send all staged records in original order.
    ///
    /// Per-record failures are reported, never fatal. The stage is cleared
    /// unconditionally once every record has been processed, so a caller
    /// that needs to retry failures must capture the report.
    pub async fn run(&self) -> Result<UploadReport> {
        let session_id = Uuid::new_v4();
        let started_at = Utc::now();
        let records = self.store.load()?;
        let total = records.len();

        tracing::info!(session_id = %session_id, total = total, "Upload session started");

        let mut items = Vec::with_capacity(total);
        let mut succeeded = 0;

        for (i, record) in records.iter().enumerate() {
            let part_code = record.part_code().map(str::to_string);
            tracing::info!(
                session_id = %session_id,
                part_code = part_code.as_deref().unwrap_or("-"),
                "Sending part {}/{}",
                i + 1,
                total
            );

            let outcome = match self.inventory.create_part(record).await {
                Ok(part_id) => {
                    succeeded += 1;
                    match record.quantity() {
                        Some(qty) => {
                            match self
                                .inventory
                                .add_stock(&part_id, qty, record.unit_price())
                                .await
                            {
                                Ok(()) => UploadOutcome::Created { part_id },
                                Err(e) => {
                                    tracing::warn!(
                                        session_id = %session_id,
                                        part_id = %part_id,
                                        error = %e,
                                        "Part created but stock addition failed"
                                    );
                                    UploadOutcome::CreatedNoStock { part_id }
                                }
                            }
                        }
                        None => UploadOutcome::Created { part_id },
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        session_id = %session_id,
                        part_code = part_code.as_deref().unwrap_or("-"),
                        error = %e,
                        "Part creation failed"
                    );
                    UploadOutcome::Failed {
                        reason: e.to_string(),
                    }
                }
            };

            items.push(UploadItem { part_code, outcome });
        }

        // Cleared regardless of per-item outcome; failed items survive only
        // in the report.
        self.store.clear()?;

        tracing::info!(
            session_id = %session_id,
            total = total,
            succeeded = succeeded,
            "Upload session finished"
        );

        Ok(UploadReport {
            started_at,
            total,
            succeeded,
            items,
        })
    }
}
