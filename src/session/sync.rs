//! Remote inventory sync: list part ids into staging, delete on confirmation

use crate::error::Result;
use crate::services::InventoryService;
use crate::staging::IdentifierStage;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Deletion report: remote status category per identifier, verbatim.
#[derive(Debug, Clone)]
pub struct DeleteReport {
    pub started_at: DateTime<Utc>,
    pub total: usize,
    pub items: Vec<(String, String)>,
}

/// Listing and bulk-deletion sessions over the identifier stage.
pub struct SyncSession<'a, S: ?Sized> {
    inventory: &'a S,
    ids: &'a IdentifierStage,
}

impl<'a, S: InventoryService + ?Sized> SyncSession<'a, S> {
    pub fn new(inventory: &'a S, ids: &'a IdentifierStage) -> Self {
        Self { inventory, ids }
    }

    /// List all remote part ids, persist them to the identifier stage, and
    /// return them.
    pub async fn list_remote(&self) -> Result<Vec<String>> {
        let part_ids = self.inventory.list_parts().await?;
        self.ids.replace(&part_ids)?;
        tracing::info!(count = part_ids.len(), "Remote part ids staged");
        Ok(part_ids)
    }

    /// Delete every staged identifier.
    ///
    /// A no-op unless `confirmed` is true: no remote calls, stage untouched.
    /// When confirmed, each deletion's remote status string is recorded and a
    /// transport failure is folded into the per-item status rather than
    /// aborting the batch; the stage is cleared unconditionally afterwards.
    pub async fn delete_all(&self, confirmed: bool) -> Result<DeleteReport> {
        let started_at = Utc::now();
        if !confirmed {
            tracing::info!("Deletion not confirmed, nothing done");
            return Ok(DeleteReport {
                started_at,
                total: 0,
                items: Vec::new(),
            });
        }

        let session_id = Uuid::new_v4();
        let part_ids = self.ids.load()?;
        let total = part_ids.len();
        tracing::info!(session_id = %session_id, total = total, "Delete session started");

        let mut items = Vec::with_capacity(total);
        for part_id in part_ids {
            let status = match self.inventory.delete_part(&part_id).await {
                Ok(status) => status,
                Err(e) => format!("error: {}", e),
            };
            tracing::info!(session_id = %session_id, part_id = %part_id, status = %status, "Deleted part");
            items.push((part_id, status));
        }

        self.ids.clear()?;

        tracing::info!(session_id = %session_id, total = total, "Delete session finished");
        Ok(DeleteReport {
            started_at,
            total,
            items,
        })
    }
}
