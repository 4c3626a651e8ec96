//! Frame-driven QR capture session
//!
//! One session loops over frames from a capture collaborator, deduplicates
//! detections, and on each confirmation keypress parses the earliest pending
//! payload, enriches it from the vendor catalog, and appends it to the record
//! stage. The enrichment call runs inline between frames (accepted tradeoff:
//! simplicity over frame-rate smoothness).

use crate::detection::{DetectionTracker, ScanStatus};
use crate::error::Result;
use crate::parser::parse_payload;
use crate::services::VendorCatalog;
use crate::staging::RecordStage;
use uuid::Uuid;

/// One decoded QR code within a frame.
#[derive(Debug, Clone)]
pub struct Detection {
    /// Decoded text payload
    pub payload: String,
    /// Boundary polygon in frame coordinates, for overlay rendering
    pub outline: Vec<(i32, i32)>,
}

impl Detection {
    pub fn new(payload: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
            outline: Vec::new(),
        }
    }
}

/// Key events the capture surface reports per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanKey {
    /// Confirm the earliest pending payload
    Confirm,
    /// End the session
    Quit,
}

/// Everything one frame tick produced.
#[derive(Debug, Clone, Default)]
pub struct FrameScan {
    pub detections: Vec<Detection>,
    pub key: Option<ScanKey>,
}

/// Camera + QR decoder + display surface, collapsed to the one seam the
/// session needs. `next_frame` acquires a frame, renders the current status
/// and any detection outlines, polls for a key, and returns the decoded
/// payloads. `Ok(None)` means the source is exhausted and the session ends
/// cleanly, the same as a quit key.
pub trait QrCapture {
    fn next_frame(&mut self, status: ScanStatus) -> Result<Option<FrameScan>>;
}

impl<T: QrCapture + ?Sized> QrCapture for &mut T {
    fn next_frame(&mut self, status: ScanStatus) -> Result<Option<FrameScan>> {
        (**self).next_frame(status)
    }
}

/// Summary of one capture session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOutcome {
    /// Frames processed
    pub frames: u64,
    /// Payloads confirmed, enriched, and staged
    pub confirmed: usize,
    /// Confirmed payloads dropped because they did not parse
    pub rejected: usize,
}

/// One bounded capture run against a capture surface, vendor catalog, and
/// record stage.
pub struct ScanSession<'a, C, V: ?Sized> {
    capture: C,
    vendor: &'a V,
    store: &'a RecordStage,
    tracker: DetectionTracker,
}

impl<'a, C, V> ScanSession<'a, C, V>
where
    C: QrCapture,
    V: VendorCatalog + ?Sized,
{
    pub fn new(capture: C, vendor: &'a V, store: &'a RecordStage) -> Self {
        Self {
            capture,
            vendor,
            store,
            tracker: DetectionTracker::new(),
        }
    }

    /// Run the session to completion (quit key or exhausted frame source).
    pub async fn run(mut self) -> Result<ScanOutcome> {
        let session_id = Uuid::new_v4();
        tracing::info!(session_id = %session_id, "Scan session started");

        let mut outcome = ScanOutcome::default();

        loop {
            let Some(frame) = self.capture.next_frame(self.tracker.status())? else {
                tracing::info!(session_id = %session_id, "Frame source ended");
                break;
            };
            outcome.frames += 1;

            self.tracker
                .observe(frame.detections.iter().map(|d| d.payload.as_str()));

            match frame.key {
                Some(ScanKey::Quit) => {
                    tracing::info!(session_id = %session_id, "Quit requested");
                    break;
                }
                Some(ScanKey::Confirm) => {
                    if let Some(raw) = self.tracker.take_next_pending() {
                        if self.confirm(&raw).await? {
                            self.tracker.mark_finalized(raw);
                            outcome.confirmed += 1;
                        } else {
                            outcome.rejected += 1;
                        }
                    }
                }
                None => {}
            }
        }

        tracing::info!(
            session_id = %session_id,
            frames = outcome.frames,
            confirmed = outcome.confirmed,
            rejected = outcome.rejected,
            "Scan session finished"
        );
        Ok(outcome)
    }

    /// Parse, enrich, and stage one confirmed payload.
    ///
    /// Returns whether the payload produced a staged record. Enrichment
    /// failures degrade to the parsed fields alone; only staging I/O errors
    /// propagate.
    async fn confirm(&mut self, raw: &str) -> Result<bool> {
        let Some(mut record) = parse_payload(raw) else {
            tracing::warn!(payload = %raw, "Confirmed payload did not parse, dropping");
            return Ok(false);
        };

        // part_code is guaranteed present by the parser
        let part_code = record.part_code().unwrap_or_default().to_string();
        let info = self.vendor.fetch_part_info(&part_code).await;
        info.apply_to(&mut record);

        self.store.append(record)?;
        tracing::info!(part_code = %part_code, "Record enriched and staged");
        Ok(true)
    }
}
