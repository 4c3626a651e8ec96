//! Per-session QR detection deduplication
//!
//! Tracks which payloads have been finalized (already staged this session)
//! and which are pending user confirmation, so each physical code is
//! processed at most once per session. State is in-memory only and is
//! discarded when the session ends.

use std::collections::{HashSet, VecDeque};

/// User-facing scan status derived from the pending partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanStatus {
    /// No payload awaiting confirmation
    Idle,
    /// At least one decoded payload awaits a confirmation keypress
    AwaitingConfirmation,
}

/// Session detection state: finalized set plus a FIFO pending ordered-set.
///
/// Invariants: finalized and pending are disjoint; a payload appears in the
/// pending queue at most once, in first-seen order.
#[derive(Debug, Default)]
pub struct DetectionTracker {
    finalized: HashSet<String>,
    pending: VecDeque<String>,
    pending_index: HashSet<String>,
}

impl DetectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one frame's decoded payloads.
    ///
    /// Payloads already finalized are ignored; payloads already pending keep
    /// their original queue position. Blank payloads are dropped.
    pub fn observe<I>(&mut self, payloads: I)
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        for payload in payloads {
            let payload = payload.as_ref().trim();
            if payload.is_empty()
                || self.finalized.contains(payload)
                || self.pending_index.contains(payload)
            {
                continue;
            }
            self.pending.push_back(payload.to_string());
            self.pending_index.insert(payload.to_string());
        }
    }

    pub fn status(&self) -> ScanStatus {
        if self.pending.is_empty() {
            ScanStatus::Idle
        } else {
            ScanStatus::AwaitingConfirmation
        }
    }

    /// Remove and return the earliest-inserted pending payload.
    ///
    /// Removal is unconditional: whether or not the caller goes on to stage
    /// the payload, it leaves the pending partition. Only a later
    /// [`mark_finalized`](Self::mark_finalized) prevents a rescan from
    /// re-adding it.
    pub fn take_next_pending(&mut self) -> Option<String> {
        let payload = self.pending.pop_front()?;
        self.pending_index.remove(&payload);
        Some(payload)
    }

    /// Record a payload as confirmed and staged for the rest of the session.
    pub fn mark_finalized(&mut self, payload: String) {
        debug_assert!(!self.pending_index.contains(payload.as_str()));
        self.finalized.insert(payload);
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn finalized_count(&self) -> usize {
        self.finalized.len()
    }
}
