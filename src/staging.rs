//! Durable staging between scan, upload, and sync sessions
//!
//! Each stage is a JSON array in one UTF-8 file, rewritten whole on every
//! mutation. Writes go to a sibling temp file first and land via rename, so
//! a crash mid-write never leaves a half-written array behind. The system is
//! single-process by design; no file locking.

use crate::error::Result;
use crate::types::PartRecord;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

/// Staged enriched records awaiting upload.
pub type RecordStage = Stage<PartRecord>;

/// Staged remote identifiers awaiting deletion.
pub type IdentifierStage = Stage<String>;

/// A JSON-file-backed ordered sequence.
#[derive(Debug, Clone)]
pub struct Stage<T> {
    path: PathBuf,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Serialize + DeserializeOwned> Stage<T> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the full staged sequence.
    ///
    /// A missing file is an empty stage. A corrupt file is logged and
    /// treated as empty rather than poisoning every later session.
    pub fn load(&self) -> Result<Vec<T>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let raw = std::fs::read_to_string(&self.path)?;
        match serde_json::from_str(&raw) {
            Ok(items) => Ok(items),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Staging file is corrupt, reinitializing as empty"
                );
                Ok(Vec::new())
            }
        }
    }

    /// Load, push, persist. Whole-sequence rewrite, not an append-only log.
    pub fn append(&self, item: T) -> Result<()> {
        let mut items = self.load()?;
        items.push(item);
        self.save(&items)
    }

    /// Overwrite the staged sequence with `items`.
    pub fn replace(&self, items: &[T]) -> Result<()> {
        self.save(items)
    }

    /// Reset the stage to an empty persisted sequence.
    pub fn clear(&self) -> Result<()> {
        self.save(&[])
    }

    /// Load the staged sequence and leave the stage empty.
    pub fn drain(&self) -> Result<Vec<T>> {
        let items = self.load()?;
        self.clear()?;
        Ok(items)
    }

    /// Atomic whole-file replace: serialize to a temp sibling, then rename.
    fn save(&self, items: &[T]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(items)?;

        let mut tmp = self.path.clone();
        tmp.as_mut_os_string().push(".tmp");
        std::fs::write(&tmp, json.as_bytes())?;
        std::fs::rename(&tmp, &self.path)?;

        tracing::debug!(
            path = %self.path.display(),
            count = items.len(),
            "Staging file rewritten"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_payload;
    use tempfile::TempDir;

    fn record(pc: &str) -> PartRecord {
        parse_payload(&format!("{{pc:{}}}", pc)).unwrap()
    }

    fn stage_in(dir: &TempDir) -> RecordStage {
        RecordStage::new(dir.path().join("staged_parts.json"))
    }

    #[test]
    fn missing_file_loads_as_empty() {
        let dir = TempDir::new().unwrap();
        assert!(stage_in(&dir).load().unwrap().is_empty());
    }

    #[test]
    fn append_then_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let stage = stage_in(&dir);

        stage.append(record("C1")).unwrap();
        stage.append(record("C2")).unwrap();

        let items = stage.load().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items.last().unwrap().part_code(), Some("C2"));
    }

    #[test]
    fn drain_returns_contents_and_empties_store() {
        let dir = TempDir::new().unwrap();
        let stage = stage_in(&dir);
        stage.append(record("C1")).unwrap();

        let drained = stage.drain().unwrap();
        assert_eq!(drained.len(), 1);
        assert!(stage.load().unwrap().is_empty());
    }

    #[test]
    fn corrupt_file_reinitializes_as_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("staged_parts.json");
        std::fs::write(&path, "{not json").unwrap();

        let stage = RecordStage::new(&path);
        assert!(stage.load().unwrap().is_empty());

        // and the stage is usable afterwards
        stage.append(record("C1")).unwrap();
        assert_eq!(stage.load().unwrap().len(), 1);
    }

    #[test]
    fn persisted_form_is_an_indented_json_array() {
        let dir = TempDir::new().unwrap();
        let stage = stage_in(&dir);
        stage.append(record("C1")).unwrap();

        let raw = std::fs::read_to_string(stage.path()).unwrap();
        assert!(raw.starts_with('['));
        assert!(raw.contains("\n  "));
    }

    #[test]
    fn identifier_stage_replace_and_clear() {
        let dir = TempDir::new().unwrap();
        let stage = IdentifierStage::new(dir.path().join("staged_ids.json"));

        stage
            .replace(&["id1".to_string(), "id2".to_string()])
            .unwrap();
        assert_eq!(stage.load().unwrap(), vec!["id1", "id2"]);

        stage.clear().unwrap();
        assert!(stage.load().unwrap().is_empty());
    }
}
