use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;

use common::Result;

/// State that survives a restart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Symbols whose analysis was active when the snapshot was taken.
    pub active_symbols: Vec<String>,
}

/// JSON snapshot file with atomic writes (temp file + rename), so a crash
/// mid-save can never leave a truncated snapshot behind.
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn save(&self, snapshot: &Snapshot) -> Result<()> {
        let json = serde_json::to_string_pretty(snapshot)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), symbols = snapshot.active_symbols.len(), "Snapshot saved");
        Ok(())
    }

    /// Load the last snapshot. A missing file is a fresh start, not an error.
    pub fn load(&self) -> Result<Option<Snapshot>> {
        let json = match std::fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let snapshot = serde_json::from_str(&json)?;
        Ok(Some(snapshot))
    }
}
