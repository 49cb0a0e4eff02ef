use anyhow::{Context, Result};
use serde::{Serialize, de::DeserializeOwned};
use std::fs;
use std::path::{Path, PathBuf};

/// One persisted value slot, stored as a JSON file.
///
/// Writes go to a sibling temp file first and land via rename, so a slot
/// is never left half-written. A failed write surfaces to the caller;
/// callers commit in-memory state only after the write succeeds.
pub struct SlotFile {
    path: PathBuf,
}

impl SlotFile {
    pub fn new(dir: &Path, name: &str) -> Self {
        Self {
            path: dir.join(name),
        }
    }

    /// Reads the slot. A missing file means the slot was never set.
    pub fn load<T: DeserializeOwned>(&self) -> Result<Option<T>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("reading {}", self.path.display()))?;
        let value = serde_json::from_str(&raw)
            .with_context(|| format!("decoding {}", self.path.display()))?;
        Ok(Some(value))
    }

    /// Synchronously persists the full value.
    pub fn store<T: Serialize>(&self, value: &T) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let raw = serde_json::to_string_pretty(value).context("encoding slot value")?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, raw).with_context(|| format!("writing {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("replacing {}", self.path.display()))?;
        Ok(())
    }
}
