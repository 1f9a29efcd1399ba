//! Generated palette history
//!
//! Every generated or image-matched palette is appended here. Writes are
//! best effort: callers log failures and carry on.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// A stored palette
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteRecord {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    /// JSON-encoded array of hex strings
    pub colors: String,
    #[serde(default)]
    pub style: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    /// Unix timestamp (seconds)
    pub created_at: u64,
}

impl PaletteRecord {
    /// Decode the stored hex list.
    pub fn hex_colors(&self) -> Result<Vec<String>> {
        serde_json::from_str(&self.colors)
            .with_context(|| format!("Palette {} has malformed colors", self.id))
    }
}

/// A palette about to be appended
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPalette {
    pub name: String,
    pub colors: Vec<String>,
    pub style: Option<String>,
    pub source: String,
    pub user_id: Option<String>,
}

pub trait PaletteStore: Send + Sync {
    /// Store a palette and return its id.
    fn append(&self, palette: NewPalette) -> Result<u64>;

    /// Most recent palettes, newest first.
    fn recent(&self, limit: usize) -> Result<Vec<PaletteRecord>>;
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct HistoryData {
    next_id: u64,
    records: Vec<PaletteRecord>,
}

/// Palette history persisted to a JSON file. Every call reads the file
/// fresh; nothing is cached between calls.
///
/// Writes go through a temp file and a rename, so readers never see a
/// torn file. Appends are read-modify-write without a lock: two processes
/// appending at the same moment can drop one record.
pub struct JsonPaletteHistory {
    path: PathBuf,
    max_records: usize,
}

impl JsonPaletteHistory {
    pub fn new(path: impl Into<PathBuf>, max_records: usize) -> Self {
        Self {
            path: path.into(),
            max_records: max_records.max(1),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<HistoryData> {
        if !self.path.exists() {
            return Ok(HistoryData::default());
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read palette history: {}", self.path.display()))?;
        serde_json::from_str(&content).context("Failed to parse palette history")
    }

    fn write(&self, data: &HistoryData) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(data)?;
        let temp_path = self
            .path
            .with_extension(format!("json.{}.tmp", std::process::id()));
        std::fs::write(&temp_path, content)
            .with_context(|| format!("Failed to write palette history: {}", temp_path.display()))?;
        std::fs::rename(&temp_path, &self.path).with_context(|| {
            format!("Failed to replace palette history: {}", self.path.display())
        })?;
        Ok(())
    }

    /// Remove all stored palettes.
    pub fn clear(&self) -> Result<()> {
        let mut data = self.read()?;
        data.records.clear();
        self.write(&data)
    }
}

impl PaletteStore for JsonPaletteHistory {
    fn append(&self, palette: NewPalette) -> Result<u64> {
        let mut data = self.read()?;

        let id = data
            .next_id
            .max(data.records.iter().map(|r| r.id).max().unwrap_or(0))
            + 1;
        let created_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        data.records.push(PaletteRecord {
            id,
            name: Some(palette.name),
            colors: serde_json::to_string(&palette.colors)?,
            style: palette.style,
            source: Some(palette.source),
            user_id: palette.user_id,
            created_at,
        });
        data.next_id = id;

        // Prune oldest
        if data.records.len() > self.max_records {
            let to_remove = data.records.len() - self.max_records;
            data.records.drain(0..to_remove);
        }

        self.write(&data)?;
        Ok(id)
    }

    fn recent(&self, limit: usize) -> Result<Vec<PaletteRecord>> {
        let data = self.read()?;
        Ok(data.records.into_iter().rev().take(limit).collect())
    }
}
