//! Marker color catalog
//!
//! The catalog is the read-only set of brand colors that palettes are
//! matched against. Operations receive it through the [`CatalogStore`]
//! trait; [`JsonCatalog`] keeps it in a JSON file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A single named, coded marker color
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogColor {
    pub id: u64,
    pub brand: String,
    pub code: String,
    pub name: String,
    /// `#rrggbb` (the `#` is optional in imported data)
    pub hex: String,
    #[serde(default)]
    pub set_name: String,
}

/// Read access to the catalog.
///
/// Result order is the store's insertion order unless stated otherwise.
pub trait CatalogStore {
    /// Colors of one brand/set.
    fn by_set(&self, brand: &str, set_name: &str) -> Result<Vec<CatalogColor>>;

    /// Colors of one brand/set sorted by code.
    fn by_set_ordered(&self, brand: &str, set_name: &str) -> Result<Vec<CatalogColor>> {
        let mut colors = self.by_set(brand, set_name)?;
        sort_by_code(&mut colors);
        Ok(colors)
    }

    /// Colors of one brand across all its sets.
    fn by_brand(&self, brand: &str) -> Result<Vec<CatalogColor>>;

    fn find(&self, brand: &str, code: &str) -> Result<Option<CatalogColor>>;

    fn find_in_set(&self, brand: &str, set_name: &str, code: &str)
        -> Result<Option<CatalogColor>>;

    /// Colors of every brand except `brand`.
    fn excluding_brand(&self, brand: &str) -> Result<Vec<CatalogColor>>;

    /// Distinct brand names, sorted.
    fn brands(&self) -> Result<Vec<String>>;
}

/// Byte-wise code order, matching a database `ORDER BY code`.
pub fn sort_by_code(colors: &mut [CatalogColor]) {
    colors.sort_by(|a, b| a.code.cmp(&b.code));
}

/// Record shape accepted by [`JsonCatalog::import`]; ids are assigned on import.
#[derive(Debug, Clone, Deserialize)]
pub struct ImportRecord {
    pub brand: String,
    pub code: String,
    pub name: String,
    pub hex: String,
    #[serde(default)]
    pub set_name: String,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportStats {
    pub added: usize,
    pub replaced: usize,
    pub files: usize,
}

/// Catalog kept in memory and persisted as a JSON array
#[derive(Debug, Clone, Default)]
pub struct JsonCatalog {
    colors: Vec<CatalogColor>,
    path: Option<PathBuf>,
}

impl JsonCatalog {
    pub fn from_colors(colors: Vec<CatalogColor>) -> Self {
        Self { colors, path: None }
    }

    /// Load the catalog at `path`; a missing file is an empty catalog.
    pub fn load(path: &Path) -> Result<Self> {
        let colors = if path.exists() {
            let data = fs::read_to_string(path)
                .with_context(|| format!("Failed to read catalog: {}", path.display()))?;
            serde_json::from_str(&data)
                .with_context(|| format!("Failed to parse catalog: {}", path.display()))?
        } else {
            tracing::debug!(path = %path.display(), "catalog file missing, starting empty");
            Vec::new()
        };

        Ok(Self {
            colors,
            path: Some(path.to_path_buf()),
        })
    }

    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            anyhow::bail!("Catalog has no backing file");
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let data = serde_json::to_string_pretty(&self.colors)?;
        fs::write(path, data)
            .with_context(|| format!("Failed to write catalog: {}", path.display()))?;

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Merge records from a JSON file, or from every `.json` file below a
    /// directory. A record with an existing `(brand, code)` replaces that
    /// entry in place and keeps its id.
    pub fn import(&mut self, source: &Path) -> Result<ImportStats> {
        let files: Vec<PathBuf> = if source.is_dir() {
            let mut files: Vec<PathBuf> = WalkDir::new(source)
                .follow_links(true)
                .into_iter()
                .filter_map(|e| e.ok())
                .map(|e| e.path().to_path_buf())
                .filter(|p| p.is_file() && is_json_file(p))
                .collect();
            files.sort();
            files
        } else {
            vec![source.to_path_buf()]
        };

        let mut stats = ImportStats::default();
        for file in &files {
            let data = fs::read_to_string(file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let records: Vec<ImportRecord> = serde_json::from_str(&data)
                .with_context(|| format!("Failed to parse {}", file.display()))?;

            let (added, replaced) = self.merge(records);
            tracing::info!(file = %file.display(), added, replaced, "imported catalog file");
            stats.added += added;
            stats.replaced += replaced;
            stats.files += 1;
        }

        Ok(stats)
    }

    fn merge(&mut self, records: Vec<ImportRecord>) -> (usize, usize) {
        let mut index: HashMap<(String, String), usize> = self
            .colors
            .iter()
            .enumerate()
            .map(|(i, c)| ((c.brand.clone(), c.code.clone()), i))
            .collect();
        let mut next_id = self.colors.iter().map(|c| c.id).max().unwrap_or(0) + 1;
        let (mut added, mut replaced) = (0, 0);

        for record in records {
            let key = (record.brand.clone(), record.code.clone());
            if let Some(&i) = index.get(&key) {
                let existing = &mut self.colors[i];
                existing.name = record.name;
                existing.hex = record.hex;
                existing.set_name = record.set_name;
                replaced += 1;
            } else {
                index.insert(key, self.colors.len());
                self.colors.push(CatalogColor {
                    id: next_id,
                    brand: record.brand,
                    code: record.code,
                    name: record.name,
                    hex: record.hex,
                    set_name: record.set_name,
                });
                next_id += 1;
                added += 1;
            }
        }

        (added, replaced)
    }
}

fn is_json_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

impl CatalogStore for JsonCatalog {
    fn by_set(&self, brand: &str, set_name: &str) -> Result<Vec<CatalogColor>> {
        Ok(self
            .colors
            .iter()
            .filter(|c| c.brand == brand && c.set_name == set_name)
            .cloned()
            .collect())
    }

    fn by_brand(&self, brand: &str) -> Result<Vec<CatalogColor>> {
        Ok(self
            .colors
            .iter()
            .filter(|c| c.brand == brand)
            .cloned()
            .collect())
    }

    fn find(&self, brand: &str, code: &str) -> Result<Option<CatalogColor>> {
        Ok(self
            .colors
            .iter()
            .find(|c| c.brand == brand && c.code == code)
            .cloned())
    }

    fn find_in_set(
        &self,
        brand: &str,
        set_name: &str,
        code: &str,
    ) -> Result<Option<CatalogColor>> {
        Ok(self
            .colors
            .iter()
            .find(|c| c.brand == brand && c.set_name == set_name && c.code == code)
            .cloned())
    }

    fn excluding_brand(&self, brand: &str) -> Result<Vec<CatalogColor>> {
        Ok(self
            .colors
            .iter()
            .filter(|c| c.brand != brand)
            .cloned()
            .collect())
    }

    fn brands(&self) -> Result<Vec<String>> {
        let mut brands: Vec<String> = self.colors.iter().map(|c| c.brand.clone()).collect();
        brands.sort();
        brands.dedup();
        Ok(brands)
    }
}

#[cfg(test)]
pub(crate) fn test_color(id: u64, code: &str, hex: &str) -> CatalogColor {
    CatalogColor {
        id,
        brand: "ohuhu".to_string(),
        code: code.to_string(),
        name: format!("Color {code}"),
        hex: hex.to_string(),
        set_name: "320 colors".to_string(),
    }
}
