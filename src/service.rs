//! Palette operations behind the CLI
//!
//! Each operation validates its request, reads the catalog through
//! [`CatalogStore`] and, for palette-producing operations, appends the
//! result to the [`PaletteStore`]. History writes never fail a request.

use crate::catalog::{CatalogColor, CatalogStore};
use crate::error::PaletteError;
use crate::extract;
use crate::harmony::{compute_harmony, HarmonyResult, HarmonyType};
use crate::history::{NewPalette, PaletteRecord, PaletteStore};
use crate::matching::{allocate, equivalents, Equivalent, MatchResult};
use crate::styles::{palette_name, palette_targets, MarkerSet, Style};
use serde::Serialize;
use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::sync::Arc;

/// Allowed palette sizes
pub const COLOR_COUNT: RangeInclusive<usize> = 3..=12;
pub const EQUIVALENT_LIMIT: usize = 5;
pub const RECENT_LIMIT: usize = 10;

#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub color_count: usize,
    pub style: String,
    pub set: MarkerSet,
}

#[derive(Debug, Clone)]
pub struct MatchRequest {
    pub colors: Vec<String>,
    pub brand: String,
    pub set_name: String,
}

#[derive(Debug, Clone)]
pub struct ImageMatchRequest {
    pub path: PathBuf,
    pub color_count: usize,
    pub brand: String,
    pub set_name: String,
}

#[derive(Debug, Clone)]
pub struct EquivalencyRequest {
    pub code: String,
    pub brand: String,
}

#[derive(Debug, Clone)]
pub struct HarmonyRequest {
    pub color_code: String,
    pub brand: String,
    pub set_name: String,
    pub harmony_type: HarmonyType,
}

#[derive(Debug, Clone, Serialize)]
pub struct GeneratedPalette {
    /// History id, absent when the palette could not be recorded
    pub id: Option<u64>,
    pub colors: Vec<MatchResult>,
    pub style: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchedPalette {
    pub id: Option<u64>,
    pub colors: Vec<MatchResult>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Equivalency {
    pub source: CatalogColor,
    pub matches: Vec<Equivalent>,
}

pub struct PaletteService<'a> {
    catalog: &'a dyn CatalogStore,
    history: Arc<dyn PaletteStore>,
}

impl<'a> PaletteService<'a> {
    pub fn new(catalog: &'a dyn CatalogStore, history: Arc<dyn PaletteStore>) -> Self {
        Self { catalog, history }
    }

    /// Match a named style's target colors against a marker set.
    pub async fn generate_palette(
        &self,
        request: GenerateRequest,
    ) -> Result<GeneratedPalette, PaletteError> {
        check_count(request.color_count)?;
        let style_name = require("style", &request.style)?.to_lowercase();
        let style = Style::from_name(&style_name).unwrap_or_else(|| {
            tracing::debug!(style = %style_name, "unknown style, using pastel");
            Style::default()
        });

        let (brand, set_name) = request.set.catalog_key();
        let available = self.catalog.by_set(brand, set_name)?;
        if available.is_empty() {
            return Err(PaletteError::EmptyCatalog {
                brand: brand.to_string(),
                set_name: set_name.to_string(),
            });
        }

        let targets = palette_targets(&style_name, request.color_count);
        let colors = allocate(&targets, &available);
        tracing::info!(
            style = style.as_str(),
            requested = request.color_count,
            matched = colors.len(),
            "generated palette"
        );

        let id = self
            .record(NewPalette {
                name: palette_name(&style_name),
                colors: colors.iter().map(|m| m.color.hex.clone()).collect(),
                style: Some(style_name.clone()),
                source: "preset".to_string(),
                user_id: None,
            })
            .await;

        Ok(GeneratedPalette {
            id,
            colors,
            style: style_name,
        })
    }

    /// Match arbitrary colors against a brand/set, widening to the whole
    /// brand when the set is empty.
    pub async fn match_colors(&self, request: MatchRequest) -> Result<MatchedPalette, PaletteError> {
        if request.colors.is_empty() {
            return Err(PaletteError::validation("Colors array is required"));
        }
        if request.colors.iter().any(|c| c.trim().is_empty()) {
            return Err(PaletteError::validation("Colors must not be empty"));
        }
        let brand = require("brand", &request.brand)?;
        let set_name = require("set", &request.set_name)?;

        let mut available = self.catalog.by_set(brand, set_name)?;
        if available.is_empty() {
            tracing::debug!(brand, set = set_name, "set empty, matching against whole brand");
            available = self.catalog.by_brand(brand)?;
        }
        if available.is_empty() {
            return Err(PaletteError::EmptyCatalog {
                brand: brand.to_string(),
                set_name: set_name.to_string(),
            });
        }

        let colors = allocate(&request.colors, &available);
        tracing::info!(
            brand,
            set = set_name,
            requested = request.colors.len(),
            matched = colors.len(),
            "matched colors"
        );

        let id = self
            .record(NewPalette {
                name: format!("{brand} {set_name} Palette"),
                colors: colors.iter().map(|m| m.color.hex.clone()).collect(),
                style: None,
                source: "image_analysis".to_string(),
                user_id: None,
            })
            .await;

        Ok(MatchedPalette { id, colors })
    }

    /// Extract the dominant colors of an image and match them.
    pub async fn match_image(
        &self,
        request: ImageMatchRequest,
    ) -> Result<MatchedPalette, PaletteError> {
        check_count(request.color_count)?;
        require("brand", &request.brand)?;
        require("set", &request.set_name)?;

        let path = request.path.clone();
        let clusters = extract::EXTRACTED_COLORS.max(request.color_count);
        let mut colors = tokio::task::spawn_blocking(move || extract::dominant_colors(&path, clusters))
            .await
            .map_err(|e| PaletteError::Store(anyhow::anyhow!("Color extraction task failed: {e}")))?
            .map_err(|e| PaletteError::validation(format!("{e:#}")))?;
        colors.truncate(request.color_count);

        self.match_colors(MatchRequest {
            colors,
            brand: request.brand,
            set_name: request.set_name,
        })
        .await
    }

    /// Closest colors from every other brand, best first.
    pub fn find_equivalency(
        &self,
        request: &EquivalencyRequest,
    ) -> Result<Equivalency, PaletteError> {
        let code = require("code", &request.code)?;
        let brand = require("brand", &request.brand)?;

        let source = self
            .catalog
            .find(brand, code)?
            .ok_or_else(|| PaletteError::NotFound {
                brand: brand.to_string(),
                code: code.to_string(),
            })?;
        let candidates = self.catalog.excluding_brand(brand)?;
        let matches = equivalents(&source, &candidates, EQUIVALENT_LIMIT);
        tracing::debug!(brand, code, candidates = candidates.len(), "ranked equivalents");

        Ok(Equivalency { source, matches })
    }

    pub fn generate_harmony(&self, request: &HarmonyRequest) -> Result<HarmonyResult, PaletteError> {
        let code = require("color code", &request.color_code)?;
        let brand = require("brand", &request.brand)?;
        let set_name = require("set", &request.set_name)?;

        let base = self
            .catalog
            .find_in_set(brand, set_name, code)?
            .ok_or_else(|| PaletteError::NotFound {
                brand: brand.to_string(),
                code: code.to_string(),
            })?;
        let catalog = self.catalog.by_set_ordered(brand, set_name)?;
        let result = compute_harmony(&base, request.harmony_type, &catalog)?;
        if result.fallback_used {
            tracing::info!(
                code,
                requested = request.harmony_type.as_str(),
                actual = result.actual_harmony.as_str(),
                "harmony used fallback"
            );
        }
        Ok(result)
    }

    /// Colors of a brand/set by code, optionally filtered by a
    /// case-insensitive code or name substring.
    pub fn list_colors(
        &self,
        brand: &str,
        set_name: &str,
        search: Option<&str>,
    ) -> Result<Vec<CatalogColor>, PaletteError> {
        let brand = require("brand", brand)?;
        let set_name = require("set", set_name)?;
        let mut colors = self.catalog.by_set_ordered(brand, set_name)?;

        if let Some(needle) = search.map(str::trim).filter(|s| !s.is_empty()) {
            let needle = needle.to_lowercase();
            colors.retain(|c| {
                c.code.to_lowercase().contains(&needle) || c.name.to_lowercase().contains(&needle)
            });
        }
        Ok(colors)
    }

    pub fn recent_palettes(&self, limit: usize) -> Result<Vec<PaletteRecord>, PaletteError> {
        Ok(self.history.recent(limit)?)
    }

    async fn record(&self, palette: NewPalette) -> Option<u64> {
        let store = Arc::clone(&self.history);
        match tokio::task::spawn_blocking(move || store.append(palette)).await {
            Ok(Ok(id)) => Some(id),
            Ok(Err(e)) => {
                tracing::warn!("Failed to record palette history: {e:#}");
                None
            }
            Err(e) => {
                tracing::warn!("Palette history task failed: {e}");
                None
            }
        }
    }
}

fn require<'s>(field: &str, value: &'s str) -> Result<&'s str, PaletteError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(PaletteError::validation(format!("{field} is required")));
    }
    Ok(value)
}

fn check_count(count: usize) -> Result<(), PaletteError> {
    if !COLOR_COUNT.contains(&count) {
        return Err(PaletteError::validation(format!(
            "Color count must be between {} and {}, got {count}",
            COLOR_COUNT.start(),
            COLOR_COUNT.end()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{test_color, JsonCatalog};
    use anyhow::Result;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryHistory {
        records: Mutex<Vec<NewPalette>>,
    }

    impl PaletteStore for MemoryHistory {
        fn append(&self, palette: NewPalette) -> Result<u64> {
            let mut records = self.records.lock().unwrap();
            records.push(palette);
            Ok(records.len() as u64)
        }

        fn recent(&self, limit: usize) -> Result<Vec<PaletteRecord>> {
            let records = self.records.lock().unwrap();
            Ok(records
                .iter()
                .enumerate()
                .rev()
                .take(limit)
                .map(|(i, p)| PaletteRecord {
                    id: i as u64 + 1,
                    name: Some(p.name.clone()),
                    colors: serde_json::to_string(&p.colors).unwrap(),
                    style: p.style.clone(),
                    source: Some(p.source.clone()),
                    user_id: p.user_id.clone(),
                    created_at: 0,
                })
                .collect())
        }
    }

    struct BrokenHistory;

    impl PaletteStore for BrokenHistory {
        fn append(&self, _: NewPalette) -> Result<u64> {
            anyhow::bail!("disk full")
        }

        fn recent(&self, _: usize) -> Result<Vec<PaletteRecord>> {
            anyhow::bail!("disk full")
        }
    }

    fn branded(id: u64, brand: &str, set_name: &str, code: &str, hex: &str) -> CatalogColor {
        CatalogColor {
            brand: brand.to_string(),
            set_name: set_name.to_string(),
            ..test_color(id, code, hex)
        }
    }

    fn catalog() -> JsonCatalog {
        JsonCatalog::from_colors(vec![
            test_color(1, "R11", "#FF6B6B"),
            test_color(2, "R12", "#FFA07A"),
            test_color(3, "Y11", "#FFD93D"),
            test_color(4, "O11", "#F4A460"),
            test_color(5, "B11", "#4A90E2"),
            test_color(6, "G11", "#00FF00"),
            branded(20, "copic", "sketch", "R20", "#FF6A6A"),
            branded(21, "copic", "sketch", "B20", "#0000FF"),
            branded(30, "prisma", "", "R30", "#FF0000"),
        ])
    }

    fn service(catalog: &JsonCatalog) -> (PaletteService<'_>, Arc<MemoryHistory>) {
        let history = Arc::new(MemoryHistory::default());
        (PaletteService::new(catalog, history.clone()), history)
    }

    // --- generate ---

    #[tokio::test]
    async fn test_generate_palette_records_history() {
        let catalog = catalog();
        let (service, history) = service(&catalog);
        let palette = service
            .generate_palette(GenerateRequest {
                color_count: 3,
                style: "Warm".to_string(),
                set: MarkerSet::Honolulu,
            })
            .await
            .unwrap();

        assert_eq!(palette.id, Some(1));
        assert_eq!(palette.style, "warm");
        let codes: Vec<&str> = palette.colors.iter().map(|m| m.color.code.as_str()).collect();
        assert_eq!(codes, vec!["R11", "R12", "Y11"]);

        let records = history.records.lock().unwrap();
        assert_eq!(records[0].name, "Warm Palette");
        assert_eq!(records[0].source, "preset");
        assert_eq!(records[0].colors, vec!["#FF6B6B", "#FFA07A", "#FFD93D"]);
    }

    #[tokio::test]
    async fn test_generate_rejects_bad_count() {
        let catalog = catalog();
        let (service, _) = service(&catalog);
        for count in [0, 2, 13] {
            let err = service
                .generate_palette(GenerateRequest {
                    color_count: count,
                    style: "warm".to_string(),
                    set: MarkerSet::Honolulu,
                })
                .await
                .unwrap_err();
            assert_eq!(err.status(), 400, "count {count}");
        }
    }

    #[tokio::test]
    async fn test_generate_unknown_style_uses_pastel() {
        let catalog = catalog();
        let (service, history) = service(&catalog);
        let palette = service
            .generate_palette(GenerateRequest {
                color_count: 3,
                style: "gothic".to_string(),
                set: MarkerSet::SkinTones,
            })
            .await
            .unwrap();
        assert_eq!(palette.style, "gothic");
        assert_eq!(palette.colors[0].target, "#FFD1DC");
        assert_eq!(history.records.lock().unwrap()[0].name, "Gothic Palette");
    }

    #[tokio::test]
    async fn test_generate_empty_set_is_not_found() {
        let catalog = JsonCatalog::from_colors(vec![branded(1, "copic", "sketch", "R1", "#FF0000")]);
        let (service, _) = service(&catalog);
        let err = service
            .generate_palette(GenerateRequest {
                color_count: 5,
                style: "warm".to_string(),
                set: MarkerSet::Honolulu,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, PaletteError::EmptyCatalog { .. }));
        assert_eq!(err.status(), 404);
    }

    #[tokio::test]
    async fn test_history_failure_does_not_fail_request() {
        let catalog = catalog();
        let service = PaletteService::new(&catalog, Arc::new(BrokenHistory));
        let palette = service
            .generate_palette(GenerateRequest {
                color_count: 3,
                style: "cold".to_string(),
                set: MarkerSet::Honolulu,
            })
            .await
            .unwrap();
        assert_eq!(palette.id, None);
        assert_eq!(palette.colors.len(), 3);

        let err = service.recent_palettes(10).unwrap_err();
        assert_eq!(err.status(), 500);
    }

    // --- match ---

    #[tokio::test]
    async fn test_match_colors_in_set() {
        let catalog = catalog();
        let (service, history) = service(&catalog);
        let palette = service
            .match_colors(MatchRequest {
                colors: vec!["#FE0000".to_string(), "#0000FE".to_string()],
                brand: "copic".to_string(),
                set_name: "sketch".to_string(),
            })
            .await
            .unwrap();
        let ids: Vec<u64> = palette.colors.iter().map(|m| m.color.id).collect();
        assert_eq!(ids, vec![20, 21]);

        let records = history.records.lock().unwrap();
        assert_eq!(records[0].name, "copic sketch Palette");
        assert_eq!(records[0].source, "image_analysis");
        assert!(records[0].style.is_none());
    }

    #[tokio::test]
    async fn test_match_colors_widens_to_brand() {
        let catalog = catalog();
        let (service, _) = service(&catalog);
        let palette = service
            .match_colors(MatchRequest {
                colors: vec!["#FF0000".to_string()],
                brand: "prisma".to_string(),
                set_name: "premier".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(palette.colors[0].color.id, 30);

        let err = service
            .match_colors(MatchRequest {
                colors: vec!["#FF0000".to_string()],
                brand: "nobody".to_string(),
                set_name: "premier".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, PaletteError::EmptyCatalog { .. }));
    }

    #[tokio::test]
    async fn test_match_colors_validation() {
        let catalog = catalog();
        let (service, history) = service(&catalog);
        let cases = [
            (vec![], "ohuhu", "320 colors"),
            (vec!["  ".to_string()], "ohuhu", "320 colors"),
            (vec!["#FF0000".to_string()], "", "320 colors"),
            (vec!["#FF0000".to_string()], "ohuhu", " "),
        ];
        for (colors, brand, set_name) in cases {
            let err = service
                .match_colors(MatchRequest {
                    colors,
                    brand: brand.to_string(),
                    set_name: set_name.to_string(),
                })
                .await
                .unwrap_err();
            assert!(matches!(err, PaletteError::Validation(_)));
        }
        assert!(history.records.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_match_image() {
        use image::{Rgb, RgbImage};

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("red.png");
        RgbImage::from_pixel(8, 8, Rgb([255, 0, 0])).save(&path).unwrap();

        let catalog = catalog();
        let (service, _) = service(&catalog);
        let palette = service
            .match_image(ImageMatchRequest {
                path,
                color_count: 5,
                brand: "ohuhu".to_string(),
                set_name: "320 colors".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(palette.colors.len(), 1);
        assert_eq!(palette.colors[0].color.code, "R11");
    }

    #[tokio::test]
    async fn test_match_image_unreadable_is_client_error() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = catalog();
        let (service, _) = service(&catalog);
        let err = service
            .match_image(ImageMatchRequest {
                path: dir.path().join("missing.png"),
                color_count: 5,
                brand: "ohuhu".to_string(),
                set_name: "320 colors".to_string(),
            })
            .await
            .unwrap_err();
        assert!(err.is_client_error());
    }

    // --- equivalency ---

    #[test]
    fn test_find_equivalency_other_brands_only() {
        let catalog = catalog();
        let (service, _) = service(&catalog);
        let result = service
            .find_equivalency(&EquivalencyRequest {
                code: "R11".to_string(),
                brand: "ohuhu".to_string(),
            })
            .unwrap();
        assert_eq!(result.source.id, 1);
        let ids: Vec<u64> = result.matches.iter().map(|e| e.color.id).collect();
        assert_eq!(ids, vec![20, 30, 21]);
    }

    #[test]
    fn test_find_equivalency_limits_to_five() {
        let mut colors = vec![test_color(1, "R11", "#FF0000")];
        colors.extend((0..8).map(|i| branded(10 + i, "copic", "sketch", "R", "#EE0000")));
        let catalog = JsonCatalog::from_colors(colors);
        let (service, _) = service(&catalog);
        let result = service
            .find_equivalency(&EquivalencyRequest {
                code: "R11".to_string(),
                brand: "ohuhu".to_string(),
            })
            .unwrap();
        assert_eq!(result.matches.len(), EQUIVALENT_LIMIT);
        // Equal distances keep catalog order
        assert_eq!(result.matches[0].color.id, 10);
    }

    #[test]
    fn test_find_equivalency_unknown_code() {
        let catalog = catalog();
        let (service, _) = service(&catalog);
        let err = service
            .find_equivalency(&EquivalencyRequest {
                code: "ZZ99".to_string(),
                brand: "ohuhu".to_string(),
            })
            .unwrap_err();
        assert_eq!(err.to_string(), "Color code 'ZZ99' not found for brand 'ohuhu'");
        assert_eq!(err.status(), 404);
    }

    // --- harmony ---

    #[test]
    fn test_generate_harmony() {
        let catalog = catalog();
        let (service, _) = service(&catalog);
        let result = service
            .generate_harmony(&HarmonyRequest {
                color_code: "R11".to_string(),
                brand: "ohuhu".to_string(),
                set_name: "320 colors".to_string(),
                harmony_type: HarmonyType::Complementary,
            })
            .unwrap();
        assert_eq!(result.base().code, "R11");
        assert_eq!(result.companions()[0].code, "G11");
        assert!(!result.fallback_used);
    }

    #[test]
    fn test_generate_harmony_searches_code_order() {
        let catalog = JsonCatalog::from_colors(vec![
            test_color(1, "R11", "#FF0000"),
            test_color(2, "R14", "#EE0000"),
            test_color(3, "R12", "#DD0000"),
        ]);
        let (service, _) = service(&catalog);
        let result = service
            .generate_harmony(&HarmonyRequest {
                color_code: "R11".to_string(),
                brand: "ohuhu".to_string(),
                set_name: "320 colors".to_string(),
                harmony_type: HarmonyType::Monochromatic,
            })
            .unwrap();
        let codes: Vec<&str> = result.colors.iter().map(|c| c.code.as_str()).collect();
        assert_eq!(codes, vec!["R11", "R12", "R14"]);
    }

    #[test]
    fn test_generate_harmony_base_must_be_in_set() {
        let catalog = catalog();
        let (service, _) = service(&catalog);
        let err = service
            .generate_harmony(&HarmonyRequest {
                color_code: "R20".to_string(),
                brand: "ohuhu".to_string(),
                set_name: "320 colors".to_string(),
                harmony_type: HarmonyType::Triadic,
            })
            .unwrap_err();
        assert!(matches!(err, PaletteError::NotFound { .. }));

        let err = service
            .generate_harmony(&HarmonyRequest {
                color_code: String::new(),
                brand: "ohuhu".to_string(),
                set_name: "320 colors".to_string(),
                harmony_type: HarmonyType::Triadic,
            })
            .unwrap_err();
        assert!(matches!(err, PaletteError::Validation(_)));
    }

    // --- listing ---

    #[test]
    fn test_list_colors_sorted_and_filtered() {
        let catalog = catalog();
        let (service, _) = service(&catalog);
        let all = service.list_colors("ohuhu", "320 colors", None).unwrap();
        let codes: Vec<&str> = all.iter().map(|c| c.code.as_str()).collect();
        assert_eq!(codes, vec!["B11", "G11", "O11", "R11", "R12", "Y11"]);

        let reds = service.list_colors("ohuhu", "320 colors", Some("r1")).unwrap();
        assert_eq!(reds.len(), 2);

        let by_name = service
            .list_colors("ohuhu", "320 colors", Some("COLOR Y"))
            .unwrap();
        assert_eq!(by_name[0].code, "Y11");

        assert!(service.list_colors("", "320 colors", None).is_err());
    }

    #[tokio::test]
    async fn test_recent_palettes_newest_first() {
        let catalog = catalog();
        let (service, _) = service(&catalog);
        for style in ["warm", "cold", "summer"] {
            service
                .generate_palette(GenerateRequest {
                    color_count: 3,
                    style: style.to_string(),
                    set: MarkerSet::Honolulu,
                })
                .await
                .unwrap();
        }
        let recent = service.recent_palettes(2).unwrap();
        let styles: Vec<_> = recent.iter().filter_map(|r| r.style.as_deref()).collect();
        assert_eq!(styles, vec!["summer", "cold"]);
    }
}
