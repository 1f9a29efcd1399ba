use anyhow::Result;
use std::path::PathBuf;

use super::{print_json, print_matches};
use crate::history::{JsonPaletteHistory, PaletteStore};
use crate::service::{GenerateRequest, ImageMatchRequest, MatchRequest, PaletteService};
use crate::styles::{presets, MarkerSet, ALL_STYLES};

pub async fn cmd_generate(
    service: &PaletteService<'_>,
    style: String,
    count: usize,
    set: MarkerSet,
    json: bool,
) -> Result<()> {
    let palette = service
        .generate_palette(GenerateRequest {
            color_count: count,
            style,
            set,
        })
        .await?;

    if json {
        return print_json(&palette);
    }

    match palette.id {
        Some(id) => println!("✓ {} palette #{id}", palette.style),
        None => println!("✓ {} palette (not saved)", palette.style),
    }
    print_matches(&palette.colors);
    Ok(())
}

pub async fn cmd_match(
    service: &PaletteService<'_>,
    colors: Vec<String>,
    brand: String,
    set_name: String,
    json: bool,
) -> Result<()> {
    let palette = service
        .match_colors(MatchRequest {
            colors,
            brand,
            set_name,
        })
        .await?;

    if json {
        return print_json(&palette);
    }
    println!("✓ Matched {} colors", palette.colors.len());
    print_matches(&palette.colors);
    Ok(())
}

pub async fn cmd_match_image(
    service: &PaletteService<'_>,
    path: PathBuf,
    count: usize,
    brand: String,
    set_name: String,
    json: bool,
) -> Result<()> {
    let display = path.display().to_string();
    let palette = service
        .match_image(ImageMatchRequest {
            path,
            color_count: count,
            brand,
            set_name,
        })
        .await?;

    if json {
        return print_json(&palette);
    }
    println!("✓ Matched {} colors from {display}", palette.colors.len());
    print_matches(&palette.colors);
    Ok(())
}

pub fn cmd_history(history: &JsonPaletteHistory, limit: usize, clear: bool, json: bool) -> Result<()> {
    if clear {
        history.clear()?;
        println!("✓ Palette history cleared ({})", history.path().display());
        return Ok(());
    }

    let records = history.recent(limit)?;
    if json {
        return print_json(&records);
    }
    if records.is_empty() {
        println!("No palettes yet. Try 'huematch generate'.");
        return Ok(());
    }

    for record in &records {
        let colors = match record.hex_colors() {
            Ok(colors) => colors,
            Err(e) => {
                tracing::warn!("{e:#}");
                Vec::new()
            }
        };
        println!(
            "#{:<4} {:<28} {:<15} {}",
            record.id,
            record.name.as_deref().unwrap_or("-"),
            record.source.as_deref().unwrap_or("-"),
            colors.join(" ")
        );
    }
    Ok(())
}

pub fn cmd_presets(json: bool) -> Result<()> {
    let presets = presets();
    if json {
        return print_json(&presets);
    }

    for preset in presets {
        println!(
            "{:<12} {:<8} {}",
            preset.name,
            preset.style.as_str(),
            preset.colors.join(" ")
        );
    }
    Ok(())
}

pub fn cmd_styles(json: bool) -> Result<()> {
    if json {
        let styles: Vec<_> = ALL_STYLES
            .iter()
            .map(|s| serde_json::json!({ "style": s.as_str(), "colors": s.targets() }))
            .collect();
        return print_json(&styles);
    }

    for style in ALL_STYLES {
        println!("{:<8} {}", style.as_str(), style.targets().join(" "));
    }
    Ok(())
}
