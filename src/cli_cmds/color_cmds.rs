use anyhow::{Context, Result};
use std::path::Path;

use super::print_json;
use crate::code::{self, Grammar};
use crate::harmony::HarmonyType;
use crate::service::{EquivalencyRequest, HarmonyRequest, PaletteService};
use crate::wheel::{self, WheelGeometry};

pub fn cmd_equivalent(
    service: &PaletteService<'_>,
    code: String,
    brand: String,
    json: bool,
) -> Result<()> {
    let result = service.find_equivalency(&EquivalencyRequest { code, brand })?;
    if json {
        return print_json(&result);
    }

    let source = &result.source;
    println!("{} {} ({}) {}", source.brand, source.code, source.name, source.hex);
    if result.matches.is_empty() {
        println!("  No other brands in the catalog.");
    }
    for (rank, m) in result.matches.iter().enumerate() {
        println!(
            "  {}. {:<10} {:<8} {:<24} {}  Δ {:.1}",
            rank + 1,
            m.color.brand,
            m.color.code,
            m.color.name,
            m.color.hex,
            m.distance
        );
    }
    Ok(())
}

pub fn cmd_harmony(
    service: &PaletteService<'_>,
    code: String,
    harmony: HarmonyType,
    brand: String,
    set_name: String,
    json: bool,
) -> Result<()> {
    let result = service.generate_harmony(&HarmonyRequest {
        color_code: code,
        brand,
        set_name,
        harmony_type: harmony,
    })?;
    if json {
        return print_json(&result);
    }

    if result.fallback_used {
        println!(
            "No {} companions; showing {} instead",
            result.requested_harmony.as_str(),
            result.actual_harmony.as_str()
        );
    } else {
        println!("✓ {} harmony", result.actual_harmony.as_str());
    }
    let base = result.base();
    println!("  {:<8} {:<24} {}  base", base.code, base.name, base.hex);
    for color in result.companions() {
        println!("  {:<8} {:<24} {}", color.code, color.name, color.hex);
    }
    if result.companions().is_empty() {
        println!("  No companions found in this set.");
    }
    Ok(())
}

pub fn cmd_wheel(
    service: &PaletteService<'_>,
    brand: &str,
    set_name: &str,
    geometry: &WheelGeometry,
    svg: Option<&Path>,
    json: bool,
) -> Result<()> {
    let colors = service.list_colors(brand, set_name, None)?;
    let layout = wheel::layout(&colors, geometry);

    if let Some(path) = svg {
        let drawing = wheel::render_svg(&layout, geometry);
        std::fs::write(path, drawing)
            .with_context(|| format!("Failed to write SVG: {}", path.display()))?;
        println!(
            "✓ Wrote {} sectors and {} greys to {}",
            layout.sector_count(),
            layout.greys.len(),
            path.display()
        );
        return Ok(());
    }

    if json {
        return print_json(&layout);
    }

    for family in &layout.families {
        println!(
            "{:<4} hue {:>5.1}°  {} colors",
            family.family,
            family.mean_hue,
            family.sectors.len()
        );
    }
    println!("greys: {}", layout.greys.len());
    Ok(())
}

pub fn cmd_colors(
    service: &PaletteService<'_>,
    brand: &str,
    set_name: &str,
    search: Option<&str>,
    json: bool,
) -> Result<()> {
    let colors = service.list_colors(brand, set_name, search)?;
    if json {
        return print_json(&colors);
    }

    if colors.is_empty() {
        println!("No colors found for {brand} / {set_name}.");
        return Ok(());
    }
    for color in &colors {
        let shade = match code::parse(&color.code, Grammar::Strict) {
            Some(p) => format!("sat {} / bright {}", p.saturation, p.brightness),
            None => String::new(),
        };
        println!("{:<8} {:<28} {}  {shade}", color.code, color.name, color.hex);
    }
    println!("{} colors", colors.len());
    Ok(())
}
