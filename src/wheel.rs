//! Circular layout of a marker catalog
//!
//! Chromatic families become wedges ordered by their mean hue, with one
//! ring per saturation digit. Grey families are packed as dots in the
//! middle. The result is plain geometry; [`render_svg`] draws it.

use crate::catalog::CatalogColor;
use crate::code::parse_strict;
use crate::color::hex_to_hsl;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::f64::consts::{FRAC_PI_2, PI, TAU};
use std::fmt::Write;

/// Families drawn in the center instead of on the wheel.
pub const GREY_FAMILIES: [&str; 6] = ["GG", "BGY", "CG", "YGY", "WG", "FY"];

/// Dots per grey ring, innermost first.
const GREY_RING_CAPACITY: [usize; 3] = [1, 7, 16];
const MAX_GREYS: usize = 24;
const LABEL_MARGIN: f64 = 18.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WheelGeometry {
    pub center_x: f64,
    pub center_y: f64,
    /// Radius of the innermost ring (the grey area sits inside it)
    pub base_radius: f64,
    pub ring_width: f64,
    /// Space left between neighbouring rings
    pub ring_gap: f64,
    pub max_rings: u8,
}

impl Default for WheelGeometry {
    fn default() -> Self {
        Self {
            center_x: 300.0,
            center_y: 300.0,
            base_radius: 40.0,
            ring_width: 26.0,
            ring_gap: 1.5,
            max_rings: 10,
        }
    }
}

impl WheelGeometry {
    fn point(&self, radius: f64, angle: f64) -> (f64, f64) {
        (
            self.center_x + radius * angle.cos(),
            self.center_y + radius * angle.sin(),
        )
    }

    fn label_radius(&self) -> f64 {
        self.base_radius + f64::from(self.max_rings) * self.ring_width + LABEL_MARGIN
    }
}

/// One annular sector on the wheel
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WheelSector {
    pub id: u64,
    pub code: String,
    pub name: String,
    pub hex: String,
    pub saturation: u8,
    pub brightness: u32,
    pub start_angle: f64,
    pub end_angle: f64,
    pub inner_radius: f64,
    pub outer_radius: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilySegment {
    pub family: String,
    pub mean_hue: f64,
    pub start_angle: f64,
    pub span: f64,
    pub label_x: f64,
    pub label_y: f64,
    pub sectors: Vec<WheelSector>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GreyDot {
    pub id: u64,
    pub code: String,
    pub name: String,
    pub hex: String,
    pub ring: usize,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WheelLayout {
    pub families: Vec<FamilySegment>,
    pub greys: Vec<GreyDot>,
}

impl WheelLayout {
    pub fn sector_count(&self) -> usize {
        self.families.iter().map(|f| f.sectors.len()).sum()
    }
}

struct FamilyGroup<'a> {
    family: String,
    hues: Vec<f64>,
    /// Members per saturation digit, with their brightness
    rings: [Vec<(&'a CatalogColor, u32)>; 10],
}

/// Lay out `colors` on the wheel.
pub fn layout(colors: &[CatalogColor], geometry: &WheelGeometry) -> WheelLayout {
    let mut groups: Vec<FamilyGroup> = Vec::new();
    let mut greys: Vec<&CatalogColor> = Vec::new();

    for color in colors {
        let Some(parsed) = parse_strict(&color.code) else {
            continue;
        };
        if GREY_FAMILIES.contains(&parsed.family.as_str()) {
            greys.push(color);
            continue;
        }

        let idx = match groups.iter().position(|g| g.family == parsed.family) {
            Some(idx) => idx,
            None => {
                groups.push(FamilyGroup {
                    family: parsed.family.clone(),
                    hues: Vec::new(),
                    rings: Default::default(),
                });
                groups.len() - 1
            }
        };
        let group = &mut groups[idx];
        group.rings[usize::from(parsed.saturation)].push((color, parsed.brightness));
        if let Some(hsl) = hex_to_hsl(&color.hex) {
            group.hues.push(hsl.h);
        }
    }

    let mut ordered: Vec<(f64, FamilyGroup)> = groups
        .into_iter()
        .filter(|g| !g.hues.is_empty())
        .map(|g| (g.hues.iter().sum::<f64>() / g.hues.len() as f64, g))
        .collect();
    ordered.sort_by(|a, b| a.0.total_cmp(&b.0));

    let count = ordered.len();
    let families = ordered
        .into_iter()
        .enumerate()
        .map(|(idx, (mean_hue, group))| family_segment(idx, count, mean_hue, group, geometry))
        .collect();

    WheelLayout {
        families,
        greys: grey_dots(greys, geometry),
    }
}

fn family_segment(
    idx: usize,
    count: usize,
    mean_hue: f64,
    mut group: FamilyGroup,
    geometry: &WheelGeometry,
) -> FamilySegment {
    let span = TAU / count as f64;
    let start_angle = idx as f64 / count as f64 * TAU - FRAC_PI_2;
    let (label_x, label_y) = geometry.point(geometry.label_radius(), start_angle + span / 2.0);

    let mut sectors = Vec::new();
    let rings = usize::from(geometry.max_rings).min(group.rings.len());
    for (saturation, members) in group.rings.iter_mut().enumerate().take(rings) {
        if members.is_empty() {
            continue;
        }
        members.sort_by_key(|(_, brightness)| *brightness);

        let inner_radius = geometry.base_radius + saturation as f64 * geometry.ring_width;
        let outer_radius =
            geometry.base_radius + (saturation + 1) as f64 * geometry.ring_width - geometry.ring_gap;
        let step = span / members.len() as f64;

        for (i, (color, brightness)) in members.iter().enumerate() {
            sectors.push(WheelSector {
                id: color.id,
                code: color.code.clone(),
                name: color.name.clone(),
                hex: color.hex.clone(),
                saturation: saturation as u8,
                brightness: *brightness,
                start_angle: start_angle + i as f64 * step,
                end_angle: start_angle + (i + 1) as f64 * step,
                inner_radius,
                outer_radius,
            });
        }
    }

    FamilySegment {
        family: group.family,
        mean_hue,
        start_angle,
        span,
        label_x,
        label_y,
        sectors,
    }
}

fn grey_dots(mut greys: Vec<&CatalogColor>, geometry: &WheelGeometry) -> Vec<GreyDot> {
    // Lightest first; greys with a bad hex go last.
    greys.sort_by(|a, b| {
        match (hex_to_hsl(&a.hex), hex_to_hsl(&b.hex)) {
            (Some(a), Some(b)) => b.l.total_cmp(&a.l),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    });
    greys.truncate(MAX_GREYS);

    let ring_step = (geometry.base_radius - 6.0) / GREY_RING_CAPACITY.len() as f64;
    let mut dots = Vec::with_capacity(greys.len());
    let mut ring = 0;
    let mut ring_start = 0;

    for (index, color) in greys.into_iter().enumerate() {
        while index >= ring_start + GREY_RING_CAPACITY[ring] {
            ring_start += GREY_RING_CAPACITY[ring];
            ring += 1;
        }
        let (x, y) = if ring == 0 {
            (geometry.center_x, geometry.center_y)
        } else {
            let capacity = GREY_RING_CAPACITY[ring] as f64;
            let angle = TAU / capacity * (index - ring_start) as f64 - FRAC_PI_2;
            geometry.point(ring_step * (ring as f64 + 0.5), angle)
        };
        dots.push(GreyDot {
            id: color.id,
            code: color.code.clone(),
            name: color.name.clone(),
            hex: color.hex.clone(),
            ring,
            x,
            y,
        });
    }

    dots
}

/// Draw a layout as a standalone SVG document.
pub fn render_svg(layout: &WheelLayout, geometry: &WheelGeometry) -> String {
    let size = (geometry.center_x.max(geometry.center_y) * 2.0).round();
    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {size} {size}" width="{size}" height="{size}">"#
    );

    for family in &layout.families {
        let _ = writeln!(svg, r#"  <g data-family="{}">"#, escape(&family.family));
        for sector in &family.sectors {
            let _ = writeln!(
                svg,
                r#"    <path d="{}" fill="{}" stroke="white" stroke-width="0.3"><title>{} - {}</title></path>"#,
                sector_path(sector, geometry),
                escape(&sector.hex),
                escape(&sector.code),
                escape(&sector.name),
            );
        }
        let _ = writeln!(
            svg,
            r##"    <text x="{:.2}" y="{:.2}" text-anchor="middle" dominant-baseline="middle" font-size="12" font-weight="bold" fill="#374151">{}</text>"##,
            family.label_x,
            family.label_y,
            escape(&family.family),
        );
        let _ = writeln!(svg, "  </g>");
    }

    let _ = writeln!(
        svg,
        r##"  <circle cx="{:.2}" cy="{:.2}" r="{:.2}" fill="white" stroke="#E5E7EB" stroke-width="1.5"/>"##,
        geometry.center_x,
        geometry.center_y,
        geometry.base_radius - 2.0,
    );

    for dot in &layout.greys {
        let r = if dot.ring == 0 { 4.0 } else { 3.5 };
        let _ = writeln!(
            svg,
            r##"  <circle cx="{:.2}" cy="{:.2}" r="{r}" fill="{}" stroke="#cccccc" stroke-width="0.3"><title>{} - {}</title></circle>"##,
            dot.x,
            dot.y,
            escape(&dot.hex),
            escape(&dot.code),
            escape(&dot.name),
        );
    }

    // Saturation ring numbers along a spoke just left of twelve o'clock
    let spoke = -FRAC_PI_2 - PI / 6.0;
    for ring in 0..geometry.max_rings {
        let radius =
            geometry.base_radius + f64::from(ring) * geometry.ring_width + geometry.ring_width / 2.0;
        let (x, y) = geometry.point(radius, spoke);
        let _ = writeln!(
            svg,
            r##"  <text x="{x:.2}" y="{y:.2}" text-anchor="middle" dominant-baseline="middle" font-size="8" fill="#4B5563">{ring}</text>"##
        );
    }

    svg.push_str("</svg>\n");
    svg
}

fn sector_path(sector: &WheelSector, geometry: &WheelGeometry) -> String {
    let (inner, outer) = (sector.inner_radius, sector.outer_radius);
    let (x1, y1) = geometry.point(inner, sector.start_angle);
    let (x2, y2) = geometry.point(outer, sector.start_angle);
    let (x3, y3) = geometry.point(outer, sector.end_angle);
    let (x4, y4) = geometry.point(inner, sector.end_angle);
    let large_arc = u8::from(sector.end_angle - sector.start_angle > PI);

    format!(
        "M {x1:.2} {y1:.2} L {x2:.2} {y2:.2} A {outer:.2} {outer:.2} 0 {large_arc} 1 {x3:.2} {y3:.2} \
         L {x4:.2} {y4:.2} A {inner:.2} {inner:.2} 0 {large_arc} 0 {x1:.2} {y1:.2} Z"
    )
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}
