//! Color-wheel harmonies over marker color families
//!
//! Families sit on a fixed 12-step hue wheel. A harmony is a set of steps
//! away from the base family; for each step the first catalog color of
//! that family with a similar saturation and brightness is picked. When the
//! requested harmony finds nothing, a fixed fallback chain is tried.
//!
//! This wheel is independent of the hue order used by [`crate::wheel`].

use crate::catalog::CatalogColor;
use crate::code::{parse_loose, ParsedCode};
use crate::error::PaletteError;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Family codes in hue-wheel order; index is the wheel position.
pub const HARMONY_WHEEL: [&str; 12] = [
    "R", "RO", "O", "YO", "Y", "YG", "G", "BG", "B", "BV", "V", "RV",
];

/// Harmonies tried, in order, when the requested one yields nothing.
pub const FALLBACK_ORDER: [HarmonyType; 4] = [
    HarmonyType::Analogous,
    HarmonyType::Complementary,
    HarmonyType::Monochromatic,
    HarmonyType::Triadic,
];

/// Largest saturation step between a base and its companion.
const SATURATION_TOLERANCE: u8 = 2;
/// Largest brightness step between a base and its companion.
const BRIGHTNESS_TOLERANCE: u32 = 3;
const MONOCHROMATIC_LIMIT: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum HarmonyType {
    Complementary,
    Analogous,
    Triadic,
    Tetradic,
    SplitComplementary,
    Monochromatic,
    Square,
    Diadic,
}

impl HarmonyType {
    pub fn as_str(self) -> &'static str {
        match self {
            HarmonyType::Complementary => "complementary",
            HarmonyType::Analogous => "analogous",
            HarmonyType::Triadic => "triadic",
            HarmonyType::Tetradic => "tetradic",
            HarmonyType::SplitComplementary => "split_complementary",
            HarmonyType::Monochromatic => "monochromatic",
            HarmonyType::Square => "square",
            HarmonyType::Diadic => "diadic",
        }
    }

    /// Wheel steps from the base family; `None` for monochromatic.
    pub fn offsets(self) -> Option<&'static [i32]> {
        match self {
            HarmonyType::Complementary => Some(&[6]),
            HarmonyType::Diadic => Some(&[2]),
            HarmonyType::Analogous => Some(&[-2, -1, 1, 2]),
            HarmonyType::Triadic => Some(&[4, 8]),
            HarmonyType::SplitComplementary => Some(&[5, 7]),
            HarmonyType::Tetradic | HarmonyType::Square => Some(&[3, 6, 9]),
            HarmonyType::Monochromatic => None,
        }
    }
}

/// The base color followed by its companions
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HarmonyResult {
    pub colors: Vec<CatalogColor>,
    pub requested_harmony: HarmonyType,
    pub actual_harmony: HarmonyType,
    pub fallback_used: bool,
}

impl HarmonyResult {
    pub fn base(&self) -> &CatalogColor {
        &self.colors[0]
    }

    pub fn companions(&self) -> &[CatalogColor] {
        &self.colors[1..]
    }
}

/// Wheel position of a family, if it is on the harmony wheel.
pub fn wheel_index(family: &str) -> Option<usize> {
    HARMONY_WHEEL.iter().position(|f| *f == family)
}

/// Wheel position used for offsets; families off the wheel count as -1.
fn base_position(family: &str) -> i32 {
    wheel_index(family).map_or(-1, |i| i as i32)
}

/// Family `offset` steps around the wheel from `index`.
pub fn family_at(index: i32, offset: i32) -> &'static str {
    let len = HARMONY_WHEEL.len() as i32;
    let target = (index + offset).rem_euclid(len);
    HARMONY_WHEEL[target as usize]
}

/// Compute `harmony` for `base` from `catalog` (searched in the given order).
///
/// Never fails for a parsable base: if neither the requested harmony nor
/// any fallback finds companions, the result holds only the base.
pub fn compute_harmony(
    base: &CatalogColor,
    harmony: HarmonyType,
    catalog: &[CatalogColor],
) -> Result<HarmonyResult, PaletteError> {
    let base_parsed = parse_loose(&base.code).ok_or_else(|| {
        PaletteError::validation(format!("Invalid color code format: '{}'", base.code))
    })?;
    // Parse once; unparsable codes never become companions.
    let parsed: Vec<(&CatalogColor, Option<ParsedCode>)> =
        catalog.iter().map(|c| (c, parse_loose(&c.code))).collect();

    let mut companions = find_companions(base, &base_parsed, harmony, &parsed);
    let mut actual = harmony;
    let fallback_used = companions.is_empty();

    if fallback_used {
        for fallback in FALLBACK_ORDER.into_iter().filter(|f| *f != harmony) {
            actual = fallback;
            companions = find_companions(base, &base_parsed, fallback, &parsed);
            if !companions.is_empty() {
                break;
            }
        }
        tracing::debug!(
            code = %base.code,
            requested = harmony.as_str(),
            actual = actual.as_str(),
            found = companions.len(),
            "harmony fell back"
        );
    }

    let mut colors = Vec::with_capacity(companions.len() + 1);
    colors.push(base.clone());
    colors.extend(companions);

    Ok(HarmonyResult {
        colors,
        requested_harmony: harmony,
        actual_harmony: actual,
        fallback_used,
    })
}

fn find_companions(
    base: &CatalogColor,
    base_parsed: &ParsedCode,
    harmony: HarmonyType,
    catalog: &[(&CatalogColor, Option<ParsedCode>)],
) -> Vec<CatalogColor> {
    let Some(offsets) = harmony.offsets() else {
        return catalog
            .iter()
            .filter(|(color, parsed)| {
                color.code != base.code
                    && parsed
                        .as_ref()
                        .is_some_and(|p| p.family == base_parsed.family)
            })
            .take(MONOCHROMATIC_LIMIT)
            .map(|(color, _)| (*color).clone())
            .collect();
    };

    let base_index = base_position(&base_parsed.family);

    offsets
        .iter()
        .filter_map(|&offset| {
            let family = family_at(base_index, offset);
            catalog
                .iter()
                .find(|(_, parsed)| {
                    parsed.as_ref().is_some_and(|p| {
                        p.family == family && within_tolerance(base_parsed, p)
                    })
                })
                .map(|(color, _)| (*color).clone())
        })
        .collect()
}

fn within_tolerance(base: &ParsedCode, candidate: &ParsedCode) -> bool {
    base.saturation.abs_diff(candidate.saturation) <= SATURATION_TOLERANCE
        && base.brightness.abs_diff(candidate.brightness) <= BRIGHTNESS_TOLERANCE
}
