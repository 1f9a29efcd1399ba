//! Named palette styles, marker sets and preset palettes.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum, Default)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    #[default]
    Pastel,
    Warm,
    Cold,
    Summer,
    Autumn,
    Nature,
    Neutral,
    Vibrant,
}

pub const ALL_STYLES: [Style; 8] = [
    Style::Pastel,
    Style::Warm,
    Style::Cold,
    Style::Summer,
    Style::Autumn,
    Style::Nature,
    Style::Neutral,
    Style::Vibrant,
];

const PASTEL: &[&str] = &[
    "#FFD1DC", "#E0BBE4", "#FFDFD3", "#C3E6E8", "#B4E7CE", "#F8B4D9", "#D4F1F4", "#FFF0E1",
    "#E6E6FA", "#F0E68C", "#FFE4E1", "#F5DEB3",
];
const WARM: &[&str] = &[
    "#FF6B6B", "#FFA07A", "#FFD93D", "#F4A460", "#FF8C42", "#FF4500", "#FF7F50", "#DC143C",
    "#FF6347", "#FA8072", "#E9967A", "#F08080",
];
const COLD: &[&str] = &[
    "#4A90E2", "#87CEEB", "#B0E0E6", "#5F9EA0", "#4682B4", "#6495ED", "#00CED1", "#20B2AA",
    "#48D1CC", "#40E0D0", "#00BFFF", "#1E90FF",
];
const SUMMER: &[&str] = &[
    "#FFE66D", "#4ECDC4", "#FF6B6B", "#95E1D3", "#F38181", "#AA96DA", "#FCBAD3", "#A8E6CF",
    "#FDFD96", "#FF9AA2",
];
const AUTUMN: &[&str] = &[
    "#D4A574", "#C9A882", "#B88A5E", "#CD853F", "#DEB887", "#D2691E", "#BC8F8F", "#A0522D",
    "#8B4513", "#F4A460",
];
const NATURE: &[&str] = &[
    "#006994", "#4ECDC4", "#1A535C", "#93E1D8", "#0B3954", "#2E8B57", "#3CB371", "#228B22",
    "#32CD32", "#90EE90",
];
// "#A0826D" appears twice in the source list; kept so counts line up.
const NEUTRAL: &[&str] = &[
    "#D4A574", "#8B7355", "#A0826D", "#C9A882", "#B88A5E", "#BDB76B", "#A0826D", "#C0C0C0",
    "#D3D3D3", "#DCDCDC",
];
const VIBRANT: &[&str] = &[
    "#FF1744", "#F50057", "#D500F9", "#651FFF", "#2979FF", "#00E5FF", "#1DE9B6", "#00E676",
    "#76FF03", "#FFEA00",
];

impl Style {
    pub fn as_str(self) -> &'static str {
        match self {
            Style::Pastel => "pastel",
            Style::Warm => "warm",
            Style::Cold => "cold",
            Style::Summer => "summer",
            Style::Autumn => "autumn",
            Style::Nature => "nature",
            Style::Neutral => "neutral",
            Style::Vibrant => "vibrant",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_lowercase();
        ALL_STYLES.iter().copied().find(|s| s.as_str() == name)
    }

    /// Idealized target colors for this style, most characteristic first.
    pub fn targets(self) -> &'static [&'static str] {
        match self {
            Style::Pastel => PASTEL,
            Style::Warm => WARM,
            Style::Cold => COLD,
            Style::Summer => SUMMER,
            Style::Autumn => AUTUMN,
            Style::Nature => NATURE,
            Style::Neutral => NEUTRAL,
            Style::Vibrant => VIBRANT,
        }
    }

}

/// History name for a requested style, e.g. "Warm Palette".
pub fn palette_name(style: &str) -> String {
    let mut chars = style.chars();
    match chars.next() {
        Some(first) => format!("{}{} Palette", first.to_uppercase(), chars.as_str()),
        None => "Palette".to_string(),
    }
}

/// Target list for a style name; unknown names get the pastel list.
pub fn resolve(style: &str) -> &'static [&'static str] {
    Style::from_name(style).unwrap_or_default().targets()
}

/// The first `count` targets of the named style.
pub fn palette_targets(style: &str, count: usize) -> Vec<String> {
    resolve(style)
        .iter()
        .take(count)
        .map(|hex| hex.to_string())
        .collect()
}

/// Marker product sets offered for palette generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum, Default)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum MarkerSet {
    #[default]
    Honolulu,
    HonoluluPlus,
    SkinTones,
    PastelSet,
    BrushSet,
}

pub const DEFAULT_BRAND: &str = "ohuhu";
pub const DEFAULT_SET_NAME: &str = "320 colors";

impl MarkerSet {
    /// Catalog brand and set backing this marker set.
    ///
    /// Every product set currently draws from the full Ohuhu 320 range.
    pub fn catalog_key(self) -> (&'static str, &'static str) {
        match self {
            MarkerSet::Honolulu
            | MarkerSet::HonoluluPlus
            | MarkerSet::SkinTones
            | MarkerSet::PastelSet
            | MarkerSet::BrushSet => (DEFAULT_BRAND, DEFAULT_SET_NAME),
        }
    }
}

/// A fixed, named palette shown without catalog matching
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Preset {
    pub name: &'static str,
    pub colors: &'static [&'static str],
    pub style: Style,
}

const PRESETS: &[Preset] = &[
    Preset {
        name: "Pastel",
        colors: &["#FFD1DC", "#E0BBE4", "#FFDFD3", "#C3E6E8", "#B4E7CE"],
        style: Style::Pastel,
    },
    Preset {
        name: "Warm",
        colors: &["#FF6B6B", "#FFA07A", "#FFD93D", "#F4A460", "#FF8C42"],
        style: Style::Warm,
    },
    Preset {
        name: "Cold",
        colors: &["#4A90E2", "#87CEEB", "#B0E0E6", "#5F9EA0", "#4682B4"],
        style: Style::Cold,
    },
    Preset {
        name: "Ocean",
        colors: &["#006994", "#4ECDC4", "#1A535C", "#93E1D8", "#0B3954"],
        style: Style::Nature,
    },
    Preset {
        name: "Vintage",
        colors: &["#D4A574", "#8B7355", "#A0826D", "#C9A882", "#B88A5E"],
        style: Style::Neutral,
    },
    Preset {
        name: "Skin Tones",
        colors: &["#FDDBC7", "#F4A582", "#D6604D", "#B2182B", "#8B4513"],
        style: Style::Neutral,
    },
];

pub fn presets() -> &'static [Preset] {
    PRESETS
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::hex_to_rgb;

    #[test]
    fn test_every_style_has_valid_targets() {
        for style in ALL_STYLES {
            let targets = style.targets();
            assert!(
                (10..=12).contains(&targets.len()),
                "{} has {} targets",
                style.as_str(),
                targets.len()
            );
            for hex in targets {
                assert!(hex_to_rgb(hex).is_some(), "{hex} is not valid");
            }
        }
    }

    #[test]
    fn test_resolve_known_and_unknown() {
        assert_eq!(resolve("warm")[0], "#FF6B6B");
        assert_eq!(resolve("  Vibrant ")[0], "#FF1744");
        assert_eq!(resolve("gothic"), Style::Pastel.targets());
        assert_eq!(resolve(""), Style::Pastel.targets());
    }

    #[test]
    fn test_palette_targets_truncates() {
        assert_eq!(
            palette_targets("cold", 3),
            vec!["#4A90E2", "#87CEEB", "#B0E0E6"]
        );
        assert_eq!(palette_targets("summer", 12).len(), 10);
        assert_eq!(palette_targets("unknown", 2), vec!["#FFD1DC", "#E0BBE4"]);
    }

    #[test]
    fn test_palette_name() {
        assert_eq!(palette_name("warm"), "Warm Palette");
        assert_eq!(palette_name("pastel"), "Pastel Palette");
        assert_eq!(palette_name("gothic"), "Gothic Palette");
        assert_eq!(palette_name(""), "Palette");
    }

    #[test]
    fn test_from_name_round_trip() {
        for style in ALL_STYLES {
            assert_eq!(Style::from_name(style.as_str()), Some(style));
        }
        assert_eq!(Style::from_name("sepia"), None);
    }

    #[test]
    fn test_marker_sets_map_to_ohuhu() {
        for set in MarkerSet::value_variants() {
            assert_eq!(set.catalog_key(), ("ohuhu", "320 colors"));
        }
    }

    #[test]
    fn test_marker_set_serde_names() {
        let json = serde_json::to_string(&MarkerSet::HonoluluPlus).unwrap();
        assert_eq!(json, "\"honolulu_plus\"");
        let set: MarkerSet = serde_json::from_str("\"skin_tones\"").unwrap();
        assert_eq!(set, MarkerSet::SkinTones);
    }

    #[test]
    fn test_presets() {
        let presets = presets();
        assert_eq!(presets.len(), 6);
        assert!(presets.iter().all(|p| p.colors.len() == 5));
        assert_eq!(presets[3].name, "Ocean");
        assert_eq!(presets[3].style, Style::Nature);
    }
}
