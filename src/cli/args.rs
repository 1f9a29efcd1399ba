use crate::harmony::HarmonyType;
use crate::service::RECENT_LIMIT;
use crate::styles::MarkerSet;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "huematch")]
#[command(version)]
#[command(about = "Marker palettes, cross-brand equivalents and color harmonies")]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Commands,

    /// Config file (default: platform config dir)
    #[arg(long, global = true)]
    pub(crate) config: Option<PathBuf>,

    /// Catalog JSON file, overriding the config
    #[arg(long, global = true)]
    pub(crate) catalog: Option<PathBuf>,

    /// Palette history file, overriding the config
    #[arg(long, global = true)]
    pub(crate) history: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub(crate) json: bool,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Generate a palette from a style, matched to a marker set
    Generate {
        /// Palette style (pastel, warm, cold, summer, autumn, nature, neutral, vibrant)
        #[arg(short, long, default_value = "pastel")]
        style: String,

        /// Number of colors (3-12)
        #[arg(short, long)]
        count: Option<usize>,

        /// Marker set to draw from
        #[arg(long, value_enum, default_value_t)]
        set: MarkerSet,
    },
    /// Match hex colors, or the dominant colors of an image, to a brand
    Match {
        /// Hex colors such as "#FF6B6B"
        #[arg(required_unless_present = "image")]
        colors: Vec<String>,

        /// Take colors from this image instead
        #[arg(short, long, conflicts_with = "colors")]
        image: Option<PathBuf>,

        /// Colors to take from the image (3-12)
        #[arg(short, long, requires = "image")]
        count: Option<usize>,

        #[arg(short, long)]
        brand: Option<String>,

        #[arg(long)]
        set: Option<String>,
    },
    /// Find the closest colors from other brands
    Equivalent {
        /// Color code, e.g. "R11"
        code: String,

        #[arg(short, long)]
        brand: Option<String>,
    },
    /// Build a color-wheel harmony around a color code
    Harmony {
        /// Base color code
        code: String,

        #[arg(short = 't', long = "type", value_enum, default_value_t = HarmonyType::Complementary)]
        harmony: HarmonyType,

        #[arg(short, long)]
        brand: Option<String>,

        #[arg(long)]
        set: Option<String>,
    },
    /// Lay out a set on the color wheel
    Wheel {
        /// Write an SVG drawing here instead of printing the layout
        #[arg(long)]
        svg: Option<PathBuf>,

        #[arg(short, long)]
        brand: Option<String>,

        #[arg(long)]
        set: Option<String>,
    },
    /// List the colors of a set
    Colors {
        /// Filter by code or name (case-insensitive)
        #[arg(short = 'q', long)]
        search: Option<String>,

        #[arg(short, long)]
        brand: Option<String>,

        #[arg(long)]
        set: Option<String>,
    },
    /// Show recently generated palettes
    History {
        #[arg(short = 'n', long, default_value_t = RECENT_LIMIT)]
        limit: usize,

        /// Delete all stored palettes
        #[arg(long)]
        clear: bool,
    },
    /// Show the built-in preset palettes
    Presets,
    /// Show the palette styles and their target colors
    Styles,
    /// Import catalog colors from a JSON file or directory
    Import {
        path: PathBuf,
    },
}
