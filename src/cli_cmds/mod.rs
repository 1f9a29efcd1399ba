mod color_cmds;
mod import_cmds;
mod palette_cmds;

pub use color_cmds::{cmd_colors, cmd_equivalent, cmd_harmony, cmd_wheel};
pub use import_cmds::cmd_import;
pub use palette_cmds::{
    cmd_generate, cmd_history, cmd_match, cmd_match_image, cmd_presets, cmd_styles,
};

use crate::matching::MatchResult;
use anyhow::Result;
use serde::Serialize;

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_matches(matches: &[MatchResult]) {
    for m in matches {
        println!(
            "  {:<8} → {:<8} {:<24} {}  Δ {:.1}",
            m.target, m.color.code, m.color.name, m.color.hex, m.distance
        );
    }
}
