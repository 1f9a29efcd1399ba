use anyhow::Result;
use clap::Parser;
use std::path::Path;
use std::sync::Arc;

use super::{Cli, Commands};
use crate::catalog::JsonCatalog;
use crate::cli_cmds::*;
use crate::config::Config;
use crate::history::JsonPaletteHistory;
use crate::service::PaletteService;

fn load_catalog(path: &Path) -> Result<JsonCatalog> {
    let catalog = JsonCatalog::load(path)?;
    if catalog.is_empty() {
        tracing::warn!(
            "Catalog {} is empty; add colors with 'huematch import <file>'",
            path.display()
        );
    }
    tracing::debug!(path = %path.display(), colors = catalog.len(), "catalog loaded");
    Ok(catalog)
}

pub(crate) async fn run() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let catalog_path = cli.catalog.clone().unwrap_or_else(|| config.catalog_path());
    let history = Arc::new(JsonPaletteHistory::new(
        cli.history.clone().unwrap_or_else(|| config.history_path()),
        config.history.max_records,
    ));
    let json = cli.json;
    let brand_or_default =
        |brand: Option<String>| brand.unwrap_or_else(|| config.catalog.default_brand.clone());
    let set_or_default =
        |set: Option<String>| set.unwrap_or_else(|| config.catalog.default_set.clone());

    match cli.command {
        Commands::Generate { style, count, set } => {
            let catalog = load_catalog(&catalog_path)?;
            let service = PaletteService::new(&catalog, history);
            let count = count.unwrap_or(config.palette.color_count);
            cmd_generate(&service, style, count, set, json).await?;
        }
        Commands::Match {
            colors,
            image,
            count,
            brand,
            set,
        } => {
            let catalog = load_catalog(&catalog_path)?;
            let service = PaletteService::new(&catalog, history);
            let brand = brand_or_default(brand);
            let set = set_or_default(set);
            match image {
                Some(path) => {
                    let count = count.unwrap_or(config.palette.image_color_count);
                    cmd_match_image(&service, path, count, brand, set, json).await?;
                }
                None => cmd_match(&service, colors, brand, set, json).await?,
            }
        }
        Commands::Equivalent { code, brand } => {
            let catalog = load_catalog(&catalog_path)?;
            let service = PaletteService::new(&catalog, history);
            cmd_equivalent(&service, code, brand_or_default(brand), json)?;
        }
        Commands::Harmony {
            code,
            harmony,
            brand,
            set,
        } => {
            let catalog = load_catalog(&catalog_path)?;
            let service = PaletteService::new(&catalog, history);
            cmd_harmony(
                &service,
                code,
                harmony,
                brand_or_default(brand),
                set_or_default(set),
                json,
            )?;
        }
        Commands::Wheel { svg, brand, set } => {
            let catalog = load_catalog(&catalog_path)?;
            let service = PaletteService::new(&catalog, history);
            cmd_wheel(
                &service,
                &brand_or_default(brand),
                &set_or_default(set),
                &config.wheel,
                svg.as_deref(),
                json,
            )?;
        }
        Commands::Colors { search, brand, set } => {
            let catalog = load_catalog(&catalog_path)?;
            let service = PaletteService::new(&catalog, history);
            cmd_colors(
                &service,
                &brand_or_default(brand),
                &set_or_default(set),
                search.as_deref(),
                json,
            )?;
        }
        Commands::History { limit, clear } => {
            cmd_history(&history, limit, clear, json)?;
        }
        Commands::Presets => {
            cmd_presets(json)?;
        }
        Commands::Styles => {
            cmd_styles(json)?;
        }
        Commands::Import { path } => {
            cmd_import(&catalog_path, &path)?;
        }
    }

    Ok(())
}
