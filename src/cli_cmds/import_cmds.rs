use anyhow::{bail, Result};
use std::path::Path;

use crate::catalog::{CatalogStore, JsonCatalog};

pub fn cmd_import(catalog_path: &Path, source: &Path) -> Result<()> {
    if !source.exists() {
        bail!("Import source not found: {}", source.display());
    }

    let mut catalog = JsonCatalog::load(catalog_path)?;
    let stats = catalog.import(source)?;
    catalog.save()?;

    println!(
        "✓ Imported {} new and {} updated colors from {} file(s)",
        stats.added, stats.replaced, stats.files
    );
    println!("  Catalog: {} ({} colors)", catalog_path.display(), catalog.len());
    let brands = catalog.brands()?;
    if !brands.is_empty() {
        println!("  Brands: {}", brands.join(", "));
    }
    Ok(())
}
