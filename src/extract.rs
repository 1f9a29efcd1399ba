//! Dominant colors of an image
//!
//! Pixels are converted to Lab and clustered with k-means; centroids are
//! returned as hex, most common first.

use crate::color::{rgb_to_hex, Rgb};
use anyhow::{bail, Context, Result};
use image::imageops::FilterType;
use image::DynamicImage;
use kmeans_colors::get_kmeans_hamerly;
use palette::{IntoColor, Lab, Srgb};
use rayon::prelude::*;
use std::collections::HashSet;
use std::path::Path;

/// Number of clusters asked of the image before matching.
pub const EXTRACTED_COLORS: usize = 8;

const CONVERGENCE_THRESHOLD: f32 = 5.0;
const MAX_ITERATIONS: usize = 30;
const THUMBNAIL_SIZE: u32 = 128;
const SEED: u64 = 0;

/// Open `path` and return up to `count` dominant colors.
pub fn dominant_colors(path: &Path, count: usize) -> Result<Vec<String>> {
    let img = image::open(path)
        .with_context(|| format!("Failed to open image: {}", path.display()))?;
    let colors = dominant_colors_of(&img, count)?;
    tracing::debug!(path = %path.display(), found = colors.len(), "extracted image colors");
    Ok(colors)
}

/// Dominant colors of an already decoded image.
pub fn dominant_colors_of(img: &DynamicImage, count: usize) -> Result<Vec<String>> {
    if count == 0 {
        bail!("Color count must be at least 1");
    }

    let thumb = img.resize(THUMBNAIL_SIZE, THUMBNAIL_SIZE, FilterType::Triangle);
    let pixels: Vec<_> = thumb.to_rgb8().pixels().cloned().collect();
    if pixels.is_empty() {
        bail!("Image has no pixels");
    }

    let lab: Vec<Lab> = pixels
        .par_iter()
        .map(|p| {
            let rgb = Srgb::new(
                p.0[0] as f32 / 255.0,
                p.0[1] as f32 / 255.0,
                p.0[2] as f32 / 255.0,
            );
            rgb.into_color()
        })
        .collect();

    // k-means needs at least k distinct points
    let distinct: HashSet<[u8; 3]> = pixels.iter().map(|p| p.0).collect();
    let k = count.min(distinct.len());
    let result = get_kmeans_hamerly(k, MAX_ITERATIONS, CONVERGENCE_THRESHOLD, false, &lab, SEED);

    let mut counts = vec![0usize; result.centroids.len()];
    for &idx in &result.indices {
        counts[idx as usize] += 1;
    }

    let mut weighted: Vec<(String, usize)> = result
        .centroids
        .iter()
        .zip(counts)
        .filter(|(_, n)| *n > 0)
        .map(|(c, n)| {
            let rgb: Srgb = (*c).into_color();
            (rgb_to_hex(to_rgb8(rgb)), n)
        })
        .collect();

    // Most dominant first
    weighted.sort_by(|a, b| b.1.cmp(&a.1));

    let mut colors: Vec<String> = Vec::with_capacity(weighted.len());
    for (hex, _) in weighted {
        if !colors.contains(&hex) {
            colors.push(hex);
        }
    }
    Ok(colors)
}

fn to_rgb8(rgb: Srgb) -> Rgb {
    let channel = |v: f32| (v * 255.0).round().clamp(0.0, 255.0) as u8;
    Rgb {
        r: channel(rgb.red),
        g: channel(rgb.green),
        b: channel(rgb.blue),
    }
}
