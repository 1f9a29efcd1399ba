//! Nearest-color matching against the catalog.

use crate::catalog::CatalogColor;
use crate::color::{distance, hex_to_rgb, rgb_distance};
use serde::Serialize;
use std::collections::HashSet;

/// A target color paired with the catalog color chosen for it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub target: String,
    pub color: CatalogColor,
    pub distance: f64,
}

/// A catalog color ranked by closeness to a source color
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Equivalent {
    #[serde(flatten)]
    pub color: CatalogColor,
    pub distance: f64,
}

/// Assign each target its nearest catalog color that no earlier target took.
///
/// Greedy in target order: an early target can take the color a later one
/// would have preferred. Ties go to the first catalog entry. Targets left
/// with no valid candidate are dropped, so the result can be shorter than
/// `targets`.
pub fn allocate<S: AsRef<str>>(targets: &[S], catalog: &[CatalogColor]) -> Vec<MatchResult> {
    // Parse catalog hexes once; invalid ones can never match.
    let parsed: Vec<_> = catalog.iter().map(|c| hex_to_rgb(&c.hex)).collect();
    let mut used: HashSet<u64> = HashSet::with_capacity(targets.len());
    let mut matches = Vec::with_capacity(targets.len().min(catalog.len()));

    for target in targets {
        let target = target.as_ref();
        let Some(target_rgb) = hex_to_rgb(target) else {
            tracing::debug!(target, "skipping unparsable target color");
            continue;
        };

        let mut best: Option<(usize, f64)> = None;
        for (idx, candidate) in catalog.iter().enumerate() {
            if used.contains(&candidate.id) {
                continue;
            }
            let Some(rgb) = parsed[idx] else {
                continue;
            };
            let d = rgb_distance(target_rgb, rgb);
            if best.map_or(true, |(_, best_d)| d < best_d) {
                best = Some((idx, d));
            }
        }

        if let Some((idx, d)) = best {
            let color = catalog[idx].clone();
            used.insert(color.id);
            matches.push(MatchResult {
                target: target.to_string(),
                color,
                distance: d,
            });
        }
    }

    matches
}

/// Rank `candidates` by distance to `source`, closest first, keeping `limit`.
///
/// Candidates with an unparsable hex sort last (infinite distance).
pub fn equivalents(
    source: &CatalogColor,
    candidates: &[CatalogColor],
    limit: usize,
) -> Vec<Equivalent> {
    let mut ranked: Vec<Equivalent> = candidates
        .iter()
        .map(|c| Equivalent {
            distance: distance(&source.hex, &c.hex),
            color: c.clone(),
        })
        .collect();

    // Stable, so equal distances keep catalog order.
    ranked.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    ranked.truncate(limit);
    ranked
}
