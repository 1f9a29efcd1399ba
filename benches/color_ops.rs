use criterion::{black_box, criterion_group, criterion_main, Criterion};

// The crate is binary-only, so pull the pure modules in by path.
#[allow(dead_code)]
#[path = "../src/color.rs"]
mod color;
#[allow(dead_code)]
#[path = "../src/code.rs"]
mod code;

use color::{distance, hex_to_hsl, hex_to_rgb, rgb_distance};

/// Same greedy walk as the allocator, over bare hex strings.
fn allocate(targets: &[String], catalog: &[String]) -> Vec<usize> {
    let parsed: Vec<_> = catalog.iter().map(|h| hex_to_rgb(h)).collect();
    let mut used = vec![false; catalog.len()];
    let mut picks = Vec::with_capacity(targets.len());

    for target in targets {
        let Some(t) = hex_to_rgb(target) else {
            continue;
        };
        let mut best: Option<(usize, f64)> = None;
        for (idx, rgb) in parsed.iter().enumerate() {
            if used[idx] {
                continue;
            }
            let Some(rgb) = rgb else {
                continue;
            };
            let d = rgb_distance(t, *rgb);
            if best.map_or(true, |(_, bd)| d < bd) {
                best = Some((idx, d));
            }
        }
        if let Some((idx, _)) = best {
            used[idx] = true;
            picks.push(idx);
        }
    }
    picks
}

/// A 320-entry catalog spread over the RGB cube.
fn synthetic_catalog() -> Vec<String> {
    (0..320u32)
        .map(|i| {
            let r = (i * 37 % 256) as u8;
            let g = (i * 91 % 256) as u8;
            let b = (i * 173 % 256) as u8;
            format!("#{r:02X}{g:02X}{b:02X}")
        })
        .collect()
}

fn bench_hex_to_rgb(c: &mut Criterion) {
    c.bench_function("hex_to_rgb", |b| {
        b.iter(|| hex_to_rgb(black_box("#FF5733")))
    });
}

fn bench_hex_to_hsl(c: &mut Criterion) {
    c.bench_function("hex_to_hsl", |b| {
        b.iter(|| hex_to_hsl(black_box("#FF5733")))
    });
}

fn bench_distance(c: &mut Criterion) {
    c.bench_function("distance", |b| {
        b.iter(|| distance(black_box("#FF5733"), black_box("#3357FF")))
    });
}

fn bench_parse_codes(c: &mut Criterion) {
    c.bench_function("parse_strict_loose", |b| {
        b.iter(|| {
            (
                code::parse_strict(black_box("YG312")),
                code::parse_loose(black_box("Y120")),
            )
        })
    });
}

fn bench_allocate(c: &mut Criterion) {
    let catalog = synthetic_catalog();
    let targets: Vec<String> = [
        "#FFD1DC", "#E0BBE4", "#FFDFD3", "#C3E6E8", "#B4E7CE", "#F8B4D9", "#D4F1F4", "#FFF0E1",
        "#E6E6FA", "#F0E68C", "#FFE4E1", "#F5DEB3",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    c.bench_function("allocate_12x320", |b| {
        b.iter(|| allocate(black_box(&targets), black_box(&catalog)))
    });
}

criterion_group!(
    benches,
    bench_hex_to_rgb,
    bench_hex_to_hsl,
    bench_distance,
    bench_parse_codes,
    bench_allocate,
);
criterion_main!(benches);
