//! Dominant color extraction from wallpaper images.
//!
//! Images are shrunk to a small canvas and subsampled before clustering, so
//! cost is bounded regardless of the source resolution. The main path is a
//! deterministic k-means over the sampled pixels; when the image is too flat
//! to seed enough distinct centroids we fall back to fixed-step quantization
//! with a greedy distance filter.

use std::path::Path;

use image::imageops::FilterType;

use crate::color::Rgb;
use crate::error::ThemeError;

const CANVAS: u32 = 150;
const SAMPLE_STRIDE: usize = 10;
const KMEANS_ROUNDS: usize = 20;
const QUANT_STEP: u8 = 32;
const DISTINCT_DISTANCE: u32 = 60;

pub const DEFAULT_COLOR_COUNT: usize = 12;

/// Extract up to `n` representative colors from the image at `path`.
///
/// The k-means path orders colors by cluster population, most common first.
/// The fallback path keeps only visually distinct colors and does not
/// guarantee population order. Degenerate images may yield fewer than `n`.
pub fn extract_dominant_colors(path: &Path, n: usize) -> Result<Vec<Rgb>, ThemeError> {
    let img = image::open(path).map_err(|source| ThemeError::ImageDecode {
        path: path.to_path_buf(),
        source,
    })?;

    let small = img.resize_exact(CANVAS, CANVAS, FilterType::Nearest).to_rgb8();
    let samples: Vec<Rgb> = small
        .pixels()
        .step_by(SAMPLE_STRIDE)
        .map(|p| Rgb::new(p.0[0], p.0[1], p.0[2]))
        .collect();

    Ok(cluster_colors(&samples, n))
}

/// Cluster sampled pixels into at most `n` representative colors.
pub fn cluster_colors(samples: &[Rgb], n: usize) -> Vec<Rgb> {
    if samples.is_empty() || n == 0 {
        return Vec::new();
    }

    match kmeans(samples, n) {
        Some(colors) => colors,
        None => quantize_fallback(samples, n),
    }
}

fn manhattan(a: Rgb, b: Rgb) -> u32 {
    a.r.abs_diff(b.r) as u32 + a.g.abs_diff(b.g) as u32 + a.b.abs_diff(b.b) as u32
}

fn squared_distance(a: Rgb, b: Rgb) -> u64 {
    let dr = a.r as i64 - b.r as i64;
    let dg = a.g as i64 - b.g as i64;
    let db = a.b as i64 - b.b as i64;
    (dr * dr + dg * dg + db * db) as u64
}

/// Deterministic k-means: centroids seeded from evenly spaced distinct
/// samples, a bounded number of Lloyd iterations, result ordered by cluster
/// population. Returns `None` when fewer than `k` distinct seeds exist.
fn kmeans(samples: &[Rgb], k: usize) -> Option<Vec<Rgb>> {
    let mut centroids: Vec<Rgb> = Vec::with_capacity(k);
    let stride = (samples.len() / k).max(1);
    for candidate in samples.iter().step_by(stride) {
        if !centroids.contains(candidate) {
            centroids.push(*candidate);
            if centroids.len() == k {
                break;
            }
        }
    }
    if centroids.len() < k {
        // Second pass over every sample before giving up on this path.
        for candidate in samples {
            if !centroids.contains(candidate) {
                centroids.push(*candidate);
                if centroids.len() == k {
                    break;
                }
            }
        }
    }
    if centroids.len() < k {
        return None;
    }

    let mut assignments = vec![0usize; samples.len()];
    for _ in 0..KMEANS_ROUNDS {
        let mut moved = false;
        for (i, sample) in samples.iter().enumerate() {
            let nearest = centroids
                .iter()
                .enumerate()
                .min_by_key(|(_, c)| squared_distance(*sample, **c))
                .map(|(idx, _)| idx)
                .unwrap_or(0);
            if assignments[i] != nearest {
                assignments[i] = nearest;
                moved = true;
            }
        }

        let mut sums = vec![(0u64, 0u64, 0u64, 0u64); k];
        for (sample, &cluster) in samples.iter().zip(&assignments) {
            let entry = &mut sums[cluster];
            entry.0 += sample.r as u64;
            entry.1 += sample.g as u64;
            entry.2 += sample.b as u64;
            entry.3 += 1;
        }
        for (centroid, (r, g, b, count)) in centroids.iter_mut().zip(&sums) {
            if *count > 0 {
                *centroid = Rgb::new(
                    (r / count) as u8,
                    (g / count) as u8,
                    (b / count) as u8,
                );
            }
        }

        if !moved {
            break;
        }
    }

    let mut populations = vec![0usize; k];
    for &cluster in &assignments {
        populations[cluster] += 1;
    }

    let mut ordered: Vec<(usize, Rgb)> = populations.into_iter().zip(centroids).collect();
    ordered.sort_by(|a, b| b.0.cmp(&a.0));
    Some(ordered.into_iter().filter(|(pop, _)| *pop > 0).map(|(_, c)| c).collect())
}

/// Quantize channels to fixed steps, count buckets, then greedily keep
/// candidates that sit far enough (Manhattan distance > 60) from everything
/// already chosen.
fn quantize_fallback(samples: &[Rgb], n: usize) -> Vec<Rgb> {
    let mut counts: Vec<(Rgb, usize)> = Vec::new();
    for sample in samples {
        let q = Rgb::new(
            sample.r / QUANT_STEP * QUANT_STEP,
            sample.g / QUANT_STEP * QUANT_STEP,
            sample.b / QUANT_STEP * QUANT_STEP,
        );
        match counts.iter_mut().find(|(c, _)| *c == q) {
            Some((_, count)) => *count += 1,
            None => counts.push((q, 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    let mut chosen: Vec<Rgb> = Vec::with_capacity(n);
    for (candidate, _) in counts.into_iter().take(n * 2) {
        if chosen.len() >= n {
            break;
        }
        if chosen.is_empty()
            || chosen.iter().all(|c| manhattan(candidate, *c) > DISTINCT_DISTANCE)
        {
            chosen.push(candidate);
        }
    }
    chosen
}
