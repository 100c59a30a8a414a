// =============================================================================
// Support / Resistance - clustered local extrema
// =============================================================================
//
// 1. Scan every close that has two neighbours on each side.  A close that is
//    <= all four neighbours is a local minimum, >= all four a local maximum
//    (plateaus count on both sides).
// 2. Cluster each set: sort ascending, then greedily append a level to the
//    running cluster while it sits within 2 % of that cluster's mean.
// 3. Collapse clusters to their mean (2 dp), sort descending, keep 3.
// 4. Support = the first 2 cluster levels strictly below the last close,
//    resistance = the first 2 strictly above it.
// =============================================================================

use serde::{Deserialize, Serialize};

use super::math::round_price;

pub const MIN_POINTS: usize = 10;
const HALF_WINDOW: usize = 2;
const CLUSTER_TOLERANCE: f64 = 0.02;
const MAX_CLUSTERS: usize = 3;
const MAX_LEVELS: usize = 2;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SupportResistance {
    pub support: Vec<f64>,
    pub resistance: Vec<f64>,
}

/// Detect support / resistance levels around the last close.
///
/// Fewer than 10 closes yields two empty lists.
pub fn calculate_support_resistance(closes: &[f64]) -> SupportResistance {
    if closes.len() < MIN_POINTS {
        return SupportResistance::default();
    }

    let (minima, maxima) = local_extrema(closes);
    let current = closes[closes.len() - 1];

    SupportResistance {
        support: nearest_levels(cluster(&minima), |level| level < current),
        resistance: nearest_levels(cluster(&maxima), |level| level > current),
    }
}

fn local_extrema(closes: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let mut minima = Vec::new();
    let mut maxima = Vec::new();

    for i in HALF_WINDOW..closes.len() - HALF_WINDOW {
        let price = closes[i];
        let neighbours = closes[i - HALF_WINDOW..i]
            .iter()
            .chain(&closes[i + 1..=i + HALF_WINDOW]);

        let (mut is_min, mut is_max) = (true, true);
        for &n in neighbours {
            is_min &= price <= n;
            is_max &= price >= n;
        }

        if is_min {
            minima.push(price);
        }
        if is_max {
            maxima.push(price);
        }
    }

    (minima, maxima)
}

/// Greedy 2 % clustering.  Returns at most 3 cluster means, highest first.
fn cluster(levels: &[f64]) -> Vec<f64> {
    let mut sorted = levels.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mut clusters: Vec<Vec<f64>> = Vec::new();
    for level in sorted {
        match clusters.last_mut() {
            Some(current) if within_tolerance(level, mean(current)) => current.push(level),
            _ => clusters.push(vec![level]),
        }
    }

    let mut means: Vec<f64> = clusters.iter().map(|c| round_price(mean(c))).collect();
    means.sort_by(|a, b| b.total_cmp(a));
    means.truncate(MAX_CLUSTERS);
    means
}

fn within_tolerance(level: f64, avg: f64) -> bool {
    // A zero-mean cluster has no relative tolerance; it never absorbs.
    if avg == 0.0 {
        return false;
    }
    ((level - avg) / avg).abs() < CLUSTER_TOLERANCE
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn nearest_levels(levels: Vec<f64>, keep: impl Fn(f64) -> bool) -> Vec<f64> {
    levels.into_iter().filter(|&l| keep(l)).take(MAX_LEVELS).collect()
}
