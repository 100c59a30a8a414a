// =============================================================================
// Volume Trend
// =============================================================================
//
// Compares the last 3 volumes against the 7-period average:
//   recent3 > avg7 * 1.10 => increasing
//   recent3 < avg7 * 0.90 => decreasing
//   otherwise             => stable

use serde::{Deserialize, Serialize};

use super::math::{round_price, round_to, sma};
use crate::types::VolumeTrend;

pub const VOLUME_WINDOW: usize = 7;
pub const RECENT_WINDOW: usize = 3;
const TREND_BAND: f64 = 0.10;

/// Volume summary.  Volumes are reported in whole units, the change in
/// percent at 2 dp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumeAnalysis {
    pub avg_volume_7d: f64,
    pub current_volume: f64,
    pub volume_change_pct: f64,
    pub volume_trend: VolumeTrend,
}

/// Returns `None` with fewer than 7 volume points.
pub fn calculate_volume_analysis(volumes: &[f64]) -> Option<VolumeAnalysis> {
    let avg7 = sma(volumes, VOLUME_WINDOW)?;
    let recent3 = sma(volumes, RECENT_WINDOW)?;
    let current = *volumes.last()?;

    let change_pct = if avg7 > 0.0 {
        (current - avg7) / avg7 * 100.0
    } else {
        0.0
    };

    let volume_trend = if recent3 > avg7 * (1.0 + TREND_BAND) {
        VolumeTrend::Increasing
    } else if recent3 < avg7 * (1.0 - TREND_BAND) {
        VolumeTrend::Decreasing
    } else {
        VolumeTrend::Stable
    };

    Some(VolumeAnalysis {
        avg_volume_7d: round_to(avg7, 0),
        current_volume: round_to(current, 0),
        volume_change_pct: round_price(change_pct),
        volume_trend,
    })
}
