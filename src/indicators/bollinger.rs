// =============================================================================
// Bollinger Bands
// =============================================================================
//
// Middle band = SMA(period), upper / lower = middle ± k·σ where σ is the
// population standard deviation over the same window.  Bandwidth is the
// normalised distance (upper - lower) / middle, reported as a ratio.
//
// The current price is classified against the bands in this order:
//   > upper      => above_upper
//   > middle + σ => near_upper
//   < lower      => below_lower
//   < middle - σ => near_lower
//   otherwise    => middle

use serde::{Deserialize, Serialize};

use super::math::{round_price, round_ratio, sma, std_dev};
use crate::types::BandPosition;

pub const BOLLINGER_PERIOD: usize = 20;
pub const BOLLINGER_STD: f64 = 2.0;

/// Result of a Bollinger Band calculation.  Band levels are rounded to 2 dp,
/// bandwidth to 4 dp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BollingerBands {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
    pub bandwidth: f64,
    pub position: BandPosition,
}

/// Bollinger Bands (20, 2σ) for `closes`, classified against the last close.
pub fn calculate_bollinger(closes: &[f64]) -> Option<BollingerBands> {
    calculate_bollinger_with(closes, BOLLINGER_PERIOD, BOLLINGER_STD)
}

/// Returns `None` when there are fewer than `period` closes.  A middle band
/// of zero reports a bandwidth of 0 instead of dividing by zero.
pub fn calculate_bollinger_with(
    closes: &[f64],
    period: usize,
    num_std: f64,
) -> Option<BollingerBands> {
    let middle = sma(closes, period)?;
    let sigma = std_dev(closes, period)?;
    let current = *closes.last()?;

    let upper = middle + num_std * sigma;
    let lower = middle - num_std * sigma;
    let bandwidth = if middle > 0.0 {
        (upper - lower) / middle
    } else {
        0.0
    };

    Some(BollingerBands {
        upper: round_price(upper),
        middle: round_price(middle),
        lower: round_price(lower),
        bandwidth: round_ratio(bandwidth),
        position: classify(current, middle, sigma, upper, lower),
    })
}

fn classify(price: f64, middle: f64, sigma: f64, upper: f64, lower: f64) -> BandPosition {
    if price > upper {
        BandPosition::AboveUpper
    } else if price > middle + sigma {
        BandPosition::NearUpper
    } else if price < lower {
        BandPosition::BelowLower
    } else if price < middle - sigma {
        BandPosition::NearLower
    } else {
        BandPosition::Middle
    }
}
