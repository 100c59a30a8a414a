// =============================================================================
// Moving Average Set - SMA(20), SMA(50), EMA(12), EMA(26) and cross flags
// =============================================================================
//
// Golden cross:  SMA20 was below SMA50 `CROSS_LOOKBACK` points ago and is
//                above it now.
// Death cross:   the mirror condition.
//
// Each average is independently nullable; a missing SMA leaves the matching
// `price_vs_*` field empty rather than guessing a side.

use serde::{Deserialize, Serialize};

use super::math::{ema, round_price, sma};
use crate::types::PriceVsMa;

pub const SHORT_SMA: usize = 20;
pub const LONG_SMA: usize = 50;
pub const FAST_EMA: usize = 12;
pub const SLOW_EMA: usize = 26;

/// How many trailing points are dropped to get the "previous" SMA pair.
pub const CROSS_LOOKBACK: usize = 5;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovingAverageSet {
    pub sma_20: Option<f64>,
    pub sma_50: Option<f64>,
    pub ema_12: Option<f64>,
    pub ema_26: Option<f64>,
    pub price_vs_sma20: Option<PriceVsMa>,
    pub price_vs_sma50: Option<PriceVsMa>,
    pub golden_cross: bool,
    pub death_cross: bool,
}

/// Compute the moving-average set against the last close.
pub fn calculate_moving_averages(closes: &[f64]) -> MovingAverageSet {
    let Some(&current) = closes.last() else {
        return MovingAverageSet::default();
    };

    let sma20 = sma(closes, SHORT_SMA);
    let sma50 = sma(closes, LONG_SMA);
    let ema12 = ema(closes, FAST_EMA).last().copied();
    let ema26 = ema(closes, SLOW_EMA).last().copied();

    let (golden_cross, death_cross) = detect_cross(closes, sma20, sma50);

    MovingAverageSet {
        sma_20: sma20.map(round_price),
        sma_50: sma50.map(round_price),
        ema_12: ema12.map(round_price),
        ema_26: ema26.map(round_price),
        price_vs_sma20: sma20.map(|avg| price_vs(current, avg)),
        price_vs_sma50: sma50.map(|avg| price_vs(current, avg)),
        golden_cross,
        death_cross,
    }
}

/// `Above` when the price is at or over the average.
pub fn price_vs(price: f64, average: f64) -> PriceVsMa {
    if price >= average {
        PriceVsMa::Above
    } else {
        PriceVsMa::Below
    }
}

fn detect_cross(closes: &[f64], sma20: Option<f64>, sma50: Option<f64>) -> (bool, bool) {
    if closes.len() < LONG_SMA + CROSS_LOOKBACK {
        return (false, false);
    }

    let previous = &closes[..closes.len() - CROSS_LOOKBACK];
    match (sma(previous, SHORT_SMA), sma(previous, LONG_SMA), sma20, sma50) {
        (Some(prev_short), Some(prev_long), Some(short), Some(long)) => (
            prev_short < prev_long && short > long,
            prev_short > prev_long && short < long,
        ),
        _ => (false, false),
    }
}
