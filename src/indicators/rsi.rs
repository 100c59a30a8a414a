// =============================================================================
// Relative Strength Index (RSI) - Wilder's Smoothing over a bounded window
// =============================================================================
//
// Step 1: Compute price changes (deltas) from consecutive closes.
// Step 2: Keep only the last `3 * period` deltas so the reading reflects
//         recent action rather than the whole history.
// Step 3: Seed average gain / average loss with the mean of the first
//         `period` gains / losses of that window.
// Step 4: Apply Wilder's smoothing for every remaining delta:
//           avg_gain = (prev_avg_gain * (period - 1) + current_gain) / period
//           avg_loss = (prev_avg_loss * (period - 1) + current_loss) / period
// Step 5: RS  = avg_gain / avg_loss
//         RSI = 100 - 100 / (1 + RS)
//
// Thresholds:  RSI >= 70 => overbought,  RSI <= 30 => oversold.
// =============================================================================

use serde::{Deserialize, Serialize};

use super::math::round_price;
use crate::types::RsiSignal;

pub const RSI_PERIOD: usize = 14;
pub const OVERBOUGHT: f64 = 70.0;
pub const OVERSOLD: f64 = 30.0;

/// Number of periods' worth of deltas fed into the smoothing.
const SMOOTHING_SPAN: usize = 3;

/// Latest RSI value (2 dp) and its zone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RsiReading {
    pub value: f64,
    pub signal: RsiSignal,
}

/// Compute the current RSI for `closes` with the given `period`.
///
/// # Edge cases
/// - `period == 0` => `None`
/// - `closes.len() < period + 1` => `None` (need at least `period` deltas)
/// - Average loss of zero (no down moves, including a perfectly flat
///   series) yields exactly 100.0.
pub fn calculate_rsi(closes: &[f64], period: usize) -> Option<RsiReading> {
    if period == 0 || closes.len() < period + 1 {
        return None;
    }

    let deltas: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();
    let window = &deltas[deltas.len().saturating_sub(period * SMOOTHING_SPAN)..];

    let (sum_gain, sum_loss) = window[..period].iter().fold((0.0_f64, 0.0_f64), |(g, l), &d| {
        if d > 0.0 {
            (g + d, l)
        } else {
            (g, l + d.abs())
        }
    });

    let period_f = period as f64;
    let mut avg_gain = sum_gain / period_f;
    let mut avg_loss = sum_loss / period_f;

    for &delta in &window[period..] {
        let gain = if delta > 0.0 { delta } else { 0.0 };
        let loss = if delta < 0.0 { delta.abs() } else { 0.0 };

        avg_gain = (avg_gain * (period_f - 1.0) + gain) / period_f;
        avg_loss = (avg_loss * (period_f - 1.0) + loss) / period_f;
    }

    let value = rsi_from_averages(avg_gain, avg_loss);
    Some(RsiReading {
        value,
        signal: classify(value),
    })
}

/// RSI with the default 14-period window.
pub fn current_rsi(closes: &[f64]) -> Option<RsiReading> {
    calculate_rsi(closes, RSI_PERIOD)
}

/// Zone for an already-rounded RSI value.
pub fn classify(value: f64) -> RsiSignal {
    if value >= OVERBOUGHT {
        RsiSignal::Overbought
    } else if value <= OVERSOLD {
        RsiSignal::Oversold
    } else {
        RsiSignal::Neutral
    }
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    round_price(100.0 - 100.0 / (1.0 + rs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rsi_empty_input() {
        assert!(calculate_rsi(&[], 14).is_none());
    }

    #[test]
    fn rsi_period_zero() {
        assert!(calculate_rsi(&[1.0, 2.0, 3.0], 0).is_none());
    }

    #[test]
    fn rsi_insufficient_data() {
        // 14 closes => 13 deltas < 14.
        let closes: Vec<f64> = (1..=14).map(|x| x as f64).collect();
        assert!(calculate_rsi(&closes, 14).is_none());

        let closes: Vec<f64> = (1..=15).map(|x| x as f64).collect();
        assert!(calculate_rsi(&closes, 14).is_some());
    }

    #[test]
    fn rsi_all_gains() {
        let closes: Vec<f64> = (1..=30).map(|x| x as f64).collect();
        let reading = current_rsi(&closes).unwrap();
        assert_eq!(reading.value, 100.0);
        assert_eq!(reading.signal, RsiSignal::Overbought);
    }

    #[test]
    fn rsi_all_losses() {
        let closes: Vec<f64> = (1..=30).rev().map(|x| x as f64).collect();
        let reading = current_rsi(&closes).unwrap();
        assert_eq!(reading.value, 0.0);
        assert_eq!(reading.signal, RsiSignal::Oversold);
    }

    #[test]
    fn rsi_flat_market_hits_zero_loss_guard() {
        // Zero gains and zero losses: the zero-loss guard reports 100.
        let reading = current_rsi(&[100.0; 30]).unwrap();
        assert_eq!(reading.value, 100.0);
        assert_eq!(reading.signal, RsiSignal::Overbought);
    }

    #[test]
    fn rsi_equal_up_down_moves_is_fifty() {
        // Alternating +1 / -1 with an even number of deltas in the window.
        let closes: Vec<f64> = (0..43).map(|i| if i % 2 == 0 { 10.0 } else { 11.0 }).collect();
        let reading = current_rsi(&closes).unwrap();
        assert!((reading.value - 50.0).abs() < 5.0, "got {}", reading.value);
        assert_eq!(reading.signal, RsiSignal::Neutral);
    }

    #[test]
    fn rsi_window_ignores_old_history() {
        // A crash far in the past must not influence a reading taken after
        // 3 * period deltas of steady gains.
        let mut closes: Vec<f64> = (0..50).map(|i| 1000.0 - i as f64 * 15.0).collect();
        let last = *closes.last().unwrap();
        closes.extend((1..=42).map(|i| last + i as f64));
        let reading = current_rsi(&closes).unwrap();
        assert_eq!(reading.value, 100.0);
    }

    #[test]
    fn rsi_range_check() {
        let closes = vec![
            44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08, 45.89, 46.03,
            44.18, 44.22, 44.57, 43.42, 42.66, 43.13,
        ];
        let reading = current_rsi(&closes).unwrap();
        assert!((0.0..=100.0).contains(&reading.value));
        // Value is emitted at 2 dp.
        assert_eq!(reading.value, round_price(reading.value));
    }

    #[test]
    fn classify_thresholds_are_inclusive() {
        assert_eq!(classify(70.0), RsiSignal::Overbought);
        assert_eq!(classify(69.99), RsiSignal::Neutral);
        assert_eq!(classify(30.0), RsiSignal::Oversold);
        assert_eq!(classify(30.01), RsiSignal::Neutral);
    }
}
