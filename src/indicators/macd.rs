// =============================================================================
// MACD (Moving Average Convergence Divergence) - 12 / 26 / 9
// =============================================================================
//
// MACD line = EMA(fast) - EMA(slow), aligned on the slow EMA's first index.
// Signal    = EMA(signal) of the MACD line.
// Histogram = last MACD - last signal.
//
// EMA(fast) starts `slow - fast` elements earlier than EMA(slow), so the
// fast series is read with that offset when building the MACD line.
// =============================================================================

use serde::{Deserialize, Serialize};

use super::math::{ema, round_ratio};
use crate::types::Bias;

pub const FAST_PERIOD: usize = 12;
pub const SLOW_PERIOD: usize = 26;
pub const SIGNAL_PERIOD: usize = 9;

/// Shortest series that can produce a signal line with default periods.
pub const MIN_POINTS: usize = SLOW_PERIOD + SIGNAL_PERIOD;

/// Latest MACD values, all rounded to 4 dp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacdResult {
    pub macd_line: f64,
    pub signal_line: f64,
    pub histogram: f64,
    pub signal: Bias,
}

/// MACD with the default 12 / 26 / 9 periods.
pub fn calculate_macd(closes: &[f64]) -> Option<MacdResult> {
    calculate_macd_with(closes, FAST_PERIOD, SLOW_PERIOD, SIGNAL_PERIOD)
}

/// Compute the latest MACD reading.
///
/// Returns `None` when:
/// - `fast == 0`, `signal == 0` or `fast >= slow`.
/// - Fewer than `slow + signal` closes.
/// - The aligned MACD line is shorter than `signal` (possible only when an
///   EMA series was truncated by non-finite input).
///
/// The classification uses the unrounded histogram; only the emitted fields
/// are rounded.  A low-priced asset can therefore report a histogram of
/// `0.0` together with a `bullish` or `bearish` signal.
pub fn calculate_macd_with(
    closes: &[f64],
    fast: usize,
    slow: usize,
    signal: usize,
) -> Option<MacdResult> {
    if fast == 0 || signal == 0 || fast >= slow || closes.len() < slow + signal {
        return None;
    }

    let fast_ema = ema(closes, fast);
    let slow_ema = ema(closes, slow);

    let offset = slow - fast;
    let macd_line: Vec<f64> = slow_ema
        .iter()
        .zip(fast_ema.get(offset..)?)
        .map(|(s, f)| f - s)
        .collect();

    if macd_line.len() < signal {
        return None;
    }

    let signal_series = ema(&macd_line, signal);
    let last_macd = *macd_line.last()?;
    let last_signal = *signal_series.last()?;
    let histogram = last_macd - last_signal;

    Some(MacdResult {
        macd_line: round_ratio(last_macd),
        signal_line: round_ratio(last_signal),
        histogram: round_ratio(histogram),
        signal: Bias::from_sign(histogram),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometric(n: usize, start: f64, rate: f64) -> Vec<f64> {
        (0..n).map(|i| start * (1.0 + rate).powi(i as i32)).collect()
    }

    #[test]
    fn macd_minimum_length_boundary() {
        let closes = geometric(35, 100.0, 0.01);
        assert!(calculate_macd(&closes).is_some());
        assert!(calculate_macd(&closes[..34]).is_none());
    }

    #[test]
    fn macd_accelerating_uptrend_is_bullish() {
        let result = calculate_macd(&geometric(60, 100.0, 0.02)).unwrap();
        assert!(result.macd_line > 0.0);
        assert!(result.histogram > 0.0);
        assert_eq!(result.signal, Bias::Bullish);
    }

    #[test]
    fn macd_accelerating_downtrend_is_bearish() {
        let closes: Vec<f64> = geometric(60, 10.0, 0.05).iter().map(|g| 1000.0 - g).collect();
        let result = calculate_macd(&closes).unwrap();
        assert!(result.macd_line < 0.0);
        assert_eq!(result.signal, Bias::Bearish);
    }

    #[test]
    fn macd_flat_series_is_neutral() {
        let result = calculate_macd(&[50.0; 40]).unwrap();
        assert_eq!(result.macd_line, 0.0);
        assert_eq!(result.histogram, 0.0);
        assert_eq!(result.signal, Bias::Neutral);
    }

    #[test]
    fn macd_histogram_matches_lines() {
        let closes: Vec<f64> = (0..80)
            .map(|i| 100.0 + (i as f64 * 0.3).sin() * 5.0 + i as f64 * 0.1)
            .collect();
        let result = calculate_macd(&closes).unwrap();
        let diff = result.macd_line - result.signal_line;
        assert!((diff - result.histogram).abs() <= 2e-4);
        assert_ne!(result.histogram, 0.0);
        assert_eq!(result.signal, Bias::from_sign(result.histogram));
    }

    #[test]
    fn macd_sub_cent_uptrend_is_bullish() {
        // Histogram is ~2.25e-7: rounds to 0.0 but still classifies.
        let result = calculate_macd(&geometric(60, 0.00001, 0.02)).unwrap();
        assert_eq!(result.histogram, 0.0);
        assert_eq!(result.macd_line, 0.0);
        assert_eq!(result.signal, Bias::Bullish);
    }

    #[test]
    fn macd_sub_cent_downtrend_is_bearish() {
        let closes: Vec<f64> = geometric(60, 0.00001, 0.05).iter().map(|g| 0.001 - g).collect();
        let result = calculate_macd(&closes).unwrap();
        assert_eq!(result.histogram, 0.0);
        assert_eq!(result.signal, Bias::Bearish);
    }

    #[test]
    fn macd_rejects_bad_periods() {
        let closes = geometric(60, 100.0, 0.01);
        assert!(calculate_macd_with(&closes, 0, 26, 9).is_none());
        assert!(calculate_macd_with(&closes, 26, 12, 9).is_none());
        assert!(calculate_macd_with(&closes, 12, 26, 0).is_none());
    }
}
