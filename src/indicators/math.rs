// =============================================================================
// Indicator primitives - SMA, EMA, population standard deviation
// =============================================================================
//
// EMA formula:
//   multiplier = 2 / (period + 1)
//   EMA_t      = value_t * multiplier + EMA_{t-1} * (1 - multiplier)
//
// The very first EMA value is seeded with the SMA of the first `period`
// values.  SMA and standard deviation both look at the *last* `period`
// values of the slice.
// =============================================================================

/// Arithmetic mean of the last `period` values.
///
/// Returns `None` when `period == 0` or the slice is shorter than `period`.
pub fn sma(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 || values.len() < period {
        return None;
    }
    let window = &values[values.len() - period..];
    Some(window.iter().sum::<f64>() / period as f64)
}

/// Compute the full EMA series for `values` and look-back `period`.
///
/// Each output element corresponds to an input starting at index
/// `period - 1`, so the result has `values.len() - period + 1` elements.
///
/// # Edge cases
/// - `period == 0` => empty vec
/// - `values.len() < period` => empty vec
/// - A non-finite intermediate value truncates the series.
pub fn ema(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || values.len() < period {
        return Vec::new();
    }

    let multiplier = 2.0 / (period + 1) as f64;

    let seed: f64 = values[..period].iter().sum::<f64>() / period as f64;
    if !seed.is_finite() {
        return Vec::new();
    }

    let mut result = Vec::with_capacity(values.len() - period + 1);
    result.push(seed);

    let mut prev = seed;
    for &value in &values[period..] {
        let next = value * multiplier + prev * (1.0 - multiplier);
        if !next.is_finite() {
            break;
        }
        result.push(next);
        prev = next;
    }

    result
}

/// Population standard deviation (divides by `period`) of the last `period`
/// values.
pub fn std_dev(values: &[f64], period: usize) -> Option<f64> {
    let mean = sma(values, period)?;
    let window = &values[values.len() - period..];
    let variance = window.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / period as f64;
    Some(variance.sqrt())
}

/// Round half-up to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor + 0.5).floor() / factor
}

/// Price-scale precision (2 dp).
pub fn round_price(value: f64) -> f64 {
    round_to(value, 2)
}

/// Ratio / oscillator-scale precision (4 dp).
pub fn round_ratio(value: f64) -> f64 {
    round_to(value, 4)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ---- sma -------------------------------------------------------------

    #[test]
    fn sma_uses_last_window() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(sma(&values, 2), Some(4.5));
        assert_eq!(sma(&values, 5), Some(3.0));
    }

    #[test]
    fn sma_insufficient_data() {
        assert!(sma(&[1.0, 2.0], 3).is_none());
        assert!(sma(&[], 1).is_none());
        assert!(sma(&[1.0], 0).is_none());
    }

    // ---- ema -------------------------------------------------------------

    #[test]
    fn ema_seed_is_sma_of_first_period() {
        let values = [3.0, 7.0, 2.0, 9.0, 4.0, 8.0];
        let series = ema(&values, 4);
        assert_eq!(series.len(), 3);
        assert_eq!(series[0], sma(&values[..4], 4).unwrap());
    }

    #[test]
    fn ema_known_values() {
        let values: Vec<f64> = (1..=10).map(|x| x as f64).collect();
        let series = ema(&values, 5);
        assert_eq!(series.len(), 6);

        let mult = 2.0 / 6.0;
        let mut expected = 3.0;
        let mut expected_vec = vec![expected];
        for &v in &values[5..] {
            expected = v * mult + expected * (1.0 - mult);
            expected_vec.push(expected);
        }
        for (a, b) in series.iter().zip(expected_vec.iter()) {
            assert!((a - b).abs() < 1e-10, "got {a}, expected {b}");
        }
    }

    #[test]
    fn ema_insufficient_data() {
        assert!(ema(&[1.0, 2.0], 5).is_empty());
        assert!(ema(&[1.0, 2.0], 0).is_empty());
    }

    #[test]
    fn ema_truncates_on_nan() {
        let values = [1.0, 2.0, 3.0, f64::NAN, 5.0];
        assert_eq!(ema(&values, 3).len(), 1);
    }

    // ---- std_dev ---------------------------------------------------------

    #[test]
    fn std_dev_is_population() {
        // mean 5, squared deviations sum to 32, / 8 = 4 => sigma 2
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let sd = std_dev(&values, 8).unwrap();
        assert!((sd - 2.0).abs() < 1e-12);
    }

    #[test]
    fn std_dev_flat_is_zero() {
        assert_eq!(std_dev(&[5.0; 20], 20), Some(0.0));
        assert!(std_dev(&[5.0; 3], 20).is_none());
    }

    // ---- rounding --------------------------------------------------------

    #[test]
    fn rounding_is_half_up() {
        assert_eq!(round_to(2.5, 0), 3.0);
        assert_eq!(round_to(-2.5, 0), -2.0);
        assert_eq!(round_price(1.234), 1.23);
        assert_eq!(round_ratio(0.123_456), 0.1235);
    }
}
