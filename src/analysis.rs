// =============================================================================
// Technical Analysis Pipeline
// =============================================================================
//
// raw price / volume series -> independent calculators -> weighted scorer
// -> `TechnicalSignals` record.
//
// Calculators share no state and never fail: a series that is too short for
// an indicator leaves that indicator empty, and the scorer skips it.  The
// record is rebuilt from scratch on every call; caching belongs to the
// history provider, not here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::indicators::{
    calculate_bollinger, calculate_macd, calculate_moving_averages, calculate_support_resistance,
    calculate_volume_analysis, current_rsi, BollingerBands, MacdResult, MovingAverageSet,
    SupportResistance, VolumeAnalysis,
};
use crate::market_data::PriceHistory;
use crate::signals::{SignalInputs, SignalTally, WeightedScorer};
use crate::types::{OverallSignal, RsiSignal};

/// Full technical snapshot for one asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalSignals {
    pub rsi_14: Option<f64>,
    pub rsi_signal: RsiSignal,
    pub macd: Option<MacdResult>,
    pub moving_averages: MovingAverageSet,
    pub bollinger_bands: Option<BollingerBands>,
    pub volume_analysis: Option<VolumeAnalysis>,
    pub support_resistance: SupportResistance,
    pub overall_signal: OverallSignal,
    pub signal_strength: u8,
    /// Raw signed score behind `overall_signal`.
    pub signal_score: f64,
    /// Timestamp of the last price point, when known.
    pub as_of: Option<DateTime<Utc>>,
}

impl TechnicalSignals {
    /// Support / resistance levels for consumers that only need key levels.
    pub fn key_levels(&self) -> (&[f64], &[f64]) {
        (
            &self.support_resistance.support,
            &self.support_resistance.resistance,
        )
    }

    /// Bullish / bearish / neutral vote count across available indicators.
    pub fn tally(&self) -> SignalTally {
        SignalTally::from_signals(self)
    }
}

/// Analyse a price history with the default scoring policy.
pub fn analyze(history: &PriceHistory) -> TechnicalSignals {
    analyze_with(history, &WeightedScorer::default())
}

/// Analyse a price history with a caller-supplied scorer.
pub fn analyze_with(history: &PriceHistory, scorer: &WeightedScorer) -> TechnicalSignals {
    let closes = history.closes();
    let volumes = history.volumes();

    let mut signals = analyze_series(&closes, &volumes, scorer);
    signals.as_of = history.last_timestamp();
    signals
}

/// Analyse bare close and volume series.
pub fn analyze_series(
    closes: &[f64],
    volumes: &[f64],
    scorer: &WeightedScorer,
) -> TechnicalSignals {
    let rsi = current_rsi(closes);
    let macd = calculate_macd(closes);
    let moving_averages = calculate_moving_averages(closes);
    let bollinger_bands = calculate_bollinger(closes);
    let volume_analysis = calculate_volume_analysis(volumes);
    let support_resistance = calculate_support_resistance(closes);

    debug!(
        points = closes.len(),
        volume_points = volumes.len(),
        rsi = rsi.is_some(),
        macd = macd.is_some(),
        bollinger = bollinger_bands.is_some(),
        volume = volume_analysis.is_some(),
        "indicator availability"
    );

    let scoring = scorer.score(&SignalInputs {
        rsi: rsi.map(|r| r.value),
        macd: macd.map(|m| m.signal),
        price_vs_sma20: moving_averages.price_vs_sma20,
        price_vs_sma50: moving_averages.price_vs_sma50,
        band_position: bollinger_bands.map(|b| b.position),
        volume_trend: volume_analysis.map(|v| v.volume_trend),
    });

    debug!(
        score = scoring.score,
        signal = %scoring.signal,
        strength = scoring.strength,
        "aggregate signal"
    );

    TechnicalSignals {
        rsi_14: rsi.map(|r| r.value),
        rsi_signal: rsi.map(|r| r.signal).unwrap_or_default(),
        macd,
        moving_averages,
        bollinger_bands,
        volume_analysis,
        support_resistance,
        overall_signal: scoring.signal,
        signal_strength: scoring.strength,
        signal_score: scoring.score,
        as_of: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::SeriesPoint;
    use crate::types::Bias;

    fn history(prices: &[f64], volumes: &[f64]) -> PriceHistory {
        let day = 86_400_000;
        PriceHistory {
            prices: prices
                .iter()
                .enumerate()
                .map(|(i, &p)| SeriesPoint::new(1_700_000_000_000 + i as i64 * day, p))
                .collect(),
            market_caps: Vec::new(),
            total_volumes: volumes
                .iter()
                .enumerate()
                .map(|(i, &v)| SeriesPoint::new(1_700_000_000_000 + i as i64 * day, v))
                .collect(),
        }
    }

    #[test]
    fn empty_history_is_all_unavailable() {
        let signals = analyze(&PriceHistory::default());
        assert!(signals.rsi_14.is_none());
        assert_eq!(signals.rsi_signal, RsiSignal::Neutral);
        assert!(signals.macd.is_none());
        assert!(signals.bollinger_bands.is_none());
        assert!(signals.volume_analysis.is_none());
        assert!(signals.support_resistance.support.is_empty());
        assert_eq!(signals.overall_signal, OverallSignal::Neutral);
        assert_eq!(signals.signal_strength, 50);
        assert!(signals.as_of.is_none());
    }

    #[test]
    fn short_series_only_scores_what_is_available() {
        // 16 points: RSI is available, nothing else on the price side.
        let closes: Vec<f64> = (0..16).map(|i| 100.0 - i as f64).collect();
        let signals = analyze_series(&closes, &[], &WeightedScorer::default());
        assert_eq!(signals.rsi_14, Some(0.0));
        assert_eq!(signals.rsi_signal, RsiSignal::Oversold);
        assert!(signals.moving_averages.price_vs_sma20.is_none());
        assert!(signals.macd.is_none());
        // Only the oversold RSI contributes.
        assert_eq!(signals.signal_score, 25.0);
        assert_eq!(signals.overall_signal, OverallSignal::Bullish);
    }

    #[test]
    fn sub_cent_asset_keeps_macd_vote() {
        let closes: Vec<f64> = (0..60).map(|i| 0.00001 * 1.02f64.powi(i)).collect();
        let signals = analyze_series(&closes, &[], &WeightedScorer::default());
        let macd = signals.macd.unwrap();
        assert_eq!(macd.histogram, 0.0);
        assert_eq!(macd.signal, Bias::Bullish);
        // -25 (RSI) + 25 (MACD) + 10 + 10 (SMAs) - 5 (near upper band).
        assert_eq!(signals.signal_score, 15.0);
        assert_eq!(signals.overall_signal, OverallSignal::Bullish);
    }

    #[test]
    fn as_of_is_last_price_timestamp() {
        let signals = analyze(&history(&[1.0, 2.0, 3.0], &[]));
        let expected = DateTime::from_timestamp_millis(1_700_000_000_000 + 2 * 86_400_000);
        assert_eq!(signals.as_of, expected);
    }

    #[test]
    fn record_serialises_with_contract_field_names() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 * 1.01f64.powi(i)).collect();
        let volumes: Vec<f64> = (0..60).map(|i| 1000.0 * 1.1f64.powi(i)).collect();
        let signals = analyze(&history(&closes, &volumes));
        let json = serde_json::to_value(&signals).unwrap();

        for key in [
            "rsi_14",
            "rsi_signal",
            "macd",
            "moving_averages",
            "bollinger_bands",
            "volume_analysis",
            "support_resistance",
            "overall_signal",
            "signal_strength",
        ] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
        assert!(json["macd"]["histogram"].is_number());
        assert!(json["moving_averages"]["golden_cross"].is_boolean());
        assert!(json["volume_analysis"]["volume_trend"].is_string());

        let back: TechnicalSignals = serde_json::from_value(json).unwrap();
        assert_eq!(back.overall_signal, signals.overall_signal);
        assert_eq!(back.signal_strength, signals.signal_strength);
        assert_eq!(back.as_of, signals.as_of);
        assert_eq!(back.moving_averages.price_vs_sma50, signals.moving_averages.price_vs_sma50);
    }

    #[test]
    fn key_levels_mirror_support_resistance() {
        let closes = [
            100.0, 95.0, 90.0, 95.0, 100.0, 105.0, 110.0, 105.0, 100.0, 97.0, 95.0, 97.0, 100.0,
            108.0, 115.0, 108.0, 102.0, 100.0,
        ];
        let signals = analyze_series(&closes, &[], &WeightedScorer::default());
        let (support, resistance) = signals.key_levels();
        assert_eq!(support, &[95.0, 90.0]);
        assert_eq!(resistance, &[115.0, 110.0]);
    }
}
