// =============================================================================
// Weighted Scorer - folds indicator readings into one directional signal
// =============================================================================
//
// Each available indicator adds a signed, fixed contribution to a raw score:
//
//   RSI        > 70: -25   > 60: -10   < 30: +25   < 40: +10
//   MACD       bullish +25, bearish -25
//   SMA20/50   price above +10, below -10 (each)
//   Bollinger  above_upper -15, near_upper -5, near_lower +5, below_lower +15
//   Volume     increasing +8, decreasing -8
//
// Unavailable indicators contribute nothing.  The raw score maps to a
// category via symmetric thresholds and to a 0–100 strength via
// (score + 100) / 2.  All weights and thresholds live in `ScoringPolicy`.

use serde::{Deserialize, Serialize};

use crate::indicators::math::round_to;
use crate::types::{BandPosition, Bias, OverallSignal, PriceVsMa, VolumeTrend};

fn default_rsi_extreme_weight() -> f64 {
    25.0
}

fn default_rsi_mild_weight() -> f64 {
    10.0
}

fn default_rsi_overbought() -> f64 {
    70.0
}

fn default_rsi_warm() -> f64 {
    60.0
}

fn default_rsi_oversold() -> f64 {
    30.0
}

fn default_rsi_cool() -> f64 {
    40.0
}

fn default_macd_weight() -> f64 {
    25.0
}

fn default_sma_weight() -> f64 {
    10.0
}

fn default_band_outer_weight() -> f64 {
    15.0
}

fn default_band_inner_weight() -> f64 {
    5.0
}

fn default_volume_weight() -> f64 {
    8.0
}

fn default_strong_threshold() -> f64 {
    40.0
}

fn default_threshold() -> f64 {
    15.0
}

/// Weights and category thresholds for the aggregate signal.
///
/// Every field has a serde default so a partial policy in the config file
/// only overrides what it names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringPolicy {
    /// Contribution when RSI is beyond the overbought / oversold lines.
    #[serde(default = "default_rsi_extreme_weight")]
    pub rsi_extreme_weight: f64,

    /// Contribution when RSI is between the warm / cool and extreme lines.
    #[serde(default = "default_rsi_mild_weight")]
    pub rsi_mild_weight: f64,

    #[serde(default = "default_rsi_overbought")]
    pub rsi_overbought: f64,

    #[serde(default = "default_rsi_warm")]
    pub rsi_warm: f64,

    #[serde(default = "default_rsi_oversold")]
    pub rsi_oversold: f64,

    #[serde(default = "default_rsi_cool")]
    pub rsi_cool: f64,

    #[serde(default = "default_macd_weight")]
    pub macd_weight: f64,

    /// Applied separately for SMA20 and SMA50.
    #[serde(default = "default_sma_weight")]
    pub sma_weight: f64,

    /// Price outside the bands.
    #[serde(default = "default_band_outer_weight")]
    pub band_outer_weight: f64,

    /// Price between one sigma and the band.
    #[serde(default = "default_band_inner_weight")]
    pub band_inner_weight: f64,

    #[serde(default = "default_volume_weight")]
    pub volume_weight: f64,

    /// |score| at or beyond this is strong_bullish / strong_bearish.
    #[serde(default = "default_strong_threshold")]
    pub strong_threshold: f64,

    /// |score| at or beyond this is bullish / bearish.
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            rsi_extreme_weight: default_rsi_extreme_weight(),
            rsi_mild_weight: default_rsi_mild_weight(),
            rsi_overbought: default_rsi_overbought(),
            rsi_warm: default_rsi_warm(),
            rsi_oversold: default_rsi_oversold(),
            rsi_cool: default_rsi_cool(),
            macd_weight: default_macd_weight(),
            sma_weight: default_sma_weight(),
            band_outer_weight: default_band_outer_weight(),
            band_inner_weight: default_band_inner_weight(),
            volume_weight: default_volume_weight(),
            strong_threshold: default_strong_threshold(),
            threshold: default_threshold(),
        }
    }
}

impl ScoringPolicy {
    /// Largest |score| the policy can produce (93 with the defaults).
    pub fn max_magnitude(&self) -> f64 {
        self.rsi_extreme_weight.abs().max(self.rsi_mild_weight.abs())
            + self.macd_weight.abs()
            + 2.0 * self.sma_weight.abs()
            + self.band_outer_weight.abs().max(self.band_inner_weight.abs())
            + self.volume_weight.abs()
    }

    /// Map a raw score to its category.
    pub fn classify(&self, score: f64) -> OverallSignal {
        if score >= self.strong_threshold {
            OverallSignal::StrongBullish
        } else if score >= self.threshold {
            OverallSignal::Bullish
        } else if score <= -self.strong_threshold {
            OverallSignal::StrongBearish
        } else if score <= -self.threshold {
            OverallSignal::Bearish
        } else {
            OverallSignal::Neutral
        }
    }
}

/// Indicator readings fed to the scorer.  `None` means unavailable.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SignalInputs {
    pub rsi: Option<f64>,
    pub macd: Option<Bias>,
    pub price_vs_sma20: Option<PriceVsMa>,
    pub price_vs_sma50: Option<PriceVsMa>,
    pub band_position: Option<BandPosition>,
    pub volume_trend: Option<VolumeTrend>,
}

/// The contribution of a single indicator to the final score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalContribution {
    pub name: String,
    pub contribution: f64,
}

/// Result of the weighted scoring pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringResult {
    pub score: f64,
    pub signal: OverallSignal,
    pub strength: u8,
    pub contributions: Vec<SignalContribution>,
}

/// The main weighted scoring engine.
#[derive(Debug, Clone, Default)]
pub struct WeightedScorer {
    policy: ScoringPolicy,
}

impl WeightedScorer {
    pub fn new(policy: ScoringPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ScoringPolicy {
        &self.policy
    }

    /// Score a set of indicator readings.
    pub fn score(&self, inputs: &SignalInputs) -> ScoringResult {
        let p = &self.policy;
        let mut contributions = Vec::with_capacity(6);

        if let Some(rsi) = inputs.rsi {
            let value = if rsi > p.rsi_overbought {
                -p.rsi_extreme_weight
            } else if rsi > p.rsi_warm {
                -p.rsi_mild_weight
            } else if rsi < p.rsi_oversold {
                p.rsi_extreme_weight
            } else if rsi < p.rsi_cool {
                p.rsi_mild_weight
            } else {
                0.0
            };
            contributions.push(contribution("rsi", value));
        }

        if let Some(bias) = inputs.macd {
            let value = match bias {
                Bias::Bullish => p.macd_weight,
                Bias::Bearish => -p.macd_weight,
                Bias::Neutral => 0.0,
            };
            contributions.push(contribution("macd", value));
        }

        for (name, side) in [
            ("sma_20", inputs.price_vs_sma20),
            ("sma_50", inputs.price_vs_sma50),
        ] {
            if let Some(side) = side {
                let value = match side {
                    PriceVsMa::Above => p.sma_weight,
                    PriceVsMa::Below => -p.sma_weight,
                };
                contributions.push(contribution(name, value));
            }
        }

        if let Some(position) = inputs.band_position {
            let value = match position {
                BandPosition::AboveUpper => -p.band_outer_weight,
                BandPosition::NearUpper => -p.band_inner_weight,
                BandPosition::Middle => 0.0,
                BandPosition::NearLower => p.band_inner_weight,
                BandPosition::BelowLower => p.band_outer_weight,
            };
            contributions.push(contribution("bollinger", value));
        }

        if let Some(trend) = inputs.volume_trend {
            let value = match trend {
                VolumeTrend::Increasing => p.volume_weight,
                VolumeTrend::Decreasing => -p.volume_weight,
                VolumeTrend::Stable => 0.0,
            };
            contributions.push(contribution("volume", value));
        }

        let score: f64 = contributions.iter().map(|c| c.contribution).sum();

        ScoringResult {
            score,
            signal: p.classify(score),
            strength: strength(score),
            contributions,
        }
    }
}

/// Linear rescale of the signed score to 0–100.
pub fn strength(score: f64) -> u8 {
    round_to(((score + 100.0) / 2.0).clamp(0.0, 100.0), 0) as u8
}

fn contribution(name: &str, value: f64) -> SignalContribution {
    SignalContribution {
        name: name.to_string(),
        contribution: value,
    }
}
