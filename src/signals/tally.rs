// =============================================================================
// Signal Tally - one vote per available indicator
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::analysis::TechnicalSignals;
use crate::types::{BandPosition, Bias, PriceVsMa, RsiSignal, VolumeTrend};

/// Count of bullish / bearish / neutral indicator readings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalTally {
    pub bullish: u32,
    pub bearish: u32,
    pub neutral: u32,
}

impl SignalTally {
    /// Tally a technical snapshot.  Unavailable indicators cast no vote; the
    /// golden / death cross flags vote only when set.
    pub fn from_signals(signals: &TechnicalSignals) -> Self {
        let mut tally = Self::default();

        if signals.rsi_14.is_some() {
            tally.vote(match signals.rsi_signal {
                RsiSignal::Oversold => Bias::Bullish,
                RsiSignal::Overbought => Bias::Bearish,
                RsiSignal::Neutral => Bias::Neutral,
            });
        }

        if let Some(macd) = &signals.macd {
            tally.vote(macd.signal);
        }

        let ma = &signals.moving_averages;
        for side in [ma.price_vs_sma20, ma.price_vs_sma50].into_iter().flatten() {
            tally.vote(match side {
                PriceVsMa::Above => Bias::Bullish,
                PriceVsMa::Below => Bias::Bearish,
            });
        }
        if ma.golden_cross {
            tally.vote(Bias::Bullish);
        }
        if ma.death_cross {
            tally.vote(Bias::Bearish);
        }

        if let Some(volume) = &signals.volume_analysis {
            tally.vote(match volume.volume_trend {
                VolumeTrend::Increasing => Bias::Bullish,
                VolumeTrend::Decreasing => Bias::Bearish,
                VolumeTrend::Stable => Bias::Neutral,
            });
        }

        if let Some(bands) = &signals.bollinger_bands {
            tally.vote(match bands.position {
                BandPosition::BelowLower | BandPosition::NearLower => Bias::Bullish,
                BandPosition::AboveUpper | BandPosition::NearUpper => Bias::Bearish,
                BandPosition::Middle => Bias::Neutral,
            });
        }

        tally
    }

    pub fn total(&self) -> u32 {
        self.bullish + self.bearish + self.neutral
    }

    fn vote(&mut self, bias: Bias) {
        match bias {
            Bias::Bullish => self.bullish += 1,
            Bias::Bearish => self.bearish += 1,
            Bias::Neutral => self.neutral += 1,
        }
    }
}
