// =============================================================================
// Pulse TA - technical-analysis engine for crypto price histories
// =============================================================================
//
// Turns a price / volume history into RSI, MACD, moving averages, Bollinger
// Bands, volume trend and support / resistance levels, then folds them into
// one directional signal with a 0–100 strength.  The engine is synchronous
// and side-effect free; fetching and caching histories is the job of a
// `PriceHistoryProvider`.

pub mod analysis;
pub mod indicators;
pub mod market_data;
pub mod report;
pub mod runtime_config;
pub mod signals;
pub mod types;

pub use analysis::{analyze, analyze_series, analyze_with, TechnicalSignals};
pub use market_data::{PriceHistory, PriceHistoryProvider};
pub use signals::{ScoringPolicy, SignalTally, WeightedScorer};
pub use types::{BandPosition, Bias, OverallSignal, PriceVsMa, RsiSignal, VolumeTrend};
