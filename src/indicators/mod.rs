// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free calculators.  Every public calculator returns
// `Option<T>` (or an empty result set) so callers are forced to handle the
// insufficient-data path instead of treating a missing reading as zero.

pub mod bollinger;
pub mod macd;
pub mod math;
pub mod moving_averages;
pub mod rsi;
pub mod support_resistance;
pub mod volume;

pub use bollinger::{calculate_bollinger, BollingerBands};
pub use macd::{calculate_macd, MacdResult};
pub use moving_averages::{calculate_moving_averages, MovingAverageSet};
pub use rsi::{current_rsi, RsiReading};
pub use support_resistance::{calculate_support_resistance, SupportResistance};
pub use volume::{calculate_volume_analysis, VolumeAnalysis};
