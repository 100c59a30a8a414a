// =============================================================================
// Signals Module
// =============================================================================
//
// Folding indicator readings into directional output:
// - Weighted scoring into one aggregate signal and strength
// - Per-indicator vote tally

pub mod tally;
pub mod weighted_score;

pub use tally::SignalTally;
pub use weighted_score::{
    ScoringPolicy, ScoringResult, SignalContribution, SignalInputs, WeightedScorer,
};
