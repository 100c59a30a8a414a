// =============================================================================
// Indicator Digest - plain-text technical block for the narrative generator
// =============================================================================

use crate::analysis::TechnicalSignals;

/// One line per available indicator, ending with the overall verdict.
pub fn digest(signals: &TechnicalSignals) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(rsi) = signals.rsi_14 {
        lines.push(format!("RSI(14): {rsi} ({})", signals.rsi_signal));
    }
    if let Some(macd) = &signals.macd {
        lines.push(format!("MACD: {} (histogram: {})", macd.signal, macd.histogram));
    }

    let ma = &signals.moving_averages;
    for (label, level, side) in [
        ("SMA20", ma.sma_20, ma.price_vs_sma20),
        ("SMA50", ma.sma_50, ma.price_vs_sma50),
    ] {
        if let (Some(level), Some(side)) = (level, side) {
            lines.push(format!("{label}: ${level} (price {side})"));
        }
    }
    if ma.golden_cross {
        lines.push("GOLDEN CROSS detected".to_string());
    }
    if ma.death_cross {
        lines.push("DEATH CROSS detected".to_string());
    }

    if let Some(bands) = &signals.bollinger_bands {
        lines.push(format!(
            "Bollinger: {} (bandwidth: {})",
            bands.position, bands.bandwidth
        ));
    }
    if let Some(volume) = &signals.volume_analysis {
        let sign = if volume.volume_change_pct > 0.0 { "+" } else { "" };
        lines.push(format!(
            "Volume: {} ({sign}{}% vs 7d avg)",
            volume.volume_trend, volume.volume_change_pct
        ));
    }

    lines.push(format!(
        "Overall TA: {} (strength: {}/100)",
        signals.overall_signal, signals.signal_strength
    ));
    lines
}

/// [`digest`] joined with newlines.
pub fn digest_text(signals: &TechnicalSignals) -> String {
    digest(signals).join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze_series;
    use crate::signals::WeightedScorer;

    #[test]
    fn empty_snapshot_only_has_verdict() {
        let signals = analyze_series(&[], &[], &WeightedScorer::default());
        assert_eq!(digest(&signals), vec!["Overall TA: neutral (strength: 50/100)"]);
    }

    #[test]
    fn flat_market_digest() {
        let signals = analyze_series(&[100.0; 60], &[500.0; 60], &WeightedScorer::default());
        let text = digest_text(&signals);
        assert_eq!(
            text,
            "RSI(14): 100 (overbought)\n\
             MACD: neutral (histogram: 0)\n\
             SMA20: $100 (price above)\n\
             SMA50: $100 (price above)\n\
             Bollinger: middle (bandwidth: 0)\n\
             Volume: stable (0% vs 7d avg)\n\
             Overall TA: neutral (strength: 48/100)"
        );
    }
}
