use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

/// One `[timestamp_ms, value]` sample of a market-chart series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct SeriesPoint {
    pub timestamp_ms: i64,
    pub value: f64,
}

impl SeriesPoint {
    pub fn new(timestamp_ms: i64, value: f64) -> Self {
        Self {
            timestamp_ms,
            value,
        }
    }

    pub fn time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp_ms)
    }
}

impl From<(f64, f64)> for SeriesPoint {
    fn from((timestamp_ms, value): (f64, f64)) -> Self {
        Self::new(timestamp_ms as i64, value)
    }
}

impl From<SeriesPoint> for (f64, f64) {
    fn from(point: SeriesPoint) -> Self {
        (point.timestamp_ms as f64, point.value)
    }
}

/// Price, market-cap and volume history for one asset, in the market-chart
/// JSON shape: `{ "prices": [[ts, v], ...], "market_caps": [...],
/// "total_volumes": [...] }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceHistory {
    pub prices: Vec<SeriesPoint>,
    #[serde(default)]
    pub market_caps: Vec<SeriesPoint>,
    #[serde(default)]
    pub total_volumes: Vec<SeriesPoint>,
}

impl PriceHistory {
    pub fn closes(&self) -> Vec<f64> {
        self.prices.iter().map(|p| p.value).collect()
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.total_volumes.iter().map(|p| p.value).collect()
    }

    pub fn last_timestamp(&self) -> Option<DateTime<Utc>> {
        self.prices.last().and_then(SeriesPoint::time)
    }

    /// Drop non-finite samples and restore ascending timestamp order.
    ///
    /// Returns the number of samples dropped across all series.  Short
    /// series are left alone; the engine reports them as unavailable.
    pub fn normalize(&mut self) -> usize {
        let mut dropped = 0;
        for series in [
            &mut self.prices,
            &mut self.market_caps,
            &mut self.total_volumes,
        ] {
            let before = series.len();
            series.retain(|p| p.value.is_finite());
            dropped += before - series.len();

            if !series.windows(2).all(|w| w[0].timestamp_ms <= w[1].timestamp_ms) {
                warn!(points = series.len(), "series out of order, sorting by timestamp");
                series.sort_by_key(|p| p.timestamp_ms);
            }
        }
        if dropped > 0 {
            debug!(dropped, "dropped non-finite samples");
        }
        dropped
    }
}

// ---------------------------------------------------------------------------
// Provider seam
// ---------------------------------------------------------------------------

/// Source of price histories.  Retrieval, retries and caching policy belong
/// to implementations; the analysis pipeline only consumes the result.
pub trait PriceHistoryProvider: Send + Sync {
    fn fetch(&self, asset: &str) -> Result<PriceHistory>;
}

/// Reads `<data_dir>/<asset>.json` market-chart dumps.
#[derive(Debug, Clone)]
pub struct FileHistoryProvider {
    data_dir: PathBuf,
}

impl FileHistoryProvider {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
        }
    }

    fn path_for(&self, asset: &str) -> Result<PathBuf> {
        let valid = !asset.is_empty()
            && asset
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            bail!("invalid asset id {asset:?}");
        }
        Ok(self.data_dir.join(format!("{asset}.json")))
    }
}

impl PriceHistoryProvider for FileHistoryProvider {
    fn fetch(&self, asset: &str) -> Result<PriceHistory> {
        let path = self.path_for(asset)?;

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read price history from {}", path.display()))?;

        let mut history: PriceHistory = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse price history from {}", path.display()))?;

        history.normalize();

        info!(
            asset,
            path = %path.display(),
            prices = history.prices.len(),
            volumes = history.total_volumes.len(),
            "price history loaded"
        );

        Ok(history)
    }
}
