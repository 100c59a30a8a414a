// =============================================================================
// Pulse TA - batch / periodic analysis runner
// =============================================================================
//
// Loads the engine config, analyses every configured asset on a blocking
// task and prints one JSON line per asset on stdout.  Logs go to stderr so
// stdout stays machine-readable.
// =============================================================================

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use serde::Serialize;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use pulse_ta::market_data::{CachedProvider, FileHistoryProvider};
use pulse_ta::runtime_config::{parse_asset_list, EngineConfig};
use pulse_ta::{
    analyze_with, report, PriceHistoryProvider, SignalTally, TechnicalSignals, WeightedScorer,
};

type Provider = CachedProvider<FileHistoryProvider>;

/// One output line.
#[derive(Serialize)]
struct AssetReport<'a> {
    asset: &'a str,
    technical_signals: &'a TechnicalSignals,
    tally: SignalTally,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "pulse_config.json".to_string());

    let mut config = EngineConfig::load(&config_path).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        EngineConfig::default()
    });

    if let Ok(raw) = std::env::var("PULSE_ASSETS") {
        config.assets = parse_asset_list(&raw);
    }
    config.normalize_assets();
    if let Ok(dir) = std::env::var("PULSE_DATA_DIR") {
        config.data_dir = dir;
    }
    if config.assets.is_empty() {
        anyhow::bail!("no assets configured");
    }

    info!(
        assets = ?config.assets,
        data_dir = %config.data_dir,
        refresh_secs = config.refresh_secs,
        "Configured analysis run"
    );

    // ── 2. Provider & scorer ─────────────────────────────────────────────
    let provider = Arc::new(CachedProvider::new(
        FileHistoryProvider::new(&config.data_dir),
        Duration::from_secs(config.cache_ttl_secs),
    ));
    let scorer = Arc::new(WeightedScorer::new(config.scoring.clone()));

    // ── 3. Single pass ───────────────────────────────────────────────────
    if config.refresh_secs == 0 {
        run_pass(&config.assets, &provider, &scorer).await;
        return Ok(());
    }

    // ── 4. Periodic passes until Ctrl+C ──────────────────────────────────
    let mut interval = tokio::time::interval(Duration::from_secs(config.refresh_secs));
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                run_pass(&config.assets, &provider, &scorer).await;
                let evicted = provider.cache().purge_expired();
                if evicted > 0 {
                    debug!(evicted, "expired price histories evicted");
                }
            }
            result = &mut shutdown => {
                result?;
                warn!("Shutdown signal received - stopping");
                break;
            }
        }
    }

    info!("Pulse TA shut down complete.");
    Ok(())
}

/// Analyse every asset concurrently and print the results.
async fn run_pass(assets: &[String], provider: &Arc<Provider>, scorer: &Arc<WeightedScorer>) {
    let tasks = assets.iter().cloned().map(|asset| {
        let provider = provider.clone();
        let scorer = scorer.clone();
        tokio::task::spawn_blocking(move || {
            let outcome = provider
                .fetch(&asset)
                .map(|history| analyze_with(&history, &scorer));
            (asset, outcome)
        })
    });

    for joined in join_all(tasks).await {
        match joined {
            Ok((asset, Ok(signals))) => emit(&asset, &signals),
            Ok((asset, Err(e))) => warn!(asset = %asset, error = %e, "analysis skipped"),
            Err(e) => error!(error = %e, "analysis task failed"),
        }
    }
}

fn emit(asset: &str, signals: &TechnicalSignals) {
    info!(
        asset,
        overall = %signals.overall_signal,
        strength = signals.signal_strength,
        score = signals.signal_score,
        "analysis complete"
    );
    for line in report::digest(signals) {
        debug!(asset, "{line}");
    }

    let line = AssetReport {
        asset,
        technical_signals: signals,
        tally: signals.tally(),
    };
    match serde_json::to_string(&line) {
        Ok(json) => println!("{json}"),
        Err(e) => error!(asset, error = %e, "failed to serialise analysis"),
    }
}
