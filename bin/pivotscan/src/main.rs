mod replay;

use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use common::{Config, Signal};
use strategy::frame::{ENTER_LONG, ENTER_SHORT, EXIT_LONG, EXIT_SHORT};
use strategy::{StrategyFileConfig, StrategyRegistry};

#[tokio::main]
async fn main() {
    // ── Logging ──────────────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // ── Config ────────────────────────────────────────────────────────────────
    let cfg = Config::from_env();
    info!(
        strategies = %cfg.strategy_config_path,
        data_dir = %cfg.data_dir.display(),
        max_history = cfg.max_history,
        "pivotscan starting"
    );

    // ── Strategy registry ─────────────────────────────────────────────────────
    let strategy_file = StrategyFileConfig::load(&cfg.strategy_config_path)
        .unwrap_or_else(|e| panic!("Failed to load strategy config '{}': {e}", cfg.strategy_config_path));
    let registry = StrategyRegistry::from_config(&strategy_file, cfg.max_history)
        .unwrap_or_else(|e| panic!("Invalid strategy config: {e}"));

    // ── Candle history ────────────────────────────────────────────────────────
    let events = replay::load_events(&cfg.data_dir, &registry.subscriptions());
    if events.is_empty() {
        warn!("No candles found — nothing to replay");
    }

    // ── Channels ──────────────────────────────────────────────────────────────
    // Sized to hold the whole replay so the registry never lags.
    let (market_tx, market_rx) = broadcast::channel(events.len().max(1));
    let (signal_tx, mut signal_rx) = mpsc::channel::<Signal>(128);

    let registry_handle = tokio::spawn(registry.run(market_rx, signal_tx));

    let signal_logger = tokio::spawn(async move {
        let mut count = 0usize;
        while let Some(signal) = signal_rx.recv().await {
            count += 1;
            info!(
                strategy = %signal.strategy(),
                at = %signal.timestamp(),
                "Signal: {signal}"
            );
        }
        count
    });

    // ── Replay ────────────────────────────────────────────────────────────────
    let total = events.len();
    for event in events {
        if market_tx.send(event).is_err() {
            warn!("Strategy registry stopped early");
            break;
        }
    }
    drop(market_tx);

    let registry = registry_handle
        .await
        .unwrap_or_else(|e| panic!("Strategy registry task failed: {e}"));
    let live_signals = signal_logger.await.unwrap_or(0);
    info!(events = total, signals = live_signals, "Replay finished");

    // ── Summary ───────────────────────────────────────────────────────────────
    let names: Vec<String> = registry.strategy_names().map(str::to_string).collect();
    for name in names {
        let frame = match registry.analyze(&name) {
            Ok(frame) => frame,
            Err(e) => {
                warn!(strategy = %name, error = %e, "Analysis failed");
                continue;
            }
        };
        info!(strategy = %name, pair = %frame.pair(), rows = frame.len(), "Analysed history");
        for column in [ENTER_LONG, ENTER_SHORT, EXIT_LONG, EXIT_SHORT] {
            let rows = frame.flagged_rows(column);
            info!(strategy = %name, column, flagged = rows.len(), "Signal column");
            for row in rows {
                debug!(strategy = %name, column, at = %frame.candles()[row].timestamp, "Flagged row");
            }
        }
    }
}
