use std::cmp::Reverse;
use std::path::Path;

use tracing::{info, warn};

use common::data::{dump_path, load_candles};
use common::{MarketEvent, Timeframe};

/// Turn the candle dumps for every subscription into one closed-candle event
/// stream, ordered by close time. Missing or malformed dumps are logged and
/// skipped.
pub fn load_events(data_dir: &Path, subscriptions: &[(String, Timeframe)]) -> Vec<MarketEvent> {
    let mut events = Vec::new();
    for (pair, timeframe) in subscriptions {
        let path = dump_path(data_dir, pair, *timeframe);
        match load_candles(&path) {
            Ok(candles) => {
                info!(%pair, %timeframe, candles = candles.len(), "Loaded history");
                events.extend(candles.into_iter().map(|candle| MarketEvent {
                    pair: pair.clone(),
                    timeframe: *timeframe,
                    candle,
                    is_candle_closed: true,
                }));
            }
            Err(e) => warn!(%pair, %timeframe, path = %path.display(), error = %e, "Skipping candle dump"),
        }
    }
    order_by_close(&mut events);
    events
}

/// Sort events by candle close time. When candles close together the longer
/// timeframe goes first, so a base candle always sees the informative candle
/// that closed with it.
pub fn order_by_close(events: &mut [MarketEvent]) {
    events.sort_by_key(|e| (e.candle.timestamp + e.timeframe.duration(), Reverse(e.timeframe)));
}
