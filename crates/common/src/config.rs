use std::path::PathBuf;

/// Process configuration loaded from environment variables at startup.
/// Unparsable values cause an immediate panic with a clear message.
#[derive(Debug, Clone)]
pub struct Config {
    /// Strategy config file path.
    pub strategy_config_path: String,
    /// Directory holding candle dumps named `BASE_QUOTE-<timeframe>.json`.
    pub data_dir: PathBuf,
    /// Closed candles kept per pair/timeframe before the oldest is dropped.
    pub max_history: usize,
}

impl Config {
    pub const DEFAULT_MAX_HISTORY: usize = 500;

    /// Load all configuration from environment variables.
    /// Loads `.env` if present.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv(); // ignore error if .env not present

        let max_history = match optional_env("MAX_HISTORY") {
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(n) if n >= 3 => n,
                _ => panic!("MAX_HISTORY must be an integer >= 3, got: '{raw}'"),
            },
            None => Self::DEFAULT_MAX_HISTORY,
        };

        Config {
            strategy_config_path: optional_env("STRATEGY_CONFIG_PATH")
                .unwrap_or_else(|| "config/strategies.toml".to_string()),
            data_dir: optional_env("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("user_data/data/binance")),
            max_history,
        }
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
