use thiserror::Error;

#[derive(Debug, Error)]
pub enum StrategyError {
    #[error("Unknown strategy type '{0}'")]
    UnknownType(String),

    #[error("Unknown strategy '{0}'")]
    UnknownStrategy(String),

    #[error("Strategy name '{0}' is used more than once")]
    DuplicateName(String),

    #[error("Invalid parameter '{name}' for strategy '{strategy}': {reason}")]
    InvalidParam {
        strategy: String,
        name: String,
        reason: String,
    },

    #[error("Failed to parse strategy config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Column '{name}' has {actual} rows, frame has {expected}")]
    ColumnLength {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("Missing column '{0}'")]
    MissingColumn(String),

    #[error("Column '{name}' is not a {expected} column")]
    ColumnType { name: String, expected: &'static str },

    #[error("No informative data for {pair} {timeframe}")]
    MissingInformative { pair: String, timeframe: String },

    #[error("Informative timeframe {informative} is shorter than base timeframe {base}")]
    Timeframe { base: String, informative: String },

    #[error("Indicator error: {0}")]
    Indicator(String),

    #[error(transparent)]
    Common(#[from] common::Error),
}

pub type Result<T, E = StrategyError> = std::result::Result<T, E>;
