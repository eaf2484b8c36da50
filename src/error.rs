use thiserror::Error;

/// Failures reading a question bank
#[derive(Debug, Error)]
pub enum BankError {
    #[error("bank file not found: {0}")]
    NotFound(String),

    #[error("failed to read bank {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid bank json in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Configurations that must be rejected before a session is allowed to start
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("no {mode} questions match category {category:?} and difficulty {difficulty:?}")]
    EmptyPool {
        mode: String,
        category: Option<String>,
        difficulty: Option<String>,
    },

    #[error("timeline needs at least 2 events, only {0} available")]
    TooFewEvents(usize),

    #[error("question count must be at least 1")]
    ZeroCount,

    #[error("time limit must be at least 1 second")]
    ZeroTimeLimit,

    #[error("timeline needs at least 1 attempt")]
    ZeroAttempts,

    #[error("advance delay must be between {min}ms and {max}ms, got {got}ms")]
    AdvanceDelay { got: u64, min: u64, max: u64 },
}
