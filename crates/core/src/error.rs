use thiserror::Error;

/// Top-level error type used across the entire application.
///
/// None of these are fatal: the poll loop logs them and keeps going.
#[derive(Debug, Error)]
pub enum BattError {
    #[error("config error: {0}")]
    Config(String),

    /// The telemetry source returned nothing usable this poll.
    #[error("battery telemetry unavailable: {0}")]
    TelemetryUnavailable(String),

    #[error("cannot spawn command '{command}': {source}")]
    CommandSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

pub type Result<T, E = BattError> = std::result::Result<T, E>;
