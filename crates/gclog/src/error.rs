use thiserror::Error;

use crate::parser::GcFormat;

#[derive(Debug, Error)]
pub enum GcLogError {
    #[error("I/O error while reading gc log: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unrecognized gc log format after sampling {0} lines")]
    UnrecognizedFormat(usize),

    #[error("Event index {index} out of range (size: {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Format already committed as {committed:?}, cannot change to {requested:?}")]
    FormatAlreadyCommitted { committed: GcFormat, requested: GcFormat },

    #[error("Configuration error: {0}")]
    Config(String),
}

// Convenience type alias
pub type GcLogResult<T> = Result<T, GcLogError>;
