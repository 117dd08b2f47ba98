use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Malformed row on line {line}: expected {expected} fields, found {found}")]
    MalformedRow {
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("Invalid miles value: {value:?}")]
    InvalidMiles {
        value: String,
        #[source]
        source: std::num::ParseFloatError,
    },

    #[error("Invalid date/time: {value:?}")]
    InvalidDateTime {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Settings error: {0}")]
    Settings(String),
}

pub type Result<T> = std::result::Result<T, ConvertError>;
