// error.rs

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CalculatorError>;

/// Malformed or out-of-range user input, rejected before it reaches the calculator.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("invalid number: '{0}'")]
    InvalidNumber(String),

    #[error("number {value} exceeds maximum allowed value {max}")]
    OutOfRange { value: f64, max: f64 },
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum OperationError {
    #[error("unknown operation: {0}")]
    Unknown(String),

    #[error("cannot divide by zero")]
    DivisionByZero,

    #[error("cannot calculate 0th root")]
    ZeroRoot,

    #[error("cannot calculate even root of negative number")]
    EvenRootOfNegative,

    #[error("cannot perform modulus with zero")]
    ModulusByZero,

    #[error("cannot calculate percentage with zero denominator")]
    ZeroPercentBase,

    #[error("{operation} produced a non-finite result")]
    NonFinite { operation: &'static str },
}

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("no history to save")]
    EmptyHistory,

    #[error("history file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("history data is not valid UTF-8")]
    NotUtf8,

    #[error("history data has no header row")]
    MissingHeader,

    #[error("header is missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("row {row}: expected {expected} fields, found {found}")]
    FieldCount {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("row {row}: unterminated quoted field")]
    UnterminatedQuote { row: usize },

    #[error("row {row}: empty value in column '{column}'")]
    EmptyField { row: usize, column: &'static str },

    #[error("row {row}: cannot parse '{value}' in column '{column}' as a number")]
    InvalidNumber {
        row: usize,
        column: &'static str,
        value: String,
    },
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("invalid integer value for {key}: {value}")]
    InvalidInteger { key: &'static str, value: String },

    #[error("invalid float value for {key}: {value}")]
    InvalidFloat { key: &'static str, value: String },

    #[error("{key} must be positive, got {value}")]
    NotPositive { key: &'static str, value: String },

    #[error("cannot create directory {path}: {message}")]
    Directory { path: PathBuf, message: String },
}

#[derive(Debug, Error)]
pub enum CalculatorError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("operation error: {0}")]
    Operation(#[from] OperationError),

    #[error("persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
}

impl PersistenceError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
