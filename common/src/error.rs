use thiserror::Error;

/// Errors raised while turning a range specification into host addresses.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    /// Invalid text, mixed address families or an inverted interval.
    #[error("malformed range: {0}")]
    Malformed(String),
    /// A syntactically valid specification without a single host in it.
    #[error("no valid hosts found in '{0}'")]
    Empty(String),
}

/// Errors raised while validating probe settings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{field} must be a positive integer (got {value})")]
    NonPositive { field: &'static str, value: i64 },
    #[error("{field} is too large (got {value})")]
    OutOfRange { field: &'static str, value: i64 },
}
