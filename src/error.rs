use thiserror::Error;

/// Error surface for the whole crate.
///
/// Every failure mode the core can hit collapses into one of these five
/// kinds; nothing here is retried or logged internally.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum HttpWireError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("parse error: {0}")]
    ParseError(String),

    #[error("malformed date: {0}")]
    MalformedDate(String),

    #[error("index out of range: {0}")]
    IndexOutOfRange(String),

    #[error("illegal state: {0}")]
    IllegalState(String),
}

pub type Result<T> = std::result::Result<T, HttpWireError>;

impl HttpWireError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        HttpWireError::InvalidArgument(msg.into())
    }

    pub fn parse_error(msg: impl Into<String>) -> Self {
        HttpWireError::ParseError(msg.into())
    }

    pub fn malformed_date(msg: impl Into<String>) -> Self {
        HttpWireError::MalformedDate(msg.into())
    }

    pub fn index_out_of_range(msg: impl Into<String>) -> Self {
        HttpWireError::IndexOutOfRange(msg.into())
    }

    pub fn illegal_state(msg: impl Into<String>) -> Self {
        HttpWireError::IllegalState(msg.into())
    }
}
