//! Error types shared by the gateways and stores
//!
//! Three families cover everything that can go wrong on the way from user
//! input to a rendered list:
//! - `Validation`: input rejected before any network call
//! - `Api`: a gateway request failed (terminal status or no response)
//! - `DataFormat`: the response body did not match the expected shape

use thiserror::Error;

/// Convenience alias used throughout the library
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Validation(String),

    /// Failed request. `status` is `None` when no response was received.
    #[error("{message}")]
    Api {
        message: String,
        status: Option<u16>,
        body: Option<String>,
    },

    #[error("{0}")]
    DataFormat(String),

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(String),
}

impl Error {
    /// Message shown when a request never produced a response
    pub const NETWORK_MESSAGE: &'static str = "Network error. Please check your connection";

    pub fn validation(msg: impl Into<String>) -> Self {
        Error::Validation(msg.into())
    }

    pub fn data_format(msg: impl Into<String>) -> Self {
        Error::DataFormat(msg.into())
    }

    /// Transport failure (timeout, DNS, connection refused...)
    pub fn network() -> Self {
        Error::Api {
            message: Self::NETWORK_MESSAGE.to_string(),
            status: None,
            body: None,
        }
    }

    /// HTTP status attached to an `Api` error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => *status,
            _ => None,
        }
    }

    /// Raw response body attached to an `Api` error, if any
    pub fn body(&self) -> Option<&str> {
        match self {
            Error::Api { body, .. } => body.as_deref(),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    pub fn is_network(&self) -> bool {
        matches!(self, Error::Api { status: None, .. })
    }
}
