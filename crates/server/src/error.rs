//! Errors raised while validating ports and running the listener.

use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServerError>;

#[derive(Error, Debug)]
pub enum ServerError {
    /// A pre-flight bind on this port failed.
    #[error("{label} port {port} is unavailable: {reason}")]
    PortUnavailable {
        label: &'static str,
        port: u16,
        reason: String,
    },

    #[error("Could not listen on {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: io::Error,
    },

    #[error("Server settings rejected: {0}")]
    InvalidConfig(String),

    #[error("'{0}' is not a valid socket address")]
    InvalidAddress(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}
