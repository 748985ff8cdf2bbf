// @file: cmc_client/src/core/errors.rs
// @description: Uniform error surface for every remote market-data call.
// @author: LAS.

use thiserror::Error;

//
// ERROR TYPES
//

#[derive(Debug, Error)]
pub enum RemoteDataError {
    // #1. Remote answered with a non-success, non-unauthorized status.
    // `url` is already redacted (see connectors::coinmarketcap::redacted_url).
    #[error("remote data error: {status} {reason} (url: {url})")]
    Status {
        status: u16,
        reason: String,
        url: String,
    },

    // #2. Connection, TLS or timeout fault, normalized by the transport adapter.
    #[error("transport failure in {operation} (params: {params}): {message}")]
    Transport {
        operation: &'static str,
        params: String,
        message: String,
    },

    // #3. Body was not JSON.
    #[error("could not decode {operation} response: {message}")]
    Decode {
        operation: &'static str,
        message: String,
    },

    // #4. JSON was valid but not the shape the operation expects.
    #[error("unexpected {operation} payload: {message}")]
    Shape {
        operation: &'static str,
        message: String,
    },
}

impl RemoteDataError {
    pub fn shape(operation: &'static str, message: impl Into<String>) -> Self {
        RemoteDataError::Shape {
            operation,
            message: message.into(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            RemoteDataError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Raw fault reported by a `Transport` before the adapter wraps it.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct TransportFault(pub String);

impl From<reqwest::Error> for TransportFault {
    fn from(e: reqwest::Error) -> Self {
        TransportFault(e.to_string())
    }
}
