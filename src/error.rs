use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong between reading a request file and receiving
/// a response.
///
/// HTTP error statuses are not represented here: a 404 is a response.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("Failed to read request file `{}`: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse request file `{}`: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid HTTP method `{0}`")]
    InvalidMethod(String),

    #[error("Invalid URL `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Invalid header `{name}`: {reason}")]
    InvalidHeader { name: String, reason: String },

    #[error("Query parameter `{name}` must be a string, number, boolean or list of those")]
    InvalidParam { name: String },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl RequestError {
    /// Input errors are the ones caused by the request file itself.
    pub fn is_input_error(&self) -> bool {
        matches!(self, RequestError::Read { .. } | RequestError::Parse { .. })
    }
}
