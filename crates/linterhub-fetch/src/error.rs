//! Error types for linterhub-fetch.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DownloadError>;

#[derive(Debug, Error)]
pub enum DownloadError {
    /// The request could not be built or sent.
    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },

    #[error("unexpected HTTP status {0}")]
    BadStatus(u16),

    /// The connection broke while the body was streaming.
    #[error("transfer interrupted: {0}")]
    Transport(String),

    #[error("redirect from {0} carried no usable Location header")]
    MissingLocation(String),

    #[error("gave up after {0} redirects")]
    TooManyRedirects(usize),

    #[error("download timed out")]
    Timeout,

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("response body is not valid UTF-8")]
    Decode,
}
