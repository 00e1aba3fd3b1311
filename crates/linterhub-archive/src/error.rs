use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("failed to open archive {path}: {reason}")]
    ArchiveOpen { path: PathBuf, reason: String },

    #[error("entry '{0}' escapes the target folder")]
    InvalidPath(String),

    #[error("failed to create directory for '{entry}': {source}")]
    DirectoryCreate {
        entry: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to write '{entry}': {source}")]
    EntryWrite {
        entry: String,
        #[source]
        source: io::Error,
    },

    #[error("extraction cancelled")]
    Cancelled,

    #[error("extraction task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, ExtractError>;
