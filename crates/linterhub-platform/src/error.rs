use thiserror::Error;

pub type Result<T> = std::result::Result<T, ExecError>;

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("failed to spawn `{cmd}`: {source}")]
    Spawn {
        cmd: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{cmd}` exited with {code:?}: {stderr}")]
    NonZeroExit {
        cmd: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("`{cmd}` wrote to stderr: {stderr}")]
    Stderr { cmd: String, stderr: String },

    #[error("`{cmd}` produced non UTF-8 output")]
    Decode { cmd: String },
}

impl ExecError {
    /// The command line that failed.
    pub fn command(&self) -> &str {
        match self {
            Self::Spawn { cmd, .. }
            | Self::NonZeroExit { cmd, .. }
            | Self::Stderr { cmd, .. }
            | Self::Decode { cmd } => cmd,
        }
    }
}
