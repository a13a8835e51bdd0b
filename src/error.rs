use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SweepError>;

#[derive(Debug, Error)]
pub enum SweepError {
    /// Invalid configuration. Fatal at startup; never raised afterwards.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Root directory missing or unreadable when a sweep begins. The tick
    /// is skipped and retried on the next boundary; never fatal after
    /// startup.
    #[error("root directory {} unreachable: {source}", root.display())]
    RootUnreachable {
        root: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
