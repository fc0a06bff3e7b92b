use regmate_rws::RwsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("codec error: {0}")]
    Rws(#[from] RwsError),
    #[error("missing home directory")]
    MissingHomeDir,
    #[error("invalid workspace path: {0}")]
    InvalidWorkspace(PathBuf),
    #[error("ticket message has no id")]
    MissingMessageId,
}

pub type Result<T> = std::result::Result<T, StoreError>;
