use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug,Error)]
pub enum SnapshotError {
    #[error("snapshot {0:?} not found")]
    NotFound(PathBuf),
    #[error("cannot read {file} line {line}: {reason}")]
    Format {
        file:String,
        line:usize,
        reason:String,
    },
    #[error("value of {0} is the missing-value marker and cannot be written")]
    ReservedValue(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl SnapshotError {
    pub(crate) fn format(file:&str,line:usize,reason:impl Into<String>) -> Self {
        SnapshotError::Format {
            file:file.to_string(),
            line,
            reason:reason.into(),
        }
    }
}
