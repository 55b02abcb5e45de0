use std::io;
use thiserror::Error;
use instrument::InstrumentError;
use pulse_program::ParseError;
use snapshot::SnapshotError;

#[derive(Debug,Error)]
pub enum ToolError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
    #[error(transparent)]
    Instrument(#[from] InstrumentError),
    #[error("{parameter} has no entry {index} ({available} entries)")]
    UnresolvedReference {
        parameter:String,
        index:u32,
        available:usize,
    },
    #[error("configuration problem: {0}")]
    Config(String),
    #[error("cannot write archive: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error("aborted: {0}")]
    Aborted(String),
    #[error("{0} not found")]
    NotFound(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}
