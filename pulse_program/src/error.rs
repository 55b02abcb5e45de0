use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug,Error)]
pub enum ParseError {
    #[error("{resource} not found (searched {searched:?})")]
    NotFound {
        resource:String,
        searched:Vec<PathBuf>,
    },
    #[error("cannot parse {file} line {line}: {reason}")]
    Format {
        file:String,
        line:usize,
        reason:String,
    },
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl ParseError {
    pub fn not_found(resource:&str,searched:Vec<PathBuf>) -> Self {
        ParseError::NotFound {
            resource:resource.to_string(),
            searched,
        }
    }

    /// `line` is 1-based
    pub fn format(file:&str,line:usize,reason:impl Into<String>) -> Self {
        ParseError::Format {
            file:file.to_string(),
            line,
            reason:reason.into(),
        }
    }
}
