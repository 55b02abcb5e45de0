use std::io;
use thiserror::Error;

#[derive(Debug,Error)]
pub enum InstrumentError {
    #[error("instrument bridge failed: {0}")]
    Bridge(String),
    #[error("instrument refused {command}: {message}")]
    Status {
        command:String,
        message:String,
    },
    #[error("unexpected reply to {command}: {output:?}")]
    Parse {
        command:String,
        output:String,
    },
    #[error(transparent)]
    Io(#[from] io::Error),
}
