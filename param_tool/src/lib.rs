pub mod args;
pub mod error;
pub mod config;
pub mod context;
pub mod values;
pub mod archive;
pub mod extract;
pub mod restore;
pub mod pcal;
pub mod acqu;

pub use error::ToolError;
pub use config::{ConfigFile, PathConfig, ToolSettings};
pub use context::RunContext;
