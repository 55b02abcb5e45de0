use clap;
use std::path::PathBuf;

#[derive(clap::Parser,Debug)]
#[command(about = "save, edit and restore the acquisition parameters of a pulse program")]
pub struct ParamToolArgs {
    #[command(subcommand)]
    pub action: Action,
    /// settings file, defaults to param_tool.toml in the working directory
    #[clap(short, long, global = true)]
    pub config:Option<PathBuf>,
}

#[derive(clap::Subcommand,Debug)]
pub enum Action {
    /// write the annotated pulse program and archive its auxiliary files
    Extract,
    /// write the values of the edited snapshot back to the dataset
    Restore,
    /// offer calibrated pulse lengths and power levels
    Calibrate,
    GetAcquParams,
    SetAcquParams,
    NewConfig(NewConfigArgs),
}

#[derive(clap::Args,Debug)]
pub struct NewConfigArgs {
    pub path:PathBuf
}
