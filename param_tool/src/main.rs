use std::env;
use std::path::PathBuf;
use std::process;
use clap::Parser;
use instrument::ScriptInstrument;
use param_tool::args::*;
use param_tool::{acqu, extract, pcal, restore};
use param_tool::{ConfigFile, RunContext, ToolError, ToolSettings};

const DEFAULT_SETTINGS:&str = "param_tool.toml";

fn main(){
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = ParamToolArgs::parse();
    if let Err(e) = run(&args) {
        log::error!("{}",e);
        process::exit(1);
    }
}

fn run(args:&ParamToolArgs) -> Result<(),ToolError> {
    use Action::*;
    if let NewConfig(new_args) = &args.action {
        ToolSettings::default().to_file(&new_args.path)?;
        println!("settings written to {:?}",new_args.path.with_extension(ToolSettings::file_ext()));
        return Ok(())
    }

    let settings_file = args.config.clone().unwrap_or(PathBuf::from(DEFAULT_SETTINGS));
    let settings = ToolSettings::load(&settings_file)?;
    let mut port = ScriptInstrument::new(&settings.bridge_program,&settings.bridge_args);
    let ctx = RunContext::new(settings,&mut port,&env::current_dir()?)?;

    match &args.action {
        Extract => {
            let report = extract::extract(&mut port,&ctx)?;
            log::info!("snapshot at {:?}",report.snapshot);
        }
        Restore => {
            let report = restore::restore(&mut port,&ctx)?;
            if let Some(pp) = &report.new_pulse_program {
                log::info!("edited pulse program saved to {:?}",pp);
            }
        }
        Calibrate => {
            pcal::calibrate(&mut port,&ctx)?;
        }
        GetAcquParams => {
            acqu::get_acqu_params(&mut port,&ctx)?;
        }
        SetAcquParams => {
            acqu::set_acqu_params(&mut port,&ctx)?;
        }
        NewConfig(_) => {}
    }
    Ok(())
}
