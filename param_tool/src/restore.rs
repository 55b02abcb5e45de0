use std::fs;
use std::path::{Path, PathBuf};
use instrument::InstrumentPort;
use pulse_program::{PulseProgram, ScanMode};
use snapshot::{pulse_program_changed, Snapshot};
use crate::config::PP_DIRS;
use crate::context::RunContext;
use crate::error::ToolError;
use crate::extract::current_pulse_program;

const POWER_LEVEL_PREFIX:&str = "PLW";
const OVERWRITE_BUTTONS:[&str;2] = ["Yes","No"];

#[derive(Clone,Debug,Default)]
pub struct RestoreReport {
    /// where the edited pulse program went, if it was edited
    pub new_pulse_program:Option<PathBuf>,
    pub written:usize,
    pub skipped:Vec<String>,
}

/// write the values of an edited snapshot back to the instrument. An edited pulse
/// program is saved under a name the user picks before any value is written.
pub fn restore(port:&mut dyn InstrumentPort,ctx:&RunContext) -> Result<RestoreReport,ToolError> {
    let snap = Snapshot::open(&ctx.snapshot_path())?;
    let current_name = current_pulse_program(port)?;
    let current = PulseProgram::locate(&current_name,&ctx.nmr_dir,ctx.paths.get(PP_DIRS),ScanMode::Parameters)?;

    let mut report = RestoreReport::default();

    if pulse_program_changed(&snap.pulse_program,current.lines()) {
        log::info!("pulse program differs from {}",current_name);
        let dir = ctx.user_pp_dir();
        let new_name = ask_pulse_program_name(port,&current_name,&dir)?;
        fs::create_dir_all(&dir)?;
        let path = dir.join(&new_name);
        utils::write_latin1(&path,&snap.pulse_program.concat())?;
        port.notify("Pulseprogram Changed",&format!("New pulse program written at:\n{}",path.display()))?;
        if new_name != current_name {
            port.put("PULPROG",&new_name)?;
        }
        report.new_pulse_program = Some(path);
    }

    for (name,value) in snap.parameters.axis().iter() {
        match value {
            Some(value) => {
                port.put(name,value)?;
                report.written += 1;
            }
            None => report.skipped.push(name.clone()),
        }
    }
    for (name,value) in snap.parameters.non_axis().iter() {
        if ctx.settings.ignored_parameters.iter().any(|p| p == name) {
            report.skipped.push(name.clone());
            continue
        }
        if ctx.settings.zero_power_levels_on_restore && name.starts_with(POWER_LEVEL_PREFIX) {
            port.put(name,"0")?;
            report.written += 1;
            continue
        }
        match value {
            Some(value) => {
                port.put(name,value)?;
                report.written += 1;
            }
            None => report.skipped.push(name.clone()),
        }
    }
    log::info!("{} values written, {} skipped",report.written,report.skipped.len());
    port.notify("setparam","Acquisition Parameters Set.")?;
    Ok(report)
}

/// keeps asking until the user gives a new name or agrees to overwrite the current one
fn ask_pulse_program_name(port:&mut dyn InstrumentPort,current_name:&str,dir:&Path) -> Result<String,ToolError> {
    let header = format!(
        "The pulseprogram has been changed.\nPlease enter a name for the new pulse program.\nIt will be stored in:\n{}",
        dir.display()
    );
    let labels = vec![String::from("Name:")];
    let defaults = vec![current_name.to_string()];
    loop {
        let answer = port.prompt_text("Pulseprogram Changed",&header,&labels,&defaults)?
            .ok_or_else(|| ToolError::Aborted(String::from("no name given for the changed pulse program")))?;
        let name = answer.first().map(|s| s.trim().to_string()).unwrap_or_default();
        if name.is_empty() {
            continue
        }
        if name != current_name {
            return Ok(name)
        }
        let overwrite = port.prompt_choice(
            "Filename Same",
            "Do you want to overwrite the existing Pulse Program?\nThis action CANNOT be reversed.",
            &OVERWRITE_BUTTONS,
        )?;
        match overwrite {
            Some(0) => return Ok(name),
            Some(1) => continue,
            _ => return Err(ToolError::Aborted(format!("overwriting {} was not confirmed",name)))
        }
    }
}
