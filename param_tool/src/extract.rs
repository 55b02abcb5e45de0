use std::fs;
use std::path::PathBuf;
use chrono::{DateTime, Local};
use instrument::{ChannelMap, InstrumentPort};
use pulse_program::{PulseProgram, ScanMode};
use snapshot::Snapshot;
use crate::archive::{self, ArchiveReport};
use crate::config::PP_DIRS;
use crate::context::RunContext;
use crate::error::ToolError;
use crate::values;

const COMPANION_PATTERN:&str = "cpdprg*";

#[derive(Clone,Debug)]
pub struct ExtractReport {
    pub pulse_program:PathBuf,
    pub snapshot:PathBuf,
    pub log_copy:PathBuf,
    pub archive:ArchiveReport,
}

/// name of the pulse program the dataset is set up with
pub fn current_pulse_program(port:&mut dyn InstrumentPort) -> Result<String,ToolError> {
    match port.get("PULPROG")? {
        Some(name) if !name.trim().is_empty() => Ok(name.trim().to_string()),
        _ => Err(ToolError::NotFound(String::from("pulse program name (PULPROG)")))
    }
}

/// read the pulse program in use and everything it references; write the annotated
/// snapshot, its dated copy and the archive of auxiliary files
pub fn extract(port:&mut dyn InstrumentPort,ctx:&RunContext) -> Result<ExtractReport,ToolError> {
    let pp_name = current_pulse_program(port)?;
    let mut pp = PulseProgram::locate(&pp_name,&ctx.nmr_dir,ctx.paths.get(PP_DIRS),ScanMode::Parameters)?;
    let pp_source = pp.source().map(|p| p.to_owned()).unwrap_or_default();
    log::info!("pulse program {} read from {:?}",pp.name(),pp_source);

    let companions = utils::matching_filenames(&ctx.data_dir,COMPANION_PATTERN)
        .map_err(|e| ToolError::Config(e.to_string()))?;
    for name in companions {
        let path = ctx.data_dir.join(&name);
        if !path.is_file() {
            continue
        }
        log::debug!("scanning decoupling program {:?}",path);
        pp.scan_companion(&name,&utils::read_latin1(&path)?)?;
    }

    let used = pp.used_parameters();
    let channels = ChannelMap::resolve(port)?;
    let params = values::fetch(port,&used,&channels)?;

    let snap = Snapshot::new(pp.lines(),params);
    let snapshot_path = ctx.snapshot_path();
    snap.write(&snapshot_path)?;
    log::info!("snapshot written to {:?}",snapshot_path);

    let log_dir = ctx.log_dir();
    fs::create_dir_all(&log_dir)?;
    let log_copy = log_dir.join(log_copy_name(&pp_name,ctx,Local::now()));
    snap.write(&log_copy)?;

    let sources = archive::collect_sources(port,ctx,&pp,&used)?;
    let archive = archive::build_archive(&ctx.archive_path(),&ctx.nmr_dir,&sources)?;

    let report = ExtractReport {
        pulse_program:pp_source,
        snapshot:snapshot_path,
        log_copy,
        archive,
    };
    port.notify("getparam",&summary(&report))?;
    Ok(report)
}

/// `<pulprog>_<name>_<expno>_<YYYYMMDD>`
pub fn log_copy_name(pp_name:&str,ctx:&RunContext,date:DateTime<Local>) -> String {
    format!("{}_{}_{}_{}",pp_name,ctx.dataset.name,ctx.dataset.expno,date.format("%Y%m%d"))
}

fn summary(report:&ExtractReport) -> String {
    let mut s = String::new();
    s.push_str("Input: pulseprogram taken from:\n");
    s.push_str(&format!("{}\n",report.pulse_program.display()));
    s.push_str("Output: pulseprogram annotated with parameters:\n");
    s.push_str(&format!("{}\n\n",report.snapshot.display()));
    s.push_str("Files copied into zip directory:\n");
    for source in report.archive.sources.iter() {
        s.push_str(&format!("{}\n",source.display()));
    }
    if !report.archive.missing.is_empty() {
        s.push_str("\nFiles not found:\n");
        for missing in report.archive.missing.iter() {
            s.push_str(&format!("{}\n",missing));
        }
    }
    s.push_str("\nzipfile created:\n");
    s.push_str(&format!("{}",report.archive.path.display()));
    s
}
