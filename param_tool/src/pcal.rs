use std::collections::BTreeMap;
use instrument::{ChannelMap, InstrumentPort};
use pulse_program::{CalibrationEntry, ChannelCalibration, Family, ParseError, ProsolTable, PulseProgram, ScanMode};
use crate::config::PP_DIRS;
use crate::context::RunContext;
use crate::error::ToolError;
use crate::extract::current_pulse_program;

const TITLE:&str = "Enter pulsecal values";

/// offer the calibration file values for the 90 degree pulse and power level of every
/// channel and write what the user confirms. Returns the number of values written.
pub fn calibrate(port:&mut dyn InstrumentPort,ctx:&RunContext) -> Result<usize,ToolError> {
    let channels = ChannelMap::resolve(port)?;
    let pp_name = current_pulse_program(port)?;
    let pp = PulseProgram::locate(&pp_name,&ctx.nmr_dir,ctx.paths.get(PP_DIRS),ScanMode::Calibration)?;

    let prosol_name = pp.prosol_files().first().ok_or_else(|| ToolError::NotFound(format!("prosol directive in {}",pp_name)))?;
    let table = ProsolTable::load(&ctx.prosol_dir().join(prosol_name))?;

    let used = pp.used_parameters();
    let cal = ChannelCalibration::cross_reference(&channels.channels(),used.get(Family::P),pp.power_channels(),&table);

    let calib_file = ctx.data_dir.join(&ctx.settings.calibration_file);
    let loaded = CalibrationEntry::load(&calib_file)?;
    let entries = channel_entries(&loaded,&channels,&calib_file.to_string_lossy())?;

    let mut labels = Vec::<String>::new();
    let mut defaults = Vec::<String>::new();
    for (channel,entry) in entries.iter() {
        let pulse = cal.pulse_parameter(*channel);
        let power = cal.power_parameter(*channel);
        if pulse.is_none() && power.is_none() {
            log::warn!("no calibrated pulse or power level for {} on channel {}, skipping it",entry.nucleus,channel);
            continue
        }
        if let Some(label) = pulse {
            labels.push(label);
            defaults.push(entry.pulse.clone());
        }
        else {
            log::warn!("no calibrated pulse for {} on channel {}",entry.nucleus,channel);
        }
        if let Some(label) = power {
            labels.push(label);
            defaults.push(entry.power.clone());
        }
        else {
            log::warn!("no calibrated power level for {} on channel {}",entry.nucleus,channel);
        }
    }
    if labels.is_empty() {
        port.notify(TITLE,"nothing to calibrate")?;
        return Ok(0)
    }

    let values = match port.prompt_text(TITLE,"",&labels,&defaults)? {
        Some(values) => values,
        None => {
            port.notify(TITLE,"pcal values not set")?;
            return Ok(0)
        }
    };
    for (label,value) in labels.iter().zip(values.iter()) {
        port.put(label,value)?;
    }
    log::info!("{} calibration values written",labels.len().min(values.len()));
    Ok(labels.len().min(values.len()))
}

/// calibration entries by channel number, later lines for the same channel win
fn channel_entries<'a>(entries:&'a [CalibrationEntry],channels:&ChannelMap,file:&str) -> Result<BTreeMap<u8,&'a CalibrationEntry>,ToolError> {
    let mut by_channel = BTreeMap::<u8,&CalibrationEntry>::new();
    for entry in entries {
        let channel = channels.channel(&entry.nucleus).ok_or_else(|| {
            ParseError::format(file,entry.line,format!("no channel is set to nucleus {}",entry.nucleus))
        })?;
        by_channel.insert(channel,entry);
    }
    Ok(by_channel)
}
