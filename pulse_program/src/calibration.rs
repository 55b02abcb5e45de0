use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use crate::error::ParseError;
use crate::prosol::ProsolTable;

/// one line of the calibration file: `<nucleus> <pulse> <power>`
#[derive(Clone,Debug,PartialEq,Eq)]
pub struct CalibrationEntry {
    /// 1-based line in the file
    pub line:usize,
    pub nucleus:String,
    pub pulse:String,
    pub power:String,
}

impl CalibrationEntry {

    pub fn parse_all(file:&str,text:&str) -> Result<Vec<Self>,ParseError> {
        let mut entries = Vec::<Self>::new();
        for (idx,line) in text.lines().enumerate() {
            let tokens:Vec<&str> = line.split_whitespace().collect();
            match tokens.as_slice() {
                [] => continue,
                [nucleus,pulse,power] => entries.push(Self {
                    line:idx+1,
                    nucleus:nucleus.to_uppercase(),
                    pulse:pulse.to_string(),
                    power:power.to_string(),
                }),
                _ => return Err(ParseError::format(file,idx+1,format!("expected <nucleus> <pulse> <power>, found {} fields",tokens.len())))
            }
        }
        Ok(entries)
    }

    pub fn load(path:&Path) -> Result<Vec<Self>,ParseError> {
        if !path.is_file() {
            return Err(ParseError::not_found("calibration file",vec![path.to_owned()]))
        }
        let text = utils::read_latin1(path)?;
        let file = path.to_string_lossy();
        Self::parse_all(&file,&text)
    }
}

/// per channel, the pulse and power level index that carry its 90 degree calibration.
/// Channels where the pulse program and the prosol table share no index have no entry.
#[derive(Clone,Debug,Default,PartialEq,Eq)]
pub struct ChannelCalibration {
    pulses:BTreeMap<u8,u32>,
    powers:BTreeMap<u8,u32>,
}

impl ChannelCalibration {

    /// `used_pulses` are all `p` indices of the pulse program, `power_channels` its
    /// `pl<idx>:f<channel>` assignments. When more than one index qualifies the smallest
    /// one is taken.
    pub fn cross_reference(channels:&[u8],used_pulses:Option<&BTreeSet<u32>>,power_channels:&BTreeMap<u8,BTreeSet<u32>>,prosol:&ProsolTable) -> Self {
        let mut cal = Self::default();
        for &channel in channels {
            if let Some(idx) = smallest_common(used_pulses,prosol.pulses(channel)) {
                cal.pulses.insert(channel,idx);
            }
            if let Some(idx) = smallest_common(power_channels.get(&channel),prosol.powers(channel)) {
                cal.powers.insert(channel,idx);
            }
        }
        cal
    }

    pub fn pulse_index(&self,channel:u8) -> Option<u32> {
        self.pulses.get(&channel).copied()
    }

    pub fn power_index(&self,channel:u8) -> Option<u32> {
        self.powers.get(&channel).copied()
    }

    pub fn pulse_parameter(&self,channel:u8) -> Option<String> {
        self.pulse_index(channel).map(|idx| format!("P {}",idx))
    }

    pub fn power_parameter(&self,channel:u8) -> Option<String> {
        self.power_index(channel).map(|idx| format!("PLdB {}",idx))
    }

    pub fn is_empty(&self) -> bool {
        self.pulses.is_empty() && self.powers.is_empty()
    }
}

fn smallest_common(a:Option<&BTreeSet<u32>>,b:Option<&BTreeSet<u32>>) -> Option<u32> {
    match (a,b) {
        (Some(a),Some(b)) => a.intersection(b).next().copied(),
        _ => None
    }
}
