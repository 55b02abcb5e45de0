use instrument::{ChannelMap, InstrumentPort};
use pulse_program::{array_string, Family, UsedParameterSet};
use snapshot::ParameterSnapshot;
use crate::error::ToolError;

const NON_AXIS_PARAMETERS:[&str;10] = ["AQ_mod","DS","NS","FW","RG","DE","NBL","DQDMODE","PH_ref","FnTYPE"];
const AXIS_PARAMETERS:[&str;3] = ["TD","SW","AQ"];
const CHANNEL_PARAMETERS:[&str;4] = ["NUC","O","SFO","BF"];

const AQ_MOD:[&str;6] = ["qf","qsim","qseq","DQD","parallelQsim","parallelDQD"];
const DQDMODE:[&str;2] = ["add","subtract"];
const FN_TYPE:[&str;4] = ["traditional(planes)","full(points)","non-uniform_sampling","projection-spectroscopy"];

/// instrument names for the parameters a family index stands for. The first name of
/// families that name files is an array parameter.
fn family_parameters(family:Family) -> &'static [&'static str] {
    match family {
        Family::Sp => &["SPNAM","SPOAL","SPOFFS","SPW"],
        Family::Gp => &["GPNAM","GPZ"],
        Family::Cpd => &["CPDPRG"],
        Family::P => &["P"],
        Family::Pl => &["PLW"],
        Family::D => &["D"],
        Family::Cnst => &["CNST"],
        Family::L => &["l"],
        Family::Pcpd => &["pcpd"],
    }
}

/// order in which families are listed in the snapshot
const FAMILY_ORDER:[Family;9] = [
    Family::Sp,
    Family::Gp,
    Family::Cpd,
    Family::P,
    Family::Pl,
    Family::D,
    Family::Cnst,
    Family::L,
    Family::Pcpd,
];

pub fn is_array_parameter(name:&str) -> bool {
    matches!(name,"SPNAM"|"GPNAM"|"CPDPRG")
}

/// current values of everything the pulse program depends on
pub fn fetch(port:&mut dyn InstrumentPort,used:&UsedParameterSet,channels:&ChannelMap) -> Result<ParameterSnapshot,ToolError> {
    let mut snap = ParameterSnapshot::new();

    for name in NON_AXIS_PARAMETERS {
        let value = port.get(name)?;
        snap.insert(name,value.map(|code| translate_code(name,code)));
    }

    for channel in channels.channels() {
        for name in CHANNEL_PARAMETERS {
            let name = format!("{}{}",name,channel);
            let value = port.get(&name)?;
            snap.insert(&name,value);
        }
    }

    for family in FAMILY_ORDER {
        let indices = used.indices(family);
        if indices.is_empty() {
            continue
        }
        log::debug!("{} indices {:?}",family,indices);
        for &name in family_parameters(family) {
            match is_array_parameter(name) {
                true => {
                    let entries = port.get(name)?.map(|s| array_string::decode(&s)).unwrap_or_default();
                    for &index in indices.iter() {
                        let entry = array_entry(name,&entries,index)?;
                        snap.insert(&format!("{} {}",name,index),Some(entry.to_string()));
                    }
                }
                false => {
                    for &index in indices.iter() {
                        let name = format!("{} {}",name,index);
                        let value = port.get(&name)?;
                        snap.insert(&name,value);
                    }
                }
            }
        }
    }

    let dims = port.dimension_count()?;
    for name in AXIS_PARAMETERS {
        for dim in 1..=dims {
            let value = port.get(&format!("{} {}",dim,name))?;
            snap.insert_axis(dim,name,value);
        }
    }
    log::info!("{} parameter values read",snap.len());
    Ok(snap)
}

/// entry `index` of a decoded array parameter. Running off the end is fatal here.
pub fn array_entry<'a>(parameter:&str,entries:&'a [String],index:u32) -> Result<&'a str,ToolError> {
    entries.get(index as usize).map(|s| s.as_str()).ok_or_else(|| ToolError::UnresolvedReference {
        parameter:parameter.to_string(),
        index,
        available:entries.len(),
    })
}

/// numeric mode codes are listed under their names; an unknown code is kept as it is
pub fn translate_code(name:&str,code:String) -> String {
    let table:&[&str] = match name {
        "AQ_mod" => &AQ_MOD,
        "DQDMODE" => &DQDMODE,
        "FnTYPE" => &FN_TYPE,
        _ => return code
    };
    match code.trim().parse::<usize>().ok().and_then(|idx| table.get(idx)) {
        Some(label) => label.to_string(),
        None => {
            log::warn!("unknown {} code {:?}, keeping it as is",name,code);
            code
        }
    }
}
