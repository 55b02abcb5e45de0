use std::path::PathBuf;
use std::time::Duration;
use instrument::InstrumentPort;
use pulse_program::array_string;
use snapshot::{AcquListing, ParamValue};
use crate::context::RunContext;
use crate::error::ToolError;

const WAIT_INTERVAL:Duration = Duration::from_secs(1);

/// derived parameters that are never echoed back, e.g. D1, IN0, PLW2
const UNLISTED_PREFIXES:[&str;5] = ["D","IN","INP","PLW","PLdB"];

/// list the current value of every acquisition parameter named in the format file the
/// instrument produces. Notes above the separator of an existing listing are kept.
pub fn get_acqu_params(port:&mut dyn InstrumentPort,ctx:&RunContext) -> Result<PathBuf,ToolError> {
    let ased = ctx.data_file(&ctx.settings.ased_file);
    if !utils::wait_for_file(&ased,ctx.settings.wait_retries,WAIT_INTERVAL) {
        return Err(ToolError::NotFound(format!("format file {:?}",ased)))
    }
    let names = ased_parameter_names(&utils::read_latin1(&ased)?);
    log::info!("{} acquisition parameters in {:?}",names.len(),ased);

    let listing_path = ctx.data_file(&ctx.settings.acqu_listing_file);
    let mut listing = AcquListing::new(AcquListing::preamble_of(&listing_path)?);
    for name in names {
        let value = listing_value(port,&name)?;
        listing.insert(&name,value);
    }
    listing.write(&listing_path)?;
    port.notify("get acquisition parameters",&format!("parameters listed in:\n{}",listing_path.display()))?;
    Ok(listing_path)
}

/// write every listed value that is set back to the instrument
pub fn set_acqu_params(port:&mut dyn InstrumentPort,ctx:&RunContext) -> Result<usize,ToolError> {
    let listing_path = ctx.data_file(&ctx.settings.acqu_listing_file);
    let listing = AcquListing::open(&listing_path)?;
    let mut written = 0;
    for (name,value) in listing.values() {
        port.put(&instrument_name(name),value)?;
        written += 1;
    }
    log::info!("{} acquisition parameters written",written);
    port.notify("set acquisition parameters",&format!("{} parameters set from:\n{}",written,listing_path.display()))?;
    Ok(written)
}

/// second word of every `NAME` and `T_NAME` line
pub fn ased_parameter_names(txt:&str) -> Vec<String> {
    txt.lines().filter_map(|line| {
        let mut words = line.split_whitespace();
        match (words.next(),words.next()) {
            (Some("NAME"),Some(name)) | (Some("T_NAME"),Some(name)) => Some(name.to_string()),
            _ => None
        }
    }).collect()
}

fn listing_value(port:&mut dyn InstrumentPort,name:&str) -> Result<ParamValue,ToolError> {
    if let Some((head,k)) = array_element(name) {
        let entries = port.get(head)?.map(|s| array_string::decode(&s)).unwrap_or_default();
        let value = k.checked_sub(1).and_then(|idx| entries.get(idx)).cloned();
        if value.is_none() {
            log::warn!("{} cannot be resolved ({} has {} entries)",name,head,entries.len());
        }
        return Ok(value)
    }
    if let Some((prefix,_)) = split_trailing_number(name) {
        if UNLISTED_PREFIXES.iter().any(|p| p.eq_ignore_ascii_case(prefix)) {
            return Ok(None)
        }
    }
    Ok(port.get(name)?)
}

/// `HEAD[k]` with k counted from 1
fn array_element(name:&str) -> Option<(&str,usize)> {
    let (head,rest) = name.split_once('[')?;
    let k = rest.strip_suffix(']')?.trim().parse().ok()?;
    Some((head,k))
}

fn split_trailing_number(name:&str) -> Option<(&str,&str)> {
    let prefix = name.trim_end_matches(|c:char| c.is_ascii_digit());
    match prefix.len() < name.len() && !prefix.is_empty() {
        true => Some((prefix,&name[prefix.len()..])),
        false => None
    }
}

/// `HEAD[k]` goes back to the instrument as `HEAD <k-1>`
fn instrument_name(name:&str) -> String {
    match array_element(name) {
        Some((head,k)) if k >= 1 => format!("{} {}",head,k-1),
        _ => name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use instrument::{DatasetLocation, MemoryInstrument};

    const ASED:&str = "\
## format of the acquisition parameters
NAME\t\tPULPROG
TEXT\t\tcurrent pulse program
T_NAME\t\tTD
NAME\t\tSPNAM[2]
NAME\t\tD1
NAME\t\tIN0
NAME\t\tPLdB1
NAME\t\tP1
NAME
";

    #[test]
    fn names_from_format_file(){
        assert_eq!(ased_parameter_names(ASED),vec!["PULPROG","TD","SPNAM[2]","D1","IN0","PLdB1","P1"]);
    }

    #[test]
    fn values_for_the_listing(){
        let mut port = MemoryInstrument::new(DatasetLocation::default())
            .with("PULPROG","zgpr")
            .with("SPNAM","<Crp60,0.5,20.1><Gaus1.1000>")
            .with("D1","2")
            .with("P1","8.5");
        assert_eq!(listing_value(&mut port,"PULPROG").unwrap().as_deref(),Some("zgpr"));
        assert_eq!(listing_value(&mut port,"SPNAM[2]").unwrap().as_deref(),Some("Gaus1.1000"));
        assert_eq!(listing_value(&mut port,"SPNAM[3]").unwrap(),None);
        assert_eq!(listing_value(&mut port,"SPNAM[0]").unwrap(),None);
        assert_eq!(listing_value(&mut port,"D1").unwrap(),None);
        assert_eq!(listing_value(&mut port,"PLdB1").unwrap(),None);
        assert_eq!(listing_value(&mut port,"P1").unwrap().as_deref(),Some("8.5"));
    }

    #[test]
    fn name_helpers(){
        assert_eq!(array_element("GPZ[4]"),Some(("GPZ",4)));
        assert_eq!(array_element("GPZ4"),None);
        assert_eq!(split_trailing_number("INP12"),Some(("INP","12")));
        assert_eq!(split_trailing_number("12"),None);
        assert_eq!(split_trailing_number("NS"),None);
        assert_eq!(instrument_name("SPNAM[2]"),"SPNAM 1");
        assert_eq!(instrument_name("NS"),"NS");
    }
}
