pub mod error;
pub mod parameters;
pub mod listing;

pub use error::SnapshotError;
pub use parameters::{ParameterSnapshot, Snapshot, ParamValue, pulse_program_changed};
pub use listing::AcquListing;

/// line of ';' closing the pulse program part of a snapshot and the preamble of a listing
pub const SEPARATOR_WIDTH:usize = 50;

/// written in place of a value the instrument did not provide. Distinct from the empty
/// string, which is a legitimate value, and refused as a value on write.
pub const MISSING_VALUE:&str = "<unset>";

pub fn separator() -> String {
    ";".repeat(SEPARATOR_WIDTH)
}

fn strip_terminator(line:&str) -> &str {
    line.trim_end_matches(['\n','\r'])
}

/// only an exact separator line counts, indented ones belong to the pulse program
pub(crate) fn is_separator(line:&str) -> bool {
    let line = strip_terminator(line);
    line.len() == SEPARATOR_WIDTH && line.chars().all(|c| c == ';')
}

/// `;name=value` with exactly one ';' in front and exactly one '='. Name and value are
/// kept exactly as written.
pub(crate) fn parse_entry(line:&str) -> Result<(String,ParamValue),&'static str> {
    let (name,value) = split_entry(strip_terminator(line))?;
    entry(name,value)
}

/// like `parse_entry`, but spacing around the line, the name and the value is dropped
pub(crate) fn parse_loose_entry(line:&str) -> Result<(String,ParamValue),&'static str> {
    let (name,value) = split_entry(line.trim())?;
    entry(name.trim(),value.trim())
}

fn split_entry(line:&str) -> Result<(&str,&str),&'static str> {
    let body = line.strip_prefix(';').ok_or("entry does not start with ';'")?;
    if body.starts_with(';') {
        return Err("entry starts with more than one ';'")
    }
    let mut parts = body.split('=');
    match (parts.next(),parts.next(),parts.next()) {
        (Some(name),Some(value),None) => Ok((name,value)),
        _ => Err("entry needs exactly one '='")
    }
}

fn entry(name:&str,value:&str) -> Result<(String,ParamValue),&'static str> {
    if name.trim().is_empty() {
        return Err("entry has no parameter name")
    }
    let value = match value {
        MISSING_VALUE => None,
        _ => Some(value.to_string())
    };
    Ok((name.to_string(),value))
}

pub(crate) fn format_entry(name:&str,value:&ParamValue) -> Result<String,SnapshotError> {
    match value.as_deref() {
        Some(MISSING_VALUE) => Err(SnapshotError::ReservedValue(name.to_string())),
        Some(value) => Ok(format!(";{}={}\n",name,value)),
        None => Ok(format!(";{}={}\n",name,MISSING_VALUE)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries(){
        assert_eq!(parse_entry(";NS=16\n").unwrap(),("NS".to_string(),Some("16".to_string())));
        assert_eq!(parse_entry(";NS=16\r\n").unwrap().1,Some("16".to_string()));
        assert_eq!(parse_entry(";SPNAM 1= Crp60,0.5,20.1 \n").unwrap().1,Some(" Crp60,0.5,20.1 ".to_string()));
        assert_eq!(parse_entry(";PH_ref=").unwrap().1,Some(String::new()));
        assert_eq!(parse_entry(";D 1=<unset>").unwrap().1,None);
        assert!(parse_entry("NS=16").is_err());
        assert!(parse_entry(" ;NS=16").is_err());
        assert!(parse_entry(";;NS=16").is_err());
        assert!(parse_entry(";NS 16").is_err());
        assert!(parse_entry(";NS=16=32").is_err());
        assert!(parse_entry(";=16").is_err());
        assert!(parse_entry("; =16").is_err());
        assert_eq!(format_entry("D 1",&None).unwrap(),";D 1=<unset>\n");
        assert_eq!(format_entry("TITLE",&Some("   ".to_string())).unwrap(),";TITLE=   \n");
    }

    #[test]
    fn loose_entries_drop_spacing(){
        assert_eq!(parse_loose_entry("  ;NS = 32 \n").unwrap(),("NS".to_string(),Some("32".to_string())));
        assert_eq!(parse_loose_entry(";D1 = <unset>").unwrap().1,None);
        assert!(parse_loose_entry(";NS 32").is_err());
    }

    #[test]
    fn marker_is_not_a_value(){
        match format_entry("SPNAM 1",&Some(MISSING_VALUE.to_string())) {
            Err(SnapshotError::ReservedValue(name)) => assert_eq!(name,"SPNAM 1"),
            other => panic!("expected the marker to be refused, got {:?}",other)
        }
    }

    #[test]
    fn separator_lines(){
        assert!(is_separator(&(separator()+"\n")));
        assert!(is_separator(&(separator()+"\r\n")));
        assert!(!is_separator(&";".repeat(49)));
        assert!(!is_separator(&format!("  {}\n",separator())));
        assert!(!is_separator(&format!("{} \n",separator())));
    }
}
