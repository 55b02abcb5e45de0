use std::fs;
use std::path::Path;
use indexmap::IndexMap;
use crate::error::SnapshotError;
use crate::{format_entry, is_separator, parse_entry, separator};

pub const AXIS_MARKER:&str = ";***Axis Parameters***";
pub const NON_AXIS_MARKER:&str = ";***Non-Axis Parameters***";

/// `None` when the instrument had no value for the parameter
pub type ParamValue = Option<String>;

/// parameter values in the order they were collected. Axis parameters are keyed
/// `"{dimension} {name}"`.
#[derive(Clone,Debug,Default,PartialEq,Eq)]
pub struct ParameterSnapshot {
    axis:IndexMap<String,ParamValue>,
    non_axis:IndexMap<String,ParamValue>,
}

impl ParameterSnapshot {

    pub fn new() -> Self {
        Self::default()
    }

    /// `dimension` starts at 1
    pub fn insert_axis(&mut self,dimension:usize,name:&str,value:ParamValue) {
        self.axis.insert(format!("{} {}",dimension,name),value);
    }

    pub fn insert(&mut self,name:&str,value:ParamValue) {
        self.non_axis.insert(name.to_string(),value);
    }

    pub fn axis(&self) -> &IndexMap<String,ParamValue> {
        &self.axis
    }

    pub fn non_axis(&self) -> &IndexMap<String,ParamValue> {
        &self.non_axis
    }

    pub fn get(&self,name:&str) -> Option<&ParamValue> {
        self.non_axis.get(name).or_else(|| self.axis.get(name))
    }

    pub fn len(&self) -> usize {
        self.axis.len() + self.non_axis.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// the annotated snapshot file: the pulse program verbatim followed by the parameter
/// listing as comment lines, so the file is still a valid pulse program
#[derive(Clone,Debug,PartialEq,Eq)]
pub struct Snapshot {
    pub pulse_program:Vec<String>,
    pub parameters:ParameterSnapshot,
}

impl Snapshot {

    pub fn new(pulse_program:&[String],parameters:ParameterSnapshot) -> Self {
        Self {
            pulse_program:pulse_program.to_vec(),
            parameters,
        }
    }

    /// fails when a value is the missing-value marker itself
    pub fn to_txt(&self) -> Result<String,SnapshotError> {
        let mut txt = String::new();
        for line in self.pulse_program.iter() {
            txt.push_str(line);
        }
        if !txt.is_empty() && !txt.ends_with('\n') {
            txt.push('\n');
        }
        txt.push_str(&separator());
        txt.push('\n');
        txt.push_str(AXIS_MARKER);
        txt.push('\n');
        for (name,value) in self.parameters.axis.iter() {
            txt.push_str(&format_entry(name,value)?);
        }
        txt.push_str(NON_AXIS_MARKER);
        txt.push('\n');
        for (name,value) in self.parameters.non_axis.iter() {
            txt.push_str(&format_entry(name,value)?);
        }
        Ok(txt)
    }

    /// `file` only labels errors
    pub fn from_txt(file:&str,txt:&str) -> Result<Self,SnapshotError> {
        let lines = utils::split_lines(txt);
        let n_lines = lines.len();
        let mut lines = lines.into_iter().enumerate();

        let mut pulse_program = Vec::<String>::new();
        let mut found_separator = false;
        for (_,line) in lines.by_ref() {
            if is_separator(&line) {
                found_separator = true;
                break
            }
            pulse_program.push(line);
        }
        if !found_separator {
            return Err(SnapshotError::format(file,n_lines,"no separator after the pulse program"))
        }

        if !lines.by_ref().any(|(_,line)| line.trim() == AXIS_MARKER) {
            return Err(SnapshotError::format(file,n_lines,format!("missing {}",AXIS_MARKER)))
        }

        let mut parameters = ParameterSnapshot::new();
        let mut found_non_axis = false;
        for (idx,line) in lines.by_ref() {
            if line.trim() == NON_AXIS_MARKER {
                found_non_axis = true;
                break
            }
            if line.trim().is_empty() {
                continue
            }
            let (name,value) = parse_entry(&line).map_err(|e| SnapshotError::format(file,idx+1,e))?;
            parameters.axis.insert(name,value);
        }
        if !found_non_axis {
            return Err(SnapshotError::format(file,n_lines,format!("missing {}",NON_AXIS_MARKER)))
        }

        for (idx,line) in lines {
            if line.trim().is_empty() {
                continue
            }
            let (name,value) = parse_entry(&line).map_err(|e| SnapshotError::format(file,idx+1,e))?;
            parameters.non_axis.insert(name,value);
        }

        Ok(Self {
            pulse_program,
            parameters,
        })
    }

    pub fn open(file_path:&Path) -> Result<Self,SnapshotError> {
        if !file_path.is_file() {
            return Err(SnapshotError::NotFound(file_path.to_owned()))
        }
        let txt = utils::read_latin1(file_path)?;
        Self::from_txt(&file_path.to_string_lossy(),&txt)
    }

    /// written next to the target first, then renamed over it
    pub fn write(&self,file_path:&Path) -> Result<(),SnapshotError> {
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = file_path.with_extension("tmp");
        utils::write_latin1(&tmp,&self.to_txt()?)?;
        fs::rename(&tmp,file_path)?;
        log::debug!("snapshot written to {:?}",file_path);
        Ok(())
    }
}

/// compares line content only, so a missing final newline or CRLF endings do not count
/// as an edit
pub fn pulse_program_changed(snapshot:&[String],current:&[String]) -> bool {
    let content = |line:&String| line.trim_end_matches(['\n','\r']).to_string();
    snapshot.len() != current.len() || snapshot.iter().map(content).ne(current.iter().map(content))
}
