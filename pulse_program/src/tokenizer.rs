use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use regex::Regex;
use utils;
use crate::error::ParseError;
use crate::family::Family;
use crate::usage::{IndexSets, UsedParameterSet};

const INCLUDE_DIRECTIVE:&str = "#include";
const PROSOL_DIRECTIVE:&str = "prosol";

#[derive(Clone,Copy,Debug,PartialEq,Eq)]
pub enum ScanMode {
    Parameters,
    /// additionally record `pl<idx>:f<channel>` power level assignments
    Calibration,
}

/// a scanned pulse program: the verbatim text plus everything it references
#[derive(Clone,Debug)]
pub struct PulseProgram {
    name:String,
    source:Option<PathBuf>,
    lines:Vec<String>,
    usage:IndexSets,
    declared:IndexSets,
    include_files:Vec<String>,
    prosol_files:Vec<String>,
    power_channels:BTreeMap<u8,BTreeSet<u32>>,
    mode:ScanMode,
}

impl PulseProgram {

    pub fn parse(name:&str,text:&str,mode:ScanMode) -> Result<Self,ParseError> {
        let mut pp = Self {
            name:name.to_string(),
            source:None,
            lines:utils::split_lines(text),
            usage:IndexSets::new(),
            declared:IndexSets::new(),
            include_files:vec![],
            prosol_files:vec![],
            power_channels:BTreeMap::new(),
            mode,
        };
        let lines = pp.lines.clone();
        for (idx,line) in lines.iter().enumerate() {
            pp.scan_line(name,idx+1,line)?;
        }
        Ok(pp)
    }

    /// read `name` from the first candidate directory that has it
    pub fn locate(name:&str,nmr_dir:&Path,dirs:&[String],mode:ScanMode) -> Result<Self,ParseError> {
        let path = utils::find_in_dirs(nmr_dir,dirs,name).ok_or_else(|| {
            let searched = dirs.iter().map(|d| utils::resolve_dir(nmr_dir,d).join(name)).collect();
            ParseError::not_found(&format!("pulse program {}",name),searched)
        })?;
        let mut pp = Self::load(&path,mode)?;
        pp.name = name.to_string();
        Ok(pp)
    }

    pub fn load(path:&Path,mode:ScanMode) -> Result<Self,ParseError> {
        let text = utils::read_latin1(path)?;
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        let mut pp = Self::parse(name,&text,mode)?;
        pp.source = Some(path.to_owned());
        log::debug!("pulse program {} read from {:?}",name,path);
        Ok(pp)
    }

    /// merge the references of a companion program (e.g. a decoupling program next to the
    /// dataset) without adding its text to ours
    pub fn scan_companion(&mut self,name:&str,text:&str) -> Result<(),ParseError> {
        for (idx,line) in text.split_inclusive('\n').enumerate() {
            self.scan_line(name,idx+1,line)?;
        }
        Ok(())
    }

    fn scan_line(&mut self,file:&str,line_no:usize,line:&str) -> Result<(),ParseError> {
        let code = strip_comment(line);
        if let Some(expression) = code.strip_prefix('"') {
            // "d11=30m" : the program assigns the left side itself, nothing here is a use
            let lhs = expression.split_once('=').map(|(lhs,_)| lhs).unwrap_or(expression);
            collect(lhs,&mut self.declared);
            return Ok(())
        }
        collect(code,&mut self.usage);
        if self.mode == ScanMode::Calibration {
            for caps in power_channel_regex().captures_iter(code) {
                let index = caps.get(1).and_then(|m| m.as_str().parse::<u32>().ok());
                let channel = caps.get(2).and_then(|m| m.as_str().parse::<u8>().ok());
                if let (Some(index),Some(channel)) = (index,channel) {
                    self.power_channels.entry(channel).or_default().insert(index);
                }
            }
        }
        if code.starts_with(INCLUDE_DIRECTIVE) {
            let target = directive_target(code).ok_or_else(|| ParseError::format(file,line_no,"#include without <file>"))?;
            self.include_files.push(target.to_string());
        }
        else if code.starts_with(PROSOL_DIRECTIVE) {
            let target = directive_target(code).ok_or_else(|| ParseError::format(file,line_no,"prosol without <file>"))?;
            self.prosol_files.push(target.to_string());
        }
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// verbatim lines including terminators
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn declared(&self) -> &IndexSets {
        &self.declared
    }

    pub fn used_parameters(&self) -> UsedParameterSet {
        self.usage.reconcile(&self.declared)
    }

    pub fn include_files(&self) -> &[String] {
        &self.include_files
    }

    pub fn prosol_files(&self) -> &[String] {
        &self.prosol_files
    }

    /// channel -> power level indices assigned on that channel. Only filled in
    /// calibration mode.
    pub fn power_channels(&self) -> &BTreeMap<u8,BTreeSet<u32>> {
        &self.power_channels
    }
}

fn collect(text:&str,sets:&mut IndexSets) {
    for family in Family::ALL {
        family.indices(text).into_iter().for_each(|index| sets.insert(family,index));
    }
}

fn power_channel_regex() -> &'static Regex {
    static REG:OnceLock<Regex> = OnceLock::new();
    REG.get_or_init(|| Regex::new(r"\bpl(\d+):f(\d+)").expect("invalid regex"))
}

/// text before the first ';'
pub fn strip_comment(line:&str) -> &str {
    match line.find(';') {
        Some(idx) => &line[..idx],
        None => line
    }
}

/// the file name between the first '<' and the '>' after it
pub fn directive_target(line:&str) -> Option<&str> {
    let start = line.find('<')? + 1;
    let len = line[start..].find('>')?;
    Some(&line[start..start+len])
}
