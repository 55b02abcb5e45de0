use std::fs;
use std::path::Path;
use indexmap::IndexMap;
use crate::error::SnapshotError;
use crate::parameters::ParamValue;
use crate::{format_entry, is_separator, parse_loose_entry, separator};

/// acquisition parameter listing: free text the user keeps on top, then one
/// `;name=value` line per parameter below the separator
#[derive(Clone,Debug,Default,PartialEq,Eq)]
pub struct AcquListing {
    pub preamble:Vec<String>,
    pub entries:IndexMap<String,ParamValue>,
}

impl AcquListing {

    pub fn new(preamble:Vec<String>) -> Self {
        Self {
            preamble,
            entries:IndexMap::new(),
        }
    }

    pub fn insert(&mut self,name:&str,value:ParamValue) {
        self.entries.insert(name.to_string(),value);
    }

    /// everything up to the separator. A file without one is all preamble.
    pub fn from_txt(file:&str,txt:&str) -> Result<Self,SnapshotError> {
        let mut listing = Self::default();
        let mut in_preamble = true;
        for (idx,line) in utils::split_lines(txt).into_iter().enumerate() {
            if in_preamble {
                match is_separator(&line) {
                    true => in_preamble = false,
                    false => listing.preamble.push(line),
                }
                continue
            }
            if line.trim().is_empty() {
                continue
            }
            let (name,value) = parse_loose_entry(&line).map_err(|e| SnapshotError::format(file,idx+1,e))?;
            listing.entries.insert(name,value);
        }
        Ok(listing)
    }

    pub fn to_txt(&self) -> Result<String,SnapshotError> {
        let mut txt = self.preamble.concat();
        if !txt.is_empty() && !txt.ends_with('\n') {
            txt.push('\n');
        }
        txt.push_str(&separator());
        txt.push('\n');
        for (name,value) in self.entries.iter() {
            txt.push_str(&format_entry(name,value)?);
        }
        Ok(txt)
    }

    pub fn open(file_path:&Path) -> Result<Self,SnapshotError> {
        if !file_path.is_file() {
            return Err(SnapshotError::NotFound(file_path.to_owned()))
        }
        let txt = utils::read_latin1(file_path)?;
        Self::from_txt(&file_path.to_string_lossy(),&txt)
    }

    /// the preamble of an existing listing, empty when there is none yet
    pub fn preamble_of(file_path:&Path) -> Result<Vec<String>,SnapshotError> {
        match Self::open(file_path) {
            Ok(listing) => Ok(listing.preamble),
            Err(SnapshotError::NotFound(_)) => Ok(vec![]),
            Err(e) => Err(e)
        }
    }

    pub fn write(&self,file_path:&Path) -> Result<(),SnapshotError> {
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent)?;
        }
        utils::write_latin1(file_path,&self.to_txt()?)?;
        Ok(())
    }

    /// entries that carry a value
    pub fn values(&self) -> impl Iterator<Item=(&str,&str)> {
        self.entries.iter().filter_map(|(name,value)| value.as_deref().map(|v| (name.as_str(),v)))
    }
}
