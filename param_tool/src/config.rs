use std::fs;
use std::path::{Path, PathBuf};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use crate::error::ToolError;

pub const PP_DIRS:&str = "PP_DIRS";
pub const SHAPE_DIRS:&str = "SHAPE_DIRS";
pub const CPD_DIRS:&str = "CPD_DIRS";
pub const GP_DIRS:&str = "GP_DIRS";
pub const VA_DIRS:&str = "VA_DIRS";
pub const VC_DIRS:&str = "VC_DIRS";
pub const VD_DIRS:&str = "VD_DIRS";
pub const VP_DIRS:&str = "VP_DIRS";
pub const VT_DIRS:&str = "VT_DIRS";
pub const F1_DIRS:&str = "F1_DIRS";

pub trait ConfigFile {
    fn to_file(&self,filename:&Path) -> Result<(),ToolError>;
    fn from_file(filename:&Path) -> Result<Self,ToolError> where Self:Sized;
    fn file_ext() -> String;
}

#[derive(Clone,Debug,Serialize,Deserialize,PartialEq)]
#[serde(default)]
pub struct ToolSettings {
    /// spectrometer software installation. Derived from the working directory when unset.
    pub topspin_home:Option<PathBuf>,
    pub parfile_dirs:PathBuf,
    pub snapshot_dir_name:String,
    pub snapshot_file_name:String,
    pub archive_name:String,
    /// defaults to ~/pp_logs
    pub log_dir:Option<PathBuf>,
    pub prosol_dir:String,
    pub user_pp_dir:String,
    pub calibration_file:String,
    pub ignored_parameters:Vec<String>,
    pub zero_power_levels_on_restore:bool,
    pub ased_file:PathBuf,
    pub acqu_listing_file:PathBuf,
    pub wait_retries:u32,
    pub bridge_program:String,
    pub bridge_args:Vec<String>,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            topspin_home:None,
            parfile_dirs:PathBuf::from("parfile-dirs.prop"),
            snapshot_dir_name:String::from("mr"),
            snapshot_file_name:String::from("MRpulseprogram"),
            archive_name:String::from("MRfiles.zip"),
            log_dir:None,
            prosol_dir:String::from("lists/prosol/pulseassign"),
            user_pp_dir:String::from("lists/pp/user"),
            calibration_file:String::from("p_calib.txt"),
            ignored_parameters:["RG","DE","DSPFIRM","DIGMOD","DQDMODE","PROBHD","TE"].iter().map(|s| s.to_string()).collect(),
            zero_power_levels_on_restore:true,
            ased_file:PathBuf::from("format.ased"),
            acqu_listing_file:PathBuf::from("parameters_file.txt"),
            wait_retries:10,
            bridge_program:String::from("param_bridge"),
            bridge_args:vec![],
        }
    }
}

impl ConfigFile for ToolSettings {

    fn to_file(&self,filename:&Path) -> Result<(),ToolError> {
        let t = toml::to_string_pretty(&self).map_err(|e| ToolError::Config(e.to_string()))?;
        fs::write(filename.with_extension(Self::file_ext()),t)?;
        Ok(())
    }

    fn from_file(filename:&Path) -> Result<Self,ToolError> {
        let t = fs::read_to_string(filename.with_extension(Self::file_ext()))?;
        toml::from_str(&t).map_err(|e| ToolError::Config(format!("{:?} is corrupt: {}",filename,e)))
    }

    fn file_ext() -> String {
        String::from("toml")
    }
}

impl ToolSettings {
    /// the settings file when there is one, defaults otherwise
    pub fn load(filename:&Path) -> Result<Self,ToolError> {
        match filename.with_extension(Self::file_ext()).exists() {
            true => Self::from_file(filename),
            false => {
                log::debug!("no settings at {:?}, using defaults",filename);
                Ok(Self::default())
            }
        }
    }
}

/// priority-ordered candidate directories per file kind, from lines of `TAG=dir1;dir2;..`
#[derive(Clone,Debug,Default,PartialEq,Eq)]
pub struct PathConfig {
    dirs:IndexMap<String,Vec<String>>,
}

impl PathConfig {

    pub fn parse(txt:&str) -> Self {
        let mut dirs = IndexMap::<String,Vec<String>>::new();
        for line in txt.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue
            }
            if let Some((tag,list)) = line.split_once('=') {
                let list:Vec<String> = list.split(';')
                    .map(|d| d.trim())
                    .filter(|d| !d.is_empty())
                    .map(|d| d.to_string())
                    .collect();
                dirs.entry(tag.trim().to_string()).or_default().extend(list);
            }
        }
        Self { dirs }
    }

    pub fn load(file_path:&Path) -> Result<Self,ToolError> {
        if !file_path.is_file() {
            return Err(ToolError::NotFound(format!("path configuration {:?}",file_path)))
        }
        Ok(Self::parse(&utils::read_latin1(file_path)?))
    }

    /// empty when the tag is not configured
    pub fn get(&self,tag:&str) -> &[String] {
        self.dirs.get(tag).map(|v| v.as_slice()).unwrap_or(&[])
    }
}
