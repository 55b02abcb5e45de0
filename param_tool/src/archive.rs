use std::collections::HashSet;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use zip::write::FileOptions;
use zip::ZipWriter;
use instrument::InstrumentPort;
use pulse_program::{array_string, Family, PulseProgram, UsedParameterSet};
use crate::config::*;
use crate::context::RunContext;
use crate::error::ToolError;

const DATA_DIR_FOLDER:&str = "data-dir-files";
const FQ_LISTS:u8 = 8;

/// files of one kind and where to look for them
#[derive(Clone,Debug,PartialEq,Eq)]
pub struct ArchiveSource {
    pub folder:String,
    pub dirs:Vec<String>,
    pub names:Vec<String>,
    /// copied out of the dataset directory, stored under `data-dir-files/<folder>`
    pub from_dataset:bool,
}

impl ArchiveSource {
    fn new(folder:&str,dirs:&[String],names:Vec<String>) -> Self {
        Self {
            folder:folder.to_string(),
            dirs:dirs.to_vec(),
            names,
            from_dataset:false,
        }
    }

    fn dataset(folder:&str,data_dir:&Path,names:Vec<String>) -> Self {
        Self {
            folder:folder.to_string(),
            dirs:vec![data_dir.to_string_lossy().to_string()],
            names,
            from_dataset:true,
        }
    }

    fn entry_name(&self,name:&str) -> String {
        let name = utils::ascii_lossy(name);
        match self.from_dataset {
            true => format!("{}/{}/{}",DATA_DIR_FOLDER,self.folder,name),
            false => format!("{}/{}",self.folder,name),
        }
    }
}

#[derive(Clone,Debug,Default)]
pub struct ArchiveReport {
    pub path:PathBuf,
    /// source file of every entry, in archive order
    pub sources:Vec<PathBuf>,
    /// `<folder>/<name>` of every file that could not be found
    pub missing:Vec<String>,
}

/// every auxiliary file the pulse program and the current parameters refer to
pub fn collect_sources(port:&mut dyn InstrumentPort,ctx:&RunContext,pp:&PulseProgram,used:&UsedParameterSet) -> Result<Vec<ArchiveSource>,ToolError> {
    let paths = &ctx.paths;
    let data_dir = &ctx.data_dir;
    let prosol_dirs = vec![ctx.settings.prosol_dir.clone()];

    let mut sources = vec![
        ArchiveSource::new("spnam",paths.get(SHAPE_DIRS),array_names(port,"SPNAM",used,Family::Sp)?),
        ArchiveSource::new("include_files",paths.get(PP_DIRS),pp.include_files().to_vec()),
        ArchiveSource::new("gpnam",paths.get(GP_DIRS),array_names(port,"GPNAM",used,Family::Gp)?),
        ArchiveSource::new("cpdprg",paths.get(CPD_DIRS),array_names(port,"CPDPRG",used,Family::Cpd)?),
        ArchiveSource::new("prosols",&prosol_dirs,pp.prosol_files().to_vec()),
    ];
    for (folder,tag,list) in [
        ("valist",VA_DIRS,"VALIST"),
        ("vclist",VC_DIRS,"VCLIST"),
        ("vdlist",VD_DIRS,"VDLIST"),
        ("vplist",VP_DIRS,"VPLIST"),
        ("vtlist",VT_DIRS,"VTLIST"),
    ] {
        sources.push(ArchiveSource::new(folder,paths.get(tag),list_name(port,list)?));
    }
    let mut fq_names = Vec::<String>::new();
    for i in 1..=FQ_LISTS {
        fq_names.extend(list_name(port,&format!("FQ{}LIST",i))?);
    }
    sources.push(ArchiveSource::new("fqlists",paths.get(F1_DIRS),fq_names));

    for (folder,pattern) in [("spnam","spnam*"),("gpnam","gpnam*"),("cpdprg","cpdprg*"),("nus","nuslist")] {
        let names = utils::matching_filenames(data_dir,pattern)
            .map_err(|e| ToolError::Config(format!("bad file pattern {}: {}",pattern,e)))?;
        sources.push(ArchiveSource::dataset(folder,data_dir,names));
    }
    Ok(sources)
}

/// file names held in an array parameter for the used indices. Indices past the end
/// of the array are reported and skipped.
fn array_names(port:&mut dyn InstrumentPort,array:&str,used:&UsedParameterSet,family:Family) -> Result<Vec<String>,ToolError> {
    let indices = used.indices(family);
    if indices.is_empty() {
        return Ok(vec![])
    }
    let entries = port.get(array)?.map(|s| array_string::decode(&s)).unwrap_or_default();
    let mut names = Vec::<String>::new();
    for index in indices {
        match entries.get(index as usize) {
            Some(name) => names.push(name.trim().to_string()),
            None => log::warn!("{} has no entry {} ({} entries), not archiving it",array,index,entries.len()),
        }
    }
    Ok(names)
}

fn list_name(port:&mut dyn InstrumentPort,parameter:&str) -> Result<Vec<String>,ToolError> {
    Ok(port.get(parameter)?.map(|s| s.trim().to_string()).into_iter().collect())
}

/// write a fresh archive at `path`. Files that cannot be found are left out with a warning.
pub fn build_archive(path:&Path,nmr_dir:&Path,sources:&[ArchiveSource]) -> Result<ArchiveReport,ToolError> {
    if path.exists() {
        fs::remove_file(path)?;
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    let mut writer = ZipWriter::new(file);
    let options = FileOptions::default();

    let mut report = ArchiveReport {
        path:path.to_owned(),
        ..ArchiveReport::default()
    };
    let mut written = HashSet::<String>::new();

    for source in sources {
        for (idx,name) in source.names.iter().enumerate() {
            if name.is_empty() {
                continue
            }
            let file_path = match utils::find_in_dirs(nmr_dir,&source.dirs,name) {
                Some(p) => p,
                None => {
                    log::warn!("cannot find {} file {}: {}",source.folder,idx+1,name);
                    report.missing.push(format!("{}/{}",source.folder,name));
                    continue
                }
            };
            let entry = source.entry_name(name);
            if !written.insert(entry.clone()) {
                continue
            }
            writer.start_file(entry,options)?;
            writer.write_all(&fs::read(&file_path)?)?;
            report.sources.push(file_path);
        }
    }
    writer.finish()?;
    log::info!("{} files archived in {:?}",report.sources.len(),path);
    Ok(report)
}
