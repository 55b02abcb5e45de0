use std::env;
use std::path::{Path, PathBuf};
use instrument::{DatasetLocation, InstrumentPort};
use crate::config::{PathConfig, ToolSettings};
use crate::error::ToolError;

const CURDIR:&str = "prog/curdir";

/// everything a workflow needs to know about where things live, resolved once per run
#[derive(Clone,Debug)]
pub struct RunContext {
    /// `<topspin_home>/exp/stan/nmr`, the base of relative candidate directories
    pub nmr_dir:PathBuf,
    pub data_dir:PathBuf,
    pub dataset:DatasetLocation,
    pub paths:PathConfig,
    pub settings:ToolSettings,
}

impl RunContext {

    /// `work_dir` is where the tool was started from
    pub fn new(settings:ToolSettings,port:&mut dyn InstrumentPort,work_dir:&Path) -> Result<Self,ToolError> {
        let topspin_home = match &settings.topspin_home {
            Some(home) => home.clone(),
            None => topspin_home_of(work_dir).ok_or_else(|| ToolError::Config(
                format!("{:?} is not inside <topspin>/{}, set topspin_home",work_dir,CURDIR)
            ))?
        };
        let paths = PathConfig::load(&utils::resolve_dir(work_dir,&settings.parfile_dirs.to_string_lossy()))?;
        let dataset = port.current_dataset()?;
        let data_dir = dataset.data_dir();
        log::info!("working on dataset {:?}",data_dir);
        Ok(Self {
            nmr_dir:topspin_home.join("exp").join("stan").join("nmr"),
            data_dir,
            dataset,
            paths,
            settings,
        })
    }

    pub fn snapshot_dir(&self) -> PathBuf {
        self.data_dir.join(&self.settings.snapshot_dir_name)
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.snapshot_dir().join(&self.settings.snapshot_file_name)
    }

    pub fn archive_path(&self) -> PathBuf {
        self.snapshot_dir().join(&self.settings.archive_name)
    }

    pub fn log_dir(&self) -> PathBuf {
        match &self.settings.log_dir {
            Some(dir) => dir.clone(),
            None => env::var_os("HOME").map(PathBuf::from).unwrap_or_default().join("pp_logs")
        }
    }

    pub fn prosol_dir(&self) -> PathBuf {
        utils::resolve_dir(&self.nmr_dir,&self.settings.prosol_dir)
    }

    pub fn user_pp_dir(&self) -> PathBuf {
        utils::resolve_dir(&self.nmr_dir,&self.settings.user_pp_dir)
    }

    /// relative file settings are taken relative to the dataset
    pub fn data_file(&self,file:&Path) -> PathBuf {
        utils::resolve_dir(&self.data_dir,&file.to_string_lossy())
    }
}

/// the installation directory above `prog/curdir/<user>`
fn topspin_home_of(work_dir:&Path) -> Option<PathBuf> {
    let curdir = Path::new(CURDIR);
    work_dir.ancestors()
        .find(|dir| dir.ends_with(curdir))
        .and_then(|dir| dir.parent())
        .and_then(|dir| dir.parent())
        .map(|dir| dir.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use instrument::MemoryInstrument;

    #[test]
    fn home_from_working_directory(){
        assert_eq!(topspin_home_of(Path::new("/opt/topspin4.1.4/prog/curdir/nmrsu")),Some(PathBuf::from("/opt/topspin4.1.4")));
        assert_eq!(topspin_home_of(Path::new("/opt/topspin4.1.4/prog/curdir")),Some(PathBuf::from("/opt/topspin4.1.4")));
        assert_eq!(topspin_home_of(Path::new("/home/nmrsu")),None);
    }

    #[test]
    fn context_resolution(){
        let home = tempfile::tempdir().unwrap();
        let work = home.path().join("prog/curdir/nmrsu");
        fs::create_dir_all(&work).unwrap();
        fs::write(work.join("parfile-dirs.prop"),"PP_DIRS=lists/pp/user;lists/pp\n").unwrap();
        let mut port = MemoryInstrument::new(DatasetLocation {
            name:"lysozyme".to_string(),
            expno:"12".to_string(),
            procno:"1".to_string(),
            root:PathBuf::from("/data"),
        });
        let ctx = RunContext::new(ToolSettings::default(),&mut port,&work).unwrap();
        assert_eq!(ctx.nmr_dir,home.path().join("exp/stan/nmr"));
        assert_eq!(ctx.snapshot_path(),PathBuf::from("/data/lysozyme/12/mr/MRpulseprogram"));
        assert_eq!(ctx.archive_path(),PathBuf::from("/data/lysozyme/12/mr/MRfiles.zip"));
        assert_eq!(ctx.prosol_dir(),home.path().join("exp/stan/nmr/lists/prosol/pulseassign"));
        assert_eq!(ctx.data_file(Path::new("format.ased")),PathBuf::from("/data/lysozyme/12/format.ased"));
        assert_eq!(ctx.paths.get("PP_DIRS").len(),2);

        let elsewhere = tempfile::tempdir().unwrap();
        assert!(matches!(RunContext::new(ToolSettings::default(),&mut port,elsewhere.path()),Err(ToolError::Config(_))));
    }
}
