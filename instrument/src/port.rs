use std::path::PathBuf;
use crate::error::InstrumentError;

/// the dataset the instrument currently has open
#[derive(Clone,Debug,Default,PartialEq,Eq)]
pub struct DatasetLocation {
    pub name:String,
    pub expno:String,
    pub procno:String,
    pub root:PathBuf,
}

impl DatasetLocation {
    /// `<root>/<name>/<expno>`
    pub fn data_dir(&self) -> PathBuf {
        self.root.join(&self.name).join(&self.expno)
    }
}

/// parameter store and dialog layer of the spectrometer software
pub trait InstrumentPort {
    /// `None` when the store has no value under `name`
    fn get(&mut self,name:&str) -> Result<Option<String>,InstrumentError>;
    fn put(&mut self,name:&str,value:&str) -> Result<(),InstrumentError>;
    fn dimension_count(&mut self) -> Result<usize,InstrumentError>;
    fn current_dataset(&mut self) -> Result<DatasetLocation,InstrumentError>;
    fn notify(&mut self,title:&str,message:&str) -> Result<(),InstrumentError>;
    /// one answer per label, `None` when the dialog was cancelled
    fn prompt_text(&mut self,title:&str,header:&str,labels:&[String],defaults:&[String]) -> Result<Option<Vec<String>>,InstrumentError>;
    /// index of the chosen button, `None` when the dialog was closed
    fn prompt_choice(&mut self,title:&str,message:&str,buttons:&[&str]) -> Result<Option<usize>,InstrumentError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_dir(){
        let ds = DatasetLocation {
            name:"lysozyme".to_string(),
            expno:"12".to_string(),
            procno:"1".to_string(),
            root:PathBuf::from("/opt/data/nmr"),
        };
        assert_eq!(ds.data_dir(),PathBuf::from("/opt/data/nmr/lysozyme/12"));
    }
}
