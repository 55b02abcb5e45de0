use std::collections::{HashMap, VecDeque};
use crate::error::InstrumentError;
use crate::port::{DatasetLocation, InstrumentPort};

/// a parameter store held in memory. Writes and dialogs are recorded; dialog answers are
/// handed out in the order they were queued, and an empty queue means the user cancelled.
#[derive(Clone,Debug,Default)]
pub struct MemoryInstrument {
    pub params:HashMap<String,String>,
    pub dimensions:usize,
    pub dataset:DatasetLocation,
    pub puts:Vec<(String,String)>,
    pub notifications:Vec<(String,String)>,
    /// (title, labels, defaults) of every text prompt shown
    pub text_prompts:Vec<(String,Vec<String>,Vec<String>)>,
    pub choice_prompts:Vec<String>,
    text_answers:VecDeque<Option<Vec<String>>>,
    choice_answers:VecDeque<Option<usize>>,
}

impl MemoryInstrument {

    pub fn new(dataset:DatasetLocation) -> Self {
        Self {
            dataset,
            dimensions:1,
            ..Self::default()
        }
    }

    pub fn with(mut self,name:&str,value:&str) -> Self {
        self.params.insert(name.to_string(),value.to_string());
        self
    }

    pub fn with_dimensions(mut self,dimensions:usize) -> Self {
        self.dimensions = dimensions;
        self
    }

    /// `None` cancels the dialog
    pub fn answer_text(&mut self,answer:Option<Vec<String>>) {
        self.text_answers.push_back(answer);
    }

    pub fn answer_choice(&mut self,answer:Option<usize>) {
        self.choice_answers.push_back(answer);
    }

    pub fn value(&self,name:&str) -> Option<&str> {
        self.params.get(name).map(|s| s.as_str())
    }
}

impl InstrumentPort for MemoryInstrument {

    fn get(&mut self,name:&str) -> Result<Option<String>,InstrumentError> {
        Ok(self.params.get(name).cloned())
    }

    fn put(&mut self,name:&str,value:&str) -> Result<(),InstrumentError> {
        self.puts.push((name.to_string(),value.to_string()));
        self.params.insert(name.to_string(),value.to_string());
        Ok(())
    }

    fn dimension_count(&mut self) -> Result<usize,InstrumentError> {
        Ok(self.dimensions)
    }

    fn current_dataset(&mut self) -> Result<DatasetLocation,InstrumentError> {
        Ok(self.dataset.clone())
    }

    fn notify(&mut self,title:&str,message:&str) -> Result<(),InstrumentError> {
        self.notifications.push((title.to_string(),message.to_string()));
        Ok(())
    }

    fn prompt_text(&mut self,title:&str,_header:&str,labels:&[String],defaults:&[String]) -> Result<Option<Vec<String>>,InstrumentError> {
        self.text_prompts.push((title.to_string(),labels.to_vec(),defaults.to_vec()));
        Ok(self.text_answers.pop_front().flatten())
    }

    fn prompt_choice(&mut self,title:&str,_message:&str,_buttons:&[&str]) -> Result<Option<usize>,InstrumentError> {
        self.choice_prompts.push(title.to_string());
        Ok(self.choice_answers.pop_front().flatten())
    }
}
