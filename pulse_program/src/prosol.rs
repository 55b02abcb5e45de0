use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use regex::Regex;
use crate::error::ParseError;

/// probe pulse assignment table: which pulse and power level indices hold the 90 degree
/// calibration of each channel
#[derive(Clone,Debug,Default,PartialEq,Eq)]
pub struct ProsolTable {
    pulses:BTreeMap<u8,BTreeSet<u32>>,
    powers:BTreeMap<u8,BTreeSet<u32>>,
}

impl ProsolTable {

    pub fn parse(text:&str) -> Self {
        let pulse_reg = Regex::new(r"P\[(\d+)\]=PW90;(\d+)").expect("invalid regex");
        let power_reg = Regex::new(r"PLW\[(\d+)\]=PL90;(\d+)").expect("invalid regex");
        Self {
            pulses:assignments(&pulse_reg,text),
            powers:assignments(&power_reg,text),
        }
    }

    pub fn load(path:&Path) -> Result<Self,ParseError> {
        if !path.is_file() {
            return Err(ParseError::not_found(&format!("prosol table {:?}",path.file_name().unwrap_or_default()),vec![path.to_owned()]))
        }
        let text = utils::read_latin1(path)?;
        Ok(Self::parse(&text))
    }

    pub fn pulses(&self,channel:u8) -> Option<&BTreeSet<u32>> {
        self.pulses.get(&channel)
    }

    pub fn powers(&self,channel:u8) -> Option<&BTreeSet<u32>> {
        self.powers.get(&channel)
    }

    pub fn channels(&self) -> BTreeSet<u8> {
        self.pulses.keys().chain(self.powers.keys()).copied().collect()
    }
}

// captures are (index, channel); group by channel
fn assignments(reg:&Regex,text:&str) -> BTreeMap<u8,BTreeSet<u32>> {
    let mut map = BTreeMap::<u8,BTreeSet<u32>>::new();
    for caps in reg.captures_iter(text) {
        let index = caps.get(1).and_then(|m| m.as_str().parse::<u32>().ok());
        let channel = caps.get(2).and_then(|m| m.as_str().parse::<u8>().ok());
        match (index,channel) {
            (Some(index),Some(channel)) => {
                map.entry(channel).or_default().insert(index);
            }
            _ => log::warn!("ignoring prosol assignment {}",&caps[0])
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIPLE:&str = "\
# pulse assignments for triple resonance probe
P[1]=PW90;1
PLW[1]=PL90;1
P[3]=PW90;2
PLW[2]=PL90;2
P[21]=PW90;3
PLW[3]=PL90;3
P[5]=PW90;1
";

    #[test]
    fn groups_by_channel(){
        let t = ProsolTable::parse(TRIPLE);
        assert_eq!(t.pulses(1).unwrap().iter().copied().collect::<Vec<u32>>(),vec![1,5]);
        assert_eq!(t.pulses(3).unwrap().iter().copied().collect::<Vec<u32>>(),vec![21]);
        assert_eq!(t.powers(2).unwrap().iter().copied().collect::<Vec<u32>>(),vec![2]);
        assert!(t.pulses(4).is_none());
        assert_eq!(t.channels().into_iter().collect::<Vec<u8>>(),vec![1,2,3]);
    }

    #[test]
    fn power_lines_are_not_pulses(){
        let t = ProsolTable::parse("PLW[7]=PL90;1\n");
        assert!(t.pulses(1).is_none());
        assert_eq!(t.powers(1).map(|s| s.len()),Some(1));
    }

    #[test]
    fn missing_table(){
        let dir = tempfile::tempdir().unwrap();
        match ProsolTable::load(&dir.path().join("triple")) {
            Err(ParseError::NotFound{..}) => {}
            other => panic!("expected not found, got {:?}",other)
        }
    }
}
