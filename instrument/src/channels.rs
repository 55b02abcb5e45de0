use indexmap::IndexMap;
use crate::error::InstrumentError;
use crate::port::InstrumentPort;

pub const MAX_CHANNELS:u8 = 8;
const CHANNEL_OFF:&str = "off";

/// nucleus -> channel number for every channel that is switched on, in channel order
#[derive(Clone,Debug,Default,PartialEq,Eq)]
pub struct ChannelMap {
    channels:IndexMap<String,u8>,
}

impl ChannelMap {

    /// `statuses[0]` belongs to channel 1
    pub fn from_statuses<S:AsRef<str>>(statuses:&[S]) -> Self {
        let mut channels = IndexMap::<String,u8>::new();
        for (idx,status) in statuses.iter().take(MAX_CHANNELS as usize).enumerate() {
            let nucleus = status.as_ref().trim();
            if nucleus.is_empty() || nucleus == CHANNEL_OFF {
                continue
            }
            let channel = idx as u8 + 1;
            match channels.get(nucleus) {
                Some(first) => log::warn!("{} is on channel {} and {}, using channel {}",nucleus,first,channel,first),
                None => {
                    channels.insert(nucleus.to_string(),channel);
                }
            }
        }
        Self { channels }
    }

    /// probe NUC1..NUC8
    pub fn resolve(port:&mut dyn InstrumentPort) -> Result<Self,InstrumentError> {
        let mut statuses = Vec::<String>::new();
        for channel in 1..=MAX_CHANNELS {
            statuses.push(port.get(&format!("NUC{}",channel))?.unwrap_or_else(|| CHANNEL_OFF.to_string()));
        }
        Ok(Self::from_statuses(&statuses))
    }

    pub fn channel(&self,nucleus:&str) -> Option<u8> {
        self.channels.iter()
            .find(|(name,_)| name.eq_ignore_ascii_case(nucleus))
            .map(|(_,channel)| *channel)
    }

    /// active channel numbers, ascending
    pub fn channels(&self) -> Vec<u8> {
        self.channels.values().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item=(&str,u8)> {
        self.channels.iter().map(|(name,channel)| (name.as_str(),*channel))
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}
