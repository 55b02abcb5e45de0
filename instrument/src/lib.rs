pub mod error;
pub mod port;
pub mod channels;
pub mod bridge;
pub mod memory;

pub use error::InstrumentError;
pub use port::{DatasetLocation, InstrumentPort};
pub use channels::{ChannelMap, MAX_CHANNELS};
pub use bridge::ScriptInstrument;
pub use memory::MemoryInstrument;
