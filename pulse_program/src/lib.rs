pub mod error;
pub mod array_string;
pub mod family;
pub mod usage;
pub mod tokenizer;
pub mod prosol;
pub mod calibration;

pub use error::ParseError;
pub use family::Family;
pub use usage::{IndexSets, UsedParameterSet};
pub use tokenizer::{PulseProgram, ScanMode};
pub use prosol::ProsolTable;
pub use calibration::{CalibrationEntry, ChannelCalibration};
