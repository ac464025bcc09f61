mod reader;
mod select;

pub use reader::LogLines;
pub use select::{LogFileRef, select_latest};
