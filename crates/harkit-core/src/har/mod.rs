pub mod date;
mod reader;
mod transaction;
mod types;
mod writer;

pub use date::HarDate;
pub use reader::HarReader;
pub use types::*;
pub use writer::HarWriter;
