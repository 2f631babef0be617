pub mod content;
pub mod error;
pub mod har;
pub mod headers;
pub mod scrub;

pub use error::{Error, Result};
