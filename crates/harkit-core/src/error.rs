use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to read HAR file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse HAR document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid HAR structure: {0}")]
    InvalidStructure(String),

    #[error("Invalid header pattern: {0}")]
    InvalidPattern(String),

    #[error("Failed to build HTTP message: {0}")]
    Http(#[from] http::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
