use anyhow::Result;
use harkit_core::har::{Har, HarReader};
use std::path::Path;

/// Decode, validate and re-encode a HAR file in canonical form
pub fn execute(file: &Path, output: Option<&Path>) -> Result<Har> {
    tracing::info!("Normalizing HAR file: {}", file.display());

    let har = HarReader::from_file(file)?;
    HarReader::validate(&har)?;

    super::write_har(&har, output)?;

    Ok(har)
}
