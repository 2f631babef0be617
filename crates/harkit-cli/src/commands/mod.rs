pub mod cookies;
pub mod normalize;
pub mod scrub;

use anyhow::Result;
use harkit_core::har::{Har, HarWriter};
use std::io::{self, Write};
use std::path::Path;

/// Write a HAR document to a file, or to stdout when no path is given
pub(crate) fn write_har(har: &Har, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            tracing::debug!("Writing HAR to: {}", path.display());
            HarWriter::to_file(har, path)?;
        }
        None => {
            tracing::debug!("Writing HAR to stdout");
            let json = HarWriter::to_string(har)?;
            let mut stdout = io::stdout();
            stdout.write_all(json.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }
    Ok(())
}
