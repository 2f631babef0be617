use super::types::Har;
use crate::Result;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

pub struct HarWriter;

impl HarWriter {
    /// Write a HAR structure to a file, creating missing parent directories
    pub fn to_file(har: &Har, path: &Path) -> Result<()> {
        tracing::debug!("Writing HAR file to: {}", path.display());

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, har)?;
        writer.flush()?;

        tracing::info!(
            "Successfully wrote HAR file with {} entries to {}",
            har.log.entries.len(),
            path.display()
        );

        Ok(())
    }

    /// Encode a HAR structure as pretty-printed JSON bytes
    pub fn to_vec(har: &Har) -> Result<Vec<u8>> {
        tracing::debug!("Encoding HAR with {} entries", har.log.entries.len());

        let bytes = serde_json::to_vec_pretty(har)?;

        tracing::info!("Successfully encoded HAR ({} bytes)", bytes.len());

        Ok(bytes)
    }

    /// Convert a HAR structure to a JSON string
    pub fn to_string(har: &Har) -> Result<String> {
        tracing::debug!("Converting HAR to string");

        let json = serde_json::to_string_pretty(har)?;

        tracing::info!("Successfully converted HAR to string");

        Ok(json)
    }

    /// Convert a HAR structure to a compact JSON string
    pub fn to_string_compact(har: &Har) -> Result<String> {
        tracing::debug!("Converting HAR to compact string");

        let json = serde_json::to_string(har)?;

        tracing::info!("Successfully converted HAR to compact string");

        Ok(json)
    }
}
