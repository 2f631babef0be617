use anyhow::{Context, Result};
use harkit_core::har::HarReader;
use harkit_core::scrub::{
    DEFAULT_PLACEHOLDER, ScrubOperation, ScrubPolicy, ScrubReport, Scrubber,
};
use std::path::{Path, PathBuf};

/// Redaction options collected from the command line
#[derive(Debug, Clone)]
pub struct ScrubOptions {
    /// JSON policy file applied before any flag operations
    pub policy: Option<PathBuf>,
    /// Redact every header whose name looks sensitive
    pub defaults: bool,
    pub redact: Vec<String>,
    pub redact_pattern: Vec<String>,
    pub remove: Vec<String>,
    pub remove_pattern: Vec<String>,
    pub strip_timings: bool,
    pub placeholder: String,
}

impl Default for ScrubOptions {
    fn default() -> Self {
        Self {
            policy: None,
            defaults: false,
            redact: Vec::new(),
            redact_pattern: Vec::new(),
            remove: Vec::new(),
            remove_pattern: Vec::new(),
            strip_timings: false,
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
        }
    }
}

/// Assemble the ordered operation list: policy file first, then flags
pub fn build_policy(options: &ScrubOptions) -> Result<ScrubPolicy> {
    let mut policy = match &options.policy {
        Some(path) => ScrubPolicy::from_file(path)
            .with_context(|| format!("Failed to load scrub policy {}", path.display()))?,
        None => ScrubPolicy::default(),
    };

    if options.defaults {
        policy
            .operations
            .extend(ScrubPolicy::default_sensitive(options.placeholder.clone()).operations);
    }

    for name in &options.redact {
        policy.push(ScrubOperation::redact_header(name, options.placeholder.clone()));
    }
    for pattern in &options.redact_pattern {
        policy.push(ScrubOperation::redact_headers_matching(
            pattern,
            options.placeholder.clone(),
        )?);
    }
    for name in &options.remove {
        policy.push(ScrubOperation::remove_header(name));
    }
    for pattern in &options.remove_pattern {
        policy.push(ScrubOperation::remove_headers_matching(pattern)?);
    }
    if options.strip_timings {
        policy.push(ScrubOperation::StripTimings);
    }

    Ok(policy)
}

pub fn execute(file: &Path, options: &ScrubOptions, output: Option<&Path>) -> Result<ScrubReport> {
    tracing::debug!("Scrubbing HAR file: {}", file.display());

    let scrubber = Scrubber::from(build_policy(options)?);
    if scrubber.operations().is_empty() {
        tracing::warn!("No scrub operations given; output will match input");
    }

    let mut har = HarReader::from_file(file)?;
    let report = scrubber.scrub_har(&mut har);

    super::write_har(&har, output)?;

    Ok(report)
}
