use super::matcher::HeaderMatcher;
use crate::{Error, Result};
use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};
use serde::Deserialize;
use std::path::Path;

/// Placeholder used when a redaction does not name one
pub const DEFAULT_PLACEHOLDER: &str = "redacted";

lazy_static! {
    /// Header names that usually carry credentials or session state
    pub static ref SENSITIVE_HEADER_PATTERN: Regex = RegexBuilder::new(
        r"^(authorization|proxy-authorization|cookie|set-cookie|x-api-key|api-key|apikey|x-auth-token|x-csrf-token|x-xsrf-token)$|token|secret|api[-_]?key"
    )
    .case_insensitive(true)
    .build()
    .unwrap();
}

/// A single step of a redaction policy
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "OperationSpec")]
pub enum ScrubOperation {
    /// Replace the value of every matching header
    RedactHeader {
        matcher: HeaderMatcher,
        placeholder: String,
    },
    /// Drop every matching header
    RemoveHeader { matcher: HeaderMatcher },
    /// Reset entry and page timings to the not-applicable sentinel
    StripTimings,
    /// An operation this version does not know; applying it does nothing
    Ignored,
}

impl ScrubOperation {
    pub fn redact_header(name: impl Into<String>, placeholder: impl Into<String>) -> Self {
        ScrubOperation::RedactHeader {
            matcher: HeaderMatcher::name(name),
            placeholder: placeholder.into(),
        }
    }

    pub fn redact_headers_matching(pattern: &str, placeholder: impl Into<String>) -> Result<Self> {
        Ok(ScrubOperation::RedactHeader {
            matcher: HeaderMatcher::pattern(pattern)?,
            placeholder: placeholder.into(),
        })
    }

    pub fn remove_header(name: impl Into<String>) -> Self {
        ScrubOperation::RemoveHeader {
            matcher: HeaderMatcher::name(name),
        }
    }

    pub fn remove_headers_matching(pattern: &str) -> Result<Self> {
        Ok(ScrubOperation::RemoveHeader {
            matcher: HeaderMatcher::pattern(pattern)?,
        })
    }
}

/// Wire form of an operation in a policy file
#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum OperationSpec {
    RedactHeader {
        name: Option<String>,
        pattern: Option<String>,
        #[serde(default = "default_placeholder")]
        placeholder: String,
    },
    RemoveHeader {
        name: Option<String>,
        pattern: Option<String>,
    },
    StripTimings,
    #[serde(other)]
    Unknown,
}

impl TryFrom<OperationSpec> for ScrubOperation {
    type Error = Error;

    fn try_from(spec: OperationSpec) -> Result<Self> {
        match spec {
            OperationSpec::RedactHeader {
                name,
                pattern,
                placeholder,
            } => Ok(ScrubOperation::RedactHeader {
                matcher: matcher_from(name, pattern)?,
                placeholder,
            }),
            OperationSpec::RemoveHeader { name, pattern } => Ok(ScrubOperation::RemoveHeader {
                matcher: matcher_from(name, pattern)?,
            }),
            OperationSpec::StripTimings => Ok(ScrubOperation::StripTimings),
            OperationSpec::Unknown => {
                tracing::warn!("Ignoring unrecognized scrub operation");
                Ok(ScrubOperation::Ignored)
            }
        }
    }
}

fn matcher_from(name: Option<String>, pattern: Option<String>) -> Result<HeaderMatcher> {
    match (name, pattern) {
        (Some(name), None) => Ok(HeaderMatcher::name(name)),
        (None, Some(pattern)) => HeaderMatcher::pattern(&pattern),
        _ => Err(Error::InvalidPattern(
            "header operations need exactly one of 'name' or 'pattern'".to_string(),
        )),
    }
}

fn default_placeholder() -> String {
    DEFAULT_PLACEHOLDER.to_string()
}

/// Ordered list of scrub operations, usually loaded from a JSON file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScrubPolicy {
    #[serde(default)]
    pub operations: Vec<ScrubOperation>,
}

impl ScrubPolicy {
    /// Redact every header whose name looks sensitive
    pub fn default_sensitive(placeholder: impl Into<String>) -> Self {
        Self {
            operations: vec![ScrubOperation::RedactHeader {
                matcher: HeaderMatcher::from(SENSITIVE_HEADER_PATTERN.clone()),
                placeholder: placeholder.into(),
            }],
        }
    }

    pub fn from_str(content: &str) -> Result<Self> {
        let policy: Self = serde_json::from_str(content)?;
        tracing::debug!("Loaded scrub policy with {} operations", policy.operations.len());
        Ok(policy)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        tracing::debug!("Reading scrub policy from: {}", path.display());
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    pub fn push(&mut self, operation: ScrubOperation) {
        self.operations.push(operation);
    }
}
