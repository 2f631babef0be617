use regex::{Regex, RegexBuilder};

/// Selects headers by name for redaction or removal
#[derive(Debug, Clone)]
pub enum HeaderMatcher {
    /// Exact header name (case-insensitive)
    Name(String),
    /// Regular expression tested against the header name
    Pattern(Regex),
}

impl HeaderMatcher {
    pub fn name(name: impl Into<String>) -> Self {
        HeaderMatcher::Name(name.into())
    }

    /// Compile a case-insensitive name pattern
    pub fn pattern(pattern: &str) -> crate::Result<Self> {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| {
                crate::Error::InvalidPattern(format!(
                    "Invalid header pattern '{}': {}",
                    pattern, e
                ))
            })?;
        Ok(HeaderMatcher::Pattern(regex))
    }

    /// Check if a header name matches
    ///
    /// Patterns are used exactly as compiled; only the name is ever tested.
    pub fn matches(&self, header_name: &str) -> bool {
        match self {
            HeaderMatcher::Name(name) => name.eq_ignore_ascii_case(header_name),
            HeaderMatcher::Pattern(regex) => regex.is_match(header_name),
        }
    }
}

impl From<Regex> for HeaderMatcher {
    fn from(regex: Regex) -> Self {
        HeaderMatcher::Pattern(regex)
    }
}
