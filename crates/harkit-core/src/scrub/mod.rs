mod matcher;
mod policy;

pub use matcher::HeaderMatcher;
pub use policy::{DEFAULT_PLACEHOLDER, SENSITIVE_HEADER_PATTERN, ScrubOperation, ScrubPolicy};

use crate::har::{
    Cookie, Entry, Har, Header, Log, NOT_APPLICABLE, PageTimings, Timings,
};
use crate::headers::{self, COOKIE, SET_COOKIE};
use serde::Serialize;

/// Counts of what a scrub pass changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScrubReport {
    pub redacted_headers: usize,
    pub removed_headers: usize,
    pub stripped_entries: usize,
}

impl ScrubReport {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn merge(&mut self, other: ScrubReport) {
        self.redacted_headers += other.redacted_headers;
        self.removed_headers += other.removed_headers;
        self.stripped_entries += other.stripped_entries;
    }
}

/// Applies an ordered list of scrub operations
#[derive(Debug, Clone, Default)]
pub struct Scrubber {
    operations: Vec<ScrubOperation>,
}

impl Scrubber {
    pub fn new(operations: Vec<ScrubOperation>) -> Self {
        Self { operations }
    }

    pub fn operations(&self) -> &[ScrubOperation] {
        &self.operations
    }

    /// Scrub a whole document in place
    pub fn scrub_har(&self, har: &mut Har) -> ScrubReport {
        self.scrub_log(&mut har.log)
    }

    /// Scrub every entry (and, for timing operations, every page) in place
    pub fn scrub_log(&self, log: &mut Log) -> ScrubReport {
        tracing::debug!(
            "Applying {} scrub operations to {} entries",
            self.operations.len(),
            log.entries.len()
        );

        let mut report = ScrubReport::default();
        for entry in &mut log.entries {
            report.merge(self.scrub_entry(entry));
        }

        if self.strips_timings()
            && let Some(pages) = &mut log.pages
        {
            for page in pages {
                page.page_timings = PageTimings {
                    comment: page.page_timings.comment.take(),
                    ..PageTimings::default()
                };
            }
        }

        tracing::debug!(
            "Scrub complete: {} headers redacted, {} removed, {} entries stripped of timings",
            report.redacted_headers,
            report.removed_headers,
            report.stripped_entries
        );

        report
    }

    /// Scrub a single entry in place
    pub fn scrub_entry(&self, entry: &mut Entry) -> ScrubReport {
        let mut report = ScrubReport::default();

        for operation in &self.operations {
            match operation {
                ScrubOperation::RedactHeader {
                    matcher,
                    placeholder,
                } => {
                    report.redacted_headers += scrub_side(
                        &mut entry.request.headers,
                        &mut entry.request.cookies,
                        COOKIE,
                        |headers| redact(headers, matcher, placeholder),
                    );
                    report.redacted_headers += scrub_side(
                        &mut entry.response.headers,
                        &mut entry.response.cookies,
                        SET_COOKIE,
                        |headers| redact(headers, matcher, placeholder),
                    );
                }
                ScrubOperation::RemoveHeader { matcher } => {
                    report.removed_headers += scrub_side(
                        &mut entry.request.headers,
                        &mut entry.request.cookies,
                        COOKIE,
                        |headers| remove(headers, matcher),
                    );
                    report.removed_headers += scrub_side(
                        &mut entry.response.headers,
                        &mut entry.response.cookies,
                        SET_COOKIE,
                        |headers| remove(headers, matcher),
                    );
                }
                ScrubOperation::StripTimings => {
                    if strip_timings(entry) {
                        report.stripped_entries += 1;
                    }
                }
                ScrubOperation::Ignored => {}
            }
        }

        report
    }

    /// Scrubbed copy of a document, leaving the original untouched
    pub fn scrubbed_har(&self, har: &Har) -> Har {
        let mut copy = har.clone();
        self.scrub_har(&mut copy);
        copy
    }

    /// Scrubbed copy of an entry, leaving the original untouched
    pub fn scrubbed_entry(&self, entry: &Entry) -> Entry {
        let mut copy = entry.clone();
        self.scrub_entry(&mut copy);
        copy
    }

    fn strips_timings(&self) -> bool {
        self.operations
            .iter()
            .any(|operation| matches!(operation, ScrubOperation::StripTimings))
    }
}

impl From<ScrubPolicy> for Scrubber {
    fn from(policy: ScrubPolicy) -> Self {
        Self::new(policy.operations)
    }
}

/// Run `edit` on one side's headers, then propagate a changed cookie header value
fn scrub_side(
    headers: &mut Vec<Header>,
    cookies: &mut [Cookie],
    cookie_header: &str,
    edit: impl FnOnce(&mut Vec<Header>) -> usize,
) -> usize {
    let before = headers::value(headers, cookie_header).map(str::to_string);
    let changed = edit(headers);

    if let Some(after) = headers::value(headers, cookie_header)
        && before.as_deref() != Some(after)
    {
        for cookie in cookies.iter_mut() {
            cookie.value = after.to_string();
        }
    }

    changed
}

fn redact(headers: &mut [Header], matcher: &HeaderMatcher, placeholder: &str) -> usize {
    let mut changed = 0;
    for header in headers.iter_mut().filter(|header| matcher.matches(&header.name)) {
        if header.value != placeholder {
            header.value = placeholder.to_string();
            changed += 1;
        }
    }
    changed
}

fn remove(headers: &mut Vec<Header>, matcher: &HeaderMatcher) -> usize {
    let before = headers.len();
    headers.retain(|header| !matcher.matches(&header.name));
    before - headers.len()
}

fn strip_timings(entry: &mut Entry) -> bool {
    let stripped = Timings::default();
    if entry.time == NOT_APPLICABLE && entry.timings == stripped {
        return false;
    }

    entry.time = NOT_APPLICABLE;
    entry.timings = stripped;
    true
}
