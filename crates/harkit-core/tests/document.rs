use harkit_core::har::{HarReader, HarWriter, date};
use harkit_core::headers::{self, HeaderList};
use harkit_core::scrub::{ScrubOperation, Scrubber};
use std::path::PathBuf;

/// Helper to get path to test fixtures
fn fixture_path(filename: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("tests")
        .join("fixtures")
        .join(filename)
}

/// Decoding the encoded form of a decoded document yields the same document
#[test]
fn test_round_trip_is_stable() {
    let har = HarReader::from_file(&fixture_path("sample.har")).unwrap();
    let normalized = HarReader::from_slice(&HarWriter::to_vec(&har).unwrap()).unwrap();
    let again = HarReader::from_slice(&HarWriter::to_vec(&normalized).unwrap()).unwrap();

    assert_eq!(again, normalized);
    assert_eq!(
        HarWriter::to_string(&again).unwrap(),
        HarWriter::to_string(&normalized).unwrap()
    );
}

/// Dates are re-emitted in canonical form regardless of input format
#[test]
fn test_encode_normalizes_dates() {
    let har = HarReader::from_file(&fixture_path("sample.har")).unwrap();
    let json = HarWriter::to_string(&har).unwrap();

    assert!(json.contains(r#""startedDateTime": "2021-06-09T10:18:14.12Z""#));
    assert!(json.contains(r#""startedDateTime": "2021-06-09T12:18:15.50+02:00""#));
    assert!(json.contains(r#""lastAccess": "2021-06-09T10:18:15.50Z""#));
    assert!(!json.contains("123456"));
}

/// The decoded document exposes typed fields with defaults filled in
#[test]
fn test_decode_fixture_fields() {
    let har = HarReader::from_file(&fixture_path("sample.har")).unwrap();
    HarReader::validate(&har).unwrap();

    let first = &har.log.entries[0];
    assert_eq!(first.timings.total(), 85.0);
    assert_eq!(first.time, first.timings.total());
    assert_eq!(
        first.request.headers.value("authorization"),
        Some("Bearer eyJhbGc.eyJzdWI.SflKxwRJ")
    );

    let second = &har.log.entries[1];
    assert_eq!(second.request.http_version, "HTTP/1.1");
    assert!(second.request.cookies.is_empty());
    assert_eq!(second.response.content.to_bytes(), vec![0x89, b'P', b'N', b'G']);
    assert_eq!(
        second.started_date_time,
        date::parse("2021-06-09T10:18:15.5Z").unwrap()
    );
    assert_eq!(second.cache.after_request.as_ref().unwrap().hit_count, 1);
}

/// Stored cookies agree with the ones re-derived from the captured headers
#[test]
fn test_stored_cookies_match_derived() {
    let har = HarReader::from_file(&fixture_path("sample.har")).unwrap();
    let entry = &har.log.entries[0];

    assert_eq!(entry.request.derived_cookies(), entry.request.cookies);

    let derived = entry.response.derived_cookies();
    assert_eq!(derived.len(), 2);
    for (derived, stored) in derived.iter().zip(&entry.response.cookies) {
        assert_eq!(derived.name, stored.name);
        assert_eq!(derived.value, stored.value);
        assert_eq!(derived.expires, stored.expires);
        assert_eq!(derived.secure, stored.secure);
        assert_eq!(derived.http_only, stored.http_only);
    }
}

/// Canonical header view never disturbs the stored order
#[test]
fn test_canonical_headers_view() {
    let har = HarReader::from_file(&fixture_path("sample.har")).unwrap();
    let request = &har.log.entries[0].request;

    let names: Vec<_> = headers::canonical(&request.headers)
        .into_iter()
        .map(|h| h.name)
        .collect();
    assert_eq!(names, vec!["Authorization", "Cookie", "Host", "X-Request-Id"]);
    assert_eq!(request.headers[0].name, "Host");
}

/// Scrubbing a decoded capture redacts headers and the cookies parsed from them
#[test]
fn test_scrub_decoded_capture() {
    let mut har = HarReader::from_file(&fixture_path("sample.har")).unwrap();
    let scrubber = Scrubber::new(vec![
        ScrubOperation::redact_headers_matching("^(cookie|set-cookie)$", "redacted").unwrap(),
        ScrubOperation::remove_header("X-API-Key"),
        ScrubOperation::StripTimings,
    ]);

    let report = scrubber.scrub_har(&mut har);
    assert_eq!(report.redacted_headers, 2);
    assert_eq!(report.removed_headers, 1);
    assert_eq!(report.stripped_entries, 2);

    let first = &har.log.entries[0];
    assert_eq!(first.request.cookies[0].name, "last");
    assert_eq!(first.request.cookies[0].value, "redacted");
    assert!(first.response.cookies.iter().all(|c| c.value == "redacted"));
    assert_eq!(first.response.cookies[1].name, "B");
    assert_eq!(first.time, -1.0);

    let json = HarWriter::to_string(&har).unwrap();
    assert!(!json.contains("k-123"));
    assert!(!json.contains("last=abc"));

    let reparsed = HarReader::from_str(&json).unwrap();
    assert_eq!(scrubber.scrubbed_har(&reparsed), reparsed);
}
