use super::types::Har;
use crate::{Error, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub struct HarReader;

impl HarReader {
    /// Read and parse a HAR file from the given path
    pub fn from_file(path: &Path) -> Result<Har> {
        tracing::debug!("Reading HAR file from: {}", path.display());

        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let har: Har = serde_json::from_reader(reader)?;

        tracing::info!(
            "Successfully parsed HAR file with {} entries",
            har.log.entries.len()
        );

        Ok(har)
    }

    /// Parse a HAR document from raw JSON bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Har> {
        tracing::debug!("Parsing HAR from {} bytes", bytes.len());

        let har: Har = serde_json::from_slice(bytes)?;

        tracing::info!(
            "Successfully parsed HAR with {} entries",
            har.log.entries.len()
        );

        Ok(har)
    }

    /// Parse a HAR document from a JSON string
    pub fn from_str(content: &str) -> Result<Har> {
        Self::from_slice(content.as_bytes())
    }

    /// Validate that a HAR structure is well-formed
    pub fn validate(har: &Har) -> Result<()> {
        tracing::debug!("Validating HAR structure");

        if har.log.version.is_empty() {
            return Err(Error::InvalidStructure("Missing HAR version".to_string()));
        }

        if har.log.entries.is_empty() {
            tracing::warn!("HAR file contains no entries");
        }

        for (idx, entry) in har.log.entries.iter().enumerate() {
            if entry.request.method.is_empty() {
                return Err(Error::InvalidStructure(format!(
                    "Entry {} has empty request method",
                    idx
                )));
            }
            if entry.request.url.is_empty() {
                return Err(Error::InvalidStructure(format!(
                    "Entry {} has empty request URL",
                    idx
                )));
            }
        }

        tracing::debug!("HAR structure is valid");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENTRY: &str = r#"{
        "log": {
            "version": "1.2",
            "creator": {"name": "test", "version": "1.0"},
            "pages": [{"startedDateTime": "2021-06-09T10:18:14.120Z", "id": "page_1", "pageTimings": {}}],
            "entries": [{
                "startedDateTime": "2021-06-09T10:18:14.123+02:00",
                "time": 85,
                "request": {"method": "GET", "url": "http://example.com/?q=1", "postData": {"text": "a=b"}},
                "response": {
                    "status": 200,
                    "statusText": "OK",
                    "content": {"size": 5, "mimeType": "text/plain", "text": "hello"}
                },
                "timings": {"send": 20, "wait": 38, "receive": 27}
            }]
        }
    }"#;

    #[test]
    fn test_parse_minimal_har() {
        let har_json = r#"{
            "log": {
                "version": "1.2",
                "creator": {"name": "test", "version": "1.0"},
                "entries": []
            }
        }"#;

        let har = HarReader::from_str(har_json).unwrap();
        assert_eq!(har.log.version, "1.2");
        assert_eq!(har.log.entries.len(), 0);
    }

    #[test]
    fn test_parse_applies_defaults() {
        let har = HarReader::from_slice(ENTRY.as_bytes()).unwrap();
        let page = &har.log.pages.as_ref().unwrap()[0];
        assert_eq!(page.title, "");

        let entry = &har.log.entries[0];
        assert_eq!(entry.request.http_version, "HTTP/1.1");
        assert_eq!(entry.response.http_version, "HTTP/1.1");
        assert!(entry.request.headers.is_empty());
        assert_eq!(entry.request.headers_size, -1);
        assert_eq!(entry.response.redirect_url, "");

        let post_data = entry.request.post_data.as_ref().unwrap();
        assert_eq!(post_data.mime_type, "");
        assert_eq!(post_data.text, "a=b");
        assert!(post_data.params.is_empty());
    }

    #[test]
    fn test_parse_missing_required_field() {
        let har_json = ENTRY.replace(r#""statusText": "OK","#, "");
        let err = HarReader::from_str(&har_json).unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
        assert!(err.to_string().contains("statusText"));

        let har_json = ENTRY.replace(r#""method": "GET", "#, "");
        assert!(HarReader::from_str(&har_json).is_err());
    }

    #[test]
    fn test_parse_rejects_bad_date() {
        let har_json = ENTRY.replace("2021-06-09T10:18:14.123+02:00", "June 9th");
        let err = HarReader::from_str(&har_json).unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_parse_rejects_malformed_json() {
        assert!(matches!(
            HarReader::from_slice(b"{\"log\": ").unwrap_err(),
            Error::Parse(_)
        ));
    }

    #[test]
    fn test_validate_empty_version() {
        let har_json = r#"{
            "log": {
                "version": "",
                "creator": {"name": "test", "version": "1.0"},
                "entries": []
            }
        }"#;

        let har = HarReader::from_str(har_json).unwrap();
        let result = HarReader::validate(&har);
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_empty_method() {
        let mut har = HarReader::from_str(ENTRY).unwrap();
        assert!(HarReader::validate(&har).is_ok());

        har.log.entries[0].request.method.clear();
        assert!(matches!(
            HarReader::validate(&har),
            Err(Error::InvalidStructure(_))
        ));
    }
}
