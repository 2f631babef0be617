use chrono::{DateTime, FixedOffset, Timelike};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serializer};

/// Timestamp type used throughout the document model
pub type HarDate = DateTime<FixedOffset>;

const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%dT%H:%M:%S%z"];

/// Parse a HAR timestamp, returning `None` when no accepted variant matches
pub fn parse(value: &str) -> Option<HarDate> {
    let value = value.trim();

    if let Ok(date) = DateTime::parse_from_rfc3339(value) {
        return Some(date);
    }

    OFFSET_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(value, fmt).ok())
}

/// Render a timestamp in canonical form (two fractional digits, truncated)
pub fn format(date: &HarDate) -> String {
    let centis = (date.nanosecond() % 1_000_000_000) / 10_000_000;
    let offset = if date.offset().local_minus_utc() == 0 {
        "Z".to_string()
    } else {
        date.format("%:z").to_string()
    };

    format!("{}.{:02}{}", date.format("%Y-%m-%dT%H:%M:%S"), centis, offset)
}

pub fn serialize<S: Serializer>(date: &HarDate, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format(date))
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<HarDate, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse(&raw).ok_or_else(|| D::Error::custom(format!("invalid date '{}'", raw)))
}

/// Serde adapter for optional timestamps
pub mod option {
    use super::HarDate;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        date: &Option<HarDate>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match date {
            Some(date) => serializer.serialize_some(&super::format(date)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<HarDate>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) => super::parse(&raw)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid date '{}'", raw))),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_variants() {
        let expected = parse("2021-06-09T10:18:14.12Z").unwrap();

        assert_eq!(parse("2021-06-09T10:18:14.120Z"), Some(expected));
        assert_eq!(parse("2021-06-09T10:18:14.12+00:00"), Some(expected));
        assert_eq!(parse("2021-06-09T12:18:14.120+0200"), Some(expected));
        assert!(parse("2021-06-09T10:18:14Z").is_some());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse("yesterday").is_none());
        assert!(parse("09 Jun 2021").is_none());
        assert!(parse("").is_none());
    }

    #[test]
    fn test_format_utc_uses_z() {
        let date = parse("2021-06-09T10:18:14.123456Z").unwrap();
        assert_eq!(format(&date), "2021-06-09T10:18:14.12Z");
    }

    #[test]
    fn test_format_keeps_offset() {
        let date = parse("2021-06-09T10:18:14-07:00").unwrap();
        assert_eq!(format(&date), "2021-06-09T10:18:14.00-07:00");
    }
}
