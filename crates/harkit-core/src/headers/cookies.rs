use super::{COOKIE, SET_COOKIE, values};
use crate::har::{Cookie, HarDate, Header};
use chrono::NaiveDateTime;

/// Expires formats, tried in order: RFC 1123, RFC 850 (2-digit year), dashed 4-digit year
const EXPIRES_FORMATS: [&str; 3] = [
    "%a, %d %b %Y %H:%M:%S",
    "%A, %d-%b-%y %H:%M:%S",
    "%a, %d-%b-%Y %H:%M:%S",
];

/// Whether `c` may appear in a cookie name token
pub fn is_cookie_token_char(c: char) -> bool {
    !c.is_ascii_control() && !"()<>@,;:\\\"/[]?={} \t".contains(c)
}

/// Parse a request `Cookie:` header value into one cookie per pair
pub fn parse_cookie_header(value: &str) -> Vec<Cookie> {
    value
        .split(';')
        .filter(|pair| !pair.trim().is_empty())
        .map(|pair| {
            let (name, value) = split_pair(pair);
            Cookie::new(name, value)
        })
        .collect()
}

/// Split a `Set-Cookie` value that a transport joined with commas.
///
/// A comma only separates cookies when the text after it (ignoring leading
/// whitespace) starts with a cookie-name token immediately followed by `=`.
/// Any other comma, such as the one inside an Expires date, is data. This
/// can misread a value that itself contains `, token=`.
pub fn split_set_cookie(value: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;

    for (idx, _) in value.match_indices(',') {
        if starts_cookie_pair(&value[idx + 1..]) {
            parts.push(&value[start..idx]);
            start = idx + 1;
        }
    }
    parts.push(&value[start..]);

    parts
        .into_iter()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect()
}

fn starts_cookie_pair(rest: &str) -> bool {
    let rest = rest.trim_start_matches([' ', '\t']);
    let token_len: usize = rest
        .chars()
        .take_while(|c| is_cookie_token_char(*c))
        .map(char::len_utf8)
        .sum();

    token_len > 0 && rest[token_len..].starts_with('=')
}

/// Parse a single (already un-folded) `Set-Cookie` value
pub fn parse_set_cookie(value: &str) -> Option<Cookie> {
    let mut segments = value.split(';');
    let first = segments.next()?;
    if first.trim().is_empty() {
        return None;
    }

    let (name, value) = split_pair(first);
    let mut cookie = Cookie {
        http_only: Some(false),
        secure: Some(false),
        ..Cookie::new(name, value)
    };

    for segment in segments {
        let (attribute, attribute_value) = split_pair(segment);
        match attribute.to_ascii_lowercase().as_str() {
            "expires" => {
                cookie.expires = parse_expires(attribute_value);
                if cookie.expires.is_none() {
                    tracing::warn!(
                        "Ignoring unparseable cookie expiry '{}' for {}",
                        attribute_value,
                        cookie.name
                    );
                }
            }
            "domain" => cookie.domain = Some(attribute_value.to_string()),
            "path" => cookie.path = Some(attribute_value.to_string()),
            "secure" => cookie.secure = Some(true),
            "httponly" => cookie.http_only = Some(true),
            "samesite" => cookie.same_site = Some(attribute_value.to_string()),
            _ => {}
        }
    }

    Some(cookie)
}

/// Parse a cookie `Expires` attribute as a UTC timestamp
pub fn parse_expires(value: &str) -> Option<HarDate> {
    let value = value.trim();
    let value = value
        .strip_suffix("GMT")
        .or_else(|| value.strip_suffix("UTC"))
        .unwrap_or(value)
        .trim_end();

    EXPIRES_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|naive| naive.and_utc().fixed_offset())
}

/// Cookies carried by every `Cookie` header in a request
pub fn request_cookies(headers: &[Header]) -> Vec<Cookie> {
    values(headers, COOKIE)
        .into_iter()
        .flat_map(parse_cookie_header)
        .collect()
}

/// Cookies set by every `Set-Cookie` header in a response, un-folded first
pub fn response_cookies(headers: &[Header]) -> Vec<Cookie> {
    values(headers, SET_COOKIE)
        .into_iter()
        .flat_map(split_set_cookie)
        .filter_map(parse_set_cookie)
        .collect()
}

fn split_pair(pair: &str) -> (&str, &str) {
    match pair.split_once('=') {
        Some((name, value)) => (name.trim(), value.trim()),
        None => (pair.trim(), ""),
    }
}
