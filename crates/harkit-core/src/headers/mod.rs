mod cookies;

pub use cookies::{
    is_cookie_token_char, parse_cookie_header, parse_expires, parse_set_cookie, request_cookies,
    response_cookies, split_set_cookie,
};

use crate::har::Header;
use lazy_static::lazy_static;
use std::collections::HashMap;

/// Request-side cookie header name
pub const COOKIE: &str = "Cookie";

/// Response-side cookie header name
pub const SET_COOKIE: &str = "Set-Cookie";

/// Header group used for canonical ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HeaderGroup {
    General,
    Request,
    Response,
    Entity,
}

lazy_static! {
    static ref HEADER_GROUPS: HashMap<&'static str, HeaderGroup> = {
        let general = [
            "cache-control",
            "connection",
            "date",
            "pragma",
            "trailer",
            "transfer-encoding",
            "upgrade",
            "via",
            "warning",
        ];
        let request = [
            "accept",
            "accept-charset",
            "accept-encoding",
            "accept-language",
            "authorization",
            "cookie",
            "expect",
            "from",
            "host",
            "if-match",
            "if-modified-since",
            "if-none-match",
            "if-range",
            "if-unmodified-since",
            "max-forwards",
            "proxy-authorization",
            "range",
            "referer",
            "te",
            "user-agent",
        ];
        let response = [
            "accept-ranges",
            "age",
            "etag",
            "location",
            "proxy-authenticate",
            "retry-after",
            "server",
            "set-cookie",
            "vary",
            "www-authenticate",
        ];
        let entity = [
            "allow",
            "content-encoding",
            "content-language",
            "content-length",
            "content-location",
            "content-md5",
            "content-range",
            "content-type",
            "expires",
            "last-modified",
        ];

        let mut groups = HashMap::new();
        for (names, group) in [
            (&general[..], HeaderGroup::General),
            (&request[..], HeaderGroup::Request),
            (&response[..], HeaderGroup::Response),
            (&entity[..], HeaderGroup::Entity),
        ] {
            for name in names {
                groups.insert(*name, group);
            }
        }
        groups
    };
}

impl HeaderGroup {
    /// Look up the group for a header name; unknown names are entity headers
    pub fn of(name: &str) -> Self {
        HEADER_GROUPS
            .get(name.to_ascii_lowercase().as_str())
            .copied()
            .unwrap_or(HeaderGroup::Entity)
    }
}

/// All values for `name`, in their original order
pub fn values<'a>(headers: &'a [Header], name: &str) -> Vec<&'a str> {
    headers
        .iter()
        .filter(|header| header.is(name))
        .map(|header| header.value.as_str())
        .collect()
}

/// First value for `name`
pub fn value<'a>(headers: &'a [Header], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|header| header.is(name))
        .map(|header| header.value.as_str())
}

/// Copy of `headers` sorted by (group, name); equal keys keep their order
pub fn canonical(headers: &[Header]) -> Vec<Header> {
    let mut sorted = headers.to_vec();
    sorted.sort_by_cached_key(|header| {
        (
            HeaderGroup::of(&header.name),
            header.name.to_ascii_lowercase(),
        )
    });
    sorted
}

/// Lookup helpers on header slices
pub trait HeaderList {
    fn values(&self, name: &str) -> Vec<&str>;
    fn value(&self, name: &str) -> Option<&str>;
    fn canonical(&self) -> Vec<Header>;
    /// Headers belonging to `group`, in their original order
    fn header_group(&self, group: HeaderGroup) -> Vec<&Header>;
}

impl HeaderList for [Header] {
    fn values(&self, name: &str) -> Vec<&str> {
        values(self, name)
    }

    fn value(&self, name: &str) -> Option<&str> {
        value(self, name)
    }

    fn canonical(&self) -> Vec<Header> {
        canonical(self)
    }

    fn header_group(&self, group: HeaderGroup) -> Vec<&Header> {
        self.iter()
            .filter(|header| HeaderGroup::of(&header.name) == group)
            .collect()
    }
}
