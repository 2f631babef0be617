use super::types::{
    Content, Cookie, Entry, Header, Param, PostData, QueryParam, Request, Response, UNKNOWN_SIZE,
};
use crate::headers;
use crate::{Error, Result};
use http::header::{CONTENT_TYPE, LOCATION};
use mime::Mime;
use url::{Position, Url, form_urlencoded};

const HTTP_1_1: &str = "HTTP/1.1";

impl Request {
    /// Build a request from captured wire data
    ///
    /// `postData.text` holds the body as lossy UTF-8; `bodySize` keeps the raw
    /// byte length. Non-UTF-8 bytes do not survive a trip through the HAR.
    pub fn from_parts(
        method: impl Into<String>,
        url: impl Into<String>,
        headers: Vec<Header>,
        body: &[u8],
    ) -> Self {
        Self::build(method.into(), url.into(), HTTP_1_1.to_string(), headers, body)
    }

    /// Build a request from an `http::Request`
    pub fn from_http<B: AsRef<[u8]>>(request: &http::Request<B>) -> Self {
        Self::build(
            request.method().to_string(),
            request.uri().to_string(),
            version_name(request.version()),
            header_list(request.headers()),
            request.body().as_ref(),
        )
    }

    fn build(
        method: String,
        url: String,
        http_version: String,
        headers: Vec<Header>,
        body: &[u8],
    ) -> Self {
        let mut request = Self {
            method,
            query_string: query_params(&url),
            url,
            http_version,
            cookies: Vec::new(),
            post_data: post_data(&headers, body),
            headers,
            headers_size: UNKNOWN_SIZE,
            body_size: body.len() as i64,
            comment: None,
        };
        request.refresh_derived();
        request
    }

    /// Cookies parsed from the current `Cookie` headers
    pub fn derived_cookies(&self) -> Vec<Cookie> {
        headers::request_cookies(&self.headers)
    }

    /// Size of the request line and header block as sent on the wire
    pub fn computed_headers_size(&self) -> i64 {
        let target = match Url::parse(&self.url) {
            Ok(url) => url[Position::BeforePath..Position::AfterQuery].to_string(),
            Err(_) => self.url.clone(),
        };
        let start_line = format!("{} {} {}\r\n", self.method, target, self.http_version);
        (start_line.len() + header_block_size(&self.headers)) as i64
    }

    /// Recompute cookies and `headersSize` from the current headers
    pub fn refresh_derived(&mut self) {
        self.cookies = self.derived_cookies();
        self.headers_size = self.computed_headers_size();
    }

    /// Body bytes for replay, taken from `postData.text`
    ///
    /// Invalid UTF-8 captured at ingestion comes back as U+FFFD sequences.
    pub fn body_bytes(&self) -> Vec<u8> {
        self.post_data
            .as_ref()
            .map(|post_data| post_data.text.as_bytes().to_vec())
            .unwrap_or_default()
    }

    /// Emit this request as an `http::Request` suitable for replay
    pub fn to_http(&self) -> Result<http::Request<Vec<u8>>> {
        let mut builder = http::Request::builder()
            .method(self.method.as_str())
            .uri(self.url.as_str())
            .version(parse_version(&self.http_version));

        for header in replayable(&self.headers) {
            builder = builder.header(header.name.as_str(), header.value.as_str());
        }

        Ok(builder.body(self.body_bytes())?)
    }
}

impl Response {
    /// Build a response from captured wire data
    pub fn from_parts(
        status: u16,
        status_text: impl Into<String>,
        headers: Vec<Header>,
        body: &[u8],
    ) -> Self {
        Self::build(status, status_text.into(), HTTP_1_1.to_string(), headers, body)
    }

    /// Build a response from an `http::Response`
    pub fn from_http<B: AsRef<[u8]>>(response: &http::Response<B>) -> Self {
        let status = response.status();
        Self::build(
            status.as_u16(),
            status.canonical_reason().unwrap_or_default().to_string(),
            version_name(response.version()),
            header_list(response.headers()),
            response.body().as_ref(),
        )
    }

    fn build(
        status: u16,
        status_text: String,
        http_version: String,
        headers: Vec<Header>,
        body: &[u8],
    ) -> Self {
        let mime_type = headers::value(&headers, CONTENT_TYPE.as_str())
            .unwrap_or(mime::APPLICATION_OCTET_STREAM.as_ref())
            .to_string();
        let redirect_url = headers::value(&headers, LOCATION.as_str())
            .unwrap_or_default()
            .to_string();

        let mut response = Self {
            status: status as i64,
            status_text,
            http_version,
            cookies: Vec::new(),
            content: Content::from_bytes(body, mime_type),
            headers,
            redirect_url,
            headers_size: UNKNOWN_SIZE,
            body_size: body.len() as i64,
            comment: None,
        };
        response.refresh_derived();
        response
    }

    /// Cookies parsed from the current `Set-Cookie` headers
    pub fn derived_cookies(&self) -> Vec<Cookie> {
        headers::response_cookies(&self.headers)
    }

    /// Size of the status line and header block as received on the wire
    pub fn computed_headers_size(&self) -> i64 {
        let start_line = format!(
            "{} {} {}\r\n",
            self.http_version, self.status, self.status_text
        );
        (start_line.len() + header_block_size(&self.headers)) as i64
    }

    /// Recompute cookies and `headersSize` from the current headers
    pub fn refresh_derived(&mut self) {
        self.cookies = self.derived_cookies();
        self.headers_size = self.computed_headers_size();
    }

    /// Emit this response as an `http::Response` suitable for replay
    pub fn to_http(&self) -> Result<http::Response<Vec<u8>>> {
        let status = u16::try_from(self.status).map_err(|_| {
            Error::InvalidStructure(format!("Response status {} is out of range", self.status))
        })?;

        let mut builder = http::Response::builder()
            .status(status)
            .version(parse_version(&self.http_version));

        for header in replayable(&self.headers) {
            builder = builder.header(header.name.as_str(), header.value.as_str());
        }

        Ok(builder.body(self.content.to_bytes())?)
    }
}

impl Entry {
    /// Emit the request/response pair for replay by a transport or mock layer
    pub fn to_http(&self) -> Result<(http::Request<Vec<u8>>, http::Response<Vec<u8>>)> {
        Ok((self.request.to_http()?, self.response.to_http()?))
    }
}

fn header_list(map: &http::HeaderMap) -> Vec<Header> {
    map.iter()
        .map(|(name, value)| {
            Header::new(
                name.as_str(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect()
}

/// HTTP/2 pseudo-headers (`:authority`, ...) are not real header fields
fn replayable(headers: &[Header]) -> impl Iterator<Item = &Header> {
    headers.iter().filter(|header| {
        let pseudo = header.name.starts_with(':');
        if pseudo {
            tracing::debug!("Skipping pseudo-header {} on replay", header.name);
        }
        !pseudo
    })
}

fn header_block_size(headers: &[Header]) -> usize {
    headers
        .iter()
        .map(|header| header.name.len() + header.value.len() + 4)
        .sum::<usize>()
        + 2
}

fn query_params(url: &str) -> Vec<QueryParam> {
    let pairs: Vec<(String, String)> = match Url::parse(url) {
        Ok(url) => url.query_pairs().into_owned().collect(),
        Err(_) => {
            let query = url
                .split_once('?')
                .map(|(_, query)| query.split('#').next().unwrap_or_default())
                .unwrap_or_default();
            form_urlencoded::parse(query.as_bytes())
                .into_owned()
                .collect()
        }
    };

    pairs
        .into_iter()
        .map(|(name, value)| QueryParam::new(name, value))
        .collect()
}

fn post_data(headers: &[Header], body: &[u8]) -> Option<PostData> {
    if body.is_empty() {
        return None;
    }

    let mime_type = headers::value(headers, CONTENT_TYPE.as_str())
        .unwrap_or(mime::APPLICATION_OCTET_STREAM.as_ref())
        .to_string();

    let params = if is_form_urlencoded(&mime_type) {
        form_urlencoded::parse(body)
            .map(|(name, value)| Param {
                name: name.into_owned(),
                value: Some(value.into_owned()),
                ..Param::default()
            })
            .collect()
    } else {
        Vec::new()
    };

    Some(PostData {
        mime_type,
        params,
        text: String::from_utf8_lossy(body).into_owned(),
        comment: None,
    })
}

fn is_form_urlencoded(mime_type: &str) -> bool {
    mime_type.parse::<Mime>().is_ok_and(|mime| {
        mime.essence_str() == mime::APPLICATION_WWW_FORM_URLENCODED.essence_str()
    })
}

fn version_name(version: http::Version) -> String {
    match version {
        http::Version::HTTP_09 => "HTTP/0.9",
        http::Version::HTTP_10 => "HTTP/1.0",
        http::Version::HTTP_2 => "HTTP/2.0",
        http::Version::HTTP_3 => "HTTP/3.0",
        _ => HTTP_1_1,
    }
    .to_string()
}

fn parse_version(version: &str) -> http::Version {
    match version.to_ascii_lowercase().as_str() {
        "http/0.9" => http::Version::HTTP_09,
        "http/1.0" => http::Version::HTTP_10,
        "h2" | "http/2" | "http/2.0" => http::Version::HTTP_2,
        "h3" | "http/3" | "http/3.0" => http::Version::HTTP_3,
        _ => http::Version::HTTP_11,
    }
}
