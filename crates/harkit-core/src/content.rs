use crate::har::Content;
use base64::engine::Engine;
use base64::engine::general_purpose::STANDARD;

/// Encoding tag for base64 bodies
pub const BASE64: &str = "base64";

impl Content {
    /// Build content from already-encoded text
    ///
    /// `size` is the byte length of the payload the text decodes to.
    pub fn from_text(
        text: impl Into<String>,
        mime_type: impl Into<String>,
        encoding: Option<&str>,
    ) -> Self {
        let mut content = Self {
            mime_type: mime_type.into(),
            text: Some(text.into()),
            encoding: encoding.map(str::to_string),
            ..Self::default()
        };
        content.size = content.to_bytes().len() as i64;
        content
    }

    /// Build content from a raw body, falling back to base64 for binary data
    pub fn from_bytes(data: &[u8], mime_type: impl Into<String>) -> Self {
        let (text, encoding) = match std::str::from_utf8(data) {
            Ok(text) => (text.to_string(), None),
            Err(_) => (STANDARD.encode(data), Some(BASE64.to_string())),
        };

        Self {
            size: data.len() as i64,
            mime_type: mime_type.into(),
            text: Some(text),
            encoding,
            ..Self::default()
        }
    }

    /// Whether the text is base64 encoded
    pub fn is_base64(&self) -> bool {
        self.encoding
            .as_deref()
            .is_some_and(|encoding| encoding.eq_ignore_ascii_case(BASE64))
    }

    /// Decoded body bytes; empty when there is no text or the base64 is invalid
    pub fn to_bytes(&self) -> Vec<u8> {
        let Some(text) = &self.text else {
            return Vec::new();
        };

        if !self.is_base64() {
            return text.as_bytes().to_vec();
        }

        match STANDARD.decode(text.trim()) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!("Discarding content with invalid base64 text: {}", e);
                Vec::new()
            }
        }
    }
}
