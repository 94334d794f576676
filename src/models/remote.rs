//! Records exchanged with the remote collaborators: directory entries and
//! request/response descriptors for the request executor.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::message::RawMessage;

/// LDN service entry as returned by the service directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LdnService {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub enabled: bool,
}

impl LdnService {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
            url: None,
            enabled: true,
        }
    }
}

/// Minimal view of a repository item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemSummary {
    pub id: Uuid,
    pub name: String,
}

impl ItemSummary {
    pub fn new(id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Post,
}

/// Request handed to the request executor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestDescriptor {
    pub request_id: Uuid,
    pub method: HttpMethod,
    pub href: String,
    #[serde(default)]
    pub body: Option<serde_json::Value>,
}

impl RequestDescriptor {
    pub fn post(request_id: Uuid, href: impl Into<String>) -> Self {
        Self {
            request_id,
            method: HttpMethod::Post,
            href: href.into(),
            body: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestEntryState {
    Success,
    Error,
}

/// Outcome of a request as cached by the request executor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestEntry {
    pub request_id: Uuid,
    pub state: RequestEntryState,
    pub status_code: u16,
    #[serde(default)]
    pub error_message: Option<String>,
    /// Updated record; absent when the server reports no change
    #[serde(default)]
    pub payload: Option<RawMessage>,
}

impl RequestEntry {
    pub fn success(request_id: Uuid, payload: Option<RawMessage>) -> Self {
        Self {
            request_id,
            state: RequestEntryState::Success,
            status_code: 200,
            error_message: None,
            payload,
        }
    }

    pub fn error(request_id: Uuid, status_code: u16, message: impl Into<String>) -> Self {
        Self {
            request_id,
            state: RequestEntryState::Error,
            status_code,
            error_message: Some(message.into()),
            payload: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.state == RequestEntryState::Success && (200..300).contains(&self.status_code)
    }
}

/// Percent-encode `segment` so it stays one path segment of an href
///
/// Keeps RFC 3986 `pchar` characters other than `%` as they are; everything
/// else, `/` `?` `#` and non-ASCII included, is encoded byte by byte.
pub fn encode_path_segment(segment: &str) -> String {
    let mut encoded = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-' | b'.' | b'_' | b'~'
            | b'!' | b'$' | b'&' | b'\'' | b'(' | b')' | b'*' | b'+' | b',' | b';' | b'='
            | b':' | b'@' => encoded.push(byte as char),
            other => encoded.push_str(&format!("%{other:02X}")),
        }
    }
    encoded
}

/// Inverse of [`encode_path_segment`]; `None` on a malformed escape or invalid UTF-8
pub fn decode_path_segment(segment: &str) -> Option<String> {
    let bytes = segment.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut index = 0;
    while index < bytes.len() {
        if bytes[index] == b'%' {
            let hex = segment.get(index + 1..index + 3)?;
            decoded.push(u8::from_str_radix(hex, 16).ok()?);
            index += 3;
        } else {
            decoded.push(bytes[index]);
            index += 1;
        }
    }
    String::from_utf8(decoded).ok()
}
