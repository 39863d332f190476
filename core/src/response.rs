//! Uniform response envelope returned by every client operation.
//!
//! # Design
//! The body is decoded in two explicit steps. A missing body, or bytes that
//! are not UTF-8 text, become [`ParsedBody::Absent`]. Text is then tried as
//! JSON; on a syntax error the raw text is kept as [`ParsedBody::Raw`], so an
//! empty text body comes back as `Raw("")`. The normalizer itself never
//! fails, so a garbled body is never an error.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::http::{find_header, HttpResponse};

/// Decoded response body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParsedBody {
    /// Body text was valid JSON.
    Json(Value),
    /// Body text was not valid JSON; kept verbatim.
    Raw(String),
    /// No body at all, or a body that is not text.
    Absent,
}

impl ParsedBody {
    pub fn parse(body: Option<&[u8]>) -> Self {
        let text = match body.map(std::str::from_utf8) {
            Some(Ok(text)) => text,
            _ => return ParsedBody::Absent,
        };
        match serde_json::from_str(text) {
            Ok(value) => ParsedBody::Json(value),
            Err(_) => ParsedBody::Raw(text.to_string()),
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ParsedBody::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_raw(&self) -> Option<&str> {
        match self {
            ParsedBody::Raw(text) => Some(text),
            _ => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, ParsedBody::Absent)
    }

    /// Collapse into a single JSON value: raw text becomes a string and an
    /// absent body becomes `null`.
    pub fn into_value(self) -> Value {
        match self {
            ParsedBody::Json(value) => value,
            ParsedBody::Raw(text) => Value::String(text),
            ParsedBody::Absent => Value::Null,
        }
    }
}

/// Client-side timing of a single request, in microseconds since the UNIX epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Metadata {
    pub start_time: u64,
    pub end_time: u64,
    pub total_time: u64,
}

impl Metadata {
    /// `total_time` saturates at zero if the wall clock stepped backwards
    /// between the two readings.
    pub fn new(start_time: u64, end_time: u64) -> Self {
        Self {
            start_time,
            end_time,
            total_time: end_time.saturating_sub(start_time),
        }
    }
}

/// Current wall-clock time in microseconds since the UNIX epoch.
pub(crate) fn now_micros() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_micros() as u64)
        .unwrap_or(0)
}

/// The result of one API call.
///
/// HTTP error statuses are not errors at this layer; inspect `code`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseEnvelope {
    pub body: ParsedBody,
    pub code: u16,
    pub cookies: Option<String>,
    #[serde(serialize_with = "serialize_headers")]
    pub headers: Vec<(String, String)>,
    pub metadata: Metadata,
}

impl ResponseEnvelope {
    pub fn normalize(response: HttpResponse, start_time: u64, end_time: u64) -> Self {
        let cookies = set_cookie(&response.headers);
        Self {
            body: ParsedBody::parse(response.body.as_deref()),
            code: response.status,
            cookies,
            headers: response.headers,
            metadata: Metadata::new(start_time, end_time),
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.code)
    }
}

/// Multiple `set-cookie` headers are folded into one comma-separated value.
fn set_cookie(headers: &[(String, String)]) -> Option<String> {
    let values: Vec<&str> = headers
        .iter()
        .filter(|(name, _)| name.eq_ignore_ascii_case("set-cookie"))
        .map(|(_, value)| value.as_str())
        .collect();
    if values.is_empty() {
        None
    } else {
        Some(values.join(", "))
    }
}

/// Repeated names (compared case-insensitively) are folded into one entry,
/// values joined with `", "`, keeping first-seen order and spelling.
fn serialize_headers<S: Serializer>(
    headers: &[(String, String)],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut folded: Vec<(&str, String)> = Vec::with_capacity(headers.len());
    for (name, value) in headers {
        match folded.iter_mut().find(|(seen, _)| seen.eq_ignore_ascii_case(name)) {
            Some((_, joined)) => {
                joined.push_str(", ");
                joined.push_str(value);
            }
            None => folded.push((name.as_str(), value.clone())),
        }
    }

    let mut map = serializer.serialize_map(Some(folded.len()))?;
    for (name, value) in &folded {
        map.serialize_entry(name, value)?;
    }
    map.end()
}
