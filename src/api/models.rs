//! Wire models for the project backend.
//!
//! Contains the record summaries returned by the collection endpoint, the
//! login exchange, and the multipart payload built by the entry form.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Summary of a project as returned by the collection endpoint.
///
/// Only a handful of fields drive the listing; everything else is kept in
/// `extra` so the detail view can show it untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RecordSummary {
    /// Backend document ID
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "clientName", default, skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    #[serde(rename = "projectType", default, skip_serializing_if = "Option::is_none")]
    pub project_type: Option<String>,
    #[serde(rename = "projectHead", default, skip_serializing_if = "Option::is_none")]
    pub project_head: Option<String>,
    /// Every other field of the record
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RecordSummary {
    #[cfg(test)]
    pub fn new(id: &str, client_name: &str) -> Self {
        Self {
            id: Some(id.to_string()),
            client_name: Some(client_name.to_string()),
            ..Self::default()
        }
    }

    /// Text shown for a field that may be missing.
    pub fn display(value: Option<&str>) -> &str {
        match value {
            Some(v) if !v.is_empty() => v,
            _ => "-",
        }
    }
}

/// `data` may hold either one record or a list of them.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    Many(Vec<RecordSummary>),
    One(Box<RecordSummary>),
}

/// Envelope returned by the collection endpoint.
#[derive(Debug, Deserialize)]
pub struct CollectionResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<OneOrMany>,
}

impl CollectionResponse {
    /// Normalise the envelope into a record list.
    ///
    /// `success: false` or a missing `data` yields an empty list.
    pub fn into_records(self) -> Vec<RecordSummary> {
        if !self.success {
            return Vec::new();
        }
        match self.data {
            Some(OneOrMany::Many(records)) => records,
            Some(OneOrMany::One(record)) => vec![*record],
            None => Vec::new(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
}

/// One part of the multipart upload body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadPart {
    Text {
        key: &'static str,
        value: String,
    },
    File {
        key: &'static str,
        file_name: String,
        content_type: String,
        bytes: Vec<u8>,
    },
}

impl PayloadPart {
    #[cfg(test)]
    pub fn key(&self) -> &'static str {
        match self {
            PayloadPart::Text { key, .. } | PayloadPart::File { key, .. } => key,
        }
    }
}

/// Literal sent for an attachment slot that holds no file.
pub const EMPTY_ATTACHMENT: &str = "null";

/// Ordered multipart payload, one part per record slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Payload {
    pub parts: Vec<PayloadPart>,
}

impl Payload {
    #[cfg(test)]
    pub fn get(&self, key: &str) -> Option<&PayloadPart> {
        self.parts.iter().find(|part| part.key() == key)
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }
}
