//! NDEF records in the shape hosts exchange them: a record type name, an optional media
//! type and a payload. See [`wire`] for the NFC Forum byte format.

pub mod wire;

use std::fmt;

use crate::error::NfcError;

pub const JSON_MEDIA_TYPE: &str = "application/json";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecordType {
    Text,
    Url,
    Mime,
    AbsoluteUrl,
    Empty,
    Unknown,
    SmartPoster,
    /// External (`domain:type`) or local (`:type`) record types
    Other(String),
}

impl RecordType {
    pub fn from_name(name: &str) -> Self {
        match name {
            "text" => RecordType::Text,
            "url" => RecordType::Url,
            "mime" => RecordType::Mime,
            "absolute-url" => RecordType::AbsoluteUrl,
            "empty" => RecordType::Empty,
            "unknown" => RecordType::Unknown,
            "smart-poster" => RecordType::SmartPoster,
            other => RecordType::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            RecordType::Text => "text",
            RecordType::Url => "url",
            RecordType::Mime => "mime",
            RecordType::AbsoluteUrl => "absolute-url",
            RecordType::Empty => "empty",
            RecordType::Unknown => "unknown",
            RecordType::SmartPoster => "smart-poster",
            RecordType::Other(name) => name,
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for RecordType {
    fn from(name: &str) -> Self {
        Self::from_name(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NdefRecord {
    pub record_type: RecordType,
    pub media_type: Option<String>,
    pub id: Option<String>,
    pub lang: Option<String>,
    pub data: Option<Vec<u8>>,
}

impl NdefRecord {
    pub fn new(record_type: RecordType, data: Option<Vec<u8>>) -> Self {
        Self { record_type, media_type: None, id: None, lang: None, data }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::new(RecordType::Text, Some(text.into().into_bytes()))
    }

    pub fn url(url: impl Into<String>) -> Self {
        Self::new(RecordType::Url, Some(url.into().into_bytes()))
    }

    pub fn mime(media_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self { media_type: Some(media_type.into()), ..Self::new(RecordType::Mime, Some(data)) }
    }

    pub fn json(json: Vec<u8>) -> Self {
        Self::mime(JSON_MEDIA_TYPE, json)
    }

    pub fn is_json(&self) -> bool {
        self.record_type == RecordType::Mime && self.media_type.as_deref() == Some(JSON_MEDIA_TYPE)
    }

    /// Payload bytes, empty when the record has none
    pub fn payload(&self) -> &[u8] {
        self.data.as_deref().unwrap_or_default()
    }
}

/// An ordered, non-empty list of records, written to a tag as one unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NdefMessage(Vec<NdefRecord>);

impl NdefMessage {
    pub fn try_new(records: Vec<NdefRecord>) -> Result<Self, NfcError> {
        if records.is_empty() {
            return Err(NfcError::EmptyMessage);
        }

        Ok(Self(records))
    }

    pub fn single(record: NdefRecord) -> Self {
        Self(vec![record])
    }

    pub fn records(&self) -> &[NdefRecord] {
        &self.0
    }

    pub fn into_records(self) -> Vec<NdefRecord> {
        self.0
    }
}

/// What the session hands to the platform's write primitive
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundMessage {
    Message(NdefMessage),

    /// Bytes passed through to the platform untouched
    Raw(Vec<u8>),
}

impl OutboundMessage {
    /// Record kinds and sizes, safe to log since it leaves the payloads out
    pub fn summary(&self) -> String {
        let records = match self {
            OutboundMessage::Raw(data) => return format!("raw ({} bytes)", data.len()),
            OutboundMessage::Message(message) => message.records(),
        };

        let kinds = records.iter().map(|record| {
            let size = record.payload().len();
            match &record.media_type {
                Some(media_type) => format!("{} {media_type} ({size} bytes)", record.record_type),
                None => format!("{} ({size} bytes)", record.record_type),
            }
        });

        kinds.collect::<Vec<_>>().join(", ")
    }
}
