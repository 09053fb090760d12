//! Conversion between host records and NFC Forum NDEF bytes, for hosts that read and write
//! raw tag memory instead of records.

use tagkit_ndef::{
    NdefCodecError, NdefRecord as WireRecord,
    ndef_type::NdefType,
    payload::{NdefPayload, TextPayload},
    tlv,
};

use super::{NdefMessage, NdefRecord, OutboundMessage, RecordType};

const OCTET_STREAM: &str = "application/octet-stream";

impl NdefRecord {
    /// `language` is used for text records that do not carry their own
    pub fn to_wire(&self, language: &str) -> Result<WireRecord, NdefCodecError> {
        let id = self.id.as_ref().map(|id| id.as_bytes().to_vec());
        let data = self.payload().to_vec();

        match &self.record_type {
            RecordType::Text => {
                let language = self.lang.as_deref().unwrap_or(language);
                let text = String::from_utf8_lossy(&data);
                let payload = NdefPayload::Text(TextPayload::utf8(language, text));
                WireRecord::new(NdefType::WellKnown, b"T".to_vec(), id, payload)
            }

            RecordType::Url => {
                let uri = String::from_utf8_lossy(&data).to_string();
                WireRecord::new(NdefType::WellKnown, b"U".to_vec(), id, NdefPayload::Uri(uri))
            }

            RecordType::SmartPoster => {
                WireRecord::new(NdefType::WellKnown, b"Sp".to_vec(), id, NdefPayload::Data(data))
            }

            RecordType::Mime => {
                let media_type = self.media_type.as_deref().unwrap_or(OCTET_STREAM);
                let type_ = media_type.as_bytes().to_vec();
                WireRecord::new(NdefType::Mime, type_, id, NdefPayload::Data(data))
            }

            // the url lives in the type field
            RecordType::AbsoluteUrl => {
                WireRecord::new(NdefType::AbsoluteUri, data, id, NdefPayload::Data(Vec::new()))
            }

            RecordType::Empty => {
                WireRecord::new(NdefType::Empty, Vec::new(), None, NdefPayload::Data(Vec::new()))
            }

            RecordType::Unknown => {
                WireRecord::new(NdefType::Unknown, Vec::new(), id, NdefPayload::Data(data))
            }

            RecordType::Other(name) => match name.strip_prefix(':') {
                Some(local) => {
                    let type_ = local.as_bytes().to_vec();
                    WireRecord::new(NdefType::WellKnown, type_, id, NdefPayload::Data(data))
                }
                None => {
                    let type_ = name.as_bytes().to_vec();
                    WireRecord::new(NdefType::External, type_, id, NdefPayload::Data(data))
                }
            },
        }
    }

    pub fn from_wire(record: WireRecord) -> Self {
        let id = record.id.as_ref().map(|id| String::from_utf8_lossy(id).to_string());
        let type_name = record.type_string();
        let type_name_format = record.type_name_format();

        let mut converted = match (type_name_format, record.payload) {
            (NdefType::WellKnown, NdefPayload::Text(text)) => NdefRecord {
                lang: Some(text.language),
                ..NdefRecord::text(text.text)
            },

            (NdefType::WellKnown, NdefPayload::Uri(uri)) => NdefRecord::url(uri),

            (NdefType::WellKnown, payload) if type_name == "Sp" => {
                NdefRecord::new(RecordType::SmartPoster, Some(payload.to_bytes()))
            }

            (NdefType::WellKnown, payload) => {
                NdefRecord::new(RecordType::Other(format!(":{type_name}")), Some(payload.to_bytes()))
            }

            (NdefType::Mime, payload) => NdefRecord::mime(type_name, payload.to_bytes()),

            (NdefType::AbsoluteUri, _) => {
                NdefRecord::new(RecordType::AbsoluteUrl, Some(record.type_))
            }

            (NdefType::External, payload) => {
                NdefRecord::new(RecordType::Other(type_name), Some(payload.to_bytes()))
            }

            (NdefType::Empty, _) => NdefRecord::new(RecordType::Empty, None),

            (NdefType::Unknown | NdefType::Unchanged | NdefType::Reserved, payload) => {
                NdefRecord::new(RecordType::Unknown, Some(payload.to_bytes()))
            }
        };

        converted.id = id;
        converted
    }
}

impl NdefMessage {
    /// Parse a bare NDEF message (no TLV framing)
    pub fn from_ndef_bytes(data: &[u8]) -> Result<Self, NdefCodecError> {
        let records = tagkit_ndef::parse_message(data)?;
        let records = records.into_iter().map(NdefRecord::from_wire).collect();

        // the parser always yields at least one record
        Ok(Self(records))
    }

    pub fn to_ndef_bytes(&self, language: &str) -> Result<Vec<u8>, NdefCodecError> {
        let records = self
            .0
            .iter()
            .map(|record| record.to_wire(language))
            .collect::<Result<Vec<_>, _>>()?;

        tagkit_ndef::encode_message(&records)
    }

    /// Parse the message out of a Type 2 tag's data area
    pub fn from_tag_memory(data: &[u8]) -> Result<Self, NdefCodecError> {
        Self::from_ndef_bytes(tlv::unwrap_tlv(data)?)
    }

    /// The message framed as an NDEF message TLV, ready to write to a Type 2 tag's data area
    pub fn to_tag_memory(&self, language: &str) -> Result<Vec<u8>, NdefCodecError> {
        tlv::wrap_tlv(&self.to_ndef_bytes(language)?)
    }
}

impl OutboundMessage {
    /// Bytes for a raw tag write, raw payloads are returned as given
    pub fn to_ndef_bytes(&self, language: &str) -> Result<Vec<u8>, NdefCodecError> {
        match self {
            OutboundMessage::Message(message) => message.to_ndef_bytes(language),
            OutboundMessage::Raw(data) => Ok(data.clone()),
        }
    }
}
