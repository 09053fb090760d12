use crate::{Error, header::NdefHeader, ndef_type::NdefType, payload::NdefPayload};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NdefRecord {
    pub header: NdefHeader,
    pub type_: Vec<u8>,
    pub id: Option<Vec<u8>>,
    pub payload: NdefPayload,
}

impl NdefRecord {
    /// Build a standalone record, the message flags are set when the message is encoded
    pub fn new(
        type_name_format: NdefType,
        type_: impl Into<Vec<u8>>,
        id: Option<Vec<u8>>,
        payload: NdefPayload,
    ) -> Result<Self, Error> {
        let type_ = type_.into();
        let type_length = u8::try_from(type_.len())
            .map_err(|_| Error::FieldTooLong { field: "type", length: type_.len() })?;

        let id_length = id
            .as_ref()
            .map(|id| {
                u8::try_from(id.len())
                    .map_err(|_| Error::FieldTooLong { field: "id", length: id.len() })
            })
            .transpose()?;

        let payload_bytes = payload.to_bytes().len();
        let payload_length = u32::try_from(payload_bytes)
            .map_err(|_| Error::FieldTooLong { field: "payload", length: payload_bytes })?;

        let header = NdefHeader {
            message_begin: false,
            message_end: false,
            chunked: false,
            short_record: payload_length <= u8::MAX as u32,
            has_id_length: id_length.is_some(),
            type_name_format,
            type_length,
            payload_length,
            id_length,
        };

        Ok(Self { header, type_, id, payload })
    }

    pub fn type_name_format(&self) -> NdefType {
        self.header.type_name_format
    }

    /// Record type as text, types are ascii in every record format we write
    pub fn type_string(&self) -> String {
        String::from_utf8_lossy(&self.type_).to_string()
    }
}
