use winnow::error::{ErrMode, Needed};

pub mod header;
pub mod ndef_type;
pub mod parser;
pub mod payload;
pub mod record;
pub mod tlv;
pub mod writer;

pub use record::NdefRecord;
pub use writer::encode_message;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NdefCodecError {
    #[error("Error parsing the NDEF message: {0}")]
    ParsingError(String),

    #[error("Not enough data to parse the NDEF message")]
    Incomplete { needed: Option<usize> },

    #[error("No NDEF message TLV found in the tag data")]
    MissingTlv,

    #[error("An NDEF message needs at least one record")]
    EmptyMessage,

    #[error("Record {field} is too long ({length} bytes)")]
    FieldTooLong { field: &'static str, length: usize },
}

pub type Error = NdefCodecError;

/// Parse a complete NDEF message, trailing bytes after the last record are ignored
pub fn parse_message(data: &[u8]) -> Result<Vec<NdefRecord>, NdefCodecError> {
    let mut stream = parser::stream::new(data);

    match parser::parse_ndef_records(&mut stream) {
        Ok(records) => {
            if !stream.is_empty() {
                tracing::debug!("{} bytes left over after the last record", stream.len());
            }

            Ok(records)
        }

        Err(ErrMode::Incomplete(Needed::Size(needed))) => {
            Err(NdefCodecError::Incomplete { needed: Some(needed.get()) })
        }

        Err(ErrMode::Incomplete(Needed::Unknown)) => {
            Err(NdefCodecError::Incomplete { needed: None })
        }

        Err(error) => Err(NdefCodecError::ParsingError(format!("error parsing message: {error}"))),
    }
}
