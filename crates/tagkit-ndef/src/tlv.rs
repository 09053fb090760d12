//! Type-length-value framing used by NFC Forum Type 2 tags to locate the NDEF message in
//! the tag's data area.

use winnow::error::{ErrMode, Needed};

use crate::{Error, parser};

pub const NULL_TLV: u8 = 0x00;
pub const NDEF_MESSAGE_TLV: u8 = 0x03;
pub const TERMINATOR_TLV: u8 = 0xFE;

type Result<T, E = Error> = std::result::Result<T, E>;

/// Find the NDEF message inside a tag's data area, skipping other TLV blocks
pub fn unwrap_tlv(data: &[u8]) -> Result<&[u8]> {
    let mut input = parser::stream::new(data);

    loop {
        if input.is_empty() {
            return Err(Error::MissingTlv);
        }

        match parser::parse_tlv(&mut input) {
            Ok((NDEF_MESSAGE_TLV, value)) => return Ok(value),
            Ok((TERMINATOR_TLV, _)) => return Err(Error::MissingTlv),
            Ok((tag, _)) => tracing::trace!("skipping tlv block {tag:#04x}"),
            Err(ErrMode::Incomplete(Needed::Size(needed))) => {
                return Err(Error::Incomplete { needed: Some(needed.get()) });
            }
            Err(ErrMode::Incomplete(Needed::Unknown)) => {
                return Err(Error::Incomplete { needed: None });
            }
            Err(error) => return Err(Error::ParsingError(format!("error parsing tlv: {error}"))),
        }
    }
}

/// Frame an encoded NDEF message as a message TLV followed by a terminator
pub fn wrap_tlv(message: &[u8]) -> Result<Vec<u8>> {
    let length = u16::try_from(message.len())
        .map_err(|_| Error::FieldTooLong { field: "message", length: message.len() })?;

    let mut bytes = Vec::with_capacity(message.len() + 5);
    bytes.push(NDEF_MESSAGE_TLV);

    match u8::try_from(length) {
        Ok(short) if short < u8::MAX => bytes.push(short),
        _ => {
            bytes.push(u8::MAX);
            bytes.extend_from_slice(&length.to_be_bytes());
        }
    }

    bytes.extend_from_slice(message);
    bytes.push(TERMINATOR_TLV);
    Ok(bytes)
}
