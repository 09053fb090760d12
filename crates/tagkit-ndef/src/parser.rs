pub mod stream;

use stream::Stream;
use winnow::{
    ModalResult, Parser,
    binary::{
        Endianness, be_u8, be_u16,
        bits::{bits, bool as take_bool, take as take_bits},
    },
    error::{ContextError, ErrMode},
    token::{any, take},
};

use crate::{
    header::NdefHeader,
    ndef_type::NdefType,
    payload::{self, NdefPayload, TextPayload, TextPayloadFormat},
    record::NdefRecord,
};

/// Parse records until one has the message end flag set
pub fn parse_ndef_records(input: &mut Stream<'_>) -> ModalResult<Vec<NdefRecord>> {
    let mut records = Vec::new();

    loop {
        let record = parse_ndef_record.parse_next(input)?;
        let message_end = record.header.message_end;
        records.push(record);

        if message_end {
            break;
        }
    }

    Ok(records)
}

pub fn parse_ndef_record(input: &mut Stream<'_>) -> ModalResult<NdefRecord> {
    let header = parse_header.parse_next(input)?;
    let type_ = parse_type(input, header.type_length)?;
    let id = parse_id(input, header.id_length)?;
    let payload = parse_payload(input, &header, &type_)?;

    Ok(NdefRecord { header, type_, id, payload })
}

/// A single TLV block, NULL and terminator blocks have no length or value
pub fn parse_tlv<'i>(input: &mut Stream<'i>) -> ModalResult<(u8, &'i [u8])> {
    let tag = be_u8.parse_next(input)?;
    if tag == crate::tlv::NULL_TLV || tag == crate::tlv::TERMINATOR_TLV {
        return Ok((tag, &[]));
    }

    let length_indicator = be_u8.parse_next(input)?;
    let length = if length_indicator == 255 {
        be_u16.parse_next(input)? as usize
    } else {
        length_indicator as usize
    };

    let value = take(length).parse_next(input)?;
    Ok((tag, value))
}

// private
fn parse_header_byte(input: &mut Stream<'_>) -> ModalResult<(bool, bool, bool, bool, bool, u8)> {
    bits::<_, _, ErrMode<ContextError>, _, _>((
        take_bool,
        take_bool,
        take_bool,
        take_bool,
        take_bool,
        take_bits(3_u8),
    ))
    .parse_next(input)
}

fn parse_header(input: &mut Stream<'_>) -> ModalResult<NdefHeader> {
    let (message_begin, message_end, chunked, short_record, has_id_length, type_name_format) =
        parse_header_byte(input)?;

    let type_length = winnow::binary::u8.parse_next(input)?;
    let type_name_format = NdefType::from_bits(type_name_format);

    let payload_length = if short_record {
        any.map(|x: u8| x as u32).parse_next(input)?
    } else {
        winnow::binary::u32(Endianness::Big).parse_next(input)?
    };

    let id_length = if has_id_length { Some(any.parse_next(input)?) } else { None };

    Ok(NdefHeader {
        message_begin,
        message_end,
        chunked,
        short_record,
        has_id_length,
        type_name_format,
        type_length,
        payload_length,
        id_length,
    })
}

fn parse_type(input: &mut Stream<'_>, type_length: u8) -> ModalResult<Vec<u8>> {
    take(type_length as usize).map(|s: &[u8]| s.to_vec()).parse_next(input)
}

fn parse_id(input: &mut Stream<'_>, id_length: Option<u8>) -> ModalResult<Option<Vec<u8>>> {
    if let Some(id_len) = id_length {
        take(id_len as usize).map(|s: &[u8]| Some(s.to_vec())).parse_next(input)
    } else {
        Ok(None)
    }
}

fn parse_payload(
    input: &mut Stream<'_>,
    header: &NdefHeader,
    type_: &[u8],
) -> ModalResult<NdefPayload> {
    let data: &[u8] = take(header.payload_length as usize).parse_next(input)?;

    if header.type_name_format != NdefType::WellKnown {
        return Ok(NdefPayload::Data(data.to_vec()));
    }

    let payload = match type_ {
        b"T" => parse_text_payload(data),
        b"U" => match data.split_first() {
            Some((code, rest)) => NdefPayload::Uri(payload::expand_uri(*code, rest)),
            None => NdefPayload::Uri(String::new()),
        },
        _ => NdefPayload::Data(data.to_vec()),
    };

    Ok(payload)
}

fn parse_text_payload(data: &[u8]) -> NdefPayload {
    let Some((status, rest)) = data.split_first() else {
        return NdefPayload::Data(Vec::new());
    };

    let is_utf16 = status & 0b1000_0000 != 0;
    let language_code_length = ((status & 0b0011_1111) as usize).min(rest.len());
    let (language_code, text) = rest.split_at(language_code_length);

    let (format, text) = if is_utf16 {
        let text = String::from_utf16_lossy(
            &text
                .chunks_exact(2)
                .map(|chunk| u16::from_be_bytes([chunk[0], chunk[1]]))
                .collect::<Vec<u16>>(),
        );

        (TextPayloadFormat::Utf16, text)
    } else {
        (TextPayloadFormat::Utf8, String::from_utf8_lossy(text).to_string())
    };

    NdefPayload::Text(TextPayload {
        format,
        language: String::from_utf8_lossy(language_code).to_string(),
        text,
    })
}

#[cfg(test)]
mod tests {
    use winnow::error::{ErrMode, Needed};

    use super::*;

    fn uri_record_bytes() -> Vec<u8> {
        let mut bytes = vec![0xD1, 0x01, 0x0D, 0x55, 0x02];
        bytes.extend_from_slice(b"example.com/");
        bytes
    }

    #[test]
    fn known_header_parse() {
        let header_bytes = [0xD1, 0x01, 0x0D, 0x55, 0x02];
        let header = parse_header(&mut stream::new(&header_bytes)).unwrap();
        assert!(header.message_begin);
        assert!(header.message_end);
        assert!(!header.chunked);
        assert!(header.short_record);
        assert!(!header.has_id_length);
        assert_eq!(header.type_name_format, NdefType::WellKnown);
        assert_eq!(header.type_length, 1);
        assert_eq!(header.payload_length, 13);
    }

    #[test]
    fn uri_record_expands_prefix() {
        let bytes = uri_record_bytes();
        let records = parse_ndef_records(&mut stream::new(&bytes)).unwrap();
        assert_eq!(records.len(), 1);

        let record = &records[0];
        assert_eq!(record.type_, b"U");
        assert_eq!(record.id, None);
        assert_eq!(record.payload, NdefPayload::Uri("https://www.example.com/".to_string()));
    }

    #[test]
    fn text_record_with_language() {
        let bytes = [0xD1, 0x01, 0x05, b'T', 0x02, b'e', b'n', b'h', b'i'];
        let record = parse_ndef_record(&mut stream::new(&bytes)).unwrap();

        let NdefPayload::Text(text) = record.payload else { panic!("payload is not text") };
        assert_eq!(text.language, "en");
        assert_eq!(text.text, "hi");
        assert_eq!(text.format, TextPayloadFormat::Utf8);
    }

    #[test]
    fn utf16_text_record() {
        let bytes = [0xD1, 0x01, 0x07, b'T', 0x82, b'e', b'n', 0x00, b'h', 0x00, b'i'];
        let record = parse_ndef_record(&mut stream::new(&bytes)).unwrap();

        let NdefPayload::Text(text) = record.payload else { panic!("payload is not text") };
        assert_eq!(text.format, TextPayloadFormat::Utf16);
        assert_eq!(text.text, "hi");
    }

    #[test]
    fn mime_record_keeps_raw_payload() {
        let mut bytes = vec![0xD2, 0x10, 0x07];
        bytes.extend_from_slice(b"application/json");
        bytes.extend_from_slice(br#"{"a":1}"#);

        let record = parse_ndef_record(&mut stream::new(&bytes)).unwrap();
        assert_eq!(record.type_name_format(), NdefType::Mime);
        assert_eq!(record.type_string(), "application/json");
        assert_eq!(record.payload, NdefPayload::Data(br#"{"a":1}"#.to_vec()));
    }

    #[test]
    fn record_with_id() {
        let bytes = [0xD9, 0x01, 0x01, 0x02, b'U', b'i', b'd', 0x00];
        let record = parse_ndef_record(&mut stream::new(&bytes)).unwrap();

        assert!(record.header.has_id_length);
        assert_eq!(record.id, Some(b"id".to_vec()));
        assert_eq!(record.payload, NdefPayload::Uri(String::new()));
    }

    #[test]
    fn truncated_record_is_incomplete() {
        let bytes = uri_record_bytes();
        let result = parse_ndef_records(&mut stream::new(&bytes[0..8]));

        assert!(matches!(result, Err(ErrMode::Incomplete(Needed::Size(_)))));
    }

    #[test]
    fn parses_until_message_end() {
        // first record has MB only, second has ME only
        let mut bytes = vec![0x91, 0x01, 0x03, b'T', 0x00, b'h', b'i'];
        bytes.extend_from_slice(&[0x51, 0x01, 0x02, b'U', 0x00, b'x']);
        bytes.extend_from_slice(&[0xFE]);

        let mut input = stream::new(&bytes);
        let records = parse_ndef_records(&mut input).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(input.len(), 1);
    }

    #[test]
    fn long_tlv_length() {
        let mut bytes = vec![0x03, 0xFF, 0x01, 0x00];
        bytes.extend(std::iter::repeat_n(0xAA, 256));

        let (tag, value) = parse_tlv(&mut stream::new(&bytes)).unwrap();
        assert_eq!(tag, 0x03);
        assert_eq!(value.len(), 256);
    }
}
