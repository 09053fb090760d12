use crate::{Error, header::NdefHeader, record::NdefRecord};

type Result<T, E = Error> = std::result::Result<T, E>;

/// Serialize records into a single NDEF message, setting the begin and end flags
pub fn encode_message(records: &[NdefRecord]) -> Result<Vec<u8>> {
    if records.is_empty() {
        return Err(Error::EmptyMessage);
    }

    let last = records.len() - 1;
    let mut bytes = Vec::new();

    for (index, record) in records.iter().enumerate() {
        let payload = record.payload.to_bytes();

        let type_length = u8::try_from(record.type_.len())
            .map_err(|_| Error::FieldTooLong { field: "type", length: record.type_.len() })?;

        let id_length = record
            .id
            .as_ref()
            .map(|id| {
                u8::try_from(id.len())
                    .map_err(|_| Error::FieldTooLong { field: "id", length: id.len() })
            })
            .transpose()?;

        let payload_length = u32::try_from(payload.len())
            .map_err(|_| Error::FieldTooLong { field: "payload", length: payload.len() })?;

        let header = NdefHeader {
            message_begin: index == 0,
            message_end: index == last,
            chunked: false,
            short_record: payload_length <= u8::MAX as u32,
            has_id_length: id_length.is_some(),
            type_name_format: record.type_name_format(),
            type_length,
            payload_length,
            id_length,
        };

        bytes.push(header.flags_byte());
        bytes.push(header.type_length);

        if header.short_record {
            bytes.push(payload_length as u8);
        } else {
            bytes.extend_from_slice(&payload_length.to_be_bytes());
        }

        if let Some(id_length) = header.id_length {
            bytes.push(id_length);
        }

        bytes.extend_from_slice(&record.type_);
        if let Some(id) = &record.id {
            bytes.extend_from_slice(id);
        }
        bytes.extend_from_slice(&payload);
    }

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        ndef_type::NdefType,
        payload::{NdefPayload, TextPayload},
    };

    #[test]
    fn single_uri_record() {
        let record = NdefRecord::new(
            NdefType::WellKnown,
            b"U".to_vec(),
            None,
            NdefPayload::Uri("https://www.example.com/".to_string()),
        )
        .unwrap();

        let bytes = encode_message(&[record]).unwrap();
        assert_eq!(hex::encode(&bytes[..5]), "d1010d5502");
        assert_eq!(&bytes[5..], b"example.com/");
    }

    #[test]
    fn message_flags_span_records() {
        let records = [
            NdefRecord::new(
                NdefType::WellKnown,
                b"T".to_vec(),
                None,
                NdefPayload::Text(TextPayload::utf8("en", "hi")),
            )
            .unwrap(),
            NdefRecord::new(
                NdefType::Mime,
                b"application/json".to_vec(),
                None,
                NdefPayload::Data(br#"{"a":1}"#.to_vec()),
            )
            .unwrap(),
        ];

        let bytes = encode_message(&records).unwrap();
        let parsed = crate::parse_message(&bytes).unwrap();

        assert_eq!(parsed.len(), 2);
        assert!(parsed[0].header.message_begin && !parsed[0].header.message_end);
        assert!(!parsed[1].header.message_begin && parsed[1].header.message_end);
        assert_eq!(parsed[1].payload, records[1].payload);
    }

    #[test]
    fn long_payload_uses_four_byte_length() {
        let record =
            NdefRecord::new(NdefType::Mime, b"a/b".to_vec(), None, NdefPayload::Data(vec![7; 300]))
                .unwrap();

        let bytes = encode_message(&[record]).unwrap();
        assert_eq!(bytes[0] & 0b0001_0000, 0);
        assert_eq!(&bytes[2..6], &300u32.to_be_bytes());
    }

    #[test]
    fn empty_message_is_rejected() {
        assert_eq!(encode_message(&[]), Err(Error::EmptyMessage));
    }
}
