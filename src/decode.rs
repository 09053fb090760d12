use crate::record::{NdefMessage, NdefRecord, RecordType};

/// One line per record, in record order, each ending in a newline
pub fn decode_message(message: &NdefMessage) -> String {
    message.records().iter().map(decode_record).collect()
}

pub fn decode_record(record: &NdefRecord) -> String {
    let payload = || String::from_utf8_lossy(record.payload());

    match &record.record_type {
        RecordType::Text => format!("Text: {}\n", payload()),
        RecordType::Url => format!("URL: {}\n", payload()),
        RecordType::Mime if record.is_json() => format!("JSON: {}\n", payload()),
        RecordType::Mime => {
            let media_type = record.media_type.as_deref().unwrap_or_default();
            format!("MIME ({media_type}): {}\n", payload())
        }
        other => format!("Unknown Record ({other})\n"),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn url_record() {
        let message = NdefMessage::single(NdefRecord::url("https://instagram.com/bob"));
        assert_eq!(decode_message(&message), "URL: https://instagram.com/bob\n");
    }

    #[test]
    fn text_then_json() {
        let message = NdefMessage::try_new(vec![
            NdefRecord::text("hi"),
            NdefRecord::json(br#"{"a":1}"#.to_vec()),
        ])
        .unwrap();

        assert_eq!(decode_message(&message), "Text: hi\nJSON: {\"a\":1}\n");
    }

    #[test]
    fn other_mime_types_show_the_media_type() {
        let record = NdefRecord::mime("text/vcard", b"BEGIN:VCARD".to_vec());
        assert_eq!(decode_record(&record), "MIME (text/vcard): BEGIN:VCARD\n");

        let record = NdefRecord::new(RecordType::Mime, Some(b"x".to_vec()));
        assert_eq!(decode_record(&record), "MIME (): x\n");
    }

    #[test]
    fn unknown_record_types() {
        let record = NdefRecord::new(RecordType::SmartPoster, Some(vec![0xD1]));
        assert_eq!(decode_record(&record), "Unknown Record (smart-poster)\n");

        let record = NdefRecord::new(RecordType::Other("example.com:pet".into()), None);
        assert_eq!(decode_record(&record), "Unknown Record (example.com:pet)\n");
    }

    #[test]
    fn invalid_utf8_and_missing_payload() {
        let record = NdefRecord::new(RecordType::Text, Some(vec![b'o', 0xFF, b'k']));
        assert_eq!(decode_record(&record), "Text: o\u{FFFD}k\n");

        let record = NdefRecord::new(RecordType::Url, None);
        assert_eq!(decode_record(&record), "URL: \n");
    }
}
