#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NdefPayload {
    Text(TextPayload),
    Uri(String),
    Data(Vec<u8>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextPayload {
    pub format: TextPayloadFormat,
    pub language: String,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextPayloadFormat {
    Utf8,
    Utf16,
}

/// URI prefix codes as defined in NFC Forum RTD URI specification
pub const URI_PREFIXES: &[&str] = &[
    "",                           // 0x00 - no prepending
    "http://www.",                // 0x01
    "https://www.",               // 0x02
    "http://",                    // 0x03
    "https://",                   // 0x04
    "tel:",                       // 0x05
    "mailto:",                    // 0x06
    "ftp://anonymous:anonymous@", // 0x07
    "ftp://ftp.",                 // 0x08
    "ftps://",                    // 0x09
    "sftp://",                    // 0x0A
    "smb://",                     // 0x0B
    "nfs://",                     // 0x0C
    "ftp://",                     // 0x0D
    "dav://",                     // 0x0E
    "news:",                      // 0x0F
    "telnet://",                  // 0x10
    "imap:",                      // 0x11
    "rtsp://",                    // 0x12
    "urn:",                       // 0x13
    "pop:",                       // 0x14
    "sip:",                       // 0x15
    "sips:",                      // 0x16
    "tftp:",                      // 0x17
    "btspp://",                   // 0x18
    "btl2cap://",                 // 0x19
    "btgoep://",                  // 0x1A
    "tcpobex://",                 // 0x1B
    "irdaobex://",                // 0x1C
    "file://",                    // 0x1D
    "urn:epc:id:",                // 0x1E
    "urn:epc:tag:",               // 0x1F
    "urn:epc:pat:",               // 0x20
    "urn:epc:raw:",               // 0x21
    "urn:epc:",                   // 0x22
    "urn:nfc:",                   // 0x23
];

/// Expand an abbreviated URI, unknown codes are treated as no prefix
pub fn expand_uri(code: u8, rest: &[u8]) -> String {
    let prefix = URI_PREFIXES.get(code as usize).copied().unwrap_or_default();
    format!("{prefix}{}", String::from_utf8_lossy(rest))
}

/// Pick the longest prefix that abbreviates the uri
pub fn compress_uri(uri: &str) -> (u8, &str) {
    URI_PREFIXES
        .iter()
        .enumerate()
        .skip(1)
        .filter(|(_, prefix)| uri.starts_with(**prefix))
        .max_by_key(|(_, prefix)| prefix.len())
        .map(|(code, prefix)| (code as u8, &uri[prefix.len()..]))
        .unwrap_or((0, uri))
}

impl NdefPayload {
    /// Payload bytes as written on the tag
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            NdefPayload::Text(text) => text.to_bytes(),
            NdefPayload::Uri(uri) => {
                let (code, rest) = compress_uri(uri);
                let mut bytes = Vec::with_capacity(rest.len() + 1);
                bytes.push(code);
                bytes.extend_from_slice(rest.as_bytes());
                bytes
            }
            NdefPayload::Data(data) => data.clone(),
        }
    }
}

impl TextPayload {
    pub fn utf8(language: impl Into<String>, text: impl Into<String>) -> Self {
        Self { format: TextPayloadFormat::Utf8, language: language.into(), text: text.into() }
    }

    fn to_bytes(&self) -> Vec<u8> {
        // language code length is only 6 bits wide
        let language = &self.language.as_bytes()[..self.language.len().min(0b0011_1111)];

        let mut status = language.len() as u8;
        if self.format == TextPayloadFormat::Utf16 {
            status |= 0b1000_0000;
        }

        let mut bytes = vec![status];
        bytes.extend_from_slice(language);

        match self.format {
            TextPayloadFormat::Utf8 => bytes.extend_from_slice(self.text.as_bytes()),
            TextPayloadFormat::Utf16 => {
                bytes.extend(self.text.encode_utf16().flat_map(u16::to_be_bytes));
            }
        }

        bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compress_picks_longest_prefix() {
        assert_eq!(compress_uri("https://www.example.com"), (0x02, "example.com"));
        assert_eq!(compress_uri("https://instagram.com/bob"), (0x04, "instagram.com/bob"));
        assert_eq!(compress_uri("tel:+15550199"), (0x05, "+15550199"));
    }

    #[test]
    fn custom_schemes_are_not_abbreviated() {
        assert_eq!(compress_uri("myapp://open"), (0x00, "myapp://open"));
    }

    #[test]
    fn expand_unknown_code_keeps_rest() {
        assert_eq!(expand_uri(0x04, b"example.com"), "https://example.com");
        assert_eq!(expand_uri(0xF0, b"example.com"), "example.com");
    }

    #[test]
    fn text_payload_status_byte() {
        let bytes = NdefPayload::Text(TextPayload::utf8("en", "hi")).to_bytes();
        assert_eq!(bytes, vec![0x02, b'e', b'n', b'h', b'i']);
    }
}
