//! What the write forms produce, turned into [`WriteContent`]

use serde_json::{Map, Value};

use crate::{content::WriteContent, social::SocialPlatform, wifi::WifiConfig};

#[derive(Debug, Clone, PartialEq)]
pub enum WriteIntent {
    Text(String),
    Url(String),
    Social { platform: SocialPlatform, username: String, deep_link: bool },
    Wifi(WifiConfig),
    Json(Map<String, Value>),
}

impl WriteIntent {
    /// Strings are classified when written, so a url typed into the text form is still a url
    pub fn into_content(self) -> WriteContent {
        match self {
            WriteIntent::Text(text) | WriteIntent::Url(text) => WriteContent::Text(text),
            WriteIntent::Social { platform, username, deep_link } => {
                WriteContent::Text(platform.link(&username, deep_link))
            }
            WriteIntent::Wifi(config) => WriteContent::Text(config.provisioning_string()),
            WriteIntent::Json(json) => WriteContent::Json(json),
        }
    }
}

impl From<WriteIntent> for WriteContent {
    fn from(intent: WriteIntent) -> Self {
        intent.into_content()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        encode::encode,
        record::{NdefRecord, OutboundMessage},
        wifi::AuthType,
    };

    fn written(intent: WriteIntent) -> NdefRecord {
        match encode(intent.into()).unwrap() {
            OutboundMessage::Message(message) => message.into_records().remove(0),
            OutboundMessage::Raw(_) => panic!("expected records"),
        }
    }

    #[test]
    fn social_deep_link_is_a_url_record() {
        let intent = WriteIntent::Social {
            platform: SocialPlatform::Instagram,
            username: "bob".into(),
            deep_link: true,
        };

        assert_eq!(written(intent), NdefRecord::url("instagram://user?username=bob"));
    }

    #[test]
    fn wifi_is_a_text_record() {
        let intent = WriteIntent::Wifi(WifiConfig::new("Home", "1234", AuthType::Wpa));
        assert_eq!(written(intent), NdefRecord::text("WIFI:T:WPA;S:Home;P:1234;;"));
    }

    #[test]
    fn text_form_holding_a_url() {
        let intent = WriteIntent::Text("https://example.com".into());
        assert_eq!(written(intent), NdefRecord::url("https://example.com"));
    }

    #[test]
    fn url_form_without_scheme_is_text() {
        let intent = WriteIntent::Url("example.com".into());
        assert_eq!(written(intent), NdefRecord::text("example.com"));
    }
}
