use tracing::debug;

use crate::{
    content::{TagContent, WriteContent},
    error::NfcError,
    record::{NdefMessage, NdefRecord, OutboundMessage},
};

/// Turn write input into what the platform writes to the tag
pub fn encode(content: WriteContent) -> Result<OutboundMessage, NfcError> {
    let content = match content {
        WriteContent::Bytes(data) => {
            debug!("passing {} raw bytes through", data.len());
            return Ok(OutboundMessage::Raw(data));
        }

        WriteContent::Text(text) => TagContent::classify(text),
        WriteContent::Json(json) => TagContent::StructuredJson(json),
        WriteContent::Tagged(content) => content,
    };

    Ok(OutboundMessage::Message(encode_content(content)?))
}

/// Every kind of content is written as a single record
pub fn encode_content(content: TagContent) -> Result<NdefMessage, NfcError> {
    let record = match content {
        TagContent::PlainText(text) => NdefRecord::text(text),

        // urls keep the exact string, deep links included, so readers dispatch them as links
        TagContent::AbsoluteUrl(url) | TagContent::CustomSchemeUri(url) => NdefRecord::url(url),

        TagContent::StructuredJson(json) => {
            let json = serde_json::to_vec(&json)
                .map_err(|error| NfcError::Unknown(format!("unable to serialize json: {error}")))?;

            NdefRecord::json(json)
        }
    };

    Ok(NdefMessage::single(record))
}
