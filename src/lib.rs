//! NFC tag read/write translation and session layer.
//!
//! Outbound content (plain text, URLs, deep links, JSON, WiFi credentials) is encoded into
//! NDEF records and handed to an injected [`platform::NfcPlatform`]. Inbound NDEF messages
//! are decoded into display strings, and every platform failure is classified into an
//! [`error::NfcError`].

pub mod capability;
pub mod config;
pub mod content;
pub mod decode;
pub mod encode;
pub mod error;
pub mod ffi;
pub mod generator;
pub mod history;
pub mod intent;
pub mod logging;
pub mod platform;
pub mod record;
pub mod session;
pub mod social;
pub mod wifi;

pub use capability::CapabilityProbe;
pub use content::{TagContent, WriteContent};
pub use error::{NfcError, RawError, RawErrorKind, ScanError, translate};
pub use generator::{ContentGenerator, GeneratedContent, generate_content};
pub use history::{ReadingEvent, ScanHistory};
pub use intent::WriteIntent;
pub use platform::{NfcPlatform, ReaderEvent, ReaderEvents};
pub use record::{NdefMessage, NdefRecord, OutboundMessage, RecordType};
pub use session::{ScanEvent, ScanStart, ScanSubscription, TagSession};
pub use social::SocialPlatform;
pub use wifi::{AuthType, WifiConfig};

uniffi::setup_scaffolding!();
