//! Native host surface: the host provides NFC through [`FfiNfcHost`] and drives a session
//! through [`FfiTagSession`]

use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::{
    capability::CapabilityProbe,
    config::SessionConfig,
    content::WriteContent,
    decode::decode_message,
    error::{NfcError, RawError, RawErrorKind, ScanError},
    history::{ReadingEvent, serial_number_from_uid},
    intent::WriteIntent,
    platform::{NfcPlatform, ReaderEvent, ReaderEvents},
    record::{NdefMessage, NdefRecord, OutboundMessage, RecordType},
    session::{ScanStart, TagSession},
    social::SocialPlatform,
    wifi::WifiConfig,
};

#[derive(Debug, Clone, Hash, Eq, PartialEq, uniffi::Record)]
pub struct FfiRecord {
    pub record_type: String,
    pub media_type: Option<String>,
    pub id: Option<String>,
    pub lang: Option<String>,
    pub data: Option<Vec<u8>>,
}

/// A platform failure as the host reports it, `name` is a DOMException style name
#[derive(Debug, Clone, Hash, Eq, PartialEq, uniffi::Record)]
pub struct FfiRawError {
    pub name: String,
    pub message: String,
}

#[derive(Debug, Clone, Hash, Eq, PartialEq, uniffi::Enum)]
pub enum FfiOutbound {
    Records { records: Vec<FfiRecord> },
    Raw { data: Vec<u8> },
}

#[derive(Debug, Clone, Hash, Eq, PartialEq, uniffi::Enum)]
pub enum FfiScanError {
    /// The session is still open, show the hint and wait for another tap
    Unreadable { hint: String },
    Fatal { error: NfcError },
}

#[uniffi::export(callback_interface)]
pub trait FfiNfcHost: Send + Sync + std::fmt::Debug + 'static {
    fn is_supported(&self) -> bool;

    /// Blocks until the tag is written, `None` on success
    fn write(&self, message: FfiOutbound) -> Option<FfiRawError>;

    /// Start reading tags and push them into `feed`, `None` once the reader is running
    fn start_reader(&self, feed: Arc<FfiReaderFeed>) -> Option<FfiRawError>;

    fn stop_reader(&self);
}

#[uniffi::export(callback_interface)]
pub trait FfiScanListener: Send + Sync + std::fmt::Debug + 'static {
    fn on_reading(&self, text: String, serial_number: String, read_at_ms: i64);
    fn on_error(&self, error: FfiScanError);
}

/// Where the host pushes what its reader sees, every method returns false once the scan
/// is over and the host should stop reading
#[derive(Debug, uniffi::Object)]
pub struct FfiReaderFeed {
    sender: Mutex<Option<flume::Sender<ReaderEvent>>>,
}

#[uniffi::export]
impl FfiReaderFeed {
    /// A tag was read, the host already split it into records
    pub fn reading(&self, records: Vec<FfiRecord>, serial_number: String) -> bool {
        let records = records.into_iter().map(NdefRecord::from).collect();

        match NdefMessage::try_new(records) {
            Ok(message) => self.send(ReaderEvent::Reading { message, serial_number }),
            Err(_) => {
                debug!("tag {serial_number} has no records");
                self.send(ReaderEvent::ReadingError)
            }
        }
    }

    /// A tag was read as raw NDEF bytes
    pub fn reading_ndef(&self, data: Vec<u8>, serial_number: String) -> bool {
        match NdefMessage::from_ndef_bytes(&data) {
            Ok(message) => self.send(ReaderEvent::Reading { message, serial_number }),
            Err(error) => {
                warn!("unable to parse ndef from tag {serial_number}: {error}");
                self.send(ReaderEvent::ReadingError)
            }
        }
    }

    /// A Type 2 tag's data area as read from memory, `uid` is the tag's raw identifier
    pub fn reading_tag_memory(&self, data: Vec<u8>, uid: Vec<u8>) -> bool {
        let serial_number = serial_number_from_uid(&uid);

        match NdefMessage::from_tag_memory(&data) {
            Ok(message) => self.send(ReaderEvent::Reading { message, serial_number }),
            Err(error) => {
                warn!("unable to parse tag memory from tag {serial_number}: {error}");
                self.send(ReaderEvent::ReadingError)
            }
        }
    }

    /// A tag was presented but could not be read
    pub fn reading_error(&self) -> bool {
        self.send(ReaderEvent::ReadingError)
    }

    /// The reader stopped for good
    pub fn failed(&self, error: FfiRawError) -> bool {
        let sent = self.send(ReaderEvent::Failed(error.into()));
        self.close();
        sent
    }
}

impl FfiReaderFeed {
    fn new(sender: flume::Sender<ReaderEvent>) -> Self {
        Self { sender: Mutex::new(Some(sender)) }
    }

    fn send(&self, event: ReaderEvent) -> bool {
        match self.sender.lock().as_ref() {
            Some(sender) => sender.send(event).is_ok(),
            None => false,
        }
    }

    fn close(&self) {
        self.sender.lock().take();
    }
}

/// [`NfcPlatform`] backed by the host's callbacks
#[derive(Debug, Clone)]
struct HostPlatform(Arc<Box<dyn FfiNfcHost>>);

impl CapabilityProbe for HostPlatform {
    fn is_supported(&self) -> bool {
        self.0.is_supported()
    }
}

#[async_trait::async_trait]
impl NfcPlatform for HostPlatform {
    async fn write(&self, message: OutboundMessage) -> Result<(), RawError> {
        let host = self.0.clone();
        let message = FfiOutbound::from(message);

        let error = tagkit_tokio::task::spawn_blocking(move || host.write(message))
            .await
            .map_err(|error| RawError::other(format!("write task failed: {error}")))?;

        match error {
            Some(error) => Err(error.into()),
            None => Ok(()),
        }
    }

    async fn open_reader(&self, cancel: CancellationToken) -> Result<ReaderEvents, RawError> {
        let (sender, receiver) = flume::unbounded();
        let feed = Arc::new(FfiReaderFeed::new(sender));
        let (started_tx, started_rx) = oneshot::channel();

        // owns the host reader from start to stop, even if the scan is cancelled while
        // the host is still starting it
        let host = self.0.clone();
        tagkit_tokio::task::spawn(async move {
            let start_host = host.clone();
            let start_feed = feed.clone();
            let started =
                tagkit_tokio::task::spawn_blocking(move || start_host.start_reader(start_feed))
                    .await;

            let running = matches!(started, Ok(None));
            if started_tx.send(started).is_err() {
                debug!("scan ended while the host reader was starting");
            }

            if !running {
                feed.close();
                return;
            }

            cancel.cancelled().await;
            feed.close();

            debug!("stopping host reader");
            if let Err(error) = tagkit_tokio::task::spawn_blocking(move || host.stop_reader()).await
            {
                warn!("stop reader task failed: {error}");
            }
        });

        match started_rx.await {
            Ok(Ok(None)) => Ok(receiver),
            Ok(Ok(Some(error))) => Err(error.into()),
            Ok(Err(error)) => Err(RawError::other(format!("start reader task failed: {error}"))),
            Err(_) => Err(RawError::other("start reader task dropped")),
        }
    }
}

#[derive(uniffi::Object)]
pub struct FfiTagSession {
    session: TagSession,
}

#[uniffi::export(async_runtime = "tokio")]
impl FfiTagSession {
    #[uniffi::constructor]
    pub fn new(host: Box<dyn FfiNfcHost>) -> Arc<Self> {
        Self::with_config(host, SessionConfig::default())
    }

    /// Session with settings from a JSON object, missing fields keep their defaults
    #[uniffi::constructor]
    pub fn new_with_config_json(
        host: Box<dyn FfiNfcHost>,
        config_json: String,
    ) -> Result<Arc<Self>, NfcError> {
        let config = SessionConfig::from_json(&config_json)
            .map_err(|error| NfcError::Unknown(error.to_string()))?;

        Ok(Self::with_config(host, config))
    }

    pub fn is_supported(&self) -> bool {
        self.session.is_supported()
    }

    /// Write a string, urls and deep links become url records, anything else text
    pub async fn write_text(&self, text: String) -> Result<(), NfcError> {
        self.session.write(text).await
    }

    /// Write a JSON object as an `application/json` record
    pub async fn write_json(&self, json: String) -> Result<(), NfcError> {
        let json = match serde_json::from_str(&json) {
            Ok(Value::Object(json)) => json,
            Ok(_) => return Err(NfcError::Unknown("JSON content must be an object".to_string())),
            Err(error) => return Err(NfcError::Unknown(format!("invalid JSON: {error}"))),
        };

        self.session.write(json).await
    }

    pub async fn write_bytes(&self, data: Vec<u8>) -> Result<(), NfcError> {
        self.session.write(data).await
    }

    pub async fn write_wifi(&self, config: WifiConfig) -> Result<(), NfcError> {
        self.session.write(WriteIntent::Wifi(config)).await
    }

    pub async fn write_social(
        &self,
        platform: SocialPlatform,
        username: String,
        deep_link: bool,
    ) -> Result<(), NfcError> {
        self.session.write(WriteIntent::Social { platform, username, deep_link }).await
    }

    /// NDEF bytes for a string, for hosts that write raw tag memory
    pub fn ndef_bytes(&self, text: String) -> Result<Vec<u8>, NfcError> {
        self.session.ndef_bytes(WriteContent::Text(text))
    }

    /// TLV framed NDEF bytes for a string, ready for a Type 2 tag's data area
    pub fn tag_memory(&self, text: String) -> Result<Vec<u8>, NfcError> {
        self.session.tag_memory(WriteContent::Text(text))
    }

    /// Start scanning, false if a scan is already running or NFC is unavailable
    ///
    /// Async so the scan tasks are spawned on the bindings' runtime
    pub async fn start_scan(&self, listener: Box<dyn FfiScanListener>) -> bool {
        let listener: Arc<dyn FfiScanListener> = Arc::from(listener);
        let on_error = {
            let listener = listener.clone();
            move |error: ScanError| listener.on_error(error.into())
        };

        let on_reading = move |event: ReadingEvent| {
            let text = event.text().to_string();
            let serial_number = event.serial_number().to_string();
            listener.on_reading(text, serial_number, event.read_at().as_millisecond())
        };

        let start = self.session.scan(on_reading, on_error, CancellationToken::new());
        start == ScanStart::Started
    }

    pub fn stop_scan(&self) {
        self.session.cancel_scan();
    }

    pub fn is_scanning(&self) -> bool {
        self.session.is_scanning()
    }
}

impl FfiTagSession {
    fn with_config(host: Box<dyn FfiNfcHost>, config: SessionConfig) -> Arc<Self> {
        let platform = HostPlatform(Arc::new(host));
        Arc::new(Self { session: TagSession::with_config(Arc::new(platform), config) })
    }
}

#[uniffi::export]
pub fn wifi_provisioning_string(config: WifiConfig) -> String {
    config.provisioning_string()
}

#[uniffi::export]
pub fn social_link(platform: SocialPlatform, username: String, deep_link: bool) -> String {
    platform.link(&username, deep_link)
}

/// Display text for records the host read itself, `None` when there are no records
#[uniffi::export]
pub fn decode_records(records: Vec<FfiRecord>) -> Option<String> {
    let records = records.into_iter().map(NdefRecord::from).collect();
    let message = NdefMessage::try_new(records).ok()?;
    Some(decode_message(&message))
}

#[uniffi::export]
pub fn decode_ndef_bytes(data: Vec<u8>) -> Result<String, NfcError> {
    let message =
        NdefMessage::from_ndef_bytes(&data).map_err(|error| NfcError::Unknown(error.to_string()))?;

    Ok(decode_message(&message))
}

#[uniffi::export]
pub fn describe_nfc_error(error: NfcError) -> String {
    error.to_string()
}

#[uniffi::export]
pub fn init_logging() {
    crate::logging::init();
}

/// Remember the bindings' runtime so scans can start from any host thread
#[uniffi::export(async_runtime = "tokio")]
pub async fn init_runtime() {
    tagkit_tokio::init();
}

// MARK: conversions

impl From<FfiRecord> for NdefRecord {
    fn from(record: FfiRecord) -> Self {
        Self {
            record_type: RecordType::from_name(&record.record_type),
            media_type: record.media_type,
            id: record.id,
            lang: record.lang,
            data: record.data,
        }
    }
}

impl From<NdefRecord> for FfiRecord {
    fn from(record: NdefRecord) -> Self {
        Self {
            record_type: record.record_type.to_string(),
            media_type: record.media_type,
            id: record.id,
            lang: record.lang,
            data: record.data,
        }
    }
}

impl From<OutboundMessage> for FfiOutbound {
    fn from(message: OutboundMessage) -> Self {
        match message {
            OutboundMessage::Message(message) => {
                let records = message.into_records().into_iter().map(FfiRecord::from).collect();
                FfiOutbound::Records { records }
            }
            OutboundMessage::Raw(data) => FfiOutbound::Raw { data },
        }
    }
}

impl From<FfiRawError> for RawError {
    fn from(error: FfiRawError) -> Self {
        RawError::new(RawErrorKind::from_name(&error.name), error.message)
    }
}

impl From<ScanError> for FfiScanError {
    fn from(error: ScanError) -> Self {
        match error {
            ScanError::Unreadable { hint } => FfiScanError::Unreadable { hint },
            ScanError::Fatal(error) => FfiScanError::Fatal { error },
        }
    }
}
