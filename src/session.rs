//! Tag I/O session: writes content to tags and runs cancellable scan sessions
//!
//! A scan runs as a background task that owns the platform reader. Decoded readings flow
//! through a bounded channel to either a [`ScanSubscription`] or the callbacks given to
//! [`TagSession::scan`]. Cancelling the token (or dropping the session) drops the reader,
//! which releases it on the platform side. A session runs at most one scan at a time,
//! whichever way it was started.

use std::{cell::Cell, sync::Arc};

use parking_lot::{Mutex, ReentrantMutex};
use tagkit_ndef::tlv;
use tagkit_tokio::AbortableTask;
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::{
    config::SessionConfig,
    content::WriteContent,
    decode::decode_message,
    encode,
    error::{NfcError, ScanError, translate},
    history::ReadingEvent,
    platform::{NfcPlatform, ReaderEvent},
    record::OutboundMessage,
};

type Result<T, E = NfcError> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEvent {
    Reading(ReadingEvent),
    Error(ScanError),
}

/// Outcome of asking for a new scan
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ScanStart {
    Started,

    /// A scan is still running, the request was ignored
    AlreadyActive,

    /// NFC is unavailable, `on_error` was already called
    Unsupported,

    /// No tokio runtime to run the scan on, `on_error` was already called
    NoRuntime,
}

pub struct TagSession {
    platform: Arc<dyn NfcPlatform>,
    config: SessionConfig,
    active_scan: Mutex<Option<ActiveScan>>,
}

struct ActiveScan {
    token: CancellationToken,

    /// Cancelled when the last task of the scan is gone
    done: CancellationToken,

    /// Only set for callback scans
    gate: Option<Arc<DeliveryGate>>,
    _task: Option<AbortableTask<()>>,
}

impl ActiveScan {
    fn is_live(&self) -> bool {
        !self.token.is_cancelled() && !self.done.is_cancelled()
    }
}

impl TagSession {
    pub fn new(platform: Arc<dyn NfcPlatform>) -> Self {
        Self::with_config(platform, SessionConfig::default())
    }

    pub fn with_config(platform: Arc<dyn NfcPlatform>, config: SessionConfig) -> Self {
        debug!("nfc session created, supported: {}", platform.is_supported());
        Self { platform, config, active_scan: Mutex::new(None) }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn is_supported(&self) -> bool {
        self.platform.is_supported()
    }

    /// Write content to the next tag presented
    ///
    /// Failures are classified with [`translate`] and never retried
    pub async fn write(&self, content: impl Into<WriteContent>) -> Result<()> {
        if !self.is_supported() {
            warn!("write requested but nfc is not supported");
            return Err(NfcError::UnsupportedPlatform);
        }

        let message = encode::encode(content.into())?;
        debug!("writing tag: {}", message.summary());

        self.platform.write(message).await.map_err(|error| translate(&error))?;

        debug!("tag written");
        Ok(())
    }

    /// Encode content as NFC Forum NDEF bytes, for hosts that write raw tag memory
    pub fn ndef_bytes(&self, content: impl Into<WriteContent>) -> Result<Vec<u8>> {
        encode::encode(content.into())?
            .to_ndef_bytes(&self.config.text_language)
            .map_err(|error| NfcError::Unknown(error.to_string()))
    }

    /// Encode content as a Type 2 tag data area, the NDEF message framed in a TLV
    pub fn tag_memory(&self, content: impl Into<WriteContent>) -> Result<Vec<u8>> {
        let framed = match encode::encode(content.into())? {
            OutboundMessage::Message(message) => message.to_tag_memory(&self.config.text_language),
            OutboundMessage::Raw(data) => tlv::wrap_tlv(&data),
        };

        framed.map_err(|error| NfcError::Unknown(error.to_string()))
    }

    /// Start a scan and receive its events as a stream
    ///
    /// Fails with [`NfcError::ScanAlreadyActive`] while another scan of this session is
    /// running, stream or callbacks. Dropping the subscription ends the scan.
    pub fn subscribe(&self, token: CancellationToken) -> Result<ScanSubscription> {
        if !self.is_supported() {
            warn!("scan requested but nfc is not supported");
            return Err(NfcError::UnsupportedPlatform);
        }

        let mut active_scan = self.active_scan.lock();
        let runtime = claim_reader(active_scan.as_ref())?;

        let token = token.child_token();
        let done = CancellationToken::new();
        let subscription = self.open_reader(&runtime, token.clone(), Some(done.clone()));

        *active_scan = Some(ActiveScan { token, done, gate: None, _task: None });
        Ok(subscription)
    }

    /// Start a scan, returns immediately and delivers readings through the callbacks
    ///
    /// `on_reading` is called once per tag read. `on_error` gets recoverable read errors
    /// (the scan keeps going) and fatal errors (the scan is over). Nothing is delivered
    /// once `token` is cancelled.
    pub fn scan<R, E>(&self, on_reading: R, on_error: E, token: CancellationToken) -> ScanStart
    where
        R: Fn(ReadingEvent) + Send + Sync + 'static,
        E: Fn(ScanError) + Send + Sync + 'static,
    {
        if !self.is_supported() {
            warn!("scan requested but nfc is not supported");
            on_error(ScanError::Fatal(NfcError::UnsupportedPlatform));
            return ScanStart::Unsupported;
        }

        let mut active_scan = self.active_scan.lock();
        let runtime = match claim_reader(active_scan.as_ref()) {
            Ok(runtime) => runtime,
            Err(NfcError::ScanAlreadyActive) => return ScanStart::AlreadyActive,
            Err(error) => {
                drop(active_scan);
                on_error(ScanError::Fatal(error));
                return ScanStart::NoRuntime;
            }
        };

        let token = token.child_token();
        let done = CancellationToken::new();
        let gate = Arc::new(DeliveryGate::new(token.clone()));
        let mut subscription = self.open_reader(&runtime, token.clone(), None);

        let task = {
            let gate = gate.clone();
            let done = done.clone();

            AbortableTask::spawn_on(&runtime, async move {
                let _done = done.drop_guard();

                while let Some(event) = subscription.next().await {
                    let fatal = matches!(&event, ScanEvent::Error(error) if error.is_fatal());

                    gate.deliver(|| match event {
                        ScanEvent::Reading(reading) => on_reading(reading),
                        ScanEvent::Error(error) => on_error(error),
                    });

                    if fatal {
                        break;
                    }
                }

                debug!("scan session ended");
            })
        };

        *active_scan = Some(ActiveScan { token, done, gate: Some(gate), _task: Some(task) });
        ScanStart::Started
    }

    /// Stop the running scan and release the reader
    ///
    /// Once this returns no callback of the cancelled scan is running or will run. Safe to
    /// call from inside a callback.
    pub fn cancel_scan(&self) {
        let Some(active_scan) = self.active_scan.lock().take() else {
            return;
        };

        debug!("cancelling scan");
        active_scan.token.cancel();

        if let Some(gate) = &active_scan.gate {
            gate.close();
        }
    }

    pub fn is_scanning(&self) -> bool {
        self.active_scan.lock().as_ref().is_some_and(ActiveScan::is_live)
    }

    fn open_reader(
        &self,
        runtime: &Handle,
        token: CancellationToken,
        done: Option<CancellationToken>,
    ) -> ScanSubscription {
        let (sender, receiver) = flume::bounded(self.config.scan_channel_capacity.max(1));

        let pump = pump_reader(
            self.platform.clone(),
            token.clone(),
            sender,
            self.config.read_retry_hint.clone(),
            done,
        );

        ScanSubscription { receiver, token, _pump: AbortableTask::spawn_on(runtime, pump) }
    }
}

impl Drop for TagSession {
    fn drop(&mut self) {
        self.cancel_scan();
    }
}

/// The runtime to run a new scan on, unless a scan is already running
fn claim_reader(active_scan: Option<&ActiveScan>) -> Result<Handle> {
    if active_scan.is_some_and(ActiveScan::is_live) {
        warn!("scan already active, ignoring new scan request");
        return Err(NfcError::ScanAlreadyActive);
    }

    tagkit_tokio::handle().ok_or_else(|| {
        warn!("no tokio runtime to run the scan on");
        NfcError::RuntimeUnavailable
    })
}

/// A running scan as a stream of events, dropping it stops the scan
pub struct ScanSubscription {
    receiver: flume::Receiver<ScanEvent>,
    token: CancellationToken,
    _pump: AbortableTask<()>,
}

impl ScanSubscription {
    /// Next event, `None` once the scan is cancelled or over
    pub async fn next(&mut self) -> Option<ScanEvent> {
        if self.token.is_cancelled() {
            return None;
        }

        tokio::select! {
            biased;
            _ = self.token.cancelled() => None,
            event = self.receiver.recv_async() => event.ok(),
        }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl Drop for ScanSubscription {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Serializes callback delivery with cancellation
///
/// Reentrant so a callback can cancel its own scan
struct DeliveryGate {
    open: ReentrantMutex<Cell<bool>>,
    token: CancellationToken,
}

impl DeliveryGate {
    fn new(token: CancellationToken) -> Self {
        Self { open: ReentrantMutex::new(Cell::new(true)), token }
    }

    fn deliver(&self, callback: impl FnOnce()) -> bool {
        let open = self.open.lock();
        if !open.get() || self.token.is_cancelled() {
            debug!("scan cancelled, dropping event");
            return false;
        }

        callback();
        true
    }

    /// Waits for a callback in flight on another thread
    fn close(&self) {
        self.open.lock().set(false);
    }
}

/// Owns the platform reader for the lifetime of one scan
async fn pump_reader(
    platform: Arc<dyn NfcPlatform>,
    token: CancellationToken,
    events: flume::Sender<ScanEvent>,
    retry_hint: String,
    done: Option<CancellationToken>,
) {
    let _done = done.map(CancellationToken::drop_guard);
    let reader_token = token.child_token();

    // stops the platform reader however this task ends, aborts included
    let _release = reader_token.clone().drop_guard();

    let reader = tokio::select! {
        biased;
        _ = token.cancelled() => return,
        reader = platform.open_reader(reader_token) => reader,
    };

    let reader = match reader {
        Ok(reader) => reader,
        Err(error) => {
            let error = ScanError::Fatal(translate(&error));
            send_event(&events, &token, ScanEvent::Error(error)).await;
            return;
        }
    };

    debug!("nfc reader open");

    loop {
        let event = tokio::select! {
            biased;
            _ = token.cancelled() => break,
            event = reader.recv_async() => event,
        };

        let scan_event = match event {
            Ok(ReaderEvent::Reading { message, serial_number }) => {
                let text = decode_message(&message);
                debug!("read tag {serial_number}");
                ScanEvent::Reading(ReadingEvent::new(text, serial_number))
            }

            Ok(ReaderEvent::ReadingError) => {
                warn!("unable to read tag, waiting for another tap");
                ScanEvent::Error(ScanError::Unreadable { hint: retry_hint.clone() })
            }

            Ok(ReaderEvent::Failed(error)) => {
                let error = ScanError::Fatal(translate(&error));
                send_event(&events, &token, ScanEvent::Error(error)).await;
                break;
            }

            Err(_) => {
                debug!("nfc reader closed by the platform");
                break;
            }
        };

        if !send_event(&events, &token, scan_event).await {
            break;
        }
    }

    debug!("releasing nfc reader");
}

/// False when the scan was cancelled or nobody is listening anymore
async fn send_event(
    events: &flume::Sender<ScanEvent>,
    token: &CancellationToken,
    event: ScanEvent,
) -> bool {
    tokio::select! {
        biased;
        _ = token.cancelled() => false,
        sent = events.send_async(event) => sent.is_ok(),
    }
}
