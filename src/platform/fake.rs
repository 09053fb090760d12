use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

use super::{NfcPlatform, ReaderEvent, ReaderEvents};
use crate::{
    capability::CapabilityProbe,
    error::RawError,
    record::{NdefMessage, NdefRecord, OutboundMessage},
};

/// In memory platform, records writes and lets tests push reader events
#[derive(Debug, Default)]
pub struct FakePlatform {
    unsupported: AtomicBool,
    write_calls: AtomicUsize,
    open_calls: AtomicUsize,
    writes: Mutex<Vec<OutboundMessage>>,
    write_error: Mutex<Option<RawError>>,
    open_error: Mutex<Option<RawError>>,
    reader: Mutex<Option<flume::Sender<ReaderEvent>>>,
    reader_cancel: Mutex<Option<CancellationToken>>,
}

impl FakePlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unsupported() -> Self {
        let platform = Self::default();
        platform.set_supported(false);
        platform
    }

    pub fn set_supported(&self, supported: bool) {
        self.unsupported.store(!supported, Ordering::SeqCst);
    }

    pub fn fail_writes_with(&self, error: RawError) {
        *self.write_error.lock() = Some(error);
    }

    pub fn fail_open_with(&self, error: RawError) {
        *self.open_error.lock() = Some(error);
    }

    pub fn writes(&self) -> Vec<OutboundMessage> {
        self.writes.lock().clone()
    }

    pub fn write_calls(&self) -> usize {
        self.write_calls.load(Ordering::SeqCst)
    }

    pub fn open_calls(&self) -> usize {
        self.open_calls.load(Ordering::SeqCst)
    }

    /// Push an event into the open reader, false if nobody is listening
    pub fn inject(&self, event: ReaderEvent) -> bool {
        match self.reader.lock().as_ref() {
            Some(sender) => sender.send(event).is_ok(),
            None => false,
        }
    }

    pub fn inject_reading(&self, records: Vec<NdefRecord>, serial_number: &str) -> bool {
        let message = NdefMessage::try_new(records).expect("test messages have records");
        self.inject(ReaderEvent::Reading { message, serial_number: serial_number.to_string() })
    }

    pub fn reader_released(&self) -> bool {
        let receiver_gone = match self.reader.lock().as_ref() {
            Some(sender) => sender.is_disconnected(),
            None => true,
        };

        let cancelled = match self.reader_cancel.lock().as_ref() {
            Some(cancel) => cancel.is_cancelled(),
            None => true,
        };

        receiver_gone || cancelled
    }
}

impl CapabilityProbe for FakePlatform {
    fn is_supported(&self) -> bool {
        !self.unsupported.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl NfcPlatform for FakePlatform {
    async fn write(&self, message: OutboundMessage) -> Result<(), RawError> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(error) = self.write_error.lock().clone() {
            return Err(error);
        }

        self.writes.lock().push(message);
        Ok(())
    }

    async fn open_reader(&self, cancel: CancellationToken) -> Result<ReaderEvents, RawError> {
        self.open_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(error) = self.open_error.lock().clone() {
            return Err(error);
        }

        let (sender, receiver) = flume::unbounded();
        *self.reader.lock() = Some(sender);
        *self.reader_cancel.lock() = Some(cancel);

        Ok(receiver)
    }
}
