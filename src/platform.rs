//! The host's NFC primitives, injected into [`crate::session::TagSession`]

#[cfg(test)]
pub mod fake;

use tokio_util::sync::CancellationToken;

use crate::{
    capability::CapabilityProbe,
    error::RawError,
    record::{NdefMessage, OutboundMessage},
};

/// Events pushed by an open reader, dropping the receiver releases the reader
pub type ReaderEvents = flume::Receiver<ReaderEvent>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReaderEvent {
    /// A tag was read
    Reading { message: NdefMessage, serial_number: String },

    /// A tag was presented but could not be read, the reader stays open
    ReadingError,

    /// The reader stopped working, no more events will follow
    Failed(RawError),
}

#[async_trait::async_trait]
pub trait NfcPlatform: CapabilityProbe + 'static {
    /// Write to the next tag presented, resolving once the tag is written or the write fails
    async fn write(&self, message: OutboundMessage) -> Result<(), RawError>;

    /// Start listening for tags until `cancel` fires or the receiver is dropped
    async fn open_reader(&self, cancel: CancellationToken) -> Result<ReaderEvents, RawError>;
}
