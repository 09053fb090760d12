use std::str::FromStr as _;

use tracing::error;

/// Browsers put this in the error message when NFC is used from an embedded frame
const CONTEXT_RESTRICTED_MARKER: &str = "top-level browsing context";

const UNKNOWN_ERROR_FALLBACK: &str = "Unknown NFC error";

#[derive(Debug, Clone, PartialEq, Eq, Hash, thiserror::Error, uniffi::Error)]
pub enum NfcError {
    #[error("NFC is not supported on this device or browser")]
    UnsupportedPlatform,

    /// NFC was used from an embedded view, the caller should offer to open a new tab or window
    #[error("NFC is blocked in embedded views, open the page in a new tab or window")]
    ContextRestricted,

    #[error("NFC permission denied, unlock the device and allow NFC access")]
    PermissionDenied,

    #[error("{0}")]
    Unknown(String),

    #[error("Failed to generate NFC content")]
    GenerationFailed,

    #[error("An NDEF message needs at least one record")]
    EmptyMessage,

    #[error("A scan is already running")]
    ScanAlreadyActive,

    /// Scans need a tokio runtime, either the current one or one given to `init_runtime`
    #[error("No async runtime available to run the scan")]
    RuntimeUnavailable,
}

impl NfcError {
    pub fn is_context_restricted(&self) -> bool {
        matches!(self, NfcError::ContextRestricted)
    }
}

/// Error delivered to a scan listener
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScanError {
    /// The tag could not be read, the session is still open and the user can tap again
    #[error("{hint}")]
    Unreadable { hint: String },

    /// The session is over, a new scan has to be started
    #[error(transparent)]
    Fatal(#[from] NfcError),
}

impl ScanError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, ScanError::Fatal(_))
    }
}

/// Failure kinds a platform reports, named after the DOMException names
#[derive(Debug, Clone, PartialEq, Eq, Hash, strum::EnumString, strum::AsRefStr)]
pub enum RawErrorKind {
    #[strum(serialize = "NotAllowedError")]
    NotAllowed,

    #[strum(serialize = "NotSupportedError")]
    NotSupported,

    #[strum(serialize = "NotReadableError")]
    NotReadable,

    #[strum(serialize = "NetworkError")]
    Network,

    #[strum(serialize = "AbortError")]
    Abort,

    #[strum(serialize = "InvalidStateError")]
    InvalidState,

    #[strum(default)]
    Other(String),
}

impl RawErrorKind {
    pub fn from_name(name: &str) -> Self {
        RawErrorKind::from_str(name).unwrap_or_else(|_| RawErrorKind::Other(name.to_string()))
    }

    /// The DOMException style name of this kind
    pub fn name(&self) -> &str {
        match self {
            RawErrorKind::Other(name) => name,
            known => AsRef::<str>::as_ref(known),
        }
    }
}

/// An untranslated failure from the platform
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}: {message}", .kind.name())]
pub struct RawError {
    pub kind: RawErrorKind,
    pub message: String,
}

impl RawError {
    pub fn new(kind: RawErrorKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into() }
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(RawErrorKind::Other("Error".to_string()), message)
    }
}

/// Classify a platform failure, the only place platform messages are inspected
pub fn translate(raw: &RawError) -> NfcError {
    error!("NFC operation error: {raw}");

    if raw.message.contains(CONTEXT_RESTRICTED_MARKER) {
        return NfcError::ContextRestricted;
    }

    match raw.kind {
        RawErrorKind::NotAllowed => NfcError::PermissionDenied,
        RawErrorKind::NotSupported => NfcError::UnsupportedPlatform,
        _ if raw.message.is_empty() => NfcError::Unknown(UNKNOWN_ERROR_FALLBACK.to_string()),
        _ => NfcError::Unknown(raw.message.clone()),
    }
}
