/// Reports whether the host exposes NFC reading and writing
///
/// Absence of support is a normal `false`, never an error. Implementations must be cheap
/// and side effect free, the session asks again before every write and scan.
pub trait CapabilityProbe: Send + Sync {
    fn is_supported(&self) -> bool;
}
