mod abortable_task;
pub mod task;

use std::sync::OnceLock;
use tokio::runtime::Handle;

pub use abortable_task::AbortableTask;

pub(crate) static TOKIO: OnceLock<Handle> = OnceLock::new();

/// Remember the current runtime so tasks can be spawned from threads the host owns
///
/// Does nothing outside of a runtime or when a runtime was already remembered
pub fn init() {
    if is_tokio_initialized() {
        return;
    }

    let Ok(handle) = Handle::try_current() else {
        tracing::warn!("init called outside of a tokio runtime");
        return;
    };

    if TOKIO.set(handle).is_err() {
        tracing::debug!("tokio runtime already initialized");
    }
}

pub fn is_tokio_initialized() -> bool {
    TOKIO.get().is_some()
}

/// The runtime we are running inside of, or the one remembered by [`init`]
pub fn handle() -> Option<Handle> {
    Handle::try_current().ok().or_else(|| TOKIO.get().cloned())
}
