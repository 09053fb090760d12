use core::future::Future;
use tokio::task::JoinHandle;

use crate::handle;

/// Spawn onto the current runtime, or the one remembered by [`crate::init`]
///
/// Panics when there is neither, use [`crate::handle`] first when that can happen
pub fn spawn<T>(task: T) -> JoinHandle<T::Output>
where
    T: Future + Send + 'static,
    T::Output: Send + 'static,
{
    match handle() {
        Some(handle) => handle.spawn(task),
        None => tokio::spawn(task),
    }
}

pub fn spawn_blocking<F, R>(f: F) -> JoinHandle<R>
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    match handle() {
        Some(handle) => handle.spawn_blocking(f),
        None => tokio::task::spawn_blocking(f),
    }
}
