use std::future::Future;
use tokio::{runtime::Handle, task::JoinHandle};

/// A task that will be cancelled (aborted) when dropped
#[derive(Debug)]
pub struct AbortableTask<T>(JoinHandle<T>);

impl<T> AbortableTask<T> {
    pub fn is_finished(&self) -> bool {
        self.0.is_finished()
    }
}

impl<T> AbortableTask<T>
where
    T: Send + 'static,
{
    pub fn spawn<F>(fut: F) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        Self(crate::task::spawn(fut))
    }

    pub fn spawn_on<F>(handle: &Handle, fut: F) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        Self(handle.spawn(fut))
    }
}

impl<T> Drop for AbortableTask<T> {
    fn drop(&mut self) {
        if !self.0.is_finished() {
            tracing::trace!("aborting task on drop");
        }

        self.0.abort();
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{
            Arc,
            atomic::{AtomicBool, Ordering},
        },
        time::Duration,
    };

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn dropping_aborts_the_task() {
        let ran = Arc::new(AtomicBool::new(false));
        let ran_clone = ran.clone();

        let task = AbortableTask::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            ran_clone.store(true, Ordering::SeqCst);
        });

        drop(task);
        tokio::time::sleep(Duration::from_secs(2)).await;

        assert!(!ran.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn finished_task_reports_finished() {
        let task = AbortableTask::spawn(async {});
        tokio::task::yield_now().await;
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert!(task.is_finished());
    }
}
