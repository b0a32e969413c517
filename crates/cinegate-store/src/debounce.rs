//! Trailing-edge debouncer for search-as-you-type.

use std::future::Future;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Interval used by the interactive search.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

/// Runs `callback` with the latest pushed value once no newer value has
/// arrived for `interval`.
///
/// Values superseded within the interval are dropped. Closing the
/// debouncer flushes the pending value, if any.
#[derive(Debug)]
pub struct Debouncer<T> {
    tx: mpsc::UnboundedSender<T>,
    task: JoinHandle<()>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Spawns the timer task on the current runtime.
    pub fn new<F, Fut>(interval: Duration, mut callback: F) -> Self
    where
        F: FnMut(T) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<T>();
        let task = tokio::spawn(async move {
            let mut pending: Option<T> = None;
            loop {
                let Some(value) = pending.take() else {
                    match rx.recv().await {
                        Some(next) => pending = Some(next),
                        None => break,
                    }
                    continue;
                };
                tokio::select! {
                    next = rx.recv() => match next {
                        Some(next) => pending = Some(next),
                        None => {
                            callback(value).await;
                            break;
                        }
                    },
                    () = tokio::time::sleep(interval) => callback(value).await,
                }
            }
        });
        Self { tx, task }
    }

    /// Submits a new value, restarting the quiet period.
    ///
    /// # Errors
    ///
    /// Returns an error if the timer task has stopped.
    pub fn push(&self, value: T) -> Result<()> {
        self.tx
            .send(value)
            .ok()
            .context("debouncer task has stopped")
    }

    /// Flushes the pending value and waits for the last callback.
    ///
    /// # Errors
    ///
    /// Returns an error if the timer task panicked.
    pub async fn finish(self) -> Result<()> {
        drop(self.tx);
        self.task.await.context("debouncer task failed")
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::sync::{Arc, Mutex};

    use super::*;

    type Seen = Arc<Mutex<Vec<String>>>;

    fn recording() -> (Seen, impl FnMut(String) -> std::future::Ready<()> + Send + 'static) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let callback = move |value: String| {
            sink.lock().unwrap().push(value);
            std::future::ready(())
        };
        (seen, callback)
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_collapses_to_last_value() {
        // Arrange
        let (seen, callback) = recording();
        let debouncer = Debouncer::new(SEARCH_DEBOUNCE, callback);

        // Act
        debouncer.push(String::from("bat")).unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        debouncer.push(String::from("batm")).unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        debouncer.push(String::from("batman")).unwrap();
        tokio::time::sleep(Duration::from_millis(600)).await;

        // Assert
        assert_eq!(*seen.lock().unwrap(), vec![String::from("batman")]);
        debouncer.finish().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_spaced_values_each_fire() {
        // Arrange
        let (seen, callback) = recording();
        let debouncer = Debouncer::new(SEARCH_DEBOUNCE, callback);

        // Act
        debouncer.push(String::from("alien")).unwrap();
        tokio::time::sleep(Duration::from_millis(700)).await;
        debouncer.push(String::from("aliens")).unwrap();
        tokio::time::sleep(Duration::from_millis(700)).await;
        debouncer.finish().await.unwrap();

        // Assert
        assert_eq!(
            *seen.lock().unwrap(),
            vec![String::from("alien"), String::from("aliens")]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_finish_flushes_pending_value() {
        // Arrange
        let (seen, callback) = recording();
        let debouncer = Debouncer::new(SEARCH_DEBOUNCE, callback);
        debouncer.push(String::from("matrix")).unwrap();

        // Act
        debouncer.finish().await.unwrap();

        // Assert
        assert_eq!(*seen.lock().unwrap(), vec![String::from("matrix")]);
    }

    #[tokio::test]
    async fn test_finish_without_values_does_nothing() {
        // Arrange
        let (seen, callback) = recording();
        let debouncer = Debouncer::new(SEARCH_DEBOUNCE, callback);

        // Act
        debouncer.finish().await.unwrap();

        // Assert
        assert!(seen.lock().unwrap().is_empty());
    }
}
