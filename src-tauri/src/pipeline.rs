//! Debounced, switch-on-latest translation for one side of the conversation.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::TranslateError;

/// Receives `(source_text, result)` for every emission that was not superseded.
pub type Sink = dyn Fn(String, Result<String, TranslateError>) + Send + Sync;

pub struct DebouncedPipeline {
    input: mpsc::UnboundedSender<String>,
    worker: JoinHandle<()>,
}

impl DebouncedPipeline {
    /// Spawns the worker on the current runtime. Text pushed in is emitted
    /// once the input has been quiet for `debounce`; each emission cancels the
    /// translation still running for the previous one.
    pub fn spawn<T, Fut, S>(debounce: Duration, translate: T, sink: S) -> Self
    where
        T: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<String, TranslateError>> + Send + 'static,
        S: Fn(String, Result<String, TranslateError>) + Send + Sync + 'static,
    {
        let (input, rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(run(rx, debounce, Arc::new(translate), Arc::new(sink)));
        Self { input, worker }
    }

    pub fn push(&self, text: impl Into<String>) {
        if self.input.send(text.into()).is_err() {
            log::warn!("Translation pipeline is no longer running");
        }
    }
}

impl Drop for DebouncedPipeline {
    fn drop(&mut self) {
        self.worker.abort();
    }
}

async fn run<T, Fut>(
    mut rx: mpsc::UnboundedReceiver<String>,
    debounce: Duration,
    translate: Arc<T>,
    sink: Arc<Sink>,
) where
    T: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<String, TranslateError>> + Send + 'static,
{
    let latest = Arc::new(AtomicU64::new(0));
    let mut in_flight: Option<JoinHandle<()>> = None;

    while let Some(mut text) = rx.recv().await {
        let mut closed = false;
        loop {
            match tokio::time::timeout(debounce, rx.recv()).await {
                Ok(Some(next)) => text = next,
                Ok(None) => {
                    closed = true;
                    break;
                }
                Err(_) => break,
            }
        }

        let generation = latest.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(previous) = in_flight.take() {
            previous.abort();
        }

        if text.trim().is_empty() {
            sink(text, Ok(String::new()));
        } else {
            let translate = translate.clone();
            let sink = sink.clone();
            let latest = latest.clone();
            in_flight = Some(tokio::spawn(async move {
                let result = translate(text.clone()).await;
                if latest.load(Ordering::SeqCst) == generation {
                    sink(text, result);
                } else {
                    log::debug!("Discarding superseded translation");
                }
            }));
        }

        if closed {
            break;
        }
    }
}
