use std::future::Future;
use std::sync::Arc;

use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;

use super::SpeechState;
use crate::engine::RecognitionEvent;
use crate::transcript::Transcript;

/// A live subscription to plugin events. Dropping the guard stops delivery,
/// so every exit path of the owning operation releases it.
pub(crate) struct ListenerGuard {
    task: JoinHandle<()>,
}

impl ListenerGuard {
    fn spawn<F>(future: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        Self {
            task: tokio::spawn(future),
        }
    }

    pub(crate) fn release(self) {
        drop(self);
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Accumulates recognition results into `recognized_text`.
pub(crate) fn results(
    mut events: broadcast::Receiver<RecognitionEvent>,
    state: Arc<watch::Sender<SpeechState>>,
) -> ListenerGuard {
    ListenerGuard::spawn(async move {
        let mut transcript = Transcript::new();
        while let Some(event) = next_event(&mut events).await {
            if let RecognitionEvent::RecognitionResult(result) = event {
                log::debug!(
                    "Recognized: {} (final: {})",
                    result.text,
                    result.is_final
                );
                let text = transcript.apply(&result);
                state.send_modify(|s| s.recognized_text = text);
            }
        }
    })
}

/// Mirrors download progress events into the progress entry for `code`.
pub(crate) fn download_progress(
    mut events: broadcast::Receiver<RecognitionEvent>,
    state: Arc<watch::Sender<SpeechState>>,
    code: String,
) -> ListenerGuard {
    ListenerGuard::spawn(async move {
        while let Some(event) = next_event(&mut events).await {
            if let RecognitionEvent::DownloadProgress { progress } = event {
                state.send_if_modified(|s| s.set_progress(&code, progress));
            }
        }
    })
}

async fn next_event(
    events: &mut broadcast::Receiver<RecognitionEvent>,
) -> Option<RecognitionEvent> {
    loop {
        match events.recv().await {
            Ok(event) => return Some(event),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                log::warn!("Plugin listener lagged, skipped {skipped} events");
            }
            Err(broadcast::error::RecvError::Closed) => return None,
        }
    }
}
