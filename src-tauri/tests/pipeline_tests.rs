use std::sync::{Arc, Mutex};
use std::time::Duration;

use parley_lib::error::TranslateError;
use parley_lib::pipeline::DebouncedPipeline;

type Emitted = Arc<Mutex<Vec<(String, Result<String, TranslateError>)>>>;

struct Harness {
    pipeline: DebouncedPipeline,
    emitted: Emitted,
    requested: Arc<Mutex<Vec<String>>>,
}

impl Harness {
    fn emitted(&self) -> Vec<(String, Result<String, TranslateError>)> {
        self.emitted.lock().expect("emitted lock").clone()
    }

    fn requested(&self) -> Vec<String> {
        self.requested.lock().expect("requested lock").clone()
    }
}

/// Translates to upper case. `slow` inputs take a second, `fail` inputs error.
fn harness() -> Harness {
    let emitted: Emitted = Arc::default();
    let requested: Arc<Mutex<Vec<String>>> = Arc::default();

    let translate = {
        let requested = requested.clone();
        move |text: String| {
            requested.lock().expect("requested lock").push(text.clone());
            async move {
                if text.starts_with("slow") {
                    tokio::time::sleep(Duration::from_secs(1)).await;
                }
                if text.starts_with("fail") {
                    return Err(TranslateError::Failed);
                }
                Ok(text.to_uppercase())
            }
        }
    };
    let sink = {
        let emitted = emitted.clone();
        move |source: String, result: Result<String, TranslateError>| {
            emitted.lock().expect("emitted lock").push((source, result));
        }
    };

    Harness {
        pipeline: DebouncedPipeline::spawn(Duration::from_millis(300), translate, sink),
        emitted,
        requested,
    }
}

async fn settle(millis: u64) {
    tokio::time::sleep(Duration::from_millis(millis)).await;
}

#[tokio::test(start_paused = true)]
async fn rapid_input_is_translated_once() {
    let h = harness();
    h.pipeline.push("h");
    settle(100).await;
    h.pipeline.push("he");
    settle(100).await;
    h.pipeline.push("hey");
    settle(500).await;

    assert_eq!(h.requested(), vec!["hey"]);
    assert_eq!(h.emitted(), vec![("hey".to_string(), Ok("HEY".to_string()))]);
}

#[tokio::test(start_paused = true)]
async fn nothing_is_emitted_before_the_quiet_period() {
    let h = harness();
    h.pipeline.push("hello");
    settle(200).await;

    assert!(h.emitted().is_empty());

    settle(200).await;
    assert_eq!(h.emitted().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn blank_text_skips_the_translator() {
    let h = harness();
    h.pipeline.push("   ");
    settle(400).await;

    assert!(h.requested().is_empty());
    assert_eq!(h.emitted(), vec![("   ".to_string(), Ok(String::new()))]);
}

#[tokio::test(start_paused = true)]
async fn newer_emission_cancels_the_running_translation() {
    let h = harness();
    h.pipeline.push("slow first");
    settle(400).await;
    h.pipeline.push("second");
    settle(2_000).await;

    assert_eq!(h.requested(), vec!["slow first", "second"]);
    assert_eq!(
        h.emitted(),
        vec![("second".to_string(), Ok("SECOND".to_string()))]
    );
}

#[tokio::test(start_paused = true)]
async fn errors_do_not_stop_the_pipeline() {
    let h = harness();
    h.pipeline.push("fail once");
    settle(400).await;
    h.pipeline.push("recovered");
    settle(400).await;

    assert_eq!(
        h.emitted(),
        vec![
            ("fail once".to_string(), Err(TranslateError::Failed)),
            ("recovered".to_string(), Ok("RECOVERED".to_string())),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn dropping_the_pipeline_stops_pending_work() {
    let h = harness();
    h.pipeline.push("never");
    let Harness {
        pipeline, emitted, ..
    } = h;
    drop(pipeline);
    settle(500).await;

    assert!(emitted.lock().expect("emitted lock").is_empty());
}
