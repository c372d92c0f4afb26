use parley_lib::transcript::{RecognitionResult, Transcript};

#[test]
fn partials_replace_the_tail() {
    let mut transcript = Transcript::new();
    assert_eq!(transcript.apply(&RecognitionResult::partial("hel")), "hel");
    assert_eq!(transcript.apply(&RecognitionResult::partial("hello")), "hello");
    assert_eq!(transcript.committed(), "");
}

#[test]
fn finals_are_committed_and_clear_the_partial() {
    let mut transcript = Transcript::new();
    transcript.apply(&RecognitionResult::partial("good"));
    assert_eq!(
        transcript.apply(&RecognitionResult::final_text(" good morning ")),
        "good morning"
    );
    assert_eq!(
        transcript.apply(&RecognitionResult::partial("how are")),
        "good morning how are"
    );
    assert_eq!(
        transcript.apply(&RecognitionResult::final_text("how are you")),
        "good morning how are you"
    );
    assert_eq!(transcript.committed(), "good morning how are you");
}

#[test]
fn empty_final_only_clears_the_partial() {
    let mut transcript = Transcript::new();
    transcript.apply(&RecognitionResult::final_text("hello"));
    transcript.apply(&RecognitionResult::partial("wor"));
    assert_eq!(transcript.apply(&RecognitionResult::final_text("  ")), "hello");
}

#[test]
fn clear_resets_everything() {
    let mut transcript = Transcript::new();
    transcript.apply(&RecognitionResult::final_text("hello"));
    transcript.apply(&RecognitionResult::partial("there"));
    transcript.clear();
    assert_eq!(transcript.display(), "");
}

#[test]
fn result_decodes_from_plugin_payload() {
    let result: RecognitionResult =
        serde_json::from_str(r#"{"text":"bonjour","isFinal":true}"#).expect("decode");
    assert_eq!(result, RecognitionResult::final_text("bonjour"));
}
