use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use reportgen::textgen::{extract_text, GeminiClient, RetryPolicy, RetryingGenerator};
use reportgen_core::contract::{MockTextGenerator, TextGenerator};
use reportgen_core::error::GenerationError;

fn fast_policy() -> RetryPolicy {
    RetryPolicy {
        attempts: 3,
        base_delay: Duration::from_millis(1),
    }
}

#[tokio::test]
async fn retrying_generator_recovers_after_transient_failures() {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = calls.clone();
    let mut inner = MockTextGenerator::new();
    inner.expect_generate().times(3).returning(move |_prompt: &str| {
        if seen.fetch_add(1, Ordering::SeqCst) < 2 {
            Err(GenerationError::Status {
                status: 503,
                message: "overloaded".into(),
            })
        } else {
            Ok("Recovered text".to_string())
        }
    });

    let generator = RetryingGenerator::new(inner, fast_policy());
    let text = generator.generate("prompt").await.expect("third attempt succeeds");

    assert_eq!(text, "Recovered text");
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn retrying_generator_gives_up_after_last_attempt() {
    let mut inner = MockTextGenerator::new();
    inner
        .expect_generate()
        .times(3)
        .returning(|_prompt: &str| Err(GenerationError::Http("connection reset".into())));

    let generator = RetryingGenerator::new(inner, fast_policy());
    let err = generator.generate("prompt").await.unwrap_err();

    assert!(matches!(err, GenerationError::Http(ref m) if m == "connection reset"));
}

#[tokio::test]
async fn retrying_generator_does_not_retry_success() {
    let mut inner = MockTextGenerator::new();
    inner
        .expect_generate()
        .times(1)
        .returning(|prompt: &str| Ok(format!("echo: {prompt}")));

    let generator = RetryingGenerator::new(inner, fast_policy());

    assert_eq!(generator.generate("hi").await.unwrap(), "echo: hi");
}

#[test]
fn retry_delay_doubles_per_attempt() {
    let policy = RetryPolicy::default();
    assert_eq!(policy.attempts, 3);
    assert_eq!(policy.delay_after(1), Duration::from_secs(2));
    assert_eq!(policy.delay_after(2), Duration::from_secs(4));
}

#[test]
fn extract_text_takes_first_candidate_part() {
    let body = r#"{
        "candidates": [
            {"content": {"parts": [{"text": "  1.1 Background\nBody text.  "}, {"text": "ignored"}]},
             "finishReason": "STOP"},
            {"content": {"parts": [{"text": "second candidate"}]}}
        ]
    }"#;

    assert_eq!(extract_text(body).unwrap(), "1.1 Background\nBody text.");
}

#[test]
fn extract_text_classifies_unusable_responses() {
    assert!(matches!(
        extract_text(r#"{"candidates": []}"#),
        Err(GenerationError::NoCandidates)
    ));
    assert!(matches!(
        extract_text(r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#),
        Err(GenerationError::NoCandidates)
    ));
    assert!(matches!(
        extract_text(r#"{"candidates": [{"content": {"parts": [{"text": "   "}]}}]}"#),
        Err(GenerationError::Empty)
    ));
    assert!(matches!(
        extract_text(r#"{"candidates": [{"finishReason": "MAX_TOKENS"}]}"#),
        Err(GenerationError::Empty)
    ));
    assert!(matches!(
        extract_text("<html>bad gateway</html>"),
        Err(GenerationError::Malformed(_))
    ));
}

#[tokio::test]
async fn gemini_client_maps_connection_failure_to_http_error() {
    let client = GeminiClient::new("test-key", "gemini-2.5-flash", Duration::from_secs(2))
        .expect("client builds")
        .with_base_url("http://127.0.0.1:9");

    let err = client.generate("prompt").await.unwrap_err();

    assert!(matches!(err, GenerationError::Http(_)), "got {err:?}");
}
