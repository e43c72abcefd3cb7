//! Dispatcher retry/fallback scenarios against a scripted transport.

use async_trait::async_trait;
use paisa_core::{Credential, RequestOptions};
use paisa_error::{DispatchErrorKind, HttpError, PaisaError};
use paisa_models::{ChatExchange, ChatRequest, ChatTransport, DispatchTuning, Dispatcher};
use paisa_rate_limit::Subject;
use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// One scripted transport step.
enum Step {
    Reply(ChatExchange),
    Network(String),
}

/// Transport fake that replays a fixed script and records every call.
struct ScriptedTransport {
    script: Mutex<VecDeque<Step>>,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedTransport {
    fn new(steps: Vec<Step>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(steps.into()),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatTransport for ScriptedTransport {
    async fn execute(
        &self,
        credential: &Credential,
        request: &ChatRequest,
    ) -> Result<ChatExchange, HttpError> {
        self.calls
            .lock()
            .unwrap()
            .push((credential.suffix().to_string(), request.model().clone()));
        match self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .expect("transport script exhausted")
        {
            Step::Reply(exchange) => Ok(exchange),
            Step::Network(message) => Err(HttpError::new(message)),
        }
    }
}

fn success(text: &str) -> Step {
    Step::Reply(ChatExchange::new(
        200,
        None,
        format!(r#"{{"choices": [{{"message": {{"content": "{}"}}}}]}}"#, text),
    ))
}

fn status(code: u16, retry_after: Option<u64>, message: &str) -> Step {
    Step::Reply(ChatExchange::new(
        code,
        retry_after,
        format!(r#"{{"error": {{"message": "{}"}}}}"#, message),
    ))
}

fn credentials(names: &[&str]) -> Vec<Credential> {
    names.iter().map(|name| Credential::new(*name)).collect()
}

fn models(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

fn dispatcher(
    creds: &[&str],
    model_names: &[&str],
    transport: Arc<ScriptedTransport>,
) -> Dispatcher {
    Dispatcher::new(
        credentials(creds),
        models(model_names),
        transport,
        Duration::ZERO,
        DispatchTuning::default(),
    )
}

fn options() -> RequestOptions {
    RequestOptions::builder()
        .prompt("prompt")
        .max_tokens(64u32)
        .temperature(0.7f32)
        .build()
        .unwrap()
}

fn dispatch_kind(err: &PaisaError) -> &DispatchErrorKind {
    err.dispatch_kind().expect("expected a dispatch error")
}

#[tokio::test]
async fn empty_credential_pool_fails_immediately() {
    let transport = ScriptedTransport::new(vec![]);
    let dispatcher = dispatcher(&[], &["model-a"], transport.clone());

    let err = dispatcher.send(&options()).await.unwrap_err();
    assert!(matches!(
        dispatch_kind(&err),
        DispatchErrorKind::NoCredentials
    ));
    assert!(transport.calls().is_empty());
}

#[tokio::test]
async fn first_attempt_success_returns_text() {
    let transport = ScriptedTransport::new(vec![success("hello")]);
    let dispatcher = dispatcher(&["key-aaaa"], &["model-a"], transport.clone());

    let text = dispatcher.send(&options()).await.unwrap();
    assert_eq!(text, "hello");
    assert_eq!(transport.calls().len(), 1);
}

#[tokio::test]
async fn all_pairings_tried_exactly_once_then_exhausted() {
    // 2 credentials x 2 models, every attempt failing with a transient
    // upstream error: exactly the 4 distinct pairings are attempted, no
    // repeats, no omissions, and the loop terminates.
    let transport = ScriptedTransport::new(vec![
        status(500, None, "boom"),
        status(500, None, "boom"),
        status(500, None, "boom"),
        status(500, None, "boom"),
    ]);
    let dispatcher = dispatcher(&["key-aaaa", "key-bbbb"], &["model-a", "model-b"], transport.clone());

    let err = dispatcher.send(&options()).await.unwrap_err();
    match dispatch_kind(&err) {
        DispatchErrorKind::AttemptsExhausted { last } => {
            assert!(matches!(
                last.as_deref(),
                Some(DispatchErrorKind::Upstream { status: 500, .. })
            ));
        }
        other => panic!("expected AttemptsExhausted, got {:?}", other),
    }

    let calls = transport.calls();
    assert_eq!(calls.len(), 4);
    let distinct: HashSet<_> = calls.iter().collect();
    assert_eq!(distinct.len(), 4, "a pairing was repeated: {:?}", calls);
}

#[tokio::test]
async fn empty_reply_is_retried_on_another_pairing() {
    let transport = ScriptedTransport::new(vec![
        Step::Reply(ChatExchange::new(200, None, r#"{"choices": []}"#)),
        success("second time lucky"),
    ]);
    let dispatcher = dispatcher(&["key-aaaa", "key-bbbb"], &["model-a"], transport.clone());

    let text = dispatcher.send(&options()).await.unwrap();
    assert_eq!(text, "second time lucky");
    assert_eq!(transport.calls().len(), 2);
}

#[tokio::test]
async fn network_failure_blames_no_subject() {
    let transport = ScriptedTransport::new(vec![
        Step::Network("connection refused".to_string()),
        success("recovered"),
    ]);
    let dispatcher = dispatcher(&["key-aaaa", "key-bbbb"], &["model-a"], transport.clone());

    let text = dispatcher.send(&options()).await.unwrap();
    assert_eq!(text, "recovered");

    // Neither the failing credential nor the model picked up a block
    assert!(
        !dispatcher
            .tracker()
            .is_blocked(&Subject::Credential(Credential::new("key-aaaa")))
    );
    assert!(!dispatcher.tracker().is_blocked(&Subject::model("model-a")));
}

#[tokio::test]
async fn invalid_credential_is_isolated_within_and_across_calls() {
    // 401 on the first credential with the second healthy: the very next
    // attempt succeeds on the second credential.
    let transport = ScriptedTransport::new(vec![
        status(401, None, "invalid api key"),
        success("from the good key"),
        success("still the good key"),
    ]);
    let dispatcher = dispatcher(&["key-aaaa", "key-bbbb"], &["model-a"], transport.clone());

    let text = dispatcher.send(&options()).await.unwrap();
    assert_eq!(text, "from the good key");
    assert_eq!(
        transport.calls(),
        vec![
            ("key-aaaa".to_string(), "model-a".to_string()),
            ("key-bbbb".to_string(), "model-a".to_string()),
        ]
    );

    // The bad credential stays blocked for a separate logical call issued
    // immediately after; only the good one is attempted.
    let text = dispatcher.send(&options()).await.unwrap();
    assert_eq!(text, "still the good key");
    assert_eq!(transport.calls()[2].0, "key-bbbb");
    assert!(
        dispatcher
            .tracker()
            .is_blocked(&Subject::Credential(Credential::new("key-aaaa")))
    );
}

#[tokio::test]
async fn quota_429_blocks_credential_and_model() {
    let transport = ScriptedTransport::new(vec![status(429, Some(60), "Quota exceeded")]);
    let dispatcher = dispatcher(&["key-aaaa"], &["model-a", "model-b"], transport.clone());

    let err = dispatcher.send(&options()).await.unwrap_err();

    // Both the credential and the contended model are blocked; with the
    // only credential gone the request terminates before touching model-b.
    assert!(matches!(
        dispatch_kind(&err),
        DispatchErrorKind::CredentialsExhausted { .. }
    ));
    assert!(
        dispatcher
            .tracker()
            .is_blocked(&Subject::Credential(Credential::new("key-aaaa")))
    );
    assert!(dispatcher.tracker().is_blocked(&Subject::model("model-a")));
    assert!(!dispatcher.tracker().is_blocked(&Subject::model("model-b")));
}

#[tokio::test]
async fn plain_429_blocks_model_only() {
    let transport = ScriptedTransport::new(vec![
        status(429, Some(60), "model is overloaded"),
        success("via the fallback model"),
    ]);
    let dispatcher = dispatcher(&["key-aaaa"], &["model-a", "model-b"], transport.clone());

    let text = dispatcher.send(&options()).await.unwrap();
    assert_eq!(text, "via the fallback model");

    assert!(
        !dispatcher
            .tracker()
            .is_blocked(&Subject::Credential(Credential::new("key-aaaa")))
    );
    assert!(dispatcher.tracker().is_blocked(&Subject::model("model-a")));
    assert_eq!(transport.calls()[1].1, "model-b");
}

#[tokio::test]
async fn consecutive_logical_calls_rotate_credentials() {
    let transport = ScriptedTransport::new(vec![
        success("one"),
        success("two"),
        success("three"),
    ]);
    let dispatcher = dispatcher(
        &["key-aaaa", "key-bbbb", "key-cccc"],
        &["model-a"],
        transport.clone(),
    );

    for _ in 0..3 {
        dispatcher.send(&options()).await.unwrap();
    }

    let used: Vec<String> = transport.calls().into_iter().map(|(c, _)| c).collect();
    let distinct: HashSet<_> = used.iter().collect();
    assert_eq!(distinct.len(), 3, "each call should use a fresh credential: {:?}", used);
}

#[tokio::test]
async fn rate_limited_single_pairing_reports_model_wait() {
    // One credential, one model. A 429 with Retry-After: 2 and generic
    // rate-limit wording blocks the model for 2 seconds but not the
    // credential; the first call exhausts its single pairing.
    let transport = ScriptedTransport::new(vec![status(429, Some(2), "rate limit exceeded")]);
    let dispatcher = dispatcher(&["key-aaaa"], &["model-a"], transport.clone());

    let err = dispatcher.send(&options()).await.unwrap_err();
    match dispatch_kind(&err) {
        DispatchErrorKind::AttemptsExhausted { last } => {
            assert!(matches!(
                last.as_deref(),
                Some(DispatchErrorKind::RateLimited { .. })
            ));
        }
        other => panic!("expected AttemptsExhausted, got {:?}", other),
    }
    assert!(
        !dispatcher
            .tracker()
            .is_blocked(&Subject::Credential(Credential::new("key-aaaa")))
    );

    // A second logical call 0.1s later finds the only model still blocked
    // and fails fast with a wait estimate of roughly 1.9 seconds.
    tokio::time::sleep(Duration::from_millis(100)).await;

    let err = dispatcher.send(&options()).await.unwrap_err();
    match dispatch_kind(&err) {
        DispatchErrorKind::ModelsExhausted { wait_secs } => {
            assert!(
                (1..=2).contains(wait_secs),
                "expected a ~2s wait, got {}",
                wait_secs
            );
        }
        other => panic!("expected ModelsExhausted, got {:?}", other),
    }
    // No further network attempt was made
    assert_eq!(transport.calls().len(), 1);
}

#[tokio::test]
async fn everything_blocked_reports_combined_wait() {
    let transport = ScriptedTransport::new(vec![status(429, Some(60), "Quota exceeded")]);
    let dispatcher = dispatcher(&["key-aaaa"], &["model-a"], transport.clone());

    // Exhaust the single credential and the single model
    let _ = dispatcher.send(&options()).await.unwrap_err();

    let err = dispatcher.send(&options()).await.unwrap_err();
    match dispatch_kind(&err) {
        DispatchErrorKind::ResourcesExhausted { wait_secs } => {
            assert!(*wait_secs >= 1);
        }
        other => panic!("expected ResourcesExhausted, got {:?}", other),
    }
}

#[tokio::test]
async fn attempts_are_throttled_between_pairings() {
    let transport = ScriptedTransport::new(vec![
        status(500, None, "boom"),
        success("eventually"),
    ]);
    let dispatcher = Dispatcher::new(
        credentials(&["key-aaaa", "key-bbbb"]),
        models(&["model-a"]),
        transport.clone(),
        Duration::from_millis(100),
        DispatchTuning::default(),
    );

    let start = Instant::now();
    let text = dispatcher.send(&options()).await.unwrap();
    assert_eq!(text, "eventually");

    // Two attempts through a 100ms gate: the second waited its turn.
    assert!(
        start.elapsed() >= Duration::from_millis(90),
        "attempts were not spaced: {:?}",
        start.elapsed()
    );
}
