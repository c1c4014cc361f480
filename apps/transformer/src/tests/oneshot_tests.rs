use super::*;

use std::{
    env, fs,
    path::PathBuf,
    sync::Mutex,
    time::{SystemTime, UNIX_EPOCH},
};

use async_trait::async_trait;
use serde_json::{json, Value};
use shared::{
    domain::{OutputFormat, SourceSystem},
    error::{TransformError, TransformErrorKind},
};

struct StubTransport {
    fail: bool,
    seen: Mutex<Vec<TransformRequest>>,
}

impl StubTransport {
    fn new(fail: bool) -> Arc<Self> {
        Arc::new(Self {
            fail,
            seen: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl TransformTransport for StubTransport {
    async fn transform(&self, request: &TransformRequest) -> Result<Value, TransformError> {
        self.seen.lock().expect("seen lock").push(request.clone());
        if self.fail {
            Err(TransformError::Network("connection refused".to_string()))
        } else {
            Ok(json!({"text": "New order", "channel": "#ops"}))
        }
    }
}

fn temp_payload(contents: &str) -> PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let path = env::temp_dir().join(format!("transformer_oneshot_{suffix}.json"));
    fs::write(&path, contents).expect("write payload");
    path
}

#[tokio::test]
async fn one_shot_prints_pretty_result() {
    let transport = StubTransport::new(false);
    let mut out = Vec::new();

    let report = run_one_shot(
        transport.clone(),
        TransformRequest::new(SourceSystem::Shopify, OutputFormat::Slack, "{\"id\":7}"),
        &mut out,
    )
    .await
    .expect("one shot");

    assert_eq!(report.outcome, CycleOutcome::Success);
    assert!(report.applied);
    assert_eq!(
        String::from_utf8(out).expect("utf8 output"),
        "{\n  \"text\": \"New order\",\n  \"channel\": \"#ops\"\n}\n"
    );

    let seen = transport.seen.lock().expect("seen lock");
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].source, SourceSystem::Shopify);
    assert_eq!(seen[0].format, OutputFormat::Slack);
    assert_eq!(seen[0].payload, "{\"id\":7}");
}

#[tokio::test]
async fn one_shot_failure_prints_fallback_and_succeeds() {
    let transport = StubTransport::new(true);
    let mut out = Vec::new();

    let report = run_one_shot(
        transport,
        TransformRequest::new(SourceSystem::Github, OutputFormat::Discord, "{}"),
        &mut out,
    )
    .await
    .expect("failed cycle is still a normal exit");

    assert_eq!(
        report.outcome,
        CycleOutcome::Failed(TransformErrorKind::Network)
    );
    assert_eq!(
        String::from_utf8(out).expect("utf8 output"),
        "Error transforming webhook.\n"
    );
}

#[tokio::test]
async fn payload_is_read_from_file() {
    let path = temp_payload("{\"event\":\"push\"}");

    let payload = read_payload(Some(&path), &b"ignored"[..])
        .await
        .expect("read file");

    assert_eq!(payload, "{\"event\":\"push\"}");
    fs::remove_file(path).expect("cleanup");
}

#[tokio::test]
async fn payload_falls_back_to_stdin() {
    let payload = read_payload(None, &b"{\"type\":\"charge\"}"[..])
        .await
        .expect("read stdin");
    assert_eq!(payload, "{\"type\":\"charge\"}");

    let payload = read_payload(Some(Path::new("-")), &b"not json at all"[..])
        .await
        .expect("read stdin");
    assert_eq!(payload, "not json at all");
}

#[tokio::test]
async fn missing_payload_file_is_an_error() {
    let err = read_payload(Some(Path::new("/nonexistent/payload.json")), &b""[..])
        .await
        .expect_err("must fail");
    assert!(
        format!("{err:#}").contains("failed to read payload file"),
        "{err:#}"
    );
}
