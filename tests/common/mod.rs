//! Shared fixtures: a scripted transport and canned provider bodies.

#![allow(dead_code)]

use async_trait::async_trait;
use notes_ai::telemetry::InMemoryUsageSink;
use notes_ai::transport::{Transport, TransportError};
use notes_ai::types::ChatCompletionRequest;
use notes_ai::{GenerationClient, SchemaDescriptor};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

/// One scripted outcome of `post_json`.
pub enum Step {
    Respond(Value),
    Fail(TransportError),
    /// Never resolves; only the attempt deadline ends it
    Hang,
}

/// Transport that replays a script and records every call.
///
/// When the script runs out, the last step is repeated.
pub struct ScriptedTransport {
    steps: Mutex<VecDeque<Step>>,
    last: Mutex<Option<Step>>,
    calls: Mutex<Vec<(Instant, ChatCompletionRequest)>>,
}

impl ScriptedTransport {
    pub fn new(steps: Vec<Step>) -> Arc<Self> {
        Arc::new(Self {
            steps: Mutex::new(steps.into()),
            last: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn call_times(&self) -> Vec<Instant> {
        self.calls.lock().unwrap().iter().map(|(t, _)| *t).collect()
    }

    pub fn payloads(&self) -> Vec<Value> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, p)| serde_json::to_value(p).unwrap())
            .collect()
    }

    fn next_step(&self) -> Step {
        let mut steps = self.steps.lock().unwrap();
        let mut last = self.last.lock().unwrap();
        if let Some(step) = steps.pop_front() {
            *last = Some(clone_step(&step));
            return step;
        }
        match last.as_ref() {
            Some(step) => clone_step(step),
            None => Step::Hang,
        }
    }
}

fn clone_step(step: &Step) -> Step {
    match step {
        Step::Respond(v) => Step::Respond(v.clone()),
        Step::Hang => Step::Hang,
        Step::Fail(e) => Step::Fail(match e {
            TransportError::Status {
                status,
                body,
                retry_after_ms,
            } => TransportError::Status {
                status: *status,
                body: body.clone(),
                retry_after_ms: *retry_after_ms,
            },
            TransportError::Timeout(d) => TransportError::Timeout(*d),
            TransportError::Cancelled => TransportError::Cancelled,
            TransportError::Network(s) => TransportError::Network(s.clone()),
            TransportError::Other(s) => TransportError::Other(s.clone()),
        }),
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn post_json(&self, payload: &ChatCompletionRequest) -> Result<Value, TransportError> {
        self.calls
            .lock()
            .unwrap()
            .push((Instant::now(), payload.clone()));
        match self.next_step() {
            Step::Respond(v) => Ok(v),
            Step::Fail(e) => Err(e),
            Step::Hang => std::future::pending().await,
        }
    }
}

pub fn status(code: u16, body: &str) -> Step {
    Step::Fail(TransportError::status(code, body))
}

/// A provider success body with the given message content.
pub fn completion(content: &str) -> Value {
    completion_with_reason(content, "stop")
}

pub fn completion_with_reason(content: &str, finish_reason: &str) -> Value {
    json!({
        "id": "gen-123",
        "model": "openai/gpt-4o-mini",
        "created": 1_700_000_000,
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": finish_reason
        }],
        "usage": {"prompt_tokens": 120, "completion_tokens": 30, "total_tokens": 150}
    })
}

/// The meeting-summary schema used across tests.
pub fn summary_schema() -> SchemaDescriptor {
    SchemaDescriptor::object("meeting_summary")
        .required_property("summary", "string")
        .required_property("goal_met", "boolean")
        .property("label", "string")
}

pub fn client_with(
    transport: Arc<ScriptedTransport>,
    sink: Option<Arc<InMemoryUsageSink>>,
) -> GenerationClient {
    let mut builder = GenerationClient::builder()
        .api_key("sk-test")
        .timeout(Duration::from_secs(1))
        .retry_attempts(2)
        .retry_delay(Duration::from_millis(1000))
        .transport(transport);
    if let Some(sink) = sink {
        builder = builder.usage_sink(sink);
    }
    builder.build().unwrap()
}

/// Wait until the sink holds `n` records; background tasks need a few polls.
pub async fn wait_for_records(sink: &InMemoryUsageSink, n: usize) {
    for _ in 0..200 {
        if sink.len() >= n {
            return;
        }
        tokio::task::yield_now().await;
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("expected {} usage records, found {}", n, sink.len());
}
