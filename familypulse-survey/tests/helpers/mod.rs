//! Shared helpers for familypulse-survey integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request},
};
use familypulse_common::events::EventBus;
use familypulse_survey::services::{GenerationError, GenerationRequest, TextGenerator};
use familypulse_survey::{build_router, AppState};
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::{Notify, Semaphore};

/// Text generator with separate canned replies for Smart Fill (structured)
/// and summary (plain text) requests
pub struct ScriptedGenerator {
    structured_reply: Result<String, GenerationError>,
    text_reply: Result<String, GenerationError>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
    gate: Option<Gate>,
}

/// Holds a call open until the test releases it
pub struct Gate {
    pub started: Notify,
    pub release: Semaphore,
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self {
            structured_reply: Ok("{}".to_string()),
            text_reply: Ok(String::new()),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    pub fn smart_fill_reply(mut self, reply: &str) -> Self {
        self.structured_reply = Ok(reply.to_string());
        self
    }

    pub fn smart_fill_error(mut self, error: GenerationError) -> Self {
        self.structured_reply = Err(error);
        self
    }

    pub fn summary_reply(mut self, reply: &str) -> Self {
        self.text_reply = Ok(reply.to_string());
        self
    }

    pub fn summary_error(mut self, error: GenerationError) -> Self {
        self.text_reply = Err(error);
        self
    }

    pub fn gated(mut self) -> Self {
        self.gate = Some(Gate {
            started: Notify::new(),
            release: Semaphore::new(0),
        });
        self
    }

    pub fn gate(&self) -> &Gate {
        self.gate.as_ref().expect("generator was not built with gated()")
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(request.prompt.clone());

        if let Some(gate) = &self.gate {
            gate.started.notify_one();
            gate.release
                .acquire()
                .await
                .expect("gate semaphore closed")
                .forget();
        }

        if request.response_schema.is_some() {
            self.structured_reply.clone()
        } else {
            self.text_reply.clone()
        }
    }
}

/// Router over a fresh session backed by `generator`
pub fn setup_app(generator: Arc<ScriptedGenerator>) -> axum::Router {
    let state = AppState::new(generator, true, EventBus::new(100));
    build_router(state)
}

pub fn test_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

pub async fn extract_text(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    String::from_utf8(bytes.to_vec()).expect("Should be UTF-8")
}
