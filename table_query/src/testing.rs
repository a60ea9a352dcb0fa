//! Scripted fetcher for tests
//!
//! Compiled for this crate's tests and behind the `testing` feature.

use crate::errors::FetchError;
use crate::query_builder::QueryParams;
use crate::traits::DataFetcher;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::Mutex;

pub type Reply = Result<Value, FetchError>;

/// Replies from a queue, then repeats a fixed reply; records every request
#[derive(Debug, Default)]
pub struct ScriptedFetcher {
    script: Mutex<VecDeque<Reply>>,
    fallback: Mutex<Option<Reply>>,
    calls: Mutex<Vec<QueryParams>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response
    pub fn respond(&self, body: Value) -> &Self {
        self.push(Ok(body))
    }

    /// Queue a failure
    pub fn fail(&self, error: FetchError) -> &Self {
        self.push(Err(error))
    }

    /// Reply used once the queue is empty
    pub fn always(&self, reply: Reply) -> &Self {
        if let Ok(mut fallback) = self.fallback.lock() {
            *fallback = Some(reply);
        }
        self
    }

    fn push(&self, reply: Reply) -> &Self {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(reply);
        }
        self
    }

    pub fn calls(&self) -> Vec<QueryParams> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|calls| calls.len()).unwrap_or(0)
    }

    fn next_reply(&self) -> Reply {
        let scripted = self
            .script
            .lock()
            .ok()
            .and_then(|mut script| script.pop_front());

        scripted
            .or_else(|| self.fallback.lock().ok().and_then(|fallback| fallback.clone()))
            .unwrap_or_else(|| Ok(json!({ "data": [], "total": 0 })))
    }
}

#[async_trait]
impl DataFetcher for ScriptedFetcher {
    async fn fetch(&self, params: &QueryParams) -> Result<Value, FetchError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(params.clone());
        }
        self.next_reply()
    }
}
