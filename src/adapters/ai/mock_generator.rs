//! Mock Text Generator for testing.
//!
//! Provides a configurable mock implementation of the TextGenerator port,
//! allowing tests to run without calling real generation APIs.
//!
//! # Example
//!
//! ```ignore
//! let generator = MockTextGenerator::new()
//!     .with_response(r#"{"title": "Soil", "slides": []}"#)
//!     .with_delay(Duration::from_millis(100));
//!
//! let text = generator.generate("prompt").await?;
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{GenerationError, ProviderInfo, TextGenerator};

/// A configured mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    Text(String),
    Error(GenerationError),
}

/// Mock text generator.
///
/// Responses are consumed in order; once the queue is empty the last
/// response configured keeps being returned. Clones share state.
#[derive(Debug, Clone)]
pub struct MockTextGenerator {
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    fallback: Arc<Mutex<Option<MockResponse>>>,
    delay: Duration,
    calls: Arc<Mutex<Vec<String>>>,
}

impl Default for MockTextGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTextGenerator {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            fallback: Arc::new(Mutex::new(None)),
            delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queues a successful response.
    pub fn with_response(self, text: impl Into<String>) -> Self {
        self.push(MockResponse::Text(text.into()));
        self
    }

    /// Queues an error response.
    pub fn with_error(self, error: GenerationError) -> Self {
        self.push(MockResponse::Error(error));
        self
    }

    /// Sets simulated latency per request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Number of calls made.
    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    /// Prompts received, in call order.
    pub fn get_calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }

    fn push(&self, response: MockResponse) {
        *lock(&self.fallback) = Some(response.clone());
        lock(&self.responses).push_back(response);
    }

    fn next_response(&self) -> MockResponse {
        lock(&self.responses)
            .pop_front()
            .or_else(|| lock(&self.fallback).clone())
            .unwrap_or(MockResponse::Error(GenerationError::EmptyResponse))
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl TextGenerator for MockTextGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        lock(&self.calls).push(prompt.to_string());

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        match self.next_response() {
            MockResponse::Text(text) => Ok(text),
            MockResponse::Error(err) => Err(err),
        }
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("mock", "mock-model-1")
    }
}
