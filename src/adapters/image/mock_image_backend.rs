//! Mock Image Backend for testing.
//!
//! Returns a small valid PNG (base64) for every prompt unless told to fail.
//! Failures can be keyed on prompt substrings or limited to the first calls.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{ImageBackend, ImageFetchFailure, ImageRequest, ServiceHealth};

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";
const DEFAULT_PAYLOAD_LEN: usize = 1400;

/// Mock image service.
#[derive(Debug)]
pub struct MockImageBackend {
    failing_substrings: Vec<String>,
    failing_first: usize,
    payload_len: usize,
    delay: Duration,
    delays_on: Vec<(String, Duration)>,
    healthy: bool,
    render_calls: AtomicUsize,
    probe_calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl Default for MockImageBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockImageBackend {
    pub fn new() -> Self {
        Self {
            failing_substrings: Vec::new(),
            failing_first: 0,
            payload_len: DEFAULT_PAYLOAD_LEN,
            delay: Duration::ZERO,
            delays_on: Vec::new(),
            healthy: true,
            render_calls: AtomicUsize::new(0),
            probe_calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Every prompt containing `needle` fails with a 500.
    pub fn failing_on(mut self, needle: impl Into<String>) -> Self {
        self.failing_substrings.push(needle.into());
        self
    }

    /// The first `count` render calls fail with a 503.
    pub fn failing_first(mut self, count: usize) -> Self {
        self.failing_first = count;
        self
    }

    /// Approximate base64 length of returned payloads.
    pub fn with_payload_len(mut self, len: usize) -> Self {
        self.payload_len = len;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Prompts containing `needle` wait `delay` before answering.
    pub fn with_delay_on(mut self, needle: impl Into<String>, delay: Duration) -> Self {
        self.delays_on.push((needle.into(), delay));
        self
    }

    pub fn unhealthy(mut self) -> Self {
        self.healthy = false;
        self
    }

    pub fn render_calls(&self) -> usize {
        self.render_calls.load(Ordering::SeqCst)
    }

    pub fn probe_calls(&self) -> usize {
        self.probe_calls.load(Ordering::SeqCst)
    }

    /// Prompts received, in arrival order.
    pub fn prompts(&self) -> Vec<String> {
        lock(&self.prompts).clone()
    }

    /// Base64 of a PNG-signed payload of roughly `payload_len` characters.
    pub fn payload(&self) -> String {
        let byte_len = (self.payload_len * 3 / 4).max(PNG_SIGNATURE.len());
        let mut bytes = PNG_SIGNATURE.to_vec();
        bytes.resize(byte_len, 0);
        STANDARD.encode(bytes)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl ImageBackend for MockImageBackend {
    async fn render(&self, request: &ImageRequest) -> Result<String, ImageFetchFailure> {
        let call = self.render_calls.fetch_add(1, Ordering::SeqCst);
        lock(&self.prompts).push(request.prompt.clone());

        let delay = self
            .delays_on
            .iter()
            .filter(|(needle, _)| request.prompt.contains(needle.as_str()))
            .map(|(_, delay)| *delay)
            .fold(self.delay, Duration::max);
        if !delay.is_zero() {
            sleep(delay).await;
        }

        if call < self.failing_first {
            return Err(ImageFetchFailure::Status {
                code: 503,
                body: "warming up".to_string(),
            });
        }
        if self
            .failing_substrings
            .iter()
            .any(|needle| request.prompt.contains(needle.as_str()))
        {
            return Err(ImageFetchFailure::Status {
                code: 500,
                body: "No images generated".to_string(),
            });
        }
        Ok(self.payload())
    }

    async fn probe(&self) -> Result<ServiceHealth, ImageFetchFailure> {
        self.probe_calls.fetch_add(1, Ordering::SeqCst);
        if self.healthy {
            Ok(ServiceHealth {
                status: "ok".to_string(),
                api_key_set: true,
            })
        } else {
            Err(ImageFetchFailure::Status {
                code: 503,
                body: "unavailable".to_string(),
            })
        }
    }
}
