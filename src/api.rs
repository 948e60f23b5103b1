//! LLM API interaction with exponential backoff retry logic.
//!
//! Every model call the pipeline makes — topic suggestion, the quality-gate
//! classification, and post generation — flows through this module. It
//! includes automatic retry logic with exponential backoff and jitter to
//! handle transient failures gracefully.
//!
//! # Architecture
//!
//! The module uses a trait-based design for flexibility:
//! - [`AskAsync`]: Core trait defining async LLM interaction
//! - [`GeminiClient`]: Gemini REST implementation of the trait
//! - [`RetryAsk`]: Decorator that adds retry logic to any `AskAsync` implementation
//!
//! Callers hold whichever implementation they were constructed with, so tests
//! substitute scripted doubles without touching the network.
//!
//! # Retry Strategy
//!
//! - Maximum 5 retry attempts
//! - Exponential backoff starting at 1 second
//! - Maximum delay capped at 30 seconds
//! - Random jitter (0-250ms) added to prevent thundering herd

use rand::{Rng, rng};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::time::{Duration as StdDuration, Instant};
use tokio::time::sleep;
use tracing::{debug, error, instrument, warn};

/// Trait for async LLM interaction.
///
/// Implementors of this trait can send text to an LLM and receive a response.
/// This abstraction allows for different LLM backends or decorators (like
/// retry logic), and for scripted test doubles.
pub trait AskAsync {
    /// The type of response returned by the LLM.
    type Response;

    /// Send text to the LLM and receive a response.
    async fn ask(&self, text: &str) -> Result<Self::Response, Box<dyn Error>>;
}

/// Wrapper that adds exponential backoff retry logic to any [`AskAsync`] implementation.
///
/// # Backoff Strategy
///
/// The delay between retries follows this formula:
/// ```text
/// delay = min(base_delay * 2^(attempt-1), max_delay) + random_jitter(0..250ms)
/// ```
pub struct RetryAsk<T> {
    /// The underlying LLM client to wrap.
    inner: T,
    /// Maximum number of retry attempts before giving up.
    max_retries: usize,
    /// Initial delay between retries (doubles with each attempt).
    base_delay: StdDuration,
    /// Maximum delay cap to prevent excessive waiting.
    max_delay: StdDuration,
}

impl<T> RetryAsk<T>
where
    T: AskAsync,
{
    /// Create a new retry wrapper around an existing [`AskAsync`] implementation.
    pub fn new(inner: T, max_retries: usize, base_delay: StdDuration) -> Self {
        Self {
            inner,
            max_retries,
            base_delay,
            max_delay: StdDuration::from_secs(30),
        }
    }
}

impl<T> fmt::Debug for RetryAsk<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryAsk")
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .field("max_delay", &self.max_delay)
            .finish()
    }
}

impl<T> AskAsync for RetryAsk<T>
where
    T: AskAsync + fmt::Debug,
{
    type Response = T::Response;

    #[instrument(level = "info", skip_all)]
    async fn ask(&self, text: &str) -> Result<Self::Response, Box<dyn Error>> {
        let total_t0 = Instant::now();
        let mut attempt = 0usize;

        loop {
            let attempt_t0 = Instant::now();
            match self.inner.ask(text).await {
                Ok(resp) => {
                    return Ok(resp);
                }
                Err(e) => {
                    attempt += 1;
                    let attempt_dt = attempt_t0.elapsed();
                    let total_dt = total_t0.elapsed();

                    if attempt > self.max_retries {
                        error!(
                            attempt,
                            max = self.max_retries,
                            elapsed_ms_attempt = attempt_dt.as_millis() as u128,
                            elapsed_ms_total = total_dt.as_millis() as u128,
                            error = %e,
                            "ask() exhausted retries"
                        );
                        return Err(e);
                    }

                    // backoff calc
                    let mut delay = self.base_delay.saturating_mul(1 << (attempt - 1));
                    if delay > self.max_delay {
                        delay = self.max_delay;
                    }
                    let jitter_ms: u64 = rng().random_range(0..=250);
                    let delay = delay + StdDuration::from_millis(jitter_ms);

                    warn!(
                        attempt,
                        max = self.max_retries,
                        elapsed_ms_attempt = attempt_dt.as_millis() as u128,
                        elapsed_ms_total = total_dt.as_millis() as u128,
                        ?delay,
                        error = %e,
                        "ask() attempt failed; backing off"
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}

// Gemini generateContent wire format.

#[derive(Serialize, Deserialize, Debug)]
struct GeminiPart {
    text: String,
}

#[derive(Serialize, Deserialize, Debug)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Serialize, Debug)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
}

#[derive(Deserialize, Debug)]
struct GeminiCandidate {
    content: GeminiContent,
}

#[derive(Deserialize, Debug)]
struct GeminiApiError {
    message: String,
}

#[derive(Deserialize, Debug)]
struct GeminiResponse {
    candidates: Option<Vec<GeminiCandidate>>,
    error: Option<GeminiApiError>,
}

/// Gemini REST implementation of [`AskAsync`].
///
/// Holds its own configuration — base URL, model, key — injected at
/// construction; nothing here reads globals.
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Key intentionally omitted.
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

impl GeminiClient {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
        timeout: StdDuration,
    ) -> Result<Self, Box<dyn Error>> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            model: model.into(),
            api_key: api_key.into(),
        })
    }
}

impl AskAsync for GeminiClient {
    type Response = String;

    #[instrument(level = "info", skip_all)]
    async fn ask(&self, text: &str) -> Result<Self::Response, Box<dyn Error>> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let request = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: text.to_string(),
                }],
            }],
        };

        let t0 = Instant::now();
        let res = self.http.post(&url).json(&request).send().await?;
        let status = res.status();
        debug!(status = %status, elapsed_ms = t0.elapsed().as_millis() as u128, "Gemini response received");

        if !status.is_success() {
            let error_body = res.text().await.unwrap_or_default();
            return Err(format!("Gemini API returned {status}: {error_body}").into());
        }

        let resp: GeminiResponse = res.json().await?;

        if let Some(error) = resp.error {
            return Err(format!("Gemini API error: {}", error.message).into());
        }

        resp.candidates
            .as_ref()
            .and_then(|c| c.first())
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.clone())
            .ok_or_else(|| "No content returned from Gemini".into())
    }
}

/// Build the retry-wrapped Gemini client the pipeline uses everywhere.
pub fn gemini_with_backoff(
    base_url: &str,
    model: &str,
    api_key: &str,
    timeout: StdDuration,
) -> Result<RetryAsk<GeminiClient>, Box<dyn Error>> {
    let client = GeminiClient::new(base_url, model, api_key, timeout)?;
    Ok(RetryAsk::new(client, 5, StdDuration::from_secs(1)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Debug)]
    struct FlakyModel {
        failures_left: RefCell<usize>,
    }

    impl AskAsync for FlakyModel {
        type Response = String;

        async fn ask(&self, _text: &str) -> Result<String, Box<dyn Error>> {
            let mut left = self.failures_left.borrow_mut();
            if *left > 0 {
                *left -= 1;
                return Err("transient".into());
            }
            Ok("ok".to_string())
        }
    }

    #[derive(Debug)]
    struct AlwaysFails;

    impl AskAsync for AlwaysFails {
        type Response = String;

        async fn ask(&self, _text: &str) -> Result<String, Box<dyn Error>> {
            Err("nope".into())
        }
    }

    #[tokio::test]
    async fn test_retry_recovers_after_transient_failures() {
        let api = RetryAsk::new(
            FlakyModel {
                failures_left: RefCell::new(2),
            },
            5,
            StdDuration::from_millis(1),
        );
        let res = api.ask("hello").await.unwrap();
        assert_eq!(res, "ok");
    }

    #[tokio::test]
    async fn test_retry_gives_up_after_max() {
        let api = RetryAsk::new(AlwaysFails, 2, StdDuration::from_millis(1));
        assert!(api.ask("hello").await.is_err());
    }

    #[test]
    fn test_gemini_response_deserialization_success() {
        let json = r#"{
            "candidates": [{
                "content": { "parts": [{"text": "YES"}] }
            }]
        }"#;
        let resp: GeminiResponse = serde_json::from_str(json).unwrap();
        let text = &resp.candidates.unwrap()[0].content.parts[0].text;
        assert_eq!(text, "YES");
    }

    #[test]
    fn test_gemini_response_deserialization_error() {
        let json = r#"{ "error": { "message": "API key invalid" } }"#;
        let resp: GeminiResponse = serde_json::from_str(json).unwrap();
        assert!(resp.candidates.is_none());
        assert_eq!(resp.error.unwrap().message, "API key invalid");
    }

    #[test]
    fn test_gemini_request_serialization() {
        let request = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: "Reply ONLY with YES or NO".to_string(),
                }],
            }],
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("contents"));
        assert!(json.contains("Reply ONLY with YES or NO"));
    }
}
