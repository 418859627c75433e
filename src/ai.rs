//! Chat-completion client.
//!
//! One prompt in, one [`AiReply`] out. The client never returns `Err` and
//! never panics: transport errors, non-2xx statuses and malformed bodies all
//! become [`AiReply::Failure`]. The reply is tagged so downstream consumers
//! (history log, note sink, conversion driver) can refuse to persist a
//! failure as if it were an answer.
//!
//! There are no retries and no timeout beyond the transport default.

use crate::config::{AppConfig, USER_AGENT};
use crate::error::JesterError;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

/// Prefix of the display form of a failed reply.
pub const ERROR_MARKER: &str = "Error contacting model:";

/// Longest slice of an error body quoted in a failure reason.
const MAX_ERROR_BODY: usize = 500;

/// Outcome of one chat request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AiReply {
    /// The model answered.
    Success { text: String },
    /// The request did not produce an answer.
    Failure { reason: String },
}

impl AiReply {
    pub fn is_success(&self) -> bool {
        matches!(self, AiReply::Success { .. })
    }

    /// The answer text, if the model answered.
    pub fn text(&self) -> Option<&str> {
        match self {
            AiReply::Success { text } => Some(text),
            AiReply::Failure { .. } => None,
        }
    }

    /// Convert into a `Result` for callers that treat a failure as fatal.
    pub fn into_result(self) -> Result<String, JesterError> {
        match self {
            AiReply::Success { text } => Ok(text),
            AiReply::Failure { reason } => Err(JesterError::LlmApiError { message: reason }),
        }
    }
}

impl fmt::Display for AiReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AiReply::Success { text } => f.write_str(text),
            AiReply::Failure { reason } => write!(f, "{ERROR_MARKER} {reason}"),
        }
    }
}

// ── Wire format ──────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

// ── Client ───────────────────────────────────────────────────────────────

/// Client for one chat-completion endpoint, model and credential.
#[derive(Clone)]
pub struct AiClient {
    http: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl fmt::Debug for AiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AiClient")
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl AiClient {
    /// Build a client from the application configuration.
    pub fn new(app: &AppConfig) -> Result<Self, JesterError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| JesterError::Internal(format!("HTTP client: {e}")))?;

        Ok(Self {
            http,
            api_url: app.api_url.clone(),
            api_key: app.api_key.clone(),
            model: app.model.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send `prompt` as a single user message and wait for the completion.
    pub async fn ask(&self, prompt: &str) -> AiReply {
        match self.request(prompt).await {
            Ok(text) => {
                debug!("Model answered with {} bytes", text.len());
                AiReply::Success { text }
            }
            Err(reason) => {
                warn!("Chat request failed: {}", reason);
                AiReply::Failure { reason }
            }
        }
    }

    async fn request(&self, prompt: &str) -> Result<String, String> {
        let body = ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        debug!(
            "POST {} (model {}, {} prompt bytes)",
            self.api_url,
            self.model,
            prompt.len()
        );

        let response = self
            .http
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = response.status();
        let text = response.text().await.map_err(|e| e.to_string())?;

        if !status.is_success() {
            return Err(format!("HTTP {}: {}", status, truncate(text.trim(), MAX_ERROR_BODY)));
        }

        parse_completion(&text)
    }
}

/// Extract `choices[0].message.content` from a response body.
fn parse_completion(body: &str) -> Result<String, String> {
    let parsed: ChatResponse =
        serde_json::from_str(body).map_err(|e| format!("malformed response body: {e}"))?;

    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| "response contained no completion".to_string())
}

fn truncate(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_shape() {
        let body = ChatRequest {
            model: "m",
            messages: [ChatMessage {
                role: "user",
                content: "hi",
            }],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"model": "m", "messages": [{"role": "user", "content": "hi"}]})
        );
    }

    #[test]
    fn parses_first_choice() {
        let body = r##"{"choices":[{"message":{"role":"assistant","content":"# Title"}},{"message":{"content":"second"}}]}"##;
        assert_eq!(parse_completion(body).unwrap(), "# Title");
    }

    #[test]
    fn empty_choices_is_error() {
        let err = parse_completion(r#"{"choices":[]}"#).unwrap_err();
        assert!(err.contains("no completion"));
    }

    #[test]
    fn null_content_is_error() {
        assert!(parse_completion(r#"{"choices":[{"message":{"content":null}}]}"#).is_err());
    }

    #[test]
    fn malformed_body_is_error() {
        let err = parse_completion("<html>bad gateway</html>").unwrap_err();
        assert!(err.starts_with("malformed response body"));
    }

    #[test]
    fn failure_display_has_marker() {
        let reply = AiReply::Failure {
            reason: "HTTP 500".into(),
        };
        assert_eq!(reply.to_string(), "Error contacting model: HTTP 500");
        assert!(reply.text().is_none());
        assert!(matches!(
            reply.into_result(),
            Err(JesterError::LlmApiError { .. })
        ));
    }

    #[test]
    fn success_display_is_text() {
        let reply = AiReply::Success { text: "hi".into() };
        assert!(reply.is_success());
        assert_eq!(reply.to_string(), "hi");
        assert_eq!(reply.into_result().unwrap(), "hi");
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("héllo", 2), "h");
        assert_eq!(truncate("abc", 10), "abc");
    }
}
