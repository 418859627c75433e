//! Prompt mode: send one templated prompt, record it, optionally keep it.

use crate::ai::{AiClient, AiReply};
use crate::error::JesterError;
use crate::history::{HistoryEntry, HistoryLog};
use crate::vault::NoteSink;
use std::path::PathBuf;
use tracing::{info, warn};

/// A prompt and the reply it received.
#[derive(Debug, Clone)]
pub struct Exchange {
    pub prompt: String,
    pub reply: AiReply,
}

impl Exchange {
    /// Save the answer as a vault note. A failed reply is never written.
    pub async fn save_to(&self, sink: &NoteSink, name: &str) -> Result<PathBuf, JesterError> {
        match &self.reply {
            AiReply::Success { text } => sink.save(name, text).await,
            AiReply::Failure { reason } => Err(JesterError::LlmApiError {
                message: format!("not saving a failed reply: {reason}"),
            }),
        }
    }
}

/// Ask the model and append the exchange to the history log.
///
/// Only answered prompts are recorded; a failure is returned to the caller
/// untouched and leaves the history as it was.
pub async fn ask_and_record(
    client: &AiClient,
    history: &HistoryLog,
    prompt: String,
) -> Result<Exchange, JesterError> {
    let reply = client.ask(&prompt).await;

    match reply.text() {
        Some(text) => {
            history.append(HistoryEntry::now(&prompt, text)).await?;
            info!("Recorded exchange in {}", history.path().display());
        }
        None => warn!("Reply was a failure; history left unchanged"),
    }

    Ok(Exchange { prompt, reply })
}
