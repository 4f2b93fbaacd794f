//! Chat relay: forwards one prompt at a time to the provider.
//!
//! ```text
//! AwaitingKey --set_key--> Ready --begin--> Sent --finish--> Ready
//!      ^                     |
//!      +------clear_key------+
//! ```
//!
//! A provider rejection (bad key, quota, network) lands back in `Ready` with
//! the error surfaced to the caller; nothing is retried.

use std::sync::Arc;

use giri_common::{GiriError, Result};
use giri_llm::connector::Connector;
use giri_llm::traits::{LlmClient, LlmResponse};

use crate::credential::{Credential, CredentialSource};
use crate::transcript::{ChatMessage, Transcript};

pub const NO_KEY_WARNING: &str = "Please enter your API key to start chatting.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayState {
    AwaitingKey,
    Ready,
    /// A prompt is in flight.
    Sent,
}

/// What a submit produced, for the UI to render.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatOutcome {
    Replied(String),
    /// No credential: nothing was sent and the transcript is unchanged.
    NoCredential,
    /// The provider call failed; the user's message stays in the transcript.
    Failed(GiriError),
    /// Blank input is ignored.
    EmptyPrompt,
    /// A previous prompt is still in flight.
    Busy,
}

impl ChatOutcome {
    pub fn message(&self) -> Option<String> {
        match self {
            ChatOutcome::Replied(_) | ChatOutcome::EmptyPrompt => None,
            ChatOutcome::NoCredential => Some(NO_KEY_WARNING.to_string()),
            ChatOutcome::Failed(e) => Some(format!("An error occurred: {e}")),
            ChatOutcome::Busy => Some("Still waiting for the previous reply.".to_string()),
        }
    }
}

/// A prompt that has been accepted and appended, waiting to be sent.
///
/// Owns everything it needs, so it can be driven on another task while the
/// relay stays in `Sent`.
pub struct PendingCall {
    client: Arc<dyn LlmClient>,
    prompt: String,
}

impl PendingCall {
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub async fn run(self) -> Result<LlmResponse> {
        self.client.complete(&self.prompt).await
    }
}

pub struct ChatRelay {
    connector: Arc<dyn Connector>,
    client: Option<Arc<dyn LlmClient>>,
    credential: Option<Credential>,
    state: RelayState,
}

impl ChatRelay {
    pub fn new(connector: Arc<dyn Connector>) -> Self {
        Self {
            connector,
            client: None,
            credential: None,
            state: RelayState::AwaitingKey,
        }
    }

    pub fn state(&self) -> RelayState {
        self.state
    }

    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    pub fn provider_label(&self) -> &str {
        self.connector.provider_label()
    }

    /// Validate `raw` and connect. A rejected key leaves the previous state
    /// (and any previous key) in place.
    pub fn set_key(&mut self, raw: &str, source: CredentialSource) -> Result<()> {
        if self.state == RelayState::Sent {
            return Err(GiriError::ProviderCall(
                "cannot change the key while a reply is pending".to_string(),
            ));
        }
        let credential = Credential::parse(raw, source)?;
        let client = self.connector.connect(credential.expose())?;
        tracing::info!(
            provider = self.connector.provider_label(),
            model = client.model_name(),
            source = ?source,
            key = %credential.hint(),
            "relay.key_set"
        );
        self.client = Some(client);
        self.credential = Some(credential);
        self.state = RelayState::Ready;
        Ok(())
    }

    /// Forget the key. Refused while a reply is pending.
    pub fn clear_key(&mut self) -> Result<()> {
        if self.state == RelayState::Sent {
            return Err(GiriError::ProviderCall(
                "cannot clear the key while a reply is pending".to_string(),
            ));
        }
        self.reset();
        tracing::info!("relay.key_cleared");
        Ok(())
    }

    /// Drop the key and any in-flight state unconditionally.
    pub(crate) fn reset(&mut self) {
        self.client = None;
        self.credential = None;
        self.state = RelayState::AwaitingKey;
    }

    /// Accept `prompt`: append it to `transcript` and move to `Sent`.
    ///
    /// Returns the outcome directly when nothing is to be sent.
    pub fn begin(
        &mut self,
        transcript: &mut Transcript,
        prompt: &str,
    ) -> std::result::Result<PendingCall, ChatOutcome> {
        if prompt.trim().is_empty() {
            return Err(ChatOutcome::EmptyPrompt);
        }
        let client = match (self.state, &self.client) {
            (RelayState::Sent, _) => return Err(ChatOutcome::Busy),
            (RelayState::Ready, Some(client)) => client.clone(),
            _ => {
                tracing::warn!("relay.no_credential");
                return Err(ChatOutcome::NoCredential);
            }
        };

        transcript.push(ChatMessage::user(prompt));
        self.state = RelayState::Sent;
        tracing::debug!(prompt_len = prompt.len(), turns = transcript.len(), "relay.sent");
        Ok(PendingCall {
            client,
            prompt: prompt.to_string(),
        })
    }

    /// Record the provider's answer and return to `Ready`.
    pub fn finish(
        &mut self,
        transcript: &mut Transcript,
        result: Result<LlmResponse>,
    ) -> ChatOutcome {
        if self.state == RelayState::Sent {
            self.state = RelayState::Ready;
        }
        match result {
            Ok(resp) => {
                tracing::info!(
                    chars = resp.text.len(),
                    tokens = ?resp.tokens_used,
                    "relay.replied"
                );
                transcript.push(ChatMessage::assistant(resp.text.clone()));
                ChatOutcome::Replied(resp.text)
            }
            Err(err) => {
                tracing::warn!(error = %err, "relay.failed");
                ChatOutcome::Failed(err)
            }
        }
    }

    /// One full round trip.
    pub async fn submit(&mut self, transcript: &mut Transcript, prompt: &str) -> ChatOutcome {
        match self.begin(transcript, prompt) {
            Ok(call) => {
                let result = call.run().await;
                self.finish(transcript, result)
            }
            Err(outcome) => outcome,
        }
    }
}
