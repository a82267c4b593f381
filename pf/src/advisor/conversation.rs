//! Multi-turn chat with locally kept history

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::CHAT_INTERRUPTED_MESSAGE;
use crate::llm::{CompletionRequest, LlmClient, LlmError, Message};

/// Reply to one chat message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    pub text: Option<String>,
}

impl ChatReply {
    /// Text to show a user; the interruption notice when the reply was empty
    pub fn display_text(&self) -> &str {
        self.text.as_deref().unwrap_or(CHAT_INTERRUPTED_MESSAGE)
    }
}

/// A chat session primed with a fixed system instruction
///
/// Every message resends the instruction plus all prior turns.
pub struct Conversation {
    llm: Arc<dyn LlmClient>,
    system_instruction: String,
    history: Vec<Message>,
}

impl Conversation {
    pub(crate) fn new(llm: Arc<dyn LlmClient>, system_instruction: String) -> Self {
        Self {
            llm,
            system_instruction,
            history: Vec::new(),
        }
    }

    /// Send `text` and record the exchange
    ///
    /// Only replies carrying text are recorded. A failed send or an empty
    /// reply leaves history unchanged, so no dangling user turn or empty
    /// model turn is ever resent.
    pub async fn send_message(&mut self, text: &str) -> Result<ChatReply, LlmError> {
        debug!(turns = self.history.len(), "send_message: called");
        let mut messages = self.history.clone();
        messages.push(Message::user(text));

        let request = CompletionRequest {
            system_instruction: Some(self.system_instruction.clone()),
            messages,
            ..Default::default()
        };
        let response = self.llm.complete(request).await?;

        let Some(reply) = response.text else {
            warn!(finish_reason = ?response.finish_reason, "send_message: reply carried no text");
            return Ok(ChatReply { text: None });
        };

        self.history.push(Message::user(text));
        self.history.push(Message::model(reply.clone()));
        info!(turns = self.history.len(), "Chat exchange recorded");

        Ok(ChatReply { text: Some(reply) })
    }

    /// Turns exchanged so far, oldest first
    pub fn history(&self) -> &[Message] {
        &self.history
    }

    pub fn system_instruction(&self) -> &str {
        &self.system_instruction
    }
}
