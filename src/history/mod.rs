use log::{ debug, info };
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::sync::Arc;

use crate::config::prompt::PromptConfig;
use crate::error::VideoChatError;
use crate::llm::chat::{ generate_reply, ChatClient };
use crate::models::chat::{ ChatHistory, Message, Role };
use crate::youtube::{ fetch_transcript_for_url, TranscriptFetcher };

/// Body of a `/video-chat/` call: either a video URL to start from, or a
/// previously returned history to resume, plus an optional new question.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct ConversationRequest {
    pub url: Option<String>,
    pub question: Option<String>,
    pub chat_history: Option<JsonValue>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationTurn {
    pub reply: Message,
    pub history: ChatHistory,
}

/// Rebuilds a history from its `{type, content}` wire entries.
pub fn decode_history(entries: &[JsonValue]) -> Result<ChatHistory, VideoChatError> {
    let mut history = ChatHistory::new();
    for (index, entry) in entries.iter().enumerate() {
        let kind = entry
            .get("type")
            .and_then(JsonValue::as_str)
            .ok_or_else(||
                VideoChatError::MalformedHistory(format!("entry {} has no 'type'", index))
            )?;
        let role: Role = kind
            .parse()
            .map_err(|e| VideoChatError::MalformedHistory(format!("entry {}: {}", index, e)))?;
        let content = entry
            .get("content")
            .and_then(JsonValue::as_str)
            .ok_or_else(||
                VideoChatError::MalformedHistory(format!("entry {} has no 'content'", index))
            )?;
        let message = Message::new(role, content).ok_or_else(||
            VideoChatError::MalformedHistory(format!("entry {} has empty 'content'", index))
        )?;
        history.push(message);
    }
    Ok(history)
}

/// The three opening messages of a fresh conversation, and the greeting to show.
pub fn start_history(
    prompts: &PromptConfig,
    transcript: &str
) -> Result<ConversationTurn, VideoChatError> {
    let prompt_message = |role: Role, content: String, what: &str| {
        Message::new(role, content).ok_or_else(||
            VideoChatError::Internal(format!("{} is empty", what))
        )
    };

    let greeting = prompt_message(Role::Assistant, prompts.greeting.clone(), "greeting")?;
    let mut history = ChatHistory::new();
    history.push(prompt_message(Role::System, prompts.system_prompt.clone(), "system prompt")?);
    history.push(
        prompt_message(Role::User, prompts.transcript_framing(transcript), "transcript")?
    );
    history.push(greeting.clone());

    Ok(ConversationTurn { reply: greeting, history })
}

pub struct ConversationBuilder {
    transcript_fetcher: Arc<dyn TranscriptFetcher>,
    chat_client: Arc<dyn ChatClient>,
    prompts: Arc<PromptConfig>,
}

impl ConversationBuilder {
    pub fn new(
        transcript_fetcher: Arc<dyn TranscriptFetcher>,
        chat_client: Arc<dyn ChatClient>,
        prompts: Arc<PromptConfig>
    ) -> Self {
        Self { transcript_fetcher, chat_client, prompts }
    }

    /// Starts or resumes a conversation.
    ///
    /// A supplied `chat_history` always wins over `url`, so resuming never
    /// re-fetches the transcript.
    pub async fn build(
        &self,
        request: ConversationRequest
    ) -> Result<ConversationTurn, VideoChatError> {
        match (request.chat_history, request.url) {
            (Some(chat_history), _) => self.resume(&chat_history, request.question).await,
            (None, Some(url)) => self.start(&url).await,
            (None, None) =>
                Err(
                    VideoChatError::MissingInput(
                        "Either chat history or video URL must be provided".to_string()
                    )
                ),
        }
    }

    async fn start(&self, url: &str) -> Result<ConversationTurn, VideoChatError> {
        let transcript = fetch_transcript_for_url(self.transcript_fetcher.as_ref(), url).await?;
        info!("Starting conversation from {} ({} transcript chars)", url, transcript.len());
        start_history(&self.prompts, &transcript)
    }

    async fn resume(
        &self,
        chat_history: &JsonValue,
        question: Option<String>
    ) -> Result<ConversationTurn, VideoChatError> {
        let entries = chat_history
            .as_array()
            .ok_or_else(||
                VideoChatError::MalformedHistory("expected a list of messages".to_string())
            )?;
        let mut history = decode_history(entries)?;
        debug!("Resuming conversation with {} prior messages", history.len());

        match question.and_then(|q| Message::new(Role::User, q)) {
            Some(question) => history.push(question),
            None if history.last().map(Message::role) == Some(Role::User) => {}
            None => {
                return Err(
                    VideoChatError::MissingInput(
                        "A question is required to continue the conversation".to_string()
                    )
                );
            }
        }

        let reply = generate_reply(
            self.chat_client.as_ref(),
            &self.prompts.system_prompt,
            &history
        ).await?;
        history.push(reply.clone());

        Ok(ConversationTurn { reply, history })
    }
}
