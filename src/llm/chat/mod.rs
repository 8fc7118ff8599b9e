pub mod ollama;
pub mod openai;
pub mod gemini;

use async_trait::async_trait;
use log::{ error, info };
use std::error::Error as StdError;
use std::sync::Arc;
use super::{ LlmConfig, LlmType };
use self::ollama::OllamaClient;
use self::openai::OpenAIChatClient;
use self::gemini::GeminiChatClient;
use crate::error::VideoChatError;
use crate::models::chat::{ ChatHistory, Message, Role };

#[derive(Debug, Clone)]
pub struct CompletionResponse {
    pub response: String,
}

#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Sends the ordered, role-tagged `messages` and returns the model's next reply.
    async fn complete(
        &self,
        messages: &[Message]
    ) -> Result<CompletionResponse, Box<dyn StdError + Send + Sync>>;

    fn get_model(&self) -> String;
    fn get_base_url(&self) -> Option<String>;
}

pub fn new_client(
    config: &LlmConfig
) -> Result<Arc<dyn ChatClient>, Box<dyn StdError + Send + Sync>> {
    let client: Arc<dyn ChatClient> = match config.llm_type {
        LlmType::Ollama => {
            let specific_client = OllamaClient::from_config(config)?;
            Arc::new(specific_client)
        }
        LlmType::OpenAI => {
            let specific_client = OpenAIChatClient::from_config(config)?;
            Arc::new(specific_client)
        }
        LlmType::Gemini => {
            let specific_client = GeminiChatClient::from_config(config)?;
            Arc::new(specific_client)
        }
    };
    Ok(client)
}

/// Separates system messages from the conversational turns.
///
/// Providers that take the system instruction out of band get every system
/// message joined by blank lines; the remaining turns keep their order.
pub(crate) fn split_system_prompt(messages: &[Message]) -> (Option<String>, Vec<&Message>) {
    let (system, turns): (Vec<&Message>, Vec<&Message>) = messages
        .iter()
        .partition(|m| m.role() == Role::System);

    let system = if system.is_empty() {
        None
    } else {
        Some(
            system
                .iter()
                .map(|m| m.content())
                .collect::<Vec<_>>()
                .join("\n\n")
        )
    };
    (system, turns)
}

/// Runs one completion and wraps the reply as an assistant message.
///
/// Provider failures and blank replies both surface as `GenerationFailed`.
pub async fn complete_once(
    client: &dyn ChatClient,
    messages: &[Message]
) -> Result<Message, VideoChatError> {
    info!("Requesting completion from model={} ({} messages)", client.get_model(), messages.len());
    let resp = client.complete(messages).await.map_err(|e| {
        error!("Chat completion failed: {}", e);
        VideoChatError::GenerationFailed(e.to_string())
    })?;

    Message::new(Role::Assistant, resp.response).ok_or_else(|| {
        error!("Chat completion returned an empty reply");
        VideoChatError::GenerationFailed("model returned an empty response".to_string())
    })
}

/// Produces the next assistant message for `history`.
///
/// The system prompt is always sent first, even when the history already starts
/// with one: the provider keeps no state between calls.
pub async fn generate_reply(
    client: &dyn ChatClient,
    system_prompt: &str,
    history: &ChatHistory
) -> Result<Message, VideoChatError> {
    let system = Message::new(Role::System, system_prompt).ok_or_else(||
        VideoChatError::Internal("system prompt is empty".to_string())
    )?;

    let mut outbound = Vec::with_capacity(history.len() + 1);
    outbound.push(system);
    outbound.extend(history.iter().cloned());

    complete_once(client, &outbound).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct RecordingClient {
        reply: Result<String, String>,
        seen: Mutex<Vec<Vec<Message>>>,
    }

    impl RecordingClient {
        fn replying(reply: &str) -> Self {
            Self { reply: Ok(reply.to_string()), seen: Mutex::new(Vec::new()) }
        }

        fn failing(reason: &str) -> Self {
            Self { reply: Err(reason.to_string()), seen: Mutex::new(Vec::new()) }
        }
    }

    #[async_trait]
    impl ChatClient for RecordingClient {
        async fn complete(
            &self,
            messages: &[Message]
        ) -> Result<CompletionResponse, Box<dyn StdError + Send + Sync>> {
            self.seen.lock().unwrap().push(messages.to_vec());
            match &self.reply {
                Ok(text) => Ok(CompletionResponse { response: text.clone() }),
                Err(reason) => Err(reason.clone().into()),
            }
        }

        fn get_model(&self) -> String {
            "recording".to_string()
        }

        fn get_base_url(&self) -> Option<String> {
            None
        }
    }

    fn msg(role: Role, content: &str) -> Message {
        Message::new(role, content).unwrap()
    }

    #[tokio::test]
    async fn system_prompt_is_always_prepended() {
        let client = RecordingClient::replying("A");
        let mut history = ChatHistory::new();
        history.push(msg(Role::System, "S"));
        history.push(msg(Role::User, "U"));

        let reply = generate_reply(&client, "SYS", &history).await.unwrap();
        assert_eq!(reply, msg(Role::Assistant, "A"));

        let seen = client.seen.lock().unwrap();
        assert_eq!(
            seen[0],
            vec![msg(Role::System, "SYS"), msg(Role::System, "S"), msg(Role::User, "U")]
        );
    }

    #[tokio::test]
    async fn provider_error_becomes_generation_failed() {
        let client = RecordingClient::failing("429 Too Many Requests");
        let mut history = ChatHistory::new();
        history.push(msg(Role::User, "U"));

        let err = generate_reply(&client, "SYS", &history).await.unwrap_err();
        assert_eq!(err, VideoChatError::GenerationFailed("429 Too Many Requests".into()));
    }

    #[tokio::test]
    async fn empty_reply_is_not_returned() {
        let client = RecordingClient::replying("   ");
        let mut history = ChatHistory::new();
        history.push(msg(Role::User, "U"));

        let err = generate_reply(&client, "SYS", &history).await.unwrap_err();
        assert_eq!(err.kind(), "GenerationFailed");
    }

    #[test]
    fn system_messages_are_split_out_in_order() {
        let messages = vec![
            msg(Role::System, "one"),
            msg(Role::User, "U"),
            msg(Role::System, "two"),
            msg(Role::Assistant, "A"),
        ];
        let (system, turns) = split_system_prompt(&messages);
        assert_eq!(system.as_deref(), Some("one\n\ntwo"));
        assert_eq!(turns, vec![&messages[1], &messages[3]]);
    }

    #[test]
    fn no_system_messages_gives_none() {
        let messages = vec![msg(Role::User, "U")];
        let (system, turns) = split_system_prompt(&messages);
        assert!(system.is_none());
        assert_eq!(turns.len(), 1);
    }
}
