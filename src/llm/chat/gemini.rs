use async_trait::async_trait;
use std::error::Error as StdError;
use log::info;

use super::{ ChatClient, CompletionResponse, split_system_prompt };
use crate::llm::LlmConfig;
use crate::models::chat::{ Message, Role };
use rllm::chat::{ ChatMessage, ChatRole, MessageType };
use rllm::builder::{ LLMBackend, LLMBuilder };
use rllm::LLMProvider;

const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash-latest";

pub struct GeminiChatClient {
    api_key: String,
    model: String,
    base_url: Option<String>,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
}

impl GeminiChatClient {
    pub fn new(
        api_key: String,
        model: Option<String>,
        base_url: Option<String>,
        max_tokens: Option<u32>,
        temperature: Option<f32>
    ) -> Result<Self, Box<dyn StdError + Send + Sync>> {
        if api_key.trim().is_empty() {
            return Err("Google API key is required for GeminiChatClient".into());
        }
        let chat_model = model.unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string());

        Ok(Self {
            api_key,
            model: chat_model,
            base_url,
            max_tokens,
            temperature,
        })
    }

    pub fn from_config(config: &LlmConfig) -> Result<Self, Box<dyn StdError + Send + Sync>> {
        let api_key = config.api_key
            .clone()
            .ok_or_else(|| "Google API key is required for GeminiChatClient".to_string())?;

        Self::new(
            api_key,
            config.completion_model.clone(),
            config.base_url.clone(),
            config.max_tokens,
            config.temperature
        )
    }

    // Gemini takes the system instruction per provider, so one is built per call.
    fn build_provider(
        &self,
        system: Option<String>
    ) -> Result<Box<dyn LLMProvider>, Box<dyn StdError + Send + Sync>> {
        let mut builder = LLMBuilder::new()
            .backend(LLMBackend::Google)
            .api_key(self.api_key.clone())
            .model(&self.model)
            .stream(false);

        if let Some(url) = &self.base_url {
            builder = builder.base_url(url);
        }
        if let Some(tokens) = self.max_tokens {
            builder = builder.max_tokens(tokens);
        }
        if let Some(temp) = self.temperature {
            builder = builder.temperature(temp);
        }
        if let Some(system) = system {
            builder = builder.system(system);
        }

        Ok(builder.build()?)
    }
}

fn to_rllm_message(message: &Message) -> ChatMessage {
    let role = match message.role() {
        Role::Assistant => ChatRole::Assistant,
        Role::User | Role::System => ChatRole::User,
    };
    ChatMessage {
        role,
        content: message.content().to_string(),
        message_type: MessageType::Text,
    }
}

#[async_trait]
impl ChatClient for GeminiChatClient {
    async fn complete(
        &self,
        messages: &[Message]
    ) -> Result<CompletionResponse, Box<dyn StdError + Send + Sync>> {
        let (system, turns) = split_system_prompt(messages);
        let chat_messages: Vec<ChatMessage> = turns
            .into_iter()
            .map(to_rllm_message)
            .collect();
        info!(
            "GeminiChatClient::complete() → model={} base_url={:?} turns={}",
            self.model,
            self.base_url,
            chat_messages.len()
        );

        let provider = self.build_provider(system)?;
        let resp = provider.chat(&chat_messages).await?;
        let text = resp
            .text()
            .map(|s| s.to_string())
            .ok_or("Gemini response contained no text")?;
        Ok(CompletionResponse { response: text })
    }

    fn get_model(&self) -> String {
        self.model.clone()
    }

    fn get_base_url(&self) -> Option<String> {
        self.base_url.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requires_api_key() {
        let config = LlmConfig::default();
        assert!(GeminiChatClient::from_config(&config).is_err());

        let config = LlmConfig { api_key: Some("  ".into()), ..LlmConfig::default() };
        assert!(GeminiChatClient::from_config(&config).is_err());
    }

    #[test]
    fn defaults_model_when_unset() {
        let config = LlmConfig { api_key: Some("key".into()), ..LlmConfig::default() };
        let client = GeminiChatClient::from_config(&config).unwrap();
        assert_eq!(client.get_model(), DEFAULT_GEMINI_MODEL);
    }

    #[test]
    fn assistant_turns_keep_their_role() {
        let message = Message::new(Role::Assistant, "hi").unwrap();
        let converted = to_rllm_message(&message);
        assert!(matches!(converted.role, ChatRole::Assistant));
        assert_eq!(converted.content, "hi");
    }
}
