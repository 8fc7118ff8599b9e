use crate::cli::Args;
use crate::config::prompt::{ self, PromptConfig };
use crate::error::VideoChatError;
use crate::history::{ ConversationBuilder, ConversationRequest, ConversationTurn };
use crate::llm::LlmConfig;
use crate::llm::chat::{ complete_once, generate_reply, new_client as new_chat_client, ChatClient };
use crate::models::chat::{ ChatHistory, Message, Role };
use crate::youtube::{ fetch_transcript_for_url, TranscriptFetcher, YouTubeTranscriptFetcher };

use log::info;
use std::error::Error;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptAnswer {
    pub transcript: String,
    pub answer: String,
}

/// Holds the collaborators shared by every request.
///
/// Nothing here is mutated after construction; all conversation state arrives
/// with the request and leaves with the response.
#[derive(Clone)]
pub struct VideoAgent {
    chat_client: Arc<dyn ChatClient>,
    transcript_fetcher: Arc<dyn TranscriptFetcher>,
    prompts: Arc<PromptConfig>,
}

impl VideoAgent {
    pub fn new(
        chat_client: Arc<dyn ChatClient>,
        transcript_fetcher: Arc<dyn TranscriptFetcher>,
        prompts: Arc<PromptConfig>
    ) -> Self {
        Self { chat_client, transcript_fetcher, prompts }
    }

    fn initialize_chat_client(
        args: &Args
    ) -> Result<Arc<dyn ChatClient>, Box<dyn Error + Send + Sync>> {
        let chat_config = LlmConfig {
            llm_type: args.chat_llm_type.parse()?,
            base_url: args.chat_base_url.clone(),
            api_key: args.resolved_chat_api_key(),
            completion_model: args.chat_model.clone(),
            temperature: args.chat_temperature,
            max_tokens: args.chat_max_tokens,
        };
        let chat_client = new_chat_client(&chat_config)?;
        info!(
            "Chat client configured: Type={}, Model={}, BaseURL={}",
            chat_config.llm_type,
            chat_client.get_model(),
            chat_client.get_base_url().as_deref().unwrap_or("adapter default")
        );
        Ok(chat_client)
    }

    pub fn from_args(args: &Args) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let chat_client = Self::initialize_chat_client(args)?;
        let transcript_fetcher = Arc::new(YouTubeTranscriptFetcher::from_args(args));
        info!("Transcript languages: {:?}", args.transcript_language_list());
        let prompts = prompt::load_prompts(args.prompts_path.as_deref())?;

        Ok(Self::new(chat_client, transcript_fetcher, prompts))
    }

    fn conversation_builder(&self) -> ConversationBuilder {
        ConversationBuilder::new(
            Arc::clone(&self.transcript_fetcher),
            Arc::clone(&self.chat_client),
            Arc::clone(&self.prompts)
        )
    }

    /// Summarizes the video behind `video_url` in a single completion.
    pub async fn summarize(&self, video_url: &str) -> Result<String, VideoChatError> {
        let transcript = fetch_transcript_for_url(
            self.transcript_fetcher.as_ref(),
            video_url
        ).await?;
        let request = Message::new(Role::User, self.prompts.summary_request(&transcript)).ok_or_else(
            || VideoChatError::Internal("summary request is empty".to_string())
        )?;

        let summary = complete_once(self.chat_client.as_ref(), &[request]).await?;
        Ok(summary.content().to_string())
    }

    pub async fn video_chat(
        &self,
        request: ConversationRequest
    ) -> Result<ConversationTurn, VideoChatError> {
        self.conversation_builder().build(request).await
    }

    /// One-shot question about a video; returns the transcript alongside the answer.
    pub async fn ask(
        &self,
        youtube_url: &str,
        question: &str
    ) -> Result<TranscriptAnswer, VideoChatError> {
        if question.trim().is_empty() {
            return Err(VideoChatError::MissingInput("A question must be provided".to_string()));
        }
        let transcript = fetch_transcript_for_url(
            self.transcript_fetcher.as_ref(),
            youtube_url
        ).await?;

        let mut history = ChatHistory::new();
        let framed = self.prompts.question_framing(&transcript, question);
        if let Some(message) = Message::new(Role::User, framed) {
            history.push(message);
        }
        let answer = generate_reply(
            self.chat_client.as_ref(),
            &self.prompts.system_prompt,
            &history
        ).await?;

        Ok(TranscriptAnswer {
            transcript,
            answer: answer.content().to_string(),
        })
    }
}
