use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- Chat LLM Provider Args ---
    /// Type of LLM provider for chat completion (gemini, openai, ollama)
    #[arg(long, env = "CHAT_LLM_TYPE", default_value = "gemini")]
    pub chat_llm_type: String,

    /// Base URL for the Chat LLM provider API (e.g., http://localhost:11434 for Ollama)
    #[arg(long, env = "CHAT_BASE_URL")] // No default, let adapters handle defaults if None
    pub chat_base_url: Option<String>,

    /// API Key for the Chat LLM provider. Falls back to GOOGLE_API_KEY for gemini.
    #[arg(long, env = "CHAT_API_KEY", default_value = "")]
    pub chat_api_key: String,

    /// Google Generative AI key, used when CHAT_API_KEY is empty.
    #[arg(long, env = "GOOGLE_API_KEY", hide_env_values = true)]
    pub google_api_key: Option<String>,

    /// Model name for chat completion (e.g., gemini-1.5-flash-latest, gpt-4o-mini, llama3)
    #[arg(long, env = "CHAT_MODEL")] // No default, rely on adapter defaults if None
    pub chat_model: Option<String>,

    /// Sampling temperature passed to the chat model.
    #[arg(long, env = "CHAT_TEMPERATURE")]
    pub chat_temperature: Option<f32>,

    /// Upper bound on tokens generated per reply.
    #[arg(long, env = "CHAT_MAX_TOKENS")]
    pub chat_max_tokens: Option<u32>,

    // --- Transcript Args ---
    /// Comma separated caption languages, in order of preference.
    #[arg(long, env = "TRANSCRIPT_LANGUAGES", default_value = "en")]
    pub transcript_languages: String,

    // --- General App Args ---
    /// Optional path to a JSON file overriding system_prompt, greeting and summary_prompt.
    #[arg(long, env = "PROMPTS_PATH")]
    pub prompts_path: Option<String>,

    /// Host address and port for the HTTP server to listen on.
    #[arg(long, env = "SERVER_ADDR", default_value = "127.0.0.1:8000")]
    pub server_addr: String,

    /// Comma separated origins allowed by CORS. Empty allows any origin.
    #[arg(long, env = "CORS_ALLOWED_ORIGINS", default_value = "")]
    pub cors_allowed_origins: String,

    /// Optional path to the TLS certificate file (PEM format) for enabling HTTPS. Requires --tls-key-path.
    #[arg(long, env = "TLS_CERT_PATH")]
    pub tls_cert_path: Option<String>,

    /// Optional path to the TLS private key file (PEM format) for enabling HTTPS. Requires --tls-cert-path.
    #[arg(long, env = "TLS_KEY_PATH")]
    pub tls_key_path: Option<String>,

    #[arg(long, env = "ENABLE_TLS", default_value = "false")]
    pub enable_tls: bool,
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

impl Args {
    pub fn transcript_language_list(&self) -> Vec<String> {
        split_list(&self.transcript_languages)
    }

    pub fn cors_origin_list(&self) -> Vec<String> {
        split_list(&self.cors_allowed_origins)
    }

    /// CHAT_API_KEY if set, otherwise GOOGLE_API_KEY.
    pub fn resolved_chat_api_key(&self) -> Option<String> {
        Some(self.chat_api_key.trim().to_string())
            .filter(|k| !k.is_empty())
            .or_else(|| {
                self.google_api_key
                    .as_deref()
                    .map(str::trim)
                    .filter(|k| !k.is_empty())
                    .map(str::to_string)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(extra: &[&str]) -> Args {
        let mut argv = vec!["youtube-video-chat"];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    #[test]
    fn language_list_is_trimmed_and_ordered() {
        let args = parse(&["--transcript-languages", " en-US, en ,,de"]);
        assert_eq!(args.transcript_language_list(), vec!["en-US", "en", "de"]);
    }

    #[test]
    fn chat_key_takes_precedence_over_google_key() {
        let args = parse(&["--chat-api-key", "chat", "--google-api-key", "google"]);
        assert_eq!(args.resolved_chat_api_key().as_deref(), Some("chat"));

        let args = parse(&["--chat-api-key", " ", "--google-api-key", "google"]);
        assert_eq!(args.resolved_chat_api_key().as_deref(), Some("google"));
    }

    #[test]
    fn empty_cors_list_means_any_origin() {
        let args = parse(&["--cors-allowed-origins", ""]);
        assert!(args.cors_origin_list().is_empty());
    }
}
