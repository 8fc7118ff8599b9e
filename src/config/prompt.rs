use serde::Deserialize;
use std::error::Error;
use std::fmt;
use std::fs;
use std::sync::Arc;
use log::info;

pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a transcript expert. Based on the provided transcript, give the answer to the given prompt.";

pub const DEFAULT_GREETING: &str =
    "I have read the transcript of this video. What would you like to know about it?";

pub const DEFAULT_SUMMARY_PROMPT: &str =
    "You are a YouTube video summarizer. You will be taking the transcript text \
and summarizing the entire video and providing the important summary in points \
within 250 words. Please provide the summary of the text given here: ";

#[derive(Debug)]
pub enum PromptError {
    EmptyTemplate(String),
    IoError(std::io::Error),
    JsonError(serde_json::Error),
}

impl fmt::Display for PromptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromptError::EmptyTemplate(key) => write!(f, "Prompt template '{}' is empty", key),
            PromptError::IoError(e) => write!(f, "Prompt file IO error: {}", e),
            PromptError::JsonError(e) => write!(f, "Prompt JSON parsing error: {}", e),
        }
    }
}

impl Error for PromptError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PromptError::IoError(e) => Some(e),
            PromptError::JsonError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PromptError {
    fn from(err: std::io::Error) -> Self {
        PromptError::IoError(err)
    }
}

impl From<serde_json::Error> for PromptError {
    fn from(err: serde_json::Error) -> Self {
        PromptError::JsonError(err)
    }
}

/// Fixed texts sent to the model. Keys missing from a prompts file keep their defaults.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct PromptConfig {
    pub system_prompt: String,
    pub greeting: String,
    pub summary_prompt: String,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            greeting: DEFAULT_GREETING.to_string(),
            summary_prompt: DEFAULT_SUMMARY_PROMPT.to_string(),
        }
    }
}

impl PromptConfig {
    fn validate(&self) -> Result<(), PromptError> {
        for (key, value) in [
            ("system_prompt", &self.system_prompt),
            ("greeting", &self.greeting),
            ("summary_prompt", &self.summary_prompt),
        ] {
            if value.trim().is_empty() {
                return Err(PromptError::EmptyTemplate(key.to_string()));
            }
        }
        Ok(())
    }

    /// User turn that hands the transcript to the model at the start of a chat.
    pub fn transcript_framing(&self, transcript: &str) -> String {
        format!("Transcript: {}", transcript)
    }

    /// Single-shot user turn carrying both the transcript and the question.
    pub fn question_framing(&self, transcript: &str, question: &str) -> String {
        format!("Transcript: {}\nQuestion: {}", transcript, question)
    }

    pub fn summary_request(&self, transcript: &str) -> String {
        format!("{}{}", self.summary_prompt, transcript)
    }
}

pub fn load_prompts_from_str(json: &str) -> Result<PromptConfig, PromptError> {
    let config: PromptConfig = serde_json::from_str(json)?;
    config.validate()?;
    Ok(config)
}

/// Loads prompts from `path`, or the built-in defaults when no path is configured.
pub fn load_prompts(path: Option<&str>) -> Result<Arc<PromptConfig>, PromptError> {
    match path {
        Some(path) => {
            let file_content = fs::read_to_string(path)?;
            let config = load_prompts_from_str(&file_content)?;
            info!("Loaded prompts from '{}'", path);
            Ok(Arc::new(config))
        }
        None => {
            info!("No prompts file configured, using built-in prompts");
            Ok(Arc::new(PromptConfig::default()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_file_keeps_defaults_for_missing_keys() {
        let config = load_prompts_from_str(r#"{"greeting": "Ask away!"}"#).unwrap();
        assert_eq!(config.greeting, "Ask away!");
        assert_eq!(config.system_prompt, DEFAULT_SYSTEM_PROMPT);
        assert_eq!(config.summary_prompt, DEFAULT_SUMMARY_PROMPT);
    }

    #[test]
    fn empty_template_is_rejected() {
        let err = load_prompts_from_str(r#"{"system_prompt": "   "}"#).unwrap_err();
        assert_eq!(err.to_string(), "Prompt template 'system_prompt' is empty");
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"summary_prompt": "Summarize: "}}"#).unwrap();

        let config = load_prompts(file.path().to_str()).unwrap();
        assert_eq!(config.summary_request("text"), "Summarize: text");
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_prompts(Some("/nonexistent/prompts.json")).unwrap_err();
        assert!(matches!(err, PromptError::IoError(_)));
    }

    #[test]
    fn framings_match_expected_layout() {
        let config = PromptConfig::default();
        assert_eq!(config.transcript_framing("hello world"), "Transcript: hello world");
        assert_eq!(config.question_framing("t", "q"), "Transcript: t\nQuestion: q");
    }
}
