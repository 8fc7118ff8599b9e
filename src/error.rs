use thiserror::Error;

/// Every way a summarize/chat/ask request can fail.
///
/// The first three kinds are caused by the caller's input, the next two by a
/// collaborator (transcript service, generative model). `Internal` covers the rest.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VideoChatError {
    #[error("Invalid YouTube URL: {0}")]
    InvalidUrl(String),

    #[error("{0}")]
    MissingInput(String),

    #[error("Malformed chat history: {0}")]
    MalformedHistory(String),

    #[error("Error fetching transcript: {0}")]
    TranscriptUnavailable(String),

    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl VideoChatError {
    pub fn kind(&self) -> &'static str {
        match self {
            VideoChatError::InvalidUrl(_) => "InvalidURL",
            VideoChatError::MissingInput(_) => "MissingInput",
            VideoChatError::MalformedHistory(_) => "MalformedHistory",
            VideoChatError::TranscriptUnavailable(_) => "TranscriptUnavailable",
            VideoChatError::GenerationFailed(_) => "GenerationFailed",
            VideoChatError::Internal(_) => "InternalError",
        }
    }

    /// True for failures caused by the request itself rather than a collaborator.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            VideoChatError::InvalidUrl(_) |
                VideoChatError::MissingInput(_) |
                VideoChatError::MalformedHistory(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transcript_failure_keeps_underlying_reason() {
        let err = VideoChatError::TranscriptUnavailable("Subtitles are disabled".into());
        assert_eq!(err.to_string(), "Error fetching transcript: Subtitles are disabled");
        assert_eq!(err.kind(), "TranscriptUnavailable");
        assert!(!err.is_client_error());
    }

    #[test]
    fn input_failures_are_client_errors() {
        assert!(VideoChatError::InvalidUrl("x".into()).is_client_error());
        assert!(VideoChatError::MissingInput("x".into()).is_client_error());
        assert!(VideoChatError::MalformedHistory("x".into()).is_client_error());
        assert!(!VideoChatError::GenerationFailed("x".into()).is_client_error());
        assert!(!VideoChatError::Internal("x".into()).is_client_error());
    }
}
