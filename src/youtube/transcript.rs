use async_trait::async_trait;
use log::{ info, warn };
use yt_transcript_rs::YouTubeTranscriptApi;

use crate::cli::Args;
use crate::error::VideoChatError;

#[async_trait]
pub trait TranscriptFetcher: Send + Sync {
    /// Returns the full caption text of `video_id`.
    ///
    /// Unavailable videos, disabled captions and missing transcripts all fail with
    /// `TranscriptUnavailable`, carrying the service's reason.
    async fn fetch(&self, video_id: &str) -> Result<String, VideoChatError>;
}

pub struct YouTubeTranscriptFetcher {
    languages: Vec<String>,
}

impl YouTubeTranscriptFetcher {
    pub fn new(languages: Vec<String>) -> Self {
        let languages = if languages.is_empty() { vec!["en".to_string()] } else { languages };
        Self { languages }
    }

    pub fn from_args(args: &Args) -> Self {
        Self::new(args.transcript_language_list())
    }
}

#[async_trait]
impl TranscriptFetcher for YouTubeTranscriptFetcher {
    async fn fetch(&self, video_id: &str) -> Result<String, VideoChatError> {
        let api = YouTubeTranscriptApi::new(None, None, None).map_err(|e|
            VideoChatError::Internal(format!("Failed to create transcript client: {}", e))
        )?;
        let languages: Vec<&str> = self.languages
            .iter()
            .map(String::as_str)
            .collect();

        let fetched = api.fetch_transcript(video_id, &languages, false).await.map_err(|e| {
            warn!("Transcript fetch failed for video {}: {}", video_id, e);
            VideoChatError::TranscriptUnavailable(e.to_string())
        })?;

        let transcript = join_segments(fetched.parts().iter().map(|part| part.text.as_str()));
        info!(
            "Fetched transcript for video {} ({} segments, {} chars)",
            video_id,
            fetched.parts().len(),
            transcript.len()
        );
        Ok(transcript)
    }
}

/// Joins caption segments in order with single spaces.
///
/// Segment text arrives with its caption entities already decoded, so it is
/// joined verbatim.
pub fn join_segments<'a, I>(segments: I) -> String where I: IntoIterator<Item = &'a str> {
    segments.into_iter().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segments_are_joined_in_order_with_single_spaces() {
        assert_eq!(join_segments(["hello", "world"]), "hello world");
        assert_eq!(join_segments(["a", "b", "c"]), "a b c");
        assert_eq!(join_segments(Vec::<&str>::new()), "");
    }

    #[test]
    fn literal_entity_text_is_not_decoded_again() {
        assert_eq!(
            join_segments(["write &lt; in html", "rock & roll"]),
            "write &lt; in html rock & roll"
        );
    }

    #[test]
    fn empty_language_list_defaults_to_english() {
        let fetcher = YouTubeTranscriptFetcher::new(Vec::new());
        assert_eq!(fetcher.languages, vec!["en".to_string()]);
    }
}
