pub mod transcript;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::VideoChatError;

pub use transcript::{ TranscriptFetcher, YouTubeTranscriptFetcher };

// Order matters: the first pattern that matches wins.
static VIDEO_URL_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"^(?:https?://)?(?:www\.)?youtube\.com/watch\?v=([a-zA-Z0-9_-]{11})",
        r"^(?:https?://)?(?:www\.)?youtube\.com/live/([a-zA-Z0-9_-]{11})",
        r"^(?:https?://)?(?:www\.)?youtu\.be/([a-zA-Z0-9_-]{11})",
    ]
        .iter()
        .map(|pattern| Regex::new(pattern).expect("video URL pattern compiles"))
        .collect()
});

/// Pulls the 11-character video id out of a `watch?v=`, `live/` or `youtu.be/` URL.
///
/// Only the start of the string is anchored, so trailing query parameters are
/// fine but anything before the domain is not.
pub fn extract_video_id(url: &str) -> Result<String, VideoChatError> {
    VIDEO_URL_PATTERNS.iter()
        .find_map(|pattern| pattern.captures(url))
        .and_then(|caps| caps.get(1))
        .map(|id| id.as_str().to_string())
        .ok_or_else(|| VideoChatError::InvalidUrl(url.to_string()))
}

/// Resolves `url` to a video id and fetches its transcript.
///
/// A fetch that succeeds but yields no caption text counts as an unavailable transcript.
pub async fn fetch_transcript_for_url(
    fetcher: &dyn TranscriptFetcher,
    url: &str
) -> Result<String, VideoChatError> {
    let video_id = extract_video_id(url)?;
    let transcript = fetcher.fetch(&video_id).await?;
    if transcript.trim().is_empty() {
        return Err(VideoChatError::TranscriptUnavailable("Transcript not found".to_string()));
    }
    Ok(transcript)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    const ID: &str = "dQw4w9WgXcQ";

    #[test]
    fn every_supported_shape_yields_the_same_id() {
        let urls = [
            format!("https://www.youtube.com/watch?v={ID}"),
            format!("http://www.youtube.com/watch?v={ID}"),
            format!("https://youtube.com/watch?v={ID}"),
            format!("www.youtube.com/watch?v={ID}"),
            format!("youtube.com/watch?v={ID}"),
            format!("https://www.youtube.com/live/{ID}"),
            format!("youtube.com/live/{ID}"),
            format!("https://youtu.be/{ID}"),
            format!("http://www.youtu.be/{ID}"),
            format!("youtu.be/{ID}"),
        ];
        for url in urls {
            assert_eq!(extract_video_id(&url).as_deref(), Ok(ID), "url: {url}");
        }
    }

    #[test]
    fn trailing_content_is_ignored() {
        let url = format!("https://www.youtube.com/watch?v={ID}&t=42s&list=PL123");
        assert_eq!(extract_video_id(&url).unwrap(), ID);
        let url = format!("https://youtu.be/{ID}?si=abc");
        assert_eq!(extract_video_id(&url).unwrap(), ID);
    }

    #[test]
    fn leading_content_is_rejected() {
        let url = format!("see https://youtu.be/{ID}");
        assert_eq!(
            extract_video_id(&url),
            Err(VideoChatError::InvalidUrl(url.clone()))
        );
    }

    #[test]
    fn unsupported_urls_are_rejected() {
        for url in [
            "",
            "https://www.youtube.com/watch?v=",
            "https://www.youtube.com/watch?v=short",
            "https://vimeo.com/watch?v=dQw4w9WgXcQ",
            "https://www.youtube.com/embed/dQw4w9WgXcQ",
            "https://www.youtube.com/watch?list=PL123&v=dQw4w9WgXcQ",
        ] {
            let err = extract_video_id(url).unwrap_err();
            assert_eq!(err.kind(), "InvalidURL", "url: {url}");
        }
    }

    struct FixedFetcher(&'static str);

    #[async_trait]
    impl TranscriptFetcher for FixedFetcher {
        async fn fetch(&self, _video_id: &str) -> Result<String, VideoChatError> {
            Ok(self.0.to_string())
        }
    }

    #[tokio::test]
    async fn blank_transcript_counts_as_unavailable() {
        let err = fetch_transcript_for_url(&FixedFetcher("  "), "https://youtu.be/abcdefghijk")
            .await
            .unwrap_err();
        assert_eq!(err, VideoChatError::TranscriptUnavailable("Transcript not found".into()));
    }

    #[tokio::test]
    async fn invalid_url_fails_before_fetching() {
        let err = fetch_transcript_for_url(&FixedFetcher("text"), "https://example.com").await
            .unwrap_err();
        assert_eq!(err.kind(), "InvalidURL");
    }
}
