use serde::{ Deserialize, Serialize };

use super::chat::ChatHistory;

#[derive(Deserialize, Debug)]
pub struct SummarizeRequest {
    pub video_url: String,
}

#[derive(Deserialize, Debug)]
pub struct SummaryQuery {
    pub youtube_video_url: String,
}

#[derive(Serialize, Debug)]
pub struct SummaryResponse {
    pub summary: String,
}

#[derive(Serialize, Debug)]
pub struct VideoChatResponse {
    pub response: String,
    pub chat_history: ChatHistory,
}

#[derive(Deserialize, Debug)]
pub struct AskRequest {
    pub youtube_url: String,
    pub question: String,
}

#[derive(Serialize, Debug)]
pub struct AskResponse {
    pub transcript: String,
    pub answer: String,
}

#[derive(Serialize, Debug)]
pub struct ErrorResponse {
    pub detail: String,
}
