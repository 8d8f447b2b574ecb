use crate::prelude::*;

// Only the fields we send or read.
//
// API Reference:
// https://api.slack.com/messaging/webhooks
// https://api.slack.com/methods/files.getUploadURLExternal
// https://api.slack.com/methods/files.completeUploadExternal

/// Body of an incoming-webhook post.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebhookMessage {
    pub text: String,
}

/// Response of files.getUploadURLExternal.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UploadUrlResponse {
    pub ok: bool,

    /// Where the file bytes go. Only present when `ok`.
    #[serde(default)]
    pub upload_url: Option<String>,

    /// Id to reference the file when completing. Only present when `ok`.
    #[serde(default)]
    pub file_id: Option<String>,

    /// Slack's error code, e.g. "invalid_auth". Only present when not `ok`.
    #[serde(default)]
    pub error: Option<String>,
}

/// Body of files.completeUploadExternal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompleteUploadRequest {
    pub files: Vec<UploadedFile>,

    /// Channel to share the file into.
    pub channel_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadedFile {
    pub id: String,
    pub title: String,
}

/// The envelope every Web API method answers with.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApiResponse {
    pub ok: bool,

    #[serde(default)]
    pub error: Option<String>,
}
