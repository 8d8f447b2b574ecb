use std::time::Duration;

use ureq::Agent;

use crate::config::SlackSettings;
use crate::error::Error;
use crate::prelude::*;

use super::Notifier;
use super::dtos::{
    ApiResponse, CompleteUploadRequest, UploadUrlResponse, UploadedFile, WebhookMessage,
};

const CHART_FILE_NAME: &str = "output.png";
const MESSAGE_HEADER: &str = "*Monthly Report*\n";
const TIMEOUT_IN_SEC: u64 = 30;

/// Posts the text through the incoming webhook and the chart through the Web API.
///
/// Non-2xx answers are errors (ureq's default), and so is any Web API reply with `ok: false`.
pub struct SlackClient {
    agent: Agent,
    webhook_url: String,
    api_token: String,
    channel: String,
    api_base: String,
}

impl SlackClient {
    pub fn new(settings: &SlackSettings) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(TIMEOUT_IN_SEC)))
            .build()
            .into();

        SlackClient {
            agent,
            webhook_url: settings.webhook_url.to_owned(),
            api_token: settings.api_token.to_owned(),
            channel: settings.channel.to_owned(),
            api_base: settings.api_base.to_owned(),
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/{}", self.api_base.trim_end_matches('/'), method)
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.api_token)
    }
}

impl Notifier for SlackClient {
    fn send_text(&self, text: &str) -> AppResult<()> {
        let message = WebhookMessage {
            text: format!("{MESSAGE_HEADER} {text}"),
        };

        self.agent
            .post(&self.webhook_url)
            .header("Content-Type", "application/json")
            .send_json(&message)
            .map_err(|e| Error::delivery("text summary", e))?;

        tracing::info!("text summary posted to the webhook");

        Ok(())
    }

    /// Slack's external upload is three calls: ask for an upload url, push the bytes there,
    /// then complete the upload into the channel.
    fn send_image(&self, png: &[u8]) -> AppResult<()> {
        const TARGET: &str = "chart";

        let length = png.len().to_string();

        let ticket: UploadUrlResponse = self
            .agent
            .post(self.method_url("files.getUploadURLExternal"))
            .header("Authorization", self.bearer())
            .send_form([("filename", CHART_FILE_NAME), ("length", length.as_str())])
            .map_err(|e| Error::delivery(TARGET, e))?
            .body_mut()
            .read_json()
            .map_err(|e| Error::delivery(TARGET, e))?;

        ensure_ok("files.getUploadURLExternal", ticket.ok, ticket.error)?;

        let (Some(upload_url), Some(file_id)) = (ticket.upload_url, ticket.file_id) else {
            return Err(Error::delivery(TARGET, "Slack did not return an upload url").into());
        };

        self.agent
            .post(&upload_url)
            .header("Content-Type", "image/png")
            .send(png)
            .map_err(|e| Error::delivery(TARGET, e))?;

        tracing::debug!(%file_id, bytes = png.len(), "chart bytes uploaded");

        let completion = CompleteUploadRequest {
            files: vec![UploadedFile {
                id: file_id,
                title: CHART_FILE_NAME.to_owned(),
            }],
            channel_id: self.channel.to_owned(),
        };

        let reply: ApiResponse = self
            .agent
            .post(self.method_url("files.completeUploadExternal"))
            .header("Authorization", self.bearer())
            .send_json(&completion)
            .map_err(|e| Error::delivery(TARGET, e))?
            .body_mut()
            .read_json()
            .map_err(|e| Error::delivery(TARGET, e))?;

        ensure_ok("files.completeUploadExternal", reply.ok, reply.error)?;

        tracing::info!(channel = %self.channel, "chart shared to the channel");

        Ok(())
    }
}

// private

/// The Web API answers 200 even when it refuses, the verdict is in the body.
fn ensure_ok(method: &str, ok: bool, error: Option<String>) -> AppResult<()> {
    if ok {
        return Ok(());
    }

    let reason = error.unwrap_or_else(|| "unknown_error".to_owned());

    Err(Error::delivery("chart", format!("{method} answered '{reason}'")).into())
}
