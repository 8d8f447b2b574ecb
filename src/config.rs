// Everything the program reads from the outside world, resolved once in `Cli` and handed
// down by reference from there. Nothing below main reads the environment on its own.

/// Needed by every command.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Display name for the report header.
    pub account: String,

    /// Region of the billing API endpoint.
    pub region: String,
}

/// Needed only when the report is actually delivered.
#[derive(Clone, PartialEq)]
pub struct SlackSettings {
    /// Incoming webhook for the text summary.
    pub webhook_url: String,

    /// Bot token used for the file upload.
    pub api_token: String,

    /// Channel id the chart gets shared into.
    pub channel: String,

    /// Web API root, "https://slack.com/api" unless pointed elsewhere.
    pub api_base: String,
}

// Hand-written so the token never ends up in a log line.
impl std::fmt::Debug for SlackSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlackSettings")
            .field("webhook_url", &"<redacted>")
            .field("api_token", &"<redacted>")
            .field("channel", &self.channel)
            .field("api_base", &self.api_base)
            .finish()
    }
}
