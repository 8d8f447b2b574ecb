use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{Settings, SlackSettings};
use crate::error::Error;
use crate::prelude::*;

impl Cli {
    /// Convenience constructor to avoid redundant `Parser` imports in main.
    pub fn new() -> Self {
        Cli::parse()
    }

    /// Resolves what every report needs, or tells exactly which setting is missing.
    pub fn try_settings(&self) -> AppResult<Settings> {
        let account = require(&self.account, "account", "AWS_ACCOUNT")?;

        Ok(Settings {
            account,
            region: self.region.to_owned(),
        })
    }
}

impl ReportArgs {
    /// Only asked for when the report is really going out, `--dry-run` runs without them.
    pub fn try_slack_settings(&self) -> AppResult<SlackSettings> {
        Ok(SlackSettings {
            webhook_url: require(&self.slack_endpoint, "slack-endpoint", "SLACK_ENDPOINT")?,
            api_token: require(&self.slack_api_token, "slack-api-token", "SLACK_API_TOKEN")?,
            channel: require(&self.slack_channel, "slack-channel", "SLACK_CHANNEL")?,
            api_base: self.slack_api_base.to_owned(),
        })
    }
}

// Structs

#[derive(Parser, Debug)]
#[command(
    name = "cost-report",
    version,
    about = "Posts last month's cloud cost by service, with a pie chart, to a chat channel."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    //
    // Global args start here..
    //

    //
    /// Skip animations
    #[arg(long, default_value_t = false, global = true)]
    pub no_animate: bool,

    /// No format. CSV rows for `report --dry-run`, compact JSON for `raw`.
    #[arg(long, default_value_t = false, global = true)]
    pub unformatted: bool,

    /// Account name shown in the report header.
    #[arg(long, env = "AWS_ACCOUNT", global = true)]
    pub account: Option<String>,

    /// Region of the billing API. Cost Explorer only answers in us-east-1.
    #[arg(
        long,
        env = "COST_EXPLORER_REGION",
        default_value = "us-east-1",
        global = true
    )]
    pub region: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build last month's report and post it. This is what the scheduler runs.
    Report(ReportArgs),

    /// Print last month's raw cost-by-service result as JSON. Posts nothing.
    Raw,
}

#[derive(clap::Args, Debug, Default)]
pub struct ReportArgs {
    /// Incoming webhook url for the text summary.
    #[arg(long, env = "SLACK_ENDPOINT", hide_env_values = true)]
    pub slack_endpoint: Option<String>,

    /// Bot token used to upload the chart.
    #[arg(long, env = "SLACK_API_TOKEN", hide_env_values = true)]
    pub slack_api_token: Option<String>,

    /// Channel id the chart is shared into.
    #[arg(long, env = "SLACK_CHANNEL")]
    pub slack_channel: Option<String>,

    /// Slack Web API root. Only worth changing for a proxy or a test server.
    #[arg(
        long,
        env = "SLACK_API_BASE",
        default_value = "https://slack.com/api",
        hide = true
    )]
    pub slack_api_base: String,

    /// Print the report instead of posting it.
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    /// Also write the chart to this file.
    #[arg(long, value_name = "PATH")]
    pub chart_out: Option<PathBuf>,

    /// Skip posting if this account and month were already delivered from this machine.
    #[arg(long, default_value_t = false)]
    pub dedup: bool,
}

// private

/// Empty counts as missing, an empty env var is almost always a deployment mistake.
fn require(value: &Option<String>, flag: &'static str, env: &'static str) -> AppResult<String> {
    let value = value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(Error::MissingSetting { flag, env })?;

    Ok(value.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_a_dry_run_with_flags() {
        let cli = Cli::try_parse_from([
            "cost-report",
            "report",
            "--dry-run",
            "--chart-out",
            "chart.png",
            "--account",
            "production",
            "--region",
            "us-east-1",
        ])
        .unwrap();

        let Commands::Report(args) = &cli.command else {
            panic!("expected the report command");
        };

        assert!(args.dry_run);
        assert_eq!(args.chart_out.as_deref(), Some(std::path::Path::new("chart.png")));

        let settings = cli.try_settings().unwrap();
        assert_eq!(settings.account, "production");
        assert_eq!(settings.region, "us-east-1");
    }

    #[test]
    fn slack_settings_come_from_flags() {
        let args = ReportArgs {
            slack_endpoint: Some("https://hooks.slack.com/services/T/B/X".to_owned()),
            slack_api_token: Some("xoxb-1".to_owned()),
            slack_channel: Some(" C123 ".to_owned()),
            slack_api_base: "https://slack.com/api".to_owned(),
            ..Default::default()
        };

        let slack = args.try_slack_settings().unwrap();

        assert_eq!(slack.webhook_url, "https://hooks.slack.com/services/T/B/X");
        assert_eq!(slack.api_token, "xoxb-1");
        assert_eq!(slack.channel, "C123");
        assert_eq!(slack.api_base, "https://slack.com/api");
    }

    #[test]
    fn missing_slack_setting_names_flag_and_env() {
        let args = ReportArgs {
            slack_endpoint: Some("https://hooks.slack.com/services/T/B/X".to_owned()),
            slack_api_token: None,
            slack_channel: Some("C123".to_owned()),
            ..Default::default()
        };

        let error = args.try_slack_settings().unwrap_err();

        assert!(matches!(
            error.downcast_ref::<Error>(),
            Some(Error::MissingSetting {
                flag: "slack-api-token",
                env: "SLACK_API_TOKEN"
            })
        ));
    }

    #[test]
    fn blank_value_counts_as_missing() {
        let error = require(&Some("   ".to_owned()), "account", "AWS_ACCOUNT").unwrap_err();

        assert!(matches!(
            error.downcast_ref::<Error>(),
            Some(Error::MissingSetting { flag: "account", .. })
        ));
    }
}
