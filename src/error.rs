use miette::Diagnostic;
use thiserror::Error;

// cost_report::api -> billing provider errors.
// cost_report::parse -> what the billing provider gave us doesn't make sense.
// cost_report::calculation -> numbers we can't do math with.
// cost_report::render -> chart drawing.
// cost_report::delivery -> slack, webhook or upload.
// cost_report::config -> environment, credentials, settings.

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Billing API request failed: {0}")]
    #[diagnostic(
        code(cost_report::api),
        help(
            "Check the AWS credentials of this environment and that it is allowed to call ce:GetCostAndUsage."
        )
    )]
    Api(String),

    #[error("Billing API returned no time bucket for the requested period.")]
    #[diagnostic(code(cost_report::api::empty))]
    EmptyResult,

    #[error("Could not read the amount '{amount}' reported for service '{service}'.")]
    #[diagnostic(
        code(cost_report::parse::amount),
        help("Amounts are expected to be finite decimal strings, like '12.3456'.")
    )]
    InvalidAmount { service: String, amount: String },

    #[error("Service '{service}' has no '{metric}' metric.")]
    #[diagnostic(code(cost_report::parse::metric))]
    MissingMetric { service: String, metric: String },

    #[error("Total cost for the period is {0}, so the share of each service is undefined.")]
    #[diagnostic(
        code(cost_report::calculation::zero_total),
        help("There is nothing to report for an account without spend.")
    )]
    ZeroTotal(f64),

    #[error("Could not render the pie chart: {0}")]
    #[diagnostic(code(cost_report::render))]
    Render(String),

    #[error("Could not deliver the {target}: {message}")]
    #[diagnostic(
        code(cost_report::delivery),
        help("Nothing is retried. Re-run the report once the channel is reachable again.")
    )]
    Delivery {
        target: &'static str,
        message: String,
    },

    #[error("Missing setting '--{flag}'.")]
    #[diagnostic(
        code(cost_report::config::missing),
        help("Pass '--{flag}' or set the {env} environment variable.")
    )]
    MissingSetting {
        flag: &'static str,
        env: &'static str,
    },

    #[error("Could not find a cache directory for the delivery ledger.")]
    #[diagnostic(
        code(cost_report::config::cache_dir),
        help("Run without '--dedup', or set HOME (or XDG_CACHE_HOME) for this environment.")
    )]
    CacheDirNotFound,
}

impl Error {
    pub fn delivery(target: &'static str, message: impl ToString) -> Self {
        Error::Delivery {
            target,
            message: message.to_string(),
        }
    }
}
