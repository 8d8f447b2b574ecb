use std::fs;
use std::path::Path;

use crate::app::App;
use crate::calculation::cost_report::CostReport;
use crate::calculation::period::DateRange;
use crate::chart;
use crate::cli::{Cli, Commands, ReportArgs};
use crate::display::SpinnerContainer;
use crate::io::billing::CostSource;
use crate::io::billing::client::CostExplorerClient;
use crate::io::ledger::DeliveryLedger;
use crate::io::slack::client::SlackClient;
use crate::pipeline;
use crate::prelude::*;

/// Runs the command the user asked for, always over the month before `app.today`.
pub fn dispatch(app: &mut App) -> AppResult<()> {
    let App {
        cli,
        display,
        today,
    } = app;

    let period = DateRange::previous_month(*today);

    match &cli.command {
        // cost-report report.
        Commands::Report(args) if args.dry_run => preview(cli, args, display, &period),
        Commands::Report(args) => deliver(cli, args, display, &period),

        // cost-report raw.
        Commands::Raw => raw(cli, display, &period),
    }
}

// private

/// The scheduled path. Settings are all checked before the first network call.
fn deliver(
    cli: &Cli,
    args: &ReportArgs,
    display: &mut SpinnerContainer,
    period: &DateRange,
) -> AppResult<()> {
    let settings = cli.try_settings()?;
    let slack = args.try_slack_settings()?;

    let ledger = match args.dedup {
        true => Some(DeliveryLedger::in_cache_dir()?),
        false => None,
    };

    let already_delivered = match &ledger {
        Some(ledger) => ledger.is_delivered(&settings.account, period)?,
        None => false,
    };

    if already_delivered {
        tracing::info!(
            account = %settings.account,
            start = %period.start,
            "already delivered, skipping"
        );

        display.stop_with_message(&format!(
            "Report for {} ({} to {}) was already delivered.",
            settings.account,
            period.start_string(),
            period.end_string()
        ));

        return Ok(());
    }

    let source = CostExplorerClient::new(&settings.region)?;
    let notifier = SlackClient::new(&slack);

    display.start_unless_no_terminal_or(cli.no_animate, "Reporting");

    let delivered = pipeline::run(
        &settings.account,
        period,
        &source,
        &notifier,
        chart::render_png,
    )?;

    if let Some(ledger) = &ledger {
        ledger.mark_delivered(&settings.account, period)?;
    }

    if let Some(path) = &args.chart_out {
        write_chart(path, &delivered.png)?;
    }

    display.stop_with_message(&format!(
        "Delivered the report for {} ({} to {}), total ${:.2}.",
        settings.account,
        period.start_string(),
        period.end_string(),
        delivered.report.summary.total
    ));

    Ok(())
}

/// Same report, printed instead of posted. No chat settings needed.
fn preview(
    cli: &Cli,
    args: &ReportArgs,
    display: &mut SpinnerContainer,
    period: &DateRange,
) -> AppResult<()> {
    let settings = cli.try_settings()?;
    let source = CostExplorerClient::new(&settings.region)?;

    display.start_unless_no_terminal_or(cli.no_animate, "Retrieving");

    let prepared = pipeline::prepare(&settings.account, period, &source)?;

    if let Some(path) = &args.chart_out {
        write_chart(path, &chart::render_png(&prepared.slices)?)?;
    }

    let output = if cli.unformatted {
        CostReport {
            account: &settings.account,
            period,
            summary: &prepared.summary,
        }
        .render_csv()?
    } else {
        prepared.text
    };

    display.stop_with_message(&output);

    Ok(())
}

fn raw(cli: &Cli, display: &mut SpinnerContainer, period: &DateRange) -> AppResult<()> {
    let source = CostExplorerClient::new(&cli.region)?;

    display.start_unless_no_terminal_or(cli.no_animate, "Retrieving");

    let raw = source.cost_by_service(period)?;

    let json = if cli.unformatted {
        serde_json::to_string(&raw).into_diagnostic()?
    } else {
        serde_json::to_string_pretty(&raw).into_diagnostic()?
    };

    display.stop_with_message(&json);

    Ok(())
}

fn write_chart(path: &Path, png: &[u8]) -> AppResult<()> {
    fs::write(path, png)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to write the chart to {}", path.display()))?;

    tracing::info!(path = %path.display(), "chart written");

    Ok(())
}
