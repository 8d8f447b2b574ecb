use crate::calculation::aggregation::{CostSummary, summarize};
use crate::calculation::cost_report::CostReport;
use crate::calculation::period::DateRange;
use crate::chart::{Slice, slices};
use crate::io::billing::CostSource;
use crate::io::slack::Notifier;
use crate::prelude::*;

/// Everything computed for one period, before anything leaves the process.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedReport {
    pub summary: CostSummary,
    pub text: String,
    pub slices: Vec<Slice>,
}

/// What a delivered run leaves behind.
pub struct Delivered {
    pub report: PreparedReport,
    pub png: Vec<u8>,
}

/// Fetch, aggregate, format, partition. No side effects besides the billing call.
pub fn prepare(
    account: &str,
    period: &DateRange,
    source: &impl CostSource,
) -> AppResult<PreparedReport> {
    tracing::info!(start = %period.start, end = %period.end, "fetching cost by service");

    let raw = source.cost_by_service(period)?;

    let summary = summarize(&raw)?;

    tracing::info!(
        services = summary.entries.len(),
        total = summary.total,
        "aggregated"
    );

    let text = CostReport {
        account,
        period,
        summary: &summary,
    }
    .render_text();

    let slices = slices(&summary.entries);

    Ok(PreparedReport {
        summary,
        text,
        slices,
    })
}

/// The whole job: prepare, render, then post the text and the chart, in that order.
///
/// The chart is rendered before anything is posted, so a drawing failure never leaves a
/// lonely text message behind. A failed chart upload after the text went out is not
/// rolled back, the run just fails.
pub fn run<R>(
    account: &str,
    period: &DateRange,
    source: &impl CostSource,
    notifier: &impl Notifier,
    render: R,
) -> AppResult<Delivered>
where
    R: Fn(&[Slice]) -> AppResult<Vec<u8>>,
{
    let report = prepare(account, period, source)?;

    let png = render(&report.slices)?;

    tracing::info!(slices = report.slices.len(), "chart rendered");

    notifier
        .send_text(&report.text)
        .wrap_err("Text summary was not delivered, nothing was posted.")?;

    notifier
        .send_image(&png)
        .wrap_err("Chart was not delivered, the text summary is already posted.")?;

    Ok(Delivered { report, png })
}
