use itertools::Itertools;

use crate::error::Error;
use crate::io::billing::BLENDED_COST;
use crate::io::billing::dtos::{CostAndUsage, Group};
use crate::prelude::*;

/// One service's line in the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostEntry {
    /// Service name as the billing API reports it, unique within a report.
    pub name: String,

    /// Amount in the account currency.
    pub cost: f64,

    /// Share of the period total, 0 to 100.
    pub ratio: f64,
}

/// Everything the formatter and the chart need.
#[derive(Debug, Clone, PartialEq)]
pub struct CostSummary {
    pub total: f64,

    /// Highest cost first. Equal costs keep the API order.
    pub entries: Vec<CostEntry>,
}

/// Turns the grouped billing result into a ranked list of services with their shares.
///
/// 1. Pluck `(service, amount)` out of every bucket, in API order.
/// 2. Parse the amounts. Anything that isn't a finite number is an error, not a zero.
/// 3. Merge repeated services into their first appearance.
/// 4. Total, then ratio per service. A total that isn't above zero is an error.
/// 5. Sort descending by cost, stable.
pub fn summarize(report: &CostAndUsage) -> AppResult<CostSummary> {
    if report.results_by_time.is_empty() {
        return Err(Error::EmptyResult.into());
    }

    let amounts = report
        .results_by_time
        .iter()
        .flat_map(|bucket| bucket.groups.iter())
        .map(parse_group)
        .collect::<AppResult<Vec<(String, f64)>>>()?;

    let merged = merge_repeated(amounts);

    let total: f64 = merged.iter().map(|(_, cost)| cost).sum();

    if total.is_nan() || total <= 0.0 {
        return Err(Error::ZeroTotal(total).into());
    }

    let entries = merged
        .into_iter()
        .map(|(name, cost)| CostEntry {
            ratio: cost / total * 100.0,
            name,
            cost,
        })
        // Itertools' sorted_by is a stable sort, ties keep their API order.
        .sorted_by(|a, b| b.cost.total_cmp(&a.cost))
        .collect();

    Ok(CostSummary { total, entries })
}

// private

fn parse_group(group: &Group) -> AppResult<(String, f64)> {
    let service = group
        .keys
        .first()
        .cloned()
        .unwrap_or_else(|| "Unknown".to_owned());

    let Some(amount) = group
        .metrics
        .get(BLENDED_COST)
        .and_then(|metric| metric.amount.as_deref())
    else {
        return Err(Error::MissingMetric {
            service,
            metric: BLENDED_COST.to_owned(),
        }
        .into());
    };

    let cost = amount
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|cost| cost.is_finite())
        .ok_or_else(|| Error::InvalidAmount {
            service: service.clone(),
            amount: amount.to_owned(),
        })?;

    Ok((service, cost))
}

/// Keeps names unique. Lists are a few dozen services long, a linear scan is fine.
fn merge_repeated(amounts: Vec<(String, f64)>) -> Vec<(String, f64)> {
    amounts
        .into_iter()
        .fold(Vec::new(), |mut merged: Vec<(String, f64)>, (name, cost)| {
            match merged.iter_mut().find(|(seen, _)| *seen == name) {
                Some((_, existing)) => *existing += cost,
                None => merged.push((name, cost)),
            }

            merged
        })
}
