use std::collections::BTreeMap;

use crate::prelude::*;

// A trimmed, crate-owned copy of the GetCostAndUsage response.
// The SDK types are not serde-friendly and can't be built by hand in tests, so the
// client converts into these right after the call and nothing else sees the SDK.
//
// API Reference: https://docs.aws.amazon.com/aws-cost-management/latest/APIReference/API_GetCostAndUsage.html

/// Response for the GetCostAndUsage call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CostAndUsage {
    /// One bucket per granularity step. Monthly over a single month means exactly one.
    pub results_by_time: Vec<ResultByTime>,
}

/// Represents a specific time bucket of cost data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ResultByTime {
    /// Start of the bucket (inclusive), YYYY-MM-DD.
    pub start: String,

    /// End of the bucket (exclusive), YYYY-MM-DD.
    pub end: String,

    /// Whether the numbers are still being finalized by the provider.
    pub estimated: bool,

    /// One entry per value of the group-by dimension, in API order.
    pub groups: Vec<Group>,
}

/// A single group, here a single service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Group {
    /// Values of the group-by keys. Grouping by service only means one key, the service name.
    pub keys: Vec<String>,

    /// Metric name (e.g. "BlendedCost") to its value.
    pub metrics: BTreeMap<String, MetricValue>,
}

/// An amount as reported by the billing API. It's a string on the wire, so it stays one here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MetricValue {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,

    /// Currency, for example "USD".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}
