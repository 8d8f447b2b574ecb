pub mod client;
pub mod dtos;

use crate::calculation::period::DateRange;
use crate::prelude::*;

use dtos::CostAndUsage;

/// The only metric this report reads. Discounts and reservations spread across usage.
pub const BLENDED_COST: &str = "BlendedCost";

/// Anything that can answer "what did each service cost over this range".
///
/// The production one is [`client::CostExplorerClient`]; tests hand in their own.
pub trait CostSource {
    /// Monthly-granularity cost grouped by service, using [`BLENDED_COST`].
    /// Fails with [`crate::error::Error::Api`] when the provider call fails.
    fn cost_by_service(&self, period: &DateRange) -> AppResult<CostAndUsage>;
}
