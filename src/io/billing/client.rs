use aws_config::{BehaviorVersion, Region};
use aws_sdk_costexplorer::{Client, Config};
use aws_sdk_costexplorer::error::DisplayErrorContext;
use aws_sdk_costexplorer::operation::get_cost_and_usage::GetCostAndUsageOutput;
use aws_sdk_costexplorer::types::{DateInterval, Granularity, GroupDefinition, GroupDefinitionType};
use tokio::runtime::Runtime;

use crate::calculation::period::DateRange;
use crate::error::Error;
use crate::prelude::*;

use super::dtos::{CostAndUsage, Group, MetricValue, ResultByTime};
use super::{BLENDED_COST, CostSource};

const GROUP_BY_KEY: &str = "SERVICE";

/// Cost Explorer, through the official SDK.
///
/// The SDK is async only. Everything else in here is plain blocking code, so the client carries
/// its own single-threaded runtime and blocks on each call.
pub struct CostExplorerClient {
    runtime: Runtime,
    client: Client,
}

impl CostExplorerClient {
    /// Loads credentials the usual AWS way (env, profile, instance/task role).
    pub fn new(region: &str) -> AppResult<Self> {
        let runtime = runtime()?;

        let config = runtime.block_on(
            aws_config::defaults(BehaviorVersion::latest())
                .region(Region::new(region.to_owned()))
                .load(),
        );

        Ok(CostExplorerClient {
            runtime,
            client: Client::new(&config),
        })
    }

    /// Builds on an already resolved service config, endpoint and credentials included.
    pub fn from_conf(config: Config) -> AppResult<Self> {
        Ok(CostExplorerClient {
            runtime: runtime()?,
            client: Client::from_conf(config),
        })
    }

    fn fetch_page(
        &self,
        time_period: DateInterval,
        next_page: Option<String>,
    ) -> AppResult<GetCostAndUsageOutput> {
        let request = self
            .client
            .get_cost_and_usage()
            .time_period(time_period)
            .granularity(Granularity::Monthly)
            .group_by(
                GroupDefinition::builder()
                    .r#type(GroupDefinitionType::Dimension)
                    .key(GROUP_BY_KEY)
                    .build(),
            )
            .metrics(BLENDED_COST)
            .set_next_page_token(next_page);

        let output = self
            .runtime
            .block_on(request.send())
            .map_err(|e| Error::Api(DisplayErrorContext(&e).to_string()))?;

        Ok(output)
    }
}

impl CostSource for CostExplorerClient {
    /// Follows `NextPageToken` until the API runs out of pages. A service split across pages
    /// shows up once per page here and gets merged during aggregation.
    fn cost_by_service(&self, period: &DateRange) -> AppResult<CostAndUsage> {
        // Cost Explorer wants an exclusive end, our range is inclusive.
        let start = period.start_string();
        let end = period.exclusive_end()?.to_string();

        let time_period = DateInterval::builder()
            .start(&start)
            .end(&end)
            .build()
            .map_err(|e| Error::Api(e.to_string()))?;

        let mut page_number = 1;
        let mut next_page: Option<String> = None;
        let mut collected = CostAndUsage::default();

        loop {
            tracing::debug!(%start, %end, page_number, "calling GetCostAndUsage");

            let output = self.fetch_page(time_period.clone(), next_page.take())?;

            next_page = output.next_page_token().map(str::to_owned);
            collected
                .results_by_time
                .extend(CostAndUsage::from(output).results_by_time);

            if next_page.is_none() {
                break;
            }

            page_number += 1;
        }

        Ok(collected)
    }
}

// private

fn runtime() -> AppResult<Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .into_diagnostic()
        .wrap_err("Failed to start the runtime for the billing client.")
}

/// Plucks what we use out of the SDK types.
impl From<GetCostAndUsageOutput> for CostAndUsage {
    fn from(output: GetCostAndUsageOutput) -> Self {
        let results_by_time = output
            .results_by_time()
            .iter()
            .map(|bucket| {
                let (start, end) = bucket
                    .time_period()
                    .map(|interval| (interval.start().to_owned(), interval.end().to_owned()))
                    .unwrap_or_default();

                let groups = bucket
                    .groups()
                    .iter()
                    .map(|group| Group {
                        keys: group.keys().to_vec(),
                        metrics: group
                            .metrics()
                            .map(|metrics| {
                                metrics
                                    .iter()
                                    .map(|(name, value)| {
                                        let value = MetricValue {
                                            amount: value.amount().map(str::to_owned),
                                            unit: value.unit().map(str::to_owned),
                                        };

                                        (name.clone(), value)
                                    })
                                    .collect()
                            })
                            .unwrap_or_default(),
                    })
                    .collect();

                ResultByTime {
                    start,
                    end,
                    estimated: bucket.estimated(),
                    groups,
                }
            })
            .collect();

        CostAndUsage { results_by_time }
    }
}
