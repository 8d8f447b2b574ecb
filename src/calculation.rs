pub mod aggregation;
pub mod cost_report;
pub mod period;
