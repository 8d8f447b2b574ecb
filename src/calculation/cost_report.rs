use crate::chart::{OTHERS_LABEL, OTHERS_THRESHOLD};
use crate::prelude::*;

use super::aggregation::CostSummary;
use super::period::DateRange;

/// A finished report, ready to be rendered as text or CSV.
pub struct CostReport<'a> {
    /// Display name of the account, not necessarily the id.
    pub account: &'a str,
    pub period: &'a DateRange,
    pub summary: &'a CostSummary,
}

impl CostReport<'_> {
    /// Renders the human-readable block that gets posted to the channel.
    ///
    /// Example:
    ///
    /// ```text
    /// *AWS Account: production*
    /// *Start: 2024-02-01, End: 2024-02-29*
    /// *Total Cost: $200.00*
    /// *EC2*: $120.00 (60.0%)
    /// *RDS*: $79.00 (39.5%)
    /// *S3*: $1.00 (0.5%)
    /// Services below 1.0% of the total are grouped as Others in the pie chart.
    /// ```
    pub fn render_text(&self) -> String {
        let header = format!(
            "*AWS Account: {}*\n*Start: {}, End: {}*\n*Total Cost: ${:.2}*\n",
            self.account, self.period.start, self.period.end, self.summary.total
        );

        let lines: String = self
            .summary
            .entries
            .iter()
            .map(|entry| {
                format!(
                    "*{}*: ${:.2} ({:.1}%)\n",
                    entry.name, entry.cost, entry.ratio
                )
            })
            .collect();

        let note = format!(
            "Services below {:.1}% of the total are grouped as {} in the pie chart.",
            OTHERS_THRESHOLD, OTHERS_LABEL
        );

        format!("{header}{lines}{note}")
    }

    /// Renders the entries as headerless `name,cost,ratio` rows, for piping.
    ///
    /// Numbers are left unrounded and without symbols so they sort and sum correctly.
    pub fn render_csv(&self) -> AppResult<String> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false) // I don't want a header.
            .from_writer(vec![]);

        for entry in &self.summary.entries {
            writer
                .serialize(entry)
                .into_diagnostic()
                .wrap_err("Failed to serialize a cost entry to CSV format")?;
        }

        let data = writer
            .into_inner()
            .into_diagnostic()
            .wrap_err("Failed to get writer data.")?;

        let csv_string = String::from_utf8(data)
            .into_diagnostic()
            .wrap_err("Invalid utf-8")?;

        Ok(csv_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::aggregation::CostEntry;
    use jiff::civil::date;

    fn sample_summary() -> CostSummary {
        CostSummary {
            total: 200.0,
            entries: vec![
                CostEntry {
                    name: "EC2".to_owned(),
                    cost: 120.0,
                    ratio: 60.0,
                },
                CostEntry {
                    name: "RDS".to_owned(),
                    cost: 79.0,
                    ratio: 39.5,
                },
                CostEntry {
                    name: "S3".to_owned(),
                    cost: 1.0,
                    ratio: 0.5,
                },
            ],
        }
    }

    fn february() -> DateRange {
        DateRange {
            start: date(2024, 2, 1),
            end: date(2024, 2, 29),
        }
    }

    #[test]
    fn text_has_header_one_line_per_service_and_the_others_note() {
        let summary = sample_summary();
        let period = february();
        let report = CostReport {
            account: "production",
            period: &period,
            summary: &summary,
        };

        let text = report.render_text();

        assert_eq!(
            text,
            "*AWS Account: production*\n\
             *Start: 2024-02-01, End: 2024-02-29*\n\
             *Total Cost: $200.00*\n\
             *EC2*: $120.00 (60.0%)\n\
             *RDS*: $79.00 (39.5%)\n\
             *S3*: $1.00 (0.5%)\n\
             Services below 1.0% of the total are grouped as Others in the pie chart."
        );
    }

    #[test]
    fn text_rounds_cost_to_cents_and_ratio_to_one_decimal() {
        let summary = CostSummary {
            total: 4.04159,
            entries: vec![CostEntry {
                name: "Lambda".to_owned(),
                cost: 4.04159,
                ratio: 99.96,
            }],
        };
        let period = february();
        let report = CostReport {
            account: "dev",
            period: &period,
            summary: &summary,
        };

        let text = report.render_text();

        assert!(text.contains("*Total Cost: $4.04*"));
        assert!(text.contains("*Lambda*: $4.04 (100.0%)"));
    }

    #[test]
    fn csv_rows_keep_ranking_and_raw_numbers() {
        let summary = sample_summary();
        let period = february();
        let report = CostReport {
            account: "production",
            period: &period,
            summary: &summary,
        };

        let csv = report.render_csv().unwrap();

        assert_eq!(csv, "EC2,120.0,60.0\nRDS,79.0,39.5\nS3,1.0,0.5\n");
    }
}
