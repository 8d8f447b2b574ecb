use std::fmt::Display;
use std::io::Cursor;

use plotters::prelude::*;

use crate::calculation::aggregation::CostEntry;
use crate::error::Error;
use crate::prelude::*;

/// Services whose share is below this percentage are folded into one slice.
pub const OTHERS_THRESHOLD: f64 = 1.0;
pub const OTHERS_LABEL: &str = "Others";

/// Width and height, in pixels.
pub const CHART_SIZE: (u32, u32) = (512, 512);

const RADIUS: f64 = 160.0;

// Cycled when there are more slices than colors.
const PALETTE: [RGBColor; 10] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
    RGBColor(188, 189, 34),
    RGBColor(23, 190, 207),
];

#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub label: String,
    pub value: f64,
}

/// Splits the ranked entries into chart slices.
///
/// Entries at or above [`OTHERS_THRESHOLD`] keep their own slice, in ranking order.
/// Everything below is summed into a trailing [`OTHERS_LABEL`] slice, which is there even when
/// nothing fell below the threshold.
pub fn slices(entries: &[CostEntry]) -> Vec<Slice> {
    let (major, minor): (Vec<&CostEntry>, Vec<&CostEntry>) = entries
        .iter()
        .partition(|entry| entry.ratio >= OTHERS_THRESHOLD);

    let others = Slice {
        label: OTHERS_LABEL.to_owned(),
        value: minor.iter().map(|entry| entry.cost).sum(),
    };

    major
        .into_iter()
        .map(|entry| Slice {
            label: entry.name.clone(),
            value: entry.cost,
        })
        .chain(std::iter::once(others))
        .collect()
}

/// Draws the slices as a pie chart and returns it as PNG bytes.
pub fn render_png(slices: &[Slice]) -> AppResult<Vec<u8>> {
    // Credits can make a value negative, a pie can't show that.
    let sizes: Vec<f64> = slices.iter().map(|slice| slice.value.max(0.0)).collect();

    if sizes.iter().sum::<f64>() <= 0.0 {
        return Err(Error::Render("there is nothing to draw".to_owned()).into());
    }

    let labels: Vec<&str> = slices.iter().map(|slice| slice.label.as_str()).collect();
    let colors: Vec<RGBColor> = PALETTE.iter().copied().cycle().take(slices.len()).collect();

    let (width, height) = CHART_SIZE;
    let mut pixels = vec![0u8; (width * height * 3) as usize];

    // The backend borrows the buffer until it's dropped at the end of this block.
    {
        let root = BitMapBackend::with_buffer(&mut pixels, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(render_error)?;

        let center = (width as i32 / 2, height as i32 / 2);
        let mut pie = Pie::new(&center, &RADIUS, &sizes, &colors, &labels);
        pie.start_angle(-90.0);
        pie.label_style(("sans-serif", 14).into_font().color(&BLACK));
        pie.percentages(("sans-serif", 12).into_font().color(&WHITE));

        root.draw(&pie).map_err(render_error)?;
        root.present().map_err(render_error)?;
    }

    let image = image::RgbImage::from_raw(width, height, pixels)
        .ok_or_else(|| Error::Render("pixel buffer does not match the chart size".to_owned()))?;

    let mut png = Cursor::new(Vec::new());
    image
        .write_to(&mut png, image::ImageFormat::Png)
        .map_err(render_error)?;

    tracing::debug!(slices = slices.len(), bytes = png.get_ref().len(), "rendered pie chart");

    Ok(png.into_inner())
}

// private

fn render_error(error: impl Display) -> Error {
    Error::Render(error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, cost: f64, ratio: f64) -> CostEntry {
        CostEntry {
            name: name.to_owned(),
            cost,
            ratio,
        }
    }

    #[test]
    fn minor_services_collapse_into_others() {
        let entries = [
            entry("EC2", 120.0, 60.0),
            entry("RDS", 79.0, 39.5),
            entry("S3", 1.0, 0.5),
        ];

        let slices = slices(&entries);

        assert_eq!(
            slices,
            vec![
                Slice {
                    label: "EC2".to_owned(),
                    value: 120.0
                },
                Slice {
                    label: "RDS".to_owned(),
                    value: 79.0
                },
                Slice {
                    label: "Others".to_owned(),
                    value: 1.0
                },
            ]
        );
    }

    #[test]
    fn threshold_is_inclusive() {
        let entries = [entry("EC2", 99.0, 99.0), entry("S3", 1.0, 1.0)];

        let labels: Vec<String> = slices(&entries).into_iter().map(|s| s.label).collect();

        assert_eq!(labels, ["EC2", "S3", "Others"]);
    }

    #[test]
    fn others_sums_every_minor_entry() {
        let entries = [
            entry("EC2", 970.0, 97.0),
            entry("S3", 9.0, 0.9),
            entry("SNS", 8.0, 0.8),
            entry("SQS", 7.0, 0.7),
            entry("KMS", 6.0, 0.6),
        ];

        let slices = slices(&entries);

        assert_eq!(slices.len(), 2);
        assert_eq!(slices[1].label, OTHERS_LABEL);
        assert!((slices[1].value - 30.0).abs() < 1e-9);
    }

    #[test]
    fn others_is_present_even_when_empty() {
        let entries = [entry("EC2", 100.0, 100.0)];

        let slices = slices(&entries);

        assert_eq!(slices.last().unwrap().label, OTHERS_LABEL);
        assert_eq!(slices.last().unwrap().value, 0.0);
    }

    #[test]
    fn nothing_to_draw_is_a_render_error() {
        let error = render_png(&slices(&[])).unwrap_err();

        assert!(matches!(error.downcast_ref::<Error>(), Some(Error::Render(_))));
    }

    #[test]
    #[ignore = "needs a system sans-serif font for the labels"]
    fn renders_a_png_of_the_expected_size() {
        let entries = [entry("EC2", 120.0, 60.0), entry("RDS", 80.0, 40.0)];

        let png = render_png(&slices(&entries)).unwrap();

        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");

        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), CHART_SIZE);
    }
}
