//! Static Chart Renderer
//! Draws the dashboard charts off-screen with plotters and saves them as PNG.
//!
//! Layout matches the interactive charts:
//! 1. Bar chart: districts on x (labels rotated), total migrants on y
//! 2. Line chart: year on x, mean exchange rate on y, one marker per year

use crate::charts::ChartPlotter;
use crate::data::MigrantRecord;
use crate::stats::YearlyRate;
use image::RgbImage;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;
use thiserror::Error;
use tracing::info;

const BAR_FILL: RGBColor = RGBColor(52, 152, 219);
const LINE_STROKE: RGBColor = RGBColor(231, 76, 60);
const FONT: &str = "sans-serif";

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Nothing to draw")]
    EmptyChart,
    #[error("Drawing failed: {0}")]
    Draw(String),
    #[error("Failed to write image: {0}")]
    Image(#[from] image::ImageError),
    #[error("Rendered buffer does not match image size")]
    Buffer,
}

fn draw_err<E: std::fmt::Display>(e: E) -> RenderError {
    RenderError::Draw(e.to_string())
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render the top-districts bar chart into an RGB image.
    pub fn render_top_districts(
        top: &[&MigrantRecord],
        top_n: usize,
        width: u32,
        height: u32,
    ) -> Result<RgbImage, RenderError> {
        if top.is_empty() {
            return Err(RenderError::EmptyChart);
        }

        let names: Vec<String> = top.iter().map(|r| r.district.clone()).collect();
        let y_max = top.iter().map(|r| r.total_migrants).max().unwrap_or(0);
        // 10% headroom above the tallest bar
        let y_top = y_max.saturating_add(y_max / 10).max(1);

        let mut buffer = vec![0u8; (width * height * 3) as usize];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            root.fill(&WHITE).map_err(draw_err)?;

            let mut chart = ChartBuilder::on(&root)
                .caption(ChartPlotter::bar_chart_title(top_n), (FONT, 26))
                .margin(20)
                .x_label_area_size(140)
                .y_label_area_size(80)
                .build_cartesian_2d((0..names.len()).into_segmented(), 0u64..y_top)
                .map_err(draw_err)?;

            let label_style = TextStyle::from((FONT, 14).into_font())
                .transform(FontTransform::Rotate90)
                .pos(Pos::new(HPos::Left, VPos::Center));

            chart
                .configure_mesh()
                .disable_x_mesh()
                .x_labels(names.len())
                .x_label_style(label_style)
                .x_label_formatter(&|v| match v {
                    SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => {
                        names.get(*i).cloned().unwrap_or_default()
                    }
                    SegmentValue::Last => String::new(),
                })
                .y_desc("Total migrants")
                .draw()
                .map_err(draw_err)?;

            chart
                .draw_series(
                    Histogram::vertical(&chart)
                        .style(BAR_FILL.filled())
                        .margin(8)
                        .data(top.iter().enumerate().map(|(i, r)| (i, r.total_migrants))),
                )
                .map_err(draw_err)?;

            root.present().map_err(draw_err)?;
        }

        RgbImage::from_raw(width, height, buffer).ok_or(RenderError::Buffer)
    }

    /// Render the exchange-rate line chart into an RGB image.
    pub fn render_exchange_rate(
        series: &[YearlyRate],
        width: u32,
        height: u32,
    ) -> Result<RgbImage, RenderError> {
        if series.is_empty() {
            return Err(RenderError::EmptyChart);
        }

        let (x_min, x_max) = Self::padded_range(series.iter().map(|p| p.year), 0.02, 0.5);
        let (y_min, y_max) = Self::padded_range(series.iter().map(|p| p.mean_value), 0.05, 1.0);

        let mut buffer = vec![0u8; (width * height * 3) as usize];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            root.fill(&WHITE).map_err(draw_err)?;

            let mut chart = ChartBuilder::on(&root)
                .caption(ChartPlotter::RATE_CHART_TITLE, (FONT, 26))
                .margin(20)
                .x_label_area_size(50)
                .y_label_area_size(90)
                .build_cartesian_2d(x_min..x_max, y_min..y_max)
                .map_err(draw_err)?;

            chart
                .configure_mesh()
                .x_desc("Year")
                .y_desc("Value")
                .x_label_formatter(&|x| format!("{:.0}", x))
                .draw()
                .map_err(draw_err)?;

            chart
                .draw_series(LineSeries::new(
                    series.iter().map(|p| (p.year, p.mean_value)),
                    LINE_STROKE.stroke_width(2),
                ))
                .map_err(draw_err)?;

            chart
                .draw_series(
                    series
                        .iter()
                        .map(|p| Circle::new((p.year, p.mean_value), 4, LINE_STROKE.filled())),
                )
                .map_err(draw_err)?;

            root.present().map_err(draw_err)?;
        }

        RgbImage::from_raw(width, height, buffer).ok_or(RenderError::Buffer)
    }

    /// Write a rendered chart to disk; the format follows the file extension.
    pub fn save(image: &RgbImage, path: &Path) -> Result<(), RenderError> {
        image.save(path)?;
        info!(path = %path.display(), "Chart exported");
        Ok(())
    }

    /// Min/max of `values` widened by `fraction` of the span, or by `flat_pad` when all values are equal.
    fn padded_range(values: impl Iterator<Item = f64>, fraction: f64, flat_pad: f64) -> (f64, f64) {
        let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
        let pad = if max > min {
            (max - min) * fraction
        } else {
            flat_pad
        };
        (min - pad, max + pad)
    }
}
