//! Static Chart Renderer
//! Renders the three dashboard charts to PNG files with plotters.
//!
//! Output files:
//! 1. `engine_size_by_make.png` - box plot, make labels rotated 90 degrees
//! 2. `fuel_consumption.png` - engine size vs. selected fuel consumption
//! 3. `carbon_emissions.png` - selected fuel consumption vs. CO2 emissions

use super::plotter::ChartPlotter;
use super::series::{EngineDistribution, ScatterSeries};
use crate::data::columns::{ENGINE_SIZE, MAKE};
use crate::stats::{BoxSummary, StatsCalculator};
use image::RgbImage;
use plotters::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CHART_WIDTH: u32 = 1400;
pub const CHART_HEIGHT: u32 = 840;

pub const BOXPLOT_FILE: &str = "engine_size_by_make.png";
pub const CONSUMPTION_FILE: &str = "fuel_consumption.png";
pub const EMISSION_FILE: &str = "carbon_emissions.png";

const FONT: &str = "sans-serif";

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Drawing failed: {0}")]
    Draw(String),
    #[error("Image buffer has the wrong size")]
    Buffer,
    #[error("Failed to write image: {0}")]
    Image(#[from] image::ImageError),
    #[error("Failed to create output folder: {0}")]
    Io(#[from] std::io::Error),
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for RenderError {
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        RenderError::Draw(err.to_string())
    }
}

/// Chart panels in export order.
pub struct ExportCharts<'a> {
    pub distribution: &'a EngineDistribution,
    pub consumption: &'a ScatterSeries,
    pub emission: &'a ScatterSeries,
    pub make_order: &'a [String],
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render all three charts into `dir`, returning the written paths.
    pub fn export_all(dir: &Path, charts: &ExportCharts<'_>) -> Result<Vec<PathBuf>, RenderError> {
        std::fs::create_dir_all(dir)?;

        let rendered = [
            (
                BOXPLOT_FILE,
                Self::render_engine_boxplot(
                    charts.distribution,
                    charts.make_order,
                    CHART_WIDTH,
                    CHART_HEIGHT,
                )?,
            ),
            (
                CONSUMPTION_FILE,
                Self::render_scatter(
                    charts.consumption,
                    "Analysis of Fuel Consumption",
                    charts.make_order,
                    CHART_WIDTH,
                    CHART_HEIGHT,
                )?,
            ),
            (
                EMISSION_FILE,
                Self::render_scatter(
                    charts.emission,
                    "Analysis of Carbon Emissions",
                    charts.make_order,
                    CHART_WIDTH,
                    CHART_HEIGHT,
                )?,
            ),
        ];

        let mut written = Vec::with_capacity(rendered.len());
        for (name, image) in rendered {
            let path = dir.join(name);
            image.save(&path)?;
            log::info!("Wrote {}", path.display());
            written.push(path);
        }
        Ok(written)
    }

    pub fn render_engine_boxplot(
        distribution: &EngineDistribution,
        make_order: &[String],
        width: u32,
        height: u32,
    ) -> Result<RgbImage, RenderError> {
        let mut buffer = vec![0u8; (width * height * 3) as usize];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            root.fill(&WHITE)?;

            let n = distribution.boxes.len().max(1);
            let (y_min, y_max) = padded_range(distribution.value_range());
            let labels = distribution.makes();

            // Box `i` is centered on x = i
            let mut chart = ChartBuilder::on(&root)
                .caption("Analysis of Engine Sizes", (FONT, 26))
                .margin(15)
                .x_label_area_size(120)
                .y_label_area_size(60)
                .build_cartesian_2d(-0.5..n as f64 - 0.5, y_min..y_max)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .x_labels(n)
                .x_label_formatter(&|v| make_label(&labels, *v))
                .x_label_style((FONT, 13).into_font().transform(FontTransform::Rotate90))
                .x_desc(MAKE)
                .y_desc(ENGINE_SIZE)
                .draw()?;

            for (i, make_box) in distribution.boxes.iter().enumerate() {
                let color = plot_color(&make_box.make, make_order);
                let shapes = BoxShapes::new(i, &make_box.summary);

                chart.draw_series(std::iter::once(Rectangle::new(
                    shapes.body,
                    color.mix(0.5).filled(),
                )))?;
                chart.draw_series(std::iter::once(Rectangle::new(
                    shapes.body,
                    color.stroke_width(2),
                )))?;
                chart.draw_series(
                    shapes
                        .lines()
                        .into_iter()
                        .map(|line| PathElement::new(line.to_vec(), color.stroke_width(2))),
                )?;
                chart.draw_series(make_box.summary.outliers.iter().map(move |&v| {
                    Circle::new((i as f64, v), 3, color.filled())
                }))?;
            }

            root.present()?;
        }

        RgbImage::from_raw(width, height, buffer).ok_or(RenderError::Buffer)
    }

    pub fn render_scatter(
        series: &ScatterSeries,
        title: &str,
        make_order: &[String],
        width: u32,
        height: u32,
    ) -> Result<RgbImage, RenderError> {
        let mut buffer = vec![0u8; (width * height * 3) as usize];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            root.fill(&WHITE)?;

            let points: Vec<[f64; 2]> =
                series.groups.iter().flat_map(|g| g.points.iter().copied()).collect();
            let xs: Vec<f64> = points.iter().map(|p| p[0]).collect();
            let ys: Vec<f64> = points.iter().map(|p| p[1]).collect();
            let (x_min, x_max) = padded_range(StatsCalculator::value_range(&xs));
            let (y_min, y_max) = padded_range(StatsCalculator::value_range(&ys));

            let mut chart = ChartBuilder::on(&root)
                .caption(title, (FONT, 26))
                .margin(15)
                .x_label_area_size(50)
                .y_label_area_size(60)
                .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

            chart
                .configure_mesh()
                .x_desc(series.x_column.as_str())
                .y_desc(series.y_column.as_str())
                .draw()?;

            for group in &series.groups {
                let color = plot_color(&group.make, make_order);
                chart
                    .draw_series(
                        group
                            .points
                            .iter()
                            .map(move |p| Circle::new((p[0], p[1]), 4, color.filled())),
                    )?
                    .label(group.make.as_str())
                    .legend(move |(x, y)| Circle::new((x, y), 4, color.filled()));
            }

            if !series.is_empty() {
                chart
                    .configure_series_labels()
                    .position(SeriesLabelPosition::UpperLeft)
                    .background_style(WHITE.mix(0.85))
                    .border_style(BLACK)
                    .draw()?;
            }

            root.present()?;
        }

        RgbImage::from_raw(width, height, buffer).ok_or(RenderError::Buffer)
    }
}

/// Half the width of an exported box, in x-axis units.
const BOX_HALF_WIDTH: f64 = 0.3;
/// Half the width of a whisker cap.
const CAP_HALF_WIDTH: f64 = 0.15;

/// Chart-space geometry of one exported box, taken from its [`BoxSummary`]
/// so whiskers stop at the outermost data point inside the fences.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxShapes {
    /// Opposite corners of the q1..q3 rectangle.
    pub body: [(f64, f64); 2],
    pub median: [(f64, f64); 2],
    pub lower_whisker: [(f64, f64); 2],
    pub upper_whisker: [(f64, f64); 2],
    pub lower_cap: [(f64, f64); 2],
    pub upper_cap: [(f64, f64); 2],
}

impl BoxShapes {
    pub fn new(index: usize, summary: &BoxSummary) -> Self {
        let x = index as f64;
        let hline = |y: f64, half: f64| [(x - half, y), (x + half, y)];
        Self {
            body: [(x - BOX_HALF_WIDTH, summary.q1), (x + BOX_HALF_WIDTH, summary.q3)],
            median: hline(summary.median, BOX_HALF_WIDTH),
            lower_whisker: [(x, summary.q1), (x, summary.whisker_low)],
            upper_whisker: [(x, summary.q3), (x, summary.whisker_high)],
            lower_cap: hline(summary.whisker_low, CAP_HALF_WIDTH),
            upper_cap: hline(summary.whisker_high, CAP_HALF_WIDTH),
        }
    }

    /// Median, whiskers and caps as line segments.
    pub fn lines(&self) -> [[(f64, f64); 2]; 5] {
        [
            self.median,
            self.lower_whisker,
            self.upper_whisker,
            self.lower_cap,
            self.upper_cap,
        ]
    }
}

/// Make name for an x tick sitting on a box center; other ticks stay blank.
fn make_label(labels: &[String], x: f64) -> String {
    let nearest = x.round();
    if (x - nearest).abs() > 1e-6 || nearest < 0.0 {
        return String::new();
    }
    labels.get(nearest as usize).cloned().unwrap_or_default()
}

/// Same hue as the interactive chart for this make.
fn plot_color(make: &str, make_order: &[String]) -> RGBColor {
    let index = make_order.iter().position(|m| m == make).unwrap_or(0);
    let c = ChartPlotter::make_color(index, make_order.len());
    RGBColor(c.r(), c.g(), c.b())
}

/// Axis range with 5% padding; a flat or missing range gets a unit window.
pub fn padded_range(range: Option<(f64, f64)>) -> (f64, f64) {
    match range {
        Some((min, max)) if max > min => {
            let pad = (max - min) * 0.05;
            (min - pad, max + pad)
        }
        Some((value, _)) => (value - 0.5, value + 0.5),
        None => (0.0, 1.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::DashboardCharts;
    use crate::config::BoundMode;
    use crate::data::{FilterState, FuelColumn, ViewBuilder};
    use crate::test_support::sample_dataset;

    #[test]
    fn padded_range_widens_data_extent() {
        let (lo, hi) = padded_range(Some((0.0, 10.0)));
        assert_eq!((lo, hi), (-0.5, 10.5));
    }

    #[test]
    fn padded_range_handles_degenerate_input() {
        assert_eq!(padded_range(Some((2.0, 2.0))), (1.5, 2.5));
        assert_eq!(padded_range(None), (0.0, 1.0));
    }

    #[test]
    fn plot_color_matches_interactive_palette() {
        let order = vec!["ACURA".to_string(), "BMW".to_string()];
        let egui_color = ChartPlotter::make_color(1, 2);
        let color = plot_color("BMW", &order);
        assert_eq!((color.0, color.1, color.2), (egui_color.r(), egui_color.g(), egui_color.b()));
    }

    fn assert_inside(line: &[(f64, f64)], lo: f64, hi: f64) {
        for &(_, y) in line {
            assert!(lo <= y && y <= hi, "{y} outside {lo}..{hi}");
        }
    }

    #[test]
    fn whiskers_stop_at_outermost_points_inside_fences() {
        let values = [1.0, 2.0, 2.0, 3.0, 3.0, 3.0, 4.0, 30.0];
        let summary = StatsCalculator::box_summary(&values).unwrap();
        let shapes = BoxShapes::new(2, &summary);

        assert_eq!(shapes.lower_whisker, [(2.0, 2.0), (2.0, 1.0)]);
        assert_eq!(shapes.upper_whisker, [(2.0, 3.25), (2.0, 4.0)]);
        assert_eq!(shapes.body, [(1.7, 2.0), (2.3, 3.25)]);
        assert_eq!(shapes.median, [(1.7, 3.0), (2.3, 3.0)]);
        for line in shapes.lines() {
            assert_inside(&line, 1.0, 4.0);
        }
    }

    #[test]
    fn tight_boxes_stay_inside_the_plotted_range() {
        let values = [2.0, 2.1, 2.2, 2.3];
        let summary = StatsCalculator::box_summary(&values).unwrap();
        let shapes = BoxShapes::new(0, &summary);
        let (y_min, y_max) = padded_range(StatsCalculator::value_range(&values));

        for line in shapes.lines() {
            assert_inside(&line, 2.0, 2.3);
            assert_inside(&line, y_min, y_max);
        }
        assert_inside(&shapes.body, 2.0, 2.3);
    }

    #[test]
    fn tick_labels_only_on_box_centers() {
        let labels = vec!["AUDI".to_string(), "BMW".to_string()];
        assert_eq!(make_label(&labels, 0.0), "AUDI");
        assert_eq!(make_label(&labels, 1.0), "BMW");
        assert_eq!(make_label(&labels, 0.5), "");
        assert_eq!(make_label(&labels, -1.0), "");
        assert_eq!(make_label(&labels, 2.0), "");
    }

    fn sample_charts(classes: &[&str]) -> DashboardCharts {
        let dataset = sample_dataset();
        let filters = FilterState::new(classes.iter().map(|c| c.to_string()), (0.0, 10.0));
        let view = ViewBuilder::build(&dataset, &filters, BoundMode::Exclusive).unwrap();
        DashboardCharts::build(&view, FuelColumn::City, FuelColumn::Comb).unwrap()
    }

    fn export(charts: &DashboardCharts, dir: &Path) -> Vec<PathBuf> {
        StaticChartRenderer::export_all(
            dir,
            &ExportCharts {
                distribution: &charts.distribution,
                consumption: &charts.consumption,
                emission: &charts.emission,
                make_order: &charts.make_order,
            },
        )
        .unwrap()
    }

    #[test]
    #[ignore = "needs a system sans-serif font"]
    fn exports_three_pngs_for_sample_view() {
        let dir = tempfile::tempdir().unwrap();
        let charts = sample_charts(&["TWO-SEATER", "COMPACT", "SUV - SMALL"]);
        let written = export(&charts, dir.path());

        assert_eq!(written.len(), 3);
        for path in &written {
            let image = image::open(path).unwrap();
            assert_eq!((image.width(), image.height()), (CHART_WIDTH, CHART_HEIGHT));
        }
    }

    #[test]
    #[ignore = "needs a system sans-serif font"]
    fn exports_empty_view_without_error() {
        let dir = tempfile::tempdir().unwrap();
        let charts = sample_charts(&[]);
        let written = export(&charts, dir.path());

        let names: Vec<_> = written
            .iter()
            .filter_map(|p| p.file_name()?.to_str())
            .collect();
        assert_eq!(names, vec![BOXPLOT_FILE, CONSUMPTION_FILE, EMISSION_FILE]);
    }

    #[test]
    fn export_file_names_are_distinct() {
        assert_ne!(BOXPLOT_FILE, CONSUMPTION_FILE);
        assert_ne!(CONSUMPTION_FILE, EMISSION_FILE);
        assert!(BOXPLOT_FILE.ends_with(".png"));
    }
}
