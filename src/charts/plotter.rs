//! Chart Plotter Module
//! Creates interactive visualizations using egui_plot.

use super::series::{EngineDistribution, ScatterSeries};
use crate::data::columns::{ENGINE_SIZE, MAKE};
use egui::ecolor::Hsva;
use egui::epaint::TextShape;
use egui::{Color32, FontId, RichText, Sense};
use egui_plot::{
    BoxElem, BoxPlot, BoxSpread, Legend, MarkerShape, Plot, PlotPoint, PlotPoints, Points,
};

/// Plot area height for every panel
pub const PLOT_HEIGHT: f32 = 360.0;
/// Space under the box plot reserved for the rotated make labels
const LABEL_STRIP_HEIGHT: f32 = 90.0;
const LABEL_FONT_SIZE: f32 = 11.0;

/// Creates the dashboard charts using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Color of the make at `index` among `count` makes, evenly spaced hues.
    pub fn make_color(index: usize, count: usize) -> Color32 {
        let hue = index as f32 / count.max(1) as f32;
        Color32::from(Hsva::new(hue, 0.65, 0.85, 1.0))
    }

    fn color_for(make: &str, make_order: &[String]) -> Color32 {
        let index = make_order.iter().position(|m| m == make).unwrap_or(0);
        Self::make_color(index, make_order.len())
    }

    /// Box plot of engine size per make with outliers as points.
    /// Make labels are drawn below the plot rotated by 90 degrees.
    pub fn draw_engine_boxplot(
        ui: &mut egui::Ui,
        distribution: &EngineDistribution,
        make_order: &[String],
    ) {
        let response = Plot::new("engine_size_boxplot")
            .height(PLOT_HEIGHT)
            .allow_scroll(false)
            .show_axes([false, true])
            .y_axis_label(ENGINE_SIZE)
            .include_x(-0.5)
            .include_x(distribution.boxes.len().max(1) as f64 - 0.5)
            .show(ui, |plot_ui| {
                for (i, make_box) in distribution.boxes.iter().enumerate() {
                    let color = Self::color_for(&make_box.make, make_order);
                    let s = &make_box.summary;

                    let elem = BoxElem::new(
                        i as f64,
                        BoxSpread::new(s.whisker_low, s.q1, s.median, s.q3, s.whisker_high),
                    )
                    .name(&make_box.make)
                    .box_width(0.6)
                    .fill(color.gamma_multiply(0.5))
                    .stroke(egui::Stroke::new(1.2, color));
                    plot_ui.box_plot(BoxPlot::new(vec![elem]).name(&make_box.make));

                    if !s.outliers.is_empty() {
                        let points: PlotPoints =
                            s.outliers.iter().map(|&v| [i as f64, v]).collect();
                        plot_ui.points(
                            Points::new(points)
                                .shape(MarkerShape::Diamond)
                                .radius(3.0)
                                .color(color),
                        );
                    }
                }
            });

        if distribution.is_empty() {
            return;
        }

        // Rotated x-axis labels
        let (strip, _) = ui.allocate_exact_size(
            egui::vec2(ui.available_width(), LABEL_STRIP_HEIGHT),
            Sense::hover(),
        );
        let painter = ui.painter_at(strip);
        let text_color = ui.visuals().text_color();
        let frame = *response.transform.frame();

        for (i, make_box) in distribution.boxes.iter().enumerate() {
            let anchor = response
                .transform
                .position_from_point(&PlotPoint::new(i as f64, 0.0));
            if anchor.x < frame.left() || anchor.x > frame.right() {
                continue;
            }

            let galley = painter.layout_no_wrap(
                make_box.make.clone(),
                FontId::proportional(LABEL_FONT_SIZE),
                text_color,
            );
            let size = galley.size();
            // Rotated by -90 degrees the text runs upward from `pos`
            let pos = egui::pos2(anchor.x - size.y / 2.0, strip.top() + 4.0 + size.x);
            painter.add(
                TextShape::new(pos, galley, text_color).with_angle(-std::f32::consts::FRAC_PI_2),
            );
        }

        ui.vertical_centered(|ui| {
            ui.label(RichText::new(MAKE).size(12.0));
        });
    }

    /// Scatter plot with one colored series per make.
    pub fn draw_scatter(
        ui: &mut egui::Ui,
        id: &str,
        series: &ScatterSeries,
        make_order: &[String],
    ) {
        Plot::new(id)
            .height(PLOT_HEIGHT)
            .allow_scroll(false)
            .legend(Legend::default())
            .x_axis_label(series.x_column.clone())
            .y_axis_label(series.y_column.clone())
            .show(ui, |plot_ui| {
                for group in &series.groups {
                    let color = Self::color_for(&group.make, make_order);
                    let points: PlotPoints = group.points.iter().copied().collect();
                    plot_ui.points(
                        Points::new(points)
                            .shape(MarkerShape::Circle)
                            .filled(true)
                            .radius(3.5)
                            .color(color)
                            .name(&group.make),
                    );
                }
            });
    }
}
