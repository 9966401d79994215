use image::Rgb;
use palette::{IntoColor, Lab, Mix, Srgb};

use crate::stats::LinearFit;

use super::axes::{self, Axes, PlotArea, padded_domain};
use super::canvas::{Canvas, blend};
use super::font::{text_height, text_width};
use super::{BLACK, Chart, DARK_GRAY, RenderError, STEEL_BLUE, TAB_BLUE, TAB_RED, WHITE};

const COOLWARM_LOW: Rgb<u8> = Rgb([59, 76, 192]);
const COOLWARM_MID: Rgb<u8> = Rgb([221, 221, 221]);
const COOLWARM_HIGH: Rgb<u8> = Rgb([180, 4, 38]);
const NAN_GRAY: Rgb<u8> = Rgb([200, 200, 200]);

/// Scatter of paired observations with an optional fitted line and a
/// boxed annotation in the top-left corner.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<(f64, f64)>,
    pub trend: Option<LinearFit>,
    pub annotation: Option<String>,
}

impl Chart for ScatterChart {
    fn kind(&self) -> &'static str {
        "scatter"
    }

    fn render(&self) -> Result<Canvas, RenderError> {
        if self.points.is_empty() {
            return Err(RenderError::EmptyChart(self.kind()));
        }
        let mut canvas = Canvas::new(1000, 600, WHITE);
        let area = PlotArea {
            left: 110,
            top: 70,
            width: 840,
            height: 440,
        };

        let (x_min, x_max) = min_max(self.points.iter().map(|point| point.0));
        let (mut y_min, mut y_max) = min_max(self.points.iter().map(|point| point.1));
        if let Some(fit) = self.trend {
            for y in [fit.predict(x_min), fit.predict(x_max)] {
                y_min = y_min.min(y);
                y_max = y_max.max(y);
            }
        }
        let axes = Axes::new(
            area,
            padded_domain(x_min, x_max, 0.05),
            padded_domain(y_min, y_max, 0.05),
        );

        axes.draw_y_ticks(&mut canvas, 6);
        axes.draw_x_ticks(&mut canvas, 8);
        for &(x, y) in &self.points {
            let (px, py) = axes.to_pixel(x, y);
            canvas.fill_circle(px, py, 5, TAB_BLUE, 0.7);
        }
        if let Some(fit) = self.trend {
            let start = axes.to_pixel(x_min, fit.predict(x_min));
            let end = axes.to_pixel(x_max, fit.predict(x_max));
            canvas.dashed_line(start, end, blend(WHITE, TAB_RED, 0.8), 2, 10, 6);
        }
        axes.draw_frame(&mut canvas);

        if let Some(text) = &self.annotation {
            let scale = 2;
            let pad = 8;
            let width = text_width(text, scale) + 2 * pad;
            let height = text_height(scale) + 2 * pad;
            let x = area.left + (f64::from(area.width) * 0.05) as i32;
            let y = area.top + (f64::from(area.height) * 0.05) as i32;
            canvas.blend_rect(x, y, width, height, WHITE, 0.8);
            canvas.stroke_rect(x, y, width, height, DARK_GRAY);
            canvas.text(x + pad as i32, y + pad as i32, text, scale, BLACK);
        }

        axes::draw_title(&mut canvas, &self.title);
        axes::draw_x_label(&mut canvas, &area, &self.x_label, 40);
        axes::draw_y_label(&mut canvas, &area, &self.y_label, 75);
        Ok(canvas)
    }
}

/// Annotated square grid of values in `[-1, 1]` with a colorbar.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapChart {
    pub title: String,
    pub labels: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

impl Chart for HeatmapChart {
    fn kind(&self) -> &'static str {
        "heatmap"
    }

    fn render(&self) -> Result<Canvas, RenderError> {
        let n = self.labels.len();
        if n == 0 || self.values.len() != n || self.values.iter().any(|row| row.len() != n) {
            return Err(RenderError::EmptyChart(self.kind()));
        }
        let mut canvas = Canvas::new(1000, 600, WHITE);
        let grid_size: u32 = 440;
        let cell = grid_size / n as u32;
        let grid = grid_size - grid_size % n as u32;
        let left = (1000 - grid as i32) / 2 - 40;
        let top = 80;

        for (row, values) in self.values.iter().enumerate() {
            for (col, &value) in values.iter().enumerate() {
                let x = left + (col as u32 * cell) as i32;
                let y = top + (row as u32 * cell) as i32;
                let color = if value.is_nan() { NAN_GRAY } else { coolwarm(value) };
                canvas.fill_rect(x, y, cell, cell, color);
                let label = if value.is_nan() {
                    "nan".to_string()
                } else {
                    format!("{value:.2}")
                };
                let ink = if value.abs() > 0.5 { WHITE } else { BLACK };
                canvas.text_middle(x + cell as i32 / 2, y + cell as i32 / 2, &label, 3, ink);
            }
        }

        for (index, label) in self.labels.iter().enumerate() {
            let center = (index as u32 * cell + cell / 2) as i32;
            canvas.text_centered(left + center, top + grid as i32 + 10, label, 2, BLACK);
            let width = text_width(label, 2) as i32;
            let height = text_height(2) as i32;
            canvas.text(left - 10 - width, top + center - height / 2, label, 2, BLACK);
        }

        draw_colorbar(&mut canvas, left + grid as i32 + 40, top, grid);
        axes::draw_title(&mut canvas, &self.title);
        Ok(canvas)
    }
}

fn draw_colorbar(canvas: &mut Canvas, left: i32, top: i32, height: u32) {
    let width = 24;
    let bar_height = (f64::from(height) * 0.8) as u32;
    let top = top + ((height - bar_height) / 2) as i32;
    for offset in 0..bar_height {
        let value = 1.0 - 2.0 * f64::from(offset) / f64::from(bar_height.max(2) - 1);
        canvas.fill_rect(left, top + offset as i32, width, 1, coolwarm(value));
    }
    canvas.stroke_rect(left, top, width, bar_height, DARK_GRAY);
    for tick in [-1.0, -0.5, 0.0, 0.5, 1.0] {
        let y = top + ((1.0 - tick) / 2.0 * f64::from(bar_height - 1)).round() as i32;
        let right = left + width as i32;
        canvas.line(right, y, right + 5, y, BLACK, 1);
        canvas.text(right + 9, y - text_height(2) as i32 / 2, &format!("{tick:.1}"), 2, DARK_GRAY);
    }
}

/// Diverging blue-white-red color for a value in `[-1, 1]`, centered on 0.
#[must_use]
pub fn coolwarm(value: f64) -> Rgb<u8> {
    let t = ((value.clamp(-1.0, 1.0) + 1.0) / 2.0) as f32;
    let (from, to, factor) = if t < 0.5 {
        (COOLWARM_LOW, COOLWARM_MID, t * 2.0)
    } else {
        (COOLWARM_MID, COOLWARM_HIGH, (t - 0.5) * 2.0)
    };
    let mixed = to_lab(from).mix(to_lab(to), factor);
    let rgb: Srgb = mixed.into_color();
    Rgb([
        channel(rgb.red),
        channel(rgb.green),
        channel(rgb.blue),
    ])
}

fn to_lab(color: Rgb<u8>) -> Lab {
    Srgb::new(color[0], color[1], color[2])
        .into_format::<f32>()
        .into_color()
}

fn channel(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub label: String,
    pub value: f64,
}

/// Vertical bars in the given order, labelled underneath at an angle and
/// annotated with their value.
#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub bars: Vec<Bar>,
    pub value_suffix: String,
}

impl Chart for BarChart {
    fn kind(&self) -> &'static str {
        "bar"
    }

    fn render(&self) -> Result<Canvas, RenderError> {
        if self.bars.is_empty() {
            return Err(RenderError::EmptyChart(self.kind()));
        }
        let mut canvas = Canvas::new(1200, 800, WHITE);
        let area = PlotArea {
            left: 110,
            top: 70,
            width: 1050,
            height: 480,
        };

        let (lo, hi) = min_max(self.bars.iter().map(|bar| bar.value));
        let y_min = lo.min(0.0);
        let y_max = hi.max(0.0);
        let span = if y_max > y_min { y_max - y_min } else { 1.0 };
        let domain = (
            if y_min < 0.0 { (-span).mul_add(0.1, y_min) } else { 0.0 },
            span.mul_add(0.1, y_max),
        );
        // x runs over slot indices; slot i is centered on i + 0.5.
        let axes = Axes::new(area, (0.0, self.bars.len() as f64), domain);
        axes.draw_y_ticks(&mut canvas, 6);

        let fill = blend(WHITE, STEEL_BLUE, 0.7);
        let slot = f64::from(area.width) / self.bars.len() as f64;
        let bar_width = (slot * 0.8).max(1.0) as u32;
        let (_, zero_y) = axes.to_pixel(0.0, 0.0);
        let mut label_extent = 0_i32;
        for (index, bar) in self.bars.iter().enumerate() {
            let (center, top_y) = axes.to_pixel(index as f64 + 0.5, bar.value);
            let (y, height) = if top_y <= zero_y {
                (top_y, (zero_y - top_y) as u32)
            } else {
                (zero_y, (top_y - zero_y) as u32)
            };
            canvas.fill_rect(center - bar_width as i32 / 2, y, bar_width, height.max(1), fill);

            let annotation = format!("{:.1}{}", bar.value, self.value_suffix);
            let text_y = if bar.value >= 0.0 {
                top_y - 6 - text_height(2) as i32
            } else {
                top_y + 6
            };
            canvas.text_centered(center, text_y, &annotation, 2, BLACK);

            canvas.text_rotated_end(
                (center, area.bottom() + 14),
                &bar.label,
                2,
                BLACK,
                45.0,
            );
            let diagonal = f64::from(text_width(&bar.label, 2)) * std::f64::consts::FRAC_1_SQRT_2;
            label_extent = label_extent.max(diagonal as i32);
        }
        axes.draw_frame(&mut canvas);

        let label_offset = (label_extent + 34).min(canvas.height() as i32 - area.bottom() - 24);
        axes::draw_title(&mut canvas, &self.title);
        axes::draw_x_label(&mut canvas, &area, &self.x_label, label_offset);
        axes::draw_y_label(&mut canvas, &area, &self.y_label, 75);
        Ok(canvas)
    }
}

fn min_max(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), value| {
        (lo.min(value), hi.max(value))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coolwarm_spans_blue_to_red() {
        let low = coolwarm(-1.0);
        let high = coolwarm(1.0);
        let mid = coolwarm(0.0);
        assert!(low[2] > low[0], "negative end is blue: {low:?}");
        assert!(high[0] > high[2], "positive end is red: {high:?}");
        assert!(mid[0].abs_diff(mid[2]) < 10, "center is neutral: {mid:?}");
    }

    #[test]
    fn empty_charts_are_rejected() {
        let scatter = ScatterChart {
            title: String::new(),
            x_label: String::new(),
            y_label: String::new(),
            points: Vec::new(),
            trend: None,
            annotation: None,
        };
        assert!(matches!(scatter.render(), Err(RenderError::EmptyChart("scatter"))));

        let bars = BarChart {
            title: String::new(),
            x_label: String::new(),
            y_label: String::new(),
            bars: Vec::new(),
            value_suffix: String::new(),
        };
        assert!(bars.render().is_err());
    }

    #[test]
    fn scatter_draws_points_in_plot_area() {
        let chart = ScatterChart {
            title: "T".to_string(),
            x_label: "X".to_string(),
            y_label: "Y".to_string(),
            points: vec![(1.0, 1.0), (2.0, 2.5), (3.0, 2.9)],
            trend: LinearFit::fit(&[1.0, 2.0, 3.0], &[1.0, 2.5, 2.9]),
            annotation: Some("Correlation: 0.971".to_string()),
        };
        let canvas = chart.render().expect("scatter renders");
        assert_eq!((canvas.width(), canvas.height()), (1000, 600));
        let image = canvas.into_image();
        assert!(image.pixels().any(|pixel| *pixel != WHITE));
    }

    #[test]
    fn heatmap_colors_cells_by_value() {
        let chart = HeatmapChart {
            title: "H".to_string(),
            labels: vec!["A".to_string(), "B".to_string()],
            values: vec![vec![1.0, -1.0], vec![-1.0, 1.0]],
        };
        let canvas = chart.render().expect("heatmap renders");
        // Top-left corner of the first cell holds the +1 color.
        let left = (1000 - 440) / 2 - 40;
        assert_eq!(canvas.pixel(left as u32 + 2, 82), Some(coolwarm(1.0)));
    }

    #[test]
    fn bars_render_with_labels() {
        let chart = BarChart {
            title: "Top".to_string(),
            x_label: "State".to_string(),
            y_label: "Value".to_string(),
            bars: vec![
                Bar {
                    label: "Alabama".to_string(),
                    value: 30.5,
                },
                Bar {
                    label: "Alaska".to_string(),
                    value: 20.0,
                },
            ],
            value_suffix: "%".to_string(),
        };
        let canvas = chart.render().expect("bar chart renders");
        assert_eq!((canvas.width(), canvas.height()), (1200, 800));
    }
}
