use super::canvas::Canvas;
use super::font::{text_height, text_width};
use super::{BLACK, DARK_GRAY, GRID_GRAY};

const TICK_LENGTH: i32 = 5;
const TICK_SCALE: u32 = 2;
const LABEL_SCALE: u32 = 2;
const TITLE_SCALE: u32 = 3;

/// Maps a data interval onto a pixel interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    #[must_use]
    pub const fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    #[must_use]
    pub const fn domain(&self) -> (f64, f64) {
        self.domain
    }

    #[must_use]
    pub fn map(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if (d1 - d0).abs() < f64::EPSILON {
            return (r0 + r1) / 2.0;
        }
        ((value - d0) / (d1 - d0)).mul_add(r1 - r0, r0)
    }
}

/// Widens `[min, max]` by `fraction` of its span on both sides; a zero span
/// is widened around the value instead.
#[must_use]
pub fn padded_domain(min: f64, max: f64, fraction: f64) -> (f64, f64) {
    let span = max - min;
    if span.abs() < f64::EPSILON {
        let pad = if min.abs() > f64::EPSILON { min.abs() * 0.1 } else { 1.0 };
        return (min - pad, max + pad);
    }
    ((-span).mul_add(fraction, min), span.mul_add(fraction, max))
}

/// A 1-2-5 step giving roughly `target` intervals over `span`.
#[must_use]
pub fn nice_step(span: f64, target: usize) -> f64 {
    if span <= 0.0 || !span.is_finite() {
        return 1.0;
    }
    let raw = span / target.max(1) as f64;
    let magnitude = 10_f64.powf(raw.log10().floor());
    let normalized = raw / magnitude;
    let nice = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

/// Tick positions on multiples of a nice step inside `[lo, hi]`.
#[must_use]
pub fn nice_ticks(lo: f64, hi: f64, target: usize) -> Vec<f64> {
    let step = nice_step(hi - lo, target);
    let first = (lo / step).ceil() * step;
    let mut ticks = Vec::new();
    let mut index = 0_u32;
    loop {
        let tick = f64::from(index).mul_add(step, first);
        if tick > step.mul_add(1e-9, hi) || index > 1000 {
            break;
        }
        // Snap values like 0.30000000000000004 onto the step grid.
        ticks.push((tick / step).round() * step);
        index += 1;
    }
    ticks
}

/// Formats a tick label with as many decimals as the step needs.
#[must_use]
pub fn format_tick(value: f64, step: f64) -> String {
    let decimals = if step >= 1.0 || step <= 0.0 {
        0
    } else {
        (-step.log10().floor()) as usize
    };
    let text = format!("{value:.decimals$}");
    if text.starts_with('-') && text.trim_start_matches(['-', '0', '.']).is_empty() {
        text.trim_start_matches('-').to_string()
    } else {
        text
    }
}

/// Pixel rectangle that holds the plotted data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlotArea {
    pub left: i32,
    pub top: i32,
    pub width: u32,
    pub height: u32,
}

impl PlotArea {
    #[must_use]
    pub const fn right(&self) -> i32 {
        self.left + self.width as i32
    }

    #[must_use]
    pub const fn bottom(&self) -> i32 {
        self.top + self.height as i32
    }
}

/// A plot area with scales for both axes.
#[derive(Debug, Clone, Copy)]
pub struct Axes {
    pub area: PlotArea,
    pub x: LinearScale,
    pub y: LinearScale,
}

impl Axes {
    #[must_use]
    pub fn new(area: PlotArea, x_domain: (f64, f64), y_domain: (f64, f64)) -> Self {
        let x = LinearScale::new(x_domain, (f64::from(area.left), f64::from(area.right())));
        let y = LinearScale::new(y_domain, (f64::from(area.bottom()), f64::from(area.top)));
        Self { area, x, y }
    }

    #[must_use]
    pub fn to_pixel(&self, x: f64, y: f64) -> (i32, i32) {
        (self.x.map(x).round() as i32, self.y.map(y).round() as i32)
    }

    /// Horizontal grid lines and labelled ticks along the y axis.
    pub fn draw_y_ticks(&self, canvas: &mut Canvas, target: usize) {
        let (lo, hi) = self.y.domain();
        let step = nice_step(hi - lo, target);
        for tick in nice_ticks(lo, hi, target) {
            let py = self.y.map(tick).round() as i32;
            canvas.line(self.area.left, py, self.area.right(), py, GRID_GRAY, 1);
            canvas.line(self.area.left - TICK_LENGTH, py, self.area.left, py, BLACK, 1);
            let label = format_tick(tick, step);
            let width = text_width(&label, TICK_SCALE) as i32;
            let height = text_height(TICK_SCALE) as i32;
            canvas.text(
                self.area.left - TICK_LENGTH - 4 - width,
                py - height / 2,
                &label,
                TICK_SCALE,
                DARK_GRAY,
            );
        }
    }

    /// Vertical grid lines and labelled ticks along the x axis.
    pub fn draw_x_ticks(&self, canvas: &mut Canvas, target: usize) {
        let (lo, hi) = self.x.domain();
        let step = nice_step(hi - lo, target);
        for tick in nice_ticks(lo, hi, target) {
            let px = self.x.map(tick).round() as i32;
            canvas.line(px, self.area.top, px, self.area.bottom(), GRID_GRAY, 1);
            canvas.line(px, self.area.bottom(), px, self.area.bottom() + TICK_LENGTH, BLACK, 1);
            canvas.text_centered(
                px,
                self.area.bottom() + TICK_LENGTH + 4,
                &format_tick(tick, step),
                TICK_SCALE,
                DARK_GRAY,
            );
        }
    }

    pub fn draw_frame(&self, canvas: &mut Canvas) {
        canvas.stroke_rect(
            self.area.left,
            self.area.top,
            self.area.width + 1,
            self.area.height + 1,
            BLACK,
        );
    }
}

pub fn draw_title(canvas: &mut Canvas, text: &str) {
    let cx = canvas.width() as i32 / 2;
    canvas.text_centered(cx, 18, text, TITLE_SCALE, BLACK);
}

/// Axis title centered under the plot area, `offset` pixels below it.
pub fn draw_x_label(canvas: &mut Canvas, area: &PlotArea, text: &str, offset: i32) {
    let cx = area.left + area.width as i32 / 2;
    canvas.text_centered(cx, area.bottom() + offset, text, LABEL_SCALE, BLACK);
}

/// Axis title rotated a quarter turn, to the left of the plot area.
pub fn draw_y_label(canvas: &mut Canvas, area: &PlotArea, text: &str, offset: i32) {
    let cy = area.top + area.height as i32 / 2;
    let half = text_width(text, LABEL_SCALE) as i32 / 2;
    canvas.text_rotated_end((area.left - offset, cy - half), text, LABEL_SCALE, BLACK, 90.0);
}
