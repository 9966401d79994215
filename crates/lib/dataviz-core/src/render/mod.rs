//! Raster chart engine.
//!
//! Chart descriptions (`ScatterChart`, `HeatmapChart`, `BarChart`) are plain
//! data built by the control plane; rendering turns them into a `Canvas`
//! that encodes to PNG.

use std::{error::Error, fmt};

use image::Rgb;

pub mod axes;
pub mod canvas;
pub mod charts;
pub mod font;

pub use canvas::Canvas;
pub use charts::{Bar, BarChart, HeatmapChart, ScatterChart};

pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
pub const DARK_GRAY: Rgb<u8> = Rgb([64, 64, 64]);
pub const GRID_GRAY: Rgb<u8> = Rgb([225, 225, 225]);
pub const TAB_BLUE: Rgb<u8> = Rgb([31, 119, 180]);
pub const TAB_RED: Rgb<u8> = Rgb([214, 39, 40]);
pub const STEEL_BLUE: Rgb<u8> = Rgb([70, 130, 180]);

#[derive(Debug)]
pub enum RenderError {
    EmptyChart(&'static str),
    Encode(image::ImageError),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyChart(kind) => write!(f, "nothing to draw for {kind} chart"),
            Self::Encode(err) => write!(f, "PNG encode error: {err}"),
        }
    }
}

impl Error for RenderError {}

impl From<image::ImageError> for RenderError {
    fn from(err: image::ImageError) -> Self {
        Self::Encode(err)
    }
}

/// A chart description that can be rasterized.
pub trait Chart {
    /// Short name used in logs and errors.
    fn kind(&self) -> &'static str;

    /// Rasterizes the chart.
    ///
    /// # Errors
    /// Returns `RenderError::EmptyChart` when there is nothing to plot.
    fn render(&self) -> Result<Canvas, RenderError>;
}
