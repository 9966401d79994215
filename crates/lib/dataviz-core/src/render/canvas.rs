use std::io::Cursor;

use image::{ImageFormat, Rgb, RgbImage};

use super::RenderError;
use super::font::{for_each_dot, text_height, text_width};

/// Raster drawing surface backed by an RGB image.
#[derive(Debug, Clone)]
pub struct Canvas {
    image: RgbImage,
}

impl Canvas {
    #[must_use]
    pub fn new(width: u32, height: u32, background: Rgb<u8>) -> Self {
        Self {
            image: RgbImage::from_pixel(width, height, background),
        }
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb<u8>> {
        self.image.get_pixel_checked(x, y).copied()
    }

    #[must_use]
    pub fn into_image(self) -> RgbImage {
        self.image
    }

    fn in_bounds(&self, x: i32, y: i32) -> Option<(u32, u32)> {
        let (x, y) = (u32::try_from(x).ok()?, u32::try_from(y).ok()?);
        (x < self.image.width() && y < self.image.height()).then_some((x, y))
    }

    /// Alpha-blends `color` over the existing pixel.
    pub fn blend_pixel(&mut self, x: i32, y: i32, color: Rgb<u8>, alpha: f32) {
        if let Some((x, y)) = self.in_bounds(x, y) {
            let base = *self.image.get_pixel(x, y);
            self.image.put_pixel(x, y, blend(base, color, alpha));
        }
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, width: u32, height: u32, color: Rgb<u8>) {
        self.blend_rect(x, y, width, height, color, 1.0);
    }

    pub fn blend_rect(&mut self, x: i32, y: i32, width: u32, height: u32, color: Rgb<u8>, alpha: f32) {
        for dy in 0..height as i32 {
            for dx in 0..width as i32 {
                self.blend_pixel(x + dx, y + dy, color, alpha);
            }
        }
    }

    pub fn stroke_rect(&mut self, x: i32, y: i32, width: u32, height: u32, color: Rgb<u8>) {
        if width == 0 || height == 0 {
            return;
        }
        let right = x + width as i32 - 1;
        let bottom = y + height as i32 - 1;
        self.line(x, y, right, y, color, 1);
        self.line(x, bottom, right, bottom, color, 1);
        self.line(x, y, x, bottom, color, 1);
        self.line(right, y, right, bottom, color, 1);
    }

    /// Bresenham line with a square brush of side `thickness`.
    pub fn line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgb<u8>, thickness: u32) {
        self.pattern_line(x0, y0, x1, y1, color, thickness, None);
    }

    /// Line drawn as alternating `dash` and `gap` runs of pixels.
    #[allow(clippy::too_many_arguments)]
    pub fn dashed_line(
        &mut self,
        (x0, y0): (i32, i32),
        (x1, y1): (i32, i32),
        color: Rgb<u8>,
        thickness: u32,
        dash: u32,
        gap: u32,
    ) {
        self.pattern_line(x0, y0, x1, y1, color, thickness, Some((dash, gap)));
    }

    #[allow(clippy::too_many_arguments)]
    fn pattern_line(
        &mut self,
        mut x0: i32,
        mut y0: i32,
        x1: i32,
        y1: i32,
        color: Rgb<u8>,
        thickness: u32,
        pattern: Option<(u32, u32)>,
    ) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let half = thickness as i32 / 2;
        let mut step: u32 = 0;
        loop {
            let visible = pattern.is_none_or(|(dash, gap)| step % (dash + gap).max(1) < dash);
            if visible {
                self.fill_rect(x0 - half, y0 - half, thickness.max(1), thickness.max(1), color);
            }
            if x0 == x1 && y0 == y1 {
                break;
            }
            let doubled = 2 * err;
            if doubled >= dy {
                err += dy;
                x0 += sx;
            }
            if doubled <= dx {
                err += dx;
                y0 += sy;
            }
            step += 1;
        }
    }

    pub fn fill_circle(&mut self, cx: i32, cy: i32, radius: i32, color: Rgb<u8>, alpha: f32) {
        let r2 = radius * radius;
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx * dx + dy * dy <= r2 {
                    self.blend_pixel(cx + dx, cy + dy, color, alpha);
                }
            }
        }
    }

    /// Draws text with its top-left corner at `(x, y)`.
    pub fn text(&mut self, x: i32, y: i32, text: &str, scale: u32, color: Rgb<u8>) {
        let scale_px = scale.max(1);
        for_each_dot(text, |col, row| {
            self.fill_rect(
                x + (col * scale_px) as i32,
                y + (row * scale_px) as i32,
                scale_px,
                scale_px,
                color,
            );
        });
    }

    /// Draws text horizontally centered on `cx`.
    pub fn text_centered(&mut self, cx: i32, y: i32, text: &str, scale: u32, color: Rgb<u8>) {
        let width = text_width(text, scale) as i32;
        self.text(cx - width / 2, y, text, scale, color);
    }

    /// Draws text centered on `(cx, cy)` in both directions.
    pub fn text_middle(&mut self, cx: i32, cy: i32, text: &str, scale: u32, color: Rgb<u8>) {
        let height = text_height(scale) as i32;
        self.text_centered(cx, cy - height / 2, text, scale, color);
    }

    /// Draws text rotated counter-clockwise by `degrees`, with the end of the
    /// baseline's midpoint anchored at `(x, y)`.
    pub fn text_rotated_end(
        &mut self,
        (x, y): (i32, i32),
        text: &str,
        scale: u32,
        color: Rgb<u8>,
        degrees: f64,
    ) {
        let scale_px = f64::from(scale.max(1));
        let (sin, cos) = degrees.to_radians().sin_cos();
        let width = f64::from(text_width(text, scale));
        let half_height = f64::from(text_height(scale)) / 2.0;
        let brush = scale.max(1) + 1;
        for_each_dot(text, |col, row| {
            let u = f64::from(col).mul_add(scale_px, -width);
            let v = f64::from(row).mul_add(scale_px, -half_height);
            let px = u.mul_add(cos, v.mul_add(sin, f64::from(x)));
            let py = v.mul_add(cos, (-u).mul_add(sin, f64::from(y)));
            self.fill_rect(px.round() as i32, py.round() as i32, brush, brush, color);
        });
    }

    /// Encodes the canvas as PNG bytes.
    ///
    /// # Errors
    /// Returns `RenderError::Encode` if encoding fails.
    pub fn encode_png(&self) -> Result<Vec<u8>, RenderError> {
        let mut bytes = Cursor::new(Vec::new());
        self.image.write_to(&mut bytes, ImageFormat::Png)?;
        Ok(bytes.into_inner())
    }
}

/// Mixes `over` onto `base` with the given opacity.
#[must_use]
pub fn blend(base: Rgb<u8>, over: Rgb<u8>, alpha: f32) -> Rgb<u8> {
    let alpha = alpha.clamp(0.0, 1.0);
    let mix = |b: u8, o: u8| {
        f32::from(o)
            .mul_add(alpha, f32::from(b) * (1.0 - alpha))
            .round() as u8
    };
    Rgb([
        mix(base[0], over[0]),
        mix(base[1], over[1]),
        mix(base[2], over[2]),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
    const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

    #[test]
    fn drawing_outside_the_canvas_is_clipped() {
        let mut canvas = Canvas::new(10, 10, WHITE);
        canvas.fill_rect(-5, -5, 7, 7, BLACK);
        canvas.line(-20, 5, 30, 5, BLACK, 1);
        assert_eq!(canvas.pixel(0, 0), Some(BLACK));
        assert_eq!(canvas.pixel(9, 5), Some(BLACK));
        assert_eq!(canvas.pixel(9, 9), Some(WHITE));
    }

    #[test]
    fn blend_mixes_channels() {
        assert_eq!(blend(WHITE, BLACK, 0.5), Rgb([128, 128, 128]));
        assert_eq!(blend(WHITE, BLACK, 0.0), WHITE);
        assert_eq!(blend(WHITE, BLACK, 1.0), BLACK);
    }

    #[test]
    fn dashed_line_leaves_gaps() {
        let mut canvas = Canvas::new(20, 1, WHITE);
        canvas.dashed_line((0, 0), (19, 0), BLACK, 1, 4, 4);
        assert_eq!(canvas.pixel(0, 0), Some(BLACK));
        assert_eq!(canvas.pixel(5, 0), Some(WHITE));
        assert_eq!(canvas.pixel(8, 0), Some(BLACK));
    }

    #[test]
    fn png_bytes_carry_the_signature() {
        let canvas = Canvas::new(4, 4, WHITE);
        let bytes = canvas.encode_png().expect("png encodes");
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }
}
