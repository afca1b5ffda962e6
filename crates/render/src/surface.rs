//! Drawing-surface capability
//!
//! A backend exposes a fixed set of operations. Every call carries its own
//! coordinates and paint, so there is no current fill style, transform or
//! cursor hidden inside the surface.

use serde::Serialize;

use crate::error::RenderError;

/// 8-bit straight-alpha colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Opaque colour from `0xRRGGBB`
    pub const fn hex(rgb: u32) -> Self {
        Self {
            r: ((rgb >> 16) & 0xff) as u8,
            g: ((rgb >> 8) & 0xff) as u8,
            b: (rgb & 0xff) as u8,
            a: 0xff,
        }
    }

    /// Same colour with `opacity` (0.0..=1.0) applied to its alpha
    pub fn with_opacity(self, opacity: f32) -> Self {
        let a = (self.a as f32 * opacity.clamp(0.0, 1.0)).round() as u8;
        Self { a, ..self }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// How an area is painted
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Fill {
    Solid(Rgba),
    /// Stops are `(offset 0.0..=1.0, colour)` pairs in ascending order
    LinearGradient {
        start: Point,
        end: Point,
        stops: Vec<(f32, Rgba)>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Stroke {
    pub color: Rgba,
    pub width: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Align {
    Left,
    Center,
    Right,
}

/// Which part of the line box sits on the run's `y`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Baseline {
    Top,
    Middle,
    Alphabetic,
}

/// Blurred halo painted underneath a text run
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Glow {
    pub color: Rgba,
    pub radius: f32,
}

/// One line of text anchored at `(x, y)`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextRun {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub color: Rgba,
    pub align: Align,
    pub baseline: Baseline,
    pub glow: Option<Glow>,
}

impl TextRun {
    pub fn new(text: impl Into<String>, x: f32, y: f32, size: f32, color: Rgba) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            size,
            color,
            align: Align::Left,
            baseline: Baseline::Alphabetic,
            glow: None,
        }
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn baseline(mut self, baseline: Baseline) -> Self {
        self.baseline = baseline;
        self
    }

    pub fn glow(mut self, glow: Option<Glow>) -> Self {
        self.glow = glow;
        self
    }
}

/// A fixed-size canvas owned by a single render call
pub trait Surface {
    fn fill_rect(&mut self, rect: Rect, fill: &Fill) -> Result<(), RenderError>;

    fn fill_rounded_rect(&mut self, rect: Rect, radius: f32, fill: &Fill)
        -> Result<(), RenderError>;

    fn stroke_rounded_rect(
        &mut self,
        rect: Rect,
        radius: f32,
        stroke: &Stroke,
    ) -> Result<(), RenderError>;

    fn stroke_line(&mut self, from: Point, to: Point, stroke: &Stroke) -> Result<(), RenderError>;

    fn draw_text(&mut self, run: &TextRun) -> Result<(), RenderError>;

    /// Consume the surface and encode it losslessly
    fn finish(self) -> Result<Vec<u8>, RenderError>;
}

/// Creates surfaces of a requested size
pub trait SurfaceFactory {
    type Surface: Surface;

    fn create(&self, width: u32, height: u32) -> Result<Self::Surface, RenderError>;

    /// Whether text operations will produce visible output
    fn has_font(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_colour() {
        assert_eq!(
            Rgba::hex(0x22c55e),
            Rgba {
                r: 0x22,
                g: 0xc5,
                b: 0x5e,
                a: 0xff
            }
        );
    }

    #[test]
    fn test_opacity() {
        assert_eq!(Rgba::hex(0xffffff).with_opacity(0.5).a, 128);
        assert_eq!(Rgba::hex(0xffffff).with_opacity(2.0).a, 255);
        assert_eq!(Rgba::hex(0xffffff).with_opacity(0.0).a, 0);
    }
}
