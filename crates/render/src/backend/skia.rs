//! Raster backend on `tiny-skia` with `ab_glyph` text
//!
//! Text is rasterised into a coverage mask and composited with the run's
//! colour. Without a font every text call is a no-op, so cards still render.

use ab_glyph::{point, Font, FontArc, GlyphId, PxScale, ScaleFont};
use tiny_skia as sk;

use crate::error::RenderError;
use crate::surface::{
    Align, Baseline, Fill, Point, Rect, Rgba, Stroke, Surface, SurfaceFactory, TextRun,
};

/// Box blur passes; three approximate a gaussian
const BLUR_PASSES: usize = 3;

/// DejaVu Sans Bold, shipped so cards have text without any configuration
const BUNDLED_FONT: &[u8] = include_bytes!("../../fonts/DejaVuSans-Bold.ttf");

#[derive(Clone)]
pub struct SkiaFactory {
    font: Option<FontArc>,
}

impl SkiaFactory {
    pub fn new(font: Option<FontArc>) -> Self {
        Self { font }
    }

    /// Parse a TTF/OTF font
    pub fn from_font_bytes(bytes: Vec<u8>) -> Result<Self, RenderError> {
        let font = FontArc::try_from_vec(bytes).map_err(|e| RenderError::Font(e.to_string()))?;
        Ok(Self::new(Some(font)))
    }

    /// Factory using the font compiled into the crate
    pub fn bundled() -> Result<Self, RenderError> {
        let font =
            FontArc::try_from_slice(BUNDLED_FONT).map_err(|e| RenderError::Font(e.to_string()))?;
        Ok(Self::new(Some(font)))
    }

    pub fn without_font() -> Self {
        Self::new(None)
    }
}

impl std::fmt::Debug for SkiaFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SkiaFactory")
            .field("font_loaded", &self.font.is_some())
            .finish()
    }
}

impl SurfaceFactory for SkiaFactory {
    type Surface = SkiaSurface;

    fn create(&self, width: u32, height: u32) -> Result<Self::Surface, RenderError> {
        let pixmap = sk::Pixmap::new(width, height).ok_or_else(|| {
            RenderError::Surface(format!("cannot allocate {}x{} pixmap", width, height))
        })?;
        Ok(SkiaSurface {
            pixmap,
            font: self.font.clone(),
        })
    }

    fn has_font(&self) -> bool {
        self.font.is_some()
    }
}

pub struct SkiaSurface {
    pixmap: sk::Pixmap,
    font: Option<FontArc>,
}

impl SkiaSurface {
    fn full_rect(&self) -> Result<sk::Rect, RenderError> {
        sk_rect(Rect::new(
            0.0,
            0.0,
            self.pixmap.width() as f32,
            self.pixmap.height() as f32,
        ))
    }

    /// Paint `color` through `mask` over the whole pixmap
    fn fill_masked(&mut self, color: Rgba, mask: &sk::Mask) -> Result<(), RenderError> {
        let rect = self.full_rect()?;
        self.pixmap
            .fill_rect(rect, &solid(color), sk::Transform::identity(), Some(mask));
        Ok(())
    }
}

impl Surface for SkiaSurface {
    fn fill_rect(&mut self, rect: Rect, fill: &Fill) -> Result<(), RenderError> {
        let paint = paint(fill)?;
        self.pixmap
            .fill_rect(sk_rect(rect)?, &paint, sk::Transform::identity(), None);
        Ok(())
    }

    fn fill_rounded_rect(
        &mut self,
        rect: Rect,
        radius: f32,
        fill: &Fill,
    ) -> Result<(), RenderError> {
        let path = rounded_rect_path(rect, radius)?;
        self.pixmap.fill_path(
            &path,
            &paint(fill)?,
            sk::FillRule::Winding,
            sk::Transform::identity(),
            None,
        );
        Ok(())
    }

    fn stroke_rounded_rect(
        &mut self,
        rect: Rect,
        radius: f32,
        stroke: &Stroke,
    ) -> Result<(), RenderError> {
        let path = rounded_rect_path(rect, radius)?;
        self.pixmap.stroke_path(
            &path,
            &solid(stroke.color),
            &sk_stroke(stroke, sk::LineCap::Butt),
            sk::Transform::identity(),
            None,
        );
        Ok(())
    }

    fn stroke_line(&mut self, from: Point, to: Point, stroke: &Stroke) -> Result<(), RenderError> {
        let mut pb = sk::PathBuilder::new();
        pb.move_to(from.x, from.y);
        pb.line_to(to.x, to.y);
        let path = pb
            .finish()
            .ok_or_else(|| RenderError::Surface("degenerate line".into()))?;

        self.pixmap.stroke_path(
            &path,
            &solid(stroke.color),
            &sk_stroke(stroke, sk::LineCap::Square),
            sk::Transform::identity(),
            None,
        );
        Ok(())
    }

    fn draw_text(&mut self, run: &TextRun) -> Result<(), RenderError> {
        let Some(font) = self.font.clone() else {
            return Ok(());
        };
        if run.text.is_empty() {
            return Ok(());
        }

        let (width, height) = (self.pixmap.width(), self.pixmap.height());
        let mut mask = sk::Mask::new(width, height)
            .ok_or_else(|| RenderError::Surface("cannot allocate text mask".into()))?;
        let Some(bounds) = rasterize_run(&font, run, &mut mask) else {
            return Ok(());
        };

        if let Some(glow) = run.glow {
            let mut halo = mask.clone();
            let radius = glow.radius.max(0.0).round() as usize;
            box_blur(&mut halo, bounds.expand(radius * BLUR_PASSES), radius);
            self.fill_masked(glow.color, &halo)?;
        }

        self.fill_masked(run.color, &mask)
    }

    fn finish(self) -> Result<Vec<u8>, RenderError> {
        self.pixmap
            .encode_png()
            .map_err(|e| RenderError::Encode(e.to_string()))
    }
}

/// Pixel-aligned box touched by a text run
#[derive(Debug, Clone, Copy)]
struct Bounds {
    x0: i64,
    y0: i64,
    x1: i64,
    y1: i64,
}

impl Bounds {
    fn expand(self, by: usize) -> Self {
        let by = by as i64;
        Self {
            x0: self.x0 - by,
            y0: self.y0 - by,
            x1: self.x1 + by,
            y1: self.y1 + by,
        }
    }

    fn union(self, other: Self) -> Self {
        Self {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }
}

/// Write glyph coverage for `run` into `mask`. Returns the touched area, or
/// `None` when nothing was drawn.
fn rasterize_run(font: &FontArc, run: &TextRun, mask: &mut sk::Mask) -> Option<Bounds> {
    let scale = PxScale::from(run.size);
    let scaled = font.as_scaled(scale);

    let mut layout: Vec<(GlyphId, f32)> = Vec::with_capacity(run.text.len());
    let mut caret = 0.0f32;
    let mut previous: Option<GlyphId> = None;
    for ch in run.text.chars() {
        let id = scaled.glyph_id(ch);
        if let Some(prev) = previous {
            caret += scaled.kern(prev, id);
        }
        layout.push((id, caret));
        caret += scaled.h_advance(id);
        previous = Some(id);
    }

    let origin_x = match run.align {
        Align::Left => run.x,
        Align::Center => run.x - caret / 2.0,
        Align::Right => run.x - caret,
    };
    let baseline_y = match run.baseline {
        Baseline::Alphabetic => run.y,
        Baseline::Top => run.y + scaled.ascent(),
        Baseline::Middle => run.y + (scaled.ascent() + scaled.descent()) / 2.0,
    };

    let (width, height) = (mask.width() as i64, mask.height() as i64);
    let data = mask.data_mut();
    let mut touched: Option<Bounds> = None;

    for (id, offset) in layout {
        let glyph = id.with_scale_and_position(scale, point(origin_x + offset, baseline_y));
        let Some(outlined) = font.outline_glyph(glyph) else {
            continue;
        };
        let px = outlined.px_bounds();
        let (left, top) = (px.min.x as i64, px.min.y as i64);

        outlined.draw(|gx, gy, coverage| {
            let x = left + gx as i64;
            let y = top + gy as i64;
            if x < 0 || y < 0 || x >= width || y >= height {
                return;
            }
            let idx = (y * width + x) as usize;
            let value = (coverage.clamp(0.0, 1.0) * 255.0).round() as u8;
            data[idx] = data[idx].max(value);
        });

        let glyph_bounds = Bounds {
            x0: left,
            y0: top,
            x1: px.max.x.ceil() as i64,
            y1: px.max.y.ceil() as i64,
        };
        touched = Some(match touched {
            Some(b) => b.union(glyph_bounds),
            None => glyph_bounds,
        });
    }

    touched
}

/// Repeated horizontal + vertical box blur restricted to `region`
fn box_blur(mask: &mut sk::Mask, region: Bounds, radius: usize) {
    if radius == 0 {
        return;
    }
    let (width, height) = (mask.width() as i64, mask.height() as i64);
    let x0 = region.x0.clamp(0, width) as usize;
    let x1 = region.x1.clamp(0, width) as usize;
    let y0 = region.y0.clamp(0, height) as usize;
    let y1 = region.y1.clamp(0, height) as usize;
    if x0 >= x1 || y0 >= y1 {
        return;
    }

    let stride = width as usize;
    let data = mask.data_mut();
    let mut line = Vec::with_capacity((x1 - x0).max(y1 - y0));
    let mut out = Vec::with_capacity(line.capacity());

    for _ in 0..BLUR_PASSES {
        for y in y0..y1 {
            let row = y * stride;
            line.clear();
            line.extend_from_slice(&data[row + x0..row + x1]);
            blur_line(&line, &mut out, radius);
            data[row + x0..row + x1].copy_from_slice(&out);
        }
        for x in x0..x1 {
            line.clear();
            line.extend((y0..y1).map(|y| data[y * stride + x]));
            blur_line(&line, &mut out, radius);
            for (i, y) in (y0..y1).enumerate() {
                data[y * stride + x] = out[i];
            }
        }
    }
}

/// Moving average over `2 * radius + 1` samples, zero outside the line
fn blur_line(src: &[u8], dst: &mut Vec<u8>, radius: usize) {
    let n = src.len();
    let window = (2 * radius + 1) as u32;

    let mut prefix = Vec::with_capacity(n + 1);
    prefix.push(0u32);
    for &v in src {
        let last = prefix[prefix.len() - 1];
        prefix.push(last + v as u32);
    }

    dst.clear();
    for i in 0..n {
        let lo = i.saturating_sub(radius);
        let hi = (i + radius + 1).min(n);
        dst.push(((prefix[hi] - prefix[lo]) / window) as u8);
    }
}

fn sk_color(c: Rgba) -> sk::Color {
    sk::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn solid(color: Rgba) -> sk::Paint<'static> {
    let mut paint = sk::Paint::default();
    paint.set_color(sk_color(color));
    paint.anti_alias = true;
    paint
}

fn paint(fill: &Fill) -> Result<sk::Paint<'static>, RenderError> {
    match fill {
        Fill::Solid(color) => Ok(solid(*color)),
        Fill::LinearGradient { start, end, stops } => {
            let stops = stops
                .iter()
                .map(|(offset, color)| sk::GradientStop::new(*offset, sk_color(*color)))
                .collect();
            let shader = sk::LinearGradient::new(
                sk::Point::from_xy(start.x, start.y),
                sk::Point::from_xy(end.x, end.y),
                stops,
                sk::SpreadMode::Pad,
                sk::Transform::identity(),
            )
            .ok_or_else(|| RenderError::Surface("invalid gradient".into()))?;

            let mut paint = sk::Paint::default();
            paint.shader = shader;
            paint.anti_alias = true;
            Ok(paint)
        }
    }
}

fn sk_rect(rect: Rect) -> Result<sk::Rect, RenderError> {
    sk::Rect::from_xywh(rect.x, rect.y, rect.width, rect.height)
        .ok_or_else(|| RenderError::Surface(format!("invalid rect {:?}", rect)))
}

fn sk_stroke(stroke: &Stroke, cap: sk::LineCap) -> sk::Stroke {
    sk::Stroke {
        width: stroke.width,
        line_cap: cap,
        ..sk::Stroke::default()
    }
}

fn rounded_rect_path(rect: Rect, radius: f32) -> Result<sk::Path, RenderError> {
    let r = radius.max(0.0).min(rect.width / 2.0).min(rect.height / 2.0);
    let (left, top) = (rect.x, rect.y);
    let (right, bottom) = (rect.x + rect.width, rect.y + rect.height);

    let mut pb = sk::PathBuilder::new();
    pb.move_to(left + r, top);
    pb.line_to(right - r, top);
    pb.quad_to(right, top, right, top + r);
    pb.line_to(right, bottom - r);
    pb.quad_to(right, bottom, right - r, bottom);
    pb.line_to(left + r, bottom);
    pb.quad_to(left, bottom, left, bottom - r);
    pb.line_to(left, top + r);
    pb.quad_to(left, top, left + r, top);
    pb.close();

    pb.finish()
        .ok_or_else(|| RenderError::Surface(format!("invalid rounded rect {:?}", rect)))
}
