//! Backend that records drawing operations instead of rasterising them
//!
//! `finish` yields the operation list as JSON, which makes layouts easy to
//! diff and keeps text visible in the output even without a font.

use pnlcard_core::{format_figures, gain_for, ValidatedRequest};
use serde::Serialize;

use crate::composer::{draw_card, CardSpec};
use crate::error::RenderError;
use crate::surface::{Fill, Point, Rect, Stroke, Surface, SurfaceFactory, TextRun};

/// One recorded call on a [`RecordingSurface`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "op")]
pub enum DrawOp {
    Rect { rect: Rect, fill: Fill },
    RoundedRect { rect: Rect, radius: f32, fill: Fill },
    RoundedOutline { rect: Rect, radius: f32, stroke: Stroke },
    Line { from: Point, to: Point, stroke: Stroke },
    Text(TextRun),
}

#[derive(Debug, Clone, Serialize)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    ops: Vec<DrawOp>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
        }
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<DrawOp> {
        self.ops
    }
}

impl Surface for RecordingSurface {
    fn fill_rect(&mut self, rect: Rect, fill: &Fill) -> Result<(), RenderError> {
        self.ops.push(DrawOp::Rect {
            rect,
            fill: fill.clone(),
        });
        Ok(())
    }

    fn fill_rounded_rect(
        &mut self,
        rect: Rect,
        radius: f32,
        fill: &Fill,
    ) -> Result<(), RenderError> {
        self.ops.push(DrawOp::RoundedRect {
            rect,
            radius,
            fill: fill.clone(),
        });
        Ok(())
    }

    fn stroke_rounded_rect(
        &mut self,
        rect: Rect,
        radius: f32,
        stroke: &Stroke,
    ) -> Result<(), RenderError> {
        self.ops.push(DrawOp::RoundedOutline {
            rect,
            radius,
            stroke: *stroke,
        });
        Ok(())
    }

    fn stroke_line(&mut self, from: Point, to: Point, stroke: &Stroke) -> Result<(), RenderError> {
        self.ops.push(DrawOp::Line {
            from,
            to,
            stroke: *stroke,
        });
        Ok(())
    }

    fn draw_text(&mut self, run: &TextRun) -> Result<(), RenderError> {
        self.ops.push(DrawOp::Text(run.clone()));
        Ok(())
    }

    fn finish(self) -> Result<Vec<u8>, RenderError> {
        serde_json::to_vec(&self).map_err(|e| RenderError::Encode(e.to_string()))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RecordingFactory;

impl RecordingFactory {
    /// Operations a card for `request` would issue
    pub fn record(&self, request: &ValidatedRequest) -> pnlcard_core::Result<Vec<DrawOp>> {
        let gain = gain_for(request)?;
        let figures = format_figures(request, &gain);
        let spec = CardSpec::for_theme(request.theme());

        let mut surface = self.create(spec.width, spec.height)?;
        draw_card(&mut surface, &spec, request, &gain, &figures)?;
        Ok(surface.into_ops())
    }
}

impl SurfaceFactory for RecordingFactory {
    type Surface = RecordingSurface;

    fn create(&self, width: u32, height: u32) -> Result<Self::Surface, RenderError> {
        Ok(RecordingSurface::new(width, height))
    }
}
