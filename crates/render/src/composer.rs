//! Card composition
//!
//! Geometry is identical for every theme; the palette decides colours and
//! whether the decorative overlays are drawn.

use pnlcard_core::{
    format_figures, gain_for, FormattedFigures, GainResult, Theme, ValidatedRequest,
};
use tracing::{debug, warn};

use crate::error::RenderError;
use crate::palette::{Decoration, Palette};
use crate::surface::{
    Align, Baseline, Fill, Glow, Point, Rect, Rgba, Stroke, Surface, SurfaceFactory, TextRun,
};
use crate::{CARD_HEIGHT, CARD_WIDTH};

const PADDING: f32 = 60.0;
const HEADER_Y: f32 = 90.0;
const GAIN_Y: f32 = 300.0;
const BOX_Y: f32 = 390.0;
const BOX_WIDTH: f32 = 500.0;
const BOX_HEIGHT: f32 = 120.0;
const BOX_RADIUS: f32 = 20.0;
const BOX_INSET: f32 = 30.0;
const FOOTER_Y: f32 = 585.0;
const SCANLINE_STEP: usize = 4;
const CORNER_INSET: f32 = 20.0;
const CORNER_LENGTH: f32 = 60.0;

const HEADER_LABEL: &str = "PNL CARD";
const WATERMARK: &str = "pnlcard";

/// Fixed card geometry plus the palette chosen for its theme
#[derive(Debug, Clone, PartialEq)]
pub struct CardSpec {
    pub width: u32,
    pub height: u32,
    pub theme: Theme,
    pub palette: Palette,
}

impl CardSpec {
    pub fn for_theme(theme: Theme) -> Self {
        Self {
            width: CARD_WIDTH,
            height: CARD_HEIGHT,
            theme,
            palette: Palette::for_theme(theme),
        }
    }
}

/// Draw a card for `request` and return the encoded image.
///
/// Output depends only on the arguments and the backend, so identical inputs
/// give identical bytes.
pub fn compose_card<F: SurfaceFactory>(
    factory: &F,
    request: &ValidatedRequest,
    gain: &GainResult,
    figures: &FormattedFigures,
) -> Result<Vec<u8>, RenderError> {
    let spec = CardSpec::for_theme(request.theme());

    if !factory.has_font() {
        warn!(ticker = request.ticker(), "No font loaded, card text will be missing");
    }

    let mut surface = factory.create(spec.width, spec.height)?;
    draw_card(&mut surface, &spec, request, gain, figures)?;

    let bytes = surface.finish()?;
    debug!(
        ticker = request.ticker(),
        theme = %spec.theme,
        bytes = bytes.len(),
        "Card composed"
    );
    Ok(bytes)
}

/// Issue every drawing operation for one card onto `surface`
pub fn draw_card<S: Surface>(
    surface: &mut S,
    spec: &CardSpec,
    request: &ValidatedRequest,
    gain: &GainResult,
    figures: &FormattedFigures,
) -> Result<(), RenderError> {
    let palette = &spec.palette;

    surface.fill_rect(
        Rect::new(0.0, 0.0, spec.width as f32, spec.height as f32),
        &palette.background,
    )?;
    if let Some(decoration) = &palette.decoration {
        draw_scanlines(surface, spec, decoration)?;
    }

    draw_header(surface, palette, request)?;
    draw_gain(surface, palette, gain, figures)?;
    draw_price_boxes(surface, palette, gain, figures)?;
    draw_footer(surface, palette, request)?;

    if let Some(decoration) = &palette.decoration {
        draw_corner_accents(surface, spec, decoration)?;
    }
    Ok(())
}

/// Run the whole pipeline after validation: gain, figures, card
pub fn render_card<F: SurfaceFactory>(
    factory: &F,
    request: &ValidatedRequest,
) -> pnlcard_core::Result<Vec<u8>> {
    let gain = gain_for(request)?;
    let figures = format_figures(request, &gain);
    Ok(compose_card(factory, request, &gain, &figures)?)
}

/// `$`-prefixed symbol; a ticker that already starts with `$` is kept as is
pub fn ticker_label(ticker: &str) -> String {
    let upper = ticker.to_uppercase();
    if upper.starts_with('$') {
        upper
    } else {
        format!("${}", upper)
    }
}

fn draw_scanlines<S: Surface>(
    surface: &mut S,
    spec: &CardSpec,
    decoration: &Decoration,
) -> Result<(), RenderError> {
    let fill = Fill::Solid(decoration.scanline);
    for y in (0..spec.height).step_by(SCANLINE_STEP) {
        surface.fill_rect(Rect::new(0.0, y as f32, spec.width as f32, 1.0), &fill)?;
    }
    Ok(())
}

fn draw_header<S: Surface>(
    surface: &mut S,
    palette: &Palette,
    request: &ValidatedRequest,
) -> Result<(), RenderError> {
    surface.draw_text(&TextRun::new(
        ticker_label(request.ticker()),
        PADDING,
        HEADER_Y,
        44.0,
        palette.text,
    ))?;
    surface.draw_text(
        &TextRun::new(
            HEADER_LABEL,
            CARD_WIDTH as f32 - PADDING,
            HEADER_Y,
            22.0,
            palette.muted,
        )
        .align(Align::Right),
    )
}

fn draw_gain<S: Surface>(
    surface: &mut S,
    palette: &Palette,
    gain: &GainResult,
    figures: &FormattedFigures,
) -> Result<(), RenderError> {
    let glow = palette.decoration.map(|d| Glow {
        color: palette.outcome(gain.is_profit).with_opacity(0.8),
        radius: d.glow_radius,
    });

    surface.draw_text(
        &TextRun::new(
            figures.gain_text.as_str(),
            CARD_WIDTH as f32 / 2.0,
            GAIN_Y,
            120.0,
            palette.outcome(gain.is_profit),
        )
        .align(Align::Center)
        .baseline(Baseline::Middle)
        .glow(glow),
    )
}

fn draw_price_boxes<S: Surface>(
    surface: &mut S,
    palette: &Palette,
    gain: &GainResult,
    figures: &FormattedFigures,
) -> Result<(), RenderError> {
    let right_x = CARD_WIDTH as f32 - PADDING - BOX_WIDTH;
    draw_price_box(
        surface,
        palette,
        PADDING,
        "ENTRY",
        &figures.entry_price_text,
        palette.text,
    )?;
    draw_price_box(
        surface,
        palette,
        right_x,
        "CURRENT",
        &figures.current_price_text,
        palette.outcome(gain.is_profit),
    )
}

fn draw_price_box<S: Surface>(
    surface: &mut S,
    palette: &Palette,
    x: f32,
    label: &str,
    value: &str,
    value_color: Rgba,
) -> Result<(), RenderError> {
    let rect = Rect::new(x, BOX_Y, BOX_WIDTH, BOX_HEIGHT);
    surface.fill_rounded_rect(rect, BOX_RADIUS, &Fill::Solid(palette.box_fill))?;
    surface.stroke_rounded_rect(
        rect,
        BOX_RADIUS,
        &Stroke {
            color: palette.box_border,
            width: 2.0,
        },
    )?;

    surface.draw_text(&TextRun::new(
        label,
        x + BOX_INSET,
        BOX_Y + 40.0,
        20.0,
        palette.muted,
    ))?;
    surface.draw_text(&TextRun::new(
        value,
        x + BOX_INSET,
        BOX_Y + 95.0,
        44.0,
        value_color,
    ))
}

fn draw_footer<S: Surface>(
    surface: &mut S,
    palette: &Palette,
    request: &ValidatedRequest,
) -> Result<(), RenderError> {
    if let Some(tag) = request.tag() {
        surface.draw_text(&TextRun::new(tag, PADDING, FOOTER_Y, 22.0, palette.muted))?;
    }
    if let Some(timestamp) = request.timestamp() {
        surface.draw_text(
            &TextRun::new(
                timestamp,
                CARD_WIDTH as f32 / 2.0,
                FOOTER_Y,
                22.0,
                palette.muted,
            )
            .align(Align::Center),
        )?;
    }
    surface.draw_text(
        &TextRun::new(
            WATERMARK,
            CARD_WIDTH as f32 - PADDING,
            FOOTER_Y,
            22.0,
            palette.text.with_opacity(0.5),
        )
        .align(Align::Right),
    )
}

/// L-shaped strokes in each corner
fn draw_corner_accents<S: Surface>(
    surface: &mut S,
    spec: &CardSpec,
    decoration: &Decoration,
) -> Result<(), RenderError> {
    let stroke = Stroke {
        color: decoration.accent,
        width: 4.0,
    };
    let (w, h) = (spec.width as f32, spec.height as f32);
    let corners = [
        (CORNER_INSET, CORNER_INSET, 1.0, 1.0),
        (w - CORNER_INSET, CORNER_INSET, -1.0, 1.0),
        (CORNER_INSET, h - CORNER_INSET, 1.0, -1.0),
        (w - CORNER_INSET, h - CORNER_INSET, -1.0, -1.0),
    ];

    for (x, y, dx, dy) in corners {
        let corner = Point::new(x, y);
        surface.stroke_line(corner, Point::new(x + dx * CORNER_LENGTH, y), &stroke)?;
        surface.stroke_line(corner, Point::new(x, y + dy * CORNER_LENGTH), &stroke)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::recording::{DrawOp, RecordingFactory};
    use crate::backend::skia::SkiaFactory;
    use pnlcard_core::validate;
    use serde_json::{json, Value};

    fn request(raw: Value) -> ValidatedRequest {
        validate(&raw).unwrap()
    }

    fn base() -> Value {
        json!({
            "ticker": "pepe",
            "entryPrice": 0.0000024,
            "currentPrice": 0.0000096,
            "tag": "called it",
            "timestamp": "Jan 5, 2026 14:03 UTC",
        })
    }

    fn with(field: &str, value: Value) -> Value {
        let mut raw = base();
        raw[field] = value;
        raw
    }

    fn recorded(raw: Value) -> Vec<u8> {
        render_card(&RecordingFactory::default(), &request(raw)).unwrap()
    }

    fn ops(raw: Value) -> Vec<DrawOp> {
        RecordingFactory::default().record(&request(raw)).unwrap()
    }

    fn texts(ops: &[DrawOp]) -> Vec<String> {
        ops.iter()
            .filter_map(|op| match op {
                DrawOp::Text(run) => Some(run.text.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_ticker_label() {
        assert_eq!(ticker_label("pepe"), "$PEPE");
        assert_eq!(ticker_label("$BTC"), "$BTC");
    }

    #[test]
    fn test_text_layout() {
        let ops = ops(base());
        assert_eq!(
            texts(&ops),
            vec![
                "$PEPE",
                "PNL CARD",
                "+300.0%",
                "ENTRY",
                "$0.0{5}2400",
                "CURRENT",
                "$0.0{5}9600",
                "called it",
                "Jan 5, 2026 14:03 UTC",
                "pnlcard",
            ]
        );
    }

    #[test]
    fn test_optional_footer_fields_skipped() {
        let ops = ops(json!({"ticker": "sol", "entryPrice": 100, "currentPrice": 50}));
        let texts = texts(&ops);
        assert_eq!(texts.last().map(String::as_str), Some("pnlcard"));
        assert_eq!(texts.len(), 8);
        assert!(texts.contains(&"-50.0%".to_string()));
    }

    #[test]
    fn test_profit_and_loss_colours() {
        let dark = Palette::for_theme(Theme::Dark);
        let gain_colour = |ops: &[DrawOp]| {
            ops.iter()
                .find_map(|op| match op {
                    DrawOp::Text(run) if run.size == 120.0 => Some(run.color),
                    _ => None,
                })
                .unwrap()
        };

        assert_eq!(gain_colour(&ops(base())), dark.profit);
        assert_eq!(
            gain_colour(&ops(with("currentPrice", json!(0.000001)))),
            dark.loss
        );
    }

    #[test]
    fn test_degen_decorations() {
        let plain = ops(base());
        let degen = ops(with("theme", json!("degen")));

        let lines = |ops: &[DrawOp]| ops.iter().filter(|op| matches!(op, DrawOp::Line { .. })).count();
        let rects = |ops: &[DrawOp]| ops.iter().filter(|op| matches!(op, DrawOp::Rect { .. })).count();

        assert_eq!(lines(&plain), 0);
        assert_eq!(lines(&degen), 8);
        assert_eq!(rects(&plain), 1);
        assert_eq!(rects(&degen), 1 + (CARD_HEIGHT as usize).div_ceil(SCANLINE_STEP));

        let glow = degen.iter().find_map(|op| match op {
            DrawOp::Text(run) => run.glow,
            _ => None,
        });
        assert!(glow.is_some());
        assert!(plain.iter().all(|op| !matches!(op, DrawOp::Text(run) if run.glow.is_some())));
    }

    #[test]
    fn test_recorded_output_is_deterministic() {
        assert_eq!(recorded(base()), recorded(base()));
    }

    #[test]
    fn test_inputs_change_recorded_output() {
        let reference = recorded(base());
        assert_ne!(reference, recorded(with("theme", json!("light"))));
        assert_ne!(reference, recorded(with("ticker", json!("wif"))));
        assert_ne!(reference, recorded(with("entryPrice", json!(0.000003))));
        assert_ne!(reference, recorded(with("currentPrice", json!(0.000009))));
    }

    struct BrokenFactory;

    impl SurfaceFactory for BrokenFactory {
        type Surface = crate::backend::recording::RecordingSurface;

        fn create(&self, _width: u32, _height: u32) -> Result<Self::Surface, RenderError> {
            Err(RenderError::Surface("out of memory".into()))
        }
    }

    #[test]
    fn test_backend_failure_is_a_render_error() {
        let err = render_card(&BrokenFactory, &request(base())).unwrap_err();
        assert!(matches!(err, pnlcard_core::Error::Render(_)));
        assert_eq!(
            err.to_string(),
            "Render failed: Drawing surface error: out of memory"
        );
    }

    #[test]
    fn test_compose_propagates_factory_error() {
        let raw = request(base());
        let gain = GainResult {
            percentage: pnlcard_core::Percent::new(0.0),
            is_profit: true,
        };
        let figures = format_figures(&raw, &gain);
        assert_eq!(figures.gain_text, "+0.0000%");
        assert!(compose_card(&BrokenFactory, &raw, &gain, &figures).is_err());
    }

    #[test]
    fn test_png_is_deterministic_and_theme_sensitive() {
        let factory = SkiaFactory::without_font();
        let dark = render_card(&factory, &request(base())).unwrap();
        let again = render_card(&factory, &request(base())).unwrap();
        let degen = render_card(&factory, &request(with("theme", json!("degen")))).unwrap();
        let light = render_card(&factory, &request(with("theme", json!("light")))).unwrap();

        assert_eq!(&dark[..8], b"\x89PNG\r\n\x1a\n");
        assert_eq!(dark, again);
        assert_ne!(dark, degen);
        assert_ne!(dark, light);
        assert_ne!(degen, light);
    }

    #[test]
    fn test_png_with_font_is_deterministic() {
        let factory = SkiaFactory::bundled().unwrap();
        let first = render_card(&factory, &request(with("theme", json!("degen")))).unwrap();
        let second = render_card(&factory, &request(with("theme", json!("degen")))).unwrap();
        assert_eq!(&first[..8], b"\x89PNG\r\n\x1a\n");
        assert_eq!(first, second);
    }

    #[test]
    fn test_png_with_font_tracks_text_inputs() {
        let factory = SkiaFactory::bundled().unwrap();
        let png = |raw: Value| render_card(&factory, &request(raw)).unwrap();
        let reference = png(base());

        assert_ne!(reference, png(with("ticker", json!("wif"))));
        assert_ne!(reference, png(with("entryPrice", json!(0.000003))));
        assert_ne!(reference, png(with("currentPrice", json!(0.000009))));
        assert_ne!(reference, png(with("currentPrice", json!(0.000001))));
        assert_ne!(reference, png(with("tag", json!("rugged"))));
    }

    #[test]
    fn test_png_without_font_omits_text() {
        // Box borders and fills are drawn without a font, but text is not;
        // profit vs loss only changes text colour, so bytes match.
        let factory = SkiaFactory::without_font();
        let profit = render_card(&factory, &request(base())).unwrap();
        let loss = render_card(&factory, &request(with("currentPrice", json!(0.000001)))).unwrap();
        assert_eq!(profit, loss);
    }
}
