//! Theme palettes

use pnlcard_core::Theme;

use crate::surface::{Fill, Point, Rgba};
use crate::{CARD_HEIGHT, CARD_WIDTH};

/// Extra ornaments drawn by the high-energy theme
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decoration {
    /// Corner strokes and glow colour
    pub accent: Rgba,
    /// Horizontal scanline colour, already translucent
    pub scanline: Rgba,
    pub glow_radius: f32,
}

/// Colours for one theme. Selected once per card and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    pub background: Fill,
    pub text: Rgba,
    pub muted: Rgba,
    pub box_fill: Rgba,
    pub box_border: Rgba,
    pub profit: Rgba,
    pub loss: Rgba,
    pub decoration: Option<Decoration>,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                background: diagonal(Rgba::hex(0x0f172a), Rgba::hex(0x1e293b)),
                text: Rgba::hex(0xf8fafc),
                muted: Rgba::hex(0x94a3b8),
                box_fill: Rgba::hex(0x1e293b),
                box_border: Rgba::hex(0x334155),
                profit: Rgba::hex(0x22c55e),
                loss: Rgba::hex(0xef4444),
                decoration: None,
            },
            Theme::Light => Self {
                background: Fill::Solid(Rgba::hex(0xf8fafc)),
                text: Rgba::hex(0x0f172a),
                muted: Rgba::hex(0x64748b),
                box_fill: Rgba::hex(0xffffff),
                box_border: Rgba::hex(0xe2e8f0),
                profit: Rgba::hex(0x16a34a),
                loss: Rgba::hex(0xdc2626),
                decoration: None,
            },
            Theme::Degen => Self {
                background: diagonal(Rgba::hex(0x0d0221), Rgba::hex(0x2a0845)),
                text: Rgba::hex(0xffffff),
                muted: Rgba::hex(0xc084fc),
                box_fill: Rgba::hex(0x1a0b2e),
                box_border: Rgba::hex(0xff00ff),
                profit: Rgba::hex(0x39ff14),
                loss: Rgba::hex(0xff073a),
                decoration: Some(Decoration {
                    accent: Rgba::hex(0x00ffff),
                    scanline: Rgba::hex(0x000000).with_opacity(0.06),
                    glow_radius: 24.0,
                }),
            },
        }
    }

    /// Colour for the gain figure and the current price
    pub fn outcome(&self, is_profit: bool) -> Rgba {
        if is_profit {
            self.profit
        } else {
            self.loss
        }
    }
}

fn diagonal(from: Rgba, to: Rgba) -> Fill {
    Fill::LinearGradient {
        start: Point::new(0.0, 0.0),
        end: Point::new(CARD_WIDTH as f32, CARD_HEIGHT as f32),
        stops: vec![(0.0, from), (1.0, to)],
    }
}
