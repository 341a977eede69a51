//! Color types and color arithmetic.

use crate::Error;
use alloc::string::String;

/// 8-bit per channel color.
///
/// Stored in the frame buffer in B, G, R, A byte order, see [`Rgba::to_bgra`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);
    pub const BLACK: Rgba = Rgba::new(0, 0, 0, 255);
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Multiplies every channel, alpha included, by `intensity`.
    ///
    /// Results are truncated and clamped to `0..=255`, so intensities above 1 brighten up to
    /// saturation and negative intensities produce zero.
    pub fn scale(self, intensity: f64) -> Self {
        let ch = |v: u8| {
            let v = v as f64 * intensity;
            if v <= 0.0 {
                0
            } else if v >= 255.0 {
                255
            } else {
                v as u8
            }
        };
        Self {
            r: ch(self.r),
            g: ch(self.g),
            b: ch(self.b),
            a: ch(self.a),
        }
    }

    /// Channel-wise sum, saturating at 255.
    pub fn saturating_add(self, other: Self) -> Self {
        Self {
            r: self.r.saturating_add(other.r),
            g: self.g.saturating_add(other.g),
            b: self.b.saturating_add(other.b),
            a: self.a.saturating_add(other.a),
        }
    }

    pub fn to_bgra(self) -> [u8; 4] {
        [self.b, self.g, self.r, self.a]
    }

    pub fn from_bgra([b, g, r, a]: [u8; 4]) -> Self {
        Self { r, g, b, a }
    }

    /// Relative luminance in `0.0..=1.0`, ignoring alpha.
    pub fn luminance(self) -> f32 {
        (0.21 * self.r as f32 + 0.72 * self.g as f32 + 0.07 * self.b as f32) / 255.0
    }
}

/// A triangle color as written in scene descriptions.
///
/// Loaders resolve this once with [`ColorSpec::resolve`]; the renderer only ever sees [`Rgba`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum ColorSpec {
    Named(String),
    Explicit { a: u8, r: u8, g: u8, b: u8 },
}

// Subset of the usual web color names.
const NAMED: &[(&str, Rgba)] = &[
    ("black", Rgba::opaque(0, 0, 0)),
    ("white", Rgba::opaque(255, 255, 255)),
    ("red", Rgba::opaque(255, 0, 0)),
    ("lime", Rgba::opaque(0, 255, 0)),
    ("green", Rgba::opaque(0, 128, 0)),
    ("blue", Rgba::opaque(0, 0, 255)),
    ("yellow", Rgba::opaque(255, 255, 0)),
    ("cyan", Rgba::opaque(0, 255, 255)),
    ("aqua", Rgba::opaque(0, 255, 255)),
    ("magenta", Rgba::opaque(255, 0, 255)),
    ("fuchsia", Rgba::opaque(255, 0, 255)),
    ("purple", Rgba::opaque(128, 0, 128)),
    ("orange", Rgba::opaque(255, 165, 0)),
    ("gray", Rgba::opaque(128, 128, 128)),
    ("grey", Rgba::opaque(128, 128, 128)),
    ("silver", Rgba::opaque(192, 192, 192)),
    ("maroon", Rgba::opaque(128, 0, 0)),
    ("navy", Rgba::opaque(0, 0, 128)),
    ("olive", Rgba::opaque(128, 128, 0)),
    ("teal", Rgba::opaque(0, 128, 128)),
    ("brown", Rgba::opaque(165, 42, 42)),
    ("pink", Rgba::opaque(255, 192, 203)),
    ("transparent", Rgba::TRANSPARENT),
];

impl ColorSpec {
    pub fn resolve(&self) -> Result<Rgba, Error> {
        match self {
            Self::Explicit { a, r, g, b } => Ok(Rgba::new(*r, *g, *b, *a)),
            Self::Named(name) => NAMED
                .iter()
                .find(|(n, _)| n.eq_ignore_ascii_case(name.trim()))
                .map(|(_, c)| *c)
                .ok_or_else(|| Error::UnknownColor(name.clone())),
        }
    }
}

impl From<Rgba> for ColorSpec {
    fn from(c: Rgba) -> Self {
        Self::Explicit {
            a: c.a,
            r: c.r,
            g: c.g,
            b: c.b,
        }
    }
}
