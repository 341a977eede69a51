//! Text previews of a frame buffer.
//!
//! Handy for looking at a render from a terminal or a test log without encoding an image. The
//! buffer is sampled down to a grid of characters, and every sample is quantized to a ten step
//! ramp of increasingly dense characters. Dithering hides most of the banding such a coarse ramp
//! would otherwise produce.

use crate::{
    color::Rgba,
    framebuffer::{FrameBuffer, FAR},
};
use alloc::string::String;

const PALETTE: [u8; 10] = *b" .:-=+*%#@";

/// Returns the assumed aspect ratio of terminal characters.
///
/// Characters are about twice as tall as they are wide.
pub fn term_char_aspect() -> (usize, usize) {
    (1, 2)
}

/// Nudges quantization per character cell.
pub trait Dithering {
    /// Takes the fractional part of a value in `0.0..1.0` and returns it with an offset in
    /// `-0.5..=0.5` applied, depending on the cell position.
    fn dither(&self, frac: f32, x: usize, y: usize) -> f32;
}

/// No dithering: plain rounding.
impl Dithering for () {
    fn dither(&self, frac: f32, _: usize, _: usize) -> f32 {
        frac
    }
}

/// Ordered dithering with a 4x4 Bayer matrix.
#[derive(Debug, Default, Clone, Copy)]
pub struct Bayer4;

impl Bayer4 {
    #[rustfmt::skip]
    const MATRIX: [[u8; 4]; 4] = [
        [0,  8,  2,  10],
        [12, 4,  14, 6],
        [3,  11, 1,  9],
        [15, 7,  13, 5],
    ];
}

impl Dithering for Bayer4 {
    fn dither(&self, frac: f32, x: usize, y: usize) -> f32 {
        let threshold = (Self::MATRIX[y % 4][x % 4] as f32 + 0.5) / 16.0;
        frac + (0.5 - threshold)
    }
}

/// What a preview shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// Brightness of the color buffer, weighted by alpha.
    Luminance,
    /// Inverse depth, scaled so the nearest pixel is the densest character.
    Depth,
}

fn quantize(val: f32, dithering: &impl Dithering, x: usize, y: usize) -> u8 {
    let max = (PALETTE.len() - 1) as f32;
    let val = val.clamp(0.0, 1.0) * max;
    let floored = libm::floorf(val);
    let idx = libm::roundf(floored + dithering.dither(val - floored, x, y));
    PALETTE[idx.clamp(0.0, max) as usize]
}

/// Renders `fb` as `columns` characters per line.
///
/// The number of lines follows from the buffer's aspect ratio and [`term_char_aspect`].
pub fn to_ascii(
    fb: &FrameBuffer,
    columns: usize,
    channel: Channel,
    dithering: &impl Dithering,
) -> String {
    let (w, h) = (fb.width(), fb.height());
    let (cx, cy) = term_char_aspect();
    let columns = columns.clamp(1, w);
    let rows = ((h * columns * cx) / (w * cy)).clamp(1, h);

    let max_depth = fb.depth_buffer().iter().copied().fold(FAR, f64::max);
    let bytes = fb.as_bytes();

    let mut out = String::with_capacity((columns + 1) * rows);
    for row in 0..rows {
        let ry = row * h / rows;
        for col in 0..columns {
            let rx = col * w / columns;
            let idx = ry * w + rx;
            let val = match channel {
                Channel::Luminance => {
                    let px = Rgba::from_bgra([
                        bytes[idx * 4],
                        bytes[idx * 4 + 1],
                        bytes[idx * 4 + 2],
                        bytes[idx * 4 + 3],
                    ]);
                    px.luminance() * px.a as f32 / 255.0
                }
                Channel::Depth if max_depth > FAR => {
                    (fb.depth_buffer()[idx] / max_depth) as f32
                }
                Channel::Depth => 0.0,
            };
            out.push(quantize(val, dithering, col, row) as char);
        }
        out.push('\n');
    }
    out
}
