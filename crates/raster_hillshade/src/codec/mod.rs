//! Value codec: RGB-encoded texels to physical scalar values and back.
//!
//! The decoding order is fixed and shared with the `decoder` shader module:
//! 1. scale each channel by `rgb_scaler`,
//! 2. combine as `r * 65536 + g * 256 + b`,
//! 3. apply `* float_scaler + offset`,
//! 4. quantize to the nearest multiple of `step` when `step > 0`,
//! 5. remap linearly onto the [`ValueRange`].
//!
//! Steps 1–4 produce the codec value ([`decode_raw`]); step 5 is [`ValueRange::remap`].
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub mod recipe;

pub use recipe::{DecodeRecipe, ValueDecoderOverrides, MAX_RAW_VALUE};

/// An 8-bit RGBA color as read from an encoded raster or a picking buffer.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color from three channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// A fully transparent texel carries no data.
    #[inline]
    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }

    #[inline]
    pub fn channels(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    #[inline]
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl From<[u8; 4]> for Rgba {
    fn from(v: [u8; 4]) -> Self {
        Rgba::new(v[0], v[1], v[2], v[3])
    }
}

impl From<[u8; 3]> for Rgba {
    fn from(v: [u8; 3]) -> Self {
        Rgba::rgb(v[0], v[1], v[2])
    }
}

/// Closed physical value interval `[min, max]`.
///
/// Ordering is the caller's responsibility and is not validated.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "[f64; 2]", into = "[f64; 2]"))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// `max - min`. Zero for a collapsed range.
    #[inline]
    pub fn size(&self) -> f64 {
        self.max - self.min
    }

    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.size() == 0.0
    }

    /// Maps a codec value in `[0, 1]` onto the range. A collapsed range always yields `min`.
    #[inline]
    pub fn remap(&self, codec_value: f64) -> f64 {
        codec_value * self.size() + self.min
    }

    /// Position of `value` inside the range, clamped to `[0, 1]`.
    ///
    /// Returns `0.0` (the lower bound) when the range is collapsed or not finite.
    #[inline]
    pub fn normalize(&self, value: f64) -> f64 {
        let size = self.size();
        if size <= 0.0 || !size.is_finite() {
            return 0.0;
        }
        ((value - self.min) / size).clamp(0.0, 1.0)
    }
}

impl Default for ValueRange {
    fn default() -> Self {
        Self::new(0.0, 1.0)
    }
}

impl From<[f64; 2]> for ValueRange {
    fn from(v: [f64; 2]) -> Self {
        ValueRange::new(v[0], v[1])
    }
}

impl From<ValueRange> for [f64; 2] {
    fn from(r: ValueRange) -> Self {
        [r.min, r.max]
    }
}

/// Decodes the channels into the codec value, before any range remapping.
#[inline]
pub fn decode_raw(rgb: [u8; 3], recipe: &DecodeRecipe) -> f64 {
    let r = rgb[0] as f64 * recipe.rgb_scaler[0];
    let g = rgb[1] as f64 * recipe.rgb_scaler[1];
    let b = rgb[2] as f64 * recipe.rgb_scaler[2];

    let combined = r * 65536.0 + g * 256.0 + b;
    let value = combined * recipe.float_scaler + recipe.offset;

    if recipe.quantizes() {
        (value / recipe.step + 0.5).floor() * recipe.step
    } else {
        value
    }
}

/// Decodes an RGB triple into a physical value inside `range`.
#[inline]
pub fn decode_rgb(rgb: [u8; 3], recipe: &DecodeRecipe, range: &ValueRange) -> f64 {
    range.remap(decode_raw(rgb, recipe))
}

/// Decodes a picked color.
///
/// `None` (no color under the pointer) and fully transparent colors yield `None`: background
/// is "no data", never a numeric default.
pub fn decode_color(
    color: Option<Rgba>,
    recipe: &DecodeRecipe,
    range: &ValueRange,
) -> Option<f64> {
    let color = color?;
    if color.is_transparent() {
        return None;
    }
    Some(decode_rgb(color.channels(), recipe, range))
}

/// Encodes a physical value into an opaque RGB color.
///
/// Inverse of [`decode_rgb`] for unit channel scalers: `rgb_scaler` is ignored, `step` is not
/// applied, and the raw integer is rounded and clamped to `[0, 256³−1]`.
pub fn encode_value(value: f64, recipe: &DecodeRecipe, range: &ValueRange) -> Rgba {
    let codec_value = if range.is_degenerate() {
        0.0
    } else {
        (value - range.min) / range.size()
    };

    let raw = if recipe.float_scaler != 0.0 {
        (codec_value - recipe.offset) / recipe.float_scaler
    } else {
        0.0
    };
    let raw = if raw.is_finite() {
        raw.round().clamp(0.0, MAX_RAW_VALUE) as u32
    } else {
        0
    };

    Rgba::rgb(
        ((raw >> 16) & 0xff) as u8,
        ((raw >> 8) & 0xff) as u8,
        (raw & 0xff) as u8,
    )
}
