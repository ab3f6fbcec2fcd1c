//! Decode recipes: how an RGB triple becomes a codec value.
//!
//! A [`DecodeRecipe`] is always fully populated. Callers describe partial recipes with
//! [`ValueDecoderOverrides`] and merge them against the defaults with [`DecodeRecipe::merged`],
//! field by field.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Largest raw integer representable by three 8-bit channels (`256³ − 1`).
pub const MAX_RAW_VALUE: f64 = 16_777_215.0;

/// Fully populated decoding recipe.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DecodeRecipe {
    /// Per-channel multipliers applied to R, G and B before they are combined.
    pub rgb_scaler: [f64; 3],
    /// Multiplier applied to the combined raw integer.
    pub float_scaler: f64,
    /// Added after scaling.
    pub offset: f64,
    /// Quantization step. Values `<= 0` disable quantization.
    pub step: f64,
}

impl Default for DecodeRecipe {
    /// Scales the `[0, 256³−1]` raw integers to `[0, 1]` without quantization.
    fn default() -> Self {
        Self {
            rgb_scaler: [1.0, 1.0, 1.0],
            float_scaler: 1.0 / MAX_RAW_VALUE,
            offset: 0.0,
            step: 0.0,
        }
    }
}

/// Partially specified recipe. Unset fields fall back to [`DecodeRecipe::default`].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ValueDecoderOverrides {
    pub rgb_scaler: Option<[f64; 3]>,
    pub float_scaler: Option<f64>,
    pub offset: Option<f64>,
    pub step: Option<f64>,
}

impl ValueDecoderOverrides {
    /// Overrides with every field unset.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rgb_scaler(mut self, rgb_scaler: [f64; 3]) -> Self {
        self.rgb_scaler = Some(rgb_scaler);
        self
    }

    pub fn with_float_scaler(mut self, float_scaler: f64) -> Self {
        self.float_scaler = Some(float_scaler);
        self
    }

    pub fn with_offset(mut self, offset: f64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn with_step(mut self, step: f64) -> Self {
        self.step = Some(step);
        self
    }

    /// Layers `other` on top of `self`: fields set in `other` win.
    pub fn or(self, other: &ValueDecoderOverrides) -> Self {
        Self {
            rgb_scaler: other.rgb_scaler.or(self.rgb_scaler),
            float_scaler: other.float_scaler.or(self.float_scaler),
            offset: other.offset.or(self.offset),
            step: other.step.or(self.step),
        }
    }

    /// Returns `true` when no field is set.
    pub fn is_empty(&self) -> bool {
        self.rgb_scaler.is_none()
            && self.float_scaler.is_none()
            && self.offset.is_none()
            && self.step.is_none()
    }
}

impl DecodeRecipe {
    /// Merges `overrides` into the default recipe, field by field, and sanitizes the result.
    pub fn merged(overrides: &ValueDecoderOverrides) -> Self {
        Self::default().merge(overrides)
    }

    /// Merges `overrides` into `self`, field by field, and sanitizes the result.
    pub fn merge(self, overrides: &ValueDecoderOverrides) -> Self {
        self.merge_raw(overrides).sanitized()
    }

    /// Merges `overrides` into `self` without sanitizing.
    pub fn merge_raw(self, overrides: &ValueDecoderOverrides) -> Self {
        Self {
            rgb_scaler: overrides.rgb_scaler.unwrap_or(self.rgb_scaler),
            float_scaler: overrides.float_scaler.unwrap_or(self.float_scaler),
            offset: overrides.offset.unwrap_or(self.offset),
            step: overrides.step.unwrap_or(self.step),
        }
    }

    /// Replaces malformed fields instead of failing.
    ///
    /// Non-finite scalers and offsets fall back to their defaults; a negative or non-finite
    /// step disables quantization. Runs on every merge, so it stays silent; see
    /// [`DecodeRecipe::malformed_fields`] for reporting.
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let mut out = self;
        for (scaler, default) in out.rgb_scaler.iter_mut().zip(defaults.rgb_scaler) {
            if !scaler.is_finite() {
                *scaler = default;
            }
        }
        if !out.float_scaler.is_finite() {
            out.float_scaler = defaults.float_scaler;
        }
        if !out.offset.is_finite() {
            out.offset = defaults.offset;
        }
        if !out.step.is_finite() || out.step < 0.0 {
            out.step = 0.0;
        }
        out
    }

    /// Names of the fields [`DecodeRecipe::sanitized`] would replace.
    pub fn malformed_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.rgb_scaler.iter().any(|s| !s.is_finite()) {
            fields.push("rgbScaler");
        }
        if !self.float_scaler.is_finite() {
            fields.push("floatScaler");
        }
        if !self.offset.is_finite() {
            fields.push("offset");
        }
        if !self.step.is_finite() || self.step < 0.0 {
            fields.push("step");
        }
        fields
    }

    /// Returns `true` when quantization is active.
    #[inline]
    pub fn quantizes(&self) -> bool {
        self.step > 0.0
    }
}
