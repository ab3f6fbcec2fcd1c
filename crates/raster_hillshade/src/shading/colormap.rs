//! One-dimensional color maps used to color the decoded property values.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::codec::Rgba;

/// Color lookup table, bound to the fragment stage as a `width × 1` texture.
///
/// Lookups use nearest-entry sampling with clamping at both ends.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct ColorMap {
    entries: Vec<Rgba>,
}

impl ColorMap {
    /// Builds a color map from explicit entries. An empty list yields [`ColorMap::grayscale`].
    pub fn new(entries: Vec<Rgba>) -> Self {
        if entries.is_empty() {
            return Self::grayscale();
        }
        Self { entries }
    }

    /// 256-entry ramp from black to white.
    pub fn grayscale() -> Self {
        Self {
            entries: (0..=255u8).map(|v| Rgba::rgb(v, v, v)).collect(),
        }
    }

    /// Linear interpolation between `stops` (`(position, color)` with positions in `[0, 1]`),
    /// sampled into `size` entries.
    pub fn from_stops(stops: &[(f64, Rgba)], size: usize) -> Self {
        if stops.is_empty() || size == 0 {
            return Self::grayscale();
        }
        let mut stops = stops.to_vec();
        stops.sort_by(|a, b| a.0.total_cmp(&b.0));

        let entries = (0..size)
            .map(|i| {
                let t = if size > 1 {
                    i as f64 / (size - 1) as f64
                } else {
                    0.0
                };
                interpolate(&stops, t)
            })
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Rgba] {
        &self.entries
    }

    /// Entry nearest to `t ∈ [0, 1]`. Non-finite positions read the first entry.
    pub fn sample(&self, t: f64) -> Rgba {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let last = self.entries.len().saturating_sub(1);
        let idx = ((t * last as f64).round() as usize).min(last);
        self.entries.get(idx).copied().unwrap_or(Rgba::TRANSPARENT)
    }
}

impl Default for ColorMap {
    fn default() -> Self {
        Self::grayscale()
    }
}

fn interpolate(stops: &[(f64, Rgba)], t: f64) -> Rgba {
    let first = stops[0];
    let last = stops[stops.len() - 1];
    if t <= first.0 {
        return first.1;
    }
    if t >= last.0 {
        return last.1;
    }
    for pair in stops.windows(2) {
        let (t0, c0) = pair[0];
        let (t1, c1) = pair[1];
        if t >= t0 && t <= t1 {
            let f = if t1 > t0 { (t - t0) / (t1 - t0) } else { 0.0 };
            let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * f).round() as u8;
            return Rgba::new(
                lerp(c0.r, c1.r),
                lerp(c0.g, c1.g),
                lerp(c0.b, c1.b),
                lerp(c0.a, c1.a),
            );
        }
    }
    last.1
}
