//! Picking results.
use glam::Vec2;

use crate::codec::Rgba;

/// Result of a pick query against a raster layer.
#[derive(Clone, Debug, PartialEq)]
pub struct PickResult {
    /// Always `0`: a raster has no discrete sub-objects.
    pub index: usize,
    /// Decoded value under the pointer, `None` over background or empty space.
    pub property_value: Option<f64>,
    /// Raw encoded color returned by the hit test.
    pub color: Option<Rgba>,
    /// Screen point that was queried.
    pub pixel: Vec2,
    /// Id of the picked layer.
    pub layer_id: String,
}

impl PickResult {
    /// A pick that hit nothing.
    pub fn empty(layer_id: impl Into<String>, pixel: Vec2) -> Self {
        Self {
            index: 0,
            property_value: None,
            color: None,
            pixel,
            layer_id: layer_id.into(),
        }
    }

    /// Returns `true` when a value was decoded.
    pub fn has_value(&self) -> bool {
        self.property_value.is_some()
    }
}
