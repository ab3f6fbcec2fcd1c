use raster_hillshade::prelude::*;

/// Synthetic property surface: a diagonal ridge next to a round basin, in `[0, 1]`.
/// `None` marks a no-data notch in the lower-right corner.
pub fn ridge_and_basin(x: u32, y: u32, width: u32, height: u32) -> Option<f64> {
    let u = x as f64 / width.max(1) as f64;
    let v = y as f64 / height.max(1) as f64;
    if u > 0.85 && v > 0.85 {
        return None;
    }
    let ridge = (-((u - v) * 6.0).powi(2)).exp();
    let d = ((u - 0.3).powi(2) + (v - 0.7).powi(2)).sqrt();
    let basin = 0.5 * (-(d * 8.0).powi(2)).exp();
    Some((0.35 + 0.5 * ridge - basin).clamp(0.0, 1.0))
}

/// Encodes `surface` (values in `[0, 1]`) mapped onto `range` with the default recipe.
pub fn encode_terrain(
    width: u32,
    height: u32,
    range: ValueRange,
    surface: impl Fn(u32, u32, u32, u32) -> Option<f64>,
) -> EncodedRaster {
    let recipe = DecodeRecipe::default();
    EncodedRaster::from_fn(width, height, |x, y| match surface(x, y, width, height) {
        Some(t) => encode_value(range.min + t * range.size(), &recipe, &range),
        None => Rgba::TRANSPARENT,
    })
}

/// Blue-green-brown-white ramp.
pub fn terrain_color_map() -> ColorMap {
    ColorMap::from_stops(
        &[
            (0.0, Rgba::rgb(32, 72, 160)),
            (0.35, Rgba::rgb(64, 150, 90)),
            (0.7, Rgba::rgb(150, 110, 60)),
            (1.0, Rgba::rgb(245, 245, 245)),
        ],
        256,
    )
}
