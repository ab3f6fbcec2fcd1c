//! The hillshading fragment stage and its CPU reference.
//!
//! Per texel the stage decodes the center value and its four direct neighbors, estimates the
//! surface normal from central differences, and lights a color-map sample with
//! `ambient + max(0, n·l) * diffuse`.
//!
//! Boundary policy: neighbor lookups clamp to the edge texel, so the outermost ring uses a
//! one-sided difference. Transparent neighbors are treated as level with the center; a
//! transparent center texel is discarded.
//!
//! [`shade_texel`] performs exactly the arithmetic of `hillshading2d.fs.glsl` (in double
//! precision) and is what software base primitives, tests and benches use.
use glam::DVec3;
use tracing::trace;

use super::colormap::ColorMap;
use super::uniforms::Uniforms;
use crate::codec::{decode_raw, DecodeRecipe, Rgba, ValueRange};
use crate::raster::EncodedRaster;

/// Fragment stage replacing the base primitive's fragment shader.
pub const HILLSHADING_FS: &str = include_str!("shaders/hillshading2d.fs.glsl");

/// Uniform names declared by [`HILLSHADING_FS`].
pub mod uniform_names {
    pub const BITMAP_RESOLUTION: &str = "bitmapResolution";
    pub const VALUE_RANGE_MIN: &str = "valueRangeMin";
    pub const VALUE_RANGE_MAX: &str = "valueRangeMax";
    pub const VALUE_RANGE_SIZE: &str = "valueRangeSize";
    pub const COLOR_MAP_RANGE_MIN: &str = "colorMapRangeMin";
    pub const COLOR_MAP_RANGE_MAX: &str = "colorMapRangeMax";
    pub const LIGHT_DIRECTION: &str = "lightDirection";
    pub const AMBIENT_LIGHT_INTENSITY: &str = "ambientLightIntensity";
    pub const DIFFUSE_LIGHT_INTENSITY: &str = "diffuseLightIntensity";
    pub const OPACITY: &str = "opacity";
    pub const MODEL_MATRIX: &str = "modelMatrix";
}

/// Everything the fragment stage needs besides the textures.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HillshadeParams {
    pub value_range: ValueRange,
    pub color_map_range: ValueRange,
    pub light_direction: DVec3,
    pub ambient_light_intensity: f64,
    pub diffuse_light_intensity: f64,
    pub opacity: f64,
    pub recipe: DecodeRecipe,
}

impl Default for HillshadeParams {
    fn default() -> Self {
        Self {
            value_range: ValueRange::default(),
            color_map_range: ValueRange::default(),
            light_direction: DVec3::ONE,
            ambient_light_intensity: 0.5,
            diffuse_light_intensity: 0.5,
            opacity: 1.0,
            recipe: DecodeRecipe::default(),
        }
    }
}

impl HillshadeParams {
    /// Physical value of an encoded texel.
    #[inline]
    pub fn property_of(&self, texel: Rgba) -> f64 {
        self.value_range
            .remap(decode_raw(texel.channels(), &self.recipe))
    }

    /// Stage uniforms for a raster of `resolution` texels.
    pub fn uniforms(&self, resolution: (u32, u32)) -> Uniforms {
        use uniform_names::*;
        let uniforms = Uniforms::new()
            .with(BITMAP_RESOLUTION, resolution)
            .with(VALUE_RANGE_MIN, self.value_range.min)
            .with(VALUE_RANGE_MAX, self.value_range.max)
            .with(VALUE_RANGE_SIZE, self.value_range.size())
            .with(COLOR_MAP_RANGE_MIN, self.color_map_range.min)
            .with(COLOR_MAP_RANGE_MAX, self.color_map_range.max)
            .with(LIGHT_DIRECTION, self.light_direction.to_array())
            .with(AMBIENT_LIGHT_INTENSITY, self.ambient_light_intensity)
            .with(DIFFUSE_LIGHT_INTENSITY, self.diffuse_light_intensity)
            .with(OPACITY, self.opacity);
        trace!(count = uniforms.len(), "assembled hillshading uniforms");
        uniforms
    }

    /// Reads the stage uniforms back, e.g. inside a software base primitive.
    ///
    /// Returns `None` if any required uniform is missing or has the wrong type.
    pub fn from_uniforms(uniforms: &Uniforms, recipe: DecodeRecipe) -> Option<Self> {
        use uniform_names::*;
        let f = |name: &str| uniforms.float(name).map(f64::from);
        let light = uniforms.get(LIGHT_DIRECTION)?.as_vec3()?;
        Some(Self {
            value_range: ValueRange::new(f(VALUE_RANGE_MIN)?, f(VALUE_RANGE_MAX)?),
            color_map_range: ValueRange::new(f(COLOR_MAP_RANGE_MIN)?, f(COLOR_MAP_RANGE_MAX)?),
            light_direction: DVec3::new(light[0] as f64, light[1] as f64, light[2] as f64),
            ambient_light_intensity: f(AMBIENT_LIGHT_INTENSITY)?,
            diffuse_light_intensity: f(DIFFUSE_LIGHT_INTENSITY)?,
            opacity: f(OPACITY).unwrap_or(1.0),
            recipe,
        })
    }
}

/// Shades one texel. `None` means the fragment is discarded (no data).
pub fn shade_texel(
    raster: &EncodedRaster,
    ix: i64,
    iy: i64,
    params: &HillshadeParams,
    color_map: &ColorMap,
) -> Option<Rgba> {
    let center = raster.texel(ix, iy);
    if center.is_transparent() {
        return None;
    }

    let value = params.property_of(center);
    let neighbor = |dx: i64, dy: i64| {
        let texel = raster.texel(ix + dx, iy + dy);
        if texel.is_transparent() {
            value
        } else {
            params.property_of(texel)
        }
    };

    let dzdx = (neighbor(1, 0) - neighbor(-1, 0)) * 0.5;
    // Rows grow southwards, so north is `iy - 1`.
    let dzdy = (neighbor(0, -1) - neighbor(0, 1)) * 0.5;
    let normal = DVec3::new(-dzdx, -dzdy, 1.0).normalize_or(DVec3::Z);

    let light = params.light_direction.normalize_or_zero();
    let diffuse = normal.dot(light).max(0.0) * params.diffuse_light_intensity;
    let shade = params.ambient_light_intensity + diffuse;

    let base = color_map.sample(params.color_map_range.normalize(value));
    let lit = |c: u8| to_byte(c as f64 / 255.0 * shade);
    Some(Rgba::new(
        lit(base.r),
        lit(base.g),
        lit(base.b),
        to_byte(base.a as f64 / 255.0 * params.opacity),
    ))
}

/// Shades every texel of `raster`. Discarded texels come out transparent.
pub fn shade_raster(
    raster: &EncodedRaster,
    params: &HillshadeParams,
    color_map: &ColorMap,
) -> EncodedRaster {
    EncodedRaster::from_fn(raster.width(), raster.height(), |x, y| {
        shade_texel(raster, x as i64, y as i64, params, color_map).unwrap_or(Rgba::TRANSPARENT)
    })
}

#[inline]
fn to_byte(v: f64) -> u8 {
    if v.is_nan() {
        return 0;
    }
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::encode_value;

    fn raster_from_values(
        w: u32,
        h: u32,
        range: ValueRange,
        f: impl Fn(u32, u32) -> f64,
    ) -> EncodedRaster {
        let recipe = DecodeRecipe::default();
        EncodedRaster::from_fn(w, h, |x, y| encode_value(f(x, y), &recipe, &range))
    }

    fn white() -> ColorMap {
        ColorMap::new(vec![Rgba::rgb(255, 255, 255)])
    }

    #[test]
    fn flat_surface_lit_from_above_is_fully_lit() {
        let range = ValueRange::new(0.0, 10.0);
        let raster = raster_from_values(4, 4, range, |_, _| 3.0);
        let params = HillshadeParams {
            value_range: range,
            color_map_range: range,
            light_direction: DVec3::Z,
            ambient_light_intensity: 0.25,
            diffuse_light_intensity: 0.5,
            ..Default::default()
        };
        let c = shade_texel(&raster, 1, 1, &params, &white()).expect("opaque");
        // 0.25 + 1.0 * 0.5
        assert_eq!(c, Rgba::rgb(191, 191, 191));
    }

    #[test]
    fn slope_facing_the_light_is_brighter() {
        let range = ValueRange::new(0.0, 100.0);
        // Height rises towards the east.
        let raster = raster_from_values(5, 1, range, |x, _| x as f64 * 10.0);
        let towards = HillshadeParams {
            value_range: range,
            color_map_range: range,
            light_direction: DVec3::new(-1.0, 0.0, 1.0),
            ..Default::default()
        };
        let away = HillshadeParams {
            light_direction: DVec3::new(1.0, 0.0, 1.0),
            ..towards
        };
        let lit = shade_texel(&raster, 2, 0, &towards, &white()).expect("opaque");
        let shadowed = shade_texel(&raster, 2, 0, &away, &white()).expect("opaque");
        assert!(lit.r > shadowed.r, "{lit:?} vs {shadowed:?}");
    }

    #[test]
    fn transparent_center_is_discarded() {
        let raster = EncodedRaster::from_fn(2, 2, |x, _| {
            if x == 0 {
                Rgba::TRANSPARENT
            } else {
                Rgba::rgb(0, 0, 1)
            }
        });
        let params = HillshadeParams::default();
        assert_eq!(shade_texel(&raster, 0, 0, &params, &white()), None);
        assert!(shade_texel(&raster, 1, 0, &params, &white()).is_some());
    }

    #[test]
    fn degenerate_range_stays_finite_and_reads_lowest_color() {
        let range = ValueRange::new(5.0, 5.0);
        let raster = EncodedRaster::from_fn(3, 3, |x, y| Rgba::rgb(x as u8 * 90, y as u8 * 40, 3));
        let params = HillshadeParams {
            value_range: range,
            color_map_range: range,
            ..Default::default()
        };
        assert_eq!(params.property_of(raster.texel(2, 2)), 5.0);
        let cm = ColorMap::new(vec![Rgba::rgb(10, 20, 30), Rgba::rgb(250, 250, 250)]);
        let c = shade_texel(&raster, 1, 1, &params, &cm).expect("opaque");
        let expected_shade = 0.5 + 0.5 / 3f64.sqrt();
        assert_eq!(c.r, to_byte(10.0 / 255.0 * expected_shade));
        assert_eq!(c.a, 255);
    }

    #[test]
    fn zero_light_direction_leaves_ambient_only() {
        let range = ValueRange::new(0.0, 1.0);
        let raster = raster_from_values(2, 2, range, |_, _| 0.5);
        let params = HillshadeParams {
            light_direction: DVec3::ZERO,
            ambient_light_intensity: 0.4,
            ..Default::default()
        };
        let c = shade_texel(&raster, 0, 0, &params, &white()).expect("opaque");
        assert_eq!(c.r, to_byte(0.4));
    }

    #[test]
    fn edges_clamp_instead_of_wrapping() {
        let range = ValueRange::new(0.0, 100.0);
        let raster = raster_from_values(3, 1, range, |x, _| [0.0, 0.0, 90.0][x as usize]);
        let params = HillshadeParams {
            value_range: range,
            color_map_range: range,
            light_direction: DVec3::Z,
            ..Default::default()
        };
        // The west edge only sees its eastern neighbor, which is level with it.
        let west = shade_texel(&raster, 0, 0, &params, &white()).expect("opaque");
        assert_eq!(west, Rgba::rgb(255, 255, 255));
    }

    #[test]
    fn uniforms_round_trip_through_reader() {
        let params = HillshadeParams {
            value_range: ValueRange::new(-2.0, 6.0),
            color_map_range: ValueRange::new(0.0, 4.0),
            light_direction: DVec3::new(1.0, 2.0, 3.0),
            ambient_light_intensity: 0.25,
            diffuse_light_intensity: 0.75,
            opacity: 0.5,
            recipe: DecodeRecipe::default(),
        };
        let uniforms = params.uniforms((8, 4));
        assert_eq!(uniforms.float(uniform_names::VALUE_RANGE_SIZE), Some(8.0));
        assert_eq!(
            uniforms
                .get(uniform_names::BITMAP_RESOLUTION)
                .and_then(|v| v.as_vec2()),
            Some([8.0, 4.0])
        );
        let back = HillshadeParams::from_uniforms(&uniforms, params.recipe).expect("complete");
        assert_eq!(back, params);
    }

    #[test]
    fn fragment_source_declares_stage_uniforms() {
        for (name, _) in HillshadeParams::default().uniforms((1, 1)).iter() {
            assert!(HILLSHADING_FS.contains(name), "{name} not declared");
        }
    }

    #[test]
    fn shade_raster_keeps_dimensions() {
        let raster = EncodedRaster::from_fn(3, 2, |_, _| Rgba::rgb(0, 0, 0));
        let shaded = shade_raster(&raster, &HillshadeParams::default(), &white());
        assert_eq!(shaded.resolution(), (3, 2));
    }
}
