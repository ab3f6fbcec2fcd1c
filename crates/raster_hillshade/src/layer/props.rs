//! Layer configuration and the per-property update channel.
//!
//! [`Hillshading2DProps`] is always fully populated; its [`Default`] holds the documented
//! layer defaults. [`Hillshading2DProps::set_property`] applies a single named update, using
//! the camelCase option names of the configuration surface.
use glam::DVec3;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::codec::{DecodeRecipe, ValueDecoderOverrides, ValueRange};
use crate::error::{Error, Result};
use crate::shading::colormap::ColorMap;
use crate::shading::hillshade::HillshadeParams;
use crate::transform::Bounds;

/// A dynamically typed property value delivered by a layer-property store.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
#[derive(Clone, Debug, PartialEq)]
pub enum PropertyValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    Numbers(Vec<f64>),
    /// `[x, y]` pairs, e.g. bounds given as corner points.
    Points(Vec<[f64; 2]>),
    /// A whole `valueDecoder` object.
    Decoder(ValueDecoderOverrides),
}

impl From<bool> for PropertyValue {
    fn from(v: bool) -> Self {
        PropertyValue::Bool(v)
    }
}

impl From<f64> for PropertyValue {
    fn from(v: f64) -> Self {
        PropertyValue::Number(v)
    }
}

impl From<&str> for PropertyValue {
    fn from(v: &str) -> Self {
        PropertyValue::Text(v.to_owned())
    }
}

impl From<String> for PropertyValue {
    fn from(v: String) -> Self {
        PropertyValue::Text(v)
    }
}

impl From<Vec<f64>> for PropertyValue {
    fn from(v: Vec<f64>) -> Self {
        PropertyValue::Numbers(v)
    }
}

impl<const N: usize> From<[f64; N]> for PropertyValue {
    fn from(v: [f64; N]) -> Self {
        PropertyValue::Numbers(v.to_vec())
    }
}

impl From<Vec<[f64; 2]>> for PropertyValue {
    fn from(v: Vec<[f64; 2]>) -> Self {
        PropertyValue::Points(v)
    }
}

impl<const N: usize> From<[[f64; 2]; N]> for PropertyValue {
    fn from(v: [[f64; 2]; N]) -> Self {
        PropertyValue::Points(v.to_vec())
    }
}

impl From<ValueDecoderOverrides> for PropertyValue {
    fn from(v: ValueDecoderOverrides) -> Self {
        PropertyValue::Decoder(v)
    }
}

/// Configuration of a [`crate::layer::Hillshading2DLayer`].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq)]
pub struct Hillshading2DProps {
    /// Unique layer id used by the property store.
    pub id: String,
    /// Display name.
    pub name: String,
    pub visible: bool,
    pub pickable: bool,
    /// Multiplies the alpha of every shaded texel.
    pub opacity: f64,
    /// Geographic bounds of the raster.
    pub bounds: Bounds,
    /// Physical range the codec value is mapped onto.
    pub value_range: ValueRange,
    /// Range used for the color-map lookup. Falls back to `value_range`.
    pub color_map_range: Option<ValueRange>,
    /// Direction the light comes from.
    pub light_direction: [f64; 3],
    /// Light applied uniformly to the whole map.
    pub ambient_light_intensity: f64,
    /// Light applied to the lit portions of the map.
    pub diffuse_light_intensity: f64,
    /// Per-field overrides of the default decode recipe.
    pub value_decoder: ValueDecoderOverrides,
    /// Counter-clockwise rotation in degrees about the upper-left bounds corner.
    pub rot_deg: f64,
    pub color_map: ColorMap,
}

impl Default for Hillshading2DProps {
    fn default() -> Self {
        Self {
            id: "hillshading-layer".to_owned(),
            name: "Hill shading".to_owned(),
            visible: true,
            pickable: true,
            opacity: 1.0,
            bounds: Bounds::default(),
            value_range: ValueRange::default(),
            color_map_range: None,
            light_direction: [1.0, 1.0, 1.0],
            ambient_light_intensity: 0.5,
            diffuse_light_intensity: 0.5,
            value_decoder: ValueDecoderOverrides::default(),
            rot_deg: 0.0,
            color_map: ColorMap::grayscale(),
        }
    }
}

impl Hillshading2DProps {
    /// Default props with the given layer id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn with_value_range(mut self, min: f64, max: f64) -> Self {
        self.value_range = ValueRange::new(min, max);
        self
    }

    pub fn with_color_map_range(mut self, min: f64, max: f64) -> Self {
        self.color_map_range = Some(ValueRange::new(min, max));
        self
    }

    pub fn with_light_direction(mut self, direction: [f64; 3]) -> Self {
        self.light_direction = direction;
        self
    }

    pub fn with_light_intensities(mut self, ambient: f64, diffuse: f64) -> Self {
        self.ambient_light_intensity = ambient;
        self.diffuse_light_intensity = diffuse;
        self
    }

    pub fn with_value_decoder(mut self, overrides: ValueDecoderOverrides) -> Self {
        self.value_decoder = overrides;
        self
    }

    pub fn with_rot_deg(mut self, rot_deg: f64) -> Self {
        self.rot_deg = rot_deg;
        self
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn with_pickable(mut self, pickable: bool) -> Self {
        self.pickable = pickable;
        self
    }

    pub fn with_color_map(mut self, color_map: ColorMap) -> Self {
        self.color_map = color_map;
        self
    }

    /// Checks the structural constraints. Value-range ordering is not checked.
    pub fn validate(&self) -> Result<()> {
        if !self.bounds.is_finite() {
            return Err(Error::InvalidConfig("bounds must be finite".into()));
        }
        if !self.rot_deg.is_finite() {
            return Err(Error::InvalidConfig("rotDeg must be finite".into()));
        }
        Ok(())
    }

    /// Color-map range, falling back to the value range when unset.
    pub fn effective_color_map_range(&self) -> ValueRange {
        self.color_map_range.unwrap_or(self.value_range)
    }

    /// Default recipe merged with this layer's overrides.
    pub fn decode_recipe(&self) -> DecodeRecipe {
        DecodeRecipe::merged(&self.value_decoder)
    }

    /// Decoder override fields that [`Hillshading2DProps::decode_recipe`] replaces by defaults.
    pub fn malformed_decoder_fields(&self) -> Vec<&'static str> {
        DecodeRecipe::default()
            .merge_raw(&self.value_decoder)
            .malformed_fields()
    }

    /// Fragment-stage parameters for the current configuration.
    pub fn hillshade_params(&self) -> HillshadeParams {
        HillshadeParams {
            value_range: self.value_range,
            color_map_range: self.effective_color_map_range(),
            light_direction: DVec3::from_array(self.light_direction),
            ambient_light_intensity: self.ambient_light_intensity,
            diffuse_light_intensity: self.diffuse_light_intensity,
            opacity: self.opacity,
            recipe: self.decode_recipe(),
        }
    }

    /// Applies a single named property update.
    ///
    /// Recognized names: `visible`, `pickable`, `opacity`, `name`, `bounds` (4 values or 4
    /// corner points), `valueRange`, `colorMapRange` (`Null` unsets it), `lightDirection`,
    /// `ambientLightIntensity`, `diffuseLightIntensity`, `rotDeg`, `valueDecoder` (a whole
    /// [`ValueDecoderOverrides`]; `Null` clears it) and
    /// `valueDecoder.{rgbScaler,floatScaler,offset,step}` (`Null` unsets a decoder field).
    /// The props are left unchanged when the update fails.
    pub fn set_property(&mut self, name: &str, value: PropertyValue) -> Result<()> {
        match name {
            "visible" => self.visible = expect_bool(name, &value)?,
            "pickable" => self.pickable = expect_bool(name, &value)?,
            "opacity" => self.opacity = expect_number(name, &value)?,
            "name" => match value {
                PropertyValue::Text(text) => self.name = text,
                _ => return Err(type_error(name, "text")),
            },
            "bounds" => {
                self.bounds = match &value {
                    PropertyValue::Points(corners) => Bounds::from_corners(corners)?,
                    v => Bounds::from_slice(expect_numbers(name, v)?)?,
                }
            }
            "valueRange" => self.value_range = expect_array::<2>(name, &value)?.into(),
            "colorMapRange" => {
                self.color_map_range = match value {
                    PropertyValue::Null => None,
                    ref v => Some(expect_array::<2>(name, v)?.into()),
                }
            }
            "lightDirection" => self.light_direction = expect_array::<3>(name, &value)?,
            "ambientLightIntensity" => {
                self.ambient_light_intensity = expect_number(name, &value)?
            }
            "diffuseLightIntensity" => {
                self.diffuse_light_intensity = expect_number(name, &value)?
            }
            "rotDeg" => {
                let rot = expect_number(name, &value)?;
                if !rot.is_finite() {
                    return Err(Error::InvalidConfig("rotDeg must be finite".into()));
                }
                self.rot_deg = rot;
            }
            "valueDecoder" => {
                self.value_decoder = match value {
                    PropertyValue::Null => ValueDecoderOverrides::default(),
                    PropertyValue::Decoder(overrides) => overrides,
                    _ => return Err(type_error(name, "a value decoder object")),
                }
            }
            "valueDecoder.rgbScaler" => {
                self.value_decoder.rgb_scaler = optional(&value, |v| expect_array::<3>(name, v))?
            }
            "valueDecoder.floatScaler" => {
                self.value_decoder.float_scaler = optional(&value, |v| expect_number(name, v))?
            }
            "valueDecoder.offset" => {
                self.value_decoder.offset = optional(&value, |v| expect_number(name, v))?
            }
            "valueDecoder.step" => {
                self.value_decoder.step = optional(&value, |v| expect_number(name, v))?
            }
            _ => {
                return Err(Error::UnknownProperty {
                    name: name.to_owned(),
                })
            }
        }
        Ok(())
    }
}

fn type_error(name: &str, expected: &'static str) -> Error {
    Error::PropertyType {
        name: name.to_owned(),
        expected,
    }
}

fn expect_bool(name: &str, value: &PropertyValue) -> Result<bool> {
    match value {
        PropertyValue::Bool(b) => Ok(*b),
        _ => Err(type_error(name, "a boolean")),
    }
}

fn expect_number(name: &str, value: &PropertyValue) -> Result<f64> {
    match value {
        PropertyValue::Number(n) => Ok(*n),
        _ => Err(type_error(name, "a number")),
    }
}

fn expect_numbers<'a>(name: &str, value: &'a PropertyValue) -> Result<&'a [f64]> {
    match value {
        PropertyValue::Numbers(values) => Ok(values),
        _ => Err(type_error(name, "a list of numbers")),
    }
}

fn expect_array<const N: usize>(name: &str, value: &PropertyValue) -> Result<[f64; N]> {
    let values = expect_numbers(name, value)?;
    <[f64; N]>::try_from(values).map_err(|_| {
        type_error(
            name,
            match N {
                2 => "2 numbers",
                3 => "3 numbers",
                _ => "a fixed-size list of numbers",
            },
        )
    })
}

fn optional<T>(
    value: &PropertyValue,
    parse: impl FnOnce(&PropertyValue) -> Result<T>,
) -> Result<Option<T>> {
    match value {
        PropertyValue::Null => Ok(None),
        v => parse(v).map(Some),
    }
}
