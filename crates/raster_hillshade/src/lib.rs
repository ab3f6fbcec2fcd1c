#![forbid(unsafe_code)]
//! raster_hillshade: property-map raster layer with shader-computed hillshading and picking.
//!
//! Modules:
//! - codec: RGB-encoded value decoding (decode recipes, value ranges, inverse encoding)
//! - raster: immutable encoded texel grids with clamp-to-edge addressing
//! - transform: anchor-corner rotation matrices and bounding boxes
//! - shading: shader modules, uniforms, color maps, the hillshading pipeline and its CPU reference
//! - layer: the layer façade, props, picking, events and the layer-property channel
pub mod codec;
pub mod error;
pub mod layer;
pub mod raster;
pub mod shading;
pub mod transform;

/// Convenient re-exports for common types. Import with `use raster_hillshade::prelude::*;`.
pub mod prelude {
    pub use crate::codec::{
        decode_color, decode_raw, decode_rgb, encode_value, DecodeRecipe, Rgba,
        ValueDecoderOverrides, ValueRange,
    };
    pub use crate::error::{Error, Result};
    pub use crate::layer::events::{EventSink, FnSink, LayerEvent, SkipReason, VecSink};
    pub use crate::layer::pick::PickResult;
    pub use crate::layer::props::{Hillshading2DProps, PropertyValue};
    pub use crate::layer::registry::{LayerRegistry, LayerUpdate};
    pub use crate::layer::{FrameContext, FrameOutcome, Hillshading2DLayer};
    pub use crate::raster::{EncodedRaster, TexelFormat};
    pub use crate::shading::colormap::ColorMap;
    pub use crate::shading::hillshade::{shade_raster, shade_texel, HillshadeParams};
    pub use crate::shading::module::{ModuleParameters, ShaderModule, ShaderSet};
    pub use crate::shading::pipeline::{DrawCommand, HillshadingPipeline, ImagePrimitive};
    pub use crate::shading::uniforms::{UniformValue, Uniforms};
    pub use crate::transform::{model_matrix, rotated_bounds, BoundingBox, Bounds};
}
