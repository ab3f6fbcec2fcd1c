//! Shading pipeline: shader modules, uniforms, color maps and the hillshading stage.
pub mod colormap;
pub mod decoder;
pub mod hillshade;
pub mod module;
pub mod pipeline;
pub mod uniforms;

pub use colormap::ColorMap;
pub use hillshade::{shade_raster, shade_texel, HillshadeParams, HILLSHADING_FS};
pub use module::{ModuleParameters, ShaderModule, ShaderSet};
pub use pipeline::{extend_shaders, DrawCommand, HillshadingPipeline, ImagePrimitive};
pub use uniforms::{UniformValue, Uniforms};
