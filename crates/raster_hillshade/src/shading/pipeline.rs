//! The hillshading pipeline: a decorator around a base image primitive.
//!
//! The base primitive owns GPU resources, the vertex stage and hit testing. The pipeline
//! swaps in the hillshading fragment stage, appends the `decoder` module, and merges the
//! uniforms for each draw. It never mutates the base primitive's own shader set.
use mint::Point2;
use tracing::debug;

use super::colormap::ColorMap;
use super::decoder::decoder_module;
use super::hillshade::{uniform_names, HILLSHADING_FS};
use super::module::{ModuleParameters, ShaderSet};
use super::uniforms::Uniforms;
use crate::codec::Rgba;
use crate::error::Result;
use crate::raster::EncodedRaster;

/// Everything a base primitive receives for one draw.
#[derive(Clone, Copy, Debug)]
pub struct DrawCommand<'a> {
    /// Extended shader set to draw with.
    pub shaders: &'a ShaderSet,
    /// Fully merged uniforms (frame, module and layer uniforms).
    pub uniforms: &'a Uniforms,
    pub module_parameters: &'a ModuleParameters,
    /// Encoded raster bound as `bitmapTexture`.
    pub image: &'a EncodedRaster,
    /// Color map bound as `colormap`.
    pub color_map: &'a ColorMap,
}

/// Capability interface of a base image-rendering primitive.
pub trait ImagePrimitive {
    /// The primitive's own shader program.
    fn shaders(&self) -> ShaderSet;

    /// Submits one draw.
    fn draw(&mut self, command: DrawCommand<'_>) -> Result<()>;

    /// Raw (unshaded) encoded color under a screen point from the last completed draw.
    fn hit_test(&self, screen: Point2<f32>) -> Option<Rgba>;
}

impl<P: ImagePrimitive + ?Sized> ImagePrimitive for Box<P> {
    fn shaders(&self) -> ShaderSet {
        (**self).shaders()
    }

    fn draw(&mut self, command: DrawCommand<'_>) -> Result<()> {
        (**self).draw(command)
    }

    fn hit_test(&self, screen: Point2<f32>) -> Option<Rgba> {
        (**self).hit_test(screen)
    }
}

/// Builds the hillshading program from a base program.
pub fn extend_shaders(base: ShaderSet) -> ShaderSet {
    base.with_fragment(HILLSHADING_FS).with_module(decoder_module())
}

/// Hillshading decorator around a base primitive.
pub struct HillshadingPipeline<P> {
    base: P,
    shaders: ShaderSet,
}

impl<P: ImagePrimitive> HillshadingPipeline<P> {
    pub fn new(base: P) -> Self {
        let shaders = extend_shaders(base.shaders());
        Self { base, shaders }
    }

    /// The extended shader set.
    pub fn shaders(&self) -> &ShaderSet {
        &self.shaders
    }

    pub fn base(&self) -> &P {
        &self.base
    }

    pub fn base_mut(&mut self) -> &mut P {
        &mut self.base
    }

    pub fn into_inner(self) -> P {
        self.base
    }

    /// Draws `image` with the merged uniforms. Returns `Ok(false)` without drawing when no
    /// image is bound.
    ///
    /// Merge order (later wins per name): frame uniforms, module uniforms, layer uniforms,
    /// then `modelMatrix` from `params`.
    pub fn draw(
        &mut self,
        frame_uniforms: &Uniforms,
        layer_uniforms: &Uniforms,
        params: &ModuleParameters,
        image: Option<&EncodedRaster>,
        color_map: &ColorMap,
    ) -> Result<bool> {
        let Some(image) = image else {
            debug!("No image bound; skipping draw.");
            return Ok(false);
        };

        let mut uniforms = frame_uniforms.clone();
        uniforms.merge(&self.shaders.module_uniforms(params));
        uniforms.merge(layer_uniforms);
        uniforms.set(uniform_names::MODEL_MATRIX, params.model_matrix);

        self.base.draw(DrawCommand {
            shaders: &self.shaders,
            uniforms: &uniforms,
            module_parameters: params,
            image,
            color_map,
        })?;
        Ok(true)
    }

    /// Delegates to the base primitive's hit test.
    pub fn hit_test(&self, screen: Point2<f32>) -> Option<Rgba> {
        self.base.hit_test(screen)
    }
}
