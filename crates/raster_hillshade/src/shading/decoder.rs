//! The `decoder` shader module: GLSL twin of [`crate::codec::decode_raw`].
use super::module::{ModuleParameters, ShaderModule};
use super::uniforms::Uniforms;

pub const MODULE_NAME: &str = "decoder";

const DECODER_GLSL: &str = include_str!("shaders/decoder.glsl");

/// Decoder module for injection into a fragment stage.
pub fn decoder_module() -> ShaderModule {
    ShaderModule::new(MODULE_NAME)
        .with_fs(DECODER_GLSL)
        .with_uniforms(decoder_uniforms)
}

fn decoder_uniforms(params: &ModuleParameters) -> Uniforms {
    let recipe = &params.value_decoder;
    Uniforms::new()
        .with("decoder_rgbScaler", recipe.rgb_scaler)
        .with("decoder_floatScaler", recipe.float_scaler)
        .with("decoder_offset", recipe.offset)
        .with("decoder_step", recipe.step)
}
