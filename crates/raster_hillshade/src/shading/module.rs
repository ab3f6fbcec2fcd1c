//! Shader modules and shader sets.
//!
//! A [`ShaderSet`] is a vertex stage, a fragment stage and an ordered list of
//! [`ShaderModule`]s. Modules are injected into the stage sources at assembly time, in list
//! order, right after the `#version` directive. Extending a base primitive's program means
//! building a new set from its shaders; the base set itself is never mutated.
use std::borrow::Cow;

use glam::DMat4;

use super::uniforms::Uniforms;
use crate::codec::DecodeRecipe;

/// Per-draw parameters consumed by shader modules.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModuleParameters {
    /// Fully merged decode recipe.
    pub value_decoder: DecodeRecipe,
    /// Model transform applied to the raster quad.
    pub model_matrix: DMat4,
}

impl Default for ModuleParameters {
    fn default() -> Self {
        Self {
            value_decoder: DecodeRecipe::default(),
            model_matrix: DMat4::IDENTITY,
        }
    }
}

/// Maps module parameters to the uniforms a module declares.
pub type UniformProvider = fn(&ModuleParameters) -> Uniforms;

/// A named piece of GLSL injected into one or both stages.
#[derive(Clone, Debug)]
pub struct ShaderModule {
    pub name: &'static str,
    pub vs: Option<&'static str>,
    pub fs: Option<&'static str>,
    uniforms: Option<UniformProvider>,
}

impl ShaderModule {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            vs: None,
            fs: None,
            uniforms: None,
        }
    }

    pub fn with_vs(mut self, source: &'static str) -> Self {
        self.vs = Some(source);
        self
    }

    pub fn with_fs(mut self, source: &'static str) -> Self {
        self.fs = Some(source);
        self
    }

    pub fn with_uniforms(mut self, provider: UniformProvider) -> Self {
        self.uniforms = Some(provider);
        self
    }

    /// Uniforms for this module derived from `params`. Empty when the module declares none.
    pub fn get_uniforms(&self, params: &ModuleParameters) -> Uniforms {
        self.uniforms.map(|f| f(params)).unwrap_or_default()
    }
}

/// Vertex and fragment stages plus the modules injected into them.
#[derive(Clone, Debug)]
pub struct ShaderSet {
    pub vs: Cow<'static, str>,
    pub fs: Cow<'static, str>,
    pub modules: Vec<ShaderModule>,
}

impl ShaderSet {
    pub fn new(vs: impl Into<Cow<'static, str>>, fs: impl Into<Cow<'static, str>>) -> Self {
        Self {
            vs: vs.into(),
            fs: fs.into(),
            modules: Vec::new(),
        }
    }

    /// Replaces the fragment stage.
    pub fn with_fragment(mut self, fs: impl Into<Cow<'static, str>>) -> Self {
        self.fs = fs.into();
        self
    }

    /// Appends a module. A module whose name is already present is not added twice.
    pub fn with_module(mut self, module: ShaderModule) -> Self {
        if !self.has_module(module.name) {
            self.modules.push(module);
        }
        self
    }

    pub fn has_module(&self, name: &str) -> bool {
        self.modules.iter().any(|m| m.name == name)
    }

    pub fn module_names(&self) -> Vec<&'static str> {
        self.modules.iter().map(|m| m.name).collect()
    }

    /// Final vertex source with module vertex code injected.
    pub fn assemble_vertex(&self) -> String {
        assemble(&self.vs, self.modules.iter().filter_map(|m| m.vs.map(|s| (m.name, s))))
    }

    /// Final fragment source with module fragment code injected.
    pub fn assemble_fragment(&self) -> String {
        assemble(&self.fs, self.modules.iter().filter_map(|m| m.fs.map(|s| (m.name, s))))
    }

    /// Uniforms of every module for `params`, merged in module order.
    pub fn module_uniforms(&self, params: &ModuleParameters) -> Uniforms {
        let mut out = Uniforms::new();
        for module in &self.modules {
            out.merge(&module.get_uniforms(params));
        }
        out
    }
}

fn assemble<'a>(stage: &str, injections: impl Iterator<Item = (&'a str, &'a str)>) -> String {
    let (header, body) = split_version_header(stage);

    let mut out = String::with_capacity(stage.len() + 256);
    if !header.is_empty() {
        out.push_str(header);
        out.push('\n');
    }
    for (name, source) in injections {
        out.push_str("// module: ");
        out.push_str(name);
        out.push('\n');
        out.push_str("#define MODULE_");
        out.push_str(&name.to_ascii_uppercase());
        out.push('\n');
        out.push_str(source.trim_end());
        out.push('\n');
    }
    out.push_str(body);
    out
}

/// Splits off a leading `#version` line, which GLSL requires to come first.
fn split_version_header(stage: &str) -> (&str, &str) {
    let trimmed = stage.trim_start();
    if trimmed.starts_with("#version") {
        match trimmed.find('\n') {
            Some(end) => (&trimmed[..end], &trimmed[end + 1..]),
            None => (trimmed, ""),
        }
    } else {
        ("", stage)
    }
}
