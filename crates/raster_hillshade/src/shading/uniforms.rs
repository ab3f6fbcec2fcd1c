//! Named shader uniforms.
//!
//! [`Uniforms`] is an ordered name → value map. Merging is shallow: a key present in the
//! overriding set replaces the whole value, every other key is kept.
use std::collections::BTreeMap;

use glam::{DMat4, Mat4};

/// A single uniform value, in the precision the GPU receives it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Int(i32),
    Vec2([f32; 2]),
    Vec3([f32; 3]),
    Mat4([f32; 16]),
}

impl UniformValue {
    pub fn as_float(&self) -> Option<f32> {
        match self {
            UniformValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_vec2(&self) -> Option<[f32; 2]> {
        match self {
            UniformValue::Vec2(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_vec3(&self) -> Option<[f32; 3]> {
        match self {
            UniformValue::Vec3(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_mat4(&self) -> Option<[f32; 16]> {
        match self {
            UniformValue::Mat4(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns `true` if every component is finite.
    pub fn is_finite(&self) -> bool {
        match self {
            UniformValue::Float(v) => v.is_finite(),
            UniformValue::Int(_) => true,
            UniformValue::Vec2(v) => v.iter().all(|c| c.is_finite()),
            UniformValue::Vec3(v) => v.iter().all(|c| c.is_finite()),
            UniformValue::Mat4(v) => v.iter().all(|c| c.is_finite()),
        }
    }
}

impl From<f32> for UniformValue {
    fn from(v: f32) -> Self {
        UniformValue::Float(v)
    }
}

impl From<f64> for UniformValue {
    fn from(v: f64) -> Self {
        UniformValue::Float(v as f32)
    }
}

impl From<i32> for UniformValue {
    fn from(v: i32) -> Self {
        UniformValue::Int(v)
    }
}

impl From<[f32; 2]> for UniformValue {
    fn from(v: [f32; 2]) -> Self {
        UniformValue::Vec2(v)
    }
}

impl From<(u32, u32)> for UniformValue {
    fn from(v: (u32, u32)) -> Self {
        UniformValue::Vec2([v.0 as f32, v.1 as f32])
    }
}

impl From<[f32; 3]> for UniformValue {
    fn from(v: [f32; 3]) -> Self {
        UniformValue::Vec3(v)
    }
}

impl From<[f64; 3]> for UniformValue {
    fn from(v: [f64; 3]) -> Self {
        UniformValue::Vec3([v[0] as f32, v[1] as f32, v[2] as f32])
    }
}

impl From<Mat4> for UniformValue {
    fn from(m: Mat4) -> Self {
        UniformValue::Mat4(m.to_cols_array())
    }
}

/// Narrows to `f32`. Translations in the millions keep roughly half a unit of precision.
impl From<DMat4> for UniformValue {
    fn from(m: DMat4) -> Self {
        UniformValue::Mat4(m.as_mat4().to_cols_array())
    }
}

/// Ordered set of named uniforms.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Uniforms {
    values: BTreeMap<String, UniformValue>,
}

impl Uniforms {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a uniform, replacing any previous value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<UniformValue>) -> &mut Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// Builder form of [`Uniforms::set`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<UniformValue>) -> Self {
        self.set(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&UniformValue> {
        self.values.get(name)
    }

    /// Convenience accessor for scalar uniforms.
    pub fn float(&self, name: &str) -> Option<f32> {
        self.get(name).and_then(UniformValue::as_float)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &UniformValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Shallow merge: every uniform in `other` overrides the one with the same name.
    pub fn merge(&mut self, other: &Uniforms) {
        for (k, v) in other.values.iter() {
            self.values.insert(k.clone(), *v);
        }
    }

    /// Consuming form of [`Uniforms::merge`].
    pub fn merged(mut self, other: &Uniforms) -> Self {
        self.merge(other);
        self
    }
}
