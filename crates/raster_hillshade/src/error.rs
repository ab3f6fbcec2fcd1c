//! Error types and result alias for the crate.
//!
//! This module defines [`enum@crate::error::Error`] and the crate-wide [Result] alias.
//! Variants cover invalid configuration, malformed raster buffers, configuration-channel failures
//! (unknown layers or properties), and failures reported by the base rendering primitive.
//!
//! Visual-tuning problems (missing image, empty pick, malformed decode recipe, collapsed
//! value range) are recovered locally and never surface as an [`enum@Error`].
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("raster buffer of {len} bytes does not match {width}x{height} texels")]
    InvalidRaster { width: u32, height: u32, len: usize },

    #[error("unknown layer property '{name}'")]
    UnknownProperty { name: String },

    #[error("layer property '{name}' expects {expected}")]
    PropertyType { name: String, expected: &'static str },

    #[error("unknown layer '{id}'")]
    UnknownLayer { id: String },

    #[error("render error: {0}")]
    Render(String),

    #[error("{0}")]
    Other(String),
}

impl From<String> for Error {
    fn from(value: String) -> Self {
        Error::Other(value)
    }
}

impl From<&str> for Error {
    fn from(value: &str) -> Self {
        Error::Other(value.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_string_uses_other_variant() {
        let err: Error = String::from("boom").into();
        assert!(matches!(err, Error::Other(_)));
    }

    #[test]
    fn raster_error_mentions_dimensions() {
        let err = Error::InvalidRaster {
            width: 4,
            height: 2,
            len: 7,
        };
        assert_eq!(
            err.to_string(),
            "raster buffer of 7 bytes does not match 4x2 texels"
        );
    }

    #[test]
    fn property_type_error_names_expected_type() {
        let err = Error::PropertyType {
            name: "rotDeg".into(),
            expected: "a number",
        };
        assert_eq!(err.to_string(), "layer property 'rotDeg' expects a number");
    }
}
