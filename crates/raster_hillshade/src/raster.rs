//! Encoded rasters: immutable grids of RGB(A) texels carrying a property map.
//!
//! Texel `(0, 0)` is the upper-left corner of the image; rows grow downwards (southwards on
//! the map). Out-of-range texel coordinates are clamped to the nearest edge texel, which is
//! the boundary policy used for neighbor lookups during shading.
use std::sync::Arc;

use crate::codec::Rgba;
use crate::error::{Error, Result};

/// Memory layout of the texels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TexelFormat {
    Rgb8,
    Rgba8,
}

impl TexelFormat {
    #[inline]
    pub fn bytes_per_texel(self) -> usize {
        match self {
            TexelFormat::Rgb8 => 3,
            TexelFormat::Rgba8 => 4,
        }
    }
}

/// A fixed-size grid of encoded texels. Cloning is cheap; the pixel buffer is shared.
#[derive(Clone, Debug)]
pub struct EncodedRaster {
    width: u32,
    height: u32,
    format: TexelFormat,
    pixels: Arc<[u8]>,
}

impl EncodedRaster {
    /// Wraps a row-major pixel buffer. Fails when the buffer length does not match the size.
    pub fn try_new(
        width: u32,
        height: u32,
        format: TexelFormat,
        pixels: impl Into<Arc<[u8]>>,
    ) -> Result<Self> {
        let pixels = pixels.into();
        let expected = (width as usize) * (height as usize) * format.bytes_per_texel();
        if pixels.len() != expected {
            return Err(Error::InvalidRaster {
                width,
                height,
                len: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            format,
            pixels,
        })
    }

    /// Builds an RGBA raster by evaluating `f(x, y)` for every texel.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> Rgba) -> Self {
        let mut pixels = Vec::with_capacity((width as usize) * (height as usize) * 4);
        for y in 0..height {
            for x in 0..width {
                pixels.extend_from_slice(&f(x, y).to_array());
            }
        }
        Self {
            width,
            height,
            format: TexelFormat::Rgba8,
            pixels: pixels.into(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)` in texels.
    pub fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn format(&self) -> TexelFormat {
        self.format
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Texel at integer coordinates, clamped to the nearest edge. RGB rasters read as opaque.
    ///
    /// An empty raster yields [`Rgba::TRANSPARENT`].
    pub fn texel(&self, ix: i64, iy: i64) -> Rgba {
        if self.is_empty() {
            return Rgba::TRANSPARENT;
        }
        let x = ix.clamp(0, self.width as i64 - 1) as usize;
        let y = iy.clamp(0, self.height as i64 - 1) as usize;

        let bpp = self.format.bytes_per_texel();
        let base = (y * self.width as usize + x) * bpp;
        let px = &self.pixels[base..base + bpp];
        match self.format {
            TexelFormat::Rgb8 => Rgba::rgb(px[0], px[1], px[2]),
            TexelFormat::Rgba8 => Rgba::new(px[0], px[1], px[2], px[3]),
        }
    }

    /// Nearest texel for texture coordinates in `[0, 1]²` (`v = 0` is the top row).
    pub fn texel_at_uv(&self, u: f64, v: f64) -> Rgba {
        let x = (u.clamp(0.0, 1.0) * self.width as f64).floor() as i64;
        let y = (v.clamp(0.0, 1.0) * self.height as f64).floor() as i64;
        self.texel(x, y)
    }
}
