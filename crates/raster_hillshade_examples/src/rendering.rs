use std::path::Path;

use glam::{DMat4, DVec2, DVec3};
use mint::Point2;
use raster_hillshade::prelude::*;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Installs a formatting subscriber honoring `RUST_LOG` (default `info`).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Screen-space window onto the world: `size` pixels covering `world`, row 0 at `y_max`.
#[derive(Clone, Copy, Debug)]
pub struct Viewport {
    pub size: (u32, u32),
    pub world: Bounds,
}

impl Viewport {
    pub fn new(size: (u32, u32), world: Bounds) -> Self {
        Self { size, world }
    }

    /// World position of the screen point `(px, py)`.
    pub fn to_world(&self, px: f64, py: f64) -> DVec2 {
        let (w, h) = (self.size.0.max(1) as f64, self.size.1.max(1) as f64);
        DVec2::new(
            self.world.x_min + px / w * self.world.width(),
            self.world.y_max - py / h * self.world.height(),
        )
    }

    /// Screen position of the world point `p`.
    pub fn to_screen(&self, p: DVec2) -> DVec2 {
        let (w, h) = (self.size.0 as f64, self.size.1 as f64);
        DVec2::new(
            (p.x - self.world.x_min) / self.world.width() * w,
            (self.world.y_max - p.y) / self.world.height() * h,
        )
    }
}

const BITMAP_VS: &str = r"#version 300 es
in vec3 positions;
in vec2 texCoords;
uniform mat4 modelMatrix;
out vec2 vTexCoord;
void main() {
  vTexCoord = texCoords;
  gl_Position = modelMatrix * vec4(positions, 1.0);
}
";

const BITMAP_FS: &str = r"#version 300 es
precision highp float;
uniform sampler2D bitmapTexture;
in vec2 vTexCoord;
out vec4 fragColor;
void main() {
  fragColor = texture(bitmapTexture, vTexCoord);
}
";

/// CPU base primitive: places a raster inside `bounds`, shades it with the reference shader and
/// composites the result over a background. Hit tests return the raw encoded texel.
pub struct SoftwareBitmap {
    viewport: Viewport,
    bounds: Bounds,
    background: [u8; 4],
    frame: Vec<u8>,
    raw: Option<EncodedRaster>,
    inverse_model: DMat4,
}

impl SoftwareBitmap {
    pub fn new(viewport: Viewport, bounds: Bounds) -> Self {
        let (w, h) = viewport.size;
        let background = [24, 24, 28, 255];
        Self {
            viewport,
            bounds,
            background,
            frame: background.repeat(w as usize * h as usize),
            raw: None,
            inverse_model: DMat4::IDENTITY,
        }
    }

    pub fn with_background(mut self, background: [u8; 4]) -> Self {
        self.background = background;
        self
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Last composited frame as tightly packed RGBA rows.
    pub fn frame(&self) -> EncodedRaster {
        let (w, h) = self.viewport.size;
        EncodedRaster::try_new(w, h, TexelFormat::Rgba8, self.frame.clone())
            .unwrap_or_else(|_| EncodedRaster::from_fn(0, 0, |_, _| Rgba::TRANSPARENT))
    }

    /// Texture coordinates of the screen point, if it lands on the placed raster.
    fn uv_at(&self, px: f64, py: f64) -> Option<(f64, f64)> {
        let world = self.viewport.to_world(px, py);
        let local = self.inverse_model.transform_point3(DVec3::new(world.x, world.y, 0.0));
        let u = (local.x - self.bounds.x_min) / self.bounds.width();
        let v = (self.bounds.y_max - local.y) / self.bounds.height();
        ((0.0..1.0).contains(&u) && (0.0..1.0).contains(&v)).then_some((u, v))
    }
}

impl ImagePrimitive for SoftwareBitmap {
    fn shaders(&self) -> ShaderSet {
        ShaderSet::new(BITMAP_VS, BITMAP_FS)
    }

    fn draw(&mut self, command: DrawCommand<'_>) -> Result<()> {
        let params = HillshadeParams::from_uniforms(
            command.uniforms,
            command.module_parameters.value_decoder,
        )
        .ok_or_else(|| Error::Render("hillshading uniforms missing from draw".into()))?;

        let fragment = command.shaders.assemble_fragment();
        debug!(bytes = fragment.len(), "assembled fragment stage");

        let shaded = shade_raster(command.image, &params, command.color_map);
        self.inverse_model = command.module_parameters.model_matrix.inverse();
        self.raw = Some(command.image.clone());

        let (w, h) = self.viewport.size;
        let mut frame = Vec::with_capacity(w as usize * h as usize * 4);
        for py in 0..h {
            for px in 0..w {
                let dst = self.background;
                let out = match self.uv_at(px as f64 + 0.5, py as f64 + 0.5) {
                    Some((u, v)) => blend(shaded.texel_at_uv(u, v), dst),
                    None => dst,
                };
                frame.extend_from_slice(&out);
            }
        }
        self.frame = frame;
        Ok(())
    }

    fn hit_test(&self, screen: Point2<f32>) -> Option<Rgba> {
        let raw = self.raw.as_ref()?;
        let (u, v) = self.uv_at(screen.x as f64, screen.y as f64)?;
        Some(raw.texel_at_uv(u, v))
    }
}

fn blend(src: Rgba, dst: [u8; 4]) -> [u8; 4] {
    let a = src.a as f32 / 255.0;
    let mix = |s: u8, d: u8| (s as f32 * a + d as f32 * (1.0 - a)).round() as u8;
    [mix(src.r, dst[0]), mix(src.g, dst[1]), mix(src.b, dst[2]), 255]
}

/// Writes an RGBA raster to a PNG file.
pub fn write_png(raster: &EncodedRaster, path: impl AsRef<Path>) -> anyhow::Result<()> {
    let path = path.as_ref();
    let rgba: Vec<u8> = match raster.format() {
        TexelFormat::Rgba8 => raster.as_bytes().to_vec(),
        TexelFormat::Rgb8 => raster
            .as_bytes()
            .chunks_exact(3)
            .flat_map(|px| [px[0], px[1], px[2], 255])
            .collect(),
    };
    let image = image::RgbaImage::from_raw(raster.width(), raster.height(), rgba)
        .ok_or_else(|| anyhow::anyhow!("raster buffer does not match its size"))?;
    image.save(path)?;
    info!(path = %path.display(), "wrote image");
    Ok(())
}
