use bevy::prelude::Image;
use bevy::render::render_resource::TextureFormat;
use raster_hillshade::prelude::{EncodedRaster, TexelFormat};

/// Snapshots a Bevy [`Image`] holding an RGB-encoded property map into an [`EncodedRaster`].
///
/// Supports 8-bit RGBA and BGRA formats; BGRA data is swizzled to RGBA. Returns `None` for other
/// formats or when the image has no CPU-side data. The pixel data is copied, so re-create the
/// raster when the source [`Image`] changes.
pub fn encoded_raster_from_image(image: &Image) -> Option<EncodedRaster> {
    let format = image.texture_descriptor.format;
    let data = image.data.as_ref()?;
    let width = image.texture_descriptor.size.width;
    let height = image.texture_descriptor.size.height;

    let pixels = match format {
        TextureFormat::Rgba8Unorm | TextureFormat::Rgba8UnormSrgb => data.clone(),
        TextureFormat::Bgra8Unorm | TextureFormat::Bgra8UnormSrgb => data
            .chunks_exact(4)
            .flat_map(|px| [px[2], px[1], px[0], px[3]])
            .collect(),
        _ => return None,
    };

    EncodedRaster::try_new(width, height, TexelFormat::Rgba8, pixels).ok()
}

#[cfg(test)]
mod tests {
    use bevy::asset::RenderAssetUsages;
    use bevy::render::render_resource::{Extent3d, TextureDimension};
    use raster_hillshade::prelude::Rgba;

    use super::*;

    fn image(format: TextureFormat, data: Vec<u8>) -> Image {
        Image::new(
            Extent3d {
                width: 2,
                height: 1,
                depth_or_array_layers: 1,
            },
            TextureDimension::D2,
            data,
            format,
            RenderAssetUsages::default(),
        )
    }

    #[test]
    fn rgba_images_are_copied_verbatim() {
        let img = image(TextureFormat::Rgba8Unorm, vec![1, 2, 3, 255, 4, 5, 6, 0]);
        let raster = encoded_raster_from_image(&img).expect("supported format");
        assert_eq!(raster.resolution(), (2, 1));
        assert_eq!(raster.texel(0, 0), Rgba::new(1, 2, 3, 255));
        assert!(raster.texel(1, 0).is_transparent());
    }

    #[test]
    fn bgra_images_are_swizzled() {
        let img = image(TextureFormat::Bgra8UnormSrgb, vec![3, 2, 1, 255, 6, 5, 4, 255]);
        let raster = encoded_raster_from_image(&img).expect("supported format");
        assert_eq!(raster.texel(0, 0), Rgba::new(1, 2, 3, 255));
        assert_eq!(raster.texel(1, 0), Rgba::new(4, 5, 6, 255));
    }

    #[test]
    fn other_formats_are_rejected() {
        let img = image(TextureFormat::R8Unorm, vec![0, 0]);
        assert!(encoded_raster_from_image(&img).is_none());
    }
}
