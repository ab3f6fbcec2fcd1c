use raster_hillshade::prelude::*;
use raster_hillshade_examples::{
    encode_terrain, init_tracing, write_png, SoftwareBitmap, Viewport,
};

/// Shades the same ramp with and without decoder quantization and samples the picked values.
fn main() -> anyhow::Result<()> {
    init_tracing();
    let bounds = Bounds::new(0.0, 0.0, 512.0, 128.0);
    let range = ValueRange::new(0.0, 100.0);
    let raster = encode_terrain(512, 128, range, |x, _, w, _| Some(x as f64 / w as f64));

    let variants = [
        ("continuous", ValueDecoderOverrides::new()),
        // Codec values live in [0, 1], so a step of 0.1 gives ten terraces.
        ("stepped", ValueDecoderOverrides::new().with_step(0.1)),
    ];

    for (name, decoder) in variants {
        let props = Hillshading2DProps::new(name)
            .with_bounds(bounds)
            .with_value_range(range.min, range.max)
            .with_value_decoder(decoder)
            .with_light_direction([1.0, 0.0, 0.5])
            .with_light_intensities(0.3, 0.7);
        let viewport = Viewport::new((512, 128), bounds);
        let mut layer = Hillshading2DLayer::new(SoftwareBitmap::new(viewport, bounds), props)?
            .with_image(raster.clone());
        layer.render_frame(&FrameContext::default())?;
        write_png(&layer.base().frame(), format!("hillshade-decoder-{name}.png"))?;

        let picks: Vec<String> = (0..8)
            .map(|i| {
                let px = 16.0 + i as f32 * 64.0;
                layer
                    .pick([px, 64.0])
                    .property_value
                    .map_or_else(|| "-".to_owned(), |v| format!("{v:.1}"))
            })
            .collect();
        println!("{name:>10}: {}", picks.join(" "));
    }
    Ok(())
}
