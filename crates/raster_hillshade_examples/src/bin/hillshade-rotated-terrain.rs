use raster_hillshade::prelude::*;
use raster_hillshade_examples::{
    encode_terrain, init_tracing, ridge_and_basin, terrain_color_map, write_png, SoftwareBitmap,
    Viewport,
};

fn main() -> anyhow::Result<()> {
    init_tracing();
    let bounds = Bounds::new(432_150.0, 6_475_800.0, 439_400.0, 6_481_500.0);
    let range = ValueRange::new(2782.0, 3513.0);
    let raster = encode_terrain(256, 200, range, ridge_and_basin);

    for rot_deg in [0.0, 30.0] {
        let props = Hillshading2DProps::new(format!("depth-{rot_deg}"))
            .with_bounds(bounds)
            .with_value_range(range.min, range.max)
            .with_color_map(terrain_color_map())
            .with_light_direction([-1.0, 1.0, 1.5])
            .with_rot_deg(rot_deg);

        let world = rotated_bounds(&bounds, rot_deg);
        let viewport = Viewport::new((800, 800), padded(&world, 0.05));
        let mut layer = Hillshading2DLayer::new(SoftwareBitmap::new(viewport, bounds), props)?
            .with_image(raster.clone())
            .on_bounding_box(|bbox| println!("bounding box: {:?}", bbox.0));

        let mut events = FnSink::new(|event| match event {
            LayerEvent::FrameDrawn { resolution, .. } => {
                println!("drew {}x{} texels", resolution.0, resolution.1)
            }
            LayerEvent::Warning { message, .. } => println!("warning: {message}"),
            other => println!("{other:?}"),
        });
        layer.render_frame_with_events(&FrameContext::default(), &mut events)?;

        write_png(
            &layer.base().frame(),
            format!("hillshade-rotated-terrain-{rot_deg:.0}.png"),
        )?;

        for (px, py) in [(400.0, 400.0), (200.0, 600.0), (5.0, 5.0)] {
            let pick = layer.pick([px as f32, py as f32]);
            match pick.property_value {
                Some(v) => println!("rot {rot_deg:>4}: ({px}, {py}) -> {v:.2}"),
                None => println!("rot {rot_deg:>4}: ({px}, {py}) -> no data"),
            }
        }
    }
    Ok(())
}

fn padded(bounds: &Bounds, fraction: f64) -> Bounds {
    let side = bounds.width().max(bounds.height());
    let pad = side * fraction;
    let cx = (bounds.x_min + bounds.x_max) * 0.5;
    let cy = (bounds.y_min + bounds.y_max) * 0.5;
    let half = side * 0.5 + pad;
    Bounds::new(cx - half, cy - half, cx + half, cy + half)
}
