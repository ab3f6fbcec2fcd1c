mod common;

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use raster_hillshade::prelude::*;

const SIZES: [u32; 3] = [64, 256, 1024];

fn shading_raster_benches(c: &mut Criterion) {
    let range = ValueRange::new(0.0, 1000.0);
    let props = Hillshading2DProps::default().with_value_range(range.min, range.max);
    let params = props.hillshade_params();
    let color_map = ColorMap::grayscale();

    let mut group = c.benchmark_group("shading/shade_raster");
    for &size in &SIZES {
        let raster = common::terrain(size, range);
        group.throughput(common::texels_throughput(size, size));
        group.bench_with_input(BenchmarkId::from_parameter(size), &raster, |b, raster| {
            b.iter(|| {
                let shaded = shade_raster(raster, &params, &color_map);
                black_box(shaded.as_bytes().len());
            });
        });
    }
    group.finish();
}

fn shading_uniform_benches(c: &mut Criterion) {
    let props = Hillshading2DProps::default().with_rot_deg(12.5);
    let params = props.hillshade_params();
    let frame = Uniforms::new().with("viewportSize", [1920.0f32, 1080.0]);
    let module_parameters = ModuleParameters {
        value_decoder: params.recipe,
        model_matrix: model_matrix(props.rot_deg, 0.0, 1.0),
    };
    let shaders = raster_hillshade::shading::extend_shaders(ShaderSet::new(
        "#version 300 es\nvoid main() {}",
        "#version 300 es\nvoid main() {}",
    ));

    c.bench_function("shading/uniforms", |b| {
        b.iter(|| {
            let mut uniforms = frame.clone();
            uniforms.merge(&shaders.module_uniforms(&module_parameters));
            uniforms.merge(&params.uniforms((1024, 1024)));
            black_box(uniforms.len());
        });
    });
}

criterion_group! {
    name = benches;
    config = common::default_criterion();
    targets = shading_raster_benches, shading_uniform_benches
}
criterion_main!(benches);
