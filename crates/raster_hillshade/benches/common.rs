use std::time::Duration;

use criterion::{Criterion, Throughput};
use raster_hillshade::prelude::*;

pub const SAMPLE_SIZE: usize = 20;
pub const WARM_UP: Duration = Duration::from_secs(1);
pub const MEASUREMENT_TIME: Duration = Duration::from_secs(2);

pub fn default_criterion() -> Criterion {
    Criterion::default()
        .configure_from_args()
        .sample_size(SAMPLE_SIZE)
        .warm_up_time(WARM_UP)
        .measurement_time(MEASUREMENT_TIME)
}

#[allow(dead_code)]
pub fn elements_throughput(elements: usize) -> Throughput {
    Throughput::Elements(elements.max(1) as u64)
}

#[allow(dead_code)]
pub fn texels_throughput(width: u32, height: u32) -> Throughput {
    Throughput::Elements((width as u64 * height as u64).max(1))
}

/// Smooth synthetic terrain encoded with the default recipe.
#[allow(dead_code)]
pub fn terrain(size: u32, range: ValueRange) -> EncodedRaster {
    let recipe = DecodeRecipe::default();
    let s = size.max(1) as f64;
    EncodedRaster::from_fn(size, size, |x, y| {
        let u = x as f64 / s * std::f64::consts::TAU;
        let v = y as f64 / s * std::f64::consts::TAU;
        let t = 0.5 + 0.25 * u.sin() + 0.25 * (2.0 * v).cos();
        encode_value(range.min + t * range.size(), &recipe, &range)
    })
}
