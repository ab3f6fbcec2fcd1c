#![forbid(unsafe_code)]

mod rendering;
mod terrain;

pub use rendering::{init_tracing, write_png, SoftwareBitmap, Viewport};
pub use terrain::{encode_terrain, ridge_and_basin, terrain_color_map};
