//! Geometric transform: rotation of the raster about its upper-left bound corner.
//!
//! Matrices are computed in double precision and the CPU-side extents
//! ([`rotated_bounds`], [`BoundingBox`]) stay in `f64`. The `modelMatrix` uniform is narrowed
//! to `f32` on upload, so for projected coordinates in the millions the GPU placement can be
//! off by a fraction of a map unit from the CPU extents.
use glam::{DMat4, DVec2, DVec3};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Planar geographic bounds of the raster.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "BoundsRepr", into = "[f64; 4]"))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub x_min: f64,
    pub y_min: f64,
    pub x_max: f64,
    pub y_max: f64,
}

impl Bounds {
    pub const fn new(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    /// Parses `[xMin, yMin, xMax, yMax]` or four `[x, y]` corner points flattened to 8 values.
    pub fn from_slice(values: &[f64]) -> Result<Self> {
        if values.iter().any(|v| !v.is_finite()) {
            return Err(Error::InvalidConfig("bounds must be finite".into()));
        }
        match values.len() {
            4 => Ok(Self::new(values[0], values[1], values[2], values[3])),
            8 => Ok(Self::enclosing(
                values.chunks_exact(2).map(|c| DVec2::new(c[0], c[1])),
            )),
            n => Err(Error::InvalidConfig(format!(
                "bounds need 4 values or 4 corner points, got {n} values"
            ))),
        }
    }

    /// Parses four `[x, y]` corner points.
    pub fn from_corners(corners: &[[f64; 2]]) -> Result<Self> {
        if corners.len() != 4 {
            return Err(Error::InvalidConfig(format!(
                "bounds need 4 corner points, got {}",
                corners.len()
            )));
        }
        Self::from_slice(corners.as_flattened())
    }

    /// Smallest bounds containing every point.
    pub fn enclosing(points: impl IntoIterator<Item = DVec2>) -> Self {
        let mut min = DVec2::splat(f64::INFINITY);
        let mut max = DVec2::splat(f64::NEG_INFINITY);
        for p in points {
            min = min.min(p);
            max = max.max(p);
        }
        Self::new(min.x, min.y, max.x, max.y)
    }

    /// Rotation anchor.
    pub fn upper_left(&self) -> DVec2 {
        DVec2::new(self.x_min, self.y_max)
    }

    /// Corners in the order upper-left, upper-right, lower-right, lower-left.
    pub fn corners(&self) -> [DVec2; 4] {
        [
            DVec2::new(self.x_min, self.y_max),
            DVec2::new(self.x_max, self.y_max),
            DVec2::new(self.x_max, self.y_min),
            DVec2::new(self.x_min, self.y_min),
        ]
    }

    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    pub fn is_finite(&self) -> bool {
        self.x_min.is_finite()
            && self.y_min.is_finite()
            && self.x_max.is_finite()
            && self.y_max.is_finite()
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1.0, 1.0)
    }
}

impl From<[f64; 4]> for Bounds {
    fn from(v: [f64; 4]) -> Self {
        Bounds::new(v[0], v[1], v[2], v[3])
    }
}

/// Serialized shapes accepted for [`Bounds`].
#[cfg(feature = "serde")]
#[derive(Deserialize)]
#[serde(untagged)]
enum BoundsRepr {
    Values(Vec<f64>),
    Corners(Vec<[f64; 2]>),
}

#[cfg(feature = "serde")]
impl TryFrom<BoundsRepr> for Bounds {
    type Error = Error;

    fn try_from(repr: BoundsRepr) -> Result<Self> {
        match repr {
            BoundsRepr::Values(values) => Bounds::from_slice(&values),
            BoundsRepr::Corners(corners) => Bounds::from_corners(&corners),
        }
    }
}

impl From<Bounds> for [f64; 4] {
    fn from(b: Bounds) -> Self {
        [b.x_min, b.y_min, b.x_max, b.y_max]
    }
}

/// Reported extent `[xMin, yMin, zMin, xMax, yMax, zMax]`.
///
/// The z extent is a fixed synthetic thickness (`zMin = 1`, `zMax = -1`) for spatial indexing;
/// it plays no part in rendering depth.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox(pub [f64; 6]);

impl BoundingBox {
    pub const Z_MIN: f64 = 1.0;
    pub const Z_MAX: f64 = -1.0;

    pub fn from_bounds(bounds: &Bounds) -> Self {
        Self([
            bounds.x_min,
            bounds.y_min,
            Self::Z_MIN,
            bounds.x_max,
            bounds.y_max,
            Self::Z_MAX,
        ])
    }

    pub fn x_min(&self) -> f64 {
        self.0[0]
    }

    pub fn y_min(&self) -> f64 {
        self.0[1]
    }

    pub fn z_min(&self) -> f64 {
        self.0[2]
    }

    pub fn x_max(&self) -> f64 {
        self.0[3]
    }

    pub fn y_max(&self) -> f64 {
        self.0[4]
    }

    pub fn z_max(&self) -> f64 {
        self.0[5]
    }
}

/// Rotation by `rot_deg` degrees counter-clockwise about the Z axis through `(anchor_x, anchor_y)`.
///
/// Translates the anchor to the origin, rotates, and translates back. A zero angle yields the
/// identity for any anchor.
pub fn model_matrix(rot_deg: f64, anchor_x: f64, anchor_y: f64) -> DMat4 {
    if rot_deg == 0.0 {
        return DMat4::IDENTITY;
    }
    let anchor = DVec3::new(anchor_x, anchor_y, 0.0);
    DMat4::from_translation(anchor)
        * DMat4::from_rotation_z(rot_deg.to_radians())
        * DMat4::from_translation(-anchor)
}

/// Axis-aligned extent of `bounds` after rotating it about its upper-left corner.
pub fn rotated_bounds(bounds: &Bounds, rot_deg: f64) -> Bounds {
    let anchor = bounds.upper_left();
    let m = model_matrix(rot_deg, anchor.x, anchor.y);
    Bounds::enclosing(
        bounds
            .corners()
            .into_iter()
            .map(|c| m.transform_point3(c.extend(0.0)).truncate()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: DVec2, b: DVec2) -> bool {
        (a - b).length() < 1e-9
    }

    #[test]
    fn zero_rotation_is_identity_for_any_anchor() {
        for (ax, ay) in [(0.0, 0.0), (456_000.0, 6_780_000.0), (-3.5, 12.25)] {
            assert_eq!(model_matrix(0.0, ax, ay), DMat4::IDENTITY);
        }
    }

    #[test]
    fn anchor_is_a_fixed_point() {
        let m = model_matrix(90.0, 0.0, 100.0);
        let p = m.transform_point3(DVec3::new(0.0, 100.0, 0.0));
        assert!(approx(p.truncate(), DVec2::new(0.0, 100.0)));
    }

    #[test]
    fn rotation_is_counter_clockwise_about_anchor() {
        let m = model_matrix(90.0, 0.0, 100.0);
        // One unit east of the anchor ends up one unit north of it.
        let p = m.transform_point3(DVec3::new(1.0, 100.0, 0.0));
        assert!(approx(p.truncate(), DVec2::new(0.0, 101.0)));
    }

    #[test]
    fn rotated_bounds_quarter_turn() {
        let bounds = Bounds::new(0.0, 0.0, 10.0, 100.0);
        let rotated = rotated_bounds(&bounds, 90.0);
        assert!(rotated.x_min.abs() < 1e-9);
        assert!((rotated.x_max - 100.0).abs() < 1e-9);
        assert!((rotated.y_min - 100.0).abs() < 1e-9);
        assert!((rotated.y_max - 110.0).abs() < 1e-9);
    }

    #[test]
    fn projected_anchor_stays_fixed_in_double_precision() {
        let bounds = Bounds::new(432_150.0, 6_475_800.0, 439_400.0, 6_481_500.0);
        let anchor = bounds.upper_left();
        let m = model_matrix(30.0, anchor.x, anchor.y);
        let p = m.transform_point3(anchor.extend(0.0)).truncate();
        assert!((p - anchor).length() < 1e-6);
    }

    #[test]
    fn rotated_bounds_without_rotation_is_unchanged() {
        let bounds = Bounds::new(-5.0, 2.0, 8.0, 9.0);
        assert_eq!(rotated_bounds(&bounds, 0.0), bounds);
    }

    #[test]
    fn bounding_box_uses_synthetic_thickness() {
        let bbox = BoundingBox::from_bounds(&Bounds::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(bbox.0, [1.0, 2.0, 1.0, 3.0, 4.0, -1.0]);
        assert_eq!(bbox.z_min(), 1.0);
        assert_eq!(bbox.z_max(), -1.0);
    }

    #[test]
    fn bounds_from_slice_accepts_corner_points() {
        let b = Bounds::from_slice(&[0.0, 0.0, 0.0, 5.0, 4.0, 5.0, 4.0, 0.0]).expect("corners");
        assert_eq!(b, Bounds::new(0.0, 0.0, 4.0, 5.0));
    }

    #[test]
    fn bounds_from_corners_needs_four_points() {
        let b = Bounds::from_corners(&[[2.0, 1.0], [2.0, 3.0], [6.0, 3.0], [6.0, 1.0]])
            .expect("corners");
        assert_eq!(b, Bounds::new(2.0, 1.0, 6.0, 3.0));
        assert!(Bounds::from_corners(&[[0.0, 0.0], [1.0, 1.0]]).is_err());
    }

    #[test]
    fn bounds_from_slice_rejects_short_or_non_finite_input() {
        assert!(Bounds::from_slice(&[0.0, 1.0, 2.0]).is_err());
        assert!(Bounds::from_slice(&[0.0, f64::NAN, 2.0, 3.0]).is_err());
    }
}
