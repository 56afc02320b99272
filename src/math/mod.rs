pub mod distance_2d;
pub mod distance_3d;
pub mod intersect_2d;
pub mod intersect_3d;
pub mod predicates;

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// 4x4 transformation matrix.
pub type Matrix4 = nalgebra::Matrix4<f64>;

/// Magnitudes at or below this are treated as exact zero (division guards,
/// exact-duplicate detection). Not a modelling tolerance.
pub const SMALL: f64 = 1.0e-77;

/// Squared magnitudes below this make a vector unusable as a direction.
pub const UNITIZE_TOL: f64 = 1.0e-15;

/// 2D cross product of two vectors.
#[inline]
#[must_use]
pub fn cross_2d(a: &Vector2, b: &Vector2) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Signed turn of `c` relative to the directed line `a -> b`.
///
/// Positive when `c` lies to the left (counter-clockwise turn).
#[inline]
#[must_use]
pub fn orient_2d(a: &Point2, b: &Point2, c: &Point2) -> f64 {
    cross_2d(&(b - a), &(c - a))
}

/// Snaps a parameter to exactly `0.0` or `1.0` when it is within `slack` of
/// either end of the unit interval.
#[inline]
#[must_use]
pub(crate) fn snap_unit_interval(value: f64, slack: f64) -> f64 {
    if value > -slack && value < slack {
        0.0
    } else if value > 1.0 - slack && value < 1.0 + slack {
        1.0
    } else {
        value
    }
}
