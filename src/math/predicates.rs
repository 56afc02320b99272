use std::f64::consts::{PI, TAU};

use super::{Point2, Point3, Vector3, SMALL};
use crate::tolerance::Tolerance;

/// Whether two points are closer than the distance tolerance.
#[must_use]
pub fn points_equal(a: &Point3, b: &Point3, tol: &Tolerance) -> bool {
    (a - b).norm_squared() < tol.distance_squared()
}

/// 2D counterpart of [`points_equal`].
#[must_use]
pub fn points_equal_2d(a: &Point2, b: &Point2, tol: &Tolerance) -> bool {
    (a - b).norm_squared() < tol.distance_squared()
}

/// Whether three points lie on a common line within tolerance.
///
/// Independent of argument order: the test measures how far the vertex
/// opposite the longest edge is from that edge's line. Coincident points are
/// collinear.
#[must_use]
pub fn are_collinear(a: &Point3, b: &Point3, c: &Point3, tol: &Tolerance) -> bool {
    let ab = b - a;
    let bc = c - b;
    let ca = a - c;

    let (longest, other) = {
        let (lab, lbc, lca) = (ab.norm_squared(), bc.norm_squared(), ca.norm_squared());
        if lab >= lbc && lab >= lca {
            (ab, bc)
        } else if lbc >= lca {
            (bc, ca)
        } else {
            (ca, ab)
        }
    };

    let len_sq = longest.norm_squared();
    if len_sq <= SMALL {
        return true;
    }
    let dist_sq = longest.cross(&other).norm_squared() / len_sq;
    dist_sq <= tol.distance_squared()
}

/// Whether every pair of points is farther apart than the distance tolerance.
#[must_use]
pub fn are_distinct(points: &[Point3], tol: &Tolerance) -> bool {
    for (i, a) in points.iter().enumerate() {
        for b in &points[i + 1..] {
            if (a - b).norm_squared() <= tol.distance_squared() {
                return false;
            }
        }
    }
    true
}

/// Whether `mid` lies between `left` and `right` (in either order).
///
/// When the bounds are within a tenth of the distance tolerance of each other
/// the range is widened by that amount on both sides.
#[must_use]
pub fn between(left: f64, mid: f64, right: f64, tol: &Tolerance) -> bool {
    let slack = tol.distance() * 0.1;
    let (mut lo, mut hi) = if left < right { (left, right) } else { (right, left) };
    if (hi - lo).abs() <= slack {
        lo -= slack;
        hi += slack;
    }
    mid >= lo && mid <= hi
}

/// Angle of `vec` measured counter-clockwise from `x_dir` around
/// `x_dir × y_dir`, in `[0, 2π]`.
///
/// `x_dir` and `y_dir` must be perpendicular unit vectors spanning the plane
/// of `vec`. Computed as `π + atan2(-y, -x)` so that rounding error collects
/// around 0 rather than around π.
#[must_use]
pub fn angle_measure(vec: &Vector3, x_dir: &Vector3, y_dir: &Vector3) -> f64 {
    let x = -vec.dot(x_dir);
    let y = -vec.dot(y_dir);
    let mut angle = PI + y.atan2(x);
    while angle < 0.0 {
        angle += TAU;
    }
    while angle > TAU {
        angle -= TAU;
    }
    angle
}

/// Area of the triangle `a, b, c`.
#[must_use]
pub fn triangle_area(a: &Point3, b: &Point3, c: &Point3) -> f64 {
    0.5 * (b - a).cross(&(c - a)).norm()
}
