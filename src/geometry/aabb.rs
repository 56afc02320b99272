use nalgebra::Vector4;

use crate::math::{Matrix4, Point3};
use crate::tolerance::Tolerance;

use super::plane::Plane;

/// Below this a direction component is treated as zero in slab clipping.
const SLAB_EPSILON: f64 = 1.0e-39;

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the bounding box.
    pub min: Point3,
    /// Maximum corner of the bounding box.
    pub max: Point3,
}

impl Aabb {
    /// Creates a box from its minimum and maximum corners.
    #[must_use]
    pub fn new(min: Point3, max: Point3) -> Self {
        Self { min, max }
    }

    /// Smallest box containing all `points`, or `None` for an empty slice.
    #[must_use]
    pub fn from_points(points: &[Point3]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut aabb = Self::new(*first, *first);
        for pt in rest {
            aabb.include(pt);
        }
        Some(aabb)
    }

    /// Grows the box to contain `point`.
    pub fn include(&mut self, point: &Point3) {
        self.min = self.min.inf(point);
        self.max = self.max.sup(point);
    }

    /// The 8 corners, ordered with X varying slowest and Z fastest.
    #[must_use]
    pub fn corners(&self) -> [Point3; 8] {
        let (lo, hi) = (self.min, self.max);
        [
            Point3::new(lo.x, lo.y, lo.z),
            Point3::new(lo.x, lo.y, hi.z),
            Point3::new(lo.x, hi.y, lo.z),
            Point3::new(lo.x, hi.y, hi.z),
            Point3::new(hi.x, lo.y, lo.z),
            Point3::new(hi.x, lo.y, hi.z),
            Point3::new(hi.x, hi.y, lo.z),
            Point3::new(hi.x, hi.y, hi.z),
        ]
    }
}

/// Classification of a box against the half-space behind a plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HalfspaceClass {
    /// Every corner is strictly behind the plane.
    Inside,
    /// The plane passes through the box (or touches it within tolerance).
    Overlapping,
    /// Every corner is strictly in front of the plane.
    Outside,
}

/// Classifies `aabb` against the half-space `dot(normal, X) <= offset`.
///
/// A corner within the distance tolerance of the plane, or corners on both
/// sides, make the box [`Overlapping`](HalfspaceClass::Overlapping).
#[must_use]
pub fn classify_halfspace_vs_aabb(plane: &Plane, aabb: &Aabb, tol: &Tolerance) -> HalfspaceClass {
    let mut class = None;
    for corner in aabb.corners() {
        let d = plane.signed_distance(&corner);
        let side = if d < -tol.distance() {
            HalfspaceClass::Inside
        } else if d > tol.distance() {
            HalfspaceClass::Outside
        } else {
            return HalfspaceClass::Overlapping;
        };
        match class {
            Some(prev) if prev != side => return HalfspaceClass::Overlapping,
            _ => class = Some(side),
        }
    }
    class.unwrap_or(HalfspaceClass::Overlapping)
}

/// Transforms a box by `matrix`, returning the axis-aligned box around the 8
/// transformed corners.
///
/// Not tight under rotation, but always contains anything the input box
/// contained.
#[must_use]
pub fn transform_aabb(matrix: &Matrix4, aabb: &Aabb) -> Aabb {
    let moved = aabb.corners().map(|c| {
        let h = matrix * Vector4::new(c.x, c.y, c.z, 1.0);
        Point3::new(h.x, h.y, h.z)
    });
    let mut out = Aabb::new(moved[0], moved[0]);
    for pt in &moved[1..] {
        out.include(pt);
    }
    out
}

/// Clips the segment `a -> b` to the box using the slab method.
///
/// Returns the clipped endpoints, or `None` when the segment misses the box.
/// A segment entirely inside the box is returned unchanged.
#[must_use]
pub fn clip_segment_to_aabb(a: &Point3, b: &Point3, aabb: &Aabb) -> Option<(Point3, Point3)> {
    let dir = b - a;
    let mut t_enter = f64::NEG_INFINITY;
    let mut t_exit = f64::INFINITY;

    for axis in 0..3 {
        let (origin, d) = (a[axis], dir[axis]);
        let (lo, hi) = (aabb.min[axis], aabb.max[axis]);
        if d.abs() <= SLAB_EPSILON {
            if origin < lo || origin > hi {
                return None;
            }
            continue;
        }
        let (near, far) = if d < 0.0 {
            ((hi - origin) / d, (lo - origin) / d)
        } else {
            ((lo - origin) / d, (hi - origin) / d)
        };
        if far < 0.0 {
            return None;
        }
        t_enter = t_enter.max(near);
        t_exit = t_exit.min(far);
    }

    if t_enter >= t_exit || t_enter > 1.0 || t_exit < 0.0 {
        return None;
    }
    let t0 = t_enter.max(0.0);
    let t1 = t_exit.min(1.0);
    Some((a + dir * t0, a + dir * t1))
}
