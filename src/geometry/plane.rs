use nalgebra::{Matrix3, Vector4};

use crate::math::{Matrix4, Point3, Vector3, SMALL};
use crate::tolerance::Tolerance;

/// How far `|normal|²` may stray from 1 before a normal is rejected as
/// non-unit.
const UNIT_LENGTH_TOL: f64 = 1.0e-9;

/// An oriented plane `dot(normal, X) = offset` with a unit-length normal.
///
/// The normal points out of the half-space the plane bounds: points with a
/// positive [`signed_distance`](Self::signed_distance) are outside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    normal: Vector3,
    offset: f64,
}

impl Plane {
    /// Creates a plane from a unit normal and its offset from the origin.
    ///
    /// # Panics
    ///
    /// Panics if `normal` is not unit length. The kernel never renormalizes
    /// on the caller's behalf.
    #[must_use]
    pub fn new(normal: Vector3, offset: f64) -> Self {
        assert!(
            is_unit(&normal),
            "Plane::new: normal must be unit length, got |n|^2 = {}",
            normal.norm_squared()
        );
        Self { normal, offset }
    }

    /// Creates the plane with unit `normal` passing through `point`.
    ///
    /// # Panics
    ///
    /// Panics if `normal` is not unit length.
    #[must_use]
    pub fn through_point(normal: Vector3, point: &Point3) -> Self {
        Self::new(normal, normal.dot(&point.coords))
    }

    /// Returns the unit normal.
    #[must_use]
    pub fn normal(&self) -> &Vector3 {
        &self.normal
    }

    /// Returns the offset `d` in `dot(normal, X) = d`.
    #[must_use]
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Signed distance of `point` from the plane; positive on the normal side.
    #[must_use]
    pub fn signed_distance(&self, point: &Point3) -> f64 {
        self.normal.dot(&point.coords) - self.offset
    }

    /// The point of the plane closest to the origin.
    #[must_use]
    pub fn point_on_plane(&self) -> Point3 {
        Point3::from(self.normal * self.offset)
    }

    /// The same plane with the opposite orientation.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            normal: -self.normal,
            offset: -self.offset,
        }
    }
}

pub(crate) fn is_unit(v: &Vector3) -> bool {
    (v.norm_squared() - 1.0).abs() <= UNIT_LENGTH_TOL
}

/// Builds the plane through `a`, `b`, `c` with normal `(b - a) × (c - a)`.
///
/// Points given counter-clockwise (seen from outside) produce an outward
/// normal. Returns `None` when two points coincide within tolerance or when
/// the triangle is so thin that its smallest altitude is within the distance
/// tolerance. The altitude test catches near-collinear triples that pairwise
/// distinctness alone would accept.
#[must_use]
pub fn make_plane_from_3_points(
    a: &Point3,
    b: &Point3,
    c: &Point3,
    tol: &Tolerance,
) -> Option<Plane> {
    let b_a = b - a;
    let c_a = c - a;
    let c_b = c - b;
    let longest_sq = b_a.norm_squared().max(c_a.norm_squared()).max(c_b.norm_squared());
    if b_a.norm_squared() <= tol.distance_squared()
        || c_a.norm_squared() <= tol.distance_squared()
        || c_b.norm_squared() <= tol.distance_squared()
    {
        return None;
    }

    let cross = b_a.cross(&c_a);
    let mag = cross.norm();
    if mag <= SMALL {
        return None;
    }
    // Twice the area over the longest edge is the smallest altitude.
    if mag / longest_sq.sqrt() <= tol.distance() {
        return None;
    }

    let normal = cross / mag;
    Some(Plane {
        normal,
        offset: normal.dot(&a.coords),
    })
}

/// Relationship between two planes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaneRelation {
    /// The planes cross along a line.
    Intersecting,
    /// Parallel, separated by more than the distance tolerance.
    ParallelDistinct,
    /// Same plane, normals pointing the same way.
    CoplanarSameNormal,
    /// Same plane, normals pointing opposite ways.
    CoplanarOppositeNormal,
}

/// Classifies two planes as intersecting, parallel, or coplanar.
///
/// # Panics
///
/// Panics if either normal is not unit length.
#[must_use]
pub fn classify_plane_pair(a: &Plane, b: &Plane, tol: &Tolerance) -> PlaneRelation {
    assert!(
        is_unit(&a.normal) && is_unit(&b.normal),
        "classify_plane_pair: plane normals must be unit length"
    );
    let dot = a.normal.dot(&b.normal);
    if !tol.is_parallel(dot) {
        return PlaneRelation::Intersecting;
    }

    let pt_a = a.point_on_plane();
    let pt_b = b.point_on_plane();
    if (pt_a - pt_b).norm_squared() < tol.distance_squared() {
        if dot > 0.0 {
            PlaneRelation::CoplanarSameNormal
        } else {
            PlaneRelation::CoplanarOppositeNormal
        }
    } else {
        PlaneRelation::ParallelDistinct
    }
}

/// Solves for the single point shared by three planes.
///
/// Uses Cramer's rule on `N x = d`. Returns `None` when the triple product of
/// the normals is within the perpendicularity tolerance of zero, i.e. when
/// the planes meet in a line, a plane, or not at all.
#[must_use]
pub fn point_from_three_planes(planes: &[Plane; 3], tol: &Tolerance) -> Option<Point3> {
    let [a, b, c] = planes;
    let b_x_c = b.normal.cross(&c.normal);
    let det = a.normal.dot(&b_x_c);
    if det.abs() <= tol.perpendicularity_cosine() {
        tracing::trace!(det, "three planes are singular");
        return None;
    }
    let c_x_a = c.normal.cross(&a.normal);
    let a_x_b = a.normal.cross(&b.normal);
    let point = (b_x_c * a.offset + c_x_a * b.offset + a_x_b * c.offset) / det;
    Some(Point3::from(point))
}

/// Finds the point minimizing the sum of squared signed distances to all
/// `planes`.
///
/// Builds the normal equations `(Σ n nᵀ) x = Σ n d` and solves them. When the
/// planes meet in a single point that point is returned exactly. Returns
/// `None` when the system is singular (all normals in a common plane).
#[must_use]
pub fn point_from_n_planes(planes: &[Plane], tol: &Tolerance) -> Option<Point3> {
    let mut matrix = Matrix3::zeros();
    let mut rhs = Vector3::zeros();
    for plane in planes {
        matrix += plane.normal * plane.normal.transpose();
        rhs += plane.normal * plane.offset;
    }

    let det = matrix.determinant();
    if det.abs() <= tol.perpendicularity_cosine() {
        tracing::debug!(det, count = planes.len(), "plane normal equations are singular");
        return None;
    }
    matrix.lu().solve(&rhs).map(Point3::from)
}

/// Applies an affine 4x4 transform to a plane.
///
/// The normal goes through the inverse-transpose of the linear part and is
/// renormalized; the offset is recomputed from a transformed on-plane point.
/// Returns `None` when the linear part is singular.
#[must_use]
pub fn transform_plane(matrix: &Matrix4, plane: &Plane) -> Option<Plane> {
    let linear = matrix.fixed_view::<3, 3>(0, 0).into_owned();
    let inv_transpose = linear.try_inverse()?.transpose();
    let normal = inv_transpose * plane.normal;
    let len = normal.norm();
    if len <= SMALL {
        return None;
    }
    let normal = normal / len;

    let on_plane = plane.point_on_plane();
    let moved = matrix * Vector4::new(on_plane.x, on_plane.y, on_plane.z, 1.0);
    Some(Plane {
        normal,
        offset: normal.dot(&moved.xyz()),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;
    use nalgebra::{Rotation3, Translation3};

    use super::*;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn v(x: f64, y: f64, z: f64) -> Vector3 {
        Vector3::new(x, y, z)
    }

    // ── make_plane_from_3_points ──

    #[test]
    fn ccw_points_give_outward_normal() {
        let tol = Tolerance::default();
        let plane =
            make_plane_from_3_points(&p(0.0, 0.0, 2.0), &p(1.0, 0.0, 2.0), &p(0.0, 1.0, 2.0), &tol)
                .unwrap();
        assert_relative_eq!(*plane.normal(), v(0.0, 0.0, 1.0));
        assert_relative_eq!(plane.offset(), 2.0);
    }

    #[test]
    fn coincident_points_are_degenerate() {
        let tol = Tolerance::default();
        assert!(make_plane_from_3_points(
            &p(0.0, 0.0, 0.0),
            &p(0.0, 0.0, 0.0),
            &p(1.0, 0.0, 0.0),
            &tol
        )
        .is_none());
    }

    #[test]
    fn collinear_points_are_degenerate() {
        let tol = Tolerance::default();
        assert!(make_plane_from_3_points(
            &p(0.0, 0.0, 0.0),
            &p(1.0, 1.0, 1.0),
            &p(2.0, 2.0, 2.0),
            &tol
        )
        .is_none());
    }

    #[test]
    fn near_collinear_points_are_degenerate() {
        let tol = Tolerance::default();
        // Pairwise distinct, but the middle point is only 1e-4 off the line.
        assert!(make_plane_from_3_points(
            &p(0.0, 0.0, 0.0),
            &p(50.0, 0.0001, 0.0),
            &p(100.0, 0.0, 0.0),
            &tol
        )
        .is_none());
    }

    // ── signed distance / reversed ──

    #[test]
    fn signed_distance_sides() {
        let plane = Plane::new(v(0.0, 0.0, 1.0), 1.0);
        assert_relative_eq!(plane.signed_distance(&p(5.0, 5.0, 3.0)), 2.0);
        assert_relative_eq!(plane.signed_distance(&p(0.0, 0.0, 0.0)), -1.0);
        let rev = plane.reversed();
        assert_relative_eq!(rev.signed_distance(&p(5.0, 5.0, 3.0)), -2.0);
    }

    #[test]
    #[should_panic(expected = "unit length")]
    fn non_unit_normal_panics() {
        let _ = Plane::new(v(0.0, 0.0, 2.0), 1.0);
    }

    // ── classify_plane_pair ──

    #[test]
    fn plane_pair_relations() {
        let tol = Tolerance::default();
        let z0 = Plane::new(v(0.0, 0.0, 1.0), 0.0);
        let z1 = Plane::new(v(0.0, 0.0, 1.0), 1.0);
        let z0_flipped = Plane::new(v(0.0, 0.0, -1.0), 0.0);
        let x0 = Plane::new(v(1.0, 0.0, 0.0), 0.0);

        assert_eq!(classify_plane_pair(&z0, &z0, &tol), PlaneRelation::CoplanarSameNormal);
        assert_eq!(
            classify_plane_pair(&z0, &z0_flipped, &tol),
            PlaneRelation::CoplanarOppositeNormal
        );
        assert_eq!(classify_plane_pair(&z0, &z1, &tol), PlaneRelation::ParallelDistinct);
        assert_eq!(classify_plane_pair(&z0, &x0, &tol), PlaneRelation::Intersecting);
    }

    // ── point_from_three_planes ──

    #[test]
    fn three_axis_planes_meet_at_corner() {
        let tol = Tolerance::default();
        let planes = [
            Plane::new(v(1.0, 0.0, 0.0), 1.0),
            Plane::new(v(0.0, 1.0, 0.0), 2.0),
            Plane::new(v(0.0, 0.0, 1.0), 3.0),
        ];
        let pt = point_from_three_planes(&planes, &tol).unwrap();
        assert_relative_eq!(pt, p(1.0, 2.0, 3.0), epsilon = 1e-12);
    }

    #[test]
    fn oblique_planes_meet_on_all_three() {
        let tol = Tolerance::default();
        let n = v(1.0, 1.0, 1.0).normalize();
        let planes = [
            Plane::new(n, 2.0),
            Plane::new(v(1.0, 0.0, 0.0), 0.5),
            Plane::new(v(0.0, 1.0, 0.0), -1.0),
        ];
        let pt = point_from_three_planes(&planes, &tol).unwrap();
        for plane in &planes {
            assert!(plane.signed_distance(&pt).abs() < 1e-12);
        }
    }

    #[test]
    fn parallel_planes_are_singular() {
        let tol = Tolerance::default();
        let planes = [
            Plane::new(v(0.0, 0.0, 1.0), 0.0),
            Plane::new(v(0.0, 0.0, 1.0), 1.0),
            Plane::new(v(1.0, 0.0, 0.0), 0.0),
        ];
        assert!(point_from_three_planes(&planes, &tol).is_none());
    }

    // ── point_from_n_planes ──

    #[test]
    fn box_planes_least_squares_center() {
        let tol = Tolerance::default();
        // Opposing faces of the box [0,2]^3 pull the minimizer to the center.
        let planes = [
            Plane::new(v(1.0, 0.0, 0.0), 2.0),
            Plane::new(v(-1.0, 0.0, 0.0), 0.0),
            Plane::new(v(0.0, 1.0, 0.0), 2.0),
            Plane::new(v(0.0, -1.0, 0.0), 0.0),
            Plane::new(v(0.0, 0.0, 1.0), 2.0),
            Plane::new(v(0.0, 0.0, -1.0), 0.0),
        ];
        let pt = point_from_n_planes(&planes, &tol).unwrap();
        assert_relative_eq!(pt, p(1.0, 1.0, 1.0), epsilon = 1e-12);
    }

    #[test]
    fn four_planes_through_common_point() {
        let tol = Tolerance::default();
        let target = p(1.0, -2.0, 0.5);
        let normals = [
            v(1.0, 0.0, 0.0),
            v(0.0, 1.0, 0.0),
            v(0.0, 0.0, 1.0),
            v(1.0, 1.0, 1.0).normalize(),
        ];
        let planes: Vec<Plane> = normals.iter().map(|n| Plane::through_point(*n, &target)).collect();
        let pt = point_from_n_planes(&planes, &tol).unwrap();
        assert_relative_eq!(pt, target, epsilon = 1e-12);
    }

    #[test]
    fn coaxial_planes_are_singular() {
        let tol = Tolerance::default();
        // All normals lie in the XY plane, so Z is unconstrained.
        let planes = [
            Plane::new(v(1.0, 0.0, 0.0), 1.0),
            Plane::new(v(0.0, 1.0, 0.0), 1.0),
            Plane::new(v(1.0, 1.0, 0.0).normalize(), 1.0),
            Plane::new(v(-1.0, 0.0, 0.0), 1.0),
        ];
        assert!(point_from_n_planes(&planes, &tol).is_none());
    }

    // ── transform_plane ──

    #[test]
    fn translate_plane() {
        let plane = Plane::new(v(0.0, 0.0, 1.0), 1.0);
        let m = Translation3::new(0.0, 0.0, 4.0).to_homogeneous();
        let moved = transform_plane(&m, &plane).unwrap();
        assert_relative_eq!(*moved.normal(), v(0.0, 0.0, 1.0));
        assert_relative_eq!(moved.offset(), 5.0);
    }

    #[test]
    fn rotate_plane() {
        let plane = Plane::new(v(1.0, 0.0, 0.0), 3.0);
        let rot = Rotation3::from_axis_angle(&Vector3::z_axis(), std::f64::consts::FRAC_PI_2);
        let moved = transform_plane(&rot.to_homogeneous(), &plane).unwrap();
        assert_relative_eq!(*moved.normal(), v(0.0, 1.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(moved.offset(), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn non_uniform_scale_keeps_points_on_plane() {
        // Plane x + y = sqrt(2) through (1, 1, 0) and (2, 0, 0)
        let n = v(1.0, 1.0, 0.0).normalize();
        let plane = Plane::through_point(n, &p(1.0, 1.0, 0.0));
        let m = Matrix4::new_nonuniform_scaling(&v(3.0, 1.0, 1.0));
        let moved = transform_plane(&m, &plane).unwrap();
        for pt in [p(1.0, 1.0, 0.0), p(2.0, 0.0, 0.0), p(0.0, 2.0, 5.0)] {
            let q = p(pt.x * 3.0, pt.y, pt.z);
            assert!(moved.signed_distance(&q).abs() < 1e-12);
        }
    }

    #[test]
    fn singular_transform_is_rejected() {
        let plane = Plane::new(v(0.0, 0.0, 1.0), 1.0);
        let m = Matrix4::new_nonuniform_scaling(&v(1.0, 1.0, 0.0));
        assert!(transform_plane(&m, &plane).is_none());
    }
}
