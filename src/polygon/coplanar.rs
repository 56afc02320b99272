use crate::error::{ProjectionError, Result};
use crate::geometry::plane::make_plane_from_3_points;
use crate::math::{Point2, Point3, Vector3};
use crate::tolerance::Tolerance;

/// An orthonormal 2D frame embedded in 3D.
///
/// A counter-clockwise turn in the projected frame is counter-clockwise about
/// [`normal`](CoplanarBasis::normal).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoplanarBasis {
    /// Centroid of the point set the basis was derived from.
    pub origin: Point3,
    /// Unit vector mapped to the 2D X axis.
    pub u_axis: Vector3,
    /// Unit vector mapped to the 2D Y axis.
    pub v_axis: Vector3,
}

impl CoplanarBasis {
    /// `u_axis × v_axis`.
    #[must_use]
    pub fn normal(&self) -> Vector3 {
        self.u_axis.cross(&self.v_axis)
    }
}

/// Derives a 2D frame for a coplanar point set.
///
/// The origin is the centroid and `u_axis` points at the farthest point
/// (first one wins ties). The set's normal comes from the first candidate,
/// taken in order of least alignment with `u_axis`, that spans a
/// non-degenerate plane with the origin and the farthest point.
///
/// # Errors
///
/// - [`ProjectionError::TooFewPoints`] for fewer than 3 points.
/// - [`ProjectionError::Coincident`] when every point lies on the centroid.
/// - [`ProjectionError::Collinear`] when no candidate spans a plane.
pub fn derive_2d_basis(points: &[Point3], tol: &Tolerance) -> Result<CoplanarBasis> {
    if points.len() < 3 {
        return Err(ProjectionError::TooFewPoints(points.len()).into());
    }

    #[allow(clippy::cast_precision_loss)]
    let count = points.len() as f64;
    let sum = points.iter().fold(Vector3::zeros(), |acc, p| acc + p.coords);
    let origin = Point3::from(sum / count);

    let mut far_idx = 0;
    let mut far_dist_sq = 0.0;
    for (i, p) in points.iter().enumerate() {
        let d = (p - origin).norm_squared();
        if d > far_dist_sq {
            far_idx = i;
            far_dist_sq = d;
        }
    }
    if far_dist_sq <= tol.distance_squared() {
        tracing::debug!(count = points.len(), "all points on centroid");
        return Err(ProjectionError::Coincident.into());
    }
    let far = points[far_idx];
    let u_axis = (far - origin) / far_dist_sq.sqrt();

    let mut candidates: Vec<(usize, f64)> = points
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != far_idx)
        .filter_map(|(i, p)| {
            let offset = p - origin;
            let len = offset.norm();
            (len > tol.distance()).then(|| (i, (offset.dot(&u_axis) / len).abs()))
        })
        .collect();
    candidates.sort_by(|a, b| a.1.total_cmp(&b.1));

    let plane = candidates
        .iter()
        .find_map(|&(i, _)| make_plane_from_3_points(&origin, &far, &points[i], tol))
        .ok_or_else(|| {
            tracing::debug!(count = points.len(), "no plane through point set");
            ProjectionError::Collinear
        })?;

    let v_axis = u_axis.cross(plane.normal()).normalize();
    Ok(CoplanarBasis {
        origin,
        u_axis,
        v_axis,
    })
}

/// Expresses each point in the basis' 2D frame.
///
/// Off-plane components are discarded.
#[must_use]
pub fn project_3d_to_2d(basis: &CoplanarBasis, points: &[Point3]) -> Vec<Point2> {
    points
        .iter()
        .map(|p| {
            let offset = p - basis.origin;
            Point2::new(offset.dot(&basis.u_axis), offset.dot(&basis.v_axis))
        })
        .collect()
}

/// Lifts 2D frame coordinates back into world space.
#[must_use]
pub fn project_2d_to_3d(basis: &CoplanarBasis, points: &[Point2]) -> Vec<Point3> {
    points
        .iter()
        .map(|p| basis.origin + basis.u_axis * p.x + basis.v_axis * p.y)
        .collect()
}
