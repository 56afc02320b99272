use crate::error::Result;
use crate::math::predicates::angle_measure;
use crate::math::{cross_2d, Point2, Point3, Vector3, SMALL};
use crate::tolerance::Tolerance;

use super::coplanar::{derive_2d_basis, project_2d_to_3d, project_3d_to_2d};

/// Unsigned area of a planar polygon in 3D.
///
/// The polygon's plane is derived from its own vertices (see
/// [`derive_2d_basis`](super::coplanar::derive_2d_basis)), so the result does
/// not depend on the length or sign of any caller-side normal.
///
/// # Errors
///
/// Fails when the vertices do not span a plane: fewer than 3 points, all
/// points coincident, or all points collinear.
pub fn polygon_area(points: &[Point3], tol: &Tolerance) -> Result<f64> {
    let basis = derive_2d_basis(points, tol)?;
    Ok(polygon_area_with_normal(points, &basis.normal()))
}

/// Unsigned area of a planar polygon in 3D about a known plane normal.
///
/// Triangles and quadrilaterals use the edge and diagonal cross products;
/// larger polygons sum `pᵢ × pᵢ₊₁` around the loop. `normal` is normalized
/// first, and a zero-length normal or fewer than 3 points give 0.
#[must_use]
pub fn polygon_area_with_normal(points: &[Point3], normal: &Vector3) -> f64 {
    let Some(normal) = normal.try_normalize(SMALL) else {
        return 0.0;
    };
    let twice_area = match points {
        [] | [_] | [_, _] => return 0.0,
        [a, b, c] => (b - a).cross(&(c - a)).dot(&normal),
        [a, b, c, d] => (c - a).cross(&(d - b)).dot(&normal),
        _ => {
            let n = points.len();
            (0..n)
                .map(|i| points[i].coords.cross(&points[(i + 1) % n].coords))
                .sum::<Vector3>()
                .dot(&normal)
        }
    };
    (twice_area * 0.5).abs()
}

/// Signed area of a 2D polygon (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise.
#[must_use]
pub fn polygon_area_2d(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Area-weighted centroid of a planar polygon in 3D.
///
/// The polygon is flattened into its own 2D frame, the standard polygon
/// centroid is taken there and lifted back. A polygon whose signed area
/// vanishes (a figure eight with equal lobes, say) falls back to the average
/// of its vertices.
///
/// # Errors
///
/// Fails when the vertices do not span a plane (see
/// [`derive_2d_basis`](super::coplanar::derive_2d_basis)).
pub fn polygon_centroid(points: &[Point3], tol: &Tolerance) -> Result<Point3> {
    let basis = derive_2d_basis(points, tol)?;
    let flat = project_3d_to_2d(&basis, points);
    let n = flat.len();

    let mut twice_area = 0.0;
    let mut cx = 0.0;
    let mut cy = 0.0;
    for i in 0..n {
        let (a, b) = (flat[i], flat[(i + 1) % n]);
        let cross = cross_2d(&a.coords, &b.coords);
        twice_area += cross;
        cx += (a.x + b.x) * cross;
        cy += (a.y + b.y) * cross;
    }

    let centroid = if twice_area.abs() <= tol.distance_squared() {
        tracing::debug!(twice_area, "zero-area polygon, using vertex average");
        #[allow(clippy::cast_precision_loss)]
        let count = n as f64;
        let sum = flat.iter().fold(Point2::origin().coords, |acc, p| acc + p.coords);
        Point2::from(sum / count)
    } else {
        Point2::new(cx / (3.0 * twice_area), cy / (3.0 * twice_area))
    };
    Ok(project_2d_to_3d(&basis, &[centroid])[0])
}

/// Even-odd containment test for a 2D polygon (Franklin's crossing test).
///
/// Casts a ray in +X from `test_point` and counts edge crossings. Points
/// exactly on the boundary are classified consistently for a given vertex
/// order but may land either inside or outside.
#[must_use]
pub fn point_in_polygon(vertices: &[Point2], test_point: &Point2) -> bool {
    let n = vertices.len();
    if n == 0 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (vi, vj) = (vertices[i], vertices[j]);
        if (vi.y > test_point.y) != (vj.y > test_point.y)
            && test_point.x < (vj.x - vi.x) * (test_point.y - vi.y) / (vj.y - vi.y) + vi.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Orders the vertices of a convex planar polygon counter-clockwise about
/// `reference_normal`.
///
/// Vertices are sorted by their angle around the vertex centroid, measured
/// from the first vertex that does not sit on the centroid. The sort is
/// stable and that vertex stays in front of every other vertex off the
/// centroid. Fewer than 3 points are returned as given.
#[must_use]
pub fn sort_vertices_ccw(points: &[Point3], reference_normal: &Vector3) -> Vec<Point3> {
    if points.len() < 3 {
        return points.to_vec();
    }
    #[allow(clippy::cast_precision_loss)]
    let count = points.len() as f64;
    let center = Point3::from(points.iter().fold(Vector3::zeros(), |acc, p| acc + p.coords) / count);

    let Some((x_idx, x_dir)) = points
        .iter()
        .map(|p| p - center)
        .enumerate()
        .find_map(|(i, d)| d.try_normalize(SMALL).map(|dir| (i, dir)))
    else {
        return points.to_vec();
    };
    let y_dir = reference_normal.cross(&x_dir);

    // Only the vertex that defines `x_dir` is pinned to angle 0. A vertex on
    // the centroid has no direction and sorts first.
    let mut keyed: Vec<(f64, Point3)> = points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let offset = p - center;
            let angle = if i == x_idx || offset.norm() <= SMALL {
                0.0
            } else {
                angle_measure(&offset, &x_dir, &y_dir)
            };
            (angle, *p)
        })
        .collect();
    keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
    keyed.into_iter().map(|(_, p)| p).collect()
}
