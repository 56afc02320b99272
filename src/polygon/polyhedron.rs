use crate::geometry::plane::{point_from_three_planes, Plane};
use crate::math::Point3;
use crate::tolerance::Tolerance;

/// Recovers the vertices of each face of a convex polyhedron given as an
/// intersection of half-spaces.
///
/// Every triple of planes that meets in a single point yields a candidate
/// vertex. A candidate in front of any other plane by more than the distance
/// tolerance lies outside the solid and is dropped; otherwise it is appended
/// to the lists of all three planes. Output index `i` belongs to `planes[i]`.
///
/// Vertices come out unordered, and a corner shared by more than three
/// planes shows up once per contributing triple. Pass each list through
/// [`sort_vertices_ccw`](super::analysis::sort_vertices_ccw) before using it
/// as a polygon.
#[must_use]
pub fn enumerate_polyhedron_face_vertices(planes: &[Plane], tol: &Tolerance) -> Vec<Vec<Point3>> {
    let count = planes.len();
    let mut faces = vec![Vec::new(); count];

    for i in 0..count {
        for j in i + 1..count {
            for k in j + 1..count {
                let Some(point) = point_from_three_planes(&[planes[i], planes[j], planes[k]], tol)
                else {
                    continue;
                };
                let outside = planes.iter().enumerate().any(|(m, plane)| {
                    m != i && m != j && m != k && plane.signed_distance(&point) > tol.distance()
                });
                if outside {
                    tracing::trace!(i, j, k, %point, "corner outside solid");
                    continue;
                }
                faces[i].push(point);
                faces[j].push(point);
                faces[k].push(point);
            }
        }
    }

    tracing::debug!(
        planes = count,
        vertices = faces.iter().map(Vec::len).sum::<usize>(),
        "polyhedron faces enumerated"
    );
    faces
}
