use std::collections::VecDeque;

use crate::error::Result;
use crate::math::{orient_2d, Point2, Point3, SMALL};
use crate::tolerance::Tolerance;

use super::coplanar::{derive_2d_basis, project_2d_to_3d, project_3d_to_2d};

/// Convex hull of a simple polyline (Melkman's algorithm).
///
/// The input need not be closed. Returns the hull counter-clockwise,
/// starting at the last polyline vertex that made it onto the hull, with
/// collinear boundary vertices dropped. A leading run of collinear vertices
/// is collapsed to its two extreme points before the deque is seeded. Inputs
/// with no three non-collinear points return their distinct extremes (one or
/// two points, or none for empty input).
///
/// The result is only a hull if the polyline does not self-intersect; use
/// [`hull_2d_from_point_set`] for unordered points.
#[must_use]
pub fn hull_2d_from_polyline(points: &[Point2]) -> Vec<Point2> {
    let Some((&first, _)) = points.split_first() else {
        return Vec::new();
    };

    let Some(second_idx) = points.iter().position(|p| !coincident(p, &first)) else {
        return vec![first];
    };
    let second = points[second_idx];
    let dir = second - first;

    let (mut lo, mut lo_s) = (first, 0.0);
    let (mut hi, mut hi_s) = (second, dir.norm_squared());
    let mut idx = second_idx + 1;
    while idx < points.len() && orient_2d(&first, &second, &points[idx]).abs() <= SMALL {
        let s = (points[idx] - first).dot(&dir);
        if s < lo_s {
            (lo, lo_s) = (points[idx], s);
        } else if s > hi_s {
            (hi, hi_s) = (points[idx], s);
        }
        idx += 1;
    }
    if idx == points.len() {
        tracing::trace!(count = points.len(), "polyline is collinear");
        return vec![lo, hi];
    }

    let third = points[idx];
    let mut deque: VecDeque<Point2> = VecDeque::with_capacity(2 * points.len() + 1);
    if orient_2d(&lo, &hi, &third) > 0.0 {
        deque.extend([third, lo, hi, third]);
    } else {
        deque.extend([third, hi, lo, third]);
    }

    for &pt in &points[idx + 1..] {
        let len = deque.len();
        let left_of_bottom = orient_2d(&deque[0], &deque[1], &pt) > 0.0;
        let left_of_top = orient_2d(&deque[len - 2], &deque[len - 1], &pt) > 0.0;
        if left_of_bottom && left_of_top {
            continue;
        }

        while deque.len() >= 2 {
            let len = deque.len();
            if orient_2d(&deque[len - 2], &deque[len - 1], &pt) > 0.0 {
                break;
            }
            deque.pop_back();
        }
        deque.push_back(pt);

        while deque.len() >= 2 {
            if orient_2d(&deque[0], &deque[1], &pt) > 0.0 {
                break;
            }
            deque.pop_front();
        }
        deque.push_front(pt);
    }

    // Front and back hold the same vertex.
    deque.pop_back();
    deque.into()
}

/// Convex hull of an unordered point set.
///
/// Sorts the points descending by `x`, then `y`, which makes them a simple
/// monotone polyline, collapses exact duplicates and hands the result to
/// [`hull_2d_from_polyline`]. The hull starts at the lowest-left point and
/// runs counter-clockwise, so hulling a hull returns it unchanged.
#[must_use]
pub fn hull_2d_from_point_set(points: &[Point2]) -> Vec<Point2> {
    let mut sorted = points.to_vec();
    sorted.sort_by(|a, b| b.x.total_cmp(&a.x).then(b.y.total_cmp(&a.y)));
    sorted.dedup_by(|a, b| coincident(a, b));
    hull_2d_from_polyline(&sorted)
}

/// Convex hull of a coplanar 3D point set.
///
/// Projects into the set's own 2D frame, hulls there and lifts the result
/// back. Off-plane components of the input are lost.
///
/// # Errors
///
/// Fails when no 2D frame can be derived (see
/// [`derive_2d_basis`](super::coplanar::derive_2d_basis)).
pub fn hull_3d_coplanar(points: &[Point3], tol: &Tolerance) -> Result<Vec<Point3>> {
    let basis = derive_2d_basis(points, tol)?;
    let flat = project_3d_to_2d(&basis, points);
    let hull = hull_2d_from_point_set(&flat);
    tracing::debug!(input = points.len(), hull = hull.len(), "coplanar hull");
    Ok(project_2d_to_3d(&basis, &hull))
}

fn coincident(a: &Point2, b: &Point2) -> bool {
    (a.x - b.x).abs() <= SMALL && (a.y - b.y).abs() <= SMALL
}
