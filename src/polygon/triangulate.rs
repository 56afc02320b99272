use std::f64::consts::{PI, TAU};

use crate::error::{Result, TriangulationError};
use crate::math::{orient_2d, Point2, Point3, SMALL};
use crate::tolerance::Tolerance;

use super::analysis::{point_in_polygon, polygon_area_2d};
use super::coplanar::{derive_2d_basis, project_3d_to_2d};

/// A vertex in the active ring. `prev`/`next` are ring positions.
#[derive(Debug, Clone, Copy)]
struct RingVertex {
    prev: usize,
    next: usize,
    interior_angle: f64,
    ear: bool,
}

/// Triangulates a simple 2D polygon by ear clipping.
///
/// Returns `n - 2` index triples into `points`, each counter-clockwise.
/// Clockwise input is re-wound internally. The ear with the largest interior
/// angle is clipped first (first one wins ties).
///
/// # Errors
///
/// - [`TriangulationError::TooFewVertices`] for fewer than 3 points.
/// - [`TriangulationError::NoEarFound`] when clipping stalls, which means the
///   polygon self-intersects or repeats vertices.
pub fn triangulate_ear_clipping(points: &[Point2]) -> Result<Vec<[usize; 3]>> {
    let n = points.len();
    if n < 3 {
        return Err(TriangulationError::TooFewVertices(n).into());
    }

    // Ring position -> input index, counter-clockwise.
    let order: Vec<usize> = if polygon_area_2d(points) < 0.0 {
        (0..n).rev().collect()
    } else {
        (0..n).collect()
    };
    let pts: Vec<Point2> = order.iter().map(|&i| points[i]).collect();

    let mut ring: Vec<RingVertex> = (0..n)
        .map(|i| RingVertex {
            prev: (i + n - 1) % n,
            next: (i + 1) % n,
            interior_angle: 0.0,
            ear: false,
        })
        .collect();
    for i in 0..n {
        refresh(&mut ring, &pts, i, n);
    }

    let mut triangles = Vec::with_capacity(n - 2);
    let mut start = 0;
    let mut remaining = n;
    while remaining > 3 {
        let ear = match best_ear(&ring, start, remaining) {
            Some(ear) => ear,
            None => {
                // Flags of non-neighbors go stale when a vertex inside their
                // triangle is clipped.
                let mut i = start;
                for _ in 0..remaining {
                    refresh(&mut ring, &pts, i, remaining);
                    i = ring[i].next;
                }
                best_ear(&ring, start, remaining).ok_or_else(|| {
                    tracing::debug!(remaining, "ear clipping stalled");
                    TriangulationError::NoEarFound { remaining }
                })?
            }
        };

        let RingVertex { prev, next, .. } = ring[ear];
        triangles.push([order[prev], order[ear], order[next]]);
        ring[prev].next = next;
        ring[next].prev = prev;
        if start == ear {
            start = next;
        }
        remaining -= 1;
        refresh(&mut ring, &pts, prev, remaining);
        refresh(&mut ring, &pts, next, remaining);
    }

    let last = ring[start];
    triangles.push([order[last.prev], order[start], order[last.next]]);
    tracing::trace!(vertices = n, triangles = triangles.len(), "ear clipping done");
    Ok(triangles)
}

/// Triangulates a planar polygon given in 3D.
///
/// The polygon is flattened into its own 2D frame first, so triangles are
/// counter-clockwise about that frame's normal.
///
/// # Errors
///
/// Fails when no 2D frame can be derived or when ear clipping fails (see
/// [`triangulate_ear_clipping`]).
pub fn triangulate_3d_coplanar(points: &[Point3], tol: &Tolerance) -> Result<Vec<[usize; 3]>> {
    let basis = derive_2d_basis(points, tol)?;
    triangulate_ear_clipping(&project_3d_to_2d(&basis, points))
}

/// The active ear with the largest interior angle, first one wins ties.
fn best_ear(ring: &[RingVertex], start: usize, remaining: usize) -> Option<usize> {
    let mut best: Option<usize> = None;
    let mut i = start;
    for _ in 0..remaining {
        let v = ring[i];
        let better = match best {
            Some(b) => v.interior_angle > ring[b].interior_angle,
            None => true,
        };
        if v.ear && better {
            best = Some(i);
        }
        i = v.next;
    }
    best
}

/// Recomputes convexity and ear status of ring position `i`.
fn refresh(ring: &mut [RingVertex], pts: &[Point2], i: usize, remaining: usize) {
    let RingVertex { prev, next, .. } = ring[i];
    let (a, b, c) = (pts[prev], pts[i], pts[next]);
    let angle = interior_angle(&a, &b, &c);
    ring[i].interior_angle = angle;
    ring[i].ear = angle < PI && !any_vertex_inside(ring, pts, [prev, i, next], remaining);
}

/// Interior angle at `b` of a counter-clockwise ring `a -> b -> c`, in
/// `[0, 2π)`.
fn interior_angle(a: &Point2, b: &Point2, c: &Point2) -> f64 {
    let to_prev = a - b;
    let to_next = c - b;
    let lengths = to_prev.norm() * to_next.norm();
    if lengths <= SMALL {
        return TAU;
    }
    let opening = (to_prev.dot(&to_next) / lengths).clamp(-1.0, 1.0).acos();
    if orient_2d(a, b, c) > 0.0 {
        opening
    } else {
        TAU - opening
    }
}

fn any_vertex_inside(ring: &[RingVertex], pts: &[Point2], tri: [usize; 3], remaining: usize) -> bool {
    let corners = tri.map(|i| pts[i]);
    let mut j = ring[tri[2]].next;
    for _ in 0..remaining.saturating_sub(3) {
        if point_in_polygon(&corners, &pts[j]) {
            return true;
        }
        j = ring[j].next;
    }
    false
}
