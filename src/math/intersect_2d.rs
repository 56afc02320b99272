use crate::tolerance::Tolerance;

use super::distance_2d::distance_squared_point_to_line_2d;
use super::intersect_3d::{collinear_overlap, hit_within_segments, PointSegment, SegmentIntersection};
use super::{cross_2d, snap_unit_interval, Point2, Vector2, SMALL};

/// Outcome of intersecting two infinite 2D lines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineIntersection2d {
    /// Parallel and separated by more than the distance tolerance.
    Parallel,
    /// Same line. The second line's point and that point plus its direction
    /// land at `t_start` and `t_end` on the first line.
    Collinear { t_start: f64, t_end: f64 },
    /// Single crossing at `p + t * d = a + u * c`.
    Point { t: f64, u: f64 },
}

/// Intersects the 2D lines `p + t * d` and `a + u * c`.
///
/// # Panics
///
/// Panics if either direction has zero length.
#[must_use]
pub fn intersect_lines_2d(
    p: &Point2,
    d: &Vector2,
    a: &Point2,
    c: &Vector2,
    tol: &Tolerance,
) -> LineIntersection2d {
    let d_len = d.norm();
    let c_len = c.norm();
    assert!(
        d_len > SMALL && c_len > SMALL,
        "intersect_lines_2d: zero-length direction vector"
    );

    let h = a - p;
    if tol.is_parallel(d.dot(c) / (d_len * c_len)) {
        if distance_squared_point_to_line_2d(p, d, a) > tol.distance_squared() {
            return LineIntersection2d::Parallel;
        }
        let d_sq = d_len * d_len;
        return LineIntersection2d::Collinear {
            t_start: h.dot(d) / d_sq,
            t_end: (h + c).dot(d) / d_sq,
        };
    }

    let det = cross_2d(d, c);
    LineIntersection2d::Point {
        t: cross_2d(&h, c) / det,
        u: cross_2d(&h, d) / det,
    }
}

/// Intersects 2D segments `p -> p + pdir` and `q -> q + qdir`.
///
/// Reports through the same variants as
/// [`intersect_segment_segment_3d`](super::intersect_3d::intersect_segment_segment_3d),
/// with the same endpoint snapping.
///
/// # Panics
///
/// Panics if either direction has zero length.
#[must_use]
pub fn intersect_segments_2d(
    p: &Point2,
    pdir: &Vector2,
    q: &Point2,
    qdir: &Vector2,
    tol: &Tolerance,
) -> SegmentIntersection {
    let ptol = tol.distance() / pdir.norm();
    let qtol = tol.distance() / qdir.norm();

    let result = match intersect_lines_2d(p, pdir, q, qdir, tol) {
        LineIntersection2d::Parallel => SegmentIntersection::MissedParallel,
        LineIntersection2d::Collinear { t_start, t_end } => collinear_overlap(t_start, t_end, ptol),
        LineIntersection2d::Point { t, u } => {
            hit_within_segments(snap_unit_interval(t, ptol), snap_unit_interval(u, qtol))
        }
    };
    tracing::trace!(?result, "2d segment/segment intersection");
    result
}

/// Tests whether the 2D point `p` lies on the segment `a -> b`.
#[must_use]
pub fn intersect_point_segment_2d(a: &Point2, b: &Point2, p: &Point2, tol: &Tolerance) -> PointSegment {
    let a_p = p - a;
    if a_p.norm_squared() < tol.distance_squared() {
        return PointSegment::AtStart;
    }
    if (p - b).norm_squared() < tol.distance_squared() {
        return PointSegment::AtEnd;
    }

    let a_b = b - a;
    let len_sq = a_b.norm_squared();
    if len_sq < tol.distance_squared() {
        return PointSegment::OffLine;
    }
    let off = cross_2d(&a_b, &a_p);
    if off * off / len_sq > tol.distance_squared() {
        return PointSegment::OffLine;
    }

    let param = a_p.dot(&a_b) / len_sq;
    if (0.0..=1.0).contains(&param) {
        PointSegment::Within { param }
    } else {
        PointSegment::OnLineOutside { param }
    }
}
