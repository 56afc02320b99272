use super::{cross_2d, Point2, Vector2, SMALL};
use crate::tolerance::Tolerance;

/// Distance from `point` to the 2D line `line_point + t * line_dir`.
///
/// `line_dir` need not have unit length. Returns 0 for a zero direction.
#[must_use]
pub fn distance_point_to_line_2d(line_point: &Point2, line_dir: &Vector2, point: &Point2) -> f64 {
    distance_squared_point_to_line_2d(line_point, line_dir, point).sqrt()
}

/// Squared distance from `point` to the 2D line `line_point + t * line_dir`.
#[must_use]
pub fn distance_squared_point_to_line_2d(
    line_point: &Point2,
    line_dir: &Vector2,
    point: &Point2,
) -> f64 {
    let dir_len_sq = line_dir.norm_squared();
    if dir_len_sq <= SMALL {
        return 0.0;
    }
    let cross = cross_2d(&(point - line_point), line_dir);
    cross * cross / dir_len_sq
}

/// Scaled projection `dot(point - line_point, line_dir)`; world distance only
/// for a unit `line_dir`.
#[must_use]
pub fn projection_along_line_2d(line_point: &Point2, line_dir: &Vector2, point: &Point2) -> f64 {
    (point - line_point).dot(line_dir)
}

/// Where a 2D point sits relative to a segment `a -> b`.
///
/// Distances other than the on-segment parameter are squared, which is all
/// the 2D callers need.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SegmentProximity2d {
    AtStart { pca: Point2 },
    AtEnd { pca: Point2 },
    /// `param` is `|pca - a| / |b - a|`.
    OnSegment { param: f64, pca: Point2 },
    BeforeStart { distance_squared: f64, pca: Point2 },
    AfterEnd { distance_squared: f64, pca: Point2 },
    Beside { distance_squared: f64, pca: Point2 },
}

/// Squared distance from `p` to the segment `a -> b`, with point of closest approach.
#[must_use]
pub fn distance_point_to_segment_2d(
    a: &Point2,
    b: &Point2,
    p: &Point2,
    tol: &Tolerance,
) -> SegmentProximity2d {
    let p_a = p - a;
    let p_a_sq = p_a.norm_squared();
    if p_a_sq < tol.distance_squared() {
        return SegmentProximity2d::AtStart { pca: *a };
    }

    let p_b = p - b;
    let p_b_sq = p_b.norm_squared();
    if p_b_sq < tol.distance_squared() {
        return SegmentProximity2d::AtEnd { pca: *b };
    }

    let a_b = b - a;
    let len = a_b.norm();
    let t = if len <= SMALL { 0.0 } else { p_a.dot(&a_b) / len };

    if t <= 0.0 {
        return SegmentProximity2d::BeforeStart {
            distance_squared: p_a_sq,
            pca: *a,
        };
    }
    if t >= len {
        return SegmentProximity2d::AfterEnd {
            distance_squared: p_b_sq,
            pca: *b,
        };
    }

    let param = t / len;
    let pca = a + a_b * param;
    let cross = cross_2d(&p_a, &a_b);
    let dist_sq = cross * cross / (len * len);
    if dist_sq <= tol.distance_squared() {
        SegmentProximity2d::OnSegment { param, pca }
    } else {
        SegmentProximity2d::Beside {
            distance_squared: dist_sq,
            pca,
        }
    }
}
