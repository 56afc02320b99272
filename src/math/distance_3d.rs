use super::{Point3, Vector3, SMALL};
use crate::tolerance::Tolerance;

/// Distance from a point to an infinite line, plus where its foot lies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineDistance {
    /// Perpendicular distance from the point to the line.
    pub distance: f64,
    /// Signed distance from the line point to the foot of the perpendicular,
    /// in world units (i.e. the parameter along the *unitized* direction).
    pub along: f64,
}

/// Distance from `point` to the line `line_point + t * line_dir`.
///
/// `line_dir` may have any nonzero length; [`LineDistance::along`] is always
/// reported in world units. A zero-length direction yields a distance and
/// `along` of 0.
#[must_use]
pub fn distance_point_to_line(
    line_point: &Point3,
    line_dir: &Vector3,
    point: &Point3,
) -> LineDistance {
    let dir_len = line_dir.norm();
    if dir_len <= SMALL {
        return LineDistance {
            distance: 0.0,
            along: 0.0,
        };
    }
    let f = point - line_point;
    let along = f.dot(line_dir) / dir_len;
    let distance = f.cross(line_dir).norm() / dir_len;
    LineDistance { distance, along }
}

/// Squared distance from `point` to the line `line_point + t * line_dir`.
///
/// `line_dir` need not have unit length.
#[must_use]
pub fn distance_squared_point_to_line(
    line_point: &Point3,
    line_dir: &Vector3,
    point: &Point3,
) -> f64 {
    let dir_len_sq = line_dir.norm_squared();
    if dir_len_sq <= SMALL {
        return 0.0;
    }
    (point - line_point).cross(line_dir).norm_squared() / dir_len_sq
}

/// Scaled projection of `point` onto the line: `dot(point - line_point, line_dir)`.
///
/// This is the world-space distance along the line only when `line_dir` is
/// unit length; otherwise it is scaled by `|line_dir|`. Use
/// [`distance_point_to_line`] for the unscaled value.
#[must_use]
pub fn projection_along_line(line_point: &Point3, line_dir: &Vector3, point: &Point3) -> f64 {
    (point - line_point).dot(line_dir)
}

/// Distance between the line `line_point + t * line_dir` and the origin.
#[must_use]
pub fn distance_line_to_origin(line_point: &Point3, line_dir: &Vector3) -> f64 {
    distance_point_to_line(line_point, line_dir, &Point3::origin()).distance
}

/// Where a point sits relative to a line segment `a -> b`.
///
/// Every variant carries `pca`, the point of closest approach on the segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SegmentProximity {
    /// Within tolerance of `a`.
    AtStart { pca: Point3 },
    /// Within tolerance of `b`.
    AtEnd { pca: Point3 },
    /// Within tolerance of the segment interior. `param` is `|pca - a| / |b - a|`.
    OnSegment { param: f64, pca: Point3 },
    /// Beyond `a`; `distance` is `|p - a|`.
    BeforeStart { distance: f64, pca: Point3 },
    /// Beyond `b`; `distance` is `|p - b|`.
    AfterEnd { distance: f64, pca: Point3 },
    /// Off to the side of the segment interior; `distance` is `|p - pca|`.
    Beside { distance: f64, pca: Point3 },
}

/// Distance from point `p` to the segment `a -> b`, with point of closest approach.
#[must_use]
pub fn distance_point_to_segment(
    a: &Point3,
    b: &Point3,
    p: &Point3,
    tol: &Tolerance,
) -> SegmentProximity {
    let p_a = p - a;
    let p_a_sq = p_a.norm_squared();
    if p_a_sq < tol.distance_squared() {
        return SegmentProximity::AtStart { pca: *a };
    }

    let p_b = p - b;
    let p_b_sq = p_b.norm_squared();
    if p_b_sq < tol.distance_squared() {
        return SegmentProximity::AtEnd { pca: *b };
    }

    let a_b = b - a;
    let len = a_b.norm();
    let t = if len <= SMALL { 0.0 } else { p_a.dot(&a_b) / len };

    if t <= 0.0 {
        return SegmentProximity::BeforeStart {
            distance: p_a_sq.sqrt(),
            pca: *a,
        };
    }
    if t >= len {
        return SegmentProximity::AfterEnd {
            distance: p_b_sq.sqrt(),
            pca: *b,
        };
    }

    let param = t / len;
    let pca = a + a_b * param;
    let dist_sq = p_a.cross(&a_b).norm_squared() / (len * len);
    if dist_sq <= tol.distance_squared() {
        SegmentProximity::OnSegment { param, pca }
    } else {
        SegmentProximity::Beside {
            distance: dist_sq.sqrt(),
            pca,
        }
    }
}

/// Points of closest approach between two infinite lines.
///
/// Parameters are expressed in units of the caller's direction vectors:
/// `point_on_first = p1 + param_on_first * d1` and
/// `point_on_second = p2 + param_on_second * d2`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosestApproach {
    pub param_on_first: f64,
    pub param_on_second: f64,
    /// Squared distance between the two points of closest approach.
    pub distance_squared: f64,
    pub point_on_first: Point3,
    pub point_on_second: Point3,
    /// The lines are parallel. `param_on_first` is then `0.0` and
    /// `param_on_second` locates the foot of `p1` on the second line, so
    /// `distance_squared` is still the separation of the two lines. This
    /// departs from zeroing both parameters, which would leave
    /// `distance_squared` as the distance between the two base points.
    pub parallel: bool,
}

/// Closest approach of the lines `p1 + s * d1` and `p2 + t * d2`.
///
/// Minimizes the squared distance by setting both partial derivatives to zero.
/// Directions need not be unit length.
///
/// # Panics
///
/// Panics if either direction has zero length.
#[must_use]
pub fn closest_approach_two_lines(
    p1: &Point3,
    d1: &Vector3,
    p2: &Point3,
    d2: &Vector3,
    tol: &Tolerance,
) -> ClosestApproach {
    let len1 = d1.norm();
    let len2 = d2.norm();
    assert!(
        len1 > SMALL && len2 > SMALL,
        "closest_approach_two_lines: zero-length direction vector"
    );
    let u1 = d1 / len1;
    let u2 = d2 / len2;
    let w = p1 - p2;
    let cos = u1.dot(&u2);

    // Distances along the unitized directions.
    let (s, t, parallel) = if tol.is_parallel(cos) {
        (0.0, w.dot(&u2), true)
    } else {
        let denom = 1.0 - cos * cos;
        let t = w.dot(&(u2 - u1 * cos)) / denom;
        let s = t * cos - w.dot(&u1);
        (s, t, false)
    };

    let point_on_first = p1 + u1 * s;
    let point_on_second = p2 + u2 * t;
    let approach = ClosestApproach {
        param_on_first: s / len1,
        param_on_second: t / len2,
        distance_squared: (point_on_first - point_on_second).norm_squared(),
        point_on_first,
        point_on_second,
        parallel,
    };
    tracing::trace!(?approach, "closest approach of two lines");
    approach
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn v(x: f64, y: f64, z: f64) -> Vector3 {
        Vector3::new(x, y, z)
    }

    // ── distance_point_to_line ──

    #[test]
    fn distance_with_unit_direction() {
        let d = distance_point_to_line(&p(0.0, 0.0, 0.0), &v(1.0, 0.0, 0.0), &p(3.0, 4.0, 0.0));
        assert_relative_eq!(d.distance, 4.0);
        assert_relative_eq!(d.along, 3.0);
    }

    #[test]
    fn along_is_unscaled_for_long_direction() {
        let d = distance_point_to_line(&p(0.0, 0.0, 0.0), &v(10.0, 0.0, 0.0), &p(3.0, 4.0, 0.0));
        assert_relative_eq!(d.distance, 4.0);
        assert_relative_eq!(d.along, 3.0);
    }

    #[test]
    fn projection_is_scaled_by_direction_length() {
        let t = projection_along_line(&p(0.0, 0.0, 0.0), &v(10.0, 0.0, 0.0), &p(3.0, 4.0, 0.0));
        assert_relative_eq!(t, 30.0);
    }

    #[test]
    fn distance_squared_matches_distance() {
        let lp = p(1.0, 2.0, 3.0);
        let dir = v(0.0, 2.0, 2.0);
        let pt = p(5.0, -1.0, 7.0);
        let d = distance_point_to_line(&lp, &dir, &pt).distance;
        assert_relative_eq!(distance_squared_point_to_line(&lp, &dir, &pt), d * d, epsilon = 1e-9);
    }

    #[test]
    fn point_on_line_has_zero_distance() {
        let d = distance_point_to_line(&p(0.0, 0.0, 0.0), &v(1.0, 1.0, 0.0), &p(2.0, 2.0, 0.0));
        assert!(d.distance.abs() < 1e-9);
    }

    #[test]
    fn point_on_line_far_from_origin() {
        let s = 15481.0;
        let dir = v(3.0 * s, 3.0 * s, 3.0 * s);
        let on = p(1.7 * s, 1.7 * s, 1.7 * s);
        let d = distance_point_to_line(&p(0.0, 0.0, 0.0), &dir, &on);
        assert!(d.distance < 1e-9);
        assert!(distance_squared_point_to_line(&p(0.0, 0.0, 0.0), &dir, &on) < 1e-18);

        let diag = distance_point_to_line(&p(0.0, 0.0, 0.0), &v(1.0, 1.0, 0.0), &p(1000.0, 1000.0, 0.0));
        assert!(diag.distance < 1e-9);
    }

    #[test]
    fn point_inside_long_segment_is_on_it() {
        let tol = Tolerance::default();
        let s = 15481.0;
        match distance_point_to_segment(
            &p(0.0, 0.0, 0.0),
            &p(3.0 * s, 3.0 * s, 3.0 * s),
            &p(1.7 * s, 1.7 * s, 1.7 * s),
            &tol,
        ) {
            SegmentProximity::OnSegment { param, .. } => {
                assert_relative_eq!(param, 1.7 / 3.0, epsilon = 1e-12);
            }
            other => panic!("expected OnSegment, got {other:?}"),
        }
    }

    #[test]
    fn line_to_origin() {
        let d = distance_line_to_origin(&p(0.0, 5.0, 0.0), &v(1.0, 0.0, 0.0));
        assert_relative_eq!(d, 5.0);
    }

    // ── distance_point_to_segment ──

    #[test]
    fn segment_proximity_cases() {
        let tol = Tolerance::default();
        let a = p(0.0, 0.0, 0.0);
        let b = p(10.0, 0.0, 0.0);

        assert!(matches!(
            distance_point_to_segment(&a, &b, &p(0.0, 0.0, 0.0001), &tol),
            SegmentProximity::AtStart { .. }
        ));
        assert!(matches!(
            distance_point_to_segment(&a, &b, &p(10.0, 0.0, 0.0), &tol),
            SegmentProximity::AtEnd { .. }
        ));
        match distance_point_to_segment(&a, &b, &p(2.5, 0.0, 0.0), &tol) {
            SegmentProximity::OnSegment { param, .. } => assert_relative_eq!(param, 0.25),
            other => panic!("expected OnSegment, got {other:?}"),
        }
        match distance_point_to_segment(&a, &b, &p(-3.0, 4.0, 0.0), &tol) {
            SegmentProximity::BeforeStart { distance, pca } => {
                assert_relative_eq!(distance, 5.0);
                assert_eq!(pca, a);
            }
            other => panic!("expected BeforeStart, got {other:?}"),
        }
        assert!(matches!(
            distance_point_to_segment(&a, &b, &p(12.0, 1.0, 0.0), &tol),
            SegmentProximity::AfterEnd { .. }
        ));
        match distance_point_to_segment(&a, &b, &p(5.0, 2.0, 0.0), &tol) {
            SegmentProximity::Beside { distance, pca } => {
                assert_relative_eq!(distance, 2.0);
                assert_relative_eq!(pca.x, 5.0);
            }
            other => panic!("expected Beside, got {other:?}"),
        }
    }

    // ── closest_approach_two_lines ──

    #[test]
    fn skew_lines() {
        let tol = Tolerance::default();
        // X axis and a line parallel to Y through (0, 0, 2)
        let ca = closest_approach_two_lines(
            &p(-5.0, 0.0, 0.0),
            &v(2.0, 0.0, 0.0),
            &p(0.0, 3.0, 2.0),
            &v(0.0, 1.0, 0.0),
            &tol,
        );
        assert!(!ca.parallel);
        assert_relative_eq!(ca.param_on_first, 2.5);
        assert_relative_eq!(ca.param_on_second, -3.0);
        assert_relative_eq!(ca.distance_squared, 4.0);
        assert_relative_eq!(ca.point_on_first.x, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn intersecting_lines_have_zero_distance() {
        let tol = Tolerance::default();
        let ca = closest_approach_two_lines(
            &p(0.0, 0.0, 0.0),
            &v(1.0, 1.0, 0.0),
            &p(4.0, 0.0, 0.0),
            &v(-1.0, 1.0, 0.0),
            &tol,
        );
        assert!(!ca.parallel);
        assert!(ca.distance_squared < 1e-18);
        assert_relative_eq!(ca.point_on_first.x, 2.0, epsilon = 1e-12);
        assert_relative_eq!(ca.point_on_first.y, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn parallel_lines_report_flag() {
        let tol = Tolerance::default();
        let ca = closest_approach_two_lines(
            &p(0.0, 0.0, 0.0),
            &v(1.0, 0.0, 0.0),
            &p(0.0, 1.0, 0.0),
            &v(1.0, 0.0, 0.0),
            &tol,
        );
        assert!(ca.parallel);
        assert_eq!(ca.param_on_first, 0.0);
        assert_relative_eq!(ca.param_on_second, 0.0);
        assert_relative_eq!(ca.distance_squared, 1.0);
    }

    #[test]
    fn anti_parallel_lines_foot_point() {
        let tol = Tolerance::default();
        let ca = closest_approach_two_lines(
            &p(3.0, 0.0, 0.0),
            &v(1.0, 0.0, 0.0),
            &p(0.0, 2.0, 0.0),
            &v(-2.0, 0.0, 0.0),
            &tol,
        );
        assert!(ca.parallel);
        assert_relative_eq!(ca.param_on_second, -1.5);
        assert_relative_eq!(ca.point_on_second.x, 3.0);
        assert_relative_eq!(ca.distance_squared, 4.0);
    }

    #[test]
    #[should_panic(expected = "zero-length direction")]
    fn zero_direction_panics() {
        let tol = Tolerance::default();
        let _ = closest_approach_two_lines(
            &p(0.0, 0.0, 0.0),
            &v(0.0, 0.0, 0.0),
            &p(0.0, 1.0, 0.0),
            &v(1.0, 0.0, 0.0),
            &tol,
        );
    }
}
