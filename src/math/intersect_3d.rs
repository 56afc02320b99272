use crate::geometry::plane::{classify_plane_pair, point_from_three_planes, Plane, PlaneRelation};
use crate::tolerance::Tolerance;

use super::distance_3d::distance_squared_point_to_line;
use super::predicates::points_equal;
use super::{snap_unit_interval, Point3, Vector3, SMALL, UNITIZE_TOL};

/// Outcome of intersecting two infinite lines.
///
/// This is the one line/line primitive of the kernel; closest-approach
/// queries that need distances rather than a hit go through
/// [`closest_approach_two_lines`](super::distance_3d::closest_approach_two_lines).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineIntersection {
    /// Not parallel, but not in a common plane either.
    Skew,
    /// Parallel and separated by more than the distance tolerance.
    Parallel,
    /// Same line. `t` places the second line's point on the first:
    /// `p + t * d = a`.
    Collinear { t: f64 },
    /// Single crossing at `p + t * d = a + u * c`.
    Point { t: f64, u: f64 },
}

/// Intersects the lines `p + t * d` and `a + u * c`.
///
/// Directions need not be unit length; `t` and `u` are in units of `d` and
/// `c`. The plane holding both lines is reduced to 2D by dropping the
/// dominant component of `d × c`, the 2x2 system is solved by Cramer's rule,
/// and the hit is checked on both lines before it is reported.
///
/// # Panics
///
/// Panics if either direction has (near) zero length.
#[must_use]
pub fn intersect_lines_3d(
    p: &Point3,
    d: &Vector3,
    a: &Point3,
    c: &Vector3,
    tol: &Tolerance,
) -> LineIntersection {
    assert!(
        d.norm_squared() > UNITIZE_TOL && c.norm_squared() > UNITIZE_TOL,
        "intersect_lines_3d: zero-length direction vector"
    );

    let h = a - p;
    let cos = d.dot(c) / (d.norm() * c.norm());
    if tol.is_parallel(cos) {
        if distance_squared_point_to_line(p, d, a) <= tol.distance_squared() {
            return LineIntersection::Collinear {
                t: h.dot(d) / d.norm_squared(),
            };
        }
        return LineIntersection::Parallel;
    }

    let n = d.cross(c);
    let separation = h.dot(&n).abs() / n.norm();
    if separation > tol.distance() {
        return LineIntersection::Skew;
    }

    // Drop the axis the common plane is most nearly perpendicular to.
    let (q, r) = match n.iamax() {
        0 => (1, 2),
        1 => (0, 2),
        _ => (0, 1),
    };
    let det = c[q] * d[r] - d[q] * c[r];
    if det.abs() <= SMALL {
        return LineIntersection::Parallel;
    }
    let t = (c[q] * h[r] - h[q] * c[r]) / det;
    let u = (d[q] * h[r] - h[q] * d[r]) / det;

    let hit_first = p + d * t;
    let hit_second = a + c * u;
    if !points_equal(&hit_first, &hit_second, tol) {
        tracing::trace!(%hit_first, %hit_second, "line solution inconsistent off-plane");
        return LineIntersection::Skew;
    }
    LineIntersection::Point { t, u }
}

/// Outcome of intersecting two line segments.
///
/// Segment parameters run over `[0, 1]` along each segment's own length and
/// are snapped to exactly `0.0` or `1.0` within the distance tolerance of an
/// endpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SegmentIntersection {
    /// The supporting lines cross (or are skew) outside at least one segment.
    Missed,
    /// The segments are parallel and not collinear.
    MissedParallel,
    /// Collinear, but the segments do not overlap.
    MissedCollinearDisjoint,
    /// Collinear and overlapping. Both parameters are measured along the
    /// *first* segment: where the second segment starts and where it ends.
    /// Values outside `[0, 1]` lie beyond the first segment.
    HitCollinearOverlap { q_start_on_p: f64, q_end_on_p: f64 },
    /// Single crossing at `p + dist_p * pdir = q + dist_q * qdir`.
    Hit { dist_p: f64, dist_q: f64 },
}

/// Intersects segments `p -> p + pdir` and `q -> q + qdir` in 3D.
///
/// # Panics
///
/// Panics if either direction has zero length.
#[must_use]
pub fn intersect_segment_segment_3d(
    p: &Point3,
    pdir: &Vector3,
    q: &Point3,
    qdir: &Vector3,
    tol: &Tolerance,
) -> SegmentIntersection {
    let pmag = pdir.norm();
    let qmag = qdir.norm();
    assert!(
        pmag > SMALL && qmag > SMALL,
        "intersect_segment_segment_3d: zero-length segment direction"
    );
    let ptol = tol.distance() / pmag;
    let qtol = tol.distance() / qmag;

    let result = match intersect_lines_3d(p, pdir, q, qdir, tol) {
        LineIntersection::Skew => SegmentIntersection::Missed,
        LineIntersection::Parallel => SegmentIntersection::MissedParallel,
        LineIntersection::Collinear { t } => {
            let q_end = t + qdir.dot(pdir) / (pmag * pmag);
            collinear_overlap(t, q_end, ptol)
        }
        LineIntersection::Point { t, u } => {
            hit_within_segments(snap_unit_interval(t, ptol), snap_unit_interval(u, qtol))
        }
    };
    tracing::debug!(?result, "segment/segment intersection");
    result
}

pub(crate) fn collinear_overlap(q_start: f64, q_end: f64, ptol: f64) -> SegmentIntersection {
    let q_start_on_p = snap_unit_interval(q_start, ptol);
    let q_end_on_p = snap_unit_interval(q_end, ptol);
    let both_after = q_start_on_p > 1.0 && q_end_on_p > 1.0;
    let both_before = q_start_on_p < 0.0 && q_end_on_p < 0.0;
    if both_after || both_before {
        SegmentIntersection::MissedCollinearDisjoint
    } else {
        SegmentIntersection::HitCollinearOverlap {
            q_start_on_p,
            q_end_on_p,
        }
    }
}

pub(crate) fn hit_within_segments(dist_p: f64, dist_q: f64) -> SegmentIntersection {
    let unit = 0.0..=1.0;
    if unit.contains(&dist_p) && unit.contains(&dist_q) {
        SegmentIntersection::Hit { dist_p, dist_q }
    } else {
        SegmentIntersection::Missed
    }
}

/// Outcome of intersecting an infinite line with a segment `a -> b`.
///
/// `t` is the parameter on the line, `p + t * d`. For `AtStart`/`AtEnd`,
/// prefer the original endpoint over evaluating the line at `t`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineSegmentIntersection {
    /// `a` and `b` are not distinct.
    DegenerateSegment,
    /// The line does not meet the segment's supporting line.
    Missed,
    /// The segment lies on the line; `t` locates `a`.
    Collinear { t: f64 },
    /// The lines cross before `a`.
    BeforeStart { t: f64 },
    /// The lines cross beyond `b`.
    AfterEnd { t: f64 },
    /// Crossing at `a`.
    AtStart { t: f64 },
    /// Crossing at `b`.
    AtEnd { t: f64 },
    /// Crossing strictly between `a` and `b`.
    Between { t: f64 },
}

/// Intersects the line `p + t * d` with the segment `a -> b`.
///
/// # Panics
///
/// Panics if `d` has zero length.
#[must_use]
pub fn intersect_line_segment_3d(
    p: &Point3,
    d: &Vector3,
    a: &Point3,
    b: &Point3,
    tol: &Tolerance,
) -> LineSegmentIntersection {
    let c = b - a;
    let c_sq = c.norm_squared();
    if c_sq < tol.distance_squared() {
        return LineSegmentIntersection::DegenerateSegment;
    }

    if distance_squared_point_to_line(p, d, a) <= tol.distance_squared()
        && distance_squared_point_to_line(p, d, b) <= tol.distance_squared()
    {
        return LineSegmentIntersection::Collinear {
            t: (a - p).dot(d) / d.norm_squared(),
        };
    }

    let (t, u) = match intersect_lines_3d(p, d, a, &c, tol) {
        LineIntersection::Skew | LineIntersection::Parallel => {
            return LineSegmentIntersection::Missed
        }
        LineIntersection::Collinear { t } => return LineSegmentIntersection::Collinear { t },
        LineIntersection::Point { t, u } => (t, u),
    };

    let fuzz = tol.distance() / c_sq.sqrt();
    if u < -fuzz {
        LineSegmentIntersection::BeforeStart { t }
    } else if u - 1.0 > fuzz {
        LineSegmentIntersection::AfterEnd { t }
    } else if u < fuzz {
        LineSegmentIntersection::AtStart { t }
    } else if u - 1.0 >= -fuzz {
        LineSegmentIntersection::AtEnd { t }
    } else {
        LineSegmentIntersection::Between { t }
    }
}

/// Where a point sits relative to the segment `a -> b`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointSegment {
    /// Within tolerance of `a`.
    AtStart,
    /// Within tolerance of `b`.
    AtEnd,
    /// On the segment; `param` is the fraction of `a -> b`.
    Within { param: f64 },
    /// On the supporting line but outside the segment.
    OnLineOutside { param: f64 },
    /// Farther than the distance tolerance from the supporting line.
    OffLine,
}

/// Tests whether `p` lies on the segment `a -> b`.
#[must_use]
pub fn intersect_point_segment(a: &Point3, b: &Point3, p: &Point3, tol: &Tolerance) -> PointSegment {
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
    if a_p.cross(&a_b).norm_squared() / len_sq > tol.distance_squared() {
        return PointSegment::OffLine;
    }

    let param = a_p.dot(&a_b) / len_sq;
    if (0.0..=1.0).contains(&param) {
        PointSegment::Within { param }
    } else {
        PointSegment::OnLineOutside { param }
    }
}

/// Outcome of intersecting a line with an outward-facing plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LinePlaneIntersection {
    /// Parallel to the plane and in front of it (outside the half-space).
    MissedOutside,
    /// Parallel to the plane and behind it (inside the half-space).
    MissedInside,
    /// The line lies in the plane.
    LiesOnPlane,
    /// Crosses into the half-space at `point + t * dir`.
    Entering { t: f64 },
    /// Crosses out of the half-space at `point + t * dir`.
    Leaving { t: f64 },
}

/// Intersects the line `point + t * dir` with `plane`.
///
/// `dir` need not be unit length; `t` is in units of `dir`. The line is
/// treated as parallel when the cosine between `dir` and the normal is within
/// the perpendicularity tolerance.
#[must_use]
pub fn intersect_line_plane(
    point: &Point3,
    dir: &Vector3,
    plane: &Plane,
    tol: &Tolerance,
) -> LinePlaneIntersection {
    let normal = plane.normal();
    let norm_dist = plane.offset() - normal.dot(&point.coords);
    let slant = normal.dot(dir);
    let dir_len = dir.norm();
    let cos = if dir_len > SMALL { slant / dir_len } else { 0.0 };

    if slant < -SMALL && cos < -tol.perpendicularity_cosine() {
        return LinePlaneIntersection::Entering {
            t: norm_dist / slant,
        };
    }
    if slant > SMALL && cos > tol.perpendicularity_cosine() {
        return LinePlaneIntersection::Leaving {
            t: norm_dist / slant,
        };
    }

    if norm_dist < -tol.distance() {
        LinePlaneIntersection::MissedOutside
    } else if norm_dist > tol.distance() {
        LinePlaneIntersection::MissedInside
    } else {
        LinePlaneIntersection::LiesOnPlane
    }
}

/// Outcome of intersecting two planes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlanePairIntersection {
    /// The planes cross along `point + s * dir`; `dir` is unit length.
    Line { point: Point3, dir: Vector3 },
    /// Same plane (either orientation).
    Coplanar,
    /// Parallel and distinct.
    ParallelDistinct,
    /// Not parallel, but no line could be solved for.
    NoIntersection,
}

/// Finds the line shared by two planes.
///
/// The start point lies on the axis-aligned plane through `rpp_min` that is
/// perpendicular to the dominant component of the line direction, and that
/// component is made positive, so geometry bounded below by `rpp_min` lies in
/// front of the start point. Pass the origin when no such anchoring is needed.
#[must_use]
pub fn intersect_two_planes(
    a: &Plane,
    b: &Plane,
    rpp_min: &Point3,
    tol: &Tolerance,
) -> PlanePairIntersection {
    match classify_plane_pair(a, b, tol) {
        PlaneRelation::CoplanarSameNormal | PlaneRelation::CoplanarOppositeNormal => {
            return PlanePairIntersection::Coplanar
        }
        PlaneRelation::ParallelDistinct => return PlanePairIntersection::ParallelDistinct,
        PlaneRelation::Intersecting => {}
    }

    let cross = a.normal().cross(b.normal());
    let len = cross.norm();
    if len <= SMALL {
        return PlanePairIntersection::NoIntersection;
    }
    let mut dir = cross / len;

    let axis = dir.iamax();
    if dir[axis] < 0.0 {
        dir = -dir;
    }
    let mut axis_normal = Vector3::zeros();
    axis_normal[axis] = 1.0;
    let anchor = Plane::new(axis_normal, rpp_min[axis]);

    match point_from_three_planes(&[anchor, *a, *b], tol) {
        Some(point) => PlanePairIntersection::Line { point, dir },
        None => {
            tracing::debug!(?a, ?b, "no start point for plane/plane line");
            PlanePairIntersection::NoIntersection
        }
    }
}

/// Whether two lines coincide within tolerance over `range` from their start
/// points.
///
/// Rejects lines more than about 25 degrees apart outright, then checks both
/// start points and the points `range` along each line against the other
/// line. `range` should be at least one model diameter. Directions need not
/// be unit length.
///
/// # Panics
///
/// Panics if either direction has zero length.
#[must_use]
pub fn lines_collinear(
    p1: &Point3,
    d1: &Vector3,
    p2: &Point3,
    d2: &Vector3,
    range: f64,
    tol: &Tolerance,
) -> bool {
    let mag1 = d1.norm();
    let mag2 = d2.norm();
    assert!(
        mag1 > SMALL && mag2 > SMALL,
        "lines_collinear: zero-length direction vector"
    );

    if d1.dot(d2).abs() < 0.9 * mag1 * mag2 {
        return false;
    }
    let dist_sq = tol.distance_squared();
    distance_squared_point_to_line(p1, d1, p2) <= dist_sq
        && distance_squared_point_to_line(p2, d2, p1) <= dist_sq
        && distance_squared_point_to_line(p2, d2, &(p1 + d1 * (range / mag1))) <= dist_sq
        && distance_squared_point_to_line(p1, d1, &(p2 + d2 * (range / mag2))) <= dist_sq
}

/// Intersects the line `origin + t * dir` with the triangle `v, a, b`.
///
/// Returns the hit point when it lies inside the triangle or on its boundary.
/// Lines parallel to the triangle and degenerate triangles never hit.
#[must_use]
pub fn intersect_ray_triangle(
    origin: &Point3,
    dir: &Vector3,
    v: &Point3,
    a: &Point3,
    b: &Point3,
) -> Option<Point3> {
    let va = a - v;
    let vb = b - v;
    let normal = va.cross(&vb);
    let len = normal.norm();
    if len <= SMALL {
        return None;
    }
    let normal = normal / len;

    let n_dot_dir = normal.dot(dir);
    if n_dot_dir.abs() <= SMALL {
        return None;
    }
    let t = (normal.dot(&v.coords) - normal.dot(&origin.coords)) / n_dot_dir;
    let hit = origin + dir * t;

    let vp = hit - v;
    let ab = b - a;
    let ap = hit - a;
    let inside = va.cross(&vp).dot(&normal) >= 0.0
        && vp.cross(&vb).dot(&normal) >= 0.0
        && ab.cross(&ap).dot(&normal) >= 0.0;
    inside.then_some(hit)
}
