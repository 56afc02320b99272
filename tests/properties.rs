#![allow(clippy::unwrap_used)]

use geotol::math::{Point2, Point3, Vector3};
use geotol::polygon::{
    derive_2d_basis, hull_2d_from_point_set, point_in_polygon, polygon_area, polygon_area_2d,
    project_2d_to_3d, project_3d_to_2d, triangulate_ear_clipping,
};
use geotol::Tolerance;
use proptest::prelude::*;

fn coord() -> impl Strategy<Value = f64> {
    -10.0..10.0_f64
}

fn point3() -> impl Strategy<Value = Point3> {
    (coord(), coord(), coord()).prop_map(|(x, y, z)| Point3::new(x, y, z))
}

fn point2() -> impl Strategy<Value = Point2> {
    (coord(), coord()).prop_map(|(x, y)| Point2::new(x, y))
}

/// A star-shaped polygon around the origin: evenly spaced angles with a
/// random radius each, counter-clockwise.
fn star_polygon() -> impl Strategy<Value = Vec<Point2>> {
    prop::collection::vec(0.5..1.5_f64, 3..24).prop_map(|radii| {
        #[allow(clippy::cast_precision_loss)]
        let n = radii.len() as f64;
        radii
            .iter()
            .enumerate()
            .map(|(i, r)| {
                #[allow(clippy::cast_precision_loss)]
                let theta = std::f64::consts::TAU * i as f64 / n;
                Point2::new(r * theta.cos(), r * theta.sin())
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn triangle_area_matches_half_cross(a in point3(), b in point3(), c in point3()) {
        let cross = (b - a).cross(&(c - a));
        prop_assume!(cross.norm() > 1e-3);
        let Ok(area) = polygon_area(&[a, b, c], &Tolerance::default()) else {
            return Ok(());
        };
        prop_assert!((area - 0.5 * cross.norm()).abs() <= 1e-9 * (1.0 + area));
    }

    #[test]
    fn projection_round_trip(
        origin in point3(),
        normal in (coord(), coord(), coord()),
        flat in prop::collection::vec(point2(), 3..20),
    ) {
        let tol = Tolerance::default();
        let n = Vector3::new(normal.0, normal.1, normal.2);
        prop_assume!(n.norm() > 1e-3);
        let n = n.normalize();
        let helper = if n.x.abs() < 0.9 { Vector3::x() } else { Vector3::y() };
        let e1 = n.cross(&helper).normalize();
        let e2 = n.cross(&e1);
        let points: Vec<Point3> = flat.iter().map(|p| origin + e1 * p.x + e2 * p.y).collect();

        let Ok(basis) = derive_2d_basis(&points, &tol) else {
            return Ok(());
        };
        let back = project_2d_to_3d(&basis, &project_3d_to_2d(&basis, &points));
        for (orig, round) in points.iter().zip(&back) {
            prop_assert!((orig - round).norm() < tol.distance());
        }
    }

    #[test]
    fn hull_is_idempotent(points in prop::collection::vec(point2(), 3..60)) {
        let once = hull_2d_from_point_set(&points);
        prop_assume!(once.len() >= 3);
        let twice = hull_2d_from_point_set(&once);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn hull_contains_every_point(points in prop::collection::vec(point2(), 3..60)) {
        let hull = hull_2d_from_point_set(&points);
        prop_assume!(hull.len() >= 3);
        let n = hull.len();
        for p in &points {
            for i in 0..n {
                let (a, b) = (hull[i], hull[(i + 1) % n]);
                let turn = (b - a).perp(&(p - a));
                prop_assert!(turn >= -1e-9 * (1.0 + (b - a).norm() * (p - a).norm()));
            }
        }
    }

    #[test]
    fn ear_clipping_covers_polygon(polygon in star_polygon()) {
        let tris = triangulate_ear_clipping(&polygon).unwrap();
        prop_assert_eq!(tris.len(), polygon.len() - 2);
        let total: f64 = tris
            .iter()
            .map(|t| polygon_area_2d(&[polygon[t[0]], polygon[t[1]], polygon[t[2]]]).abs())
            .sum();
        let expected = polygon_area_2d(&polygon);
        prop_assert!((total - expected).abs() <= 1e-9 * expected);
    }

    #[test]
    fn point_in_polygon_ignores_rotation(
        polygon in star_polygon(),
        probe in (-2.0..2.0_f64, -2.0..2.0_f64),
        shift in 0usize..24,
    ) {
        let probe = Point2::new(probe.0, probe.1);
        let expected = point_in_polygon(&polygon, &probe);
        let mut rotated = polygon.clone();
        rotated.rotate_left(shift % polygon.len());
        prop_assert_eq!(point_in_polygon(&rotated, &probe), expected);
    }
}
