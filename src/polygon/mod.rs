pub mod analysis;
pub mod coplanar;
pub mod hull;
pub mod polyhedron;
pub mod triangulate;

pub use analysis::{
    point_in_polygon, polygon_area, polygon_area_2d, polygon_area_with_normal, polygon_centroid,
    sort_vertices_ccw,
};
pub use coplanar::{derive_2d_basis, project_2d_to_3d, project_3d_to_2d, CoplanarBasis};
pub use hull::{hull_2d_from_point_set, hull_2d_from_polyline, hull_3d_coplanar};
pub use polyhedron::enumerate_polyhedron_face_vertices;
pub use triangulate::{triangulate_3d_coplanar, triangulate_ear_clipping};
