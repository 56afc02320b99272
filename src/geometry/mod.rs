pub mod aabb;
pub mod plane;

pub use aabb::{Aabb, HalfspaceClass};
pub use plane::{Plane, PlaneRelation};
