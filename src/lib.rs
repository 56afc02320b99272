pub mod error;
pub mod geometry;
pub mod math;
pub mod polygon;
pub mod tolerance;

pub use error::{GeotolError, Result};
pub use tolerance::Tolerance;
