use thiserror::Error;

/// Top-level error type for the geotol kernel.
///
/// Only algorithmic failures on malformed input end up here. Geometric
/// degeneracy (parallel lines, collinear points, singular systems) is reported
/// through the result enums of the individual routines instead.
#[derive(Debug, Error)]
pub enum GeotolError {
    #[error(transparent)]
    Projection(#[from] ProjectionError),

    #[error(transparent)]
    Triangulation(#[from] TriangulationError),
}

/// Errors raised while deriving a 2D basis for a coplanar point set.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProjectionError {
    #[error("at least 3 points are needed to derive a basis, got {0}")]
    TooFewPoints(usize),

    #[error("all points coincide with their centroid")]
    Coincident,

    #[error("all points are collinear")]
    Collinear,
}

/// Errors raised by ear-clipping triangulation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TriangulationError {
    #[error("a polygon needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),

    #[error("no ear found with {remaining} vertices left (self-intersecting or mis-wound polygon)")]
    NoEarFound { remaining: usize },
}

/// Convenience type alias for results using [`GeotolError`].
pub type Result<T> = std::result::Result<T, GeotolError>;
