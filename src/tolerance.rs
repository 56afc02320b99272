/// Distance and angular thresholds shared by every predicate in the kernel.
///
/// Two points closer than [`distance`](Self::distance) are the same point.
/// Two unit vectors whose dot product magnitude is at most
/// [`perpendicularity_cosine`](Self::perpendicularity_cosine) are
/// perpendicular, and at least
/// [`parallelism_cosine`](Self::parallelism_cosine) are parallel.
///
/// The derived fields are computed once in [`Tolerance::new`], so
/// `distance_squared == distance * distance` and
/// `parallelism_cosine == 1 - perpendicularity_cosine` always hold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    distance: f64,
    distance_squared: f64,
    perpendicularity_cosine: f64,
    parallelism_cosine: f64,
}

impl Tolerance {
    /// Creates a tolerance from a distance and a perpendicularity cosine.
    ///
    /// # Panics
    ///
    /// Panics if `distance` is negative or not finite, or if
    /// `perpendicularity_cosine` is outside `[0, 1)`.
    #[must_use]
    pub fn new(distance: f64, perpendicularity_cosine: f64) -> Self {
        assert!(
            distance.is_finite() && distance >= 0.0,
            "Tolerance::new: distance must be finite and >= 0, got {distance}"
        );
        assert!(
            (0.0..1.0).contains(&perpendicularity_cosine),
            "Tolerance::new: perpendicularity cosine must be in [0, 1), got {perpendicularity_cosine}"
        );
        Self {
            distance,
            distance_squared: distance * distance,
            perpendicularity_cosine,
            parallelism_cosine: 1.0 - perpendicularity_cosine,
        }
    }

    /// Returns the distance below which two points are considered equal.
    #[must_use]
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Returns `distance * distance`.
    #[must_use]
    pub fn distance_squared(&self) -> f64 {
        self.distance_squared
    }

    /// Returns the cosine at or below which unit vectors are perpendicular.
    #[must_use]
    pub fn perpendicularity_cosine(&self) -> f64 {
        self.perpendicularity_cosine
    }

    /// Returns the cosine at or above which unit vectors are parallel.
    #[must_use]
    pub fn parallelism_cosine(&self) -> f64 {
        self.parallelism_cosine
    }

    /// Whether the dot product of two unit vectors marks them as parallel
    /// (or anti-parallel).
    #[must_use]
    pub fn is_parallel(&self, unit_dot: f64) -> bool {
        unit_dot.abs() >= self.parallelism_cosine
    }

    /// Whether the dot product of two unit vectors marks them as perpendicular.
    #[must_use]
    pub fn is_perpendicular(&self, unit_dot: f64) -> bool {
        unit_dot.abs() <= self.perpendicularity_cosine
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::new(0.0005, 1e-6)
    }
}
