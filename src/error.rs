/// Reasons a triangulation run is refused.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TriangulationError {
    /// Fewer than three (distinct) points were supplied.
    #[error("at least 3 distinct points are required, got {count}")]
    InsufficientInput { count: usize },

    /// A coordinate is NaN or infinite.
    #[error("point {index} has a non-finite coordinate")]
    NonFiniteCoordinate { index: usize },

    /// A coordinate is so large that the supra-triangle or the circumcircle
    /// arithmetic would overflow. The limit is roughly the cube root of the
    /// largest value of the coordinate type, divided by `4 * (1 + 2 * margin)`.
    #[error("point {index} is out of range, coordinates must be within +/-{limit}")]
    CoordinateOutOfRange { index: usize, limit: f64 },

    /// The supra-triangle margin is not finite or too small to enclose the input.
    #[error("supra-triangle margin {margin} is invalid, expected a finite value >= {min}")]
    InvalidMargin { margin: f64, min: f64 },
}
