pub use config::{Config, Stage, Step};
pub use delaunay::{BowyerWatson, Triangulation};
pub use error::TriangulationError;
pub use math::{BBox, Circumcircle, CoordType, DelaunayMath, COLLINEAR_TOLERANCE};
pub use mesh::{Edge, Mesh, Provenance, Triangle, TriangleKey, Vertex, VertexId};
pub use supra::{SupraTriangle, DEFAULT_MARGIN, MIN_MARGIN};

use geo_types::Point;

mod config;
mod delaunay;
mod error;
mod math;
mod mesh;
mod supra;

/// Triangulate `points` with the default configuration.
pub fn triangulate<T>(points: &[Point<T>]) -> Result<Triangulation<T>, TriangulationError>
where
    T: CoordType,
{
    Triangulation::triangulate(points)
}

/// Triangulate `points` with an explicit configuration.
pub fn triangulate_with<T>(
    points: &[Point<T>],
    config: Config<'_, T>,
) -> Result<Triangulation<T>, TriangulationError>
where
    T: CoordType,
{
    Triangulation::triangulate_with(points, config)
}
