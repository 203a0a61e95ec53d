/*!
Incremental [Bowyer-Watson](https://en.wikipedia.org/wiki/Bowyer%E2%80%93Watson_algorithm)
construction of a 2D Delaunay triangulation.

The mesh is seeded with a synthetic supra-triangle enclosing every input
point. Points are then inserted one at a time in input order: the triangles
whose circumcircle contains the new point are removed, and the polygonal
cavity they leave behind is filled with a fan of triangles from the point.
Once every point is in, triangles touching the supra-triangle are dropped.

# Example

```rust
use bowyer_watson::triangulate;
use geo_types::point;

let points = vec![
    point!(x: 0., y: 0.),
    point!(x: 2., y: 0.),
    point!(x: 2., y: 2.),
    point!(x: 0., y: 2.),
    point!(x: 1., y: 1.),
];

let result = triangulate(&points).unwrap();
assert_eq!(result.len(), 4);
assert!(result.triangles.iter().all(|t| t.contains_vertex(4)));
```
*/

use std::collections::{HashMap, HashSet};

use geo_types::Point;
use num_traits::NumCast;

use crate::config::{Config, Stage, Step};
use crate::error::TriangulationError;
use crate::math::{CoordType, DelaunayMath};
use crate::mesh::{Edge, Mesh, Provenance, Triangle, TriangleKey, Vertex, VertexId};
use crate::supra::{SupraTriangle, MIN_MARGIN};

/// Result of the Delaunay triangulation.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Triangulation<T>
where
    T: CoordType,
{
    /// Delaunay triangles, directed counter-clockwise. Vertex ids are indices
    /// into the input points.
    pub triangles: Vec<Triangle<T>>,

    /// Input indices that were not inserted because an earlier point has the
    /// same coordinates.
    pub skipped: Vec<usize>,
}

impl<T> DelaunayMath<T> for Triangulation<T> where T: CoordType {}

impl<T> Triangulation<T>
where
    T: CoordType,
{
    /// Triangulate a set of 2D points with the default [`Config`].
    pub fn triangulate(points: &[Point<T>]) -> Result<Triangulation<T>, TriangulationError> {
        Self::triangulate_with(points, Config::default())
    }

    /// Triangulate a set of 2D points.
    ///
    /// Fails with [`TriangulationError::InsufficientInput`] for fewer than
    /// three distinct points. When all points are collinear the result is
    /// empty, since every triangle then has a supra-triangle vertex.
    pub fn triangulate_with(
        points: &[Point<T>],
        config: Config<'_, T>,
    ) -> Result<Triangulation<T>, TriangulationError> {
        let mut engine = BowyerWatson::new(points, config)?;
        engine.insert_all();
        Ok(engine.finish())
    }

    /// The number of triangles in the triangulation.
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Point indices where each triple is a triangle.
    pub fn indices(&self) -> Vec<usize> {
        self.triangles.iter().flat_map(|t| t.vertices).collect()
    }

    /// Boundary of the triangulated region as point indices, counter-clockwise.
    ///
    /// Built from the edges used by a single triangle. Where the boundary
    /// touches itself (two triangles sharing only a corner, which happens when
    /// hull slivers are dropped), that vertex appears once per visit and the
    /// walk still covers every boundary edge of the region. Regions that do not
    /// touch at all are not joined: only the one holding the smallest index is
    /// returned.
    pub fn hull(&self) -> Vec<usize> {
        let directed: HashSet<(VertexId, VertexId)> = self
            .triangles
            .iter()
            .flat_map(|t| t.edges())
            .map(|e| (e.a, e.b))
            .collect();

        let mut outgoing: HashMap<VertexId, Vec<VertexId>> = HashMap::new();
        for &(a, b) in directed.iter() {
            if !directed.contains(&(b, a)) {
                outgoing.entry(a).or_default().push(b);
            }
        }

        let start = match outgoing.keys().min() {
            Some(&start) => start,
            None => return Vec::new(),
        };
        for targets in outgoing.values_mut() {
            // popped smallest first
            targets.sort_unstable_by(|a, b| b.cmp(a));
        }

        // closed walk over all boundary edges (Hierholzer), built back to front
        let mut stack = vec![start];
        let mut hull = Vec::new();
        while let Some(&v) = stack.last() {
            match outgoing.get_mut(&v).and_then(|targets| targets.pop()) {
                Some(w) => stack.push(w),
                None => {
                    hull.push(v);
                    stack.pop();
                }
            }
        }
        hull.reverse();
        hull.pop();
        hull
    }

    /// Indices of triangles whose circumcircle strictly contains an input
    /// point, beyond a relative `tolerance` of the squared radius.
    pub fn delaunay_violations(&self, points: &[Point<T>], tolerance: T) -> Vec<usize> {
        self.triangles
            .iter()
            .enumerate()
            .filter(|(_, t)| {
                let circle = &t.circumcircle;
                let limit = circle.radius_squared - tolerance * circle.radius_squared;
                points.iter().enumerate().any(|(i, p)| {
                    !t.contains_vertex(i) && Self::dist2(circle.center, *p) < limit
                })
            })
            .map(|(i, _)| i)
            .collect()
    }
}

/// Incremental Bowyer-Watson engine.
///
/// Owns the mesh for the whole run. Input points are assumed to be in general
/// position: a point lying exactly on an existing edge, or co-circular with
/// several triangles, can produce an inconsistent cavity and a malformed
/// triangle. Exact duplicates are skipped up front.
pub struct BowyerWatson<'a, T>
where
    T: CoordType,
{
    config: Config<'a, T>,
    mesh: Mesh<T>,
    duplicate: Vec<bool>,
    skipped: Vec<usize>,
    next: usize,
}

impl<T> DelaunayMath<T> for BowyerWatson<'_, T> where T: CoordType {}

impl<'a, T> BowyerWatson<'a, T>
where
    T: CoordType,
{
    /// Validates the input and seeds the mesh with the supra-triangle.
    pub fn new(points: &[Point<T>], config: Config<'a, T>) -> Result<Self, TriangulationError> {
        let n = points.len();
        if n < 3 {
            return Err(TriangulationError::InsufficientInput { count: n });
        }
        if let Some(index) = points
            .iter()
            .position(|p| !(p.x().is_finite() && p.y().is_finite()))
        {
            return Err(TriangulationError::NonFiniteCoordinate { index });
        }
        let margin = config.margin;
        if !margin.is_finite() || margin < T::from(MIN_MARGIN).unwrap() {
            return Err(TriangulationError::InvalidMargin {
                margin: NumCast::from(margin).unwrap_or(f64::NAN),
                min: MIN_MARGIN,
            });
        }

        // circumcircle centers are cubic in the coordinates of the supra vertices
        let two = T::from(2).unwrap();
        let limit = T::max_value().cbrt() / (T::from(4).unwrap() * (T::one() + two * margin));
        if let Some(index) = points
            .iter()
            .position(|p| p.x().abs() > limit || p.y().abs() > limit)
        {
            return Err(TriangulationError::CoordinateOutOfRange {
                index,
                limit: NumCast::from(limit).unwrap_or(f64::NAN),
            });
        }

        let mut seen = HashMap::with_capacity(n);
        let mut duplicate = vec![false; n];
        let mut skipped = Vec::new();
        for (i, p) in points.iter().enumerate() {
            if let Some(&first) = seen.get(&coord_key(*p)) {
                tracing::warn!(index = i, duplicate_of = first, "skipping duplicate point");
                duplicate[i] = true;
                skipped.push(i);
            } else {
                seen.insert(coord_key(*p), i);
            }
        }
        if seen.len() < 3 {
            return Err(TriangulationError::InsufficientInput { count: seen.len() });
        }

        let supra = SupraTriangle::enclosing(points, margin);
        let vertices = points
            .iter()
            .enumerate()
            .map(|(i, &point)| Vertex {
                point,
                provenance: Provenance::Input(i),
            })
            .chain(supra.vertices.iter().map(|&point| Vertex {
                point,
                provenance: Provenance::Synthetic,
            }))
            .collect();

        // a triangulation of n points has at most 2n + 1 triangles with the supra vertices
        let mut mesh = Mesh::with_capacity(vertices, 2 * n + 1);
        mesh.add_triangle(n, n + 1, n + 2);

        Ok(Self {
            config,
            mesh,
            duplicate,
            skipped,
            next: 0,
        })
    }

    /// The current mesh, supra-triangle included.
    pub fn mesh(&self) -> &Mesh<T> {
        &self.mesh
    }

    /// Inserts the next pending input point. Returns `false` once every point
    /// has been handled.
    pub fn insert_next(&mut self) -> bool {
        while self.next < self.duplicate.len() && self.duplicate[self.next] {
            self.next += 1;
        }
        if self.next == self.duplicate.len() {
            return false;
        }

        self.insert(self.next);
        self.next += 1;
        true
    }

    pub fn insert_all(&mut self) {
        while self.insert_next() {}
    }

    fn insert(&mut self, index: VertexId) {
        let p = self.mesh.vertex(index).point;
        report(
            &mut self.config,
            &self.mesh,
            Stage::BeforeCavityDetection,
            Some(index),
            &[],
            &[],
        );

        let bad = self.find_bad_triangles(p);
        let removed: Vec<Triangle<T>> = bad
            .into_iter()
            .filter_map(|key| self.mesh.remove(key))
            .collect();
        report(
            &mut self.config,
            &self.mesh,
            Stage::AfterCavityRemoval,
            Some(index),
            &removed,
            &[],
        );

        let boundary = Self::cavity_boundary(&removed);
        report(
            &mut self.config,
            &self.mesh,
            Stage::AfterBoundaryExtraction,
            Some(index),
            &[],
            &boundary,
        );

        let created: Vec<TriangleKey> = boundary
            .iter()
            .map(|e| self.mesh.add_triangle(index, e.a, e.b))
            .collect();
        if self.config.reporting() {
            let created: Vec<Triangle<T>> = created
                .iter()
                .filter_map(|&key| self.mesh.get(key).copied())
                .collect();
            report(
                &mut self.config,
                &self.mesh,
                Stage::AfterRetriangulation,
                Some(index),
                &created,
                &[],
            );
        }
    }

    /// Keys of the live triangles whose circumcircle contains `p`.
    #[cfg(not(feature = "rayon"))]
    fn find_bad_triangles(&self, p: Point<T>) -> Vec<TriangleKey> {
        self.mesh
            .iter()
            .filter(|(_, t)| Self::in_circumcircle(p, &t.circumcircle))
            .map(|(key, _)| key)
            .collect()
    }

    /// Keys of the live triangles whose circumcircle contains `p`.
    #[cfg(feature = "rayon")]
    fn find_bad_triangles(&self, p: Point<T>) -> Vec<TriangleKey> {
        use rayon::prelude::*;

        let live: Vec<(TriangleKey, &Triangle<T>)> = self.mesh.iter().collect();
        live.par_iter()
            .filter(|(_, t)| t.circumcircle.contains(p))
            .map(|&(key, _)| key)
            .collect()
    }

    /// Edges of the removed triangles that no other removed triangle shares,
    /// in the winding of the triangle they came from.
    fn cavity_boundary(bad: &[Triangle<T>]) -> Vec<Edge> {
        let mut boundary = Vec::with_capacity(bad.len() + 2);
        for (i, t) in bad.iter().enumerate() {
            for edge in t.edges().iter() {
                let shared = bad
                    .iter()
                    .enumerate()
                    .any(|(j, other)| j != i && other.has_edge(edge));
                if !shared {
                    boundary.push(*edge);
                }
            }
        }
        boundary
    }

    /// Drops every triangle touching the supra-triangle and returns the rest.
    pub fn finish(mut self) -> Triangulation<T> {
        let synthetic: Vec<TriangleKey> = self
            .mesh
            .iter()
            .filter(|(_, t)| self.mesh.touches_synthetic(t))
            .map(|(key, _)| key)
            .collect();
        let removed: Vec<Triangle<T>> = synthetic
            .into_iter()
            .filter_map(|key| self.mesh.remove(key))
            .collect();
        report(
            &mut self.config,
            &self.mesh,
            Stage::AfterCleanup,
            None,
            &removed,
            &[],
        );

        if self.config.debug {
            tracing::debug!(
                triangles = self.mesh.len(),
                skipped = self.skipped.len(),
                "triangulation finished"
            );
        }

        Triangulation {
            triangles: self.mesh.into_triangles().collect(),
            skipped: self.skipped,
        }
    }
}

fn report<T>(
    config: &mut Config<'_, T>,
    mesh: &Mesh<T>,
    stage: Stage,
    point: Option<usize>,
    changed: &[Triangle<T>],
    boundary: &[Edge],
) where
    T: CoordType,
{
    if config.reporting() {
        config.report(Step {
            stage,
            point,
            mesh,
            changed,
            boundary,
        });
    }
}

// exact-coordinate key; `+ 0.0` folds -0.0 into 0.0
fn coord_key<T>(p: Point<T>) -> (u64, u64)
where
    T: CoordType,
{
    let bits = |v: T| {
        let v: f64 = NumCast::from(v).unwrap_or(f64::NAN);
        (v + 0.0).to_bits()
    };
    (bits(p.x()), bits(p.y()))
}
