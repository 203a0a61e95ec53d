//! Working storage for the triangulation.
//!
//! The live triangle set is an arena addressed by stable [`TriangleKey`]s:
//! removing a triangle frees its slot and leaves every other key valid, so a
//! batch of bad triangles can be dropped in any order.

use geo_types::Point;
use slotmap::{new_key_type, SlotMap};

use crate::math::{Circumcircle, CoordType, DelaunayMath};

new_key_type! {
    /// Stable handle of a triangle in a [`Mesh`].
    pub struct TriangleKey;
}

/// Index into the vertex table of a [`Mesh`].
///
/// Input vertices keep the index they had in the caller's slice; the three
/// supra-triangle vertices follow them.
pub type VertexId = usize;

/// Where a vertex comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    /// The vertex is the input point with this index.
    Input(usize),
    /// The vertex belongs to the bounding supra-triangle.
    Synthetic,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex<T>
where
    T: CoordType,
{
    pub point: Point<T>,
    pub provenance: Provenance,
}

impl<T> Vertex<T>
where
    T: CoordType,
{
    pub fn is_synthetic(&self) -> bool {
        self.provenance == Provenance::Synthetic
    }
}

/// Pair of vertices. Equality ignores direction.
#[derive(Debug, Clone, Copy, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    pub a: VertexId,
    pub b: VertexId,
}

impl Edge {
    pub fn new(a: VertexId, b: VertexId) -> Self {
        Self { a, b }
    }

    pub fn reversed(self) -> Self {
        Self {
            a: self.b,
            b: self.a,
        }
    }
}

impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        (self.a == other.a && self.b == other.b) || (self.a == other.b && self.b == other.a)
    }
}

/// Triangle over three vertex ids, directed counter-clockwise.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Triangle<T>
where
    T: CoordType,
{
    pub vertices: [VertexId; 3],
    pub circumcircle: Circumcircle<T>,
}

impl<T> DelaunayMath<T> for Triangle<T> where T: CoordType {}

impl<T> Triangle<T>
where
    T: CoordType,
{
    /// Builds the triangle `(a, b, c)` and its circumcircle from the vertex
    /// coordinates in `vertices`.
    pub fn new(vertices: &[Vertex<T>], a: VertexId, b: VertexId, c: VertexId) -> Self {
        let circumcircle =
            Self::circumcircle(vertices[a].point, vertices[b].point, vertices[c].point);
        Self {
            vertices: [a, b, c],
            circumcircle,
        }
    }

    /// The three edges in cyclic order.
    pub fn edges(&self) -> [Edge; 3] {
        let [a, b, c] = self.vertices;
        [Edge::new(a, b), Edge::new(b, c), Edge::new(c, a)]
    }

    pub fn contains_vertex(&self, v: VertexId) -> bool {
        self.vertices.contains(&v)
    }

    pub fn has_edge(&self, edge: &Edge) -> bool {
        self.edges().iter().any(|e| e == edge)
    }
}

/// Vertex table plus the arena of live triangles.
#[derive(Debug, Clone)]
pub struct Mesh<T>
where
    T: CoordType,
{
    vertices: Vec<Vertex<T>>,
    triangles: SlotMap<TriangleKey, Triangle<T>>,
}

impl<T> Mesh<T>
where
    T: CoordType,
{
    pub(crate) fn with_capacity(vertices: Vec<Vertex<T>>, triangles: usize) -> Self {
        Self {
            vertices,
            triangles: SlotMap::with_capacity_and_key(triangles),
        }
    }

    pub fn vertices(&self) -> &[Vertex<T>] {
        &self.vertices
    }

    pub fn vertex(&self, id: VertexId) -> &Vertex<T> {
        &self.vertices[id]
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn get(&self, key: TriangleKey) -> Option<&Triangle<T>> {
        self.triangles.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (TriangleKey, &Triangle<T>)> {
        self.triangles.iter()
    }

    /// Whether any vertex of `triangle` is a supra-triangle vertex.
    pub fn touches_synthetic(&self, triangle: &Triangle<T>) -> bool {
        triangle
            .vertices
            .iter()
            .any(|&v| self.vertices[v].is_synthetic())
    }

    pub(crate) fn add_triangle(&mut self, a: VertexId, b: VertexId, c: VertexId) -> TriangleKey {
        let triangle = Triangle::new(&self.vertices, a, b, c);
        self.triangles.insert(triangle)
    }

    pub(crate) fn remove(&mut self, key: TriangleKey) -> Option<Triangle<T>> {
        self.triangles.remove(key)
    }

    pub(crate) fn into_triangles(self) -> impl Iterator<Item = Triangle<T>> {
        self.triangles.into_iter().map(|(_, t)| t)
    }
}
