//! Bounding triangle that seeds the mesh.

use geo_types::{point, Point};

use crate::math::{CoordType, DelaunayMath};

/// Default scale of the supra-triangle relative to the input's half extent.
pub const DEFAULT_MARGIN: f64 = 3.0;

/// Smallest accepted margin. Anything above `1.25` keeps the bounding box
/// strictly inside; `2` leaves room for rounding.
pub const MIN_MARGIN: f64 = 2.0;

/// The three synthetic vertices of the bounding triangle, counter-clockwise:
/// top, lower-left, lower-right.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SupraTriangle<T>
where
    T: CoordType,
{
    pub vertices: [Point<T>; 3],
}

impl<T> DelaunayMath<T> for SupraTriangle<T> where T: CoordType {}

impl<T> SupraTriangle<T>
where
    T: CoordType,
{
    /// Builds a triangle that strictly contains every point of `points`.
    ///
    /// With `h` the larger half extent of the bounding box and
    /// `m = margin * h`, the vertices sit at `(cx, cy + 2m)`,
    /// `(cx - 2m, cy - m)` and `(cx + 2m, cy - m)`. Any margin of at least
    /// [`MIN_MARGIN`] keeps the bounding box strictly inside. The vertices
    /// reach `(1 + 2 * margin)` times the largest input coordinate, which
    /// `BowyerWatson::new` keeps finite by rejecting out-of-range input.
    pub fn enclosing(points: &[Point<T>], margin: T) -> Self {
        let bbox = Self::calc_bbox(points);
        let center = bbox.center();

        let mut half = bbox.half_extent();
        if half <= T::zero() {
            half = T::one();
        }

        let m = margin * half;
        let two = T::from(2).unwrap();

        Self {
            vertices: [
                point!(x: center.x(), y: center.y() + two * m),
                point!(x: center.x() - two * m, y: center.y() - m),
                point!(x: center.x() + two * m, y: center.y() - m),
            ],
        }
    }

    /// Strict containment of `p`.
    pub fn contains(&self, p: Point<T>) -> bool {
        let [a, b, c] = self.vertices;
        Self::orient(a, b, p) > T::zero()
            && Self::orient(b, c, p) > T::zero()
            && Self::orient(c, a, p) > T::zero()
    }
}
