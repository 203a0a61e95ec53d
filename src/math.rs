use approx::AbsDiffEq;
use geo_types::{point, CoordFloat, Point};
use num_traits::Float;

/// Below this fraction of `2 * |ab| * |ac|` the circumcircle determinant is
/// treated as zero and the three points as collinear. Relative to the edge
/// lengths, so the test does not depend on the scale of the input.
pub const COLLINEAR_TOLERANCE: f64 = 1e-6;

pub trait CoordType: CoordFloat + AbsDiffEq<Epsilon = Self> + Send + Sync {}

/// Circle through the three vertices of a triangle.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Circumcircle<T>
where
    T: CoordType,
{
    pub center: Point<T>,
    pub radius_squared: T,
}

impl<T> Circumcircle<T>
where
    T: CoordType,
{
    #[inline]
    pub fn radius(&self) -> T {
        self.radius_squared.sqrt()
    }

    /// Inclusive containment test: points on the circle count as inside.
    #[inline]
    pub fn contains(&self, p: Point<T>) -> bool {
        dist2(self.center, p) <= self.radius_squared
    }
}

/// Axis-aligned bounding box of a point set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BBox<T>
where
    T: CoordType,
{
    pub min: Point<T>,
    pub max: Point<T>,
}

impl<T> BBox<T>
where
    T: CoordType,
{
    pub fn center(&self) -> Point<T> {
        let two = T::from(2).unwrap();
        point!(
            x: (self.min.x() + self.max.x()) / two,
            y: (self.min.y() + self.max.y()) / two
        )
    }

    pub fn half_extent(&self) -> T {
        let two = T::from(2).unwrap();
        let hw = (self.max.x() - self.min.x()) / two;
        let hh = (self.max.y() - self.min.y()) / two;
        hw.max(hh)
    }
}

pub trait DelaunayMath<T>
where
    T: CoordType,
{
    /// Circle through `a`, `b` and `c`.
    ///
    /// Uses the determinant form of the perpendicular-bisector system. The
    /// determinant is twice the signed area of `abc`; when it is below
    /// [`COLLINEAR_TOLERANCE`] times `2 * |ab| * |ac|` (the sine of the angle at
    /// `a` is below the tolerance) the points are treated as collinear and the
    /// circle circumscribing their bounding box is returned instead, so callers
    /// never divide by a vanishing value.
    fn circumcircle(a: Point<T>, b: Point<T>, c: Point<T>) -> Circumcircle<T> {
        let aa = b.x() - a.x();
        let bb = b.y() - a.y();
        let cc = c.x() - a.x();
        let dd = c.y() - a.y();
        let e = aa * (a.x() + b.x()) + bb * (a.y() + b.y());
        let f = cc * (a.x() + c.x()) + dd * (a.y() + c.y());
        let two = T::from(2).unwrap();
        let g = two * (aa * (c.y() - b.y()) - bb * (c.x() - b.x()));
        let scale = two * aa.hypot(bb) * cc.hypot(dd);

        if g.abs() <= T::from(COLLINEAR_TOLERANCE).unwrap() * scale {
            tracing::trace!("circumcircle of a collinear triple, using bbox fallback");
            let bbox = Self::calc_bbox(&[a, b, c]);
            let diagonal = bbox.max - bbox.min;
            return Circumcircle {
                center: bbox.center(),
                radius_squared: diagonal.dot(diagonal) / T::from(4).unwrap(),
            };
        }

        let center = point!(x: (dd * e - bb * f) / g, y: (aa * f - cc * e) / g);

        Circumcircle {
            center,
            radius_squared: Self::dist2(center, a),
        }
    }

    #[inline]
    fn in_circumcircle(p: Point<T>, circle: &Circumcircle<T>) -> bool {
        circle.contains(p)
    }

    #[inline(always)]
    fn dist2(p0: Point<T>, p: Point<T>) -> T {
        dist2(p0, p)
    }

    /// Twice the signed area of `pqr`; positive when counter-clockwise.
    #[inline]
    fn orient(p: Point<T>, q: Point<T>, r: Point<T>) -> T {
        p.cross_prod(q, r)
    }

    fn calc_bbox(points: &[Point<T>]) -> BBox<T> {
        let mut min_x: T = Float::infinity();
        let mut min_y: T = Float::infinity();
        let mut max_x: T = Float::neg_infinity();
        let mut max_y: T = Float::neg_infinity();

        for p in points.iter() {
            min_x = min_x.min(p.x());
            min_y = min_y.min(p.y());
            max_x = max_x.max(p.x());
            max_y = max_y.max(p.y());
        }

        BBox {
            min: point!(x: min_x, y: min_y),
            max: point!(x: max_x, y: max_y),
        }
    }
}

#[inline(always)]
fn dist2<T>(p0: Point<T>, p: Point<T>) -> T
where
    T: CoordType,
{
    let d = p0 - p;
    d.dot(d)
}

impl CoordType for f64 {}
impl CoordType for f32 {}
