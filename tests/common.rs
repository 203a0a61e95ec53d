use std::fs::File;

use bowyer_watson::{triangulate, triangulate_with, Config, CoordType, Triangulation};
use geo_types::{point, Point};

fn tolerance<T>() -> T
where
    T: CoordType,
{
    T::epsilon().sqrt()
}

fn validate<T>(points: &[Point<T>], triangulation: &Triangulation<T>)
where
    T: CoordType,
{
    assert!(!triangulation.is_empty(), "Expected a non-empty triangulation");

    // only input points are used as vertices
    for t in triangulation.triangles.iter() {
        assert!(
            t.vertices.iter().all(|&v| v < points.len()),
            "Supra-triangle vertex left in the output: {:?}",
            t.vertices
        );
    }

    // triangles are counter-clockwise
    for t in triangulation.triangles.iter() {
        let [a, b, c] = t.vertices;
        assert!(
            points[a].cross_prod(points[b], points[c]) > T::zero(),
            "Triangle {:?} is not counter-clockwise",
            t.vertices
        );
    }

    // empty circumcircles
    let violations = triangulation.delaunay_violations(points, tolerance());
    assert!(
        violations.is_empty(),
        "Delaunay property violated by triangles {:?}",
        violations
    );

    // triangles tile the region bounded by the hull: no gaps, no overlaps
    let hull_area = {
        let hull = triangulation.hull();
        let mut hull_areas = Vec::new();
        let mut i = 0;
        let mut j = hull.len() - 1;
        while i < hull.len() {
            let p0 = &points[hull[j]];
            let p = &points[hull[i]];
            hull_areas.push((p.x() - p0.x()) * (p.y() + p0.y()));
            j = i;
            i += 1;
        }
        sum(&hull_areas).abs()
    };
    let triangles_area = {
        let triangle_areas: Vec<T> = triangulation
            .triangles
            .iter()
            .map(|t| {
                let [a, b, c] = t.vertices;
                let (a, b, c) = (points[a], points[b], points[c]);
                ((b.y() - a.y()) * (c.x() - b.x()) - (b.x() - a.x()) * (c.y() - b.y())).abs()
            })
            .collect();
        sum(&triangle_areas)
    };

    let err = ((hull_area - triangles_area) / hull_area).abs();
    if err > tolerance() {
        panic!("Triangulation is broken: {:?} error", err);
    }
}

/// With a generous supra margin the outer boundary is the convex hull and
/// the triangle count follows `2n - h - 2`.
fn validate_convex<T>(points: &[Point<T>], triangulation: &Triangulation<T>)
where
    T: CoordType,
{
    let hull = triangulation.hull();
    let h = hull.len();

    for i in 0..h {
        let p = points[hull[i]];
        let q = points[hull[(i + 1) % h]];
        let r = points[hull[(i + 2) % h]];
        assert!(
            p.cross_prod(q, r) > T::zero(),
            "Hull turns clockwise or is flat at point {}",
            hull[(i + 1) % h]
        );
        for s in points.iter() {
            assert!(
                p.cross_prod(q, *s) >= T::zero(),
                "Point {:?} lies outside the hull",
                s
            );
        }
    }

    let n = points.len() - triangulation.skipped.len();
    assert_eq!(triangulation.len(), 2 * n - h - 2);
}

fn wide<'a, T>() -> Config<'a, T>
where
    T: CoordType,
{
    Config::new().margin(T::from(100).unwrap())
}

pub fn basic<T>()
where
    T: CoordType,
{
    let points = load_fixture::<T>("tests/fixtures/basic.json");
    validate(&points, &triangulate(&points).unwrap());

    let triangulation = triangulate_with(&points, wide()).unwrap();
    validate(&points, &triangulation);
    validate_convex(&points, &triangulation);
}

pub fn fixtures<T>()
where
    T: CoordType,
{
    for path in ["tests/fixtures/uniform.json", "tests/fixtures/clusters.json"].iter() {
        let points = load_fixture::<T>(path);
        validate(&points, &triangulate(&points).unwrap());
    }
}

pub fn convex_hull<T>()
where
    T: CoordType,
{
    for path in ["tests/fixtures/uniform.json", "tests/fixtures/clusters.json"].iter() {
        let points = load_fixture::<T>(path);
        let triangulation = triangulate_with(&points, wide()).unwrap();
        validate(&points, &triangulation);
        validate_convex(&points, &triangulation);
    }
}

pub fn robustness<T>()
where
    T: CoordType,
{
    for path in ["tests/fixtures/basic.json", "tests/fixtures/uniform.json"].iter() {
        let points = load_fixture::<T>(path);
        let reference = triangulate(&points).unwrap();

        for &scale in [1e-9, 1e-2, 100.0, 1e9].iter() {
            let scaled = scale_points(&points, T::from(scale).unwrap());

            let triangulation = triangulate(&scaled).unwrap();
            validate(&scaled, &triangulation);
            assert_eq!(
                triangulation.len(),
                reference.len(),
                "Triangle count changed at scale {}",
                scale
            );

            let triangulation = triangulate_with(&scaled, wide()).unwrap();
            validate(&scaled, &triangulation);
            validate_convex(&scaled, &triangulation);
        }
    }
}

pub fn single_triangle<T>()
where
    T: CoordType,
{
    let points = vec![
        point!(x: T::zero(), y: T::zero()),
        point!(x: T::one(), y: T::zero()),
        point!(x: T::zero(), y: T::one()),
    ];
    let triangulation = triangulate(&points).unwrap();

    assert_eq!(triangulation.len(), 1, "Expected a single triangle");
    let mut vertices = triangulation.triangles[0].vertices;
    vertices.sort_unstable();
    assert_eq!(vertices, [0, 1, 2]);
}

pub fn square_with_center<T>()
where
    T: CoordType,
{
    let two = T::from(2).unwrap();
    let points = vec![
        point!(x: T::zero(), y: T::zero()),
        point!(x: two, y: T::zero()),
        point!(x: two, y: two),
        point!(x: T::zero(), y: two),
        point!(x: T::one(), y: T::one()),
    ];
    let triangulation = triangulate(&points).unwrap();

    assert_eq!(triangulation.len(), 4, "Expected 4 triangles (square + center)");
    assert!(
        triangulation.triangles.iter().all(|t| t.contains_vertex(4)),
        "Expected every triangle to share the center"
    );
    assert_eq!(triangulation.hull(), vec![0, 1, 2, 3]);
    validate(&points, &triangulation);
}

pub fn cocircular<T>()
where
    T: CoordType,
{
    let points = vec![
        point!(x: T::zero(), y: T::zero()),
        point!(x: T::one(), y: T::zero()),
        point!(x: T::one(), y: T::one()),
        point!(x: T::zero(), y: T::one()),
    ];
    let triangulation = triangulate(&points).unwrap();

    // either diagonal is valid
    assert_eq!(triangulation.len(), 2, "Expected 2 triangles (square)");
    validate(&points, &triangulation);
}

pub fn bad_input<T>()
where
    T: CoordType,
{
    let mut points = vec![];
    assert!(triangulate::<T>(&points).is_err(), "Expected an error (0 point)");

    points.push(point!(x: T::zero(), y: T::zero()));
    assert!(triangulate(&points).is_err(), "Expected an error (1 point)");

    points.push(point!(x: T::one(), y: T::zero()));
    assert!(triangulate(&points).is_err(), "Expected an error (2 points)");

    points.push(point!(x: T::from(2).unwrap(), y: T::zero()));
    let triangulation = triangulate(&points).unwrap();
    assert!(
        triangulation.is_empty(),
        "Expected no triangles (3 collinear points)"
    );
    assert!(triangulation.hull().is_empty(), "Expected no hull (3 collinear points)");

    points.push(point!(x: T::one(), y: T::one()));
    let triangulation = triangulate(&points).unwrap();
    assert_eq!(triangulation.len(), 2);
    validate(&points, &triangulation);
}

pub fn duplicates<T>()
where
    T: CoordType,
{
    let mut points = load_fixture::<T>("tests/fixtures/basic.json");
    let n = points.len();
    points.push(points[3]);
    points.push(points[11]);
    points.push(points[3]);

    let triangulation = triangulate(&points).unwrap();
    assert_eq!(triangulation.skipped, vec![n, n + 1, n + 2]);
    for t in triangulation.triangles.iter() {
        assert!(t.vertices.iter().all(|&v| v < n));
    }
    validate(&points, &triangulation);

    let reference = triangulate(&points[..n]).unwrap();
    assert_eq!(triangulation.len(), reference.len());
}

fn scale_points<T>(points: &[Point<T>], scale: T) -> Vec<Point<T>>
where
    T: CoordType,
{
    points
        .iter()
        .map(|p| point!(x: p.x() * scale, y: p.y() * scale))
        .collect()
}

fn load_fixture<T>(path: &str) -> Vec<Point<T>>
where
    T: CoordType,
{
    let file = File::open(path).unwrap();
    let u: Vec<(f64, f64)> = serde_json::from_reader(file).unwrap();
    u.iter()
        .map(|p| {
            let x = T::from(p.0);
            assert!(
                x.is_some(),
                "Unable to parse {} into {}",
                p.0,
                std::any::type_name::<T>()
            );

            let y = T::from(p.1);
            assert!(
                y.is_some(),
                "Unable to parse {} into {}",
                p.1,
                std::any::type_name::<T>()
            );
            point!(x: x.unwrap(), y: y.unwrap())
        })
        .collect()
}

// Kahan and Babuska summation, Neumaier variant; accumulates less FP error
fn sum<T>(x: &[T]) -> T
where
    T: CoordType,
{
    let mut sum = x[0];
    let mut err: T = T::zero();
    for &k in x.iter().skip(1) {
        let m = sum + k;
        err = err
            + if sum.abs() >= k.abs() {
                sum - m + k
            } else {
                k - m + sum
            };
        sum = m;
    }
    sum + err
}
