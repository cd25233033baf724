use nalgebra::{Isometry3, Point3};

/// Smallest interatomic distance (Bohr) for which a finite Coulomb term is produced.
pub const MIN_PAIR_DISTANCE: f64 = 1e-8;

#[inline]
pub fn distance(a: &Point3<f64>, b: &Point3<f64>) -> f64 {
    (a - b).norm()
}

pub fn is_finite_point(p: &Point3<f64>) -> bool {
    p.coords.iter().all(|c| c.is_finite())
}

/// Index of the first point with a NaN or infinite coordinate.
pub fn first_non_finite(points: &[Point3<f64>]) -> Option<usize> {
    points.iter().position(|p| !is_finite_point(p))
}

/// Finds the first pair of points closer than [`MIN_PAIR_DISTANCE`].
pub fn first_coincident_pair(points: &[Point3<f64>]) -> Option<(usize, usize)> {
    for i in 0..points.len() {
        for j in (i + 1)..points.len() {
            if distance(&points[i], &points[j]) < MIN_PAIR_DISTANCE {
                return Some((i, j));
            }
        }
    }
    None
}

pub fn centroid(points: &[Point3<f64>]) -> Option<Point3<f64>> {
    if points.is_empty() {
        return None;
    }
    let sum = points
        .iter()
        .fold(nalgebra::Vector3::zeros(), |acc, p| acc + p.coords);
    Some(Point3::from(sum / points.len() as f64))
}

/// Applies a rigid motion (rotation followed by translation) to every point.
pub fn transform_points(points: &[Point3<f64>], motion: &Isometry3<f64>) -> Vec<Point3<f64>> {
    points.iter().map(|p| motion * p).collect()
}
