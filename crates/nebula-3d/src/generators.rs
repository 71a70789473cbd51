use rand::Rng;

/// Generate `count` points spread over a sphere surface of the given radius.
///
/// Points follow a spiral distribution over the sphere with optional uniform
/// jitter of amplitude `noise` per axis. The cloud is centered on the origin,
/// so synthetic datasets never need recentering.
pub fn sphere_points<R: Rng>(count: usize, radius: f64, noise: f64, rng: &mut R) -> Vec<[f64; 3]> {
    let mut points = Vec::with_capacity(count);
    for i in 0..count {
        let phi = (-1.0 + (2.0 * i as f64) / count as f64).acos();
        let theta = (count as f64 * std::f64::consts::PI).sqrt() * phi;

        let nx = (rng.random::<f64>() - 0.5) * noise;
        let ny = (rng.random::<f64>() - 0.5) * noise;
        let nz = (rng.random::<f64>() - 0.5) * noise;

        points.push([
            radius * theta.cos() * phi.sin() + nx,
            radius * theta.sin() * phi.sin() + ny,
            radius * phi.cos() + nz,
        ]);
    }
    points
}

/// Generate `count` points filling a cube of edge length `size` centered on
/// the origin, with optional uniform jitter of amplitude `noise` per axis.
pub fn cube_points<R: Rng>(count: usize, size: f64, noise: f64, rng: &mut R) -> Vec<[f64; 3]> {
    let mut points = Vec::with_capacity(count);
    for _ in 0..count {
        points.push([
            (rng.random::<f64>() - 0.5) * size + (rng.random::<f64>() - 0.5) * noise,
            (rng.random::<f64>() - 0.5) * size + (rng.random::<f64>() - 0.5) * noise,
            (rng.random::<f64>() - 0.5) * size + (rng.random::<f64>() - 0.5) * noise,
        ]);
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_sphere_points_count_and_radius() {
        let mut rng = StdRng::seed_from_u64(7);
        let points = sphere_points(500, 3.0, 0.1, &mut rng);
        assert_eq!(points.len(), 500);
        // every point lies within radius + half the noise amplitude
        assert!(ops::bounding_radius(&points) <= 3.0 + 0.05 * 3f64.sqrt() + 1e-9);
    }

    #[test]
    fn test_sphere_points_noiseless_on_surface() {
        let mut rng = StdRng::seed_from_u64(7);
        let points = sphere_points(100, 2.0, 0.0, &mut rng);
        for p in &points {
            let dist = (p[0] * p[0] + p[1] * p[1] + p[2] * p[2]).sqrt();
            assert!((dist - 2.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_cube_points_inside_box() {
        let mut rng = StdRng::seed_from_u64(11);
        let points = cube_points(1000, 4.0, 0.2, &mut rng);
        assert_eq!(points.len(), 1000);
        for p in &points {
            for c in p {
                assert!(c.abs() <= 2.0 + 0.1 + 1e-9);
            }
        }
    }

    #[test]
    fn test_seeded_generation_is_deterministic() {
        let a = cube_points(50, 1.0, 0.5, &mut StdRng::seed_from_u64(3));
        let b = cube_points(50, 1.0, 0.5, &mut StdRng::seed_from_u64(3));
        assert_eq!(a, b);
    }
}
