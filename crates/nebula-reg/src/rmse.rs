use glam::DVec3;
use rand::Rng;

use nebula_3d::transforms::RigidTransform;

/// Maximum number of source points sampled per estimate.
pub const MAX_SOURCE_SAMPLES: usize = 100;

/// Maximum number of random target candidates checked per source sample.
pub const MAX_TARGET_CHECKS: usize = 200;

/// Estimate the alignment error between a transformed source cloud and a
/// target cloud as a sampled root-mean-square of nearest-neighbor distances.
///
/// Each of `min(100, |source|)` iterations draws a source index uniformly at
/// random with replacement, applies the rigid part of `transform` (rotation
/// and translation; the display scale never enters this path), and takes the
/// minimum squared distance to `min(200, |target|)` random target candidates.
/// The result is the square root of the mean per-sample minimum.
///
/// The nearest-neighbor search is a randomized approximation: cost stays
/// O(samples x checks) no matter how large the clouds are, cheap enough to
/// re-run on every slider drag. Repeated calls with identical inputs return
/// different values; that non-determinism is a design property of the
/// metric, not a defect.
///
/// Returns `0.0` when either cloud is empty, matching the "nothing loaded"
/// UI state.
pub fn sampled_rmse_with_rng<R: Rng>(
    source: &[[f64; 3]],
    target: &[[f64; 3]],
    transform: &RigidTransform,
    rng: &mut R,
) -> f64 {
    if source.is_empty() || target.is_empty() {
        return 0.0;
    }

    let sample_size = MAX_SOURCE_SAMPLES.min(source.len());
    let target_checks = MAX_TARGET_CHECKS.min(target.len());

    let mut error_sum = 0.0;
    for _ in 0..sample_size {
        let s_idx = rng.random_range(0..source.len());
        let transformed = DVec3::from_array(transform.transform_point(&source[s_idx]));

        let mut min_dist_sq = f64::INFINITY;
        for _ in 0..target_checks {
            let t_idx = rng.random_range(0..target.len());
            let d_sq = transformed.distance_squared(DVec3::from_array(target[t_idx]));
            if d_sq < min_dist_sq {
                min_dist_sq = d_sq;
            }
        }
        error_sum += min_dist_sq;
    }

    (error_sum / sample_size as f64).sqrt()
}

/// [`sampled_rmse_with_rng`] using the thread RNG, for production callers.
pub fn sampled_rmse(source: &[[f64; 3]], target: &[[f64; 3]], transform: &RigidTransform) -> f64 {
    sampled_rmse_with_rng(source, target, transform, &mut rand::rng())
}
