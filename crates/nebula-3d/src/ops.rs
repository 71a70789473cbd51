use glam::DVec3;

/// Bounding radius reported for an empty cloud so that camera framing and
/// slider scaling have a sane fallback before anything is loaded.
pub const EMPTY_CLOUD_RADIUS: f64 = 10.0;

/// Compute the componentwise mean of a set of points.
///
/// # Arguments
///
/// * `points` - A set of points in 3D space.
///
/// # Returns
///
/// The centroid, or `[0.0, 0.0, 0.0]` for an empty set (defined convention,
/// not an error).
///
/// Example:
/// ```
/// use nebula_3d::ops::centroid;
///
/// let points = vec![[1.0, 0.0, 0.0], [3.0, 0.0, 0.0]];
/// assert_eq!(centroid(&points), [2.0, 0.0, 0.0]);
/// ```
pub fn centroid(points: &[[f64; 3]]) -> [f64; 3] {
    if points.is_empty() {
        return [0.0, 0.0, 0.0];
    }
    let sum = points
        .iter()
        .fold(DVec3::ZERO, |acc, p| acc + DVec3::from_array(*p));
    (sum / points.len() as f64).to_array()
}

/// Compute the maximum Euclidean distance from the world origin over all
/// points.
///
/// The distance is measured from the origin, not from the cloud's own
/// centroid: clouds are recentered on ingestion, so the origin already
/// approximates the cloud center and a single pass gives a usable extent
/// estimate. For an empty set returns [`EMPTY_CLOUD_RADIUS`].
pub fn bounding_radius(points: &[[f64; 3]]) -> f64 {
    if points.is_empty() {
        return EMPTY_CLOUD_RADIUS;
    }
    let max_dist_sq = points
        .iter()
        .map(|p| DVec3::from_array(*p).length_squared())
        .fold(0.0, f64::max);
    max_dist_sq.sqrt()
}

/// Subtract `offset` from every point, producing a new buffer.
///
/// The input is never mutated. Used to recenter uploaded clouds with large
/// absolute coordinates (e.g. UTM) near the origin.
pub fn shift_points(points: &[[f64; 3]], offset: &[f64; 3]) -> Vec<[f64; 3]> {
    points
        .iter()
        .map(|p| [p[0] - offset[0], p[1] - offset[1], p[2] - offset[2]])
        .collect()
}

/// Squared Euclidean distance between two points.
#[inline]
pub fn squared_distance(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    DVec3::from_array(*a).distance_squared(DVec3::from_array(*b))
}
