use nebula_3d::ops;

/// Error types for auto alignment.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AlignError {
    /// Auto-align requested while a cloud is empty
    #[error("Cannot auto-align with an empty point cloud")]
    EmptyPointCloud,
}

/// Compute the translation that moves the source centroid onto the target
/// centroid.
///
/// Pure function over the two clouds; rotation and scale are untouched.
/// Callers are expected to guard against empty clouds before invoking; the
/// engine refuses to act on them.
///
/// Example:
/// ```
/// use nebula_reg::align::translation_to_match_centroids;
///
/// let source = vec![[1.0, 0.0, 0.0]];
/// let target = vec![[4.0, 0.0, 0.0]];
/// let t = translation_to_match_centroids(&source, &target).unwrap();
/// assert_eq!(t, [3.0, 0.0, 0.0]);
/// ```
pub fn translation_to_match_centroids(
    source: &[[f64; 3]],
    target: &[[f64; 3]],
) -> Result<[f64; 3], AlignError> {
    if source.is_empty() || target.is_empty() {
        return Err(AlignError::EmptyPointCloud);
    }

    let s = ops::centroid(source);
    let t = ops::centroid(target);
    Ok([t[0] - s[0], t[1] - s[1], t[2] - s[2]])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nebula_3d::transforms::{transform_points, RigidTransform};

    #[test]
    fn test_empty_clouds_are_refused() {
        let cloud = vec![[1.0, 2.0, 3.0]];
        assert_eq!(
            translation_to_match_centroids(&[], &cloud),
            Err(AlignError::EmptyPointCloud)
        );
        assert_eq!(
            translation_to_match_centroids(&cloud, &[]),
            Err(AlignError::EmptyPointCloud)
        );
    }

    #[test]
    fn test_translation_matches_centroids_exactly() -> Result<(), AlignError> {
        let source = vec![[0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 4.0, 0.0]];
        let target = vec![[10.0, -1.0, 5.0], [12.0, -1.0, 5.0], [10.0, 3.0, 5.0]];

        let translation = translation_to_match_centroids(&source, &target)?;
        let moved = transform_points(&source, &RigidTransform::from_translation(translation));

        let moved_centroid = nebula_3d::ops::centroid(&moved);
        let target_centroid = nebula_3d::ops::centroid(&target);
        for i in 0..3 {
            assert_relative_eq!(moved_centroid[i], target_centroid[i], epsilon = 1e-12);
        }
        Ok(())
    }

    #[test]
    fn test_rotation_and_scale_untouched() -> Result<(), AlignError> {
        // the function only reports a translation; composing it into a
        // transform is the caller's job
        let source = vec![[1.0, 0.0, 0.0]];
        let target = vec![[4.0, 0.0, 0.0]];
        let translation = translation_to_match_centroids(&source, &target)?;
        assert_eq!(translation, [3.0, 0.0, 0.0]);
        Ok(())
    }
}
