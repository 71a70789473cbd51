use crate::ops;

/// Error types for point cloud construction.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PointCloudError {
    /// Flat coordinate buffer whose length is not a multiple of 3
    #[error("Flat buffer length {0} is not a multiple of 3")]
    InvalidBufferLength(usize),
}

/// An immutable cloud of 3D points.
///
/// The buffer is never mutated after construction. Operations that move
/// points (recentering, transforms) produce new buffers, so a cloud can be
/// shared freely between the metric, scene and rendering paths. An empty
/// cloud is a valid value meaning "not loaded".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointCloud {
    points: Vec<[f64; 3]>,
}

impl PointCloud {
    /// Create a new point cloud from a vector of points.
    pub fn new(points: Vec<[f64; 3]>) -> Self {
        Self { points }
    }

    /// Create an empty point cloud.
    pub fn empty() -> Self {
        Self { points: Vec::new() }
    }

    /// Create a point cloud from a flat `x0 y0 z0 x1 y1 z1 ...` buffer, the
    /// shape produced by file-parsing collaborators.
    pub fn from_flat(buffer: &[f64]) -> Result<Self, PointCloudError> {
        if buffer.len() % 3 != 0 {
            return Err(PointCloudError::InvalidBufferLength(buffer.len()));
        }
        let points = buffer
            .chunks_exact(3)
            .map(|c| [c[0], c[1], c[2]])
            .collect();
        Ok(Self { points })
    }

    /// Get the number of points in the point cloud.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the point cloud is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Get as reference the points in the point cloud.
    pub fn points(&self) -> &[[f64; 3]] {
        &self.points
    }

    /// Componentwise mean of all points. See [`ops::centroid`].
    pub fn centroid(&self) -> [f64; 3] {
        ops::centroid(&self.points)
    }

    /// Maximum distance from the world origin. See [`ops::bounding_radius`].
    pub fn bounding_radius(&self) -> f64 {
        ops::bounding_radius(&self.points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointcloud() {
        let cloud = PointCloud::new(vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]]);

        assert_eq!(cloud.len(), 2);
        assert!(!cloud.is_empty());

        if let Some(p0) = cloud.points().first() {
            assert_eq!(p0, &[0.0, 0.0, 0.0]);
        }
        if let Some(p1) = cloud.points().last() {
            assert_eq!(p1, &[1.0, 0.0, 0.0]);
        }
    }

    #[test]
    fn test_from_flat() -> Result<(), PointCloudError> {
        let cloud = PointCloud::from_flat(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0])?;
        assert_eq!(cloud.len(), 2);
        assert_eq!(cloud.points()[1], [4.0, 5.0, 6.0]);
        Ok(())
    }

    #[test]
    fn test_from_flat_invalid_length() {
        let result = PointCloud::from_flat(&[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(result, Err(PointCloudError::InvalidBufferLength(4)));
    }

    #[test]
    fn test_empty_is_not_loaded() {
        let cloud = PointCloud::empty();
        assert!(cloud.is_empty());
        assert_eq!(cloud.len(), 0);
    }
}
