use serde::Serialize;

use nebula_3d::pointcloud::PointCloud;

/// Distance multiplier applied to the bounding radius when placing the
/// camera.
const CAMERA_DISTANCE_FACTOR: f64 = 2.5;

/// Minimum slider range exposed to the UI.
pub const MIN_SLIDER_RANGE: f64 = 10.0;

/// Camera placement hint for the rendering collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SceneFrame {
    /// Point the camera orbits around.
    pub target: [f64; 3],
    /// Camera position along the viewing diagonal.
    pub position: [f64; 3],
    /// Distance from the camera to the target.
    pub distance: f64,
}

/// Derives camera framing from the fixed cloud whenever the scene changes.
///
/// "Changed" is a coarse signal: the combined point count of both clouds
/// differs from the previous fit. Reloading a file with the exact same point
/// count does not re-trigger a fit; this is an accepted limitation.
#[derive(Debug, Clone, Default)]
pub struct SceneFitter {
    last_total: usize,
}

impl SceneFitter {
    /// Create a fitter that has not framed anything yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Frame the scene if the combined point count changed, returning the new
    /// camera placement.
    ///
    /// The fixed set is the target when non-empty, otherwise the source. The
    /// camera looks at its centroid from `2.5 x bounding_radius` away along
    /// the (1, 1, 1) diagonal.
    pub fn refit(&mut self, source: &PointCloud, target: &PointCloud) -> Option<SceneFrame> {
        let total = source.len() + target.len();
        if total == 0 || total == self.last_total {
            return None;
        }
        self.last_total = total;

        let fixed = if !target.is_empty() { target } else { source };
        let center = fixed.centroid();
        let distance = CAMERA_DISTANCE_FACTOR * fixed.bounding_radius();

        Some(SceneFrame {
            target: center,
            position: [center[0] + distance, center[1] + distance, center[2] + distance],
            distance,
        })
    }

    /// Forget the previous fit so the next non-empty scene frames again.
    pub fn reset(&mut self) {
        self.last_total = 0;
    }
}

/// UI slider range for a given scene scale: never below
/// [`MIN_SLIDER_RANGE`], never shrinking once the scale has grown.
pub fn slider_range(scene_scale: f64) -> f64 {
    MIN_SLIDER_RANGE.max(scene_scale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_no_fit_for_empty_scene() {
        let mut fitter = SceneFitter::new();
        assert!(fitter
            .refit(&PointCloud::empty(), &PointCloud::empty())
            .is_none());
    }

    #[test]
    fn test_fit_prefers_target_cloud() {
        let mut fitter = SceneFitter::new();
        let source = PointCloud::new(vec![[100.0, 0.0, 0.0]]);
        let target = PointCloud::new(vec![[0.0, 4.0, 0.0]]);

        let frame = fitter.refit(&source, &target).unwrap();
        assert_eq!(frame.target, [0.0, 4.0, 0.0]);
        assert_relative_eq!(frame.distance, 2.5 * 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_fit_falls_back_to_source() {
        let mut fitter = SceneFitter::new();
        let source = PointCloud::new(vec![[3.0, 0.0, 0.0]]);

        let frame = fitter.refit(&source, &PointCloud::empty()).unwrap();
        assert_eq!(frame.target, [3.0, 0.0, 0.0]);
        assert_relative_eq!(frame.distance, 7.5, epsilon = 1e-12);
    }

    #[test]
    fn test_unchanged_count_does_not_refit() {
        let mut fitter = SceneFitter::new();
        let target = PointCloud::new(vec![[1.0, 0.0, 0.0], [2.0, 0.0, 0.0]]);
        assert!(fitter.refit(&PointCloud::empty(), &target).is_some());

        // same combined count, different coordinates: no refit
        let reloaded = PointCloud::new(vec![[5.0, 5.0, 5.0], [6.0, 5.0, 5.0]]);
        assert!(fitter.refit(&PointCloud::empty(), &reloaded).is_none());

        // count change triggers again
        let grown = PointCloud::new(vec![[1.0, 0.0, 0.0], [2.0, 0.0, 0.0], [3.0, 0.0, 0.0]]);
        assert!(fitter.refit(&PointCloud::empty(), &grown).is_some());
    }

    #[test]
    fn test_camera_sits_on_diagonal() {
        let mut fitter = SceneFitter::new();
        let target = PointCloud::new(vec![[0.0, 0.0, 2.0]]);
        let frame = fitter.refit(&PointCloud::empty(), &target).unwrap();
        for i in 0..3 {
            assert_relative_eq!(
                frame.position[i] - frame.target[i],
                frame.distance,
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn test_slider_range_floor_and_growth() {
        assert_eq!(slider_range(0.0), 10.0);
        assert_eq!(slider_range(7.5), 10.0);
        assert_eq!(slider_range(150.0), 150.0);
    }
}
