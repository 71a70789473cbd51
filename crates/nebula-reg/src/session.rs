use rand::Rng;

use nebula_3d::generators;
use nebula_3d::ops;
use nebula_3d::pointcloud::PointCloud;
use nebula_3d::transforms::RigidTransform;

use crate::advisory::{AdvisoryError, AdvisoryPayload};
use crate::align::{self, AlignError};
use crate::rmse;
use crate::scene::{self, SceneFitter, SceneFrame};

/// Which cloud an upload replaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloudSlot {
    /// The movable cloud the transform applies to.
    Source,
    /// The fixed reference cloud.
    Target,
}

/// Built-in sample datasets, pre-centered on the origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntheticDataset {
    /// Two noisy spheres of radius 3.
    Sphere,
    /// Two noisy cubes of edge 4.
    Cube,
}

impl SyntheticDataset {
    /// Initial transform offset, a deliberate misalignment for the user to
    /// correct.
    fn initial_offset(self) -> [f64; 3] {
        match self {
            Self::Sphere => [5.0, 3.0, -2.0],
            Self::Cube => [-4.0, 2.0, 4.0],
        }
    }

    fn clouds<R: Rng>(self, rng: &mut R) -> (PointCloud, PointCloud) {
        match self {
            // the source carries more noise than the target, like a raw scan
            // registered against a cleaned reference
            Self::Sphere => (
                PointCloud::new(generators::sphere_points(2000, 3.0, 0.1, rng)),
                PointCloud::new(generators::sphere_points(2000, 3.0, 0.05, rng)),
            ),
            Self::Cube => (
                PointCloud::new(generators::cube_points(3000, 4.0, 0.1, rng)),
                PointCloud::new(generators::cube_points(3000, 4.0, 0.02, rng)),
            ),
        }
    }
}

/// Error types for session operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SessionError {
    /// Parsed file produced zero points
    #[error("File contains no point data")]
    EmptyUpload,

    /// Auto-align was requested on an empty cloud
    #[error(transparent)]
    Align(#[from] AlignError),
}

/// State for one interactive registration: the two clouds, the source
/// transform, and the world-recentering bookkeeping for uploaded files.
///
/// The world offset is owned here, never hidden in module state: a fresh
/// session starts with no offset, captures the first uploaded cloud's
/// centroid, and shifts every later upload by that same vector so the
/// relative geometry of source and target is preserved even when both carry
/// large absolute coordinates.
#[derive(Debug, Clone)]
pub struct RegistrationSession {
    source: PointCloud,
    target: PointCloud,
    transform: RigidTransform,
    world_offset: Option<[f64; 3]>,
    scene_scale: f64,
    fitter: SceneFitter,
}

impl Default for RegistrationSession {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistrationSession {
    /// Create an empty session: nothing loaded, identity transform, no
    /// world offset.
    pub fn new() -> Self {
        Self {
            source: PointCloud::empty(),
            target: PointCloud::empty(),
            transform: RigidTransform::identity(),
            world_offset: None,
            scene_scale: scene::MIN_SLIDER_RANGE,
            fitter: SceneFitter::new(),
        }
    }

    /// Ingest an uploaded cloud into the given slot, recentering it by the
    /// session's world offset.
    ///
    /// The first upload of a session defines the offset as its own centroid
    /// and therefore lands near the origin; subsequent uploads are shifted
    /// by that same offset, not their own centroid. An empty buffer is
    /// rejected and the slot is left unchanged. A new source resets the
    /// transform to identity.
    pub fn ingest(&mut self, slot: CloudSlot, points: &[[f64; 3]]) -> Result<(), SessionError> {
        if points.is_empty() {
            return Err(SessionError::EmptyUpload);
        }

        let offset = match self.world_offset {
            Some(offset) => offset,
            None => {
                let center = ops::centroid(points);
                log::debug!("world offset captured at {center:?}");
                self.world_offset = Some(center);
                center
            }
        };

        let recentered = PointCloud::new(ops::shift_points(points, &offset));

        let radius = recentered.bounding_radius();
        if radius > self.scene_scale {
            log::debug!("scene scale grows {} -> {radius}", self.scene_scale);
            self.scene_scale = radius;
        }

        match slot {
            CloudSlot::Source => {
                self.source = recentered;
                self.transform = RigidTransform::identity();
            }
            CloudSlot::Target => self.target = recentered,
        }
        Ok(())
    }

    /// Replace the scene with a built-in dataset.
    ///
    /// Synthetic datasets are pre-centered, so no world offset is involved
    /// and the scene scale resets to its floor. The transform is seeded with
    /// the dataset's misalignment offset.
    pub fn load_synthetic<R: Rng>(&mut self, dataset: SyntheticDataset, rng: &mut R) {
        let (source, target) = dataset.clouds(rng);
        self.source = source;
        self.target = target;
        self.world_offset = None;
        self.scene_scale = scene::MIN_SLIDER_RANGE;
        self.transform = RigidTransform::from_translation(dataset.initial_offset());
    }

    /// Clear the scene: both clouds emptied, offset dropped, transform and
    /// scale back to their initial values.
    pub fn clear(&mut self) {
        self.source = PointCloud::empty();
        self.target = PointCloud::empty();
        self.transform = RigidTransform::identity();
        self.world_offset = None;
        self.scene_scale = scene::MIN_SLIDER_RANGE;
        self.fitter.reset();
    }

    /// Whether both clouds are loaded, the precondition for auto-align and
    /// advisory requests.
    pub fn can_auto_align(&self) -> bool {
        !self.source.is_empty() && !self.target.is_empty()
    }

    /// Translate the source so the two centroids coincide. Rotation and
    /// scale are left as they are.
    pub fn auto_align(&mut self) -> Result<(), SessionError> {
        let translation =
            align::translation_to_match_centroids(self.source.points(), self.target.points())?;
        log::debug!("auto-align translation {translation:?}");
        self.transform.translation = translation;
        Ok(())
    }

    /// Current sampled alignment error; `0.0` while either cloud is empty.
    ///
    /// Cheap enough to re-derive on every transform change.
    pub fn rmse(&self) -> f64 {
        rmse::sampled_rmse(self.source.points(), self.target.points(), &self.transform)
    }

    /// [`RegistrationSession::rmse`] with an injected random source, for
    /// deterministic tests.
    pub fn rmse_with_rng<R: Rng>(&self, rng: &mut R) -> f64 {
        rmse::sampled_rmse_with_rng(
            self.source.points(),
            self.target.points(),
            &self.transform,
            rng,
        )
    }

    /// Camera placement if the scene changed since the last fit.
    pub fn refit_scene(&mut self) -> Option<SceneFrame> {
        self.fitter.refit(&self.source, &self.target)
    }

    /// UI slider range for the current scene scale.
    pub fn slider_range(&self) -> f64 {
        scene::slider_range(self.scene_scale)
    }

    /// Build the capped payload for the hosted analysis collaborator.
    pub fn advisory_payload(&self) -> Result<AdvisoryPayload, AdvisoryError> {
        AdvisoryPayload::new(&self.source, &self.target, &self.transform)
    }

    /// The movable cloud.
    pub fn source(&self) -> &PointCloud {
        &self.source
    }

    /// The fixed cloud.
    pub fn target(&self) -> &PointCloud {
        &self.target
    }

    /// Current source transform.
    pub fn transform(&self) -> &RigidTransform {
        &self.transform
    }

    /// Replace the source transform (slider interaction).
    pub fn set_transform(&mut self, transform: RigidTransform) {
        self.transform = transform;
    }

    /// Reset the source transform to identity.
    pub fn reset_transform(&mut self) {
        self.transform = RigidTransform::identity();
    }

    /// The session-wide recentering offset, if an upload has defined one.
    pub fn world_offset(&self) -> Option<[f64; 3]> {
        self.world_offset
    }

    /// Current working radius of the scene.
    pub fn scene_scale(&self) -> f64 {
        self.scene_scale
    }
}
