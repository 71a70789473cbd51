use serde::Serialize;

use nebula_3d::pointcloud::PointCloud;
use nebula_3d::transforms::RigidTransform;

/// Maximum number of points from each cloud included in an advisory payload.
///
/// The hosted analysis service has tight payload limits; the engine never
/// exposes more than this fixed sample of raw coordinates.
pub const MAX_SAMPLE_POINTS: usize = 5;

/// Fixed user-visible text shown when the external advisory call fails for
/// any reason (missing credentials, transport errors).
pub const ADVISORY_FALLBACK: &str =
    "Error connecting to the analysis service. Check your API key or connection.";

/// Error types for advisory payload construction.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AdvisoryError {
    /// Payload requested while a cloud is empty
    #[error("Both point clouds must be loaded before requesting analysis")]
    EmptyPointCloud,
}

/// Compact description of the registration state sent to the hosted
/// analysis collaborator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdvisoryPayload {
    /// Centroid of the source cloud, before the transform.
    pub source_centroid: [f64; 3],
    /// Centroid of the target cloud.
    pub target_centroid: [f64; 3],
    /// Transform currently applied to the source.
    pub transform: RigidTransform,
    /// At most [`MAX_SAMPLE_POINTS`] leading source points.
    pub source_sample: Vec<[f64; 3]>,
    /// At most [`MAX_SAMPLE_POINTS`] leading target points.
    pub target_sample: Vec<[f64; 3]>,
}

impl AdvisoryPayload {
    /// Build a payload from the current clouds and transform. Both clouds
    /// must be loaded.
    pub fn new(
        source: &PointCloud,
        target: &PointCloud,
        transform: &RigidTransform,
    ) -> Result<Self, AdvisoryError> {
        if source.is_empty() || target.is_empty() {
            return Err(AdvisoryError::EmptyPointCloud);
        }

        let sample = |cloud: &PointCloud| -> Vec<[f64; 3]> {
            cloud
                .points()
                .iter()
                .take(MAX_SAMPLE_POINTS)
                .copied()
                .collect()
        };

        Ok(Self {
            source_centroid: source.centroid(),
            target_centroid: target.centroid(),
            transform: *transform,
            source_sample: sample(source),
            target_sample: sample(target),
        })
    }

    /// Render the payload as the natural-language prompt the external
    /// service expects.
    pub fn to_prompt(&self) -> String {
        let fmt_vec = |v: &[f64; 3]| format!("[{:.2}, {:.2}, {:.2}]", v[0], v[1], v[2]);
        let fmt_sample = |points: &[[f64; 3]]| {
            points.iter().map(|p| fmt_vec(p)).collect::<Vec<_>>().join(" ")
        };

        format!(
            "You are an expert 3D geometry and computer vision engineer.\n\
             I am performing a rigid point cloud registration task.\n\
             \n\
             Data statistics:\n\
             - Source point cloud centroid (initial): {}\n\
             - Target point cloud centroid: {}\n\
             - Current applied transform: position {}, rotation {}\n\
             \n\
             Source sample points: {}\n\
             Target sample points: {}\n\
             \n\
             Task:\n\
             1. Analyze the spatial relationship based on the centroids.\n\
             2. Comment on the alignment quality.\n\
             3. Recommend the next registration step (e.g. \"Move X by +5 units\").\n\
             4. Keep the response concise, professional and technical (under 150 words).\n",
            fmt_vec(&self.source_centroid),
            fmt_vec(&self.target_centroid),
            fmt_vec(&self.transform.translation),
            fmt_vec(&self.transform.rotation),
            fmt_sample(&self.source_sample),
            fmt_sample(&self.target_sample),
        )
    }
}

/// One display line of an advisory response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsightLine {
    /// Paragraph break (a blank line in the response).
    Break,
    /// Indented bullet (a line starting with a dash).
    Bullet(String),
    /// Plain text line.
    Text(String),
}

/// Split an opaque advisory response into display lines.
///
/// The response carries no required structure; the only formatting honored
/// is blank lines as paragraph breaks and leading dashes as bullets.
pub fn format_insights(text: &str) -> Vec<InsightLine> {
    text.lines()
        .map(|line| {
            let trimmed = line.trim_end();
            if trimmed.trim().is_empty() {
                InsightLine::Break
            } else if let Some(rest) = trimmed.strip_prefix('-') {
                InsightLine::Bullet(rest.trim_start().to_string())
            } else {
                InsightLine::Text(trimmed.to_string())
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded_cloud(n: usize) -> PointCloud {
        PointCloud::new((0..n).map(|i| [i as f64, 0.0, 0.0]).collect())
    }

    #[test]
    fn test_payload_requires_both_clouds() {
        let cloud = loaded_cloud(3);
        let transform = RigidTransform::identity();
        assert_eq!(
            AdvisoryPayload::new(&PointCloud::empty(), &cloud, &transform),
            Err(AdvisoryError::EmptyPointCloud)
        );
        assert_eq!(
            AdvisoryPayload::new(&cloud, &PointCloud::empty(), &transform),
            Err(AdvisoryError::EmptyPointCloud)
        );
    }

    #[test]
    fn test_samples_are_capped() {
        let payload = AdvisoryPayload::new(
            &loaded_cloud(1000),
            &loaded_cloud(2),
            &RigidTransform::identity(),
        )
        .unwrap();
        assert_eq!(payload.source_sample.len(), MAX_SAMPLE_POINTS);
        assert_eq!(payload.target_sample.len(), 2);
    }

    #[test]
    fn test_prompt_contains_statistics() {
        let mut transform = RigidTransform::identity();
        transform.translation = [3.0, 0.0, 0.0];
        let payload =
            AdvisoryPayload::new(&loaded_cloud(5), &loaded_cloud(5), &transform).unwrap();

        let prompt = payload.to_prompt();
        assert!(prompt.contains("Source point cloud centroid (initial): [2.00, 0.00, 0.00]"));
        assert!(prompt.contains("position [3.00, 0.00, 0.00]"));
        assert!(prompt.contains("rigid point cloud registration"));
    }

    #[test]
    fn test_format_insights_lines() {
        let text = "The clouds are offset.\n\n- Move X by +5 units\n- Rotate Z slightly\nDone.";
        let lines = format_insights(text);
        assert_eq!(
            lines,
            vec![
                InsightLine::Text("The clouds are offset.".to_string()),
                InsightLine::Break,
                InsightLine::Bullet("Move X by +5 units".to_string()),
                InsightLine::Bullet("Rotate Z slightly".to_string()),
                InsightLine::Text("Done.".to_string()),
            ]
        );
    }

    #[test]
    fn test_fallback_is_fixed() {
        assert!(ADVISORY_FALLBACK.contains("analysis service"));
    }
}
