use serde::{Deserialize, Serialize};

/// Rigid pose of the movable source cloud: translation, Euler rotation and a
/// uniform display scale.
///
/// Rotation angles are in radians and apply intrinsically in X, then Y, then
/// Z order. `scale` is a render-only parameter: the rendering collaborator
/// applies it when drawing the cloud, but [`RigidTransform::transform_point`]
/// never does, so the alignment error metric considers rigid pose only. This
/// asymmetry is intentional.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RigidTransform {
    /// Translation vector, applied after rotation.
    pub translation: [f64; 3],
    /// Euler angles in radians, intrinsic X -> Y -> Z order.
    pub rotation: [f64; 3],
    /// Uniform display scale. Not part of the metric path.
    pub scale: f64,
}

impl Default for RigidTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl RigidTransform {
    /// The identity transform: zero translation and rotation, unit scale.
    pub fn identity() -> Self {
        Self {
            translation: [0.0, 0.0, 0.0],
            rotation: [0.0, 0.0, 0.0],
            scale: 1.0,
        }
    }

    /// A pure translation with no rotation and unit scale.
    pub fn from_translation(translation: [f64; 3]) -> Self {
        Self {
            translation,
            ..Self::identity()
        }
    }

    /// The rotation matrix for this transform. See
    /// [`euler_xyz_to_rotation_matrix`].
    pub fn rotation_matrix(&self) -> [[f64; 3]; 3] {
        euler_xyz_to_rotation_matrix(self.rotation[0], self.rotation[1], self.rotation[2])
    }

    /// Apply the rigid part of the transform to a single point: rotate, then
    /// translate.
    ///
    /// `scale` is deliberately not applied here. The renderer scales the
    /// drawn cloud, but alignment error is a property of the rigid pose.
    pub fn transform_point(&self, point: &[f64; 3]) -> [f64; 3] {
        let r = self.rotation_matrix();
        apply_rotation_translation(point, &r, &self.translation)
    }

    /// The homogeneous matrix the rendering collaborator applies for
    /// display, in row-major order for column vectors.
    ///
    /// This is the one place `scale` enters the math; the value is used
    /// literally, including zero or negative scales.
    pub fn render_matrix(&self) -> [[f64; 4]; 4] {
        let r = self.rotation_matrix();
        let s = self.scale;
        let t = self.translation;
        [
            [r[0][0] * s, r[0][1] * s, r[0][2] * s, t[0]],
            [r[1][0] * s, r[1][1] * s, r[1][2] * s, t[1]],
            [r[2][0] * s, r[2][1] * s, r[2][2] * s, t[2]],
            [0.0, 0.0, 0.0, 1.0],
        ]
    }
}

/// Compute the rotation matrix for intrinsic Euler angles applied in X, then
/// Y, then Z order.
///
/// The matrix is the product of the three standard axis rotations,
/// `R = Rx(rx) * Ry(ry) * Rz(rz)`, for column vectors. Composing the axis
/// matrices in this order keeps the metric path consistent with renderers
/// that use the same XYZ Euler convention.
pub fn euler_xyz_to_rotation_matrix(rx: f64, ry: f64, rz: f64) -> [[f64; 3]; 3] {
    let (sx, cx) = rx.sin_cos();
    let (sy, cy) = ry.sin_cos();
    let (sz, cz) = rz.sin_cos();

    let r_x = [[1.0, 0.0, 0.0], [0.0, cx, -sx], [0.0, sx, cx]];
    let r_y = [[cy, 0.0, sy], [0.0, 1.0, 0.0], [-sy, 0.0, cy]];
    let r_z = [[cz, -sz, 0.0], [sz, cz, 0.0], [0.0, 0.0, 1.0]];

    matmul33(&r_x, &matmul33(&r_y, &r_z))
}

/// Transform a set of points with the rigid part of a transform, producing a
/// new buffer.
///
/// Example:
/// ```
/// use nebula_3d::transforms::{transform_points, RigidTransform};
///
/// let points = vec![[1.0, 0.0, 0.0]];
/// let transform = RigidTransform::from_translation([3.0, 0.0, 0.0]);
/// assert_eq!(transform_points(&points, &transform), vec![[4.0, 0.0, 0.0]]);
/// ```
pub fn transform_points(points: &[[f64; 3]], transform: &RigidTransform) -> Vec<[f64; 3]> {
    let r = transform.rotation_matrix();
    points
        .iter()
        .map(|p| apply_rotation_translation(p, &r, &transform.translation))
        .collect()
}

#[inline]
fn apply_rotation_translation(p: &[f64; 3], r: &[[f64; 3]; 3], t: &[f64; 3]) -> [f64; 3] {
    [
        r[0][0] * p[0] + r[0][1] * p[1] + r[0][2] * p[2] + t[0],
        r[1][0] * p[0] + r[1][1] * p[1] + r[1][2] * p[2] + t[1],
        r[2][0] * p[0] + r[2][1] * p[1] + r[2][2] * p[2] + t[2],
    ]
}

fn matmul33(a: &[[f64; 3]; 3], b: &[[f64; 3]; 3]) -> [[f64; 3]; 3] {
    let mut out = [[0.0; 3]; 3];
    for (i, row) in out.iter_mut().enumerate() {
        for (j, val) in row.iter_mut().enumerate() {
            *val = a[i][0] * b[0][j] + a[i][1] * b[1][j] + a[i][2] * b[2][j];
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    fn assert_point_eq(a: &[f64; 3], b: &[f64; 3]) {
        for i in 0..3 {
            assert_relative_eq!(a[i], b[i], epsilon = 1e-12);
        }
    }

    #[test]
    fn test_identity_leaves_point_unchanged() {
        let p = [1.0, -2.0, 3.5];
        assert_point_eq(&RigidTransform::identity().transform_point(&p), &p);
    }

    #[test]
    fn test_zero_rotation_is_pure_translation() {
        let p = [1.0, 2.0, 3.0];
        let transform = RigidTransform::from_translation([4.0, -5.0, 6.0]);
        assert_point_eq(&transform.transform_point(&p), &[5.0, -3.0, 9.0]);
    }

    #[test]
    fn test_rotation_z_quarter_turn() {
        let transform = RigidTransform {
            rotation: [0.0, 0.0, FRAC_PI_2],
            ..RigidTransform::identity()
        };
        assert_point_eq(&transform.transform_point(&[1.0, 0.0, 0.0]), &[0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_rotation_applies_before_translation() {
        // rotate (1,0,0) a quarter turn about Z to (0,1,0), then translate
        let transform = RigidTransform {
            translation: [10.0, 0.0, 0.0],
            rotation: [0.0, 0.0, FRAC_PI_2],
            scale: 1.0,
        };
        assert_point_eq(&transform.transform_point(&[1.0, 0.0, 0.0]), &[10.0, 1.0, 0.0]);
    }

    #[test]
    fn test_euler_order_is_x_then_y_then_z() {
        // for intrinsic XYZ, m02 of the composed matrix is sin(ry)
        let r = euler_xyz_to_rotation_matrix(0.3, 0.4, 0.5);
        assert_relative_eq!(r[0][2], 0.4f64.sin(), epsilon = 1e-12);
        assert_relative_eq!(r[0][0], 0.4f64.cos() * 0.5f64.cos(), epsilon = 1e-12);
        assert_relative_eq!(r[0][1], -(0.4f64.cos() * 0.5f64.sin()), epsilon = 1e-12);
    }

    #[test]
    fn test_scale_is_excluded_from_metric_path() {
        let transform = RigidTransform {
            scale: 3.0,
            ..RigidTransform::identity()
        };
        // the metric path ignores scale entirely
        assert_point_eq(&transform.transform_point(&[1.0, 1.0, 1.0]), &[1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_render_matrix_applies_scale_literally() {
        let transform = RigidTransform {
            translation: [1.0, 2.0, 3.0],
            rotation: [0.0, 0.0, 0.0],
            scale: 0.0,
        };
        // degenerate scale collapses the basis but must not panic
        let m = transform.render_matrix();
        assert_eq!(m[0][0], 0.0);
        assert_eq!(m[1][1], 0.0);
        assert_eq!(m[0][3], 1.0);
        assert_eq!(m[3][3], 1.0);
    }

    #[test]
    fn test_transform_points_batch_matches_single() {
        let points = vec![[1.0, 2.0, 3.0], [-4.0, 5.0, -6.0]];
        let transform = RigidTransform {
            translation: [0.5, -0.5, 1.0],
            rotation: [0.1, 0.2, 0.3],
            scale: 1.0,
        };
        let batch = transform_points(&points, &transform);
        for (p, out) in points.iter().zip(batch.iter()) {
            assert_point_eq(out, &transform.transform_point(p));
        }
    }
}
