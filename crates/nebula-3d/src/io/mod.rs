use std::path::Path;

use crate::pointcloud::PointCloud;

/// PCD reader module.
pub mod pcd;

/// PLY reader module.
pub mod ply;

/// Error types for point cloud file loading.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Failed to read a PLY file
    #[error(transparent)]
    Ply(#[from] ply::PlyError),

    /// Failed to read a PCD file
    #[error(transparent)]
    Pcd(#[from] pcd::PcdError),

    /// File extension is not a supported point cloud format
    #[error("Unsupported file extension: .{0}. Use .pcd or .ply")]
    UnsupportedExtension(String),
}

/// Read a point cloud file, dispatching on the file extension.
///
/// Only positions are extracted; colors, normals and any other per-vertex
/// attributes in the file are skipped.
pub fn read_point_cloud(path: impl AsRef<Path>) -> Result<PointCloud, IoError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "ply" => Ok(ply::read_ply(path)?),
        "pcd" => Ok(pcd::read_pcd(path)?),
        other => Err(IoError::UnsupportedExtension(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_unknown_extension() {
        let result = read_point_cloud("scan.xyz");
        assert!(matches!(
            result,
            Err(IoError::UnsupportedExtension(ref ext)) if ext == "xyz"
        ));
    }

    #[test]
    fn test_rejects_missing_extension() {
        assert!(matches!(
            read_point_cloud("scan"),
            Err(IoError::UnsupportedExtension(_))
        ));
    }
}
