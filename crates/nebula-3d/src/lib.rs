#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Synthetic point cloud generators.
pub mod generators;

/// I/O utilities for reading point cloud files.
pub mod io;

/// Statistics and buffer operations on 3D points.
pub mod ops;

/// Point cloud container.
pub mod pointcloud;

/// Rigid transform model.
pub mod transforms;
