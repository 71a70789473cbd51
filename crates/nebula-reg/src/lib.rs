#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Advisory payload boundary for the hosted analysis collaborator.
pub mod advisory;

/// Centroid-matching auto alignment.
pub mod align;

/// Stochastic alignment error estimation.
pub mod rmse;

/// Camera framing and UI slider ranges.
pub mod scene;

/// Registration session state and lifecycle.
pub mod session;
