//! Mesh construction for the portrait pipeline.
//!
//! Three stages live here:
//! - [`sample`]: turns an edge field into a bounded point set (edge-strength
//!   proportional density plus a coverage grid and border points). All
//!   randomness comes from an explicit seed in [`SampleConfig`], so a fixed
//!   (field, config) pair reproduces the exact point list.
//! - [`delaunay`]: Bowyer-Watson triangulation of an arbitrary point set.
//! - [`fallback`]: the deterministic head-and-shoulders silhouette mesh shown
//!   while no image is available.

mod delaunay;
mod fallback;
mod sample;

pub use delaunay::triangulate;
pub use fallback::{silhouette_mesh, FallbackConfig};
pub use sample::{sample_points, SampleConfig};
