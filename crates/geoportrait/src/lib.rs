//! Umbrella crate for the `geoportrait` workspace.
//!
//! Ties the pipeline stages together: decode and resample a photo, run the
//! selected mesh strategy (edge field, line-art trace, or procedural
//! silhouette), and track the load/compute/ready lifecycle so renderers
//! always have something to draw.

mod config;
mod error;
mod pipeline;
mod state;

pub use config::{MeshStrategy, PortraitConfig, WORKING_SCALE};
pub use error::LoadError;
pub use pipeline::{build_mesh, decode_image, DecodedImage};
pub use state::{BuildTicket, PortraitEngine, PortraitState};

pub use gp_core::{LineSegment, Mesh, MeshPoint, Point2f, Triangle, Vec2f};
pub use gp_edge::{EdgeExtractor, EdgeField};
pub use gp_mesh::{silhouette_mesh, triangulate, FallbackConfig, SampleConfig};
pub use gp_reveal::{reveal_frame, PointerState, RevealFrame};
pub use gp_trace::TraceConfig;
