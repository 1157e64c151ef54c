//! Foundational primitives for the geometric portrait pipeline.
//!
//! ## Coordinate spaces
//! Pixel buffers use row-major indexing with integer coordinates addressing
//! pixel centers. Mesh coordinates live in the *target canvas* space, i.e.
//! after scaling from the working image resolution; producers are expected
//! to apply that scaling before handing points out.
//!
//! ## Point identity
//! `MeshPoint::id` is a stable identity within one mesh build, used for
//! triangle deduplication and synthetic-vertex filtering. Negative ids are
//! reserved for the triangulator's bounding vertices and never escape into
//! a finished [`Mesh`].

mod error;
mod geom;
mod image;
mod mesh;

pub use error::Error;
pub use geom::{Point2f, Vec2f};
pub use image::{luma_from_rgba, Image};
pub use mesh::{LineSegment, Mesh, MeshPoint, Triangle};
