use gp_core::Mesh;
use gp_mesh::silhouette_mesh;
use gp_reveal::{reveal_frame, PointerState, RevealFrame};

use crate::config::{MeshStrategy, PortraitConfig};
use crate::error::LoadError;
use crate::pipeline::{build_mesh, decode_image};

/// Lifecycle of the portrait mesh.
#[derive(Debug, Clone, PartialEq)]
pub enum PortraitState {
    /// No image submitted yet; the silhouette mesh is on display.
    Fallback(Mesh),
    /// A decode/build is in flight.
    Loading,
    Ready(Mesh),
    /// Decode failed; renderers fall back to the silhouette.
    Failed(LoadError),
}

/// Token tying a build to the config generation it started under.
///
/// Completing a build whose ticket is stale (the config changed while the
/// image was decoding) is a no-op: the stale mesh is discarded, never
/// merged with the new configuration's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildTicket {
    generation: u64,
}

/// Single-threaded load/compute/ready state machine.
///
/// There is exactly one writer (build completion) and one reader (the
/// renderer); they are sequenced through [`PortraitState`], so no locking
/// is involved. The mesh is rebuilt only when the image or config changes;
/// pointer movement drives [`PortraitEngine::reveal`] alone.
#[derive(Debug, Clone)]
pub struct PortraitEngine {
    config: PortraitConfig,
    state: PortraitState,
    fallback: Mesh,
    generation: u64,
}

impl PortraitEngine {
    pub fn new(config: PortraitConfig) -> Self {
        let fallback = silhouette_mesh(
            config.target_width as f32,
            config.target_height as f32,
            &config.fallback_params(),
        );

        let state = match &config.strategy {
            // Procedural mode needs no image; resolve it immediately.
            MeshStrategy::Procedural(_) => PortraitState::Ready(fallback.clone()),
            _ => PortraitState::Fallback(fallback.clone()),
        };

        Self {
            config,
            state,
            fallback,
            generation: 0,
        }
    }

    pub fn config(&self) -> &PortraitConfig {
        &self.config
    }

    pub fn state(&self) -> &PortraitState {
        &self.state
    }

    /// The silhouette shown while no computed mesh is available.
    pub fn fallback_mesh(&self) -> &Mesh {
        &self.fallback
    }

    /// Whatever the renderer should draw right now: the computed mesh when
    /// ready, the silhouette otherwise.
    pub fn display_mesh(&self) -> &Mesh {
        match &self.state {
            PortraitState::Ready(mesh) | PortraitState::Fallback(mesh) => mesh,
            PortraitState::Loading | PortraitState::Failed(_) => &self.fallback,
        }
    }

    /// Swaps in a new configuration, invalidating any build in flight.
    pub fn set_config(&mut self, config: PortraitConfig) {
        self.generation += 1;
        *self = Self {
            generation: self.generation,
            ..Self::new(config)
        };
    }

    /// Marks a build as in flight and hands back its ticket.
    pub fn begin_build(&mut self) -> BuildTicket {
        self.state = PortraitState::Loading;
        BuildTicket {
            generation: self.generation,
        }
    }

    /// Installs a build result. Returns false (leaving the state untouched)
    /// when the ticket is stale.
    pub fn complete_build(
        &mut self,
        ticket: BuildTicket,
        result: Result<Mesh, LoadError>,
    ) -> bool {
        if ticket.generation != self.generation {
            return false;
        }

        self.state = match result {
            Ok(mesh) => PortraitState::Ready(mesh),
            Err(err) => PortraitState::Failed(err),
        };
        true
    }

    /// Synchronous decode + build + install for callers without their own
    /// scheduling.
    pub fn load_image(&mut self, bytes: &[u8]) -> &PortraitState {
        let ticket = self.begin_build();
        let result =
            decode_image(bytes, &self.config).and_then(|img| build_mesh(&img, &self.config));
        self.complete_build(ticket, result);
        &self.state
    }

    /// Per-element opacities for the currently displayed mesh.
    pub fn reveal(&self, pointer: &PointerState) -> RevealFrame {
        reveal_frame(pointer, self.display_mesh(), self.config.reveal_radius)
    }
}
