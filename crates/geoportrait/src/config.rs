use gp_mesh::{FallbackConfig, SampleConfig};
use gp_trace::TraceConfig;

/// Processing happens at this multiple of the display size; segment and
/// point coordinates are scaled back down to the target canvas.
pub const WORKING_SCALE: u32 = 2;

/// Mesh construction strategy, resolved once per config change.
#[derive(Debug, Clone, PartialEq)]
pub enum MeshStrategy {
    /// Photographic input: edge field -> sampled points -> triangulation.
    Edge(SampleConfig),
    /// Pre-rendered line art: threshold -> trace -> simplified segments.
    LineArt(TraceConfig),
    /// No image at all: the deterministic silhouette mesh.
    Procedural(FallbackConfig),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PortraitConfig {
    /// Target canvas size; all mesh coordinates land in `[0, width] x
    /// [0, height]`.
    pub target_width: u32,
    pub target_height: u32,
    pub reveal_radius: f32,
    pub strategy: MeshStrategy,
}

impl Default for PortraitConfig {
    fn default() -> Self {
        Self {
            target_width: 280,
            target_height: 350,
            reveal_radius: 70.0,
            strategy: MeshStrategy::Edge(SampleConfig::default()),
        }
    }
}

impl PortraitConfig {
    pub fn working_dims(&self) -> (u32, u32) {
        (
            self.target_width * WORKING_SCALE,
            self.target_height * WORKING_SCALE,
        )
    }

    pub fn fallback_params(&self) -> FallbackConfig {
        match &self.strategy {
            MeshStrategy::Procedural(params) => params.clone(),
            _ => FallbackConfig::default(),
        }
    }
}
