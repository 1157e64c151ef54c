use gp_core::{luma_from_rgba, Mesh};
use gp_edge::EdgeExtractor;
use gp_mesh::{sample_points, silhouette_mesh, triangulate};
use gp_trace::{collect_points, trace_line_segments};
use image::imageops::FilterType;

use crate::config::{MeshStrategy, PortraitConfig};
use crate::error::LoadError;

/// A decoded photo resampled to the working resolution, ready for one or
/// more mesh builds.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    rgba: Vec<u8>,
    width: usize,
    height: usize,
}

impl DecodedImage {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }
}

/// Decodes raw image bytes and resamples them to twice the target size.
///
/// This is the pipeline's only failure point; everything downstream
/// degrades to an empty or fallback mesh instead of erroring.
pub fn decode_image(bytes: &[u8], cfg: &PortraitConfig) -> Result<DecodedImage, LoadError> {
    let (ww, wh) = cfg.working_dims();
    if ww == 0 || wh == 0 {
        return Err(LoadError::EmptyImage);
    }

    let decoded = image::load_from_memory(bytes)?;
    if decoded.width() == 0 || decoded.height() == 0 {
        return Err(LoadError::EmptyImage);
    }

    let resized = decoded.resize_exact(ww, wh, FilterType::Triangle);
    let rgba = resized.into_rgba8();

    Ok(DecodedImage {
        width: rgba.width() as usize,
        height: rgba.height() as usize,
        rgba: rgba.into_raw(),
    })
}

/// Runs the configured strategy over a decoded image.
///
/// The result is a pure function of (image, config): edge sampling draws
/// its randomness from the seed inside [`SampleConfig`].
///
/// [`SampleConfig`]: gp_mesh::SampleConfig
pub fn build_mesh(img: &DecodedImage, cfg: &PortraitConfig) -> Result<Mesh, LoadError> {
    let tw = cfg.target_width as f32;
    let th = cfg.target_height as f32;

    match &cfg.strategy {
        MeshStrategy::Edge(params) => {
            let mut extractor = EdgeExtractor::new();
            let field = extractor.extract_rgba(&img.rgba, img.width, img.height)?;
            let points = sample_points(&field, tw, th, params);
            let triangles = triangulate(&points, tw, th);
            Ok(Mesh {
                points,
                triangles,
                lines: Vec::new(),
            })
        }
        MeshStrategy::LineArt(params) => {
            let gray = luma_from_rgba(&img.rgba, img.width, img.height)?;
            let lines = trace_line_segments(&gray, tw, th, params);
            let points = collect_points(&lines);
            Ok(Mesh {
                points,
                triangles: Vec::new(),
                lines,
            })
        }
        MeshStrategy::Procedural(params) => Ok(silhouette_mesh(tw, th, params)),
    }
}
