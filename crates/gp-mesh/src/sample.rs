use gp_core::MeshPoint;
use gp_edge::EdgeField;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Edge strength above which a grid cell may emit a second, nearby point.
const DETAIL_STRENGTH: f32 = 0.6;
/// A background grid cell is skipped when an edge point sits within this
/// fraction of the grid spacing.
const GRID_CLEARANCE: f32 = 0.4;

#[derive(Debug, Clone, PartialEq)]
pub struct SampleConfig {
    /// Magnitude threshold on a 0-255 scale, applied as a fraction of the
    /// field's observed maximum.
    pub threshold: f32,
    /// Edge-grid density; the sampling step is `max(2, floor(1/density))`.
    pub density: f32,
    /// Soft cap on the point count. Border and corner points are never cut,
    /// so the output may exceed this when the cap is very small.
    pub max_points: usize,
    /// Seed for jitter, detail coin flips, and overflow subsampling.
    pub seed: u64,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            threshold: 60.0,
            density: 0.25,
            max_points: 380,
            seed: 1,
        }
    }
}

/// Samples an edge field into mesh points in target-canvas coordinates.
///
/// Emits edge-proportional points, a sparse background grid for low-detail
/// coverage, and border points (plus the four corners) so the subsequent
/// triangulation spans the whole canvas. On budget overflow only the
/// edge-derived and background points are subsampled; ids are reassigned
/// sequentially afterwards.
pub fn sample_points(
    field: &EdgeField,
    target_width: f32,
    target_height: f32,
    cfg: &SampleConfig,
) -> Vec<MeshPoint> {
    let w = field.width;
    let h = field.height;
    if w == 0 || h == 0 {
        return Vec::new();
    }

    let mut rng = SmallRng::seed_from_u64(cfg.seed);

    let max_mag = field.max_magnitude();
    let mut cuttable: Vec<(f32, f32)> = Vec::new();

    if max_mag > 0.0 {
        let scaled_thresh = (cfg.threshold / 255.0) * max_mag;
        let density = cfg.density.max(1e-3);
        let step = ((1.0 / density).floor() as usize).max(2);

        for y in (0..h).step_by(step) {
            for x in (0..w).step_by(step) {
                let m = field.magnitude_at(x, y);
                if m <= scaled_thresh {
                    continue;
                }

                let strength = m / max_mag;
                let jitter = (1.0 - strength) * step as f32 * 0.5;
                cuttable.push(jittered(x, y, jitter, w, h, &mut rng));

                if strength > DETAIL_STRENGTH && rng.random_bool(0.5) {
                    cuttable.push(jittered(x, y, step as f32 * 0.5, w, h, &mut rng));
                }
            }
        }
    }

    let edge_count = cuttable.len();

    // Background grid, skipping cells already served by an edge point.
    let grid_step = (w / 12).max(25);
    let clearance2 = {
        let c = GRID_CLEARANCE * grid_step as f32;
        c * c
    };
    for y in (0..h).step_by(grid_step) {
        for x in (0..w).step_by(grid_step) {
            let fx = x as f32;
            let fy = y as f32;
            let near_edge_point = cuttable[..edge_count].iter().any(|&(px, py)| {
                let dx = px - fx;
                let dy = py - fy;
                dx * dx + dy * dy < clearance2
            });
            if !near_edge_point {
                cuttable.push((fx, fy));
            }
        }
    }

    let protected = border_points(w, h);

    // Budget overflow: border and corner points always survive; the rest is
    // shuffled and truncated.
    if cuttable.len() + protected.len() > cfg.max_points {
        let keep = cfg.max_points.saturating_sub(protected.len());
        cuttable.shuffle(&mut rng);
        cuttable.truncate(keep);
    }

    let sx = target_width / w as f32;
    let sy = target_height / h as f32;

    cuttable
        .into_iter()
        .chain(protected)
        .enumerate()
        .map(|(i, (x, y))| MeshPoint {
            x: x * sx,
            y: y * sy,
            id: i as i32,
        })
        .collect()
}

fn jittered(
    x: usize,
    y: usize,
    amount: f32,
    w: usize,
    h: usize,
    rng: &mut SmallRng,
) -> (f32, f32) {
    let (dx, dy) = if amount > 0.0 {
        (
            rng.random_range(-amount..amount),
            rng.random_range(-amount..amount),
        )
    } else {
        (0.0, 0.0)
    };

    (
        (x as f32 + dx).clamp(0.0, (w - 1) as f32),
        (y as f32 + dy).clamp(0.0, (h - 1) as f32),
    )
}

/// Points along all four image edges plus the exact corners. Required so
/// the triangulation covers the canvas without slivers at the border.
fn border_points(w: usize, h: usize) -> Vec<(f32, f32)> {
    let spacing = (w / 20).max(15);
    let xmax = (w - 1) as f32;
    let ymax = (h - 1) as f32;

    let mut out = Vec::new();
    for x in (spacing..w.saturating_sub(1)).step_by(spacing) {
        out.push((x as f32, 0.0));
        out.push((x as f32, ymax));
    }
    for y in (spacing..h.saturating_sub(1)).step_by(spacing) {
        out.push((0.0, y as f32));
        out.push((xmax, y as f32));
    }

    out.push((0.0, 0.0));
    out.push((xmax, 0.0));
    out.push((0.0, ymax));
    out.push((xmax, ymax));
    out
}
