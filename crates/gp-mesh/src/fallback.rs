use std::collections::HashSet;

use gp_core::{Mesh, MeshPoint, Triangle};

/// Each point connects to at most this many nearest neighbors.
const MAX_NEIGHBORS: usize = 6;

#[derive(Debug, Clone, PartialEq)]
pub struct FallbackConfig {
    pub cols: usize,
    pub rows: usize,
    /// Maximum jitter in canvas units; shrinks towards the grid rim.
    pub randomization: f32,
    /// Neighbor connection radius in canvas units.
    pub connection_distance: f32,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            cols: 11,
            rows: 14,
            randomization: 18.0,
            connection_distance: 55.0,
        }
    }
}

/// Deterministic head-and-shoulders placeholder mesh.
///
/// Pure function of its inputs: the jitter comes from a hash of the grid
/// indices (computed in f64), so regeneration with identical parameters is
/// bit-identical. Shown while the photo is still decoding or after a decode
/// failure.
pub fn silhouette_mesh(width: f32, height: f32, cfg: &FallbackConfig) -> Mesh {
    let mut points = Vec::new();

    if cfg.cols == 0 || cfg.rows == 0 {
        return Mesh::default();
    }

    let mut id = 0;
    for row in 0..=cfg.rows {
        for col in 0..=cfg.cols {
            let base_x = col as f64 / cfg.cols as f64 * width as f64;
            let base_y = row as f64 / cfg.rows as f64 * height as f64;

            let rim = col
                .min(cfg.cols - col)
                .min(row)
                .min(cfg.rows - row);
            let edge_factor = (rim as f64 / 3.0).min(1.0);

            let seed = (row * cfg.cols + col) as f64;
            let dx = (hash_noise(seed) - 0.5) * cfg.randomization as f64 * edge_factor;
            let dy = (hash_noise(seed + 1000.0) - 0.5) * cfg.randomization as f64 * edge_factor;

            let x = (base_x + dx) as f32;
            let y = (base_y + dy) as f32;

            if in_silhouette(x, y, width, height) {
                points.push(MeshPoint { x, y, id });
                id += 1;
            }
        }
    }

    let triangles = connect_neighbors(&points, cfg.connection_distance);

    Mesh {
        points,
        triangles,
        lines: Vec::new(),
    }
}

/// Head ellipse, neck band, and shoulder band, all as fractions of the
/// canvas.
fn in_silhouette(x: f32, y: f32, width: f32, height: f32) -> bool {
    let center_x = width / 2.0;

    let head_cy = height * 0.35;
    let head_rx = width * 0.4;
    let head_ry = height * 0.35;
    let nx = (x - center_x) / head_rx;
    let ny = (y - head_cy) / head_ry;
    let in_head = nx * nx + ny * ny <= 1.0;

    let neck_half_width = width * 0.22;
    let in_neck = y > height * 0.6
        && y < height * 0.85
        && x > center_x - neck_half_width
        && x < center_x + neck_half_width;

    let in_shoulders = y > height * 0.75 && y < height && x > width * 0.08 && x < width * 0.92;

    in_head || in_neck || in_shoulders
}

/// Fans each point with consecutive pairs of its nearest neighbors inside
/// the connection radius, skipping unordered id triples already emitted.
fn connect_neighbors(points: &[MeshPoint], connection_distance: f32) -> Vec<Triangle> {
    let mut triangles = Vec::new();
    let mut seen: HashSet<[i32; 3]> = HashSet::new();

    for (i, &p1) in points.iter().enumerate() {
        let mut nearby: Vec<(f32, usize)> = points
            .iter()
            .enumerate()
            .filter(|&(j, _)| j != i)
            .map(|(j, p)| {
                let dx = p.x - p1.x;
                let dy = p.y - p1.y;
                ((dx * dx + dy * dy).sqrt(), j)
            })
            .filter(|&(d, _)| d < connection_distance)
            .collect();
        nearby.sort_by(|a, b| a.0.total_cmp(&b.0));
        nearby.truncate(MAX_NEIGHBORS);

        for pair in nearby.windows(2) {
            let p2 = points[pair[0].1];
            let p3 = points[pair[1].1];

            let t = Triangle {
                a: p1,
                b: p2,
                c: p3,
            };
            if seen.insert(t.id_key()) {
                triangles.push(t);
            }
        }
    }

    triangles
}

/// JS-era grid hash: `fract(sin(s * 12.9898 + s * 78.233) * 43758.5453)`.
fn hash_noise(seed: f64) -> f64 {
    let x = (seed * 12.9898 + seed * 78.233).sin() * 43758.5453;
    x - x.floor()
}
