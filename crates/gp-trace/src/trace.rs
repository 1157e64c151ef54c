use std::collections::{HashMap, HashSet};

use gp_core::{Image, LineSegment, MeshPoint, Point2f};

use crate::rdp::simplify_path;

// 8-connected neighborhood, clockwise from east. Walks prefer the direction
// closest to the previous step, so order only breaks ties.
const DX: [isize; 8] = [1, 1, 0, -1, -1, -1, 0, 1];
const DY: [isize; 8] = [0, 1, 1, 1, 0, -1, -1, -1];

/// RDP tolerance in source-image pixels.
const SIMPLIFY_TOLERANCE: f32 = 2.0;

#[derive(Debug, Clone, PartialEq)]
pub struct TraceConfig {
    /// A pixel is part of a stroke when its luminance is below this.
    pub threshold: u8,
    /// Segments shorter than this (source-image pixels) are discarded.
    pub min_segment_length: f32,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            threshold: 180,
            min_segment_length: 6.0,
        }
    }
}

/// Traces thresholded strokes into simplified line segments scaled to the
/// target canvas.
///
/// Scans the interior row-major; each unvisited stroke pixel grows a chain
/// by stepping to the unvisited on-neighbor with the highest dot-product
/// similarity to the previous step, capped at `2 * max(width, height)`
/// steps. Chains are simplified with RDP and emitted pairwise; endpoints
/// landing on the same rounded target coordinate share one id, so segments
/// meeting at a junction reference a single point. A pixel contributes to
/// at most one chain.
pub fn trace_line_segments(
    gray: &Image<u8>,
    target_width: f32,
    target_height: f32,
    cfg: &TraceConfig,
) -> Vec<LineSegment> {
    let w = gray.width();
    let h = gray.height();
    if w < 3 || h < 3 {
        return Vec::new();
    }

    let mut visited = vec![false; w * h];
    let mut lines = Vec::new();

    let scale_x = target_width / w as f32;
    let scale_y = target_height / h as f32;
    let max_steps = 2 * w.max(h);

    let mut ids: HashMap<(i64, i64), i32> = HashMap::new();

    for y in 1..(h - 1) {
        for x in 1..(w - 1) {
            if visited[y * w + x] || !is_on(gray, x as isize, y as isize, cfg.threshold) {
                continue;
            }

            for dir in 0..8 {
                let nx = x as isize + DX[dir];
                let ny = y as isize + DY[dir];
                if !is_on(gray, nx, ny, cfg.threshold) {
                    continue;
                }
                if visited[ny as usize * w + nx as usize] {
                    continue;
                }

                let path = walk_chain(gray, &mut visited, (x, y), (nx, ny), dir, max_steps, cfg);
                emit_segments(
                    &path,
                    cfg.min_segment_length,
                    scale_x,
                    scale_y,
                    &mut ids,
                    &mut lines,
                );
            }

            visited[y * w + x] = true;
        }
    }

    lines
}

fn walk_chain(
    gray: &Image<u8>,
    visited: &mut [bool],
    start: (usize, usize),
    first: (isize, isize),
    first_dir: usize,
    max_steps: usize,
    cfg: &TraceConfig,
) -> Vec<Point2f> {
    let w = gray.width();

    let mut path = vec![Point2f {
        x: start.0 as f32,
        y: start.1 as f32,
    }];

    let mut cur = first;
    let mut last_dx = DX[first_dir];
    let mut last_dy = DY[first_dir];

    for _ in 0..max_steps {
        let idx = cur.1 as usize * w + cur.0 as usize;
        if visited[idx] {
            break;
        }

        visited[idx] = true;
        path.push(Point2f {
            x: cur.0 as f32,
            y: cur.1 as f32,
        });

        let mut best: Option<(usize, isize, isize)> = None;
        // A full reversal of the previous step (dot = -2) ends the chain
        // rather than doubling back over it.
        let mut best_score: isize = -2;
        for dir in 0..8 {
            let nx = cur.0 + DX[dir];
            let ny = cur.1 + DY[dir];
            if !is_on(gray, nx, ny, cfg.threshold) {
                continue;
            }
            if visited[ny as usize * w + nx as usize] {
                continue;
            }

            // Directional continuity: straight-on beats sideways beats back.
            let score = DX[dir] * last_dx + DY[dir] * last_dy;
            if score > best_score {
                best_score = score;
                best = Some((dir, nx, ny));
            }
        }

        let Some((dir, nx, ny)) = best else {
            break;
        };

        cur = (nx, ny);
        last_dx = DX[dir];
        last_dy = DY[dir];
    }

    path
}

fn emit_segments(
    path: &[Point2f],
    min_length: f32,
    scale_x: f32,
    scale_y: f32,
    ids: &mut HashMap<(i64, i64), i32>,
    lines: &mut Vec<LineSegment>,
) {
    if path.len() < 2 {
        return;
    }

    let simplified = simplify_path(path, SIMPLIFY_TOLERANCE);

    for pair in simplified.windows(2) {
        let (p1, p2) = (pair[0], pair[1]);
        if p1.distance(p2) < min_length {
            continue;
        }

        let a = endpoint(p1, scale_x, scale_y, ids);
        let b = endpoint(p2, scale_x, scale_y, ids);
        lines.push(LineSegment { a, b });
    }
}

/// Scales a path vertex into target space and resolves its id. Endpoints
/// sharing a rounded target coordinate get the same id, keeping segment
/// references consistent with the deduplicated point list.
fn endpoint(
    p: Point2f,
    scale_x: f32,
    scale_y: f32,
    ids: &mut HashMap<(i64, i64), i32>,
) -> MeshPoint {
    let x = p.x * scale_x;
    let y = p.y * scale_y;
    let key = (x.round() as i64, y.round() as i64);
    let next = ids.len() as i32;
    let id = *ids.entry(key).or_insert(next);
    MeshPoint { x, y, id }
}

fn is_on(gray: &Image<u8>, x: isize, y: isize, threshold: u8) -> bool {
    if x < 0 || y < 0 {
        return false;
    }
    match gray.get(x as usize, y as usize) {
        Some(&v) => v < threshold,
        None => false,
    }
}

/// Collects the distinct endpoints of the traced segments, deduplicated by
/// rounded coordinate, in first-seen order.
pub fn collect_points(lines: &[LineSegment]) -> Vec<MeshPoint> {
    let mut seen: HashSet<(i64, i64)> = HashSet::new();
    let mut points = Vec::new();

    for line in lines {
        for p in [line.a, line.b] {
            let key = (p.x.round() as i64, p.y.round() as i64);
            if seen.insert(key) {
                points.push(p);
            }
        }
    }

    points
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use gp_core::Image;

    use super::{collect_points, trace_line_segments, TraceConfig};

    fn blank(w: usize, h: usize) -> Vec<u8> {
        vec![255u8; w * h]
    }

    fn img(w: usize, h: usize, data: Vec<u8>) -> Image<u8> {
        Image::from_vec(w, h, data).expect("valid image")
    }

    #[test]
    fn single_diagonal_stroke_is_one_segment() {
        let (w, h) = (140, 140);
        let mut data = blank(w, h);
        for i in 10..=110 {
            data[i * w + i] = 0;
        }
        let gray = img(w, h, data);

        let cfg = TraceConfig {
            threshold: 180,
            min_segment_length: 5.0,
        };
        let lines = trace_line_segments(&gray, w as f32, h as f32, &cfg);

        assert_eq!(lines.len(), 1);
        let seg = &lines[0];
        let (lo, hi) = if seg.a.x < seg.b.x {
            (seg.a, seg.b)
        } else {
            (seg.b, seg.a)
        };
        assert!((lo.x - 10.0).abs() <= 3.0 && (lo.y - 10.0).abs() <= 3.0);
        assert!((hi.x - 110.0).abs() <= 3.0 && (hi.y - 110.0).abs() <= 3.0);
    }

    #[test]
    fn two_pixel_wide_stroke_endpoints_match_extremes() {
        let (w, h) = (140, 140);
        let mut data = blank(w, h);
        for i in 10..=110 {
            data[i * w + i] = 0;
            data[i * w + i + 1] = 0;
        }
        let gray = img(w, h, data);

        let cfg = TraceConfig {
            threshold: 180,
            min_segment_length: 5.0,
        };
        let lines = trace_line_segments(&gray, w as f32, h as f32, &cfg);

        assert!(!lines.is_empty() && lines.len() <= 2);
        for seg in &lines {
            for p in [seg.a, seg.b] {
                let near_start = (p.x - 10.0).abs() <= 4.0 && (p.y - 10.0).abs() <= 4.0;
                let near_end = (p.x - 110.0).abs() <= 4.0 && (p.y - 110.0).abs() <= 4.0;
                assert!(near_start || near_end, "stray endpoint {p:?}");
            }
        }
    }

    #[test]
    fn l_shape_produces_two_segments() {
        let (w, h) = (100, 100);
        let mut data = blank(w, h);
        for x in 10..=70 {
            data[20 * w + x] = 0;
        }
        for y in 20..=80 {
            data[y * w + 70] = 0;
        }
        let gray = img(w, h, data);

        let lines = trace_line_segments(&gray, w as f32, h as f32, &TraceConfig::default());
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn short_specks_are_dropped() {
        let (w, h) = (60, 60);
        let mut data = blank(w, h);
        data[30 * w + 30] = 0;
        data[30 * w + 31] = 0;
        data[30 * w + 32] = 0;
        let gray = img(w, h, data);

        let cfg = TraceConfig {
            threshold: 180,
            min_segment_length: 10.0,
        };
        assert!(trace_line_segments(&gray, 60.0, 60.0, &cfg).is_empty());
    }

    #[test]
    fn tracing_is_pure_across_calls() {
        let (w, h) = (120, 120);
        let mut data = blank(w, h);
        for i in 15..=100 {
            data[i * w + 40] = 0;
            data[60 * w + i] = 0;
        }
        let gray = img(w, h, data);

        let cfg = TraceConfig::default();
        let a = trace_line_segments(&gray, 120.0, 120.0, &cfg);
        let b = trace_line_segments(&gray, 120.0, 120.0, &cfg);
        assert_eq!(a, b);
        assert!(!a.is_empty());
    }

    #[test]
    fn segments_scale_into_target_space() {
        let (w, h) = (100, 100);
        let mut data = blank(w, h);
        for x in 10..=90 {
            data[50 * w + x] = 0;
        }
        let gray = img(w, h, data);

        let lines = trace_line_segments(&gray, 50.0, 50.0, &TraceConfig::default());
        assert_eq!(lines.len(), 1);
        for p in [lines[0].a, lines[0].b] {
            assert!(p.x <= 50.0 && p.y <= 50.0);
            assert!((p.y - 25.0).abs() <= 2.0);
        }
    }

    #[test]
    fn collect_points_dedupes_shared_endpoints() {
        let (w, h) = (100, 100);
        let mut data = blank(w, h);
        for x in 10..=70 {
            data[20 * w + x] = 0;
        }
        for y in 20..=80 {
            data[y * w + 70] = 0;
        }
        let gray = img(w, h, data);

        let lines = trace_line_segments(&gray, w as f32, h as f32, &TraceConfig::default());
        let points = collect_points(&lines);

        // Two segments share the corner, so three distinct points remain.
        assert_eq!(points.len(), 3);

        // Every segment endpoint id resolves to a collected point.
        let ids: HashSet<i32> = points.iter().map(|p| p.id).collect();
        for seg in &lines {
            for p in [seg.a, seg.b] {
                assert!(ids.contains(&p.id), "segment references missing id {}", p.id);
            }
        }
    }

    #[test]
    fn junction_endpoints_share_one_id() {
        let (w, h) = (100, 100);
        let mut data = blank(w, h);
        for x in 10..=70 {
            data[20 * w + x] = 0;
        }
        for y in 20..=80 {
            data[y * w + 70] = 0;
        }
        let gray = img(w, h, data);

        let lines = trace_line_segments(&gray, w as f32, h as f32, &TraceConfig::default());
        assert_eq!(lines.len(), 2);

        // The corner appears in both segments under a single id.
        let mut corner_ids = Vec::new();
        for seg in &lines {
            for p in [seg.a, seg.b] {
                if (p.x - 70.0).abs() <= 3.0 && (p.y - 20.0).abs() <= 3.0 {
                    corner_ids.push(p.id);
                }
            }
        }
        assert_eq!(corner_ids.len(), 2);
        assert_eq!(corner_ids[0], corner_ids[1]);
    }

    #[test]
    fn chain_never_doubles_back_on_itself() {
        // Two diagonal pixels: the only candidate after the first step is a
        // full reversal onto the start, which must end the chain instead of
        // retracing it (a retraced chain collapses under simplification and
        // the stroke is lost).
        let (w, h) = (60, 60);
        let mut data = blank(w, h);
        data[10 * w + 10] = 0;
        data[11 * w + 11] = 0;
        let gray = img(w, h, data);

        let cfg = TraceConfig {
            threshold: 180,
            min_segment_length: 1.0,
        };
        let lines = trace_line_segments(&gray, 60.0, 60.0, &cfg);

        assert_eq!(lines.len(), 1);
        let seg = &lines[0];
        let (lo, hi) = if seg.a.x < seg.b.x {
            (seg.a, seg.b)
        } else {
            (seg.b, seg.a)
        };
        assert!((lo.x - 10.0).abs() <= 1.0 && (lo.y - 10.0).abs() <= 1.0);
        assert!((hi.x - 11.0).abs() <= 1.0 && (hi.y - 11.0).abs() <= 1.0);
    }
}
