use gp_core::Point2f;

/// Ramer-Douglas-Peucker polyline simplification.
///
/// Recursively drops points whose perpendicular distance to the chord of
/// the current span is within `tolerance`, collapsing near-collinear runs
/// into straight segments.
pub fn simplify_path(path: &[Point2f], tolerance: f32) -> Vec<Point2f> {
    if path.len() <= 2 {
        return path.to_vec();
    }

    let mut out = Vec::with_capacity(path.len());
    out.push(path[0]);
    simplify_span(path, 0, path.len() - 1, tolerance, &mut out);
    out
}

/// Appends the simplified interior and endpoint of `path[first..=last]`,
/// assuming `path[first]` is already emitted.
fn simplify_span(path: &[Point2f], first: usize, last: usize, tolerance: f32, out: &mut Vec<Point2f>) {
    let mut max_dist = 0.0f32;
    let mut max_idx = first;

    for i in (first + 1)..last {
        let d = perpendicular_distance(path[i], path[first], path[last]);
        if d > max_dist {
            max_dist = d;
            max_idx = i;
        }
    }

    if max_dist > tolerance {
        simplify_span(path, first, max_idx, tolerance, out);
        simplify_span(path, max_idx, last, tolerance, out);
    } else {
        out.push(path[last]);
    }
}

fn perpendicular_distance(p: Point2f, a: Point2f, b: Point2f) -> f32 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let length = (dx * dx + dy * dy).sqrt();

    if length == 0.0 {
        return p.distance(a);
    }

    (dy * p.x - dx * p.y + b.x * a.y - b.y * a.x).abs() / length
}

#[cfg(test)]
mod tests {
    use gp_core::Point2f;

    use super::{perpendicular_distance, simplify_path};

    fn p(x: f32, y: f32) -> Point2f {
        Point2f { x, y }
    }

    #[test]
    fn collinear_run_collapses_to_endpoints() {
        let path: Vec<Point2f> = (0..50).map(|i| p(i as f32, i as f32)).collect();
        let simplified = simplify_path(&path, 2.0);

        assert_eq!(simplified, vec![p(0.0, 0.0), p(49.0, 49.0)]);
    }

    #[test]
    fn corner_survives_simplification() {
        let mut path: Vec<Point2f> = (0..20).map(|i| p(i as f32, 0.0)).collect();
        path.extend((1..20).map(|i| p(19.0, i as f32)));

        let simplified = simplify_path(&path, 2.0);
        assert_eq!(simplified, vec![p(0.0, 0.0), p(19.0, 0.0), p(19.0, 19.0)]);
    }

    #[test]
    fn small_wiggles_within_tolerance_vanish() {
        let path = vec![p(0.0, 0.0), p(5.0, 1.0), p(10.0, -1.0), p(15.0, 0.5), p(20.0, 0.0)];
        let simplified = simplify_path(&path, 2.0);
        assert_eq!(simplified, vec![p(0.0, 0.0), p(20.0, 0.0)]);
    }

    #[test]
    fn short_paths_pass_through() {
        let path = vec![p(0.0, 0.0), p(3.0, 4.0)];
        assert_eq!(simplify_path(&path, 2.0), path);
        assert!(simplify_path(&[], 2.0).is_empty());
    }

    #[test]
    fn degenerate_chord_falls_back_to_point_distance() {
        let a = p(1.0, 1.0);
        assert!((perpendicular_distance(p(4.0, 5.0), a, a) - 5.0).abs() < 1e-6);
    }
}
