use std::collections::BTreeMap;

use gp_core::{MeshPoint, Triangle};

/// Circumcircle determinants below this are treated as degenerate and the
/// triangle is skipped during containment tests.
const DEGENERACY_EPS: f64 = 1e-10;

/// Bowyer-Watson Delaunay triangulation over the given canvas.
///
/// Point ids must be unique and non-negative; ids -1, -2, -3 are claimed for
/// the synthetic bounding triangle and are filtered from the output. Points
/// that fall inside no circumcircle (duplicates of an inserted vertex,
/// degenerate configurations) are silently dropped. Fewer than three usable
/// points yields an empty list, not an error.
///
/// Runs in O(n * t) with t the current triangle count; there is no spatial
/// index, so this is only suitable for the few hundred points the sampler
/// emits.
pub fn triangulate(points: &[MeshPoint], width: f32, height: f32) -> Vec<Triangle> {
    if points.len() < 3 {
        return Vec::new();
    }

    let margin = 3.0 * width.max(height);
    let super_a = MeshPoint {
        x: -margin,
        y: -margin,
        id: -1,
    };
    let super_b = MeshPoint {
        x: width + margin,
        y: -margin,
        id: -2,
    };
    let super_c = MeshPoint {
        x: width / 2.0,
        y: height + margin,
        id: -3,
    };

    let mut triangles = vec![Triangle {
        a: super_a,
        b: super_b,
        c: super_c,
    }];

    for &p in points {
        let bad: Vec<usize> = triangles
            .iter()
            .enumerate()
            .filter(|(_, t)| circumcircle_contains(t, p))
            .map(|(i, _)| i)
            .collect();

        if bad.is_empty() {
            // Coincides with an inserted vertex or is otherwise degenerate.
            continue;
        }

        // Boundary of the cavity: edges belonging to exactly one bad triangle.
        // BTreeMap so the cavity boundary is walked in a deterministic order;
        // a fixed seed must reproduce the same triangle list across runs.
        let mut edge_count: BTreeMap<(i32, i32), (MeshPoint, MeshPoint)> = BTreeMap::new();
        let mut shared: BTreeMap<(i32, i32), usize> = BTreeMap::new();
        for &i in &bad {
            let t = &triangles[i];
            for (u, v) in [(t.a, t.b), (t.b, t.c), (t.c, t.a)] {
                let key = edge_key(u.id, v.id);
                *shared.entry(key).or_insert(0) += 1;
                edge_count.entry(key).or_insert((u, v));
            }
        }

        let mut keep_flag = vec![true; triangles.len()];
        for &i in &bad {
            keep_flag[i] = false;
        }
        let mut kept = Vec::with_capacity(triangles.len());
        for (i, t) in triangles.drain(..).enumerate() {
            if keep_flag[i] {
                kept.push(t);
            }
        }
        triangles = kept;

        for (key, (u, v)) in edge_count {
            if shared[&key] == 1 {
                triangles.push(Triangle { a: u, b: v, c: p });
            }
        }
    }

    triangles
        .into_iter()
        .filter(|t| !t.has_synthetic_vertex())
        .collect()
}

fn edge_key(a: i32, b: i32) -> (i32, i32) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Circumcenter via the standard determinant formula, evaluated in f64 so
/// the super-triangle's large coordinates keep enough precision.
fn circumcircle_contains(t: &Triangle, p: MeshPoint) -> bool {
    let ax = t.a.x as f64;
    let ay = t.a.y as f64;
    let bx = t.b.x as f64;
    let by = t.b.y as f64;
    let cx = t.c.x as f64;
    let cy = t.c.y as f64;

    let d = 2.0 * (ax * (by - cy) + bx * (cy - ay) + cx * (ay - by));
    if d.abs() < DEGENERACY_EPS {
        return false;
    }

    let a2 = ax * ax + ay * ay;
    let b2 = bx * bx + by * by;
    let c2 = cx * cx + cy * cy;

    let ux = (a2 * (by - cy) + b2 * (cy - ay) + c2 * (ay - by)) / d;
    let uy = (a2 * (cx - bx) + b2 * (ax - cx) + c2 * (bx - ax)) / d;

    let r2 = (ax - ux) * (ax - ux) + (ay - uy) * (ay - uy);

    let dx = p.x as f64 - ux;
    let dy = p.y as f64 - uy;
    // Strictly inside, with a relative guard so a duplicate of vertex b or c
    // (exactly on the circle up to rounding) never opens a cavity.
    dx * dx + dy * dy < r2 * (1.0 - 1e-12)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use gp_core::MeshPoint;

    use super::triangulate;

    fn grid_points(n: usize, extent: f32) -> Vec<MeshPoint> {
        let mut points = Vec::new();
        let mut id = 0;
        for row in 0..n {
            for col in 0..n {
                points.push(MeshPoint {
                    x: col as f32 / (n - 1) as f32 * extent,
                    y: row as f32 / (n - 1) as f32 * extent,
                    id,
                });
                id += 1;
            }
        }
        points
    }

    fn triangle_area(t: &gp_core::Triangle) -> f32 {
        0.5 * ((t.b.x - t.a.x) * (t.c.y - t.a.y) - (t.c.x - t.a.x) * (t.b.y - t.a.y)).abs()
    }

    #[test]
    fn grid_triangulation_partitions_the_square() {
        let points = grid_points(5, 100.0);
        let triangles = triangulate(&points, 100.0, 100.0);

        assert!(!triangles.is_empty());

        let area: f32 = triangles.iter().map(triangle_area).sum();
        assert!(
            (area - 100.0 * 100.0).abs() < 1.0,
            "hull not covered: area = {area}"
        );
    }

    #[test]
    fn no_synthetic_vertices_and_no_duplicates() {
        let points = grid_points(6, 120.0);
        let ids: HashSet<i32> = points.iter().map(|p| p.id).collect();
        let triangles = triangulate(&points, 120.0, 120.0);

        let mut seen = HashSet::new();
        for t in &triangles {
            assert!(!t.has_synthetic_vertex());
            for id in t.id_key() {
                assert!(ids.contains(&id), "unknown id {id}");
            }
            assert!(seen.insert(t.id_key()), "duplicate triangle {:?}", t.id_key());
        }
    }

    #[test]
    fn fewer_than_three_points_is_empty() {
        let p = MeshPoint {
            x: 1.0,
            y: 1.0,
            id: 0,
        };
        assert!(triangulate(&[], 10.0, 10.0).is_empty());
        assert!(triangulate(&[p], 10.0, 10.0).is_empty());
        assert!(
            triangulate(
                &[
                    p,
                    MeshPoint {
                        x: 5.0,
                        y: 5.0,
                        id: 1
                    }
                ],
                10.0,
                10.0
            )
            .is_empty()
        );
    }

    #[test]
    fn collinear_points_yield_no_triangles() {
        let points: Vec<MeshPoint> = (0..5)
            .map(|i| MeshPoint {
                x: i as f32 * 10.0,
                y: 50.0,
                id: i,
            })
            .collect();

        assert!(triangulate(&points, 100.0, 100.0).is_empty());
    }

    #[test]
    fn duplicate_points_are_dropped_silently() {
        let mut points = vec![
            MeshPoint {
                x: 0.0,
                y: 0.0,
                id: 0,
            },
            MeshPoint {
                x: 80.0,
                y: 0.0,
                id: 1,
            },
            MeshPoint {
                x: 40.0,
                y: 60.0,
                id: 2,
            },
        ];
        // Exact duplicate of the first vertex under a fresh id.
        points.push(MeshPoint {
            x: 0.0,
            y: 0.0,
            id: 3,
        });

        let triangles = triangulate(&points, 100.0, 100.0);
        assert_eq!(triangles.len(), 1);
        assert_eq!(triangles[0].id_key(), [0, 1, 2]);
    }
}
