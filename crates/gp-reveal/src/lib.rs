//! Cursor-reactive reveal shading.
//!
//! Opacity is a pure per-frame function of the pointer and an element's
//! center: `max(0, 1 - dist / radius)` while the pointer is active, exactly
//! zero otherwise. Recomputation is O(elements) and never touches mesh
//! topology; any smoothing/interpolation is the rendering layer's business.

use gp_core::{LineSegment, Mesh, MeshPoint, Triangle};

/// Live pointer position relative to the mesh container.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerState {
    pub x: f32,
    pub y: f32,
    /// Whether the pointer is currently over the interactive surface.
    pub active: bool,
}

impl PointerState {
    pub fn at(x: f32, y: f32) -> Self {
        Self { x, y, active: true }
    }

    pub fn inactive() -> Self {
        Self::default()
    }
}

/// Opacity of an element centered at `(cx, cy)`.
pub fn reveal_opacity(pointer: &PointerState, cx: f32, cy: f32, radius: f32) -> f32 {
    if !pointer.active || radius <= 0.0 {
        return 0.0;
    }

    let dx = pointer.x - cx;
    let dy = pointer.y - cy;
    let dist = (dx * dx + dy * dy).sqrt();
    (1.0 - dist / radius).max(0.0)
}

pub fn triangle_opacity(pointer: &PointerState, triangle: &Triangle, radius: f32) -> f32 {
    let (cx, cy) = triangle.centroid();
    reveal_opacity(pointer, cx, cy, radius)
}

pub fn point_opacity(pointer: &PointerState, point: &MeshPoint, radius: f32) -> f32 {
    reveal_opacity(pointer, point.x, point.y, radius)
}

pub fn segment_opacity(pointer: &PointerState, segment: &LineSegment, radius: f32) -> f32 {
    let (cx, cy) = segment.midpoint();
    reveal_opacity(pointer, cx, cy, radius)
}

/// Per-element opacities for a whole mesh, in the mesh's element order:
/// points, then triangles, then lines.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RevealFrame {
    pub points: Vec<f32>,
    pub triangles: Vec<f32>,
    pub lines: Vec<f32>,
}

pub fn reveal_frame(pointer: &PointerState, mesh: &Mesh, radius: f32) -> RevealFrame {
    RevealFrame {
        points: mesh
            .points
            .iter()
            .map(|p| point_opacity(pointer, p, radius))
            .collect(),
        triangles: mesh
            .triangles
            .iter()
            .map(|t| triangle_opacity(pointer, t, radius))
            .collect(),
        lines: mesh
            .lines
            .iter()
            .map(|s| segment_opacity(pointer, s, radius))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use gp_core::{LineSegment, Mesh, MeshPoint, Triangle};

    use super::{
        point_opacity, reveal_frame, reveal_opacity, segment_opacity, triangle_opacity,
        PointerState,
    };

    fn p(x: f32, y: f32, id: i32) -> MeshPoint {
        MeshPoint { x, y, id }
    }

    #[test]
    fn opacity_is_monotone_in_distance() {
        let pointer = PointerState::at(0.0, 0.0);
        let radius = 70.0;

        let mut prev = f32::INFINITY;
        for d in 0..=100 {
            let o = reveal_opacity(&pointer, d as f32, 0.0, radius);
            assert!(o <= prev, "opacity increased at distance {d}");
            assert!((0.0..=1.0).contains(&o));
            prev = o;
        }
    }

    #[test]
    fn opacity_is_zero_at_and_beyond_radius() {
        let pointer = PointerState::at(10.0, 10.0);
        assert_eq!(reveal_opacity(&pointer, 10.0 + 70.0, 10.0, 70.0), 0.0);
        assert_eq!(reveal_opacity(&pointer, 10.0 + 200.0, 10.0, 70.0), 0.0);
        assert_eq!(reveal_opacity(&pointer, 10.0, 10.0, 70.0), 1.0);
    }

    #[test]
    fn inactive_pointer_means_zero_everywhere() {
        let pointer = PointerState::inactive();
        assert_eq!(reveal_opacity(&pointer, 0.0, 0.0, 70.0), 0.0);

        let t = Triangle {
            a: p(0.0, 0.0, 0),
            b: p(1.0, 0.0, 1),
            c: p(0.0, 1.0, 2),
        };
        assert_eq!(triangle_opacity(&pointer, &t, 70.0), 0.0);
    }

    #[test]
    fn element_centers_drive_opacity() {
        let pointer = PointerState::at(2.0, 2.0);

        let t = Triangle {
            a: p(0.0, 0.0, 0),
            b: p(6.0, 0.0, 1),
            c: p(0.0, 6.0, 2),
        };
        // Centroid (2, 2) sits under the pointer.
        assert_eq!(triangle_opacity(&pointer, &t, 10.0), 1.0);

        let s = LineSegment {
            a: p(0.0, 2.0, 3),
            b: p(4.0, 2.0, 4),
        };
        assert_eq!(segment_opacity(&pointer, &s, 10.0), 1.0);

        let far = p(2.0, 7.0, 5);
        assert!((point_opacity(&pointer, &far, 10.0) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn frame_covers_all_elements() {
        let mesh = Mesh {
            points: vec![p(0.0, 0.0, 0), p(5.0, 0.0, 1)],
            triangles: vec![Triangle {
                a: p(0.0, 0.0, 0),
                b: p(5.0, 0.0, 1),
                c: p(0.0, 5.0, 2),
            }],
            lines: vec![],
        };

        let frame = reveal_frame(&PointerState::at(0.0, 0.0), &mesh, 50.0);
        assert_eq!(frame.points.len(), 2);
        assert_eq!(frame.triangles.len(), 1);
        assert!(frame.lines.is_empty());
        assert!(frame.points[0] > frame.points[1]);
    }
}
