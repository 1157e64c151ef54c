use serde::{Deserialize, Serialize};

/// A mesh vertex with a build-local identity.
///
/// Ids are unique within one mesh build. Negative ids are reserved for the
/// triangulator's synthetic bounding vertices and never appear in a
/// finished [`Mesh`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeshPoint {
    pub x: f32,
    pub y: f32,
    pub id: i32,
}

/// Unordered vertex triple; consumers must not rely on winding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    pub a: MeshPoint,
    pub b: MeshPoint,
    pub c: MeshPoint,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineSegment {
    pub a: MeshPoint,
    pub b: MeshPoint,
}

impl Triangle {
    pub fn centroid(&self) -> (f32, f32) {
        (
            (self.a.x + self.b.x + self.c.x) / 3.0,
            (self.a.y + self.b.y + self.c.y) / 3.0,
        )
    }

    /// Vertex ids sorted ascending, for duplicate detection.
    pub fn id_key(&self) -> [i32; 3] {
        let mut ids = [self.a.id, self.b.id, self.c.id];
        ids.sort_unstable();
        ids
    }

    pub fn has_synthetic_vertex(&self) -> bool {
        self.a.id < 0 || self.b.id < 0 || self.c.id < 0
    }
}

impl LineSegment {
    pub fn midpoint(&self) -> (f32, f32) {
        ((self.a.x + self.b.x) / 2.0, (self.a.y + self.b.y) / 2.0)
    }

    pub fn length(&self) -> f32 {
        let dx = self.b.x - self.a.x;
        let dy = self.b.y - self.a.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Immutable mesh snapshot produced by one build pass.
///
/// Exactly one of `triangles` / `lines` is meaningfully populated depending
/// on the construction strategy; the other stays empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    pub points: Vec<MeshPoint>,
    pub triangles: Vec<Triangle>,
    pub lines: Vec<LineSegment>,
}

impl Mesh {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty() && self.triangles.is_empty() && self.lines.is_empty()
    }
}
