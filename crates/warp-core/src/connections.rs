use crate::scene::LineVertex;
use glam::Vec3;

/// Two field particles closer than the connection threshold, by index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Connection {
    pub a: usize,
    pub b: usize,
}

/// Snapshot of the proximity graph at the last recompute.
///
/// Always built whole by [`ConnectionSet::rebuild`]; callers replace the old
/// set instead of editing it, so no segment outlives the positions it was
/// measured from.
#[derive(Clone, Debug, Default)]
pub struct ConnectionSet {
    pairs: Vec<Connection>,
    vertices: Vec<LineVertex>,
}

impl ConnectionSet {
    /// All-pairs scan. O(n²), fine for the couple hundred field particles this
    /// runs over.
    pub fn rebuild(positions: &[Vec3], threshold: f32) -> Self {
        let max_d2 = threshold * threshold;
        let mut pairs = Vec::new();
        let mut vertices = Vec::new();
        for (i, a) in positions.iter().enumerate() {
            for (j, b) in positions.iter().enumerate().skip(i + 1) {
                if a.distance_squared(*b) < max_d2 {
                    pairs.push(Connection { a: i, b: j });
                    vertices.push(LineVertex::new(*a));
                    vertices.push(LineVertex::new(*b));
                }
            }
        }
        Self { pairs, vertices }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn pairs(&self) -> &[Connection] {
        &self.pairs
    }

    /// Line-list vertices, two per connection, at recompute-time positions.
    pub fn vertices(&self) -> &[LineVertex] {
        &self.vertices
    }
}
