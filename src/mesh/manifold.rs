use crate::float_types::Real;
use crate::mesh::Mesh;
use hashbrown::HashMap;
use nalgebra::Point3;
use std::fmt::Debug;

impl<S: Clone + Debug + Send + Sync> Mesh<S> {
    /// Checks if the Mesh object is manifold
    ///
    /// ### Returns
    /// Returns `true` if every edge is shared by exactly two polygons which
    /// traverse it in opposite directions.
    ///
    /// ### Notes:
    /// - Runs after the fact; the boolean operations never call it.
    /// - T-junctions left behind by repeated booleans make a mesh fail this check
    ///   even when it is visually closed.
    /// - Uses a `QUANTIZATION_FACTOR` for `Real` coordinates
    pub fn is_manifold(&self) -> bool {
        const QUANTIZATION_FACTOR: Real = 1e7;

        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        struct QuantizedPoint(i64, i64, i64);

        fn quantize_point(p: &Point3<Real>) -> QuantizedPoint {
            QuantizedPoint(
                (p.x * QUANTIZATION_FACTOR).round() as i64,
                (p.y * QUANTIZATION_FACTOR).round() as i64,
                (p.z * QUANTIZATION_FACTOR).round() as i64,
            )
        }

        if self.polygons.is_empty() {
            return false;
        }

        // (forward, backward) traversal counts per undirected edge
        let mut edge_counts: HashMap<(QuantizedPoint, QuantizedPoint), (u32, u32)> =
            HashMap::new();

        for poly in &self.polygons {
            for (start, end) in poly.edges() {
                let p0 = quantize_point(&start.pos);
                let p1 = quantize_point(&end.pos);
                if p0 == p1 {
                    continue;
                }

                // Order them so (p0, p1) and (p1, p0) become the same key
                let entry = if p0 < p1 {
                    &mut edge_counts.entry((p0, p1)).or_insert((0, 0)).0
                } else {
                    &mut edge_counts.entry((p1, p0)).or_insert((0, 0)).1
                };
                *entry += 1;
            }
        }

        edge_counts
            .values()
            .all(|&(forward, backward)| forward == 1 && backward == 1)
    }
}
