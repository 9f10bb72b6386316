//! Serial implementation of BSP operations

use crate::float_types::{Real, tolerance};
use crate::mesh::bsp::node::Node;
use crate::mesh::bsp::traits::{BalancedSplittingStrategy, BspOps, SplittingPlaneStrategy};
use crate::mesh::plane::{BACK, COPLANAR, FRONT, Plane, SPANNING};
use crate::mesh::polygon::Polygon;
use crate::mesh::vertex::Vertex;
use std::fmt::Debug;
use tracing::trace;

/// Serial implementation of BSP operations
#[derive(Debug, Clone)]
pub struct SerialBspOps<SP: SplittingPlaneStrategy = BalancedSplittingStrategy> {
    splitting_strategy: SP,
    epsilon: Real,
}

impl SerialBspOps<BalancedSplittingStrategy> {
    /// Balanced splitting with the crate-wide [`tolerance`].
    pub fn new() -> Self {
        Self {
            splitting_strategy: BalancedSplittingStrategy::default(),
            epsilon: tolerance(),
        }
    }
}

impl Default for SerialBspOps<BalancedSplittingStrategy> {
    fn default() -> Self {
        Self::new()
    }
}

impl<SP: SplittingPlaneStrategy> SerialBspOps<SP> {
    pub fn with_strategy(strategy: SP) -> Self {
        Self {
            splitting_strategy: strategy,
            epsilon: tolerance(),
        }
    }

    /// Override the classification tolerance for operations run through `self`.
    pub const fn with_tolerance(mut self, epsilon: Real) -> Self {
        self.epsilon = epsilon;
        self
    }
}

impl<SP: SplittingPlaneStrategy, S: Clone + Send + Sync + Debug> BspOps<S> for SerialBspOps<SP> {
    fn epsilon(&self) -> Real {
        self.epsilon
    }

    fn invert(&self, mut node: Node<S>) -> Node<S> {
        // Use iterative approach with a stack
        let mut stack = vec![&mut node];

        while let Some(current) = stack.pop() {
            // Flip all polygons and plane in this node
            current.polygons.iter_mut().for_each(|p| p.flip());
            if let Some(ref mut plane) = current.plane {
                plane.flip();
            }

            // Swap front and back
            std::mem::swap(&mut current.front, &mut current.back);

            let Node { front, back, .. } = current;
            stack.extend(front.as_deref_mut());
            stack.extend(back.as_deref_mut());
        }
        node
    }

    fn clip_polygons(&self, node: &Node<S>, polygons: Vec<Polygon<S>>) -> Vec<Polygon<S>> {
        let mut result = Vec::with_capacity(polygons.len());
        let mut stack = vec![(node, polygons)];

        while let Some((current, polygons)) = stack.pop() {
            // If this node has no plane, everything passes
            let Some(plane) = current.plane.as_ref() else {
                result.extend(polygons);
                continue;
            };

            let mut front_polys = Vec::with_capacity(polygons.len());
            let mut back_polys = Vec::with_capacity(polygons.len());

            for polygon in &polygons {
                let (coplanar_front, coplanar_back, front_parts, back_parts) =
                    plane.split_polygon_with(polygon, self.epsilon);

                front_polys.extend(coplanar_front);
                front_polys.extend(front_parts);
                back_polys.extend(coplanar_back);
                back_polys.extend(back_parts);
            }

            match current.back.as_deref() {
                Some(back) => stack.push((back, back_polys)),
                // solid space: whatever reaches here is inside
                None if !back_polys.is_empty() => {
                    trace!(count = back_polys.len(), "clipped polygons inside solid")
                },
                None => {},
            }
            match current.front.as_deref() {
                Some(front) => stack.push((front, front_polys)),
                None => result.extend(front_polys),
            }
        }
        result
    }

    fn clip_to(&self, mut node: Node<S>, other: &Node<S>) -> Node<S> {
        let mut stack = vec![&mut node];

        while let Some(current) = stack.pop() {
            let polygons = std::mem::take(&mut current.polygons);
            current.polygons = self.clip_polygons(other, polygons);

            let Node { front, back, .. } = current;
            stack.extend(front.as_deref_mut());
            stack.extend(back.as_deref_mut());
        }
        node
    }

    fn all_polygons(&self, node: &Node<S>) -> Vec<Polygon<S>> {
        let mut result = Vec::new();
        let mut stack = vec![node];

        while let Some(current) = stack.pop() {
            result.extend_from_slice(&current.polygons);

            // back first so the front subtree is visited first
            stack.extend(current.back.as_deref());
            stack.extend(current.front.as_deref());
        }
        result
    }

    fn build(&self, mut node: Node<S>, polygons: Vec<Polygon<S>>) -> Node<S> {
        let mut stack = vec![(&mut node, polygons)];

        while let Some((current, polygons)) = stack.pop() {
            let polygons: Vec<_> = polygons
                .into_iter()
                .filter(|p| {
                    let keep = !p.is_degenerate();
                    if !keep {
                        trace!(vertices = p.vertices.len(), "dropping degenerate polygon");
                    }
                    keep
                })
                .collect();
            if polygons.is_empty() {
                continue;
            }

            // Choose the best splitting plane if not already set
            let fresh_plane = current.plane.is_none();
            if fresh_plane {
                current.plane = self
                    .splitting_strategy
                    .pick_best_splitting_plane(&polygons, self.epsilon);
            }
            let Some(plane) = current.plane.clone() else {
                continue;
            };

            // The polygons the plane was taken from stay here even when they are
            // not quite planar, otherwise they would be handed down forever.
            let polygons = if fresh_plane {
                let (source, rest): (Vec<_>, Vec<_>) =
                    polygons.into_iter().partition(|p| p.plane == plane);
                current.polygons.extend(source);
                rest
            } else {
                polygons
            };

            let mut front = Vec::with_capacity(polygons.len() / 2);
            let mut back = Vec::with_capacity(polygons.len() / 2);

            for polygon in &polygons {
                let (coplanar_front, coplanar_back, front_parts, back_parts) =
                    plane.split_polygon_with(polygon, self.epsilon);

                current.polygons.extend(coplanar_front);
                current.polygons.extend(coplanar_back);
                front.extend(front_parts);
                back.extend(back_parts);
            }

            // a fresh plane that separates nothing would be picked again below
            if fresh_plane
                && current.polygons.is_empty()
                && (front.is_empty() || back.is_empty())
            {
                trace!(
                    count = front.len() + back.len(),
                    "splitting plane makes no progress, keeping polygons at node"
                );
                current.polygons.append(&mut front);
                current.polygons.append(&mut back);
            }

            // Build child nodes lazily
            let Node {
                front: front_child,
                back: back_child,
                ..
            } = current;
            if !front.is_empty() {
                let child = front_child.get_or_insert_with(|| Box::new(Node::new()));
                stack.push((&mut **child, front));
            }
            if !back.is_empty() {
                let child = back_child.get_or_insert_with(|| Box::new(Node::new()));
                stack.push((&mut **child, back));
            }
        }
        node
    }

    fn slice(&self, node: &Node<S>, slicing_plane: &Plane) -> (Vec<Polygon<S>>, Vec<[Vertex; 2]>) {
        let all_polys = self.all_polygons(node);

        let mut coplanar_polygons = Vec::new();
        let mut intersection_edges = Vec::new();

        for poly in all_polys {
            let vcount = poly.vertices.len();
            if vcount < 2 {
                continue; // degenerate polygon => skip
            }

            let types: Vec<_> = poly
                .vertices
                .iter()
                .map(|vertex| slicing_plane.orient_point_with(&vertex.pos, self.epsilon))
                .collect();

            let polygon_type = types.iter().fold(COPLANAR, |acc, &vertex_type| acc | vertex_type);

            match polygon_type {
                COPLANAR => coplanar_polygons.push(poly),
                FRONT | BACK => {
                    // Entirely on one side => no intersection
                },
                _ => {
                    // The polygon crosses the plane
                    let crossing_points: Vec<_> = (0..vcount)
                        .filter_map(|i| {
                            let j = (i + 1) % vcount;
                            if (types[i] | types[j]) != SPANNING {
                                return None;
                            }
                            slicing_plane
                                .intersect_edge(&poly.vertices[i], &poly.vertices[j])
                                .ok()
                        })
                        .collect();

                    intersection_edges.extend(
                        crossing_points
                            .chunks_exact(2)
                            .map(|chunk| [chunk[0], chunk[1]]),
                    );
                },
            }
        }

        (coplanar_polygons, intersection_edges)
    }
}
