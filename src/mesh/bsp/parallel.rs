//! Parallel implementation of BSP operations
//!
//! Tree traversal stays sequential; the per-node work (splitting every polygon
//! that reaches a node against its plane) is spread over the rayon pool.

use rayon::prelude::*;

use crate::float_types::{Real, tolerance};
use crate::mesh::bsp::node::Node;
use crate::mesh::bsp::serial::SerialBspOps;
use crate::mesh::bsp::traits::{BalancedSplittingStrategy, BspOps, SplittingPlaneStrategy};
use crate::mesh::plane::Plane;
use crate::mesh::polygon::Polygon;
use crate::mesh::vertex::Vertex;
use std::fmt::Debug;
use tracing::trace;

type Buckets<S> = (
    Vec<Polygon<S>>,
    Vec<Polygon<S>>,
    Vec<Polygon<S>>,
    Vec<Polygon<S>>,
);

/// Parallel implementation of BSP operations
#[derive(Debug, Clone)]
pub struct ParallelBspOps<SP: SplittingPlaneStrategy = BalancedSplittingStrategy> {
    splitting_strategy: SP,
    epsilon: Real,
}

impl ParallelBspOps<BalancedSplittingStrategy> {
    /// Balanced splitting with the crate-wide [`tolerance`].
    pub fn new() -> Self {
        Self {
            splitting_strategy: BalancedSplittingStrategy::default(),
            epsilon: tolerance(),
        }
    }
}

impl Default for ParallelBspOps<BalancedSplittingStrategy> {
    fn default() -> Self {
        Self::new()
    }
}

impl<SP: SplittingPlaneStrategy> ParallelBspOps<SP> {
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

    /// Split each polygon in parallel; gather results
    fn split_all<S: Clone + Send + Sync>(
        &self,
        plane: &Plane,
        polygons: &[Polygon<S>],
    ) -> Buckets<S> {
        let epsilon = self.epsilon;
        polygons
            .par_iter()
            .map(|poly| plane.split_polygon_with(poly, epsilon))
            .reduce(
                || (Vec::new(), Vec::new(), Vec::new(), Vec::new()),
                |mut acc, x| {
                    acc.0.extend(x.0);
                    acc.1.extend(x.1);
                    acc.2.extend(x.2);
                    acc.3.extend(x.3);
                    acc
                },
            )
    }
}

impl<SP: SplittingPlaneStrategy + Sync, S: Clone + Send + Sync + Debug> BspOps<S>
    for ParallelBspOps<SP>
{
    fn epsilon(&self) -> Real {
        self.epsilon
    }

    fn invert(&self, mut node: Node<S>) -> Node<S> {
        // Use iterative approach with a stack to avoid stack overflow
        let mut stack = vec![&mut node];

        while let Some(current) = stack.pop() {
            current.polygons.par_iter_mut().for_each(|p| p.flip());
            if let Some(ref mut plane) = current.plane {
                plane.flip();
            }

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
            let Some(plane) = current.plane.as_ref() else {
                result.extend(polygons);
                continue;
            };

            let (coplanar_front, coplanar_back, mut front, mut back) =
                self.split_all(plane, &polygons);
            front.extend(coplanar_front);
            back.extend(coplanar_back);

            match current.back.as_deref() {
                Some(back_node) => stack.push((back_node, back)),
                None if !back.is_empty() => {
                    trace!(count = back.len(), "clipped polygons inside solid")
                },
                None => {},
            }
            match current.front.as_deref() {
                Some(front_node) => stack.push((front_node, front)),
                None => result.extend(front),
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
            stack.extend(current.back.as_deref());
            stack.extend(current.front.as_deref());
        }
        result
    }

    fn build(&self, mut node: Node<S>, polygons: Vec<Polygon<S>>) -> Node<S> {
        let mut stack = vec![(&mut node, polygons)];

        while let Some((current, polygons)) = stack.pop() {
            let (polygons, degenerate): (Vec<_>, Vec<_>) =
                polygons.into_par_iter().partition(|p| !p.is_degenerate());
            if !degenerate.is_empty() {
                trace!(count = degenerate.len(), "dropping degenerate polygons");
            }
            if polygons.is_empty() {
                continue;
            }

            let fresh_plane = current.plane.is_none();
            if fresh_plane {
                current.plane = self
                    .splitting_strategy
                    .pick_best_splitting_plane(&polygons, self.epsilon);
            }
            let Some(plane) = current.plane.clone() else {
                continue;
            };

            // source polygons of a fresh plane stay here even if slightly non-planar
            let polygons = if fresh_plane {
                let (source, rest): (Vec<_>, Vec<_>) =
                    polygons.into_par_iter().partition(|p| p.plane == plane);
                current.polygons.extend(source);
                rest
            } else {
                polygons
            };

            let (coplanar_front, coplanar_back, mut front, mut back) =
                self.split_all(&plane, &polygons);
            current.polygons.extend(coplanar_front);
            current.polygons.extend(coplanar_back);

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
        // slicing only classifies, there is nothing worth spreading out
        SerialBspOps::new()
            .with_tolerance(self.epsilon)
            .slice(node, slicing_plane)
    }
}
