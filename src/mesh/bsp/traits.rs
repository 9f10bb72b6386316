//! Traits defining BSP tree operations for dependency inversion

use crate::float_types::Real;
use crate::mesh::bsp::node::Node;
use crate::mesh::plane::{BACK, COPLANAR, FRONT, Plane};
use crate::mesh::polygon::Polygon;
use crate::mesh::vertex::Vertex;

/// Core BSP operations trait - implements algorithms on BSP nodes.
///
/// Operations that restructure a tree take it by value and hand it back, so a
/// tree can never be observed half way through an inversion or a clip.
pub trait BspOps<S: Clone + Send + Sync> {
    /// Tolerance used to classify points against planes.
    fn epsilon(&self) -> Real;

    /// Invert all polygons in the BSP tree
    fn invert(&self, node: Node<S>) -> Node<S>;

    /// Recursively remove all polygons that are inside this BSP tree
    fn clip_polygons(&self, node: &Node<S>, polygons: Vec<Polygon<S>>) -> Vec<Polygon<S>>;

    /// Remove all polygons in this BSP tree that are inside the other BSP tree
    fn clip_to(&self, node: Node<S>, other: &Node<S>) -> Node<S>;

    /// Build (or extend) a BSP tree with the given polygons
    fn build(&self, node: Node<S>, polygons: Vec<Polygon<S>>) -> Node<S>;

    /// Return all polygons in this BSP tree
    fn all_polygons(&self, node: &Node<S>) -> Vec<Polygon<S>>;

    /// Slices this BSP node with the given plane
    fn slice(&self, node: &Node<S>, slicing_plane: &Plane)
    -> (Vec<Polygon<S>>, Vec<[Vertex; 2]>);
}

/// Trait for picking optimal splitting planes
pub trait SplittingPlaneStrategy {
    /// Pick the best splitting plane from a set of polygons.
    ///
    /// Degenerate polygons are never candidates; `None` if every polygon is degenerate.
    fn pick_best_splitting_plane<S: Clone>(
        &self,
        polygons: &[Polygon<S>],
        epsilon: Real,
    ) -> Option<Plane>;
}

/// Uses the plane of the first usable polygon, as the classic algorithm does.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstPolygonStrategy;

impl SplittingPlaneStrategy for FirstPolygonStrategy {
    fn pick_best_splitting_plane<S: Clone>(
        &self,
        polygons: &[Polygon<S>],
        _epsilon: Real,
    ) -> Option<Plane> {
        polygons
            .iter()
            .find(|p| !p.is_degenerate())
            .map(|p| p.plane.clone())
    }
}

/// Default splitting plane strategy using balanced heuristic
#[derive(Debug, Clone, Copy)]
pub struct BalancedSplittingStrategy {
    /// Cost of each polygon the candidate plane would cut in two
    pub span_weight: Real,
    /// Cost per polygon of difference between the front and back counts
    pub balance_weight: Real,
    /// How many polygons (from the front of the list) are tried as candidates
    pub sample_size: usize,
}

impl Default for BalancedSplittingStrategy {
    fn default() -> Self {
        Self {
            span_weight: 8.0,
            balance_weight: 1.0,
            sample_size: 20,
        }
    }
}

impl SplittingPlaneStrategy for BalancedSplittingStrategy {
    fn pick_best_splitting_plane<S: Clone>(
        &self,
        polygons: &[Polygon<S>],
        epsilon: Real,
    ) -> Option<Plane> {
        let mut best: Option<(Real, &Plane)> = None;

        // Take a sample of polygons as candidate planes
        for plane in polygons
            .iter()
            .filter(|p| !p.is_degenerate())
            .take(self.sample_size.max(1))
            .map(|p| &p.plane)
        {
            let (num_front, num_back, num_spanning) = polygons
                .iter()
                .map(|poly| match plane.classify_polygon_with(poly, epsilon) {
                    COPLANAR => (0usize, 0usize, 0usize),
                    FRONT => (1, 0, 0),
                    BACK => (0, 1, 0),
                    _ => (0, 0, 1),
                })
                .fold((0, 0, 0), |acc, x| (acc.0 + x.0, acc.1 + x.1, acc.2 + x.2));

            let score = self.span_weight * num_spanning as Real
                + self.balance_weight * num_front.abs_diff(num_back) as Real;

            if best.is_none_or(|(best_score, _)| score < best_score) {
                best = Some((score, plane));
            }
        }

        best.map(|(_, plane)| plane.clone())
    }
}
