//! Binary Space Partitioning (BSP) tree implementation
//!
//! This module provides BSP tree operations with dependency inversion,
//! allowing for different algorithm implementations (serial/parallel).
//!
//! The inherent methods on [`Node`] run through [`DefaultBspOps`]: the parallel
//! implementation when the `parallel` feature is enabled, the serial one otherwise.
//! Methods that restructure the tree consume it and return the result:
//!
//! ```rust
//! # use csg_boolean::mesh::bsp::Node;
//! # use csg_boolean::mesh::polygon::Polygon;
//! # use csg_boolean::mesh::vertex::Vertex;
//! # use nalgebra::{Point3, Vector3};
//! let triangle: Polygon<()> = Polygon::new(
//!     vec![
//!         Vertex::new(Point3::new(0.0, 0.0, 0.0), Vector3::z()),
//!         Vertex::new(Point3::new(1.0, 0.0, 0.0), Vector3::z()),
//!         Vertex::new(Point3::new(0.0, 1.0, 0.0), Vector3::z()),
//!     ],
//!     None,
//! );
//! let tree = Node::from_polygons(&[triangle]).invert();
//! assert_eq!(tree.all_polygons()[0].plane.normal(), -Vector3::z());
//! ```

pub mod node;
pub mod traits;

pub mod serial;

#[cfg(feature = "parallel")]
pub mod parallel;

pub use node::Node;
pub use traits::{BalancedSplittingStrategy, BspOps, FirstPolygonStrategy, SplittingPlaneStrategy};

pub use serial::SerialBspOps;

#[cfg(feature = "parallel")]
pub use parallel::ParallelBspOps;

/// The operations used by the inherent [`Node`] methods and by the
/// [`CSG`](crate::traits::CSG) implementation of [`Mesh`](crate::mesh::Mesh).
#[cfg(not(feature = "parallel"))]
pub type DefaultBspOps = SerialBspOps;

/// The operations used by the inherent [`Node`] methods and by the
/// [`CSG`](crate::traits::CSG) implementation of [`Mesh`](crate::mesh::Mesh).
#[cfg(feature = "parallel")]
pub type DefaultBspOps = ParallelBspOps;

use crate::mesh::plane::Plane;
use crate::mesh::polygon::Polygon;
use crate::mesh::vertex::Vertex;
use std::fmt::Debug;

impl<S: Clone + Send + Sync + Debug> Node<S> {
    /// Creates a new BSP node from polygons
    pub fn from_polygons(polygons: &[Polygon<S>]) -> Self {
        let node = Self::new();
        if polygons.is_empty() {
            return node;
        }
        node.build(polygons.to_vec())
    }

    /// Pick the best splitting plane using the default strategy
    pub fn pick_best_splitting_plane(&self, polygons: &[Polygon<S>]) -> Option<Plane> {
        let ops = DefaultBspOps::new();
        BalancedSplittingStrategy::default()
            .pick_best_splitting_plane(polygons, BspOps::<S>::epsilon(&ops))
    }

    /// Invert all polygons in the BSP tree
    pub fn invert(self) -> Self {
        DefaultBspOps::new().invert(self)
    }

    /// Recursively remove all polygons that are inside this BSP tree
    pub fn clip_polygons(&self, polygons: Vec<Polygon<S>>) -> Vec<Polygon<S>> {
        DefaultBspOps::new().clip_polygons(self, polygons)
    }

    /// Remove all polygons in this BSP tree that are inside the other BSP tree
    pub fn clip_to(self, bsp: &Node<S>) -> Self {
        DefaultBspOps::new().clip_to(self, bsp)
    }

    /// Return all polygons in this BSP tree
    pub fn all_polygons(&self) -> Vec<Polygon<S>> {
        DefaultBspOps::new().all_polygons(self)
    }

    /// Build a BSP tree from the given polygons, or add them to an existing one
    pub fn build(self, polygons: Vec<Polygon<S>>) -> Self {
        DefaultBspOps::new().build(self, polygons)
    }

    /// Slices this BSP node with the given plane
    pub fn slice(&self, slicing_plane: &Plane) -> (Vec<Polygon<S>>, Vec<[Vertex; 2]>) {
        DefaultBspOps::new().slice(self, slicing_plane)
    }
}
