//! `Mesh` struct and implementations of the `CSG` trait for `Mesh`

use crate::errors::ValidationError;
use crate::float_types::{
    Real,
    parry3d::bounding_volume::{Aabb, BoundingVolume},
};
use crate::mesh::{
    bsp::{BspOps, DefaultBspOps, Node},
    plane::Plane,
    polygon::Polygon,
    vertex::Vertex,
};
use crate::traits::CSG;
use nalgebra::{Matrix4, Point3, Vector3, partial_max, partial_min};
use std::{fmt::Debug, sync::OnceLock};
use tracing::{debug, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

pub mod bsp;
#[cfg(feature = "hashmap")]
pub mod manifold;
pub mod plane;
pub mod polygon;
pub mod vertex;

#[derive(Clone, Debug)]
pub struct Mesh<S: Clone + Send + Sync + Debug> {
    /// 3D polygons for volumetric shapes
    pub polygons: Vec<Polygon<S>>,

    /// Lazily calculated AABB that spans `polygons`.
    pub bounding_box: OnceLock<Aabb>,

    /// Metadata
    pub metadata: Option<S>,
}

impl<S: Clone + Send + Sync + Debug> Mesh<S> {
    /// Build a Mesh from an existing polygon list
    pub fn from_polygons(polygons: &[Polygon<S>], metadata: Option<S>) -> Self {
        let mut mesh = Mesh::new();
        mesh.polygons = polygons.to_vec();
        mesh.metadata = metadata;
        mesh
    }

    /// A result mesh carrying `self`'s metadata and a fresh bounding box cache.
    fn with_polygons(&self, polygons: Vec<Polygon<S>>) -> Self {
        Mesh {
            polygons,
            bounding_box: OnceLock::new(),
            metadata: self.metadata.clone(),
        }
    }

    /// `true` if the two meshes cannot share any volume: either one is empty, or
    /// both bound a finite solid and their bounding boxes do not touch.
    ///
    /// An inverted mesh encloses everything outside its polygons, so its bounding
    /// box says nothing about where its volume is.
    fn is_disjoint_from(&self, other: &Mesh<S>) -> bool {
        if self.polygons.is_empty() || other.polygons.is_empty() {
            return true;
        }
        self.volume() > 0.0
            && other.volume() > 0.0
            && !self.bounding_box().intersects(&other.bounding_box())
    }

    /// Helper to collect all vertices from the Mesh.
    #[cfg(not(feature = "parallel"))]
    pub fn vertices(&self) -> Vec<Vertex> {
        self.polygons
            .iter()
            .flat_map(|p| p.vertices.clone())
            .collect()
    }

    /// Parallel helper to collect all vertices from the Mesh.
    #[cfg(feature = "parallel")]
    pub fn vertices(&self) -> Vec<Vertex> {
        self.polygons
            .par_iter()
            .flat_map(|p| p.vertices.clone())
            .collect()
    }

    /// Renormalize all polygons in this Mesh by re-computing each polygon’s plane
    /// and assigning that plane’s normal to all vertices.
    ///
    /// Vertex normals drift when spanning polygons are split repeatedly, since
    /// interpolated normals are not renormalized.
    pub fn renormalize(&mut self) {
        for poly in &mut self.polygons {
            poly.set_new_normal();
        }
    }

    /// Signed volume enclosed by the polygons (divergence theorem over a fan
    /// triangulation of every polygon).
    ///
    /// Positive for a closed, outward facing mesh; negative after [`CSG::inverse`].
    /// Meaningless for open meshes.
    pub fn volume(&self) -> Real {
        self.polygons
            .iter()
            .map(|poly| {
                let Some((first, rest)) = poly.vertices.split_first() else {
                    return 0.0;
                };
                rest.windows(2)
                    .map(|pair| {
                        first
                            .pos
                            .coords
                            .dot(&pair[0].pos.coords.cross(&pair[1].pos.coords))
                    })
                    .sum::<Real>()
            })
            .sum::<Real>()
            / 6.0
    }

    /// Union through explicit BSP operations (tolerance and splitting strategy).
    pub fn union_with<O: BspOps<S>>(&self, other: &Mesh<S>, ops: &O) -> Mesh<S> {
        if self.is_disjoint_from(other) {
            debug!(
                lhs = self.polygons.len(),
                rhs = other.polygons.len(),
                "union of disjoint meshes, concatenating"
            );
            let mut polygons = self.polygons.clone();
            polygons.extend_from_slice(&other.polygons);
            return self.with_polygons(polygons);
        }

        let a = ops.build(Node::new(), self.polygons.clone());
        let b = ops.build(Node::new(), other.polygons.clone());

        let a = ops.clip_to(a, &b);
        let b = ops.clip_to(b, &a);
        let b = ops.invert(b);
        let b = ops.clip_to(b, &a);
        let b = ops.invert(b);
        let a = ops.build(a, b.into_polygons());

        let polygons = a.into_polygons();
        debug!(
            lhs = self.polygons.len(),
            rhs = other.polygons.len(),
            result = polygons.len(),
            "union"
        );
        self.with_polygons(polygons)
    }

    /// Difference through explicit BSP operations (tolerance and splitting strategy).
    pub fn difference_with<O: BspOps<S>>(&self, other: &Mesh<S>, ops: &O) -> Mesh<S> {
        if self.is_disjoint_from(other) {
            debug!(
                lhs = self.polygons.len(),
                rhs = other.polygons.len(),
                "difference of disjoint meshes, keeping lhs"
            );
            return self.with_polygons(self.polygons.clone());
        }

        let a = ops.build(Node::new(), self.polygons.clone());
        let b = ops.build(Node::new(), other.polygons.clone());

        let a = ops.invert(a);
        let a = ops.clip_to(a, &b);
        let b = ops.clip_to(b, &a);
        let b = ops.invert(b);
        let b = ops.clip_to(b, &a);
        let b = ops.invert(b);
        let a = ops.build(a, b.into_polygons());
        let a = ops.invert(a);

        let polygons = a.into_polygons();
        debug!(
            lhs = self.polygons.len(),
            rhs = other.polygons.len(),
            result = polygons.len(),
            "difference"
        );
        self.with_polygons(polygons)
    }

    /// Intersection through explicit BSP operations (tolerance and splitting strategy).
    pub fn intersection_with<O: BspOps<S>>(&self, other: &Mesh<S>, ops: &O) -> Mesh<S> {
        if self.is_disjoint_from(other) {
            debug!(
                lhs = self.polygons.len(),
                rhs = other.polygons.len(),
                "intersection of disjoint meshes is empty"
            );
            return self.with_polygons(Vec::new());
        }

        let a = ops.build(Node::new(), self.polygons.clone());
        let b = ops.build(Node::new(), other.polygons.clone());

        let a = ops.invert(a);
        let b = ops.clip_to(b, &a);
        let b = ops.invert(b);
        let a = ops.clip_to(a, &b);
        let b = ops.clip_to(b, &a);
        let a = ops.build(a, b.into_polygons());
        let a = ops.invert(a);

        let polygons = a.into_polygons();
        debug!(
            lhs = self.polygons.len(),
            rhs = other.polygons.len(),
            result = polygons.len(),
            "intersection"
        );
        self.with_polygons(polygons)
    }

    /// Symmetric difference through explicit BSP operations.
    pub fn xor_with<O: BspOps<S>>(&self, other: &Mesh<S>, ops: &O) -> Mesh<S> {
        // A \ B
        let a_sub_b = self.difference_with(other, ops);

        // B \ A
        let b_sub_a = other.difference_with(self, ops);

        // Union those two
        a_sub_b.union_with(&b_sub_a, ops)
    }
}

impl<S: Clone + Send + Sync + Debug> CSG for Mesh<S> {
    /// Returns a new empty Mesh
    fn new() -> Self {
        Mesh {
            polygons: Vec::new(),
            bounding_box: OnceLock::new(),
            metadata: None,
        }
    }

    /// Return a new Mesh representing union of the two Meshes.
    ///
    /// ```text
    /// let c = a.union(b);
    ///     +-------+            +-------+
    ///     |       |            |       |
    ///     |   a   |            |   c   |
    ///     |    +--+----+   =   |       +----+
    ///     +----+--+    |       +----+       |
    ///          |   b   |            |   c   |
    ///          |       |            |       |
    ///          +-------+            +-------+
    /// ```
    fn union(&self, other: &Mesh<S>) -> Mesh<S> {
        self.union_with(other, &DefaultBspOps::new())
    }

    /// Return a new Mesh representing difference of the two Meshes.
    ///
    /// ```text
    /// let c = a.difference(b);
    ///     +-------+            +-------+
    ///     |       |            |       |
    ///     |   a   |            |   c   |
    ///     |    +--+----+   =   |    +--+
    ///     +----+--+    |       +----+
    ///          |   b   |
    ///          |       |
    ///          +-------+
    /// ```
    fn difference(&self, other: &Mesh<S>) -> Mesh<S> {
        self.difference_with(other, &DefaultBspOps::new())
    }

    /// Return a new Mesh representing intersection of the two Meshes.
    ///
    /// ```text
    /// let c = a.intersection(b);
    ///     +-------+
    ///     |       |
    ///     |   a   |
    ///     |    +--+----+   =   +--+
    ///     +----+--+    |       +--+
    ///          |   b   |
    ///          |       |
    ///          +-------+
    /// ```
    fn intersection(&self, other: &Mesh<S>) -> Mesh<S> {
        self.intersection_with(other, &DefaultBspOps::new())
    }

    /// Return a new Mesh representing space in this Mesh excluding the space in the
    /// other Mesh plus the space in the other Mesh excluding the space in this Mesh.
    ///
    /// ```text
    /// let c = a.xor(b);
    ///     +-------+            +-------+
    ///     |       |            |       |
    ///     |   a   |            |   a   |
    ///     |    +--+----+   =   |    +--+----+
    ///     +----+--+    |       +----+--+    |
    ///          |   b   |            |       |
    ///          |       |            |       |
    ///          +-------+            +-------+
    /// ```
    fn xor(&self, other: &Mesh<S>) -> Mesh<S> {
        self.xor_with(other, &DefaultBspOps::new())
    }

    /// Apply an arbitrary 3D transform (as a 4x4 matrix) to the mesh.
    ///
    /// Normals go through the inverse transpose. A singular matrix has no such
    /// thing, so normals then fall back to the polygon's recomputed plane normal.
    /// Orientation reversing matrices (mirrors, negative scales) also reverse each
    /// vertex loop so that polygons keep facing outward.
    fn transform(&self, mat: &Matrix4<Real>) -> Mesh<S> {
        let mat_inv_transpose = mat.try_inverse().map(|inv| inv.transpose());
        if mat_inv_transpose.is_none() {
            warn!(err = %ValidationError::NotInvertible, "using plane normals for vertices");
        }
        let reverses_orientation = mat.fixed_view::<3, 3>(0, 0).clone_owned().determinant() < 0.0;
        let mut mesh = self.clone();

        for poly in &mut mesh.polygons {
            for vert in &mut poly.vertices {
                vert.pos = mat.transform_point(&vert.pos);
                vert.normal = mat_inv_transpose
                    .as_ref()
                    .and_then(|m| m.transform_vector(&vert.normal).try_normalize(Real::EPSILON))
                    .unwrap_or_else(Vector3::zeros);
            }
            if reverses_orientation {
                poly.vertices.reverse();
            }

            // keep the cached plane consistent with the new vertex positions
            poly.plane = Plane::from_vertices(&poly.vertices)
                .unwrap_or_else(|_| Plane::from_normal(Vector3::zeros(), 0.0));
            poly.bounding_box = OnceLock::new();

            let plane_normal = poly.plane.normal();
            for vert in &mut poly.vertices {
                if vert.normal == Vector3::zeros() {
                    vert.normal = plane_normal;
                }
            }
        }

        // invalidate the old cached bounding box
        mesh.bounding_box = OnceLock::new();

        mesh
    }

    /// Returns a [`parry3d::bounding_volume::Aabb`] indicating the 3D bounds of all `polygons`.
    fn bounding_box(&self) -> Aabb {
        *self.bounding_box.get_or_init(|| {
            // Track overall min/max in x, y, z among all 3D polygons
            let mut min_x = Real::MAX;
            let mut min_y = Real::MAX;
            let mut min_z = Real::MAX;
            let mut max_x = -Real::MAX;
            let mut max_y = -Real::MAX;
            let mut max_z = -Real::MAX;

            for poly in &self.polygons {
                for v in &poly.vertices {
                    // NaN coordinates compare as None and are skipped
                    min_x = partial_min(&min_x, &v.pos.x).copied().unwrap_or(min_x);
                    min_y = partial_min(&min_y, &v.pos.y).copied().unwrap_or(min_y);
                    min_z = partial_min(&min_z, &v.pos.z).copied().unwrap_or(min_z);

                    max_x = partial_max(&max_x, &v.pos.x).copied().unwrap_or(max_x);
                    max_y = partial_max(&max_y, &v.pos.y).copied().unwrap_or(max_y);
                    max_z = partial_max(&max_z, &v.pos.z).copied().unwrap_or(max_z);
                }
            }

            // If still uninitialized (e.g., no polygons), return a trivial AABB at origin
            if min_x > max_x {
                return Aabb::new(Point3::origin(), Point3::origin());
            }

            let mins = Point3::new(min_x, min_y, min_z);
            let maxs = Point3::new(max_x, max_y, max_z);
            Aabb::new(mins, maxs)
        })
    }

    /// Invalidates object's cached bounding box.
    fn invalidate_bounding_box(&mut self) {
        self.bounding_box = OnceLock::new();
    }

    /// Invert this Mesh (flip inside vs. outside)
    fn inverse(&self) -> Mesh<S> {
        let mut mesh = self.clone();
        for p in &mut mesh.polygons {
            p.flip();
        }
        mesh
    }
}
