//! Struct and functions for working with planar `Polygon`s without holes

use crate::errors::ValidationError;
use crate::float_types::{Real, parry3d::bounding_volume::Aabb};
use crate::mesh::plane::{Plane, newell_normal};
use crate::mesh::vertex::Vertex;
use nalgebra::{Point3, Vector3};
use std::sync::OnceLock;

/// A polygon, defined by a list of vertices.
/// - `S` is the generic metadata type, stored as `Option<S>`.
#[derive(Debug, Clone)]
pub struct Polygon<S: Clone> {
    /// Vertices defining the Polygon's shape
    pub vertices: Vec<Vertex>,

    /// The plane on which this Polygon lies, used for splitting
    pub plane: Plane,

    /// Lazily‑computed axis‑aligned bounding box of the Polygon
    pub bounding_box: OnceLock<Aabb>,

    /// Generic metadata associated with the Polygon
    pub metadata: Option<S>,
}

impl<S: Clone + PartialEq> PartialEq for Polygon<S> {
    fn eq(&self, other: &Self) -> bool {
        self.vertices == other.vertices
            && self.plane == other.plane
            && self.metadata == other.metadata
    }
}

impl<S: Clone> Polygon<S> {
    /// Create a polygon from vertices.
    ///
    /// The plane is derived from the loop. A loop that does not span a plane
    /// (fewer than 3 vertices, all collinear) gets a degenerate plane; such a
    /// polygon is ignored by the partition tree. Use [`Polygon::try_new`] to
    /// reject it up front.
    pub fn new(vertices: Vec<Vertex>, metadata: Option<S>) -> Self {
        let plane = Plane::from_vertices(&vertices).unwrap_or_else(|_| Plane {
            normal: Vector3::zeros(),
            w: 0.0,
        });

        Polygon {
            vertices,
            plane,
            bounding_box: OnceLock::new(),
            metadata,
        }
    }

    /// Create a polygon, validating the vertex loop.
    ///
    /// ## Errors
    /// - [`ValidationError::TooFewPoints`] for fewer than 3 vertices
    /// - [`ValidationError::InvalidCoordinate`] for a NaN or infinite position/normal
    /// - [`ValidationError::DegeneratePlane`] if the vertices are collinear
    pub fn try_new(vertices: Vec<Vertex>, metadata: Option<S>) -> Result<Self, ValidationError> {
        if vertices.len() < 3 {
            return Err(ValidationError::TooFewPoints(vertices.len()));
        }
        if let Some(bad) = vertices.iter().find(|v| !v.is_finite()) {
            return Err(ValidationError::InvalidCoordinate(bad.pos));
        }
        let plane = Plane::from_vertices(&vertices)?;

        Ok(Polygon {
            vertices,
            plane,
            bounding_box: OnceLock::new(),
            metadata,
        })
    }

    /// Shorthand for a polygon whose plane is already known, e.g. a fragment
    /// produced by splitting.
    pub(crate) const fn with_plane(
        vertices: Vec<Vertex>,
        plane: Plane,
        metadata: Option<S>,
    ) -> Self {
        Polygon {
            vertices,
            plane,
            bounding_box: OnceLock::new(),
            metadata,
        }
    }

    /// `true` if the polygon cannot be used as a splitting plane or be split:
    /// fewer than three vertices or no usable plane.
    pub fn is_degenerate(&self) -> bool {
        self.vertices.len() < 3 || self.plane.is_degenerate()
    }

    /// Axis aligned bounding box of this Polygon (cached after first call)
    pub fn bounding_box(&self) -> Aabb {
        *self.bounding_box.get_or_init(|| {
            let mut mins = Point3::new(Real::MAX, Real::MAX, Real::MAX);
            let mut maxs = Point3::new(-Real::MAX, -Real::MAX, -Real::MAX);
            for v in &self.vertices {
                mins.x = mins.x.min(v.pos.x);
                mins.y = mins.y.min(v.pos.y);
                mins.z = mins.z.min(v.pos.z);
                maxs.x = maxs.x.max(v.pos.x);
                maxs.y = maxs.y.max(v.pos.y);
                maxs.z = maxs.z.max(v.pos.z);
            }
            Aabb::new(mins, maxs)
        })
    }

    /// Reverses winding order, flips vertices normals, and flips the plane normal
    pub fn flip(&mut self) {
        // 1) reverse vertices
        self.vertices.reverse();
        // 2) flip all vertex normals
        for v in &mut self.vertices {
            v.flip();
        }
        // 3) flip the cached plane too
        self.plane.flip();
    }

    /// Return an iterator over paired vertices each forming an edge of the polygon
    pub fn edges(&self) -> impl Iterator<Item = (&Vertex, &Vertex)> {
        self.vertices.iter().zip(self.vertices.iter().cycle().skip(1))
    }

    /// Vector area of the loop: its direction follows the winding and its
    /// length is the enclosed area.
    pub fn area_vector(&self) -> Vector3<Real> {
        newell_normal(&self.vertices) * 0.5
    }

    /// Recompute the flat normal of the loop (Newell's method), oriented to agree
    /// with the stored plane.
    pub fn calculate_new_normal(&self) -> Vector3<Real> {
        let normal = newell_normal(&self.vertices);
        let Some(mut poly_normal) = normal.try_normalize(Real::EPSILON) else {
            // degenerate or empty
            return if self.plane.is_degenerate() {
                Vector3::z()
            } else {
                self.plane.normal()
            };
        };

        if poly_normal.dot(&self.plane.normal()) < 0.0 {
            poly_normal = -poly_normal;
        }
        poly_normal
    }

    /// Assign each vertex's normal to match the plane
    pub fn set_new_normal(&mut self) {
        let new_normal = self.calculate_new_normal();
        for v in &mut self.vertices {
            v.normal = new_normal;
        }
    }

    /// Returns a reference to the metadata, if any.
    pub const fn metadata(&self) -> Option<&S> {
        self.metadata.as_ref()
    }

    /// Returns a mutable reference to the metadata, if any.
    pub const fn metadata_mut(&mut self) -> Option<&mut S> {
        self.metadata.as_mut()
    }

    /// Sets the metadata to the given value.
    pub fn set_metadata(&mut self, data: S) {
        self.metadata = Some(data);
    }

    /// Builds a piece of this polygon from a sub-loop produced by a split.
    ///
    /// Consecutive vertices closer than `epsilon` are merged; `None` if what is left
    /// encloses no area. The piece keeps this polygon's plane and metadata.
    pub(crate) fn fragment(&self, vertices: Vec<Vertex>, epsilon: Real) -> Option<Self> {
        let eps_sq = epsilon * epsilon;
        let mut loop_: Vec<Vertex> = Vec::with_capacity(vertices.len());
        for v in vertices {
            if loop_.last().is_none_or(|last| last.distance_squared_to(&v) >= eps_sq) {
                loop_.push(v);
            }
        }
        while loop_.len() > 1
            && loop_
                .first()
                .zip(loop_.last())
                .is_some_and(|(first, last)| first.distance_squared_to(last) < eps_sq)
        {
            loop_.pop();
        }

        if loop_.len() < 3 || !(newell_normal(&loop_).norm() >= eps_sq) {
            return None;
        }

        Some(Polygon::with_plane(
            loop_,
            self.plane.clone(),
            self.metadata.clone(),
        ))
    }
}
