//! Oriented planes in 3-space and the polygon splitting they drive.
//!
//! A plane is stored in Hessian normal form: a unit normal **n** and an offset *w*,
//! so the plane is the set `{p : n · p = w}`. Points with `n · p − w > ε` lie in
//! *front* (the side the normal points toward), points with `n · p − w < −ε` lie
//! *behind*, everything else is *coplanar*.
//!
//! ### Polygon splitting
//! [`Plane::split_polygon`] is a 3D Sutherland–Hodgman pass:
//!
//! 1. every vertex is classified as `FRONT`, `BACK` or `COPLANAR`;
//! 2. the classes are OR-ed together, so a polygon with vertices on both sides is `SPANNING`;
//! 3. for a spanning polygon each edge `(vᵢ, vⱼ)` with endpoints on opposite sides gets a new
//!    vertex exactly on the plane, at
//!    ```text
//!    t = (w − n·vᵢ) / (n·(vⱼ − vᵢ))
//!    ```
//!    which is appended to both the front loop and the back loop.
//!
//! Unless stated otherwise, all tolerances are governed by [`tolerance`].

use crate::errors::ValidationError;
use crate::float_types::{Real, tolerance};
use crate::mesh::polygon::Polygon;
use crate::mesh::vertex::Vertex;
use nalgebra::{Point3, Vector3};
use tracing::trace;

/// Classification of a polygon or point that lies exactly in the plane
/// (i.e. within `±ε` of the plane).
pub const COPLANAR: i8 = 0;

/// Classification of a polygon or point that lies strictly on the
/// *front* side of the plane (the side the normal points toward).
pub const FRONT: i8 = 1;

/// Classification of a polygon or point that lies strictly on the
/// *back* side of the plane (opposite the normal direction).
pub const BACK: i8 = 2;

/// A polygon or edge that straddles the plane, producing pieces
/// on both the front **and** the back.
pub const SPANNING: i8 = 3;

/// A plane in 3D space: unit `normal` and offset `w` with `normal · p == w`.
///
/// A plane whose normal is zero is *degenerate*; it comes out of the infallible
/// constructors when they are handed collinear input and is never used to split.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    /// Unit normal vector of the plane
    pub normal: Vector3<Real>,
    /// Distance from origin along normal (plane equation: n·p = w)
    pub w: Real,
}

impl Plane {
    /// Create a plane through three points.
    /// The normal direction follows the right-hand rule: `(b-a) × (c-a)`.
    ///
    /// ## Errors
    /// [`ValidationError::DegeneratePlane`] if the points are (nearly) collinear, i.e. the
    /// cross product is shorter than `tolerance()²`.
    pub fn from_points(
        a: Point3<Real>,
        b: Point3<Real>,
        c: Point3<Real>,
    ) -> Result<Self, ValidationError> {
        let cross = (b - a).cross(&(c - a));
        let len = cross.norm();
        let eps = tolerance();
        // negated comparison also rejects NaN
        if !(len > eps * eps) {
            return Err(ValidationError::DegeneratePlane(a));
        }

        let normal = cross / len;
        Ok(Plane {
            normal,
            w: normal.dot(&a.coords),
        })
    }

    /// Plane of a vertex loop: built from the first three non-collinear vertices and
    /// oriented so that it agrees with the loop's winding (Newell's method), which keeps
    /// concave loops whose first corner is reflex pointing the right way.
    ///
    /// ## Errors
    /// - [`ValidationError::TooFewPoints`] for fewer than 3 vertices
    /// - [`ValidationError::DegeneratePlane`] if all vertices are collinear
    pub fn from_vertices(vertices: &[Vertex]) -> Result<Self, ValidationError> {
        let n = vertices.len();
        if n < 3 {
            return Err(ValidationError::TooFewPoints(n));
        }

        let a = vertices[0].pos;
        let mut plane = (1..n - 1)
            .flat_map(|i| (i + 1..n).map(move |j| (i, j)))
            .find_map(|(i, j)| Plane::from_points(a, vertices[i].pos, vertices[j].pos).ok())
            .ok_or(ValidationError::DegeneratePlane(a))?;

        let reference_normal = newell_normal(vertices);
        if plane.normal.dot(&reference_normal) < 0.0 {
            plane.flip();
        }
        Ok(plane)
    }

    /// Build a new `Plane` from a (not‑necessarily‑unit) normal **n**
    /// and signed offset *w* (in the sense `n · p == w`).
    ///
    /// Both are rescaled by `1/|n|` so the same set of points is described.
    /// A zero normal yields a degenerate plane.
    pub fn from_normal(normal: Vector3<Real>, w: Real) -> Self {
        let len = normal.norm();
        if !(len > Real::EPSILON) {
            return Plane {
                normal: Vector3::zeros(),
                w: 0.0,
            };
        }
        Plane {
            normal: normal / len,
            w: w / len,
        }
    }

    /// Get the plane normal
    pub const fn normal(&self) -> Vector3<Real> {
        self.normal
    }

    /// Get the offset (distance from origin)
    pub const fn offset(&self) -> Real {
        self.w
    }

    /// `true` if this plane has no usable normal.
    pub fn is_degenerate(&self) -> bool {
        !(self.normal.norm_squared() > Real::EPSILON)
    }

    /// Signed distance of `point` from the plane, positive in front.
    #[inline]
    pub fn signed_distance(&self, point: &Point3<Real>) -> Real {
        self.normal.dot(&point.coords) - self.w
    }

    /// Flip the plane (reverse normal and distance)
    pub fn flip(&mut self) {
        self.normal = -self.normal;
        self.w = -self.w;
    }

    /// Return a flipped copy of this plane
    pub fn flipped(&self) -> Self {
        Plane {
            normal: -self.normal,
            w: -self.w,
        }
    }

    /// Classify a point using the crate-wide [`tolerance`].
    #[inline]
    pub fn orient_point(&self, point: &Point3<Real>) -> i8 {
        self.orient_point_with(point, tolerance())
    }

    /// Classify a point as `FRONT`, `BACK` or `COPLANAR` using `epsilon`.
    #[inline]
    pub fn orient_point_with(&self, point: &Point3<Real>, epsilon: Real) -> i8 {
        let distance = self.signed_distance(point);
        if distance > epsilon {
            FRONT
        } else if distance < -epsilon {
            BACK
        } else {
            COPLANAR
        }
    }

    /// Classify a polygon with respect to the plane.
    /// Returns a bitmask of `COPLANAR`, `FRONT`, and `BACK`.
    pub fn classify_polygon<S: Clone>(&self, polygon: &Polygon<S>) -> i8 {
        self.classify_polygon_with(polygon, tolerance())
    }

    /// [`Plane::classify_polygon`] with an explicit tolerance.
    pub fn classify_polygon_with<S: Clone>(&self, polygon: &Polygon<S>, epsilon: Real) -> i8 {
        polygon
            .vertices
            .iter()
            .fold(COPLANAR, |acc, v| acc | self.orient_point_with(&v.pos, epsilon))
    }

    /// Point where the edge `start → end` crosses this plane.
    ///
    /// The interpolation parameter is clamped to `[0, 1]` so the new vertex never
    /// leaves the edge.
    ///
    /// ## Errors
    /// [`ValidationError::DegenerateSplit`] if the edge runs parallel to the plane.
    pub fn intersect_edge(&self, start: &Vertex, end: &Vertex) -> Result<Vertex, ValidationError> {
        let denom = self.normal.dot(&(end.pos - start.pos));
        if !(denom.abs() > Real::EPSILON) {
            return Err(ValidationError::DegenerateSplit(start.pos));
        }
        let t = ((self.w - self.normal.dot(&start.pos.coords)) / denom).clamp(0.0, 1.0);
        Ok(start.interpolate(end, t))
    }

    /// Splits a polygon by this plane, returning four buckets:
    /// `(coplanar_front, coplanar_back, front, back)`.
    ///
    /// Coplanar polygons land in `coplanar_front` when they face the same way as the
    /// plane and in `coplanar_back` otherwise. Both halves of a spanning polygon keep a
    /// clone of its metadata and its plane.
    #[allow(clippy::type_complexity)]
    pub fn split_polygon<S: Clone + Send + Sync>(
        &self,
        polygon: &Polygon<S>,
    ) -> (
        Vec<Polygon<S>>,
        Vec<Polygon<S>>,
        Vec<Polygon<S>>,
        Vec<Polygon<S>>,
    ) {
        self.split_polygon_with(polygon, tolerance())
    }

    /// [`Plane::split_polygon`] with an explicit tolerance.
    #[allow(clippy::type_complexity)]
    pub fn split_polygon_with<S: Clone + Send + Sync>(
        &self,
        polygon: &Polygon<S>,
        epsilon: Real,
    ) -> (
        Vec<Polygon<S>>,
        Vec<Polygon<S>>,
        Vec<Polygon<S>>,
        Vec<Polygon<S>>,
    ) {
        let mut coplanar_front = Vec::new();
        let mut coplanar_back = Vec::new();
        let mut front = Vec::new();
        let mut back = Vec::new();

        let types: Vec<i8> = polygon
            .vertices
            .iter()
            .map(|v| self.orient_point_with(&v.pos, epsilon))
            .collect();
        let polygon_type = types.iter().fold(COPLANAR, |acc, &t| acc | t);

        match polygon_type {
            COPLANAR => {
                if self.normal.dot(&polygon.plane.normal) > 0.0 {
                    coplanar_front.push(polygon.clone());
                } else {
                    coplanar_back.push(polygon.clone());
                }
            },
            FRONT => front.push(polygon.clone()),
            BACK => back.push(polygon.clone()),
            _ => {
                let count = polygon.vertices.len();
                let mut split_front = Vec::<Vertex>::with_capacity(count + 1);
                let mut split_back = Vec::<Vertex>::with_capacity(count + 1);

                for i in 0..count {
                    let j = (i + 1) % count;
                    let type_i = types[i];
                    let type_j = types[j];
                    let vertex_i = &polygon.vertices[i];
                    let vertex_j = &polygon.vertices[j];

                    if type_i != BACK {
                        split_front.push(*vertex_i);
                    }
                    if type_i != FRONT {
                        split_back.push(*vertex_i);
                    }

                    // strictly opposite sides: the edge crosses the plane
                    if (type_i | type_j) == SPANNING {
                        match self.intersect_edge(vertex_i, vertex_j) {
                            Ok(vertex_new) => {
                                split_front.push(vertex_new);
                                split_back.push(vertex_new);
                            },
                            Err(err) => trace!(%err, "skipping intersection vertex"),
                        }
                    }
                }

                front.extend(polygon.fragment(split_front, epsilon));
                back.extend(polygon.fragment(split_back, epsilon));
            },
        }

        (coplanar_front, coplanar_back, front, back)
    }
}

/// Newell's method: twice the vector area of the loop. Its direction follows the
/// winding, its length is twice the enclosed area.
pub(crate) fn newell_normal(vertices: &[Vertex]) -> Vector3<Real> {
    vertices
        .iter()
        .zip(vertices.iter().cycle().skip(1))
        .fold(Vector3::zeros(), |acc, (curr, next)| {
            acc + curr.pos.coords.cross(&next.pos.coords)
        })
}
