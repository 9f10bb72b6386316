//! Struct and functions for working with `Vertex`s from which `Polygon`s are composed.

use crate::float_types::Real;
use nalgebra::{Point3, Vector3};

/// A vertex of a polygon, holding position and normal.
#[derive(Debug, Clone, PartialEq, Copy)]
pub struct Vertex {
    pub pos: Point3<Real>,
    pub normal: Vector3<Real>,
}

impl Vertex {
    /// Vertex at `pos` carrying `normal` as given.
    ///
    /// The normal is not normalized and plays no part in classification; the
    /// polygon's plane does.
    #[inline]
    pub const fn new(pos: Point3<Real>, normal: Vector3<Real>) -> Self {
        Vertex { pos, normal }
    }

    /// Reverse the normal; the position is untouched.
    ///
    /// # Example
    /// ```rust
    /// # use nalgebra::{Point3, Vector3};
    /// # use csg_boolean::mesh::vertex::Vertex;
    /// let mut v = Vertex::new(Point3::new(1.0, 2.0, 3.0), Vector3::x());
    /// v.flip();
    /// assert_eq!(v.pos, Point3::new(1.0, 2.0, 3.0), "position remains the same");
    /// assert_eq!(v.normal, -Vector3::x(), "the normal is negated");
    /// ```
    pub fn flip(&mut self) {
        self.normal = -self.normal;
    }

    /// Point on the edge `self → other` at parameter `t`, as used when a split
    /// creates a new vertex. The normal is blended the same way and left
    /// unnormalized; [`Mesh::renormalize`](crate::mesh::Mesh::renormalize) resets it.
    pub fn interpolate(&self, other: &Vertex, t: Real) -> Vertex {
        let new_pos = self.pos + (other.pos - self.pos) * t;
        let new_normal = self.normal + (other.normal - self.normal) * t;
        Vertex::new(new_pos, new_normal)
    }

    /// Euclidean distance between the two positions.
    pub fn distance_to(&self, other: &Vertex) -> Real {
        (self.pos - other.pos).norm()
    }

    /// Squared distance between the two positions.
    pub fn distance_squared_to(&self, other: &Vertex) -> Real {
        (self.pos - other.pos).norm_squared()
    }

    /// `true` when every coordinate of the position and normal is finite.
    pub fn is_finite(&self) -> bool {
        self.pos.coords.iter().all(|c| c.is_finite()) && self.normal.iter().all(|c| c.is_finite())
    }
}

/// Separate tolerances for the position and the normal of a [`Vertex`], used by
/// the `approx` comparisons.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct VertexEpsilon {
    pub position: Real,
    pub normal: Real,
}

impl VertexEpsilon {
    /// Same tolerance for both parts.
    pub const fn uniform(epsilon: Real) -> Self {
        Self {
            position: epsilon,
            normal: epsilon,
        }
    }
}

impl approx::AbsDiffEq for Vertex {
    type Epsilon = VertexEpsilon;

    fn default_epsilon() -> VertexEpsilon {
        VertexEpsilon::uniform(<Real as approx::AbsDiffEq>::default_epsilon())
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: VertexEpsilon) -> bool {

        self.pos.abs_diff_eq(&other.pos, epsilon.position)
            && self.normal.abs_diff_eq(&other.normal, epsilon.normal)
    }
}

impl approx::RelativeEq for Vertex {
    fn default_max_relative() -> VertexEpsilon {
        VertexEpsilon::uniform(<Real as approx::RelativeEq>::default_max_relative())
    }

    fn relative_eq(&self, other: &Self, epsilon: VertexEpsilon, max_relative: VertexEpsilon) -> bool {

        self.pos
            .relative_eq(&other.pos, epsilon.position, max_relative.position)
            && self
                .normal
                .relative_eq(&other.normal, epsilon.normal, max_relative.normal)
    }
}

impl approx::UlpsEq for Vertex {
    fn default_max_ulps() -> u32 {
        <Real as approx::UlpsEq>::default_max_ulps()
    }

    fn ulps_eq(&self, other: &Self, epsilon: VertexEpsilon, max_ulps: u32) -> bool {

        self.pos.ulps_eq(&other.pos, epsilon.position, max_ulps)
            && self.normal.ulps_eq(&other.normal, epsilon.normal, max_ulps)
    }
}
