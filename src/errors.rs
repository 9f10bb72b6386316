//! Validation errors

use crate::float_types::Real;
use nalgebra::Point3;

/// All the possible validation issues we might encounter.
///
/// None of these abort a boolean operation: the engine recovers locally
/// (skips the degenerate polygon or intersection vertex) and keeps going.
/// They surface from the fallible constructors such as
/// [`Plane::from_points`](crate::mesh::plane::Plane::from_points) and
/// [`Polygon::try_new`](crate::mesh::polygon::Polygon::try_new).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// (TooFewPoints) A polygon loop has fewer than 3 vertices
    #[error("(TooFewPoints) A polygon needs at least 3 vertices, got {0}")]
    TooFewPoints(usize),
    /// (DegeneratePlane) The points are (nearly) collinear or coincident
    #[error("(DegeneratePlane) Vertices do not define a plane near: {0}")]
    DegeneratePlane(Point3<Real>),
    /// (DegenerateSplit) An edge runs (nearly) parallel to the splitting plane
    #[error("(DegenerateSplit) Edge starting at {0} is parallel to the splitting plane")]
    DegenerateSplit(Point3<Real>),
    /// (InvalidCoordinate) The coordinate has a NaN or infinite
    #[error("(InvalidCoordinate) The coordinate ({0}) has a NaN or infinite")]
    InvalidCoordinate(Point3<Real>),
    /// (NotInvertible) A transform matrix has no inverse
    #[error("(NotInvertible) The transform matrix is not invertible")]
    NotInvertible,
}
