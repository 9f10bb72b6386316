use crate::float_types::parry3d::bounding_volume::Aabb;
use crate::float_types::{EPSILON, Real};
use crate::mesh::plane::Plane;
use nalgebra::{Matrix3, Matrix4, Rotation3, Translation3, Vector3};

/// Solids that support the four booleans and rigid/affine placement.
///
/// Every method returns a new value; `self` is never modified except by
/// [`CSG::invalidate_bounding_box`].
pub trait CSG: Sized + Clone {
    /// The empty solid.
    fn new() -> Self;

    /// Everything inside `self` or `other`.
    fn union(&self, other: &Self) -> Self;

    /// Everything inside `self` but not inside `other`.
    fn difference(&self, other: &Self) -> Self;

    /// Everything inside both `self` and `other`.
    fn intersection(&self, other: &Self) -> Self;

    /// Everything inside exactly one of `self` and `other`.
    fn xor(&self, other: &Self) -> Self;

    /// Apply an affine transform. Orientation is preserved, so a mirroring
    /// matrix still yields outward facing polygons.
    fn transform(&self, matrix: &Matrix4<Real>) -> Self;
    fn bounding_box(&self) -> Aabb;
    fn invalidate_bounding_box(&mut self);

    /// Swap inside and outside.
    fn inverse(&self) -> Self;

    /// Shift by `vector`.
    fn translate_vector(&self, vector: Vector3<Real>) -> Self {
        self.transform(&Translation3::from(vector).to_homogeneous())
    }

    fn translate(&self, x: Real, y: Real, z: Real) -> Self {
        self.translate_vector(Vector3::new(x, y, z))
    }

    /// Move the bounding box center onto the origin.
    fn center(&self) -> Self {
        let aabb = self.bounding_box();

        let center_x = (aabb.mins.x + aabb.maxs.x) * 0.5;
        let center_y = (aabb.mins.y + aabb.maxs.y) * 0.5;
        let center_z = (aabb.mins.z + aabb.maxs.z) * 0.5;

        self.translate(-center_x, -center_y, -center_z)
    }

    /// Lift or drop the solid so that its lowest point rests on `z = 0`.
    fn float(&self) -> Self {
        let aabb = self.bounding_box();
        let min_z = aabb.mins.z;
        self.translate(0.0, 0.0, -min_z)
    }

    /// Rotate about the x, then y, then z axis; angles in degrees.
    fn rotate(&self, x_deg: Real, y_deg: Real, z_deg: Real) -> Self {
        let rx = Rotation3::from_axis_angle(&Vector3::x_axis(), x_deg.to_radians());
        let ry = Rotation3::from_axis_angle(&Vector3::y_axis(), y_deg.to_radians());
        let rz = Rotation3::from_axis_angle(&Vector3::z_axis(), z_deg.to_radians());

        let rot = rz * ry * rx;
        self.transform(&rot.to_homogeneous())
    }

    /// Non-uniform scale about the origin. Negative factors mirror, and
    /// [`CSG::transform`] keeps the result outward facing.
    fn scale(&self, sx: Real, sy: Real, sz: Real) -> Self {
        let mat4 = Matrix4::new_nonuniform_scaling(&Vector3::new(sx, sy, sz));
        self.transform(&mat4)
    }

    /// Reflect through `plane`. A degenerate plane leaves the solid as it is.
    fn mirror(&self, plane: Plane) -> Self {
        let len = plane.normal().norm();
        if len.abs() < EPSILON {
            return self.clone();
        }

        let n = plane.normal() / len;
        let w = plane.offset() / len;

        let offset = n * w;
        let t1 = Translation3::from(-offset).to_homogeneous();

        // R = I - 2 n n^T
        let mut reflect_4 = Matrix4::identity();
        let reflect_3 = Matrix3::identity() - 2.0 * n * n.transpose();
        reflect_4.fixed_view_mut::<3, 3>(0, 0).copy_from(&reflect_3);

        let t2 = Translation3::from(offset).to_homogeneous();

        self.transform(&(t2 * reflect_4 * t1))
    }

    /// Union of `count` copies, the `i`-th shifted by `i * spacing` along `dir`.
    ///
    /// Copies whose bounding boxes do not touch are simply concatenated by the
    /// union fast path, so a row of separated parts costs no tree work.
    fn distribute_linear(&self, count: usize, dir: Vector3<Real>, spacing: Real) -> Self {
        if count < 1 {
            return self.clone();
        }
        let Some(unit) = dir.try_normalize(EPSILON) else {
            return self.clone();
        };
        let step = unit * spacing;

        let mut all_csg = Self::new();
        for i in 0..count {
            let offset = step * (i as Real);
            all_csg = all_csg.union(&self.translate_vector(offset));
        }
        all_csg.invalidate_bounding_box();

        all_csg
    }
}
