//! Test support library
//! Provides various helper functions & utilities for tests.
#![allow(dead_code)]

use csg_boolean::{
    float_types::{Real, TAU, PI},
    mesh::{Mesh, polygon::Polygon, vertex::Vertex},
};
use nalgebra::{Point3, Vector3};
use std::fmt::Debug;

/// Returns the approximate bounding box `[min_x, min_y, min_z, max_x, max_y, max_z]`
/// for a set of polygons.
pub fn bounding_box<S: Clone>(polygons: &[Polygon<S>]) -> [Real; 6] {
    let mut min_x = Real::MAX;
    let mut min_y = Real::MAX;
    let mut min_z = Real::MAX;
    let mut max_x = Real::MIN;
    let mut max_y = Real::MIN;
    let mut max_z = Real::MIN;

    for poly in polygons {
        for v in &poly.vertices {
            let p = v.pos;
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            min_z = min_z.min(p.z);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
            max_z = max_z.max(p.z);
        }
    }

    [min_x, min_y, min_z, max_x, max_y, max_z]
}

/// Quick helper to compare floating-point results with an acceptable tolerance.
pub fn approx_eq(a: Real, b: Real, eps: Real) -> bool {
    (a - b).abs() < eps
}

/// Helper to make a simple Polygon in 3D with given vertices.
pub fn make_polygon_3d(points: &[[Real; 3]]) -> Polygon<()> {
    let mut verts = Vec::new();
    for p in points {
        let pos = Point3::new(p[0], p[1], p[2]);
        // Polygon::new derives the plane from the winding, the normal is only carried along
        let normal = Vector3::z();
        verts.push(Vertex::new(pos, normal));
    }
    Polygon::new(verts, None)
}

/// Axis aligned cube with edge length `2 * half`, centered on `center`, outward wound.
/// Every face carries `metadata`.
pub fn cube<S: Clone + Send + Sync + Debug>(
    center: [Real; 3],
    half: Real,
    metadata: Option<S>,
) -> Mesh<S> {
    // (outward normal, four corners in counter-clockwise order seen from outside)
    const FACES: [([Real; 3], [[Real; 3]; 4]); 6] = [
        ([-1., 0., 0.], [[-1., -1., -1.], [-1., -1., 1.], [-1., 1., 1.], [-1., 1., -1.]]),
        ([1., 0., 0.], [[1., -1., -1.], [1., 1., -1.], [1., 1., 1.], [1., -1., 1.]]),
        ([0., -1., 0.], [[-1., -1., -1.], [1., -1., -1.], [1., -1., 1.], [-1., -1., 1.]]),
        ([0., 1., 0.], [[-1., 1., -1.], [-1., 1., 1.], [1., 1., 1.], [1., 1., -1.]]),
        ([0., 0., -1.], [[-1., -1., -1.], [-1., 1., -1.], [1., 1., -1.], [1., -1., -1.]]),
        ([0., 0., 1.], [[-1., -1., 1.], [1., -1., 1.], [1., 1., 1.], [-1., 1., 1.]]),
    ];

    let polygons: Vec<Polygon<S>> = FACES
        .iter()
        .map(|(n, corners)| {
            let normal = Vector3::new(n[0], n[1], n[2]);
            let vertices = corners
                .iter()
                .map(|c| {
                    Vertex::new(
                        Point3::new(
                            center[0] + c[0] * half,
                            center[1] + c[1] * half,
                            center[2] + c[2] * half,
                        ),
                        normal,
                    )
                })
                .collect();
            Polygon::new(vertices, metadata.clone())
        })
        .collect();

    Mesh::from_polygons(&polygons, metadata)
}

/// UV sphere made of quads (triangles at the poles), outward wound.
pub fn sphere<S: Clone + Send + Sync + Debug>(
    center: [Real; 3],
    radius: Real,
    segments: usize,
    stacks: usize,
    metadata: Option<S>,
) -> Mesh<S> {
    let c = Vector3::new(center[0], center[1], center[2]);
    let vertex = |theta: Real, phi: Real| {
        let dir = Vector3::new(theta.cos() * phi.sin(), theta.sin() * phi.sin(), phi.cos());
        Vertex::new(Point3::from(c + dir * radius), dir)
    };

    let mut polygons = Vec::with_capacity(segments * stacks);
    for i in 0..segments {
        for j in 0..stacks {
            let t0 = i as Real / segments as Real * TAU;
            let t1 = (i + 1) as Real / segments as Real * TAU;
            let p0 = j as Real / stacks as Real * PI;
            let p1 = (j + 1) as Real / stacks as Real * PI;

            // phi runs from the +z pole down, theta counter-clockwise about +z
            let mut vertices = vec![vertex(t0, p0)];
            if j > 0 {
                vertices.push(vertex(t0, p1));
                vertices.push(vertex(t1, p1));
                vertices.push(vertex(t1, p0));
            } else {
                vertices.push(vertex(t0, p1));
                vertices.push(vertex(t1, p1));
            }
            if j == stacks - 1 {
                // bottom pole: (t0,p1) and (t1,p1) coincide
                vertices.remove(2);
            }
            polygons.push(Polygon::new(vertices, metadata.clone()));
        }
    }

    Mesh::from_polygons(&polygons, metadata)
}

/// Sum of the vector areas of all polygons; zero for a closed surface.
pub fn total_vector_area<S: Clone>(polygons: &[Polygon<S>]) -> Vector3<Real> {
    polygons
        .iter()
        .fold(Vector3::zeros(), |acc, p| acc + p.area_vector())
}

/// `true` if `point` coincides with one of `vertices` (within `eps`).
pub fn contains_point(vertices: &[Vertex], point: &Point3<Real>, eps: Real) -> bool {
    vertices.iter().any(|v| (v.pos - point).norm() < eps)
}
