use csg_boolean::{
    errors::ValidationError,
    float_types::EPSILON,
    mesh::{polygon::Polygon, vertex::Vertex},
};
use nalgebra::{Point3, Vector3};

mod support;

use crate::support::{approx_eq, make_polygon_3d};

#[test]
fn construction() {
    let v1 = Vertex::new(Point3::origin(), Vector3::y());
    let v2 = Vertex::new(Point3::new(1.0, 0.0, 1.0), Vector3::y());
    let v3 = Vertex::new(Point3::new(1.0, 0.0, -1.0), Vector3::y());

    let poly: Polygon<()> = Polygon::new(vec![v1, v2, v3], None);
    assert_eq!(poly.vertices.len(), 3);
    // Plane should be defined by these three points. We expect a normal near ±Y.
    assert!(
        approx_eq(poly.plane.normal().dot(&Vector3::y()).abs(), 1.0, 1e-8),
        "Expected plane normal to match ±Y"
    );
}

#[test]
fn new() {
    let vertices = vec![
        Vertex::new(Point3::origin(), Vector3::z()),
        Vertex::new(Point3::new(1.0, 0.0, 0.0), Vector3::z()),
        Vertex::new(Point3::new(0.0, 1.0, 0.0), Vector3::z()),
    ];
    let poly: Polygon<()> = Polygon::new(vertices.clone(), None);
    assert_eq!(poly.vertices.len(), 3);
    assert_eq!(poly.metadata, None);
    // Plane normal should be +Z for the above points
    assert!(approx_eq(poly.plane.normal().x, 0.0, EPSILON));
    assert!(approx_eq(poly.plane.normal().y, 0.0, EPSILON));
    assert!(approx_eq(poly.plane.normal().z, 1.0, EPSILON));

    // the fallible constructor agrees on valid input
    let checked: Polygon<()> = Polygon::try_new(vertices, None).expect("valid triangle");
    assert_eq!(checked, poly);
}

#[test]
fn try_new_rejects_collinear_loop() {
    let vertices = vec![
        Vertex::new(Point3::origin(), Vector3::z()),
        Vertex::new(Point3::new(1.0, 1.0, 0.0), Vector3::z()),
        Vertex::new(Point3::new(2.0, 2.0, 0.0), Vector3::z()),
        Vertex::new(Point3::new(3.0, 3.0, 0.0), Vector3::z()),
    ];
    assert!(matches!(
        Polygon::<()>::try_new(vertices, None),
        Err(ValidationError::DegeneratePlane(_))
    ));
}

#[test]
fn flip() {
    let mut poly: Polygon<()> = Polygon::new(
        vec![
            Vertex::new(Point3::origin(), Vector3::z()),
            Vertex::new(Point3::new(1.0, 0.0, 0.0), Vector3::z()),
            Vertex::new(Point3::new(0.0, 1.0, 0.0), Vector3::z()),
        ],
        None,
    );
    let plane_normal_before = poly.plane.normal();
    poly.flip();
    // The vertices should be reversed, and normal flipped
    assert_eq!(poly.vertices.len(), 3);
    assert!(approx_eq(
        poly.plane.normal().z,
        -plane_normal_before.z,
        EPSILON
    ));
    assert_eq!(poly.vertices[0].pos, Point3::new(0.0, 1.0, 0.0));
    for v in &poly.vertices {
        assert!(approx_eq(v.normal.z, -1.0, EPSILON));
    }
}

#[test]
fn concave_polygon_plane_follows_winding() {
    // an "L" whose first corner is reflex
    let poly = make_polygon_3d(&[
        [1., 1., 0.],
        [1., 2., 0.],
        [0., 2., 0.],
        [0., 0., 0.],
        [2., 0., 0.],
        [2., 1., 0.],
    ]);
    assert!(approx_eq(poly.plane.normal().z, 1.0, EPSILON));
    assert!(approx_eq(poly.area_vector().z, 3.0, 1e-9));
}

#[test]
fn recalc_plane_and_normals() {
    let mut poly: Polygon<()> = Polygon::new(
        vec![
            Vertex::new(Point3::origin(), Vector3::zeros()),
            Vertex::new(Point3::new(1.0, 0.0, 0.0), Vector3::zeros()),
            Vertex::new(Point3::new(0.0, 1.0, 0.0), Vector3::zeros()),
        ],
        None,
    );
    poly.set_new_normal();
    assert!(approx_eq(poly.plane.normal().z, 1.0, EPSILON));
    for v in &poly.vertices {
        assert!(approx_eq(v.normal.x, 0.0, EPSILON));
        assert!(approx_eq(v.normal.y, 0.0, EPSILON));
        assert!(approx_eq(v.normal.z, 1.0, EPSILON));
    }
    let n = poly.calculate_new_normal();
    assert!(approx_eq(n.norm(), 1.0, EPSILON));
}

#[test]
fn bounding_box() {
    let poly = make_polygon_3d(&[[-1., 0., 2.], [3., 0., 2.], [0., 5., -2.]]);
    let bb = poly.bounding_box();
    assert_eq!(bb.mins, Point3::new(-1.0, 0.0, -2.0));
    assert_eq!(bb.maxs, Point3::new(3.0, 5.0, 2.0));
}

#[test]
fn edges() {
    let poly = make_polygon_3d(&[[0., 0., 0.], [1., 0., 0.], [0., 1., 0.]]);
    let lengths: Vec<_> = poly.edges().map(|(a, b)| a.distance_to(b)).collect();
    assert_eq!(lengths.len(), 3);
    assert!(approx_eq(lengths[0], 1.0, EPSILON));
    assert!(approx_eq(lengths[1], 2.0_f64.sqrt() as _, EPSILON));
    assert!(approx_eq(lengths[2], 1.0, EPSILON));
}
