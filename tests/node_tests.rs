mod support;

use csg_boolean::{
    float_types::{EPSILON, Real},
    mesh::{
        bsp::{BspOps, FirstPolygonStrategy, Node, SerialBspOps, SplittingPlaneStrategy},
        plane::Plane,
        polygon::Polygon,
        vertex::Vertex,
    },
};
use nalgebra::{Point3, Vector3};

use crate::support::{approx_eq, make_polygon_3d};

#[test]
fn new_and_build() {
    // A simple triangle:
    let p: Polygon<()> = Polygon::new(
        vec![
            Vertex::new(Point3::origin(), Vector3::z()),
            Vertex::new(Point3::new(1.0, 0.0, 0.0), Vector3::z()),
            Vertex::new(Point3::new(0.0, 1.0, 0.0), Vector3::z()),
        ],
        None,
    );
    let node: Node<()> = Node::from_polygons(&[p.clone()]);
    // The node should have built a tree with plane = p.plane, polygons = [p], no front/back children
    assert_eq!(node.plane.as_ref(), Some(&p.plane));
    assert_eq!(node.polygons.len(), 1);
    assert!(node.front.is_none());
    assert!(node.back.is_none());
}

#[test]
fn invert() {
    let p: Polygon<()> = Polygon::new(
        vec![
            Vertex::new(Point3::origin(), Vector3::z()),
            Vertex::new(Point3::new(1.0, 0.0, 0.0), Vector3::z()),
            Vertex::new(Point3::new(0.0, 1.0, 0.0), Vector3::z()),
        ],
        None,
    );
    let node: Node<()> = Node::from_polygons(&[p.clone()]);
    let original_count = node.polygons.len();
    let original_normal = node.plane.as_ref().map(Plane::normal).expect("built node has a plane");
    let node = node.invert();
    // The plane normal should be flipped, polygons should be flipped, and front/back swapped (they were None).
    let flipped_normal = node.plane.as_ref().map(Plane::normal).expect("built node has a plane");
    assert!(approx_eq(flipped_normal.x, -original_normal.x, EPSILON));
    assert!(approx_eq(flipped_normal.y, -original_normal.y, EPSILON));
    assert!(approx_eq(flipped_normal.z, -original_normal.z, EPSILON));
    // We shouldn't lose polygons by inverting
    assert_eq!(node.polygons.len(), original_count);
    // If we invert back, we should get the same geometry
    let node = node.invert();
    assert_eq!(node.polygons, vec![p]);
}

#[test]
fn clip_polygons2() {
    // A node with a single plane normal to +Z, passing through z=0
    let plane = Plane::from_normal(Vector3::z(), 0.0);
    let node: Node<()> = Node {
        plane: Some(plane),
        front: None,
        back: None,
        polygons: Vec::new(),
    };
    // We'll put a polygon in the plane exactly (z=0) and one above, one below
    let poly_in_plane = make_polygon_3d(&[[0., 0., 0.], [1., 0., 0.], [0., 1., 0.]]);
    let poly_above = make_polygon_3d(&[[0., 0., 1.], [1., 0., 1.], [0., 1., 1.]]);
    let poly_below = make_polygon_3d(&[[0., 0., -1.], [1., 0., -1.], [0., 1., -1.]]);

    let node = node.build(vec![poly_in_plane, poly_above, poly_below]);
    // Now node has polygons: [poly_in_plane], front child with poly_above, back child with poly_below
    assert_eq!(node.polygons.len(), 1);
    assert!(node.front.as_ref().is_some_and(|f| f.polygons.len() == 1));
    assert!(node.back.as_ref().is_some_and(|b| b.polygons.len() == 1));

    // Clip a polygon that crosses from z=-0.5 to z=0.5
    let crossing_poly = make_polygon_3d(&[[-1., -1., -0.5], [2., -1., 0.5], [-1., 2., 0.5]]);
    let clipped = node.clip_polygons(vec![crossing_poly]);

    // the upper half lands behind the z=1 triangle with nothing further back: dropped.
    // the lower half lands in front of the z=-1 triangle: kept.
    assert_eq!(clipped.len(), 1);
    for v in &clipped[0].vertices {
        assert!(v.pos.z <= EPSILON);
    }
}

#[test]
fn clip_to() {
    // Basic test: if we clip a node to another that encloses it fully, we keep everything
    let poly = make_polygon_3d(&[[-0.5, -0.5, 0.0], [0.5, -0.5, 0.0], [0.0, 0.5, 0.0]]);
    let node_a: Node<()> = Node::from_polygons(&[poly]);
    // Another polygon that fully encloses the above
    let big_poly = make_polygon_3d(&[
        [-1.0, -1.0, 0.0],
        [1.0, -1.0, 0.0],
        [1.0, 1.0, 0.0],
        [-1.0, 1.0, 0.0],
    ]);
    let node_b: Node<()> = Node::from_polygons(&[big_poly]);
    let node_a = node_a.clip_to(&node_b);
    // We expect nodeA's polygon to be present
    let all_a = node_a.all_polygons();
    assert_eq!(all_a.len(), 1);
}

#[test]
fn clip_to_opposite_facing_drops() {
    // the same triangle seen from behind counts as inside
    let poly = make_polygon_3d(&[[-0.5, -0.5, 0.0], [0.5, -0.5, 0.0], [0.0, 0.5, 0.0]]);
    let mut flipped = poly.clone();
    flipped.flip();

    let node_a: Node<()> = Node::from_polygons(&[flipped]);
    let node_b: Node<()> = Node::from_polygons(&[poly]);
    let node_a = node_a.clip_to(&node_b);
    assert!(node_a.all_polygons().is_empty());
    // the partition itself survives
    assert!(node_a.plane.is_some());
}

#[test]
fn all_polygons() {
    // Build a node with multiple polygons
    let poly1 = make_polygon_3d(&[[0., 0., 0.], [1., 0., 0.], [0., 1., 0.]]);
    let poly2 = make_polygon_3d(&[[0., 0., 1.], [1., 0., 1.], [0., 1., 1.]]);

    let node: Node<()> = Node::from_polygons(&[poly1.clone(), poly2.clone()]);
    let all_polys = node.all_polygons();
    // We expect to retrieve both polygons
    assert_eq!(all_polys.len(), 2);
    assert!(all_polys.contains(&poly1));
    assert!(all_polys.contains(&poly2));
    assert_eq!(node.into_polygons().len(), 2);
}

#[test]
fn explicit_ops_with_first_polygon_strategy() {
    let polys: Vec<_> = (0..4)
        .map(|i| {
            let z = i as Real;
            make_polygon_3d(&[[0., 0., z], [1., 0., z], [0., 1., z]])
        })
        .collect();

    let ops = SerialBspOps::with_strategy(FirstPolygonStrategy);
    let node = ops.build(Node::new(), polys.clone());
    // the first polygon (z=0) is the root, the rest lie in front of it
    assert_eq!(node.polygons, vec![polys[0].clone()]);
    assert!(node.back.is_none());
    assert_eq!(node.node_count(), 4);
    assert_eq!(ops.all_polygons(&node).len(), 4);
}

#[test]
fn tolerance_controls_coplanarity() {
    let base = make_polygon_3d(&[[0., 0., 0.], [1., 0., 0.], [0., 1., 0.]]);
    let raised = make_polygon_3d(&[[0., 0., 0.01], [1., 0., 0.01], [0., 1., 0.01]]);

    let loose = SerialBspOps::with_strategy(FirstPolygonStrategy).with_tolerance(0.1);
    let node = loose.build(Node::new(), vec![base.clone(), raised.clone()]);
    assert_eq!(node.polygons.len(), 2);
    assert_eq!(BspOps::<()>::epsilon(&loose), 0.1);

    let strict = SerialBspOps::with_strategy(FirstPolygonStrategy).with_tolerance(1e-6);
    let node = strict.build(Node::new(), vec![base, raised]);
    assert_eq!(node.polygons.len(), 1);
    assert!(node.front.is_some());
}

#[test]
fn non_planar_quad_stays_at_its_node() {
    // the last corner sits well beyond the tolerance above the plane of the first three
    let warped = make_polygon_3d(&[[0., 0., 0.], [1., 0., 0.], [1., 1., 0.], [0., 1., 0.01]]);
    let node: Node<()> = Node::from_polygons(&[warped.clone()]);
    assert_eq!(node.polygons, vec![warped.clone()]);
    assert_eq!(node.node_count(), 1);

    let ops = SerialBspOps::with_strategy(FirstPolygonStrategy);
    let node = ops.build(Node::new(), vec![warped.clone(), warped]);
    assert_eq!(node.polygons.len(), 2);
    assert_eq!(node.node_count(), 1);
}

/// Always proposes the same plane, whatever the polygons are.
struct FixedPlane(Plane);

impl SplittingPlaneStrategy for FixedPlane {
    fn pick_best_splitting_plane<S: Clone>(
        &self,
        _polygons: &[Polygon<S>],
        _epsilon: Real,
    ) -> Option<Plane> {
        Some(self.0.clone())
    }
}

#[test]
fn plane_that_separates_nothing_keeps_polygons() {
    // every triangle lies in front of z = -1, so that plane can never split them
    let polys: Vec<_> = (0..3)
        .map(|i| {
            let z = i as Real;
            make_polygon_3d(&[[0., 0., z], [1., 0., z], [0., 1., z]])
        })
        .collect();

    let ops = SerialBspOps::with_strategy(FixedPlane(Plane::from_normal(Vector3::z(), -1.0)));
    let node = ops.build(Node::new(), polys);
    assert_eq!(node.polygons.len(), 3);
    assert!(node.front.is_none());
    assert!(node.back.is_none());
}

#[test]
fn thin_spanning_sliver_is_split_or_dropped() {
    // long and only 1e-7 thick, crossing x = 0
    let sliver = make_polygon_3d(&[[-1., 0., 0.], [1., 0., 0.], [0., 1e-7, 0.]]);
    let divider = make_polygon_3d(&[[0., -1., -1.], [0., 1., -1.], [0., 1., 1.], [0., -1., 1.]]);

    let ops = SerialBspOps::with_strategy(FirstPolygonStrategy);
    let node = ops.build(Node::new(), vec![divider, sliver]);
    for poly in ops.all_polygons(&node) {
        assert!(poly.vertices.len() >= 3);
        assert!(poly.vertices.iter().all(|v| v.is_finite()));
    }

    let kept = node.clip_polygons(vec![make_polygon_3d(&[
        [-1., 0., 0.5],
        [1., 0., 0.5],
        [0., 1e-7, 0.5],
    ])]);
    assert!(kept.len() <= 2);
}
