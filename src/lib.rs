//! A fast, optionally multithreaded **Constructive Solid Geometry (CSG)** boolean engine,
//! built around Boolean operations (*union*, *difference*, *intersection*, *xor*) on sets of
//! polygons stored in [BSP](https://en.wikipedia.org/wiki/Binary_space_partitioning) trees.
//!
//! The engine takes the polygon list of each operand, partitions it into a tree of planes,
//! clips the trees against each other, and hands back a new polygon list. Per-polygon
//! metadata survives every split.
//!
//! # Features
//! #### Default
//! - **f64**: use f64 as Real
//! - **hashmap**: enables use of hashbrown for `is_manifold`
//!
//! #### Optional
//! - **f32**: use f32 as Real, this conflicts with f64
//! - **parallel**: use rayon for multithreading
//!
//! # Known limitations
//! Repeated unions of polygons sharing partial edges leave
//! [T-junctions](https://en.wikipedia.org/wiki/T-junction) in the output. The result is
//! still a closed surface geometrically, but an edge-matching manifold check may reject it.

#![forbid(unsafe_code)]
#![deny(unused)]
#![warn(clippy::missing_const_for_fn, clippy::approx_constant, clippy::all)]

pub mod errors;
pub mod float_types;
pub mod mesh;
pub mod traits;

#[cfg(any(
    all(feature = "f64", feature = "f32"),
    not(any(feature = "f64", feature = "f32"))
))]
compile_error!("Either 'f64' or 'f32' feature must be specified, but not both");

pub use mesh::Mesh;
pub use traits::CSG;
