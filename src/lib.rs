//! Converts STL meshes into OpenSCAD scripts.
//!
//! Both STL encodings (ASCII and binary) are supported. Vertices that are
//! shared by adjacent triangles are unified, so that each solid becomes an
//! indexed `polyhedron` with a list of unique points and one index triple
//! per face.
//!
//! ```
//! use stl2scad::{convert, ConvertOptions};
//!
//! let stl = b"solid tri
//!   facet normal 0 0 1
//!     outer loop
//!       vertex 0 0 0
//!       vertex 1 0 0
//!       vertex 0 1 0
//!     endloop
//!   endfacet
//! endsolid tri
//! ";
//!
//! let scad = convert(stl, &ConvertOptions::default()).unwrap();
//! assert!(scad.starts_with("module tri() {"));
//! assert!(scad.contains("[0, 2, 1]"));
//! ```

pub mod algo;
pub mod convert;
mod error;
pub mod io;
pub mod math;
pub mod mesh;

pub use self::{
    convert::{convert, read_solids, write_scad, ConvertOptions},
    error::Error,
    io::{scad::FaceKeyword, stl::Encoding},
    math::Point3,
    mesh::{IndexedFace, PolyMesh, Solid},
};
