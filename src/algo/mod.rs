//! Algorithms on point sets and meshes.

pub mod bounding;
