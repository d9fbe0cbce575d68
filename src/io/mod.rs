//! Reading STL files and writing OpenSCAD files.

use std::path::{Path, PathBuf};


pub mod parse;
pub mod scad;
pub mod stl;



/// Returns the path of the OpenSCAD file belonging to the given STL file:
/// the same path with the extension replaced by `scad`.
pub fn scad_path_for(stl_path: impl AsRef<Path>) -> PathBuf {
    stl_path.as_ref().with_extension("scad")
}
