//! Writing OpenSCAD scripts.
//!
//! Every solid becomes one module that contains a `polyhedron` statement
//! and is invoked right after its definition:
//!
//! ```text
//! module name() {
//! 	polyhedron(
//! 		points=[
//! 			[0.0, 0.0, 0.0],
//! 			[1.0, 0.0, 0.0],
//! 			[0.0, 1.0, 0.0]
//! 		],
//! 		faces=[
//! 			[0, 2, 1]
//! 		]
//! 	);
//! }
//!
//!
//! name();
//! ```

use std::fmt;


mod write;


pub use self::write::{module_name, Config, ModuleNames, Writer};


/// The keyword that introduces the face list of a `polyhedron`.
///
/// OpenSCAD versions before 2014.03 only understand `triangles`, newer ones
/// use `faces` and deprecate `triangles`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceKeyword {
    Faces,
    Triangles,
}

impl FaceKeyword {
    /// Returns `Triangles` if `legacy` is set, `Faces` otherwise.
    pub fn from_legacy(legacy: bool) -> Self {
        if legacy {
            FaceKeyword::Triangles
        } else {
            FaceKeyword::Faces
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FaceKeyword::Faces => "faces",
            FaceKeyword::Triangles => "triangles",
        }
    }
}

impl Default for FaceKeyword {
    fn default() -> Self {
        FaceKeyword::Faces
    }
}

impl fmt::Display for FaceKeyword {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
