//! Reading ASCII and binary STL files.
//!
//! STL files come in two encodings which are described below. A file only
//! stores a list of triangles; see [`crate::mesh::MeshBuilder`] for how those
//! are turned into an indexed mesh.
//!
//! # ASCII
//!
//! ```text
//! solid name
//!   facet normal 0.0 0.0 1.0
//!     outer loop
//!       vertex 1.0 0.0 0.0
//!       vertex 0.0 1.0 0.0
//!       vertex 0.0 0.0 0.0
//!     endloop
//!   endfacet
//! endsolid name
//! ```
//!
//! A single file may contain several `solid ... endsolid` blocks. Each of
//! them is read as its own solid.
//!
//! # Binary
//!
//! An 80 byte header without any meaning, followed by the number of triangles
//! as `u32`. Each triangle is stored in 50 bytes: the normal and the three
//! vertex positions as `f32` triples, plus a 2 byte "attribute byte count".
//! All numbers are little endian. Binary files don't store a solid name.

use std::{fmt, str::FromStr};


mod read;

#[cfg(test)]
mod tests;

pub use self::read::{CounterSink, RawResult, Reader, Sink};


/// The name used for solids that don't have one (i.e. for all binary files).
pub const DEFAULT_SOLID_NAME: &str = "stl2scad";

/// The two encodings of STL files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Ascii,
    Binary,
}

impl Encoding {
    /// Guesses the encoding from the start of the file.
    ///
    /// This is a heuristic: every file that starts with `solid` is treated as
    /// ASCII, everything else is treated as binary. Binary files are free to
    /// put anything into their 80 byte header, so a binary file whose header
    /// starts with `solid` is misclassified. In that case the encoding has to
    /// be specified explicitly (see [`Reader::with_encoding`]).
    pub fn sniff(data: &[u8]) -> Self {
        if data.starts_with(b"solid") {
            Encoding::Ascii
        } else {
            Encoding::Binary
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            Encoding::Ascii => "ASCII",
            Encoding::Binary => "binary",
        };
        f.write_str(s)
    }
}

impl FromStr for Encoding {
    type Err = String;
    fn from_str(src: &str) -> Result<Self, Self::Err> {
        match src {
            "ascii" => Ok(Encoding::Ascii),
            "binary" => Ok(Encoding::Binary),
            other => Err(format!(
                "'{}' is not a valid STL encoding (possible values: 'ascii', 'binary')",
                other,
            )),
        }
    }
}
