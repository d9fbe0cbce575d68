use std::io;

use failure::Fail;

use crate::{
    algo::bounding::EmptyPointSet,
    io::parse,
};


/// Everything that can fail while converting an STL file.
#[derive(Debug, Fail)]
pub enum Error {
    /// The input is neither a well-formed ASCII nor binary STL file.
    #[fail(display = "invalid STL data: {}", _0)]
    Format(#[fail(cause)] parse::Error),

    /// No solid was found, but at least one was required.
    #[fail(display = "the input does not contain any solid")]
    EmptyInput,

    /// A bounding box was requested for a solid without any points.
    #[fail(display = "solid {} ('{}'): {}", index, name, cause)]
    Geometry {
        index: usize,
        name: String,
        #[fail(cause)]
        cause: EmptyPointSet,
    },

    #[fail(display = "IO error: {}", _0)]
    Io(#[fail(cause)] io::Error),
}

impl From<parse::Error> for Error {
    fn from(src: parse::Error) -> Self {
        Error::Format(src)
    }
}

impl From<io::Error> for Error {
    fn from(src: io::Error) -> Self {
        Error::Io(src)
    }
}
