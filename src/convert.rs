//! The whole STL → OpenSCAD pipeline.

use std::io::{self, Write};

use boolinator::Boolinator;
use log::debug;

use crate::{
    algo::bounding::BoundingBox,
    error::Error,
    io::{
        scad::{self, FaceKeyword},
        stl::{self, Encoding},
    },
    mesh::Solid,
};


/// Used to configure [`convert`] and [`read_solids`].
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Whether to add a (non-rendered) reference cube with the bounding box
    /// of each solid. *Default*: `false`.
    pub include_bounding_box: bool,

    /// The keyword for the face list. *Default*: `FaceKeyword::Faces`; use
    /// `FaceKeyword::Triangles` for OpenSCAD versions before 2014.03.
    pub face_keyword: FaceKeyword,

    /// Name of solids that don't have a name (binary files never have one).
    /// *Default*: [`stl::DEFAULT_SOLID_NAME`].
    pub default_solid_name: String,

    /// If `true`, an input without any solid is an error
    /// ([`Error::EmptyInput`]). Otherwise, such an input results in an empty
    /// script. *Default*: `true`.
    pub require_solid: bool,

    /// Forces the STL encoding. If `None`, the encoding is guessed with
    /// [`Encoding::sniff`]. *Default*: `None`.
    pub encoding: Option<Encoding>,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            include_bounding_box: false,
            face_keyword: FaceKeyword::Faces,
            default_solid_name: stl::DEFAULT_SOLID_NAME.to_string(),
            require_solid: true,
            encoding: None,
        }
    }
}

/// Decodes the STL data and unifies the vertices of every solid.
pub fn read_solids(data: &[u8], options: &ConvertOptions) -> Result<Vec<Solid>, Error> {
    let encoding = options.encoding.unwrap_or_else(|| Encoding::sniff(data));
    debug!("reading {} bytes as {} STL", data.len(), encoding);

    let solids = stl::Reader::with_encoding(data, encoding)
        .default_name(options.default_solid_name.clone())
        .read()?;

    if solids.is_empty() && options.require_solid {
        return Err(Error::EmptyInput);
    }

    Ok(solids)
}

/// Computes the bounding boxes of all solids if they were requested. An
/// empty solid results in [`Error::Geometry`].
fn bounding_boxes(
    solids: &[Solid],
    options: &ConvertOptions,
) -> Result<Vec<Option<BoundingBox>>, Error> {
    solids.iter()
        .enumerate()
        .map(|(index, solid)| {
            options.include_bounding_box
                .as_some_from(|| solid.mesh.bounding_box())
                .transpose()
                .map_err(|cause| Error::Geometry {
                    index,
                    name: solid.name.clone(),
                    cause,
                })
        })
        .collect()
}

/// Writes all solids as OpenSCAD modules into `writer`.
///
/// All bounding boxes are computed before anything is written, so a
/// [`Error::Geometry`] never leaves a partially written script behind. IO
/// errors may still do that; use [`convert`] to write into memory first.
pub fn write_scad(
    solids: &[Solid],
    options: &ConvertOptions,
    writer: impl Write,
) -> Result<(), Error> {
    let boxes = bounding_boxes(solids, options)?;

    let mut writer = scad::Config::new()
        .with_face_keyword(options.face_keyword)
        .with_default_name(options.default_solid_name.clone())
        .into_writer(writer);

    for (solid, bb) in solids.iter().zip(&boxes) {
        writer.write_solid(&solid.name, &solid.mesh, bb.as_ref())?;
    }

    Ok(())
}

/// Converts the given STL data (ASCII or binary) to an OpenSCAD script.
///
/// Either every solid is converted successfully or no output is produced at
/// all.
pub fn convert(data: &[u8], options: &ConvertOptions) -> Result<String, Error> {
    let solids = read_solids(data, options)?;

    let mut out = Vec::new();
    write_scad(&solids, options, &mut out)?;

    String::from_utf8(out)
        .map_err(|e| Error::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
}
