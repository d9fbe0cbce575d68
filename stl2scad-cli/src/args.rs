//! Defines `Args` which is used to parse command line arguments.

use structopt::StructOpt;
use stl2scad::{ConvertOptions, Encoding, FaceKeyword};


#[derive(StructOpt, Debug)]
#[structopt(raw(setting = "structopt::clap::AppSettings::VersionlessSubcommands"))]
pub struct Args {
    #[structopt(flatten)]
    pub global: GlobalArgs,

    #[structopt(subcommand)]
    pub command: Command,
}

#[derive(StructOpt, Debug)]
pub struct GlobalArgs {
    /// Print debug messages of the conversion to stderr. The log filter can
    /// also be set via the `RUST_LOG` environment variable.
    #[structopt(short = "-v", long = "--verbose")]
    pub verbose: bool,
}

#[derive(StructOpt, Debug)]
pub enum Command {
    /// Converts an STL file into an OpenSCAD script.
    #[structopt(name = "convert")]
    Convert {
        #[structopt(flatten)]
        args: ConvertArgs,
    },

    /// Prints information about the solids in an STL file.
    #[structopt(name = "info")]
    Info {
        #[structopt(flatten)]
        args: InfoArgs,
    },
}

/// Arguments that influence how the STL file is read.
#[derive(StructOpt, Debug)]
pub struct SourceArgs {
    /// Path to the source STL file (ASCII or binary).
    pub source: String,

    /// Explicitly specify the source encoding (otherwise it's guessed from
    /// the file start: files starting with `solid` are read as ASCII).
    /// Valid values: ascii, binary.
    #[structopt(short = "-e", long = "--encoding")]
    pub encoding: Option<Encoding>,

    /// Module name for solids without a name. Binary files never store a
    /// name.
    #[structopt(
        long = "--name",
        raw(default_value = "stl2scad::io::stl::DEFAULT_SOLID_NAME"),
    )]
    pub name: String,
}

impl SourceArgs {
    /// The library options that correspond to these arguments.
    pub fn options(&self) -> ConvertOptions {
        ConvertOptions {
            default_solid_name: self.name.clone(),
            encoding: self.encoding,
            ..ConvertOptions::default()
        }
    }
}

#[derive(StructOpt, Debug)]
pub struct ConvertArgs {
    #[structopt(flatten)]
    pub source: SourceArgs,

    /// Path to the target OpenSCAD file. If not specified, the source path
    /// with the extension replaced by `scad` is used. An existing file is
    /// overwritten.
    #[structopt(short = "-o", long = "--output")]
    pub target: Option<String>,

    /// If set, each module also contains a cube with the bounding box of the
    /// solid. It is only shown in the OpenSCAD preview (`%` modifier).
    #[structopt(long = "--bbox")]
    pub bbox: bool,

    /// If set, the face list is introduced with `triangles` instead of
    /// `faces`. Required for OpenSCAD versions before 2014.03.
    #[structopt(long = "--legacy")]
    pub legacy: bool,

    /// If set, a source file without any solid results in an empty script
    /// instead of an error.
    #[structopt(long = "--allow-empty")]
    pub allow_empty: bool,
}

impl ConvertArgs {
    pub fn options(&self) -> ConvertOptions {
        ConvertOptions {
            include_bounding_box: self.bbox,
            face_keyword: FaceKeyword::from_legacy(self.legacy),
            require_solid: !self.allow_empty,
            ..self.source.options()
        }
    }
}

#[derive(StructOpt, Debug)]
pub struct InfoArgs {
    #[structopt(flatten)]
    pub source: SourceArgs,
}
