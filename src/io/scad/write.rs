use std::{
    borrow::Cow,
    io::{self, Write},
};

use fxhash::FxHashSet;

use crate::{
    algo::bounding::BoundingBox,
    io::stl::DEFAULT_SOLID_NAME,
    math::Point3,
    mesh::PolyMesh,
};
use super::FaceKeyword;


// ===============================================================================================
// ===== SCAD Config
// ===============================================================================================

/// Used to configure and create a [`Writer`].
#[derive(Clone, Debug)]
pub struct Config {
    face_keyword: FaceKeyword,
    default_name: String,
}

impl Config {
    /// Creates a config that uses the `faces` keyword.
    pub fn new() -> Self {
        Self {
            face_keyword: FaceKeyword::Faces,
            default_name: DEFAULT_SOLID_NAME.into(),
        }
    }

    /// Creates a config for OpenSCAD versions before 2014.03 (`triangles`
    /// keyword).
    pub fn legacy() -> Self {
        Self::new().with_face_keyword(FaceKeyword::Triangles)
    }

    pub fn with_face_keyword(self, face_keyword: FaceKeyword) -> Self {
        Self {
            face_keyword,
            .. self
        }
    }

    /// Sets the module name used for solids with an empty name.
    pub fn with_default_name(self, name: impl Into<String>) -> Self {
        Self {
            default_name: name.into(),
            .. self
        }
    }

    /// Creates a [`Writer`] with `self` as config.
    pub fn into_writer<W: io::Write>(self, writer: W) -> Writer<W> {
        Writer::new(self, writer)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}


// ===============================================================================================
// ===== SCAD Writer
// ===============================================================================================

/// Writes solids as OpenSCAD modules into an `io::Write` instance.
///
/// Every module written by one `Writer` gets a distinct name (see
/// [`ModuleNames`]).
#[derive(Debug)]
pub struct Writer<W: io::Write> {
    config: Config,
    names: ModuleNames,
    writer: W,
}

impl<W: io::Write> Writer<W> {
    pub fn new(config: Config, writer: W) -> Self {
        let names = ModuleNames::new(config.default_name.clone());
        Self { config, names, writer }
    }

    /// Writes one module for the given solid, followed by the invocation of
    /// that module.
    ///
    /// If `bounding_box` is given, a cube with the extent of the box is
    /// added to the module. It is marked with the `%` modifier, so OpenSCAD
    /// only shows it in the preview and never renders it.
    pub fn write_solid(
        &mut self,
        name: &str,
        mesh: &PolyMesh,
        bounding_box: Option<&BoundingBox>,
    ) -> Result<(), io::Error> {
        let name = self.names.next(name);
        let w = &mut self.writer;

        writeln!(w, "module {}() {{", name)?;

        if let Some(bb) = bounding_box {
            let size = bb.size();
            write!(w, "\t%translate(")?;
            write_vec3(w, bb.min())?;
            write!(w, ") cube(")?;
            write_vec3(w, Point3::new(size.x, size.y, size.z))?;
            writeln!(w, ");")?;
        }

        writeln!(w, "\tpolyhedron(")?;

        writeln!(w, "\t\tpoints=[")?;
        write!(w, "\t\t\t")?;
        for (i, &p) in mesh.points.iter().enumerate() {
            if i != 0 {
                write!(w, ",\n\t\t\t")?;
            }
            write_vec3(w, p)?;
        }
        writeln!(w)?;
        writeln!(w, "\t\t],")?;

        writeln!(w, "\t\t{}=[", self.config.face_keyword)?;
        write!(w, "\t\t\t")?;
        for (i, face) in mesh.faces.iter().enumerate() {
            if i != 0 {
                write!(w, ",\n\t\t\t")?;
            }
            let [a, b, c] = face.indices();
            write!(w, "[{}, {}, {}]", a, b, c)?;
        }
        writeln!(w)?;
        writeln!(w, "\t\t]")?;

        writeln!(w, "\t);")?;
        writeln!(w, "}}")?;
        writeln!(w)?;
        writeln!(w)?;
        writeln!(w, "{}();", name)?;

        Ok(())
    }

    /// Returns the underlying `io::Write` instance.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Writes `[x, y, z]`.
///
/// Coordinates use the shortest representation that parses back to the
/// exact same `f64`.
fn write_vec3(w: &mut impl Write, p: Point3) -> Result<(), io::Error> {
    write!(w, "[{:?}, {:?}, {:?}]", p.x, p.y, p.z)
}

/// Keywords and the built-in modules and functions of OpenSCAD. A user module
/// with one of these names is either a syntax error or shadows the built-in
/// (`module cube() { cube(..); }` recurses).
const RESERVED_NAMES: &[&str] = &[
    // Keywords and constants
    "module", "function", "if", "else", "for", "let", "each", "assert", "echo",
    "true", "false", "undef", "include", "use", "children", "intersection_for",

    // Built-in modules
    "cube", "sphere", "cylinder", "polyhedron", "square", "circle", "polygon",
    "text", "import", "surface", "projection", "linear_extrude", "rotate_extrude",
    "translate", "rotate", "scale", "resize", "mirror", "multmatrix", "color",
    "offset", "hull", "minkowski", "union", "difference", "intersection",
    "render", "group",

    // Built-in functions
    "abs", "sign", "sin", "cos", "tan", "acos", "asin", "atan", "atan2", "floor",
    "round", "ceil", "ln", "log", "pow", "sqrt", "exp", "min", "max", "norm",
    "cross", "len", "concat", "lookup", "str", "chr", "ord", "search", "rands",
    "version", "version_num", "parent_module", "is_undef", "is_bool", "is_num",
    "is_string", "is_list", "is_function",
];

/// Turns a solid name into a valid OpenSCAD identifier.
///
/// Every character except ASCII letters, digits and `_` is replaced by `_`.
/// Names starting with a digit get a `_` prefix. Empty names are replaced by
/// `default`. Keywords and names of OpenSCAD built-ins (`cube`, `module`,
/// ...) get a `_` suffix.
///
/// Two different names can result in the same identifier; [`ModuleNames`]
/// takes care of that.
pub fn module_name<'a>(name: &'a str, default: &'a str) -> Cow<'a, str> {
    let is_ident_char = |c: char| c.is_ascii_alphanumeric() || c == '_';
    let starts_with_digit = |s: &str| s.chars().next().map_or(false, |c| c.is_ascii_digit());

    let name = if name.is_empty() { default } else { name };
    let mut out = if name.chars().all(is_ident_char) && !starts_with_digit(name) && !name.is_empty() {
        Cow::Borrowed(name)
    } else {
        let mut out: String = name.chars()
            .map(|c| if is_ident_char(c) { c } else { '_' })
            .collect();
        if out.is_empty() || starts_with_digit(&out) {
            out.insert(0, '_');
        }
        Cow::Owned(out)
    };

    if RESERVED_NAMES.contains(&&*out) {
        out.to_mut().push('_');
    }

    out
}

/// Hands out distinct module names for a sequence of solids.
///
/// Each name is first turned into an identifier with [`module_name`]. If that
/// identifier was already handed out, the first free `_1`, `_2`, ... suffix
/// is appended. OpenSCAD would otherwise use the last definition of a module
/// for all calls.
#[derive(Debug, Clone)]
pub struct ModuleNames {
    default_name: String,
    used: FxHashSet<String>,
}

impl ModuleNames {
    /// `default_name` is used for solids with an empty name.
    pub fn new(default_name: impl Into<String>) -> Self {
        Self {
            default_name: default_name.into(),
            used: FxHashSet::default(),
        }
    }

    /// Returns the module name for a solid called `name` and remembers it.
    pub fn next(&mut self, name: &str) -> String {
        let base = module_name(name, &self.default_name).into_owned();

        let mut candidate = base.clone();
        let mut counter = 1;
        while self.used.contains(&candidate) {
            candidate = format!("{}_{}", base, counter);
            counter += 1;
        }

        self.used.insert(candidate.clone());
        candidate
    }
}
