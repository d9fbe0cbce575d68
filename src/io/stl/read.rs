use std::mem;

use byteorder::{ByteOrder, LittleEndian};
use log::{debug, warn};

use crate::{
    io::parse::{self, Bytes, Error, Span},
    math::Point3,
    mesh::{MeshBuilder, RawSolid, Solid, Triangle},
};
use super::{DEFAULT_SOLID_NAME, Encoding};


/// Size of the binary header, which is skipped.
const HEADER_LEN: usize = 80;

/// Size of one triangle in binary files: normal and three vertices (each
/// three `f32`) and the 2 byte attribute count.
const TRIANGLE_LEN: usize = 4 * 3 * 4 + 2;


/// A reader able to read ASCII and binary STL files from a byte buffer.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    data: &'a [u8],
    encoding: Encoding,
    default_name: String,
}

impl<'a> Reader<'a> {
    /// Creates a new `Reader`. The encoding is guessed from the first bytes
    /// with [`Encoding::sniff`].
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_encoding(data, Encoding::sniff(data))
    }

    /// Creates a new `Reader` that reads the data with the given encoding,
    /// regardless of what the data looks like.
    pub fn with_encoding(data: &'a [u8], encoding: Encoding) -> Self {
        Self {
            data,
            encoding,
            default_name: DEFAULT_SOLID_NAME.to_string(),
        }
    }

    /// Sets the name of the solid in binary files, which don't store a name.
    /// *Default*: [`DEFAULT_SOLID_NAME`].
    pub fn default_name(mut self, name: impl Into<String>) -> Self {
        self.default_name = name.into();
        self
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Reads all solids and unifies their vertices.
    pub fn read(&self) -> Result<Vec<Solid>, Error> {
        let mut sink = BuildingSink::default();
        self.read_raw_into(&mut sink)?;
        Ok(sink.solids)
    }

    /// Reads the whole file into a [`RawResult`]. No vertices are unified.
    pub fn read_raw(&self) -> Result<RawResult, Error> {
        let mut out = RawResult::new();
        self.read_raw_into(&mut out)?;
        Ok(out)
    }

    /// Reads the whole file into the given sink.
    ///
    /// If an error is returned, the sink may have received some solids and
    /// triangles already.
    pub fn read_raw_into(&self, sink: &mut impl Sink) -> Result<(), Error> {
        match self.encoding {
            Encoding::Ascii => self.read_ascii(sink),
            Encoding::Binary => self.read_binary(sink),
        }
    }

    fn read_binary(&self, sink: &mut impl Sink) -> Result<(), Error> {
        let mut buf = Bytes::new(self.data);

        // The header has no significance, it is skipped without looking at
        // it.
        buf.skip(HEADER_LEN)?;

        // Stored next is the number of triangles.
        let num_triangles = parse::u32_le(&mut buf)?;

        // We check the length up front to not allocate space for a huge
        // number of triangles that aren't actually stored.
        let complete = buf.remaining() / TRIANGLE_LEN;
        if u64::from(num_triangles) > complete as u64 {
            return Err(Error::TruncatedTriangles {
                declared: num_triangles,
                complete,
                len: self.data.len(),
            });
        }

        debug!("binary STL with {} triangles", num_triangles);
        sink.solid_start(&self.default_name);
        sink.num_triangles(num_triangles);

        for _ in 0..num_triangles {
            let offset = buf.offset();
            let triangle = buf.with_bytes(TRIANGLE_LEN, |data| {
                /// Reads three consecutive `f32`s.
                fn vec3(data: &[u8]) -> [f32; 3] {
                    [
                        LittleEndian::read_f32(&data[0..]),
                        LittleEndian::read_f32(&data[4..]),
                        LittleEndian::read_f32(&data[8..]),
                    ]
                }

                // The last two bytes (attribute byte count) are ignored.
                let triangle = Triangle::from_raw(
                    vec3(&data[0..]),
                    [vec3(&data[12..]), vec3(&data[24..]), vec3(&data[36..])],
                );

                let span = Span::new(offset, offset + TRIANGLE_LEN);
                for &v in &triangle.vertices {
                    check_finite(v, span)?;
                }
                Ok(triangle)
            })?;

            sink.triangle(triangle);
        }

        sink.solid_end();

        if buf.remaining() > 0 {
            warn!(
                "ignoring {} bytes of trailing data (at {}) after {} triangles",
                buf.remaining(),
                buf.offset(),
                num_triangles,
            );
        }

        Ok(())
    }

    fn read_ascii(&self, sink: &mut impl Sink) -> Result<(), Error> {
        let text = std::str::from_utf8(self.data)
            .map_err(|e| Error::NotUtf8(e.valid_up_to()))?;

        let mut num_solids = 0;
        let solids = Regions::new(text, 0, &["solid"], true, "endsolid");
        for (solid_index, solid) in solids.enumerate() {
            let solid = solid?;
            // The name is the rest of the `solid` line. Facets are only
            // searched after that line.
            let name_len = solid.body.find('\n').unwrap_or(solid.body.len());
            let name = solid.body[..name_len].trim();
            let facet_text = &solid.body[name_len..];
            debug!("found ASCII solid '{}' at {}", name, solid.span);
            sink.solid_start(name);

            let mut num_facets = 0;
            let facets = Regions::new(
                facet_text,
                solid.body_offset + name_len,
                &["facet"],
                true,
                "endfacet",
            );
            for (facet_index, facet) in facets.enumerate() {
                let facet = facet?;
                let triangle = parse_facet(&facet).map_err(|e| match e {
                    FacetError::VertexCount(vertices) => Error::MalformedFacet {
                        solid: name.to_string(),
                        solid_index,
                        facet: facet_index,
                        vertices,
                        span: facet.span,
                    },
                    FacetError::Other(e) => e,
                })?;

                sink.triangle(triangle);
                num_facets += 1;
            }

            if num_facets == 0 {
                warn!("ASCII solid '{}' does not contain any facets", name);
            }

            sink.solid_end();
            num_solids += 1;
        }

        if num_solids == 0 {
            debug!("no 'solid ... endsolid' block found in ASCII STL data");
        }

        Ok(())
    }
}


// ===========================================================================
// ===== ASCII helpers
// ===========================================================================

/// A region of the ASCII input that starts with some keyword(s) and ends with
/// a closing keyword.
#[derive(Debug, Clone, Copy)]
struct Region<'a> {
    /// Everything after the opening keywords and before the closing keyword.
    body: &'a str,

    /// Absolute offset of `body`.
    body_offset: usize,

    /// Absolute span of the whole region, including the keywords.
    span: Span,
}

/// Iterator over all non-overlapping regions that start with the `open`
/// keywords and end with the `close` keyword.
///
/// Consecutive opening keywords are separated by at least one whitespace
/// character (`outer loop` matches `outer   loop`). If `trailing_ws` is set,
/// the last opening keyword also has to be followed by whitespace (so that
/// `solid` matches `solid name`, but not `solidname`). The region ends at the
/// first occurence of `close` after the opening keywords. If there is none,
/// an error is yielded and the iteration stops.
struct Regions<'a> {
    text: &'a str,
    base: usize,
    pos: usize,
    open: &'static [&'static str],
    trailing_ws: bool,
    close: &'static str,
}

impl<'a> Regions<'a> {
    fn new(
        text: &'a str,
        base: usize,
        open: &'static [&'static str],
        trailing_ws: bool,
        close: &'static str,
    ) -> Self {
        Self { text, base, pos: 0, open, trailing_ws, close }
    }

    /// Checks if the opening keywords start at `start` and returns the
    /// offset right after the last one.
    fn match_open(&self, start: usize) -> Option<usize> {
        let mut pos = start;
        for (i, keyword) in self.open.iter().enumerate() {
            if !self.text[pos..].starts_with(keyword) {
                return None;
            }
            pos += keyword.len();

            let rest = &self.text[pos..];
            let ws_len = rest.len() - rest.trim_start().len();
            let is_last = i == self.open.len() - 1;
            if ws_len == 0 && (!is_last || self.trailing_ws) {
                return None;
            }
            if !is_last {
                pos += ws_len;
            }
        }

        Some(pos)
    }
}

impl<'a> Iterator for Regions<'a> {
    type Item = Result<Region<'a>, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.pos >= self.text.len() {
                return None;
            }
            let start = self.pos + self.text[self.pos..].find(self.open[0])?;

            let body_start = match self.match_open(start) {
                Some(body_start) => body_start,
                None => {
                    // All keywords are ASCII, so `start + 1` is a char
                    // boundary.
                    self.pos = start + 1;
                    continue;
                }
            };

            let body_end = match self.text[body_start..].find(self.close) {
                Some(len) => body_start + len,
                None => {
                    self.pos = self.text.len();
                    let msg = format!("'{}' without closing '{}'", self.open.join(" "), self.close);
                    let span = Span::new(self.base + start, self.base + self.text.len());
                    return Some(Err(Error::Custom(msg, span)));
                }
            };
            let end = body_end + self.close.len();
            self.pos = end;

            return Some(Ok(Region {
                body: &self.text[body_start..body_end],
                body_offset: self.base + body_start,
                span: Span::new(self.base + start, self.base + end),
            }));
        }
    }
}

enum FacetError {
    VertexCount(usize),
    Other(Error),
}

impl From<Error> for FacetError {
    fn from(src: Error) -> Self {
        FacetError::Other(src)
    }
}

/// Parses the body of one `facet ... endfacet` region into a triangle.
fn parse_facet(facet: &Region<'_>) -> Result<Triangle, FacetError> {
    // The first line is `normal nx ny nz`. Normals are never validated, so
    // we don't complain about malformed ones.
    let normal = facet.body.lines().next()
        .and_then(|line| {
            let mut tokens = line.split_whitespace();
            if tokens.next() != Some("normal") {
                return None;
            }

            let coords = tokens.map(|t| t.parse::<f64>().ok()).collect::<Option<Vec<_>>>()?;
            match coords.as_slice() {
                &[x, y, z] => Some([x, y, z]),
                _ => None,
            }
        })
        .unwrap_or([0.0; 3]);

    let mut vertices = Vec::with_capacity(3);
    let loops = Regions::new(facet.body, facet.body_offset, &["outer", "loop"], false, "endloop");
    for outer_loop in loops {
        let outer_loop = outer_loop?;
        for (offset, line) in lines_with_offsets(outer_loop.body, outer_loop.body_offset) {
            let mut tokens = line.split_whitespace();
            if tokens.next() != Some("vertex") {
                continue;
            }

            vertices.push(parse_vertex(tokens, Span::new(offset, offset + line.len()))?);
        }
    }

    match vertices.as_slice() {
        &[a, b, c] => Ok(Triangle::from_raw(normal, [a, b, c])),
        other => Err(FacetError::VertexCount(other.len())),
    }
}

/// Parses the three coordinates after the `vertex` keyword.
fn parse_vertex<'a>(
    tokens: impl Iterator<Item = &'a str>,
    span: Span,
) -> Result<Point3, Error> {
    let coords = tokens
        .map(|t| {
            t.parse::<f64>()
                .map_err(|e| Error::Custom(format!("invalid float literal '{}': {}", t, e), span))
        })
        .collect::<Result<Vec<_>, _>>()?;

    match coords.as_slice() {
        &[x, y, z] => check_finite(Point3::new(x, y, z), span),
        other => Err(Error::Custom(
            format!("expected 3 coordinates after 'vertex', found {}", other.len()),
            span,
        )),
    }
}

/// OpenSCAD has no literal for infinity or NaN, so such vertices can't be
/// written.
fn check_finite(p: Point3, span: Span) -> Result<Point3, Error> {
    if p.x.is_finite() && p.y.is_finite() && p.z.is_finite() {
        Ok(p)
    } else {
        Err(Error::Custom(format!("non-finite vertex coordinate in {:?}", p), span))
    }
}

/// Iterates over all lines of `text`, each with its absolute offset.
fn lines_with_offsets(text: &str, base: usize) -> impl Iterator<Item = (usize, &str)> + '_ {
    text.split('\n').scan(base, |offset, line| {
        let start = *offset;
        *offset += line.len() + 1;
        Some((start, line))
    })
}


// ===========================================================================
// ===== Sinks
// ===========================================================================

/// A sink can accept data from an STL file. This is mainly used for
/// [`Reader::read_raw_into`].
///
/// For every solid, `solid_start` is called once, then `triangle` for each
/// of its triangles and finally `solid_end`.
pub trait Sink {
    /// Is called when a solid starts. For binary files, `name` is the default
    /// name of the reader.
    fn solid_start(&mut self, name: &str);

    /// Only called for binary files, right after `solid_start`, with the
    /// number of triangles stored in the file.
    fn num_triangles(&mut self, _num: u32) {}

    /// Is called for each triangle that is read from the file.
    fn triangle(&mut self, triangle: Triangle);

    fn solid_end(&mut self) {}
}

/// Holds the raw data from an STL file.
///
/// To obtain a `RawResult`, call [`Reader::read_raw`].
#[derive(Debug, Clone, PartialEq)]
pub struct RawResult {
    /// All solids in the order they appear in the file.
    pub solids: Vec<RawSolid>,
}

impl RawResult {
    fn new() -> Self {
        Self { solids: Vec::new() }
    }

    fn current(&mut self) -> &mut RawSolid {
        if self.solids.is_empty() {
            self.solids.push(RawSolid::new(""));
        }
        let last = self.solids.len() - 1;
        &mut self.solids[last]
    }

    /// Unifies the vertices of all solids.
    pub fn build(&self) -> Vec<Solid> {
        self.solids.iter().map(RawSolid::build).collect()
    }
}

impl Sink for RawResult {
    fn solid_start(&mut self, name: &str) {
        self.solids.push(RawSolid::new(name));
    }

    fn num_triangles(&mut self, num: u32) {
        self.current().triangles.reserve(num as usize);
    }

    fn triangle(&mut self, triangle: Triangle) {
        self.current().triangles.push(triangle);
    }
}

/// A sink that only counts solids and triangles.
#[derive(Debug, Default)]
pub struct CounterSink {
    pub solid_count: u32,
    pub triangle_count: u64,
}

impl CounterSink {
    /// Returns an instance with 0 solids and 0 triangles.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Sink for CounterSink {
    fn solid_start(&mut self, _: &str) {
        self.solid_count += 1;
    }

    fn triangle(&mut self, _: Triangle) {
        self.triangle_count += 1;
    }
}

/// Unifies vertices while reading, without storing the raw triangles.
#[derive(Debug, Default)]
struct BuildingSink {
    solids: Vec<Solid>,
    name: String,
    builder: MeshBuilder,
}

impl Sink for BuildingSink {
    fn solid_start(&mut self, name: &str) {
        self.name = name.to_string();
        self.builder = MeshBuilder::new();
    }

    fn num_triangles(&mut self, num: u32) {
        self.builder = MeshBuilder::with_capacity(num as usize);
    }

    fn triangle(&mut self, triangle: Triangle) {
        self.builder.add_triangle(triangle.vertices);
    }

    fn solid_end(&mut self) {
        let mesh = mem::take(&mut self.builder).finish();
        debug!(
            "solid '{}': {} unique points, {} faces",
            self.name,
            mesh.points.len(),
            mesh.faces.len(),
        );
        self.solids.push(Solid {
            name: mem::take(&mut self.name),
            mesh,
        });
    }
}
