use std::fmt;

use failure::Fail;



/// A cursor over an in-memory byte buffer.
///
/// All reads are bounds checked and report the absolute offset in case the
/// buffer ends too early.
#[derive(Debug, Clone)]
pub(crate) struct Bytes<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> Bytes<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    /// The absolute offset of the next byte that will be read.
    pub(crate) fn offset(&self) -> usize {
        self.offset
    }

    /// Number of bytes that were not consumed yet.
    pub(crate) fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    fn prepare(&self, num_bytes: usize) -> Result<(), Error> {
        if self.remaining() < num_bytes {
            Err(Error::UnexpectedEof {
                offset: self.data.len(),
                missing: num_bytes - self.remaining(),
            })
        } else {
            Ok(())
        }
    }

    pub(crate) fn skip(&mut self, num_bytes: usize) -> Result<(), Error> {
        self.prepare(num_bytes)?;
        self.offset += num_bytes;

        Ok(())
    }

    pub(crate) fn with_bytes<F, O>(&mut self, num_bytes: usize, func: F) -> Result<O, Error>
    where
        F: FnOnce(&'a [u8]) -> Result<O, Error>,
    {
        self.prepare(num_bytes)?;
        let out = func(&self.data[self.offset..self.offset + num_bytes])?;
        self.offset += num_bytes;

        Ok(out)
    }
}

/// A range of byte offsets into the parsed input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Span {
    pub lo: usize,
    pub hi: usize,
}

impl Span {
    pub fn new(lo: usize, hi: usize) -> Self {
        Self { lo, hi }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}..{}", self.lo, self.hi)
    }
}

/// Everything that can go wrong while decoding an STL file.
#[derive(Debug, Fail, PartialEq)]
pub enum Error {
    #[fail(
        display = "unexpected EOF while parsing (at {}, {} more bytes needed)",
        offset,
        missing
    )]
    UnexpectedEof {
        offset: usize,
        missing: usize,
    },

    #[fail(
        display = "binary STL declares {} triangles, but the data ends after {} complete \
            triangles (file is {} bytes long)",
        declared,
        complete,
        len
    )]
    TruncatedTriangles {
        declared: u32,
        complete: usize,
        len: usize,
    },

    #[fail(display = "invalid UTF-8 data at {} in ASCII STL file", _0)]
    NotUtf8(usize),

    #[fail(
        display = "facet {} of solid {} ('{}') has {} vertices instead of 3 (at {})",
        facet,
        solid_index,
        solid,
        vertices,
        span
    )]
    MalformedFacet {
        solid: String,
        solid_index: usize,
        facet: usize,
        vertices: usize,
        span: Span,
    },

    #[fail(display = "{} (at {})", _0, _1)]
    Custom(String, Span),
}

impl Error {
    /// The byte range of the input this error refers to, if that's known.
    pub fn span(&self) -> Option<Span> {
        match self {
            Error::UnexpectedEof { offset, .. } => Some(Span::new(*offset, *offset)),
            Error::TruncatedTriangles { len, .. } => Some(Span::new(*len, *len)),
            Error::NotUtf8(at) => Some(Span::new(*at, *at + 1)),
            Error::MalformedFacet { span, .. } => Some(*span),
            Error::Custom(_, span) => Some(*span),
        }
    }
}


pub(crate) fn u32_le(input: &mut Bytes<'_>) -> Result<u32, Error> {
    use byteorder::{ByteOrder, LittleEndian};
    input.with_bytes(4, |data| Ok(LittleEndian::read_u32(data)))
}
