use byteorder::{LittleEndian, WriteBytesExt};
use cgmath::Vector3;
use failure::Error;

use crate::{
    io::parse,
    math::Point3,
    mesh::IndexedFace,
};
use super::{CounterSink, Encoding, RawResult, Reader, DEFAULT_SOLID_NAME};


/// Builds a binary STL file with the given triangles (zero normals).
fn binary_stl(header: &[u8], triangles: &[[[f32; 3]; 3]]) -> Vec<u8> {
    let mut out = header.to_vec();
    out.resize(80, b' ');
    out.write_u32::<LittleEndian>(triangles.len() as u32).unwrap();
    for triangle in triangles {
        for _ in 0..3 {
            out.write_f32::<LittleEndian>(0.0).unwrap();
        }
        for vertex in triangle {
            for &coord in vertex {
                out.write_f32::<LittleEndian>(coord).unwrap();
            }
        }
        out.write_u16::<LittleEndian>(0).unwrap();
    }

    out
}

fn p(x: f64, y: f64, z: f64) -> Point3 {
    Point3::new(x, y, z)
}


// ===========================================================================
// ===== Encoding detection
// ===========================================================================
#[test]
fn sniff() {
    assert_eq!(Encoding::sniff(b"solid"), Encoding::Ascii);
    assert_eq!(Encoding::sniff(b"solid cube\n"), Encoding::Ascii);
    assert_eq!(Encoding::sniff(b"solidworks binary header"), Encoding::Ascii);

    assert_eq!(Encoding::sniff(b""), Encoding::Binary);
    assert_eq!(Encoding::sniff(b"soli"), Encoding::Binary);
    assert_eq!(Encoding::sniff(b" solid"), Encoding::Binary);
    assert_eq!(Encoding::sniff(b"SOLID"), Encoding::Binary);
    assert_eq!(Encoding::sniff(&[0u8; 84]), Encoding::Binary);
}

#[test]
fn reader_uses_sniffed_encoding() {
    let ascii = include_bytes!("test_files/flat_ascii.stl");
    let binary = include_bytes!("test_files/flat_binary.stl");
    assert_eq!(Reader::new(ascii).encoding(), Encoding::Ascii);
    assert_eq!(Reader::new(binary).encoding(), Encoding::Binary);
}

#[test]
fn binary_with_solid_header_needs_explicit_encoding() -> Result<(), Error> {
    let data = binary_stl(b"solid but binary", &[
        [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
    ]);

    // The sniffing heuristic gets this wrong.
    assert_eq!(Reader::new(&data).encoding(), Encoding::Ascii);
    assert!(Reader::new(&data).read_raw().is_err());

    let res = Reader::with_encoding(&data, Encoding::Binary).read_raw()?;
    assert_eq!(res.solids.len(), 1);
    assert_eq!(res.solids[0].triangles.len(), 1);

    Ok(())
}

#[test]
fn encoding_from_str() {
    assert_eq!("ascii".parse::<Encoding>(), Ok(Encoding::Ascii));
    assert_eq!("binary".parse::<Encoding>(), Ok(Encoding::Binary));
    assert!("ble".parse::<Encoding>().is_err());
}


// ===========================================================================
// ===== Reading
// ===========================================================================
fn check_flat_data(res: &RawResult) {
    let triangles = &res.solids[0].triangles;
    assert_eq!(triangles.len(), 3);

    assert_eq!(triangles[0].vertices, [
        p(1.0, 0.0, 0.0),
        p(0.5, 0.5, 0.0),
        p(0.0, 0.0, 0.0),
    ]);
    assert_eq!(triangles[1].vertices, [
        p(0.0, 0.0, 0.0),
        p(0.5, 0.5, 0.0),
        p(0.0, 1.0, 0.0),
    ]);
    assert_eq!(triangles[2].vertices, [
        p(1.0, 0.0, 0.0),
        p(1.0, 1.0, 0.0),
        p(0.0, 1.0, 0.0),
    ]);
}

#[test]
fn read_flat_ascii() -> Result<(), Error> {
    let data = include_bytes!("test_files/flat_ascii.stl");
    let res = Reader::new(data).read_raw()?;

    assert_eq!(res.solids.len(), 1);
    assert_eq!(res.solids[0].name, "MYSOLID");
    assert_eq!(res.solids[0].triangles[0].normal, Vector3::new(0.0, 0.0, 1.0));
    check_flat_data(&res);

    Ok(())
}

#[test]
fn read_flat_binary() -> Result<(), Error> {
    let data = include_bytes!("test_files/flat_binary.stl");
    let res = Reader::new(data).read_raw()?;

    assert_eq!(res.solids.len(), 1);
    assert_eq!(res.solids[0].name, DEFAULT_SOLID_NAME);
    assert_eq!(res.solids[0].triangles[0].normal, Vector3::new(0.0, 0.0, 1.0));
    check_flat_data(&res);

    let res = Reader::new(data).default_name("flat").read_raw()?;
    assert_eq!(res.solids[0].name, "flat");

    Ok(())
}

#[test]
fn read_cube() -> Result<(), Error> {
    let ascii = include_bytes!("test_files/cube_ascii.stl");
    let binary = include_bytes!("test_files/cube_binary.stl");

    let from_ascii = Reader::new(ascii).read()?;
    let from_binary = Reader::new(binary).read()?;
    assert_eq!(from_ascii.len(), 1);
    assert_eq!(from_binary.len(), 1);
    assert_eq!(from_ascii[0].name, "cube");

    // Both encodings store exactly the same geometry.
    assert_eq!(from_ascii[0].mesh, from_binary[0].mesh);

    let mesh = &from_ascii[0].mesh;
    assert_eq!(mesh.points.len(), 8);
    assert_eq!(mesh.faces.len(), 12);
    for face in &mesh.faces {
        let [a, b, c] = face.indices();
        assert!(a != b && b != c && a != c, "degenerated face {:?}", face);
        assert!(a < 8 && b < 8 && c < 8);
    }

    // The very first triangle consists of three new points.
    assert_eq!(mesh.faces[0], IndexedFace([0, 2, 1]));

    Ok(())
}

#[test]
fn read_two_solids() -> Result<(), Error> {
    let data = include_bytes!("test_files/two_solids_ascii.stl");
    let res = Reader::new(data).read_raw()?;

    assert_eq!(res.solids.len(), 2);
    assert_eq!(res.solids[0].name, "first");
    assert_eq!(res.solids[0].triangles.len(), 1);
    assert_eq!(res.solids[1].name, "second part");
    assert_eq!(res.solids[1].triangles.len(), 2);
    assert_eq!(res.solids[1].triangles[1].vertices[2], p(0.0, 1.0, 0.0));

    Ok(())
}

#[test]
fn binary_single_triangle() -> Result<(), Error> {
    let data = binary_stl(b"anything", &[
        [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
    ]);
    assert_eq!(data.len(), 80 + 4 + 50);

    let res = Reader::new(&data).read_raw()?;
    assert_eq!(res.solids.len(), 1);
    assert_eq!(res.solids[0].triangles[0].vertices, [
        p(0.0, 0.0, 0.0),
        p(1.0, 0.0, 0.0),
        p(0.0, 1.0, 0.0),
    ]);

    let solids = res.build();
    assert_eq!(solids[0].mesh.points, vec![
        p(0.0, 0.0, 0.0),
        p(1.0, 0.0, 0.0),
        p(0.0, 1.0, 0.0),
    ]);
    assert_eq!(solids[0].mesh.faces, vec![IndexedFace([0, 2, 1])]);

    Ok(())
}

#[test]
fn binary_f32_values_are_kept_exactly() -> Result<(), Error> {
    let data = binary_stl(b"", &[
        [[0.1, 0.2, 0.3], [1.0e-7, -4.5, 3.0e8], [0.0, 1.0, 0.0]],
    ]);
    let res = Reader::new(&data).read_raw()?;
    let [a, b, _] = res.solids[0].triangles[0].vertices;

    assert_eq!(a, p(f64::from(0.1f32), f64::from(0.2f32), f64::from(0.3f32)));
    assert_eq!(b, p(f64::from(1.0e-7f32), -4.5, 3.0e8));

    Ok(())
}

#[test]
fn binary_empty() -> Result<(), Error> {
    let data = binary_stl(b"", &[]);
    let solids = Reader::new(&data).read()?;

    assert_eq!(solids.len(), 1);
    assert!(solids[0].mesh.points.is_empty());
    assert!(solids[0].mesh.faces.is_empty());

    Ok(())
}

#[test]
fn binary_trailing_data_is_ignored() -> Result<(), Error> {
    let mut data = binary_stl(b"", &[
        [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
    ]);
    data.extend_from_slice(&[0xff; 7]);

    let res = Reader::new(&data).read_raw()?;
    assert_eq!(res.solids[0].triangles.len(), 1);

    Ok(())
}

#[test]
fn read_ascii_crlf_and_empty_name() -> Result<(), Error> {
    let data = "solid \r\n\
        facet normal 0 0 1\r\n\
        outer loop\r\n\
        vertex 0 0 0\r\n\
        vertex 1 0 0\r\n\
        vertex 0 1 0\r\n\
        endloop\r\n\
        endfacet\r\n\
        endsolid\r\n";
    let res = Reader::new(data.as_bytes()).read_raw()?;

    assert_eq!(res.solids.len(), 1);
    assert_eq!(res.solids[0].name, "");
    assert_eq!(res.solids[0].triangles[0].vertices[1], p(1.0, 0.0, 0.0));

    Ok(())
}

#[test]
fn read_ascii_without_solids() -> Result<(), Error> {
    let res = Reader::new(b"solid").read_raw()?;
    assert!(res.solids.is_empty());

    let res = Reader::with_encoding(b"nothing to see here", Encoding::Ascii).read_raw()?;
    assert!(res.solids.is_empty());

    Ok(())
}

#[test]
fn read_ascii_solid_without_facets() -> Result<(), Error> {
    let solids = Reader::new(b"solid empty\nendsolid empty\n").read()?;

    assert_eq!(solids.len(), 1);
    assert_eq!(solids[0].name, "empty");
    assert!(solids[0].mesh.is_empty());

    Ok(())
}

#[test]
fn counter_sink() -> Result<(), Error> {
    let mut counter = CounterSink::new();
    Reader::new(include_bytes!("test_files/two_solids_ascii.stl")).read_raw_into(&mut counter)?;
    assert_eq!(counter.solid_count, 2);
    assert_eq!(counter.triangle_count, 3);

    let mut counter = CounterSink::new();
    Reader::new(include_bytes!("test_files/cube_binary.stl")).read_raw_into(&mut counter)?;
    assert_eq!(counter.solid_count, 1);
    assert_eq!(counter.triangle_count, 12);

    Ok(())
}


// ===========================================================================
// ===== Errors
// ===========================================================================
#[test]
fn binary_truncated() {
    let mut data = binary_stl(b"", &[
        [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
        [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]],
    ]);
    data.truncate(data.len() - 1);
    let len = data.len();

    assert_eq!(
        Reader::new(&data).read_raw(),
        Err(parse::Error::TruncatedTriangles { declared: 2, complete: 1, len }),
    );
}

#[test]
fn binary_huge_triangle_count() {
    let mut data = vec![0; 80];
    data.extend_from_slice(&[0xff, 0xff, 0xff, 0xff]);

    match Reader::new(&data).read_raw() {
        Err(parse::Error::TruncatedTriangles { declared, complete: 0, .. }) => {
            assert_eq!(declared, u32::max_value());
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn binary_header_too_short() {
    let data = vec![0; 82];
    assert_eq!(
        Reader::new(&data).read_raw(),
        Err(parse::Error::UnexpectedEof { offset: 82, missing: 2 }),
    );

    assert_eq!(
        Reader::new(b"").read_raw(),
        Err(parse::Error::UnexpectedEof { offset: 0, missing: 80 }),
    );
}

#[test]
fn ascii_facet_with_two_vertices() {
    let data = "solid bad\n\
        facet normal 0 0 1\n\
          outer loop\n\
            vertex 0 0 0\n\
            vertex 1 0 0\n\
            vertex 0 1 0\n\
          endloop\n\
        endfacet\n\
        facet normal 0 0 1\n\
          outer loop\n\
            vertex 0 0 0\n\
            vertex 1 0 0\n\
          endloop\n\
        endfacet\n\
        endsolid bad\n";

    match Reader::new(data.as_bytes()).read_raw() {
        Err(parse::Error::MalformedFacet { solid, solid_index, facet, vertices, span }) => {
            assert_eq!(solid, "bad");
            assert_eq!(solid_index, 0);
            assert_eq!(facet, 1);
            assert_eq!(vertices, 2);
            assert!(data[span.lo..span.hi].starts_with("facet normal"));
            assert!(data[span.lo..span.hi].ends_with("endfacet"));
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn ascii_facet_with_four_vertices() {
    let data = "solid a\nendsolid a\n\
        solid b\n\
        facet normal 0 0 1\n\
          outer loop\n\
            vertex 0 0 0\n\
            vertex 1 0 0\n\
            vertex 0 1 0\n\
            vertex 1 1 0\n\
          endloop\n\
        endfacet\n\
        endsolid b\n";

    match Reader::new(data.as_bytes()).read_raw() {
        Err(parse::Error::MalformedFacet { solid, solid_index, facet, vertices, .. }) => {
            assert_eq!(solid, "b");
            assert_eq!(solid_index, 1);
            assert_eq!(facet, 0);
            assert_eq!(vertices, 4);
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn ascii_facet_without_loop() {
    let data = "solid x\nfacet normal 0 0 1\nendfacet\nendsolid x\n";
    match Reader::new(data.as_bytes()).read_raw() {
        Err(parse::Error::MalformedFacet { vertices: 0, .. }) => {}
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn ascii_invalid_vertices() {
    fn facet_error(vertex_line: &str) -> parse::Error {
        let data = format!(
            "solid x\nfacet normal 0 0 1\nouter loop\n{}\nvertex 1 0 0\nvertex 0 1 0\n\
                endloop\nendfacet\nendsolid x\n",
            vertex_line,
        );
        Reader::new(data.as_bytes()).read_raw().unwrap_err()
    }

    match facet_error("vertex 0 zero 0") {
        parse::Error::Custom(msg, span) => {
            assert!(msg.contains("'zero'"), "{}", msg);
            assert_eq!(span.lo, "solid x\nfacet normal 0 0 1\nouter loop\n".len());
        }
        other => panic!("unexpected error: {:?}", other),
    }

    match facet_error("vertex 0 0") {
        parse::Error::Custom(msg, _) => assert!(msg.contains("found 2"), "{}", msg),
        other => panic!("unexpected error: {:?}", other),
    }

    match facet_error("  vertex 0 0 0 0") {
        parse::Error::Custom(msg, _) => assert!(msg.contains("found 4"), "{}", msg),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn non_finite_vertices() {
    let prefix = "solid x\nfacet normal 0 0 1\nouter loop\n";
    for line in &["vertex inf 0 0", "vertex 0 NaN 0", "vertex 0 0 -infinity"] {
        let data = format!(
            "{}{}\nvertex 1 0 0\nvertex 0 1 0\nendloop\nendfacet\nendsolid x\n",
            prefix,
            line,
        );
        match Reader::new(data.as_bytes()).read_raw() {
            Err(parse::Error::Custom(msg, span)) => {
                assert!(msg.contains("non-finite"), "{}", msg);
                assert_eq!(span.lo, prefix.len());
                assert_eq!(span.hi, prefix.len() + line.len());
            }
            other => panic!("unexpected result for '{}': {:?}", line, other),
        }
    }

    // Binary: the second triangle contains an infinite coordinate.
    let ok = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
    let bad = [[0.0, 0.0, 0.0], [1.0, std::f32::INFINITY, 0.0], [0.0, 1.0, 0.0]];
    let data = binary_stl(b"", &[ok, bad]);
    match Reader::new(&data).read_raw() {
        Err(parse::Error::Custom(msg, span)) => {
            assert!(msg.contains("non-finite"), "{}", msg);
            assert_eq!(span.lo, 84 + 50);
            assert_eq!(span.hi, 84 + 100);
        }
        other => panic!("unexpected result: {:?}", other),
    }

    let nan = [[std::f32::NAN, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
    assert!(Reader::new(&binary_stl(b"", &[nan])).read_raw().is_err());
}

#[test]
fn non_finite_normals_are_ignored() -> Result<(), Error> {
    let data = "solid x\nfacet normal nan inf 0\nouter loop\nvertex 0 0 0\nvertex 1 0 0\n\
        vertex 0 1 0\nendloop\nendfacet\nendsolid x\n";
    let res = Reader::new(data.as_bytes()).read_raw()?;
    assert_eq!(res.solids[0].triangles.len(), 1);
    Ok(())
}

#[test]
fn ascii_unterminated() {
    let data = b"solid x\nfacet normal 0 0 1\nouter loop\nvertex 0 0 0\n";
    match Reader::new(data).read_raw() {
        Err(parse::Error::Custom(msg, span)) => {
            assert!(msg.contains("endsolid"), "{}", msg);
            assert_eq!(span.lo, 0);
        }
        other => panic!("unexpected result: {:?}", other),
    }

    let data = b"solid x\nfacet normal 0 0 1\nouter loop\nvertex 0 0 0\nendsolid x\n";
    match Reader::new(data).read_raw() {
        Err(parse::Error::Custom(msg, _)) => assert!(msg.contains("endfacet"), "{}", msg),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn ascii_not_utf8() {
    let data = b"solid x\nfacet normal 0 0 1\n\xff\xfe";
    assert_eq!(
        Reader::new(data).read_raw(),
        Err(parse::Error::NotUtf8(27)),
    );
}
