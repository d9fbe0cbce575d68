//! Raw and indexed triangle meshes.
//!
//! An STL file is a plain list of triangles, each storing the positions of
//! its three vertices. Adjacent triangles therefore repeat shared positions.
//! [`MeshBuilder`] unifies those repeated positions and turns the triangle
//! soup into an indexed mesh ([`PolyMesh`]): a list of unique points plus one
//! index triple per triangle.

use cgmath::Vector3;
use derive_more::From;
use fxhash::FxHashMap;
use ordered_float::OrderedFloat;

use crate::{
    algo::bounding::{BoundingBox, EmptyPointSet},
    math::{Point3, Pos3Like},
};




/// One raw triangle from an STL file, before vertex unification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// The face normal as declared in the file. It is never validated nor
    /// written anywhere.
    pub normal: Vector3<f64>,

    /// The three vertex positions in the order they appear in the file.
    pub vertices: [Point3; 3],
}

impl Triangle {
    /// Creates a triangle with a zero normal.
    pub fn new(vertices: [Point3; 3]) -> Self {
        Self {
            normal: Vector3::new(0.0, 0.0, 0.0),
            vertices,
        }
    }

    /// Creates a triangle from anything position-like (e.g. the `[f32; 3]`
    /// arrays of binary STL files).
    pub fn from_raw<P: Pos3Like, N: Pos3Like>(normal: N, vertices: [P; 3]) -> Self {
        let [a, b, c] = vertices;
        Self {
            normal: Vector3::new(normal.x(), normal.y(), normal.z()),
            vertices: [a.to_point3(), b.to_point3(), c.to_point3()],
        }
    }
}

/// A face of an indexed mesh: three indices into the point list of the
/// [`PolyMesh`] it belongs to.
///
/// The order already follows the OpenSCAD convention (see
/// [`MeshBuilder::add_triangle`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, From)]
pub struct IndexedFace(pub [usize; 3]);

impl IndexedFace {
    pub fn indices(&self) -> [usize; 3] {
        self.0
    }
}

/// An indexed triangle mesh.
///
/// No two entries of `points` are equal and every index of every face is
/// smaller than `points.len()`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PolyMesh {
    pub points: Vec<Point3>,
    pub faces: Vec<IndexedFace>,
}

impl PolyMesh {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty() && self.faces.is_empty()
    }

    /// Returns the axis aligned bounding box of all points, or an error if
    /// the mesh has no points.
    pub fn bounding_box(&self) -> Result<BoundingBox, EmptyPointSet> {
        BoundingBox::around(&self.points)
    }
}

/// A solid as read from the file: its name and all of its triangles.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSolid {
    pub name: String,
    pub triangles: Vec<Triangle>,
}

impl RawSolid {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            triangles: Vec::new(),
        }
    }

    /// Unifies the vertices of all triangles and returns the indexed solid.
    pub fn build(&self) -> Solid {
        Solid {
            name: self.name.clone(),
            mesh: build(&self.triangles),
        }
    }
}

/// A named, indexed solid. One OpenSCAD module is emitted per solid.
#[derive(Debug, Clone, PartialEq)]
pub struct Solid {
    pub name: String,
    pub mesh: PolyMesh,
}

/// Builds an indexed mesh from raw triangles. Shorthand for feeding all
/// triangles into a [`MeshBuilder`].
pub fn build(triangles: &[Triangle]) -> PolyMesh {
    let mut builder = MeshBuilder::with_capacity(triangles.len());
    for triangle in triangles {
        builder.add_triangle(triangle.vertices);
    }
    builder.finish()
}


/// Exact lookup key of a point. `OrderedFloat` gives us `Eq + Hash`; it treats
/// `0.0` and `-0.0` as equal (like `==`) and all NaNs as equal.
type PointKey = [OrderedFloat<f64>; 3];

fn key_of(p: Point3) -> PointKey {
    [OrderedFloat(p.x), OrderedFloat(p.y), OrderedFloat(p.z)]
}

/// Incrementally builds a [`PolyMesh`] and unifies vertices with the exact
/// same position.
///
/// Points are stored in an append-only list in order of first occurrence. A
/// hash map from the exact coordinate triple to the index makes each lookup
/// O(1) amortized.
#[derive(Debug, Default)]
pub struct MeshBuilder {
    points: Vec<Point3>,
    index_of: FxHashMap<PointKey, usize>,
    faces: Vec<IndexedFace>,
}

impl MeshBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder that is prepared for `num_triangles` triangles.
    pub fn with_capacity(num_triangles: usize) -> Self {
        // We can't know the number of unique vertices in advance. For a
        // closed, well behaved triangle mesh |V| ≈ |F| / 2, so we prepare
        // for slightly more than that.
        let num_vertices = (num_triangles as f64 * 0.55) as usize;

        let mut index_of = FxHashMap::default();
        index_of.reserve(num_vertices);

        Self {
            points: Vec::with_capacity(num_vertices),
            index_of,
            faces: Vec::with_capacity(num_triangles),
        }
    }

    /// Returns the index of the given position, adding it to the point list
    /// if it wasn't seen before.
    pub fn add_vertex(&mut self, pos: Point3) -> usize {
        let points = &mut self.points;
        *self.index_of.entry(key_of(pos)).or_insert_with(|| {
            points.push(pos);
            points.len() - 1
        })
    }

    /// Adds a triangle given by the positions of its vertices (in file order)
    /// and returns the stored face.
    ///
    /// The second and third index are always swapped: the face for the
    /// vertex indices `(a, b, c)` is stored as `(a, c, b)`. STL lists
    /// vertices counter-clockwise when looking from the outside, while
    /// OpenSCAD expects clockwise order.
    pub fn add_triangle(&mut self, vertices: [Point3; 3]) -> IndexedFace {
        let [pa, pb, pc] = vertices;
        let a = self.add_vertex(pa);
        let b = self.add_vertex(pb);
        let c = self.add_vertex(pc);

        let face = IndexedFace::from([a, c, b]);
        self.faces.push(face);
        face
    }

    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    pub fn finish(self) -> PolyMesh {
        PolyMesh {
            points: self.points,
            faces: self.faces,
        }
    }
}
