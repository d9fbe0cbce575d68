//! Point type and abstractions over position-like types.

use std::fmt::Debug;


/// A position in 3D space.
///
/// Equality is exact (`==` on every coordinate). There is no epsilon: two
/// points are the same vertex only if the STL file stores identical values
/// for them.
pub type Point3 = cgmath::Point3<f64>;


/// Types that can be interpreted to represent some kind of 3D position.
///
/// This type is implemented for the strongly typed [`Point3`] as well as for
/// the raw coordinate arrays that come out of the STL parser (`[f32; 3]` for
/// binary files and `[f64; 3]` for ASCII files). Values are always widened to
/// `f64`, which is lossless for `f32`.
pub trait Pos3Like: Copy + Debug {
    /// Returns the `x` component of this position.
    fn x(&self) -> f64;

    /// Returns the `y` component of this position.
    fn y(&self) -> f64;

    /// Returns the `z` component of this position.
    fn z(&self) -> f64;

    fn to_point3(self) -> Point3 {
        Point3::new(self.x(), self.y(), self.z())
    }
}

impl Pos3Like for Point3 {
    fn x(&self) -> f64 { self.x }
    fn y(&self) -> f64 { self.y }
    fn z(&self) -> f64 { self.z }
}

impl Pos3Like for [f64; 3] {
    fn x(&self) -> f64 { self[0] }
    fn y(&self) -> f64 { self[1] }
    fn z(&self) -> f64 { self[2] }
}

impl Pos3Like for [f32; 3] {
    fn x(&self) -> f64 { self[0].into() }
    fn y(&self) -> f64 { self[1].into() }
    fn z(&self) -> f64 { self[2].into() }
}

impl<P: Pos3Like> Pos3Like for &P {
    fn x(&self) -> f64 { P::x(*self) }
    fn y(&self) -> f64 { P::y(*self) }
    fn z(&self) -> f64 { P::z(*self) }
}
