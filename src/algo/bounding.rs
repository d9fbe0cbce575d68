use std::fmt;

use cgmath::Vector3;
use failure::Fail;

use crate::math::{Point3, Pos3Like};


/// Returned when a bounding box is requested for a set without points. Such a
/// box is undefined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Fail)]
#[fail(display = "cannot compute the bounding box of an empty point set")]
pub struct EmptyPointSet;

/// An axis aligned bounding box.
///
/// A value of this type always contains at least one point, i.e. all lower
/// bounds are smaller than or equal to their upper bound.
#[derive(Clone, Copy, PartialEq)]
pub struct BoundingBox {
    x_range: [f64; 2],
    y_range: [f64; 2],
    z_range: [f64; 2],
}

impl BoundingBox {
    /// Creates a bounding box around all points of the given iterator. If the
    /// iterator is empty, `EmptyPointSet` is returned.
    pub fn around<I>(iter: I) -> Result<Self, EmptyPointSet>
    where
        I: IntoIterator,
        I::Item: Pos3Like,
    {
        let mut iter = iter.into_iter();
        let first = iter.next().ok_or(EmptyPointSet)?;
        let mut out = Self::single(first);
        for pos in iter {
            out.add_point(pos);
        }

        Ok(out)
    }

    /// Creates a bounding box that only contains the given point.
    pub fn single(p: impl Pos3Like) -> Self {
        Self {
            x_range: [p.x(), p.x()],
            y_range: [p.y(), p.y()],
            z_range: [p.z(), p.z()],
        }
    }

    /// Returns the `[lower, upper]` limits for the x coordinate.
    pub fn x(&self) -> [f64; 2] {
        self.x_range
    }

    /// Returns the `[lower, upper]` limits for the y coordinate.
    pub fn y(&self) -> [f64; 2] {
        self.y_range
    }

    /// Returns the `[lower, upper]` limits for the z coordinate.
    pub fn z(&self) -> [f64; 2] {
        self.z_range
    }

    /// The corner with the smallest coordinates.
    pub fn min(&self) -> Point3 {
        Point3::new(self.x_range[0], self.y_range[0], self.z_range[0])
    }

    /// The corner with the largest coordinates.
    pub fn max(&self) -> Point3 {
        Point3::new(self.x_range[1], self.y_range[1], self.z_range[1])
    }

    /// Returns the extent of the box along each axis.
    pub fn size(&self) -> Vector3<f64> {
        self.max() - self.min()
    }

    /// Returns the center of this bounding box.
    pub fn center(&self) -> Point3 {
        Point3::new(
            (self.x_range[1] + self.x_range[0]) / 2.0,
            (self.y_range[1] + self.y_range[0]) / 2.0,
            (self.z_range[1] + self.z_range[0]) / 2.0,
        )
    }

    /// Adds a point to the bounding box, enlarging it if the point lies
    /// outside of the box.
    pub fn add_point(&mut self, p: impl Pos3Like) {
        fn min(state: &mut f64, new: f64) {
            if new < *state {
                *state = new;
            }
        }
        fn max(state: &mut f64, new: f64) {
            if new > *state {
                *state = new;
            }
        }

        min(&mut self.x_range[0], p.x());
        max(&mut self.x_range[1], p.x());
        min(&mut self.y_range[0], p.y());
        max(&mut self.y_range[1], p.y());
        min(&mut self.z_range[0], p.z());
        max(&mut self.z_range[1], p.z());
    }
}

impl fmt::Debug for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("BoundingBox")
            .field("x", &(self.x_range[0]..self.x_range[1]))
            .field("y", &(self.y_range[0]..self.y_range[1]))
            .field("z", &(self.z_range[0]..self.z_range[1]))
            .finish()
    }
}
