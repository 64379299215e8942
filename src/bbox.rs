/*

    Axis Aligned Bounding Box and axis-aligned splitting planes.


    @author: bartu
    @date: 16 Nov, 2025
*/


use crate::prelude::*;
use crate::interval::Interval;


/// Invariant: min[axis] <= max[axis] for every axis. A box with
/// min[axis] == max[axis] is planar on that axis; clipping produces
/// such boxes when a triangle degenerates to an edge or point.
#[derive(Debug, Clone, Copy)]
pub struct BBox {
    pub min: Vector3,
    pub max: Vector3,
}

impl BBox {

    pub fn new(min: Vector3, max: Vector3) -> Self {
        debug_assert!(min.x <= max.x && min.y <= max.y && min.z <= max.z,
            "Invalid box, found max < min");
        Self { min, max }
    }

    pub fn new_from(xint: &Interval, yint: &Interval, zint: &Interval) -> Self {
        assert!(xint.validate() && yint.validate() && zint.validate(),
            "Invalid interval, found max < min");
        Self {
            min: Vector3::new(xint.min, yint.min, zint.min),
            max: Vector3::new(xint.max, yint.max, zint.max),
        }
    }

    /// Componentwise min/max of the two boxes.
    pub fn union(&self, other: &BBox) -> BBox {
        BBox {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    #[inline]
    pub fn size(&self) -> Vector3 {
        self.max - self.min
    }

    pub fn surface_area(&self) -> Float {
        let d = self.size();
        2.0 * (d.x * d.y + d.y * d.z + d.z * d.x)
    }

    /// Exact comparison on purpose; the clipper clamps onto box faces,
    /// so flat results compare equal without an epsilon.
    #[inline]
    pub fn is_planar(&self, axis: Axis) -> bool {
        self.min[axis.index()] == self.max[axis.index()]
    }

    /// Longest side of the box. Ties resolve X over Y over Z.
    pub fn longest_axis(&self) -> Axis {
        let d = self.size();
        if d.x >= d.y && d.x >= d.z {
            Axis::X
        } else if d.y >= d.z {
            Axis::Y
        } else {
            Axis::Z
        }
    }

    pub fn contains_point(&self, p: &Vector3) -> bool {
        (0..3).all(|i| self.min[i] <= p[i] && p[i] <= self.max[i])
    }

    pub fn contains_box(&self, other: &BBox) -> bool {
        self.contains_point(&other.min) && self.contains_point(&other.max)
    }

    /// Cut the box at the plane. The plane must lie within the box;
    /// either half may be flat when the plane sits on a face.
    pub fn split(&self, plane: Plane) -> (BBox, BBox) {
        let i = plane.axis.index();
        debug_assert!(self.min[i] <= plane.coord && plane.coord <= self.max[i]);

        let mut lmax = self.max;
        lmax[i] = plane.coord;
        let mut rmin = self.min;
        rmin[i] = plane.coord;

        (BBox::new(self.min, lmax), BBox::new(rmin, self.max))
    }
}


/// Axis-aligned hyperplane x[axis] == coord.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub axis: Axis,
    pub coord: Float,
}

impl Plane {
    pub fn new(axis: Axis, coord: Float) -> Self {
        Self { axis, coord }
    }
}
