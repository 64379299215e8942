/*

    Ray and the record returned by nearest-hit queries.

    @date: 16 Nov, 2025
    @author: bartu
*/

use crate::shapes::Triangle;
use crate::prelude::*;


#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Vector3,
    pub direction: Vector3,
}

impl Ray {

    /// The intersection kernel does not require direction to be unit
    /// length, so none is enforced here.
    pub fn new(origin: Vector3, direction: Vector3) -> Self {
        Self {
            origin,
            direction,
        }
    }

    #[inline]
    pub fn at(&self, t: Float) -> Vector3 {
        self.origin + self.direction * t // r(t) = o + dt
    }
}


/// Result of a nearest-hit query. Borrows the triangle from the tree that
/// produced it, so a record never outlives its tree.
///
/// ray_t is the parametric distance along the ray (strictly positive for
/// any hit); (s, t) are barycentric coordinates with the third coordinate
/// implicit: hit point = v0 + s*u + t*v.
#[derive(Debug, Clone, Copy)]
pub struct HitRecord<'a> {
    pub triangle: &'a Triangle,
    pub ray_t: Float,
    pub s: Float,
    pub t: Float,
}

impl<'a> HitRecord<'a> {
    pub fn new(triangle: &'a Triangle, ray_t: Float, s: Float, t: Float) -> Self {
        debug_assert!(ray_t > 0.0);
        Self {
            triangle,
            ray_t,
            s,
            t,
        }
    }

    /// Keep the record with the smaller ray_t.
    pub fn closer(lhs: Option<Self>, rhs: Option<Self>) -> Option<Self> {
        match (lhs, rhs) {
            (Some(l), Some(r)) => Some(if l.ray_t <= r.ray_t { l } else { r }),
            (hit, None) | (None, hit) => hit,
        }
    }

    /// Smooth-shading normal at the hit point, renormalised.
    pub fn interpolated_normal(&self) -> Vector3 {
        self.triangle
            .interpolate_normal(1.0 - self.s - self.t, self.s, self.t)
    }
}
