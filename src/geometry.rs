/*

    Intersection kernel: pure predicates and distance queries used by
    the clipper, the kd-trees and their tests.

    @date: 17 Nov, 2025
    @author: bartu
*/

use crate::bbox::BBox;
use crate::interval::Interval;
use crate::ray::Ray;
use crate::shapes::Triangle;
use crate::prelude::*;


/// Slab method: intersect the per-axis parametric intervals and check the
/// result is non-empty and reaches forward of the origin.
pub fn ray_box_intersection(ray: &Ray, bbox: &BBox) -> bool {
    let mut t = Interval::UNIVERSE;

    for axis in Axis::ALL {
        let i = axis.index();
        let o = ray.origin[i];
        let d = ray.direction[i];

        if d == 0.0 {
            // Ray runs parallel to the slab: either always inside it or never.
            if o < bbox.min[i] || o > bbox.max[i] {
                return false;
            }
            continue;
        }

        let t1 = (bbox.min[i] - o) / d;
        let t2 = (bbox.max[i] - o) / d;
        t.clip(&Interval::new(t1.min(t2), t1.max(t2)));
    }

    t.validate() && t.max >= 0.0
}


/// Based on Möller-Trumbore algorithm
///
///     v0 (pivot)
///    /  \
///  v1  -  v2
///
/// Returns (r, s, t): r is the parametric distance along the ray (strictly
/// positive for a hit), (s, t) are barycentric coordinates over the cached
/// edges u, v. Rays parallel to the triangle plane miss.
pub fn moller_trumbore_intersection(ray: &Ray, triangle: &Triangle) -> Option<(Float, Float, Float)> {
    let edge_u = triangle.u;
    let edge_v = triangle.v;

    // Scalar triple product https://youtu.be/fK1RPmF_zjQ
    let perp = ray.direction.cross(edge_v);
    let determinant: Float = perp.dot(edge_u);
    if approx_zero(determinant) {
        return None;
    }
    let inverse_determinant = 1.0 as Float / determinant;

    let dist = ray.origin - triangle.vertices[0];
    let barycentric_s = dist.dot(perp) * inverse_determinant;
    if !(0.0..=1.0).contains(&barycentric_s) {
        return None;
    }

    let another_perp = dist.cross(edge_u);
    let barycentric_t = ray.direction.dot(another_perp) * inverse_determinant;
    if (barycentric_t < 0.0) || ((barycentric_s + barycentric_t) > 1.0) {
        return None;
    }

    // Get ray r
    let r = edge_v.dot(another_perp) * inverse_determinant;
    if r <= 0.0 {
        return None;
    }
    Some((r, barycentric_s, barycentric_t))
}


/// Parameter of the crossing of segment [a, b] with the plane n.x == d,
/// if there is one. The plane normal need not be axis aligned.
pub fn intersect_segment_plane(a: &Vector3, b: &Vector3, normal: &Vector3, d: Float) -> Option<Float> {
    let denominator = normal.dot(*b - *a);
    if approx_zero(denominator) {
        return None; // segment runs inside or parallel to the plane
    }
    let t = (d - normal.dot(*a)) / denominator;
    (0.0..=1.0).contains(&t).then_some(t)
}


/// True iff the plane n.x == d cuts the box. Sums per-axis extrema of
/// n.corner instead of visiting all eight corners.
pub fn intersect_plane_box(normal: &Vector3, d: Float, bbox: &BBox) -> bool {
    let mut lo = 0.0;
    let mut hi = 0.0;
    for i in 0..3 {
        let a = normal[i] * bbox.min[i];
        let b = normal[i] * bbox.max[i];
        lo += a.min(b);
        hi += a.max(b);
    }
    lo <= d && d <= hi
}
