/*

    Triangle vs. AABB clipping (Sutherland-Hodgman).

    The SAH builder does not need the clipped polygon itself, only its
    bounding box, so that is all we return.

    @date: 18 Nov, 2025
    @author: bartu
*/

use crate::bbox::BBox;
use crate::geometry::intersect_segment_plane;
use crate::interval::Interval;
use crate::shapes::Triangle;
use crate::prelude::*;


/// Bounding box of the polygon obtained by clipping `triangle` against the
/// six half-spaces of `bbox`, or None when the intersection is empty.
///
/// The result is clamped into `bbox`, so a clipped region collapsing onto a
/// box face shows up as a planar box under exact comparison.
pub fn triangle_clip_aabb(triangle: &Triangle, bbox: &BBox) -> Option<BBox> {
    let mut polygon: Vec<Vector3> = triangle.vertices.to_vec();

    for axis in Axis::ALL {
        let i = axis.index();
        polygon = clip_half_space(polygon, axis, bbox.min[i], Side::Above);
        polygon = clip_half_space(polygon, axis, bbox.max[i], Side::Below);
        if polygon.is_empty() {
            return None;
        }
    }

    let (mut xint, mut yint, mut zint) = (Interval::EMPTY, Interval::EMPTY, Interval::EMPTY);
    for p in &polygon {
        // clamp onto the box; crossing points can drift out by an ulp
        let p = p.clamp(bbox.min, bbox.max);
        xint.expand(p.x);
        yint.expand(p.y);
        zint.expand(p.z);
    }
    Some(BBox::new_from(&xint, &yint, &zint))
}

#[derive(Clone, Copy, PartialEq)]
enum Side {
    Above, // keep p[axis] >= coord
    Below, // keep p[axis] <= coord
}

/// One Sutherland-Hodgman pass: keep vertices inside the half-space, emit
/// crossing points where consecutive vertices change sides.
fn clip_half_space(polygon: Vec<Vector3>, axis: Axis, coord: Float, side: Side) -> Vec<Vector3> {
    let inside = |p: &Vector3| match side {
        Side::Above => p[axis.index()] >= coord,
        Side::Below => p[axis.index()] <= coord,
    };

    let mut clipped = Vec::with_capacity(polygon.len() + 1);
    for (k, current) in polygon.iter().enumerate() {
        let next = &polygon[(k + 1) % polygon.len()];

        if inside(current) {
            clipped.push(*current);
        }
        if inside(current) != inside(next)
            && let Some(t) = intersect_segment_plane(current, next, &axis.unit(), coord)
        {
            clipped.push(*current + (*next - *current) * t);
        }
    }
    clipped
}
