/*

    Query facade over the acceleration structures.

    The renderer only ever needs one operation: the nearest triangle a
    ray hits. Both tree builds answer it behind the same trait, and the
    brute-force loop stays around as the reference the trees are tested
    against (and as the fallback for tiny scenes).

    @date: 22 Nov, 2025
    @author: bartu
*/

use std::fmt::Debug;

use crate::geometry::moller_trumbore_intersection;
use crate::kdtree::KdTree;
use crate::ray::{HitRecord, Ray};
use crate::sah::SahTree;
use crate::shapes::Triangle;


/// Nearest-hit queries. Read-only and re-entrant: queries may run
/// concurrently from any number of threads on the same tree.
pub trait Accelerator: Debug + Send + Sync {
    /// Closest intersection with strictly positive ray_t, or None.
    fn nearest(&self, ray: &Ray) -> Option<HitRecord<'_>>;
}

impl Accelerator for KdTree {
    fn nearest(&self, ray: &Ray) -> Option<HitRecord<'_>> {
        self.intersect(ray)
    }
}

impl Accelerator for SahTree {
    fn nearest(&self, ray: &Ray) -> Option<HitRecord<'_>> {
        self.intersect(ray)
    }
}


/// Spatial-median build with an explicit leaf capacity.
pub fn build_median(triangles: Vec<Triangle>, leaf_capacity: usize) -> KdTree {
    KdTree::build(triangles, leaf_capacity)
}

/// Surface-area-heuristic build.
pub fn build_sah(triangles: Vec<Triangle>) -> SahTree {
    SahTree::build(triangles)
}


/// Iterate over all triangles to find the closest hit. Quadratic in
/// scene size when used per pixel; the trees exist to avoid this, but
/// the leaves and the tests still go through it.
pub fn nearest_brute_force<'a>(ray: &Ray, triangles: &'a [Triangle]) -> Option<HitRecord<'a>> {
    let mut closest: Option<HitRecord<'a>> = None;
    for triangle in triangles {
        if let Some((r, s, t)) = moller_trumbore_intersection(ray, triangle)
            && closest.as_ref().is_none_or(|hit| r < hit.ray_t)
        {
            closest = Some(HitRecord::new(triangle, r, s, t));
        }
    }
    closest
}
