/*

    Seeded random geometry shared by the unit tests.

    @date: 22 Nov, 2025
    @author: bartu
*/

use rand::Rng;
use rand::rngs::StdRng;

use crate::numeric::{Float, Vector3};
use crate::ray::Ray;
use crate::shapes::Triangle;

/// Uniform point in the [-10, 10] cube.
pub(crate) fn random_vec(rng: &mut StdRng) -> Vector3 {
    Vector3::new(
        rng.random_range(-10.0..10.0),
        rng.random_range(-10.0..10.0),
        rng.random_range(-10.0..10.0),
    )
}

pub(crate) fn random_unit_vec(rng: &mut StdRng) -> Vector3 {
    loop {
        let v = random_vec(rng);
        if v.length_squared() > 1e-6 {
            return v.normalize();
        }
    }
}

/// Triangle with independently random vertices; retries the rare
/// colinear draw.
pub(crate) fn random_triangle(rng: &mut StdRng) -> Triangle {
    loop {
        if let Ok(tri) = Triangle::flat(
            [random_vec(rng), random_vec(rng), random_vec(rng)],
            Vector3::ZERO,
            Vector3::ONE,
        ) {
            return tri;
        }
    }
}

/// A well-distributed scene: n small triangles with centers spread
/// uniformly over the [-10, 10] cube.
pub(crate) fn random_scene(rng: &mut StdRng, n: usize) -> Vec<Triangle> {
    let mut triangles = Vec::with_capacity(n);
    while triangles.len() < n {
        let center = random_vec(rng);
        let jitter = |rng: &mut StdRng| {
            Vector3::new(
                rng.random_range(-0.5..0.5),
                rng.random_range(-0.5..0.5),
                rng.random_range(-0.5..0.5),
            )
        };
        let vertices = [
            center + jitter(rng),
            center + jitter(rng),
            center + jitter(rng),
        ];
        if let Ok(tri) = Triangle::flat(vertices, Vector3::ZERO, Vector3::ONE) {
            triangles.push(tri);
        }
    }
    triangles
}

/// Ray from outside the scene aimed at a point inside it, so a decent
/// fraction of samples hit something.
pub(crate) fn random_ray(rng: &mut StdRng) -> Ray {
    loop {
        let origin = Vector3::new(
            rng.random_range(-20.0..20.0),
            rng.random_range(-20.0..20.0),
            rng.random_range(-20.0..20.0),
        );
        let target = Vector3::new(
            rng.random_range(-8.0..8.0),
            rng.random_range(-8.0..8.0),
            rng.random_range(-8.0..8.0),
        );
        let direction = target - origin;
        if direction.length_squared() > 1e-6 {
            return Ray::new(origin, direction.normalize());
        }
    }
}

/// Barycentric weights with r + s + t <= 1, by rejection.
pub(crate) fn sample_barycentric(rng: &mut StdRng) -> (Float, Float, Float) {
    loop {
        let r = rng.random_range(0.0..1.0);
        let s = rng.random_range(0.0..1.0);
        let t = rng.random_range(0.0..1.0);
        if r + s + t <= 1.0 {
            return (r, s, t);
        }
    }
}

/// Bit-exact identity of a triangle's vertices, usable as a sort key
/// when comparing triangle multisets.
pub(crate) fn sort_key(tri: &Triangle) -> [u64; 9] {
    let mut key = [0u64; 9];
    for (v, chunk) in tri.vertices.iter().zip(key.chunks_mut(3)) {
        chunk[0] = v.x.to_bits();
        chunk[1] = v.y.to_bits();
        chunk[2] = v.z.to_bits();
    }
    key
}
