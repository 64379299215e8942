/*

    Declare the Triangle primitive fed into the kd-trees.

    Triangles arrive from the importer with transforms already applied
    and materials resolved to an ambient/diffuse colour pair.

    @date: Oct-Nov, 2025
    @author: bartu
*/

use crate::bbox::BBox;
use crate::clipping::triangle_clip_aabb;
use crate::error::{GeometryError, Result};
use crate::interval::Interval;
use crate::prelude::*;


#[derive(Debug, Clone)]
pub struct Triangle {
    pub vertices: [Vector3; 3],
    /// Per-vertex normals, expected unit length (checked by tests,
    /// not enforced here).
    pub normals: [Vector3; 3],
    pub ambient: Vector3,
    pub diffuse: Vector3,

    // Cached at construction
    pub u: Vector3, // vertices[1] - vertices[0]
    pub v: Vector3, // vertices[2] - vertices[0]
    pub normal: Vector3,
}

impl Triangle {

    /// Rejects triangles with colinear edges; those have no face normal
    /// and the intersection kernel cannot handle them.
    pub fn new(
        vertices: [Vector3; 3],
        normals: [Vector3; 3],
        ambient: Vector3,
        diffuse: Vector3,
    ) -> Result<Self> {
        let u = vertices[1] - vertices[0];
        let v = vertices[2] - vertices[0];

        let cross = u.cross(v);
        if approx_zero(cross.length()) {
            debug!("Found degenerate triangle with vertices {:?}", vertices);
            return Err(GeometryError::InvalidGeometry);
        }
        let normal = cross.normalize();
        debug_assert!(normal.is_normalized());

        Ok(Self {
            vertices,
            normals,
            ambient,
            diffuse,
            u,
            v,
            normal,
        })
    }

    /// Flat-shaded triangle: every vertex normal is the face normal.
    pub fn flat(vertices: [Vector3; 3], ambient: Vector3, diffuse: Vector3) -> Result<Self> {
        let tri = Self::new(vertices, [Vector3::ZERO; 3], ambient, diffuse)?;
        let n = tri.normal;
        Ok(Self { normals: [n; 3], ..tri })
    }

    #[inline]
    pub fn midpoint(&self) -> Vector3 {
        (self.vertices[0] + self.vertices[1] + self.vertices[2]) / 3.0
    }

    pub fn bbox(&self) -> BBox {
        let (mut xint, mut yint, mut zint) = (Interval::EMPTY, Interval::EMPTY, Interval::EMPTY);
        for v in &self.vertices {
            xint.expand(v.x);
            yint.expand(v.y);
            zint.expand(v.z);
        }
        BBox::new_from(&xint, &yint, &zint)
    }

    /// Interpolate the per-vertex normals with barycentric weights
    /// (r, s, t) and renormalise. Weights are expected nonnegative with
    /// r + s + t <= 1.
    pub fn interpolate_normal(&self, r: Float, s: Float, t: Float) -> Vector3 {
        let [n0, n1, n2] = self.normals;
        (n0 * r + n1 * s + n2 * t).normalize() // WARNING: Be careful with interpolation order!
    }

    /// True iff the triangle and the box overlap, i.e. clipping the
    /// triangle against the box leaves something.
    pub fn intersects_box(&self, bbox: &BBox) -> bool {
        triangle_clip_aabb(self, bbox).is_some()
    }
}
