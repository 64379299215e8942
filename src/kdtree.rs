/*

    kd-tree over triangle bounding boxes, built by spatial median.

    Build splits the union box at the midpoint of its longest axis and
    bisects toward the empty side until both halves hold something. The
    binary tree uses exclusively owned boxed nodes, built bottom-up so
    each node has exactly one owner.

    @date: 19 Nov, 2025
    @author: bartu
*/

use crate::acceleration::nearest_brute_force;
use crate::bbox::BBox;
use crate::geometry::ray_box_intersection;
use crate::ray::{HitRecord, Ray};
use crate::shapes::Triangle;
use crate::prelude::*;

/// Bisection steps before the spatial-median search gives up and the
/// node becomes a leaf. Coincident midpoints would otherwise loop.
const MAX_MEDIAN_STEPS: usize = 64;

#[derive(Debug)]
enum Node {
    Leaf {
        bbox: BBox,
        axis: Axis,
        triangles: Vec<Triangle>,
    },
    Inner {
        bbox: BBox,
        axis: Axis,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    fn bbox(&self) -> &BBox {
        match self {
            Node::Leaf { bbox, .. } | Node::Inner { bbox, .. } => bbox,
        }
    }

    fn intersect<'a>(&'a self, ray: &Ray) -> Option<HitRecord<'a>> {
        if !ray_box_intersection(ray, self.bbox()) {
            return None;
        }
        match self {
            Node::Leaf { triangles, .. } => nearest_brute_force(ray, triangles),
            Node::Inner { left, right, .. } => {
                HitRecord::closer(left.intersect(ray), right.intersect(ray))
            }
        }
    }

    fn height(&self) -> usize {
        match self {
            Node::Leaf { .. } => 1,
            Node::Inner { left, right, .. } => 1 + left.height().max(right.height()),
        }
    }
}


#[derive(Debug, Default)]
pub struct KdTree {
    root: Option<Box<Node>>,
}

impl KdTree {

    /// Build from a triangle list. An empty list yields the empty tree;
    /// leaf_capacity bounds the triangle count per leaf.
    pub fn build(triangles: Vec<Triangle>, leaf_capacity: usize) -> Self {
        debug_assert!(leaf_capacity > 0);

        if triangles.is_empty() {
            return Self { root: None };
        }

        let num_triangles = triangles.len();
        let root = Self::build_node(triangles, leaf_capacity);
        let tree = Self { root: Some(root) };
        info!(
            "Built median kd-tree over {} triangles, height {}",
            num_triangles,
            tree.height()
        );
        tree
    }

    // triangles must be non-empty here
    fn build_node(triangles: Vec<Triangle>, leaf_capacity: usize) -> Box<Node> {
        let mut bbox = triangles[0].bbox();
        for tri in &triangles[1..] {
            bbox = bbox.union(&tri.bbox());
        }
        let axis = bbox.longest_axis();

        // Do we have to partition at all?
        if triangles.len() <= leaf_capacity {
            return Box::new(Node::Leaf { bbox, axis, triangles });
        }

        match Self::split_at_spatial_median(axis, &bbox, triangles) {
            Ok((lft_triangles, rht_triangles)) => Box::new(Node::Inner {
                bbox,
                axis,
                left: Self::build_node(lft_triangles, leaf_capacity),
                right: Self::build_node(rht_triangles, leaf_capacity),
            }),
            // midpoints coincide along the axis, cannot partition
            Err(triangles) => Box::new(Node::Leaf { bbox, axis, triangles }),
        }
    }

    /// Partition by spatial median, bisecting toward the empty side until
    /// both halves are populated. Err returns the triangles untouched when
    /// the search range collapses, and the caller forces a leaf.
    fn split_at_spatial_median(
        axis: Axis,
        bbox: &BBox,
        triangles: Vec<Triangle>,
    ) -> std::result::Result<(Vec<Triangle>, Vec<Triangle>), Vec<Triangle>> {
        let i = axis.index();
        let midpoints: Vec<Float> = triangles.iter().map(|tri| tri.midpoint()[i]).collect();

        let mut min = bbox.min[i];
        let mut max = bbox.max[i];

        for _ in 0..MAX_MEDIAN_STEPS {
            if approx_zero(max - min) {
                break;
            }

            let axis_midpt = (min + max) / 2.0;
            let num_left = midpoints.iter().filter(|&&m| m < axis_midpt).count();

            if num_left == 0 {
                min = axis_midpt; // left half empty, search right half
            } else if num_left == midpoints.len() {
                max = axis_midpt; // right half empty, search left half
            } else {
                return Ok(triangles
                    .into_iter()
                    .partition(|tri| tri.midpoint()[i] < axis_midpt));
            }
        }

        debug!("Spatial median search collapsed on {:?}, forcing a leaf of {} triangles",
            axis, triangles.len());
        Err(triangles)
    }

    /// Nearest hit with strictly positive ray_t, or None.
    pub fn intersect<'a>(&'a self, ray: &Ray) -> Option<HitRecord<'a>> {
        self.root.as_deref().and_then(|node| node.intersect(ray))
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn height(&self) -> usize {
        self.root.as_deref().map_or(0, Node::height)
    }

    /// Borrowing view of the root, for inspection.
    pub fn root(&self) -> Subtree<'_> {
        Subtree(self.root.as_deref())
    }
}


/// Subtree is a borrowing view over an optional node; mirrors the tree
/// navigation used by the structural tests.
#[derive(Debug, Clone, Copy)]
pub struct Subtree<'a>(Option<&'a Node>);

impl<'a> Subtree<'a> {
    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.0, Some(Node::Leaf { .. }))
    }

    pub fn left(&self) -> Subtree<'a> {
        match self.0 {
            Some(Node::Inner { left, .. }) => Subtree(Some(left)),
            _ => Subtree(None),
        }
    }

    pub fn right(&self) -> Subtree<'a> {
        match self.0 {
            Some(Node::Inner { right, .. }) => Subtree(Some(right)),
            _ => Subtree(None),
        }
    }

    pub fn bbox(&self) -> Option<&'a BBox> {
        self.0.map(Node::bbox)
    }

    pub fn split_axis(&self) -> Option<Axis> {
        match self.0 {
            Some(Node::Leaf { axis, .. } | Node::Inner { axis, .. }) => Some(*axis),
            None => None,
        }
    }

    /// Triangle list of a leaf; None for inner nodes and the empty tree.
    pub fn triangles(&self) -> Option<&'a [Triangle]> {
        match self.0 {
            Some(Node::Leaf { triangles, .. }) => Some(triangles),
            _ => None,
        }
    }
}
