/*

    SAH kd-tree builder after Wald & Havran,
    "On building fast kd-Trees for Ray Tracing, and on doing that
    in O(N log N)".

    Split planes are selected by an event sweep over the clipped
    triangle bounds of each axis; straddling triangles are duplicated
    into both children. Inner nodes store only the splitting plane,
    child boxes are derived again during traversal.

    @date: 21 Nov, 2025
    @author: bartu
*/

use rayon::prelude::*;

use crate::acceleration::nearest_brute_force;
use crate::bbox::{BBox, Plane};
use crate::clipping::triangle_clip_aabb;
use crate::geometry::ray_box_intersection;
use crate::ray::{HitRecord, Ray};
use crate::shapes::Triangle;
use crate::prelude::*;


// Cf. 5.2, Table 1
pub const COST_TRAVERSAL: Float = 15.0;
pub const COST_INTERSECTION: Float = 20.0;

/// Nodes at or below this size are not worth sweeping.
const MIN_LEAF_TRIANGLES: usize = 4;

/// Cost function bias rewarding cut-off empty space.
fn lambda(num_ltris: usize, num_rtris: usize) -> Float {
    if num_ltris == 0 || num_rtris == 0 {
        return 0.8;
    }
    1.0
}

/// Cost of splitting a box at a given plane.
///
/// {l,r}area_ratio are the surface areas of the left resp. right half
/// over the area of the whole box; num_{l,r}tris count the triangles
/// landing in each half.
fn cost(larea_ratio: Float, rarea_ratio: Float, num_ltris: usize, num_rtris: usize) -> Float {
    lambda(num_ltris, num_rtris)
        * (COST_TRAVERSAL
            + COST_INTERSECTION
                * (larea_ratio * num_ltris as Float + rarea_ratio * num_rtris as Float))
}

/// Which side of the plane the in-plane triangles are sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// Evaluate a candidate plane: try the planar triangles on either side
/// and keep the cheaper assignment.
pub fn surface_area_heuristic(
    plane: Plane,
    bbox: &BBox,
    num_ltris: usize,
    num_rtris: usize,
    num_planar_tris: usize,
) -> (Float, Side) {
    let (lbox, rbox) = bbox.split(plane);
    let area = bbox.surface_area();
    let larea_ratio = lbox.surface_area() / area;
    let rarea_ratio = rbox.surface_area() / area;

    let lpcost = cost(larea_ratio, rarea_ratio, num_ltris + num_planar_tris, num_rtris);
    let rpcost = cost(larea_ratio, rarea_ratio, num_ltris, num_planar_tris + num_rtris);

    if lpcost < rpcost {
        (lpcost, Side::Left)
    } else {
        (rpcost, Side::Right)
    }
}


// Sort order of event kinds at equal coordinates: a triangle ending at p
// must leave the right side before the plane at p is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum EventKind {
    Ending = 0,
    Planar = 1,
    Starting = 2,
}

#[derive(Debug, Clone, Copy)]
struct Event {
    point: Float,
    kind: EventKind,
}


#[derive(Debug)]
enum SahNode {
    Leaf {
        triangles: Vec<Triangle>,
    },
    Inner {
        plane: Plane,
        left: Box<SahNode>,
        right: Box<SahNode>,
    },
}

#[derive(Debug, Default)]
pub struct SahTree {
    root: Option<Box<SahNode>>,
    /// Box of the whole scene; child boxes are split off of it on the
    /// way down, they are not stored per node.
    bbox: Option<BBox>,
}

impl SahTree {

    pub fn build(triangles: Vec<Triangle>) -> Self {
        if triangles.is_empty() {
            return Self { root: None, bbox: None };
        }

        let mut bbox = triangles[0].bbox();
        for tri in &triangles[1..] {
            bbox = bbox.union(&tri.bbox());
        }

        let num_triangles = triangles.len();
        let max_depth = depth_heuristic(num_triangles);
        let root = build_node(triangles, &bbox, 0, max_depth);

        let tree = Self { root: Some(root), bbox: Some(bbox) };
        info!(
            "Built SAH kd-tree over {} triangles, height {}",
            num_triangles,
            tree.height()
        );
        tree
    }

    /// Nearest hit with strictly positive ray_t, or None.
    pub fn intersect<'a>(&'a self, ray: &Ray) -> Option<HitRecord<'a>> {
        match (&self.root, &self.bbox) {
            (Some(root), Some(bbox)) => intersect_node(root, ray, bbox),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn height(&self) -> usize {
        fn node_height(node: &SahNode) -> usize {
            match node {
                SahNode::Leaf { .. } => 1,
                SahNode::Inner { left, right, .. } => 1 + node_height(left).max(node_height(right)),
            }
        }
        self.root.as_deref().map_or(0, node_height)
    }

    pub fn bbox(&self) -> Option<&BBox> {
        self.bbox.as_ref()
    }
}

/// Reportedly a good heuristic to bound kd-tree depth.
fn depth_heuristic(num_triangles: usize) -> usize {
    8 + (1.3 * (num_triangles as Float).log2().ceil()) as usize
}

fn build_node(triangles: Vec<Triangle>, bbox: &BBox, depth: usize, max_depth: usize) -> Box<SahNode> {
    let num_triangles = triangles.len();
    if num_triangles <= MIN_LEAF_TRIANGLES || depth >= max_depth {
        return Box::new(SahNode::Leaf { triangles });
    }

    let Some((min_cost, plane, side)) = find_plane(&triangles, bbox) else {
        return Box::new(SahNode::Leaf { triangles });
    };

    // Automatic termination: splitting must beat intersecting everything
    // in place.
    if min_cost >= COST_INTERSECTION * num_triangles as Float {
        return Box::new(SahNode::Leaf { triangles });
    }

    let (lft_triangles, rht_triangles) = classify(triangles, bbox, plane, side);

    // A split that put every triangle on both sides makes no progress.
    if lft_triangles.len() == num_triangles && rht_triangles.len() == num_triangles {
        return Box::new(SahNode::Leaf { triangles: lft_triangles });
    }

    debug!(
        "Splitting {} triangles at {:?} into {}/{} (cost {:.1})",
        num_triangles,
        plane,
        lft_triangles.len(),
        rht_triangles.len(),
        min_cost
    );

    let (lft_box, rht_box) = bbox.split(plane);
    Box::new(SahNode::Inner {
        plane,
        left: build_node(lft_triangles, &lft_box, depth + 1, max_depth),
        right: build_node(rht_triangles, &rht_box, depth + 1, max_depth),
    })
}

/// Partition triangles across the plane; straddlers are duplicated into
/// both halves, in-plane triangles go only to the side the SAH chose.
fn classify(
    triangles: Vec<Triangle>,
    bbox: &BBox,
    plane: Plane,
    side: Side,
) -> (Vec<Triangle>, Vec<Triangle>) {
    let i = plane.axis.index();
    let mut lft_triangles = Vec::new();
    let mut rht_triangles = Vec::new();

    for tri in triangles {
        let Some(clipped) = triangle_clip_aabb(&tri, bbox) else {
            warn!("Triangle without box overlap reached classification, dropping it");
            continue;
        };

        if clipped.is_planar(plane.axis) && approx_eq(clipped.min[i], plane.coord) {
            match side {
                Side::Left => lft_triangles.push(tri),
                Side::Right => rht_triangles.push(tri),
            }
            continue;
        }

        let goes_left = clipped.min[i] < plane.coord;
        let goes_right = clipped.max[i] > plane.coord;
        match (goes_left, goes_right) {
            (true, true) => {
                lft_triangles.push(tri.clone());
                rht_triangles.push(tri);
            }
            (true, false) => lft_triangles.push(tri),
            (false, _) => rht_triangles.push(tri),
        }
    }

    (lft_triangles, rht_triangles)
}

/// Sweep all three axes for the globally cheapest split plane. Returns
/// None when no admissible candidate exists (e.g. a node box flat on
/// every populated axis).
fn find_plane(triangles: &[Triangle], bbox: &BBox) -> Option<(Float, Plane, Side)> {
    // The three axis sweeps are independent; reduce to the global
    // minimum by (cost, axis) so the result does not depend on
    // scheduling.
    Axis::ALL
        .into_par_iter()
        .filter_map(|axis| sweep_axis(triangles, bbox, axis))
        .min_by(|a, b| {
            a.0.total_cmp(&b.0)
                .then_with(|| a.1.axis.index().cmp(&b.1.axis.index()))
        })
}

fn sweep_axis(triangles: &[Triangle], bbox: &BBox, axis: Axis) -> Option<(Float, Plane, Side)> {
    let i = axis.index();

    // generate events from the clipped triangle bounds
    let mut events = Vec::with_capacity(2 * triangles.len());
    let mut num_clipped = 0_usize;
    for tri in triangles {
        let Some(clipped) = triangle_clip_aabb(tri, bbox) else {
            continue;
        };
        num_clipped += 1;
        if clipped.is_planar(axis) {
            events.push(Event { point: clipped.min[i], kind: EventKind::Planar });
        } else {
            events.push(Event { point: clipped.min[i], kind: EventKind::Starting });
            events.push(Event { point: clipped.max[i], kind: EventKind::Ending });
        }
    }

    events.sort_unstable_by(|e1, e2| e1.point.total_cmp(&e2.point).then(e1.kind.cmp(&e2.kind)));

    // sweep
    let mut best: Option<(Float, Plane, Side)> = None;
    let mut num_ltris = 0_usize;
    let mut num_rtris = num_clipped;

    let mut k = 0;
    while k < events.len() {
        let p = events[k].point;
        let mut point_ending = 0_usize;
        let mut point_planar = 0_usize;
        let mut point_starting = 0_usize;

        // consume sub-phases in kind order; coordinates equal within
        // epsilon count as the same candidate plane
        while k < events.len() && approx_eq(events[k].point, p) && events[k].kind == EventKind::Ending {
            point_ending += 1;
            k += 1;
        }
        while k < events.len() && approx_eq(events[k].point, p) && events[k].kind == EventKind::Planar {
            point_planar += 1;
            k += 1;
        }
        while k < events.len() && approx_eq(events[k].point, p) && events[k].kind == EventKind::Starting {
            point_starting += 1;
            k += 1;
        }

        let num_planar_tris = point_planar;
        num_rtris -= point_planar + point_ending;

        // Planes on the box boundary only ever cut off a flat empty
        // cell; the empty-side bias would keep selecting them.
        if !approx_eq(p, bbox.min[i]) && !approx_eq(p, bbox.max[i]) {
            let plane = Plane::new(axis, p);
            let (plane_cost, plane_side) =
                surface_area_heuristic(plane, bbox, num_ltris, num_rtris, num_planar_tris);

            if best.is_none_or(|(best_cost, _, _)| plane_cost < best_cost) {
                best = Some((plane_cost, plane, plane_side));
            }
        }

        num_ltris += point_starting + point_planar;
    }
    debug_assert_eq!(num_rtris, 0);

    best
}

fn intersect_node<'a>(node: &'a SahNode, ray: &Ray, bbox: &BBox) -> Option<HitRecord<'a>> {
    if !ray_box_intersection(ray, bbox) {
        return None;
    }
    match node {
        SahNode::Leaf { triangles } => nearest_brute_force(ray, triangles),
        SahNode::Inner { plane, left, right } => {
            let (lft_box, rht_box) = bbox.split(*plane);
            HitRecord::closer(
                intersect_node(left, ray, &lft_box),
                intersect_node(right, ray, &rht_box),
            )
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{random_ray, random_scene, sort_key};
    use approx::assert_abs_diff_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn cost_bias_rewards_empty_sides() {
        assert_eq!(lambda(0, 10), 0.8);
        assert_eq!(lambda(10, 0), 0.8);
        assert_eq!(lambda(3, 7), 1.0);

        // equal halves, 4 triangles each side
        let full = cost(0.5, 0.5, 4, 4);
        assert_abs_diff_eq!(full, COST_TRAVERSAL + COST_INTERSECTION * 4.0);
        // an empty side scales the whole term by 0.8
        let empty = cost(0.5, 0.5, 8, 0);
        assert_abs_diff_eq!(empty, 0.8 * (COST_TRAVERSAL + COST_INTERSECTION * 4.0));
    }

    #[test]
    fn sah_sends_planars_to_the_cheaper_side() {
        let bbox = BBox::new(Vector3::ZERO, Vector3::new(4.0, 1.0, 1.0));

        // balanced counts: the smaller left half is the cheaper home
        let (_, side) = surface_area_heuristic(Plane::new(Axis::X, 1.0), &bbox, 3, 3, 2);
        assert_eq!(side, Side::Left);

        // left side empty: keeping it empty preserves the 0.8 bonus
        let (_, side) = surface_area_heuristic(Plane::new(Axis::X, 1.0), &bbox, 0, 6, 2);
        assert_eq!(side, Side::Right);
    }

    #[test]
    fn event_kinds_order_ending_planar_starting() {
        let mut events = vec![
            Event { point: 1.0, kind: EventKind::Starting },
            Event { point: 1.0, kind: EventKind::Ending },
            Event { point: 0.5, kind: EventKind::Starting },
            Event { point: 1.0, kind: EventKind::Planar },
        ];
        events.sort_unstable_by(|e1, e2| e1.point.total_cmp(&e2.point).then(e1.kind.cmp(&e2.kind)));

        let kinds: Vec<_> = events.iter().map(|e| (e.point, e.kind)).collect();
        assert_eq!(
            kinds,
            vec![
                (0.5, EventKind::Starting),
                (1.0, EventKind::Ending),
                (1.0, EventKind::Planar),
                (1.0, EventKind::Starting),
            ]
        );
    }

    #[test]
    fn sweep_finds_the_obvious_gap() {
        // two clusters separated around x = 0; the best plane must land
        // in the gap
        let mut triangles = Vec::new();
        for k in 0..8 {
            let x = -6.0 + 0.5 * k as Float;
            triangles.push(shifted_triangle(x, 0.0));
            let x = 3.0 + 0.5 * k as Float;
            triangles.push(shifted_triangle(x, 0.0));
        }
        let mut bbox = triangles[0].bbox();
        for tri in &triangles[1..] {
            bbox = bbox.union(&tri.bbox());
        }

        let (_, plane, _) = find_plane(&triangles, &bbox).expect("candidates exist");
        assert_eq!(plane.axis, Axis::X);
        // anywhere between the end of the left cluster and the start of
        // the right one separates the clusters
        assert!(plane.coord >= -2.2 && plane.coord <= 3.1, "plane at {}", plane.coord);
    }

    #[test]
    fn empty_input_builds_empty_tree() {
        let tree = SahTree::build(Vec::new());
        assert!(tree.is_empty());
        assert_eq!(tree.height(), 0);
        assert!(tree.bbox().is_none());
        assert!(tree.intersect(&Ray::new(Vector3::ZERO, Vector3::Z)).is_none());
    }

    #[test]
    fn tiny_input_stays_a_leaf() {
        let mut rng = StdRng::seed_from_u64(11);
        let tree = SahTree::build(random_scene(&mut rng, MIN_LEAF_TRIANGLES));
        assert_eq!(tree.height(), 1);
    }

    #[test]
    fn leaves_cover_the_input_with_duplicates_allowed() {
        let mut rng = StdRng::seed_from_u64(12);
        let triangles = random_scene(&mut rng, 150);
        let tree = SahTree::build(triangles.clone());

        fn collect<'a>(node: &'a SahNode, out: &mut Vec<&'a Triangle>) {
            match node {
                SahNode::Leaf { triangles } => out.extend(triangles.iter()),
                SahNode::Inner { left, right, .. } => {
                    collect(left, out);
                    collect(right, out);
                }
            }
        }

        let mut leaf_triangles = Vec::new();
        collect(tree.root.as_deref().unwrap(), &mut leaf_triangles);

        // every input triangle appears at least once
        let mut seen: Vec<_> = leaf_triangles.iter().map(|t| sort_key(t)).collect();
        seen.sort();
        seen.dedup();
        let mut expected: Vec<_> = triangles.iter().map(sort_key).collect();
        expected.sort();
        expected.dedup();
        assert_eq!(seen, expected);
    }

    #[test]
    fn query_agrees_with_brute_force() {
        let mut rng = StdRng::seed_from_u64(13);
        let triangles = random_scene(&mut rng, 150);
        let tree = SahTree::build(triangles.clone());

        for _ in 0..500 {
            let ray = random_ray(&mut rng);
            let expected = nearest_brute_force(&ray, &triangles);
            let found = tree.intersect(&ray);

            match (expected, found) {
                (None, None) => {}
                (Some(e), Some(f)) => {
                    assert!((e.ray_t - f.ray_t).abs() < 1e-9, "ray {:?}", ray);
                }
                (e, f) => panic!("disagreement on {:?}: {:?} vs {:?}", ray, e, f),
            }
        }
    }

    #[test]
    fn rebuilds_answer_identically() {
        let mut rng = StdRng::seed_from_u64(14);
        let triangles = random_scene(&mut rng, 100);
        let one = SahTree::build(triangles.clone());
        let two = SahTree::build(triangles);

        for _ in 0..200 {
            let ray = random_ray(&mut rng);
            match (one.intersect(&ray), two.intersect(&ray)) {
                (None, None) => {}
                (Some(a), Some(b)) => {
                    assert_eq!(a.ray_t, b.ray_t);
                    assert_eq!(a.s, b.s);
                    assert_eq!(a.t, b.t);
                }
                (a, b) => panic!("builds disagree: {:?} vs {:?}", a, b),
            }
        }
    }

    fn shifted_triangle(x: Float, z: Float) -> Triangle {
        Triangle::flat(
            [
                Vector3::new(x, 0.0, z),
                Vector3::new(x + 0.4, 0.0, z),
                Vector3::new(x, 0.4, z + 0.2),
            ],
            Vector3::ZERO,
            Vector3::ONE,
        )
        .unwrap()
    }
}
