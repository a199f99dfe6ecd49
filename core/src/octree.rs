//! Spatial point index octree.
//!
//! Stores values together with a spatial extent and answers point lookups:
//! `lookup(p)` visits every stored value whose insertion extent contains `p`.
//! Used for Poisson-disk rejection queries (extent = minimum-distance cube
//! around a candidate) and irradiance cache interpolation (extent = a
//! sample's zone of influence).

use crate::geometry::*;

/// Maximum number of entries a leaf holds before it is subdivided.
pub const LEAF_CAPACITY: usize = 8;

/// Maximum subdivision depth. At this depth leaves absorb overflow instead of
/// subdividing further so that coincident points cannot recurse unboundedly.
pub const MAX_DEPTH: usize = 16;

/// Handle of a node in the node pool.
type NodeIndex = u32;

/// Handle of an entry in the entry pool.
type EntryIndex = u32;

/// A stored value and its insertion extent.
struct Entry<T> {
    /// The spatial extent the value is relevant for.
    bound: Bounds3f,

    /// The stored value.
    value: T,
}

/// A node in the octree. Entries whose extent straddles an interior node's
/// midpoint stay resident at that node.
enum OctNode {
    Leaf {
        entries: Vec<EntryIndex>,
    },
    Interior {
        children: [Option<NodeIndex>; 8],
        straddlers: Vec<EntryIndex>,
    },
}

/// A bounding-box partitioned octree over point-like values with extents.
///
/// Nodes live in a handle-indexed pool and are released en masse when the
/// octree is dropped.
pub struct Octree<T> {
    /// The world bound of the octree.
    bound: Bounds3f,

    /// Node pool. The root is `nodes[0]`.
    nodes: Vec<OctNode>,

    /// Entry pool.
    entries: Vec<Entry<T>>,
}

impl<T> Octree<T> {
    /// Create a new empty octree over a world bound.
    ///
    /// * `bound` - The world bound.
    pub fn new(bound: Bounds3f) -> Self {
        Self {
            bound,
            nodes: vec![OctNode::Leaf { entries: vec![] }],
            entries: vec![],
        }
    }

    /// Returns the world bound of the octree.
    pub fn bound(&self) -> Bounds3f {
        self.bound
    }

    /// Returns the number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no entries are stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Add a value with a spatial extent. Insertion always succeeds; a full
    /// leaf is converted to an interior node and its entries redistributed.
    ///
    /// * `value` - The value to store.
    /// * `bound` - The extent the value is relevant for.
    pub fn add(&mut self, value: T, bound: Bounds3f) {
        let entry = self.entries.len() as EntryIndex;
        self.entries.push(Entry { bound, value });
        let root_bound = self.bound;
        self.add_entry(0, root_bound, entry, 0);
    }

    /// Visit every stored value whose insertion extent contains a point. The
    /// visitor returns false to terminate the lookup early.
    ///
    /// * `p`       - The lookup point.
    /// * `process` - The visitor.
    pub fn lookup<F>(&self, p: &Point3f, mut process: F)
    where
        F: FnMut(&T) -> bool,
    {
        if !self.bound.inside(p) {
            return;
        }

        let mut node = 0 as NodeIndex;
        let mut node_bound = self.bound;
        loop {
            match &self.nodes[node as usize] {
                OctNode::Leaf { entries } => {
                    let _ = self.visit(entries, p, &mut process);
                    return;
                }
                OctNode::Interior { children, straddlers } => {
                    if !self.visit(straddlers, p, &mut process) {
                        return;
                    }
                    let mid = node_bound.midpoint();
                    let child = child_index(p, &mid);
                    match children[child] {
                        Some(c) => {
                            node_bound = octree_child_bound(child, &node_bound, &mid);
                            node = c;
                        }
                        None => return,
                    }
                }
            }
        }
    }

    /// Visit the entries of one node, filtering by extent containment.
    /// Returns false if the visitor terminated the lookup.
    fn visit<F>(&self, entries: &[EntryIndex], p: &Point3f, process: &mut F) -> bool
    where
        F: FnMut(&T) -> bool,
    {
        for e in entries {
            let entry = &self.entries[*e as usize];
            if entry.bound.inside(p) && !process(&entry.value) {
                return false;
            }
        }
        true
    }

    /// Add an entry below a node.
    ///
    /// * `node`       - The node handle.
    /// * `node_bound` - The node's bounding box.
    /// * `entry`      - The entry handle.
    /// * `depth`      - The node's depth.
    fn add_entry(&mut self, node: NodeIndex, node_bound: Bounds3f, entry: EntryIndex, depth: usize) {
        let convert = match &mut self.nodes[node as usize] {
            OctNode::Leaf { entries } => {
                if depth == MAX_DEPTH || entries.len() < LEAF_CAPACITY {
                    entries.push(entry);
                    return;
                }
                true
            }
            OctNode::Interior { .. } => false,
        };

        if convert {
            // Convert leaf node to interior node and redistribute entries.
            let old = std::mem::replace(
                &mut self.nodes[node as usize],
                OctNode::Interior {
                    children: [None; 8],
                    straddlers: vec![],
                },
            );
            if let OctNode::Leaf { entries } = old {
                for e in entries {
                    self.add_to_interior(node, node_bound, e, depth);
                }
            }
        }

        self.add_to_interior(node, node_bound, entry, depth);
    }

    /// Add an entry to an interior node, either descending into the single
    /// child cell that contains its extent or keeping it resident here.
    fn add_to_interior(
        &mut self,
        node: NodeIndex,
        node_bound: Bounds3f,
        entry: EntryIndex,
        depth: usize,
    ) {
        let entry_bound = self.entries[entry as usize].bound;
        let mid = node_bound.midpoint();
        let centroid = entry_bound.midpoint();
        let child = child_index(&centroid, &mid);
        let child_bound = octree_child_bound(child, &node_bound, &mid);

        if !child_bound.contains(&entry_bound) {
            // The extent spans more than one child cell; it stays here.
            if let OctNode::Interior { straddlers, .. } = &mut self.nodes[node as usize] {
                straddlers.push(entry);
            }
            return;
        }

        let child_node = match &self.nodes[node as usize] {
            OctNode::Interior { children, .. } => children[child],
            OctNode::Leaf { .. } => unreachable!("add_to_interior called on leaf"),
        };
        let child_node = match child_node {
            Some(c) => c,
            None => {
                let c = self.nodes.len() as NodeIndex;
                self.nodes.push(OctNode::Leaf { entries: vec![] });
                if let OctNode::Interior { children, .. } = &mut self.nodes[node as usize] {
                    children[child] = Some(c);
                }
                c
            }
        };
        self.add_entry(child_node, child_bound, entry, depth + 1);
    }
}

/// Returns the child index for a point: each axis is compared against the
/// midpoint and the three results encode a 3-bit index.
///
/// * `p`   - The point.
/// * `mid` - The node's midpoint.
#[inline]
pub fn child_index(p: &Point3f, mid: &Point3f) -> usize {
    (if p.x > mid.x { 4 } else { 0 })
        + (if p.y > mid.y { 2 } else { 0 })
        + (if p.z > mid.z { 1 } else { 0 })
}

/// Returns the bounding box of a child cell.
///
/// * `child`      - The child index.
/// * `node_bound` - The parent node's bounding box.
/// * `mid`        - The parent node's midpoint.
pub fn octree_child_bound(child: usize, node_bound: &Bounds3f, mid: &Point3f) -> Bounds3f {
    let p_min = Point3f::new(
        if child & 4 != 0 { mid.x } else { node_bound.p_min.x },
        if child & 2 != 0 { mid.y } else { node_bound.p_min.y },
        if child & 1 != 0 { mid.z } else { node_bound.p_min.z },
    );
    let p_max = Point3f::new(
        if child & 4 != 0 { node_bound.p_max.x } else { mid.x },
        if child & 2 != 0 { node_bound.p_max.y } else { mid.y },
        if child & 1 != 0 { node_bound.p_max.z } else { mid.z },
    );
    Bounds3f { p_min, p_max }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pbrt::Float;
    use proptest::prelude::*;

    fn unit_bound() -> Bounds3f {
        Bounds3f::new(Point3f::ZERO, Point3f::new(1.0, 1.0, 1.0))
    }

    /// Extent cube of half-width `r` around a point.
    fn cube(p: Point3f, r: Float) -> Bounds3f {
        let delta = Vector3f::new(r, r, r);
        Bounds3f::new(p - delta, p + delta)
    }

    fn check_leaf_capacity<T>(octree: &Octree<T>) {
        fn walk<T>(octree: &Octree<T>, node: NodeIndex, depth: usize) {
            match &octree.nodes[node as usize] {
                OctNode::Leaf { entries } => {
                    if depth < MAX_DEPTH {
                        assert!(entries.len() <= LEAF_CAPACITY);
                    }
                }
                OctNode::Interior { children, .. } => {
                    for c in children.iter().flatten() {
                        walk(octree, *c, depth + 1);
                    }
                }
            }
        }
        walk(octree, 0, 0);
    }

    #[test]
    fn nine_points_in_one_cell_are_all_retrievable() {
        // All nine points land in the same first-level subdivision cell which
        // forces a leaf conversion; nothing may be dropped.
        let mut octree: Octree<usize> = Octree::new(unit_bound());
        let mut points = vec![];
        for i in 0..9 {
            let t = 0.05 + 0.04 * i as Float;
            let p = Point3f::new(t, t * 0.5, t * 0.25);
            octree.add(i, Bounds3f::from(p));
            points.push(p);
        }
        assert_eq!(octree.len(), 9);
        check_leaf_capacity(&octree);

        let mut found = vec![false; 9];
        for p in &points {
            octree.lookup(p, |i| {
                found[*i] = true;
                true
            });
        }
        assert!(found.iter().all(|f| *f));
    }

    #[test]
    fn lookup_respects_extents() {
        let mut octree: Octree<&str> = Octree::new(unit_bound());
        octree.add("near", cube(Point3f::new(0.5, 0.5, 0.5), 0.2));
        octree.add("far", cube(Point3f::new(0.1, 0.1, 0.1), 0.05));

        let mut seen = vec![];
        octree.lookup(&Point3f::new(0.55, 0.5, 0.5), |v| {
            seen.push(*v);
            true
        });
        assert_eq!(seen, vec!["near"]);

        seen.clear();
        octree.lookup(&Point3f::new(0.9, 0.9, 0.9), |v| {
            seen.push(*v);
            true
        });
        assert!(seen.is_empty());
    }

    #[test]
    fn lookup_outside_bound_finds_nothing() {
        let mut octree: Octree<usize> = Octree::new(unit_bound());
        octree.add(0, cube(Point3f::new(0.5, 0.5, 0.5), 0.4));
        let mut n = 0;
        octree.lookup(&Point3f::new(2.0, 2.0, 2.0), |_| {
            n += 1;
            true
        });
        assert_eq!(n, 0);
    }

    #[test]
    fn visitor_can_terminate_early() {
        let mut octree: Octree<usize> = Octree::new(unit_bound());
        let p = Point3f::new(0.5, 0.5, 0.5);
        for i in 0..4 {
            octree.add(i, cube(p, 0.3));
        }
        let mut n = 0;
        octree.lookup(&p, |_| {
            n += 1;
            false
        });
        assert_eq!(n, 1);
    }

    proptest! {
        #[test]
        fn inserted_points_are_found_at_their_position(
            points in prop::collection::vec((0.0f32..1.0, 0.0f32..1.0, 0.0f32..1.0), 1..200)
        ) {
            let mut octree: Octree<usize> = Octree::new(unit_bound());
            let points: Vec<Point3f> =
                points.iter().map(|(x, y, z)| Point3f::new(*x, *y, *z)).collect();
            for (i, p) in points.iter().enumerate() {
                octree.add(i, cube(*p, 0.01));
            }
            check_leaf_capacity(&octree);
            for (i, p) in points.iter().enumerate() {
                let mut found = false;
                octree.lookup(p, |j| {
                    found = found || *j == i;
                    true
                });
                prop_assert!(found);
            }
        }
    }
}
