//! Hierarchical aggregation of irradiance points for dipole evaluation.

use core::bssrdf::fresnel_diffuse_reflectance;
use core::geometry::*;
use core::octree::{child_index, octree_child_bound};
use core::pbrt::*;
use core::spectrum::*;

/// Leaf capacity, matching the spatial point index.
const LEAF_CAPACITY: usize = 8;

/// Maximum subdivision depth; deeper leaves absorb overflow.
const MAX_DEPTH: usize = 16;

/// A seeded surface sample with its accumulated irradiance.
pub struct IrradiancePoint {
    /// Position.
    pub p: Point3f,

    /// Surface normal.
    pub n: Normal3f,

    /// Offset used when spawning rays from the point.
    pub ray_epsilon: Float,

    /// Disk area estimate around the point.
    pub area: Float,

    /// Accumulated irradiance, summed over all scene lights.
    pub e: Spectrum,
}

enum NodeKind {
    Leaf { points: Vec<u32> },
    Interior { children: [Option<u32>; 8] },
}

/// An octree node with its bottom-up aggregate summary. The summary fields
/// are only meaningful after the hierarchy initialization pass.
struct Node {
    kind: NodeKind,

    /// Luminance-weighted mean position of the subtree's points.
    p: Point3f,

    /// Mean irradiance of the subtree.
    e: Spectrum,

    /// Total area of the subtree's points.
    sum_area: Float,
}

impl Node {
    fn leaf() -> Self {
        Self {
            kind: NodeKind::Leaf { points: vec![] },
            p: Point3f::ZERO,
            e: Spectrum::ZERO,
            sum_area: 0.0,
        }
    }
}

/// Octree over irradiance points supporting error-bounded hierarchical
/// evaluation of total diffuse reflectance: subtrees far enough from a
/// query point are approximated by their aggregate summary.
pub struct SubsurfaceOctree {
    bound: Bounds3f,
    nodes: Vec<Node>,
    points: Vec<IrradiancePoint>,
}

impl SubsurfaceOctree {
    /// Build an octree over a set of irradiance points: insert every point
    /// and run the bottom-up aggregation pass. The points are immutable for
    /// the octree's lifetime.
    ///
    /// * `points` - The irradiance points.
    pub fn build(points: Vec<IrradiancePoint>) -> Self {
        let bound = points
            .iter()
            .fold(Bounds3f::empty(), |b, ip| b.union(&ip.p));
        let pad = 0.001 * bound.volume().cbrt();
        let bound = bound.expand(max(pad, 1e-4));

        let mut octree = Self {
            bound,
            nodes: vec![Node::leaf()],
            points,
        };
        // Points without any gathered irradiance can never contribute to an
        // evaluation, but their luminance weight of zero would still drag
        // sibling aggregates down. Leave them out of the hierarchy.
        for i in 0..octree.points.len() {
            if octree.points[i].e.y() > 0.0 {
                octree.insert(0, bound, i as u32, 0);
            }
        }
        octree.init_hierarchy(0);
        octree
    }

    /// Returns the number of stored irradiance points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if no points are stored.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Evaluate the total diffuse reflectance at a query point by summing
    /// `kernel(d²) · E · area` over all points, approximating distant
    /// subtrees by their aggregates.
    ///
    /// * `pt`        - The query point.
    /// * `kernel`    - The diffusion reflectance kernel.
    /// * `max_error` - The solid-angle-like approximation threshold.
    pub fn mo(&self, pt: &Point3f, kernel: &DiffusionReflectance, max_error: Float) -> Spectrum {
        if self.points.is_empty() {
            return Spectrum::ZERO;
        }
        self.mo_node(0, self.bound, pt, kernel, max_error)
    }

    fn mo_node(
        &self,
        node: u32,
        node_bound: Bounds3f,
        pt: &Point3f,
        kernel: &DiffusionReflectance,
        max_error: Float,
    ) -> Spectrum {
        let n = &self.nodes[node as usize];

        // The subtree subtends a small enough solid angle to act as a single
        // aggregate point, unless the query sits inside its bound where the
        // near field dominates.
        let dw = n.sum_area / pt.distance_squared(n.p);
        if dw < max_error && !node_bound.inside(pt) {
            return kernel.evaluate(pt.distance_squared(n.p)) * n.e * n.sum_area;
        }

        let mut mo = Spectrum::ZERO;
        match &n.kind {
            NodeKind::Leaf { points } => {
                for i in points {
                    let ip = &self.points[*i as usize];
                    mo += kernel.evaluate(pt.distance_squared(ip.p)) * ip.e * ip.area;
                }
            }
            NodeKind::Interior { children } => {
                let mid = node_bound.midpoint();
                for (child, c) in children.iter().enumerate() {
                    if let Some(c) = c {
                        let child_bound = octree_child_bound(child, &node_bound, &mid);
                        mo += self.mo_node(*c, child_bound, pt, kernel, max_error);
                    }
                }
            }
        }
        mo
    }

    fn insert(&mut self, node: u32, node_bound: Bounds3f, point: u32, depth: usize) {
        let convert = match &mut self.nodes[node as usize].kind {
            NodeKind::Leaf { points } => {
                if depth == MAX_DEPTH || points.len() < LEAF_CAPACITY {
                    points.push(point);
                    return;
                }
                true
            }
            NodeKind::Interior { .. } => false,
        };

        if convert {
            // Convert leaf node to interior node and redistribute points.
            let old = std::mem::replace(
                &mut self.nodes[node as usize].kind,
                NodeKind::Interior { children: [None; 8] },
            );
            if let NodeKind::Leaf { points } = old {
                for i in points {
                    self.insert_into_child(node, node_bound, i, depth);
                }
            }
        }

        self.insert_into_child(node, node_bound, point, depth);
    }

    fn insert_into_child(&mut self, node: u32, node_bound: Bounds3f, point: u32, depth: usize) {
        let p = self.points[point as usize].p;
        let mid = node_bound.midpoint();
        let child = child_index(&p, &mid);
        let child_bound = octree_child_bound(child, &node_bound, &mid);

        let child_node = match &self.nodes[node as usize].kind {
            NodeKind::Interior { children } => children[child],
            NodeKind::Leaf { .. } => unreachable!("insert_into_child called on leaf"),
        };
        let child_node = match child_node {
            Some(c) => c,
            None => {
                let c = self.nodes.len() as u32;
                self.nodes.push(Node::leaf());
                if let NodeKind::Interior { children } = &mut self.nodes[node as usize].kind {
                    children[child] = Some(c);
                }
                c
            }
        };
        self.insert(child_node, child_bound, point, depth + 1);
    }

    /// Bottom-up aggregation pass: each node's summary becomes the
    /// luminance-weighted mean position, mean irradiance and total area of
    /// its subtree.
    fn init_hierarchy(&mut self, node: u32) {
        let mut p = Point3f::ZERO;
        let mut e = Spectrum::ZERO;
        let mut sum_wt = 0.0;
        let mut sum_area = 0.0;

        match &self.nodes[node as usize].kind {
            NodeKind::Leaf { points } => {
                let count = points.len();
                for i in points.clone() {
                    let ip = &self.points[i as usize];
                    let wt = ip.e.y();
                    e += ip.e;
                    p = p + ip.p * wt;
                    sum_wt += wt;
                    sum_area += ip.area;
                }
                if count > 0 {
                    e /= count as Float;
                }
            }
            NodeKind::Interior { children } => {
                let children: Vec<u32> = children.iter().flatten().copied().collect();
                for c in &children {
                    self.init_hierarchy(*c);
                }
                for c in &children {
                    let child = &self.nodes[*c as usize];
                    let wt = child.e.y();
                    e += child.e;
                    p = p + child.p * wt;
                    sum_wt += wt;
                    sum_area += child.sum_area;
                }
                if !children.is_empty() {
                    e /= children.len() as Float;
                }
            }
        }
        if sum_wt > 0.0 {
            p = p / sum_wt;
        }

        let n = &mut self.nodes[node as usize];
        n.p = p;
        n.e = e;
        n.sum_area = sum_area;
    }
}

/// The classical dipole diffusion reflectance kernel: a pure function of
/// squared distance, parameterized by the medium's scattering coefficients
/// and a refractive-index-derived boundary term.
pub struct DiffusionReflectance {
    zpos: Spectrum,
    zneg: Spectrum,
    sigma_tr: Spectrum,
    alpha_prime: Spectrum,
}

impl DiffusionReflectance {
    /// Create a new `DiffusionReflectance` kernel.
    ///
    /// * `sigma_a`       - Absorption coefficient.
    /// * `sigma_prime_s` - Reduced scattering coefficient.
    /// * `eta`           - Relative index of refraction.
    pub fn new(sigma_a: Spectrum, sigma_prime_s: Spectrum, eta: Float) -> Self {
        let fdr = fresnel_diffuse_reflectance(eta);
        let a = (1.0 + fdr) / (1.0 - fdr);
        let sigma_prime_t = sigma_a + sigma_prime_s;
        let zpos = Spectrum::ONE / sigma_prime_t;
        Self {
            zpos,
            zneg: -(zpos * (1.0 + (4.0 / 3.0) * a)),
            sigma_tr: (sigma_a * sigma_prime_t * 3.0).sqrt(),
            alpha_prime: sigma_prime_s / sigma_prime_t,
        }
    }

    /// Evaluate the kernel at a squared distance.
    ///
    /// * `d2` - The squared distance between query and sample.
    pub fn evaluate(&self, d2: Float) -> Spectrum {
        let dpos = (Spectrum::new(d2) + self.zpos * self.zpos).sqrt();
        let dneg = (Spectrum::new(d2) + self.zneg * self.zneg).sqrt();
        let rd = self.alpha_prime
            * INV_FOUR_PI
            * ((self.zpos * (dpos * self.sigma_tr + Spectrum::ONE) * (-(self.sigma_tr * dpos)).exp())
                / (dpos * dpos * dpos)
                - (self.zneg * (dneg * self.sigma_tr + Spectrum::ONE)
                    * (-(self.sigma_tr * dneg)).exp())
                    / (dneg * dneg * dneg));
        rd.clamp_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    fn grid_points(n: usize, e: Float) -> Vec<IrradiancePoint> {
        let mut points = vec![];
        for i in 0..n {
            for j in 0..n {
                points.push(IrradiancePoint {
                    p: Point3f::new(i as Float * 0.2, j as Float * 0.2, 0.0),
                    n: Normal3f::new(0.0, 0.0, 1.0),
                    ray_epsilon: 1e-4,
                    area: 0.01,
                    e: Spectrum::new(e),
                });
            }
        }
        points
    }

    fn brute_force_mo(
        points: &[IrradiancePoint],
        pt: &Point3f,
        kernel: &DiffusionReflectance,
    ) -> Spectrum {
        let mut mo = Spectrum::ZERO;
        for ip in points {
            mo += kernel.evaluate(pt.distance_squared(ip.p)) * ip.e * ip.area;
        }
        mo
    }

    fn kernel() -> DiffusionReflectance {
        DiffusionReflectance::new(Spectrum::new(0.1), Spectrum::new(1.0), 1.3)
    }

    #[test]
    fn kernel_is_pure() {
        let k = kernel();
        let a = k.evaluate(0.37);
        let b = k.evaluate(0.37);
        assert_eq!(a.to_rgb(), b.to_rgb());
    }

    #[test]
    fn kernel_decreases_with_distance() {
        let k = kernel();
        assert!(k.evaluate(0.01).y() > k.evaluate(0.04).y());
        assert!(k.evaluate(0.04).y() > k.evaluate(1.0).y());
    }

    #[test]
    fn zero_error_threshold_matches_brute_force_exactly() {
        let points = grid_points(4, 1.0);
        let reference = brute_force_mo(&points, &Point3f::new(1.5, 0.3, 0.4), &kernel());
        let octree = SubsurfaceOctree::build(grid_points(4, 1.0));
        // With a zero threshold no subtree ever qualifies for approximation.
        let mo = octree.mo(&Point3f::new(1.5, 0.3, 0.4), &kernel(), 0.0);
        assert!(approx_eq!(Float, mo[0], reference[0], epsilon = 1e-6));
    }

    #[test]
    fn approximation_converges_to_brute_force() {
        let points = grid_points(8, 2.0);
        let pt = Point3f::new(5.0, 5.0, 2.0);
        let reference = brute_force_mo(&points, &pt, &kernel());
        let octree = SubsurfaceOctree::build(grid_points(8, 2.0));

        let loose = octree.mo(&pt, &kernel(), 1.0);
        let tight = octree.mo(&pt, &kernel(), 1e-4);
        let loose_err = abs(loose.y() - reference.y());
        let tight_err = abs(tight.y() - reference.y());
        assert!(tight_err <= loose_err + 1e-7);
        assert!(approx_eq!(
            Float,
            tight.y(),
            reference.y(),
            epsilon = 1e-5
        ));
    }

    #[test]
    fn aggregates_are_consistent_bottom_up() {
        let octree = SubsurfaceOctree::build(grid_points(6, 1.0));
        let total_area: Float = octree.points.iter().map(|ip| ip.area).sum();

        fn check(octree: &SubsurfaceOctree, node: u32) {
            let n = &octree.nodes[node as usize];
            match &n.kind {
                NodeKind::Leaf { points } => {
                    let area: Float = points
                        .iter()
                        .map(|i| octree.points[*i as usize].area)
                        .sum();
                    assert!(approx_eq!(Float, n.sum_area, area, epsilon = 1e-5));
                }
                NodeKind::Interior { children } => {
                    let mut area = 0.0;
                    for c in children.iter().flatten() {
                        check(octree, *c);
                        area += octree.nodes[*c as usize].sum_area;
                    }
                    assert!(approx_eq!(Float, n.sum_area, area, epsilon = 1e-5));
                }
            }
            assert!(octree.bound.inside(&n.p));
        }
        check(&octree, 0);
        assert!(approx_eq!(
            Float,
            octree.nodes[0].sum_area,
            total_area,
            epsilon = 1e-5
        ));
    }

    #[test]
    fn dark_points_do_not_skew_aggregates() {
        // One lit point surrounded by points that gathered no irradiance.
        let mut points = vec![IrradiancePoint {
            p: Point3f::ZERO,
            n: Normal3f::new(0.0, 0.0, 1.0),
            ray_epsilon: 1e-4,
            area: 0.01,
            e: Spectrum::new(2.0),
        }];
        for i in 0..8 {
            points.push(IrradiancePoint {
                p: Point3f::new(0.1 * (i + 1) as Float, 0.1, 0.0),
                n: Normal3f::new(0.0, 0.0, 1.0),
                ray_epsilon: 1e-4,
                area: 0.01,
                e: Spectrum::ZERO,
            });
        }
        let pt = Point3f::new(2.0, 0.0, 0.5);
        let reference = brute_force_mo(&points, &pt, &kernel());
        let octree = SubsurfaceOctree::build(points);

        // A threshold this loose forces the aggregate path; the dark points
        // must not dilute the mean irradiance or shift the mean position.
        let mo = octree.mo(&pt, &kernel(), 1e6);
        assert!(!mo.is_black());
        assert!(approx_eq!(Float, mo[0], reference[0], epsilon = 1e-7));
    }

    #[test]
    fn empty_octree_contributes_nothing() {
        let octree = SubsurfaceOctree::build(vec![]);
        let mo = octree.mo(&Point3f::ZERO, &kernel(), 0.05);
        assert!(mo.is_black());
    }
}
