//! Primitives.

use crate::geometry::*;
use crate::interaction::SurfaceInteraction;
use crate::material::ArcMaterial;
use crate::pbrt::*;
use crate::spectrum::Spectrum;
use std::sync::Arc;

/// Interface for geometric primitives and aggregates of primitives.
pub trait Primitive: Send + Sync {
    /// Returns the bounding box in world space.
    fn world_bound(&self) -> Bounds3f;

    /// Intersects a ray with the primitive, updating the ray's `t_max` to the
    /// closest hit.
    ///
    /// * `ray` - The ray.
    fn intersect(&self, ray: &mut Ray) -> Option<SurfaceInteraction>;

    /// Returns true if a ray intersects the primitive. Used for occlusion
    /// tests where the intersection details are not needed.
    ///
    /// * `ray` - The ray.
    fn intersect_p(&self, ray: &Ray) -> bool;
}

/// Atomic reference counted `Primitive`.
pub type ArcPrimitive = Arc<dyn Primitive>;

/// A sphere in world space.
pub struct Sphere {
    /// Center.
    center: Point3f,

    /// Radius.
    radius: Float,

    /// Material.
    material: Option<ArcMaterial>,

    /// Emitted radiance.
    emission: Spectrum,
}

impl Sphere {
    /// Create a new `Sphere`.
    ///
    /// * `center`   - Center.
    /// * `radius`   - Radius.
    /// * `material` - Material.
    pub fn new(center: Point3f, radius: Float, material: Option<ArcMaterial>) -> Self {
        Self {
            center,
            radius,
            material,
            emission: Spectrum::ZERO,
        }
    }

    /// Make the sphere emissive.
    ///
    /// * `le` - The emitted radiance.
    pub fn emissive(mut self, le: Spectrum) -> Self {
        self.emission = le;
        self
    }

    /// Returns the parametric hit distance of a ray, if any, within the
    /// ray's extent.
    ///
    /// * `ray` - The ray.
    fn hit_distance(&self, ray: &Ray) -> Option<Float> {
        let oc = ray.o - self.center;
        let a = ray.d.length_squared();
        let b = 2.0 * oc.dot(&ray.d);
        let c = oc.length_squared() - self.radius * self.radius;
        let (t0, t1) = quadratic(a, b, c)?;
        if t0 > ray.t_max || t1 <= 0.0 {
            return None;
        }
        let t_hit = if t0 > 0.0 { t0 } else { t1 };
        if t_hit > ray.t_max {
            None
        } else {
            Some(t_hit)
        }
    }
}

impl Primitive for Sphere {
    fn world_bound(&self) -> Bounds3f {
        let r = Vector3f::new(self.radius, self.radius, self.radius);
        Bounds3f::new(self.center - r, self.center + r)
    }

    fn intersect(&self, ray: &mut Ray) -> Option<SurfaceInteraction> {
        let t_hit = self.hit_distance(ray)?;
        ray.t_max = t_hit;

        let p = ray.at(t_hit);
        let n = Normal3f::from((p - self.center) / self.radius);
        let wo = (-ray.d).normalize();
        let mut si = SurfaceInteraction::new(
            p,
            n,
            wo,
            ray.time,
            5e-4 * t_hit,
            self.material.clone(),
        );
        si.emission = self.emission;
        si.compute_differentials(ray);
        Some(si)
    }

    fn intersect_p(&self, ray: &Ray) -> bool {
        self.hit_distance(ray).is_some()
    }
}

/// An aggregate that intersects its primitives in order.
pub struct PrimitiveList {
    /// The primitives.
    primitives: Vec<ArcPrimitive>,
}

impl PrimitiveList {
    /// Create a new `PrimitiveList`.
    ///
    /// * `primitives` - The primitives.
    pub fn new(primitives: Vec<ArcPrimitive>) -> Self {
        Self { primitives }
    }
}

impl Primitive for PrimitiveList {
    fn world_bound(&self) -> Bounds3f {
        self.primitives
            .iter()
            .fold(Bounds3f::empty(), |b, p| b.union(&p.world_bound()))
    }

    fn intersect(&self, ray: &mut Ray) -> Option<SurfaceInteraction> {
        let mut closest: Option<SurfaceInteraction> = None;
        for primitive in &self.primitives {
            // intersect() shrinks ray.t_max on a hit, so later hits are
            // always nearer.
            if let Some(si) = primitive.intersect(ray) {
                closest = Some(si);
            }
        }
        closest
    }

    fn intersect_p(&self, ray: &Ray) -> bool {
        self.primitives.iter().any(|p| p.intersect_p(ray))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn ray_hits_sphere_front_face() {
        let sphere = Sphere::new(Point3f::new(0.0, 0.0, 5.0), 1.0, None);
        let mut ray = Ray::new(Point3f::ZERO, Vector3f::new(0.0, 0.0, 1.0), INFINITY, 0.0);
        let si = sphere.intersect(&mut ray).expect("hit");
        assert!(approx_eq!(Float, ray.t_max, 4.0, epsilon = 1e-4));
        assert!(approx_eq!(Float, si.hit.p.z, 4.0, epsilon = 1e-4));
        assert!(si.hit.n.z < 0.0);
    }

    #[test]
    fn closest_primitive_wins() {
        let near = Arc::new(Sphere::new(Point3f::new(0.0, 0.0, 3.0), 1.0, None));
        let far = Arc::new(Sphere::new(Point3f::new(0.0, 0.0, 8.0), 1.0, None));
        let list = PrimitiveList::new(vec![far, near]);
        let mut ray = Ray::new(Point3f::ZERO, Vector3f::new(0.0, 0.0, 1.0), INFINITY, 0.0);
        let si = list.intersect(&mut ray).expect("hit");
        assert!(approx_eq!(Float, si.hit.p.z, 2.0, epsilon = 1e-4));
    }

    #[test]
    fn intersection_estimates_pixel_spacing() {
        let sphere = Sphere::new(Point3f::new(0.0, 0.0, 5.0), 1.0, None);
        let mut ray = Ray::new(Point3f::ZERO, Vector3f::new(0.0, 0.0, 1.0), INFINITY, 0.0);
        ray.differentials = Some(RayDifferential {
            rx_origin: Point3f::ZERO,
            ry_origin: Point3f::ZERO,
            rx_direction: Vector3f::new(0.001, 0.0, 1.0).normalize(),
            ry_direction: Vector3f::new(0.0, 0.001, 1.0).normalize(),
        });
        let si = sphere.intersect(&mut ray).expect("hit");
        // The hit is at distance 4, so a 0.001 angular offset spreads to a
        // 0.004 wide footprint on the tangent plane.
        assert!(approx_eq!(Float, si.pixel_spacing(), 0.004, epsilon = 1e-4));
    }

    #[test]
    fn missed_ray_reports_no_occlusion() {
        let sphere = Sphere::new(Point3f::new(0.0, 5.0, 0.0), 1.0, None);
        let ray = Ray::new(Point3f::ZERO, Vector3f::new(0.0, 0.0, 1.0), INFINITY, 0.0);
        assert!(!sphere.intersect_p(&ray));
    }
}
