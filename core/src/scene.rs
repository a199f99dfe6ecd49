//! Scene.

use crate::geometry::*;
use crate::interaction::SurfaceInteraction;
use crate::light::ArcLight;
use crate::medium::ArcMedium;
use crate::primitive::ArcPrimitive;
use crate::rng::RNG;
use crate::spectrum::Spectrum;

/// The scene being rendered: an aggregate of primitives, the light sources
/// and an optional global participating medium.
pub struct Scene {
    /// The aggregate of all primitives.
    pub aggregate: ArcPrimitive,

    /// The light sources.
    pub lights: Vec<ArcLight>,

    /// An optional global participating medium.
    pub global_medium: Option<ArcMedium>,

    /// The world space bounding box of the aggregate.
    world_bound: Bounds3f,
}

impl Scene {
    /// Create a new `Scene`.
    ///
    /// * `aggregate` - The aggregate of all primitives.
    /// * `lights`    - The light sources.
    pub fn new(aggregate: ArcPrimitive, lights: Vec<ArcLight>) -> Self {
        if lights.is_empty() {
            warn!("Scene has no light sources; images will be black.");
        }
        let world_bound = aggregate.world_bound();
        Self {
            aggregate,
            lights,
            global_medium: None,
            world_bound,
        }
    }

    /// Attach a global participating medium.
    ///
    /// * `medium` - The medium.
    pub fn with_medium(mut self, medium: ArcMedium) -> Self {
        self.global_medium = Some(medium);
        self
    }

    /// Returns the world space bounding box of the scene.
    pub fn world_bound(&self) -> Bounds3f {
        self.world_bound
    }

    /// Intersects a ray with the scene, updating the ray's `t_max` to the
    /// closest hit.
    ///
    /// * `ray` - The ray.
    pub fn intersect(&self, ray: &mut Ray) -> Option<SurfaceInteraction> {
        self.aggregate.intersect(ray)
    }

    /// Returns true if a ray intersects any primitive.
    ///
    /// * `ray` - The ray.
    pub fn intersect_p(&self, ray: &Ray) -> bool {
        self.aggregate.intersect_p(ray)
    }

    /// Returns the transmittance along a ray through the global medium, or
    /// full transmittance if there is none.
    ///
    /// * `ray` - The ray.
    /// * `rng` - The random number generator.
    pub fn transmittance(&self, ray: &Ray, rng: &mut RNG) -> Spectrum {
        match &self.global_medium {
            Some(medium) => medium.tr(ray, rng),
            None => Spectrum::ONE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::light::PointLight;
    use crate::primitive::{PrimitiveList, Sphere};
    use std::sync::Arc;

    #[test]
    fn world_bound_covers_all_primitives() {
        let a = Arc::new(Sphere::new(Point3f::new(-2.0, 0.0, 0.0), 1.0, None));
        let b = Arc::new(Sphere::new(Point3f::new(3.0, 0.0, 0.0), 1.0, None));
        let scene = Scene::new(
            Arc::new(PrimitiveList::new(vec![a, b])),
            vec![Arc::new(PointLight::new(Point3f::ZERO, Spectrum::ONE))],
        );
        let wb = scene.world_bound();
        assert_eq!(wb.p_min.x, -3.0);
        assert_eq!(wb.p_max.x, 4.0);
    }
}
