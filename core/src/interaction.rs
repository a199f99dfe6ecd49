//! Interactions.

use crate::geometry::*;
use crate::material::ArcMaterial;
use crate::pbrt::*;
use crate::spectrum::Spectrum;

/// Geometric description of a point on a surface.
#[derive(Clone)]
pub struct Hit {
    /// Point of interaction.
    pub p: Point3f,

    /// Surface normal at the point of interaction.
    pub n: Normal3f,

    /// The outgoing direction (towards the viewer).
    pub wo: Vector3f,

    /// Time when interaction occurred.
    pub time: Float,
}

impl Hit {
    /// Create a new `Hit`.
    ///
    /// * `p`    - Point of interaction.
    /// * `n`    - Surface normal at the point of interaction.
    /// * `wo`   - The outgoing direction.
    /// * `time` - Time when interaction occurred.
    pub fn new(p: Point3f, n: Normal3f, wo: Vector3f, time: Float) -> Self {
        Self { p, n, wo, time }
    }
}

/// A ray-surface intersection.
#[derive(Clone)]
pub struct SurfaceInteraction {
    /// The geometric interaction.
    pub hit: Hit,

    /// Shading normal.
    pub ns: Normal3f,

    /// Offset used when spawning rays from the interaction point so they do
    /// not immediately re-intersect the same surface.
    pub ray_epsilon: Float,

    /// Positional differential with respect to screen x.
    pub dpdx: Vector3f,

    /// Positional differential with respect to screen y.
    pub dpdy: Vector3f,

    /// Material of the intersected primitive.
    pub material: Option<ArcMaterial>,

    /// Emitted radiance of the intersected primitive.
    pub emission: Spectrum,
}

impl SurfaceInteraction {
    /// Create a new `SurfaceInteraction`.
    ///
    /// * `p`           - Point of interaction.
    /// * `n`           - Surface normal at the point of interaction.
    /// * `wo`          - The outgoing direction.
    /// * `time`        - Time when interaction occurred.
    /// * `ray_epsilon` - Offset for spawned rays.
    /// * `material`    - Material of the intersected primitive.
    pub fn new(
        p: Point3f,
        n: Normal3f,
        wo: Vector3f,
        time: Float,
        ray_epsilon: Float,
        material: Option<ArcMaterial>,
    ) -> Self {
        Self {
            hit: Hit::new(p, n, wo, time),
            ns: n,
            ray_epsilon,
            dpdx: Vector3f::ZERO,
            dpdy: Vector3f::ZERO,
            material,
            emission: Spectrum::ZERO,
        }
    }

    /// Returns the emitted radiance in a direction. Only the side the surface
    /// normal faces emits.
    ///
    /// * `w` - The direction.
    pub fn le(&self, w: &Vector3f) -> Spectrum {
        if self.emission.is_black() || self.hit.n.dot(w) <= 0.0 {
            Spectrum::ZERO
        } else {
            self.emission
        }
    }

    /// Spawn a ray leaving the interaction point in a direction.
    ///
    /// * `d` - The normalized ray direction.
    pub fn spawn_ray(&self, d: &Vector3f) -> Ray {
        Ray::new(
            self.hit.p + *d * self.ray_epsilon,
            *d,
            INFINITY,
            self.hit.time,
        )
    }

    /// Estimate the positional differentials at the interaction point by
    /// intersecting the ray's auxiliary rays with the tangent plane. Leaves
    /// the differentials at zero when the ray carries none.
    ///
    /// * `ray` - The intersecting ray.
    pub fn compute_differentials(&mut self, ray: &Ray) {
        if let Some(diff) = ray.differentials {
            let n = Vector3f::from(self.hit.n);
            let p = self.hit.p;
            let dx = n.dot(&diff.rx_direction);
            let dy = n.dot(&diff.ry_direction);
            if dx != 0.0 && dy != 0.0 {
                let tx = n.dot(&(p - diff.rx_origin)) / dx;
                let ty = n.dot(&(p - diff.ry_origin)) / dy;
                self.dpdx = (diff.rx_origin + diff.rx_direction * tx) - p;
                self.dpdy = (diff.ry_origin + diff.ry_direction * ty) - p;
            }
        }
    }

    /// Returns the image plane sample spacing at the interaction point,
    /// estimated from the positional differentials. Zero when no
    /// differentials are available.
    pub fn pixel_spacing(&self) -> Float {
        self.dpdx.cross(&self.dpdy).length().sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawned_ray_is_offset_from_surface() {
        let si = SurfaceInteraction::new(
            Point3f::new(1.0, 2.0, 3.0),
            Normal3f::new(0.0, 0.0, 1.0),
            Vector3f::new(0.0, 0.0, 1.0),
            0.0,
            1e-3,
            None,
        );
        let d = Vector3f::new(0.0, 0.0, 1.0);
        let ray = si.spawn_ray(&d);
        assert_eq!(ray.o, Point3f::new(1.0, 2.0, 3.0 + 1e-3));
        assert_eq!(ray.t_max, INFINITY);
    }

    #[test]
    fn emission_is_one_sided() {
        let mut si = SurfaceInteraction::new(
            Point3f::ZERO,
            Normal3f::new(0.0, 0.0, 1.0),
            Vector3f::new(0.0, 0.0, 1.0),
            0.0,
            1e-3,
            None,
        );
        si.emission = Spectrum::ONE;
        assert_eq!(si.le(&Vector3f::new(0.0, 0.0, 1.0)), Spectrum::ONE);
        assert!(si.le(&Vector3f::new(0.0, 0.0, -1.0)).is_black());
    }
}
