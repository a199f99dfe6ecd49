//! Integrators.

use crate::camera::Camera;
use crate::geometry::*;
use crate::interaction::SurfaceInteraction;
use crate::light::Light;
use crate::pbrt::*;
use crate::reflection::*;
use crate::rng::RNG;
use crate::sampling::power_heuristic;
use crate::scene::Scene;
use crate::spectrum::Spectrum;
use bumpalo::Bump;

/// Interface for integrators.
pub trait Integrator: Send + Sync {
    /// Perform scene-dependent setup before rendering begins.
    ///
    /// * `scene`  - The scene.
    /// * `camera` - The camera the scene will be rendered from.
    fn preprocess(&self, _scene: &Scene, _camera: &dyn Camera) {}

    /// Returns the incident radiance along a ray.
    ///
    /// * `ray`   - The ray. Its `t_max` is updated to the closest hit.
    /// * `scene` - The scene.
    /// * `rng`   - The random number generator.
    /// * `arena` - The arena for BSDF allocations.
    /// * `depth` - The current recursion depth.
    fn li(
        &self,
        ray: &mut Ray,
        scene: &Scene,
        rng: &mut RNG,
        arena: &Bump,
        depth: usize,
    ) -> Spectrum;
}

/// Estimate direct lighting at an intersection by sampling every light.
///
/// * `scene` - The scene.
/// * `si`    - The surface interaction.
/// * `bsdf`  - The BSDF at the intersection.
/// * `rng`   - The random number generator.
pub fn uniform_sample_all_lights(
    scene: &Scene,
    si: &SurfaceInteraction,
    bsdf: &dyn Bsdf,
    rng: &mut RNG,
) -> Spectrum {
    let mut l = Spectrum::ZERO;
    for light in &scene.lights {
        let n = light.n_samples();
        let mut ld = Spectrum::ZERO;
        for _ in 0..n {
            let u_light = Point2f::new(rng.uniform_float(), rng.uniform_float());
            let u_scattering = Point2f::new(rng.uniform_float(), rng.uniform_float());
            ld += estimate_direct(scene, light.as_ref(), si, bsdf, &u_light, &u_scattering, rng);
        }
        l += ld / n as Float;
    }
    l
}

/// Estimate direct lighting at an intersection by sampling a single light
/// chosen uniformly at random. The estimate is scaled by the number of lights
/// to stay unbiased.
///
/// * `scene` - The scene.
/// * `si`    - The surface interaction.
/// * `bsdf`  - The BSDF at the intersection.
/// * `rng`   - The random number generator.
pub fn uniform_sample_one_light(
    scene: &Scene,
    si: &SurfaceInteraction,
    bsdf: &dyn Bsdf,
    rng: &mut RNG,
) -> Spectrum {
    let n_lights = scene.lights.len();
    if n_lights == 0 {
        return Spectrum::ZERO;
    }
    let light = scene.lights[rng.bounded_uniform_u32(n_lights as u32) as usize].as_ref();
    let u_light = Point2f::new(rng.uniform_float(), rng.uniform_float());
    let u_scattering = Point2f::new(rng.uniform_float(), rng.uniform_float());
    estimate_direct(scene, light, si, bsdf, &u_light, &u_scattering, rng) * n_lights as Float
}

/// Estimate direct lighting from a single light using multiple importance
/// sampling of the light and the BSDF.
///
/// * `scene`        - The scene.
/// * `light`        - The light.
/// * `si`           - The surface interaction.
/// * `bsdf`         - The BSDF at the intersection.
/// * `u_light`      - The random sample point for the light.
/// * `u_scattering` - The random sample point for the BSDF.
/// * `rng`          - The random number generator.
pub fn estimate_direct(
    scene: &Scene,
    light: &dyn Light,
    si: &SurfaceInteraction,
    bsdf: &dyn Bsdf,
    u_light: &Point2f,
    u_scattering: &Point2f,
    rng: &mut RNG,
) -> Spectrum {
    let flags = BxDFType::BSDF_ALL & !BxDFType::BSDF_SPECULAR;
    let mut ld = Spectrum::ZERO;
    let wo = si.hit.wo;
    let ns = si.ns;

    // Sample the light source.
    let li = light.sample_li(&si.hit, si.ray_epsilon, u_light);
    if li.pdf > 0.0 && !li.value.is_black() {
        let f = bsdf.f(&wo, &li.wi, flags);
        if !f.is_black() && li.visibility.unoccluded(scene) {
            let value = li.value * li.visibility.transmittance(scene, rng);
            if light.is_delta_light() {
                ld += f * value * (ns.abs_dot(&li.wi) / li.pdf);
            } else {
                let bsdf_pdf = bsdf.pdf(&wo, &li.wi, flags);
                let weight = power_heuristic(1, li.pdf, 1, bsdf_pdf);
                ld += f * value * (ns.abs_dot(&li.wi) * weight / li.pdf);
            }
        }
    }

    // Sample the BSDF; pointless for delta lights since they can never be
    // hit by a sampled direction.
    if !light.is_delta_light() {
        if let Some(s) = bsdf.sample_f(&wo, u_scattering, flags) {
            if s.pdf > 0.0 && !s.f.is_black() {
                let light_pdf = light.pdf_li(&si.hit, &s.wi);
                if light_pdf > 0.0 {
                    let weight = power_heuristic(1, s.pdf, 1, light_pdf);
                    let mut ray = si.spawn_ray(&s.wi);
                    let li_value = if scene.intersect(&mut ray).is_none() {
                        light.le(&ray)
                    } else {
                        Spectrum::ZERO
                    };
                    if !li_value.is_black() {
                        let tr = scene.transmittance(&ray, rng);
                        ld += s.f * li_value * tr * (ns.abs_dot(&s.wi) * weight / s.pdf);
                    }
                }
            }
        }
    }

    ld
}

/// Trace the perfect specular reflection at an intersection, recursing into
/// the integrator.
///
/// * `integrator` - The integrator.
/// * `si`         - The surface interaction.
/// * `bsdf`       - The BSDF at the intersection.
/// * `scene`      - The scene.
/// * `rng`        - The random number generator.
/// * `arena`      - The arena for BSDF allocations.
/// * `depth`      - The current recursion depth.
pub fn specular_reflect(
    integrator: &dyn Integrator,
    si: &SurfaceInteraction,
    bsdf: &dyn Bsdf,
    scene: &Scene,
    rng: &mut RNG,
    arena: &Bump,
    depth: usize,
) -> Spectrum {
    let flags = BxDFType::BSDF_REFLECTION | BxDFType::BSDF_SPECULAR;
    trace_specular(integrator, si, bsdf, scene, rng, arena, depth, flags)
}

/// Trace the perfect specular transmission at an intersection, recursing
/// into the integrator.
///
/// * `integrator` - The integrator.
/// * `si`         - The surface interaction.
/// * `bsdf`       - The BSDF at the intersection.
/// * `scene`      - The scene.
/// * `rng`        - The random number generator.
/// * `arena`      - The arena for BSDF allocations.
/// * `depth`      - The current recursion depth.
pub fn specular_transmit(
    integrator: &dyn Integrator,
    si: &SurfaceInteraction,
    bsdf: &dyn Bsdf,
    scene: &Scene,
    rng: &mut RNG,
    arena: &Bump,
    depth: usize,
) -> Spectrum {
    let flags = BxDFType::BSDF_TRANSMISSION | BxDFType::BSDF_SPECULAR;
    trace_specular(integrator, si, bsdf, scene, rng, arena, depth, flags)
}

#[allow(clippy::too_many_arguments)]
fn trace_specular(
    integrator: &dyn Integrator,
    si: &SurfaceInteraction,
    bsdf: &dyn Bsdf,
    scene: &Scene,
    rng: &mut RNG,
    arena: &Bump,
    depth: usize,
    flags: BxDFType,
) -> Spectrum {
    let wo = si.hit.wo;
    let u = Point2f::new(rng.uniform_float(), rng.uniform_float());
    if let Some(s) = bsdf.sample_f(&wo, &u, flags) {
        let cos_theta = si.ns.abs_dot(&s.wi);
        if s.pdf > 0.0 && !s.f.is_black() && cos_theta != 0.0 {
            let mut ray = si.spawn_ray(&s.wi);
            let li = integrator.li(&mut ray, scene, rng, arena, depth + 1);
            return s.f * li * (cos_theta / s.pdf);
        }
    }
    Spectrum::ZERO
}
