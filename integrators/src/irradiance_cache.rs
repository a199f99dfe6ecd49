//! Irradiance Cache Integrator

use bumpalo::Bump;
use core::app::OPTIONS;
use core::camera::*;
use core::geometry::*;
use core::integrator::*;
use core::interaction::*;
use core::low_discrepancy::sample_02;
use core::octree::Octree;
use core::paramset::*;
use core::pbrt::*;
use core::reflection::*;
use core::rng::RNG;
use core::sampling::cosine_sample_hemisphere;
use core::scene::Scene;
use core::spectrum::*;
use indicatif::ProgressBar;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;
use std::thread;

/// Number of tasks used to prime the cache before rendering.
const N_PRIMING_TASKS: usize = 64;

/// Raster stride between priming samples.
const PRIMING_STRIDE: usize = 4;

/// A cached irradiance estimate with its zone of influence.
struct IrradianceSample {
    /// The irradiance estimate.
    e: Spectrum,

    /// Position of the estimate.
    p: Point3f,

    /// Surface normal at the estimate.
    n: Normal3f,

    /// Average incident direction, weighted by luminance. Not normalized.
    w_avg: Vector3f,

    /// Validity radius.
    max_dist: Float,
}

/// Estimates radiance by caching and interpolating expensive hemispherical
/// irradiance estimates across nearby shading points.
///
/// The cache grows lazily and monotonically: a lookup that fails to gather
/// enough interpolation weight computes a fresh Monte Carlo estimate and
/// inserts it, and entries are never removed until teardown.
pub struct IrradianceCacheIntegrator {
    /// Minimum interpolation weight required for a cache hit.
    min_weight: Float,

    /// Lower bound on a sample's validity radius, in pixel spacings.
    min_sample_pixel_spacing: Float,

    /// Upper bound on a sample's validity radius, in pixel spacings.
    max_sample_pixel_spacing: Float,

    /// Cosine of the largest acceptable angle between a query normal and a
    /// sample normal.
    cos_max_sample_angle_difference: Float,

    /// Number of hemisphere samples for a fresh irradiance estimate.
    n_samples: usize,

    /// Maximum recursion depth for specular reflection and transmission.
    max_specular_depth: usize,

    /// Maximum path length for indirect estimates.
    max_indirect_depth: usize,

    /// True while the cache is being primed; raises the hit threshold so
    /// priming deposits samples a little more densely.
    priming: AtomicBool,

    /// The cache, created in `preprocess` once the scene bound is known.
    cache: RwLock<Option<Octree<IrradianceSample>>>,
}

impl IrradianceCacheIntegrator {
    /// Create a new `IrradianceCacheIntegrator`.
    ///
    /// * `min_weight`               - Minimum interpolation weight for a hit.
    /// * `min_sample_pixel_spacing` - Lower validity radius bound in pixels.
    /// * `max_sample_pixel_spacing` - Upper validity radius bound in pixels.
    /// * `max_angle_difference`     - Largest acceptable normal deviation in
    ///                                degrees.
    /// * `n_samples`                - Hemisphere samples per fresh estimate.
    /// * `max_specular_depth`       - Maximum specular recursion depth.
    /// * `max_indirect_depth`       - Maximum indirect path length.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        min_weight: Float,
        min_sample_pixel_spacing: Float,
        max_sample_pixel_spacing: Float,
        max_angle_difference: Float,
        n_samples: usize,
        max_specular_depth: usize,
        max_indirect_depth: usize,
    ) -> Self {
        Self {
            min_weight,
            min_sample_pixel_spacing,
            max_sample_pixel_spacing,
            cos_max_sample_angle_difference: cos(max_angle_difference.to_radians()),
            n_samples: max(1, n_samples),
            max_specular_depth,
            max_indirect_depth,
            priming: AtomicBool::new(false),
            cache: RwLock::new(None),
        }
    }

    /// Returns the number of cached irradiance samples.
    pub fn cached_samples(&self) -> usize {
        self.cache
            .read()
            .unwrap()
            .as_ref()
            .map_or(0, |octree| octree.len())
    }

    /// The hit threshold is raised while priming so the primed cache is a
    /// little denser than strictly necessary.
    fn effective_min_weight(&self) -> Float {
        if self.priming.load(Ordering::Relaxed) {
            self.min_weight * 1.5
        } else {
            self.min_weight
        }
    }

    /// Interpolate the cached irradiance at a point, or report a miss.
    /// Returns the blended irradiance and the blended (unnormalized) average
    /// incident direction.
    ///
    /// * `p` - The shading point.
    /// * `n` - The surface normal at the shading point.
    fn interpolate_e(&self, p: &Point3f, n: &Normal3f) -> Option<(Spectrum, Vector3f)> {
        let lock = self.cache.read().unwrap();
        let octree = lock.as_ref()?;

        let mut e = Spectrum::ZERO;
        let mut w_avg = Vector3f::ZERO;
        let mut sum_wt = 0.0;
        let mut n_found = 0;
        octree.lookup(p, |sample: &IrradianceSample| {
            // Combined positional and angular error; a sample only
            // contributes while both stay below their thresholds.
            let perr = p.distance(sample.p) / sample.max_dist;
            let nerr = (max(0.0, 1.0 - n.dot(&sample.n))
                / (1.0 - self.cos_max_sample_angle_difference))
                .sqrt();
            let err = max(perr, nerr);
            if err < 1.0 {
                n_found += 1;
                let wt = 1.0 - err;
                e += sample.e * wt;
                w_avg += sample.w_avg * wt;
                sum_wt += wt;
            }
            true
        });

        if n_found > 0 && sum_wt >= self.effective_min_weight() {
            Some((e / sum_wt, w_avg))
        } else {
            None
        }
    }

    /// Compute a fresh irradiance estimate by cosine-sampling the hemisphere
    /// around a normal and path tracing each direction, then insert it into
    /// the cache. Returns the irradiance and average incident direction.
    ///
    /// * `si`    - The surface interaction.
    /// * `ng`    - The hemisphere normal.
    /// * `scene` - The scene.
    /// * `rng`   - The random number generator.
    /// * `arena` - The arena for BSDF allocations.
    fn compute_and_cache_e(
        &self,
        si: &SurfaceInteraction,
        ng: Normal3f,
        scene: &Scene,
        rng: &mut RNG,
        arena: &Bump,
    ) -> (Spectrum, Vector3f) {
        let frame = ShadingFrame::new(ng);
        let scramble = [rng.uniform_u32(), rng.uniform_u32()];

        let mut li_sum = Spectrum::ZERO;
        let mut w_avg = Vector3f::ZERO;
        let mut min_hit_distance = INFINITY;
        for i in 0..self.n_samples {
            let u = sample_02(i as u32, scramble);
            let w = cosine_sample_hemisphere(&u);
            let d = frame.local_to_world(&w).face_forward(&ng);
            let ray = si.spawn_ray(&d);
            let (l, first_hit) = self.path_l(ray, scene, rng, arena);
            li_sum += l;
            w_avg += d * l.y();
            min_hit_distance = min(min_hit_distance, first_hit);
        }
        let e = li_sum * (PI / self.n_samples as Float);

        // Scale the validity radius with local geometric detail via the
        // closest hit, clamped by the pixel footprint when differentials
        // are available.
        let pixel_spacing = si.pixel_spacing();
        let (lo, hi) = if pixel_spacing > 0.0 {
            (
                self.min_sample_pixel_spacing * pixel_spacing,
                self.max_sample_pixel_spacing * pixel_spacing,
            )
        } else {
            (0.0, INFINITY)
        };
        let max_dist = clamp(min_hit_distance * 0.5, lo, hi);
        if max_dist.is_finite() && max_dist > 0.0 {
            let sample = IrradianceSample {
                e,
                p: si.hit.p,
                n: ng,
                w_avg,
                max_dist,
            };
            let bound = Bounds3f::from(si.hit.p).expand(max_dist);
            let mut lock = self.cache.write().unwrap();
            if let Some(octree) = lock.as_mut() {
                octree.add(sample, bound);
            }
        }

        (e, w_avg)
    }

    /// Returns the indirect radiance reflected (or transmitted) at an
    /// intersection for the hemisphere around a normal, interpolating the
    /// cache when possible.
    ///
    /// * `si`    - The surface interaction.
    /// * `ng`    - The hemisphere normal.
    /// * `bsdf`  - The BSDF at the intersection.
    /// * `flags` - The BSDF lobes this hemisphere accounts for.
    /// * `scene` - The scene.
    /// * `rng`   - The random number generator.
    /// * `arena` - The arena for BSDF allocations.
    #[allow(clippy::too_many_arguments)]
    fn indirect_lo(
        &self,
        si: &SurfaceInteraction,
        ng: Normal3f,
        bsdf: &dyn Bsdf,
        flags: BxDFType,
        scene: &Scene,
        rng: &mut RNG,
        arena: &Bump,
    ) -> Spectrum {
        if bsdf.num_components(flags) == 0 {
            return Spectrum::ZERO;
        }
        let (e, w_avg) = match self.interpolate_e(&si.hit.p, &ng) {
            Some(cached) => cached,
            None => self.compute_and_cache_e(si, ng, scene, rng, arena),
        };
        if e.is_black() || w_avg.length_squared() == 0.0 {
            return Spectrum::ZERO;
        }
        bsdf.f(&si.hit.wo, &w_avg.normalize(), flags) * e
    }

    /// Path trace an indirect ray, sampling one light per bounce and adding
    /// emission only after specular bounces. Returns the estimated radiance
    /// and the parametric distance to the first hit.
    ///
    /// * `ray`   - The ray.
    /// * `scene` - The scene.
    /// * `rng`   - The random number generator.
    /// * `arena` - The arena for BSDF allocations.
    fn path_l(&self, mut ray: Ray, scene: &Scene, rng: &mut RNG, arena: &Bump) -> (Spectrum, Float) {
        let mut l = Spectrum::ZERO;
        let mut throughput = Spectrum::ONE;
        let mut specular_bounce = false;
        let mut first_hit = INFINITY;

        for bounce in 0..self.max_indirect_depth {
            let si = match scene.intersect(&mut ray) {
                Some(si) => si,
                None => break,
            };
            if bounce == 0 {
                // The hemisphere estimate expects unattenuated radiance from
                // the first vertex; the medium along the first segment is
                // accounted for by the caller.
                first_hit = ray.t_max;
            } else {
                throughput *= scene.transmittance(&ray, rng);
            }

            // Emission is added here only after specular bounces; diffuse
            // and glossy bounces already account for it via light sampling.
            if specular_bounce {
                l += throughput * si.le(&si.hit.wo);
            }

            let material = match si.material.clone() {
                Some(material) => material,
                None => break,
            };
            let bsdf = material.bsdf(arena, &si);
            l += throughput * uniform_sample_one_light(scene, &si, bsdf, rng);
            if bounce + 1 == self.max_indirect_depth {
                break;
            }

            let u = Point2f::new(rng.uniform_float(), rng.uniform_float());
            let s = match bsdf.sample_f(&si.hit.wo, &u, BxDFType::BSDF_ALL) {
                Some(s) if s.pdf > 0.0 && !s.f.is_black() => s,
                _ => break,
            };
            specular_bounce = s.sampled_type.contains(BxDFType::BSDF_SPECULAR);
            throughput *= s.f * (si.ns.abs_dot(&s.wi) / s.pdf);

            // Russian roulette after the third bounce.
            if bounce > 2 {
                let q = min(1.0, throughput.y());
                if rng.uniform_float() > q {
                    break;
                }
                throughput /= q;
            }

            ray = si.spawn_ray(&s.wi);
        }

        (l, first_hit)
    }

    /// Run one priming task: trace a sparse grid of camera rays over the
    /// task's slice of the film so the cache is populated before rendering.
    ///
    /// * `scene`    - The scene.
    /// * `camera`   - The camera.
    /// * `task_num` - This task's index.
    fn prime_task(&self, scene: &Scene, camera: &dyn Camera, task_num: usize) {
        let extent = camera.sample_extent();
        let height = (extent.p_max.y - extent.p_min.y) as usize;
        let y0 = extent.p_min.y as usize + height * task_num / N_PRIMING_TASKS;
        let y1 = extent.p_min.y as usize + height * (task_num + 1) / N_PRIMING_TASKS;

        let mut rng = RNG::new(task_num as u64);
        for y in (y0..y1).step_by(PRIMING_STRIDE) {
            for x in (extent.p_min.x as usize..extent.p_max.x as usize).step_by(PRIMING_STRIDE) {
                let arena = Bump::new();
                let sample = CameraSample {
                    p_film: Point2f::new(x as Float + 0.5, y as Float + 0.5),
                    time: 0.0,
                };
                let mut ray = camera.generate_ray(&sample);
                let _ = self.li(&mut ray, scene, &mut rng, &arena, 0);
            }
        }
    }
}

impl Integrator for IrradianceCacheIntegrator {
    /// Allocate the cache over the padded scene bound and prime it with a
    /// fixed 64-way split of the film.
    ///
    /// * `scene`  - The scene.
    /// * `camera` - The camera.
    fn preprocess(&self, scene: &Scene, camera: &dyn Camera) {
        let wb = scene.world_bound();
        let delta = wb.diagonal() * 0.01;
        let wb = Bounds3f::new(wb.p_min - delta, wb.p_max + delta);
        *self.cache.write().unwrap() = Some(Octree::new(wb));

        self.priming.store(true, Ordering::SeqCst);
        let progress = ProgressBar::new(N_PRIMING_TASKS as u64);
        let (tx, rx) = crossbeam_channel::unbounded();
        for task_num in 0..N_PRIMING_TASKS {
            tx.send(task_num).unwrap();
        }
        drop(tx);
        thread::scope(|scope| {
            for _ in 0..OPTIONS.n_threads {
                let rx = rx.clone();
                let progress = progress.clone();
                scope.spawn(move || {
                    while let Ok(task_num) = rx.recv() {
                        self.prime_task(scene, camera, task_num);
                        progress.inc(1);
                    }
                });
            }
        });
        progress.finish_and_clear();
        self.priming.store(false, Ordering::SeqCst);

        info!("Primed irradiance cache with {} samples.", self.cached_samples());
    }

    fn li(
        &self,
        ray: &mut Ray,
        scene: &Scene,
        rng: &mut RNG,
        arena: &Bump,
        depth: usize,
    ) -> Spectrum {
        let mut l = Spectrum::ZERO;
        if let Some(si) = scene.intersect(ray) {
            let wo = si.hit.wo;
            l += si.le(&wo);
            if let Some(material) = si.material.clone() {
                let bsdf = material.bsdf(arena, &si);
                l += uniform_sample_all_lights(scene, &si, bsdf, rng);
                if depth + 1 < self.max_specular_depth {
                    l += specular_reflect(self, &si, bsdf, scene, rng, arena, depth);
                    l += specular_transmit(self, &si, bsdf, scene, rng, arena, depth);
                }

                // Indirect lighting, interpolated from the cache, for the
                // reflection and transmission hemispheres separately. The
                // reflection hemisphere is the one facing the viewer.
                let ng = si.hit.n.face_forward(&wo);
                let flags =
                    BxDFType::BSDF_REFLECTION | BxDFType::BSDF_DIFFUSE | BxDFType::BSDF_GLOSSY;
                l += self.indirect_lo(&si, ng, bsdf, flags, scene, rng, arena);
                let flags =
                    BxDFType::BSDF_TRANSMISSION | BxDFType::BSDF_DIFFUSE | BxDFType::BSDF_GLOSSY;
                l += self.indirect_lo(&si, -ng, bsdf, flags, scene, rng, arena);
            }
        }
        l
    }
}

impl From<&ParamSet> for IrradianceCacheIntegrator {
    /// Create an `IrradianceCacheIntegrator` from parameters.
    ///
    /// * `params` - The parameters.
    fn from(params: &ParamSet) -> Self {
        let min_weight = params.find_one_float("minweight", 0.5);
        let min_spacing = params.find_one_float("minpixelspacing", 2.5);
        let max_spacing = params.find_one_float("maxpixelspacing", 15.0);
        let max_angle = params.find_one_float("maxangledifference", 10.0);
        let max_specular_depth = params.find_one_int("maxspeculardepth", 5) as usize;
        let max_indirect_depth = params.find_one_int("maxindirectdepth", 3) as usize;
        let mut n_samples = params.find_one_int("nsamples", 4096) as usize;
        if OPTIONS.quick_render {
            n_samples = max(1, n_samples / 16);
        }
        Self::new(
            min_weight,
            min_spacing,
            max_spacing,
            max_angle,
            n_samples,
            max_specular_depth,
            max_indirect_depth,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::light::PointLight;
    use core::material::MatteMaterial;
    use core::medium::HomogeneousMedium;
    use core::primitive::{PrimitiveList, Sphere};
    use float_cmp::approx_eq;
    use std::sync::Arc;

    fn integrator(n_samples: usize) -> IrradianceCacheIntegrator {
        IrradianceCacheIntegrator::new(0.5, 2.5, 15.0, 10.0, n_samples, 5, 3)
    }

    fn seed_cache(ic: &IrradianceCacheIntegrator, sample: IrradianceSample) {
        let bound = Bounds3f::from(sample.p).expand(sample.max_dist);
        let mut octree = Octree::new(Bounds3f::new(
            Point3f::new(-10.0, -10.0, -10.0),
            Point3f::new(10.0, 10.0, 10.0),
        ));
        octree.add(sample, bound);
        *ic.cache.write().unwrap() = Some(octree);
    }

    /// Room interior with a light at the center; every hemisphere ray from a
    /// point on the inner wall hits the wall again.
    fn room_scene() -> Scene {
        let material: core::material::ArcMaterial = Arc::new(MatteMaterial::new(Spectrum::new(0.5)));
        let room = Arc::new(Sphere::new(Point3f::ZERO, 5.0, Some(material)));
        Scene::new(
            Arc::new(PrimitiveList::new(vec![room])),
            vec![Arc::new(PointLight::new(Point3f::ZERO, Spectrum::new(10.0)))],
        )
    }

    #[test]
    fn single_sample_within_radius_is_a_hit() {
        let ic = integrator(4);
        let e = Spectrum::new(2.0);
        seed_cache(
            &ic,
            IrradianceSample {
                e,
                p: Point3f::ZERO,
                n: Normal3f::new(0.0, 0.0, 1.0),
                w_avg: Vector3f::new(0.0, 0.0, 1.0),
                max_dist: 1.0,
            },
        );

        // Distance 0.5, identical normal: weight 0.5, but a lone sample
        // normalizes back to its own irradiance exactly.
        let p = Point3f::new(0.5, 0.0, 0.0);
        let n = Normal3f::new(0.0, 0.0, 1.0);
        let (interpolated, _) = ic.interpolate_e(&p, &n).expect("cache hit");
        assert!(approx_eq!(Float, interpolated[0], e[0], epsilon = 1e-5));
    }

    #[test]
    fn zero_distance_identical_normal_always_hits() {
        let ic = integrator(4);
        seed_cache(
            &ic,
            IrradianceSample {
                e: Spectrum::ONE,
                p: Point3f::new(1.0, 2.0, 3.0),
                n: Normal3f::new(0.0, 1.0, 0.0),
                w_avg: Vector3f::new(0.0, 1.0, 0.0),
                max_dist: 0.25,
            },
        );
        let hit = ic.interpolate_e(&Point3f::new(1.0, 2.0, 3.0), &Normal3f::new(0.0, 1.0, 0.0));
        assert!(hit.is_some());
    }

    #[test]
    fn dissimilar_normal_is_a_miss() {
        let ic = integrator(4);
        seed_cache(
            &ic,
            IrradianceSample {
                e: Spectrum::ONE,
                p: Point3f::ZERO,
                n: Normal3f::new(0.0, 0.0, 1.0),
                w_avg: Vector3f::new(0.0, 0.0, 1.0),
                max_dist: 1.0,
            },
        );
        // 90 degrees off with a 10 degree threshold.
        let miss = ic.interpolate_e(&Point3f::ZERO, &Normal3f::new(1.0, 0.0, 0.0));
        assert!(miss.is_none());
    }

    #[test]
    fn cache_grows_on_miss_then_hits() {
        let ic = integrator(16);
        let scene = room_scene();
        let wb = scene.world_bound();
        let delta = wb.diagonal() * 0.01;
        *ic.cache.write().unwrap() = Some(Octree::new(Bounds3f::new(
            wb.p_min - delta,
            wb.p_max + delta,
        )));

        let si = SurfaceInteraction::new(
            Point3f::new(0.0, 0.0, -5.0),
            Normal3f::new(0.0, 0.0, 1.0),
            Vector3f::new(0.0, 0.0, 1.0),
            0.0,
            1e-3,
            None,
        );
        let n = si.hit.n;
        let bsdf = LambertianBsdf::new(Spectrum::new(0.5), n, n);
        let flags = BxDFType::BSDF_REFLECTION | BxDFType::BSDF_DIFFUSE | BxDFType::BSDF_GLOSSY;
        let mut rng = RNG::new(1);
        let arena = Bump::new();

        assert_eq!(ic.cached_samples(), 0);
        let first = ic.indirect_lo(&si, n, &bsdf, flags, &scene, &mut rng, &arena);
        assert_eq!(ic.cached_samples(), 1);
        let second = ic.indirect_lo(&si, n, &bsdf, flags, &scene, &mut rng, &arena);
        assert_eq!(ic.cached_samples(), 1);

        // The second evaluation interpolates the entry the first inserted.
        assert!(approx_eq!(Float, first[0], second[0], epsilon = 1e-4));
        assert!(!first.is_black());
    }

    #[test]
    fn backfacing_hits_still_cache_indirect_lighting() {
        let ic = integrator(16);
        let scene = room_scene();
        let wb = scene.world_bound();
        let delta = wb.diagonal() * 0.01;
        *ic.cache.write().unwrap() = Some(Octree::new(Bounds3f::new(
            wb.p_min - delta,
            wb.p_max + delta,
        )));

        // From inside the room the geometric normal faces away from the
        // viewer; the reflection hemisphere must still be the one facing the
        // incoming ray or every indirect sample escapes the scene.
        let mut ray = Ray::new(Point3f::ZERO, Vector3f::new(0.0, 0.0, 1.0), INFINITY, 0.0);
        let mut rng = RNG::new(2);
        let arena = Bump::new();
        let l = ic.li(&mut ray, &scene, &mut rng, &arena, 0);
        assert!(ic.cached_samples() > 0);
        assert!(!l.is_black());
    }

    #[test]
    fn first_indirect_segment_is_not_attenuated() {
        let material: core::material::ArcMaterial =
            Arc::new(MatteMaterial::new(Spectrum::new(0.5)));
        let room = Arc::new(Sphere::new(Point3f::ZERO, 5.0, Some(material)));
        let scene = Scene::new(
            Arc::new(PrimitiveList::new(vec![room])),
            vec![Arc::new(PointLight::new(Point3f::ZERO, Spectrum::new(10.0)))],
        )
        .with_medium(Arc::new(HomogeneousMedium::new(Spectrum::new(0.2))));

        let ic = IrradianceCacheIntegrator::new(0.5, 2.5, 15.0, 10.0, 4, 5, 1);
        let mut rng = RNG::new(3);
        let arena = Bump::new();
        let ray = Ray::new(Point3f::ZERO, Vector3f::new(0.0, 0.0, -1.0), INFINITY, 0.0);
        let (l, first_hit) = ic.path_l(ray, &scene, &mut rng, &arena);
        assert!(approx_eq!(Float, first_hit, 5.0, epsilon = 1e-4));

        // Direct lighting at the first vertex is attenuated along the shadow
        // segment only, not along the segment from the path origin.
        let expected = 0.5 * INV_PI * (10.0 / 25.0) * (-0.2 as Float * 5.0).exp();
        assert!(approx_eq!(Float, l[0], expected, epsilon = 1e-3));
    }

    #[test]
    fn pixel_spacing_caps_validity_radius() {
        let ic = integrator(16);
        let scene = room_scene();
        let wb = scene.world_bound();
        let delta = wb.diagonal() * 0.01;
        *ic.cache.write().unwrap() = Some(Octree::new(Bounds3f::new(
            wb.p_min - delta,
            wb.p_max + delta,
        )));

        let mut si = SurfaceInteraction::new(
            Point3f::new(0.0, 0.0, -5.0),
            Normal3f::new(0.0, 0.0, 1.0),
            Vector3f::new(0.0, 0.0, 1.0),
            0.0,
            1e-3,
            None,
        );
        si.dpdx = Vector3f::new(0.01, 0.0, 0.0);
        si.dpdy = Vector3f::new(0.0, 0.01, 0.0);
        let mut rng = RNG::new(4);
        let arena = Bump::new();
        ic.compute_and_cache_e(&si, si.hit.n, &scene, &mut rng, &arena);

        // The nearest hemisphere hit is several units away but the pixel
        // spacing of 0.01 caps the validity radius at 15 * 0.01.
        let n = si.hit.n;
        assert!(ic.interpolate_e(&Point3f::new(0.05, 0.0, -5.0), &n).is_some());
        assert!(ic.interpolate_e(&Point3f::new(0.5, 0.0, -5.0), &n).is_none());
    }

    #[test]
    fn preprocess_primes_the_cache() {
        let _ = env_logger::builder().is_test(true).try_init();
        let scene = room_scene();
        let camera = PinholeCamera::new(
            Point3f::new(0.0, 0.0, -4.0),
            Point3f::ZERO,
            Vector3f::new(0.0, 1.0, 0.0),
            60.0,
            Point2i::new(16, 16),
        );
        let ic = integrator(4);
        ic.preprocess(&scene, &camera);
        assert!(ic.cached_samples() > 0);
    }
}
