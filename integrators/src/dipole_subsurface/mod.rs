//! Dipole Subsurface Scattering Integrator

mod octree;

pub use octree::*;

use bumpalo::Bump;
use core::app::OPTIONS;
use core::bssrdf::fresnel_diffuse_reflectance;
use core::camera::Camera;
use core::geometry::*;
use core::integrator::*;
use core::interaction::Hit;
use core::low_discrepancy::sample_02;
use core::octree::Octree;
use core::paramset::*;
use core::pbrt::*;
use core::reflection::fr_dielectric;
use core::rng::RNG;
use core::sampling::uniform_sample_sphere;
use core::scene::Scene;
use core::spectrum::*;
use indicatif::ProgressBar;
use std::sync::RwLock;
use std::thread;

/// Random walk paths traced per worker batch before candidates are checked
/// against the shared index.
const PATHS_PER_BATCH: usize = 20000;

/// Maximum bounces per random walk.
const MAX_WALK_BOUNCES: usize = 30;

/// Minimum walk depth before a candidate may be deposited, to avoid biasing
/// toward directly visible geometry.
const MIN_WALK_DEPTH: usize = 3;

/// Consecutive rejections that signal the packing is saturated.
const MAX_FAILS: usize = 2000;

/// Paths after which seeding gives up if no point has been accepted.
const GIVEUP_PATHS: usize = 50000;

/// A surface point deposited by the Poisson-disk random walk.
#[derive(Clone)]
struct SurfacePoint {
    /// Position.
    p: Point3f,

    /// Surface normal, faced toward the arriving walk direction.
    n: Normal3f,

    /// Disk area estimate around the point.
    area: Float,

    /// Offset used when spawning rays from the point.
    ray_epsilon: Float,
}

/// Shared state of the Poisson-disk seeding phase, guarded by one
/// reader-writer lock.
struct SeedState {
    /// Index of accepted point positions, keyed by min-distance extents.
    octree: Octree<Point3f>,

    /// Accepted points.
    points: Vec<SurfacePoint>,

    /// Consecutive rejected candidates across all workers.
    repeated_fails: usize,

    /// High-water mark of `repeated_fails`.
    max_repeated_fails: usize,

    /// Total random walk paths traced.
    total_paths_traced: usize,

    /// Total rays traced by the walks.
    total_rays_traced: usize,

    /// Total accepted points.
    num_points_added: usize,
}

/// Estimates radiance with the classical dipole diffusion approximation of
/// subsurface scattering, evaluated hierarchically over a preprocessed set
/// of Poisson-distributed irradiance points.
pub struct DipoleSubsurfaceIntegrator {
    /// Maximum recursion depth for specular reflection and transmission.
    max_specular_depth: usize,

    /// Solid-angle-like threshold for the hierarchical approximation.
    max_error: Float,

    /// Minimum distance between seeded surface points.
    min_sample_dist: Float,

    /// The aggregated irradiance points, built in `preprocess`.
    octree: RwLock<Option<SubsurfaceOctree>>,
}

impl DipoleSubsurfaceIntegrator {
    /// Create a new `DipoleSubsurfaceIntegrator`.
    ///
    /// * `max_specular_depth` - Maximum specular recursion depth.
    /// * `max_error`          - Hierarchical approximation threshold.
    /// * `min_sample_dist`    - Minimum distance between seeded points.
    pub fn new(max_specular_depth: usize, max_error: Float, min_sample_dist: Float) -> Self {
        Self {
            max_specular_depth,
            max_error,
            min_sample_dist,
            octree: RwLock::new(None),
        }
    }

    /// Returns the number of seeded irradiance points.
    pub fn seeded_points(&self) -> usize {
        self.octree
            .read()
            .unwrap()
            .as_ref()
            .map_or(0, |octree| octree.len())
    }

    /// Generate surface points on scattering geometry such that no two are
    /// closer than the minimum sample distance, by tracing random walks from
    /// the scene bounding sphere's center in parallel.
    ///
    /// * `scene` - The scene.
    fn find_poisson_points(&self, scene: &Scene) -> Vec<SurfacePoint> {
        let (sphere_center, sphere_radius) = scene.world_bound().bounding_sphere();
        let pad = 0.001 * scene.world_bound().volume().cbrt();
        let bound = scene.world_bound().expand(max(pad, 1e-4));
        let max_fails = if OPTIONS.quick_render {
            MAX_FAILS / 10
        } else {
            MAX_FAILS
        };

        let state = RwLock::new(SeedState {
            octree: Octree::new(bound),
            points: vec![],
            repeated_fails: 0,
            max_repeated_fails: 0,
            total_paths_traced: 0,
            total_rays_traced: 0,
            num_points_added: 0,
        });
        thread::scope(|scope| {
            for task_num in 0..OPTIONS.n_threads {
                let state = &state;
                scope.spawn(move || {
                    self.poisson_worker(scene, sphere_center, sphere_radius, task_num, max_fails, state);
                });
            }
        });

        let state = state.into_inner().unwrap();
        info!(
            "Poisson seeding traced {} paths ({} rays), accepted {} points (max consecutive fails {}).",
            state.total_paths_traced,
            state.total_rays_traced,
            state.num_points_added,
            state.max_repeated_fails
        );
        state.points
    }

    /// One seeding worker: trace batches of random walks depositing
    /// candidates on scattering surfaces, screen them under the read lock,
    /// then re-validate and insert survivors under the write lock. The
    /// re-validation is required because another worker may have inserted a
    /// conflicting point between the two passes.
    ///
    /// * `scene`         - The scene.
    /// * `sphere_center` - Center of the scene bounding sphere.
    /// * `sphere_radius` - Radius of the scene bounding sphere.
    /// * `task_num`      - This worker's index.
    /// * `max_fails`     - Consecutive rejection limit.
    /// * `state`         - The shared seeding state.
    fn poisson_worker(
        &self,
        scene: &Scene,
        sphere_center: Point3f,
        sphere_radius: Float,
        task_num: usize,
        max_fails: usize,
        state: &RwLock<SeedState>,
    ) {
        let mut rng = RNG::new(37 * task_num as u64);
        // Each accepted point stands in for a disk of the minimum sample
        // distance's radius; neighboring disks overlap by construction.
        let candidate_area = PI * self.min_sample_dist * self.min_sample_dist;

        loop {
            // Trace a batch of random walks, collecting candidate points.
            let mut candidates: Vec<SurfacePoint> = vec![];
            let mut rays_traced = 0;
            for _ in 0..PATHS_PER_BATCH {
                let u = Point2f::new(rng.uniform_float(), rng.uniform_float());
                let mut ray = Ray::new(sphere_center, uniform_sample_sphere(&u), INFINITY, 0.0);
                for bounce in 0..MAX_WALK_BOUNCES {
                    rays_traced += 1;
                    let back = -ray.d;
                    let (p, n, eps, scattering) = match scene.intersect(&mut ray) {
                        Some(si) => {
                            let scattering = si
                                .material
                                .as_ref()
                                .map_or(false, |m| m.bssrdf(&si).is_some());
                            (si.hit.p, si.hit.n.face_forward(&back), si.ray_epsilon, scattering)
                        }
                        None => {
                            // Continue the walk from the bounding sphere so
                            // it can re-enter the scene.
                            match bounding_sphere_hit(&ray, &sphere_center, sphere_radius) {
                                Some((p, n, eps)) => (p, n.face_forward(&back), eps, false),
                                None => break,
                            }
                        }
                    };

                    if scattering && bounce >= MIN_WALK_DEPTH {
                        candidates.push(SurfacePoint {
                            p,
                            n,
                            area: candidate_area,
                            ray_epsilon: eps,
                        });
                    }

                    let u = Point2f::new(rng.uniform_float(), rng.uniform_float());
                    let d = uniform_sample_sphere(&u).face_forward(&n);
                    ray = Ray::new(p + d * eps, d, INFINITY, 0.0);
                }
            }

            // First pass: screen candidates against the index under the
            // read lock; rejection here is final.
            let mut rejected = Vec::with_capacity(candidates.len());
            {
                let state = state.read().unwrap();
                if state.repeated_fails >= max_fails {
                    return;
                }
                for candidate in &candidates {
                    rejected.push(poisson_reject(
                        &state.octree,
                        &candidate.p,
                        self.min_sample_dist,
                    ));
                }
            }

            // Second pass: re-validate survivors under the write lock and
            // insert the ones that still hold.
            {
                let mut state = state.write().unwrap();
                if state.repeated_fails >= max_fails {
                    return;
                }
                state.total_paths_traced += PATHS_PER_BATCH;
                state.total_rays_traced += rays_traced;
                for (candidate, was_rejected) in candidates.into_iter().zip(rejected) {
                    let fails = was_rejected
                        || poisson_reject(&state.octree, &candidate.p, self.min_sample_dist);
                    if fails {
                        state.repeated_fails += 1;
                        state.max_repeated_fails =
                            max(state.max_repeated_fails, state.repeated_fails);
                        if state.repeated_fails >= max_fails {
                            return;
                        }
                    } else {
                        state.num_points_added += 1;
                        state.repeated_fails = 0;
                        let delta =
                            Vector3f::new(self.min_sample_dist, self.min_sample_dist, self.min_sample_dist);
                        let bound = Bounds3f::new(candidate.p - delta, candidate.p + delta);
                        state.octree.add(candidate.p, bound);
                        state.points.push(candidate);
                    }
                }

                if state.total_paths_traced > GIVEUP_PATHS && state.num_points_added == 0 {
                    warn!(
                        "No geometry with subsurface scattering materials found after {} paths; giving up on seeding.",
                        state.total_paths_traced
                    );
                    return;
                }
            }
        }
    }

    /// Estimate the direct irradiance arriving at each seeded point by
    /// stratified sampling of every light.
    ///
    /// * `points` - The seeded surface points.
    /// * `scene`  - The scene.
    fn compute_irradiances(
        &self,
        points: Vec<SurfacePoint>,
        scene: &Scene,
    ) -> Vec<IrradiancePoint> {
        let mut rng = RNG::default();
        let progress = ProgressBar::new(points.len() as u64);
        let mut irradiance_points = Vec::with_capacity(points.len());

        for sp in points {
            let hit = Hit::new(sp.p, sp.n, Vector3f::from(sp.n), 0.0);
            let mut e = Spectrum::ZERO;
            for light in &scene.lights {
                let n_samples = round_up_pow2(light.n_samples() as u32);
                let scramble = [rng.uniform_u32(), rng.uniform_u32()];
                let mut e_light = Spectrum::ZERO;
                for s in 0..n_samples {
                    let u = sample_02(s, scramble);
                    let li = light.sample_li(&hit, sp.ray_epsilon, &u);
                    if sp.n.dot(&li.wi) <= 0.0 || li.value.is_black() || li.pdf == 0.0 {
                        continue;
                    }
                    if li.visibility.unoccluded(scene) {
                        let value = li.value * li.visibility.transmittance(scene, &mut rng);
                        e_light += value * (sp.n.abs_dot(&li.wi) / li.pdf);
                    }
                }
                e += e_light / n_samples as Float;
            }
            irradiance_points.push(IrradiancePoint {
                p: sp.p,
                n: sp.n,
                ray_epsilon: sp.ray_epsilon,
                area: sp.area,
                e,
            });
            progress.inc(1);
        }
        progress.finish_and_clear();
        irradiance_points
    }
}

impl Integrator for DipoleSubsurfaceIntegrator {
    /// Seed Poisson-distributed surface points on scattering geometry,
    /// compute their direct irradiance, and aggregate them into the octree
    /// used for hierarchical dipole evaluation.
    ///
    /// * `scene`   - The scene.
    /// * `_camera` - The camera; unused, seeding walks start at the scene
    ///               bounding sphere's center.
    fn preprocess(&self, scene: &Scene, _camera: &dyn Camera) {
        if scene.lights.is_empty() {
            return;
        }
        let points = self.find_poisson_points(scene);
        if points.is_empty() {
            return;
        }
        let irradiance_points = self.compute_irradiances(points, scene);
        let octree = SubsurfaceOctree::build(irradiance_points);
        info!("Built subsurface octree over {} irradiance points.", octree.len());
        *self.octree.write().unwrap() = Some(octree);
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

                // Diffuse subsurface term via hierarchical dipole
                // evaluation over the seeded irradiance points.
                if let Some(bssrdf) = material.bssrdf(&si) {
                    let lock = self.octree.read().unwrap();
                    if let Some(octree) = lock.as_ref() {
                        if !bssrdf.sigma_prime_t().is_black() {
                            let kernel = DiffusionReflectance::new(
                                bssrdf.sigma_a(),
                                bssrdf.sigma_prime_s(),
                                bssrdf.eta(),
                            );
                            let mo = octree.mo(&si.hit.p, &kernel, self.max_error);
                            let fr = fr_dielectric(si.hit.n.abs_dot(&wo), 1.0, bssrdf.eta());
                            let ft = 1.0 - fr;
                            let fdt = 1.0 - fresnel_diffuse_reflectance(bssrdf.eta());
                            l += mo * (INV_PI * ft * fdt);
                        }
                    }
                }

                l += uniform_sample_all_lights(scene, &si, bsdf, rng);
                if depth < self.max_specular_depth {
                    l += specular_reflect(self, &si, bsdf, scene, rng, arena, depth);
                    l += specular_transmit(self, &si, bsdf, scene, rng, arena, depth);
                }
            }
        }
        l
    }
}

impl From<&ParamSet> for DipoleSubsurfaceIntegrator {
    /// Create a `DipoleSubsurfaceIntegrator` from parameters.
    ///
    /// * `params` - The parameters.
    fn from(params: &ParamSet) -> Self {
        let max_specular_depth = params.find_one_int("maxdepth", 5) as usize;
        let mut max_error = params.find_one_float("maxerror", 0.05);
        let mut min_sample_dist = params.find_one_float("minsampledistance", 0.25);
        if OPTIONS.quick_render {
            max_error *= 4.0;
            min_sample_dist *= 4.0;
        }
        Self::new(max_specular_depth, max_error, min_sample_dist)
    }
}

/// Returns true if any accepted point in the index lies within the minimum
/// distance of a candidate position.
///
/// * `octree`   - The index of accepted positions.
/// * `p`        - The candidate position.
/// * `min_dist` - The minimum distance.
fn poisson_reject(octree: &Octree<Point3f>, p: &Point3f, min_dist: Float) -> bool {
    let min_dist_squared = min_dist * min_dist;
    let mut failed = false;
    octree.lookup(p, |q: &Point3f| {
        if p.distance_squared(*q) < min_dist_squared {
            failed = true;
            false
        } else {
            true
        }
    });
    failed
}

/// Intersect a ray with the scene bounding sphere, returning the hit point,
/// outward normal and a ray offset.
///
/// * `ray`    - The ray.
/// * `center` - The sphere center.
/// * `radius` - The sphere radius.
fn bounding_sphere_hit(
    ray: &Ray,
    center: &Point3f,
    radius: Float,
) -> Option<(Point3f, Normal3f, Float)> {
    let oc = ray.o - *center;
    let a = ray.d.length_squared();
    let b = 2.0 * oc.dot(&ray.d);
    let c = oc.length_squared() - radius * radius;
    let (t0, t1) = quadratic(a, b, c)?;
    let t = if t0 > 0.0 {
        t0
    } else if t1 > 0.0 {
        t1
    } else {
        return None;
    };
    if t > ray.t_max {
        return None;
    }
    let p = ray.at(t);
    Some((p, Normal3f::from((p - *center) / radius), 5e-4 * t))
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::light::PointLight;
    use core::material::{ArcMaterial, MatteMaterial, SubsurfaceMaterial};
    use core::primitive::{PrimitiveList, Sphere};
    use float_cmp::approx_eq;
    use itertools::Itertools;
    use std::sync::Arc;

    fn subsurface_material() -> ArcMaterial {
        Arc::new(SubsurfaceMaterial::new(
            Spectrum::ONE,
            Spectrum::new(0.1),
            Spectrum::new(1.0),
            1.0,
            1.3,
        ))
    }

    fn scattering_scene() -> Scene {
        let sphere = Arc::new(Sphere::new(Point3f::ZERO, 1.0, Some(subsurface_material())));
        Scene::new(
            Arc::new(PrimitiveList::new(vec![sphere])),
            vec![Arc::new(PointLight::new(
                Point3f::new(0.0, 0.0, 3.0),
                Spectrum::new(10.0),
            ))],
        )
    }

    #[test]
    fn seeded_points_respect_minimum_distance() {
        let _ = env_logger::builder().is_test(true).try_init();
        let integrator = DipoleSubsurfaceIntegrator::new(5, 0.05, 0.5);
        let points = integrator.find_poisson_points(&scattering_scene());
        assert!(!points.is_empty());
        for (a, b) in points.iter().tuple_combinations() {
            assert!(a.p.distance(b.p) >= integrator.min_sample_dist - 1e-5);
        }
        let expected_area = PI * integrator.min_sample_dist * integrator.min_sample_dist;
        assert!(approx_eq!(Float, points[0].area, expected_area, epsilon = 1e-6));

        // The exclusion disks around accepted points are disjoint, so the
        // count is capped by the sphere area over the disk area. Saturation
        // also fills a reasonable fraction of that cap.
        let cap = FOUR_PI / (PI * 0.25 * 0.25);
        assert!(points.len() <= 2 * cap as usize);
        assert!(points.len() >= cap as usize / 8);
    }

    #[test]
    fn seeding_gives_up_without_scattering_geometry() {
        let matte: ArcMaterial = Arc::new(MatteMaterial::new(Spectrum::new(0.5)));
        let sphere = Arc::new(Sphere::new(Point3f::ZERO, 1.0, Some(matte)));
        let scene = Scene::new(
            Arc::new(PrimitiveList::new(vec![sphere])),
            vec![Arc::new(PointLight::new(
                Point3f::new(0.0, 0.0, 3.0),
                Spectrum::new(10.0),
            ))],
        );
        let integrator = DipoleSubsurfaceIntegrator::new(5, 0.05, 0.25);
        let points = integrator.find_poisson_points(&scene);
        assert!(points.is_empty());
    }

    #[test]
    fn irradiance_at_unoccluded_point_matches_point_light() {
        // Light straight above a point with nothing in between: every
        // stratified sample sees intensity / d^2 at normal incidence.
        let scene = Scene::new(
            Arc::new(PrimitiveList::new(vec![])),
            vec![Arc::new(PointLight::new(
                Point3f::new(0.0, 0.0, 2.0),
                Spectrum::new(8.0),
            ))],
        );
        let integrator = DipoleSubsurfaceIntegrator::new(5, 0.05, 0.25);
        let points = vec![SurfacePoint {
            p: Point3f::ZERO,
            n: Normal3f::new(0.0, 0.0, 1.0),
            area: 0.05,
            ray_epsilon: 1e-4,
        }];
        let irradiance = integrator.compute_irradiances(points, &scene);
        assert_eq!(irradiance.len(), 1);
        assert!(approx_eq!(Float, irradiance[0].e[0], 2.0, epsilon = 1e-4));
    }

    #[test]
    fn bounding_sphere_continues_escaped_walks() {
        let center = Point3f::ZERO;
        let ray = Ray::new(center, Vector3f::new(0.0, 0.0, 1.0), INFINITY, 0.0);
        let (p, n, _) = bounding_sphere_hit(&ray, &center, 2.0).expect("hit");
        assert!(approx_eq!(Float, p.z, 2.0, epsilon = 1e-4));
        assert!(n.z > 0.0);
    }

    #[test]
    fn preprocess_requires_lights() {
        let sphere = Arc::new(Sphere::new(Point3f::ZERO, 1.0, Some(subsurface_material())));
        let scene = Scene::new(Arc::new(PrimitiveList::new(vec![sphere])), vec![]);
        let integrator = DipoleSubsurfaceIntegrator::new(5, 0.05, 0.25);
        let camera = core::camera::PinholeCamera::new(
            Point3f::new(0.0, 0.0, -3.0),
            Point3f::ZERO,
            Vector3f::new(0.0, 1.0, 0.0),
            60.0,
            Point2i::new(8, 8),
        );
        integrator.preprocess(&scene, &camera);
        assert_eq!(integrator.seeded_points(), 0);
    }
}
