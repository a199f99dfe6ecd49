//! Core

#[macro_use]
extern crate bitflags;
#[macro_use]
extern crate hexf;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;

// Re-export.
pub mod app;
pub mod bssrdf;
pub mod camera;
pub mod geometry;
pub mod integrator;
pub mod interaction;
pub mod light;
pub mod low_discrepancy;
pub mod material;
pub mod medium;
pub mod octree;
pub mod paramset;
pub mod pbrt;
pub mod primitive;
pub mod reflection;
pub mod rng;
pub mod sampling;
pub mod scene;
pub mod spectrum;
