//! Integrators

#[macro_use]
extern crate log;

mod dipole_subsurface;
mod irradiance_cache;

// Re-export.
pub use dipole_subsurface::*;
pub use irradiance_cache::*;
