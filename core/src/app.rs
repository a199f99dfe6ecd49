//! Application wide options.

/// Runtime options controlling parallelism and render quality.
pub struct Options {
    /// Number of worker threads to use for parallel work.
    pub n_threads: usize,

    /// Reduce sample counts and loosen error thresholds for fast preview
    /// renders.
    pub quick_render: bool,
}

lazy_static! {
    /// The global options, read once from the environment.
    ///
    /// `LUMO_THREADS` overrides the worker thread count and
    /// `LUMO_QUICK_RENDER` enables preview quality when set to anything
    /// other than `0`.
    pub static ref OPTIONS: Options = Options {
        n_threads: std::env::var("LUMO_THREADS")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|n| *n > 0)
            .unwrap_or_else(num_cpus::get),
        quick_render: std::env::var("LUMO_QUICK_RENDER")
            .map(|v| v != "0")
            .unwrap_or(false),
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn at_least_one_thread() {
        assert!(OPTIONS.n_threads >= 1);
    }
}
