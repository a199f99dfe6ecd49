//! Parameter sets.

use crate::pbrt::*;
use crate::spectrum::Spectrum;
use std::collections::HashMap;

/// A set of named parameter values used to configure scene objects.
#[derive(Default)]
pub struct ParamSet {
    floats: HashMap<String, Vec<Float>>,
    ints: HashMap<String, Vec<Int>>,
    bools: HashMap<String, Vec<bool>>,
    strings: HashMap<String, Vec<String>>,
    spectra: HashMap<String, Vec<Spectrum>>,
}

impl ParamSet {
    /// Create a new empty `ParamSet`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a float parameter.
    ///
    /// * `name`   - Parameter name.
    /// * `values` - Parameter values.
    pub fn add_float(&mut self, name: &str, values: Vec<Float>) {
        self.floats.insert(String::from(name), values);
    }

    /// Add an integer parameter.
    ///
    /// * `name`   - Parameter name.
    /// * `values` - Parameter values.
    pub fn add_int(&mut self, name: &str, values: Vec<Int>) {
        self.ints.insert(String::from(name), values);
    }

    /// Add a boolean parameter.
    ///
    /// * `name`   - Parameter name.
    /// * `values` - Parameter values.
    pub fn add_bool(&mut self, name: &str, values: Vec<bool>) {
        self.bools.insert(String::from(name), values);
    }

    /// Add a string parameter.
    ///
    /// * `name`   - Parameter name.
    /// * `values` - Parameter values.
    pub fn add_string(&mut self, name: &str, values: Vec<String>) {
        self.strings.insert(String::from(name), values);
    }

    /// Add a spectrum parameter.
    ///
    /// * `name`   - Parameter name.
    /// * `values` - Parameter values.
    pub fn add_spectrum(&mut self, name: &str, values: Vec<Spectrum>) {
        self.spectra.insert(String::from(name), values);
    }

    /// Returns the first value of a float parameter, or a default.
    ///
    /// * `name`    - Parameter name.
    /// * `default` - Default value.
    pub fn find_one_float(&self, name: &str, default: Float) -> Float {
        self.floats
            .get(name)
            .and_then(|v| v.first().copied())
            .unwrap_or(default)
    }

    /// Returns the first value of an integer parameter, or a default.
    ///
    /// * `name`    - Parameter name.
    /// * `default` - Default value.
    pub fn find_one_int(&self, name: &str, default: Int) -> Int {
        self.ints
            .get(name)
            .and_then(|v| v.first().copied())
            .unwrap_or(default)
    }

    /// Returns the first value of a boolean parameter, or a default.
    ///
    /// * `name`    - Parameter name.
    /// * `default` - Default value.
    pub fn find_one_bool(&self, name: &str, default: bool) -> bool {
        self.bools
            .get(name)
            .and_then(|v| v.first().copied())
            .unwrap_or(default)
    }

    /// Returns the first value of a string parameter, or a default.
    ///
    /// * `name`    - Parameter name.
    /// * `default` - Default value.
    pub fn find_one_string(&self, name: &str, default: &str) -> String {
        self.strings
            .get(name)
            .and_then(|v| v.first().cloned())
            .unwrap_or_else(|| String::from(default))
    }

    /// Returns the first value of a spectrum parameter, or a default.
    ///
    /// * `name`    - Parameter name.
    /// * `default` - Default value.
    pub fn find_one_spectrum(&self, name: &str, default: Spectrum) -> Spectrum {
        self.spectra
            .get(name)
            .and_then(|v| v.first().copied())
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_returns_first_value_or_default() {
        let mut ps = ParamSet::new();
        ps.add_float("maxerror", vec![0.25]);
        ps.add_int("maxdepth", vec![7, 9]);
        assert_eq!(ps.find_one_float("maxerror", 0.5), 0.25);
        assert_eq!(ps.find_one_int("maxdepth", 5), 7);
        assert_eq!(ps.find_one_float("minweight", 0.5), 0.5);
        assert_eq!(ps.find_one_string("name", "default"), "default");
    }
}
