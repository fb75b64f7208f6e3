//! Regression test parameters and operations

use crate::error::{TestError, TestResult};
use crate::regout_dir;
use keystone_core::{IPix, Pix};
use keystone_io::ImageFormat;
use std::fs;

/// Regression test mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegTestMode {
    /// Check values only (default)
    #[default]
    Compare,
    /// Also write intermediate images for visual inspection
    Display,
}

impl RegTestMode {
    /// Parse mode from the `REGTEST_MODE` environment variable
    pub fn from_env() -> Self {
        match std::env::var("REGTEST_MODE")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "display" => Self::Display,
            _ => Self::Compare,
        }
    }
}

/// Regression test parameters
///
/// Tracks the test name, a running check index, the mode and every
/// recorded failure. Checks never panic; call [`RegParams::cleanup`] at
/// the end and assert on its result.
pub struct RegParams {
    /// Name of the test (e.g., "fht")
    pub test_name: String,
    /// Current check index (incremented before each check)
    index: usize,
    /// Test mode
    pub mode: RegTestMode,
    /// Overall success status
    success: bool,
    /// Recorded failures
    failures: Vec<String>,
}

impl RegParams {
    /// Create new regression test parameters configured from
    /// `REGTEST_MODE`.
    pub fn new(test_name: &str) -> Self {
        let mode = RegTestMode::from_env();
        if mode == RegTestMode::Display {
            let _ = fs::create_dir_all(regout_dir());
        }

        eprintln!();
        eprintln!("////////////////////////////////////////////////");
        eprintln!("////////////////   {test_name}_reg   ///////////////");
        eprintln!("////////////////////////////////////////////////");
        eprintln!("Mode: {mode:?}");

        Self {
            test_name: test_name.to_string(),
            index: 0,
            mode,
            success: true,
            failures: Vec::new(),
        }
    }

    /// Get the current check index
    pub fn index(&self) -> usize {
        self.index
    }

    /// Check if in display mode
    pub fn display(&self) -> bool {
        self.mode == RegTestMode::Display
    }

    fn fail(&mut self, msg: String) {
        eprintln!("{msg}");
        self.failures.push(msg);
        self.success = false;
    }

    /// Compare two floating-point values
    ///
    /// Returns `true` if `|expected - actual| <= delta`.
    pub fn compare_values(&mut self, expected: f64, actual: f64, delta: f64) -> bool {
        self.index += 1;
        let diff = (expected - actual).abs();

        // NaN never compares within delta
        if diff <= delta {
            return true;
        }
        self.fail(format!(
            "Failure in {}_reg: value comparison for index {}\n\
             difference = {diff} but allowed delta = {delta}\n\
             expected = {expected}, actual = {actual}",
            self.test_name, self.index
        ));
        false
    }

    /// Compare two Pix images for exact equality
    pub fn compare_pix(&mut self, pix1: &Pix, pix2: &Pix) -> bool {
        self.index += 1;

        if !pix1.sizes_equal(pix2) || pix1.depth() != pix2.depth() {
            self.fail(format!(
                "Failure in {}_reg: pix comparison for index {} - dimension mismatch",
                self.test_name, self.index
            ));
            return false;
        }

        for y in 0..pix1.height() {
            for x in 0..pix1.width() {
                if pix1.get_pixel(x, y) != pix2.get_pixel(x, y) {
                    self.fail(format!(
                        "Failure in {}_reg: pix comparison for index {} - pixel mismatch at ({x}, {y})",
                        self.test_name, self.index
                    ));
                    return false;
                }
            }
        }
        true
    }

    /// Compare two integer images for exact equality
    pub fn compare_ipix(&mut self, expected: &IPix, actual: &IPix) -> bool {
        self.index += 1;

        if expected.width() != actual.width() || expected.height() != actual.height() {
            self.fail(format!(
                "Failure in {}_reg: ipix comparison for index {} - {}x{} vs {}x{}",
                self.test_name,
                self.index,
                expected.width(),
                expected.height(),
                actual.width(),
                actual.height()
            ));
            return false;
        }

        let w = expected.width() as usize;
        let mismatch = expected
            .data()
            .iter()
            .zip(actual.data())
            .position(|(a, b)| a != b);
        if let Some(i) = mismatch {
            let (x, y) = (i % w, i / w);
            self.fail(format!(
                "Failure in {}_reg: ipix comparison for index {} - at ({x}, {y}) expected {} got {}",
                self.test_name,
                self.index,
                expected.data()[i],
                actual.data()[i]
            ));
            return false;
        }
        true
    }

    /// In display mode, write `pix` as PNG to the regout directory.
    ///
    /// Returns the path written, or `None` outside display mode.
    pub fn write_pix(&mut self, pix: &Pix, name: &str) -> TestResult<Option<String>> {
        if !self.display() {
            return Ok(None);
        }
        let path = format!("{}/{}.{name}.png", regout_dir(), self.test_name);
        keystone_io::write_image(pix, &path, ImageFormat::Png).map_err(|e| {
            TestError::ImageWrite {
                path: path.clone(),
                message: e.to_string(),
            }
        })?;
        eprintln!("Wrote: {path}");
        Ok(Some(path))
    }

    /// Clean up and report results
    ///
    /// Returns `true` if every check passed.
    pub fn cleanup(self) -> bool {
        if self.success {
            eprintln!("SUCCESS: {}_reg", self.test_name);
        } else {
            eprintln!("FAILURE: {}_reg", self.test_name);
            for failure in &self.failures {
                eprintln!("  {failure}");
            }
        }
        eprintln!();

        self.success
    }

    /// Check if all checks have passed so far
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Get list of failures
    pub fn failures(&self) -> &[String] {
        &self.failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_values_within_delta() {
        let mut rp = RegParams::new("test");
        assert!(rp.compare_values(100.0, 100.5, 1.0));
        assert!(rp.is_success());
        assert_eq!(rp.index(), 1);
    }

    #[test]
    fn test_compare_values_failure() {
        let mut rp = RegParams::new("test");
        assert!(!rp.compare_values(100.0, 200.0, 0.0));
        assert!(!rp.compare_values(0.0, f64::NAN, 1.0));
        assert_eq!(rp.failures().len(), 2);
        assert!(!rp.cleanup());
    }

    #[test]
    fn test_compare_ipix_reports_position() {
        let mut rp = RegParams::new("test");
        let a = IPix::from_data(2, 2, vec![1, 2, 3, 4]).unwrap();
        let b = IPix::from_data(2, 2, vec![1, 2, 3, 5]).unwrap();
        assert!(rp.compare_ipix(&a, &a));
        assert!(!rp.compare_ipix(&a, &b));
        assert!(rp.failures()[0].contains("(1, 1)"));
    }
}
