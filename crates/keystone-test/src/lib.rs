//! keystone-test - Regression test harness for keystone
//!
//! Provides [`RegParams`], a small check recorder in the style of a C
//! regression driver, and [`synth`], generators for synthetic inputs whose
//! Hough response and vanishing point are known in advance.
//!
//! # Usage
//!
//! ```ignore
//! use keystone_test::RegParams;
//!
//! let mut rp = RegParams::new("fht");
//! rp.compare_values(512.0, peak_value as f64, 0.0);
//! assert!(rp.cleanup());
//! ```
//!
//! # Environment Variables
//!
//! - `REGTEST_MODE`: `compare` (default) or `display`; display mode also
//!   writes intermediate images to `tests/regout`

mod error;
mod params;
pub mod synth;

pub use error::{TestError, TestResult};
pub use params::{RegParams, RegTestMode};

/// Get the path to the workspace root
fn workspace_root() -> String {
    // keystone-test is at crates/keystone-test
    format!("{}/../..", env!("CARGO_MANIFEST_DIR"))
}

/// Get the path to the regout (regression output) directory
pub fn regout_dir() -> String {
    format!("{}/tests/regout", workspace_root())
}
