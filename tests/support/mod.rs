//! Test support utilities for hangar integration tests.
//!
//! Provides an isolated config and store per test plus helpers for the
//! library and the binary.

#![allow(dead_code)]

pub mod assertions;
pub mod commands;
pub mod fixtures;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;

use std::path::PathBuf;

use tempfile::TempDir;

/// Test environment with an isolated temp directory and encryption key.
///
/// Child processes get the config path and key through their environment,
/// so tests can safely run in parallel.
pub struct Test {
    /// Holds hangar.toml and the store
    pub dir: TempDir,
    /// Hex master key passed to the binary
    pub key: String,
}

impl Test {
    /// Create an empty environment with no config file.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        Self {
            dir,
            key: TEST_KEY_HEX.to_string(),
        }
    }

    /// Create an environment with `hangar config init` already run.
    pub fn init() -> Self {
        let t = Self::new();
        let output = t.run(&["config", "init"]);
        assert!(
            output.status.success(),
            "Failed to initialize config: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        t
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join("hangar.toml")
    }

    pub fn store_path(&self) -> PathBuf {
        self.dir.path().join("hangar.json")
    }

    /// Raw store contents.
    pub fn store(&self) -> String {
        std::fs::read_to_string(self.store_path()).unwrap_or_default()
    }
}
