// crates/prop-harness/src/tests.rs
// ============================================================================
// Module: Property Harness Unit Tests
// Description: Unit tests for crate-private helpers.
// Purpose: Cover rendering and config helpers not reachable from the public API.
// Dependencies: prop-harness
// ============================================================================

//! ## Overview
//! Provides test-only lint relaxations and unit tests for private helpers.

// ============================================================================
// SECTION: Lint Configuration
// ============================================================================

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use crate::config::HarnessConfig;
use crate::config::MAX_CONFIG_FILE_SIZE;
use crate::diagnostic::render;
use crate::generator::FnGenerator;
use crate::generator::Generator;

// ============================================================================
// SECTION: Rendering
// ============================================================================

#[test]
fn render_uses_debug_representation() {
    assert_eq!(render(&(3, "x")), "(3, \"x\")");
    assert_eq!(render(&Some(1.5)), "Some(1.5)");
    assert_eq!(render::<Option<i32>>(&None), "None");
}

// ============================================================================
// SECTION: Config Limits
// ============================================================================

#[test]
fn oversized_config_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("big.toml");
    let padding = "#".repeat(MAX_CONFIG_FILE_SIZE + 1);
    std::fs::write(&path, padding).unwrap();

    let err = HarnessConfig::load(Some(&path)).unwrap_err();
    assert!(err.to_string().contains("size limit"), "unexpected error: {err}");
}

// ============================================================================
// SECTION: Test Draws
// ============================================================================

#[test]
fn test_draw_advances_generator() {
    let mut counter = 0;
    let generator = FnGenerator::new(move || {
        counter += 1;
        counter
    });
    let mut test = crate::TestBuilder::new("draws").generator(generator).build().unwrap();
    assert_eq!(test.draw(), 1);
    assert_eq!(test.draw(), 2);

    let mut boxed: Box<dyn Generator<Item = i32>> = Box::new(FnGenerator::new(|| 7));
    assert_eq!(boxed.next(), 7);
}
