// crates/prop-harness/tests/config.rs
// ============================================================================
// Module: Config Tests
// Description: Tests for TOML loading, defaults and validation.
// Purpose: Ensure invalid configuration fails closed with clear messages.
// ============================================================================
//! ## Overview
//! Integration tests covering `HarnessConfig`.

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

mod support;

use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use prop_harness::ConfigError;
use prop_harness::HarnessConfig;
use prop_harness::LogSinkKind;
use prop_harness::config::CONFIG_ENV_VAR;
use prop_harness::config::MAX_SAMPLES;
use support::TestResult;
use support::ensure;

/// Asserts that `content` fails validation with a message containing `needle`.
fn expect_invalid(content: &str, needle: &str) -> TestResult {
    match HarnessConfig::from_toml_str(content) {
        Err(ConfigError::Invalid(message)) => {
            ensure(message.contains(needle), format!("unexpected message: {message}"))
        }
        other => Err(format!("expected invalid config, got {other:?}").into()),
    }
}

/// Points the config env var at a path and restores the previous value on drop.
struct ConfigEnvGuard {
    /// Value before the guard was created.
    previous: Option<OsString>,
}

#[allow(unsafe_code, reason = "Test mutates the process env to exercise config resolution.")]
impl ConfigEnvGuard {
    /// Sets the env var to `path`.
    fn set(path: &Path) -> Self {
        let previous = env::var_os(CONFIG_ENV_VAR);
        // SAFETY: Only one test in this binary reads or writes the variable.
        unsafe {
            env::set_var(CONFIG_ENV_VAR, path);
        }
        Self {
            previous,
        }
    }
}

#[allow(unsafe_code, reason = "Test restores the process env it mutated.")]
impl Drop for ConfigEnvGuard {
    fn drop(&mut self) {
        // SAFETY: Only one test in this binary reads or writes the variable.
        unsafe {
            match self.previous.take() {
                Some(value) => env::set_var(CONFIG_ENV_VAR, value),
                None => env::remove_var(CONFIG_ENV_VAR),
            }
        }
    }
}

// ============================================================================
// SECTION: Parsing
// ============================================================================

#[test]
fn empty_config_uses_defaults() -> TestResult {
    let config = HarnessConfig::from_toml_str("")?;
    ensure(config == HarnessConfig::default(), "Expected defaults")?;
    ensure(config.run.samples_override.is_none(), "Expected no override")?;
    ensure(config.log.sink == LogSinkKind::None, "Expected the no-op sink")?;
    Ok(())
}

#[test]
fn full_config_parses() -> TestResult {
    let config = HarnessConfig::from_toml_str(
        "[run]\nsamples_override = 500\n\n[log]\nsink = \"file\"\npath = \"harness.jsonl\"\n",
    )?;
    ensure(config.run.samples_override == Some(500), "Expected the override")?;
    ensure(config.log.sink == LogSinkKind::File, "Expected the file sink")?;
    ensure(config.log.path == Some(PathBuf::from("harness.jsonl")), "Expected the log path")?;
    Ok(())
}

#[test]
fn unknown_fields_are_parse_errors() -> TestResult {
    let result = HarnessConfig::from_toml_str("[run]\nseed = 4\n");
    ensure(matches!(result, Err(ConfigError::Parse(_))), "Expected a parse error")?;
    let result = HarnessConfig::from_toml_str("[log]\nsink = \"syslog\"\n");
    ensure(matches!(result, Err(ConfigError::Parse(_))), "Expected an unknown sink error")?;
    Ok(())
}

// ============================================================================
// SECTION: Validation
// ============================================================================

#[test]
fn sample_override_bounds() -> TestResult {
    expect_invalid("[run]\nsamples_override = 0\n", "greater than zero")?;
    expect_invalid(&format!("[run]\nsamples_override = {}\n", MAX_SAMPLES + 1), "must not exceed")?;
    HarnessConfig::from_toml_str(&format!("[run]\nsamples_override = {MAX_SAMPLES}\n"))?;
    Ok(())
}

#[test]
fn file_sink_requires_path() -> TestResult {
    expect_invalid("[log]\nsink = \"file\"\n", "log.path is required")
}

#[test]
fn path_requires_file_sink() -> TestResult {
    expect_invalid("[log]\nsink = \"stderr\"\npath = \"x.jsonl\"\n", "only valid for the file sink")
}

// ============================================================================
// SECTION: Loading
// ============================================================================

#[test]
fn load_reads_explicit_path() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("harness.toml");
    fs::write(&path, "[run]\nsamples_override = 12\n")?;
    let config = HarnessConfig::load(Some(&path))?;
    ensure(config.run.samples_override == Some(12), "Expected the file contents")?;
    Ok(())
}

#[test]
fn load_fails_for_missing_explicit_path() -> TestResult {
    let dir = tempfile::tempdir()?;
    let result = HarnessConfig::load(Some(&dir.path().join("absent.toml")));
    ensure(matches!(result, Err(ConfigError::Io(_))), "Expected an io error")?;
    Ok(())
}

#[test]
fn load_rejects_non_utf8() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("binary.toml");
    fs::write(&path, [0xff, 0xfe, 0x00])?;
    let result = HarnessConfig::load(Some(&path));
    ensure(
        matches!(result, Err(ConfigError::Invalid(ref message)) if message.contains("utf-8")),
        "Expected a utf-8 error",
    )?;
    Ok(())
}

#[test]
fn file_sink_opens_configured_path() -> TestResult {
    let dir = tempfile::tempdir()?;
    let log = dir.path().join("events.jsonl");
    let content = format!("[log]\nsink = \"file\"\npath = {:?}\n", log.to_string_lossy());
    let config = HarnessConfig::from_toml_str(&content)?;
    let _sink = config.log.open_sink()?;
    ensure(log.exists(), "Expected the log file to be created")?;
    Ok(())
}

#[test]
fn env_var_names_the_config_file() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("env.toml");
    fs::write(&path, "[run]\nsamples_override = 21\n")?;

    {
        let _guard = ConfigEnvGuard::set(&path);
        let config = HarnessConfig::load(None)?;
        ensure(config.run.samples_override == Some(21), "Expected the env-named file")?;
    }

    let _guard = ConfigEnvGuard::set(&dir.path().join("missing.toml"));
    ensure(
        matches!(HarnessConfig::load(None), Err(ConfigError::Io(_))),
        "Expected a missing env-named file to fail instead of using defaults",
    )?;
    let explicit = HarnessConfig::load(Some(&path))?;
    ensure(explicit.run.samples_override == Some(21), "Expected the explicit path to win")?;
    Ok(())
}
