// crates/prop-harness/src/executor.rs
// ============================================================================
// Module: Test Executor
// Description: Drives sampling and property checks for one test.
// Purpose: Stop at the first counter-example and report it through a
//          test-runner adapter.
// Dependencies: crate::{audit, config, definition, diagnostic}, serde
// ============================================================================

//! ## Overview
//! [`Executor::run`] draws samples one at a time and checks every property in
//! declaration order. Preconditions are per property: a sample that fails one
//! property's preconditions skips that property only. The first failing check
//! ends the run with a [`PropertyFailure`]; nothing is collected past it.
//!
//! [`Executor::assert`] turns a failure into a test-runner failure through a
//! [`FailureReporter`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;

use crate::audit::NoopRunSink;
use crate::audit::RunEvent;
use crate::audit::RunSink;
use crate::config::ConfigError;
use crate::config::HarnessConfig;
use crate::definition::Test;
use crate::diagnostic::Diagnostic;
use crate::diagnostic::render;

// ============================================================================
// SECTION: Outcomes
// ============================================================================

/// Counters of a run in which every check passed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Test name.
    pub test: String,
    /// Samples drawn.
    pub samples: usize,
    /// Property checks that passed.
    pub checks_passed: usize,
    /// Property checks skipped by preconditions.
    pub checks_skipped: usize,
}

/// First counter-example found by a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyFailure {
    /// Test name.
    pub test: String,
    /// Description of the failing property.
    pub property: String,
    /// Zero-based index of the failing sample.
    pub sample_index: usize,
    /// Rendered sample.
    pub sample: String,
    /// Evaluator explanation.
    pub diagnostic: Diagnostic,
}

impl fmt::Display for PropertyFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Failed \"{}\"\nProperty:\n\t{}\nInput sample:\n\t{}\n{}",
            self.test, self.property, self.sample, self.diagnostic
        )
    }
}

impl std::error::Error for PropertyFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.diagnostic)
    }
}

// ============================================================================
// SECTION: Test-Runner Adapter
// ============================================================================

/// Signals a failed test to whatever runner hosts it.
pub trait FailureReporter {
    /// Reports `message` and aborts the current test.
    fn report_failure(&self, message: &str) -> !;
}

/// Reporter for the built-in test harness: failures become panics.
#[derive(Debug, Default, Clone, Copy)]
pub struct PanicReporter;

impl FailureReporter for PanicReporter {
    #[allow(clippy::panic, reason = "A panic is how the Rust test harness observes a failed test.")]
    fn report_failure(&self, message: &str) -> ! {
        panic!("{message}")
    }
}

// ============================================================================
// SECTION: Executor
// ============================================================================

/// Runs one test definition.
pub struct Executor<I> {
    /// Test being run; its generator advances across runs.
    test: Test<I>,
    /// Samples drawn per run.
    samples: usize,
    /// Run-event destination.
    sink: Arc<dyn RunSink>,
}

impl<I: fmt::Debug> Executor<I> {
    /// Creates an executor using the test's own sample count and no logging.
    #[must_use]
    pub fn new(test: Test<I>) -> Self {
        let samples = test.samples();
        Self {
            test,
            samples,
            sink: Arc::new(NoopRunSink),
        }
    }

    /// Creates an executor honouring `run.samples_override` and `log`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the configured sink cannot be opened.
    pub fn from_config(test: Test<I>, config: &HarnessConfig) -> Result<Self, ConfigError> {
        let sink = config.log.open_sink()?;
        let samples = config.run.samples_override.unwrap_or_else(|| test.samples());
        Ok(Self {
            test,
            samples,
            sink,
        })
    }

    /// Replaces the run-event sink.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn RunSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Replaces the sample count.
    #[must_use]
    pub fn with_samples(mut self, samples: usize) -> Self {
        self.samples = samples;
        self
    }

    /// Returns the test definition.
    #[must_use]
    pub const fn test(&self) -> &Test<I> {
        &self.test
    }

    /// Returns the number of samples drawn per run.
    #[must_use]
    pub const fn samples(&self) -> usize {
        self.samples
    }

    /// Checks every property against freshly drawn samples.
    ///
    /// # Errors
    ///
    /// Returns the first [`PropertyFailure`].
    pub fn run(&mut self) -> Result<RunSummary, PropertyFailure> {
        let mut summary = RunSummary {
            test: self.test.name().to_string(),
            samples: 0,
            checks_passed: 0,
            checks_skipped: 0,
        };
        self.sink.record(&RunEvent::run_started(&summary.test, self.samples));

        for sample_index in 0..self.samples {
            let sample = self.test.draw();
            summary.samples += 1;

            for property in self.test.properties() {
                if !property.accepts(&sample) {
                    summary.checks_skipped += 1;
                    self.sink.record(&RunEvent::property_skipped(
                        &summary.test,
                        property.description(),
                        sample_index,
                    ));
                    continue;
                }

                if let Err(diagnostic) = property.check(&sample) {
                    let failure = PropertyFailure {
                        test: summary.test.clone(),
                        property: property.description().to_string(),
                        sample_index,
                        sample: render(&sample),
                        diagnostic,
                    };
                    self.sink.record(&RunEvent::property_failed(&failure));
                    return Err(failure);
                }
                summary.checks_passed += 1;
            }
        }

        self.sink.record(&RunEvent::run_finished(&summary));
        Ok(summary)
    }

    /// Runs the test and panics with the failure report on the first violation.
    ///
    /// # Panics
    ///
    /// Panics when a property fails.
    pub fn assert(&mut self) -> RunSummary {
        self.assert_with(&PanicReporter)
    }

    /// Runs the test and hands the failure report to `reporter`.
    pub fn assert_with<R>(&mut self, reporter: &R) -> RunSummary
    where
        R: FailureReporter + ?Sized,
    {
        match self.run() {
            Ok(summary) => summary,
            Err(failure) => reporter.report_failure(&failure.to_string()),
        }
    }
}

impl<I> fmt::Debug for Executor<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Executor")
            .field("test", &self.test)
            .field("samples", &self.samples)
            .finish_non_exhaustive()
    }
}
