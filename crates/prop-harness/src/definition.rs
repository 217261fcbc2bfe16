// crates/prop-harness/src/definition.rs
// ============================================================================
// Module: Test Definitions
// Description: Closed test definitions produced by the builder.
// Purpose: Own the generator, sample count and ordered properties of a test.
// Dependencies: crate::{generator, property}
// ============================================================================

//! ## Overview
//! A [`Test`] is closed once built: its property list cannot grow and its
//! generator is only advanced by the executor that owns it.

use std::fmt;

use crate::generator::Generator;
use crate::property::Check;

/// Sample count used when a test does not set one.
pub const DEFAULT_SAMPLES: usize = 100;

/// Output-erased property stored by a test.
pub type BoxedCheck<I> = Box<dyn Check<I>>;

/// A named set of properties checked against generated samples.
///
/// # Invariants
/// - Property order is declaration order.
/// - `generator_kind` is the type name of the generator passed to the builder.
pub struct Test<I> {
    /// Test name used in failure reports.
    name: String,
    /// Number of samples drawn per run.
    samples: usize,
    /// Sample source.
    generator: Box<dyn Generator<Item = I>>,
    /// Type name of the generator.
    generator_kind: &'static str,
    /// Ordered properties.
    properties: Vec<BoxedCheck<I>>,
}

impl<I> Test<I> {
    /// Assembles a closed test definition.
    pub(crate) fn new(
        name: String,
        samples: usize,
        generator: Box<dyn Generator<Item = I>>,
        generator_kind: &'static str,
        properties: Vec<BoxedCheck<I>>,
    ) -> Self {
        Self {
            name,
            samples,
            generator,
            generator_kind,
            properties,
        }
    }

    /// Returns the test name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the configured sample count.
    #[must_use]
    pub const fn samples(&self) -> usize {
        self.samples
    }

    /// Returns the generator's type name.
    #[must_use]
    pub const fn generator_kind(&self) -> &'static str {
        self.generator_kind
    }

    /// Returns the properties in declaration order.
    #[must_use]
    pub fn properties(&self) -> &[BoxedCheck<I>] {
        &self.properties
    }

    /// Draws the next sample.
    pub(crate) fn draw(&mut self) -> I {
        self.generator.next()
    }
}

impl<I> fmt::Debug for Test<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let descriptions: Vec<&str> =
            self.properties.iter().map(|property| property.description()).collect();
        f.debug_struct("Test")
            .field("name", &self.name)
            .field("samples", &self.samples)
            .field("generator_kind", &self.generator_kind)
            .field("properties", &descriptions)
            .finish_non_exhaustive()
    }
}
