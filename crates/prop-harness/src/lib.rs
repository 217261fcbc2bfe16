// crates/prop-harness/src/lib.rs
// ============================================================================
// Module: Property Harness Root
// Description: Public API surface for the property-based testing harness.
// Purpose: Wire together the comparison model, builders, evaluator, executor
//          and generators.
// Dependencies: crate::{assembler, audit, builder, comparison, config, definition, diagnostic,
//              error, evaluator, executor, generator, property, validator}
// ============================================================================

//! ## Overview
//! A test pairs a generator with ordered properties. Each property states, as
//! a boolean tree of comparisons, how the output of a function under test must
//! relate to literals or to other functions of the same sample. The executor
//! draws samples and stops at the first counter-example.
//!
//! ```
//! use prop_harness::Executor;
//! use prop_harness::TestBuilder;
//! use prop_harness::generators;
//!
//! let test = TestBuilder::new("sum")
//!     .generator(generators::pair(
//!         generators::pos_small_integer(),
//!         generators::pos_small_integer(),
//!     ))
//!     .property("commutes")
//!     .then(|(a, b): &(i32, i32)| a + b)
//!     .equals_fn(|(a, b): &(i32, i32)| b + a)
//!     .build()?;
//!
//! let summary = Executor::new(test).assert();
//! assert_eq!(summary.samples, 100);
//! # Ok::<(), prop_harness::BuilderError>(())
//! ```

// ============================================================================
// SECTION: Core Modules
// ============================================================================

pub mod assembler;
pub mod audit;
pub mod builder;
pub mod comparison;
pub mod config;
pub mod definition;
pub mod diagnostic;
pub mod error;
pub mod evaluator;
pub mod executor;
pub mod generator;
pub mod property;
pub mod validator;

#[cfg(test)]
mod tests;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use assembler::ComparisonAssembler;
pub use assembler::PropertyDraft;
pub use audit::FileRunSink;
pub use audit::NoopRunSink;
pub use audit::RunEvent;
pub use audit::RunSink;
pub use audit::StderrRunSink;
pub use builder::ComparisonBuilder;
pub use builder::Composer;
pub use builder::InputTestBuilder;
pub use builder::PropertyBuilder;
pub use builder::TestBuilder;
pub use comparison::BooleanOp;
pub use comparison::Comparison;
pub use comparison::ComparisonShape;
pub use comparison::Nullable;
pub use comparison::OrderOp;
pub use config::ConfigError;
pub use config::HarnessConfig;
pub use config::LogSinkKind;
pub use definition::DEFAULT_SAMPLES;
pub use definition::Test;
pub use diagnostic::Diagnostic;
pub use diagnostic::Verdict;
pub use error::BuilderError;
pub use error::BuilderResult;
pub use evaluator::EvaluationTrace;
pub use evaluator::LeafKind;
pub use evaluator::NoopTrace;
pub use evaluator::evaluate;
pub use evaluator::evaluate_traced;
pub use executor::Executor;
pub use executor::FailureReporter;
pub use executor::PanicReporter;
pub use executor::PropertyFailure;
pub use executor::RunSummary;
pub use generator::Generator;
pub use property::Check;
pub use property::Property;
pub use validator::ValidationError;
pub use validator::validate_equivalent;

// ============================================================================
// SECTION: Generator Catalogue
// ============================================================================

/// Convenience constructors for the built-in generators
pub mod generators {
    use crate::generator::ArrayGenerator;
    use crate::generator::CharGenerator;
    use crate::generator::DoubleGenerator;
    use crate::generator::FloatGenerator;
    use crate::generator::FnGenerator;
    use crate::generator::Generator;
    use crate::generator::IntegerGenerator;
    use crate::generator::ListGenerator;
    use crate::generator::PairGenerator;
    use crate::generator::PosIntegerGenerator;
    use crate::generator::PosSmallIntegerGenerator;
    use crate::generator::SmallIntegerGenerator;
    use crate::generator::StringGenerator;
    use crate::generator::TripletGenerator;

    /// Integers centred on zero
    #[must_use]
    pub fn integer() -> IntegerGenerator {
        IntegerGenerator::new()
    }

    /// Non-negative integers
    #[must_use]
    pub fn pos_integer() -> PosIntegerGenerator {
        PosIntegerGenerator::new()
    }

    /// Short-range integers centred on zero
    #[must_use]
    pub fn small_integer() -> SmallIntegerGenerator {
        SmallIntegerGenerator::new()
    }

    /// Non-negative short-range integers
    #[must_use]
    pub fn pos_small_integer() -> PosSmallIntegerGenerator {
        PosSmallIntegerGenerator::new()
    }

    /// Printable ASCII characters
    #[must_use]
    pub fn character() -> CharGenerator {
        CharGenerator::new()
    }

    /// Doubles in `[0, 1)`
    #[must_use]
    pub fn double() -> DoubleGenerator {
        DoubleGenerator::new()
    }

    /// Floats in `[0, 1)`
    #[must_use]
    pub fn float() -> FloatGenerator {
        FloatGenerator::new()
    }

    /// Printable ASCII strings
    #[must_use]
    pub fn string() -> StringGenerator {
        StringGenerator::new()
    }

    /// Randomly sized boxed slices
    #[must_use]
    pub fn array<G: Generator>(element: G) -> ArrayGenerator<G> {
        ArrayGenerator::new(element)
    }

    /// Randomly sized vectors
    #[must_use]
    pub fn list<G: Generator>(element: G) -> ListGenerator<G> {
        ListGenerator::new(element)
    }

    /// Pairs, first component drawn first
    #[must_use]
    pub const fn pair<A, B>(first: A, second: B) -> PairGenerator<A, B> {
        PairGenerator::new(first, second)
    }

    /// Triplets, components drawn in order
    #[must_use]
    pub const fn triplet<A, B, C>(first: A, second: B, third: C) -> TripletGenerator<A, B, C> {
        TripletGenerator::new(first, second, third)
    }

    /// Values produced by a closure
    #[must_use]
    pub const fn from_fn<F, T>(produce: F) -> FnGenerator<F>
    where
        F: FnMut() -> T,
    {
        FnGenerator::new(produce)
    }
}
