// crates/prop-harness/src/builder.rs
// ============================================================================
// Module: Test Builders
// Description: Fluent, typed construction of tests and their properties.
// Purpose: Move from an untyped test header to typed property builders while
//          sharing one construction state.
// Dependencies: crate::{assembler, comparison, definition, error, generator, property}
// ============================================================================

//! ## Overview
//! Construction is a chain of typed transitions:
//!
//! ```text
//! TestBuilder -> InputTestBuilder<I> -> PropertyBuilder<I> -> ComparisonBuilder<I, O>
//! ```
//!
//! The input type becomes known when a generator is supplied and the output
//! type when the function under test is supplied. Every transition moves the
//! same construction state into the next builder value.
//!
//! Fluent calls never fail. The first construction error is latched and every
//! later call becomes a no-op; [`ComparisonBuilder::property`] keeps chaining
//! and `build()` reports the latched error.
//!
//! ```
//! use prop_harness::TestBuilder;
//! use prop_harness::generators;
//!
//! let test = TestBuilder::new("abs")
//!     .generator(generators::small_integer())
//!     .property("never negative")
//!     .then(|x: &i32| x.abs())
//!     .greater_than(0)
//!     .or()
//!     .equals(0)
//!     .build();
//! assert!(test.is_ok());
//! ```

use std::any::type_name;
use std::fmt;
use std::marker::PhantomData;

use crate::assembler::PropertyDraft;
use crate::comparison::BooleanOp;
use crate::comparison::Comparison;
use crate::comparison::Nullable;
use crate::comparison::OrderOp;
use crate::definition::BoxedCheck;
use crate::definition::DEFAULT_SAMPLES;
use crate::definition::Test;
use crate::error::BuilderError;
use crate::error::BuilderResult;
use crate::generator::Generator;
use crate::property::Precondition;

// ============================================================================
// SECTION: Shared Construction State
// ============================================================================

/// Construction state shared by every typed builder of one test.
struct TestDraft<I> {
    /// Test name.
    name: String,
    /// Sample count.
    samples: usize,
    /// Sample source.
    generator: Box<dyn Generator<Item = I>>,
    /// Type name of the generator.
    generator_kind: &'static str,
    /// Properties flushed so far.
    properties: Vec<BoxedCheck<I>>,
    /// First construction error, if any.
    error: Option<BuilderError>,
}

impl<I> TestDraft<I> {
    /// Returns true once an error has been latched.
    const fn is_latched(&self) -> bool {
        self.error.is_some()
    }

    /// Records the error of `result` unless one is already latched.
    fn latch<T>(&mut self, result: BuilderResult<T>) {
        if let Err(error) = result
            && self.error.is_none()
        {
            self.error = Some(error);
        }
    }

    /// Closes the draft into a test.
    fn finish(self) -> BuilderResult<Test<I>> {
        if let Some(error) = self.error {
            return Err(error);
        }
        Ok(Test::new(
            self.name,
            self.samples,
            self.generator,
            self.generator_kind,
            self.properties,
        ))
    }
}

// ============================================================================
// SECTION: Test Header
// ============================================================================

/// Entry point: a test name and sample count, before the input type is known.
#[derive(Debug, Clone)]
pub struct TestBuilder {
    /// Test name.
    name: String,
    /// Sample count.
    samples: usize,
}

impl TestBuilder {
    /// Starts a test with [`DEFAULT_SAMPLES`] samples.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            samples: DEFAULT_SAMPLES,
        }
    }

    /// Sets the number of samples drawn per run.
    #[must_use]
    pub const fn samples(mut self, samples: usize) -> Self {
        self.samples = samples;
        self
    }

    /// Supplies the generator, fixing the input type.
    #[must_use]
    pub fn generator<G>(self, generator: G) -> InputTestBuilder<G::Item>
    where
        G: Generator + 'static,
    {
        InputTestBuilder {
            test: TestDraft {
                name: self.name,
                samples: self.samples,
                generator: Box::new(generator),
                generator_kind: type_name::<G>(),
                properties: Vec::new(),
                error: None,
            },
        }
    }
}

// ============================================================================
// SECTION: Input-Typed Builder
// ============================================================================

/// Test builder with a known input type and no property in progress.
pub struct InputTestBuilder<I> {
    /// Shared construction state.
    test: TestDraft<I>,
}

impl<I: 'static> InputTestBuilder<I> {
    /// Overrides the sample count.
    #[must_use]
    pub fn samples(mut self, samples: usize) -> Self {
        self.test.samples = samples;
        self
    }

    /// Starts a new property.
    #[must_use]
    pub fn property(self, description: impl Into<String>) -> PropertyBuilder<I> {
        PropertyBuilder {
            test: self.test,
            description: description.into(),
            preconditions: Vec::new(),
        }
    }

    /// Closes the test.
    ///
    /// # Errors
    /// Returns the first latched [`BuilderError`].
    pub fn build(self) -> BuilderResult<Test<I>> {
        self.test.finish()
    }
}

impl<I> fmt::Debug for InputTestBuilder<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputTestBuilder")
            .field("name", &self.test.name)
            .field("properties", &self.test.properties.len())
            .field("error", &self.test.error)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// SECTION: Property Builder
// ============================================================================

/// Property under construction whose function is not yet known.
pub struct PropertyBuilder<I> {
    /// Shared construction state.
    test: TestDraft<I>,
    /// Description of the property.
    description: String,
    /// Preconditions in declaration order.
    preconditions: Vec<Precondition<I>>,
}

impl<I: 'static> PropertyBuilder<I> {
    /// Adds a precondition the sample must satisfy for this property to be checked.
    #[must_use]
    pub fn given<F>(mut self, precondition: F) -> Self
    where
        F: Fn(&I) -> bool + 'static,
    {
        self.preconditions.push(Box::new(precondition));
        self
    }

    /// Supplies the function under test, fixing the output type.
    #[must_use]
    pub fn then<O, F>(self, function: F) -> ComparisonBuilder<I, O>
    where
        O: PartialEq + Nullable + fmt::Debug + 'static,
        F: Fn(&I) -> O + 'static,
    {
        let mut draft = PropertyDraft::new();
        draft.describe(self.description);
        draft.given_all(self.preconditions);
        draft.function(function);
        ComparisonBuilder {
            test: self.test,
            draft,
        }
    }

    /// Supplies the function under test and a whole comparison tree at once.
    ///
    /// The tree is built by nested [`Composer`] calls and the property is
    /// flushed immediately.
    #[must_use]
    pub fn then_satisfies<O, F, C>(self, function: F, compose: C) -> InputTestBuilder<I>
    where
        O: PartialEq + Nullable + fmt::Debug + 'static,
        F: Fn(&I) -> O + 'static,
        C: FnOnce(&Composer<I, O>) -> Comparison<I, O>,
    {
        let comparison = compose(&Composer::new());
        let builder = self.then(function).leaf(comparison);
        InputTestBuilder {
            test: builder.commit(),
        }
    }

    /// Closes the test. A property without a function is always an error.
    ///
    /// # Errors
    /// Returns the first latched [`BuilderError`], otherwise
    /// [`BuilderError::MissingDescription`] or [`BuilderError::MissingFunction`].
    pub fn build(self) -> BuilderResult<Test<I>> {
        if let Some(error) = self.test.error {
            return Err(error);
        }
        if self.description.trim().is_empty() {
            return Err(BuilderError::MissingDescription);
        }
        Err(BuilderError::MissingFunction)
    }
}

impl<I> fmt::Debug for PropertyBuilder<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyBuilder")
            .field("test", &self.test.name)
            .field("description", &self.description)
            .field("preconditions", &self.preconditions.len())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// SECTION: Comparison Builder
// ============================================================================

/// Property builder with a known function; accepts leaves and combinators.
pub struct ComparisonBuilder<I, O> {
    /// Shared construction state.
    test: TestDraft<I>,
    /// Property in progress.
    draft: PropertyDraft<I, O>,
}

impl<I, O> ComparisonBuilder<I, O>
where
    I: 'static,
    O: PartialEq + Nullable + fmt::Debug + 'static,
{
    /// Adds any comparison as the next operand.
    #[must_use]
    pub fn leaf(mut self, comparison: Comparison<I, O>) -> Self {
        if !self.test.is_latched() {
            let result = self.draft.assembler_mut().leaf(comparison);
            self.test.latch(result);
        }
        self
    }

    /// Joins the previous operand and the next one with `And`.
    #[must_use]
    pub fn and(self) -> Self {
        self.operator(BooleanOp::And)
    }

    /// Joins the previous operand and the next one with `Or`.
    #[must_use]
    pub fn or(self) -> Self {
        self.operator(BooleanOp::Or)
    }

    /// Opens a group.
    #[must_use]
    pub fn begin_block(mut self) -> Self {
        if !self.test.is_latched() {
            self.draft.assembler_mut().begin_block();
        }
        self
    }

    /// Closes the innermost group.
    #[must_use]
    pub fn end_block(mut self) -> Self {
        if !self.test.is_latched() {
            let result = self.draft.assembler_mut().end_block();
            self.test.latch(result);
        }
        self
    }

    /// Output must equal `expected`.
    #[must_use]
    pub fn equals(self, expected: O) -> Self {
        self.leaf(Comparison::equals(expected))
    }

    /// Output must differ from `expected`.
    #[must_use]
    pub fn not_equals(self, expected: O) -> Self {
        self.leaf(Comparison::not_equals(expected))
    }

    /// Output must equal `expected(sample)`.
    #[must_use]
    pub fn equals_fn<F>(self, expected: F) -> Self
    where
        F: Fn(&I) -> O + 'static,
    {
        self.leaf(Comparison::equals_fn(expected))
    }

    /// Output must differ from `expected(sample)`.
    #[must_use]
    pub fn not_equals_fn<F>(self, expected: F) -> Self
    where
        F: Fn(&I) -> O + 'static,
    {
        self.leaf(Comparison::not_equals_fn(expected))
    }

    /// Flushes the current property and starts the next one.
    #[must_use]
    pub fn property(self, description: impl Into<String>) -> PropertyBuilder<I> {
        PropertyBuilder {
            test: self.commit(),
            description: description.into(),
            preconditions: Vec::new(),
        }
    }

    /// Flushes the current property and closes the test.
    ///
    /// # Errors
    /// Returns the first latched [`BuilderError`], including flush errors of
    /// the final property.
    pub fn build(self) -> BuilderResult<Test<I>> {
        self.commit().finish()
    }

    /// Queues an operator unless an error is latched.
    fn operator(mut self, op: BooleanOp) -> Self {
        if !self.test.is_latched() {
            match op {
                BooleanOp::And => self.draft.assembler_mut().and(),
                BooleanOp::Or => self.draft.assembler_mut().or(),
            }
        }
        self
    }

    /// Flushes the draft into the shared state.
    fn commit(mut self) -> TestDraft<I> {
        if !self.test.is_latched() {
            match self.draft.flush() {
                Ok(property) => self.test.properties.push(Box::new(property)),
                Err(error) => self.test.latch::<()>(Err(error)),
            }
        }
        self.test
    }
}

impl<I, O> ComparisonBuilder<I, O>
where
    I: 'static,
    O: PartialOrd + Nullable + fmt::Debug + 'static,
{
    /// Output must be greater than `expected`.
    #[must_use]
    pub fn greater_than(self, expected: O) -> Self {
        self.compare_to(expected, OrderOp::Greater)
    }

    /// Output must be greater than `expected(sample)`.
    #[must_use]
    pub fn greater_than_fn<F>(self, expected: F) -> Self
    where
        F: Fn(&I) -> O + 'static,
    {
        self.compare_to_fn(expected, OrderOp::Greater)
    }

    /// Output must be less than `expected`.
    #[must_use]
    pub fn less_than(self, expected: O) -> Self {
        self.compare_to(expected, OrderOp::Less)
    }

    /// Output must be less than `expected(sample)`.
    #[must_use]
    pub fn less_than_fn<F>(self, expected: F) -> Self
    where
        F: Fn(&I) -> O + 'static,
    {
        self.compare_to_fn(expected, OrderOp::Less)
    }

    /// Output must compare equal to `expected`.
    #[must_use]
    pub fn equal_order(self, expected: O) -> Self {
        self.compare_to(expected, OrderOp::Equal)
    }

    /// Output must compare equal to `expected(sample)`.
    #[must_use]
    pub fn equal_order_fn<F>(self, expected: F) -> Self
    where
        F: Fn(&I) -> O + 'static,
    {
        self.compare_to_fn(expected, OrderOp::Equal)
    }

    /// Output must relate to `expected` by `op`.
    #[must_use]
    pub fn compare_to(self, expected: O, op: OrderOp) -> Self {
        self.leaf(Comparison::ordered(expected, op))
    }

    /// Output must relate to `expected(sample)` by `op`.
    #[must_use]
    pub fn compare_to_fn<F>(self, expected: F, op: OrderOp) -> Self
    where
        F: Fn(&I) -> O + 'static,
    {
        self.leaf(Comparison::ordered_fn(expected, op))
    }
}

impl<I, O> fmt::Debug for ComparisonBuilder<I, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComparisonBuilder")
            .field("test", &self.test.name)
            .field("assembler", self.draft.assembler())
            .field("error", &self.test.error)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// SECTION: Composer
// ============================================================================

/// Constructors for whole comparison trees written as nested calls.
///
/// Used with [`PropertyBuilder::then_satisfies`]:
///
/// ```
/// use prop_harness::TestBuilder;
/// use prop_harness::generators;
///
/// let test = TestBuilder::new("clamp")
///     .generator(generators::integer())
///     .property("stays in range")
///     .then_satisfies(
///         |x: &i32| (*x).clamp(-10, 10),
///         |c| c.and(c.less_than(11), c.greater_than(-11)),
///     )
///     .build();
/// assert!(test.is_ok());
/// ```
pub struct Composer<I, O> {
    /// Binds the sample and output types.
    marker: PhantomData<fn(&I) -> O>,
}

#[allow(
    clippy::unused_self,
    reason = "Composer methods are called through the closure argument for type inference."
)]
impl<I, O> Composer<I, O> {
    /// Creates a composer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            marker: PhantomData,
        }
    }

    /// Both sub-trees must pass.
    #[must_use]
    pub fn and(&self, left: Comparison<I, O>, right: Comparison<I, O>) -> Comparison<I, O> {
        Comparison::block(left, right, BooleanOp::And)
    }

    /// At least one sub-tree must pass.
    #[must_use]
    pub fn or(&self, left: Comparison<I, O>, right: Comparison<I, O>) -> Comparison<I, O> {
        Comparison::block(left, right, BooleanOp::Or)
    }

    /// Output must equal `expected`.
    #[must_use]
    pub fn equals(&self, expected: O) -> Comparison<I, O>
    where
        O: PartialEq,
    {
        Comparison::equals(expected)
    }

    /// Output must differ from `expected`.
    #[must_use]
    pub fn not_equals(&self, expected: O) -> Comparison<I, O>
    where
        O: PartialEq,
    {
        Comparison::not_equals(expected)
    }

    /// Output must equal `expected(sample)`.
    #[must_use]
    pub fn equals_fn<F>(&self, expected: F) -> Comparison<I, O>
    where
        O: PartialEq,
        F: Fn(&I) -> O + 'static,
    {
        Comparison::equals_fn(expected)
    }

    /// Output must differ from `expected(sample)`.
    #[must_use]
    pub fn not_equals_fn<F>(&self, expected: F) -> Comparison<I, O>
    where
        O: PartialEq,
        F: Fn(&I) -> O + 'static,
    {
        Comparison::not_equals_fn(expected)
    }

    /// Output must be greater than `expected`.
    #[must_use]
    pub fn greater_than(&self, expected: O) -> Comparison<I, O>
    where
        O: PartialOrd,
    {
        Comparison::ordered(expected, OrderOp::Greater)
    }

    /// Output must be greater than `expected(sample)`.
    #[must_use]
    pub fn greater_than_fn<F>(&self, expected: F) -> Comparison<I, O>
    where
        O: PartialOrd,
        F: Fn(&I) -> O + 'static,
    {
        Comparison::ordered_fn(expected, OrderOp::Greater)
    }

    /// Output must be less than `expected`.
    #[must_use]
    pub fn less_than(&self, expected: O) -> Comparison<I, O>
    where
        O: PartialOrd,
    {
        Comparison::ordered(expected, OrderOp::Less)
    }

    /// Output must be less than `expected(sample)`.
    #[must_use]
    pub fn less_than_fn<F>(&self, expected: F) -> Comparison<I, O>
    where
        O: PartialOrd,
        F: Fn(&I) -> O + 'static,
    {
        Comparison::ordered_fn(expected, OrderOp::Less)
    }

    /// Output must compare equal to `expected`.
    #[must_use]
    pub fn equal_order(&self, expected: O) -> Comparison<I, O>
    where
        O: PartialOrd,
    {
        Comparison::ordered(expected, OrderOp::Equal)
    }

    /// Output must compare equal to `expected(sample)`.
    #[must_use]
    pub fn equal_order_fn<F>(&self, expected: F) -> Comparison<I, O>
    where
        O: PartialOrd,
        F: Fn(&I) -> O + 'static,
    {
        Comparison::ordered_fn(expected, OrderOp::Equal)
    }
}

impl<I, O> Default for Composer<I, O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I, O> fmt::Debug for Composer<I, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Composer")
    }
}
