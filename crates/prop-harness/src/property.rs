// crates/prop-harness/src/property.rs
// ============================================================================
// Module: Properties
// Description: A described claim about a function under test.
// Purpose: Bundle description, preconditions, function and comparison tree,
//          and erase the output type for the executor.
// Dependencies: crate::{comparison, diagnostic, evaluator}
// ============================================================================

//! ## Overview
//! A [`Property`] is created once by a flush step and never changes. The
//! executor holds properties of different output types side by side through
//! the object-safe [`Check`] trait.

use std::fmt;

use crate::comparison::Comparison;
use crate::comparison::ComparisonShape;
use crate::comparison::Nullable;
use crate::diagnostic::Verdict;
use crate::evaluator::evaluate;

// ============================================================================
// SECTION: Type Aliases
// ============================================================================

/// Predicate a sample must satisfy before a property is checked.
pub type Precondition<I> = Box<dyn Fn(&I) -> bool>;

/// Function under test.
pub type FunctionUnderTest<I, O> = Box<dyn Fn(&I) -> O>;

// ============================================================================
// SECTION: Property
// ============================================================================

/// A named claim that `comparison` holds for `function(sample)`.
///
/// # Invariants
/// - Immutable after construction; owns its comparison tree exclusively.
pub struct Property<I, O> {
    /// Human-readable description printed on failure.
    description: String,
    /// Ordered preconditions; all must hold for the property to be checked.
    preconditions: Vec<Precondition<I>>,
    /// Function under test.
    function: FunctionUnderTest<I, O>,
    /// Root of the comparison tree.
    comparison: Comparison<I, O>,
}

impl<I, O> Property<I, O> {
    /// Packages a flushed property.
    pub(crate) fn new(
        description: String,
        preconditions: Vec<Precondition<I>>,
        function: FunctionUnderTest<I, O>,
        comparison: Comparison<I, O>,
    ) -> Self {
        Self {
            description,
            preconditions,
            function,
            comparison,
        }
    }

    /// Returns the property description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the root comparison.
    #[must_use]
    pub const fn comparison(&self) -> &Comparison<I, O> {
        &self.comparison
    }

    /// Applies the function under test.
    pub fn apply(&self, sample: &I) -> O {
        (self.function)(sample)
    }
}

impl<I, O: fmt::Debug> fmt::Debug for Property<I, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("description", &self.description)
            .field("preconditions", &self.preconditions.len())
            .field("comparison", &self.comparison)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// SECTION: Output-Erased Checks
// ============================================================================

/// Output-type-erased view of a property used by tests and executors.
pub trait Check<I> {
    /// Property description.
    fn description(&self) -> &str;

    /// Number of declared preconditions.
    fn precondition_count(&self) -> usize;

    /// Returns true when every precondition holds for `sample`.
    fn accepts(&self, sample: &I) -> bool;

    /// Runs the function under test and evaluates the comparison tree.
    ///
    /// # Errors
    /// Returns the evaluator's diagnostic when the comparison fails.
    fn check(&self, sample: &I) -> Verdict;

    /// Shape of the comparison tree.
    fn shape(&self) -> ComparisonShape;
}

impl<I, O> Check<I> for Property<I, O>
where
    O: PartialEq + Nullable + fmt::Debug,
{
    fn description(&self) -> &str {
        &self.description
    }

    fn precondition_count(&self) -> usize {
        self.preconditions.len()
    }

    fn accepts(&self, sample: &I) -> bool {
        self.preconditions.iter().all(|precondition| precondition(sample))
    }

    fn check(&self, sample: &I) -> Verdict {
        let output = self.apply(sample);
        evaluate(sample, &output, &self.comparison)
    }

    fn shape(&self) -> ComparisonShape {
        self.comparison.shape()
    }
}
