// crates/prop-harness/src/error.rs
// ============================================================================
// Module: Builder Errors
// Description: Construction errors for malformed test definitions.
// Purpose: Keep definition mistakes distinguishable from assertion failures.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Builder errors describe a malformed fluent chain: a missing piece of a
//! property, or operators and groups that do not balance. They are returned
//! from assembly and flush steps and never surface as test failures.

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

/// Errors raised while assembling a property or its comparison tree.
///
/// # Invariants
/// - Variants are payload-free; each identifies one construction rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum BuilderError {
    /// The property has no (or a blank) description.
    #[error("missing description for new property")]
    MissingDescription,

    /// The property has no function under test.
    #[error("missing test function for new property")]
    MissingFunction,

    /// No comparison was declared for the property.
    #[error("missing comparison for new property")]
    MissingComparison,

    /// Operands, operators or groups remain once the property is flushed.
    #[error("unfinished comparison for new property")]
    UnfinishedComparison,

    /// A leaf arrived without exactly one pending operator to join it.
    #[error("unbalanced boolean operators in comparison")]
    UnbalancedOperator,

    /// `end_block` was called with no open group.
    #[error("end_block called without a matching begin_block")]
    UnbalancedGroup,
}

/// Convenient Result type for builder operations.
pub type BuilderResult<T = ()> = Result<T, BuilderError>;
