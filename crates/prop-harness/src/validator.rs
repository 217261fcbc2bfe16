// crates/prop-harness/src/validator.rs
// ============================================================================
// Module: Definition Validator
// Description: Structural equivalence of two test definitions.
// Purpose: Show that different construction styles yield the same test.
// Dependencies: crate::{comparison, definition}, thiserror
// ============================================================================

//! ## Overview
//! Two tests are equivalent when their headers agree and their properties
//! agree pairwise on description, precondition count and comparison shape.
//! Functions are opaque: two trees that differ only in which closure computes
//! an expected value are equivalent.

use thiserror::Error;

use crate::comparison::ComparisonShape;
use crate::definition::Test;

/// First difference found between two test definitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Test names differ.
    #[error("test names do not match: \"{left}\" vs \"{right}\"")]
    NameMismatch {
        /// Left name.
        left: String,
        /// Right name.
        right: String,
    },

    /// Sample counts differ.
    #[error("tests have different sample counts: {left} vs {right}")]
    SampleCountMismatch {
        /// Left count.
        left: usize,
        /// Right count.
        right: usize,
    },

    /// Generator types differ.
    #[error("tests have different generators: {left} vs {right}")]
    GeneratorMismatch {
        /// Left generator type.
        left: &'static str,
        /// Right generator type.
        right: &'static str,
    },

    /// Property counts differ.
    #[error("tests have different numbers of properties: {left} vs {right}")]
    PropertyCountMismatch {
        /// Left count.
        left: usize,
        /// Right count.
        right: usize,
    },

    /// Property descriptions differ.
    #[error("property {index} has different descriptions: \"{left}\" vs \"{right}\"")]
    DescriptionMismatch {
        /// Property index.
        index: usize,
        /// Left description.
        left: String,
        /// Right description.
        right: String,
    },

    /// Precondition counts differ.
    #[error("property {index} has different precondition counts: {left} vs {right}")]
    PreconditionCountMismatch {
        /// Property index.
        index: usize,
        /// Left count.
        left: usize,
        /// Right count.
        right: usize,
    },

    /// Comparison trees differ.
    #[error("property {index} has different comparisons")]
    ComparisonMismatch {
        /// Property index.
        index: usize,
        /// Left shape.
        left: Box<ComparisonShape>,
        /// Right shape.
        right: Box<ComparisonShape>,
    },
}

/// Checks that `left` and `right` define the same test.
///
/// # Errors
///
/// Returns the first [`ValidationError`] found, headers before properties.
pub fn validate_equivalent<I>(left: &Test<I>, right: &Test<I>) -> Result<(), ValidationError> {
    if left.name() != right.name() {
        return Err(ValidationError::NameMismatch {
            left: left.name().to_string(),
            right: right.name().to_string(),
        });
    }
    if left.samples() != right.samples() {
        return Err(ValidationError::SampleCountMismatch {
            left: left.samples(),
            right: right.samples(),
        });
    }
    if left.generator_kind() != right.generator_kind() {
        return Err(ValidationError::GeneratorMismatch {
            left: left.generator_kind(),
            right: right.generator_kind(),
        });
    }
    if left.properties().len() != right.properties().len() {
        return Err(ValidationError::PropertyCountMismatch {
            left: left.properties().len(),
            right: right.properties().len(),
        });
    }

    for (index, (a, b)) in left.properties().iter().zip(right.properties()).enumerate() {
        if a.description() != b.description() {
            return Err(ValidationError::DescriptionMismatch {
                index,
                left: a.description().to_string(),
                right: b.description().to_string(),
            });
        }
        if a.precondition_count() != b.precondition_count() {
            return Err(ValidationError::PreconditionCountMismatch {
                index,
                left: a.precondition_count(),
                right: b.precondition_count(),
            });
        }
        let (left_shape, right_shape) = (a.shape(), b.shape());
        if left_shape != right_shape {
            return Err(ValidationError::ComparisonMismatch {
                index,
                left: Box::new(left_shape),
                right: Box::new(right_shape),
            });
        }
    }
    Ok(())
}
