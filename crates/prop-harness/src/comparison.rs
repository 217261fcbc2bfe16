// crates/prop-harness/src/comparison.rs
// ============================================================================
// Module: Comparison Model
// Description: Immutable comparison trees over function outputs.
// Purpose: Define leaf and block comparisons, their operators, and the
//          serializable shape used for structural checks.
// Dependencies: serde::{Deserialize, Serialize}
// ============================================================================

//! ## Overview
//! A [`Comparison`] is a binary boolean expression over the output of a
//! function under test. Leaves compare the output against a literal or against
//! another function of the same sample; blocks combine exactly two sub-trees
//! with `And` or `Or`. Trees are built once by the assembler and then only
//! read by the evaluator.
//!
//! Capability bounds are checked when a leaf is constructed: equality leaves
//! need `PartialEq`, ordering leaves capture `PartialOrd::partial_cmp` so the
//! evaluator never needs an ordering bound of its own.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::collections::VecDeque;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::diagnostic::render;

// ============================================================================
// SECTION: Operators
// ============================================================================

/// Ordering relation the output must have with the expected value.
///
/// # Invariants
/// - Maps one-to-one onto the sign of a three-way comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderOp {
    /// Output must be strictly less than the expected value.
    Less,
    /// Output must compare equal to the expected value.
    Equal,
    /// Output must be strictly greater than the expected value.
    Greater,
}

impl OrderOp {
    /// Returns true when `ordering` (output compared to expected) satisfies this operator.
    #[must_use]
    pub const fn matches(self, ordering: Ordering) -> bool {
        matches!(
            (self, ordering),
            (Self::Less, Ordering::Less)
                | (Self::Equal, Ordering::Equal)
                | (Self::Greater, Ordering::Greater)
        )
    }

    /// Human-readable relation used in diagnostics.
    #[must_use]
    pub const fn relation(self) -> &'static str {
        match self {
            Self::Less => "less than",
            Self::Equal => "equal to",
            Self::Greater => "greater than",
        }
    }
}

impl From<Ordering> for OrderOp {
    fn from(ordering: Ordering) -> Self {
        match ordering {
            Ordering::Less => Self::Less,
            Ordering::Equal => Self::Equal,
            Ordering::Greater => Self::Greater,
        }
    }
}

/// Boolean operator joining the two children of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BooleanOp {
    /// Both children must pass.
    And,
    /// At least one child must pass.
    Or,
}

// ============================================================================
// SECTION: Null Awareness
// ============================================================================

/// Output types that may carry "no value".
///
/// Absence drives the null-aware branches of the evaluator. Plain values are
/// never absent; `Option::None` is.
pub trait Nullable {
    /// Returns true when the value represents an absent result.
    fn is_absent(&self) -> bool {
        false
    }
}

impl<T> Nullable for Option<T> {
    fn is_absent(&self) -> bool {
        self.is_none()
    }
}

impl<T: Nullable + ?Sized> Nullable for Box<T> {
    fn is_absent(&self) -> bool {
        (**self).is_absent()
    }
}

/// Implements [`Nullable`] for types that always hold a value.
macro_rules! always_present {
    ($($ty:ty),* $(,)?) => {
        $(impl Nullable for $ty {})*
    };
}

always_present!(
    (),
    bool,
    char,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    f32,
    f64,
    String,
    &str,
);

impl<T> Nullable for Vec<T> {}
impl<T> Nullable for VecDeque<T> {}
impl<T> Nullable for [T] {}
impl<T, const N: usize> Nullable for [T; N] {}
impl<T> Nullable for BTreeSet<T> {}
impl<K, V> Nullable for BTreeMap<K, V> {}
impl<A, B> Nullable for (A, B) {}
impl<A, B, C> Nullable for (A, B, C) {}

// ============================================================================
// SECTION: Comparison Tree
// ============================================================================

/// Function computing an expected value from the sample.
pub type ExpectedFn<I, O> = Box<dyn Fn(&I) -> O>;

/// Three-way comparison captured when an ordering leaf is built.
pub type OrderingFn<O> = fn(&O, &O) -> Option<Ordering>;

/// Comparison tree over the output `O` of a function taking samples `I`.
///
/// # Invariants
/// - Immutable once built.
/// - `Block` always owns exactly two children; leaves own none.
pub enum Comparison<I, O> {
    /// Output equals (or differs from) a fixed value.
    LiteralEquality {
        /// Value the output is checked against.
        expected: O,
        /// `true` for equality, `false` for inequality.
        check_equal: bool,
    },
    /// Output equals (or differs from) another function of the same sample.
    FunctionEquality {
        /// Produces the value the output is checked against.
        expected_fn: ExpectedFn<I, O>,
        /// `true` for equality, `false` for inequality.
        check_equal: bool,
    },
    /// Output relates to a fixed, orderable value.
    LiteralOrder {
        /// Value the output is ordered against.
        expected: O,
        /// Required relation.
        op: OrderOp,
        /// Three-way comparison of the output type.
        compare: OrderingFn<O>,
    },
    /// Output relates to another function's result.
    FunctionOrder {
        /// Produces the value the output is ordered against.
        expected_fn: ExpectedFn<I, O>,
        /// Required relation.
        op: OrderOp,
        /// Three-way comparison of the output type.
        compare: OrderingFn<O>,
    },
    /// Boolean combination of two sub-trees.
    Block {
        /// Left operand.
        left: Box<Self>,
        /// Right operand.
        right: Box<Self>,
        /// Combining operator.
        op: BooleanOp,
    },
}

impl<I, O> Comparison<I, O> {
    /// Output must equal `expected`.
    #[must_use]
    pub const fn equals(expected: O) -> Self
    where
        O: PartialEq,
    {
        Self::LiteralEquality {
            expected,
            check_equal: true,
        }
    }

    /// Output must differ from `expected`.
    #[must_use]
    pub const fn not_equals(expected: O) -> Self
    where
        O: PartialEq,
    {
        Self::LiteralEquality {
            expected,
            check_equal: false,
        }
    }

    /// Output must equal `expected_fn(sample)`.
    #[must_use]
    pub fn equals_fn<F>(expected_fn: F) -> Self
    where
        O: PartialEq,
        F: Fn(&I) -> O + 'static,
    {
        Self::FunctionEquality {
            expected_fn: Box::new(expected_fn),
            check_equal: true,
        }
    }

    /// Output must differ from `expected_fn(sample)`.
    #[must_use]
    pub fn not_equals_fn<F>(expected_fn: F) -> Self
    where
        O: PartialEq,
        F: Fn(&I) -> O + 'static,
    {
        Self::FunctionEquality {
            expected_fn: Box::new(expected_fn),
            check_equal: false,
        }
    }

    /// Output must relate to `expected` by `op`.
    #[must_use]
    pub fn ordered(expected: O, op: OrderOp) -> Self
    where
        O: PartialOrd,
    {
        Self::LiteralOrder {
            expected,
            op,
            compare: O::partial_cmp,
        }
    }

    /// Output must relate to `expected_fn(sample)` by `op`.
    #[must_use]
    pub fn ordered_fn<F>(expected_fn: F, op: OrderOp) -> Self
    where
        O: PartialOrd,
        F: Fn(&I) -> O + 'static,
    {
        Self::FunctionOrder {
            expected_fn: Box::new(expected_fn),
            op,
            compare: O::partial_cmp,
        }
    }

    /// Combines two trees with `op`.
    #[must_use]
    pub fn block(left: Self, right: Self, op: BooleanOp) -> Self {
        Self::Block {
            left: Box::new(left),
            right: Box::new(right),
            op,
        }
    }

    /// Returns true for compound nodes.
    #[must_use]
    pub const fn is_block(&self) -> bool {
        matches!(self, Self::Block { .. })
    }

    /// Number of leaves in the tree.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        match self {
            Self::Block {
                left,
                right,
                ..
            } => left.leaf_count() + right.leaf_count(),
            _ => 1,
        }
    }

    /// Height of the tree; a lone leaf has depth 1.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Self::Block {
                left,
                right,
                ..
            } => 1 + left.depth().max(right.depth()),
            _ => 1,
        }
    }

    /// Projects the tree onto its comparable, serializable shape.
    #[must_use]
    pub fn shape(&self) -> ComparisonShape
    where
        O: fmt::Debug,
    {
        match self {
            Self::LiteralEquality {
                expected,
                check_equal,
            } => ComparisonShape::LiteralEquality {
                expected: render(expected),
                check_equal: *check_equal,
            },
            Self::FunctionEquality {
                check_equal,
                ..
            } => ComparisonShape::FunctionEquality {
                check_equal: *check_equal,
            },
            Self::LiteralOrder {
                expected,
                op,
                ..
            } => ComparisonShape::LiteralOrder {
                expected: render(expected),
                op: *op,
            },
            Self::FunctionOrder {
                op,
                ..
            } => ComparisonShape::FunctionOrder {
                op: *op,
            },
            Self::Block {
                left,
                right,
                op,
            } => ComparisonShape::Block {
                op: *op,
                left: Box::new(left.shape()),
                right: Box::new(right.shape()),
            },
        }
    }
}

impl<I, O: fmt::Debug> fmt::Debug for Comparison<I, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LiteralEquality {
                expected,
                check_equal,
            } => f
                .debug_struct("LiteralEquality")
                .field("expected", expected)
                .field("check_equal", check_equal)
                .finish(),
            Self::FunctionEquality {
                check_equal,
                ..
            } => f
                .debug_struct("FunctionEquality")
                .field("check_equal", check_equal)
                .finish_non_exhaustive(),
            Self::LiteralOrder {
                expected,
                op,
                ..
            } => f
                .debug_struct("LiteralOrder")
                .field("expected", expected)
                .field("op", op)
                .finish_non_exhaustive(),
            Self::FunctionOrder {
                op,
                ..
            } => f.debug_struct("FunctionOrder").field("op", op).finish_non_exhaustive(),
            Self::Block {
                left,
                right,
                op,
            } => f
                .debug_struct("Block")
                .field("op", op)
                .field("left", left)
                .field("right", right)
                .finish(),
        }
    }
}

// ============================================================================
// SECTION: Comparison Shape
// ============================================================================

/// Structural projection of a [`Comparison`].
///
/// Literals are kept as their debug rendering; function-valued fields are
/// opaque, so two trees with different expected functions of the same kind
/// have equal shapes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ComparisonShape {
    /// Literal equality leaf.
    LiteralEquality {
        /// Rendered literal.
        expected: String,
        /// Equality or inequality.
        check_equal: bool,
    },
    /// Function equality leaf.
    FunctionEquality {
        /// Equality or inequality.
        check_equal: bool,
    },
    /// Literal ordering leaf.
    LiteralOrder {
        /// Rendered literal.
        expected: String,
        /// Required relation.
        op: OrderOp,
    },
    /// Function ordering leaf.
    FunctionOrder {
        /// Required relation.
        op: OrderOp,
    },
    /// Block node.
    Block {
        /// Combining operator.
        op: BooleanOp,
        /// Left child shape.
        left: Box<Self>,
        /// Right child shape.
        right: Box<Self>,
    },
}
