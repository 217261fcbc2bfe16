// crates/prop-harness/src/assembler.rs
// ============================================================================
// Module: Comparison Assembler
// Description: Stack-based construction of comparison trees from call order.
// Purpose: Turn a flat sequence of leaves, operators and group markers into a
//          binary tree, and package finished trees into properties.
// Dependencies: crate::{comparison, error, property}
// ============================================================================

//! ## Overview
//! The fluent surface has no bracket tokens, only `begin_block`/`end_block`
//! markers between leaves. The assembler therefore keeps an operand stack, an
//! operator stack and one frame per open group:
//!
//! - A leaf is pushed as-is when nothing is pending or a group just opened;
//!   otherwise it folds with the previous operand and the pending operator.
//! - `begin_block` records the stack heights and whether the group stands
//!   where a folding leaf would.
//! - `end_block` requires the group to have reduced to at most one node. That
//!   node then folds into the enclosing expression exactly as a leaf would,
//!   so wrapping an expression in a group never changes its meaning.
//!
//! Combination is strictly binary and left-folding; grouping only overrides
//! where the next leaf lands.

use std::fmt;
use std::mem;

use crate::comparison::BooleanOp;
use crate::comparison::Comparison;
use crate::error::BuilderError;
use crate::error::BuilderResult;
use crate::property::FunctionUnderTest;
use crate::property::Precondition;
use crate::property::Property;

// ============================================================================
// SECTION: Assembler
// ============================================================================

/// Operand/operator stack machine producing one comparison tree.
///
/// # Invariants
/// - Not shared across threads; one assembler per property under construction.
pub struct ComparisonAssembler<I, O> {
    /// Pending operands; the root ends up as the only element.
    operands: Vec<Comparison<I, O>>,
    /// Operators not yet consumed by a fold.
    operators: Vec<BooleanOp>,
    /// Open groups, innermost last.
    groups: Vec<GroupFrame>,
    /// One-shot flag: the next leaf is pushed rather than folded.
    push_next: bool,
}

/// State captured when a group opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct GroupFrame {
    /// Operand stack height at `begin_block`.
    operand_base: usize,
    /// Operator stack height at `begin_block`.
    operator_base: usize,
    /// The group's node must fold into the enclosing expression on close.
    folds_on_close: bool,
    /// Push flag to restore when the group closes empty.
    prior_push_next: bool,
}

impl<I, O> ComparisonAssembler<I, O> {
    /// Creates an empty assembler.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            operands: Vec::new(),
            operators: Vec::new(),
            groups: Vec::new(),
            push_next: false,
        }
    }

    /// Introduces a leaf (or any prebuilt subtree).
    ///
    /// # Errors
    /// Returns [`BuilderError::UnbalancedOperator`] when the leaf must fold but
    /// the number of pending operators differs from the number of operands.
    pub fn leaf(&mut self, comparison: Comparison<I, O>) -> BuilderResult {
        if self.push_next || self.operands.is_empty() {
            self.operands.push(comparison);
            self.push_next = false;
            return Ok(());
        }
        self.fold(comparison)
    }

    /// Combines `right` with the previous operand and the pending operator.
    fn fold(&mut self, right: Comparison<I, O>) -> BuilderResult {
        if self.operators.len() != self.operands.len() {
            return Err(BuilderError::UnbalancedOperator);
        }
        let (Some(left), Some(op)) = (self.operands.pop(), self.operators.pop()) else {
            return Err(BuilderError::UnbalancedOperator);
        };
        self.operands.push(Comparison::block(left, right, op));
        Ok(())
    }

    /// Queues an `And` for the next fold.
    pub fn and(&mut self) {
        self.operators.push(BooleanOp::And);
    }

    /// Queues an `Or` for the next fold.
    pub fn or(&mut self) {
        self.operators.push(BooleanOp::Or);
    }

    /// Opens a group.
    pub fn begin_block(&mut self) {
        self.groups.push(GroupFrame {
            operand_base: self.operands.len(),
            operator_base: self.operators.len(),
            folds_on_close: !self.push_next && !self.operands.is_empty(),
            prior_push_next: self.push_next,
        });
        self.push_next = true;
    }

    /// Closes the innermost group and folds its node into the enclosing
    /// expression where a leaf in the same position would fold.
    ///
    /// # Errors
    /// Returns [`BuilderError::UnbalancedGroup`] when no group is open, or
    /// [`BuilderError::UnbalancedOperator`] when operators inside the group
    /// are left over or the group's node has no operator to join it.
    pub fn end_block(&mut self) -> BuilderResult {
        let Some(frame) = self.groups.pop() else {
            return Err(BuilderError::UnbalancedGroup);
        };
        let content = self.operands.len().saturating_sub(frame.operand_base);
        if content > 1 || self.operators.len() != frame.operator_base {
            return Err(BuilderError::UnbalancedOperator);
        }

        if content == 0 {
            self.push_next = frame.prior_push_next;
            return Ok(());
        }
        self.push_next = false;
        if frame.folds_on_close {
            let Some(node) = self.operands.pop() else {
                return Err(BuilderError::UnbalancedOperator);
            };
            return self.fold(node);
        }
        Ok(())
    }

    /// Takes the finished tree and resets the assembler.
    ///
    /// # Errors
    /// Returns [`BuilderError::MissingComparison`] when nothing was declared and
    /// [`BuilderError::UnfinishedComparison`] when operands, operators or open
    /// groups remain.
    pub fn finish(&mut self) -> BuilderResult<Comparison<I, O>> {
        if self.operands.is_empty() {
            return Err(BuilderError::MissingComparison);
        }
        if self.operands.len() > 1 || !self.operators.is_empty() || !self.groups.is_empty() {
            return Err(BuilderError::UnfinishedComparison);
        }
        let root = self.operands.pop().ok_or(BuilderError::MissingComparison)?;
        self.reset();
        Ok(root)
    }

    /// Discards all pending state.
    pub fn reset(&mut self) {
        self.operands.clear();
        self.operators.clear();
        self.groups.clear();
        self.push_next = false;
    }

    /// Number of pending operands.
    #[must_use]
    pub const fn operand_count(&self) -> usize {
        self.operands.len()
    }

    /// Number of pending operators.
    #[must_use]
    pub const fn operator_count(&self) -> usize {
        self.operators.len()
    }

    /// Number of open groups.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.groups.len()
    }
}

impl<I, O> Default for ComparisonAssembler<I, O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I, O> fmt::Debug for ComparisonAssembler<I, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComparisonAssembler")
            .field("operands", &self.operands.len())
            .field("operators", &self.operators)
            .field("depth", &self.groups.len())
            .field("push_next", &self.push_next)
            .finish()
    }
}

// ============================================================================
// SECTION: Property Draft
// ============================================================================

/// In-progress property: description, preconditions, function and assembler.
///
/// The fluent builders fill a draft and flush it when the next property
/// starts or the test is built. The draft is also usable directly.
pub struct PropertyDraft<I, O> {
    /// Description of the property, if set.
    description: Option<String>,
    /// Preconditions collected since the draft was last flushed.
    preconditions: Vec<Precondition<I>>,
    /// Function under test, if set.
    function: Option<FunctionUnderTest<I, O>>,
    /// Comparison under construction.
    assembler: ComparisonAssembler<I, O>,
}

impl<I, O> PropertyDraft<I, O> {
    /// Creates an empty draft.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            description: None,
            preconditions: Vec::new(),
            function: None,
            assembler: ComparisonAssembler::new(),
        }
    }

    /// Sets the description.
    pub fn describe(&mut self, description: impl Into<String>) {
        self.description = Some(description.into());
    }

    /// Appends a precondition.
    pub fn given<F>(&mut self, precondition: F)
    where
        F: Fn(&I) -> bool + 'static,
    {
        self.preconditions.push(Box::new(precondition));
    }

    /// Appends already boxed preconditions, keeping their order.
    pub fn given_all(&mut self, preconditions: impl IntoIterator<Item = Precondition<I>>) {
        self.preconditions.extend(preconditions);
    }

    /// Sets the function under test.
    pub fn function<F>(&mut self, function: F)
    where
        F: Fn(&I) -> O + 'static,
    {
        self.function = Some(Box::new(function));
    }

    /// Returns the comparison assembler.
    #[must_use]
    pub const fn assembler(&self) -> &ComparisonAssembler<I, O> {
        &self.assembler
    }

    /// Gives mutable access to the comparison assembler.
    pub const fn assembler_mut(&mut self) -> &mut ComparisonAssembler<I, O> {
        &mut self.assembler
    }

    /// Packages the draft into a [`Property`] and resets it.
    ///
    /// # Errors
    /// Returns [`BuilderError::MissingDescription`], [`BuilderError::MissingFunction`],
    /// or the assembler's [`ComparisonAssembler::finish`] error.
    pub fn flush(&mut self) -> BuilderResult<Property<I, O>> {
        match self.description.as_deref() {
            Some(description) if !description.trim().is_empty() => {}
            _ => return Err(BuilderError::MissingDescription),
        }
        if self.function.is_none() {
            return Err(BuilderError::MissingFunction);
        }
        let comparison = self.assembler.finish()?;

        let description = self.description.take().ok_or(BuilderError::MissingDescription)?;
        let function = self.function.take().ok_or(BuilderError::MissingFunction)?;
        let preconditions = mem::take(&mut self.preconditions);
        Ok(Property::new(description, preconditions, function, comparison))
    }
}

impl<I, O> Default for PropertyDraft<I, O> {
    fn default() -> Self {
        Self::new()
    }
}
