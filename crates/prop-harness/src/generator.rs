// crates/prop-harness/src/generator.rs
// ============================================================================
// Module: Sample Generators
// Description: Pseudo-random producers of test inputs.
// Purpose: Provide the primitive and composite generators a test draws its
//          samples from.
// Dependencies: rand
// ============================================================================

//! ## Overview
//! A [`Generator`] yields one value per call and never ends. Primitive
//! generators own a [`StdRng`]; they are seeded from entropy by default and
//! can be seeded explicitly when a test needs to recompute its samples.
//! Composite generators call each sub-generator exactly once per call, in
//! declaration order.
//!
//! Ranges are uniform and half-open.

use std::ops::Range;

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

// ============================================================================
// SECTION: Generator Trait
// ============================================================================

/// Stateful producer of samples.
pub trait Generator {
    /// Type of value produced.
    type Item;

    /// Produces the next value, advancing internal state.
    fn next(&mut self) -> Self::Item;
}

impl<G: Generator + ?Sized> Generator for Box<G> {
    type Item = G::Item;

    fn next(&mut self) -> Self::Item {
        (**self).next()
    }
}

// ============================================================================
// SECTION: Ranges
// ============================================================================

/// Range of [`IntegerGenerator`].
pub const INTEGER_RANGE: Range<i32> = -(i32::MAX / 2)..(i32::MAX - i32::MAX / 2);
/// Range of [`PosIntegerGenerator`].
pub const POS_INTEGER_RANGE: Range<i32> = 0..i32::MAX;
/// Largest value of a 16-bit signed integer, widened.
const SHORT_MAX: i32 = 32_767;
/// Range of [`SmallIntegerGenerator`].
pub const SMALL_INTEGER_RANGE: Range<i32> = -(SHORT_MAX / 2)..(SHORT_MAX - SHORT_MAX / 2);
/// Range of [`PosSmallIntegerGenerator`].
pub const POS_SMALL_INTEGER_RANGE: Range<i32> = 0..SHORT_MAX;
/// Printable ASCII code points used by [`CharGenerator`] and [`StringGenerator`].
pub const PRINTABLE_RANGE: Range<u8> = 32..128;
/// Default exclusive upper bound on string and collection lengths.
pub const DEFAULT_MAX_LEN: usize = 256;

// ============================================================================
// SECTION: Primitive Generators
// ============================================================================

/// Declares a primitive generator owning its own random source.
macro_rules! primitive_generator {
    ($(#[$meta:meta])* $name:ident => $item:ty, |$rng:ident| $body:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name {
            /// Random source.
            rng: StdRng,
        }

        impl $name {
            /// Creates a generator seeded from operating-system entropy.
            #[must_use]
            pub fn new() -> Self {
                Self {
                    rng: StdRng::from_entropy(),
                }
            }

            /// Creates a generator with a fixed seed.
            #[must_use]
            pub fn seeded(seed: u64) -> Self {
                Self {
                    rng: StdRng::seed_from_u64(seed),
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl Generator for $name {
            type Item = $item;

            fn next(&mut self) -> Self::Item {
                let $rng = &mut self.rng;
                $body
            }
        }
    };
}

primitive_generator!(
    /// Integers centred on zero over [`INTEGER_RANGE`].
    IntegerGenerator => i32, |rng| rng.gen_range(INTEGER_RANGE)
);

primitive_generator!(
    /// Non-negative integers over [`POS_INTEGER_RANGE`].
    PosIntegerGenerator => i32, |rng| rng.gen_range(POS_INTEGER_RANGE)
);

primitive_generator!(
    /// Short-range integers centred on zero over [`SMALL_INTEGER_RANGE`].
    SmallIntegerGenerator => i32, |rng| rng.gen_range(SMALL_INTEGER_RANGE)
);

primitive_generator!(
    /// Non-negative short-range integers over [`POS_SMALL_INTEGER_RANGE`].
    PosSmallIntegerGenerator => i32, |rng| rng.gen_range(POS_SMALL_INTEGER_RANGE)
);

primitive_generator!(
    /// Printable ASCII characters.
    CharGenerator => char, |rng| printable(rng)
);

primitive_generator!(
    /// Doubles in `[0, 1)`.
    DoubleGenerator => f64, |rng| rng.r#gen::<f64>()
);

primitive_generator!(
    /// Floats in `[0, 1)`.
    FloatGenerator => f32, |rng| rng.r#gen::<f32>()
);

primitive_generator!(
    /// Printable ASCII strings with lengths below [`DEFAULT_MAX_LEN`].
    StringGenerator => String, |rng| {
        let length = rng.gen_range(0..DEFAULT_MAX_LEN);
        (0..length).map(|_| printable(rng)).collect()
    }
);

/// Draws one printable ASCII character.
fn printable(rng: &mut StdRng) -> char {
    char::from(rng.gen_range(PRINTABLE_RANGE))
}

// ============================================================================
// SECTION: Collection Generators
// ============================================================================

/// Randomly sized boxed slices of values from an element generator.
#[derive(Debug, Clone)]
pub struct ArrayGenerator<G> {
    /// Element generator.
    element: G,
    /// Length source.
    rng: StdRng,
    /// Exclusive upper bound on the length.
    max_len: usize,
}

impl<G: Generator> ArrayGenerator<G> {
    /// Creates an array generator with lengths below [`DEFAULT_MAX_LEN`].
    #[must_use]
    pub fn new(element: G) -> Self {
        Self {
            element,
            rng: StdRng::from_entropy(),
            max_len: DEFAULT_MAX_LEN,
        }
    }

    /// Creates an array generator whose lengths are drawn from a fixed seed.
    #[must_use]
    pub fn seeded(element: G, seed: u64) -> Self {
        Self {
            element,
            rng: StdRng::seed_from_u64(seed),
            max_len: DEFAULT_MAX_LEN,
        }
    }

    /// Overrides the exclusive length bound. A bound of zero yields empty arrays.
    #[must_use]
    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = max_len;
        self
    }

    /// Draws a vector of random length.
    fn next_vec(&mut self) -> Vec<G::Item> {
        let length = if self.max_len == 0 { 0 } else { self.rng.gen_range(0..self.max_len) };
        (0..length).map(|_| self.element.next()).collect()
    }
}

impl<G: Generator> Generator for ArrayGenerator<G> {
    type Item = Box<[G::Item]>;

    fn next(&mut self) -> Self::Item {
        self.next_vec().into_boxed_slice()
    }
}

/// Randomly sized vectors; lengths follow [`ArrayGenerator`].
#[derive(Debug, Clone)]
pub struct ListGenerator<G> {
    /// Underlying array generator.
    inner: ArrayGenerator<G>,
}

impl<G: Generator> ListGenerator<G> {
    /// Creates a list generator with lengths below [`DEFAULT_MAX_LEN`].
    #[must_use]
    pub fn new(element: G) -> Self {
        Self {
            inner: ArrayGenerator::new(element),
        }
    }

    /// Wraps a configured array generator.
    #[must_use]
    pub const fn from_array(inner: ArrayGenerator<G>) -> Self {
        Self {
            inner,
        }
    }
}

impl<G: Generator> Generator for ListGenerator<G> {
    type Item = Vec<G::Item>;

    fn next(&mut self) -> Self::Item {
        self.inner.next_vec()
    }
}

// ============================================================================
// SECTION: Tuple Generators
// ============================================================================

/// Pairs drawn from two generators, first then second.
#[derive(Debug, Clone)]
pub struct PairGenerator<A, B> {
    /// First component.
    first: A,
    /// Second component.
    second: B,
}

impl<A, B> PairGenerator<A, B> {
    /// Creates a pair generator.
    #[must_use]
    pub const fn new(first: A, second: B) -> Self {
        Self {
            first,
            second,
        }
    }
}

impl<A: Generator, B: Generator> Generator for PairGenerator<A, B> {
    type Item = (A::Item, B::Item);

    fn next(&mut self) -> Self::Item {
        let first = self.first.next();
        let second = self.second.next();
        (first, second)
    }
}

/// Triplets drawn from three generators in order.
#[derive(Debug, Clone)]
pub struct TripletGenerator<A, B, C> {
    /// First component.
    first: A,
    /// Second component.
    second: B,
    /// Third component.
    third: C,
}

impl<A, B, C> TripletGenerator<A, B, C> {
    /// Creates a triplet generator.
    #[must_use]
    pub const fn new(first: A, second: B, third: C) -> Self {
        Self {
            first,
            second,
            third,
        }
    }
}

impl<A: Generator, B: Generator, C: Generator> Generator for TripletGenerator<A, B, C> {
    type Item = (A::Item, B::Item, C::Item);

    fn next(&mut self) -> Self::Item {
        let first = self.first.next();
        let second = self.second.next();
        let third = self.third.next();
        (first, second, third)
    }
}

// ============================================================================
// SECTION: Closure Generator
// ============================================================================

/// Generator backed by a closure.
pub struct FnGenerator<F> {
    /// Producer closure.
    produce: F,
}

impl<F, T> FnGenerator<F>
where
    F: FnMut() -> T,
{
    /// Wraps `produce`.
    #[must_use]
    pub const fn new(produce: F) -> Self {
        Self {
            produce,
        }
    }
}

impl<F, T> Generator for FnGenerator<F>
where
    F: FnMut() -> T,
{
    type Item = T;

    fn next(&mut self) -> Self::Item {
        (self.produce)()
    }
}
