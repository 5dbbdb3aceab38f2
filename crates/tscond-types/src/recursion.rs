//! Recursion guards for the resolver and the type algebra.
//!
//! Two guards cover every recursive walk in the analyzer:
//! 1. [`RecursionGuard`] combines cycle detection (a visiting set), depth
//!    limiting and an iteration budget. Type flattening uses it keyed by
//!    `TypeId` so self-referential aliases terminate on the first repeat.
//! 2. [`DepthCounter`] only limits nesting. The resolver uses one for
//!    definition hops and one for structural operand nesting.
//!
//! # Profiles
//!
//! [`RecursionProfile`] names each use so limits are not scattered as magic
//! numbers; the values come from `tscond_common::limits`.
//!
//! ```ignore
//! let mut guard = RecursionGuard::with_profile(RecursionProfile::TypeFlattening);
//! ```
//!
//! # Debug checks
//!
//! Dropping a guard or counter with unbalanced `enter()` calls panics in
//! debug builds.

use rustc_hash::FxHashSet;
use std::hash::Hash;
use tscond_common::limits;

// ---------------------------------------------------------------------------
// RecursionProfile
// ---------------------------------------------------------------------------

/// Named recursion limit presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecursionProfile {
    /// Definition hops followed by the constrained-type resolver.
    ///
    /// depth = 8, iterations = 100,000
    ConstrainedType,

    /// Structural nesting through IR operands while resolving one value.
    ///
    /// depth = 64, iterations = 100,000
    ValueNesting,

    /// Flattening unions, intersections, aliases and constrained generics.
    ///
    /// depth = 32, iterations = 100,000
    TypeFlattening,

    /// Rendering a type into a diagnostic message.
    ///
    /// depth = 8, iterations = 100,000
    TypeDisplay,

    /// Explicit limits, for hosts and tests that tune the ceiling.
    Custom { max_depth: u32, max_iterations: u32 },
}

impl RecursionProfile {
    pub const fn max_depth(self) -> u32 {
        match self {
            Self::ConstrainedType => limits::MAX_DEFINITION_DEPTH,
            Self::ValueNesting => limits::MAX_VALUE_NESTING_DEPTH,
            Self::TypeFlattening => limits::MAX_FLATTEN_DEPTH,
            Self::TypeDisplay => limits::MAX_DISPLAY_DEPTH,
            Self::Custom { max_depth, .. } => max_depth,
        }
    }

    pub const fn max_iterations(self) -> u32 {
        match self {
            Self::ConstrainedType
            | Self::ValueNesting
            | Self::TypeFlattening
            | Self::TypeDisplay => limits::MAX_GUARD_ITERATIONS,
            Self::Custom { max_iterations, .. } => max_iterations,
        }
    }
}

// ---------------------------------------------------------------------------
// RecursionResult
// ---------------------------------------------------------------------------

/// Result of attempting to enter a recursive computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecursionResult {
    Entered,
    /// This key is already being visited.
    Cycle,
    DepthExceeded,
    IterationExceeded,
}

impl RecursionResult {
    #[inline]
    pub fn is_entered(self) -> bool {
        matches!(self, Self::Entered)
    }

    #[inline]
    pub fn is_cycle(self) -> bool {
        matches!(self, Self::Cycle)
    }

    /// Depth or iteration limit hit.
    #[inline]
    pub fn is_exceeded(self) -> bool {
        matches!(self, Self::DepthExceeded | Self::IterationExceeded)
    }
}

// ---------------------------------------------------------------------------
// RecursionGuard
// ---------------------------------------------------------------------------

/// Cycle detection plus depth and iteration limits.
///
/// ```ignore
/// match guard.enter(alias) {
///     RecursionResult::Entered => {
///         let members = flatten_target(alias);
///         guard.leave(alias);
///         members
///     }
///     RecursionResult::Cycle => SmallVec::new(),
///     RecursionResult::DepthExceeded | RecursionResult::IterationExceeded => give_up(),
/// }
/// ```
pub struct RecursionGuard<K: Hash + Eq + Copy> {
    visiting: FxHashSet<K>,
    depth: u32,
    iterations: u32,
    max_depth: u32,
    max_iterations: u32,
    exceeded: bool,
}

impl<K: Hash + Eq + Copy> RecursionGuard<K> {
    pub fn new(max_depth: u32, max_iterations: u32) -> Self {
        Self {
            visiting: FxHashSet::default(),
            depth: 0,
            iterations: 0,
            max_depth,
            max_iterations,
            exceeded: false,
        }
    }

    pub fn with_profile(profile: RecursionProfile) -> Self {
        Self::new(profile.max_depth(), profile.max_iterations())
    }

    /// Try to enter the computation for `key`.
    ///
    /// On [`RecursionResult::Entered`] the caller must call
    /// [`leave`](Self::leave) with the same key.
    pub fn enter(&mut self, key: K) -> RecursionResult {
        self.iterations = self.iterations.saturating_add(1);

        if self.iterations > self.max_iterations {
            self.exceeded = true;
            return RecursionResult::IterationExceeded;
        }
        if self.depth >= self.max_depth {
            self.exceeded = true;
            return RecursionResult::DepthExceeded;
        }
        if !self.visiting.insert(key) {
            return RecursionResult::Cycle;
        }

        self.depth += 1;
        RecursionResult::Entered
    }

    pub fn leave(&mut self, key: K) {
        let was_present = self.visiting.remove(&key);
        debug_assert!(
            was_present,
            "RecursionGuard::leave() called with a key that is not in the visiting set."
        );
        self.depth = self.depth.saturating_sub(1);
    }

    #[inline]
    pub fn is_visiting(&self, key: &K) -> bool {
        self.visiting.contains(key)
    }

    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    #[inline]
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    #[inline]
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Sticky until [`reset`](Self::reset).
    #[inline]
    pub fn is_exceeded(&self) -> bool {
        self.exceeded
    }

    #[inline]
    pub fn mark_exceeded(&mut self) {
        self.exceeded = true;
    }

    pub fn reset(&mut self) {
        self.visiting.clear();
        self.depth = 0;
        self.iterations = 0;
        self.exceeded = false;
    }
}

#[cfg(debug_assertions)]
impl<K: Hash + Eq + Copy> Drop for RecursionGuard<K> {
    fn drop(&mut self) {
        if !std::thread::panicking() && !self.visiting.is_empty() {
            panic!(
                "RecursionGuard dropped with {} active entries still in the visiting set.",
                self.visiting.len(),
            );
        }
    }
}

// ---------------------------------------------------------------------------
// DepthCounter
// ---------------------------------------------------------------------------

/// Depth-only guard.
///
/// ```ignore
/// if !counter.enter() {
///     return None;
/// }
/// let result = resolve_operand(...);
/// counter.leave();
/// result
/// ```
pub struct DepthCounter {
    depth: u32,
    max_depth: u32,
    exceeded: bool,
}

impl DepthCounter {
    pub fn new(max_depth: u32) -> Self {
        Self {
            depth: 0,
            max_depth,
            exceeded: false,
        }
    }

    pub fn with_profile(profile: RecursionProfile) -> Self {
        Self::new(profile.max_depth())
    }

    /// Returns `false` (and sets the exceeded flag) at the limit; do not call
    /// [`leave`](Self::leave) in that case.
    #[inline]
    pub fn enter(&mut self) -> bool {
        if self.depth >= self.max_depth {
            self.exceeded = true;
            return false;
        }
        self.depth += 1;
        true
    }

    #[inline]
    pub fn leave(&mut self) {
        debug_assert!(
            self.depth > 0,
            "DepthCounter::leave() called at depth 0 without a matching enter()."
        );
        self.depth = self.depth.saturating_sub(1);
    }

    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    #[inline]
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Sticky until [`reset`](Self::reset).
    #[inline]
    pub fn is_exceeded(&self) -> bool {
        self.exceeded
    }

    #[inline]
    pub fn mark_exceeded(&mut self) {
        self.exceeded = true;
    }

    pub fn reset(&mut self) {
        self.depth = 0;
        self.exceeded = false;
    }
}

#[cfg(debug_assertions)]
impl Drop for DepthCounter {
    fn drop(&mut self) {
        if !std::thread::panicking() && self.depth > 0 {
            panic!("DepthCounter dropped at depth {} without matching leave().", self.depth);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
