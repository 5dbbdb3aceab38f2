//! Centralized limits and thresholds for the condition analyzer.
//!
//! # Resolver recursion limits
//!
//! Named recursion presets live in `tscond_types::recursion::RecursionProfile`;
//! the profiles read their numbers from the constants below so there is a
//! single place to tune them.

// =============================================================================
// Recursion Depth Limits
// =============================================================================

/// Maximum number of definition hops followed when resolving a value's
/// constrained type.
///
/// Each hop follows a `Local` to its single reaching assignment. Past this
/// depth the resolver gives up and the site produces no diagnostic.
///
/// # TypeScript example
///
/// ```typescript
/// let a = 1;
/// let b = a;
/// let c = b;
/// // ... a long chain of copies ...
/// let z = y;
/// if (z) {} // resolving `z` walks z -> y -> ... -> a; past 8 hops it stops
/// ```
pub const MAX_DEFINITION_DEPTH: u32 = 8;

/// Maximum structural nesting followed while resolving one value.
///
/// Guards recursion through operands (`await`, comparisons, wrapper calls)
/// so malformed IR whose operands refer back to themselves still terminates.
pub const MAX_VALUE_NESTING_DEPTH: u32 = 64;

/// Maximum depth for flattening unions, intersections, aliases and
/// constrained generics.
///
/// # TypeScript example
///
/// ```typescript
/// type A = B | null;
/// type B = C | undefined;
/// type C = A | string; // self-referential alias chain
/// ```
pub const MAX_FLATTEN_DEPTH: u32 = 32;

/// Maximum depth for rendering a type into a message.
pub const MAX_DISPLAY_DEPTH: u32 = 8;

// =============================================================================
// Operation Counts
// =============================================================================

/// Maximum number of members collected when flattening one type.
///
/// Larger unions are truncated and marked incomplete; every predicate answers
/// conservatively for an incomplete flattening.
pub const MAX_FLATTENED_MEMBERS: usize = 1_024;

/// Maximum `enter()` calls one `RecursionGuard` accepts, such as a single
/// flattening of one type. The resolver's depth counters do not use it.
pub const MAX_GUARD_ITERATIONS: u32 = 100_000;
