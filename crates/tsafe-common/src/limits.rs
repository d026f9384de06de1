//! Centralized recursion limits for the analyzer.
//!
//! Solver guards are built from `tsafe_solver::recursion::RecursionProfile`,
//! whose presets read the constants below so the values live in one place.

// =============================================================================
// Type comparison
// =============================================================================

/// Maximum nesting when comparing two types pair by pair.
///
/// Structural descent into deeply nested object/array/tuple types bails out
/// with the conservative "narrowing" verdict beyond this depth.
pub const MAX_COMPARISON_DEPTH: u32 = 100;

/// Maximum nesting when classifying how a type stringifies.
pub const MAX_CLASSIFICATION_DEPTH: u32 = 50;

/// Maximum nesting for plain assignability checks in the reference oracle.
pub const MAX_ASSIGNABILITY_DEPTH: u32 = 100;

/// Maximum nesting when rendering a type to text.
///
/// Deeper types are rendered as `...`.
pub const MAX_FORMAT_DEPTH: u32 = 32;

// =============================================================================
// Work budgets
// =============================================================================

/// Total `enter` attempts allowed for a single guard.
pub const MAX_GUARD_ITERATIONS: u32 = 100_000;

/// Upper bound on distinct keys tracked by a single guard.
pub const MAX_GUARD_VISITING: u32 = 10_000;

/// Maximum number of steps when walking outward through enclosing functions
/// to find a contextual return type.
pub const MAX_FUNCTION_NESTING: u32 = 256;
