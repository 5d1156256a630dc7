//! Centralized limits for the converter.
//!
//! The lowering passes recurse over expression trees that come straight from
//! user source. These bounds keep pathological inputs (machine generated
//! conditions with thousands of chained `AndAlso`) from exhausting the stack.

/// Maximum nesting inspected by the null-flow lookup when it descends into
/// the left side of an enclosing `AndAlso`/`OrElse`.
///
/// Past this depth the fact is treated as unknown, which only costs a
/// redundant `HasValue` guard in the output.
pub const MAX_NULL_FLOW_DEPTH: u32 = 256;

/// Maximum expression nesting converted by the driver before it gives up with
/// `ConversionError::TooDeep`.
pub const MAX_CONVERSION_DEPTH: u32 = 1_000;
