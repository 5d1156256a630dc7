//! Common types and utilities for the vbcs Visual Basic to C# converter.
//!
//! This crate provides foundational types used across all vbcs crates:
//! - Lowering options (`LoweringOptions`) loaded from JSON
//! - Conversion errors and diagnostics (`ConversionError`, `Diagnostic`)
//! - Centralized recursion limits

// Options controlling the qualification and lowering passes
pub mod options;
pub use options::{LoweringOptions, OptionsError};

// Conversion errors and the diagnostics they turn into
pub mod diagnostics;
pub use diagnostics::{ConversionError, Diagnostic, DiagnosticCategory};

// Centralized limits and thresholds
pub mod limits;
