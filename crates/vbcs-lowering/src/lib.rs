//! Qualification and nullable logic lowering for Visual Basic to C#.
//!
//! - `qualify` - per-node qualification decisions (`SyntaxExpander`)
//! - `nullable` - three-valued `AndAlso`/`OrElse`/`And`/`Or` and lifted
//!   comparisons restated for C#
//! - `boolean_context` - where a null boolean behaves like `False`
//! - `null_flow` - operands proven non-null by an enclosing check
//! - `purity` - reusable and side-effect-free operands
//! - `converter` - reference driver applying both engines to a statement
//! - `temp_names` - session counter for pattern captures
//! - `tracing_config` - opt-in subscriber setup

pub mod boolean_context;
pub mod converter;
pub mod null_flow;
pub mod nullable;
pub mod purity;
pub mod qualify;
pub mod temp_names;
pub mod tracing_config;

pub use converter::ExpressionConverter;
pub use null_flow::KnownNullability;
pub use nullable::{LoweredExpr, NullableLogicLowering};
pub use qualify::{Expansion, ExpansionDecision, NameExpander, SyntaxExpander};
pub use temp_names::TempNames;
