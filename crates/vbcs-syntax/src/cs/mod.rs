//! C# target IR and printer.

pub mod ir;
pub mod printer;

pub use ir::{CsBinaryOperator, CsExpr, CsPattern, CsStmt, CsUnaryOperator};
pub use printer::CsPrinter;

#[cfg(test)]
#[path = "../../tests/printer.rs"]
mod tests;
