use thiserror::Error;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DiagnosticCategory {
    Warning,
    Error,
}

/// A conversion diagnostic the host attaches to the output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    pub start: u32,
    pub length: u32,
    pub message_text: String,
}

impl Diagnostic {
    pub fn error(start: u32, length: u32, message: impl Into<String>) -> Self {
        Self {
            category: DiagnosticCategory::Error,
            start,
            length,
            message_text: message.into(),
        }
    }

    pub fn warning(start: u32, length: u32, message: impl Into<String>) -> Self {
        Self {
            category: DiagnosticCategory::Warning,
            start,
            length,
            message_text: message.into(),
        }
    }
}

/// Failure raised by the conversion driver for trees it cannot rewrite.
///
/// The qualification and nullable-lowering engines never fail on well-typed
/// input; these errors describe malformed trees handed to the driver. The
/// caller is expected to report them and keep the original node.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    #[error("node {index} does not exist in the arena")]
    MissingNode { index: u32 },
    #[error("expected an expression but found {kind} at {pos}")]
    ExpectedExpression { kind: &'static str, pos: u32 },
    #[error("expected a statement but found {kind} at {pos}")]
    ExpectedStatement { kind: &'static str, pos: u32 },
    #[error("expression nesting exceeds {limit} levels at {pos}")]
    TooDeep { limit: u32, pos: u32 },
}

impl ConversionError {
    /// Source position the error refers to, when there is one.
    pub fn pos(&self) -> Option<u32> {
        match self {
            ConversionError::MissingNode { .. } => None,
            ConversionError::ExpectedExpression { pos, .. }
            | ConversionError::ExpectedStatement { pos, .. }
            | ConversionError::TooDeep { pos, .. } => Some(*pos),
        }
    }

    /// Nesting past the limit is a well-formed tree left as written, so it
    /// is reported as a warning.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let start = self.pos().unwrap_or(0);
        match self {
            ConversionError::TooDeep { .. } => Diagnostic::warning(start, 0, self.to_string()),
            _ => Diagnostic::error(start, 0, self.to_string()),
        }
    }
}
