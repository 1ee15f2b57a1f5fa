//! vslc_diagnostics: Diagnostic messages and error reporting infrastructure.
//!
//! Passes never print or abort on user errors; they push a [`Diagnostic`]
//! into a [`DiagnosticCollection`] and keep going so that one run reports
//! every problem it can find.

use vslc_core::text::TextRange;
use std::fmt;

/// Diagnostic category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCategory {
    Warning,
    Error,
    Message,
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticCategory::Warning => write!(f, "warning"),
            DiagnosticCategory::Error => write!(f, "error"),
            DiagnosticCategory::Message => write!(f, "message"),
        }
    }
}

/// A diagnostic message template with a code and category.
#[derive(Debug, Clone)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub category: DiagnosticCategory,
    /// The message template string. May contain `{0}`, `{1}`, etc. placeholders.
    pub message: &'static str,
}

/// A realized diagnostic with location information and resolved message text.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Where in the source the problem was found, if known.
    pub range: Option<TextRange>,
    pub message_text: String,
    pub code: u32,
    pub category: DiagnosticCategory,
    /// Secondary locations, e.g. the earlier declaration of a duplicate.
    pub related_information: Vec<Diagnostic>,
}

impl Diagnostic {
    /// Create a diagnostic that is not attached to a source location.
    pub fn new(message: &DiagnosticMessage, args: &[&str]) -> Self {
        Self {
            range: None,
            message_text: format_message(message.message, args),
            code: message.code,
            category: message.category,
            related_information: Vec::new(),
        }
    }

    pub fn with_range(range: TextRange, message: &DiagnosticMessage, args: &[&str]) -> Self {
        Self {
            range: Some(range),
            ..Self::new(message, args)
        }
    }

    /// Add related diagnostic information.
    pub fn with_related(mut self, related: Diagnostic) -> Self {
        self.related_information.push(related);
        self
    }

    pub fn is_error(&self) -> bool {
        self.category == DiagnosticCategory::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(range) = self.range {
            write!(f, "({}): ", range.pos)?;
        }
        write!(f, "{} VSL{}: {}", self.category, self.code, self.message_text)?;
        for related in &self.related_information {
            write!(f, "\n  {}", related)?;
        }
        Ok(())
    }
}

/// Format a diagnostic message template by replacing `{0}`, `{1}`, etc. with arguments.
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{}}}", i), arg);
    }
    result
}

/// A collection of diagnostics accumulated during compilation.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticCollection {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollection {
    pub fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
        }
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    /// Diagnostics carrying the given code, in report order.
    pub fn with_code(&self, code: u32) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.code == code)
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Sort diagnostics by source position; unlocated diagnostics go first.
    pub fn sort(&mut self) {
        self.diagnostics
            .sort_by_key(|d| d.range.map(|r| (r.pos, r.end)));
    }
}

// ============================================================================
// Diagnostic Messages
// ============================================================================

pub mod messages {
    use super::*;

    macro_rules! diag {
        ($code:expr, Error, $msg:expr) => {
            DiagnosticMessage { code: $code, category: DiagnosticCategory::Error, message: $msg }
        };
        ($code:expr, Warning, $msg:expr) => {
            DiagnosticMessage { code: $code, category: DiagnosticCategory::Warning, message: $msg }
        };
        ($code:expr, Message, $msg:expr) => {
            DiagnosticMessage { code: $code, category: DiagnosticCategory::Message, message: $msg }
        };
    }

    // ========================================================================
    // Binder (3000-3099)
    // ========================================================================
    pub const CANNOT_FIND_NAME_0: DiagnosticMessage = diag!(3001, Error, "Cannot find name '{0}'.");
    pub const DUPLICATE_DECLARATION_0_SHADOWS_EARLIER: DiagnosticMessage = diag!(3002, Warning, "Duplicate declaration of '{0}' replaces an earlier declaration in the same scope.");
    pub const DUPLICATE_DECLARATION_0: DiagnosticMessage = diag!(3003, Error, "Duplicate declaration of '{0}' in the same scope.");
    pub const _0_WAS_ALSO_DECLARED_HERE: DiagnosticMessage = diag!(3004, Message, "'{0}' was also declared here.");
}
