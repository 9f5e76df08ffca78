// Dieselc - A compiler for the Diesel teaching language emitting x86-64 assembly
// Copyright (C) 2026  Marcel Joachim Kloubert <marcel@kloubert.dev>
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Error types for the Diesel compiler.
//!
//! Two disjoint classes live here. [`CompileError`] covers everything a
//! program author can cause (lexical, syntax and semantic errors); those are
//! collected and reported together. [`InternalError`] covers defects in an
//! earlier compiler pass; those abort the compilation immediately.

use std::ops::Range;
use thiserror::Error;

/// A source span representing a range in the source code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// Start byte offset (inclusive)
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
}

impl Span {
    /// Create a new span.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Create a span from a range.
    pub fn from_range(range: Range<usize>) -> Self {
        Self {
            start: range.start,
            end: range.end,
        }
    }

    /// Get the length of this span.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Check if the span is empty.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Merge two spans into one that covers both.
    pub fn merge(&self, other: &Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Self::from_range(range)
    }
}

impl From<Span> for Range<usize> {
    fn from(span: Span) -> Self {
        span.start..span.end
    }
}

/// Error codes for the compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Lexical errors (E001-E010)
    InvalidCharacter,
    InvalidNumber,
    UnterminatedComment,

    // Syntax errors (E100-E130)
    UnexpectedToken,
    UnexpectedEndOfFile,
    ExpectedToken,
    ExpectedExpression,
    ExpectedIdentifier,
    ExpectedType,
    InvalidAssignmentTarget,
    ExpectedConstantValue,
    ArraySizeMustBePositive,
    ArraySizeTooLarge,
    NestingTooDeep,
    FrameTooLarge,

    // Semantic errors (E200-E240)
    UndefinedIdentifier,
    AlreadyDefined,
    CannotAssignToConstant,
    NotAValue,
    TypeMismatch,
    InvalidOperandType,
    ConditionMustBeInteger,
    ArrayIndexMustBeInteger,
    CannotIndexNonArray,
    NotAProcedure,
    NotAFunction,
    WrongNumberOfArguments,
    ArgumentTypeMismatch,
    MissingReturnStatement,
    CannotReturnValueFromProcedure,
    MissingReturnValue,
    ReturnTypeMismatch,
    ConstantExpressionRequired,

    // Compiler defects (E900)
    Internal,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl ErrorCode {
    /// Get the numeric code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            // Lexical errors
            ErrorCode::InvalidCharacter => "E001",
            ErrorCode::InvalidNumber => "E003",
            ErrorCode::UnterminatedComment => "E004",

            // Syntax errors
            ErrorCode::UnexpectedToken => "E100",
            ErrorCode::UnexpectedEndOfFile => "E101",
            ErrorCode::ExpectedToken => "E102",
            ErrorCode::ExpectedExpression => "E103",
            ErrorCode::ExpectedIdentifier => "E105",
            ErrorCode::ExpectedType => "E106",
            ErrorCode::InvalidAssignmentTarget => "E109",
            ErrorCode::ExpectedConstantValue => "E122",
            ErrorCode::ArraySizeMustBePositive => "E123",
            ErrorCode::ArraySizeTooLarge => "E124",
            ErrorCode::NestingTooDeep => "E125",
            ErrorCode::FrameTooLarge => "E126",

            // Semantic errors
            ErrorCode::UndefinedIdentifier => "E200",
            ErrorCode::AlreadyDefined => "E201",
            ErrorCode::CannotAssignToConstant => "E202",
            ErrorCode::NotAValue => "E203",
            ErrorCode::TypeMismatch => "E210",
            ErrorCode::InvalidOperandType => "E212",
            ErrorCode::ConditionMustBeInteger => "E213",
            ErrorCode::ArrayIndexMustBeInteger => "E214",
            ErrorCode::CannotIndexNonArray => "E215",
            ErrorCode::NotAProcedure => "E220",
            ErrorCode::NotAFunction => "E221",
            ErrorCode::WrongNumberOfArguments => "E222",
            ErrorCode::ArgumentTypeMismatch => "E223",
            ErrorCode::MissingReturnStatement => "E224",
            ErrorCode::CannotReturnValueFromProcedure => "E225",
            ErrorCode::MissingReturnValue => "E226",
            ErrorCode::ReturnTypeMismatch => "E227",
            ErrorCode::ConstantExpressionRequired => "E230",

            ErrorCode::Internal => "E900",
        }
    }
}

/// A compiler error with source location.
#[derive(Debug, Clone, Error)]
#[error("[{code}] {message}")]
pub struct CompileError {
    /// The error code.
    pub code: ErrorCode,
    /// The error message.
    pub message: String,
    /// The source span where the error occurred.
    pub span: Span,
    /// Optional hint for fixing the error.
    pub hint: Option<String>,
}

impl CompileError {
    /// Create a new compile error.
    pub fn new(code: ErrorCode, message: impl Into<String>, span: Span) -> Self {
        Self {
            code,
            message: message.into(),
            span,
            hint: None,
        }
    }

    /// Add a hint to this error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Get the error code string.
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }
}

/// Result type for compiler operations.
pub type Result<T> = std::result::Result<T, CompileError>;

/// A defect detected in an earlier compiler pass.
///
/// These are never caused by the program being compiled. Every pass
/// propagates them with `?` so the whole compilation stops at once.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InternalError {
    /// A symbol was accessed as a kind it is not.
    #[error("illegal access to symbol {index} ('{name}') as {expected}, it is {actual}")]
    IllegalKind {
        index: usize,
        name: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// A symbol index outside the table.
    #[error("symbol index {0} is out of range")]
    NoSuchSymbol(usize),

    /// A temporary of type void was requested.
    #[error("cannot create a temporary of void type")]
    VoidTemporary,

    /// An expression without a numeric type reached code generation.
    #[error("expected integer or real, found type '{0}'")]
    NotNumeric(String),

    /// A parameter scan ran off the end of the formal list.
    #[error("parameter '{0}' not found in the formal list of its routine")]
    ParameterNotFound(String),

    /// A `nop` quadruple reached expansion.
    #[error("nop quadruple reached code expansion (quad {0})")]
    NopQuad(usize),

    /// A quadruple operand slot held the wrong kind of operand.
    #[error("quad {quad}: {op} expects {expected} in operand {slot}")]
    BadOperand {
        quad: usize,
        op: &'static str,
        slot: usize,
        expected: &'static str,
    },

    /// More lexical levels than the display can hold.
    #[error("lexical nesting exceeds the maximum of {0} levels")]
    ScopeOverflow(usize),

    /// `close_scope` without a matching `open_scope`.
    #[error("no open scope to close")]
    ScopeUnderflow,

    /// An activation record grew past what a frame can address.
    #[error("activation record of '{routine}' exceeds {limit} bytes")]
    FrameTooLarge { routine: String, limit: usize },
}

impl From<InternalError> for CompileError {
    fn from(error: InternalError) -> Self {
        CompileError::new(
            ErrorCode::Internal,
            format!("internal compiler error: {}", error),
            Span::default(),
        )
        .with_hint("this is a bug in the compiler, not in your program")
    }
}

/// Source location with line and column information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
    /// The content of the line.
    pub line_content: String,
}

impl SourceLocation {
    /// Calculate line and column from a byte offset in source code.
    pub fn from_offset(source: &str, offset: usize) -> Self {
        let offset = offset.min(source.len());
        let before = &source[..offset];

        let line = before.chars().filter(|&c| c == '\n').count() + 1;

        let last_newline = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let column = before[last_newline..].chars().count() + 1;

        let line_start = last_newline;
        let line_end = source[offset..]
            .find('\n')
            .map(|i| offset + i)
            .unwrap_or(source.len());
        let line_content = source[line_start..line_end].to_string();

        Self {
            line,
            column,
            line_content,
        }
    }
}

/// Format an error with source context.
pub fn format_error(error: &CompileError, source: &str, filename: Option<&str>) -> String {
    let loc = SourceLocation::from_offset(source, error.span.start);
    let filename = filename.unwrap_or("<input>");

    let mut output = String::new();

    output.push_str(&format!("error[{}]: {}\n", error.code_str(), error.message));
    output.push_str(&format!("  --> {}:{}:{}\n", filename, loc.line, loc.column));

    let line_num_width = loc.line.to_string().len();
    output.push_str(&format!("{:>width$} |\n", "", width = line_num_width));
    output.push_str(&format!(
        "{:>width$} | {}\n",
        loc.line,
        loc.line_content,
        width = line_num_width
    ));

    let underline_start = loc.column - 1;
    let underline_len = error
        .span
        .len()
        .max(1)
        .min(loc.line_content.len().saturating_sub(underline_start).max(1));
    output.push_str(&format!(
        "{:>width$} | {:>start$}{}\n",
        "",
        "",
        "^".repeat(underline_len),
        width = line_num_width,
        start = underline_start
    ));

    if let Some(hint) = &error.hint {
        output.push_str(&format!(
            "{:>width$} = hint: {}\n",
            "",
            hint,
            width = line_num_width
        ));
    }

    output
}

/// Render an error as an `ariadne` report.
///
/// `color` is switched off by tests and when stderr is not a terminal.
pub fn render_report(
    error: &CompileError,
    source: &str,
    filename: Option<&str>,
    color: bool,
) -> String {
    use ariadne::{Color, Config, Label, Report, ReportKind, Source};

    let filename = filename.unwrap_or("<input>");
    let start = error.span.start.min(source.len());
    let end = error.span.end.clamp(start, source.len());

    let mut report = Report::build(ReportKind::Error, filename, start)
        .with_config(Config::default().with_color(color))
        .with_code(error.code_str())
        .with_message(&error.message)
        .with_label(
            Label::new((filename, start..end))
                .with_message(&error.message)
                .with_color(Color::Red),
        );
    if let Some(hint) = &error.hint {
        report = report.with_help(hint);
    }

    let mut buffer = Vec::new();
    match report
        .finish()
        .write((filename, Source::from(source.to_string())), &mut buffer)
    {
        Ok(()) => String::from_utf8_lossy(&buffer).into_owned(),
        Err(_) => format_error(error, source, Some(filename)),
    }
}

/// A collection of compile errors.
#[derive(Debug, Default)]
pub struct Errors {
    errors: Vec<CompileError>,
}

impl Errors {
    /// Create a new empty error collection.
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Add an error to the collection.
    pub fn push(&mut self, error: CompileError) {
        self.errors.push(error);
    }

    /// Add several errors to the collection.
    pub fn extend(&mut self, errors: impl IntoIterator<Item = CompileError>) {
        self.errors.extend(errors);
    }

    /// Check if there are any errors.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Get the number of errors.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Check if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Get an iterator over the errors.
    pub fn iter(&self) -> impl Iterator<Item = &CompileError> {
        self.errors.iter()
    }

    /// Convert into a vector of errors.
    pub fn into_vec(self) -> Vec<CompileError> {
        self.errors
    }
}

impl IntoIterator for Errors {
    type Item = CompileError;
    type IntoIter = std::vec::IntoIter<CompileError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}
