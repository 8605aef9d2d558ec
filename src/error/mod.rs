pub mod interpreter;
pub mod parser;
pub mod scanner;

use crate::error::{parser::ParserError, scanner::ScannerError};

/// HolyCError is the top-level error type for the interpreter pipeline.
///
/// The first error of a run aborts it; there is no recovery.
#[derive(thiserror::Error, Debug)]
pub enum HolyCError {
	/// Internal compiler error, should never happen
	#[error("CompilerInternalError: {0}")]
	InternalError(#[from] anyhow::Error),
	/// Unrecognised character or unterminated literal
	#[error(transparent)]
	ScanError(#[from] scanner::ScanError),
	/// An `#include` the host could not provide
	#[error("Include failure: '{path}' could not be fetched in line {line}: {source}")]
	IncludeError {
		path:   String,
		line:   usize,
		#[source]
		source: std::io::Error,
	},
	/// Structural mismatch, unresolved name, redeclaration or arity error
	#[error(transparent)]
	ParseError(#[from] parser::ParseError),
	/// Runtime errors encountered during interpretation
	#[error(transparent)]
	RuntimeError(#[from] interpreter::InterpreterError),
}

impl HolyCError {
	/// The precise reason behind a lexer or parser failure, e.g. an arity
	/// mismatch, where the main message only names the offending token.
	pub fn reason(&self) -> Option<String> {
		match self {
			HolyCError::ScanError(e) => Some(e.kind().to_string()),
			HolyCError::ParseError(e) => Some(e.kind().to_string()),
			_ => None,
		}
	}
}

impl From<ScannerError> for HolyCError {
	fn from(error: ScannerError) -> Self {
		match error {
			ScannerError::InternalError(e) => HolyCError::InternalError(e),
			ScannerError::ScanError(e) => HolyCError::ScanError(e),
			ScannerError::IncludeError { path, line, source } => HolyCError::IncludeError { path, line, source },
		}
	}
}

impl From<ParserError> for HolyCError {
	fn from(error: ParserError) -> Self {
		match error {
			ParserError::InternalError(e) => HolyCError::InternalError(e),
			ParserError::ParseError(e) => HolyCError::ParseError(e),
		}
	}
}
