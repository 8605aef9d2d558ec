/// Scanner related errors
#[derive(thiserror::Error, Debug)]
pub enum ScannerError {
	/// Internal compiler error, should never happen
	#[error("{0}")]
	InternalError(#[from] anyhow::Error),
	/// Errors encountered during scanning
	#[error(transparent)]
	ScanError(#[from] ScanError),
	/// An `#include` could not be fetched from the host.
	#[error("Include failure: '{path}' could not be fetched in line {line}: {source}")]
	IncludeError {
		path:   String,
		line:   usize,
		#[source]
		source: std::io::Error,
	},
}

/// A specific scanning error with the offending text and line number.
#[derive(thiserror::Error, Debug)]
#[error("Lexer failure: '{text}' unexpected token in line {line}")]
pub struct ScanError {
	/// The line number where the error occurred.
	line:   usize,
	/// The offending source text.
	text:   String,
	/// The type of scanning error.
	r#type: ScanErrorType,
}

impl ScanError {
	pub fn new(line: usize, text: impl Into<String>, r#type: ScanErrorType) -> Self {
		Self { line, text: text.into(), r#type }
	}

	pub fn line(&self) -> usize { self.line }

	pub fn text(&self) -> &str { &self.text }

	pub fn kind(&self) -> &ScanErrorType { &self.r#type }
}

/// Types of scanning errors.
#[derive(Debug, PartialEq)]
pub enum ScanErrorType {
	/// `/*` without a closing `*/`.
	UnterminatedBlockComment,
	/// A character that starts no token.
	UnexpectedCharacter(char),
	/// A quoted literal running into the end of input.
	UnterminatedString,
	/// A `js {` block without its closing `};`.
	UnterminatedForeignCode,
	/// A digit run that does not fit the literal type.
	InvalidNumber,
	/// `#include` not followed by a quoted path.
	MalformedInclude,
	/// Too many `#include` splices in one scan.
	IncludeLimit,
}

impl std::fmt::Display for ScanErrorType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		use ScanErrorType::*;
		match self {
			UnterminatedBlockComment => write!(f, "Unterminated block comment"),
			UnexpectedCharacter(c) => write!(f, "Unexpected character '{c}'"),
			UnterminatedString => write!(f, "Unterminated string literal"),
			UnterminatedForeignCode => write!(f, "Unterminated foreign code block"),
			InvalidNumber => write!(f, "Invalid number literal"),
			MalformedInclude => write!(f, "Expected a quoted path after #include"),
			IncludeLimit => write!(f, "Too many nested includes"),
		}
	}
}
