#[derive(thiserror::Error, Debug)]
pub enum ParserError {
	#[error("{0}")]
	InternalError(#[from] anyhow::Error),
	#[error(transparent)]
	ParseError(#[from] ParseError),
}

#[derive(thiserror::Error, Debug)]
#[error("Parser failure: '{text}' unexpected token in line {line}")]
pub struct ParseError {
	line:   usize,
	text:   String,
	r#type: ParseErrorType,
}

impl ParseError {
	pub fn new(line: usize, text: impl Into<String>, r#type: ParseErrorType) -> Self {
		Self { line, text: text.into(), r#type }
	}

	pub fn line(&self) -> usize { self.line }

	pub fn text(&self) -> &str { &self.text }

	pub fn kind(&self) -> &ParseErrorType { &self.r#type }
}

#[derive(Debug, PartialEq)]
pub enum ParseErrorType {
	/// The token does not fit the production being parsed.
	UnexpectedToken,
	/// Input ended in the middle of a statement.
	UnexpectedEof,
	/// An identifier used before its declaration.
	Undeclared,
	/// A name declared twice in the same scope.
	Redeclared,
	/// Call-site arguments do not match the prototype.
	ArityMismatch { expected: usize, found: usize },
	/// A parameter without default was left empty at the call site.
	MissingArgument(String),
	/// Dotted path that names no field of the instance's class.
	UnknownField,
	/// Assignment to a `#define` constant.
	AssignToConstant,
	/// `return` outside of a procedure body.
	ReturnOutsideProcedure,
	/// Procedure defined inside another procedure or block.
	NestedProcedure,
}

impl std::fmt::Display for ParseErrorType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		use ParseErrorType::*;
		match self {
			UnexpectedToken => write!(f, "Unexpected token"),
			UnexpectedEof => write!(f, "Unexpected end of input"),
			Undeclared => write!(f, "Used before declaration"),
			Redeclared => write!(f, "Already declared"),
			ArityMismatch { expected, found } => write!(f, "Expected {expected} arguments, found {found}"),
			MissingArgument(name) => write!(f, "Missing argument '{name}'"),
			UnknownField => write!(f, "Unknown field"),
			AssignToConstant => write!(f, "Cannot assign to a constant"),
			ReturnOutsideProcedure => write!(f, "Return outside of a procedure"),
			NestedProcedure => write!(f, "Procedures can only be defined at top level"),
		}
	}
}
