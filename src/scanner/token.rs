use std::fmt::Display;

/// A token produced by the scanner
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
	pub r#type: TokenType,
	pub lexeme: String,
	pub line:   usize,
}

impl Token {
	pub fn new(r#type: TokenType, lexeme: impl Into<String>, line: usize) -> Self {
		Self { r#type, lexeme: lexeme.into(), line }
	}
}

/// Fixed-width data types, `I0` through `F64` plus `Bool`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
	I0,
	U0,
	I8,
	U8,
	I16,
	U16,
	I32,
	U32,
	I64,
	U64,
	F64,
	Bool,
}

impl DataType {
	/// Matches by exact text, `I32x` is an identifier.
	pub fn from_keyword(text: &str) -> Option<Self> {
		use DataType::*;
		Some(match text {
			"I0" => I0,
			"U0" => U0,
			"I8" => I8,
			"U8" => U8,
			"I16" => I16,
			"U16" => U16,
			"I32" => I32,
			"U32" => U32,
			"I64" => I64,
			"U64" => U64,
			"F64" => F64,
			"Bool" => Bool,
			_ => return None,
		})
	}
}

impl Display for DataType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{self:?}") }
}

/// The different kinds of tokens in HolyC.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenType {
	/// Left parenthesis `(`.
	LeftParen,
	/// Right parenthesis `)`.
	RightParen,
	/// Left brace `{`.
	LeftBrace,
	/// Right brace `}`.
	RightBrace,
	/// Comma `,`.
	Comma,
	/// Dot `.`.
	Dot,
	/// Semicolon `;`.
	Semicolon,
	/// Minus `-`.
	Minus,
	/// Plus `+`.
	Plus,
	/// Slash `/`.
	Slash,
	/// Asterisk `*`.
	Star,
	/// `++`.
	PlusPlus,
	/// `--`.
	MinusMinus,
	/// `+=`.
	PlusEqual,
	/// `-=`.
	MinusEqual,
	/// `*=`.
	StarEqual,
	/// `/=`.
	SlashEqual,
	/// Bang `!`.
	Bang,
	/// Bang equal `!=`.
	BangEqual,
	/// Equal `=`.
	Equal,
	/// Equal equal `==`.
	EqualEqual,
	/// Greater than `>`.
	Greater,
	/// Greater than or equal `>=`.
	GreaterEqual,
	/// Less than `<`.
	Less,
	/// Less than or equal `<=`.
	LessEqual,
	/// Logical and `&&`.
	AndAnd,
	/// Logical or `||`.
	OrOr,
	/// Identifier, e.g. variable, procedure or class name.
	Identifier(String),
	/// String literal with escapes still raw, e.g. `"hi\n"` or `'hi'`.
	StringLiteral(String),
	/// Integer literal, e.g. `123`.
	Integer(i64),
	/// Float literal, e.g. `1.5`.
	Float(f64),
	/// One of the fixed-width type keywords.
	Type(DataType),
	/// For loop keyword.
	For,
	/// If statement keyword.
	If,
	/// Else keyword.
	Else,
	/// Return statement keyword.
	Return,
	/// Class keyword.
	Class,
	/// Boolean literal `TRUE`.
	True,
	/// Boolean literal `FALSE`.
	False,
	/// `#define` directive.
	Define,
	/// Raw body of a `js { ... };` block.
	ForeignCode(String),
	/// End of file/input.
	Eof,
}

impl TokenType {
	pub fn keyword_or_identifier(value: &str) -> Self {
		if let Some(data_type) = DataType::from_keyword(value) {
			return TokenType::Type(data_type);
		}
		match value {
			"for" => TokenType::For,
			"if" => TokenType::If,
			"else" => TokenType::Else,
			"return" => TokenType::Return,
			"class" => TokenType::Class,
			"TRUE" => TokenType::True,
			"FALSE" => TokenType::False,
			_ => TokenType::Identifier(value.to_string()),
		}
	}

	pub fn is_assignment(&self) -> bool {
		matches!(self, TokenType::Equal | TokenType::PlusEqual | TokenType::MinusEqual | TokenType::StarEqual | TokenType::SlashEqual)
	}
}
