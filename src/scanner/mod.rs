//! Turns HolyC source text into tokens.
//!
//! The scan is a single forward pass with one character of lookahead. Type
//! keywords are matched on the whole lexeme (`maximal munch`), so `I32x` is an
//! identifier and not `I32` followed by `x`.
//!
//! Two constructs leave the normal lexical grammar:
//!
//! - `#include "path"` asks the host for the included text and splices it in
//!   front of the unread input. Scanning resumes at the start of the spliced
//!   buffer and the line counter restarts at 1.
//! - `js { ... };` captures everything up to the matching `};` verbatim into a
//!   single [`TokenType::ForeignCode`] token.
//!
//! String literals are captured raw, escapes like `\n` are decoded when the
//! string is printed.
mod token;

use anyhow::Context;
pub(crate) use token::*;
use TokenType::*;

use crate::{error::scanner::{ScanError, ScanErrorType, ScannerError}, host::IncludeFetcher};

/// Upper bound on `#include` splices in one scan.
const MAX_INCLUDES: usize = 64;

/// A scanner for HolyC source code
pub(crate) struct Scanner<'h> {
	/// Remaining input, replaced whenever an include is spliced in
	source:     Vec<char>,
	/// Points at the beginning of the current lexeme
	start:      usize,
	/// Points at the character currently being considered
	cursor:     usize,
	/// Line of the character at `cursor`
	line:       usize,
	/// Line the current lexeme started on
	start_line: usize,
	fetcher:    Option<&'h dyn IncludeFetcher>,
	splices:    usize,
}

impl<'h> Scanner<'h> {
	pub fn new(source: &str) -> Self {
		Self { source: source.chars().collect(), start: 0, cursor: 0, line: 1, start_line: 1, fetcher: None, splices: 0 }
	}

	pub fn with_include_fetcher(mut self, fetcher: &'h dyn IncludeFetcher) -> Self {
		self.fetcher = Some(fetcher);
		self
	}

	/// Scan all tokens from the source code, stopping at the first error.
	pub fn scan_tokens(mut self) -> Result<Vec<Token>, ScannerError> {
		let mut tokens = Vec::new();
		while self.cursor < self.source.len() {
			// We are at the beginning of the next lexeme.
			self.start = self.cursor;
			self.start_line = self.line;
			self.scan_token(&mut tokens)?;
		}
		tokens.push(Token::new(Eof, "", self.line));
		tracing::debug!(tokens = tokens.len(), includes = self.splices, "scanned source");
		Ok(tokens)
	}

	/// Scan a single token from the source code
	fn scan_token(&mut self, tokens: &mut Vec<Token>) -> Result<(), ScannerError> {
		let next_char = self.advance().context("Unexpected EOF")?;
		#[rustfmt::skip]
		let r#type = match next_char {
			'(' => LeftParen,
			')' => RightParen,
			'{' => LeftBrace,
			'}' => RightBrace,
			',' => Comma,
			'.' => Dot,
			';' => Semicolon,
			'+' => if self.match_next('+') { PlusPlus } else if self.match_next('=') { PlusEqual } else { Plus },
			'-' => if self.match_next('-') { MinusMinus } else if self.match_next('=') { MinusEqual } else { Minus },
			'*' => if self.match_next('=') { StarEqual } else { Star },
			'!' => if self.match_next('=') { BangEqual } else { Bang },
			'=' => if self.match_next('=') { EqualEqual } else { Equal },
			'<' => if self.match_next('=') { LessEqual } else { Less },
			'>' => if self.match_next('=') { GreaterEqual } else { Greater },
			'&' if self.match_next('&') => AndAnd,
			'|' if self.match_next('|') => OrOr,
			'/' => if self.match_next('/') {
				while self.peek().is_some_and(|c| c != '\n') { self.advance(); }
				return Ok(());
			} else if self.match_next('*') {
				return self.block_comment();
			} else if self.match_next('=') { SlashEqual } else { Slash },
			' ' | '\r' | '\t' => return Ok(()),
			'\n' => { self.line += 1; return Ok(()) }
			'"' | '\'' => self.string(next_char)?,
			'#' => return self.directive(tokens),
			c if c.is_ascii_digit() => self.number()?,
			c if c.is_ascii_alphabetic() || c == '_' => self.identifier()?,
			_ => return Err(self.error(ScanErrorType::UnexpectedCharacter(next_char))),
		};

		tokens.push(Token::new(r#type, self.lexeme(), self.start_line));
		Ok(())
	}

	/// Match the next character if it is the expected one
	fn match_next(&mut self, expected: char) -> bool {
		matches!(self.peek(), Some(c) if c == expected && { self.advance(); true })
	}

	/// Advance to the next character
	fn advance(&mut self) -> Option<char> {
		let c = *self.source.get(self.cursor)?;
		self.cursor += 1;
		Some(c)
	}

	/// Peek the current character
	fn peek(&self) -> Option<char> { self.source.get(self.cursor).copied() }

	/// Peek the second character ahead
	fn peek_second(&self) -> Option<char> { self.source.get(self.cursor + 1).copied() }

	fn lexeme(&self) -> String { self.source[self.start..self.cursor].iter().collect() }

	fn error(&self, r#type: ScanErrorType) -> ScannerError {
		ScanError::new(self.start_line, self.lexeme(), r#type).into()
	}

	fn block_comment(&mut self) -> Result<(), ScannerError> {
		while let Some(c) = self.peek() {
			if c == '*' && self.peek_second() == Some('/') {
				self.advance(); // consume '*'
				self.advance(); // consume '/'
				return Ok(());
			}
			if c == '\n' {
				self.line += 1;
			}
			self.advance();
		}
		Err(self.error(ScanErrorType::UnterminatedBlockComment))
	}

	/// Scan a string literal delimited by `quote`
	fn string(&mut self, quote: char) -> Result<TokenType, ScannerError> {
		let mut value = String::new();
		loop {
			match self.advance() {
				None => return Err(self.error(ScanErrorType::UnterminatedString)),
				Some(c) if c == quote => break,
				Some('\\') => {
					// Keep the escape raw, but an escaped quote must not end the literal.
					value.push('\\');
					if let Some(escaped) = self.advance() {
						if escaped == '\n' {
							self.line += 1;
						}
						value.push(escaped);
					}
				}
				Some(c) => {
					if c == '\n' {
						self.line += 1;
					}
					value.push(c);
				}
			}
		}
		Ok(StringLiteral(value))
	}

	/// Scan a number literal
	fn number(&mut self) -> Result<TokenType, ScannerError> {
		while self.peek().is_some_and(|c| c.is_ascii_digit()) {
			self.advance();
		}

		// Look for a fractional part.
		if self.peek() == Some('.') && self.peek_second().is_some_and(|c| c.is_ascii_digit()) {
			self.advance(); // consume '.'
			while self.peek().is_some_and(|c| c.is_ascii_digit()) {
				self.advance();
			}
			return self.lexeme().parse().map(Float).map_err(|_| self.error(ScanErrorType::InvalidNumber));
		}

		self.lexeme().parse().map(Integer).map_err(|_| self.error(ScanErrorType::InvalidNumber))
	}

	/// Scan an identifier, keyword or the start of a `js` block
	fn identifier(&mut self) -> Result<TokenType, ScannerError> {
		while self.peek().is_some_and(|c| c.is_ascii_alphanumeric() || c == '_') {
			self.advance();
		}
		let text = self.lexeme();
		if text == "js" {
			return self.foreign_code();
		}
		Ok(TokenType::keyword_or_identifier(&text))
	}

	fn skip_blanks(&mut self) {
		while let Some(c) = self.peek() {
			match c {
				' ' | '\t' | '\r' => {}
				'\n' => self.line += 1,
				_ => break,
			}
			self.advance();
		}
	}

	/// Capture the body of `js { ... };` verbatim
	fn foreign_code(&mut self) -> Result<TokenType, ScannerError> {
		self.skip_blanks();
		match self.advance() {
			Some('{') => {}
			Some(c) => return Err(self.error(ScanErrorType::UnexpectedCharacter(c))),
			None => return Err(self.error(ScanErrorType::UnterminatedForeignCode)),
		}

		let mut body = String::new();
		let mut depth = 1;
		loop {
			match self.advance() {
				None => return Err(self.error(ScanErrorType::UnterminatedForeignCode)),
				Some('{') => depth += 1,
				Some('}') => {
					depth -= 1;
					if depth == 0 {
						break;
					}
				}
				Some('\n') => self.line += 1,
				Some(_) => {}
			}
			body.push(self.source[self.cursor - 1]);
		}

		self.skip_blanks();
		if !self.match_next(';') {
			return Err(self.error(ScanErrorType::UnterminatedForeignCode));
		}
		Ok(ForeignCode(body))
	}

	/// Handle `#define` and `#include`
	fn directive(&mut self, tokens: &mut Vec<Token>) -> Result<(), ScannerError> {
		while self.peek().is_some_and(|c| c.is_ascii_alphabetic()) {
			self.advance();
		}
		match self.lexeme().as_str() {
			"#define" => {
				tokens.push(Token::new(Define, "#define", self.start_line));
				Ok(())
			}
			"#include" => self.include(),
			_ => Err(self.error(ScanErrorType::UnexpectedCharacter('#'))),
		}
	}

	/// Fetch the included text and splice it in front of the unread input.
	fn include(&mut self) -> Result<(), ScannerError> {
		while self.peek().is_some_and(|c| c == ' ' || c == '\t') {
			self.advance();
		}
		let quote = match self.advance() {
			Some(quote @ ('"' | '\'')) => quote,
			_ => return Err(self.error(ScanErrorType::MalformedInclude)),
		};
		let mut path = String::new();
		loop {
			match self.advance() {
				Some(c) if c == quote => break,
				Some('\n') | None => return Err(self.error(ScanErrorType::MalformedInclude)),
				Some(c) => path.push(c),
			}
		}

		self.splices += 1;
		if self.splices > MAX_INCLUDES {
			return Err(self.error(ScanErrorType::IncludeLimit));
		}

		let line = self.start_line;
		let fetcher = self.fetcher.ok_or_else(|| ScannerError::IncludeError {
			path:   path.clone(),
			line,
			source: std::io::Error::new(std::io::ErrorKind::Unsupported, "no include fetcher installed"),
		})?;
		let included = fetcher.fetch(&path).map_err(|source| ScannerError::IncludeError { path: path.clone(), line, source })?;
		tracing::trace!(%path, bytes = included.len(), "splicing include");

		let mut spliced: Vec<char> = included.chars().collect();
		spliced.extend_from_slice(&self.source[self.cursor..]);
		self.source = spliced;
		self.cursor = 0;
		self.start = 0;
		self.line = 1;
		Ok(())
	}
}
