//! The `Parser` turns tokens into statements and resolves every name on the
//! spot: a variable, procedure or class has to be declared before it is used,
//! and the parser records each declaration in the [`SymbolTables`] it borrows.
//!
//! Arithmetic has no precedence levels. Operands chain strictly left to right,
//! parentheses are the only way to group. An assignment operator is the first
//! link of its chain: `a += 2 * 3` computes `(a + 2) * 3`, storing into `a`
//! after each link.
//!
//! Grammar:
//!
//! ``` BNF
//! program        → declaration* EOF ;
//! declaration    → procedure | class | define | statement ;
//! procedure      → TYPE IDENT "(" parameters? ")" block ;
//! parameters     → TYPE IDENT ( "=" literal )? ( "," TYPE IDENT ( "=" literal )? )* ;
//! class          → "class" IDENT "{" ( fieldType IDENT ( "," IDENT )* ";" )* "}" declarators? ";" ;
//! define         → "#define" IDENT literal ";"? ;
//! statement      → varDecl | print | for | if | return | JS | exprStmt ;
//! varDecl        → ( TYPE | CLASS_NAME ) IDENT ( "=" chain )? ( "," IDENT ( "=" chain )? )* ";" ;
//! print          → STRING ( "," chain )* ";" ;
//! for            → "for" "(" stmtExpr? ";" condition? ";" stmtExpr? ")" body ;
//! if             → "if" "(" condition ")" body ( "else" ( if | body ) )? ;
//! return         → "return" chain? ";" ;
//! body           → block | statement ;
//! stmtExpr       → place ASSIGN chain | chain ;
//! condition      → term ( ( "&&" | "||" ) term )* ;
//! term           → "!"* chain ( COMPARE chain )? ;
//! chain          → operand ( ( "+" | "-" | "*" | "/" ) operand )* ;
//! operand        → NUMBER | STRING | "TRUE" | "FALSE" | "-" operand | "(" chain ")" | call
//!                | ( "++" | "--" ) place | place ( "++" | "--" )? ;
//! call           → PROC_NAME ( "(" ( chain? ( "," chain? )* )? ")" )? ;
//! place          → IDENT ( "." IDENT )* ;
//! ```

pub(crate) mod expression;

use std::rc::Rc;

use TokenType::*;
use tracing::debug;

use crate::{error::parser::{ParseError, ParseErrorType, ParserError}, interpreter::value::Value, parser::expression::{ArithmeticOperator, ComparisonOperator, Condition, Expression, LogicalOperator, Place, Step, Term}, scanner::{DataType, Token, TokenType}, statement::{Declarator, Procedure, Statement}, symbols::{ClassType, Field, Parameter, Prototype, Scope, SymbolTables, VarType, Variable}};

pub(crate) struct Parser<'s> {
	tokens:  Vec<Token>,
	current: usize,
	symbols: &'s mut SymbolTables,
	scope:   Scope,
}

impl<'s> Parser<'s> {
	pub fn new(tokens: Vec<Token>, symbols: &'s mut SymbolTables) -> Self {
		Self { tokens, current: 0, symbols, scope: Scope::Global }
	}

	/// Parse the whole token stream. The first error aborts.
	pub fn parse(mut self) -> Result<Vec<Statement>, ParserError> {
		let mut statements = Vec::new();
		while !self.is_at_end() {
			statements.push(self.declaration()?);
		}
		debug!(statements = statements.len(), "parsed program");
		Ok(statements)
	}

	fn declaration(&mut self) -> Result<Statement, ParserError> {
		match self.peek().r#type {
			Type(_) if self.is_procedure_head() => self.procedure(),
			Class => self.class(),
			Define => self.define(),
			_ => self.statement(),
		}
	}

	fn statement(&mut self) -> Result<Statement, ParserError> {
		match &self.peek().r#type {
			Type(_) if self.is_procedure_head() => Err(self.error_at(self.current + 1, ParseErrorType::NestedProcedure)),
			Type(data_type) => {
				let r#type = VarType::Primitive(*data_type);
				self.advance();
				self.var_declaration(r#type, true)
			}
			Identifier(name) if self.symbols.class(name).is_some() => {
				let class = self.symbols.class(name).unwrap_or_default();
				self.advance();
				self.var_declaration(VarType::Class(class), false)
			}
			StringLiteral(_) => self.print(),
			For => self.for_statement(),
			If => self.if_statement(),
			Return => self.return_statement(),
			ForeignCode(code) => {
				let code = code.clone();
				let line = self.advance().line;
				Ok(Statement::ForeignCode { code, line })
			}
			// Classes and constants only at top level.
			Class | Define => Err(self.unexpected()),
			_ => {
				let expression = self.statement_expression()?;
				self.consume(Semicolon)?;
				Ok(Statement::Expression(expression))
			}
		}
	}

	/// `TYPE IDENT (` starts a procedure definition.
	fn is_procedure_head(&self) -> bool {
		matches!(self.peek_at(1).r#type, Identifier(_)) && matches!(self.peek_at(2).r#type, LeftParen)
	}

	fn procedure(&mut self) -> Result<Statement, ParserError> {
		let Type(return_type) = self.advance().r#type else { return Err(self.unexpected()) };
		let name_token = self.consume_identifier()?;
		self.consume(LeftParen)?;

		let mut parameters: Vec<Parameter> = Vec::new();
		if !self.check(&RightParen) {
			loop {
				let Type(r#type) = self.peek().r#type else { return Err(self.unexpected()) };
				self.advance();
				let token = self.consume_identifier()?;
				if parameters.iter().any(|p| p.name == token.lexeme) {
					return Err(ParseError::new(token.line, token.lexeme, ParseErrorType::Redeclared).into());
				}
				let default = if self.match_token(&Equal) { Some(self.literal()?) } else { None };
				parameters.push(Parameter { name: token.lexeme, r#type, default });
				if !self.match_token(&Comma) {
					break;
				}
			}
		}
		self.consume(RightParen)?;

		let parameter_types = parameters.iter().map(|p| p.r#type).collect();
		let prototype = Prototype { name: name_token.lexeme.clone(), return_type, parameters, locals: Vec::new() };
		// Registered before the body so the procedure can call itself.
		let ordinal = self
			.symbols
			.declare_procedure(prototype)
			.ok_or_else(|| ParseError::new(name_token.line, name_token.lexeme.as_str(), ParseErrorType::Redeclared))?;

		self.scope = Scope::Procedure(ordinal);
		let body = self.block();
		self.scope = Scope::Global;
		let body = body?;

		let locals = match self.symbols.prototype(ordinal) {
			Some(prototype) => prototype.locals.iter().map(|v| v.r#type).collect(),
			None => return Err(anyhow::anyhow!("prototype {ordinal} vanished while parsing its body").into()),
		};
		debug!(name = %name_token.lexeme, ordinal, "parsed procedure");
		Ok(Statement::ProcedureDefinition(Rc::new(Procedure {
			ordinal,
			name: name_token.lexeme,
			return_type,
			parameter_types,
			locals,
			body,
		})))
	}

	fn class(&mut self) -> Result<Statement, ParserError> {
		self.consume(Class)?;
		let name_token = self.consume_identifier()?;
		self.consume(LeftBrace)?;

		let mut fields: Vec<Field> = Vec::new();
		while !self.check(&RightBrace) {
			let token = self.advance();
			let r#type = match &token.r#type {
				Type(data_type) => VarType::Primitive(*data_type),
				Identifier(name) => match self.symbols.class(name) {
					Some(class) => VarType::Class(class),
					None => return Err(ParseError::new(token.line, token.lexeme, ParseErrorType::Undeclared).into()),
				},
				Eof => return Err(ParseError::new(token.line, "", ParseErrorType::UnexpectedEof).into()),
				_ => return Err(ParseError::new(token.line, token.lexeme, ParseErrorType::UnexpectedToken).into()),
			};
			loop {
				let field = self.consume_identifier()?;
				if fields.iter().any(|f| f.name == field.lexeme) {
					return Err(ParseError::new(field.line, field.lexeme, ParseErrorType::Redeclared).into());
				}
				fields.push(Field { name: field.lexeme, r#type });
				if !self.match_token(&Comma) {
					break;
				}
			}
			self.consume(Semicolon)?;
		}
		self.consume(RightBrace)?;

		let class = self
			.symbols
			.declare_class(ClassType { name: name_token.lexeme.clone(), fields })
			.ok_or_else(|| ParseError::new(name_token.line, name_token.lexeme.as_str(), ParseErrorType::Redeclared))?;

		let instances = if matches!(self.peek().r#type, Identifier(_)) {
			self.declarators(VarType::Class(class), false)?
		} else {
			self.consume(Semicolon)?;
			Vec::new()
		};
		Ok(Statement::ClassDefinition { class, instances })
	}

	/// `#define NAME literal` declares a global constant.
	fn define(&mut self) -> Result<Statement, ParserError> {
		self.consume(Define)?;
		let token = self.consume_identifier()?;
		let value = self.literal()?;
		self.match_token(&Semicolon);

		let data_type = match value {
			Value::Float(_) => DataType::F64,
			_ => DataType::I64,
		};
		let r#type = VarType::Primitive(data_type);
		let variable = Variable { constant: true, ..Variable::new(token.lexeme.as_str(), r#type) };
		let slot = self
			.symbols
			.declare(self.scope, variable)
			.ok_or_else(|| ParseError::new(token.line, token.lexeme.as_str(), ParseErrorType::Redeclared))?;
		let target = Place { name: token.lexeme, slot, field: None, r#type };
		let step = Step { operator: None, operand: Expression::Literal(value), line: token.line };
		let initializer = Expression::Assign { target: target.clone(), steps: vec![step] };
		Ok(Statement::VarDeclaration { declarators: vec![Declarator { target, initializer: Some(initializer) }] })
	}

	fn var_declaration(&mut self, r#type: VarType, initializers: bool) -> Result<Statement, ParserError> {
		let declarators = self.declarators(r#type, initializers)?;
		Ok(Statement::VarDeclaration { declarators })
	}

	/// `a [= e], b [= e];` Each name is declared before its initializer is
	/// parsed, so `I32 a = a + 1;` reads the zeroed `a`. Initializers fold
	/// into the new cell like any other assignment.
	fn declarators(&mut self, r#type: VarType, initializers: bool) -> Result<Vec<Declarator>, ParserError> {
		let mut declarators = Vec::new();
		loop {
			let token = self.consume_identifier()?;
			let slot = self
				.symbols
				.declare(self.scope, Variable::new(token.lexeme.as_str(), r#type))
				.ok_or_else(|| ParseError::new(token.line, token.lexeme.as_str(), ParseErrorType::Redeclared))?;
			let target = Place { name: token.lexeme, slot, field: None, r#type };
			let initializer = if initializers && self.check(&Equal) {
				let line = self.advance().line;
				Some(self.assignment(target.clone(), None, line)?)
			} else {
				None
			};
			declarators.push(Declarator { target, initializer });
			if !self.match_token(&Comma) {
				break;
			}
		}
		self.consume(Semicolon)?;
		Ok(declarators)
	}

	fn print(&mut self) -> Result<Statement, ParserError> {
		let token = self.advance();
		let StringLiteral(format) = token.r#type else { return Err(self.unexpected()) };
		let mut arguments = Vec::new();
		while self.match_token(&Comma) {
			arguments.push(self.chain()?);
		}
		self.consume(Semicolon)?;
		Ok(Statement::Print { format, arguments, line: token.line })
	}

	fn for_statement(&mut self) -> Result<Statement, ParserError> {
		self.consume(For)?;
		self.consume(LeftParen)?;
		let initializer = if self.check(&Semicolon) { None } else { Some(self.statement_expression()?) };
		self.consume(Semicolon)?;
		let condition = if self.check(&Semicolon) { None } else { Some(self.condition()?) };
		self.consume(Semicolon)?;
		let step = if self.check(&RightParen) { None } else { Some(self.statement_expression()?) };
		self.consume(RightParen)?;
		let body = self.body()?;
		Ok(Statement::For { initializer, condition, step, body })
	}

	fn if_statement(&mut self) -> Result<Statement, ParserError> {
		self.consume(If)?;
		self.consume(LeftParen)?;
		let condition = self.condition()?;
		self.consume(RightParen)?;
		let then_branch = self.body()?;
		let else_branch = if self.match_token(&Else) {
			if self.check(&If) { Some(vec![self.if_statement()?]) } else { Some(self.body()?) }
		} else {
			None
		};
		Ok(Statement::If { condition, then_branch, else_branch })
	}

	fn return_statement(&mut self) -> Result<Statement, ParserError> {
		if self.scope == Scope::Global {
			return Err(self.error_at(self.current, ParseErrorType::ReturnOutsideProcedure));
		}
		let line = self.advance().line;
		let value = if self.check(&Semicolon) { None } else { Some(self.chain()?) };
		self.consume(Semicolon)?;
		Ok(Statement::Return { value, line })
	}

	/// A braced block, or a single statement.
	fn body(&mut self) -> Result<Vec<Statement>, ParserError> {
		if self.check(&LeftBrace) { self.block() } else { Ok(vec![self.statement()?]) }
	}

	fn block(&mut self) -> Result<Vec<Statement>, ParserError> {
		self.consume(LeftBrace)?;
		let mut statements = Vec::new();
		while !self.check(&RightBrace) {
			if self.is_at_end() {
				return Err(self.unexpected());
			}
			statements.push(self.statement()?);
		}
		self.consume(RightBrace)?;
		Ok(statements)
	}

	/// Expressions that may stand on their own: assignments, increments and
	/// plain chains.
	fn statement_expression(&mut self) -> Result<Expression, ParserError> {
		match &self.peek().r#type {
			Identifier(name) if self.symbols.procedure(name).is_none() => {
				let start = self.current;
				let place = self.place()?;
				let token = self.peek().clone();
				if token.r#type.is_assignment() {
					self.check_assignable(start, &place)?;
					self.advance();
					let operator = ArithmeticOperator::from_assignment(&token.r#type);
					self.assignment(place, operator, token.line)
				} else {
					// Resolving a place has no side effects, reparse it as a chain.
					self.current = start;
					self.chain()
				}
			}
			_ => self.chain(),
		}
	}

	/// The right-hand side of an assignment, kept as steps. `a += 2 * 3` is
	/// `((a + 2) * 3)` and the target is updated after every step.
	fn assignment(
		&mut self,
		target: Place,
		operator: Option<ArithmeticOperator>,
		line: usize,
	) -> Result<Expression, ParserError> {
		let mut steps = vec![Step { operator, operand: self.operand()?, line }];
		while let Some(operator) = ArithmeticOperator::from_token(&self.peek().r#type) {
			let line = self.advance().line;
			steps.push(Step { operator: Some(operator), operand: self.operand()?, line });
		}
		Ok(Expression::Assign { target, steps })
	}

	fn condition(&mut self) -> Result<Condition, ParserError> {
		let first = self.term()?;
		let mut rest = Vec::new();
		loop {
			let operator = match self.peek().r#type {
				AndAnd => LogicalOperator::And,
				OrOr => LogicalOperator::Or,
				_ => break,
			};
			self.advance();
			rest.push((operator, self.term()?));
		}
		Ok(Condition { first, rest })
	}

	fn term(&mut self) -> Result<Term, ParserError> {
		let line = self.peek().line;
		let mut negated = false;
		while self.match_token(&Bang) {
			negated = !negated;
		}
		let left = self.chain()?;
		let comparison = match ComparisonOperator::from_token(&self.peek().r#type) {
			Some(operator) => {
				self.advance();
				Some((operator, self.chain()?))
			}
			None => None,
		};
		Ok(Term { negated, left, comparison, line })
	}

	fn chain(&mut self) -> Result<Expression, ParserError> {
		let first = self.operand()?;
		self.chain_from(first)
	}

	fn chain_from(&mut self, mut expression: Expression) -> Result<Expression, ParserError> {
		while let Some(operator) = ArithmeticOperator::from_token(&self.peek().r#type) {
			let line = self.advance().line;
			let right = self.operand()?;
			expression = Expression::binary(expression, operator, right, line);
		}
		Ok(expression)
	}

	fn operand(&mut self) -> Result<Expression, ParserError> {
		let token = self.peek();
		Ok(match &token.r#type {
			Integer(n) => {
				let n = *n;
				self.advance();
				Expression::Literal(Value::Int(n))
			}
			Float(n) => {
				let n = *n;
				self.advance();
				Expression::Literal(Value::Float(n))
			}
			StringLiteral(s) => {
				let s = s.clone();
				self.advance();
				Expression::Literal(Value::Str(s))
			}
			True | False => Expression::Literal(Value::Int(matches!(self.advance().r#type, True) as i64)),
			Minus => {
				let line = self.advance().line;
				Expression::Negate { operand: Box::new(self.operand()?), line }
			}
			LeftParen => {
				self.advance();
				let expression = self.chain()?;
				self.consume(RightParen)?;
				Expression::Grouping(Box::new(expression))
			}
			PlusPlus | MinusMinus => {
				let token = self.advance();
				let target = self.assignable()?;
				Expression::Increment { target, delta: increment_delta(&token.r#type), prefix: true, line: token.line }
			}
			Identifier(name) => match self.symbols.procedure(name) {
				Some(procedure) => self.call(procedure)?,
				None => self.place_operand()?,
			},
			_ => return Err(self.unexpected()),
		})
	}

	/// A place read as a value, or updated by a trailing `++`/`--`.
	fn place_operand(&mut self) -> Result<Expression, ParserError> {
		let start = self.current;
		let place = self.place()?;
		let token = self.peek().clone();
		if !matches!(token.r#type, PlusPlus | MinusMinus) {
			return Ok(Expression::Variable(place));
		}
		self.check_assignable(start, &place)?;
		self.advance();
		Ok(Expression::Increment { target: place, delta: increment_delta(&token.r#type), prefix: false, line: token.line })
	}

	/// Bind call-site arguments positionally. Empty and omitted positions take
	/// the parameter's default.
	fn call(&mut self, procedure: usize) -> Result<Expression, ParserError> {
		let token = self.advance();
		let mut supplied: Vec<Option<Expression>> = Vec::new();
		if self.match_token(&LeftParen) {
			if !self.check(&RightParen) {
				loop {
					if self.check(&Comma) || self.check(&RightParen) {
						supplied.push(None);
					} else {
						supplied.push(Some(self.chain()?));
					}
					if !self.match_token(&Comma) {
						break;
					}
				}
			}
			self.consume(RightParen)?;
		}

		let Some(prototype) = self.symbols.prototype(procedure) else {
			return Err(anyhow::anyhow!("unknown procedure ordinal {procedure}").into());
		};
		let expected = prototype.parameters.len();
		if supplied.len() > expected {
			let r#type = ParseErrorType::ArityMismatch { expected, found: supplied.len() };
			return Err(ParseError::new(token.line, token.lexeme, r#type).into());
		}
		supplied.resize_with(expected, || None);

		let mut arguments = Vec::with_capacity(expected);
		for (argument, parameter) in supplied.into_iter().zip(&prototype.parameters) {
			match (argument, &parameter.default) {
				(Some(argument), _) => arguments.push(argument),
				(None, Some(default)) => arguments.push(Expression::Literal(default.clone())),
				(None, None) => {
					let r#type = ParseErrorType::MissingArgument(parameter.name.clone());
					return Err(ParseError::new(token.line, token.lexeme, r#type).into());
				}
			}
		}
		Ok(Expression::Call { procedure, name: token.lexeme, arguments, line: token.line })
	}

	/// `a` or `a.b.c`, resolved against the current scope and, for dotted
	/// paths, the class definitions.
	fn place(&mut self) -> Result<Place, ParserError> {
		let token = self.consume_identifier()?;
		let slot = self
			.symbols
			.resolve(self.scope, &token.lexeme)
			.ok_or_else(|| ParseError::new(token.line, token.lexeme.as_str(), ParseErrorType::Undeclared))?;
		let Some((r#type, _)) = self.symbols.slot_type(self.scope, slot) else {
			return Err(anyhow::anyhow!("slot {slot:?} of '{}' has no type", token.lexeme).into());
		};

		let mut segments = Vec::new();
		while self.match_token(&Dot) {
			segments.push(self.consume_identifier()?.lexeme);
		}
		if segments.is_empty() {
			return Ok(Place { name: token.lexeme, slot, field: None, r#type });
		}

		let field = segments.join(".");
		let name = format!("{}.{field}", token.lexeme);
		let field_type = match r#type {
			VarType::Class(class) => self.symbols.field_type(class, segments.iter().map(String::as_str)),
			VarType::Primitive(_) => None,
		};
		match field_type {
			Some(r#type) => Ok(Place { name, slot, field: Some(field), r#type }),
			None => Err(ParseError::new(token.line, name, ParseErrorType::UnknownField).into()),
		}
	}

	fn assignable(&mut self) -> Result<Place, ParserError> {
		let start = self.current;
		let place = self.place()?;
		self.check_assignable(start, &place)?;
		Ok(place)
	}

	/// Writes need a primitive cell that is not a `#define` constant.
	fn check_assignable(&self, start: usize, place: &Place) -> Result<(), ParserError> {
		let constant = self.symbols.slot_type(self.scope, place.slot).is_some_and(|(_, constant)| constant);
		let line = self.tokens.get(start).map_or(0, |t| t.line);
		if constant {
			return Err(ParseError::new(line, place.name.as_str(), ParseErrorType::AssignToConstant).into());
		}
		if matches!(place.r#type, VarType::Class(_)) {
			return Err(ParseError::new(line, place.name.as_str(), ParseErrorType::UnknownField).into());
		}
		Ok(())
	}

	/// Default values are literals, optionally negated.
	fn literal(&mut self) -> Result<Value, ParserError> {
		let negative = self.match_token(&Minus);
		let token = self.advance();
		let value = match token.r#type {
			Integer(n) => Value::Int(n),
			Float(n) => Value::Float(n),
			StringLiteral(s) if !negative => Value::Str(s),
			True if !negative => Value::Int(1),
			False if !negative => Value::Int(0),
			Eof => return Err(ParseError::new(token.line, "", ParseErrorType::UnexpectedEof).into()),
			_ => return Err(ParseError::new(token.line, token.lexeme, ParseErrorType::UnexpectedToken).into()),
		};
		Ok(match (negative, value) {
			(true, Value::Int(n)) => Value::Int(n.wrapping_neg()),
			(true, Value::Float(n)) => Value::Float(-n),
			(_, value) => value,
		})
	}

	fn consume(&mut self, expected: TokenType) -> Result<Token, ParserError> {
		if self.check(&expected) { Ok(self.advance()) } else { Err(self.unexpected()) }
	}

	fn consume_identifier(&mut self) -> Result<Token, ParserError> {
		if matches!(self.peek().r#type, Identifier(_)) { Ok(self.advance()) } else { Err(self.unexpected()) }
	}

	fn match_token(&mut self, expected: &TokenType) -> bool {
		let matched = self.check(expected);
		if matched {
			self.advance();
		}
		matched
	}

	/// Only meaningful for token types without payload.
	fn check(&self, expected: &TokenType) -> bool { &self.peek().r#type == expected }

	/// Advance to the next token, staying on `Eof`.
	fn advance(&mut self) -> Token {
		let token = self.peek().clone();
		if !self.is_at_end() {
			self.current += 1;
		}
		token
	}

	fn peek(&self) -> &Token { self.peek_at(0) }

	/// The token stream always ends with `Eof`, lookahead past it returns `Eof`.
	fn peek_at(&self, distance: usize) -> &Token {
		let last = self.tokens.len().saturating_sub(1);
		&self.tokens[(self.current + distance).min(last)]
	}

	fn is_at_end(&self) -> bool { matches!(self.peek().r#type, Eof) }

	fn unexpected(&self) -> ParserError { self.error_at(self.current, ParseErrorType::UnexpectedToken) }

	fn error_at(&self, index: usize, r#type: ParseErrorType) -> ParserError {
		let last = self.tokens.len().saturating_sub(1);
		let token = &self.tokens[index.min(last)];
		match token.r#type {
			Eof => ParseError::new(token.line, "", ParseErrorType::UnexpectedEof).into(),
			_ => ParseError::new(token.line, token.lexeme.as_str(), r#type).into(),
		}
	}
}

fn increment_delta(r#type: &TokenType) -> i64 { if matches!(r#type, PlusPlus) { 1 } else { -1 } }

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::{scanner::Scanner, symbols::Slot};

	fn parse(input: &str) -> Result<Vec<Statement>, ParserError> {
		let mut symbols = SymbolTables::new();
		let tokens = Scanner::new(input).scan_tokens().unwrap();
		Parser::new(tokens, &mut symbols).parse()
	}

	fn parse_error(input: &str) -> ParseError {
		match parse(input) {
			Err(ParserError::ParseError(error)) => error,
			other => panic!("expected a parse error, got {other:?}"),
		}
	}

	/// Display of the last statement, which must be an expression statement.
	fn last_expression(input: &str) -> String {
		let statements = parse(input).unwrap();
		match statements.last() {
			Some(Statement::Expression(expression)) => expression.to_string(),
			other => panic!("expected an expression statement, got {other:?}"),
		}
	}

	#[test]
	fn chains_left_to_right_without_precedence() {
		assert_eq!(last_expression("I32 a, b; a = a + b * 2;"), "(* (+ (= a a) b) 2)");
		assert_eq!(last_expression("I32 a; a = 1 + (2 * 3);"), "(+ (= a 1) (group (* 2 3)))");
		assert_eq!(last_expression("I32 a; a -= -1;"), "(-= a (- 1))");
		assert_eq!(last_expression("I32 a; a += 2 * 3;"), "(* (+= a 2) 3)");
		assert_eq!(last_expression("I32 a; a + 1;"), "(+ a 1)");
	}

	#[test]
	fn increments() {
		assert_eq!(last_expression("I32 i; i++;"), "(i ++)");
		assert_eq!(last_expression("I32 i; --i;"), "(-- i)");
		assert_eq!(last_expression("I32 i, j; j = i++ + 1;"), "(+ (= j (i ++)) 1)");
	}

	#[test]
	fn declarations_resolve_to_slots() {
		let statements = parse("I32 a = 1, b; F64 c;").unwrap();
		assert_eq!(statements.len(), 2);
		let Statement::VarDeclaration { declarators } = &statements[0] else { panic!("not a declaration") };
		assert_eq!(declarators.len(), 2);
		assert_eq!(declarators[0].target.slot, Slot::Global(0));
		assert!(declarators[0].initializer.is_some());
		assert_eq!(declarators[1].target.slot, Slot::Global(1));
		assert!(declarators[1].initializer.is_none());
	}

	#[test]
	fn rejects_use_before_declaration() {
		let error = parse_error("x = 1;");
		assert_eq!(error.kind(), &ParseErrorType::Undeclared);
		assert_eq!(error.text(), "x");

		let error = parse_error("f();\nU0 f() {}");
		assert_eq!(error.kind(), &ParseErrorType::Undeclared);
		assert_eq!(error.line(), 1);
	}

	#[test]
	fn rejects_redeclaration() {
		let error = parse_error("I32 x;\nI32 x;");
		assert_eq!(error.kind(), &ParseErrorType::Redeclared);
		assert_eq!(error.line(), 2);
		assert_eq!(parse_error("U0 f() {} I32 f;").kind(), &ParseErrorType::Redeclared);
		assert_eq!(parse_error("U0 f(I32 a, I32 a) {}").kind(), &ParseErrorType::Redeclared);
	}

	#[test]
	fn self_referencing_initializer_is_allowed() {
		assert!(parse("I32 a = a + 1;").is_ok());
	}

	#[test]
	fn procedures_may_recurse() {
		let statements = parse("I32 f(I32 n) { if (n < 2) return n; return f(n - 1) + f(n - 2); }").unwrap();
		let Statement::ProcedureDefinition(procedure) = &statements[0] else { panic!("not a procedure") };
		assert_eq!(procedure.name, "f");
		assert_eq!(procedure.parameter_types, vec![DataType::I32]);
		assert_eq!(procedure.body.len(), 2);
	}

	#[test]
	fn locals_are_sized_per_procedure() {
		let statements = parse("U0 f() { I32 a; F64 b; }").unwrap();
		let Statement::ProcedureDefinition(procedure) = &statements[0] else { panic!("not a procedure") };
		assert_eq!(procedure.locals, vec![VarType::Primitive(DataType::I32), VarType::Primitive(DataType::F64)]);
	}

	#[test]
	fn fills_default_arguments() {
		assert_eq!(last_expression("U0 f(I32 a, I32 b = 2) {} f(1);"), "(call f 1 2)");
		assert_eq!(last_expression("U0 g(I32 a = 1, I32 b = 2) {} g(, 3);"), "(call g 1 3)");
		assert_eq!(last_expression("U0 h(I32 a = -4) {} h;"), "(call h -4)");
		assert_eq!(last_expression("U0 k(I32 a, I32 b) {} I32 x; x = k(1, 2) + 3;"), "(+ (= x (call k 1 2)) 3)");
	}

	#[test]
	fn rejects_bad_arity() {
		assert_eq!(parse_error("U0 f(I32 a) {} f(1, 2);").kind(), &ParseErrorType::ArityMismatch { expected: 1, found: 2 });
		assert_eq!(parse_error("U0 f(I32 a) {} f;").kind(), &ParseErrorType::MissingArgument("a".into()));
		assert_eq!(parse_error("U0 f(I32 a, I32 b = 1) {} f(, 2);").kind(), &ParseErrorType::MissingArgument("a".into()));
	}

	#[test]
	fn resolves_field_paths() {
		assert_eq!(last_expression("class Pt { I32 x, y; } p; p.x = 5;"), "(= p.x 5)");
		assert_eq!(
			last_expression("class Pt { I32 x; }; class Seg { Pt a; Pt b; }; Seg s; s.b.x += 1;"),
			"(+= s.b.x 1)"
		);
		assert_eq!(parse_error("class Pt { I32 x; } p; p.z = 1;").kind(), &ParseErrorType::UnknownField);
		assert_eq!(parse_error("I32 a; a.x = 1;").kind(), &ParseErrorType::UnknownField);
		assert_eq!(parse_error("class Pt { I32 x; } p; p = 1;").kind(), &ParseErrorType::UnknownField);
	}

	#[test]
	fn conditions_keep_terms_flat() {
		let statements = parse("I32 a, b; if (a < 1 && !b || a != 2) a = 1; else a = 2;").unwrap();
		let Statement::If { condition, then_branch, else_branch } = &statements[1] else { panic!("not an if") };
		assert_eq!(condition.to_string(), "(< a 1) && (! b) || (!= a 2)");
		assert_eq!(then_branch.len(), 1);
		assert_eq!(else_branch.as_ref().map(Vec::len), Some(1));
	}

	#[test]
	fn for_clauses_are_optional() {
		let statements = parse("I32 i; for (i = 0; i < 3; i++) { i; } for (;;) {}").unwrap();
		let Statement::For { initializer, condition, step, body } = &statements[1] else { panic!("not a for") };
		assert_eq!(initializer.as_ref().map(ToString::to_string), Some("(= i 0)".into()));
		assert_eq!(condition.as_ref().map(ToString::to_string), Some("(< i 3)".into()));
		assert_eq!(step.as_ref().map(ToString::to_string), Some("(i ++)".into()));
		assert_eq!(body.len(), 1);
		assert!(matches!(&statements[2], Statement::For { initializer: None, condition: None, step: None, .. }));
	}

	#[test]
	fn prints_take_arguments() {
		let statements = parse("I32 a; \"%d %d\\n\", a, a + 1;").unwrap();
		let Statement::Print { format, arguments, line } = &statements[1] else { panic!("not a print") };
		assert_eq!(format, "%d %d\\n");
		assert_eq!(arguments.len(), 2);
		assert_eq!(*line, 1);
	}

	#[test]
	fn defines_are_constant() {
		assert!(parse("#define N 10\nI32 a = N;").is_ok());
		let error = parse_error("#define N 10\nN = 3;");
		assert_eq!(error.kind(), &ParseErrorType::AssignToConstant);
		assert_eq!(error.line(), 2);
		assert_eq!(parse_error("#define N 1\nN++;").kind(), &ParseErrorType::AssignToConstant);
	}

	#[test]
	fn placement_rules() {
		assert_eq!(parse_error("return 1;").kind(), &ParseErrorType::ReturnOutsideProcedure);
		assert_eq!(parse_error("U0 f() { U0 g() {} }").kind(), &ParseErrorType::NestedProcedure);
		assert!(parse("U0 f() { return; }").is_ok());
	}

	#[test]
	fn reports_unexpected_tokens() {
		let error = parse_error("I32 a;\na = );");
		assert_eq!(error.kind(), &ParseErrorType::UnexpectedToken);
		assert_eq!(error.text(), ")");
		assert_eq!(error.line(), 2);
		assert_eq!(error.to_string(), "Parser failure: ')' unexpected token in line 2");

		assert_eq!(parse_error("I32 a = ").kind(), &ParseErrorType::UnexpectedEof);
		assert_eq!(parse_error("if (1) {").kind(), &ParseErrorType::UnexpectedEof);
	}

	#[test]
	fn foreign_code_is_a_statement() {
		let statements = parse("js { console.log(1); };").unwrap();
		assert!(matches!(&statements[0], Statement::ForeignCode { code, line: 1 } if code.contains("console.log(1);")));
	}
}
