//! Expression AST nodes
//!
//! Names are already resolved when a node is built: variables carry their
//! [`Slot`], calls carry the procedure ordinal and a full argument list with
//! defaults filled in.

use std::fmt::Display;

use crate::{interpreter::value::Value, scanner::TokenType, symbols::{Slot, VarType}};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ArithmeticOperator {
	Add,
	Subtract,
	Multiply,
	Divide,
}

impl ArithmeticOperator {
	/// Operators that may continue an arithmetic chain.
	pub fn from_token(r#type: &TokenType) -> Option<Self> {
		Some(match r#type {
			TokenType::Plus => Self::Add,
			TokenType::Minus => Self::Subtract,
			TokenType::Star => Self::Multiply,
			TokenType::Slash => Self::Divide,
			_ => return None,
		})
	}

	/// The operator folded into a compound assignment, `None` for plain `=`.
	pub fn from_assignment(r#type: &TokenType) -> Option<Self> {
		Some(match r#type {
			TokenType::PlusEqual => Self::Add,
			TokenType::MinusEqual => Self::Subtract,
			TokenType::StarEqual => Self::Multiply,
			TokenType::SlashEqual => Self::Divide,
			_ => return None,
		})
	}
}

impl Display for ArithmeticOperator {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let symbol = match self {
			Self::Add => "+",
			Self::Subtract => "-",
			Self::Multiply => "*",
			Self::Divide => "/",
		};
		write!(f, "{symbol}")
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ComparisonOperator {
	Less,
	LessEqual,
	Greater,
	GreaterEqual,
	Equal,
	NotEqual,
}

impl ComparisonOperator {
	pub fn from_token(r#type: &TokenType) -> Option<Self> {
		Some(match r#type {
			TokenType::Less => Self::Less,
			TokenType::LessEqual => Self::LessEqual,
			TokenType::Greater => Self::Greater,
			TokenType::GreaterEqual => Self::GreaterEqual,
			TokenType::EqualEqual => Self::Equal,
			TokenType::BangEqual => Self::NotEqual,
			_ => return None,
		})
	}
}

impl Display for ComparisonOperator {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let symbol = match self {
			Self::Less => "<",
			Self::LessEqual => "<=",
			Self::Greater => ">",
			Self::GreaterEqual => ">=",
			Self::Equal => "==",
			Self::NotEqual => "!=",
		};
		write!(f, "{symbol}")
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LogicalOperator {
	And,
	Or,
}

/// A resolved storage location. `a.b.c` collapses into one place whose
/// `field` is `b.c`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Place {
	/// Dotted source name
	pub name:   String,
	pub slot:   Slot,
	pub field:  Option<String>,
	/// Type of the addressed cell
	pub r#type: VarType,
}

/// Expression AST nodes
#[derive(Debug)]
pub(crate) enum Expression {
	Literal(Value),
	Variable(Place),
	Call { procedure: usize, name: String, arguments: Vec<Expression>, line: usize },
	Negate { operand: Box<Expression>, line: usize },
	Grouping(Box<Expression>),
	/// Chains are built left-leaning, there is no operator precedence.
	Binary { left: Box<Expression>, operator: ArithmeticOperator, right: Box<Expression>, line: usize },
	/// `target OP= operand (op operand)*`. Every step writes back into the
	/// target before the next operand is read.
	Assign { target: Place, steps: Vec<Step> },
	Increment { target: Place, delta: i64, prefix: bool, line: usize },
}

impl Expression {
	pub fn binary(left: Expression, operator: ArithmeticOperator, right: Expression, line: usize) -> Self {
		Expression::Binary { left: Box::new(left), operator, right: Box::new(right), line }
	}
}

/// One link of an assignment chain. The first step of a plain `=` has no
/// operator, a compound assignment starts with its arithmetic operator.
#[derive(Debug)]
pub(crate) struct Step {
	pub operator: Option<ArithmeticOperator>,
	pub operand:  Expression,
	pub line:     usize,
}

/// One operand of a condition: `[!]* chain [cmp chain]`.
#[derive(Debug)]
pub(crate) struct Term {
	pub negated:    bool,
	pub left:       Expression,
	pub comparison: Option<(ComparisonOperator, Expression)>,
	pub line:       usize,
}

/// Terms joined by `&&`/`||`, kept flat in source order.
#[derive(Debug)]
pub(crate) struct Condition {
	pub first: Term,
	pub rest:  Vec<(LogicalOperator, Term)>,
}

impl Display for Expression {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		use Expression::*;
		match self {
			Literal(Value::Str(s)) => write!(f, "\"{s}\""),
			Literal(value) => write!(f, "{value}"),
			Variable(place) => write!(f, "{}", place.name),
			Call { name, arguments, .. } => {
				write!(f, "(call {name}")?;
				for argument in arguments {
					write!(f, " {argument}")?;
				}
				write!(f, ")")
			}
			Negate { operand, .. } => write!(f, "(- {operand})"),
			Grouping(expression) => write!(f, "(group {expression})"),
			Binary { left, operator, right, .. } => write!(f, "({operator} {left} {right})"),
			Assign { target, steps } => {
				// Printed as the left-leaning chain it folds into: `(* (+= a 2) 3)`.
				let Some((first, rest)) = steps.split_first() else { return write!(f, "{}", target.name) };
				for step in rest.iter().rev() {
					match step.operator {
						Some(operator) => write!(f, "({operator} ")?,
						None => write!(f, "(= ")?,
					}
				}
				match first.operator {
					Some(operator) => write!(f, "({operator}= {} {})", target.name, first.operand)?,
					None => write!(f, "(= {} {})", target.name, first.operand)?,
				}
				for step in rest {
					write!(f, " {})", step.operand)?;
				}
				Ok(())
			}
			Increment { target, delta, prefix, .. } => {
				let symbol = if *delta > 0 { "++" } else { "--" };
				if *prefix { write!(f, "({symbol} {})", target.name) } else { write!(f, "({} {symbol})", target.name) }
			}
		}
	}
}

impl Display for Term {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		if self.negated {
			write!(f, "(! ")?;
		}
		match &self.comparison {
			Some((operator, right)) => write!(f, "({operator} {} {right})", self.left)?,
			None => write!(f, "{}", self.left)?,
		}
		if self.negated {
			write!(f, ")")?;
		}
		Ok(())
	}
}

impl Display for Condition {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.first)?;
		for (operator, term) in &self.rest {
			let symbol = match operator {
				LogicalOperator::And => "&&",
				LogicalOperator::Or => "||",
			};
			write!(f, " {symbol} {term}")?;
		}
		Ok(())
	}
}
