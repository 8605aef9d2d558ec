//! Statements are never expressions: the body of a `for` or `if` is always a
//! list of statements, and conditions live in their own [`Condition`] node
//! instead of the arithmetic chain grammar.

use std::rc::Rc;

use crate::{parser::expression::{Condition, Expression, Place}, scanner::DataType, symbols::VarType};

/// A statement in the programming language.
#[derive(Debug)]
pub(crate) enum Statement {
	/// An expression used as a statement, its value is discarded.
	Expression(Expression),
	/// `TYPE a [= e], b [= e];`, also emitted for `#define`.
	VarDeclaration { declarators: Vec<Declarator> },
	/// Installs the procedure body under its ordinal when executed.
	ProcedureDefinition(Rc<Procedure>),
	/// A class definition, with the instances declared right after its body.
	ClassDefinition { class: usize, instances: Vec<Declarator> },
	/// `"format", args...;`
	Print { format: String, arguments: Vec<Expression>, line: usize },
	For {
		initializer: Option<Expression>,
		condition:   Option<Condition>,
		step:        Option<Expression>,
		body:        Vec<Statement>,
	},
	If {
		condition:   Condition,
		then_branch: Vec<Statement>,
		else_branch: Option<Vec<Statement>>,
	},
	Return { value: Option<Expression>, line: usize },
	/// Raw `js { ... };` body, handed to the host.
	ForeignCode { code: String, line: usize },
}

/// One declared name with its optional initializer, an assignment into
/// `target`.
#[derive(Debug)]
pub(crate) struct Declarator {
	pub target:      Place,
	pub initializer: Option<Expression>,
}

/// Everything needed to call a procedure: parameter types for coercion, the
/// storage types of its locals to size a frame, and the body.
#[derive(Debug)]
pub(crate) struct Procedure {
	pub ordinal:         usize,
	pub name:            String,
	pub return_type:     DataType,
	pub parameter_types: Vec<DataType>,
	pub locals:          Vec<VarType>,
	pub body:            Vec<Statement>,
}
