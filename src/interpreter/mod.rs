//! HolyC tree-walking evaluator.
//!
//! The interpreter walks the statements produced by the parser. Names are
//! already resolved to [`Slot`]s, so evaluation only indexes into the value
//! store: globals, plus one frame of arguments and locals per active call.
//!
//! `return` travels up through [`Flow`], never through an error.

mod format;
pub(crate) mod value;

use std::rc::Rc;

use anyhow::anyhow;
use tracing::{debug, trace};
use value::Value;

use crate::{error::interpreter::InterpreterError, host::ForeignExecutor, parser::expression::{ArithmeticOperator, Condition, Expression, LogicalOperator, Place, Term}, statement::{Declarator, Procedure, Statement}, symbols::{Slot, VarType}, utils::unescape};

/// How a statement finished.
#[derive(Debug, PartialEq)]
pub(crate) enum Flow {
	Normal,
	Return(Value),
}

#[derive(Debug)]
struct Frame {
	arguments: Vec<Value>,
	locals:    Vec<Value>,
}

/// Runtime value store plus the installed procedure bodies.
#[derive(Default)]
pub(crate) struct Interpreter {
	globals:    Vec<Value>,
	procedures: Vec<Option<Rc<Procedure>>>,
	frames:     Vec<Frame>,
	output:     String,
	executor:   Option<Box<dyn ForeignExecutor>>,
}

impl Interpreter {
	pub fn new() -> Self { Self::default() }

	pub fn set_executor(&mut self, executor: Box<dyn ForeignExecutor>) { self.executor = Some(executor); }

	/// Forget all values and procedures, keep the host executor.
	pub fn reset(&mut self) {
		self.globals.clear();
		self.procedures.clear();
		self.frames.clear();
		self.output.clear();
	}

	/// Make room for globals declared since the last run, zeroed by type.
	pub fn allocate_globals(&mut self, types: impl Iterator<Item = VarType>) {
		for r#type in types.skip(self.globals.len()) {
			self.globals.push(Value::zero(r#type));
		}
	}

	/// Execute top-level statements and hand back the produced output.
	///
	/// Procedure bodies are installed up front, the parser already guarantees
	/// no call precedes its definition in the source.
	pub fn interpret(&mut self, statements: &[Statement]) -> Result<String, InterpreterError> {
		for statement in statements {
			if let Statement::ProcedureDefinition(procedure) = statement {
				self.install(procedure);
			}
		}

		let result = self.execute_block(statements);
		self.frames.clear();
		let output = std::mem::take(&mut self.output);
		result?;
		debug!(bytes = output.len(), "interpreted program");
		Ok(output)
	}

	fn install(&mut self, procedure: &Rc<Procedure>) {
		if self.procedures.len() <= procedure.ordinal {
			self.procedures.resize(procedure.ordinal + 1, None);
		}
		self.procedures[procedure.ordinal] = Some(Rc::clone(procedure));
	}

	fn execute_block(&mut self, statements: &[Statement]) -> Result<Flow, InterpreterError> {
		for statement in statements {
			if let Flow::Return(value) = self.execute(statement)? {
				return Ok(Flow::Return(value));
			}
		}
		Ok(Flow::Normal)
	}

	fn execute(&mut self, statement: &Statement) -> Result<Flow, InterpreterError> {
		match statement {
			Statement::Expression(expression) => {
				self.evaluate(expression)?;
			}
			Statement::VarDeclaration { declarators } => self.declare(declarators)?,
			Statement::ClassDefinition { class, instances } => {
				trace!(class, instances = instances.len(), "declaring class instances");
				self.declare(instances)?
			}
			Statement::ProcedureDefinition(procedure) => self.install(procedure),
			Statement::Print { format, arguments, .. } => {
				let mut values = Vec::with_capacity(arguments.len());
				for argument in arguments {
					values.push(self.evaluate(argument)?);
				}
				self.output.push_str(&unescape(&format::format(format, &values)));
			}
			Statement::For { initializer, condition, step, body } => {
				if let Some(initializer) = initializer {
					self.evaluate(initializer)?;
				}
				loop {
					if let Some(condition) = condition {
						if !self.test(condition)? {
							break;
						}
					}
					if let Flow::Return(value) = self.execute_block(body)? {
						return Ok(Flow::Return(value));
					}
					if let Some(step) = step {
						self.evaluate(step)?;
					}
				}
			}
			Statement::If { condition, then_branch, else_branch } => {
				if self.test(condition)? {
					return self.execute_block(then_branch);
				} else if let Some(else_branch) = else_branch {
					return self.execute_block(else_branch);
				}
			}
			Statement::Return { value, .. } => {
				let value = match value {
					Some(expression) => self.evaluate(expression)?,
					None => Value::default(),
				};
				return Ok(Flow::Return(value));
			}
			Statement::ForeignCode { code, line } => {
				let executor = self.executor.as_mut().ok_or(InterpreterError::NoForeignExecutor(*line))?;
				trace!(line, bytes = code.len(), "handing off foreign code");
				executor.execute(code).map_err(|source| InterpreterError::ForeignCode { line: *line, source })?;
			}
		}
		Ok(Flow::Normal)
	}

	/// Declarations reset their cell, so a loop body starts each pass fresh.
	fn declare(&mut self, declarators: &[Declarator]) -> Result<(), InterpreterError> {
		for declarator in declarators {
			self.write(&declarator.target, Value::zero(declarator.target.r#type))?;
			if let Some(initializer) = &declarator.initializer {
				self.evaluate(initializer)?;
			}
		}
		Ok(())
	}

	/// Split the flat term list at `||`, each segment is an `&&` conjunction.
	/// Both operators short-circuit.
	fn test(&mut self, condition: &Condition) -> Result<bool, InterpreterError> {
		let mut segment = self.term(&condition.first)?;
		for (operator, term) in &condition.rest {
			match operator {
				LogicalOperator::Or if segment => return Ok(true),
				LogicalOperator::Or => segment = self.term(term)?,
				LogicalOperator::And if segment => segment = self.term(term)?,
				LogicalOperator::And => {}
			}
		}
		Ok(segment)
	}

	fn term(&mut self, term: &Term) -> Result<bool, InterpreterError> {
		let left = self.evaluate(&term.left)?;
		let value = match &term.comparison {
			None => left.to_bool(),
			Some((operator, right)) => {
				let right = self.evaluate(right)?;
				left.compare(*operator, &right).ok_or_else(|| InterpreterError::BinaryOperationError {
					line:      term.line,
					operation: format!("{left} {operator} {right}"),
				})?
			}
		};
		Ok(value != term.negated)
	}

	/// Evaluate the given expression and return its value.
	fn evaluate(&mut self, expression: &Expression) -> Result<Value, InterpreterError> {
		Ok(match expression {
			Expression::Literal(value) => value.clone(),
			Expression::Variable(place) => self.place(place)?.clone(),
			Expression::Grouping(inner) => self.evaluate(inner)?,
			Expression::Negate { operand, line } => match self.evaluate(operand)? {
				Value::Int(n) => Value::Int(n.wrapping_neg()),
				Value::Float(n) => Value::Float(-n),
				other => {
					return Err(InterpreterError::BinaryOperationError { line: *line, operation: format!("-{other}") });
				}
			},
			Expression::Binary { left, operator, right, line } => {
				let left = self.evaluate(left)?;
				let right = self.evaluate(right)?;
				arithmetic(&left, *operator, &right, *line)?
			}
			// Operands are read after the previous step was stored, so `a = 1 + a`
			// sees the freshly assigned 1.
			Expression::Assign { target, steps } => {
				let mut value = self.place(target)?.clone();
				for step in steps {
					let operand = self.evaluate(&step.operand)?;
					value = match step.operator {
						None => operand,
						Some(operator) => arithmetic(&value, operator, &operand, step.line)?,
					};
					value = self.write(target, value)?;
				}
				value
			}
			Expression::Increment { target, delta, prefix, line } => {
				let current = self.place(target)?.clone();
				let updated = arithmetic(&current, ArithmeticOperator::Add, &Value::Int(*delta), *line)?;
				let updated = self.write(target, updated)?;
				if *prefix { updated } else { current }
			}
			Expression::Call { procedure, name, arguments, line } => self.call(*procedure, name, arguments, *line)?,
		})
	}

	fn call(
		&mut self,
		procedure: usize,
		name: &str,
		arguments: &[Expression],
		line: usize,
	) -> Result<Value, InterpreterError> {
		let Some(Some(callee)) = self.procedures.get(procedure).cloned() else {
			return Err(anyhow!("procedure '{name}' called in line {line} has no body").into());
		};

		// Arguments are evaluated in the caller's frame.
		let mut values = Vec::with_capacity(arguments.len());
		for (argument, r#type) in arguments.iter().zip(&callee.parameter_types) {
			values.push(self.evaluate(argument)?.coerce(*r#type));
		}
		let locals = callee.locals.iter().map(|r#type| Value::zero(*r#type)).collect();

		trace!(name, depth = self.frames.len() + 1, "call");
		self.frames.push(Frame { arguments: values, locals });
		let flow = self.execute_block(&callee.body);
		self.frames.pop();

		Ok(match flow? {
			Flow::Return(value) => value.coerce(callee.return_type),
			Flow::Normal => Value::zero(VarType::Primitive(callee.return_type)),
		})
	}

	/// The storage cell a place addresses. Field cells are created on first use.
	fn place(&mut self, place: &Place) -> Result<&mut Value, InterpreterError> {
		let cell = match place.slot {
			Slot::Global(index) => self.globals.get_mut(index),
			Slot::Argument(index) => self.frames.last_mut().and_then(|frame| frame.arguments.get_mut(index)),
			Slot::Local(index) => self.frames.last_mut().and_then(|frame| frame.locals.get_mut(index)),
		};
		let Some(cell) = cell else {
			return Err(anyhow!("'{}' resolved to {:?} which holds no value", place.name, place.slot).into());
		};
		match &place.field {
			None => Ok(cell),
			Some(path) => {
				let r#type = place.r#type;
				cell.field(path, || Value::zero(r#type))
					.ok_or_else(|| anyhow!("'{}' is not a class instance", place.name).into())
			}
		}
	}

	/// Store a value coerced to the place's type, and return what was stored.
	fn write(&mut self, place: &Place, value: Value) -> Result<Value, InterpreterError> {
		let value = match place.r#type {
			VarType::Primitive(data_type) => value.coerce(data_type),
			VarType::Class(_) => value,
		};
		*self.place(place)? = value.clone();
		Ok(value)
	}
}

fn arithmetic(left: &Value, operator: ArithmeticOperator, right: &Value, line: usize) -> Result<Value, InterpreterError> {
	if operator == ArithmeticOperator::Divide && right.is_zero() {
		return Err(InterpreterError::DivisionByZero(line));
	}
	left.binary_op(operator, right)
		.ok_or_else(|| InterpreterError::BinaryOperationError { line, operation: format!("{left} {operator} {right}") })
}
