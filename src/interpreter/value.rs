use std::fmt::Display;

use Value::*;

use crate::{parser::expression::{ArithmeticOperator, ComparisonOperator}, scanner::DataType, symbols::VarType};

/// Value represents the content of one storage cell.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Value {
	Int(i64),
	Float(f64),
	Str(String),
	/// Class instance: field cells addressed by dotted path, filled on demand.
	Instance(Vec<FieldCell>),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct FieldCell {
	pub path:  String,
	pub value: Value,
}

impl Default for Value {
	fn default() -> Self { Int(0) }
}

impl Display for Value {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Int(n) => write!(f, "{n}"),
			Float(n) => write!(f, "{n}"),
			Str(s) => write!(f, "{s}"),
			Instance(fields) => write!(f, "<instance of {} fields>", fields.len()),
		}
	}
}

impl Value {
	/// The value a freshly declared cell of `r#type` holds.
	pub fn zero(r#type: VarType) -> Self {
		match r#type {
			VarType::Primitive(DataType::F64) => Float(0.0),
			VarType::Primitive(_) => Int(0),
			VarType::Class(_) => Instance(Vec::new()),
		}
	}

	/// Determines if the value is considered "true" in a boolean context.
	pub fn to_bool(&self) -> bool {
		match self {
			Int(n) => *n != 0,
			Float(n) => *n != 0.0,
			Str(s) => !s.is_empty(),
			Instance(_) => true,
		}
	}

	pub fn as_int(&self) -> Option<i64> {
		match self {
			Int(n) => Some(*n),
			Float(n) => Some(*n as i64),
			_ => None,
		}
	}

	pub fn as_float(&self) -> Option<f64> {
		match self {
			Int(n) => Some(*n as f64),
			Float(n) => Some(*n),
			_ => None,
		}
	}

	pub fn is_zero(&self) -> bool { matches!(self, Int(0)) || matches!(self, Float(n) if *n == 0.0) }

	/// Convert a value for storage in a cell of the given type. Integer types
	/// wrap to their width, `U64` shares the `I64` bit pattern.
	pub fn coerce(self, r#type: DataType) -> Self {
		use DataType::*;

		let Some(n) = self.as_int() else { return self };
		match r#type {
			F64 => Float(self.as_float().unwrap_or_default()),
			Bool => Int(self.to_bool() as i64),
			I0 | U0 => Int(0),
			I8 => Int(n as i8 as i64),
			U8 => Int(n as u8 as i64),
			I16 => Int(n as i16 as i64),
			U16 => Int(n as u16 as i64),
			I32 => Int(n as i32 as i64),
			U32 => Int(n as u32 as i64),
			I64 | U64 => Int(n),
		}
	}

	/// Performs an arithmetic operation, `None` when the operands don't support it.
	pub fn binary_op(&self, op: ArithmeticOperator, right: &Self) -> Option<Value> {
		match op {
			ArithmeticOperator::Add => self.plus(right),
			ArithmeticOperator::Subtract => self.minus(right),
			ArithmeticOperator::Multiply => self.star(right),
			ArithmeticOperator::Divide => self.slash(right),
		}
	}

	/// Tries to add two values together.
	pub fn plus(&self, other: &Self) -> Option<Value> {
		match (self, other) {
			(Int(l), Int(r)) => Some(Int(l.wrapping_add(*r))),
			(Str(l), Str(r)) => Some(Str(format!("{l}{r}"))),
			_ => Some(Float(self.as_float()? + other.as_float()?)),
		}
	}

	/// Tries to subtract two values.
	pub fn minus(&self, other: &Self) -> Option<Value> {
		match (self, other) {
			(Int(l), Int(r)) => Some(Int(l.wrapping_sub(*r))),
			_ => Some(Float(self.as_float()? - other.as_float()?)),
		}
	}

	/// Tries to multiply two values together.
	pub fn star(&self, other: &Self) -> Option<Value> {
		match (self, other) {
			(Int(l), Int(r)) => Some(Int(l.wrapping_mul(*r))),
			_ => Some(Float(self.as_float()? * other.as_float()?)),
		}
	}

	/// Tries to divide two values. Callers reject a zero divisor first.
	pub fn slash(&self, other: &Self) -> Option<Value> {
		match (self, other) {
			(Int(_), Int(0)) => None,
			(Int(l), Int(r)) => Some(Int(l.wrapping_div(*r))),
			_ => Some(Float(self.as_float()? / other.as_float()?)),
		}
	}

	/// Compares numbers numerically and strings lexically.
	pub fn compare(&self, op: ComparisonOperator, other: &Self) -> Option<bool> {
		use std::cmp::Ordering;

		let ordering = match (self, other) {
			(Int(l), Int(r)) => l.cmp(r),
			(Str(l), Str(r)) => l.cmp(r),
			_ => self.as_float()?.partial_cmp(&other.as_float()?)?,
		};
		Some(match op {
			ComparisonOperator::Less => ordering == Ordering::Less,
			ComparisonOperator::LessEqual => ordering != Ordering::Greater,
			ComparisonOperator::Greater => ordering == Ordering::Greater,
			ComparisonOperator::GreaterEqual => ordering != Ordering::Less,
			ComparisonOperator::Equal => ordering == Ordering::Equal,
			ComparisonOperator::NotEqual => ordering != Ordering::Equal,
		})
	}

	/// Find the field cell at `path`, appending it with `zero` on first use.
	pub fn field(&mut self, path: &str, zero: impl FnOnce() -> Value) -> Option<&mut Value> {
		let Instance(fields) = self else { return None };
		let index = match fields.iter().position(|cell| cell.path == path) {
			Some(index) => index,
			None => {
				fields.push(FieldCell { path: path.to_string(), value: zero() });
				fields.len() - 1
			}
		};
		Some(&mut fields[index].value)
	}
}
