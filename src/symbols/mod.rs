//! Declaration tables filled in by the parser.
//!
//! The tables only record what a name *is*: its slot and storage type. Current
//! values live in the interpreter, indexed by the slots handed out here.

use crate::{interpreter::value::Value, scanner::DataType};

/// Storage type of a declared name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum VarType {
	Primitive(DataType),
	/// Instance of the class with this id.
	Class(usize),
}

#[derive(Debug, Clone)]
pub(crate) struct Variable {
	pub name:     String,
	pub r#type:   VarType,
	/// Declared through `#define`.
	pub constant: bool,
}

impl Variable {
	pub fn new(name: impl Into<String>, r#type: VarType) -> Self {
		Self { name: name.into(), r#type, constant: false }
	}
}

#[derive(Debug, Clone)]
pub(crate) struct Parameter {
	pub name:    String,
	pub r#type:  DataType,
	pub default: Option<Value>,
}

/// A procedure's signature plus its scoped table of locals.
#[derive(Debug, Clone)]
pub(crate) struct Prototype {
	pub name:        String,
	pub return_type: DataType,
	pub parameters:  Vec<Parameter>,
	pub locals:      Vec<Variable>,
}

#[derive(Debug, Clone)]
pub(crate) struct Field {
	pub name:   String,
	pub r#type: VarType,
}

#[derive(Debug, Clone)]
pub(crate) struct ClassType {
	pub name:   String,
	pub fields: Vec<Field>,
}

/// Where the parser is declaring and resolving names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Scope {
	Global,
	/// Inside the body of the procedure with this ordinal.
	Procedure(usize),
}

/// A resolved storage cell. Argument and local slots always refer to the
/// innermost call frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Slot {
	Global(usize),
	Argument(usize),
	Local(usize),
}

#[derive(Debug, Clone, Default)]
pub(crate) struct SymbolTables {
	globals:    Vec<Variable>,
	prototypes: Vec<Prototype>,
	classes:    Vec<ClassType>,
}

impl SymbolTables {
	pub fn new() -> Self { Self::default() }

	/// Globals, procedures and classes share one namespace.
	fn is_global_name(&self, name: &str) -> bool {
		self.globals.iter().any(|v| v.name == name) || self.procedure(name).is_some() || self.class(name).is_some()
	}

	/// Declare a variable, `None` when the name is already taken in `scope`.
	pub fn declare(&mut self, scope: Scope, variable: Variable) -> Option<Slot> {
		match scope {
			Scope::Global => {
				if self.is_global_name(&variable.name) {
					return None;
				}
				tracing::trace!(name = %variable.name, "declared global");
				self.globals.push(variable);
				Some(Slot::Global(self.globals.len() - 1))
			}
			Scope::Procedure(ordinal) => {
				if self.procedure(&variable.name).is_some() || self.class(&variable.name).is_some() {
					return None;
				}
				let prototype = self.prototypes.get_mut(ordinal)?;
				if prototype.parameters.iter().any(|p| p.name == variable.name)
					|| prototype.locals.iter().any(|v| v.name == variable.name)
				{
					return None;
				}
				tracing::trace!(name = %variable.name, procedure = %prototype.name, "declared local");
				prototype.locals.push(variable);
				Some(Slot::Local(prototype.locals.len() - 1))
			}
		}
	}

	/// Resolve a variable name: arguments first, then locals, then globals.
	pub fn resolve(&self, scope: Scope, name: &str) -> Option<Slot> {
		if let Some(prototype) = self.scope_prototype(scope) {
			if let Some(index) = prototype.parameters.iter().position(|p| p.name == name) {
				return Some(Slot::Argument(index));
			}
			if let Some(index) = prototype.locals.iter().position(|v| v.name == name) {
				return Some(Slot::Local(index));
			}
		}
		self.globals.iter().position(|v| v.name == name).map(Slot::Global)
	}

	/// Storage type and constness of a resolved slot.
	pub fn slot_type(&self, scope: Scope, slot: Slot) -> Option<(VarType, bool)> {
		match slot {
			Slot::Global(index) => self.globals.get(index).map(|v| (v.r#type, v.constant)),
			Slot::Local(index) => self.scope_prototype(scope)?.locals.get(index).map(|v| (v.r#type, v.constant)),
			Slot::Argument(index) => {
				self.scope_prototype(scope)?.parameters.get(index).map(|p| (VarType::Primitive(p.r#type), false))
			}
		}
	}

	/// Storage types of all globals, in slot order.
	pub fn global_types(&self) -> impl Iterator<Item = VarType> + '_ { self.globals.iter().map(|v| v.r#type) }

	fn scope_prototype(&self, scope: Scope) -> Option<&Prototype> {
		match scope {
			Scope::Procedure(ordinal) => self.prototypes.get(ordinal),
			Scope::Global => None,
		}
	}

	pub fn procedure(&self, name: &str) -> Option<usize> { self.prototypes.iter().position(|p| p.name == name) }

	pub fn prototype(&self, ordinal: usize) -> Option<&Prototype> { self.prototypes.get(ordinal) }

	/// Register a prototype and hand out its ordinal.
	pub fn declare_procedure(&mut self, prototype: Prototype) -> Option<usize> {
		if self.is_global_name(&prototype.name) {
			return None;
		}
		tracing::trace!(name = %prototype.name, parameters = prototype.parameters.len(), "declared procedure");
		self.prototypes.push(prototype);
		Some(self.prototypes.len() - 1)
	}

	pub fn class(&self, name: &str) -> Option<usize> { self.classes.iter().position(|c| c.name == name) }

	pub fn declare_class(&mut self, class: ClassType) -> Option<usize> {
		if self.is_global_name(&class.name) {
			return None;
		}
		tracing::trace!(name = %class.name, fields = class.fields.len(), "declared class");
		self.classes.push(class);
		Some(self.classes.len() - 1)
	}

	/// Follow a dotted field path through nested class definitions.
	pub fn field_type<'p>(&self, class: usize, path: impl IntoIterator<Item = &'p str>) -> Option<VarType> {
		let mut r#type = VarType::Class(class);
		for segment in path {
			let VarType::Class(class) = r#type else { return None };
			r#type = self.classes.get(class)?.fields.iter().find(|f| f.name == segment)?.r#type;
		}
		Some(r#type)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn int() -> VarType { VarType::Primitive(DataType::I32) }

	fn prototype(name: &str, parameters: &[&str]) -> Prototype {
		Prototype {
			name:        name.to_string(),
			return_type: DataType::U0,
			parameters:  parameters
				.iter()
				.map(|p| Parameter { name: p.to_string(), r#type: DataType::I32, default: None })
				.collect(),
			locals:      Vec::new(),
		}
	}

	#[test]
	fn rejects_global_redeclaration() {
		let mut tables = SymbolTables::new();
		assert_eq!(tables.declare(Scope::Global, Variable::new("x", int())), Some(Slot::Global(0)));
		assert_eq!(tables.declare(Scope::Global, Variable::new("x", int())), None);
		assert_eq!(tables.declare_procedure(prototype("x", &[])), None);
	}

	#[test]
	fn resolves_arguments_before_locals_before_globals() {
		let mut tables = SymbolTables::new();
		tables.declare(Scope::Global, Variable::new("a", int()));
		tables.declare(Scope::Global, Variable::new("g", int()));
		let ordinal = tables.declare_procedure(prototype("f", &["a"])).unwrap();
		let scope = Scope::Procedure(ordinal);
		assert_eq!(tables.declare(scope, Variable::new("l", int())), Some(Slot::Local(0)));

		assert_eq!(tables.resolve(scope, "a"), Some(Slot::Argument(0)));
		assert_eq!(tables.resolve(scope, "l"), Some(Slot::Local(0)));
		assert_eq!(tables.resolve(scope, "g"), Some(Slot::Global(1)));
		assert_eq!(tables.resolve(Scope::Global, "a"), Some(Slot::Global(0)));
		assert_eq!(tables.resolve(Scope::Global, "l"), None);
	}

	#[test]
	fn locals_may_shadow_globals_but_not_parameters() {
		let mut tables = SymbolTables::new();
		tables.declare(Scope::Global, Variable::new("x", int()));
		let ordinal = tables.declare_procedure(prototype("f", &["p"])).unwrap();
		let scope = Scope::Procedure(ordinal);
		assert_eq!(tables.declare(scope, Variable::new("x", int())), Some(Slot::Local(0)));
		assert_eq!(tables.declare(scope, Variable::new("p", int())), None);
		assert_eq!(tables.declare(scope, Variable::new("f", int())), None);
	}

	#[test]
	fn walks_nested_fields() {
		let mut tables = SymbolTables::new();
		let point = tables
			.declare_class(ClassType {
				name:   "Pt".into(),
				fields: vec![Field { name: "x".into(), r#type: int() }, Field { name: "y".into(), r#type: int() }],
			})
			.unwrap();
		let line = tables
			.declare_class(ClassType { name: "Line".into(), fields: vec![Field { name: "a".into(), r#type: VarType::Class(point) }] })
			.unwrap();
		assert_eq!(tables.field_type(line, ["a", "y"]), Some(int()));
		assert_eq!(tables.field_type(line, ["a"]), Some(VarType::Class(point)));
		assert_eq!(tables.field_type(line, ["a", "z"]), None);
		assert_eq!(tables.field_type(point, ["x", "y"]), None);
	}
}
