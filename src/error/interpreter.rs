#[derive(thiserror::Error, Debug)]
/// Errors that can occur during interpretation
pub enum InterpreterError {
	/// Parser and evaluator disagree, e.g. an unresolved slot
	#[error("CompilerInternalError: {0}")]
	InternalError(#[from] anyhow::Error),
	/// Integer division with a zero divisor
	#[error("Runtime failure: division by zero in line {0}")]
	DivisionByZero(usize),
	/// Error for invalid binary operations
	#[error("Runtime failure: invalid operation {operation} in line {line}")]
	BinaryOperationError { line: usize, operation: String },
	/// A `js` block ran with no executor installed
	#[error("Runtime failure: no foreign code executor for block in line {0}")]
	NoForeignExecutor(usize),
	/// The host executor rejected a `js` block
	#[error("Runtime failure: foreign code in line {line} failed: {source}")]
	ForeignCode {
		line:   usize,
		#[source]
		source: std::io::Error,
	},
}
