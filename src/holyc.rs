use std::{fs::read_to_string, io::Write, path::Path};

use anyhow::Context;
use tracing::debug;

use crate::{HolyCError, host::{FileFetcher, ForeignExecutor, IncludeFetcher}, interpreter::Interpreter, parser::Parser, scanner::Scanner, statement::Statement, symbols::SymbolTables};

/// HolyC is the interpreter context: the symbol tables, the runtime value
/// store and the host capabilities. Nothing lives in process-wide state, two
/// contexts never see each other's declarations.
#[derive(Default)]
pub struct HolyC {
	symbols:     SymbolTables,
	interpreter: Interpreter,
	fetcher:     Option<Box<dyn IncludeFetcher>>,
}

impl HolyC {
	pub fn new() -> Self { Self::default() }

	/// Resolve `#include` directives through `fetcher`. Without one every
	/// include fails.
	pub fn with_include_fetcher(mut self, fetcher: impl IncludeFetcher + 'static) -> Self {
		self.fetcher = Some(Box::new(fetcher));
		self
	}

	/// Run `js { ... };` blocks through `executor`. Without one they are a
	/// runtime error.
	pub fn with_foreign_executor(mut self, executor: impl ForeignExecutor + 'static) -> Self {
		self.interpreter.set_executor(Box::new(executor));
		self
	}

	/// Run a whole program against fresh tables and return its output.
	pub fn run(&mut self, source: &str) -> Result<String, HolyCError> {
		self.symbols = SymbolTables::new();
		self.interpreter.reset();
		let statements = self.front_end(source)?;
		self.back_end(&statements)
	}

	/// Run a snippet on top of everything earlier idle runs declared.
	///
	/// A snippet that fails to lex or parse leaves the tables as they were, a
	/// runtime failure keeps its declarations.
	pub fn run_idle(&mut self, source: &str) -> Result<String, HolyCError> {
		let snapshot = self.symbols.clone();
		let statements = match self.front_end(source) {
			Ok(statements) => statements,
			Err(error) => {
				debug!("rolling back declarations of failed snippet");
				self.symbols = snapshot;
				return Err(error);
			}
		};
		self.back_end(&statements)
	}

	/// Run a source file and print its output. Includes resolve relative to
	/// the file's directory unless a fetcher was injected.
	pub fn run_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), HolyCError> {
		let path = path.as_ref();
		let source = read_to_string(path).with_context(|| format!("Failed open source file {}", path.display()))?;
		if self.fetcher.is_none() {
			let root = path.parent().unwrap_or_else(|| Path::new("."));
			self.fetcher = Some(Box::new(FileFetcher::new(root)));
		}

		let output = self.run(&source)?;
		let mut stdout = std::io::stdout().lock();
		stdout.write_all(output.as_bytes()).context("Failed write output")?;
		stdout.flush().context("Failed flush output")?;
		Ok(())
	}

	/// Run the REPL prompt. Declarations persist from line to line.
	pub fn run_prompt(&mut self) {
		let mut input = String::new();
		let stdin = std::io::stdin();
		loop {
			input.clear();
			print!("> ");
			if let Err(e) = std::io::stdout().flush() {
				eprintln!("Failed flush: {e}");
			}
			match stdin.read_line(&mut input) {
				Ok(0) => {
					println!("\nExited zholyc repl");
					break;
				}
				Ok(_) => {}
				Err(e) => {
					eprintln!("Failed read line: {e}");
					continue;
				}
			}
			match self.run_idle(input.trim()) {
				Ok(output) if output.is_empty() => {}
				Ok(output) if output.ends_with('\n') => print!("{output}"),
				Ok(output) => println!("{output}"),
				Err(e) => match e.reason() {
					Some(reason) => eprintln!("{e} ({reason})"),
					None => eprintln!("{e}"),
				},
			}
		}
	}
}

impl HolyC {
	fn front_end(&mut self, source: &str) -> Result<Vec<Statement>, HolyCError> {
		debug!(bytes = source.len(), "running source");
		let mut scanner = Scanner::new(source);
		if let Some(fetcher) = &self.fetcher {
			scanner = scanner.with_include_fetcher(fetcher.as_ref());
		}
		let tokens = scanner.scan_tokens()?;
		Ok(Parser::new(tokens, &mut self.symbols).parse()?)
	}

	fn back_end(&mut self, statements: &[Statement]) -> Result<String, HolyCError> {
		self.interpreter.allocate_globals(self.symbols.global_types());
		Ok(self.interpreter.interpret(statements)?)
	}
}
