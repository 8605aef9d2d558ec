//! Capabilities the host injects into the interpreter.
//!
//! The core never touches the file system or runs foreign code on its own, it
//! only asks these collaborators.

use std::{io::{self, Write}, path::PathBuf, process::{Command, Stdio}};

/// Resolves the path of an `#include` directive to source text.
pub trait IncludeFetcher {
	fn fetch(&self, path: &str) -> io::Result<String>;
}

impl<F> IncludeFetcher for F
where
	F: Fn(&str) -> io::Result<String>,
{
	fn fetch(&self, path: &str) -> io::Result<String> { self(path) }
}

/// Executes the raw body of a `js { ... };` block.
pub trait ForeignExecutor {
	fn execute(&mut self, code: &str) -> io::Result<()>;
}

impl<F> ForeignExecutor for F
where
	F: FnMut(&str) -> io::Result<()>,
{
	fn execute(&mut self, code: &str) -> io::Result<()> { self(code) }
}

/// Reads includes from disk, relative paths resolved against `root`.
#[derive(Debug, Clone)]
pub struct FileFetcher {
	root: PathBuf,
}

impl FileFetcher {
	pub fn new(root: impl Into<PathBuf>) -> Self { Self { root: root.into() } }
}

impl IncludeFetcher for FileFetcher {
	fn fetch(&self, path: &str) -> io::Result<String> {
		let path = self.root.join(path);
		tracing::trace!(path = %path.display(), "reading include");
		std::fs::read_to_string(path)
	}
}

/// Pipes foreign code into the stdin of a host program, e.g. `node`.
#[derive(Debug, Clone)]
pub struct CommandExecutor {
	program: String,
}

impl CommandExecutor {
	pub fn new(program: impl Into<String>) -> Self { Self { program: program.into() } }
}

impl ForeignExecutor for CommandExecutor {
	fn execute(&mut self, code: &str) -> io::Result<()> {
		let mut child = Command::new(&self.program).stdin(Stdio::piped()).spawn()?;
		if let Some(mut stdin) = child.stdin.take() {
			stdin.write_all(code.as_bytes())?;
		}
		let status = child.wait()?;
		if !status.success() {
			tracing::warn!(program = %self.program, %status, "foreign runner exited unsuccessfully");
			return Err(io::Error::other(format!("{} exited with {status}", self.program)));
		}
		Ok(())
	}
}
