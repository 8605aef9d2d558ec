use std::path::PathBuf;

use palc::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "zholyc", after_long_help = "Log output is controlled through RUST_LOG, e.g. RUST_LOG=zholyc=debug.")]
pub struct Cli {
	#[command(subcommand)]
	pub mode: Mode,
}

#[derive(Subcommand, Debug)]
pub enum Mode {
	/// Input file
	File {
		path:           PathBuf,
		/// Program that receives each `js` block on stdin, e.g. `node`
		#[arg(long)]
		foreign_runner: Option<String>,
	},
	/// Input prompt, declarations persist between lines
	Repl {
		/// Program that receives each `js` block on stdin, e.g. `node`
		#[arg(long)]
		foreign_runner: Option<String>,
	},
}
