use palc::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use zholyc::{CommandExecutor, HolyC, cli::*};

fn main() {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
	tracing_subscriber::registry().with(fmt::layer().with_writer(std::io::stderr)).with(filter).init();

	let holyc = |foreign_runner: Option<String>| match foreign_runner {
		Some(program) => HolyC::new().with_foreign_executor(CommandExecutor::new(program)),
		None => HolyC::new(),
	};

	match Cli::parse().mode {
		Mode::File { path, foreign_runner } => {
			if let Err(e) = holyc(foreign_runner).run_file(&path) {
				match e.reason() {
					Some(reason) => eprintln!("Failed run file: {e} ({reason})"),
					None => eprintln!("Failed run file: {e}"),
				}
				std::process::exit(1);
			}
		}
		Mode::Repl { foreign_runner } => holyc(foreign_runner).run_prompt(),
	}
}
