use std::{cell::RefCell, fs::read_to_string, io, path::PathBuf, rc::Rc};

use pretty_assertions::assert_eq;
use zholyc::{FileFetcher, HolyC, HolyCError, ParseErrorType, ScanErrorType};

fn fixtures() -> PathBuf { PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures") }

fn fixture(name: &str) -> String { read_to_string(fixtures().join(name)).unwrap() }

fn run(source: &str) -> Result<String, HolyCError> { HolyC::new().run(source) }

#[test]
fn literal_round_trip() {
	assert_eq!(run("\"abc\";").unwrap(), "abc");
	assert_eq!(run("\"a\\nb\";").unwrap(), "a\nb");
	assert_eq!(run("'single';").unwrap(), "single");
}

#[test]
fn use_before_declaration_is_a_parse_error() {
	let HolyCError::ParseError(error) = run("x = 1;").unwrap_err() else { panic!("expected a parse error") };
	assert_eq!(error.kind(), &ParseErrorType::Undeclared);
	assert_eq!(error.to_string(), "Parser failure: 'x' unexpected token in line 1");
}

#[test]
fn errors_carry_a_precise_reason() {
	let error = run("U0 f(I32 a) {}\nf(1, 2);").unwrap_err();
	assert_eq!(error.to_string(), "Parser failure: 'f' unexpected token in line 2");
	assert_eq!(error.reason().as_deref(), Some("Expected 1 arguments, found 2"));

	assert_eq!(run("I32 a = @;").unwrap_err().reason().as_deref(), Some("Unexpected character '@'"));
	assert_eq!(run("I32 a;\n\"%d\", 1 / a;").unwrap_err().reason(), None);
}

#[test]
fn redeclaration_fails_on_the_second_declaration() {
	let HolyCError::ParseError(error) = run("I32 x;\nI32 x;").unwrap_err() else { panic!("expected a parse error") };
	assert_eq!(error.kind(), &ParseErrorType::Redeclared);
	assert_eq!(error.line(), 2);
}

#[test]
fn lexer_errors_name_the_offending_text() {
	let HolyCError::ScanError(error) = run("I32 a;\na = @;").unwrap_err() else { panic!("expected a scan error") };
	assert_eq!(error.kind(), &ScanErrorType::UnexpectedCharacter('@'));
	assert_eq!(error.to_string(), "Lexer failure: '@' unexpected token in line 2");
}

#[test]
fn runtime_errors_abort_the_run() {
	let error = run("I32 a;\n\"%d\", 5 / a;").unwrap_err();
	assert!(matches!(error, HolyCError::RuntimeError(_)));
	assert_eq!(error.to_string(), "Runtime failure: division by zero in line 2");
}

#[test]
fn fibonacci_fixture() {
	assert_eq!(run(&fixture("fibonacci.HC")).unwrap(), "55 89\n");
}

#[test]
fn compound_assignment_leads_the_chain() {
	assert_eq!(run("I32 a = 5; a += 2 * 3; \"%d\", a;").unwrap(), "21");
	assert_eq!(run("F64 f = 1; f -= 3 / 4; \"%.1f\", f;").unwrap(), "-0.5");
}

#[test]
fn assignment_reads_its_own_target_after_each_step() {
	assert_eq!(run("I32 a = 5; a = 1 + a; \"%d\", a;").unwrap(), "2");
	assert_eq!(run("I32 a = 5, b = 3; a = b + a; \"%d\", a;").unwrap(), "6");
	assert_eq!(run("class Pt { I32 x; } p; p.x = 4; p.x = 1 + p.x; \"%d\", p.x;").unwrap(), "2");
}

#[test]
fn oversized_print_width_does_not_panic() {
	let output = run("\"%99999999999999999999d\", 1;").unwrap();
	assert_eq!(output.trim_start(), "1");
}

#[test]
fn default_arguments() {
	let source = "I32 Scale(I32 n, I32 by = 2) { return n * by; }\n\"%d %d\", Scale(4), Scale(4, 3);";
	assert_eq!(run(source).unwrap(), "8 12");
}

#[test]
fn class_field_round_trip() {
	assert_eq!(run("class Pt { I32 x; I32 y; } p;\np.x = 5;\n\"%d\", p.x;").unwrap(), "5");
}

#[test]
fn return_stops_the_procedure_body() {
	let source = r#"
U0 Run()
{
	I32 i;
	if (1) {
		for (i = 0; i < 3; i++) {
			"step %d\n", i;
			return;
			"unreachable\n";
		}
	}
	"later\n";
}
Run;
"#;
	let output = run(source).unwrap();
	assert_eq!(output, "step 0\n");
	assert!(!output.contains("later"));
}

#[test]
fn include_is_lexed_in_place() {
	let library = "I32 Twice(I32 n) { return n * 2; }\n";
	let fetcher = move |path: &str| -> io::Result<String> {
		match path {
			"lib.HC" => Ok(library.to_string()),
			_ => Err(io::Error::new(io::ErrorKind::NotFound, path.to_string())),
		}
	};

	let included = HolyC::new().with_include_fetcher(fetcher).run("#include \"lib.HC\"\n\"%d\", Twice(21);").unwrap();
	let pasted = run(&format!("{library}\"%d\", Twice(21);")).unwrap();
	assert_eq!(included, "42");
	assert_eq!(included, pasted);
}

#[test]
fn include_failures_are_io_errors() {
	let error = run("#include \"missing.HC\"").unwrap_err();
	assert!(matches!(error, HolyCError::IncludeError { ref path, line: 1, .. } if path == "missing.HC"));

	let mut holyc = HolyC::new().with_include_fetcher(FileFetcher::new(fixtures()));
	let error = holyc.run("\n#include 'nope.HC'").unwrap_err();
	assert!(matches!(error, HolyCError::IncludeError { line: 2, .. }));
}

#[test]
fn includes_resolve_against_a_directory() {
	let mut holyc = HolyC::new().with_include_fetcher(FileFetcher::new(fixtures()));
	let output = holyc.run(&fixture("shapes.HC")).unwrap();
	assert_eq!(output, "area 12\nsquare 25\nfound 7\nnot found\nfound -1\n");
}

#[test]
fn run_file_reads_includes_next_to_the_file() {
	let dir = tempfile::tempdir().unwrap();
	std::fs::write(dir.path().join("lib.HC"), "I32 answer = 42;\n").unwrap();
	std::fs::write(dir.path().join("main.HC"), "#include \"lib.HC\"\nanswer += 0;\n").unwrap();
	assert!(HolyC::new().run_file(dir.path().join("main.HC")).is_ok());
	assert!(HolyC::new().run_file(dir.path().join("absent.HC")).is_err());
}

#[test]
fn idle_runs_keep_declarations() {
	let mut holyc = HolyC::new();
	assert_eq!(holyc.run_idle("I32 x = 4;").unwrap(), "");
	assert_eq!(holyc.run_idle("x *= 10;").unwrap(), "");
	assert_eq!(holyc.run_idle("I32 Inc(I32 n) { return n + 1; }").unwrap(), "");
	assert_eq!(holyc.run_idle("\"%d\", Inc(x);").unwrap(), "41");

	// A fresh run forgets everything.
	assert!(matches!(holyc.run("\"%d\", x;"), Err(HolyCError::ParseError(_))));
}

#[test]
fn failed_idle_snippets_roll_back_declarations() {
	let mut holyc = HolyC::new();
	holyc.run_idle("I32 kept;").unwrap();
	assert!(holyc.run_idle("I32 y; oops;").is_err());
	assert_eq!(holyc.run_idle("I32 y = 2; \"%d\", y + kept;").unwrap(), "2");
}

#[test]
fn contexts_are_independent() {
	let mut first = HolyC::new();
	let mut second = HolyC::new();
	first.run_idle("I32 shared = 1;").unwrap();
	assert!(second.run_idle("shared;").is_err());
	assert!(second.run_idle("I32 shared = 2;").is_ok());
}

#[test]
fn foreign_code_goes_to_the_executor() {
	let blocks = Rc::new(RefCell::new(Vec::new()));
	let sink = Rc::clone(&blocks);
	let mut holyc = HolyC::new().with_foreign_executor(move |code: &str| -> io::Result<()> {
		sink.borrow_mut().push(code.to_string());
		Ok(())
	});

	let output = holyc.run("\"before \";\njs { if (x) { y(); } };\n\"after\";").unwrap();
	assert_eq!(output, "before after");
	assert_eq!(*blocks.borrow(), vec![" if (x) { y(); } ".to_string()]);
}

#[test]
fn foreign_code_without_executor_fails() {
	let error = run("\n\njs { alert(1); };").unwrap_err();
	assert_eq!(error.to_string(), "Runtime failure: no foreign code executor for block in line 3");
}
