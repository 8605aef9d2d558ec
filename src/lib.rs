//! # A tree-walking interpreter for a small HolyC dialect
//!
//! User's source code: `I32 average = (min + max) / 2;`

//! ## Scanning
//!
//! The scanner turns characters into tokens: punctuation `(`, `,`, type
//! keywords `I32`, numbers `123` and `1.5`, string literals `"hi!"`,
//! identifiers `min`. Whitespace and comments are dropped.
//!
//! `#include "file.HC"` is resolved right here: the fetched text is spliced
//! in front of the unread input and scanning goes on as if it had been pasted
//! in place. `js { ... };` is captured raw as a single token.

//! ## Parsing and resolution
//!
//! One pass builds the tree and binds names at the same time. There is no
//! separate resolver: a name must be declared before it is used, and the
//! parser hands out a slot for every declaration.
//!
//! ``` markdown
//! average (Statement::VarDeclaration, Slot::Global(2))
//! └── / (Expression::Binary)
//!     ├── group (Expression::Grouping)
//!     │   └── + (Expression::Binary)
//!     │       ├── min (Expression::Variable, Slot::Global(0))
//!     │       └── max (Expression::Variable, Slot::Global(1))
//!     └── 2 (Expression::Literal)
//! ```
//!
//! Arithmetic has no precedence: `1 + 2 * 3` is `9`. Parentheses group.

//! ## Evaluation
//!
//! The evaluator walks the tree against a value store indexed by slot:
//! globals live for the whole context, arguments and locals live in one frame
//! per active call. Every store coerces to the declared type, so a `U8` wraps
//! at 256.
//!
//! Print statements are bare string literals, `"%d apples\n", n;`. Escapes
//! are decoded when the text is emitted, not when it is scanned.

//! ## Idle mode
//!
//! [`HolyC::run_idle`] keeps declarations and values between calls, the way a
//! REPL needs them. [`HolyC::run`] starts from scratch every time.

pub mod cli;
mod error;
mod holyc;
mod host;
mod interpreter;
mod parser;
mod scanner;
mod statement;
mod symbols;
mod utils;

pub use error::{HolyCError, interpreter::InterpreterError, parser::{ParseError, ParseErrorType}, scanner::{ScanError, ScanErrorType}};
pub use holyc::HolyC;
pub use host::{CommandExecutor, FileFetcher, ForeignExecutor, IncludeFetcher};
