//! REPL (Read-Eval-Print Loop) for Ember

use crate::error::{report_error, report_runtime_error};
use crate::interp::{Interpreter, Value};
use crate::lexer::tokenize;
use crate::parser::parse;
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use std::path::PathBuf;

const PROMPT: &str = "> ";
const HISTORY_FILE: &str = ".ember_history";
const SOURCE_NAME: &str = "<repl>";

/// REPL state
pub struct Repl {
    editor: DefaultEditor,
    interpreter: Interpreter,
    history_path: Option<PathBuf>,
}

impl Repl {
    /// Create a new REPL
    pub fn new() -> RlResult<Self> {
        Self::with_interpreter(Interpreter::new())
    }

    pub fn with_interpreter(interpreter: Interpreter) -> RlResult<Self> {
        let editor = DefaultEditor::new()?;

        // Try to find history file in home directory
        let history_path = dirs_home().map(|h| h.join(HISTORY_FILE));

        let mut repl = Repl {
            editor,
            interpreter,
            history_path,
        };

        if let Some(ref path) = repl.history_path {
            let _ = repl.editor.load_history(path);
        }

        Ok(repl)
    }

    /// Run the REPL
    pub fn run(&mut self) -> RlResult<()> {
        println!("Ember REPL v{}", env!("CARGO_PKG_VERSION"));
        println!("Type :help for help, :quit to exit.\n");

        loop {
            match self.editor.readline(PROMPT) {
                Ok(line) => {
                    let line = line.trim();

                    if line.is_empty() {
                        continue;
                    }

                    let _ = self.editor.add_history_entry(line);

                    if line.starts_with(':') {
                        if self.handle_command(line) {
                            break;
                        }
                        continue;
                    }

                    if let Some(shown) = self.eval_input(line).as_ref().and_then(echo) {
                        println!("{shown}");
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Goodbye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {err}");
                    break;
                }
            }
        }

        if let Some(ref path) = self.history_path {
            let _ = self.editor.save_history(path);
        }

        Ok(())
    }

    /// Handle REPL commands (starting with :)
    ///
    /// Returns true when the session should end.
    fn handle_command(&mut self, cmd: &str) -> bool {
        match cmd {
            ":quit" | ":q" | ":exit" => {
                println!("Goodbye!");
                true
            }
            ":help" | ":h" | ":?" => {
                self.print_help();
                false
            }
            ":clear" => {
                print!("\x1B[2J\x1B[1;1H");
                false
            }
            ":env" => {
                for line in self.env_listing() {
                    println!("{line}");
                }
                false
            }
            _ => {
                println!("Unknown command: {cmd}");
                println!("Type :help for help.");
                false
            }
        }
    }

    fn print_help(&self) {
        println!("Ember REPL Commands:");
        println!("  :help, :h, :?   Show this help");
        println!("  :quit, :q       Exit the REPL");
        println!("  :clear          Clear the screen");
        println!("  :env            List global bindings");
        println!();
        println!("You can enter:");
        println!("  - Expressions: 1 + 2 * 3, \"ab\" * 3");
        println!("  - Bindings: x = 5; const limit = 10");
        println!("  - Conditionals: if (x > 3) \"big\" else \"small\"");
        println!("  - Functions: sq = fn(n) => n * n; sq(4)");
        println!();
        println!("Built-in functions:");
        println!("  print(x)        Print value with newline, returns x");
        println!("  input(prompt)   Read a line as a string");
        println!("  rand(n)         Random integer in 1..=n");
    }

    /// Root-frame bindings sorted by name, constants marked
    fn env_listing(&self) -> Vec<String> {
        let globals = self.interpreter.globals();
        let mut names: Vec<&String> = globals.bindings().keys().collect();
        names.sort();

        names
            .into_iter()
            .map(|name| {
                let value = globals.bindings()[name].repr();
                if globals.is_locked(name) {
                    format!("const {name} = {value}")
                } else {
                    format!("{name} = {value}")
                }
            })
            .collect()
    }

    /// Evaluate one line as a program in the persistent interpreter
    ///
    /// Errors are reported to stderr and yield `None`; the session goes on.
    fn eval_input(&mut self, input: &str) -> Option<Value> {
        let program = match tokenize(input).and_then(|tokens| parse(SOURCE_NAME, input, tokens)) {
            Ok(program) => program,
            Err(err) => {
                if report_error(SOURCE_NAME, input, &err).is_err() {
                    eprintln!("{err}");
                }
                return None;
            }
        };

        match self.interpreter.run(&program) {
            Ok(value) => Some(value),
            Err(err) => {
                if report_runtime_error(SOURCE_NAME, input, &err).is_err() {
                    eprintln!("{err}");
                }
                None
            }
        }
    }
}

/// Result line for an evaluated input; null results stay silent
fn echo(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        _ => Some(format!("=> {}", value.repr())),
    }
}

/// Get home directory
fn dirs_home() -> Option<PathBuf> {
    #[cfg(windows)]
    {
        std::env::var("USERPROFILE").ok().map(PathBuf::from)
    }
    #[cfg(not(windows))]
    {
        std::env::var("HOME").ok().map(PathBuf::from)
    }
}
