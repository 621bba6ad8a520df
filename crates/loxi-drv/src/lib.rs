//! loxi-drv - Command-line driver for the loxi interpreter.
//!
//! The driver owns everything outside the language pipeline proper:
//! argument parsing, file reading, wiring scanner → parser → interpreter
//! per subcommand, flushing diagnostics to standard error, and choosing
//! the process exit code.
//!
//! Subcommands:
//! - `tokenize` - print the token stream, one `KIND LEXEME LITERAL` line
//!   per token
//! - `parse` - parse a single expression and print its parenthesized form
//! - `evaluate` - evaluate a single expression and print the result
//! - `run` - execute a full program
//!
//! Exit codes: 0 on success, 65 when scanning or parsing reported errors,
//! 70 on a runtime error, 1 for usage or I/O failures.

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use loxi_eval::{EvalError, Interpreter, RuntimeError};
use loxi_lex::Scanner;
use loxi_par::{AstPrinter, Parser};
use loxi_util::Handler;

/// Exit code for a clean run.
pub const EXIT_OK: i32 = 0;
/// Exit code when scanning or parsing reported errors (EX_DATAERR).
pub const EXIT_SYNTAX_ERROR: i32 = 65;
/// Exit code when evaluation hit a runtime error (EX_SOFTWARE).
pub const EXIT_RUNTIME_ERROR: i32 = 70;

/// Subcommand selecting how far down the pipeline an invocation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Print the token stream
    Tokenize,
    /// Parse a single expression and print its parenthesized form
    Parse,
    /// Evaluate a single expression and print the result
    Evaluate,
    /// Execute a full program
    Run,
}

impl Command {
    /// Looks up a subcommand by its CLI name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "tokenize" => Some(Command::Tokenize),
            "parse" => Some(Command::Parse),
            "evaluate" => Some(Command::Evaluate),
            "run" => Some(Command::Run),
            _ => None,
        }
    }
}

/// Configuration for one invocation: the subcommand and the script path.
#[derive(Debug, Clone)]
pub struct Config {
    pub command: Command,
    pub input: PathBuf,
}

impl Config {
    /// Parses `argv` (program name at index 0).
    pub fn from_args(args: &[String]) -> Result<Self> {
        if args.len() < 3 {
            bail!("usage: loxi <tokenize|parse|evaluate|run> <script>");
        }

        let command = match Command::from_name(&args[1]) {
            Some(command) => command,
            None => bail!("unknown command: {}", args[1]),
        };

        Ok(Self {
            command,
            input: PathBuf::from(&args[2]),
        })
    }
}

/// State for one driver invocation.
///
/// Owns the diagnostic handler shared by the scanner and parser, and the
/// runtime-error flag. The exit code is derived from this state once the
/// subcommand finishes, so no phase decides it unilaterally.
pub struct Session {
    handler: Handler,
    had_runtime_error: bool,
}

impl Session {
    /// Creates a fresh session.
    pub fn new() -> Self {
        Self {
            handler: Handler::new(),
            had_runtime_error: false,
        }
    }

    /// Runs a subcommand over the given source text and returns the
    /// process exit code.
    pub fn execute(&mut self, command: Command, source: &str) -> Result<i32> {
        match command {
            Command::Tokenize => self.tokenize(source),
            Command::Parse => self.parse(source),
            Command::Evaluate => self.evaluate(source),
            Command::Run => self.run(source)?,
        }

        self.flush_diagnostics();
        Ok(self.exit_code())
    }

    /// `tokenize`: prints every valid token plus the terminal `EOF`, even
    /// when lexical errors occurred.
    fn tokenize(&mut self, source: &str) {
        let tokens = Scanner::new(source, &self.handler).scan_tokens();

        for token in &tokens {
            println!("{token}");
        }
    }

    /// `parse`: scans and parses a single expression, printing its
    /// parenthesized form when both phases were clean.
    fn parse(&mut self, source: &str) {
        let tokens = Scanner::new(source, &self.handler).scan_tokens();
        if self.handler.has_errors() {
            return;
        }

        let mut parser = Parser::new(tokens, &self.handler);
        if let Some(expr) = parser.parse_expression() {
            if !self.handler.has_errors() {
                println!("{}", AstPrinter.print(&expr));
            }
        }
    }

    /// `evaluate`: scans, parses, and evaluates a single expression,
    /// printing the resulting value.
    fn evaluate(&mut self, source: &str) {
        let tokens = Scanner::new(source, &self.handler).scan_tokens();
        if self.handler.has_errors() {
            return;
        }

        let mut parser = Parser::new(tokens, &self.handler);
        let expr = match parser.parse_expression() {
            Some(expr) if !self.handler.has_errors() => expr,
            _ => return,
        };

        let mut interpreter = Interpreter::new();
        match interpreter.evaluate(&expr) {
            Ok(value) => println!("{value}"),
            Err(error) => self.report_runtime_error(&error),
        }
    }

    /// `run`: scans and parses the full program, then executes it.
    ///
    /// Parsing still happens when the scan reported errors, so syntax
    /// problems later in the file surface too; execution is suppressed
    /// entirely once any static error exists.
    fn run(&mut self, source: &str) -> Result<()> {
        let tokens = Scanner::new(source, &self.handler).scan_tokens();
        let mut parser = Parser::new(tokens, &self.handler);
        let statements = parser.parse_program();

        if self.handler.has_errors() {
            return Ok(());
        }

        let mut interpreter = Interpreter::new();
        match interpreter.interpret(&statements) {
            Ok(()) => Ok(()),
            Err(EvalError::Runtime(error)) => {
                self.report_runtime_error(&error);
                Ok(())
            }
            Err(EvalError::Output(error)) => Err(error).context("writing program output"),
        }
    }

    /// Reports a runtime error in the external format and records it for
    /// the exit code.
    fn report_runtime_error(&mut self, error: &RuntimeError) {
        eprintln!("{}\n[line {}]", error, error.line);
        self.had_runtime_error = true;
    }

    /// Writes collected scan/parse diagnostics to standard error in
    /// report order.
    fn flush_diagnostics(&self) {
        for diagnostic in self.handler.diagnostics() {
            eprintln!("{diagnostic}");
        }
    }

    /// Derives the exit code from the session state. Runtime errors and
    /// static errors never coexist: execution is suppressed once a static
    /// error exists.
    fn exit_code(&self) -> i32 {
        if self.had_runtime_error {
            EXIT_RUNTIME_ERROR
        } else if self.handler.has_errors() {
            EXIT_SYNTAX_ERROR
        } else {
            EXIT_OK
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Entry point for the `loxi` binary: parses arguments, reads the script,
/// and runs the selected subcommand.
pub fn run_cli(args: &[String]) -> Result<i32> {
    let config = Config::from_args(args)?;
    let source = fs::read_to_string(&config.input)
        .with_context(|| format!("could not read {}", config.input.display()))?;

    let mut session = Session::new();
    session.execute(config.command, &source)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_config_valid_commands() {
        for (name, command) in [
            ("tokenize", Command::Tokenize),
            ("parse", Command::Parse),
            ("evaluate", Command::Evaluate),
            ("run", Command::Run),
        ] {
            let config = Config::from_args(&args(&["loxi", name, "script.lox"])).unwrap();
            assert_eq!(config.command, command);
            assert_eq!(config.input, PathBuf::from("script.lox"));
        }
    }

    #[test]
    fn test_config_rejects_missing_arguments() {
        assert!(Config::from_args(&args(&["loxi"])).is_err());
        assert!(Config::from_args(&args(&["loxi", "run"])).is_err());
    }

    #[test]
    fn test_config_rejects_unknown_command() {
        let error = Config::from_args(&args(&["loxi", "compile", "x.lox"])).unwrap_err();
        assert!(error.to_string().contains("unknown command"));
    }

    #[test]
    fn test_exit_code_ok() {
        let mut session = Session::new();
        let code = session.execute(Command::Run, "print 1;").unwrap();
        assert_eq!(code, EXIT_OK);
    }

    #[test]
    fn test_exit_code_syntax_error() {
        let mut session = Session::new();
        let code = session.execute(Command::Run, "print 1").unwrap();
        assert_eq!(code, EXIT_SYNTAX_ERROR);
    }

    #[test]
    fn test_exit_code_runtime_error() {
        let mut session = Session::new();
        let code = session.execute(Command::Run, "print -\"x\";").unwrap();
        assert_eq!(code, EXIT_RUNTIME_ERROR);
    }

    #[test]
    fn test_tokenize_exit_code_on_lexical_error() {
        let mut session = Session::new();
        let code = session.execute(Command::Tokenize, "var x = $;").unwrap();
        assert_eq!(code, EXIT_SYNTAX_ERROR);
    }

    #[test]
    fn test_evaluate_exit_code_on_parse_error() {
        let mut session = Session::new();
        let code = session.execute(Command::Evaluate, "(72 +").unwrap();
        assert_eq!(code, EXIT_SYNTAX_ERROR);
    }

    #[test]
    fn test_evaluate_exit_code_on_runtime_error() {
        let mut session = Session::new();
        let code = session.execute(Command::Evaluate, "-\"x\"").unwrap();
        assert_eq!(code, EXIT_RUNTIME_ERROR);
    }
}
