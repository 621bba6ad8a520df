//! Tree-walking interpreter.
//!
//! One dispatch function per AST family: [`Interpreter::evaluate`] for
//! expressions, `execute` for statements. Statements run in program
//! order; subexpressions evaluate left to right, except that the logical
//! operators skip their right operand when the left one decides the
//! result.

use std::io::{self, Write};

use crate::env::Environment;
use crate::error::{EvalError, RuntimeError};
use crate::value::Value;
use loxi_lex::{Literal, Token, TokenKind};
use loxi_par::{
    AssignExpr, BinaryExpr, Expr, IfStmt, LogicalExpr, Stmt, UnaryExpr, VarStmt, WhileStmt,
};

/// Walks the AST, holding the scope chain and the output sink `print`
/// writes to.
///
/// The sink is generic so tests can capture program output; the driver
/// uses standard output.
pub struct Interpreter<W: Write = io::Stdout> {
    environment: Environment,
    out: W,
}

impl Interpreter<io::Stdout> {
    /// Creates an interpreter that prints to standard output.
    pub fn new() -> Self {
        Self::with_output(io::stdout())
    }
}

impl Default for Interpreter<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> Interpreter<W> {
    /// Creates an interpreter that prints to the given sink.
    pub fn with_output(out: W) -> Self {
        Self {
            environment: Environment::new(),
            out,
        }
    }

    /// Consumes the interpreter and returns its output sink.
    pub fn into_output(self) -> W {
        self.out
    }

    /// Executes statements in program order.
    ///
    /// Stops at the first failure; statements after a runtime error do
    /// not execute.
    pub fn interpret(&mut self, statements: &[Stmt]) -> Result<(), EvalError> {
        for statement in statements {
            self.execute(statement)?;
        }
        Ok(())
    }

    /// Evaluates a single expression to a value.
    pub fn evaluate(&mut self, expr: &Expr) -> Result<Value, RuntimeError> {
        match expr {
            Expr::Literal(lit) => Ok(Self::literal_value(&lit.value)),
            Expr::Grouping(group) => self.evaluate(&group.expression),
            Expr::Unary(unary) => self.eval_unary(unary),
            Expr::Binary(binary) => self.eval_binary(binary),
            Expr::Logical(logical) => self.eval_logical(logical),
            Expr::Variable(var) => self.environment.get(&var.name),
            Expr::Assign(assign) => self.eval_assign(assign),
        }
    }

    fn execute(&mut self, statement: &Stmt) -> Result<(), EvalError> {
        match statement {
            Stmt::Expression(stmt) => {
                self.evaluate(&stmt.expression)?;
                Ok(())
            }
            Stmt::Print(stmt) => {
                let value = self.evaluate(&stmt.expression)?;
                writeln!(self.out, "{value}")?;
                Ok(())
            }
            Stmt::Var(stmt) => self.execute_var(stmt),
            Stmt::Block(stmt) => self.execute_block(&stmt.statements),
            Stmt::If(stmt) => self.execute_if(stmt),
            Stmt::While(stmt) => self.execute_while(stmt),
        }
    }

    /// Declares a variable in the current scope; a missing initializer
    /// binds `nil`.
    fn execute_var(&mut self, stmt: &VarStmt) -> Result<(), EvalError> {
        let value = match &stmt.initializer {
            Some(initializer) => self.evaluate(initializer)?,
            None => Value::Nil,
        };
        self.environment.define(&stmt.name.lexeme, value);
        Ok(())
    }

    /// Runs a block's statements in a fresh child scope.
    ///
    /// The scope is discarded when the block finishes, whether it ran to
    /// completion or unwound with an error.
    fn execute_block(&mut self, statements: &[Stmt]) -> Result<(), EvalError> {
        let snapshot = self.environment.enter_scope();
        let result = statements
            .iter()
            .try_for_each(|statement| self.execute(statement));
        self.environment.exit_scope(snapshot);
        result
    }

    fn execute_if(&mut self, stmt: &IfStmt) -> Result<(), EvalError> {
        if self.evaluate(&stmt.condition)?.is_truthy() {
            self.execute(&stmt.then_branch)
        } else if let Some(else_branch) = &stmt.else_branch {
            self.execute(else_branch)
        } else {
            Ok(())
        }
    }

    fn execute_while(&mut self, stmt: &WhileStmt) -> Result<(), EvalError> {
        while self.evaluate(&stmt.condition)?.is_truthy() {
            self.execute(&stmt.body)?;
        }
        Ok(())
    }

    fn eval_unary(&mut self, expr: &UnaryExpr) -> Result<Value, RuntimeError> {
        let right = self.evaluate(&expr.right)?;

        match expr.op.kind {
            TokenKind::Minus => match right {
                Value::Number(n) => Ok(Value::Number(-n)),
                _ => Err(RuntimeError::new(&expr.op, "Operand must be a number.")),
            },
            TokenKind::Bang => Ok(Value::Bool(!right.is_truthy())),
            _ => Err(RuntimeError::new(&expr.op, "Invalid unary operator.")),
        }
    }

    fn eval_binary(&mut self, expr: &BinaryExpr) -> Result<Value, RuntimeError> {
        let left = self.evaluate(&expr.left)?;
        let right = self.evaluate(&expr.right)?;

        match expr.op.kind {
            // `+` is overloaded: numeric addition or string concatenation.
            TokenKind::Plus => match (left, right) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
                (Value::Str(a), Value::Str(b)) => Ok(Value::Str(a + &b)),
                _ => Err(RuntimeError::new(
                    &expr.op,
                    "Operands must be two numbers or two strings.",
                )),
            },
            TokenKind::Minus => {
                let (a, b) = Self::number_operands(&expr.op, left, right)?;
                Ok(Value::Number(a - b))
            }
            TokenKind::Star => {
                let (a, b) = Self::number_operands(&expr.op, left, right)?;
                Ok(Value::Number(a * b))
            }
            // Division by zero follows IEEE-754 (infinity/NaN), no error.
            TokenKind::Slash => {
                let (a, b) = Self::number_operands(&expr.op, left, right)?;
                Ok(Value::Number(a / b))
            }
            TokenKind::Greater => {
                let (a, b) = Self::number_operands(&expr.op, left, right)?;
                Ok(Value::Bool(a > b))
            }
            TokenKind::GreaterEqual => {
                let (a, b) = Self::number_operands(&expr.op, left, right)?;
                Ok(Value::Bool(a >= b))
            }
            TokenKind::Less => {
                let (a, b) = Self::number_operands(&expr.op, left, right)?;
                Ok(Value::Bool(a < b))
            }
            TokenKind::LessEqual => {
                let (a, b) = Self::number_operands(&expr.op, left, right)?;
                Ok(Value::Bool(a <= b))
            }
            TokenKind::EqualEqual => Ok(Value::Bool(left == right)),
            TokenKind::BangEqual => Ok(Value::Bool(left != right)),
            _ => Err(RuntimeError::new(&expr.op, "Invalid binary operator.")),
        }
    }

    /// Short-circuit logic. The controlling operand's value is returned
    /// as-is, not coerced to a boolean: `a and b` yields `a` when `a` is
    /// falsy, otherwise `b`; `a or b` yields `a` when `a` is truthy,
    /// otherwise `b`.
    fn eval_logical(&mut self, expr: &LogicalExpr) -> Result<Value, RuntimeError> {
        let left = self.evaluate(&expr.left)?;

        if expr.op.kind == TokenKind::Or {
            if left.is_truthy() {
                return Ok(left);
            }
        } else if !left.is_truthy() {
            return Ok(left);
        }

        self.evaluate(&expr.right)
    }

    /// Evaluates the right-hand side, writes it into the nearest scope
    /// defining the name, and yields the assigned value.
    fn eval_assign(&mut self, expr: &AssignExpr) -> Result<Value, RuntimeError> {
        let value = self.evaluate(&expr.value)?;
        self.environment.assign(&expr.name, value.clone())?;
        Ok(value)
    }

    /// Checks that both operands are numbers, naming the operator token in
    /// the error otherwise.
    fn number_operands(
        op: &Token,
        left: Value,
        right: Value,
    ) -> Result<(f64, f64), RuntimeError> {
        match (left, right) {
            (Value::Number(a), Value::Number(b)) => Ok((a, b)),
            _ => Err(RuntimeError::new(op, "Operands must be numbers.")),
        }
    }

    /// Re-derives the typed value of a literal token.
    fn literal_value(token: &Token) -> Value {
        match token.kind {
            TokenKind::True => Value::Bool(true),
            TokenKind::False => Value::Bool(false),
            TokenKind::Nil => Value::Nil,
            _ => match &token.literal {
                Some(Literal::Number(n)) => Value::Number(*n),
                Some(Literal::Str(s)) => Value::Str(s.clone()),
                None => Value::Nil,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loxi_lex::Scanner;
    use loxi_par::Parser;
    use loxi_util::Handler;

    fn parse_program(source: &str) -> Vec<Stmt> {
        let handler = Handler::new();
        let tokens = Scanner::new(source, &handler).scan_tokens();
        let statements = Parser::new(tokens, &handler).parse_program();
        assert!(!handler.has_errors(), "unexpected parse diagnostics");
        statements
    }

    fn eval_expr(source: &str) -> Result<Value, RuntimeError> {
        let handler = Handler::new();
        let tokens = Scanner::new(source, &handler).scan_tokens();
        let expr = Parser::new(tokens, &handler)
            .parse_expression()
            .expect("expression should parse");
        let mut interpreter = Interpreter::with_output(Vec::<u8>::new());
        interpreter.evaluate(&expr)
    }

    fn run_program(source: &str) -> (String, Result<(), EvalError>) {
        let statements = parse_program(source);
        let mut interpreter = Interpreter::with_output(Vec::new());
        let result = interpreter.interpret(&statements);
        let output = String::from_utf8(interpreter.into_output()).expect("output is utf8");
        (output, result)
    }

    #[test]
    fn test_arithmetic_precedence() {
        assert_eq!(eval_expr("1 + 2 * 3").unwrap(), Value::Number(7.0));
        assert_eq!(eval_expr("(1 + 2) * 3").unwrap(), Value::Number(9.0));
    }

    #[test]
    fn test_string_concatenation() {
        assert_eq!(
            eval_expr("\"foo\" + \"bar\"").unwrap(),
            Value::Str("foobar".to_string())
        );
    }

    #[test]
    fn test_comparisons() {
        assert_eq!(eval_expr("2 > 1").unwrap(), Value::Bool(true));
        assert_eq!(eval_expr("2 <= 1").unwrap(), Value::Bool(false));
        assert_eq!(eval_expr("1 >= 1").unwrap(), Value::Bool(true));
    }

    #[test]
    fn test_equality() {
        assert_eq!(eval_expr("1 == 1").unwrap(), Value::Bool(true));
        assert_eq!(eval_expr("1 != 2").unwrap(), Value::Bool(true));
        assert_eq!(eval_expr("nil == nil").unwrap(), Value::Bool(true));
        assert_eq!(eval_expr("\"a\" == \"b\"").unwrap(), Value::Bool(false));
        // Values of different types are never equal.
        assert_eq!(eval_expr("1 == \"1\"").unwrap(), Value::Bool(false));
        assert_eq!(eval_expr("true == 1").unwrap(), Value::Bool(false));
        assert_eq!(eval_expr("nil == false").unwrap(), Value::Bool(false));
    }

    #[test]
    fn test_unary() {
        assert_eq!(eval_expr("-3").unwrap(), Value::Number(-3.0));
        assert_eq!(eval_expr("!nil").unwrap(), Value::Bool(true));
        assert_eq!(eval_expr("!0").unwrap(), Value::Bool(false));
        assert_eq!(eval_expr("!!\"\"").unwrap(), Value::Bool(true));
    }

    #[test]
    fn test_division_by_zero_follows_ieee754() {
        match eval_expr("1 / 0").unwrap() {
            Value::Number(n) => assert!(n.is_infinite()),
            other => panic!("expected a number, got {other:?}"),
        }
        match eval_expr("0 / 0").unwrap() {
            Value::Number(n) => assert!(n.is_nan()),
            other => panic!("expected a number, got {other:?}"),
        }
    }

    #[test]
    fn test_unary_minus_type_error() {
        let err = eval_expr("-\"x\"").unwrap_err();
        assert_eq!(err.message, "Operand must be a number.");
        assert_eq!(err.line, 1);
    }

    #[test]
    fn test_binary_type_errors() {
        assert_eq!(
            eval_expr("1 < \"two\"").unwrap_err().message,
            "Operands must be numbers."
        );
        assert_eq!(
            eval_expr("1 - \"two\"").unwrap_err().message,
            "Operands must be numbers."
        );
        assert_eq!(
            eval_expr("1 + \"two\"").unwrap_err().message,
            "Operands must be two numbers or two strings."
        );
    }

    #[test]
    fn test_logical_returns_operand_value() {
        assert_eq!(
            eval_expr("nil or \"default\"").unwrap(),
            Value::Str("default".to_string())
        );
        assert_eq!(eval_expr("1 and 2").unwrap(), Value::Number(2.0));
        assert_eq!(eval_expr("nil and 2").unwrap(), Value::Nil);
        assert_eq!(eval_expr("1 or 2").unwrap(), Value::Number(1.0));
    }

    #[test]
    fn test_print_statement() {
        let (output, result) = run_program("print 1 + 2 * 3;");
        assert!(result.is_ok());
        assert_eq!(output, "7\n");
    }

    #[test]
    fn test_print_string_concatenation() {
        let (output, _) = run_program("print \"foo\" + \"bar\";");
        assert_eq!(output, "foobar\n");
    }

    #[test]
    fn test_var_declaration_and_read() {
        let (output, _) = run_program("var a = 1; print a;");
        assert_eq!(output, "1\n");
    }

    #[test]
    fn test_var_without_initializer_is_nil() {
        let (output, _) = run_program("var x; print x;");
        assert_eq!(output, "nil\n");
    }

    #[test]
    fn test_block_shadowing() {
        let (output, _) = run_program("var a = 1; { var a = 2; print a; } print a;");
        assert_eq!(output, "2\n1\n");
    }

    #[test]
    fn test_assignment_value_and_target_scope() {
        let (output, _) = run_program("var a = 1; { a = 2; } print a;");
        assert_eq!(output, "2\n");
    }

    #[test]
    fn test_assignment_expression_yields_value() {
        let (output, _) = run_program("var a = 1; print a = 2;");
        assert_eq!(output, "2\n");
    }

    #[test]
    fn test_if_else() {
        let (output, _) =
            run_program("var x = 0; if (x == 0) print \"zero\"; else print \"nonzero\";");
        assert_eq!(output, "zero\n");
    }

    #[test]
    fn test_truthiness_of_zero_in_condition() {
        let (output, _) = run_program("if (0) print \"yes\"; else print \"no\";");
        assert_eq!(output, "yes\n");
    }

    #[test]
    fn test_while_loop() {
        let (output, _) = run_program("var i = 0; while (i < 3) { print i; i = i + 1; }");
        assert_eq!(output, "0\n1\n2\n");
    }

    #[test]
    fn test_for_loop_desugaring_runs() {
        let (output, _) = run_program("for (var i = 0; i < 3; i = i + 1) print i;");
        assert_eq!(output, "0\n1\n2\n");
    }

    #[test]
    fn test_short_circuit_skips_side_effects() {
        let (output, _) = run_program(
            "var a = \"unchanged\";\n\
             false and (a = \"changed\");\n\
             true or (a = \"also changed\");\n\
             print a;",
        );
        assert_eq!(output, "unchanged\n");
    }

    #[test]
    fn test_undefined_variable_read() {
        let (output, result) = run_program("print a;");
        assert!(output.is_empty());
        match result {
            Err(EvalError::Runtime(err)) => {
                assert_eq!(err.message, "Undefined variable 'a'.");
                assert_eq!(err.line, 1);
            }
            other => panic!("expected a runtime error, got {other:?}"),
        }
    }

    #[test]
    fn test_undefined_variable_assignment() {
        let (_, result) = run_program("ghost = 1;");
        match result {
            Err(EvalError::Runtime(err)) => {
                assert_eq!(err.message, "Undefined variable 'ghost'.")
            }
            other => panic!("expected a runtime error, got {other:?}"),
        }
    }

    #[test]
    fn test_runtime_error_stops_execution() {
        let (output, result) = run_program("print 1; print -\"x\"; print 2;");
        assert_eq!(output, "1\n");
        assert!(matches!(result, Err(EvalError::Runtime(_))));
    }

    #[test]
    fn test_scope_restored_after_runtime_error_in_block() {
        let mut interpreter = Interpreter::with_output(Vec::new());

        let failing = parse_program("var a = 1; { var a = 2; print -\"x\"; }");
        assert!(interpreter.interpret(&failing).is_err());

        // The block's scope was discarded during unwinding; reads resolve
        // against the global binding again.
        let follow_up = parse_program("print a;");
        assert!(interpreter.interpret(&follow_up).is_ok());
        let output = String::from_utf8(interpreter.into_output()).expect("output is utf8");
        assert_eq!(output, "1\n");
    }

    #[test]
    fn test_deterministic_evaluation() {
        let source = "var n = 3; var acc = 1; while (n > 1) { acc = acc * n; n = n - 1; } print acc;";
        let (first, _) = run_program(source);
        let (second, _) = run_program(source);
        assert_eq!(first, second);
        assert_eq!(first, "6\n");
    }
}
