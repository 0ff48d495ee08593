//! Expression evaluator

use super::env::Environment;
use super::error::{InterpResult, RuntimeError};
use super::function::{prelude, CallOutcome, Closure, DeferredCall, Function};
use super::host::Host;
use super::ops;
use super::scope::CallStack;
use super::value::Value;
use crate::ast::{Expr, Program, Spanned};
use std::rc::Rc;

/// Default limit on nested calls
pub const MAX_CALL_DEPTH: usize = 10_000;

/// Stack growth parameters for deep recursion
const STACK_RED_ZONE: usize = 128 * 1024; // 128KB remaining triggers growth
const STACK_GROW_SIZE: usize = 4 * 1024 * 1024; // Grow by 4MB each time

/// The interpreter
pub struct Interpreter {
    /// Frames; the top one is the active scope
    stack: CallStack,
    /// Output, input and randomness for the built-ins
    host: Host,
    /// Frames allowed on the stack before raising a stack overflow
    max_depth: usize,
}

impl Interpreter {
    /// Create an interpreter wired to stdin/stdout
    pub fn new() -> Self {
        Self::with_host(Host::stdio())
    }

    pub fn with_host(host: Host) -> Self {
        Interpreter {
            stack: CallStack::new(prelude()),
            host,
            max_depth: MAX_CALL_DEPTH,
        }
    }

    pub fn with_call_limit(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Run a program, returning the value of its last expression
    ///
    /// An empty program evaluates to null. The first fatal error stops the run.
    pub fn run(&mut self, program: &Program) -> InterpResult<Value> {
        let mut last = Value::Null;
        for expr in &program.exprs {
            last = self.eval(expr)?;
        }
        Ok(last)
    }

    /// Evaluate a single expression (for REPL)
    pub fn eval_expr(&mut self, expr: &Spanned<Expr>) -> InterpResult<Value> {
        self.eval(expr)
    }

    /// Resolve a name in the active frame
    pub fn lookup(&self, name: &str) -> InterpResult<Value> {
        self.stack.current().get(name)
    }

    /// The root frame
    pub fn globals(&self) -> &Environment {
        self.stack.root()
    }

    /// Number of frames on the stack, root included
    pub fn depth(&self) -> usize {
        self.stack.depth()
    }

    /// Call a function value and force its result
    pub fn call_value(&mut self, callee: &Value, args: Vec<Value>) -> InterpResult<Value> {
        let Value::Function(func) = callee else {
            return Err(RuntimeError::not_callable(callee.type_name()));
        };
        tracing::debug!(function = func.name().unwrap_or("<anonymous>"), args = args.len(), "call");

        match func.call(args, &mut self.host)? {
            CallOutcome::Ready(value) => Ok(value),
            CallOutcome::Deferred(deferred) => self.force(deferred),
        }
    }

    /// Run a deferred body in its own frame
    ///
    /// The frame is popped again whether or not the body succeeds.
    pub fn force(&mut self, deferred: DeferredCall) -> InterpResult<Value> {
        if self.stack.depth() >= self.max_depth {
            return Err(RuntimeError::stack_overflow(self.max_depth));
        }

        let (body, frame) = deferred.into_parts();
        let depth = self.stack.push(frame);
        tracing::debug!(depth, "push frame");

        let result = self.eval(&body);

        self.stack.pop();
        tracing::debug!(depth = depth - 1, "pop frame");
        result
    }

    /// Evaluate an expression with automatic stack growth for deep recursion
    fn eval(&mut self, expr: &Spanned<Expr>) -> InterpResult<Value> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || self.eval_inner(expr))
            .map_err(|e| e.at(expr.span))
    }

    fn eval_inner(&mut self, expr: &Spanned<Expr>) -> InterpResult<Value> {
        match &expr.node {
            Expr::Number(n) => Ok(Value::Number(*n)),
            Expr::Str(s) => Ok(Value::string(s.as_str())),

            Expr::Var(name) => self.lookup(name),

            // No short-circuit: && and || see both operands too
            Expr::Binary { left, op, right } => {
                let lval = self.eval(left)?;
                let rval = self.eval(right)?;
                tracing::trace!(%op, left = %lval, right = %rval, "binary");
                ops::apply(*op, &lval, &rval)
            }

            Expr::If {
                cond,
                then_branch,
                else_branch,
            } => {
                let cond_val = self.eval(cond)?;
                if matches!(cond_val, Value::Boolean(true)) {
                    self.eval(then_branch)
                } else {
                    self.eval(else_branch)
                }
            }

            Expr::Assign { kind, name, value } => {
                let val = match &value.node {
                    // Name the function so its body can call itself
                    Expr::Lambda { params, body } => {
                        self.make_function(Some(name.clone()), params, body)
                    }
                    _ => self.eval(value)?,
                };
                tracing::trace!(%kind, name = name.as_str(), "assign");
                // A rejected write still yields the reduced value
                self.stack.current_mut().set(name, val.clone(), *kind);
                Ok(val)
            }

            Expr::Lambda { params, body } => Ok(self.make_function(None, params, body)),

            Expr::Call { callee, args } => {
                let func = self.eval(callee)?;
                let mut arg_vals = Vec::with_capacity(args.len());
                for arg in args {
                    arg_vals.push(self.eval(arg)?);
                }
                self.call_value(&func, arg_vals)
            }
        }
    }

    fn make_function(
        &self,
        name: Option<String>,
        params: &[String],
        body: &Rc<Spanned<Expr>>,
    ) -> Value {
        let closure = Closure::new(name, params.to_vec(), Rc::clone(body), self.stack.current());
        Value::Function(Rc::new(Function::UserDefined(closure)))
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}
