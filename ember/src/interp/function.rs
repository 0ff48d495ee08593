//! Functions: user-defined closures and host built-ins

use super::env::Environment;
use super::error::{InterpResult, RuntimeError};
use super::host::Host;
use super::value::Value;
use crate::ast::{DeclKind, Expr, Spanned};
use std::fmt;
use std::rc::Rc;

#[derive(Debug)]
pub enum Function {
    UserDefined(Closure),
    BuiltIn(Builtin),
}

/// Result of calling a function
#[derive(Debug)]
pub enum CallOutcome {
    /// Built-ins finish immediately
    Ready(Value),
    /// User-defined calls hand back their body for the caller to force
    Deferred(DeferredCall),
}

impl Function {
    pub fn name(&self) -> Option<&str> {
        match self {
            Function::UserDefined(closure) => closure.name.as_deref(),
            Function::BuiltIn(builtin) => Some(builtin.name()),
        }
    }

    /// Call with positional arguments
    pub fn call(self: &Rc<Self>, args: Vec<Value>, host: &mut Host) -> InterpResult<CallOutcome> {
        match self.as_ref() {
            Function::BuiltIn(builtin) => builtin.call(&args, host).map(CallOutcome::Ready),
            Function::UserDefined(closure) => {
                if args.len() > closure.params.len() {
                    return Err(RuntimeError::arity_mismatch(
                        self.name().unwrap_or("<anonymous>"),
                        closure.params.len(),
                        args.len(),
                    ));
                }

                // Fresh frame per call: the captured snapshot itself never changes
                let mut frame = closure.env.snapshot();
                if let Some(name) = &closure.name {
                    frame.define(name.as_str(), Value::Function(Rc::clone(self)));
                }
                for (param, arg) in closure.params.iter().zip(args) {
                    frame.define(param.as_str(), arg);
                }

                Ok(CallOutcome::Deferred(DeferredCall {
                    body: Rc::clone(&closure.body),
                    frame,
                }))
            }
        }
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Function::UserDefined(Closure { name: Some(name), .. }) => {
                write!(f, "<function {name}>")
            }
            Function::UserDefined(_) => write!(f, "<function>"),
            Function::BuiltIn(builtin) => write!(f, "<built-in function {}>", builtin.name()),
        }
    }
}

/// A user-defined function and the frame it closed over
#[derive(Debug)]
pub struct Closure {
    /// Set when the literal is assigned directly to a name
    pub name: Option<String>,
    pub params: Vec<String>,
    pub body: Rc<Spanned<Expr>>,
    /// Defining frame as of definition time, plus null parameters
    pub env: Environment,
}

impl Closure {
    pub fn new(
        name: Option<String>,
        params: Vec<String>,
        body: Rc<Spanned<Expr>>,
        defining: &Environment,
    ) -> Self {
        let mut env = defining.snapshot();
        for param in &params {
            env.define(param.as_str(), Value::Null);
        }
        Closure {
            name,
            params,
            body,
            env,
        }
    }
}

/// A function body paired with the frame it has to run in
///
/// Consumed when forced, so it runs at most once.
#[derive(Debug)]
pub struct DeferredCall {
    body: Rc<Spanned<Expr>>,
    frame: Environment,
}

impl DeferredCall {
    pub fn body(&self) -> &Spanned<Expr> {
        &self.body
    }

    pub fn frame(&self) -> &Environment {
        &self.frame
    }

    pub fn into_parts(self) -> (Rc<Spanned<Expr>>, Environment) {
        (self.body, self.frame)
    }
}

/// Host-implemented functions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Print,
    Input,
    Rand,
}

impl Builtin {
    pub const ALL: [Builtin; 3] = [Builtin::Print, Builtin::Input, Builtin::Rand];

    pub fn name(self) -> &'static str {
        match self {
            Builtin::Print => "print",
            Builtin::Input => "input",
            Builtin::Rand => "rand",
        }
    }

    pub fn call(self, args: &[Value], host: &mut Host) -> InterpResult<Value> {
        let [arg] = args else {
            return Err(RuntimeError::arity_mismatch(self.name(), 1, args.len()));
        };

        match self {
            Builtin::Print => {
                host.write_line(&arg.repr())
                    .map_err(|e| RuntimeError::io_error(&e))?;
                Ok(arg.clone())
            }
            Builtin::Input => {
                let line = host
                    .prompt(&arg.repr())
                    .map_err(|e| RuntimeError::io_error(&e))?;
                Ok(Value::string(line))
            }
            Builtin::Rand => {
                let n = arg
                    .as_number()
                    .ok_or_else(|| RuntimeError::type_error("Number", arg.type_name()))?;
                let upper = n.floor();
                if upper.is_nan() || upper < 1.0 {
                    return Err(RuntimeError::invalid_argument(format!(
                        "rand expects an upper bound of at least 1, got {arg}"
                    )));
                }
                // `as` saturates, so huge bounds clamp to i64::MAX
                Ok(Value::Number(host.rand_int(upper as i64) as f64))
            }
        }
    }
}

/// Bindings every root frame starts with, all locked
pub fn prelude() -> Environment {
    let mut env = Environment::new();
    for builtin in Builtin::ALL {
        env.set(
            builtin.name(),
            Value::Function(Rc::new(Function::BuiltIn(builtin))),
            DeclKind::Const,
        );
    }
    env.set("true", Value::Boolean(true), DeclKind::Const);
    env.set("false", Value::Boolean(false), DeclKind::Const);
    env.set("null", Value::Null, DeclKind::Const);
    env
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Span;
    use crate::interp::host::Capture;
    use crate::interp::ErrorKind;
    use std::io;

    fn quiet_host() -> Host {
        Host::new(io::empty(), io::sink()).with_seed(1)
    }

    fn body(expr: Expr) -> Rc<Spanned<Expr>> {
        Rc::new(Spanned::new(expr, Span::new(0, 0)))
    }

    #[test]
    fn test_prelude_bindings_are_locked() {
        let env = prelude();
        for name in ["print", "input", "rand", "true", "false", "null"] {
            assert!(env.is_locked(name), "{name} should be locked");
        }
        assert_eq!(env.get("true").unwrap(), Value::Boolean(true));
        assert_eq!(env.get("null").unwrap(), Value::Null);
    }

    #[test]
    fn test_print_writes_repr_and_returns_value() {
        let out = Capture::new();
        let mut host = Host::new(io::empty(), out.clone());
        let result = Builtin::Print.call(&[Value::Number(3.0)], &mut host).unwrap();
        assert_eq!(result, Value::Number(3.0));
        assert_eq!(out.contents(), "3\n");
    }

    #[test]
    fn test_input_returns_string() {
        let out = Capture::new();
        let mut host = Host::new(io::Cursor::new("42\n"), out.clone());
        let result = Builtin::Input.call(&[Value::string("n: ")], &mut host).unwrap();
        assert_eq!(result, Value::string("42"));
        assert_eq!(out.contents(), "n: ");
    }

    #[test]
    fn test_rand_range_and_errors() {
        let mut host = quiet_host();
        for _ in 0..50 {
            let n = Builtin::Rand
                .call(&[Value::Number(3.7)], &mut host)
                .unwrap()
                .as_number()
                .unwrap();
            assert!([1.0, 2.0, 3.0].contains(&n));
        }

        let err = Builtin::Rand.call(&[Value::string("6")], &mut host).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeMismatch);

        let err = Builtin::Rand.call(&[Value::Number(0.5)], &mut host).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_builtin_arity() {
        let err = Builtin::Print.call(&[], &mut quiet_host()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::ArityMismatch);
    }

    #[test]
    fn test_closure_snapshot_has_null_params() {
        let mut defining = Environment::new();
        defining.set("k", Value::Number(1.0), DeclKind::Let);
        let closure = Closure::new(None, vec!["a".to_string()], body(Expr::Var("a".to_string())), &defining);

        defining.set("late", Value::Number(2.0), DeclKind::Let);

        assert_eq!(closure.env.get("a").unwrap(), Value::Null);
        assert_eq!(closure.env.get("k").unwrap(), Value::Number(1.0));
        assert!(!closure.env.contains("late"));
    }

    #[test]
    fn test_user_call_builds_frame_without_touching_closure() {
        let closure = Closure::new(
            Some("id".to_string()),
            vec!["a".to_string(), "b".to_string()],
            body(Expr::Var("a".to_string())),
            &Environment::new(),
        );
        let func = Rc::new(Function::UserDefined(closure));

        let outcome = func.call(vec![Value::Number(9.0)], &mut quiet_host()).unwrap();
        let CallOutcome::Deferred(deferred) = outcome else {
            panic!("user functions defer their body");
        };
        assert_eq!(deferred.frame().get("a").unwrap(), Value::Number(9.0));
        assert_eq!(deferred.frame().get("b").unwrap(), Value::Null);
        assert!(matches!(deferred.frame().get("id").unwrap(), Value::Function(_)));
        assert_eq!(deferred.body().node, Expr::Var("a".to_string()));

        let Function::UserDefined(closure) = func.as_ref() else {
            unreachable!()
        };
        assert_eq!(closure.env.get("a").unwrap(), Value::Null);
    }

    #[test]
    fn test_user_call_too_many_args() {
        let closure = Closure::new(None, vec![], body(Expr::Number(1.0)), &Environment::new());
        let func = Rc::new(Function::UserDefined(closure));
        let err = func.call(vec![Value::Null], &mut quiet_host()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::ArityMismatch);
    }

    #[test]
    fn test_function_display() {
        let anon = Function::UserDefined(Closure::new(None, vec![], body(Expr::Number(1.0)), &Environment::new()));
        assert_eq!(anon.to_string(), "<function>");
        assert_eq!(Function::BuiltIn(Builtin::Rand).to_string(), "<built-in function rand>");
        assert_eq!(Function::BuiltIn(Builtin::Input).name(), Some("input"));
    }
}
