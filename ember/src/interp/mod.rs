//! Ember interpreter
//!
//! Tree-walking evaluator over the parsed AST. Each user-defined call runs
//! in a fresh frame built from the closure's definition-time snapshot, so
//! lookups only ever consult the top frame of the call stack.

mod env;
mod error;
mod eval;
pub mod function;
pub mod host;
mod ops;
mod scope;
mod value;

pub use env::Environment;
pub use error::{ErrorKind, InterpResult, RuntimeError};
pub use eval::{Interpreter, MAX_CALL_DEPTH};
pub use function::{prelude, Builtin, CallOutcome, Closure, DeferredCall, Function};
pub use host::{Capture, Host};
pub use ops::apply;
pub use scope::CallStack;
pub use value::Value;
