//! Environment for variable bindings

use super::error::{InterpResult, RuntimeError};
use super::Value;
use crate::ast::DeclKind;
use std::collections::{HashMap, HashSet};

/// One scope frame: bindings plus the names locked as constants
#[derive(Debug, Clone, Default)]
pub struct Environment {
    bindings: HashMap<String, Value>,
    locked: HashSet<String>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a name in this frame
    pub fn get(&self, name: &str) -> InterpResult<Value> {
        self.bindings
            .get(name)
            .cloned()
            .ok_or_else(|| RuntimeError::name_error(name))
    }

    /// Write a binding, honouring locks
    ///
    /// Returns `false` when the name is locked; the old value stays and the
    /// violation is logged. A `Const` write locks the name.
    pub fn set(&mut self, name: &str, value: Value, kind: DeclKind) -> bool {
        if self.locked.contains(name) {
            let violation = RuntimeError::constant_violation(name);
            tracing::warn!(name, "{}", violation.message);
            return false;
        }
        self.bindings.insert(name.to_string(), value);
        if kind == DeclKind::Const {
            self.locked.insert(name.to_string());
        }
        true
    }

    /// Bind unconditionally, clearing any lock on the name
    ///
    /// Used for parameters, which shadow whatever the closure captured.
    pub fn define(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        self.locked.remove(&name);
        self.bindings.insert(name, value);
    }

    /// Independent copy of this frame, locks included
    pub fn snapshot(&self) -> Environment {
        self.clone()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    pub fn is_locked(&self, name: &str) -> bool {
        self.locked.contains(name)
    }

    /// Get all bindings (for the REPL's `:env`)
    pub fn bindings(&self) -> &HashMap<String, Value> {
        &self.bindings
    }
}
