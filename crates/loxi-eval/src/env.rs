//! Lexical scope chain.
//!
//! Scopes live in an arena (`Vec<Scope>`) and point to their parent by
//! index; the environment tracks which scope is current. Entering a block
//! takes a snapshot and exiting restores it, so scope release happens on
//! error paths exactly as on normal exit. Scopes die in LIFO order, which
//! is why plain indices are enough here: no scope outlives the block that
//! created it.

use crate::error::RuntimeError;
use crate::value::Value;
use loxi_lex::Token;
use loxi_util::FxHashMap;

/// One lexical scope: its bindings and the index of its parent.
struct Scope {
    values: FxHashMap<String, Value>,
    parent: Option<usize>,
}

/// The scope chain for one program run.
///
/// The global scope is created up front and lives for the whole run;
/// block scopes are pushed on entry and discarded on exit.
pub struct Environment {
    scopes: Vec<Scope>,
    /// Index of the innermost live scope
    current: usize,
}

/// Saved environment state, restored when a block exits.
#[derive(Clone, Copy, Debug)]
pub struct EnvSnapshot {
    current: usize,
    len: usize,
}

impl Environment {
    /// Creates an environment holding only the global scope.
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope {
                values: FxHashMap::default(),
                parent: None,
            }],
            current: 0,
        }
    }

    /// Defines `name` in the innermost scope.
    ///
    /// Redefinition in the same scope is permitted and replaces the old
    /// binding.
    pub fn define(&mut self, name: &str, value: Value) {
        self.scopes[self.current]
            .values
            .insert(name.to_string(), value);
    }

    /// Reads a variable, searching scopes from the innermost outward.
    pub fn get(&self, name: &Token) -> Result<Value, RuntimeError> {
        let mut scope = Some(self.current);
        while let Some(index) = scope {
            if let Some(value) = self.scopes[index].values.get(&name.lexeme) {
                return Ok(value.clone());
            }
            scope = self.scopes[index].parent;
        }

        Err(RuntimeError::new(
            name,
            format!("Undefined variable '{}'.", name.lexeme),
        ))
    }

    /// Assigns to an existing variable in the nearest scope defining it.
    ///
    /// Unlike [`define`](Self::define), assignment never creates a
    /// binding; assigning to an undefined name is a runtime error.
    pub fn assign(&mut self, name: &Token, value: Value) -> Result<(), RuntimeError> {
        let mut scope = Some(self.current);
        while let Some(index) = scope {
            if self.scopes[index].values.contains_key(&name.lexeme) {
                self.scopes[index].values.insert(name.lexeme.clone(), value);
                return Ok(());
            }
            scope = self.scopes[index].parent;
        }

        Err(RuntimeError::new(
            name,
            format!("Undefined variable '{}'.", name.lexeme),
        ))
    }

    /// Enters a fresh child scope of the current one.
    ///
    /// Returns the snapshot to pass to [`exit_scope`](Self::exit_scope)
    /// when the block finishes, normally or by unwinding.
    pub fn enter_scope(&mut self) -> EnvSnapshot {
        let snapshot = EnvSnapshot {
            current: self.current,
            len: self.scopes.len(),
        };

        self.scopes.push(Scope {
            values: FxHashMap::default(),
            parent: Some(self.current),
        });
        self.current = self.scopes.len() - 1;

        snapshot
    }

    /// Restores the environment to a snapshot, discarding every scope
    /// entered since it was taken.
    pub fn exit_scope(&mut self, snapshot: EnvSnapshot) {
        self.current = snapshot.current;
        self.scopes.truncate(snapshot.len);
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
