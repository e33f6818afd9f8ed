// valpipe/src/scope.rs

//! Defines `MethodTable<V, Err>`, a name-keyed registry of step callables.
//!
//! A table plays two roles for a pipeline: the *scope* that method-name steps
//! resolve against, and the *free-function* table used when a step bypasses the
//! scope. Tables are shared through `Arc`, so one table can back many pipelines,
//! and methods may be registered after the table is attached.

use crate::core::args::Args;
use crate::core::step::StepFn;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{event, Level};

pub struct MethodTable<V, Err> {
  name: String,
  methods: RwLock<HashMap<String, StepFn<V, Err>>>,
}

impl<V, Err> MethodTable<V, Err>
where
  V: 'static,
  Err: 'static,
{
  /// Creates a new, empty table. `name` identifies the table in errors and logs.
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      methods: RwLock::new(HashMap::new()),
    }
  }

  /// Builder-style registration, for tables assembled up front.
  pub fn with_method(
    self,
    method: impl Into<String>,
    f: impl Fn(&mut Args<V>) -> Result<Option<V>, Err> + Send + Sync + 'static,
  ) -> Self {
    self.register(method, f);
    self
  }

  /// Registers `f` under `method`, replacing any previous entry.
  /// Returns `true` if an existing method was replaced.
  pub fn register(
    &self,
    method: impl Into<String>,
    f: impl Fn(&mut Args<V>) -> Result<Option<V>, Err> + Send + Sync + 'static,
  ) -> bool {
    let method = method.into();
    let replaced = self.methods.write().insert(method.clone(), Arc::new(f)).is_some();
    if replaced {
      event!(Level::WARN, table = %self.name, method = %method, "Method re-registered, previous entry replaced.");
    } else {
      event!(Level::TRACE, table = %self.name, method = %method, "Method registered.");
    }
    replaced
  }

  pub fn contains(&self, method: &str) -> bool {
    self.methods.read().contains_key(method)
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn len(&self) -> usize {
    self.methods.read().len()
  }

  pub fn is_empty(&self) -> bool {
    self.methods.read().is_empty()
  }

  // The lock is released before the callable runs, so a method may register
  // further methods on its own table.
  pub(crate) fn resolve(&self, method: &str) -> Option<StepFn<V, Err>> {
    self.methods.read().get(method).cloned()
  }
}

impl<V, Err> fmt::Debug for MethodTable<V, Err> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let methods = self.methods.read();
    let mut names: Vec<&String> = methods.keys().collect();
    names.sort();
    f.debug_struct("MethodTable")
      .field("name", &self.name)
      .field("methods", &names)
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::PipeError;

  fn upper(args: &mut Args<String>) -> Result<Option<String>, PipeError> {
    Ok(Some(args.data().to_uppercase()))
  }

  #[test]
  fn registers_and_resolves_methods() {
    let table = MethodTable::<String, PipeError>::new("Str").with_method("upper", upper);
    assert!(table.contains("upper"));
    assert!(!table.contains("lower"));
    assert_eq!(table.len(), 1);
    assert_eq!(table.name(), "Str");

    let f = table.resolve("upper").expect("upper should resolve");
    let mut args = Args::assemble(&[], "abc".to_string(), 0);
    assert_eq!(f(&mut args).unwrap(), Some("ABC".to_string()));
  }

  #[test]
  fn register_reports_replacement() {
    let table = MethodTable::<String, PipeError>::new("Str");
    assert!(table.is_empty());
    assert!(!table.register("upper", upper));
    assert!(table.register("upper", |_args: &mut Args<String>| Ok(None)));
    assert_eq!(table.len(), 1);
  }

  #[test]
  fn debug_lists_sorted_method_names() {
    let table = MethodTable::<String, PipeError>::new("Str")
      .with_method("b", upper)
      .with_method("a", upper);
    assert_eq!(format!("{:?}", table), r#"MethodTable { name: "Str", methods: ["a", "b"] }"#);
  }
}
