// valpipe/src/core/step.rs

//! Defines the structure for a single step within a pipeline.

use super::args::Args;
use std::fmt;
use std::sync::Arc;

/// Type alias for a step callable.
///
/// A callable receives the assembled [`Args`] (extra arguments with the threaded
/// value spliced in) and returns `Ok(Some(value))` to replace the threaded value,
/// or `Ok(None)` when it has no usable result, in which case the step's fallback
/// applies. Errors propagate out of `Pipeline::process` unmodified.
pub type StepFn<V, Err> = Arc<dyn Fn(&mut Args<V>) -> Result<Option<V>, Err> + Send + Sync + 'static>;

/// Zero-argument producer used by [`Fallback::Supplier`].
pub type Supplier<V> = Arc<dyn Fn() -> V + Send + Sync + 'static>;

/// What a step invokes.
pub enum Target<V, Err> {
  /// A callable invoked as-is.
  Callable(StepFn<V, Err>),
  /// A method name resolved at run time against the pipeline's scope or its
  /// free-function table.
  Method(String),
}

impl<V, Err> Clone for Target<V, Err> {
  fn clone(&self) -> Self {
    match self {
      Target::Callable(f) => Target::Callable(Arc::clone(f)),
      Target::Method(name) => Target::Method(name.clone()),
    }
  }
}

impl<V, Err> fmt::Debug for Target<V, Err> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Target::Callable(_) => f.write_str("Callable(<fn>)"),
      Target::Method(name) => f.debug_tuple("Method").field(name).finish(),
    }
  }
}

impl<V, Err> fmt::Display for Target<V, Err> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Target::Callable(_) => f.write_str("<callable>"),
      Target::Method(name) => f.write_str(name),
    }
  }
}

/// Value substituted when a step yields no result.
///
/// Kept as a tagged union so a literal is never mistaken for something to call.
pub enum Fallback<V> {
  Literal(V),
  Supplier(Supplier<V>),
}

impl<V: Clone> Fallback<V> {
  /// Produces the fallback value, invoking the supplier if there is one.
  pub fn resolve(&self) -> V {
    match self {
      Fallback::Literal(value) => value.clone(),
      Fallback::Supplier(supplier) => supplier(),
    }
  }
}

impl<V: Clone> Clone for Fallback<V> {
  fn clone(&self) -> Self {
    match self {
      Fallback::Literal(value) => Fallback::Literal(value.clone()),
      Fallback::Supplier(supplier) => Fallback::Supplier(Arc::clone(supplier)),
    }
  }
}

impl<V: fmt::Debug> fmt::Debug for Fallback<V> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Fallback::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
      Fallback::Supplier(_) => f.write_str("Supplier(<fn>)"),
    }
  }
}

impl<V> From<V> for Fallback<V> {
  fn from(value: V) -> Self {
    Fallback::Literal(value)
  }
}

/// One registered operation of a pipeline.
pub struct Step<V, Err> {
  pub target: Target<V, Err>,
  /// Caller-supplied arguments, excluding the threaded value.
  pub args: Vec<V>,
  /// Index in the final argument list where the threaded value is inserted.
  pub position: usize,
  pub fallback: Option<Fallback<V>>,
  pub by_reference: bool,
  /// Only meaningful for `Target::Method`: resolve against the scope (true)
  /// or as a free function (false).
  pub use_scope: bool,
}

impl<V: fmt::Debug, Err> fmt::Debug for Step<V, Err> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Step")
      .field("target", &self.target)
      .field("args", &self.args)
      .field("position", &self.position)
      .field("fallback", &self.fallback)
      .field("by_reference", &self.by_reference)
      .field("use_scope", &self.use_scope)
      .finish()
  }
}
