// valpipe/src/pipeline/definition.rs

//! Contains the `Pipeline<V, Err>` struct definition and the fluent methods for
//! its construction and step configuration.

use crate::core::args::Args;
use crate::core::step::{Fallback, Step, StepFn, Target};
use crate::error::{PipeError, PipeResult};
use crate::scope::MethodTable;
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use tracing::{event, Level};

/// A value pipeline, generic over the threaded value type `V` and the error type
/// `Err` that its step callables return.
///
/// `Err` must be `From<PipeError>` so that engine-side failures raised while
/// processing (unknown method, missing argument, no result) surface through the
/// same error type as the steps' own failures.
///
/// Configuration calls (`default`, `data_position`, `referencable`,
/// `without_scope`) always target the most recently appended step and fail with
/// [`PipeError::EmptyStack`] before the first `pipe`.
pub struct Pipeline<V, Err = PipeError>
where
  V: Clone + 'static,
  Err: std::error::Error + From<PipeError> + Send + Sync + 'static,
{
  /// The threaded value.
  pub(crate) current: V,
  /// Pending steps in execution order.
  pub(crate) steps: VecDeque<Step<V, Err>>,

  pub(crate) default_position: usize,
  pub(crate) default_fallback: Option<Fallback<V>>,

  /// Scope for method-name steps, unless a step opts out.
  pub(crate) scope: Option<Arc<MethodTable<V, Err>>>,
  /// Free functions for method-name steps that bypass the scope.
  pub(crate) functions: Arc<MethodTable<V, Err>>,
}

impl<V, Err> Pipeline<V, Err>
where
  V: Clone + 'static,
  Err: std::error::Error + From<PipeError> + Send + Sync + 'static,
{
  /// Creates a pipeline seeded with `initial`, no scope, an empty free-function
  /// table, insert position 0 and no default fallback.
  pub fn new(initial: V) -> Self {
    Self {
      current: initial,
      steps: VecDeque::new(),
      default_position: 0,
      default_fallback: None,
      scope: None,
      functions: Arc::new(MethodTable::new("global")),
    }
  }

  // --- Construction options ---

  /// Binds the scope that method-name steps resolve against.
  pub fn with_scope(mut self, scope: impl Into<Arc<MethodTable<V, Err>>>) -> Self {
    self.scope = Some(scope.into());
    self
  }

  /// Replaces the free-function table used by unscoped method-name steps.
  pub fn with_functions(mut self, functions: impl Into<Arc<MethodTable<V, Err>>>) -> Self {
    self.functions = functions.into();
    self
  }

  /// Insert position applied to every step registered afterwards.
  pub fn with_data_position(mut self, position: usize) -> Self {
    self.default_position = position;
    self
  }

  /// Literal fallback seeded into every step registered afterwards.
  pub fn with_default(mut self, value: V) -> Self {
    self.default_fallback = Some(Fallback::Literal(value));
    self
  }

  /// Supplier fallback seeded into every step registered afterwards.
  pub fn with_default_supplier(mut self, supplier: impl Fn() -> V + Send + Sync + 'static) -> Self {
    self.default_fallback = Some(Fallback::Supplier(Arc::new(supplier)));
    self
  }

  // --- Step registration ---

  /// Appends a step invoking `f`, with `args` as its extra arguments.
  pub fn pipe(
    &mut self,
    f: impl Fn(&mut Args<V>) -> Result<Option<V>, Err> + Send + Sync + 'static,
    args: impl IntoIterator<Item = V>,
  ) -> &mut Self {
    let f: StepFn<V, Err> = Arc::new(f);
    self.pipe_target(Target::Callable(f), args)
  }

  /// Appends a step invoking the method `name`, resolved when the pipeline runs.
  pub fn pipe_method(&mut self, name: impl Into<String>, args: impl IntoIterator<Item = V>) -> &mut Self {
    self.pipe_target(Target::Method(name.into()), args)
  }

  /// Appends a step for an already built [`Target`], e.g. a shared `StepFn`.
  pub fn pipe_target(&mut self, target: Target<V, Err>, args: impl IntoIterator<Item = V>) -> &mut Self {
    let step = Step {
      target,
      args: args.into_iter().collect(),
      position: self.default_position,
      fallback: self.default_fallback.clone(),
      by_reference: false,
      use_scope: true,
    };
    event!(Level::TRACE, callee = %step.target, num_args = step.args.len(), "Step appended.");
    self.steps.push_back(step);
    self
  }

  // --- Configuration of the last appended step ---

  fn last_step_mut(&mut self, operation: &'static str) -> PipeResult<&mut Step<V, Err>> {
    match self.steps.back_mut() {
      Some(step) => Ok(step),
      None => {
        event!(Level::WARN, operation, "Step configuration called before any step was piped.");
        Err(PipeError::EmptyStack)
      }
    }
  }

  /// Sets a literal fallback on the last appended step.
  pub fn default(&mut self, value: V) -> PipeResult<&mut Self> {
    self.last_step_mut("default")?.fallback = Some(Fallback::Literal(value));
    Ok(self)
  }

  /// Sets a supplier fallback on the last appended step. The supplier runs only
  /// when the step yields no result.
  pub fn default_with(&mut self, supplier: impl Fn() -> V + Send + Sync + 'static) -> PipeResult<&mut Self> {
    self.last_step_mut("default_with")?.fallback = Some(Fallback::Supplier(Arc::new(supplier)));
    Ok(self)
  }

  /// Sets where the threaded value is inserted among the last step's arguments.
  /// Positions past the end of the extra arguments append the value.
  pub fn data_position(&mut self, position: isize) -> PipeResult<&mut Self> {
    let position = usize::try_from(position).map_err(|_| {
      event!(Level::WARN, position, "Rejected negative data position.");
      PipeError::InvalidPosition { position }
    })?;
    self.last_step_mut("data_position")?.position = position;
    Ok(self)
  }

  /// Hands the threaded value to the last step by mutable reference; in-place
  /// mutation is kept when the step returns `None`.
  pub fn referencable(&mut self) -> PipeResult<&mut Self> {
    self.last_step_mut("referencable")?.by_reference = true;
    Ok(self)
  }

  /// Resolves the last step's method name as a free function instead of
  /// against the scope. Has no effect on callable steps.
  pub fn without_scope(&mut self) -> PipeResult<&mut Self> {
    self.last_step_mut("without_scope")?.use_scope = false;
    Ok(self)
  }

  // --- Accessors ---

  /// The current threaded value.
  pub fn value(&self) -> &V {
    &self.current
  }

  pub fn into_value(self) -> V {
    self.current
  }

  /// Whether any registered step has yet to run.
  pub fn has_pending(&self) -> bool {
    !self.steps.is_empty()
  }
}

impl<V, Err> fmt::Debug for Pipeline<V, Err>
where
  V: Clone + fmt::Debug + 'static,
  Err: std::error::Error + From<PipeError> + Send + Sync + 'static,
{
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Pipeline")
      .field("current", &self.current)
      .field("pending_steps", &self.steps.len())
      .field("default_position", &self.default_position)
      .field("scope", &self.scope.as_ref().map(|s| s.name()))
      .finish()
  }
}
