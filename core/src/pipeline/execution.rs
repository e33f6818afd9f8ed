// valpipe/src/pipeline/execution.rs

//! Contains the `Pipeline::process()` method, which drains the pending steps and
//! threads the value through each of them.

use crate::core::args::Args;
use crate::core::step::{Step, StepFn, Target};
use crate::error::PipeError;
use crate::pipeline::definition::Pipeline;
use tracing::{event, instrument, span, Level};

impl<V, Err> Pipeline<V, Err>
where
  V: Clone + 'static,
  Err: std::error::Error + From<PipeError> + Send + Sync + 'static,
{
  /// Runs every pending step in insertion order and returns the final value.
  ///
  /// Each step is removed from the pipeline before it runs. If a step fails,
  /// its error is returned unchanged, the remaining steps are discarded, and the
  /// current value stays at what it was before the failing step. Once drained,
  /// calling `process` again returns the last value without invoking anything.
  #[instrument(
        name = "Pipeline::process",
        skip_all,
        fields(
            value_type = %std::any::type_name::<V>(),
            error_type = %std::any::type_name::<Err>(),
            num_steps = self.steps.len(),
        ),
        err(Display)
    )]
  pub fn process(&mut self) -> Result<V, Err> {
    event!(Level::DEBUG, "Pipeline processing starting.");

    let mut step_index = 0;
    while let Some(step) = self.steps.pop_front() {
      let step_span = span!(
        Level::INFO,
        "pipeline_step",
        step_index = step_index,
        callee = %step.target,
        position = step.position,
        by_reference = step.by_reference
      );
      let _step_span_guard = step_span.enter();

      match self.run_step(step_index, step) {
        Ok(value) => {
          self.current = value;
          event!(Level::DEBUG, "Step finished, threaded value updated.");
        }
        Err(e) => {
          let discarded = self.steps.len();
          self.steps.clear();
          event!(Level::ERROR, error = %e, discarded, "Step failed, remaining steps discarded.");
          return Err(e);
        }
      }
      step_index += 1;
    }

    event!(Level::DEBUG, "Pipeline processing completed.");
    Ok(self.current.clone())
  }

  fn run_step(&self, step_index: usize, step: Step<V, Err>) -> Result<V, Err> {
    let callable = self.resolve(&step).map_err(Err::from)?;

    // By-value steps get a copy; by-reference steps also work on a copy that is
    // read back below, so a failing step leaves `current` untouched.
    let mut args = Args::assemble(&step.args, self.current.clone(), step.position);
    event!(Level::TRACE, arity = args.len(), data_index = args.data_index(), "Invoking step.");

    match callable(&mut args)? {
      // A returned value wins over any in-place mutation.
      Some(value) => Ok(value),
      None if step.by_reference => {
        event!(Level::TRACE, "No return value, keeping in-place mutation.");
        Ok(args.into_data())
      }
      None => match &step.fallback {
        Some(fallback) => {
          event!(Level::DEBUG, "No return value, using fallback.");
          Ok(fallback.resolve())
        }
        None => Err(Err::from(PipeError::NoResult { step_index })),
      },
    }
  }

  fn resolve(&self, step: &Step<V, Err>) -> Result<StepFn<V, Err>, PipeError> {
    let name = match &step.target {
      Target::Callable(f) => return Ok(f.clone()),
      Target::Method(name) => name,
    };

    match &self.scope {
      Some(scope) if step.use_scope => {
        event!(Level::TRACE, scope = scope.name(), method = %name, "Resolving scoped method.");
        scope.resolve(name).ok_or_else(|| PipeError::UnknownMethod {
          scope: scope.name().to_string(),
          method: name.clone(),
        })
      }
      _ => {
        event!(Level::TRACE, function = %name, "Resolving free function.");
        self
          .functions
          .resolve(name)
          .ok_or_else(|| PipeError::UnknownFunction { name: name.clone() })
      }
    }
  }
}
