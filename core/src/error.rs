// valpipe/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipeError {
  #[error("Stack can not be empty: call `pipe` before configuring a step")]
  EmptyStack,

  #[error("Position cannot be less than zero (got {position})")]
  InvalidPosition { position: isize },

  #[error("Method '{method}' is not defined on scope '{scope}'")]
  UnknownMethod { scope: String, method: String },

  #[error("Function '{name}' is not registered")]
  UnknownFunction { name: String },

  #[error("Missing argument at index {index} (step received {arity} arguments)")]
  MissingArgument { index: usize, arity: usize },

  #[error("Step {step_index} returned no value and has no fallback")]
  NoResult { step_index: usize },

  #[error("Error in user-provided step. Source: {source}")]
  Step {
    #[source]
    source: AnyhowError,
  },
}

// Lets anyhow-based callables run in a `Pipeline<V, PipeError>`.
impl From<AnyhowError> for PipeError {
  fn from(err: AnyhowError) -> Self {
    // Unwrap a PipeError that was boxed into anyhow instead of nesting it.
    match err.downcast::<PipeError>() {
      Ok(pipe_err) => pipe_err,
      Err(source) => PipeError::Step { source },
    }
  }
}

pub type PipeResult<T, E = PipeError> = std::result::Result<T, E>;
