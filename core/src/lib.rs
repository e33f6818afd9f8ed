// valpipe/src/lib.rs

//! valpipe: a fluent, type-safe value pipeline for Rust.
//!
//! A `Pipeline` threads a single evolving value through an ordered stack of
//! steps, with:
//!  - Plain callables or method names resolved against a shared `MethodTable`
//!    (the pipeline's scope), with a per-step opt-out to free functions.
//!  - Configurable placement of the threaded value among each step's arguments.
//!  - By-reference steps whose in-place mutation carries forward.
//!  - Literal or supplier fallbacks for steps that yield no result.

pub mod core;
pub mod error;
pub mod pipeline;
pub mod scope;

// --- Re-exports for the Public API ---

pub use crate::core::args::Args;
pub use crate::core::step::{Fallback, StepFn, Supplier, Target};

pub use crate::pipeline::definition::Pipeline;
pub use crate::scope::MethodTable;

pub use crate::error::{PipeError, PipeResult};

/*
    Core Workflow:
    1. Create a `Pipeline<V, Err>` seeded with the starting value, optionally
       `.with_scope(..)`, `.with_data_position(..)`, `.with_default(..)`.
    2. Register steps with `.pipe(callable, args)` or `.pipe_method(name, args)`.
    3. Tune the step just added: `.data_position(n)?`, `.default(v)?`,
       `.referencable()?`, `.without_scope()?`.
    4. Call `.process()` to drain the steps and get the final value.
*/
