// valpipe/src/pipeline/mod.rs

//! Defines the `Pipeline<V, Err>` struct, its fluent construction and step
//! configuration, and the `process` driver.

pub mod definition;
pub mod execution;

// Re-export the main Pipeline struct
pub use definition::Pipeline;
