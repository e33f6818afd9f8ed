pub mod args;
pub mod step;

// Re-export key types for easier access from other valpipe modules (and lib.rs)
pub use args::Args;
pub use step::{Fallback, Step, StepFn, Supplier, Target};
