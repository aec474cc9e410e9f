//! Core traits for distill collaborators.

mod completion;

pub use completion::*;
