//! The executor boundary and the registry executors are selected from.
mod executor_provider;
mod pipe;
mod registry;

pub use executor_provider::*;
pub use pipe::*;
pub use registry::*;
