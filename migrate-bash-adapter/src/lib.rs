//! Bash executor for `migrate`: runs `<version>_<label>.<up|down>.sh` change
//! files through `bash`.
mod config;
mod error;
mod executor;
mod module;

pub use config::*;
pub use error::*;
pub use executor::*;
pub use module::*;
