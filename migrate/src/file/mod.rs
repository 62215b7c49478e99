//! Change file discovery and resolution.
//!
//! Change files follow the naming convention
//! `<version>_<label>.<up|down>.<extension>`. Discovery parses every matching
//! file in a directory, pairs forward and reverse files sharing a version into
//! [`ChangeUnit`]s, and the resolver computes which of them to run for a
//! requested move.
mod change_file;
pub mod excerpt;
mod identity;
mod pairer;
mod resolver;
mod version;

pub use change_file::*;
pub use identity::*;
pub use pairer::*;
pub use resolver::*;
pub use version::*;
