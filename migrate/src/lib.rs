//! # migrate - versioned change files for schema migrations
//!
//! `migrate` keeps track of which versioned change units have been applied to
//! a target, works out which ones must run next for a requested move and
//! hands each of them to a pluggable executor that performs the change.
//!
//! ## Change files
//!
//! A change unit is a pair of files sharing a version:
//!
//! ```text
//! 20060102150405_create_users.up.sh
//! 20060102150405_create_users.down.sh
//! ```
//!
//! The `up` file applies the change, the `down` file undoes it. Either side
//! may be missing. The extension belongs to the executor in use.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use migrate::migration::Migrator;
//!
//! let migrator = Migrator::builder()
//!     .source_dir("./migrations")
//!     .executor(executor)
//!     .open()?;
//!
//! migrator.up()?;          // apply everything pending
//! migrator.migrate(-1)?;   // revert the latest unit
//! println!("{:?}", migrator.version()?);
//! migrator.close()?;
//! ```
//!
//! ## Module Organization
//!
//! - [`file`] - Change file parsing, pairing and move resolution
//! - [`journal`] - The record of applied versions
//! - [`executor`] - The executor boundary and the executor registry
//! - [`migration`] - The driving loop
//! - [`migrator_config`] / [`migrator_builder`] - Configuration
//! - [`errors`] - Error types and result definitions
//! - [`common`] - Constants and shared utilities

pub mod common;
pub mod errors;
pub mod executor;
pub mod file;
pub mod journal;
pub mod migration;
pub mod migrator_builder;
pub mod migrator_config;

pub use migration::Migrator;
