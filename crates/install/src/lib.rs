#![warn(clippy::pedantic)]
#![deny(clippy::all)]

//! Formula installation for keg
//!
//! This crate owns the whole install pipeline: acquiring the source tree
//! (verified archive or head clone), delegating the actual installation to
//! pip inside the formula's private `libexec`, writing the launcher script
//! into the shared `bin`, and running the post-install smoke test.
//!
//! The install and test procedures themselves are plain functions over an
//! explicit [`InstallContext`] - no ambient path variables.

mod context;
mod installer;
mod launcher;
mod procedures;
mod source;

pub use context::{InstallContext, Layout};
pub use installer::{InstallOptions, InstallReport, Installer};
pub use launcher::{render_launcher, write_launcher};
pub use procedures::{install, smoke_test};
pub use source::{clone_head, extract_tar_gz, resolve_source, verify_archive, ResolvedSource};
