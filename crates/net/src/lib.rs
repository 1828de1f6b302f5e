#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! HTTP fetching for keg
//!
//! Source archives are downloaded through a pooled reqwest client with
//! bounded retries. Progress is reported through the event channel; the
//! integrity check against the formula digest happens in the install
//! pipeline, after the bytes are on disk.

mod client;
mod download;
mod validation;

pub use client::{NetClient, NetConfig};
pub use download::download_to_path;
pub use validation::validate_url;
