//! Output generation for the formatted post and the run archive.
//!
//! # Submodules
//!
//! - [`post`]: Renders a ranked selection into the social media post text
//! - [`json`]: Writes an optional JSON archive of each run

pub mod json;
pub mod post;
