//! Compilation driver
//!
//! Runs the pipeline over one tree at a time: the semantic pass attributes
//! the tree and collects diagnostics, then oil is generated unless an error
//! was reported. The three dumps come back together as [`Outputs`].

mod config;
mod session;

pub use config::{Config, Emit};
pub use session::{Outputs, Session};
