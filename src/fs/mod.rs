//! Filesystem helpers.

pub mod naming;

pub use naming::sanitize_filename;
