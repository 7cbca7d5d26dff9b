//! Batch acquisition.
//!
//! This module provides:
//! - Destination folder planning
//! - The bounded-concurrency batch orchestrator

pub mod orchestrator;
pub mod plan;

pub use orchestrator::{BatchDownloader, BatchReport, CancelHandle};
pub use plan::create_folder_structure;

/// Overall-progress callback, invoked with a 0..=100 percentage.
pub type ProgressHook<'a> = dyn Fn(u8) + Send + Sync + 'a;

/// Log-line callback for human-readable per-item and summary output.
pub type LogHook<'a> = dyn Fn(&str) + Send + Sync + 'a;
