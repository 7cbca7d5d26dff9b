//! Console and progress-bar presentation for the CLI.

pub mod console;
pub mod progress;

pub use console::{print_banner, print_error, print_info, print_report, print_warning};
pub use progress::{create_batch_bar, create_scrape_spinner};
