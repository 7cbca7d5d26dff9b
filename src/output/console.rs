//! Console output utilities.

use console::style;

use crate::batch::BatchReport;

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("INFO").cyan().bold(), message);
}

/// Print a warning message.
pub fn print_warning(message: &str) {
    println!("{} {}", style("WARN").yellow().bold(), message);
}

/// Print an error message.
pub fn print_error(message: &str) {
    eprintln!("{} {}", style("ERROR").red().bold(), message);
}

/// Print the application banner.
pub fn print_banner() {
    let banner = r#"
╔═══════════════════════════════════════════════╗
║     tubefetch                                 ║
║     batch downloads for playlists & channels  ║
╚═══════════════════════════════════════════════╝
"#;
    println!("{}", style(banner).cyan());
}

/// Print the final batch summary.
pub fn print_report(report: &BatchReport) {
    println!();
    println!(
        "{} {} successful, {} failed",
        style("Done:").bold(),
        style(report.successful).green(),
        if report.failed > 0 {
            style(report.failed).red()
        } else {
            style(report.failed).dim()
        }
    );
    for error in &report.errors {
        println!("  {} {}", style("failed").red(), error);
    }
}
