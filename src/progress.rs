//! Progress display module
//!
//! Styled status messages, a spinner for running tools and the final run
//! summary.

use bytesize::ByteSize;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::{Duration, Instant};

use crate::output::file_size;
use crate::stage::{StageReport, StageState};

/// Print the application banner
pub fn print_banner() {
    let banner = r#"
╔══════════════════════════════════════════════════════════════╗
║                                                              ║
║   ███████╗ ██████╗ ███╗   ███╗ █████╗ ████████╗██╗ ██████╗   ║
║   ██╔════╝██╔═══██╗████╗ ████║██╔══██╗╚══██╔══╝██║██╔════╝   ║
║   ███████╗██║   ██║██╔████╔██║███████║   ██║   ██║██║        ║
║   ╚════██║██║   ██║██║╚██╔╝██║██╔══██║   ██║   ██║██║        ║
║   ███████║╚██████╔╝██║ ╚═╝ ██║██║  ██║   ██║   ██║╚██████╗   ║
║   ╚══════╝ ╚═════╝ ╚═╝     ╚═╝╚═╝  ╚═╝   ╚═╝   ╚═╝ ╚═════╝   ║
║                                                              ║
║          Quality / Blacklist / MQ filtering of VCFs          ║
║                                                   v1.0.0     ║
╚══════════════════════════════════════════════════════════════╝
"#;

    println!("{}", banner.green());
}

/// Print a section header
pub fn print_header(text: &str) {
    println!("\n{} {}", "▶".green(), text.green().bold());
}

/// Print an info message
pub fn print_info(text: &str) {
    println!("  {} {}", "ℹ".cyan(), text);
}

/// Print a success message
pub fn print_success(text: &str) {
    println!("  {} {}", "✔".green(), text.green());
}

/// Print a warning message
pub fn print_warning(text: &str) {
    println!("  {} {}", "⚠".yellow(), text.yellow());
}

/// Print an error message
pub fn print_error(text: &str) {
    eprintln!("  {} {}", "✖".red(), text.red());
}

/// Print a bullet point
pub fn print_bullet(text: &str) {
    println!("  {} {}", "•".green(), text);
}

/// Create a styled spinner for a running external tool
pub fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();

    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ "),
    );

    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));

    pb
}

/// Stage outcomes of one run
#[derive(Debug)]
pub struct RunSummary {
    sample: String,
    reports: Vec<StageReport>,
    start_time: Instant,
}

impl RunSummary {
    pub fn new(sample: &str) -> Self {
        Self {
            sample: sample.to_string(),
            reports: Vec::new(),
            start_time: Instant::now(),
        }
    }

    pub fn add(&mut self, report: StageReport) {
        self.reports.push(report);
    }

    pub fn reports(&self) -> &[StageReport] {
        &self.reports
    }

    pub fn executed(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| r.state == StageState::Executed)
            .count()
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Print final statistics
    pub fn print_summary(&self) {
        println!();
        println!("{}", "═".repeat(60).green());
        println!("{}", "                     FILTERING COMPLETE".green().bold());
        println!("{}", "═".repeat(60).green());
        println!();

        println!("  {} {}", "Sample:         ".green(), self.sample);
        println!();

        for report in &self.reports {
            let state = match report.state {
                StageState::Executed => report.state.label().green().bold(),
                StageState::AlreadyDone => report.state.label().cyan(),
                StageState::NotConfigured => report.state.label().bright_black(),
                StageState::Pending => report.state.label().yellow(),
            };
            println!("  {} {}", format!("{:<16}", report.stage.to_string()).green(), state);

            if let Some(ref path) = report.output {
                let size = file_size(path)
                    .map(|s| ByteSize(s).to_string())
                    .unwrap_or_else(|| "missing".to_string());
                println!("  {} {} ({})", " ".repeat(16), path.display(), size);
            }
        }

        println!();
        println!("  {} {}", "Duration:       ".green(), format_duration(self.elapsed()));
        println!();
        println!("{}", "═".repeat(60).green());
    }
}

/// Format duration as human-readable string
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();

    if secs < 60 {
        format!("{:.1}s", duration.as_secs_f64())
    } else if secs < 3600 {
        let mins = secs / 60;
        let secs = secs % 60;
        format!("{}m {}s", mins, secs)
    } else {
        let hours = secs / 3600;
        let mins = (secs % 3600) / 60;
        format!("{}h {}m", hours, mins)
    }
}
