//! Console output for the person at the terminal.
//!
//! Everything here goes to stderr; stdout carries relayed activity.

use crossterm::style::Stylize;

pub fn print_banner(version: &str, api_url: &str) {
    eprintln!(
        "{} {} {}",
        "slackrpc".bold().magenta(),
        format!("v{}", version).dim(),
        format!("({})", api_url).dim()
    );
}

/// Show the URL the user must open to finish linking.
pub fn print_link(url: &str) {
    eprintln!("{}", "Open this link to connect slackrpc to Slack:".bold());
    eprintln!("  {}", url.cyan().underlined());
}

pub fn print_success(message: &str) {
    eprintln!("{} {}", "✓".green().bold(), message);
}

pub fn print_error(message: &str) {
    eprintln!("{} {}", "Error:".red().bold(), message);
}
