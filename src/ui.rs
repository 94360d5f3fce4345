// Terminal output helpers shared by the command modules.

use colored::Colorize;

pub fn print_header(title: &str) {
    println!();
    println!(
        "{}",
        "════════════════════════════════════════════════════════════".bright_blue()
    );
    println!("{}", format!("  {}", title).bright_blue().bold());
    println!(
        "{}",
        "════════════════════════════════════════════════════════════".bright_blue()
    );
    println!();
}

pub fn print_success(message: &str) {
    println!("{}", format!("✅ {}", message).bright_green().bold());
}

pub fn print_failure(message: &str) {
    eprintln!("{}", format!("❌ {}", message).bright_red().bold());
}
