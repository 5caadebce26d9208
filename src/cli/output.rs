//! Console formatting helpers for CLI commands

use crate::{pipeline::TrainingSummary, tictactoe::BoardState};

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

/// Format a number with thousands separators
pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i.is_multiple_of(3) {
            result.insert(0, ',');
        }
        result.insert(0, c);
    }
    result
}

/// Format a fraction as a percentage with one decimal
pub fn format_rate(rate: f64) -> String {
    format!("{:.1}%", rate * 100.0)
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:20} {}", format!("{}:", key), value);
}

pub fn print_training_summary(summary: &TrainingSummary) {
    print_section("Training Summary");
    print_kv("Episodes", &format_number(summary.episodes));
    print_kv("Wins", &format_number(summary.wins));
    print_kv("Draws", &format_number(summary.draws));
    print_kv("Losses", &format_number(summary.losses));
    print_kv("Mean reward", &format!("{:.3}", summary.mean_reward));
    print_kv("Learning rate", &format!("{:.4}", summary.final_learning_rate));
    print_kv("Epsilon", &format!("{:.4}", summary.final_epsilon));
    print_kv("States seen", &format_number(summary.states_seen));
    if summary.stopped_early {
        print_kv("Stopped early", "yes");
    }
}

/// Render a board with a blank line before it
pub fn render_board(board: &BoardState) -> String {
    format!("\n{board}\n")
}
