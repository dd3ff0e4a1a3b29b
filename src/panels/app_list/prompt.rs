//! Stdin-backed user prompts.

use deck_launch::{FallbackPrompt, LaunchTarget};
use std::io::{self, BufRead, Write};

/// Read one line from stdin without blocking the runtime.
/// Returns `None` at end of input.
pub async fn read_line(prompt: &str) -> Option<String> {
    print!("{}", prompt);
    io::stdout().flush().ok();

    tokio::task::spawn_blocking(|| {
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line),
        }
    })
    .await
    .ok()
    .flatten()
}

/// Whether an answer to a yes/no question means yes.
pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Asks on the terminal whether to open the store listing.
pub struct TerminalPrompt;

impl FallbackPrompt for TerminalPrompt {
    async fn confirm_store_fallback(&self, target: &LaunchTarget) -> bool {
        println!("\nApp Not Available");
        let question = format!(
            "Cannot open {}. Would you like to view it in the Play Store? [y/N] ",
            target.display_name
        );
        read_line(&question)
            .await
            .map(|answer| is_yes(&answer))
            .unwrap_or(false)
    }
}
