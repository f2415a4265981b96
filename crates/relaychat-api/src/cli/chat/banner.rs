//! Welcome banner display for chat sessions.

use console::style;

/// Print the welcome banner at the start of a chat session.
pub fn print_welcome_banner(endpoint: &str) {
    println!();
    println!("  {} {}", "\u{1F4AC}", style("relaychat").cyan().bold());
    println!("  {}", style("Streaming chat with Gemini").dim());
    println!();
    println!("  {}  {}", style("Relay:").bold(), style(endpoint).dim());
    println!();
    println!(
        "  {}",
        style("Type /help for commands, Ctrl+D to exit").dim()
    );
    println!("  {}", style("---").dim());
    println!();
}
