//! Welcome banner for the terminal client.

use std::io::Write;

use console::style;

/// Print the gateway URL and retry policy, plus a hint about slash commands.
pub fn print_welcome_banner<W: Write>(out: &mut W, gateway_url: &str, max_retries: u32) {
    let _ = writeln!(out);
    let _ = writeln!(out, "  {}", style("chatrelay").cyan().bold());
    let _ = writeln!(
        out,
        "  {}  {}",
        style("Gateway:").bold(),
        style(gateway_url).dim()
    );
    let _ = writeln!(
        out,
        "  {}  {}",
        style("Retries:").bold(),
        style(format!("up to {max_retries} on network or server errors")).dim()
    );
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "  {}",
        style("Type /help for commands, Ctrl+D to exit").dim()
    );
    let _ = writeln!(out, "  {}", style("---").dim());
    let _ = writeln!(out);
}
