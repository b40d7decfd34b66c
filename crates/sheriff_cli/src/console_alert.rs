//! Prints alerts to stdout with ANSI color, so a dry-run's captured output
//! can be rendered as a colored SVG snapshot by the harness.

use async_trait::async_trait;
use colored::Colorize;

use reconciler::alert::{AlertTransport, Block, Severity};

pub struct ConsoleAlertTransport;

#[async_trait]
impl AlertTransport for ConsoleAlertTransport {
    async fn send(&self, severity: Severity, blocks: &[Block], metadata: Option<serde_json::Value>) {
        let header = match severity {
            Severity::Critical => "CRITICAL".red().bold(),
            Severity::Warning => "WARNING".yellow().bold(),
            Severity::Normal => "NOTICE".cyan().bold(),
        };
        println!("[{header}]");
        for block in blocks {
            match block {
                Block::Text(text) => println!("  {text}"),
                Block::Context(text) => println!("  {}", text.dimmed()),
                Block::User(login) => println!("  user: {}", login.green()),
                Block::Repository(full_name) => println!("  repo: {}", full_name.blue()),
                Block::Divider => println!("  {}", "-".repeat(40)),
            }
        }
        if let Some(metadata) = metadata {
            println!("  {}", metadata.to_string().dimmed());
        }
    }
}
