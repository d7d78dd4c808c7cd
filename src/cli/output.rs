//! Colored output helpers for the CLI.

use owo_colors::OwoColorize;

/// Output style configuration.
pub struct Output {
    /// Whether to use colored output.
    pub colored: bool,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Output {
    /// Create a new output helper with colors enabled.
    pub fn new() -> Self {
        Self { colored: true }
    }

    /// Create a new output helper with colors disabled.
    pub fn no_color() -> Self {
        Self { colored: false }
    }

    /// Print the program banner.
    pub fn banner(&self) {
        if self.colored {
            println!(
                "{} {}",
                "abacus".bright_cyan().bold(),
                format!("v{} - math tool-server demos", env!("CARGO_PKG_VERSION")).dimmed()
            );
        } else {
            println!(
                "abacus v{} - math tool-server demos",
                env!("CARGO_PKG_VERSION")
            );
        }
    }

    /// Print an info message.
    pub fn info(&self, message: &str) {
        if self.colored {
            println!("{} {}", "•".blue(), message);
        } else {
            println!("[INFO] {}", message);
        }
    }

    /// Print a warning message.
    pub fn warning(&self, message: &str) {
        if self.colored {
            println!("{} {}", "⚠".yellow().bold(), message.yellow());
        } else {
            println!("[WARN] {}", message);
        }
    }

    /// Print an error message.
    pub fn error(&self, message: &str) {
        if self.colored {
            eprintln!("{} {}", "✗".red().bold(), message.red());
        } else {
            eprintln!("[ERROR] {}", message);
        }
    }

    /// Print a header for a section.
    pub fn header(&self, title: &str) {
        if self.colored {
            println!("\n{}", title.bright_white().bold().underline());
        } else {
            println!("\n=== {} ===", title);
        }
    }

    /// Print a key-value pair.
    pub fn kv(&self, key: &str, value: &str) {
        if self.colored {
            println!("  {}: {}", key.dimmed(), value.bright_white());
        } else {
            println!("  {}: {}", key, value);
        }
    }

    /// Print a list item.
    pub fn list_item(&self, item: &str) {
        if self.colored {
            println!("  {} {}", "•".blue(), item);
        } else {
            println!("  - {}", item);
        }
    }

    /// Print an indented detail line under a list item.
    pub fn detail(&self, text: &str) {
        if self.colored {
            println!("    {}", text.dimmed());
        } else {
            println!("    {}", text);
        }
    }

    /// Print newline.
    pub fn newline(&self) {
        println!();
    }
}
