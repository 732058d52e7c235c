use clap::ValueEnum;
use owo_colors::OwoColorize;
use serde_json::json;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
    #[value(name = "json-pretty")]
    JsonPretty,
}

/// User-facing output; diagnostics go through `tracing` instead
pub struct Output {
    format: OutputFormat,
    quiet: bool,
}

impl Output {
    pub fn new(format: OutputFormat, quiet: bool) -> Self {
        Self { format, quiet }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn success(&self, msg: impl AsRef<str>) {
        self.message("success", Some("✓".green().to_string()), msg.as_ref());
    }

    pub fn info(&self, msg: impl AsRef<str>) {
        self.message("info", None, msg.as_ref());
    }

    pub fn warn(&self, msg: impl AsRef<str>) {
        self.message("warning", Some("⚠".yellow().to_string()), msg.as_ref());
    }

    pub fn error(&self, msg: impl AsRef<str>) {
        // Errors are shown even in quiet mode
        match self.format {
            OutputFormat::Human => eprintln!("{} {}", "✗".red(), msg.as_ref()),
            OutputFormat::Json | OutputFormat::JsonPretty => self.print_json(&json!({
                "type": "error",
                "message": msg.as_ref()
            })),
        }
    }

    /// Multi-line blocks (tables) printed as-is in human mode
    pub fn println(&self, msg: impl AsRef<str>) {
        self.message("info", None, msg.as_ref());
    }

    pub fn json(&self, data: &serde_json::Value) {
        if self.quiet {
            return;
        }
        self.print_json(data);
    }

    fn message(&self, kind: &str, mark: Option<String>, msg: &str) {
        if self.quiet {
            return;
        }

        match self.format {
            OutputFormat::Human => match mark {
                Some(mark) => println!("{} {}", mark, msg),
                None => println!("{}", msg),
            },
            OutputFormat::Json | OutputFormat::JsonPretty => self.print_json(&json!({
                "type": kind,
                "message": msg
            })),
        }
    }

    fn print_json(&self, data: &serde_json::Value) {
        match self.format {
            OutputFormat::JsonPretty => {
                println!("{}", serde_json::to_string_pretty(data).unwrap_or_default());
            }
            _ => {
                println!("{}", serde_json::to_string(data).unwrap_or_default());
            }
        }
    }
}
