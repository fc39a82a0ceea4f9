//! Output layer
//!
//! Text output is the narrative, human-oriented format; jsonl emits one
//! [`Record`] per line and drops the narrative. Errors always go to the
//! error sink, in the matching format.

use clap::ValueEnum;
use colored::Colorize;
use std::io::{self, Write};

use crate::core::error::ToolError;
use crate::core::model::Record;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Jsonl,
}

/// Render configuration combining format and options
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderConfig {
    pub format: OutputFormat,
    pub quiet: bool,
    pub color: bool,
}

impl RenderConfig {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            quiet: false,
            color: false,
        }
    }

    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }
}

/// Writes results and diagnostics to a pair of sinks
pub struct Printer<'w, O: Write, E: Write> {
    config: RenderConfig,
    out: &'w mut O,
    err: &'w mut E,
}

impl<'w, O: Write, E: Write> Printer<'w, O, E> {
    pub fn new(config: RenderConfig, out: &'w mut O, err: &'w mut E) -> Self {
        Self { config, out, err }
    }

    pub fn format(&self) -> OutputFormat {
        self.config.format
    }

    /// Header/trailer lines; dropped in quiet mode and in jsonl
    pub fn narrative(&mut self, line: impl AsRef<str>) -> io::Result<()> {
        if self.config.quiet || self.config.format != OutputFormat::Text {
            return Ok(());
        }
        writeln!(self.out, "{}", line.as_ref())
    }

    /// Result lines: the text form in text mode, the record in jsonl
    pub fn result(&mut self, text: impl AsRef<str>, record: &Record<'_>) -> io::Result<()> {
        match self.config.format {
            OutputFormat::Text => writeln!(self.out, "{}", text.as_ref()),
            OutputFormat::Jsonl => self.record(record),
        }
    }

    /// Notices that only make sense to a human (e.g. "no matches")
    pub fn notice(&mut self, line: impl AsRef<str>) -> io::Result<()> {
        match self.config.format {
            OutputFormat::Text => writeln!(self.out, "{}", line.as_ref()),
            OutputFormat::Jsonl => Ok(()),
        }
    }

    /// A record written in jsonl mode only
    pub fn record(&mut self, record: &Record<'_>) -> io::Result<()> {
        if self.config.format != OutputFormat::Jsonl {
            return Ok(());
        }
        let line = serde_json::to_string(record).map_err(io::Error::other)?;
        writeln!(self.out, "{}", line)
    }

    /// Report an error on the error sink
    pub fn error(&mut self, error: &ToolError) -> io::Result<()> {
        match self.config.format {
            OutputFormat::Text => {
                let label = self.paint_error("Error:");
                writeln!(self.err, "{} {}", label, capitalize(&error.to_string()))
            }
            OutputFormat::Jsonl => {
                let line =
                    serde_json::to_string(&Record::from_error(error)).map_err(io::Error::other)?;
                writeln!(self.err, "{}", line)
            }
        }
    }

    /// Free-form error text on the error sink (text mode wording)
    pub fn error_line(&mut self, line: impl AsRef<str>) -> io::Result<()> {
        writeln!(self.err, "{}", line.as_ref())
    }

    /// Usage text always goes to stdout
    pub fn usage(&mut self, text: impl AsRef<str>) -> io::Result<()> {
        write!(self.out, "{}", text.as_ref())
    }

    pub fn label(&self, text: &str) -> String {
        if self.config.color {
            text.green().bold().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn paint_error(&self, text: &str) -> String {
        if self.config.color {
            text.red().bold().to_string()
        } else {
            text.to_string()
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn render<F>(config: RenderConfig, f: F) -> (String, String)
    where
        F: FnOnce(&mut Printer<'_, Vec<u8>, Vec<u8>>) -> io::Result<()>,
    {
        let mut out = Vec::new();
        let mut err = Vec::new();
        {
            let mut printer = Printer::new(config, &mut out, &mut err);
            f(&mut printer).unwrap();
        }
        (
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Text);
    }

    #[test]
    fn test_text_result_and_narrative() {
        let (out, err) = render(RenderConfig::new(OutputFormat::Text), |p| {
            p.narrative("header")?;
            p.result("L1: foo", &Record::Match { line: 1, text: "foo" })?;
            p.record(&Record::list_summary(1))
        });
        assert_eq!(out, "header\nL1: foo\n");
        assert!(err.is_empty());
    }

    #[test]
    fn test_quiet_drops_narrative_only() {
        let config = RenderConfig::new(OutputFormat::Text).with_quiet(true);
        let (out, _) = render(config, |p| {
            p.narrative("header")?;
            p.result("L1: foo", &Record::Match { line: 1, text: "foo" })
        });
        assert_eq!(out, "L1: foo\n");
    }

    #[test]
    fn test_jsonl_result() {
        let (out, _) = render(RenderConfig::new(OutputFormat::Jsonl), |p| {
            p.narrative("header")?;
            p.notice("nothing here")?;
            p.result("L1: foo", &Record::Match { line: 1, text: "foo" })
        });
        assert_eq!(out, "{\"kind\":\"match\",\"line\":1,\"text\":\"foo\"}\n");
    }

    #[test]
    fn test_error_text() {
        let error = ToolError::InvalidDirectory(PathBuf::from("/nope"));
        let (out, err) = render(RenderConfig::new(OutputFormat::Text), |p| p.error(&error));
        assert!(out.is_empty());
        assert_eq!(
            err,
            "Error: The path '/nope' does not exist or is not a valid directory\n"
        );
    }

    #[test]
    fn test_error_jsonl() {
        let error = ToolError::MissingDestination;
        let (_, err) = render(RenderConfig::new(OutputFormat::Jsonl), |p| p.error(&error));
        let value: serde_json::Value = serde_json::from_str(err.trim()).unwrap();
        assert_eq!(value["kind"], "error");
        assert_eq!(value["code"], "MISSING_DESTINATION");
    }

    #[test]
    fn test_label_without_color() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let printer = Printer::new(RenderConfig::default(), &mut out, &mut err);
        assert_eq!(printer.label("L1:"), "L1:");
        assert_eq!(printer.paint_error("Error:"), "Error:");
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("the file"), "The file");
        assert_eq!(capitalize(""), "");
    }
}
