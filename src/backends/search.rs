//! Line search backend
//!
//! Scans one file front to back and reports every line containing a literal
//! pattern. Matches are printed as soon as they are found.

use anyhow::Result;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::core::error::ToolError;
use crate::core::model::{LineMatch, Record, SearchSummary};
use crate::core::paths::exists_and_is_regular_file;
use crate::core::render::{OutputFormat, Printer};

/// A validated search request
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub pattern: String,
    pub file: PathBuf,
    pub ignore_case: bool,
}

/// Lazily yields the matching lines of a reader, in order.
///
/// The reader is consumed exactly once. After the first read error the
/// scanner yields that error and then stops.
pub struct LineScanner<R> {
    reader: R,
    needle: String,
    ignore_case: bool,
    line_no: u64,
    buf: Vec<u8>,
    done: bool,
}

impl<R: BufRead> LineScanner<R> {
    pub fn new(reader: R, pattern: &str, ignore_case: bool) -> Self {
        let needle = if ignore_case {
            pattern.to_lowercase()
        } else {
            pattern.to_string()
        };

        Self {
            reader,
            needle,
            ignore_case,
            line_no: 0,
            buf: Vec::new(),
            done: false,
        }
    }

    /// Number of lines read so far
    pub fn lines_read(&self) -> u64 {
        self.line_no
    }

    fn is_match(&self, line: &str) -> bool {
        if self.ignore_case {
            line.to_lowercase().contains(&self.needle)
        } else {
            line.contains(&self.needle)
        }
    }
}

impl<R: BufRead> Iterator for LineScanner<R> {
    type Item = io::Result<LineMatch>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            self.buf.clear();
            match self.reader.read_until(b'\n', &mut self.buf) {
                Ok(0) => self.done = true,
                Ok(_) => {
                    self.line_no += 1;
                    let line = trim_line_ending(&self.buf);
                    let text = String::from_utf8_lossy(line);
                    if self.is_match(&text) {
                        return Some(Ok(LineMatch::new(self.line_no, text.into_owned())));
                    }
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
        None
    }
}

/// Strip one trailing "\n" or "\r\n"
fn trim_line_ending(buf: &[u8]) -> &[u8] {
    let buf = buf.strip_suffix(b"\n").unwrap_or(buf);
    buf.strip_suffix(b"\r").unwrap_or(buf)
}

/// Scan `path`, streaming matches to the printer
fn scan_file<O: Write, E: Write>(
    path: &Path,
    pattern: &str,
    ignore_case: bool,
    printer: &mut Printer<'_, O, E>,
) -> Result<SearchSummary> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            printer.error(&ToolError::from_io(path, e))?;
            return Ok(SearchSummary {
                aborted: true,
                ..Default::default()
            });
        }
    };

    scan_reader(BufReader::new(file), path, pattern, ignore_case, printer)
}

fn scan_reader<R: BufRead, O: Write, E: Write>(
    reader: R,
    path: &Path,
    pattern: &str,
    ignore_case: bool,
    printer: &mut Printer<'_, O, E>,
) -> Result<SearchSummary> {
    let mut scanner = LineScanner::new(reader, pattern, ignore_case);
    let mut summary = SearchSummary::default();

    for item in scanner.by_ref() {
        match item {
            Ok(m) => {
                let label = printer.label(&format!("L{}:", m.line));
                printer.result(format!("{} {}", label, m.text), &Record::from_match(&m))?;
                summary.matches += 1;
            }
            Err(e) => {
                debug!(path = %path.display(), error = %e, "read failed mid-scan");
                report_read_error(path, e, printer)?;
                summary.aborted = true;
            }
        }
    }

    summary.lines = scanner.lines_read();
    Ok(summary)
}

fn report_read_error<O: Write, E: Write>(
    path: &Path,
    error: io::Error,
    printer: &mut Printer<'_, O, E>,
) -> io::Result<()> {
    match printer.format() {
        OutputFormat::Text => {
            let label = printer.paint_error("Error");
            printer.error_line(format!(
                "{} reading file '{}': {}",
                label,
                path.display(),
                error
            ))
        }
        OutputFormat::Jsonl => printer.error(&ToolError::from_io(path, error)),
    }
}

/// Run the search command.
///
/// Returns `None` when the file failed validation and no scan was attempted.
pub fn run_search<O: Write, E: Write>(
    config: &SearchConfig,
    printer: &mut Printer<'_, O, E>,
) -> Result<Option<SearchSummary>> {
    debug!(
        pattern = %config.pattern,
        file = %config.file.display(),
        ignore_case = config.ignore_case,
        "starting search"
    );

    if config.ignore_case {
        printer.narrative("[case-insensitive search enabled]")?;
    }

    match exists_and_is_regular_file(&config.file) {
        Ok(true) => {}
        Ok(false) => {
            printer.error(&ToolError::InvalidFile(config.file.clone()))?;
            return Ok(None);
        }
        Err(e) => {
            printer.error(&e)?;
            return Ok(None);
        }
    }

    printer.narrative(format!(
        "Searching for pattern '{}' in file '{}'...",
        config.pattern,
        config.file.display()
    ))?;
    printer.narrative("")?;

    let summary = scan_file(&config.file, &config.pattern, config.ignore_case, printer)?;

    if summary.matches == 0 && !summary.aborted {
        printer.notice(format!(
            "No matches found for pattern '{}'.",
            config.pattern
        ))?;
    }
    printer.record(&Record::search_summary(&summary))?;

    debug!(
        matches = summary.matches,
        lines = summary.lines,
        aborted = summary.aborted,
        "search finished"
    );

    Ok(Some(summary))
}
