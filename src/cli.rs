//! CLI module - Command-line interface definitions and handlers
//!
//! Parsing never exits the process: usage errors are printed (error on
//! stderr, usage text on stdout) and the run ends normally.

use anyhow::Result;
use clap::error::ErrorKind;
use clap::{Args, CommandFactory, Parser, ValueEnum};
use std::ffi::OsString;
use std::io::Write;
use std::path::PathBuf;

use crate::backends::organize::{run_organize, MoveTarget, OrganizeAction, OrganizeConfig};
use crate::backends::search::{run_search, SearchConfig};
use crate::core::error::ToolError;
use crate::core::paths::normalize_extension;
use crate::core::render::{OutputFormat, Printer, RenderConfig};

/// Output options shared by both tools
#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Output format (text/jsonl).
    #[arg(
        long,
        value_enum,
        default_value_t = OutputFormat::Text,
        value_name = "FORMAT",
        long_help = "Select the output format.\n\n\
Supported values:\n\
- text (default): human-readable narrative\n\
- jsonl: one JSON object per result line, no narrative"
    )]
    pub format: OutputFormat,

    /// Disable colored output.
    #[arg(
        long,
        long_help = "Disable colored output. Colors are also off whenever stdout is not a terminal."
    )]
    pub no_color: bool,

    /// Quiet mode (results only, no header/trailer lines).
    #[arg(short, long)]
    pub quiet: bool,

    /// Verbose mode (debug diagnostics on stderr).
    #[arg(
        short,
        long,
        long_help = "Enable debug diagnostics on stderr. RUST_LOG, when set, takes precedence."
    )]
    pub verbose: bool,
}

impl OutputArgs {
    pub fn render_config(&self, stdout_is_terminal: bool) -> RenderConfig {
        RenderConfig::new(self.format)
            .with_quiet(self.quiet)
            .with_color(!self.no_color && stdout_is_terminal)
    }
}

/// lgrep - print the lines of a file that contain a literal pattern.
#[derive(Parser, Debug)]
#[command(name = "lgrep")]
#[command(
    author,
    version,
    about,
    long_about = r#"Scan FILE line by line and print every line containing PATTERN, prefixed
with its 1-based line number (L<n>: ...).

PATTERN is a literal substring, not a regular expression. With -i both the
line and the pattern are lowercased before comparing; lines are always
printed with their original casing.

Examples:
    lgrep "error" log.txt -i
    lgrep "use std" src/lib.rs
"#
)]
pub struct GrepCli {
    /// Text to search for.
    #[arg(value_name = "PATTERN")]
    pub pattern: String,

    /// Path of the text file to scan.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Case-insensitive search.
    #[arg(short = 'i', long)]
    pub ignore_case: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

impl GrepCli {
    pub fn to_config(&self) -> SearchConfig {
        SearchConfig {
            pattern: self.pattern.clone(),
            file: self.file.clone(),
            ignore_case: self.ignore_case,
        }
    }
}

/// Organizer action
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Action {
    /// Print the matching entries
    List,
    /// Move the matching entries into a destination directory
    Move,
}

/// forg - list or move the files of a directory by extension.
#[derive(Parser, Debug)]
#[command(name = "forg")]
#[command(
    author,
    version,
    about,
    long_about = r#"Select the direct entries of DIRECTORY whose name ends with .EXTENSION
(case-insensitive), then list them or move them.

Move destinations:
- move DESTINATION      move into DESTINATION; it must exist unless -f is given
- move --subdir         move into DIRECTORY/<extension>_files, created if needed

A file already present at the destination under the same name is replaced.
A failure on one file is reported and the remaining files are still moved.

Examples:
    forg ./documents pdf list
    forg ./downloads .JPG move ./pictures -f
    forg ./documents txt move --subdir
"#
)]
pub struct OrganizeCli {
    /// Directory containing the files.
    #[arg(value_name = "DIRECTORY")]
    pub directory: PathBuf,

    /// File extension, with or without the leading dot (e.g. txt, .pdf).
    #[arg(value_name = "EXTENSION")]
    pub extension: String,

    /// What to do with the matching files.
    #[arg(value_enum, ignore_case = true, value_name = "ACTION")]
    pub action: Action,

    /// Destination directory for `move`.
    #[arg(value_name = "DESTINATION")]
    pub destination: Option<PathBuf>,

    /// Create the destination directory if it does not exist.
    #[arg(short = 'f', long = "force")]
    pub force: bool,

    /// Move into DIRECTORY/<extension>_files instead of an explicit destination.
    #[arg(long, conflicts_with_all = ["destination", "force"])]
    pub subdir: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

impl OrganizeCli {
    /// Check the argument combination and build the request
    pub fn to_config(&self) -> Result<OrganizeConfig, ToolError> {
        let extension = normalize_extension(&self.extension);
        if extension.is_empty() {
            return Err(ToolError::Usage("the extension must not be empty".to_string()));
        }

        let action = match self.action {
            Action::List => {
                if self.destination.is_some() || self.force || self.subdir {
                    return Err(ToolError::Usage(
                        "'list' does not take a destination, -f or --subdir".to_string(),
                    ));
                }
                OrganizeAction::List
            }
            Action::Move if self.subdir => OrganizeAction::Move(MoveTarget::Subdirectory),
            Action::Move => match &self.destination {
                Some(path) => OrganizeAction::Move(MoveTarget::Explicit {
                    path: path.clone(),
                    force: self.force,
                }),
                None => return Err(ToolError::MissingDestination),
            },
        };

        Ok(OrganizeConfig {
            directory: self.directory.clone(),
            extension,
            action,
        })
    }
}

/// Parse `args`, printing help/version/usage errors instead of exiting.
///
/// Returns `None` when there is nothing left to run.
pub fn parse_args<P, I, T, O, E>(args: I, out: &mut O, err: &mut E) -> Result<Option<P>>
where
    P: Parser,
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    O: Write,
    E: Write,
{
    match P::try_parse_from(args) {
        Ok(cli) => Ok(Some(cli)),
        Err(e) => {
            match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                    write!(out, "{}", e.render())?;
                }
                _ => {
                    write!(err, "{}", e.render())?;
                    writeln!(out, "{}", P::command().render_help())?;
                }
            }
            Ok(None)
        }
    }
}

/// Run lgrep with already parsed arguments
pub fn run_lgrep<O: Write, E: Write>(
    cli: &GrepCli,
    render: RenderConfig,
    out: &mut O,
    err: &mut E,
) -> Result<()> {
    let mut printer = Printer::new(render, out, err);
    run_search(&cli.to_config(), &mut printer)?;
    Ok(())
}

/// Run forg with already parsed arguments
pub fn run_forg<O: Write, E: Write>(
    cli: &OrganizeCli,
    render: RenderConfig,
    out: &mut O,
    err: &mut E,
) -> Result<()> {
    let mut printer = Printer::new(render, out, err);

    let config = match cli.to_config() {
        Ok(config) => config,
        Err(e) => {
            printer.error(&e)?;
            if matches!(e, ToolError::Usage(_)) {
                printer.usage(OrganizeCli::command().render_help().to_string())?;
            }
            return Ok(());
        }
    };

    run_organize(&config, &mut printer)?;
    Ok(())
}
