//! Organize backend - list or move directory entries by extension
//!
//! Only the direct entries of the source directory are considered. A move is
//! best effort: each entry gets its own outcome and one failure never stops
//! the rest of the batch.

use anyhow::Result;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::core::error::ToolError;
use crate::core::model::{FileEntry, MoveOutcome, MoveSummary, Record};
use crate::core::paths::{
    absolute_display, exists_and_is_directory, has_extension, probe, PathKind,
};
use crate::core::render::{OutputFormat, Printer};

/// Where a move sends the selected entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveTarget {
    /// `<directory>/<extension>_files`, always created when missing
    Subdirectory,
    /// A caller-supplied directory, created only when `force` is set
    Explicit { path: PathBuf, force: bool },
}

impl MoveTarget {
    /// The destination path for a given source directory and extension
    pub fn resolve(&self, directory: &Path, extension: &str) -> PathBuf {
        match self {
            MoveTarget::Subdirectory => directory.join(format!("{}_files", extension)),
            MoveTarget::Explicit { path, .. } => path.clone(),
        }
    }

    fn may_create(&self) -> bool {
        match self {
            MoveTarget::Subdirectory => true,
            MoveTarget::Explicit { force, .. } => *force,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrganizeAction {
    List,
    Move(MoveTarget),
}

impl OrganizeAction {
    pub fn name(&self) -> &'static str {
        match self {
            OrganizeAction::List => "list",
            OrganizeAction::Move(_) => "move",
        }
    }
}

/// A validated organize request
#[derive(Debug, Clone)]
pub struct OrganizeConfig {
    pub directory: PathBuf,
    /// Normalized: no leading '.', lowercase
    pub extension: String,
    pub action: OrganizeAction,
}

/// What a completed run did
#[derive(Debug, Default)]
pub struct OrganizeReport {
    pub entries: Vec<FileEntry>,
    /// Present for `move` runs that got as far as moving
    pub moves: Option<MoveSummary>,
}

/// Direct entries of `directory` whose name ends with `.extension`.
///
/// Entries come back in enumeration order. `exclude` drops one path (the
/// move destination) from the selection.
pub fn collect_entries(
    directory: &Path,
    extension: &str,
    exclude: Option<&Path>,
) -> Result<Vec<FileEntry>, ToolError> {
    let mut entries = Vec::new();

    for entry in WalkDir::new(directory)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
    {
        let entry = match entry {
            Ok(e) => e,
            Err(e) if e.depth() == 0 => {
                return Err(ToolError::from_io(directory, io::Error::from(e)));
            }
            Err(e) => {
                warn!(error = %e, "skipping unreadable entry");
                continue;
            }
        };

        let name = entry.file_name().to_string_lossy().into_owned();
        if !has_extension(&name, extension) {
            continue;
        }

        if exclude.is_some_and(|dest| same_path(entry.path(), dest)) {
            debug!(name = %name, "skipping the destination itself");
            continue;
        }

        entries.push(FileEntry {
            name,
            path: entry.into_path(),
        });
    }

    Ok(entries)
}

fn same_path(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Make sure the destination directory exists; returns whether it was created
pub fn prepare_destination(path: &Path, target: &MoveTarget) -> Result<bool, ToolError> {
    match probe(path)? {
        PathKind::Directory => Ok(false),
        PathKind::Missing if target.may_create() => {
            fs::create_dir_all(path).map_err(|e| ToolError::from_io(path, e))?;
            info!(path = %path.display(), "created destination directory");
            Ok(true)
        }
        PathKind::Missing => Err(ToolError::InvalidDestination {
            path: path.to_path_buf(),
            reason: "the directory does not exist (pass -f to create it)".to_string(),
        }),
        PathKind::File | PathKind::Other => Err(ToolError::InvalidDestination {
            path: path.to_path_buf(),
            reason: "a file with that name already exists and is not a directory".to_string(),
        }),
    }
}

/// Move one entry into `destination`, replacing a same-named file there
pub fn move_entry(entry: &FileEntry, destination: &Path) -> MoveOutcome {
    let file_name = entry
        .path
        .file_name()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(&entry.name));
    let target = destination.join(file_name);

    let result = match fs::rename(&entry.path, &target) {
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices && entry.path.is_file() => {
            copy_then_remove(&entry.path, &target)
        }
        other => other,
    };

    match result {
        Ok(()) => {
            debug!(from = %entry.path.display(), to = %target.display(), "moved");
            MoveOutcome::Moved {
                name: entry.name.clone(),
                to: target,
            }
        }
        Err(e) => {
            debug!(name = %entry.name, error = %e, "move failed");
            MoveOutcome::Failed {
                name: entry.name.clone(),
                error: ToolError::from_io(&entry.path, e),
            }
        }
    }
}

/// Fallback for renames across filesystems
fn copy_then_remove(from: &Path, to: &Path) -> io::Result<()> {
    fs::copy(from, to)?;
    fs::remove_file(from)
}

/// Run the organize command.
///
/// Returns `None` when validation rejected the run before any side effect.
pub fn run_organize<O: Write, E: Write>(
    config: &OrganizeConfig,
    printer: &mut Printer<'_, O, E>,
) -> Result<Option<OrganizeReport>> {
    let directory = &config.directory;
    let extension = &config.extension;

    match exists_and_is_directory(directory) {
        Ok(true) => {}
        Ok(false) => {
            printer.error(&ToolError::InvalidDirectory(directory.clone()))?;
            return Ok(None);
        }
        Err(e) => {
            printer.error(&e)?;
            return Ok(None);
        }
    }

    printer.narrative(format!("Searching for files with extension: .{}", extension))?;
    printer.narrative(format!(
        "Processing directory: {}",
        absolute_display(directory).display()
    ))?;
    printer.narrative(format!("Action: {}", config.action.name()))?;
    printer.narrative("---")?;

    let destination = match &config.action {
        OrganizeAction::Move(target) => Some(target.resolve(directory, extension)),
        OrganizeAction::List => None,
    };

    let entries = match collect_entries(directory, extension, destination.as_deref()) {
        Ok(entries) => entries,
        Err(e) => {
            printer.error(&e)?;
            return Ok(None);
        }
    };
    debug!(found = entries.len(), extension = %extension, "collected entries");

    if entries.is_empty() {
        printer.notice(format!(
            "No files with extension '.{}' found in this directory.",
            extension
        ))?;
        match config.action {
            OrganizeAction::List => printer.record(&Record::list_summary(0))?,
            OrganizeAction::Move(_) => {
                printer.record(&Record::move_summary(0, &MoveSummary::default()))?
            }
        }
        return Ok(Some(OrganizeReport::default()));
    }

    let moves = match &config.action {
        OrganizeAction::List => {
            list_entries(&entries, printer)?;
            None
        }
        OrganizeAction::Move(target) => {
            let destination = target.resolve(directory, extension);
            let created = match prepare_destination(&destination, target) {
                Ok(created) => created,
                Err(e) => {
                    printer.error(&e)?;
                    return Ok(None);
                }
            };
            if created {
                printer.narrative(format!("Created directory: {}", destination.display()))?;
            }
            Some(report_moves(&entries, &destination, printer)?)
        }
    };

    printer.narrative("---")?;
    printer.narrative("Operation completed.")?;

    Ok(Some(OrganizeReport { entries, moves }))
}

fn list_entries<O: Write, E: Write>(
    entries: &[FileEntry],
    printer: &mut Printer<'_, O, E>,
) -> Result<()> {
    printer.narrative("Files found:")?;
    for entry in entries {
        printer.result(
            format!("- {}", entry.name),
            &Record::Entry { name: &entry.name },
        )?;
    }
    printer.record(&Record::list_summary(entries.len()))?;
    Ok(())
}

/// Move every entry, reporting and collecting one outcome per entry
fn report_moves<O: Write, E: Write>(
    entries: &[FileEntry],
    destination: &Path,
    printer: &mut Printer<'_, O, E>,
) -> Result<MoveSummary> {
    printer.narrative(format!("Moving files to: {}", destination.display()))?;

    let mut summary = MoveSummary::default();
    for entry in entries {
        let outcome = move_entry(entry, destination);
        match &outcome {
            MoveOutcome::Moved { name, .. } => {
                printer.result(format!("- Moved: {}", name), &Record::from_outcome(&outcome))?;
            }
            MoveOutcome::Failed { name, error } => match printer.format() {
                OutputFormat::Text => {
                    let label = printer.paint_error("Error:");
                    printer.error_line(format!("{} could not move '{}': {}", label, name, error))?;
                }
                OutputFormat::Jsonl => printer.record(&Record::from_outcome(&outcome))?,
            },
        }
        summary.push(outcome);
    }

    printer.narrative("---")?;
    printer.notice(format!("Total files moved: {}", summary.moved()))?;
    if summary.failed() > 0 {
        printer.notice(format!("Failed: {}", summary.failed()))?;
    }
    printer.record(&Record::move_summary(entries.len(), &summary))?;

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::render::RenderConfig;
    use std::collections::BTreeSet;
    use tempfile::tempdir;

    fn names(entries: &[FileEntry]) -> BTreeSet<String> {
        entries.iter().map(|e| e.name.clone()).collect()
    }

    fn run(config: &OrganizeConfig) -> (Option<OrganizeReport>, String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let report = {
            let mut printer =
                Printer::new(RenderConfig::new(OutputFormat::Text), &mut out, &mut err);
            run_organize(config, &mut printer).unwrap()
        };
        (
            report,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    fn move_quietly(entries: &[FileEntry], destination: &Path) -> (MoveSummary, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let summary = {
            let mut printer =
                Printer::new(RenderConfig::new(OutputFormat::Text), &mut out, &mut err);
            report_moves(entries, destination, &mut printer).unwrap()
        };
        (summary, String::from_utf8(err).unwrap())
    }

    fn seed(dir: &Path) {
        fs::write(dir.join("a.txt"), "alpha").unwrap();
        fs::write(dir.join("b.TXT"), "bravo").unwrap();
        fs::write(dir.join("c.log"), "charlie").unwrap();
    }

    #[test]
    fn test_collect_entries_case_insensitive() {
        let temp = tempdir().unwrap();
        seed(temp.path());

        let entries = collect_entries(temp.path(), "txt", None).unwrap();
        assert_eq!(
            names(&entries),
            BTreeSet::from(["a.txt".to_string(), "b.TXT".to_string()])
        );
    }

    #[test]
    fn test_collect_entries_is_not_recursive() {
        let temp = tempdir().unwrap();
        fs::create_dir(temp.path().join("nested")).unwrap();
        fs::write(temp.path().join("nested/deep.txt"), "x").unwrap();
        fs::write(temp.path().join("top.txt"), "x").unwrap();

        let entries = collect_entries(temp.path(), "txt", None).unwrap();
        assert_eq!(names(&entries), BTreeSet::from(["top.txt".to_string()]));
    }

    #[test]
    fn test_collect_entries_excludes_destination() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("a.txt"), "x").unwrap();
        fs::create_dir(temp.path().join("archive.txt")).unwrap();

        let dest = temp.path().join("archive.txt");
        let entries = collect_entries(temp.path(), "txt", Some(&dest)).unwrap();
        assert_eq!(names(&entries), BTreeSet::from(["a.txt".to_string()]));
    }

    #[test]
    fn test_move_target_resolve() {
        let dir = Path::new("/data");
        assert_eq!(
            MoveTarget::Subdirectory.resolve(dir, "pdf"),
            PathBuf::from("/data/pdf_files")
        );
        let explicit = MoveTarget::Explicit {
            path: PathBuf::from("/elsewhere"),
            force: false,
        };
        assert_eq!(explicit.resolve(dir, "pdf"), PathBuf::from("/elsewhere"));
    }

    #[test]
    fn test_prepare_destination_requires_force() {
        let temp = tempdir().unwrap();
        let dest = temp.path().join("out");

        let target = MoveTarget::Explicit {
            path: dest.clone(),
            force: false,
        };
        let err = prepare_destination(&dest, &target).unwrap_err();
        assert!(matches!(err, ToolError::InvalidDestination { .. }));
        assert!(!dest.exists());

        let target = MoveTarget::Explicit {
            path: dest.clone(),
            force: true,
        };
        assert!(prepare_destination(&dest, &target).unwrap());
        assert!(dest.is_dir());
        // Second time it already exists
        assert!(!prepare_destination(&dest, &target).unwrap());
    }

    #[test]
    fn test_prepare_destination_rejects_file() {
        let temp = tempdir().unwrap();
        let dest = temp.path().join("txt_files");
        fs::write(&dest, "not a dir").unwrap();

        let err = prepare_destination(&dest, &MoveTarget::Subdirectory).unwrap_err();
        assert!(err.to_string().contains("not a directory"));
    }

    #[test]
    fn test_move_replaces_existing() {
        let temp = tempdir().unwrap();
        let dest = temp.path().join("dest");
        fs::create_dir(&dest).unwrap();
        fs::write(temp.path().join("a.txt"), "new").unwrap();
        fs::write(dest.join("a.txt"), "old").unwrap();

        let entries = collect_entries(temp.path(), "txt", None).unwrap();
        let (summary, err) = move_quietly(&entries, &dest);

        assert_eq!(summary.moved(), 1);
        assert!(err.is_empty());
        assert_eq!(fs::read_to_string(dest.join("a.txt")).unwrap(), "new");
        assert!(!temp.path().join("a.txt").exists());
    }

    #[test]
    fn test_move_failure_does_not_stop_batch() {
        let temp = tempdir().unwrap();
        let dest = temp.path().join("dest");
        fs::create_dir(&dest).unwrap();
        fs::write(temp.path().join("a.txt"), "a").unwrap();
        fs::write(temp.path().join("c.txt"), "c").unwrap();

        let entries = vec![
            FileEntry {
                name: "a.txt".into(),
                path: temp.path().join("a.txt"),
            },
            // Vanished between enumeration and move
            FileEntry {
                name: "b.txt".into(),
                path: temp.path().join("b.txt"),
            },
            FileEntry {
                name: "c.txt".into(),
                path: temp.path().join("c.txt"),
            },
        ];
        let (summary, err) = move_quietly(&entries, &dest);

        assert_eq!(summary.moved(), 2);
        assert_eq!(summary.failed(), 1);
        assert!(matches!(
            &summary.outcomes[1],
            MoveOutcome::Failed { name, .. } if name == "b.txt"
        ));
        assert_eq!(err.lines().count(), 1);
        assert!(err.starts_with("Error: could not move 'b.txt':"));
        assert!(dest.join("a.txt").exists());
        assert!(dest.join("c.txt").exists());
    }

    #[test]
    fn test_run_list_leaves_fs_unchanged() {
        let temp = tempdir().unwrap();
        seed(temp.path());

        let config = OrganizeConfig {
            directory: temp.path().to_path_buf(),
            extension: "txt".into(),
            action: OrganizeAction::List,
        };
        let (report, out, err) = run(&config);

        let report = report.unwrap();
        assert_eq!(report.entries.len(), 2);
        assert!(report.moves.is_none());
        assert!(out.contains("- a.txt\n"));
        assert!(out.contains("- b.TXT\n"));
        assert!(!out.contains("c.log"));
        assert!(out.contains("Operation completed."));
        assert!(err.is_empty());
        assert!(temp.path().join("a.txt").exists());
        assert!(temp.path().join("b.TXT").exists());
    }

    #[test]
    fn test_run_move_into_subdirectory_twice() {
        let temp = tempdir().unwrap();
        seed(temp.path());

        let config = OrganizeConfig {
            directory: temp.path().to_path_buf(),
            extension: "txt".into(),
            action: OrganizeAction::Move(MoveTarget::Subdirectory),
        };

        let (report, out, _) = run(&config);
        let summary = report.unwrap().moves.unwrap();
        assert_eq!(summary.moved(), 2);
        assert!(out.contains("Created directory:"));
        assert!(out.contains("Total files moved: 2"));

        let dest = temp.path().join("txt_files");
        assert_eq!(fs::read_to_string(dest.join("a.txt")).unwrap(), "alpha");
        assert_eq!(fs::read_to_string(dest.join("b.TXT")).unwrap(), "bravo");
        assert!(temp.path().join("c.log").exists());

        let (report, out, _) = run(&config);
        assert!(report.unwrap().entries.is_empty());
        assert!(out.contains("No files with extension '.txt' found"));
    }

    #[test]
    fn test_run_move_explicit_without_force_is_rejected() {
        let temp = tempdir().unwrap();
        seed(temp.path());
        let dest = temp.path().join("missing");

        let config = OrganizeConfig {
            directory: temp.path().to_path_buf(),
            extension: "txt".into(),
            action: OrganizeAction::Move(MoveTarget::Explicit {
                path: dest.clone(),
                force: false,
            }),
        };
        let (report, _, err) = run(&config);

        assert!(report.is_none());
        assert!(err.contains("Invalid destination"));
        assert!(!dest.exists());
        assert!(temp.path().join("a.txt").exists());
    }

    #[test]
    fn test_empty_move_reports_move_summary() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("c.log"), "c").unwrap();

        let config = OrganizeConfig {
            directory: temp.path().to_path_buf(),
            extension: "txt".into(),
            action: OrganizeAction::Move(MoveTarget::Subdirectory),
        };
        let mut out = Vec::new();
        let mut err = Vec::new();
        {
            let mut printer =
                Printer::new(RenderConfig::new(OutputFormat::Jsonl), &mut out, &mut err);
            run_organize(&config, &mut printer).unwrap();
        }

        let value: serde_json::Value =
            serde_json::from_str(String::from_utf8(out).unwrap().trim()).unwrap();
        assert_eq!(value["kind"], "summary");
        assert_eq!(value["found"], 0);
        assert_eq!(value["moved"], 0);
        assert_eq!(value["failed"], 0);
    }

    #[test]
    fn test_run_rejects_missing_directory() {
        let temp = tempdir().unwrap();
        let config = OrganizeConfig {
            directory: temp.path().join("nope"),
            extension: "txt".into(),
            action: OrganizeAction::List,
        };
        let (report, out, err) = run(&config);

        assert!(report.is_none());
        assert!(out.is_empty());
        assert!(err.contains("does not exist or is not a valid directory"));
    }
}
