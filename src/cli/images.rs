//! Image verification command.
//!
//! A single file is checked in-process. A directory is fanned out to a
//! fixed-size pool: each worker runs this binary as `images <file> --json`
//! with a deadline and parses the report from its stdout. A file whose
//! child fails, times out or prints garbage is counted as failed.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Output;

use anyhow::{Context, Result, bail};
use owo_colors::Style;

use crate::cli::ImagesArgs;
use crate::config::SweepConfig;
use crate::content::collect_files;
use crate::image::{FileReport, ImageCheck, ImageStatus, run_pool, verify_file};
use crate::logger::{ProgressLine, is_verbose, paint_err};
use crate::utils::exec::Cmd;
use crate::utils::path::resolve_path;
use crate::utils::plural_count;
use crate::{debug, log};

/// Verify a document, or every document under a directory.
pub fn verify_images(config: &SweepConfig, args: &ImagesArgs) -> Result<()> {
    let path = resolve_path(&args.path, config.root());
    if path.is_file() {
        verify_single(config, &path, args)
    } else if path.is_dir() {
        verify_directory(config, &path, args)
    } else {
        bail!("path not found: {}", args.path.display())
    }
}

// ============================================================================
// single file
// ============================================================================

fn verify_single(config: &SweepConfig, file: &Path, args: &ImagesArgs) -> Result<()> {
    let report = verify_file(file, config.root())?;

    if args.json {
        println!("{}", serde_json::to_string(&report)?);
        return Ok(());
    }

    log!(
        "images";
        "{}: {} total, {} external, {} found, {} missing",
        report.file,
        report.total(),
        report.count(ImageStatus::External),
        report.count(ImageStatus::Found),
        report.count(ImageStatus::Missing)
    );

    for check in report.with_status(ImageStatus::Missing) {
        print_check("missing", check);
    }
    if is_verbose() {
        for check in report.with_status(ImageStatus::Found) {
            print_check("found", check);
        }
        for check in report.with_status(ImageStatus::External) {
            print_check("external", check);
        }
    }

    if !report.passed() {
        bail!(
            "{} in {}",
            plural_count(report.count(ImageStatus::Missing), "missing image"),
            report.file
        );
    }
    Ok(())
}

fn print_check(module: &str, check: &ImageCheck) {
    log!(module; "line {}: {}", check.line, check.path);
    if let Some(resolved) = check.resolved.as_deref().filter(|r| *r != check.path) {
        eprintln!("  {} {}", paint_err("resolved:", Style::new().dimmed()), resolved);
    }
    eprintln!("  {}", paint_err(&check.line_content, Style::new().dimmed()));
}

// ============================================================================
// directory fan-out
// ============================================================================

/// Result of checking one file in directory mode.
#[derive(Debug)]
enum FileOutcome {
    Checked(FileReport),
    Failed { file: String, error: String },
}

/// Aggregate of a directory run.
#[derive(Debug, Default, PartialEq, Eq)]
struct DirectorySummary {
    total: usize,
    with_images: usize,
    without_images: usize,
    passed: usize,
    failed: Vec<String>,
}

impl DirectorySummary {
    fn record(&mut self, outcome: &FileOutcome) {
        self.total += 1;
        match outcome {
            FileOutcome::Checked(report) => {
                if report.has_images() {
                    self.with_images += 1;
                } else {
                    self.without_images += 1;
                }
                if report.passed() {
                    self.passed += 1;
                } else {
                    self.failed.push(report.file.clone());
                }
            }
            FileOutcome::Failed { file, .. } => self.failed.push(file.clone()),
        }
    }
}

impl fmt::Display for DirectorySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} checked, {} with images, {} without, {} passed, {} failed",
            plural_count(self.total, "file"),
            self.with_images,
            self.without_images,
            self.passed,
            self.failed.len()
        )
    }
}

fn verify_directory(config: &SweepConfig, dir: &Path, args: &ImagesArgs) -> Result<()> {
    let files = collect_files(dir, &config.images.extensions, &config.links.exclude);
    if files.is_empty() {
        log!("images"; "no documents with extensions {} under {}",
            config.images.extensions.join(", "),
            config.root_relative(dir));
        return Ok(());
    }

    let exe = std::env::current_exe().context("cannot locate the docsweep executable")?;
    let workers = config.images.workers;
    log!(
        "images";
        "{} with {}",
        plural_count(files.len(), "document"),
        plural_count(workers, "worker")
    );

    let job = |file: PathBuf| check_in_child(&exe, config, &file);
    let summary = run_checks(files, workers, job, args)?;

    log!("images"; "{}", summary);
    if summary.failed.is_empty() {
        log!("ok"; "every image reference resolves");
        return Ok(());
    }

    for file in &summary.failed {
        eprintln!("{} {}", paint_err("→", Style::new().red()), file);
    }
    bail!(
        "{} with image problems",
        plural_count(summary.failed.len(), "file")
    )
}

/// Run `job` over `files` on the pool, printing outcomes as they arrive.
fn run_checks<F>(
    files: Vec<PathBuf>,
    workers: usize,
    job: F,
    args: &ImagesArgs,
) -> Result<DirectorySummary>
where
    F: Fn(PathBuf) -> FileOutcome + Sync,
{
    let progress = ProgressLine::new("images", &[("files", files.len())]);
    let mut summary = DirectorySummary::default();

    run_pool(files, workers, job, |outcome| {
        progress.inc("files");
        print_outcome(&outcome, args);
        summary.record(&outcome);
    })?;

    progress.finish();
    Ok(summary)
}

fn print_outcome(outcome: &FileOutcome, args: &ImagesArgs) {
    match outcome {
        FileOutcome::Checked(report) if report.passed() => {
            if !report.has_images() {
                if args.show_no_images {
                    log!("images"; "{} (no images)", report.file);
                }
            } else if args.show_success {
                log!("ok"; "{}", report.file);
            }
        }
        FileOutcome::Checked(report) => {
            log!("failed"; "{}", report.file);
            for check in report.with_status(ImageStatus::Missing) {
                eprintln!("  {} line {}: {}", paint_err("→", Style::new().red()), check.line, check.path);
            }
        }
        FileOutcome::Failed { file, error } => {
            log!("failed"; "{}: {}", file, error);
        }
    }
}

/// Check one file by running `exe images <file> --json`.
fn check_in_child(exe: &Path, config: &SweepConfig, file: &Path) -> FileOutcome {
    let rel = config.root_relative(file);
    let mut cmd = Cmd::new(exe)
        .arg("images")
        .arg(file)
        .arg("--json")
        .arg("--root")
        .arg(config.root())
        .args(["--color", "never"])
        .timeout(config.images.timeout());
    if let Some(config_path) = &config.config_path {
        cmd = cmd.arg("--config").arg(config_path);
    }

    debug!("images"; "checking {}", rel);
    let result = cmd
        .output()
        .map_err(anyhow::Error::from)
        .and_then(|output| parse_child_output(&output));

    match result {
        Ok(report) => FileOutcome::Checked(report),
        Err(e) => FileOutcome::Failed {
            file: rel,
            error: format!("{e:#}"),
        },
    }
}

/// Parse the report printed by a `--json` child.
///
/// The report is the last non-empty stdout line; anything logged before it
/// is ignored.
fn parse_child_output(output: &Output) -> Result<FileReport> {
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let message = stderr.lines().rev().find(|l| !l.trim().is_empty());
        bail!(
            "check exited with {}: {}",
            output.status,
            message.unwrap_or("no output").trim()
        );
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let line = stdout
        .lines()
        .rev()
        .find(|l| !l.trim().is_empty())
        .context("check printed no report")?;
    serde_json::from_str(line).context("malformed check report")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    fn args(path: &Path) -> ImagesArgs {
        ImagesArgs {
            path: path.to_path_buf(),
            workers: None,
            timeout: None,
            extensions: None,
            show_success: true,
            show_no_images: true,
            json: false,
        }
    }

    fn site() -> TempDir {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("guides/img")).unwrap();
        fs::write(root.join("guides/img/ok.png"), "").unwrap();
        fs::write(root.join("guides/good.mdx"), "![a](img/ok.png)\n").unwrap();
        fs::write(root.join("guides/bad.mdx"), "![a](img/gone.png)\n").unwrap();
        fs::write(root.join("guides/plain.md"), "# none\n").unwrap();
        dir
    }

    #[test]
    fn test_single_file() {
        let dir = site();
        let config = SweepConfig::for_root(dir.path());

        let good = dir.path().join("guides/good.mdx");
        assert!(verify_images(&config, &args(&good)).is_ok());

        let bad = dir.path().join("guides/bad.mdx");
        let err = verify_images(&config, &args(&bad)).unwrap_err();
        assert!(err.to_string().contains("1 missing image"));
    }

    #[test]
    fn test_json_mode_succeeds_with_missing_images() {
        let dir = site();
        let config = SweepConfig::for_root(dir.path());
        let mut json = args(&dir.path().join("guides/bad.mdx"));
        json.json = true;
        assert!(verify_images(&config, &json).is_ok());
    }

    #[test]
    fn test_missing_path() {
        let dir = site();
        let config = SweepConfig::for_root(dir.path());
        assert!(verify_images(&config, &args(&dir.path().join("nope"))).is_err());
    }

    #[test]
    fn test_run_checks_aggregates() {
        let dir = site();
        let root = dir.path().to_path_buf();
        let config = SweepConfig::for_root(&root);
        let files = collect_files(&root, &config.images.extensions, &[]);
        assert_eq!(files.len(), 3);
        let calls = AtomicUsize::new(0);

        let job = |file: PathBuf| {
            calls.fetch_add(1, Ordering::SeqCst);
            if file.ends_with("plain.md") {
                return FileOutcome::Failed {
                    file: "guides/plain.md".into(),
                    error: "timed out".into(),
                };
            }
            FileOutcome::Checked(verify_file(&file, &root).unwrap())
        };
        let summary = run_checks(files, 2, job, &args(&root)).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.with_images, 2);
        assert_eq!(summary.without_images, 0);
        assert_eq!(summary.passed, 1);
        let mut failed = summary.failed.clone();
        failed.sort();
        assert_eq!(failed, vec!["guides/bad.mdx", "guides/plain.md"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_parse_child_output() {
        use std::os::unix::process::ExitStatusExt;
        use std::process::ExitStatus;

        let report = FileReport {
            file: "a.md".into(),
            checks: Vec::new(),
        };
        let stdout = format!(
            "[warning] unknown fields\n{}\n",
            serde_json::to_string(&report).unwrap()
        );
        let ok = Output {
            status: ExitStatus::from_raw(0),
            stdout: stdout.into_bytes(),
            stderr: Vec::new(),
        };
        assert_eq!(parse_child_output(&ok).unwrap(), report);

        let failed = Output {
            status: ExitStatus::from_raw(1 << 8),
            stdout: Vec::new(),
            stderr: b"error: boom\n".to_vec(),
        };
        let err = parse_child_output(&failed).unwrap_err();
        assert!(err.to_string().contains("boom"));

        let garbage = Output {
            status: ExitStatus::from_raw(0),
            stdout: b"not json\n".to_vec(),
            stderr: Vec::new(),
        };
        assert!(parse_child_output(&garbage).is_err());
    }

    #[test]
    fn test_summary_display() {
        let mut summary = DirectorySummary::default();
        summary.record(&FileOutcome::Checked(FileReport {
            file: "a.md".into(),
            checks: Vec::new(),
        }));
        assert_eq!(
            summary.to_string(),
            "1 file checked, 0 with images, 1 without, 1 passed, 0 failed"
        );
    }
}
