//! Command-line interface module for bezel-patcher.
//!
//! This module handles all CLI-related functionality including:
//! - Argument parsing and validation
//! - Settings loading
//! - Patch orchestration
//! - Run log persistence and console output

use crate::config::PatcherConfig;
use crate::file_manager::FsFileManager;
use crate::matcher::MatchType;
use crate::output::OutputFormatter;
use crate::patcher::Patcher;
use crate::report::Report;
use clap::{ArgGroup, Parser};
use std::path::PathBuf;

/// Copy bezel config files so that every ROM has a config with a matching name.
#[derive(Parser, Debug, Clone)]
#[command(name = "bezel-patcher", version, about)]
#[command(group(
    ArgGroup::new("matching")
        .args(["exact_only", "alternate", "fuzzy"])
        .multiple(false)
))]
pub struct Args {
    /// Directory containing the config files
    #[arg(value_hint = clap::ValueHint::DirPath)]
    pub config_dir: PathBuf,

    /// Directory containing the ROMs
    #[arg(value_hint = clap::ValueHint::DirPath)]
    pub rom_dir: PathBuf,

    /// Write the new config files (default is a dry run)
    #[arg(long)]
    pub commit: bool,

    /// Only create files for exact matches
    #[arg(short = 'e', long)]
    pub exact_only: bool,

    /// Create files for exact and alternate name matches
    #[arg(short = 'a', long)]
    pub alternate: bool,

    /// Create files for all matches, including fuzzy ones
    #[arg(short = 'f', long)]
    pub fuzzy: bool,

    /// Path to a settings file
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the run report as JSON to stdout; messages go to stderr
    #[arg(long)]
    pub json: bool,

    /// Do not write the run log into the config directory
    #[arg(long)]
    pub no_log: bool,

    /// Print every new file and failed copy
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Returns the match type requested on the command line, if any.
    pub fn match_type(&self) -> Option<MatchType> {
        if self.exact_only {
            Some(MatchType::Exact)
        } else if self.alternate {
            Some(MatchType::Alternate)
        } else if self.fuzzy {
            Some(MatchType::Fuzzy)
        } else {
            None
        }
    }
}

/// Runs the CLI application with the parsed arguments.
///
/// # Errors
///
/// Returns a message if the settings cannot be loaded or either directory
/// cannot be read. Failed copies and a failed log write are reported but do
/// not fail the run.
///
/// # Examples
///
/// ```no_run
/// use bezel_patcher::cli::{Args, run_cli};
/// use clap::Parser;
///
/// let args = Args::parse_from(["bezel-patcher", "/configs", "/roms"]);
/// if let Err(e) = run_cli(&args) {
///     eprintln!("Error: {}", e);
/// }
/// ```
pub fn run_cli(args: &Args) -> Result<Report, String> {
    let config = PatcherConfig::load(args.config.as_deref())
        .map_err(|e| format!("Error loading configuration: {}", e))?;
    let filters = config
        .compile_filters()
        .map_err(|e| format!("Error compiling filters: {}", e))?;
    let options = config.patch_options(args.commit, args.match_type());
    let quiet = args.json;

    if !quiet {
        if !options.commit {
            OutputFormatter::dry_run_notice("No files will be modified.");
        }
        OutputFormatter::info(&format!(
            "Patching {} with ROMs from {} ({} matches and better)",
            args.config_dir.display(),
            args.rom_dir.display(),
            options.match_type
        ));
    }

    let mut patcher = Patcher::new(FsFileManager, options).with_filters(filters);
    if !quiet {
        patcher = patcher.with_progress(OutputFormatter::create_progress_bar());
    }

    let report = patcher
        .patch_directory(&args.config_dir, &args.rom_dir)
        .map_err(|e| format!("Failed to patch directory: {}", e))?;

    if config.patcher.write_log && !args.no_log {
        match report.write_to(&args.config_dir, &config.patcher.log_prefix) {
            Ok(path) if !quiet => {
                OutputFormatter::info(&format!("Log written to {}", path.display()));
            }
            Ok(_) => {}
            Err(e) if quiet => {
                OutputFormatter::warning_stderr(&format!("Could not write log file: {}", e));
            }
            Err(e) => OutputFormatter::warning(&format!("Could not write log file: {}", e)),
        }
    }

    if quiet {
        let json = report
            .to_json()
            .map_err(|e| format!("Error rendering report: {}", e))?;
        OutputFormatter::plain(&json);
        if report.dry_run {
            OutputFormatter::plain_stderr(&commit_hint(args));
        }
        return Ok(report);
    }

    if args.verbose {
        print_new_files(&report);
    }
    for failed in &report.failed_copies {
        OutputFormatter::error(&format!(
            "Could not create {} from {}: {}",
            failed.new_name, failed.config_file, failed.reason
        ));
    }

    OutputFormatter::summary_table(&report);

    if report.dry_run {
        OutputFormatter::plain("");
        OutputFormatter::dry_run_notice(
            "Patch finished but no files were modified. Check the log before committing the changes.",
        );
        OutputFormatter::plain(&commit_hint(args));
    } else if report.failed_copies.is_empty() {
        OutputFormatter::success(&format!(
            "Successfully patched config directory {}.",
            args.config_dir.display()
        ));
    } else {
        OutputFormatter::warning("Some config files could not be created. Please review errors above.");
    }

    Ok(report)
}

/// The command that repeats this run with `--commit`.
fn commit_hint(args: &Args) -> String {
    format!(
        "Run 'bezel-patcher --commit {} {}' to commit the changes.",
        args.config_dir.display(),
        args.rom_dir.display()
    )
}

fn print_new_files(report: &Report) {
    for tier in &report.tiers {
        if tier.files.is_empty() {
            continue;
        }
        let suffix = if tier.skipped { " [SKIPPED]" } else { "" };
        OutputFormatter::header(&format!("{} matches{}", tier.match_type, suffix));
        for line in &tier.files {
            OutputFormatter::plain(&format!(" - {}", line));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;

    #[test]
    fn test_default_args() {
        let args = Args::parse_from(["bezel-patcher", "/configs", "/roms"]);

        assert_eq!(args.config_dir, PathBuf::from("/configs"));
        assert_eq!(args.rom_dir, PathBuf::from("/roms"));
        assert!(!args.commit);
        assert_eq!(args.match_type(), None);
    }

    #[test]
    fn test_match_type_flags() {
        let args = Args::parse_from(["bezel-patcher", "--exact-only", "/configs", "/roms"]);
        assert_eq!(args.match_type(), Some(MatchType::Exact));

        let args = Args::parse_from(["bezel-patcher", "-a", "--commit", "/configs", "/roms"]);
        assert_eq!(args.match_type(), Some(MatchType::Alternate));
        assert!(args.commit);

        let args = Args::parse_from(["bezel-patcher", "--fuzzy", "/configs", "/roms"]);
        assert_eq!(args.match_type(), Some(MatchType::Fuzzy));
    }

    #[test]
    fn test_conflicting_match_flags_are_rejected() {
        let result = Args::try_parse_from([
            "bezel-patcher",
            "--exact-only",
            "--fuzzy",
            "/configs",
            "/roms",
        ]);
        let error = result.expect_err("conflicting flags should be rejected");
        assert_eq!(error.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_missing_directory_argument_is_rejected() {
        let result = Args::try_parse_from(["bezel-patcher", "/configs"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_run_cli_missing_directory() {
        let args = Args::parse_from([
            "bezel-patcher",
            "--json",
            "--no-log",
            "/non/existent/configs",
            "/non/existent/roms",
        ]);
        let result = run_cli(&args);
        assert!(result.is_err());
    }

    #[test]
    fn test_commit_hint_names_both_directories() {
        let args = Args::parse_from(["bezel-patcher", "--json", "/configs", "/roms"]);
        assert_eq!(
            commit_hint(&args),
            "Run 'bezel-patcher --commit /configs /roms' to commit the changes."
        );
    }

    #[test]
    fn test_json_dry_run_keeps_report() {
        let config_dir = tempfile::TempDir::new().unwrap();
        let rom_dir = tempfile::TempDir::new().unwrap();
        std::fs::write(config_dir.path().join("Zelda (USA).cfg"), "cfg").unwrap();
        std::fs::write(rom_dir.path().join("Zelda (U).n64"), "rom").unwrap();

        let args = Args::parse_from([
            OsStr::new("bezel-patcher"),
            OsStr::new("--json"),
            OsStr::new("--no-log"),
            config_dir.path().as_os_str(),
            rom_dir.path().as_os_str(),
        ]);
        let report = run_cli(&args).unwrap();

        assert!(report.dry_run);
        assert_eq!(report.created_count(), 1);
        assert!(!config_dir.path().join("Zelda (U).cfg").exists());
    }

    #[test]
    fn test_clap_command_is_valid() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
