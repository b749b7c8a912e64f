//! Run report written to the config directory after every patch.
//!
//! The report is plain text meant to be read before committing a run: it lists
//! config files without a ROM, ROMs without a config, and every file that was
//! (or in a dry run would be) created, grouped by match type.

use crate::file_manager::{PatchError, PatchResult};
use crate::matcher::{Match, MatchType};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// A copy that was attempted and failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedCopy {
    /// Index of the failed match in the match list.
    #[serde(skip)]
    pub match_index: usize,
    pub config_file: String,
    pub new_name: String,
    pub reason: String,
}

/// New files for one match type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TierReport {
    pub match_type: MatchType,
    /// The match type was excluded by the requested match type, so no files
    /// were created for it.
    pub skipped: bool,
    /// Sorted `"<rom> -> <new config> copied from: <config>"` lines.
    pub files: Vec<String>,
}

impl TierReport {
    fn title(&self) -> &'static str {
        match self.match_type {
            MatchType::Exact => "NEW FILES (EXACT MATCHES)",
            MatchType::Alternate => "NEW FILES (GOOD MATCHES)",
            MatchType::Fuzzy => "NEW FILES (FUZZY MATCHES)",
            MatchType::None => "NO MATCHES",
        }
    }
}

/// Settings of the run a report describes.
#[derive(Debug, Clone)]
pub struct ReportHeader {
    pub config_dir: PathBuf,
    pub rom_dir: PathBuf,
    pub config_count: usize,
    pub rom_count: usize,
    pub requested: MatchType,
    pub commit: bool,
    pub config_extension: String,
}

/// Summary of a single patch run.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    pub dry_run: bool,
    pub requested_match_type: MatchType,
    pub config_dir: PathBuf,
    pub rom_dir: PathBuf,
    pub config_count: usize,
    pub rom_count: usize,
    /// Config files that did not match any ROM.
    pub configs_without_rom: Vec<String>,
    /// ROMs that did not match any config file.
    pub roms_without_config: Vec<String>,
    pub tiers: Vec<TierReport>,
    pub failed_copies: Vec<FailedCopy>,
}

impl Report {
    /// Builds the report for a finished (or simulated) run.
    ///
    /// Matches flagged as existing, matches whose config file already has the
    /// target name, and failed copies are left out of the new file lists.
    pub fn from_matches(header: ReportHeader, matches: &[Match<'_>], failed_copies: Vec<FailedCopy>) -> Self {
        let mut configs_without_rom = Vec::new();
        let mut roms_without_config = Vec::new();
        let mut tiers: Vec<TierReport> = MatchType::TIERS
            .iter()
            .map(|&match_type| TierReport {
                match_type,
                skipped: !match_type.should_include(header.requested),
                files: Vec::new(),
            })
            .collect();

        for (index, found) in matches.iter().enumerate() {
            match (found.match_type, found.config_file, found.rom) {
                (MatchType::None, Some(config_file), _) => {
                    configs_without_rom.push(config_file.file_name.clone());
                }
                (MatchType::None, None, Some(rom)) => {
                    roms_without_config.push(rom.file_name.clone());
                }
                (match_type, Some(config_file), Some(rom)) => {
                    if found.is_existing
                        || found.is_already_named(&header.config_extension)
                        || failed_copies.iter().any(|failed| failed.match_index == index)
                    {
                        continue;
                    }
                    if let Some(tier) = tiers.iter_mut().find(|tier| tier.match_type == match_type) {
                        tier.files.push(format!(
                            "{} -> {} copied from: {}",
                            rom.file_name,
                            rom.config_name(&header.config_extension),
                            config_file.file_name
                        ));
                    }
                }
                _ => {}
            }
        }

        configs_without_rom.sort();
        roms_without_config.sort();
        for tier in &mut tiers {
            tier.files.sort();
        }

        let mut failed_copies = failed_copies;
        failed_copies.sort_by(|a, b| a.new_name.cmp(&b.new_name));

        Self {
            generated_at: Utc::now(),
            dry_run: !header.commit,
            requested_match_type: header.requested,
            config_dir: header.config_dir,
            rom_dir: header.rom_dir,
            config_count: header.config_count,
            rom_count: header.rom_count,
            configs_without_rom,
            roms_without_config,
            tiers,
            failed_copies,
        }
    }

    /// Number of files listed under match types that were skipped.
    pub fn skipped_count(&self) -> usize {
        self.tiers
            .iter()
            .filter(|tier| tier.skipped)
            .map(|tier| tier.files.len())
            .sum()
    }

    /// Number of files that were created (or would be, in a dry run).
    pub fn created_count(&self) -> usize {
        self.tiers
            .iter()
            .filter(|tier| !tier.skipped)
            .map(|tier| tier.files.len())
            .sum()
    }

    /// Returns the new files listed for `match_type`.
    pub fn files_for(&self, match_type: MatchType) -> &[String] {
        self.tiers
            .iter()
            .find(|tier| tier.match_type == match_type)
            .map(|tier| tier.files.as_slice())
            .unwrap_or(&[])
    }

    /// Renders the report as the text stored in the log file.
    pub fn render(&self) -> String {
        let mut log = String::new();
        if self.dry_run {
            log.push_str("[DRY]\n\n");
        }

        log.push_str(&format!(
            "Found {} config files in: {}\nFound {} roms in: {}\n\n",
            self.config_count,
            self.config_dir.display(),
            self.rom_count,
            self.rom_dir.display()
        ));
        log.push_str(&format!(
            "Missing ROMs: {}\nMissing config: {}\n\n",
            self.configs_without_rom.len(),
            self.roms_without_config.len()
        ));
        log.push_str(&format!("Created {} new files\n", self.created_count()));
        log.push_str(&format!("Skipped {} new files\n\n", self.skipped_count()));

        push_section(&mut log, "CONFIG WITH MISSING ROMS", &self.configs_without_rom);
        push_section(&mut log, "ROMS WITH MISSING CONFIG", &self.roms_without_config);

        for tier in &self.tiers {
            let title = if tier.skipped {
                format!("{} [SKIPPED]", tier.title())
            } else {
                tier.title().to_string()
            };
            push_section(&mut log, &title, &tier.files);
        }

        let failures: Vec<String> = self
            .failed_copies
            .iter()
            .map(|failed| {
                format!(
                    "{} copied from: {} ({})",
                    failed.new_name, failed.config_file, failed.reason
                )
            })
            .collect();
        push_section(&mut log, "FAILED COPIES", &failures);

        log
    }

    /// Renders the report as pretty printed JSON.
    pub fn to_json(&self) -> PatchResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| PatchError::LogWriteFailed {
            path: self.config_dir.clone(),
            source: std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("JSON serialization failed: {}", e),
            ),
        })
    }

    /// Returns the log file name for this report, e.g. `patch-log.1700000000.log`.
    pub fn log_file_name(&self, prefix: &str) -> String {
        format!("{}.{}.log", prefix, self.generated_at.timestamp())
    }

    /// Writes the rendered report into `directory` and returns the log file path.
    pub fn write_to(&self, directory: &Path, prefix: &str) -> PatchResult<PathBuf> {
        let path = directory.join(self.log_file_name(prefix));
        fs::write(&path, self.render()).map_err(|e| PatchError::LogWriteFailed {
            path: path.clone(),
            source: e,
        })?;
        Ok(path)
    }
}

/// Appends a titled, newline separated list followed by a blank line.
/// Empty lists are left out entirely.
fn push_section(log: &mut String, title: &str, lines: &[String]) {
    if lines.is_empty() {
        return;
    }
    log.push_str(title);
    log.push('\n');
    log.push_str(&lines.join("\n"));
    log.push_str("\n\n");
}
