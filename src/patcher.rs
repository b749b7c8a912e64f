/// Patching of a config directory against a ROM directory.
///
/// The patcher lists both directories, matches every config file against every
/// ROM, and copies config files to the name each matched ROM expects. Nothing
/// is written unless the run is committed, so a dry run doubles as a preview.
use crate::config::CompiledFilters;
use crate::file_manager::{FileManager, PatchResult};
use crate::matcher::{MatchType, match_rom_sets};
use crate::report::{FailedCopy, Report, ReportHeader};
use crate::rom_name::{RomName, file_extension};
use indicatif::ProgressBar;
use std::path::Path;

/// Default extension of config files.
pub const DEFAULT_CONFIG_EXTENSION: &str = "cfg";

/// Options for a single patch run.
#[derive(Debug, Clone)]
pub struct PatchOptions {
    /// Write the new config files. When false, nothing is written.
    pub commit: bool,
    /// The weakest match type that is allowed to create files.
    pub match_type: MatchType,
    /// Extension of config files, without the dot.
    pub config_extension: String,
}

impl Default for PatchOptions {
    fn default() -> Self {
        Self {
            commit: false,
            match_type: MatchType::Fuzzy,
            config_extension: DEFAULT_CONFIG_EXTENSION.to_string(),
        }
    }
}

/// Patches config directories using a [`FileManager`].
pub struct Patcher<F: FileManager> {
    file_manager: F,
    options: PatchOptions,
    filters: Option<CompiledFilters>,
    progress: ProgressBar,
}

impl<F: FileManager> Patcher<F> {
    /// Creates a patcher that reports no progress and applies no name filters.
    pub fn new(file_manager: F, options: PatchOptions) -> Self {
        Self {
            file_manager,
            options,
            filters: None,
            progress: ProgressBar::hidden(),
        }
    }

    /// Only consider files accepted by `filters`.
    pub fn with_filters(mut self, filters: CompiledFilters) -> Self {
        self.filters = Some(filters);
        self
    }

    /// Report copy progress on `progress`.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    pub fn into_file_manager(self) -> F {
        self.file_manager
    }

    /// Patches `config_dir` with the ROMs found in `rom_dir`.
    ///
    /// New files are only created for matches allowed by the configured match
    /// type, and only when committing. A target name that already exists is
    /// never overwritten; it may have been created by an earlier match in the
    /// same run. Copy failures are recorded in the report and do not stop the
    /// run.
    ///
    /// # Errors
    ///
    /// Returns an error if either directory cannot be listed. Nothing is
    /// written in that case.
    pub fn patch_directory(&mut self, config_dir: &Path, rom_dir: &Path) -> PatchResult<Report> {
        let config_dir_files = self.file_manager.directory_contents(config_dir)?;
        let rom_dir_files = self.file_manager.directory_contents(rom_dir)?;

        let config_files: Vec<RomName> = config_dir_files
            .into_iter()
            .filter(|name| self.is_config_file(name) && self.accepts(name))
            .map(RomName::new)
            .collect();
        let roms: Vec<RomName> = rom_dir_files
            .into_iter()
            .filter(|name| self.accepts(name))
            .map(RomName::new)
            .collect();

        let extension = self.options.config_extension.clone();
        let mut matches = match_rom_sets(&config_files, &roms, &extension);
        let mut failed_copies = Vec::new();

        self.progress.set_length(matches.len() as u64);
        for (index, found) in matches.iter_mut().enumerate() {
            self.progress.inc(1);

            let (Some(config_file), Some(rom)) = (found.config_file, found.rom) else {
                continue;
            };
            if found.is_existing || !found.match_type.should_include(self.options.match_type) {
                continue;
            }

            // an earlier match may already have created this file
            let new_name = rom.config_name(&extension);
            if self.file_manager.file_exists(config_dir, &new_name) {
                found.is_existing = true;
                continue;
            }

            if !self.options.commit {
                continue;
            }

            self.progress.set_message(new_name.clone());
            if let Err(e) =
                self.file_manager
                    .copy_file_with_name(config_dir, &config_file.file_name, &new_name)
            {
                self.progress.println(format!("Failed to create {}: {}", new_name, e));
                failed_copies.push(FailedCopy {
                    match_index: index,
                    config_file: config_file.file_name.clone(),
                    new_name,
                    reason: e.to_string(),
                });
            }
        }
        self.progress.finish_and_clear();

        let header = ReportHeader {
            config_dir: config_dir.to_path_buf(),
            rom_dir: rom_dir.to_path_buf(),
            config_count: config_files.len(),
            rom_count: roms.len(),
            requested: self.options.match_type,
            commit: self.options.commit,
            config_extension: extension,
        };

        Ok(Report::from_matches(header, &matches, failed_copies))
    }

    /// Returns true if `file_name` has the config file extension.
    fn is_config_file(&self, file_name: &str) -> bool {
        file_extension(file_name)
            .is_some_and(|ext| ext.eq_ignore_ascii_case(&self.options.config_extension))
    }

    fn accepts(&self, file_name: &str) -> bool {
        self.filters
            .as_ref()
            .is_none_or(|filters| filters.should_include(Path::new(file_name)))
    }
}
