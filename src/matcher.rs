//! Pairing of config files with ROMs.
//!
//! Every config file is compared against every ROM. For each pair the strongest
//! applicable match type wins:
//!
//! 1. [`MatchType::Exact`] - the base names are identical
//! 2. [`MatchType::Alternate`] - the config's base name is one of the ROM's alternate names
//! 3. [`MatchType::Fuzzy`] - the two sets of alternate names overlap
//!
//! Config files and ROMs that end up without any counterpart are recorded with
//! [`MatchType::None`] so they can be reported.

use crate::rom_name::RomName;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How two file names were matched, from most to least confident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    /// The names (minus tags such as `(U)` or `[!]`) are identical.
    Exact,
    /// One of the ROM's alternate names is the config's name.
    Alternate,
    /// The ROM and the config share an alternate name.
    Fuzzy,
    /// No counterpart was found.
    None,
}

impl MatchType {
    /// The match types that can produce new files, in report order.
    pub const TIERS: [MatchType; 3] = [MatchType::Exact, MatchType::Alternate, MatchType::Fuzzy];

    /// Returns whether a match of this type should be acted on when the caller
    /// accepts matches up to `requested`.
    ///
    /// # Examples
    ///
    /// ```
    /// use bezel_patcher::matcher::MatchType;
    ///
    /// assert!(MatchType::Exact.should_include(MatchType::Alternate));
    /// assert!(!MatchType::Fuzzy.should_include(MatchType::Alternate));
    /// assert!(!MatchType::None.should_include(MatchType::Fuzzy));
    /// ```
    pub fn should_include(self, requested: MatchType) -> bool {
        if self == MatchType::None || requested == MatchType::None {
            return false;
        }
        self <= requested
    }

    /// Returns the lowercase name used in settings files and JSON output.
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchType::Exact => "exact",
            MatchType::Alternate => "alternate",
            MatchType::Fuzzy => "fuzzy",
            MatchType::None => "none",
        }
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A pairing between a config file and a ROM.
///
/// Either side may be missing when no counterpart was found, in which case
/// `match_type` is [`MatchType::None`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match<'a> {
    pub config_file: Option<&'a RomName>,
    pub rom: Option<&'a RomName>,
    pub match_type: MatchType,
    /// The config for this ROM already exists, nothing needs to be copied.
    pub is_existing: bool,
}

impl<'a> Match<'a> {
    fn pair(config_file: &'a RomName, rom: &'a RomName, match_type: MatchType) -> Self {
        Self {
            config_file: Some(config_file),
            rom: Some(rom),
            match_type,
            is_existing: false,
        }
    }

    fn missing_rom(config_file: &'a RomName) -> Self {
        Self {
            config_file: Some(config_file),
            rom: None,
            match_type: MatchType::None,
            is_existing: false,
        }
    }

    fn missing_config(rom: &'a RomName) -> Self {
        Self {
            config_file: None,
            rom: Some(rom),
            match_type: MatchType::None,
            is_existing: false,
        }
    }

    /// Returns the file name the config should be copied to, if this match
    /// pairs a config file with a ROM.
    pub fn new_config_name(&self, extension: &str) -> Option<String> {
        match (self.config_file, self.rom) {
            (Some(_), Some(rom)) => Some(rom.config_name(extension)),
            _ => None,
        }
    }

    /// Returns true if the config file already carries the name it would be
    /// copied to (case-insensitive).
    pub fn is_already_named(&self, extension: &str) -> bool {
        match (self.config_file, self.new_config_name(extension)) {
            (Some(config_file), Some(new_name)) => {
                config_file.file_name.to_lowercase() == new_name.to_lowercase()
            }
            _ => false,
        }
    }
}

/// Works out how `config_file` relates to `rom`, preferring exact matches,
/// followed by alternate matches, then fuzzy matches.
pub fn match_type(config_file: &RomName, rom: &RomName) -> MatchType {
    if config_file.name == rom.name {
        MatchType::Exact
    } else if rom.has_alternate(&config_file.name) {
        MatchType::Alternate
    } else if config_file.shares_alternate_with(rom) {
        MatchType::Fuzzy
    } else {
        MatchType::None
    }
}

/// Matches every config file against every ROM.
///
/// A config file may match several ROMs and a ROM may match several config
/// files; each pair is recorded once with its strongest match type. Exact
/// matches whose config file is already named after the ROM are flagged as
/// existing. Unmatched config files and ROMs are appended as
/// [`MatchType::None`] records, ROMs first.
pub fn match_rom_sets<'a>(
    config_files: &'a [RomName],
    roms: &'a [RomName],
    extension: &str,
) -> Vec<Match<'a>> {
    let mut matches = Vec::new();
    let mut config_matched = vec![false; config_files.len()];
    let mut rom_matched = vec![false; roms.len()];

    for (config_index, config_file) in config_files.iter().enumerate() {
        for (rom_index, rom) in roms.iter().enumerate() {
            let match_type = match_type(config_file, rom);
            if match_type == MatchType::None {
                continue;
            }

            let mut found = Match::pair(config_file, rom, match_type);
            if match_type == MatchType::Exact {
                found.is_existing = found.is_already_named(extension);
            }
            matches.push(found);

            config_matched[config_index] = true;
            rom_matched[rom_index] = true;
        }
    }

    for (rom, _) in roms.iter().zip(&rom_matched).filter(|(_, matched)| !**matched) {
        matches.push(Match::missing_config(rom));
    }

    for (config_file, _) in config_files
        .iter()
        .zip(&config_matched)
        .filter(|(_, matched)| !**matched)
    {
        matches.push(Match::missing_rom(config_file));
    }

    matches
}
