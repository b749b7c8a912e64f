//! bezel-patcher - keep bezel config files in step with a ROM collection
//!
//! This library matches config files against ROM file names that follow
//! different naming conventions, copies each config to the name its ROM
//! expects, and reports what was (or in a dry run would be) created.

pub mod cli;
pub mod config;
pub mod file_manager;
pub mod matcher;
pub mod output;
pub mod patcher;
pub mod report;
pub mod rom_name;

pub use config::{CompiledFilters, ConfigError, PatcherConfig};
pub use file_manager::{FileManager, FsFileManager, PatchError, PatchResult};
pub use matcher::{Match, MatchType, match_rom_sets};
pub use patcher::{PatchOptions, Patcher};
pub use report::Report;
pub use rom_name::RomName;

pub use cli::{Args, run_cli};
