//! ROM name normalization for matching files across naming conventions.
//!
//! ROM sets and bezel packs rarely agree on how a title is written. This module
//! reduces a file name to a lowercase base name (no extension, no region or dump
//! tags) and derives the alternate spellings the name is commonly found under.
//!
//! # Examples
//!
//! ```
//! use bezel_patcher::rom_name::RomName;
//!
//! let rom = RomName::new("New Tetris, The (USA).n64");
//! assert_eq!(rom.name, "new tetris, the");
//! assert!(rom.alternate_names.contains(&"the new tetris".to_string()));
//! assert_eq!(rom.config_name("cfg"), "New Tetris, The (USA).cfg");
//! ```

/// Characters that start a tag or extension, e.g. `(USA)`, `[!]` or `.n64`.
const TAG_MARKERS: [char; 3] = ['.', '[', '('];

/// No-Intro style names move a leading "The" behind the title.
const THE_PREFIX: &str = "the ";
const THE_SUFFIX: &str = ", the";

/// Separator between a title and its subtitle.
const SUBTITLE_SEPARATOR: &str = " - ";

/// Identity of a single file derived from its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RomName {
    /// The original file name, used for file operations and display.
    pub file_name: String,
    /// Lowercase name with extension and tags removed.
    pub name: String,
    /// Every spelling this name is known under, including `name` itself.
    pub alternate_names: Vec<String>,
}

impl RomName {
    /// Builds the identity of `file_name` and works out its alternate names.
    pub fn new(file_name: impl Into<String>) -> Self {
        let file_name = file_name.into();
        let name = base_name(&file_name);
        let alternate_names = alternate_names(&name, true);

        Self {
            file_name,
            name,
            alternate_names,
        }
    }

    /// Returns the config file name this file should have, keeping its stem
    /// and replacing its extension with `extension`.
    pub fn config_name(&self, extension: &str) -> String {
        format!("{}.{}", file_stem(&self.file_name), extension)
    }

    /// Returns true if `name` is one of this file's alternate names.
    pub fn has_alternate(&self, name: &str) -> bool {
        self.alternate_names.iter().any(|alternate| alternate == name)
    }

    /// Returns true if the two files share at least one alternate name.
    pub fn shares_alternate_with(&self, other: &RomName) -> bool {
        self.alternate_names
            .iter()
            .any(|alternate| other.has_alternate(alternate))
    }
}

/// Returns the extension of `file_name` without the dot, if it has one.
pub fn file_extension(file_name: &str) -> Option<&str> {
    file_name.rfind('.').map(|i| &file_name[i + 1..])
}

/// Returns `file_name` with its last extension removed.
fn file_stem(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(i) => &file_name[..i],
        None => file_name,
    }
}

/// Returns the lowercase name of the file minus any extensions and tags,
/// i.e. `(U)`, `[!]` or `.n64`.
///
/// A marker at the very start of the name is ignored so that names like
/// `.hidden` or `(Beta) Game` never reduce to an empty string.
pub fn base_name(file_name: &str) -> String {
    let end = TAG_MARKERS
        .iter()
        .filter_map(|marker| file_name.find(*marker))
        .filter(|&i| i > 0)
        .min()
        .unwrap_or(file_name.len());

    file_name[..end].trim().to_lowercase()
}

/// Works out all the possible alternate names for the given name.
///
/// With `recurse` set, the relocated "The" spelling is expanded once more so its
/// apostrophe variants are included. The nested call never recurses again.
pub fn alternate_names(name: &str, recurse: bool) -> Vec<String> {
    let name = name.to_lowercase();
    let mut alternates = vec![name.clone()];

    if let Some(relocated) = relocate_the(&name) {
        if recurse {
            let nested = alternate_names(&relocated, false);
            alternates.push(relocated);
            alternates.extend(nested);
        } else {
            alternates.push(relocated);
        }
    }

    if name.contains('\'') {
        alternates.push(name.replace('\'', ""));
    }

    unique_items(alternates)
}

/// Moves "The" between the front of the title and the ", The" suffix form.
///
/// `the simpsons - ultimate` becomes `simpsons, the - ultimate` and vice versa.
/// Returns `None` when the name has no "The" to move.
fn relocate_the(name: &str) -> Option<String> {
    if let Some(rest) = name.strip_prefix(THE_PREFIX) {
        // the suffix belongs on the title, before any subtitle
        let mut parts: Vec<String> = rest.split(SUBTITLE_SEPARATOR).map(String::from).collect();
        parts[0].push_str(THE_SUFFIX);
        return Some(parts.join(SUBTITLE_SEPARATOR));
    }

    name.find(THE_SUFFIX).map(|i| {
        format!(
            "{}{}{}",
            THE_PREFIX,
            &name[..i],
            &name[i + THE_SUFFIX.len()..]
        )
    })
}

/// Removes duplicates, keeping the first occurrence of each item.
fn unique_items(items: Vec<String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        if !unique.contains(&item) {
            unique.push(item);
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn as_set(names: &[String]) -> HashSet<&str> {
        names.iter().map(String::as_str).collect()
    }

    #[test]
    fn test_base_name_strips_tags_and_extension() {
        assert_eq!(
            base_name("Tony Hawk's Collection, The (USA) [!].n64"),
            "tony hawk's collection, the"
        );
        assert_eq!(base_name("Goldeneye 007 [!].z64"), "goldeneye 007");
        assert_eq!(base_name("Mario Kart 64.n64"), "mario kart 64");
    }

    #[test]
    fn test_base_name_without_markers_is_whole_name() {
        assert_eq!(base_name("  Wave Race 64  "), "wave race 64");
    }

    #[test]
    fn test_base_name_ignores_leading_marker() {
        assert_eq!(base_name(".hidden"), ".hidden");
        assert_eq!(base_name("(Beta) Game (USA).n64"), "(beta) game (usa)");
    }

    #[test]
    fn test_base_name_uses_first_marker() {
        assert_eq!(base_name("Dr. Mario 64 (USA).n64"), "dr");
        assert_eq!(base_name("F-Zero X [!] (USA).n64"), "f-zero x");
    }

    #[test]
    fn test_rom_with_trailing_the() {
        let rom = RomName::new("Tony Hawk's Collection, The (USA) [!].n64");

        assert_eq!(rom.file_name, "Tony Hawk's Collection, The (USA) [!].n64");
        assert_eq!(rom.name, "tony hawk's collection, the");
        assert_eq!(
            as_set(&rom.alternate_names),
            HashSet::from([
                "the tony hawk's collection",
                "the tony hawks collection",
                "tony hawk's collection, the",
                "tony hawks collection, the",
            ])
        );
    }

    #[test]
    fn test_rom_with_leading_the_and_subtitle() {
        let rom = RomName::new("The Tony Hawk's Collection - Ultimate Edition (USA) [!].n64");

        assert_eq!(rom.name, "the tony hawk's collection - ultimate edition");
        assert_eq!(
            as_set(&rom.alternate_names),
            HashSet::from([
                "the tony hawk's collection - ultimate edition",
                "the tony hawks collection - ultimate edition",
                "tony hawk's collection, the - ultimate edition",
                "tony hawks collection, the - ultimate edition",
            ])
        );
    }

    #[test]
    fn test_rom_with_trailing_the_and_subtitle() {
        let rom = RomName::new("Tony Hawk's Collection, The - Ultimate Edition (USA) [!].n64");

        assert_eq!(rom.name, "tony hawk's collection, the - ultimate edition");
        assert_eq!(
            as_set(&rom.alternate_names),
            HashSet::from([
                "the tony hawk's collection - ultimate edition",
                "the tony hawks collection - ultimate edition",
                "tony hawk's collection, the - ultimate edition",
                "tony hawks collection, the - ultimate edition",
            ])
        );
    }

    #[test]
    fn test_same_rom_with_different_name_format_has_same_alternates() {
        let leading = RomName::new("The Tony Hawk's Collection (USA) [!].n64");
        let trailing = RomName::new("Tony Hawk's Collection, The (USA) [!].n64");

        assert_eq!(
            as_set(&leading.alternate_names),
            as_set(&trailing.alternate_names)
        );
    }

    #[test]
    fn test_alternates_always_contain_name() {
        for file_name in [
            "AeroFighters Assault (USA).n64",
            "The New Tetris (USA).n64",
            "Addams Family, The - Pugsley's Scavenger Hunt (USA).zip",
            "(Beta).n64",
            "",
        ] {
            let rom = RomName::new(file_name);
            assert!(rom.has_alternate(&rom.name), "{file_name}");
        }
    }

    #[test]
    fn test_alternates_are_unique_and_ordered() {
        let alternates = alternate_names("the new tetris", true);
        assert_eq!(alternates, vec!["the new tetris", "new tetris, the"]);
    }

    #[test]
    fn test_alternates_regenerate_from_name_and_relocated_forms() {
        for file_name in [
            "The New Tetris (USA).n64",
            "New Tetris, The (USA).cfg",
            "The Tony Hawk's Collection (USA) [!].n64",
            "Tony Hawk's Collection, The - Ultimate Edition (USA) [!].n64",
            "Addams Family, The - Pugsley's Scavenger Hunt (USA).zip",
            "AeroFighter's Assault (USA).n64",
            "Wave Race 64 (U).n64",
        ] {
            let rom = RomName::new(file_name);
            assert_eq!(alternate_names(&rom.name, true), rom.alternate_names, "{file_name}");

            // apostrophe-stripped spellings cannot bring the apostrophe back
            let keeps_apostrophes = |alt: &&String| alt.contains('\'') == rom.name.contains('\'');
            for alt in rom.alternate_names.iter().filter(keeps_apostrophes) {
                assert_eq!(
                    as_set(&alternate_names(alt, true)),
                    as_set(&rom.alternate_names),
                    "{file_name} via {alt}"
                );
            }
        }
    }

    #[test]
    fn test_apostrophe_variant() {
        let alternates = alternate_names("aerofighter's assault", true);
        assert_eq!(alternates, vec!["aerofighter's assault", "aerofighters assault"]);
    }

    #[test]
    fn test_config_name_replaces_extension() {
        let rom = RomName::new("The New Tetris (USA).n64");
        assert_eq!(rom.config_name("cfg"), "The New Tetris (USA).cfg");

        let rom = RomName::new("Wave Race 64");
        assert_eq!(rom.config_name("cfg"), "Wave Race 64.cfg");
    }

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension("Game (USA).cfg"), Some("cfg"));
        assert_eq!(file_extension("archive.tar.gz"), Some("gz"));
        assert_eq!(file_extension("README"), None);
    }

    #[test]
    fn test_shares_alternate_with() {
        let config = RomName::new("AeroFighter's Assault (USA).cfg");
        let rom = RomName::new("AeroFighters Assault (USA).n64");
        let other = RomName::new("Goldeneye 007 (U) [!].n64");

        assert!(config.shares_alternate_with(&rom));
        assert!(!config.shares_alternate_with(&other));
    }
}
