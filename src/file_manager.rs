/// File system access used by the patcher.
///
/// The patcher only ever needs three things from the file system: the names of
/// the files in a directory, a way to copy a file under a new name within the
/// same directory, and a way to check whether a name is already taken. These are
/// grouped behind the [`FileManager`] trait so the matching logic can be driven
/// by an in-memory directory in tests.
use std::fs;
use std::path::{Path, PathBuf};

/// Errors that can occur while patching a directory.
#[derive(Debug)]
pub enum PatchError {
    /// A directory could not be listed (missing, not a directory, or unreadable).
    DirectoryReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// A file name is not valid UTF-8 and cannot be matched or copied by name.
    InvalidFileName { path: PathBuf },
    /// The file to copy from does not exist.
    SourceMissing { path: PathBuf },
    /// Copying a file under its new name failed.
    CopyFailed {
        source: PathBuf,
        destination: PathBuf,
        source_error: std::io::Error,
    },
    /// Failed to write the log file.
    LogWriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl std::fmt::Display for PatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DirectoryReadFailed { path, source } => {
                write!(f, "Failed to read directory {}: {}", path.display(), source)
            }
            Self::InvalidFileName { path } => {
                write!(f, "File name is not valid UTF-8: {}", path.display())
            }
            Self::SourceMissing { path } => {
                write!(f, "Source file does not exist: {}", path.display())
            }
            Self::CopyFailed {
                source,
                destination,
                source_error,
            } => {
                write!(
                    f,
                    "Failed to copy {} to {}: {}",
                    source.display(),
                    destination.display(),
                    source_error
                )
            }
            Self::LogWriteFailed { path, source } => {
                write!(f, "Failed to write log file {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for PatchError {}

/// Result type for patching operations.
pub type PatchResult<T> = Result<T, PatchError>;

/// Defines the file system operations the patcher depends on.
pub trait FileManager {
    /// Returns the names of all the files in the given directory.
    fn directory_contents(&self, directory: &Path) -> PatchResult<Vec<String>>;

    /// Copies `file_name` to `new_name`, both inside `directory`.
    fn copy_file_with_name(
        &mut self,
        directory: &Path,
        file_name: &str,
        new_name: &str,
    ) -> PatchResult<()>;

    /// Returns true if `file_name` exists in `directory`.
    fn file_exists(&self, directory: &Path, file_name: &str) -> bool;
}

/// [`FileManager`] backed by the real file system.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsFileManager;

impl FileManager for FsFileManager {
    /// Lists regular files only. Subdirectories are never treated as ROMs or
    /// config files.
    fn directory_contents(&self, directory: &Path) -> PatchResult<Vec<String>> {
        let read_failed = |e| PatchError::DirectoryReadFailed {
            path: directory.to_path_buf(),
            source: e,
        };
        let entries = fs::read_dir(directory).map_err(read_failed)?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(read_failed)?;
            if !entry.file_type().map_err(read_failed)?.is_file() {
                continue;
            }
            let name = entry
                .file_name()
                .into_string()
                .map_err(|_| PatchError::InvalidFileName { path: entry.path() })?;
            names.push(name);
        }
        names.sort();

        Ok(names)
    }

    fn copy_file_with_name(
        &mut self,
        directory: &Path,
        file_name: &str,
        new_name: &str,
    ) -> PatchResult<()> {
        let source = directory.join(file_name);
        let destination = directory.join(new_name);

        if !source.is_file() {
            return Err(PatchError::SourceMissing { path: source });
        }

        fs::copy(&source, &destination).map_err(|e| PatchError::CopyFailed {
            source: source.clone(),
            destination: destination.clone(),
            source_error: e,
        })?;

        Ok(())
    }

    fn file_exists(&self, directory: &Path, file_name: &str) -> bool {
        directory.join(file_name).exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_directory_contents_lists_files_only() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();

        fs::write(base_path.join("b.cfg"), "b").expect("Failed to write file");
        fs::write(base_path.join("a.cfg"), "a").expect("Failed to write file");
        fs::create_dir(base_path.join("subdir.cfg")).expect("Failed to create directory");

        let names = FsFileManager
            .directory_contents(base_path)
            .expect("Failed to list directory");
        assert_eq!(names, vec!["a.cfg", "b.cfg"]);
    }

    #[test]
    fn test_directory_contents_missing_directory() {
        let result = FsFileManager.directory_contents(Path::new("/non/existent/path"));
        assert!(matches!(
            result,
            Err(PatchError::DirectoryReadFailed { .. })
        ));
    }

    #[test]
    fn test_copy_file_with_name() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        fs::write(base_path.join("Game (USA).cfg"), "overlay = true").expect("Failed to write");

        let mut manager = FsFileManager;
        manager
            .copy_file_with_name(base_path, "Game (USA).cfg", "Game (U) [!].cfg")
            .expect("Failed to copy file");

        assert!(manager.file_exists(base_path, "Game (USA).cfg"));
        assert!(manager.file_exists(base_path, "Game (U) [!].cfg"));
        let content =
            fs::read_to_string(base_path.join("Game (U) [!].cfg")).expect("Failed to read file");
        assert_eq!(content, "overlay = true");
    }

    #[test]
    fn test_copy_missing_source() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");

        let result = FsFileManager.copy_file_with_name(temp_dir.path(), "missing.cfg", "new.cfg");
        assert!(matches!(result, Err(PatchError::SourceMissing { .. })));
        assert!(!temp_dir.path().join("new.cfg").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_directory_contents_rejects_non_utf8_names() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let name = OsStr::from_bytes(b"Game \xff (USA).cfg");
        if fs::write(temp_dir.path().join(name), "x").is_err() {
            // some file systems refuse names that are not UTF-8
            return;
        }

        let result = FsFileManager.directory_contents(temp_dir.path());
        match result {
            Err(PatchError::InvalidFileName { path }) => {
                assert_eq!(path.file_name(), Some(name));
            }
            other => panic!("expected InvalidFileName, got {:?}", other),
        }
    }

    #[test]
    fn test_error_display() {
        let error = PatchError::SourceMissing {
            path: PathBuf::from("/configs/missing.cfg"),
        };
        assert_eq!(
            error.to_string(),
            "Source file does not exist: /configs/missing.cfg"
        );

        let error = PatchError::InvalidFileName {
            path: PathBuf::from("/roms/bad.n64"),
        };
        assert_eq!(error.to_string(), "File name is not valid UTF-8: /roms/bad.n64");
    }
}
