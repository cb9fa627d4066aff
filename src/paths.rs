//! Directory discovery for the two candidate locations.
//!
//! The locator never asks the OS directly; it goes through a [`DirResolver`]
//! so callers (and tests) can pin both directories to known paths.
use std::env;
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::error::LocatorError;

/// Supplies the home and program directories a locator falls back to.
pub trait DirResolver {
    /// The current user's home directory.
    fn home_dir(&self) -> Result<PathBuf, LocatorError>;

    /// The directory that contains the running program.
    fn program_dir(&self) -> Result<PathBuf, LocatorError>;
}

/// Asks the operating environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemDirs;

impl DirResolver for SystemDirs {
    fn home_dir(&self) -> Result<PathBuf, LocatorError> {
        home::home_dir().ok_or(LocatorError::HomeDirUnavailable)
    }

    fn program_dir(&self) -> Result<PathBuf, LocatorError> {
        let exe_path = env::current_exe()?;
        exe_path
            .parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| {
                LocatorError::Io(io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("executable path has no parent: {}", exe_path.display()),
                ))
            })
    }
}

/// Returns the same two directories every time.
///
/// Useful for tests and for programs run from an unpacked temp directory,
/// where the executable's location is not where its config lives.
#[derive(Debug, Clone)]
pub struct FixedDirs {
    pub home: PathBuf,
    pub program: PathBuf,
}

impl FixedDirs {
    pub fn new(home: impl Into<PathBuf>, program: impl Into<PathBuf>) -> Self {
        Self {
            home: home.into(),
            program: program.into(),
        }
    }
}

impl DirResolver for FixedDirs {
    fn home_dir(&self) -> Result<PathBuf, LocatorError> {
        Ok(self.home.clone())
    }

    fn program_dir(&self) -> Result<PathBuf, LocatorError> {
        Ok(self.program.clone())
    }
}

/// Makes `path` absolute against the current directory and folds `.` and
/// `..` segments lexically. Symlinks are not resolved.
pub fn absolute(path: &Path) -> io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(normalize(path))
    } else {
        Ok(normalize(&env::current_dir()?.join(path)))
    }
}

/// Lexical normalization. `..` at the root stays at the root.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            Component::Normal(part) => out.push(part),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_folds_dots() {
        assert_eq!(normalize(Path::new("/a/./b/../c")), PathBuf::from("/a/c"));
        assert_eq!(normalize(Path::new("/a/b/c/../../d")), PathBuf::from("/a/d"));
    }

    #[test]
    fn test_normalize_parent_at_root() {
        assert_eq!(normalize(Path::new("/../etc")), PathBuf::from("/etc"));
        assert_eq!(normalize(Path::new("../../x")), PathBuf::from("../../x"));
    }

    #[test]
    fn test_absolute_relative_path() {
        let cwd = env::current_dir().unwrap();
        let result = absolute(Path::new("some/./dir")).unwrap();
        assert!(result.is_absolute());
        assert_eq!(result, cwd.join("some").join("dir"));
    }

    #[test]
    fn test_fixed_dirs() {
        let dirs = FixedDirs::new("/home/someone", "/opt/app");
        assert_eq!(dirs.home_dir().unwrap(), PathBuf::from("/home/someone"));
        assert_eq!(dirs.program_dir().unwrap(), PathBuf::from("/opt/app"));
    }

    #[test]
    fn test_system_program_dir_is_absolute() {
        let dir = SystemDirs.program_dir().unwrap();
        assert!(dir.is_absolute());
    }
}
