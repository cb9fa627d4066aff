//! Locates one config file across the home and program directories.
//!
//! A file in the home directory always takes precedence over one in the
//! program directory. Existence is checked on every call; nothing is cached,
//! so creating or removing either file takes effect immediately.
//!
//! No locking is done. Two processes force-writing the same path at once get
//! whatever the filesystem gives them, usually last writer wins.
use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;

use tracing::debug;

use crate::error::LocatorError;
use crate::paths::{self, DirResolver, SystemDirs};

/// One of the two places a config file can live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Location {
    Home,
    Program,
}

impl Location {
    /// Both locations, highest precedence first.
    pub const PRECEDENCE: [Location; 2] = [Location::Home, Location::Program];
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Home => f.write_str("home"),
            Location::Program => f.write_str("program"),
        }
    }
}

impl FromStr for Location {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "home" => Ok(Location::Home),
            "program" => Ok(Location::Program),
            other => Err(format!("unknown location '{}', expected 'home' or 'program'", other)),
        }
    }
}

/// A candidate path and whether a file was there when it was checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub location: Location,
    pub path: PathBuf,
    pub exists: bool,
}

/// Owns the naming and precedence policy for a single config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLocator {
    file_name: String,
    program_dir: PathBuf,
    home_dir: PathBuf,
}

impl ConfigLocator {
    /// Creates a locator using the real home and program directories.
    pub fn new(file_name: impl Into<String>) -> Result<Self, LocatorError> {
        Self::with_resolver(file_name, None, None, &SystemDirs)
    }

    /// Creates a locator, detecting only the directories left as `None`.
    ///
    /// Passing `program_dir` is useful when the program is bundled by an
    /// executable packer or run from a temp directory.
    pub fn with_dirs(
        file_name: impl Into<String>,
        program_dir: Option<PathBuf>,
        home_dir: Option<PathBuf>,
    ) -> Result<Self, LocatorError> {
        Self::with_resolver(file_name, program_dir, home_dir, &SystemDirs)
    }

    /// Creates a locator, asking `resolver` for any directory not given.
    pub fn with_resolver(
        file_name: impl Into<String>,
        program_dir: Option<PathBuf>,
        home_dir: Option<PathBuf>,
        resolver: &dyn DirResolver,
    ) -> Result<Self, LocatorError> {
        let file_name = file_name.into();
        validate_file_name(&file_name)?;

        let program_dir = match program_dir {
            Some(dir) => dir,
            None => resolver.program_dir()?,
        };
        let home_dir = match home_dir {
            Some(dir) => dir,
            None => resolver.home_dir()?,
        };

        let locator = Self {
            file_name,
            program_dir: paths::absolute(&program_dir)?,
            home_dir: paths::absolute(&home_dir)?,
        };
        debug!(
            file_name = %locator.file_name,
            home_dir = %locator.home_dir.display(),
            program_dir = %locator.program_dir.display(),
            "config locator ready"
        );
        Ok(locator)
    }

    /// The bare file name, without any directory.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// The directory treated as the program directory.
    pub fn program_dir(&self) -> &Path {
        &self.program_dir
    }

    /// The directory treated as the user's home directory.
    pub fn home_dir(&self) -> &Path {
        &self.home_dir
    }

    /// Full path of the config file in the home directory, whether or not
    /// the file exists.
    pub fn path_in_home_dir(&self) -> PathBuf {
        self.location_of(Location::Home)
    }

    /// Full path of the config file in the program directory, whether or not
    /// the file exists.
    pub fn path_in_program_dir(&self) -> PathBuf {
        self.location_of(Location::Program)
    }

    pub fn location_of(&self, location: Location) -> PathBuf {
        let dir = match location {
            Location::Home => &self.home_dir,
            Location::Program => &self.program_dir,
        };
        paths::normalize(&dir.join(&self.file_name))
    }

    /// Writes `content` to the home directory copy.
    ///
    /// Fails with [`LocatorError::AlreadyExists`] if the file is there and
    /// `forced` is false; the existing file is left untouched. Missing
    /// parent directories are not created.
    pub fn create_in_home_dir(&self, content: &str, forced: bool) -> Result<(), LocatorError> {
        self.create_in(Location::Home, content, forced)
    }

    /// Same as [`create_in_home_dir`](Self::create_in_home_dir), for the
    /// program directory.
    pub fn create_in_program_dir(&self, content: &str, forced: bool) -> Result<(), LocatorError> {
        self.create_in(Location::Program, content, forced)
    }

    pub fn create_in(
        &self,
        location: Location,
        content: &str,
        forced: bool,
    ) -> Result<(), LocatorError> {
        let path = self.location_of(location);
        debug!(%location, path = %path.display(), forced, "writing config file");
        write_file(&path, content, forced)
    }

    /// Path of the config file the application should read.
    ///
    /// The home directory copy wins when both exist.
    pub fn active_config_path(&self) -> Result<PathBuf, LocatorError> {
        self.active_location().map(|(_, path)| path)
    }

    /// Like [`active_config_path`](Self::active_config_path), also reporting
    /// which location won.
    pub fn active_location(&self) -> Result<(Location, PathBuf), LocatorError> {
        for location in Location::PRECEDENCE {
            let path = self.location_of(location);
            if path.is_file() {
                debug!(%location, path = %path.display(), "active config file");
                return Ok((location, path));
            }
        }

        debug!(file_name = %self.file_name, "no config file found");
        Err(LocatorError::NotFound {
            home: self.path_in_home_dir(),
            program: self.path_in_program_dir(),
        })
    }

    /// Both candidates in precedence order, with their current existence.
    pub fn candidates(&self) -> Vec<Candidate> {
        Location::PRECEDENCE
            .iter()
            .map(|&location| {
                let path = self.location_of(location);
                let exists = path.is_file();
                Candidate {
                    location,
                    path,
                    exists,
                }
            })
            .collect()
    }
}

fn validate_file_name(file_name: &str) -> Result<(), LocatorError> {
    // exactly one normal component; rejects drive prefixes like `C:app.cfg`
    let mut components = Path::new(file_name).components();
    let single_normal = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );
    let invalid = !single_normal
        || file_name.contains('/')
        || file_name.contains('\\')
        || file_name.contains('\0');
    if invalid {
        return Err(LocatorError::InvalidFileName(file_name.to_string()));
    }
    Ok(())
}

/// Creates or, when `forced`, truncates `path` and writes `content`.
///
/// A non-forced write uses an exclusive create, so an existing file is
/// detected and left alone by the same call that would have created it.
fn write_file(path: &Path, content: &str, forced: bool) -> Result<(), LocatorError> {
    let mut options = OpenOptions::new();
    options.write(true);
    if forced {
        options.create(true).truncate(true);
    } else {
        options.create_new(true);
    }

    let mut file = match options.open(path) {
        Ok(file) => file,
        Err(e) if !forced && e.kind() == io::ErrorKind::AlreadyExists => {
            return Err(LocatorError::AlreadyExists {
                path: path.to_path_buf(),
            });
        }
        Err(e) => return Err(e.into()),
    };
    file.write_all(content.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_parse() {
        assert_eq!("home".parse::<Location>().unwrap(), Location::Home);
        assert_eq!(" Program ".parse::<Location>().unwrap(), Location::Program);
        assert!("elsewhere".parse::<Location>().is_err());
    }

    #[test]
    fn test_location_display() {
        assert_eq!(Location::Home.to_string(), "home");
        assert_eq!(Location::Program.to_string(), "program");
    }

    #[test]
    fn test_validate_file_name() {
        assert!(validate_file_name("app.cfg").is_ok());
        assert!(validate_file_name(".apprc").is_ok());
        assert!(validate_file_name("").is_err());
        assert!(validate_file_name(".").is_err());
        assert!(validate_file_name("..").is_err());
        assert!(validate_file_name("conf/app.cfg").is_err());
        assert!(validate_file_name("..\\app.cfg").is_err());
    }

    #[test]
    fn test_validate_file_name_rejects_trailing_dot_segment() {
        assert!(validate_file_name("app.cfg/.").is_err());
        assert!(validate_file_name("./app.cfg").is_err());
    }

    #[cfg(windows)]
    #[test]
    fn test_validate_file_name_rejects_drive_relative() {
        assert!(validate_file_name("C:app.cfg").is_err());
        assert!(validate_file_name("C:").is_err());
    }
}
