//! Create and prioritize an application's config file.
//!
//! A config file may be bundled next to the executable (the program
//! directory) or kept per user in the home directory. When both exist the
//! home directory copy wins.
//!
//! ```no_run
//! use home_config::ConfigLocator;
//!
//! # fn main() -> Result<(), home_config::LocatorError> {
//! let locator = ConfigLocator::new("myapp.cfg")?;
//! if let Err(e) = locator.create_in_home_dir("[main]\ncolor=blue\n", false) {
//!     if !e.is_already_exists() {
//!         return Err(e);
//!     }
//! }
//! let path = locator.active_config_path()?;
//! println!("reading {}", path.display());
//! # Ok(())
//! # }
//! ```
pub mod error;
pub mod format;
pub mod locator;
pub mod paths;

pub use error::{FormatError, LocatorError};
pub use locator::{Candidate, ConfigLocator, Location};
pub use paths::{DirResolver, FixedDirs, SystemDirs};
