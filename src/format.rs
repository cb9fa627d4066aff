//! Reads the contents of a located config file.
//!
//! The locator only deals in paths; this module hands those paths to the
//! `config` crate. The format is picked from the file extension, and anything
//! unrecognized (`.cfg`, `.conf`, no extension) is read as INI.
use std::collections::BTreeMap;
use std::path::Path;

use config::{Config, ConfigError, File, FileFormat, Source, Value, ValueKind};
use serde::de::DeserializeOwned;

use crate::error::FormatError;
use crate::locator::ConfigLocator;

/// Picks a file format from the extension of `path`.
pub fn format_for(path: &Path) -> FileFormat {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("toml") => FileFormat::Toml,
        Some("json") => FileFormat::Json,
        Some("yaml") | Some("yml") => FileFormat::Yaml,
        Some("ron") => FileFormat::Ron,
        Some("json5") => FileFormat::Json5,
        _ => FileFormat::Ini,
    }
}

/// Loads a single config file.
pub fn load(path: &Path) -> Result<Config, FormatError> {
    Config::builder()
        .add_source(File::from(path).format(format_for(path)).required(true))
        .build()
        .map_err(|source| FormatError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

/// Loads a single config file into `T`.
pub fn load_as<T: DeserializeOwned>(path: &Path) -> Result<T, FormatError> {
    load(path)?
        .try_deserialize()
        .map_err(|source| FormatError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

/// Loads whichever file `locator` currently considers active.
pub fn load_active(locator: &ConfigLocator) -> Result<Config, FormatError> {
    let path = locator.active_config_path()?;
    load(&path)
}

/// Reads one value by dotted key, e.g. `numbers.two` for `two` under an INI
/// `[numbers]` section.
pub fn get_string(path: &Path, key: &str) -> Result<String, FormatError> {
    match load(path)?.get_string(key) {
        Ok(value) => Ok(value),
        Err(ConfigError::NotFound(_)) => Err(FormatError::MissingKey {
            path: path.to_path_buf(),
            key: key.to_string(),
        }),
        Err(source) => Err(FormatError::Parse {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// All leaf values keyed by their dotted path, sorted.
pub fn flatten(config: &Config) -> Result<BTreeMap<String, String>, ConfigError> {
    let mut out = BTreeMap::new();
    for (key, value) in config.collect()? {
        flatten_into(&mut out, key, &value);
    }
    Ok(out)
}

fn flatten_into(out: &mut BTreeMap<String, String>, prefix: String, value: &Value) {
    match &value.kind {
        ValueKind::Table(table) => {
            for (key, child) in table {
                flatten_into(out, format!("{}.{}", prefix, key), child);
            }
        }
        ValueKind::Nil => {
            out.insert(prefix, String::new());
        }
        _ => {
            out.insert(prefix, value.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::fs;

    #[test]
    fn test_format_for_extension() {
        assert_eq!(format_for(Path::new("app.toml")), FileFormat::Toml);
        assert_eq!(format_for(Path::new("app.YML")), FileFormat::Yaml);
        assert_eq!(format_for(Path::new("app.json")), FileFormat::Json);
        assert_eq!(format_for(Path::new("hc_test.cfg")), FileFormat::Ini);
        assert_eq!(format_for(Path::new(".apprc")), FileFormat::Ini);
    }

    #[test]
    fn test_get_string_from_ini() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("app.cfg");
        fs::write(&path, "[numbers]\none=1\ntwo=deux\n").unwrap();

        assert_eq!(get_string(&path, "numbers.two").unwrap(), "deux");
        assert_eq!(get_string(&path, "numbers.one").unwrap(), "1");
    }

    #[test]
    fn test_get_string_missing_key() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("app.cfg");
        fs::write(&path, "[numbers]\none=1\n").unwrap();

        let err = get_string(&path, "numbers.nine").unwrap_err();
        assert!(matches!(err, FormatError::MissingKey { .. }));
    }

    #[test]
    fn test_load_missing_file_fails() {
        let temp_dir = tempfile::tempdir().unwrap();
        let result = load(&temp_dir.path().join("absent.toml"));
        assert!(matches!(result, Err(FormatError::Parse { .. })));
    }

    #[test]
    fn test_parse_error_message_names_path_once() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("absent.toml");
        let err = load(&path).unwrap_err();

        assert_eq!(err.to_string(), format!("failed to read config {}", path.display()));
        let cause = std::error::Error::source(&err).expect("parse error keeps its cause");
        assert!(!err.to_string().contains(&cause.to_string()));
    }

    #[test]
    fn test_flatten_top_level_keys() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("app.cfg");
        fs::write(&path, "two=deux
one=1
").unwrap();

        let flat = flatten(&load(&path).unwrap()).unwrap();
        assert_eq!(flat.get("two").map(String::as_str), Some("deux"));
        assert_eq!(flat.get("one").map(String::as_str), Some("1"));
    }

    #[test]
    fn test_load_as_typed() {
        #[derive(Debug, Deserialize)]
        struct Server {
            host: String,
            port: u16,
        }
        #[derive(Debug, Deserialize)]
        struct Settings {
            server: Server,
        }

        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("app.toml");
        fs::write(&path, "[server]\nhost = \"localhost\"\nport = 8080\n").unwrap();

        let settings: Settings = load_as(&path).unwrap();
        assert_eq!(settings.server.host, "localhost");
        assert_eq!(settings.server.port, 8080);
    }

    #[test]
    fn test_flatten_sorted() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("app.cfg");
        fs::write(&path, "[numbers]\ntwo=2\none=1\n[words]\nhello=world\n").unwrap();

        let config = load(&path).unwrap();
        let flat: Vec<(String, String)> = flatten(&config).unwrap().into_iter().collect();
        assert_eq!(
            flat,
            vec![
                ("numbers.one".to_string(), "1".to_string()),
                ("numbers.two".to_string(), "2".to_string()),
                ("words.hello".to_string(), "world".to_string()),
            ]
        );
    }
}
