//! Precedence resolution for configuration.
//!
//! ## Precedence (highest to lowest)
//!
//! 1. CLI flags (passed at runtime)
//! 2. Environment variables (`FOLIO_DATA`, `FOLIO_OUTPUT_FORMAT`)
//! 3. `config.kdl` in the config directory
//! 4. Built-in defaults
//!
//! The config directory is `$FOLIO_CONFIG_DIR` when set, otherwise
//! `<system config dir>/folio`.

use std::fs;
use std::path::{Path, PathBuf};

use kdl::KdlDocument;
use serde::Serialize;

use crate::config::{FolioConfig, OutputFormat, Timings};
use crate::models::SortKey;
use crate::{Error, Result};

/// Environment variable overriding the config directory.
pub const CONFIG_DIR_ENV: &str = "FOLIO_CONFIG_DIR";
/// Environment variable naming the project dataset.
pub const DATA_ENV: &str = "FOLIO_DATA";
/// Environment variable overriding the output format.
pub const OUTPUT_FORMAT_ENV: &str = "FOLIO_OUTPUT_FORMAT";

pub const CONFIG_FILE_NAME: &str = "config.kdl";

/// Share URL used when nothing else is configured.
pub const DEFAULT_PAGE_URL: &str = "http://localhost/projects";

/// Tracks where a resolved value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueSource {
    /// Value from environment variable
    EnvVar(String),
    /// Value from config.kdl at this path
    File(PathBuf),
    /// Value from CLI flag
    CliFlag,
    /// Built-in default value
    Default,
}

impl std::fmt::Display for ValueSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueSource::EnvVar(name) => write!(f, "env:{}", name),
            ValueSource::File(path) => write!(f, "file:{}", path.display()),
            ValueSource::CliFlag => write!(f, "cli"),
            ValueSource::Default => write!(f, "default"),
        }
    }
}

impl Serialize for ValueSource {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A resolved value with its source.
#[derive(Debug, Clone, Serialize)]
pub struct Resolved<T> {
    pub value: T,
    pub source: ValueSource,
}

impl<T> Resolved<T> {
    pub fn new(value: T, source: ValueSource) -> Self {
        Self { value, source }
    }
}

/// Fully resolved configuration with source tracking.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedConfig {
    pub output_format: Resolved<OutputFormat>,
    pub default_sort: Resolved<SortKey>,
    pub page_url: Resolved<String>,
    /// `None` means the bundled dataset
    pub data_file: Option<Resolved<PathBuf>>,
    pub timings: Resolved<Timings>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            output_format: Resolved::new(OutputFormat::Json, ValueSource::Default),
            default_sort: Resolved::new(SortKey::Date, ValueSource::Default),
            page_url: Resolved::new(DEFAULT_PAGE_URL.to_string(), ValueSource::Default),
            data_file: None,
            timings: Resolved::new(Timings::default(), ValueSource::Default),
        }
    }
}

impl ResolvedConfig {
    pub fn output_format(&self) -> OutputFormat {
        self.output_format.value
    }

    pub fn default_sort(&self) -> SortKey {
        self.default_sort.value
    }

    pub fn page_url(&self) -> &str {
        &self.page_url.value
    }

    pub fn data_file(&self) -> Option<&Path> {
        self.data_file.as_ref().map(|r| r.value.as_path())
    }

    pub fn timings(&self) -> Timings {
        self.timings.value
    }
}

/// CLI overrides for configuration resolution.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub output_format: Option<OutputFormat>,
    pub default_sort: Option<SortKey>,
    pub page_url: Option<String>,
    pub data_file: Option<PathBuf>,
    /// Config directory from the command line
    pub config_dir: Option<PathBuf>,
}

impl ConfigOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = Some(format);
        self
    }

    pub fn with_default_sort(mut self, sort: SortKey) -> Self {
        self.default_sort = Some(sort);
        self
    }

    pub fn with_page_url(mut self, url: impl Into<String>) -> Self {
        self.page_url = Some(url.into());
        self
    }

    pub fn with_data_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_file = Some(path.into());
        self
    }

    pub fn with_config_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config_dir = Some(dir.into());
        self
    }
}

/// Directory holding config.kdl, if one can be determined.
pub fn config_dir(overrides: &ConfigOverrides) -> Option<PathBuf> {
    if let Some(ref dir) = overrides.config_dir {
        return Some(dir.clone());
    }
    if let Some(dir) = non_empty_env(CONFIG_DIR_ENV) {
        return Some(PathBuf::from(dir));
    }
    dirs::config_dir().map(|dir| dir.join("folio"))
}

/// Read config.kdl from `dir`. A missing file is an empty config.
pub fn read_config_file(dir: &Path) -> Result<FolioConfig> {
    let path = dir.join(CONFIG_FILE_NAME);
    if !path.exists() {
        return Ok(FolioConfig::default());
    }
    let content = fs::read_to_string(&path)?;
    let doc: KdlDocument = content.parse()?;
    let config = FolioConfig::from_kdl(&doc);
    config
        .validate()
        .map_err(|e| Error::InvalidInput(format!("{}: {}", path.display(), e)))?;
    tracing::debug!(path = %path.display(), "loaded config file");
    Ok(config)
}

/// Write config.kdl into `dir`, creating the directory if needed.
pub fn write_config_file(dir: &Path, config: &FolioConfig) -> Result<PathBuf> {
    config.validate().map_err(Error::InvalidInput)?;
    fs::create_dir_all(dir)?;
    let path = dir.join(CONFIG_FILE_NAME);
    fs::write(&path, config.to_kdl().to_string())?;
    Ok(path)
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Resolve configuration with full precedence chain.
///
/// Precedence (highest to lowest):
/// 1. CLI flags (from `overrides`)
/// 2. Environment variables
/// 3. config.kdl
/// 4. Built-in defaults
pub fn resolve_config(overrides: &ConfigOverrides) -> Result<ResolvedConfig> {
    let mut result = ResolvedConfig::default();

    let dir = config_dir(overrides);
    let (file, file_source) = match dir {
        Some(ref dir) => (
            read_config_file(dir)?,
            ValueSource::File(dir.join(CONFIG_FILE_NAME)),
        ),
        None => (FolioConfig::default(), ValueSource::Default),
    };

    // Resolve output_format
    if let Some(format) = overrides.output_format {
        result.output_format = Resolved::new(format, ValueSource::CliFlag);
    } else if let Some(format) = non_empty_env(OUTPUT_FORMAT_ENV) {
        let format = OutputFormat::parse(&format).ok_or_else(|| {
            Error::InvalidInput(format!("{} must be json or human, got {}", OUTPUT_FORMAT_ENV, format))
        })?;
        result.output_format =
            Resolved::new(format, ValueSource::EnvVar(OUTPUT_FORMAT_ENV.to_string()));
    } else if let Some(format) = file.output_format {
        result.output_format = Resolved::new(format, file_source.clone());
    }

    // Resolve default_sort
    if let Some(sort) = overrides.default_sort {
        result.default_sort = Resolved::new(sort, ValueSource::CliFlag);
    } else if let Some(sort) = file.default_sort {
        result.default_sort = Resolved::new(sort, file_source.clone());
    }

    // Resolve page_url
    if let Some(ref url) = overrides.page_url {
        result.page_url = Resolved::new(url.clone(), ValueSource::CliFlag);
    } else if let Some(ref url) = file.page_url {
        result.page_url = Resolved::new(url.clone(), file_source.clone());
    }

    // Resolve data_file (no default: the bundled dataset is used)
    if let Some(ref path) = overrides.data_file {
        result.data_file = Some(Resolved::new(path.clone(), ValueSource::CliFlag));
    } else if let Some(path) = non_empty_env(DATA_ENV) {
        result.data_file = Some(Resolved::new(
            PathBuf::from(path),
            ValueSource::EnvVar(DATA_ENV.to_string()),
        ));
    } else if let Some(ref path) = file.data_file {
        result.data_file = Some(Resolved::new(path.clone(), file_source.clone()));
    }

    if file.has_timings() {
        result.timings = Resolved::new(file.apply_timings(Timings::default()), file_source);
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    struct EnvGuard(&'static [&'static str]);

    impl EnvGuard {
        fn clear(names: &'static [&'static str]) -> Self {
            for name in names {
                // SAFETY: tests touching the environment run under #[serial]
                unsafe { std::env::remove_var(name) };
            }
            Self(names)
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for name in self.0 {
                // SAFETY: tests touching the environment run under #[serial]
                unsafe { std::env::remove_var(name) };
            }
        }
    }

    const VARS: &[&str] = &[CONFIG_DIR_ENV, DATA_ENV, OUTPUT_FORMAT_ENV];

    fn write_config(dir: &Path, kdl: &str) {
        fs::write(dir.join(CONFIG_FILE_NAME), kdl).unwrap();
    }

    #[test]
    fn test_value_source_display() {
        assert_eq!(ValueSource::EnvVar("FOO".to_string()).to_string(), "env:FOO");
        assert_eq!(ValueSource::CliFlag.to_string(), "cli");
        assert_eq!(ValueSource::Default.to_string(), "default");
        assert_eq!(
            ValueSource::File(PathBuf::from("/x/config.kdl")).to_string(),
            "file:/x/config.kdl"
        );
    }

    #[test]
    #[serial]
    fn test_resolve_config_defaults() {
        let _guard = EnvGuard::clear(VARS);
        let temp = TempDir::new().unwrap();
        let overrides = ConfigOverrides::new().with_config_dir(temp.path());

        let config = resolve_config(&overrides).unwrap();

        assert_eq!(config.output_format(), OutputFormat::Json);
        assert_eq!(config.output_format.source, ValueSource::Default);
        assert_eq!(config.default_sort(), SortKey::Date);
        assert_eq!(config.page_url(), DEFAULT_PAGE_URL);
        assert!(config.data_file().is_none());
        assert_eq!(config.timings(), Timings::default());
    }

    #[test]
    #[serial]
    fn test_resolve_config_from_file() {
        let _guard = EnvGuard::clear(VARS);
        let temp = TempDir::new().unwrap();
        write_config(
            temp.path(),
            "output-format \"human\"\ndefault-sort \"name\"\nstagger-ms 0\n",
        );
        let overrides = ConfigOverrides::new().with_config_dir(temp.path());

        let config = resolve_config(&overrides).unwrap();

        let file = ValueSource::File(temp.path().join(CONFIG_FILE_NAME));
        assert_eq!(config.output_format(), OutputFormat::Human);
        assert_eq!(config.output_format.source, file);
        assert_eq!(config.default_sort(), SortKey::Name);
        assert_eq!(config.timings().stagger_ms, 0);
        assert_eq!(config.timings.source, file);
    }

    #[test]
    #[serial]
    fn test_env_overrides_file_and_cli_overrides_env() {
        let _guard = EnvGuard::clear(VARS);
        let temp = TempDir::new().unwrap();
        write_config(temp.path(), "data-file \"/from/file.json\"\n");
        // SAFETY: serialized test
        unsafe { std::env::set_var(DATA_ENV, "/from/env.json") };

        let overrides = ConfigOverrides::new().with_config_dir(temp.path());
        let config = resolve_config(&overrides).unwrap();
        assert_eq!(config.data_file(), Some(Path::new("/from/env.json")));
        assert_eq!(
            config.data_file.as_ref().unwrap().source,
            ValueSource::EnvVar(DATA_ENV.to_string())
        );

        let overrides = overrides.with_data_file("/from/cli.json");
        let config = resolve_config(&overrides).unwrap();
        assert_eq!(config.data_file(), Some(Path::new("/from/cli.json")));
        assert_eq!(config.data_file.as_ref().unwrap().source, ValueSource::CliFlag);
    }

    #[test]
    #[serial]
    fn test_config_dir_from_env() {
        let _guard = EnvGuard::clear(VARS);
        let temp = TempDir::new().unwrap();
        write_config(temp.path(), "page-url \"https://example.com/p\"\n");
        // SAFETY: serialized test
        unsafe { std::env::set_var(CONFIG_DIR_ENV, temp.path()) };

        let config = resolve_config(&ConfigOverrides::new()).unwrap();
        assert_eq!(config.page_url(), "https://example.com/p");
    }

    #[test]
    #[serial]
    fn test_invalid_config_file_is_error() {
        let _guard = EnvGuard::clear(VARS);
        let temp = TempDir::new().unwrap();
        write_config(temp.path(), "notification-ms 999999\n");
        let overrides = ConfigOverrides::new().with_config_dir(temp.path());
        assert!(matches!(
            resolve_config(&overrides),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_write_then_read_config_file() {
        let temp = TempDir::new().unwrap();
        let config = FolioConfig {
            default_sort: Some(SortKey::Progress),
            ..Default::default()
        };
        let path = write_config_file(&temp.path().join("nested"), &config).unwrap();
        assert!(path.ends_with(CONFIG_FILE_NAME));
        let read = read_config_file(&temp.path().join("nested")).unwrap();
        assert_eq!(read, config);
    }
}
