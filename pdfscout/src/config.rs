use config::{Config as ConfigBuilder, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use crate::errors::{IndexError, IndexResult};

const DEFAULT_MAX_THREADS: usize = 4;
const LOCAL_CONFIG: &str = ".pdfscout.yaml";

/// Configuration shared by the index builder and the searcher.
///
/// # Configuration Locations
///
/// Files are merged in order of increasing precedence:
/// 1. Global `$CONFIG_DIR/pdfscout/config.yaml`
/// 2. Local `.pdfscout.yaml` in the current directory
/// 3. Custom config file specified via `--config`
///
/// Command line values are applied last through [`IndexConfig::merge_with_cli`].
///
/// # Configuration Format
///
/// ```yaml
/// # Directory scanned recursively for .pdf files
/// root_path: "downloads"
///
/// # Where the corpus index is written and read
/// index_path: "corpus_index.json"
///
/// # Extraction workers (default: CPU cores, at most 4)
/// thread_count: 4
///
/// # Paths to skip during discovery (glob syntax)
/// ignore_patterns:
///   - "**/drafts/**"
///
/// # Log level (trace, debug, info, warn, error)
/// log_level: "info"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Root directory scanned for PDF files
    pub root_path: PathBuf,

    /// Location of the persisted corpus
    pub index_path: PathBuf,

    /// Number of extraction workers
    pub thread_count: NonZeroUsize,

    /// Patterns to ignore during discovery (supports glob syntax)
    pub ignore_patterns: Vec<String>,

    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

/// Values supplied on the command line. `None` and empty lists leave the
/// file-based value untouched.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub root_path: Option<PathBuf>,
    pub index_path: Option<PathBuf>,
    pub thread_count: Option<NonZeroUsize>,
    pub ignore_patterns: Vec<String>,
    pub log_level: Option<String>,
}

fn default_thread_count() -> NonZeroUsize {
    NonZeroUsize::new(num_cpus::get().min(DEFAULT_MAX_THREADS)).unwrap_or(NonZeroUsize::MIN)
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            root_path: PathBuf::from("downloads"),
            index_path: PathBuf::from("corpus_index.json"),
            thread_count: default_thread_count(),
            ignore_patterns: Vec::new(),
            log_level: default_log_level(),
        }
    }
}

impl IndexConfig {
    /// Loads configuration, layering an explicit file over the default locations
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.display().to_string()));
            }
        }

        let config_files = [
            dirs::config_dir().map(|p| p.join("pdfscout/config.yaml")),
            Some(PathBuf::from(LOCAL_CONFIG)),
            config_path.map(PathBuf::from),
        ];

        for path in config_files.iter().flatten() {
            if path.exists() {
                builder = builder.add_source(File::from(path.as_path()));
            }
        }

        builder.build()?.try_deserialize()
    }

    /// Merges CLI arguments with configuration file values
    pub fn merge_with_cli(mut self, cli: ConfigOverrides) -> Self {
        if let Some(root_path) = cli.root_path {
            self.root_path = root_path;
        }
        if let Some(index_path) = cli.index_path {
            self.index_path = index_path;
        }
        if let Some(thread_count) = cli.thread_count {
            self.thread_count = thread_count;
        }
        if !cli.ignore_patterns.is_empty() {
            self.ignore_patterns = cli.ignore_patterns;
        }
        if let Some(log_level) = cli.log_level {
            self.log_level = log_level;
        }
        self
    }

    /// Writes the configuration as YAML, creating parent directories
    pub fn save_to(&self, path: &Path) -> IndexResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| IndexError::io(parent, e))?;
        }
        let yaml = serde_yaml::to_string(self)?;
        fs::write(path, yaml).map_err(|e| IndexError::io(path, e))?;
        Ok(())
    }
}
