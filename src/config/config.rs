use hashlink::LinkedHashMap;
use saphyr::{LoadableYamlNode, Scalar, Yaml};
use snafu::prelude::*;
use std::{
    borrow::Cow,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

use crate::storage::{StoreError, validate_key};
use crate::store::DEFAULT_STORAGE_KEY;

const CONFIG_FILE_NAME: &str = "shareplace.yaml";
const DEFAULT_STORAGE_DIRECTORY: &str = ".shareplace";

const STORAGE_SECTION: &str = "storage";
const DIRECTORY_FIELD: &str = "directory";
const KEY_FIELD: &str = "key";

fn get_config_file_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE_NAME)
}

fn yaml_key(name: &str) -> Yaml<'_> {
    Yaml::Value(Scalar::String(Cow::Borrowed(name)))
}

/// Where and under which key the namespace is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory of the key-value store, relative to the root unless absolute
    pub storage_directory: PathBuf,
    pub storage_key: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_directory: PathBuf::from(DEFAULT_STORAGE_DIRECTORY),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

impl Config {
    /// Reads `shareplace.yaml` from `root`. A missing file yields the defaults.
    pub fn read(root: &Path) -> Result<Self, ConfigError> {
        Self::from_path(get_config_file_path(root))
    }

    pub fn from_path(path: PathBuf) -> Result<Self, ConfigError> {
        debug!("Opening config file: {}", path.display());
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No config file at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(e).context(ReadSnafu {
                    file_path: path.display().to_string(),
                });
            }
        };
        debug!("Successfully read config file: {} bytes", contents.len());
        contents.as_str().try_into()
    }

    /// Storage directory resolved against `root`.
    pub fn storage_directory_in(&self, root: &Path) -> PathBuf {
        root.join(&self.storage_directory)
    }

    fn apply_storage_section(
        &mut self,
        storage: &LinkedHashMap<Yaml, Yaml>,
    ) -> Result<(), ConfigError> {
        for (key, value) in storage {
            match key.as_str() {
                Some(DIRECTORY_FIELD) => {
                    let directory = non_empty_string(DIRECTORY_FIELD, value)?;
                    self.storage_directory = PathBuf::from(directory);
                }
                Some(KEY_FIELD) => {
                    let storage_key = non_empty_string(KEY_FIELD, value)?;
                    validate_key(&storage_key).context(InvalidKeySnafu)?;
                    self.storage_key = storage_key;
                }
                _ => debug!("Ignoring unknown storage setting: {:?}", key),
            }
        }
        Ok(())
    }
}

fn non_empty_string(field: &str, value: &Yaml) -> Result<String, ConfigError> {
    let text = value.as_str().context(NotAStringSnafu { field })?;
    ensure!(!text.is_empty(), EmptyValueSnafu { field });
    Ok(text.to_string())
}

impl TryFrom<&str> for Config {
    type Error = ConfigError;

    fn try_from(contents: &str) -> Result<Self, Self::Error> {
        let documents = Yaml::load_from_str(contents).context(ParseSnafu)?;
        let mut config = Self::default();
        let Some(document) = documents.first() else {
            debug!("Config file is empty, using defaults");
            return Ok(config);
        };

        let top_level = document.as_mapping().context(TopLevelNotMapSnafu)?;
        for key in top_level.keys() {
            if key.as_str() != Some(STORAGE_SECTION) {
                debug!("Ignoring unknown config section: {:?}", key);
            }
        }

        if let Some(storage) = top_level.get(&yaml_key(STORAGE_SECTION)) {
            let storage = storage.as_mapping().context(StorageNotMapSnafu)?;
            config.apply_storage_section(storage)?;
        }

        Ok(config)
    }
}

#[derive(Debug, Snafu)]
pub enum ConfigError {
    #[snafu(display("Failed to read the config file: {}", file_path))]
    ReadError {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("Failed to parse the config file"))]
    ParseError { source: saphyr::ScanError },
    #[snafu(display("Top level of config should be a map"))]
    TopLevelNotMap,
    #[snafu(display("Storage section should be a map"))]
    StorageNotMap,
    #[snafu(display("Storage setting '{}' should be a string", field))]
    NotAString { field: String },
    #[snafu(display("Storage setting '{}' must not be empty", field))]
    EmptyValue { field: String },
    #[snafu(display("Storage key is not usable"))]
    InvalidKey { source: StoreError },
}
