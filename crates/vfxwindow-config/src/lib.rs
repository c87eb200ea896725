use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Error types for settings operations
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Settings key not found: {path}")]
    KeyMissing { path: KeyPath },

    #[error("Settings key {path} holds {found}, expected {expected}")]
    TypeMismatch {
        path: KeyPath,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Settings key {path} is out of range: {value}")]
    OutOfRange { path: KeyPath, value: i64 },

    #[error("Invalid settings format: {reason}")]
    InvalidFormat { reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

impl ConfigError {
    /// True for the "nothing saved yet" condition.
    pub fn is_missing(&self) -> bool {
        matches!(self, ConfigError::KeyMissing { .. })
    }
}

/// Three-level address of a single setting: scope, window role and field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyPath {
    pub scope: String,
    pub role: String,
    pub field: String,
}

impl KeyPath {
    pub fn new(scope: impl Into<String>, role: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            role: role.into(),
            field: field.into(),
        }
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.scope, self.role, self.field)
    }
}

/// Setting value types
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ConfigValue {
    String(String),
    Integer(i64),
    Boolean(bool),
    Float(f64),
    Array(Vec<ConfigValue>),
}

impl ConfigValue {
    pub fn kind(&self) -> &'static str {
        match self {
            ConfigValue::String(_) => "string",
            ConfigValue::Integer(_) => "integer",
            ConfigValue::Boolean(_) => "boolean",
            ConfigValue::Float(_) => "float",
            ConfigValue::Array(_) => "array",
        }
    }
}

/// Fields of one window role, e.g. `[standalone.main]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct ConfigChannel {
    pub properties: BTreeMap<String, ConfigValue>,
}

impl ConfigChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, property: &str) -> Option<&ConfigValue> {
        self.properties.get(property)
    }

    pub fn set(&mut self, property: String, value: ConfigValue) {
        self.properties.insert(property, value);
    }

    pub fn remove(&mut self, property: &str) -> Option<ConfigValue> {
        self.properties.remove(property)
    }
}

type Tree = BTreeMap<String, BTreeMap<String, ConfigChannel>>;

/// Settings of one window identity.
///
/// The store only mutates memory; [`WindowSettings::save`] is the single
/// point where anything reaches disk. Ordered maps keep the written file
/// stable when nothing changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WindowSettings {
    tree: Tree,
    path: Option<PathBuf>,
}

impl WindowSettings {
    /// Settings with no backing file.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Open the settings file at `path`. A missing file yields empty settings.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let tree = Self::load_from_file(&path)?;
        Ok(Self {
            tree,
            path: Some(path),
        })
    }

    /// Open the settings of `identity` at its default location.
    pub fn for_window(identity: &str) -> Result<Self, ConfigError> {
        Self::open(Self::default_path(identity))
    }

    /// `$XDG_CONFIG_HOME/vfxwindow/<identity>.toml`
    pub fn default_path(identity: &str) -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("vfxwindow")
            .join(format!("{identity}.toml"))
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn load_from_file(path: &Path) -> Result<Tree, ConfigError> {
        if !path.exists() {
            debug!("No settings file at {}, starting empty", path.display());
            return Ok(Tree::new());
        }

        let content = std::fs::read_to_string(path)?;
        let tree: Tree = toml::from_str(&content)?;
        Ok(tree)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(&self.tree)
            .map_err(|e| ConfigError::InvalidFormat { reason: e.to_string() })
    }

    /// Write the settings to their backing file, if they have one.
    pub fn save(&self) -> Result<(), ConfigError> {
        match &self.path {
            Some(path) => self.save_to(path),
            None => {
                debug!("In-memory settings, nothing to save");
                Ok(())
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let content = self.to_toml_string()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        debug!("Saved settings to {}", path.display());
        Ok(())
    }

    pub fn channel(&self, scope: &str, role: &str) -> Option<&ConfigChannel> {
        self.tree.get(scope)?.get(role)
    }

    /// Get a setting
    pub fn get(&self, path: &KeyPath) -> Result<&ConfigValue, ConfigError> {
        self.channel(&path.scope, &path.role)
            .and_then(|channel| channel.get(&path.field))
            .ok_or_else(|| ConfigError::KeyMissing { path: path.clone() })
    }

    pub fn get_integer(&self, path: &KeyPath) -> Result<i64, ConfigError> {
        match self.get(path)? {
            ConfigValue::Integer(value) => Ok(*value),
            other => Err(ConfigError::TypeMismatch {
                path: path.clone(),
                expected: "integer",
                found: other.kind(),
            }),
        }
    }

    /// Integer setting that must fit a pixel coordinate.
    pub fn get_i32(&self, path: &KeyPath) -> Result<i32, ConfigError> {
        let value = self.get_integer(path)?;
        i32::try_from(value).map_err(|_| ConfigError::OutOfRange {
            path: path.clone(),
            value,
        })
    }

    /// Set a setting, creating the scope and role on demand.
    pub fn set(&mut self, path: &KeyPath, value: ConfigValue) {
        self.tree
            .entry(path.scope.clone())
            .or_default()
            .entry(path.role.clone())
            .or_default()
            .set(path.field.clone(), value);
    }

    pub fn set_integer(&mut self, path: &KeyPath, value: i64) {
        self.set(path, ConfigValue::Integer(value));
    }

    pub fn remove(&mut self, path: &KeyPath) -> Option<ConfigValue> {
        self.tree
            .get_mut(&path.scope)?
            .get_mut(&path.role)?
            .remove(&path.field)
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }
}
