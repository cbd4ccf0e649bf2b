//! Configuration management for `bugboard`.
//!
//! Configuration sources and precedence (highest wins):
//! 1. CLI overrides
//! 2. Environment variables (`BUGBOARD_*`)
//! 3. Project config (.bugboard/config.yaml)
//! 4. User config (~/.config/bugboard/config.yaml)
//! 5. Defaults
//!
//! YAML is flattened into dotted keys and sequences are joined with `,`, so
//! `vocabulary: { team: [Alice, Bob] }` becomes `vocabulary.team = "Alice,Bob"`.

use crate::dashboard::SyncMode;
use crate::error::{BugError, Result};
use crate::model::{Actor, Priority, Role};
use crate::storage::SqliteStore;
use crate::util::{WORKSPACE_DIR, default_db_path, project_config_path};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Prefix for environment variable overrides.
const ENV_PREFIX: &str = "BUGBOARD_";

/// Busy timeout used when none is configured, in milliseconds.
pub const DEFAULT_LOCK_TIMEOUT_MS: u64 = 30_000;

const DEFAULT_PROJECTS: [&str; 3] = ["Project A", "Project B", "Project C"];
const DEFAULT_TEAM: [&str; 4] = ["Alice", "Bob", "Charlie", "Diana"];
const DEFAULT_LABELS: [&str; 5] = ["bug", "feature", "ui", "backend", "urgent"];

/// Template written by `bugboard init`.
pub const CONFIG_TEMPLATE: &str = "\
# bugboard configuration
#
# Values here are overridden by BUGBOARD_* environment variables and CLI flags.

# actor: Alice
# role: developer
# lock-timeout: 30000
# default-priority: medium

sync:
  mode: refetch

vocabulary:
  projects: [Project A, Project B, Project C]
  team: [Alice, Bob, Charlie, Diana]
  labels: [bug, feature, ui, backend, urgent]
";

/// The closed sets of names a record may reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    pub projects: Vec<String>,
    pub team: Vec<String>,
    pub labels: Vec<String>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            projects: DEFAULT_PROJECTS.iter().map(ToString::to_string).collect(),
            team: DEFAULT_TEAM.iter().map(ToString::to_string).collect(),
            labels: DEFAULT_LABELS.iter().map(ToString::to_string).collect(),
        }
    }
}

impl Vocabulary {
    #[must_use]
    pub fn has_project(&self, name: &str) -> bool {
        self.projects.iter().any(|p| p == name)
    }

    #[must_use]
    pub fn has_member(&self, name: &str) -> bool {
        self.team.iter().any(|m| m == name)
    }

    #[must_use]
    pub fn has_label(&self, name: &str) -> bool {
        self.labels.iter().any(|l| l == name)
    }
}

/// Discover the active `.bugboard` directory.
///
/// Honors `BUGBOARD_DIR` when set, otherwise walks up from `start` (or CWD).
///
/// # Errors
///
/// Returns `NotInitialized` if no workspace is found, or an I/O error if the
/// CWD cannot be read.
pub fn discover_bugboard_dir(start: Option<&Path>) -> Result<PathBuf> {
    let env_dir = env::var("BUGBOARD_DIR")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from);
    discover_bugboard_dir_with_env(start, env_dir.as_deref())
}

fn discover_bugboard_dir_with_env(
    start: Option<&Path>,
    env_override: Option<&Path>,
) -> Result<PathBuf> {
    if let Some(path) = env_override {
        if path.is_dir() {
            return Ok(path.to_path_buf());
        }
    }

    let mut current = match start {
        Some(path) => path.to_path_buf(),
        None => env::current_dir()?,
    };

    loop {
        let candidate = current.join(WORKSPACE_DIR);
        if candidate.is_dir() {
            return Ok(candidate);
        }

        if !current.pop() {
            break;
        }
    }

    Err(BugError::NotInitialized)
}

/// A flattened set of configuration keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigLayer {
    pub values: HashMap<String, String>,
}

impl ConfigLayer {
    /// Merge another layer on top of this one (higher precedence wins).
    pub fn merge_from(&mut self, other: &Self) {
        for (key, value) in &other.values {
            self.values.insert(key.clone(), value.clone());
        }
    }

    /// Merge multiple layers in precedence order (lowest to highest).
    #[must_use]
    pub fn merge_layers(layers: &[Self]) -> Self {
        let mut merged = Self::default();
        for layer in layers {
            merged.merge_from(layer);
        }
        merged
    }

    /// Build a layer from a YAML file path. Missing files return empty config.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn from_yaml(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Build a layer from YAML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid YAML.
    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        let value: serde_yaml::Value = serde_yaml::from_str(contents)?;
        Ok(layer_from_yaml_value(&value))
    }

    /// Build a layer from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_vars(env::vars())
    }

    /// Build a layer from `BUGBOARD_*` variables.
    ///
    /// `BUGBOARD_SYNC_MODE` is readable as `sync.mode`, `sync-mode` and
    /// `sync_mode`; lookups try each spelling.
    #[must_use]
    pub fn from_env_vars<I>(vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut layer = Self::default();

        for (key, value) in vars {
            let Some(stripped) = key.strip_prefix(ENV_PREFIX) else {
                continue;
            };
            if stripped == "DIR" {
                continue;
            }
            for variant in env_key_variants(stripped) {
                layer.set(&variant, value.clone());
            }
        }

        layer
    }

    /// Set a key, normalizing underscores to hyphens.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(normalize_key(key), value.into());
    }

    /// Look up the first key present, ignoring empty values.
    #[must_use]
    pub fn get(&self, keys: &[&str]) -> Option<&str> {
        keys.iter()
            .filter_map(|key| self.values.get(&normalize_key(key)))
            .map(|value| value.trim())
            .find(|value| !value.is_empty())
    }
}

/// CLI overrides for config loading (optional).
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub db: Option<PathBuf>,
    pub actor: Option<String>,
    pub role: Option<String>,
    pub json: Option<bool>,
    pub no_color: Option<bool>,
    pub lock_timeout: Option<u64>,
}

impl CliOverrides {
    #[must_use]
    pub fn as_layer(&self) -> ConfigLayer {
        let mut layer = ConfigLayer::default();

        if let Some(path) = &self.db {
            layer.set("db", path.to_string_lossy());
        }
        if let Some(actor) = &self.actor {
            layer.set("actor", actor.clone());
        }
        if let Some(role) = &self.role {
            layer.set("role", role.clone());
        }
        if let Some(json) = self.json {
            layer.set("json", json.to_string());
        }
        if let Some(no_color) = self.no_color {
            layer.set("no-color", no_color.to_string());
        }
        if let Some(lock_timeout) = self.lock_timeout {
            layer.set("lock-timeout", lock_timeout.to_string());
        }

        layer
    }
}

/// Load project config (.bugboard/config.yaml).
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_project_config(bugboard_dir: &Path) -> Result<ConfigLayer> {
    ConfigLayer::from_yaml(&project_config_path(bugboard_dir))
}

/// Load user config (~/.config/bugboard/config.yaml).
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_user_config() -> Result<ConfigLayer> {
    let Ok(home) = env::var("HOME") else {
        return Ok(ConfigLayer::default());
    };
    let path = Path::new(&home)
        .join(".config")
        .join("bugboard")
        .join("config.yaml");
    ConfigLayer::from_yaml(&path)
}

/// Default config layer (lowest precedence).
#[must_use]
pub fn default_config_layer() -> ConfigLayer {
    let mut layer = ConfigLayer::default();
    layer.set("role", Role::Developer.as_str());
    layer.set("lock-timeout", DEFAULT_LOCK_TIMEOUT_MS.to_string());
    layer.set("sync.mode", "refetch");
    layer.set("default-priority", Priority::Medium.as_str());
    layer
}

/// Load configuration with the standard precedence order.
///
/// # Errors
///
/// Returns an error if any config file cannot be read or parsed.
pub fn load_config(bugboard_dir: &Path, cli: &CliOverrides) -> Result<ConfigLayer> {
    let user = load_user_config()?;
    let project = load_project_config(bugboard_dir)?;
    let env_layer = ConfigLayer::from_env();

    Ok(merge_config(user, project, env_layer, cli))
}

/// Merge already-loaded layers over the defaults.
#[must_use]
pub fn merge_config(
    user: ConfigLayer,
    project: ConfigLayer,
    env_layer: ConfigLayer,
    cli: &CliOverrides,
) -> ConfigLayer {
    ConfigLayer::merge_layers(&[
        default_config_layer(),
        user,
        project,
        env_layer,
        cli.as_layer(),
    ])
}

/// Resolve the current actor from a merged config layer.
///
/// # Errors
///
/// Returns `NoActor` if no actor name is configured, or `InvalidRole` if the
/// configured role does not parse.
pub fn resolve_actor(layer: &ConfigLayer) -> Result<Actor> {
    let name = layer.get(&["actor"]).ok_or(BugError::NoActor)?;
    let role = layer
        .get(&["role"])
        .map_or(Ok(Role::Developer), Role::from_str)?;
    Ok(Actor::new(name, role))
}

/// Resolve how the dashboard cache follows a mutation.
///
/// # Errors
///
/// Returns a config error for an unknown mode.
pub fn sync_mode_from_layer(layer: &ConfigLayer) -> Result<SyncMode> {
    layer
        .get(&["sync.mode", "sync-mode"])
        .map_or(Ok(SyncMode::Refetch), SyncMode::from_str)
}

/// Build the vocabulary, falling back to the defaults per list.
#[must_use]
pub fn vocabulary_from_layer(layer: &ConfigLayer) -> Vocabulary {
    let defaults = Vocabulary::default();
    Vocabulary {
        projects: parse_list(layer, &["vocabulary.projects", "projects"])
            .unwrap_or(defaults.projects),
        team: parse_list(layer, &["vocabulary.team", "team"]).unwrap_or(defaults.team),
        labels: parse_list(layer, &["vocabulary.labels", "labels"]).unwrap_or(defaults.labels),
    }
}

/// Resolve default priority for new bugs from config.
///
/// # Errors
///
/// Returns an error if the configured value is not a valid priority.
pub fn default_priority_from_layer(layer: &ConfigLayer) -> Result<Priority> {
    layer
        .get(&["default-priority"])
        .map_or(Ok(Priority::Medium), Priority::from_str)
}

/// True if JSON output is enabled in config.
#[must_use]
pub fn json_from_layer(layer: &ConfigLayer) -> bool {
    layer.get(&["json"]).and_then(parse_bool).unwrap_or(false)
}

/// True if text output should carry ANSI colors.
///
/// `no-color` in config (or `NO_COLOR` in the environment) disables color;
/// otherwise color follows whether stdout is a terminal.
#[must_use]
pub fn should_use_color(layer: &ConfigLayer) -> bool {
    if layer.get(&["no-color"]).and_then(parse_bool).unwrap_or(false) {
        return false;
    }
    if env::var_os("NO_COLOR").is_some_and(|value| !value.is_empty()) {
        return false;
    }
    std::io::stdout().is_terminal()
}

/// Resolve the database path: `db` key (relative to the workspace parent) or
/// the default file inside the workspace.
#[must_use]
pub fn db_path_from_layer(bugboard_dir: &Path, layer: &ConfigLayer) -> PathBuf {
    match layer.get(&["db", "database"]) {
        Some(value) => {
            let path = PathBuf::from(value);
            if path.is_absolute() {
                path
            } else {
                bugboard_dir
                    .parent()
                    .map_or_else(|| path.clone(), |root| root.join(&path))
            }
        }
        None => default_db_path(bugboard_dir),
    }
}

fn lock_timeout_from_layer(layer: &ConfigLayer) -> Result<u64> {
    layer.get(&["lock-timeout"]).map_or(Ok(DEFAULT_LOCK_TIMEOUT_MS), |value| {
        value
            .parse::<u64>()
            .map_err(|_| BugError::Config(format!("invalid lock-timeout '{value}'")))
    })
}

/// Open the record store using the merged config.
///
/// # Errors
///
/// Returns an error if config values are invalid or the database cannot be
/// opened.
pub fn open_store(bugboard_dir: &Path, layer: &ConfigLayer) -> Result<(SqliteStore, PathBuf)> {
    let db_path = db_path_from_layer(bugboard_dir, layer);
    let timeout = lock_timeout_from_layer(layer)?;
    let store = SqliteStore::open_with_timeout(&db_path, Some(timeout))?;
    Ok((store, db_path))
}

fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase().replace('_', "-")
}

fn env_key_variants(raw: &str) -> Vec<String> {
    let raw_lower = raw.to_lowercase();
    vec![raw_lower.clone(), raw_lower.replace('_', ".")]
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Some(true),
        "0" | "false" | "no" | "n" | "off" => Some(false),
        _ => None,
    }
}

fn parse_list(layer: &ConfigLayer, keys: &[&str]) -> Option<Vec<String>> {
    let items: Vec<String> = layer
        .get(keys)?
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect();
    if items.is_empty() { None } else { Some(items) }
}

fn layer_from_yaml_value(value: &serde_yaml::Value) -> ConfigLayer {
    let mut layer = ConfigLayer::default();
    let mut flat = HashMap::new();
    flatten_yaml(value, "", &mut flat);

    for (key, value) in flat {
        layer.set(&key, value);
    }

    layer
}

fn flatten_yaml(value: &serde_yaml::Value, prefix: &str, out: &mut HashMap<String, String>) {
    match value {
        serde_yaml::Value::Mapping(map) => {
            for (key, value) in map {
                let Some(key_str) = key.as_str() else {
                    continue;
                };
                let next_prefix = if prefix.is_empty() {
                    key_str.to_string()
                } else {
                    format!("{prefix}.{key_str}")
                };
                flatten_yaml(value, &next_prefix, out);
            }
        }
        serde_yaml::Value::Sequence(values) => {
            let joined = values
                .iter()
                .filter_map(yaml_scalar_to_string)
                .collect::<Vec<_>>()
                .join(",");
            out.insert(prefix.to_string(), joined);
        }
        _ => {
            if let Some(value) = yaml_scalar_to_string(value) {
                out.insert(prefix.to_string(), value);
            }
        }
    }
}

fn yaml_scalar_to_string(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::Bool(v) => Some(v.to_string()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Null
        | serde_yaml::Value::Sequence(_)
        | serde_yaml::Value::Mapping(_) => None,
        serde_yaml::Value::Tagged(tagged) => yaml_scalar_to_string(&tagged.value),
    }
}
