use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::CoreError;
use crate::query::SearchStrategy;

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    pub api: Option<ApiConfig>,
    pub query: Option<QueryConfig>,
    pub table: Option<TableConfig>,
    pub display: Option<DisplayConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub bulk_limit: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryConfig {
    pub page_size: Option<usize>,
    pub debounce_ms: Option<u64>,
    pub search_strategy: Option<SearchStrategy>,
    pub search_cap: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableConfig {
    pub fetch_limit: Option<usize>,
    pub page_size: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub theme: Option<String>,
}

impl ConfigFile {
    /// Render as the TOML that [`save_to_path`] writes.
    pub fn to_toml_string(&self) -> Result<String, CoreError> {
        toml::to_string_pretty(self)
            .map_err(|e| CoreError::Config(format!("failed to serialize config: {}", e)))
    }
}

/// Platform config directory path: `<config_dir>/pokegallery/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| config_path_in(&d))
}

/// `<dir>/pokegallery/config.toml`.
pub fn config_path_in(dir: &Path) -> PathBuf {
    dir.join("pokegallery").join("config.toml")
}

/// Load config by cascading CWD `.pokegallery.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".pokegallery.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed (parse errors are logged).
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unparseable config file");
            None
        }
    }
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    let api = match (base.api, overlay.api) {
        (None, None) => None,
        (b, o) => {
            let b = b.unwrap_or_default();
            let o = o.unwrap_or_default();
            Some(ApiConfig {
                base_url: o.base_url.or(b.base_url),
                timeout_secs: o.timeout_secs.or(b.timeout_secs),
                bulk_limit: o.bulk_limit.or(b.bulk_limit),
            })
        }
    };
    let query = match (base.query, overlay.query) {
        (None, None) => None,
        (b, o) => {
            let b = b.unwrap_or_default();
            let o = o.unwrap_or_default();
            Some(QueryConfig {
                page_size: o.page_size.or(b.page_size),
                debounce_ms: o.debounce_ms.or(b.debounce_ms),
                search_strategy: o.search_strategy.or(b.search_strategy),
                search_cap: o.search_cap.or(b.search_cap),
            })
        }
    };
    let table = match (base.table, overlay.table) {
        (None, None) => None,
        (b, o) => {
            let b = b.unwrap_or_default();
            let o = o.unwrap_or_default();
            Some(TableConfig {
                fetch_limit: o.fetch_limit.or(b.fetch_limit),
                page_size: o.page_size.or(b.page_size),
            })
        }
    };
    let display = match (base.display, overlay.display) {
        (None, None) => None,
        (b, o) => Some(DisplayConfig {
            theme: o
                .and_then(|d| d.theme)
                .or_else(|| b.and_then(|d| d.theme)),
        }),
    };
    ConfigFile {
        api,
        query,
        table,
        display,
    }
}

/// Write `config` to `path`, creating parent directories.
pub fn save_to_path(config: &ConfigFile, path: &Path) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, config.to_toml_string()?)?;
    Ok(())
}

/// Save the current config to the platform config directory.
pub fn save_config(config: &ConfigFile) -> Result<PathBuf, CoreError> {
    let dir = dirs::config_dir()
        .ok_or_else(|| CoreError::Config("could not determine config directory".to_string()))?;
    save_config_in(config, &dir)
}

/// Save under `dir` the way [`save_config`] does under the platform directory.
pub fn save_config_in(config: &ConfigFile, dir: &Path) -> Result<PathBuf, CoreError> {
    let path = config_path_in(dir);
    save_to_path(config, &path)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_round_trip_toml() {
        let config = ConfigFile {
            query: Some(QueryConfig {
                search_strategy: Some(SearchStrategy::Direct),
                ..Default::default()
            }),
            ..Default::default()
        };
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("search_strategy = \"direct\""));
        let parsed: ConfigFile = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn partial_file_deserializes() {
        let toml_str = "[api]\nbase_url = \"http://localhost:8000\"\n\n[query]\nsearch_strategy = \"substring-filter\"\n";
        let parsed: ConfigFile = toml::from_str(toml_str).unwrap();
        assert_eq!(
            parsed.api.unwrap().base_url.as_deref(),
            Some("http://localhost:8000")
        );
        assert_eq!(
            parsed.query.unwrap().search_strategy,
            Some(SearchStrategy::Substring)
        );
        assert!(parsed.table.is_none());
    }

    #[test]
    fn merge_overlay_wins() {
        let base = ConfigFile {
            api: Some(ApiConfig {
                base_url: Some("http://base".into()),
                timeout_secs: Some(3),
                ..Default::default()
            }),
            ..Default::default()
        };
        let overlay = ConfigFile {
            api: Some(ApiConfig {
                base_url: Some("http://overlay".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let api = merge(base, overlay).api.unwrap();
        assert_eq!(api.base_url.as_deref(), Some("http://overlay"));
        assert_eq!(api.timeout_secs, Some(3));
    }

    #[test]
    fn merge_base_preserved_when_overlay_absent() {
        let base = ConfigFile {
            display: Some(DisplayConfig {
                theme: Some("night".into()),
            }),
            ..Default::default()
        };
        let merged = merge(base, ConfigFile::default());
        assert_eq!(merged.display.unwrap().theme.as_deref(), Some("night"));
        assert!(merged.api.is_none());
    }

    #[test]
    fn save_then_load_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = ConfigFile {
            table: Some(TableConfig {
                fetch_limit: Some(30),
                page_size: Some(10),
            }),
            ..Default::default()
        };
        save_to_path(&config, &path).unwrap();
        assert_eq!(load_from_path(&path), Some(config));
    }

    #[test]
    fn saved_resolved_config_loads_back_identically() {
        let dir = tempfile::tempdir().unwrap();
        let resolved = crate::Config {
            base_url: "http://localhost:9000".into(),
            search_strategy: SearchStrategy::Direct,
            theme: "night".into(),
            ..crate::Config::default()
        };
        let file = resolved.to_file();
        let path = save_config_in(&file, dir.path()).unwrap();
        assert_eq!(path, dir.path().join("pokegallery").join("config.toml"));

        let loaded = load_from_path(&path).unwrap();
        assert_eq!(loaded, file);
        assert_eq!(crate::Config::from_file(&loaded), resolved);
    }

    #[test]
    fn unparseable_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[api\nbase_url = ").unwrap();
        assert_eq!(load_from_path(&path), None);
    }
}
