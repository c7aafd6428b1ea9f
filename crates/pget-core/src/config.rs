use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Global configuration loaded from `~/.config/pget/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PgetConfig {
    /// Number of connections used when the CLI does not ask for one.
    pub default_connections: usize,
    /// Upper bound on connections per download; CLI requests are clamped to this.
    pub max_connections: usize,
    /// Width of each progress bar in characters.
    pub progress_width: usize,
    /// Milliseconds between progress redraws.
    pub progress_interval_ms: u64,
    /// Optional libcurl receive buffer size in bytes (None = library default).
    #[serde(default)]
    pub chunk_buffer_bytes: Option<usize>,
}

impl Default for PgetConfig {
    fn default() -> Self {
        Self {
            default_connections: 5,
            max_connections: 16,
            progress_width: 40,
            progress_interval_ms: 1000,
            chunk_buffer_bytes: None,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("pget")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<PgetConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = PgetConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: PgetConfig = toml::from_str(&data)?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = PgetConfig::default();
        assert_eq!(cfg.default_connections, 5);
        assert_eq!(cfg.max_connections, 16);
        assert_eq!(cfg.progress_width, 40);
        assert_eq!(cfg.progress_interval_ms, 1000);
        assert!(cfg.chunk_buffer_bytes.is_none());
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = PgetConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: PgetConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.default_connections, cfg.default_connections);
        assert_eq!(parsed.max_connections, cfg.max_connections);
        assert_eq!(parsed.progress_width, cfg.progress_width);
        assert_eq!(parsed.progress_interval_ms, cfg.progress_interval_ms);
    }

    #[test]
    fn config_toml_custom_values() {
        let toml = r#"
            default_connections = 8
            max_connections = 32
            progress_width = 20
            progress_interval_ms = 250
        "#;
        let cfg: PgetConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.default_connections, 8);
        assert_eq!(cfg.max_connections, 32);
        assert_eq!(cfg.progress_width, 20);
        assert_eq!(cfg.progress_interval_ms, 250);
        assert!(cfg.chunk_buffer_bytes.is_none());
    }

    #[test]
    fn config_toml_buffer_override() {
        let toml = r#"
            default_connections = 4
            max_connections = 16
            progress_width = 40
            progress_interval_ms = 1000
            chunk_buffer_bytes = 65536
        "#;
        let cfg: PgetConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.chunk_buffer_bytes, Some(65536));
    }
}
