use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub corpus: CorpusConfig,
    #[serde(default)]
    pub batch: BatchConfig,
}

#[derive(Debug, Deserialize)]
pub struct CorpusConfig {
    #[serde(default = "default_root")]
    pub root: PathBuf,
    #[serde(default = "default_sessions")]
    pub sessions: Vec<u32>,
    #[serde(default = "default_annotation_extension")]
    pub annotation_extension: String,
}

#[derive(Debug, Deserialize)]
pub struct BatchConfig {
    #[serde(default = "default_batch_size")]
    pub size: usize,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            sessions: default_sessions(),
            annotation_extension: default_annotation_extension(),
        }
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            size: default_batch_size(),
        }
    }
}

pub fn default_root() -> PathBuf { PathBuf::from("IEMOCAP_full_release") }
pub fn default_sessions() -> Vec<u32> { (1..=5).collect() }
pub fn default_annotation_extension() -> String { "txt".into() }
pub fn default_batch_size() -> usize { 8 }

pub fn load_config(path: &Path) -> Option<Config> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(err) => {
            log::warn!("Invalid config {}: {}", path.display(), err);
            None
        }
    }
}

/// `./emoframe.toml`, then `~/.config/emoframe/config.toml`, then the
/// platform config directory.
pub fn discover_config() -> Option<PathBuf> {
    let local = PathBuf::from("emoframe.toml");
    if local.exists() {
        return Some(local);
    }
    if let Some(home) = dirs::home_dir() {
        let xdg = home.join(".config").join("emoframe").join("config.toml");
        if xdg.exists() {
            return Some(xdg);
        }
    }
    if let Some(config_dir) = dirs::config_dir() {
        let platform = config_dir.join("emoframe").join("config.toml");
        if platform.exists() {
            return Some(platform);
        }
    }
    None
}
