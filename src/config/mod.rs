use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::query::{collator_for, CaseInsensitive, Collator, DEFAULT_LOCALE};

const APP_DOMAIN: &str = "io";
const APP_ORG: &str = "TodoReport";
const APP_NAME: &str = "todo-report";

/// Environment variable naming a config file or directory.
pub const CONFIG_ENV: &str = "TODO_REPORT_CONFIG";

pub struct ConfigLoader {
    paths: ConfigPaths,
}

impl ConfigLoader {
    pub fn discover() -> Result<Self> {
        let paths = ConfigPaths::discover()?;
        Ok(Self { paths })
    }

    pub fn with_paths(paths: ConfigPaths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &ConfigPaths {
        &self.paths
    }

    pub fn load_or_init(&self) -> Result<AppConfig> {
        self.paths.ensure_directories()?;
        if !self.paths.config_file.exists() {
            let mut default_cfg = AppConfig::default();
            default_cfg.post_load();
            self.write_default_config(&default_cfg)?;
            return Ok(default_cfg);
        }

        self.load()
    }

    pub fn load(&self) -> Result<AppConfig> {
        let raw = fs::read_to_string(&self.paths.config_file)
            .with_context(|| format!("reading config {}", self.paths.config_file.display()))?;
        let mut cfg: AppConfig = toml::from_str(&raw).context("parsing config toml")?;
        cfg.post_load();
        Ok(cfg)
    }

    fn write_default_config(&self, cfg: &AppConfig) -> Result<()> {
        let toml = toml::to_string_pretty(cfg).context("serializing default config")?;
        if let Some(parent) = self.paths.config_file.parent() {
            fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
        }
        let mut file = fs::File::create(&self.paths.config_file)
            .with_context(|| format!("creating config {}", self.paths.config_file.display()))?;
        file.write_all(toml.as_bytes())
            .context("writing default config")?;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ConfigPaths {
    pub config_dir: PathBuf,
    pub config_file: PathBuf,
}

impl ConfigPaths {
    pub fn discover() -> Result<Self> {
        let override_config = env::var(CONFIG_ENV).ok().map(PathBuf::from);

        let config_dir = match &override_config {
            Some(p) if p.is_dir() => p.clone(),
            Some(p) => p.parent().map(Path::to_path_buf).unwrap_or_else(|| p.clone()),
            None => ProjectDirs::from(APP_DOMAIN, APP_ORG, APP_NAME)
                .context("resolving XDG project directories")?
                .config_dir()
                .to_path_buf(),
        };

        let config_file = override_config
            .filter(|p| p.is_file() || p.extension().is_some())
            .unwrap_or_else(|| config_dir.join("config.toml"));

        Ok(Self {
            config_dir,
            config_file,
        })
    }

    pub fn ensure_directories(&self) -> Result<()> {
        fs::create_dir_all(&self.config_dir).with_context(|| {
            format!("creating config directory {}", self.config_dir.display())
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub scan: ScanOptions,
    pub collation: CollationOptions,
}

impl AppConfig {
    fn post_load(&mut self) {
        self.scan.normalize();
        if collator_for(&self.collation.locale).is_none() {
            tracing::warn!(
                locale = %self.collation.locale,
                "unknown collation locale in config, comparing case-insensitively"
            );
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanOptions {
    /// File extension to scan, without the leading dot.
    pub extension: String,
    pub follow_links: bool,
    /// Skip files and directories whose name starts with `.`
    pub skip_hidden: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            extension: "js".into(),
            follow_links: false,
            skip_hidden: false,
        }
    }
}

impl ScanOptions {
    pub fn normalize(&mut self) {
        let trimmed = self.extension.trim().trim_start_matches('.');
        if trimmed.len() != self.extension.len() {
            self.extension = trimmed.to_owned();
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollationOptions {
    /// Locale tag for ordering owners in `sort user`.
    pub locale: String,
}

impl Default for CollationOptions {
    fn default() -> Self {
        Self {
            locale: DEFAULT_LOCALE.into(),
        }
    }
}

impl CollationOptions {
    pub fn collator(&self) -> Box<dyn Collator> {
        collator_for(&self.locale).unwrap_or_else(|| Box::new(CaseInsensitive))
    }
}
