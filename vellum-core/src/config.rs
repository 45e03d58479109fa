//! Configuration parsing and management.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    ParseError(#[from] serde_yaml::Error),
}

/// Main configuration struct matching the vellum.yml schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub site: SiteConfig,

    /// Production builds resolve the bundler manifest; development builds
    /// point straight at the dev server.
    #[serde(default)]
    pub production: bool,

    pub paths: PathsConfig,

    #[serde(default)]
    pub bundle: BundleConfig,

    #[serde(default)]
    pub server: ServerConfig,

    // Internal: path to config file (for relative path resolution)
    #[serde(skip)]
    config_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Absolute base URL of the deployed site
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory holding blog.json plus one source directory per article
    pub articles: PathBuf,

    /// Output root: versioned trees, copied assets, and the version pointer
    pub output: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleConfig {
    /// Bundler manifest location, relative to the output directory
    #[serde(default = "default_bundle_manifest")]
    pub manifest: PathBuf,

    /// Logical entry name to look up in the bundler manifest
    #[serde(default = "default_bundle_entry")]
    pub entry: String,

    /// Dev-server origin substituted in non-production builds
    #[serde(default = "default_dev_server")]
    pub dev_server: String,
}

fn default_bundle_manifest() -> PathBuf {
    PathBuf::from(".vite/manifest.json")
}

fn default_bundle_entry() -> String {
    String::from("web/index.css")
}

fn default_dev_server() -> String {
    String::from("http://localhost:5173")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    8080
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let mut config: Config = serde_yaml::from_str(&contents)?;

        // Store config file path for relative path resolution
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Get the articles directory, resolved relative to the config file
    pub fn articles_dir(&self) -> PathBuf {
        self.resolve_path(&self.paths.articles)
    }

    /// Get the output directory, resolved relative to the config file
    pub fn output_dir(&self) -> PathBuf {
        self.resolve_path(&self.paths.output)
    }

    /// Path to the article manifest
    pub fn manifest_path(&self) -> PathBuf {
        self.articles_dir().join("blog.json")
    }

    /// Markdown source file for one article
    pub fn article_source(&self, article_id: &str) -> PathBuf {
        self.articles_dir().join(article_id).join("index.md")
    }

    /// Source directory holding one article's assets
    pub fn article_assets_dir(&self, article_id: &str) -> PathBuf {
        self.articles_dir().join(article_id)
    }

    /// Site base URL without a trailing slash
    pub fn site_url(&self) -> String {
        self.site.url.trim_end_matches('/').to_string()
    }

    /// Resolve a path relative to the config file location
    fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else if let Some(config_path) = &self.config_path {
            if let Some(parent) = config_path.parent() {
                parent.join(path)
            } else {
                path.to_path_buf()
            }
        } else {
            path.to_path_buf()
        }
    }
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self {
            manifest: default_bundle_manifest(),
            entry: default_bundle_entry(),
            dev_server: default_dev_server(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}
