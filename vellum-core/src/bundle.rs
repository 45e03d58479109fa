//! Cache-busted stylesheet bundle resolution.

use crate::config::Config;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BundleError {
    #[error("Failed to read bundle manifest {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse bundle manifest: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Bundle manifest has no entry for '{0}'")]
    MissingEntry(String),
}

#[derive(Debug, Deserialize)]
struct ManifestChunk {
    file: String,
}

/// Head markup referencing the built (or dev-served) stylesheet bundle
#[derive(Debug, Clone, Default)]
pub struct Bundle {
    pub tags: String,
}

/// Resolve bundle tags for the current mode.
///
/// Production reads the bundler manifest below the output root and links the
/// hashed filename it names for the configured entry; a missing manifest or
/// entry is fatal. Development substitutes fixed dev-server module scripts.
pub fn resolve(config: &Config) -> Result<Bundle, BundleError> {
    if !config.production {
        let dev = &config.bundle.dev_server;
        return Ok(Bundle {
            tags: format!(
                "<script type=\"module\" src=\"{dev}/@vite/client\"></script>\n\
                 <script type=\"module\" src=\"{dev}/{entry}\"></script>",
                dev = dev,
                entry = config.bundle.entry,
            ),
        });
    }

    let path = config.output_dir().join(&config.bundle.manifest);
    let raw = std::fs::read_to_string(&path).map_err(|source| BundleError::Read {
        path: path.clone(),
        source,
    })?;
    let chunks: HashMap<String, ManifestChunk> = serde_json::from_str(&raw)?;

    let chunk = chunks
        .get(&config.bundle.entry)
        .ok_or_else(|| BundleError::MissingEntry(config.bundle.entry.clone()))?;

    Ok(Bundle {
        tags: format!(
            "<link rel=\"stylesheet\" href=\"{}/{}\">",
            config.site_url(),
            chunk.file
        ),
    })
}
