//! Build preparation: version allocation, manifest loading, and per-article
//! transformation. Filesystem output happens in the caller so the pointer
//! swap stays an explicit, final step.

use crate::{
    bundle::{self, Bundle, BundleError},
    config::Config,
    manifest::{self, ManifestError, RenderedArticle},
    markdown::{HighlightError, Highlighter, MarkdownProcessor},
    version::BuildVersion,
};
use std::fs;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Manifest error: {0}")]
    Manifest(#[from] ManifestError),

    #[error("Highlighter error: {0}")]
    Highlight(#[from] HighlightError),

    #[error("Bundle error: {0}")]
    Bundle(#[from] BundleError),

    #[error("Failed to read article source for '{id}': {source}")]
    Source { id: String, source: std::io::Error },
}

/// Everything the materialize and publish steps need for one run
#[derive(Debug)]
pub struct BuildPlan {
    pub version: BuildVersion,
    /// Accumulated page-head fragment (highlight stylesheet)
    pub head: String,
    pub bundle: Bundle,
    pub articles: Vec<RenderedArticle>,
}

/// Prepares one build run end to end, stopping short of filesystem output
pub struct BlogBuilder {
    config: Config,
}

impl BlogBuilder {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Init and Transform stages of a run.
    ///
    /// Any failure here is fatal: there is no partial-success mode before
    /// files are written.
    pub fn prepare(&self) -> Result<BuildPlan, BuildError> {
        let version = BuildVersion::allocate();
        tracing::info!("Allocated build version {}", version);

        let mut head = String::new();
        let highlighter = Highlighter::new(&mut head)?;
        let bundle = bundle::resolve(&self.config)?;

        let metas = manifest::load(&self.config.manifest_path())?;
        tracing::info!("Loaded manifest with {} articles", metas.len());

        let processor = MarkdownProcessor::new(highlighter);
        let site_url = self.config.site_url();

        let mut articles = Vec::with_capacity(metas.len());
        for article in metas {
            let source = self.config.article_source(&article.id);
            let markdown = fs::read_to_string(&source).map_err(|err| BuildError::Source {
                id: article.id.clone(),
                source: err,
            })?;

            let body = processor.convert(&markdown, &article.id, &site_url);
            tracing::debug!(
                "Transformed {} ({} asset references)",
                article.slug,
                body.assets.len()
            );

            articles.push(RenderedArticle {
                article,
                html: body.html,
                assets: body.assets,
            });
        }

        Ok(BuildPlan {
            version,
            head,
            bundle,
            articles,
        })
    }
}
