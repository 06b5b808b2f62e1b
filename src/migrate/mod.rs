//! The one-way migration from the legacy course catalogue to CMS documents.
//!
//! - Load `content.toml` (or defaults) and the legacy `courses.json`.
//! - Run every transformer over the catalogue to build the content set.
//! - Write one JSON document per author, learning path and course.
//! - Hand the courses to any configured renderers.

pub mod store;
pub mod transform;

use std::path::PathBuf;

use crate::{
    config::Config,
    error::Result,
    model::{Author, Course, Document, LearningPath, LegacyCatalogue},
    render::{RenderContext, Renderer},
};

use self::{
    store::{write_documents, WriteReport},
    transform::{default_transformers, Transformer, TransformerContext},
};

/// Every document produced by a migration run.
#[derive(Debug, Clone, Default)]
pub struct ContentSet {
    pub authors: Vec<Document<Author>>,
    pub learning_paths: Vec<Document<LearningPath>>,
    pub courses: Vec<Document<Course>>,
    /// Records that were left out, with the reason.
    pub skipped: Vec<String>,
}

#[derive(Debug, Default)]
pub struct MigrationReport {
    pub writes: WriteReport,
    pub skipped: Vec<String>,
}

pub struct Migrator {
    root: PathBuf,
    config: Config,
    transformers: Vec<Box<dyn Transformer>>,
    renderers: Vec<Box<dyn Renderer>>,
}

impl Migrator {
    pub fn load(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let config = Config::load_or_default(&root)?;

        Ok(Migrator::load_with_config(root, config))
    }

    pub fn load_with_config(root: impl Into<PathBuf>, config: Config) -> Self {
        Self {
            root: root.into(),
            config,
            transformers: default_transformers(),
            renderers: Vec::new(),
        }
    }

    pub fn with_transformer(&mut self, transformer: impl Transformer + 'static) -> &mut Self {
        self.transformers.push(Box::new(transformer));
        self
    }

    pub fn with_renderer(&mut self, renderer: impl Renderer + 'static) -> &mut Self {
        self.renderers.push(Box::new(renderer));
        self
    }

    /// Load the catalogue and run the transformers without touching the output directories.
    pub fn build(&self) -> Result<ContentSet> {
        let source = self.root.join(&self.config.content.source);
        tracing::info!("Reading course catalogue {}", source.display());

        let catalogue = LegacyCatalogue::load(&source)?;
        let rejected = catalogue
            .rejected
            .iter()
            .map(|rejected| format!("course #{}: {}", rejected.index, rejected.reason))
            .collect();

        let ctx = TransformerContext::new(self.root.clone(), self.config.clone(), catalogue);
        let mut content = ContentSet {
            skipped: rejected,
            ..ContentSet::default()
        };

        for transformer in &self.transformers {
            tracing::debug!("Running transformer '{}'", transformer.name());
            content = transformer.run(&ctx, content)?;
        }

        Ok(content)
    }

    /// Build the content set, write every document and run the renderers.
    pub fn run(&self) -> Result<MigrationReport> {
        let content = self.build()?;
        let mut writes = WriteReport::default();

        writes.merge(write_documents(&self.root, &content.learning_paths));
        writes.merge(write_documents(&self.root, &content.authors));
        writes.merge(write_documents(&self.root, &content.courses));

        if !self.renderers.is_empty() {
            let courses = content.courses.iter().map(|doc| doc.body.clone()).collect();
            let ctx = RenderContext::new(
                self.root.clone(),
                self.config.content.markdown_dir(&self.root),
                self.config.clone(),
                courses,
            );

            for renderer in &self.renderers {
                tracing::debug!("Running renderer '{}'", renderer.name());
                writes.merge(renderer.render(&ctx)?);
            }
        }

        tracing::info!(
            "Migration finished: {} files written, {} failed, {} records skipped",
            writes.written.len(),
            writes.failed.len(),
            content.skipped.len()
        );

        Ok(MigrationReport {
            writes,
            skipped: content.skipped,
        })
    }
}
