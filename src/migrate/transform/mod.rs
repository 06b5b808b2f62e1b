mod authors;
mod courses;
mod learning_paths;

pub use authors::*;
pub use courses::*;
pub use learning_paths::*;

use chrono::{DateTime, Utc};
use std::path::PathBuf;

use crate::{config::Config, error::Result, migrate::ContentSet, model::LegacyCatalogue};

/// A transformer derives one kind of document from the legacy catalogue and adds it to the
/// content set. Transformers run in order, so later ones may rely on documents produced earlier.
pub trait Transformer {
    fn name(&self) -> &str;

    fn run(&self, ctx: &TransformerContext, content: ContentSet) -> Result<ContentSet>;
}

#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct TransformerContext {
    /// Absolute path to the root of the project (where content.toml lives).
    pub root: PathBuf,
    /// Configuration from the content.toml file.
    pub config: Config,
    /// The decoded legacy catalogue.
    pub catalogue: LegacyCatalogue,
    /// The instant of this migration, stamped on every course.
    pub stamp: DateTime<Utc>,
}

impl TransformerContext {
    pub fn new(root: PathBuf, config: Config, catalogue: LegacyCatalogue) -> Self {
        Self {
            root,
            config,
            catalogue,
            stamp: Utc::now(),
        }
    }

    pub fn with_stamp(mut self, stamp: DateTime<Utc>) -> Self {
        self.stamp = stamp;
        self
    }
}

/// Authors and learning paths first, since courses reference both.
pub fn default_transformers() -> Vec<Box<dyn Transformer>> {
    vec![
        Box::new(AuthorTransformer::new()),
        Box::new(LearningPathTransformer::new()),
        Box::new(CourseTransformer::new()),
    ]
}
