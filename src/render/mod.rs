mod escape;
mod markdown;

use anyhow::Context;
use std::{fs, path::PathBuf};

use crate::{config::Config, error::Result, migrate::store::WriteReport, model::Course};

pub use escape::*;
pub use markdown::*;

pub trait Renderer {
    fn name(&self) -> &str;

    fn render(&self, ctx: &RenderContext) -> Result<WriteReport>;
}

#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct RenderContext {
    /// The root directory of the content.toml file.
    pub root: PathBuf,
    /// The directory where the renderer **must** put its output.
    /// This directory is not guaranteed to be empty nor to exist.
    pub destination: PathBuf,
    /// The configuration of the project.
    pub config: Config,
    /// The course documents to render.
    pub courses: Vec<Course>,
}

impl RenderContext {
    pub fn new(root: PathBuf, destination: PathBuf, config: Config, courses: Vec<Course>) -> Self {
        Self {
            root,
            destination,
            config,
            courses,
        }
    }

    /// Build a context from the course documents already on disk.
    pub fn load(root: impl Into<PathBuf>, config: Config) -> Result<Self> {
        let root = root.into();
        let courses = load_courses(&config.content.courses_dir(&root))?;
        let destination = config.content.markdown_dir(&root);

        Ok(Self::new(root, destination, config, courses))
    }
}

/// Read every `*.json` course document in `dir`, sorted by file name.
///
/// A document that cannot be read or parsed is reported and skipped.
pub fn load_courses(dir: &std::path::Path) -> Result<Vec<Course>> {
    let mut paths = fs::read_dir(dir)
        .with_context(|| format!("Failed to read courses directory {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect::<Vec<_>>();
    paths.sort();

    let mut courses = Vec::new();

    for path in paths {
        let course = fs::read_to_string(&path)
            .with_context(|| format!("Error reading file: {}", path.display()))
            .and_then(|raw| {
                serde_json::from_str::<Course>(&raw)
                    .with_context(|| format!("Error parsing JSON from file: {}", path.display()))
            });

        match course {
            Ok(course) => courses.push(course),
            Err(err) => tracing::error!("{err:#}"),
        }
    }

    Ok(courses)
}
