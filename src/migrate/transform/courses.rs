use anyhow::anyhow;
use std::collections::{HashMap, HashSet};

use super::{learning_paths::path_slug, Transformer, TransformerContext};
use crate::{
    error::Result,
    migrate::ContentSet,
    model::{
        AuthorRef, Course, Document, Lesson, LegacyCourse, LegacyLesson, LegacySection,
        Reference, Section,
    },
};

/// Rewrites legacy course records into CMS course documents.
///
/// Inline authors and paths are replaced with references to the documents produced by the author
/// and learning-path transformers, which therefore have to run first. A course whose references
/// cannot be resolved is reported and left out.
pub struct CourseTransformer;

impl CourseTransformer {
    pub(crate) fn new() -> Self {
        Self
    }
}

impl Transformer for CourseTransformer {
    fn name(&self) -> &str {
        "courses"
    }

    fn run(&self, ctx: &TransformerContext, mut content: ContentSet) -> Result<ContentSet> {
        let authors: HashMap<&str, &Reference> = content
            .authors
            .iter()
            .map(|doc| (doc.body.name.as_str(), &doc.reference))
            .collect();

        let paths: HashSet<&Reference> = content
            .learning_paths
            .iter()
            .map(|doc| &doc.reference)
            .collect();

        let mut courses = Vec::new();
        let mut slugs = HashSet::new();

        for legacy in &ctx.catalogue.courses {
            if !slugs.insert(legacy.slug.as_str()) {
                tracing::warn!("Duplicate course slug '{}', the last one wins", legacy.slug);
            }

            let reference = ctx.config.content.course_ref(&legacy.slug);
            let normalized = normalize_course(ctx, legacy, &authors, &paths);

            match normalized {
                Ok(course) => courses.push(Document {
                    slug: legacy.slug.clone(),
                    reference,
                    body: course,
                }),
                Err(err) => {
                    tracing::error!("Skipping course '{}': {err}", legacy.slug);
                    content
                        .skipped
                        .push(format!("course '{}': {err}", legacy.slug));
                }
            }
        }

        tracing::debug!("Normalized {} courses", courses.len());
        content.courses.extend(courses);

        Ok(content)
    }
}

fn normalize_course(
    ctx: &TransformerContext,
    legacy: &LegacyCourse,
    authors: &HashMap<&str, &Reference>,
    paths: &HashSet<&Reference>,
) -> Result<Course> {
    let path = ctx.config.content.learning_path_ref(&path_slug(&legacy.path));
    if !paths.contains(&path) {
        anyhow::bail!("no learning path for '{}'", legacy.path);
    }

    let authors = legacy
        .authors
        .iter()
        .map(|author| {
            authors
                .get(author.name.as_str())
                .map(|reference| AuthorRef {
                    author: (*reference).clone(),
                })
                .ok_or_else(|| anyhow!("unknown author '{}'", author.name))
        })
        .collect::<Result<Vec<_>>>()?;

    let course = Course {
        course_id: legacy.id.clone(),
        slug: legacy.slug.clone(),
        title: legacy.title.clone(),
        path,
        github_url: legacy.github_url.clone(),
        preview_img: legacy.preview_img.clone(),
        duration: legacy.duration.clone(),
        description: legacy.description.clone(),
        overview: legacy.overview.clone(),
        authors,
        sections: legacy.sections.iter().map(normalize_section).collect(),
        created_at: ctx.stamp,
        updated_at: ctx.stamp,
        extra: legacy.extra.clone(),
    };

    Ok(course)
}

fn normalize_section(legacy: &LegacySection) -> Section {
    Section {
        section_id: legacy.id.clone(),
        slug: legacy.slug.clone(),
        title: legacy.title.clone(),
        lessons: legacy.lessons.iter().map(normalize_lesson).collect(),
        extra: legacy.extra.clone(),
    }
}

fn normalize_lesson(legacy: &LegacyLesson) -> Lesson {
    Lesson {
        lesson_id: legacy.id.clone(),
        slug: legacy.slug.clone(),
        title: legacy.title.clone(),
        description: legacy.description.clone(),
        duration: legacy.duration.clone(),
        video_url: legacy.video_url.clone(),
        raw_markdown_url: legacy.raw_markdown_url.clone(),
        markdown_content: legacy.markdown_content.clone(),
        updates: legacy.updates.clone(),
        extra: legacy.extra.clone(),
    }
}
