use super::{Transformer, TransformerContext};
use crate::{
    error::Result,
    migrate::ContentSet,
    model::{CourseRef, Document, LearningPath, LegacyCourse},
    slug::{capitalize, new_id, slugify},
};

/// Groups courses into learning paths by their free-text `path`, ignoring case.
pub struct LearningPathTransformer;

impl LearningPathTransformer {
    pub(crate) fn new() -> Self {
        Self
    }
}

impl Transformer for LearningPathTransformer {
    fn name(&self) -> &str {
        "learning-paths"
    }

    fn run(&self, ctx: &TransformerContext, mut content: ContentSet) -> Result<ContentSet> {
        for (key, courses) in group_by_path(&ctx.catalogue.courses) {
            let title = capitalize(&key);
            let slug = path_slug(&key);

            // NOTE: Courses are written after learning paths, these are forward references.
            let courses = courses
                .into_iter()
                .map(|course| CourseRef {
                    course: ctx.config.content.course_ref(&course.slug),
                })
                .collect();

            content.learning_paths.push(Document {
                reference: ctx.config.content.learning_path_ref(&slug),
                slug,
                body: LearningPath {
                    learning_path_id: new_id(),
                    title,
                    courses,
                },
            });
        }

        tracing::debug!("Collected {} learning paths", content.learning_paths.len());

        Ok(content)
    }
}

/// The key a course is grouped under.
pub fn path_key(path: &str) -> String {
    path.to_lowercase()
}

/// Slug of the learning path a course `path` belongs to.
pub fn path_slug(path: &str) -> String {
    slugify(&capitalize(&path_key(path)))
}

/// Partition courses by their path key, keeping keys and courses in first-seen order.
pub fn group_by_path(courses: &[LegacyCourse]) -> Vec<(String, Vec<&LegacyCourse>)> {
    let mut groups: Vec<(String, Vec<&LegacyCourse>)> = Vec::new();

    for course in courses {
        let key = path_key(&course.path);

        match groups.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, members)) => members.push(course),
            None => groups.push((key, vec![course])),
        }
    }

    groups
}
