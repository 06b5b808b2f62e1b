
use super::{escape, RenderContext, Renderer};
use crate::{
    error::Result,
    migrate::store::{write_file, WriteReport},
    model::{Course, Lesson, Section, Update},
};

const TOP_LEVEL_BLOCK: usize = 4;
const SECTION_FIELD: usize = 4;
const LESSON_FIELD: usize = 8;
const LESSON_BLOCK: usize = 10;
const UPDATE_FIELD: usize = 12;
const UPDATE_BLOCK: usize = 14;

/// Renders each course into `<destination>/<slug>.md`, a front-matter document consumed by the
/// static site. The loader is whitespace sensitive, so every block literal keeps a fixed indent.
pub struct MarkdownRenderer;

impl MarkdownRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for MarkdownRenderer {
    fn name(&self) -> &str {
        "markdown"
    }

    fn render(&self, ctx: &RenderContext) -> Result<WriteReport> {
        let mut report = WriteReport::default();

        for course in &ctx.courses {
            let path = ctx.destination.join(format!("{}.md", course.slug));
            let result = write_file(&path, &to_markdown(course));
            report.record(path, result);
        }

        Ok(report)
    }
}

/// Convert a course document into its front-matter markdown form.
pub fn to_markdown(course: &Course) -> String {
    let mut out = FrontMatter::default();
    let overview = course.overview.clone().unwrap_or_default();

    out.line(0, "---");
    out.field(0, "id", &course.course_id);
    out.field(0, "blueprint", "course");
    out.quoted(0, "title", &course.title);
    out.field(0, "updated_at", course.updated_at.timestamp_millis());
    out.quoted(0, "github_url", course.github_url.as_deref().unwrap_or_default());
    out.field(
        0,
        "preview_image",
        escape(course.preview_img.as_deref().unwrap_or_default()),
    );
    out.field(0, "duration", &course.duration);
    out.block(
        0,
        "description",
        TOP_LEVEL_BLOCK,
        course.description.as_deref().unwrap_or_default(),
        true,
    );
    out.block(
        0,
        "overview",
        TOP_LEVEL_BLOCK,
        overview.learnings.as_deref().unwrap_or_default(),
        true,
    );
    out.block(
        0,
        "preRequisites",
        TOP_LEVEL_BLOCK,
        &overview.pre_requisites.unwrap_or_default().join("\n"),
        true,
    );

    out.line(0, "authors:");
    for author in &course.authors {
        out.line(2, &format!("- {}", author.author));
    }

    out.line(0, "sections:");
    for (index, section) in course.sections.iter().enumerate() {
        render_section(&mut out, index + 1, section);
    }

    out.line(0, "---");
    out.finish()
}

fn render_section(out: &mut FrontMatter, number: usize, section: &Section) {
    out.line(2, "-");
    out.quoted(SECTION_FIELD, "title", &section.title);
    out.field(SECTION_FIELD, "slug", &section.slug);
    out.line(SECTION_FIELD, "lessons:");

    for (index, lesson) in section.lessons.iter().enumerate() {
        render_lesson(out, index + 1, lesson);
    }

    out.field(SECTION_FIELD, "type", "new_section");
    out.field(SECTION_FIELD, "enabled", true);
    out.field(SECTION_FIELD, "number", number);
}

fn render_lesson(out: &mut FrontMatter, number: usize, lesson: &Lesson) {
    out.line(6, "-");
    out.field(LESSON_FIELD, "type", "new_lesson");
    out.field(LESSON_FIELD, "enabled", true);
    out.field(LESSON_FIELD, "number", number);
    out.field(LESSON_FIELD, "id", &lesson.lesson_id);
    out.quoted(LESSON_FIELD, "title", &lesson.title);
    out.field(LESSON_FIELD, "slug", &lesson.slug);
    out.field(LESSON_FIELD, "duration", &lesson.duration);
    out.quoted(
        LESSON_FIELD,
        "video_url",
        lesson.video_url.as_deref().unwrap_or_default(),
    );
    out.quoted(
        LESSON_FIELD,
        "raw_markdown_url",
        lesson.raw_markdown_url.as_deref().unwrap_or_default(),
    );
    out.block(
        LESSON_FIELD,
        "description",
        LESSON_BLOCK,
        lesson.description.as_deref().unwrap_or_default(),
        true,
    );

    if let Some(updates) = lesson.updates.as_deref().filter(|u| !u.is_empty()) {
        out.line(LESSON_FIELD, "updates:");
        for update in updates {
            render_update(out, update);
        }
    }

    // NOTE: The lesson body is emitted verbatim, only indented.
    out.block(
        LESSON_FIELD,
        "markdown_content",
        LESSON_BLOCK,
        &lesson.markdown_content,
        false,
    );
}

fn render_update(out: &mut FrontMatter, update: &Update) {
    out.line(10, "-");
    out.quoted(UPDATE_FIELD, "title", &update.title);
    out.block(
        UPDATE_FIELD,
        "description",
        UPDATE_BLOCK,
        update.description.as_deref().unwrap_or_default(),
        true,
    );
    out.quoted(UPDATE_FIELD, "date", &update.date);
}

#[derive(Default)]
struct FrontMatter {
    buffer: String,
}

impl FrontMatter {
    fn line(&mut self, indent: usize, text: &str) {
        self.buffer.push_str(&format!("{:indent$}{text}\n", ""));
    }

    fn field(&mut self, indent: usize, key: &str, value: impl std::fmt::Display) {
        self.buffer.push_str(&format!("{:indent$}{key}: {value}\n", ""));
    }

    fn quoted(&mut self, indent: usize, key: &str, value: &str) {
        self.buffer
            .push_str(&format!("{:indent$}{key}: \"{}\"\n", "", escape(value)));
    }

    fn block(&mut self, indent: usize, key: &str, block_indent: usize, text: &str, escaped: bool) {
        self.line(indent, &format!("{key}: |-"));

        for line in text.split('\n') {
            if escaped {
                self.line(block_indent, &escape(line));
            } else {
                self.line(block_indent, line);
            }
        }
    }

    fn finish(self) -> String {
        self.buffer
    }
}
