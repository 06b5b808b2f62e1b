use course_mark::{
    config::Config,
    migrate::Migrator,
    render::{unescape, MarkdownRenderer, RenderContext, Renderer},
};
use std::fs;

mod common;

/// The values of `key` at exactly `indent` spaces, unquoted and unescaped.
fn values(markdown: &str, indent: usize, key: &str) -> Vec<String> {
    let prefix = format!("{}{key}: ", " ".repeat(indent));

    markdown
        .lines()
        .filter_map(|line| line.strip_prefix(&prefix))
        .map(|value| {
            let value = value
                .strip_prefix('"')
                .and_then(|value| value.strip_suffix('"'))
                .unwrap_or(value);
            unescape(value)
        })
        .collect()
}

fn render_project() -> (tempfile::TempDir, String) {
    let project = common::project();
    let root = project.path();

    Migrator::load(root)
        .expect("failed to load migrator")
        .run()
        .expect("migration failed");

    let ctx = RenderContext::load(root, Config::default()).expect("failed to load courses");
    let report = MarkdownRenderer::new()
        .render(&ctx)
        .expect("render failed");
    assert_eq!(3, report.written.len());

    let markdown = fs::read_to_string(root.join("content/markdown/vyper-101.md"))
        .expect("markdown should be written");

    (project, markdown)
}

#[test]
fn it_round_trips_titles_durations_and_lessons() {
    let (_project, markdown) = render_project();

    assert_eq!(vec!["Vyper 101"], values(&markdown, 0, "title"));
    assert_eq!(vec!["12"], values(&markdown, 0, "duration"));
    assert_eq!(vec!["welcome", "setup"], values(&markdown, 8, "slug"));
    assert_eq!(
        vec!["Welcome to `Vyper`", "Setup \"forge\" with `cast` ***now***"],
        values(&markdown, 8, "title")
    );
    assert_eq!(vec!["Basics"], values(&markdown, 4, "title"));
}

#[test]
fn it_escapes_free_text_once_and_keeps_markdown_verbatim() {
    let (_project, markdown) = render_project();

    assert!(markdown.contains("        title: \"Welcome to \\`Vyper\\`\"\n"));
    assert!(markdown.contains(
        r#"        title: "Setup \"forge\" with \`cast\` \*\*\*now\*\*\*""#
    ));
    assert!(markdown.contains("    Learn \\\"Vyper\\\" from scratch\n"));
    assert!(!markdown.contains("\\\\"));
    assert!(markdown.contains("          Install ***everything***\n"));
}

#[test]
fn it_emits_references_and_markers() {
    let (_project, markdown) = render_project();

    assert!(markdown.starts_with("---\nid: 1\nblueprint: course\n"));
    assert!(markdown.contains(
        "authors:\n  - content/authors/jane-doe.json\n  - content/authors/john-roe.json\nsections:\n"
    ));
    assert_eq!(2, markdown.matches("type: new_lesson").count());
    assert_eq!(1, markdown.matches("type: new_section").count());
    assert!(markdown.ends_with("---\n"));
}

#[test]
fn it_skips_unparseable_course_documents() {
    let (project, _) = render_project();
    let root = project.path();
    fs::write(root.join("content/courses/broken.json"), "{").expect("write");

    let ctx = RenderContext::load(root, Config::default()).expect("failed to load courses");

    assert_eq!(3, ctx.courses.len());
}
