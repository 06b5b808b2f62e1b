use crate::common::{read_json, TestRenderer};
use course_mark::{
    error::Result,
    migrate::{
        transform::{Transformer, TransformerContext},
        ContentSet, Migrator,
    },
    render::MarkdownRenderer,
};
use std::collections::HashSet;

mod common;

#[test]
fn it_writes_one_document_per_entity() {
    let project = common::project();
    let root = project.path();

    let report = Migrator::load(root)
        .expect("failed to load migrator")
        .run()
        .expect("migration failed");

    assert!(report.writes.is_complete());
    assert_eq!(1, report.skipped.len());
    assert!(report.skipped[0].starts_with("course #3"));

    for path in [
        "content/authors/jane-doe.json",
        "content/authors/john-roe.json",
        "content/authors/alex-smith.json",
        "content/learning-paths/smart-contract-development.json",
        "content/learning-paths/security.json",
        "content/courses/vyper-101.json",
        "content/courses/security-101.json",
        "content/courses/foundry-101.json",
    ] {
        assert!(root.join(path).is_file(), "{path} was not written");
    }

    assert_eq!(8, report.writes.written.len());
}

#[test]
fn it_keeps_the_first_author_record() {
    let project = common::project();
    let root = project.path();

    Migrator::load(root)
        .expect("failed to load migrator")
        .run()
        .expect("migration failed");

    let author = read_json(root.join("content/authors/jane-doe.json"));

    assert_eq!("Jane Doe", author["name"]);
    assert_eq!("Lead instructor", author["role"]);
    assert_eq!("Cyfrin", author["company"]);
    assert!(author["authorId"].as_str().is_some_and(|id| !id.is_empty()));
}

#[test]
fn it_references_authors_and_learning_paths_by_path() {
    let project = common::project();
    let root = project.path();

    Migrator::load(root)
        .expect("failed to load migrator")
        .run()
        .expect("migration failed");

    let course = read_json(root.join("content/courses/vyper-101.json"));

    assert_eq!(1, course["courseId"]);
    assert!(course.get("id").is_none());
    assert_eq!(
        "content/learning-paths/smart-contract-development.json",
        course["path"]
    );
    assert_eq!("content/authors/jane-doe.json", course["authors"][0]["author"]);
    assert_eq!("content/authors/john-roe.json", course["authors"][1]["author"]);
    assert_eq!(course["createdAt"], course["updatedAt"]);

    for author in course["authors"].as_array().expect("authors array") {
        let reference = author["author"].as_str().expect("reference string");
        assert!(root.join(reference).is_file(), "{reference} does not exist");
    }

    let lesson = &course["sections"][0]["lessons"][0];
    assert_eq!("s-1", course["sections"][0]["sectionId"]);
    assert_eq!("l-1", lesson["lessonId"]);
    assert!(lesson.get("id").is_none());
}

#[test]
fn it_partitions_courses_into_learning_paths() {
    let project = common::project();
    let root = project.path();

    Migrator::load(root)
        .expect("failed to load migrator")
        .run()
        .expect("migration failed");

    let mut seen = Vec::new();
    for path in [
        "content/learning-paths/smart-contract-development.json",
        "content/learning-paths/security.json",
    ] {
        let learning_path = read_json(root.join(path));
        for course in learning_path["courses"].as_array().expect("courses array") {
            seen.push(course["course"].as_str().expect("reference").to_string());
        }
    }

    let unique: HashSet<_> = seen.iter().cloned().collect();
    assert_eq!(seen.len(), unique.len());
    assert_eq!(
        HashSet::from([
            String::from("content/courses/vyper-101.json"),
            String::from("content/courses/security-101.json"),
            String::from("content/courses/foundry-101.json"),
        ]),
        unique
    );

    let title = read_json(root.join("content/learning-paths/smart-contract-development.json"));
    assert_eq!("Smart Contract Development", title["title"]);
}

#[test]
fn it_hands_normalized_courses_to_renderers() {
    let project = common::project();
    let renderer = TestRenderer::default();
    let mut migrator = Migrator::load(project.path()).expect("failed to load migrator");

    migrator.with_renderer(renderer.clone());
    migrator.run().expect("migration failed");

    let slugs: Vec<_> = renderer.courses().into_iter().map(|c| c.slug).collect();
    assert_eq!(vec!["vyper-101", "security-101", "foundry-101"], slugs);
}

#[test]
fn it_renders_markdown_when_requested() {
    let project = common::project();
    let root = project.path();
    let mut migrator = Migrator::load(root).expect("failed to load migrator");

    migrator.with_renderer(MarkdownRenderer::new());
    let report = migrator.run().expect("migration failed");

    assert!(report.writes.is_complete());
    assert!(root.join("content/markdown/vyper-101.md").is_file());
    assert!(root.join("content/markdown/foundry-101.md").is_file());
}

#[test]
fn it_honours_content_toml() {
    let project = common::project();
    let root = project.path();
    std::fs::write(
        root.join("content.toml"),
        "[content]\noutput = \"cms\"\nauthors = \"people\"\n",
    )
    .expect("failed to write config");

    Migrator::load(root)
        .expect("failed to load migrator")
        .run()
        .expect("migration failed");

    let course = read_json(root.join("cms/courses/vyper-101.json"));
    assert_eq!("cms/people/jane-doe.json", course["authors"][0]["author"]);
    assert!(root.join("cms/people/jane-doe.json").is_file());
}

#[test]
fn it_fails_on_an_invalid_catalogue() {
    let project = common::project();
    std::fs::write(project.path().join("courses.json"), "{ not json").expect("write");

    let migrator = Migrator::load(project.path()).expect("failed to load migrator");

    assert!(migrator.run().is_err());
}

struct DraftFilter;

impl Transformer for DraftFilter {
    fn name(&self) -> &str {
        "draft_filter"
    }

    fn run(&self, _ctx: &TransformerContext, mut content: ContentSet) -> Result<ContentSet> {
        content.courses.retain(|course| course.slug != "foundry-101");
        content.skipped.push(String::from("course 'foundry-101': draft"));

        Ok(content)
    }
}

#[test]
fn it_runs_custom_transformers_after_the_defaults() {
    let project = common::project();
    let root = project.path();
    let mut migrator = Migrator::load(root).expect("failed to load migrator");

    migrator.with_transformer(DraftFilter);
    let report = migrator.run().expect("migration failed");

    assert!(!root.join("content/courses/foundry-101.json").exists());
    assert!(root.join("content/courses/vyper-101.json").is_file());
    assert_eq!(2, report.skipped.len());
}
