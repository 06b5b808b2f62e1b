use course_mark::{
    error::Result,
    migrate::store::WriteReport,
    model::Course,
    render::{RenderContext, Renderer},
};
use std::{cell::RefCell, fs, path::Path, rc::Rc};
use tempfile::TempDir;

pub const COURSES: &str = r##"[
    {
        "id": 1,
        "slug": "vyper-101",
        "title": "Vyper 101",
        "path": "Smart Contract Development",
        "githubUrl": "https://github.com/example/vyper-101",
        "previewImg": "/img/vyper.png",
        "duration": 12,
        "description": "Learn \"Vyper\" from scratch",
        "overview": { "learnings": "Vyper\nTesting", "preRequisites": ["Python"] },
        "authors": [
            { "name": "Jane Doe", "role": "Lead instructor", "company": "Cyfrin" },
            { "name": "John Roe", "role": "Engineer" }
        ],
        "sections": [
            {
                "id": "s-1", "slug": "basics", "title": "Basics",
                "lessons": [
                    {
                        "id": "l-1", "slug": "welcome", "title": "Welcome to `Vyper`",
                        "duration": 3,
                        "rawMarkdownUrl": "/vyper-101/1-basics/1-welcome/+page.md",
                        "markdownContent": "# Welcome\n\nOld text"
                    },
                    {
                        "id": "l-2", "slug": "setup", "title": "Setup \"forge\" with `cast` ***now***",
                        "duration": 4,
                        "rawMarkdownUrl": "/vyper-101/1-basics/2-setup/+page.md",
                        "markdownContent": "Install ***everything***"
                    }
                ]
            }
        ]
    },
    {
        "id": 2,
        "slug": "security-101",
        "title": "Security 101",
        "path": "security",
        "duration": 8,
        "authors": [{ "name": "Jane Doe", "role": "Guest", "company": "Elsewhere" }],
        "sections": []
    },
    {
        "id": 3,
        "slug": "foundry-101",
        "title": "Foundry 101",
        "path": "smart contract development",
        "duration": 20,
        "authors": [{ "name": "Alex Smith" }],
        "sections": []
    },
    {
        "id": 4,
        "title": "Broken course without a slug",
        "path": "security",
        "duration": 1,
        "authors": []
    }
]"##;

/// A scratch project containing `courses.json`.
pub fn project() -> TempDir {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    fs::write(dir.path().join("courses.json"), COURSES).expect("failed to write courses.json");

    dir
}

#[allow(dead_code)] // Avoid a false positive on the dead code analysis.
pub fn read_json(path: impl AsRef<Path>) -> serde_json::Value {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .unwrap_or_else(|err| panic!("failed to read {}: {err}", path.display()));

    serde_json::from_str(&raw).expect("output should be valid JSON")
}

#[derive(Clone, Default)]
pub struct TestRenderer(Rc<RefCell<Option<Vec<Course>>>>);

impl TestRenderer {
    #[allow(dead_code)] // Avoid a false positive on the dead code analysis.
    pub fn courses(&self) -> Vec<Course> {
        self.0.borrow_mut().take().expect("result was not set")
    }
}

impl Renderer for TestRenderer {
    fn name(&self) -> &str {
        "test_renderer"
    }

    fn render(&self, ctx: &RenderContext) -> Result<WriteReport> {
        *self.0.borrow_mut() = Some(ctx.courses.clone());

        Ok(WriteReport::default())
    }
}
