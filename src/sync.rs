//! One-way sync of lesson markdown into course documents.
//!
//! Lesson bodies are edited as markdown files in the lesson tree. After a change, the matching
//! `markdownContent` inside `content/courses/<course>.json` is replaced with the file contents.
//! The course document is never written back to the markdown file.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shlex::Shlex;
use std::{
    fs,
    path::{Component, Path, PathBuf},
    process::{Command, Stdio},
};

use crate::{
    config::{Config, ContentConfig},
    error::Result,
    migrate::store::write_json,
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub struct SyncConfig {
    /// Command printing the changed files, one per line, relative to the project root.
    pub changed_files_command: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            changed_files_command: String::from("git diff --name-only HEAD HEAD~1"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// `lessons` lessons of the course had their markdown replaced.
    Updated { course: String, lessons: usize },
    /// There is no course document for the course the file belongs to.
    MissingCourse { course: String },
    /// The course document has no lesson pointing at the file.
    LessonNotFound { course: String },
}

/// Run the configured command and collect the paths it prints.
pub fn changed_files(root: &Path, command: &str) -> Result<Vec<PathBuf>> {
    let mut parts = Shlex::new(command);
    let Some(bin) = parts.next() else {
        anyhow::bail!("Provided command string was empty");
    };

    let output = Command::new(&bin)
        .args(parts)
        .current_dir(root)
        .stdin(Stdio::null())
        .stderr(Stdio::inherit())
        .output()
        .with_context(|| format!("Failed to run `{command}`"))?;

    if !output.status.success() {
        anyhow::bail!("`{command}` failed ({}).", output.status);
    }

    let files = String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(PathBuf::from)
        .collect();

    Ok(files)
}

/// Sync every markdown file below the lesson root; other files are ignored.
///
/// Failures are logged per file and do not stop the remaining files.
pub fn sync_files(root: &Path, config: &Config, files: &[PathBuf]) -> Vec<SyncOutcome> {
    let mut outcomes = Vec::new();

    for file in files {
        if !is_lesson_markdown(&config.content, file) {
            continue;
        }

        tracing::info!("Updating JSON for changed file: {}", file.display());

        match sync_file(root, &config.content, file) {
            Ok(outcome) => outcomes.push(outcome),
            Err(err) => tracing::error!("{err:#}"),
        }
    }

    outcomes
}

fn is_lesson_markdown(content: &ContentConfig, file: &Path) -> bool {
    file.starts_with(&content.lessons) && file.extension().is_some_and(|ext| ext == "md")
}

/// Replace the markdown of every lesson whose `rawMarkdownUrl` points at `file`.
pub fn sync_file(root: &Path, content: &ContentConfig, file: &Path) -> Result<SyncOutcome> {
    let relative = file.strip_prefix(&content.lessons).with_context(|| {
        format!(
            "{} is outside of the lesson root {}",
            file.display(),
            content.lessons.display()
        )
    })?;

    let parts: Vec<&str> = relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => part.to_str(),
            _ => None,
        })
        .collect();

    let Some(course_slug) = parts.first().map(|slug| slug.to_string()) else {
        anyhow::bail!("Cannot determine the course of {}", file.display());
    };
    let raw_markdown_url = format!("/{}", parts.join("/"));

    let json_path = content
        .courses_dir(root)
        .join(format!("{course_slug}.json"));

    if !json_path.exists() {
        tracing::warn!("JSON file not found for course: {course_slug}");
        return Ok(SyncOutcome::MissingCourse {
            course: course_slug,
        });
    }

    let markdown_path = root.join(file);
    let markdown = fs::read_to_string(&markdown_path)
        .with_context(|| format!("Failed to read {}", markdown_path.display()))?;

    let raw = fs::read_to_string(&json_path)
        .with_context(|| format!("Failed to read {}", json_path.display()))?;
    let mut course: Value = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse {}", json_path.display()))?;

    let updated = replace_markdown(&mut course, &raw_markdown_url, &markdown);

    if updated == 0 {
        tracing::warn!(
            "Lesson not found in JSON for Markdown file: {}",
            file.display()
        );
        return Ok(SyncOutcome::LessonNotFound {
            course: course_slug,
        });
    }

    write_json(&json_path, &course)?;

    Ok(SyncOutcome::Updated {
        course: course_slug,
        lessons: updated,
    })
}

/// Set `markdownContent` on every lesson whose `rawMarkdownUrl` equals `url`.
///
/// Works on the raw document so fields this crate does not model survive untouched.
fn replace_markdown(course: &mut Value, url: &str, markdown: &str) -> usize {
    let Some(sections) = course.get_mut("sections").and_then(Value::as_array_mut) else {
        return 0;
    };

    let mut updated = 0;
    for section in sections {
        let Some(lessons) = section.get_mut("lessons").and_then(Value::as_array_mut) else {
            continue;
        };

        for lesson in lessons {
            let Some(lesson) = lesson.as_object_mut() else {
                continue;
            };

            if lesson.get("rawMarkdownUrl").and_then(Value::as_str) == Some(url) {
                lesson.insert(
                    String::from("markdownContent"),
                    Value::String(markdown.to_string()),
                );
                updated += 1;
            }
        }
    }

    updated
}
