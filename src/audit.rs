//! Audit of the on-disk lesson tree.
//!
//! Every lesson directory (`<course>/<section>/<lesson>`) is expected to carry a minimum number of
//! caption files (`.vtt`) and at least one markdown file. Lessons below either minimum are listed
//! in the report together with any missing descriptions recorded in `<course>.txt`.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use shlex::Shlex;
use std::{
    fs::{self, OpenOptions},
    io::Write as _,
    path::{Path, PathBuf},
    process::Command,
};
use walkdir::WalkDir;

use crate::{config::ContentConfig, error::Result};

/// Depth of lesson directories below a course directory.
const LESSON_DEPTH: usize = 2;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub struct AuditConfig {
    pub min_captions: usize,
    pub min_lessons: usize,
    /// File the report is appended to, relative to the project root.
    pub report: PathBuf,
    /// Commands run for each course before it is audited. `{course}` is replaced with its name.
    pub prepare_commands: Vec<String>,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            min_captions: 13,
            min_lessons: 1,
            report: PathBuf::from("audit.txt"),
            prepare_commands: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Finding {
    Captions { lesson: PathBuf, count: usize },
    Lessons { lesson: PathBuf, count: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseAudit {
    pub course: String,
    pub findings: Vec<Finding>,
    /// Contents of `<course>.txt`, when present and not empty.
    pub missing_descriptions: Option<String>,
}

impl CourseAudit {
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty() && self.missing_descriptions.is_none()
    }

    pub fn to_report(&self) -> String {
        let mut report = String::new();
        report.push_str(&self.course.to_uppercase());
        report.push('\n');

        for finding in &self.findings {
            let line = match finding {
                Finding::Captions { lesson, count } => {
                    format!("{} Captions: {count}\n", lesson.display())
                }
                Finding::Lessons { lesson, count } => {
                    format!("{} Lessons: {count}\n", lesson.display())
                }
            };
            report.push_str(&line);
        }

        if self.findings.is_empty() {
            report.push_str("No missing captions or lessons found.\n");
        }

        match &self.missing_descriptions {
            Some(descriptions) => {
                report.push_str(&format!("\nMISSING DESCRIPTIONS:\n{descriptions}\n\n"));
            }
            None => report.push_str("No missing descriptions found.\n\n"),
        }

        report
    }
}

/// Run the preparation commands configured for `course`, stopping at the first failure.
pub fn prepare_course(root: &Path, config: &AuditConfig, course: &str) -> Result<()> {
    for template in &config.prepare_commands {
        let command = template.replace("{course}", course);
        let mut parts = Shlex::new(&command);
        let Some(bin) = parts.next() else {
            anyhow::bail!("Provided command string was empty");
        };

        tracing::info!("Running `{command}`");
        let status = Command::new(bin)
            .args(parts)
            .current_dir(root)
            .status()
            .with_context(|| format!("Failed to run `{command}`"))?;

        if !status.success() {
            anyhow::bail!("`{command}` failed ({status}).");
        }
    }

    Ok(())
}

/// Count captions and markdown files of every lesson of `course` and collect the shortfalls.
pub fn audit_course(
    root: &Path,
    content: &ContentConfig,
    config: &AuditConfig,
    course: &str,
) -> Result<CourseAudit> {
    let course_root = root.join(&content.lessons).join(course);
    if !course_root.is_dir() {
        anyhow::bail!("Course directory {} does not exist", course_root.display());
    }

    let mut findings = Vec::new();

    let lessons = WalkDir::new(&course_root)
        .min_depth(LESSON_DEPTH)
        .max_depth(LESSON_DEPTH)
        .sort_by_file_name();

    for entry in lessons {
        let entry = entry.with_context(|| format!("Failed to walk {}", course_root.display()))?;
        if !entry.file_type().is_dir() {
            continue;
        }

        let (captions, markdown) = count_files(entry.path())?;
        let lesson = entry
            .path()
            .strip_prefix(root)
            .unwrap_or(entry.path())
            .to_path_buf();

        tracing::debug!(
            "{}: {captions} captions, {markdown} markdown files",
            lesson.display()
        );

        if captions < config.min_captions {
            tracing::warn!("{} Captions: {captions}", lesson.display());
            findings.push(Finding::Captions {
                lesson: lesson.clone(),
                count: captions,
            });
        }

        if markdown < config.min_lessons {
            tracing::warn!("{} Lessons: {markdown}", lesson.display());
            findings.push(Finding::Lessons {
                lesson,
                count: markdown,
            });
        }
    }

    let descriptions_path = root.join(format!("{course}.txt"));
    let missing_descriptions = match fs::read_to_string(&descriptions_path) {
        Ok(descriptions) if !descriptions.trim().is_empty() => Some(descriptions),
        _ => None,
    };

    Ok(CourseAudit {
        course: String::from(course),
        findings,
        missing_descriptions,
    })
}

/// Append the report of each audit to `path`.
pub fn append_report(path: &Path, audits: &[CourseAudit]) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open audit report {}", path.display()))?;

    for audit in audits {
        file.write_all(audit.to_report().as_bytes())
            .with_context(|| format!("Failed to write audit report {}", path.display()))?;
    }

    Ok(())
}

/// Number of caption and markdown files directly inside `dir`.
fn count_files(dir: &Path) -> Result<(usize, usize)> {
    let mut captions = 0;
    let mut markdown = 0;

    for entry in fs::read_dir(dir).with_context(|| format!("Failed to read {}", dir.display()))? {
        let path = entry
            .with_context(|| format!("Failed to list {}", dir.display()))?
            .path();

        if !path.is_file() {
            continue;
        }

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("vtt") => captions += 1,
            Some("md") => markdown += 1,
            _ => (),
        }
    }

    Ok((captions, markdown))
}
