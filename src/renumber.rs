//! Opening a gap in a section's numbered lesson directories.
//!
//! When a lesson is inserted into a section it is created with the number of the lesson it should
//! precede, leaving two directories with the same prefix (`6-b` and `6-c`). [`renumber`] shifts the
//! second one and every later lesson up by one.

use anyhow::Context;
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::error::Result;

/// A lesson directory named `<number>-<rest>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonDir {
    pub number: u64,
    /// Everything after the numeric prefix, starting with the `-`.
    pub rest: String,
}

impl LessonDir {
    /// Parse a directory name; names without a `<digits>-` prefix are not lesson directories.
    pub fn parse(name: &str) -> Option<Self> {
        let (digits, _) = name.split_once('-')?;

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        let Ok(number) = digits.parse() else {
            tracing::warn!("Ignoring {name}: lesson number is out of range");
            return None;
        };
        let rest = String::from(&name[digits.len()..]);

        Some(Self { number, rest })
    }

    pub fn name(&self) -> String {
        format!("{}{}", self.number, self.rest)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Directories renamed, in the order the renames happened.
    Renamed(Vec<(String, String)>),
    /// The target number does not occur twice, nothing was touched.
    NotFound,
}

/// List the lesson directories of a section, sorted by number and then by name.
pub fn list_lessons(section: &Path) -> Result<Vec<LessonDir>> {
    let mut lessons = Vec::new();

    for entry in fs::read_dir(section)
        .with_context(|| format!("Failed to read section directory {}", section.display()))?
    {
        let entry = entry.with_context(|| format!("Failed to list {}", section.display()))?;

        if !entry.file_type().map(|kind| kind.is_dir()).unwrap_or(false) {
            continue;
        }

        if let Some(lesson) = entry.file_name().to_str().and_then(LessonDir::parse) {
            lessons.push(lesson);
        }
    }

    lessons.sort_by(|a, b| a.number.cmp(&b.number).then_with(|| a.rest.cmp(&b.rest)));

    Ok(lessons)
}

/// Index of the second lesson numbered `target`, if any.
pub fn second_occurrence(lessons: &[LessonDir], target: u64) -> Option<usize> {
    lessons
        .iter()
        .enumerate()
        .filter(|(_, lesson)| lesson.number == target)
        .nth(1)
        .map(|(index, _)| index)
}

/// Shift the second lesson numbered `target`, and every lesson after it, up by one.
///
/// Renames run from the last lesson backwards so no rename ever lands on an existing name. A
/// failed rename aborts the pass and leaves the earlier renames in place.
pub fn renumber(section: impl AsRef<Path>, target: u64) -> Result<Outcome> {
    let section = section.as_ref();
    let lessons = list_lessons(section)?;

    let Some(start) = second_occurrence(&lessons, target) else {
        tracing::info!(
            "No second occurrence of lesson {target} found in {}",
            section.display()
        );
        return Ok(Outcome::NotFound);
    };

    let mut renamed = Vec::new();

    for lesson in lessons[start..].iter().rev() {
        let old_name = lesson.name();
        let Some(number) = lesson.number.checked_add(1) else {
            anyhow::bail!(
                "Cannot shift {old_name} in {}: lesson number is out of range",
                section.display()
            );
        };
        let new_name = LessonDir {
            number,
            rest: lesson.rest.clone(),
        }
        .name();

        let old_path: PathBuf = section.join(&old_name);
        let new_path: PathBuf = section.join(&new_name);

        fs::rename(&old_path, &new_path).with_context(|| {
            format!(
                "Failed to rename {} -> {} after {} successful renames",
                old_path.display(),
                new_path.display(),
                renamed.len()
            )
        })?;

        tracing::info!("Renamed: {old_name} -> {new_name}");
        renamed.push((old_name, new_name));
    }

    Ok(Outcome::Renamed(renamed))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_numbered_names() {
        assert_eq!(
            Some(LessonDir {
                number: 12,
                rest: String::from("-deploy-script"),
            }),
            LessonDir::parse("12-deploy-script")
        );
        assert_eq!(None, LessonDir::parse("notes"));
        assert_eq!(None, LessonDir::parse("12notes"));
        assert_eq!(None, LessonDir::parse("-12-x"));
        assert_eq!(None, LessonDir::parse("1a-x"));
        assert_eq!(None, LessonDir::parse("99999999999999999999999-x"));
        assert_eq!(
            Some(4_294_967_296),
            LessonDir::parse("4294967296-x").map(|lesson| lesson.number)
        );
    }

    #[test]
    fn finds_the_second_occurrence() {
        let lessons: Vec<_> = ["5-a", "6-b", "6-c", "7-d"]
            .into_iter()
            .filter_map(LessonDir::parse)
            .collect();

        assert_eq!(Some(2), second_occurrence(&lessons, 6));
        assert_eq!(None, second_occurrence(&lessons, 5));
        assert_eq!(None, second_occurrence(&lessons, 9));
    }
}
