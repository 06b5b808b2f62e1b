use anyhow::Context;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::{fs, path::Path};

use super::{Overview, RecordId, Update};
use crate::error::Result;

/// An author as it appears inline in the legacy catalogue, repeated for every course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyAuthor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyCourse {
    pub id: RecordId,
    pub slug: String,
    pub title: String,
    /// Free-text learning path name, grouped case-insensitively.
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_img: Option<String>,
    pub duration: Number,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overview: Option<Overview>,
    pub authors: Vec<LegacyAuthor>,
    #[serde(default)]
    pub sections: Vec<LegacySection>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacySection {
    pub id: RecordId,
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub lessons: Vec<LegacyLesson>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyLesson {
    pub id: RecordId,
    pub slug: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub duration: Number,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_markdown_url: Option<String>,
    #[serde(default)]
    pub markdown_content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updates: Option<Vec<Update>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The legacy catalogue after decoding. Records that could not be decoded are kept aside so they
/// can be reported without stopping the rest of the migration.
#[derive(Debug, Clone, Default)]
pub struct LegacyCatalogue {
    pub courses: Vec<LegacyCourse>,
    pub rejected: Vec<Rejected>,
}

#[derive(Debug, Clone)]
pub struct Rejected {
    /// Position of the record in the source array.
    pub index: usize,
    pub reason: String,
}

impl LegacyCatalogue {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)
            .with_context(|| format!("Failed to read course catalogue: {}", path.display()))?;

        Self::parse(&source).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Parse a JSON array of legacy course records. Only a document that is not an array of
    /// JSON values is an error; malformed records end up in `rejected`.
    pub fn parse(source: &str) -> Result<Self> {
        let records: Vec<Value> =
            serde_json::from_str(source).with_context(|| "Course catalogue must be a JSON array")?;

        let mut catalogue = Self::default();

        for (index, record) in records.into_iter().enumerate() {
            match serde_json::from_value::<LegacyCourse>(record) {
                Ok(course) => catalogue.courses.push(course),
                Err(err) => {
                    tracing::error!("Skipping course #{index}: {err}");
                    catalogue.rejected.push(Rejected {
                        index,
                        reason: err.to_string(),
                    });
                }
            }
        }

        Ok(catalogue)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn keeps_valid_records_and_rejects_malformed_ones() {
        let source = r#"[
            { "id": 1, "slug": "vyper-101", "title": "Vyper 101", "path": "Beginner",
              "duration": 10, "authors": [{ "name": "Jane Doe" }], "sections": [] },
            { "id": 2, "title": "No slug", "path": "Beginner", "duration": 1, "authors": [] },
            { "id": 3, "slug": "no-authors", "title": "No authors", "path": "Beginner", "duration": 1 }
        ]"#;

        let catalogue = LegacyCatalogue::parse(source).expect("catalogue should parse");

        assert_eq!(1, catalogue.courses.len());
        assert_eq!("vyper-101", catalogue.courses[0].slug);

        let rejected: Vec<_> = catalogue.rejected.iter().map(|r| r.index).collect();
        assert_eq!(vec![1, 2], rejected);
        assert!(catalogue.rejected[0].reason.contains("slug"));
        assert!(catalogue.rejected[1].reason.contains("authors"));
    }

    #[test]
    fn keeps_unknown_fields() {
        let source = r#"[
            { "id": "c-1", "slug": "s", "title": "t", "path": "p", "duration": 2.5,
              "authors": [], "isNew": true }
        ]"#;

        let catalogue = LegacyCatalogue::parse(source).expect("catalogue should parse");
        let course = &catalogue.courses[0];

        assert_eq!(RecordId::Text(String::from("c-1")), course.id);
        assert_eq!(Some(&Value::Bool(true)), course.extra.get("isNew"));
        assert_eq!("2.5", course.duration.to_string());
    }

    #[test]
    fn fails_when_not_an_array() {
        assert!(LegacyCatalogue::parse(r#"{ "courses": [] }"#).is_err());
        assert!(LegacyCatalogue::parse("not json").is_err());
    }
}
