use anyhow::Context;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{
    fs::File,
    io::Read,
    path::{Path, PathBuf},
    str::FromStr,
};
use toml::{value::Table, Value};

use crate::{
    error::{Error, Result},
    model::Reference,
};

/// Name of the optional configuration file at the root of a content project.
pub const CONFIG_FILE: &str = "content.toml";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Locations of the legacy source and of every generated collection.
    pub content: ContentConfig,

    /// Any remaining configuration for the auxiliary commands.
    rest: Value,
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Config> {
        let mut buffer = String::new();
        File::open(path)
            .with_context(|| "Failed to open config file")?
            .read_to_string(&mut buffer)
            .with_context(|| "Failed to read config file")?;

        Config::from_str(&buffer)
    }

    /// Load `content.toml` from the project root, falling back to the defaults when absent.
    pub fn load_or_default(root: impl AsRef<Path>) -> Result<Config> {
        let config_location = root.as_ref().join(CONFIG_FILE);

        if config_location.exists() {
            tracing::debug!("Loading configuration from {}", config_location.display());
            Config::load(config_location)
        } else {
            Ok(Config::default())
        }
    }

    /// Deserialize one of the remaining top-level tables, using `T::default()` if it is not present.
    pub fn get<T>(&self, key: &str) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        let Some(value) = self.rest.get(key) else {
            return Ok(T::default());
        };

        value
            .clone()
            .try_into()
            .with_context(|| format!("Invalid [{key}] section in configuration"))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            content: ContentConfig::default(),
            rest: Value::Table(Table::default()),
        }
    }
}

impl<'de> Deserialize<'de> for Config {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error;

        let raw = Value::deserialize(deserializer)?;
        let Value::Table(mut table) = raw else {
            return Err(D::Error::custom("content.toml must always be a toml table"));
        };

        let content: ContentConfig = table
            .remove("content")
            .map(|content| content.try_into().map_err(D::Error::custom))
            .transpose()?
            .unwrap_or_default();

        let config = Config {
            content,
            rest: Value::Table(table),
        };

        Ok(config)
    }
}

impl FromStr for Config {
    type Err = Error;

    fn from_str(source: &str) -> Result<Self, Self::Err> {
        toml::from_str(source).with_context(|| "Attempted to parse invalid configuration file")
    }
}

/// Paths are relative to the project root. The collection directories are relative to `output`
/// and double as the prefix of every reference stored in the generated documents.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub struct ContentConfig {
    /// The legacy course catalogue.
    pub source: PathBuf,
    /// Root of the generated content collections.
    pub output: String,
    pub authors: String,
    pub learning_paths: String,
    pub courses: String,
    pub markdown: String,
    /// Root of the on-disk lesson tree (`<course>/<section>/<lesson>`).
    pub lessons: PathBuf,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::from("courses.json"),
            output: String::from("content"),
            authors: String::from("authors"),
            learning_paths: String::from("learning-paths"),
            courses: String::from("courses"),
            markdown: String::from("markdown"),
            lessons: PathBuf::from("courses"),
        }
    }
}

impl ContentConfig {
    pub fn author_ref(&self, slug: &str) -> Reference {
        self.reference(&self.authors, slug)
    }

    pub fn learning_path_ref(&self, slug: &str) -> Reference {
        self.reference(&self.learning_paths, slug)
    }

    pub fn course_ref(&self, slug: &str) -> Reference {
        self.reference(&self.courses, slug)
    }

    pub fn courses_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.output).join(&self.courses)
    }

    pub fn markdown_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.output).join(&self.markdown)
    }

    fn reference(&self, collection: &str, slug: &str) -> Reference {
        Reference::new(format!(
            "{}/{collection}/{slug}.json",
            self.output.trim_end_matches('/')
        ))
    }
}
