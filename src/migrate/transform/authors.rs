use std::collections::{HashMap, HashSet};

use super::{Transformer, TransformerContext};
use crate::{
    error::Result,
    migrate::ContentSet,
    model::{Author, Document, LegacyAuthor},
    slug::{new_id, slugify},
};

/// Collapses the inline author objects of every course into one author document per name.
///
/// The first record seen for a name wins. Later records with the same name are dropped even if
/// their role or company differ.
pub struct AuthorTransformer;

impl AuthorTransformer {
    pub(crate) fn new() -> Self {
        Self
    }
}

impl Transformer for AuthorTransformer {
    fn name(&self) -> &str {
        "authors"
    }

    fn run(&self, ctx: &TransformerContext, mut content: ContentSet) -> Result<ContentSet> {
        let all_authors = ctx
            .catalogue
            .courses
            .iter()
            .flat_map(|course| course.authors.iter());

        let mut slugs: HashMap<String, String> = HashMap::new();

        for legacy in unique_by_name(all_authors) {
            let slug = slugify(&legacy.name);

            if let Some(other) = slugs.insert(slug.clone(), legacy.name.clone()) {
                tracing::warn!(
                    "Authors '{other}' and '{}' share the file name {slug}.json",
                    legacy.name
                );
            }

            let author = Author {
                author_id: new_id(),
                name: legacy.name.clone(),
                role: legacy.role.clone(),
                avatar_url: legacy.avatar_url.clone(),
                company: legacy.company.clone(),
            };

            content.authors.push(Document {
                reference: ctx.config.content.author_ref(&slug),
                slug,
                body: author,
            });
        }

        tracing::debug!("Collected {} unique authors", content.authors.len());

        Ok(content)
    }
}

/// First occurrence of every distinct name, in first-seen order.
fn unique_by_name<'a>(authors: impl Iterator<Item = &'a LegacyAuthor>) -> Vec<&'a LegacyAuthor> {
    let mut seen = HashSet::new();
    let mut unique = Vec::new();

    for author in authors {
        if seen.insert(author.name.as_str()) {
            unique.push(author);
        }
    }

    unique
}
