//! Contracts for the collaborators the layout core consumes.
//!
//! Retrieval failures are reported as `None`/empty results, never as errors: a page that cannot
//! be fetched must not take the layout down with it.

use crate::model::{Redirect, article_url, normalize_title, title_key};
use futures::future::BoxFuture;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Upper bound on related links used to seed an exploration sub-graph.
pub const MAX_RELATED_LINKS: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub description: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedLink {
    pub title: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageData {
    pub content: String,
    pub url: Option<String>,
    pub thumbnail: Option<String>,
    pub redirect: Option<Redirect>,
}

pub trait ContentSource {
    fn fetch_content(&self, title: &str) -> Option<String>;

    fn fetch_thumbnail(&self, title: &str) -> Option<String>;

    fn search(&self, query: &str) -> Vec<SearchHit>;

    /// Canonical url of an article.
    fn page_url(&self, title: &str) -> Option<String> {
        Some(article_url(title))
    }

    /// Redirect target announced by a page, if any.
    fn redirect_of(&self, _title: &str, _content: &str) -> Option<Redirect> {
        None
    }

    /// Content, thumbnail and redirect info in one call; `None` when the content is unavailable.
    fn load_page(&self, title: &str) -> Option<PageData> {
        let content = self.fetch_content(title)?;
        let thumbnail = self.fetch_thumbnail(title);
        let redirect = self.redirect_of(title, &content);
        Some(PageData {
            content,
            url: self.page_url(title),
            thumbnail,
            redirect,
        })
    }
}

pub trait LinkParser {
    /// Related ("see also") links in document order.
    fn related_links(&self, content: &str) -> Vec<RelatedLink>;
}

/// Related links with duplicate titles removed, capped at [`MAX_RELATED_LINKS`].
pub fn capped_related_links(parser: &dyn LinkParser, content: &str) -> Vec<RelatedLink> {
    let mut seen = rustc_hash::FxHashSet::default();
    parser
        .related_links(content)
        .into_iter()
        .filter(|l| seen.insert(title_key(&l.title)))
        .take(MAX_RELATED_LINKS)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub id: u32,
    pub name: String,
    pub keywords: Vec<String>,
    pub probability: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionTopics {
    pub section: String,
    pub topic_ids: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicAnalysis {
    pub topics: Vec<Topic>,
    pub sections_with_topics: Vec<SectionTopics>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("topic extraction failed: {message}")]
pub struct TopicError {
    pub message: String,
}

/// Advisory topic analysis; the layout core never waits on it.
pub trait TopicExtractor {
    fn extract<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<TopicAnalysis, TopicError>>;
}

#[derive(Debug, Clone, Default)]
struct PageRecord {
    title: String,
    content: String,
    thumbnail: Option<String>,
    redirect: Option<Redirect>,
    description: String,
    url: String,
}

/// Offline content source backed by a fixed set of pages. Titles match case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct InMemoryContentSource {
    pages: FxHashMap<String, PageRecord>,
    order: Vec<String>,
}

impl InMemoryContentSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, title: &str, content: impl Into<String>) -> Self {
        self.insert_page(title, content);
        self
    }

    pub fn insert_page(&mut self, title: &str, content: impl Into<String>) {
        let key = title_key(title);
        if !self.pages.contains_key(&key) {
            self.order.push(key.clone());
        }
        let url = article_url(title);
        self.pages.insert(
            key,
            PageRecord {
                title: normalize_title(title),
                content: content.into(),
                url,
                ..Default::default()
            },
        );
    }

    pub fn set_thumbnail(&mut self, title: &str, thumbnail: impl Into<String>) {
        if let Some(p) = self.pages.get_mut(&title_key(title)) {
            p.thumbnail = Some(thumbnail.into());
        }
    }

    pub fn set_redirect(&mut self, title: &str, target_title: &str) {
        if let Some(p) = self.pages.get_mut(&title_key(title)) {
            p.redirect = Some(Redirect {
                target_title: target_title.to_string(),
                target_url: None,
            });
        }
    }

    pub fn set_description(&mut self, title: &str, description: impl Into<String>) {
        if let Some(p) = self.pages.get_mut(&title_key(title)) {
            p.description = description.into();
        }
    }

    pub fn remove_page(&mut self, title: &str) {
        let key = title_key(title);
        self.pages.remove(&key);
        self.order.retain(|k| k != &key);
    }
}

impl ContentSource for InMemoryContentSource {
    fn fetch_content(&self, title: &str) -> Option<String> {
        self.pages.get(&title_key(title)).map(|p| p.content.clone())
    }

    fn fetch_thumbnail(&self, title: &str) -> Option<String> {
        self.pages
            .get(&title_key(title))
            .and_then(|p| p.thumbnail.clone())
    }

    fn search(&self, query: &str) -> Vec<SearchHit> {
        let needle = title_key(query);
        if needle.is_empty() {
            return Vec::new();
        }
        self.order
            .iter()
            .filter(|k| k.contains(&needle))
            .filter_map(|k| self.pages.get(k))
            .map(|p| SearchHit {
                title: p.title.clone(),
                description: p.description.clone(),
                url: p.url.clone(),
            })
            .collect()
    }

    fn page_url(&self, title: &str) -> Option<String> {
        self.pages.get(&title_key(title)).map(|p| p.url.clone())
    }

    fn redirect_of(&self, title: &str, _content: &str) -> Option<Redirect> {
        self.pages
            .get(&title_key(title))
            .and_then(|p| p.redirect.clone())
    }
}

/// Link parser backed by a fixed content → links table.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLinkParser {
    links: FxHashMap<String, Vec<RelatedLink>>,
}

impl InMemoryLinkParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_links<'a>(
        mut self,
        content: impl Into<String>,
        titles: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        let links = titles
            .into_iter()
            .map(|t| RelatedLink {
                title: t.to_string(),
                url: article_url(t),
            })
            .collect();
        self.links.insert(content.into(), links);
        self
    }
}

impl LinkParser for InMemoryLinkParser {
    fn related_links(&self, content: &str) -> Vec<RelatedLink> {
        self.links.get(content).cloned().unwrap_or_default()
    }
}
