//! Book data and page materialization

use serde::{Deserialize, Serialize};
use tracing::warn;

/// How a leaf bends while flipping. Covers are rigid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Density {
    Hard,
    Soft,
}

impl Density {
    pub fn as_str(self) -> &'static str {
        match self {
            Density::Hard => "hard",
            Density::Soft => "soft",
        }
    }
}

/// One leaf handed to the page-turn engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSpec {
    pub src: String,
    pub alt: String,
    pub density: Density,
}

impl PageSpec {
    pub fn is_cover(&self) -> bool {
        self.density == Density::Hard
    }
}

/// A book as attached to its mount root. Immutable once a controller owns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: String,
    pub front_cover: String,
    pub back_cover: String,
    pub pages: Vec<String>,
}

impl Book {
    pub fn new(
        id: impl Into<String>,
        front_cover: impl Into<String>,
        back_cover: impl Into<String>,
        pages: Vec<String>,
    ) -> Self {
        Self {
            id: id.into(),
            front_cover: front_cover.into(),
            back_cover: back_cover.into(),
            pages,
        }
    }

    /// Build a book from the mount root's `data-*` attributes.
    ///
    /// A missing or malformed page list yields a two-cover book.
    pub fn from_dataset(
        id: impl Into<String>,
        pages_json: Option<&str>,
        front_cover: impl Into<String>,
        back_cover: impl Into<String>,
    ) -> Self {
        let id = id.into();
        let pages = match pages_json.map(str::trim).filter(|s| !s.is_empty()) {
            None => Vec::new(),
            Some(json) => serde_json::from_str::<Vec<String>>(json).unwrap_or_else(|e| {
                warn!(book = %id, error = %e, "Ignoring malformed page list");
                Vec::new()
            }),
        };
        Self::new(id, front_cover, back_cover, pages)
    }

    /// Number of leaves the engine will hold: both covers plus every content page.
    pub fn leaf_count(&self) -> usize {
        self.pages.len() + 2
    }

    /// `[front cover, ...content pages, back cover]`, covers flagged hard.
    pub fn materialize(&self) -> Vec<PageSpec> {
        let mut leaves = Vec::with_capacity(self.leaf_count());
        leaves.push(PageSpec {
            src: self.front_cover.clone(),
            alt: "Cover".to_string(),
            density: Density::Hard,
        });
        leaves.extend(self.pages.iter().enumerate().map(|(i, src)| PageSpec {
            src: src.clone(),
            alt: format!("Page {}", i + 1),
            density: Density::Soft,
        }));
        leaves.push(PageSpec {
            src: self.back_cover.clone(),
            alt: "Back Cover".to_string(),
            density: Density::Hard,
        });
        leaves
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_materialize_wraps_pages_in_hard_covers() {
        let book = Book::new(
            "1",
            "front.jpg",
            "back.jpg",
            vec!["p1.jpg".into(), "p2.jpg".into()],
        );
        let leaves = book.materialize();
        assert_eq!(leaves.len(), 4);
        assert_eq!(leaves[0].src, "front.jpg");
        assert!(leaves[0].is_cover());
        assert_eq!(leaves[1].alt, "Page 1");
        assert_eq!(leaves[2].density, Density::Soft);
        assert_eq!(leaves[3].src, "back.jpg");
        assert!(leaves[3].is_cover());
    }

    #[test]
    fn test_from_dataset_parses_page_list() {
        let book = Book::from_dataset("7", Some(r#"["a.jpg","b.jpg"]"#), "f", "b");
        assert_eq!(book.pages, vec!["a.jpg", "b.jpg"]);
        assert_eq!(book.leaf_count(), 4);
    }

    #[test]
    fn test_from_dataset_degrades_to_two_covers() {
        for raw in [None, Some(""), Some("{not json"), Some(r#"{"a":1}"#)] {
            let book = Book::from_dataset("x", raw, "f", "b");
            assert!(book.pages.is_empty());
            assert_eq!(book.materialize().len(), 2);
        }
    }
}
