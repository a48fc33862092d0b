//! Shelf and essay listings served as `content/library.json`

use inkwell_core::WriterMode;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Library {
    pub books: Vec<BookEntry>,
    pub essays: Vec<EssayEntryData>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookEntry {
    pub id: String,
    pub title: String,
    pub front: String,
    pub back: String,
    #[serde(default)]
    pub pages: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EssayEntryData {
    pub slug: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub author: Option<String>,
    /// Pins the writer mode and hides the mode toggle
    #[serde(default)]
    pub mode: Option<WriterMode>,
}
