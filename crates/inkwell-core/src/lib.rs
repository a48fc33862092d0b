//! Inkwell Core - State machines and calculations behind the site widgets
//!
//! The browser front-end and the CLI are thin hosts over this crate: the book
//! reader, theme switch and essay writer all run here without a DOM.

pub mod config;
pub mod error;
pub mod flipbook;
pub mod nav;
pub mod schedule;
pub mod theme;
pub mod writer;

pub use config::{ReaderConfig, SiteConfig, WriterConfig};
pub use error::{ConfigError, EngineError};
pub use flipbook::{Book, FlipbookController, ViewState};
pub use nav::NavMenu;
pub use schedule::{ManualScheduler, Scheduler};
pub use theme::{Theme, ThemeSwitch};
pub use writer::{WriterMode, WriterQueue, WriterSimulator};
