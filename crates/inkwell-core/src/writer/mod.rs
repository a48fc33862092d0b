//! Typing-effect state for essay entries
//!
//! Each essay on the page gets a [`WriterSimulator`]. The host renders
//! whatever [`TypingPlan`] it hands out with a typing library and reports
//! back when typing ends or the reader skips it. [`WriterQueue`] makes sure
//! only one entry types at a time.

pub mod markdown;
mod pen;
mod queue;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::WriterConfig;

pub use pen::{pen_position, pen_width, CaretRect};
pub use queue::{is_in_viewport, QueueTask, WriterQueue, NEXT_ENTRY_DELAY};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriterMode {
    #[default]
    Typewriter,
    Handwriting,
}

impl WriterMode {
    pub fn as_str(self) -> &'static str {
        match self {
            WriterMode::Typewriter => "typewriter",
            WriterMode::Handwriting => "handwriting",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "typewriter" => Some(WriterMode::Typewriter),
            "handwriting" => Some(WriterMode::Handwriting),
            _ => None,
        }
    }
}

/// Every class [`WriterSimulator::status_classes`] can return.
pub const STATUS_CLASSES: [&str; 5] = [
    "waiting-to-animate",
    "is-animating",
    "handwriting-mode",
    "has-animated",
    "cursive-text",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriterPhase {
    Waiting,
    Animating,
    Done,
}

/// What the host needs to run one typing animation.
#[derive(Debug, Clone, PartialEq)]
pub struct TypingPlan {
    pub mode: WriterMode,
    /// Inline HTML to type out
    pub html: String,
    pub char_delay_ms: u32,
    pub start_delay_ms: u32,
    /// `None` hides the cursor
    pub cursor: Option<String>,
    pub show_pen: bool,
}

/// The settled state once typing is over.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    /// Block HTML replacing the typed text
    pub html: String,
    /// Switch the entry to the cursive reading font
    pub cursive: bool,
}

#[derive(Debug, Clone)]
pub struct WriterSimulator {
    text: String,
    mode: WriterMode,
    mode_locked: bool,
    phase: WriterPhase,
}

impl WriterSimulator {
    /// `preset` is the entry's `data-mode`; a recognised value pins the mode.
    pub fn new(text: impl Into<String>, preset: Option<&str>, config: &WriterConfig) -> Self {
        let preset = preset.and_then(WriterMode::parse);
        Self {
            text: text.into(),
            mode: preset.unwrap_or(config.default_mode),
            mode_locked: preset.is_some(),
            phase: WriterPhase::Waiting,
        }
    }

    pub fn mode(&self) -> WriterMode {
        self.mode
    }

    pub fn phase(&self) -> WriterPhase {
        self.phase
    }

    pub fn is_mode_locked(&self) -> bool {
        self.mode_locked
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Change the mode before typing starts. Returns whether it changed.
    pub fn select_mode(&mut self, mode: WriterMode) -> bool {
        if self.mode_locked || self.phase != WriterPhase::Waiting || self.mode == mode {
            return false;
        }
        self.mode = mode;
        true
    }

    pub fn start(&mut self, config: &WriterConfig) -> Option<TypingPlan> {
        if self.phase != WriterPhase::Waiting {
            return None;
        }
        self.phase = WriterPhase::Animating;

        let typing = config.typing(self.mode);
        let cursor = match self.mode {
            WriterMode::Typewriter if !typing.cursor_char.is_empty() => {
                Some(typing.cursor_char.clone())
            }
            _ => None,
        };
        let plan = TypingPlan {
            mode: self.mode,
            html: markdown::render_inline(&self.text),
            char_delay_ms: (1000.0 / typing.speed).round() as u32,
            start_delay_ms: typing.start_delay,
            cursor,
            show_pen: self.mode == WriterMode::Handwriting,
        };
        debug!(mode = self.mode.as_str(), chars = self.text.len(), "Typing started");
        Some(plan)
    }

    /// Typing ran to the end.
    pub fn complete(&mut self) -> Option<Completion> {
        if self.phase != WriterPhase::Animating {
            return None;
        }
        Some(self.settle())
    }

    /// The reader asked for the full text. Works before or during typing.
    pub fn skip(&mut self) -> Option<Completion> {
        if self.phase == WriterPhase::Done {
            return None;
        }
        debug!(mode = self.mode.as_str(), "Typing skipped");
        Some(self.settle())
    }

    fn settle(&mut self) -> Completion {
        self.phase = WriterPhase::Done;
        Completion {
            html: markdown::render_blocks(&self.text),
            cursive: self.mode == WriterMode::Handwriting,
        }
    }

    /// Classes the entry element should carry right now.
    pub fn status_classes(&self) -> Vec<&'static str> {
        let handwriting = self.mode == WriterMode::Handwriting;
        match self.phase {
            WriterPhase::Waiting => vec!["waiting-to-animate"],
            WriterPhase::Animating if handwriting => vec!["is-animating", "handwriting-mode"],
            WriterPhase::Animating => vec!["is-animating"],
            WriterPhase::Done if handwriting => vec!["has-animated", "cursive-text"],
            WriterPhase::Done => vec!["has-animated"],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_locks_mode() {
        let config = WriterConfig::default();
        let mut sim = WriterSimulator::new("text", Some("handwriting"), &config);
        assert_eq!(sim.mode(), WriterMode::Handwriting);
        assert!(sim.is_mode_locked());
        assert!(!sim.select_mode(WriterMode::Typewriter));

        let mut free = WriterSimulator::new("text", Some("crayon"), &config);
        assert_eq!(free.mode(), WriterMode::Typewriter);
        assert!(free.select_mode(WriterMode::Handwriting));
        assert!(!free.select_mode(WriterMode::Handwriting));
    }

    #[test]
    fn test_typewriter_plan() {
        let config = WriterConfig::default();
        let mut sim = WriterSimulator::new("Hello **world**\nbye", None, &config);
        let plan = sim.start(&config).unwrap();
        assert_eq!(plan.html, "Hello <strong>world</strong><br>bye");
        assert_eq!(plan.char_delay_ms, 20);
        assert_eq!(plan.start_delay_ms, 500);
        assert_eq!(plan.cursor.as_deref(), Some("|"));
        assert!(!plan.show_pen);
        assert_eq!(sim.phase(), WriterPhase::Animating);
        assert!(sim.start(&config).is_none());
    }

    #[test]
    fn test_handwriting_plan_and_completion() {
        let config = WriterConfig::default();
        let mut sim = WriterSimulator::new("a\n\nb", Some("handwriting"), &config);
        let plan = sim.start(&config).unwrap();
        assert_eq!(plan.char_delay_ms, 25);
        assert_eq!(plan.cursor, None);
        assert!(plan.show_pen);
        assert_eq!(sim.status_classes(), vec!["is-animating", "handwriting-mode"]);

        let done = sim.complete().unwrap();
        assert_eq!(done.html, "<p>a</p><p>b</p>");
        assert!(done.cursive);
        assert_eq!(sim.status_classes(), vec!["has-animated", "cursive-text"]);
        assert!(sim.complete().is_none());
        assert!(sim.skip().is_none());
    }

    #[test]
    fn test_mode_frozen_once_typing_starts() {
        let config = WriterConfig::default();
        let mut sim = WriterSimulator::new("x", None, &config);
        sim.start(&config);
        assert!(!sim.select_mode(WriterMode::Handwriting));
    }

    #[test]
    fn test_status_classes_are_all_listed() {
        let config = WriterConfig::default();
        let mut sim = WriterSimulator::new("x", Some("handwriting"), &config);
        let mut seen = sim.status_classes();
        sim.start(&config);
        seen.extend(sim.status_classes());
        sim.complete();
        seen.extend(sim.status_classes());
        for class in seen {
            assert!(STATUS_CLASSES.contains(&class), "{class} missing");
        }
    }

    #[test]
    fn test_skip_before_start() {
        let config = WriterConfig::default();
        let mut sim = WriterSimulator::new("x", None, &config);
        assert_eq!(sim.status_classes(), vec!["waiting-to-animate"]);
        let done = sim.skip().unwrap();
        assert!(!done.cursive);
        assert_eq!(sim.phase(), WriterPhase::Done);
        assert!(sim.start(&config).is_none());
    }
}
