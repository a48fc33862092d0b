//! Widget configuration
//!
//! Every value has a hard-coded fallback so the widgets work when the JSON
//! files under `config/` are missing or unreadable. Partial files are merged
//! field by field over the defaults.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::writer::WriterMode;

/// Size limits handed to the page-turn engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageBounds {
    pub min_width: u32,
    pub max_width: u32,
    pub min_height: u32,
    pub max_height: u32,
}

impl Default for PageBounds {
    fn default() -> Self {
        Self {
            min_width: 200,
            max_width: 600,
            min_height: 300,
            max_height: 900,
        }
    }
}

/// Book reader timing, sizing and interaction settings (`config/bookReader.json`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReaderConfig {
    /// Wait between revealing the surface and flipping to the first content page
    pub open_settle_ms: u32,
    /// Duration of a single page flip animation in the engine
    pub flip_duration_ms: u32,
    /// Wait after re-centering on the front cover before tearing down
    pub close_settle_ms: u32,
    /// Page width divided by page height
    pub aspect_ratio: f64,
    pub bounds: PageBounds,
    pub swipe_distance: u32,
    pub max_shadow_opacity: f64,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            open_settle_ms: 100,
            flip_duration_ms: 800,
            close_settle_ms: 500,
            aspect_ratio: 0.65,
            bounds: PageBounds::default(),
            swipe_distance: 30,
            max_shadow_opacity: 0.5,
        }
    }
}

impl ReaderConfig {
    /// Parse and validate a reader config, filling gaps with defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: ReaderConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.aspect_ratio.is_finite() || self.aspect_ratio <= 0.0 {
            return Err(ConfigError::invalid(
                "aspectRatio",
                format!("must be a positive number, got {}", self.aspect_ratio),
            ));
        }
        if self.bounds.min_width > self.bounds.max_width {
            return Err(ConfigError::invalid(
                "bounds.minWidth",
                format!(
                    "{} exceeds maxWidth {}",
                    self.bounds.min_width, self.bounds.max_width
                ),
            ));
        }
        if self.bounds.min_height > self.bounds.max_height {
            return Err(ConfigError::invalid(
                "bounds.minHeight",
                format!(
                    "{} exceeds maxHeight {}",
                    self.bounds.min_height, self.bounds.max_height
                ),
            ));
        }
        if !(0.0..=1.0).contains(&self.max_shadow_opacity) {
            return Err(ConfigError::invalid(
                "maxShadowOpacity",
                format!("must be within 0..=1, got {}", self.max_shadow_opacity),
            ));
        }
        Ok(())
    }

    pub fn open_settle(&self) -> Duration {
        Duration::from_millis(self.open_settle_ms.into())
    }

    pub fn flip_duration(&self) -> Duration {
        Duration::from_millis(self.flip_duration_ms.into())
    }

    pub fn close_settle(&self) -> Duration {
        Duration::from_millis(self.close_settle_ms.into())
    }
}

/// Responsive breakpoints shared by all widgets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Breakpoints {
    pub mobile: u32,
}

impl Default for Breakpoints {
    fn default() -> Self {
        Self { mobile: 768 }
    }
}

/// Site-wide settings (`config/site.json`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub breakpoints: Breakpoints,
}

impl SiteConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Speed and cursor settings for one writing mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypingConfig {
    /// Characters per second
    pub speed: f64,
    pub start_delay: u32,
    pub cursor_char: String,
}

impl TypingConfig {
    fn typewriter() -> Self {
        Self {
            speed: 50.0,
            start_delay: 500,
            cursor_char: "|".to_string(),
        }
    }

    fn handwriting() -> Self {
        Self {
            speed: 40.0,
            start_delay: 500,
            cursor_char: String::new(),
        }
    }
}

/// Quill pen appearance for handwriting mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PenConfig {
    pub width: u32,
    pub mobile_width: u32,
    pub offset_x: f64,
    pub offset_y: f64,
    /// Seconds per wobble cycle
    pub animation_duration: f64,
    pub rotation_min: f64,
    pub rotation_max: f64,
}

impl Default for PenConfig {
    fn default() -> Self {
        Self {
            width: 100,
            mobile_width: 70,
            offset_x: -5.0,
            offset_y: -50.0,
            animation_duration: 0.3,
            rotation_min: 27.0,
            rotation_max: 35.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollTrigger {
    pub threshold: f64,
}

impl Default for ScrollTrigger {
    fn default() -> Self {
        Self { threshold: 0.3 }
    }
}

/// Essay animation settings (`config/writerSimulator.json`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WriterConfig {
    pub enabled: bool,
    pub default_mode: WriterMode,
    #[serde(deserialize_with = "typing::typewriter")]
    pub typewriter: TypingConfig,
    #[serde(deserialize_with = "typing::handwriting")]
    pub handwriting: TypingConfig,
    pub pen: PenConfig,
    pub scroll_trigger: ScrollTrigger,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            default_mode: WriterMode::Typewriter,
            typewriter: TypingConfig::typewriter(),
            handwriting: TypingConfig::handwriting(),
            pen: PenConfig::default(),
            scroll_trigger: ScrollTrigger::default(),
        }
    }
}

impl WriterConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: WriterConfig = serde_json::from_str(json)?;
        for (field, typing) in [
            ("typewriter.speed", &config.typewriter),
            ("handwriting.speed", &config.handwriting),
        ] {
            if !typing.speed.is_finite() || typing.speed <= 0.0 {
                return Err(ConfigError::invalid(
                    field,
                    format!("must be a positive number, got {}", typing.speed),
                ));
            }
        }
        Ok(config)
    }

    pub fn typing(&self, mode: WriterMode) -> &TypingConfig {
        match mode {
            WriterMode::Typewriter => &self.typewriter,
            WriterMode::Handwriting => &self.handwriting,
        }
    }
}

/// The two typing modes share a struct but not their defaults, so partial
/// objects are merged over the mode-specific fallback.
mod typing {
    use serde::{Deserialize, Deserializer};

    use super::TypingConfig;

    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Partial {
        speed: Option<f64>,
        start_delay: Option<u32>,
        cursor_char: Option<String>,
    }

    fn merge(partial: Partial, base: TypingConfig) -> TypingConfig {
        TypingConfig {
            speed: partial.speed.unwrap_or(base.speed),
            start_delay: partial.start_delay.unwrap_or(base.start_delay),
            cursor_char: partial.cursor_char.unwrap_or(base.cursor_char),
        }
    }

    pub fn typewriter<'de, D: Deserializer<'de>>(d: D) -> Result<TypingConfig, D::Error> {
        Ok(merge(Partial::deserialize(d)?, TypingConfig::typewriter()))
    }

    pub fn handwriting<'de, D: Deserializer<'de>>(d: D) -> Result<TypingConfig, D::Error> {
        Ok(merge(Partial::deserialize(d)?, TypingConfig::handwriting()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reader_defaults_from_empty_object() {
        let config = ReaderConfig::from_json("{}").unwrap();
        assert_eq!(config, ReaderConfig::default());
        assert_eq!(config.flip_duration(), Duration::from_millis(800));
    }

    #[test]
    fn test_reader_partial_override() {
        let config =
            ReaderConfig::from_json(r#"{"flipDurationMs": 600, "bounds": {"maxWidth": 700}}"#)
                .unwrap();
        assert_eq!(config.flip_duration_ms, 600);
        assert_eq!(config.bounds.max_width, 700);
        assert_eq!(config.bounds.min_width, 200);
        assert_eq!(config.open_settle_ms, 100);
    }

    #[test]
    fn test_reader_rejects_bad_values() {
        assert!(ReaderConfig::from_json(r#"{"aspectRatio": 0}"#).is_err());
        assert!(ReaderConfig::from_json(r#"{"bounds": {"minHeight": 1000}}"#).is_err());
        assert!(ReaderConfig::from_json(r#"{"maxShadowOpacity": 2.0}"#).is_err());
        assert!(ReaderConfig::from_json("not json").is_err());
    }

    #[test]
    fn test_site_breakpoint_default() {
        assert_eq!(SiteConfig::from_json("{}").unwrap().breakpoints.mobile, 768);
        let site = SiteConfig::from_json(r#"{"breakpoints": {"mobile": 600}}"#).unwrap();
        assert_eq!(site.breakpoints.mobile, 600);
    }

    #[test]
    fn test_writer_nested_merge_keeps_mode_defaults() {
        let config = WriterConfig::from_json(
            r#"{"handwriting": {"speed": 20}, "pen": {"width": 120}, "defaultMode": "handwriting"}"#,
        )
        .unwrap();
        assert_eq!(config.handwriting.speed, 20.0);
        assert_eq!(config.handwriting.cursor_char, "");
        assert_eq!(config.handwriting.start_delay, 500);
        assert_eq!(config.typewriter.cursor_char, "|");
        assert_eq!(config.pen.width, 120);
        assert_eq!(config.pen.mobile_width, 70);
        assert_eq!(config.default_mode, WriterMode::Handwriting);
        assert!(config.enabled);
    }

    #[test]
    fn test_writer_disabled_and_bad_speed() {
        assert!(!WriterConfig::from_json(r#"{"enabled": false}"#).unwrap().enabled);
        assert!(WriterConfig::from_json(r#"{"typewriter": {"speed": 0}}"#).is_err());
    }
}
