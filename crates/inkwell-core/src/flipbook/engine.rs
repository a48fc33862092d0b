//! Capability interface for the page-turn rendering engine
//!
//! The controller only ever talks to an engine through these traits, so the
//! browser build can plug in StPageFlip while tests use a recording double.

use std::rc::Rc;

use serde::Serialize;

use super::book::PageSpec;
use super::geometry::{Geometry, Orientation};
use crate::config::ReaderConfig;
use crate::error::EngineError;

/// Callback receiving the engine's current leaf index after every flip.
pub type PositionSink = Rc<dyn Fn(usize)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SizingMode {
    Fixed,
    Stretch,
}

/// Construction parameters, serialized with the key names StPageFlip expects.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineSettings {
    pub width: u32,
    pub height: u32,
    #[serde(rename = "size")]
    pub sizing_mode: SizingMode,
    pub min_width: u32,
    pub max_width: u32,
    pub min_height: u32,
    pub max_height: u32,
    pub show_cover: bool,
    pub mobile_scroll_support: bool,
    pub use_mouse_events: bool,
    pub swipe_distance: u32,
    pub click_event_forward: bool,
    pub use_portrait: bool,
    #[serde(rename = "startPage")]
    pub start_leaf: usize,
    pub draw_shadow: bool,
    #[serde(rename = "flippingTime")]
    pub flip_duration_ms: u32,
    #[serde(rename = "startZIndex")]
    pub start_z_index: i32,
    pub auto_size: bool,
    pub max_shadow_opacity: f64,
    pub show_page_corners: bool,
}

impl EngineSettings {
    pub fn new(geometry: Geometry, orientation: Orientation, config: &ReaderConfig) -> Self {
        Self {
            width: geometry.width,
            height: geometry.height,
            sizing_mode: SizingMode::Stretch,
            min_width: config.bounds.min_width,
            max_width: config.bounds.max_width,
            min_height: config.bounds.min_height,
            max_height: config.bounds.max_height,
            show_cover: true,
            mobile_scroll_support: false,
            use_mouse_events: true,
            swipe_distance: config.swipe_distance,
            click_event_forward: true,
            use_portrait: orientation.is_portrait(),
            start_leaf: 0,
            draw_shadow: true,
            flip_duration_ms: config.flip_duration_ms,
            start_z_index: 0,
            auto_size: true,
            max_shadow_opacity: config.max_shadow_opacity,
            show_page_corners: true,
        }
    }
}

/// A live engine instance, owned by exactly one controller while open.
pub trait PageTurnEngine {
    fn load_pages(&mut self, pages: &[PageSpec]) -> Result<(), EngineError>;

    /// Register the position-change callback. Replaces any previous one.
    fn subscribe(&mut self, sink: PositionSink);

    fn advance(&mut self);

    fn retreat(&mut self);

    fn go_to_leaf(&mut self, index: usize);

    fn leaf_count(&self) -> usize;

    fn destroy(&mut self) -> Result<(), EngineError>;
}

/// Builds engine instances on demand; the controller creates a fresh one per open.
pub trait EngineFactory {
    type Engine: PageTurnEngine;

    fn create(&mut self, settings: &EngineSettings) -> Result<Self::Engine, EngineError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_follow_orientation_and_config() {
        let config = ReaderConfig::default();
        let geometry = Geometry { width: 500, height: 769 };
        let landscape = EngineSettings::new(geometry, Orientation::Landscape, &config);
        assert!(!landscape.use_portrait);
        assert_eq!(landscape.flip_duration_ms, 800);
        assert_eq!(landscape.swipe_distance, 30);

        let portrait = EngineSettings::new(geometry, Orientation::Portrait, &config);
        assert!(portrait.use_portrait);
    }

    #[test]
    fn test_settings_serialize_with_engine_key_names() {
        let settings = EngineSettings::new(
            Geometry { width: 400, height: 600 },
            Orientation::Landscape,
            &ReaderConfig::default(),
        );
        let json = serde_json::to_value(&settings).unwrap();
        assert_eq!(json["size"], "stretch");
        assert_eq!(json["startPage"], 0);
        assert_eq!(json["flippingTime"], 800);
        assert_eq!(json["startZIndex"], 0);
        assert_eq!(json["showCover"], true);
        assert_eq!(json["usePortrait"], false);
        assert_eq!(json["maxShadowOpacity"], 0.5);
    }
}
