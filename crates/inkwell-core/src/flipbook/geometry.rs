//! Page sizing and viewport centering
//!
//! Both are pure functions of the current container bounds; nothing here is
//! cached, so callers re-derive geometry on every open and every re-center.

use serde::{Deserialize, Serialize};

use super::ViewState;

/// Two-page spread or single-page view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Landscape,
    Portrait,
}

impl Orientation {
    /// Landscape needs a viewport wider than tall and at least as wide as the
    /// mobile breakpoint.
    pub fn detect(viewport_width: f64, viewport_height: f64, mobile_breakpoint: u32) -> Self {
        if viewport_width > viewport_height && viewport_width >= f64::from(mobile_breakpoint) {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        }
    }

    pub fn is_portrait(self) -> bool {
        self == Orientation::Portrait
    }
}

/// Space available to the flip surface, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Size of a single page, in whole pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Geometry {
    pub width: u32,
    pub height: u32,
}

impl Geometry {
    /// Fit one page (portrait) or half the container (landscape) at the given
    /// width/height ratio, clamping to the container height.
    pub fn compute(bounds: Bounds, aspect_ratio: f64, orientation: Orientation) -> Self {
        let available_width = match orientation {
            Orientation::Landscape => bounds.width / 2.0,
            Orientation::Portrait => bounds.width,
        }
        .max(0.0);
        let available_height = bounds.height.max(0.0);

        let mut width = available_width;
        let mut height = width / aspect_ratio;
        if height > available_height {
            height = available_height;
            width = height * aspect_ratio;
        }

        Self {
            width: width.round() as u32,
            height: height.round() as u32,
        }
    }
}

/// Horizontal shift applied to the flip surface so the visible pages sit in
/// the middle of the stage.
pub fn centering_offset(view: ViewState, geometry: Geometry, orientation: Orientation) -> f64 {
    if orientation.is_portrait() {
        return 0.0;
    }
    let half_page = f64::from(geometry.width) / 2.0;
    match view {
        ViewState::FrontCover => -half_page,
        ViewState::BackCover => half_page,
        ViewState::Spread | ViewState::Closed => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_landscape_without_clamp() {
        let g = Geometry::compute(Bounds::new(1000.0, 800.0), 0.65, Orientation::Landscape);
        assert_eq!(g, Geometry { width: 500, height: 769 });
    }

    #[test]
    fn test_landscape_clamped_by_height() {
        let g = Geometry::compute(Bounds::new(1600.0, 500.0), 0.65, Orientation::Landscape);
        assert_eq!(g.height, 500);
        assert_eq!(g.width, 325);
    }

    #[test]
    fn test_portrait_uses_full_width() {
        let g = Geometry::compute(Bounds::new(390.0, 800.0), 0.65, Orientation::Portrait);
        assert_eq!(g, Geometry { width: 390, height: 600 });
    }

    #[test]
    fn test_detect_orientation() {
        assert_eq!(Orientation::detect(1280.0, 720.0, 768), Orientation::Landscape);
        assert_eq!(Orientation::detect(720.0, 1280.0, 768), Orientation::Portrait);
        // Wide but below the breakpoint (small phone held sideways)
        assert_eq!(Orientation::detect(700.0, 360.0, 768), Orientation::Portrait);
    }

    #[test]
    fn test_portrait_never_offsets() {
        let g = Geometry { width: 400, height: 615 };
        for view in [ViewState::FrontCover, ViewState::Spread, ViewState::BackCover] {
            assert_eq!(centering_offset(view, g, Orientation::Portrait), 0.0);
        }
    }

    proptest! {
        #[test]
        fn prop_covers_mirror_and_spread_is_centered(
            width in 1.0f64..4000.0,
            height in 1.0f64..4000.0,
            ratio in 0.2f64..2.0,
        ) {
            let g = Geometry::compute(Bounds::new(width, height), ratio, Orientation::Landscape);
            let front = centering_offset(ViewState::FrontCover, g, Orientation::Landscape);
            let back = centering_offset(ViewState::BackCover, g, Orientation::Landscape);
            prop_assert_eq!(front, -back);
            prop_assert!(front <= 0.0);
            prop_assert_eq!(centering_offset(ViewState::Spread, g, Orientation::Landscape), 0.0);
        }

        #[test]
        fn prop_geometry_fits_container(
            width in 1.0f64..4000.0,
            height in 1.0f64..4000.0,
            ratio in 0.2f64..2.0,
            landscape in any::<bool>(),
        ) {
            let orientation = if landscape { Orientation::Landscape } else { Orientation::Portrait };
            let g = Geometry::compute(Bounds::new(width, height), ratio, orientation);
            let max_width = if landscape { width / 2.0 } else { width };
            // Rounding may add at most half a pixel.
            prop_assert!(f64::from(g.width) <= max_width + 0.5);
            prop_assert!(f64::from(g.height) <= height + 0.5);
        }
    }
}
