//! The controller's view of its mount root

use super::geometry::{Bounds, Orientation};

/// DOM-side operations the controller performs on its own subtree.
///
/// Implementations render the controller's state; they never decide it.
pub trait ReaderSurface {
    /// Space currently available to the flip surface.
    fn bounds(&self) -> Bounds;

    fn orientation(&self) -> Orientation;

    /// Make sure the flip-surface mount point exists. Returns `false` when it
    /// was missing and had to be recreated.
    fn ensure_mount_point(&mut self) -> bool;

    /// Hide the closed cover and show the flip surface and controls.
    fn reveal(&mut self);

    /// Shift the flip surface horizontally, in pixels.
    fn set_offset(&mut self, offset: f64);

    /// Remove every node the engine or the page sequence injected.
    fn clear_engine_artifacts(&mut self);

    /// Hide the flip surface and controls and show the closed cover again.
    fn restore_cover(&mut self);

    fn attach_keys(&mut self);

    fn detach_keys(&mut self);
}

/// Keys the reader reacts to while open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderKey {
    Escape,
    ArrowLeft,
    ArrowRight,
}

impl ReaderKey {
    /// Map a `KeyboardEvent.key` value.
    pub fn from_key_name(name: &str) -> Option<Self> {
        match name {
            "Escape" => Some(ReaderKey::Escape),
            "ArrowLeft" => Some(ReaderKey::ArrowLeft),
            "ArrowRight" => Some(ReaderKey::ArrowRight),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_names() {
        assert_eq!(ReaderKey::from_key_name("Escape"), Some(ReaderKey::Escape));
        assert_eq!(ReaderKey::from_key_name("ArrowLeft"), Some(ReaderKey::ArrowLeft));
        assert_eq!(ReaderKey::from_key_name("ArrowRight"), Some(ReaderKey::ArrowRight));
        assert_eq!(ReaderKey::from_key_name("ArrowUp"), None);
        assert_eq!(ReaderKey::from_key_name("escape"), None);
    }
}
