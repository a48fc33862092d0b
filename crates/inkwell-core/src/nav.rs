//! Site header navigation: the mobile menu and in-page anchor scrolling

/// Open/closed state of the mobile navigation menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NavMenu {
    open: bool,
}

impl NavMenu {
    pub fn is_open(self) -> bool {
        self.open
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    /// Returns whether the menu was open.
    pub fn close(&mut self) -> bool {
        std::mem::replace(&mut self.open, false)
    }

    /// Escape closes an open menu. Returns whether the key was used.
    pub fn handle_key(&mut self, key: &str) -> bool {
        key == "Escape" && self.close()
    }

    /// Page scrolling is locked while the menu covers the screen.
    pub fn body_overflow(self) -> &'static str {
        if self.open { "hidden" } else { "" }
    }
}

/// Element id an in-page link points at. A bare `#` has no target.
pub fn anchor_target(href: &str) -> Option<&str> {
    href.strip_prefix('#').filter(|id| !id.is_empty())
}

/// Document scroll position that puts a target just below the fixed header.
pub fn scroll_top(target_client_top: f64, page_y_offset: f64, header_height: f64) -> f64 {
    target_client_top + page_y_offset - header_height
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_toggle_locks_scroll() {
        let mut menu = NavMenu::default();
        assert_eq!(menu.body_overflow(), "");
        menu.toggle();
        assert!(menu.is_open());
        assert_eq!(menu.body_overflow(), "hidden");
        menu.toggle();
        assert!(!menu.is_open());
    }

    #[test]
    fn test_escape_only_closes_open_menu() {
        let mut menu = NavMenu::default();
        assert!(!menu.handle_key("Escape"));

        menu.toggle();
        assert!(!menu.handle_key("Enter"));
        assert!(menu.is_open());
        assert!(menu.handle_key("Escape"));
        assert!(!menu.is_open());
        assert!(!menu.close());
    }

    #[test]
    fn test_anchor_targets() {
        assert_eq!(anchor_target("#kontakt"), Some("kontakt"));
        assert_eq!(anchor_target("#"), None);
        assert_eq!(anchor_target("pages/eseji/"), None);
    }

    #[test]
    fn test_scroll_clears_header() {
        assert_eq!(scroll_top(300.0, 1200.0, 80.0), 1420.0);
    }
}
