use crate::config::PenConfig;

/// A client rectangle, as the browser reports it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CaretRect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

/// Pen image width for the current viewport.
pub fn pen_width(pen: &PenConfig, viewport_width: f64, mobile_breakpoint: u32) -> u32 {
    if viewport_width < f64::from(mobile_breakpoint) {
        pen.mobile_width
    } else {
        pen.width
    }
}

/// Pen tip position relative to the paper, so the nib rests just right of
/// the caret and the pen body rises above the line.
pub fn pen_position(caret: CaretRect, paper: CaretRect, pen_height: f64, pen: &PenConfig) -> (f64, f64) {
    let x = caret.right - paper.left + pen.offset_x;
    let y = caret.top - paper.top - pen_height + pen.offset_y;
    (x, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_switches_at_breakpoint() {
        let pen = PenConfig::default();
        assert_eq!(pen_width(&pen, 767.0, 768), 70);
        assert_eq!(pen_width(&pen, 768.0, 768), 100);
    }

    #[test]
    fn test_position_tracks_caret() {
        let pen = PenConfig::default();
        let paper = CaretRect {
            left: 100.0,
            top: 200.0,
            right: 700.0,
            bottom: 900.0,
        };
        let caret = CaretRect {
            left: 240.0,
            top: 300.0,
            right: 250.0,
            bottom: 320.0,
        };
        assert_eq!(pen_position(caret, paper, 100.0, &pen), (145.0, -50.0));
    }
}
