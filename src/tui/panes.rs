//! Resizable two-pane split engine.
//!
//! Owns the left-pane percentage and a two-state drag machine. Candidate
//! ratios outside the open interval (30, 70) are rejected outright, not
//! clamped, so neither pane can collapse below a usable width.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub const MIN_RATIO: f32 = 30.0;
pub const MAX_RATIO: f32 = 70.0;
const DEFAULT_RATIO: f32 = 45.0;

#[derive(Debug)]
pub struct PaneSplit {
    ratio: f32,
    dragging: bool,
}

impl PaneSplit {
    /// Initial ratio outside the legal interval falls back to the default.
    pub fn new(initial: f32) -> Self {
        let ratio = if initial > MIN_RATIO && initial < MAX_RATIO {
            initial
        } else {
            DEFAULT_RATIO
        };
        Self {
            ratio,
            dragging: false,
        }
    }

    pub fn ratio(&self) -> f32 {
        self.ratio
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn begin_drag(&mut self) {
        self.dragging = true;
    }

    pub fn end_drag(&mut self) {
        self.dragging = false;
    }

    /// Apply one pointer position. No-op unless a drag is active or when
    /// the container has no width yet (not laid out); out-of-interval
    /// candidates leave the ratio unchanged.
    pub fn update_drag(&mut self, column: u16, container_width: u16) {
        if !self.dragging || container_width == 0 {
            return;
        }
        let candidate = column as f32 / container_width as f32 * 100.0;
        if candidate > MIN_RATIO && candidate < MAX_RATIO {
            self.ratio = candidate;
        }
    }

    /// Split `area` into left pane, one-column divider, right pane.
    pub fn split(&self, area: Rect) -> (Rect, Rect, Rect) {
        let left_width = (area.width as f32 * self.ratio / 100.0).round() as u16;
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(left_width),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(area);
        (chunks[0], chunks[1], chunks[2])
    }

    /// Whether a pointer column lands on the divider within `area`.
    pub fn hits_divider(&self, column: u16, area: Rect) -> bool {
        let (_, divider, _) = self.split(area);
        column >= divider.x && column < divider.x.saturating_add(divider.width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_range_drag_moves_the_ratio() {
        let mut split = PaneSplit::new(45.0);
        split.begin_drag();
        split.update_drag(60, 100);
        assert_eq!(split.ratio(), 60.0);
    }

    #[test]
    fn out_of_range_candidate_is_rejected_not_clamped() {
        let mut split = PaneSplit::new(45.0);
        split.begin_drag();
        split.update_drag(25, 100);
        assert_eq!(split.ratio(), 45.0);
        split.update_drag(85, 100);
        assert_eq!(split.ratio(), 45.0);
    }

    #[test]
    fn interval_bounds_are_exclusive() {
        let mut split = PaneSplit::new(45.0);
        split.begin_drag();
        split.update_drag(30, 100);
        assert_eq!(split.ratio(), 45.0);
        split.update_drag(70, 100);
        assert_eq!(split.ratio(), 45.0);
        split.update_drag(31, 100);
        assert_eq!(split.ratio(), 31.0);
    }

    #[test]
    fn update_is_noop_when_idle() {
        let mut split = PaneSplit::new(45.0);
        split.update_drag(60, 100);
        assert_eq!(split.ratio(), 45.0);

        split.begin_drag();
        split.end_drag();
        split.update_drag(60, 100);
        assert_eq!(split.ratio(), 45.0);
    }

    #[test]
    fn zero_width_container_is_a_silent_noop() {
        let mut split = PaneSplit::new(45.0);
        split.begin_drag();
        split.update_drag(60, 0);
        assert_eq!(split.ratio(), 45.0);
    }

    #[test]
    fn drag_sequence_is_deterministic() {
        let mut split = PaneSplit::new(45.0);
        split.begin_drag();
        let mut seen = Vec::new();
        for column in [40, 20, 55, 95, 69] {
            split.update_drag(column, 100);
            seen.push(split.ratio());
        }
        assert_eq!(seen, vec![40.0, 40.0, 55.0, 55.0, 69.0]);
    }

    #[test]
    fn out_of_interval_initial_falls_back_to_default() {
        assert_eq!(PaneSplit::new(10.0).ratio(), 45.0);
        assert_eq!(PaneSplit::new(70.0).ratio(), 45.0);
        assert_eq!(PaneSplit::new(55.0).ratio(), 55.0);
    }

    #[test]
    fn split_produces_adjacent_panes_with_divider() {
        let split = PaneSplit::new(50.0);
        let area = Rect::new(0, 0, 100, 40);
        let (left, divider, right) = split.split(area);
        assert_eq!(left.width, 50);
        assert_eq!(divider.width, 1);
        assert_eq!(left.width + divider.width + right.width, area.width);
        assert!(split.hits_divider(divider.x, area));
        assert!(!split.hits_divider(divider.x + 1, area));
    }
}
