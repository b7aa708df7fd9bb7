//! Screen regions for the viewer.

use ratatui::layout::{Constraint, Layout, Rect};

/// The metadata table on top, one status line underneath.
pub struct AppLayout {
    pub table_area: Rect,
    pub status_area: Rect,
}

impl AppLayout {
    pub fn from_area(area: Rect) -> Self {
        let [table_area, status_area] =
            Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(area);
        Self {
            table_area,
            status_area,
        }
    }
}
