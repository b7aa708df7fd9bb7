//! Popup overlay listing the current key bindings.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget},
};

use crate::config::{Action, AppConfig};

/// Read-only help popup: one row per action with its bindings.
pub struct HelpPopup<'a> {
    pub config: &'a AppConfig,
}

impl<'a> Widget for HelpPopup<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // actions + 2 blanks + 1 hint + 2 border
        let height = (Action::ALL.len() as u16) + 5;
        let popup = centered_fixed(48, height, area);
        Clear.render(popup, buf);

        let block = Block::default()
            .title(" Controls ")
            .title_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray));

        let inner = block.inner(popup);
        block.render(popup, buf);

        let mut lines = vec![Line::raw("")];
        for &action in Action::ALL {
            // Fixed-width columns: label left-aligned, keys right-aligned.
            let label_col = format!("   {:<20}", action.label());
            let keys_width = (inner.width as usize).saturating_sub(label_col.len() + 1).max(1);
            let keys_col = format!("{:>keys_width$}", self.config.display_bindings(action));
            lines.push(Line::from(vec![
                Span::styled(label_col, Style::default().fg(Color::White)),
                Span::styled(keys_col, Style::default().fg(Color::Yellow)),
            ]));
        }
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(
            "  Any key: close",
            Style::default().fg(Color::DarkGray),
        )));

        Paragraph::new(lines).render(inner, buf);
    }
}

/// Create a centered rectangle with fixed dimensions, clamped to the available area.
fn centered_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w)) / 2;
    let y = area.y + (area.height.saturating_sub(h)) / 2;
    Rect::new(x, y, w, h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_rect_is_clamped() {
        let area = Rect::new(0, 0, 30, 10);
        assert_eq!(centered_fixed(48, 15, area), Rect::new(0, 0, 30, 10));
        assert_eq!(centered_fixed(10, 4, area), Rect::new(10, 3, 10, 4));
    }

    #[test]
    fn lists_every_action() {
        let config = AppConfig::default();
        let area = Rect::new(0, 0, 60, 20);
        let mut buf = Buffer::empty(area);
        HelpPopup { config: &config }.render(area, &mut buf);

        let text: String = (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buf[(x, y)].symbol().to_string())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n");
        for action in Action::ALL {
            assert!(text.contains(action.label()), "missing {}", action.label());
        }
    }
}
