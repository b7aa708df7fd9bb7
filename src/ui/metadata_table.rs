//! Custom Ratatui widget that renders a formatted [`Table`] as two columns:
//! row titles on the left, values (text, pre-rendered nodes, indented lists)
//! on the right.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, StatefulWidget, Widget},
};

use crate::core::format::{Rendered, RenderedItem, RenderedList, Table};

use super::theme::Theme;

/// Gap between the title column and the value column.
const COLUMN_GAP: u16 = 1;

// ───────────────────────────────────────── state ─────────────

/// Persistent state for the table widget (vertical scroll).
#[derive(Debug, Default)]
pub struct MetadataTableState {
    /// First visible line.
    pub offset: usize,
}

impl MetadataTableState {
    pub fn scroll_down(&mut self, by: usize, max_offset: usize) {
        self.offset = self.offset.saturating_add(by).min(max_offset);
    }

    pub fn scroll_up(&mut self, by: usize) {
        self.offset = self.offset.saturating_sub(by);
    }

    /// Keep the offset inside the content given a viewport of `height` lines.
    pub fn clamp_scroll(&mut self, total: usize, height: usize) {
        self.offset = self.offset.min(max_offset(total, height));
    }
}

/// Largest useful scroll offset.
pub fn max_offset(total: usize, height: usize) -> usize {
    total.saturating_sub(height)
}

// ───────────────────────────────────────── line model ────────

/// One laid-out line of the table.  `title` is set on the first line of
/// each row only.
#[derive(Debug, Clone, PartialEq)]
pub struct TableLine {
    pub title: Option<String>,
    pub content: Line<'static>,
}

/// Lay out a formatted value as lines for the value column.
///
/// Node lines take on the style and alignment of their [`Text`](ratatui::text::Text);
/// a line's own settings win over the text's.
pub fn value_lines(value: &Rendered) -> Vec<Line<'static>> {
    match value {
        Rendered::Node(text) => text
            .lines
            .iter()
            .map(|line| {
                let mut line = line.clone();
                line.style = text.style.patch(line.style);
                line.alignment = line.alignment.or(text.alignment);
                line
            })
            .collect(),
        Rendered::Text(s) => {
            let mut lines: Vec<Line<'static>> = s
                .lines()
                .map(|part| Line::from(Span::styled(part.to_string(), Theme::value_style())))
                .collect();
            if lines.is_empty() {
                lines.push(Line::from(Span::styled("", Theme::value_style())));
            }
            lines
        }
        Rendered::List(list) => list_lines(list),
    }
}

fn list_lines(list: &RenderedList) -> Vec<Line<'static>> {
    let indent = usize::from(list.style.margin + list.style.padding_left);
    let mut lines = Vec::new();
    for item in &list.items {
        for mut line in item_lines(item) {
            if indent > 0 {
                line.spans.insert(0, Span::raw(" ".repeat(indent)));
            }
            lines.push(line);
        }
    }
    lines
}

fn item_lines(item: &RenderedItem) -> Vec<Line<'static>> {
    let mut value = value_lines(&item.value);
    let Some(label) = &item.label else {
        return value;
    };
    let label = Span::styled(label.clone(), Theme::entry_label_style());

    // A one-line value sits beside its label; anything taller goes below it.
    if value.len() == 1 && !matches!(item.value, Rendered::List(_)) {
        let mut line = value.remove(0);
        line.spans.insert(0, label);
        return vec![line];
    }
    let mut lines = vec![Line::from(label)];
    lines.extend(value);
    lines
}

// ───────────────────────────────────────── widget ────────────

/// The table widget itself — created fresh each frame.
pub struct MetadataTableWidget<'a> {
    table: &'a Table,
    block: Option<Block<'a>>,
}

impl<'a> MetadataTableWidget<'a> {
    pub fn new(table: &'a Table) -> Self {
        Self { table, block: None }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    /// Build the flat list of lines.  Non-dense tables get a blank spacer
    /// between rows.
    pub fn build_lines(&self) -> Vec<TableLine> {
        let mut lines = Vec::new();
        for (i, row) in self.table.rows.iter().enumerate() {
            if i > 0 && !self.table.dense {
                lines.push(TableLine {
                    title: None,
                    content: Line::default(),
                });
            }
            let mut content = value_lines(&row.value);
            if content.is_empty() {
                content.push(Line::default());
            }
            for (j, line) in content.into_iter().enumerate() {
                lines.push(TableLine {
                    title: (j == 0).then(|| row.title.clone()),
                    content: line,
                });
            }
        }
        lines
    }

    /// Title column width: the widest title, capped at 40% of `width`.
    pub fn title_width(&self, width: u16) -> u16 {
        let widest = self
            .table
            .rows
            .iter()
            .map(|r| Span::raw(r.title.as_str()).width())
            .max()
            .unwrap_or(0);
        let cap = width.saturating_mul(2) / 5;
        u16::try_from(widest).unwrap_or(u16::MAX).min(cap)
    }
}

impl<'a> StatefulWidget for MetadataTableWidget<'a> {
    type State = MetadataTableState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let inner = if let Some(ref block) = self.block {
            let inner = block.inner(area);
            block.clone().render(area, buf);
            inner
        } else {
            area
        };
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let lines = self.build_lines();
        state.clamp_scroll(lines.len(), inner.height as usize);

        let title_w = self.title_width(inner.width);
        let value_x = inner.x + title_w + COLUMN_GAP;
        let value_w = inner.width.saturating_sub(title_w + COLUMN_GAP);

        let visible = lines
            .iter()
            .skip(state.offset)
            .take(inner.height as usize);

        for (i, line) in visible.enumerate() {
            let y = inner.y + i as u16;
            if let Some(ref title) = line.title {
                buf.set_stringn(
                    inner.x,
                    y,
                    title,
                    title_w as usize,
                    Theme::row_title_style(),
                );
            }
            if value_w > 0 {
                let width = u16::try_from(line.content.width()).unwrap_or(u16::MAX);
                let shift = match line.content.alignment {
                    Some(Alignment::Center) => value_w.saturating_sub(width) / 2,
                    Some(Alignment::Right) => value_w.saturating_sub(width),
                    _ => 0,
                };
                buf.set_line(value_x + shift, y, &line.content, value_w - shift);
            }
        }
    }
}

/// Draw `table` into an off-screen buffer `width` columns wide and return the
/// plain text, one line per row with trailing spaces trimmed.
pub fn render_to_string(table: &Table, width: u16) -> String {
    let widget = MetadataTableWidget::new(table);
    let total = widget.build_lines().len();
    if total == 0 || width == 0 {
        return String::new();
    }
    let height = u16::try_from(total).unwrap_or(u16::MAX);
    let area = Rect::new(0, 0, width, height);
    let mut buf = Buffer::empty(area);
    widget.render(area, &mut buf, &mut MetadataTableState::default());

    let mut out = String::new();
    for y in 0..height {
        let mut row = String::new();
        for x in 0..width {
            row.push_str(buf[(x, y)].symbol());
        }
        out.push_str(row.trim_end());
        out.push('\n');
    }
    out
}
