//! Structured metadata formatting — turn a [`Metadata`] tree into a table of
//! rows whose values are text, pre-rendered nodes, or (nested) lists.
//!
//! The walk is a pure depth-first recursion.  Nesting is tracked only to pick
//! a [`ListStyle`]; it never bounds the recursion.
//!
//! Style rules:
//! * a sequence list uses [`ListStyle::NESTED`] when its caller says it is
//!   nested, otherwise [`ListStyle::FLAT`];
//! * a mapping list is always indented, and the values inside a mapping
//!   are always formatted as nested;
//! * a sequence passes its own flag through to its elements unchanged, so a
//!   top-level list of scalars stays flat while mappings inside it still
//!   indent through the mapping branch.

use ratatui::text::Text;

use super::title::{start_case, TitleFormat};
use super::value::{Mapping, Metadata, Value};

// ───────────────────────────────────────── options ───────────

/// Caller-supplied formatting configuration.
#[derive(Debug, Clone, Default)]
pub struct FormattingOptions {
    /// Key → title transform.  `None` means [`start_case`].
    pub title_format: Option<TitleFormat>,
}

impl FormattingOptions {
    pub fn with_title_format(f: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        Self {
            title_format: Some(TitleFormat::new(f)),
        }
    }

    /// Display title for a raw key.
    pub fn title(&self, key: &str) -> String {
        match &self.title_format {
            Some(f) => f.apply(key),
            None => start_case(key),
        }
    }
}

// ───────────────────────────────────────── output model ──────

/// List container styling.  Both presets suppress markers and margins;
/// they differ only in left padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListStyle {
    pub margin: u16,
    pub markers: bool,
    /// Columns of indentation applied to every entry.
    pub padding_left: u16,
}

impl ListStyle {
    pub const FLAT: ListStyle = ListStyle {
        margin: 0,
        markers: false,
        padding_left: 0,
    };

    pub const NESTED: ListStyle = ListStyle {
        padding_left: 2,
        ..ListStyle::FLAT
    };

    pub fn select(nested: bool) -> Self {
        if nested {
            Self::NESTED
        } else {
            Self::FLAT
        }
    }

    pub fn is_nested(&self) -> bool {
        self.padding_left > 0
    }
}

/// Formatted form of a single [`Value`].
#[derive(Debug, Clone, PartialEq)]
pub enum Rendered {
    /// Pre-rendered node, returned exactly as supplied.
    Node(Text<'static>),
    /// Scalar text.
    Text(String),
    List(RenderedList),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedList {
    pub style: ListStyle,
    pub items: Vec<RenderedItem>,
}

/// One list entry.  Mapping entries carry a `"<title>: "` label; sequence
/// entries do not.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedItem {
    pub label: Option<String>,
    pub value: Rendered,
}

/// The whole widget output: one row per top-level key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    /// Display density, passed through to the widget uninterpreted.
    pub dense: bool,
    pub rows: Vec<TableRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub title: String,
    pub value: Rendered,
}

// ───────────────────────────────────────── algorithm ─────────

/// Build the table for `metadata`: one row per key, in enumeration order.
pub fn render(metadata: &Metadata, dense: bool, options: &FormattingOptions) -> Table {
    let rows = metadata
        .iter()
        .map(|(key, value)| TableRow {
            title: options.title(key),
            value: render_value(value, options, false),
        })
        .collect();
    Table { dense, rows }
}

/// Dispatch on the value's shape.  Nodes are matched first so caller
/// content is never reinterpreted as data.
pub fn render_value(value: &Value, options: &FormattingOptions, nested: bool) -> Rendered {
    match value {
        Value::Node(text) => Rendered::Node(text.clone()),
        Value::Mapping(map) => Rendered::List(render_map(map, options, nested)),
        Value::Sequence(items) => Rendered::List(render_list(items, options, nested)),
        Value::Scalar(s) => Rendered::Text(s.to_string()),
    }
}

/// Format a mapping as `"<title>: <value>"` entries.
///
/// Entry values are always formatted as nested.  The mapping's own list is
/// indented regardless of `nested`: its entries sit under the title of the
/// row or entry that holds them.
pub fn render_map(map: &Mapping, options: &FormattingOptions, _nested: bool) -> RenderedList {
    let items = map
        .iter()
        .map(|(key, value)| RenderedItem {
            label: Some(format!("{}: ", options.title(key))),
            value: render_value(value, options, true),
        })
        .collect();
    RenderedList {
        style: ListStyle::NESTED,
        items,
    }
}

/// Format a sequence, one entry per element.  `nested` is passed through.
pub fn render_list(items: &[Value], options: &FormattingOptions, nested: bool) -> RenderedList {
    let items = items
        .iter()
        .map(|item| RenderedItem {
            label: None,
            value: render_value(item, options, nested),
        })
        .collect();
    RenderedList {
        style: ListStyle::select(nested),
        items,
    }
}

#[cfg(test)]
mod tests {
    use ratatui::style::{Color, Style};
    use ratatui::text::{Line, Span};

    use super::*;
    use crate::core::value::Scalar;

    fn sample() -> Metadata {
        Mapping::new()
            .with("name", "svc-a")
            .with("tags", vec!["x", "y"])
            .with("owner", Mapping::new().with("team", "core"))
    }

    fn text(s: &str) -> Rendered {
        Rendered::Text(s.to_string())
    }

    #[test]
    fn scalars_render_as_their_text_regardless_of_nesting() {
        let opts = FormattingOptions::default();
        let cases = [
            (Value::from("svc"), "svc"),
            (Value::from(7i64), "7"),
            (Value::from(false), "false"),
            (Value::from(0.5), "0.5"),
            (Value::Scalar(Scalar::Null), "null"),
        ];
        for (value, expected) in cases {
            assert_eq!(render_value(&value, &opts, false), text(expected));
            assert_eq!(render_value(&value, &opts, true), text(expected));
        }
    }

    #[test]
    fn end_to_end_service_metadata() {
        let table = render(&sample(), false, &FormattingOptions::default());
        assert_eq!(table.rows.len(), 3);

        assert_eq!(table.rows[0].title, "Name");
        assert_eq!(table.rows[0].value, text("svc-a"));

        assert_eq!(table.rows[1].title, "Tags");
        let Rendered::List(tags) = &table.rows[1].value else {
            panic!("tags should be a list");
        };
        assert_eq!(tags.style, ListStyle::FLAT);
        assert_eq!(
            tags.items,
            vec![
                RenderedItem { label: None, value: text("x") },
                RenderedItem { label: None, value: text("y") },
            ]
        );

        assert_eq!(table.rows[2].title, "Owner");
        let Rendered::List(owner) = &table.rows[2].value else {
            panic!("owner should be a list");
        };
        assert_eq!(owner.style, ListStyle::NESTED);
        assert_eq!(
            owner.items,
            vec![RenderedItem {
                label: Some("Team: ".into()),
                value: text("core"),
            }]
        );
    }

    #[test]
    fn empty_metadata_has_no_rows() {
        let table = render(&Metadata::new(), true, &FormattingOptions::default());
        assert!(table.rows.is_empty());
        assert!(table.dense);
    }

    #[test]
    fn title_format_overrides_start_case_everywhere() {
        let meta = Mapping::new().with("site", Mapping::new().with("region", "eu"));
        let opts = FormattingOptions::with_title_format(|k| k.to_uppercase());
        let table = render(&meta, false, &opts);
        assert_eq!(table.rows[0].title, "SITE");
        let Rendered::List(list) = &table.rows[0].value else {
            panic!("expected list");
        };
        assert_eq!(list.items[0].label.as_deref(), Some("REGION: "));
    }

    #[test]
    fn default_titles_use_start_case() {
        let meta = Mapping::new().with("fooBar", 1i64);
        let table = render(&meta, false, &FormattingOptions::default());
        assert_eq!(table.rows[0].title, "Foo Bar");
    }

    #[test]
    fn sequences_inside_mappings_are_nested() {
        let meta = Mapping::new().with("spec", Mapping::new().with("ports", vec![80i64, 443]));
        let table = render(&meta, false, &FormattingOptions::default());
        let Rendered::List(spec) = &table.rows[0].value else {
            panic!("expected list");
        };
        let Rendered::List(ports) = &spec.items[0].value else {
            panic!("expected list");
        };
        assert!(ports.style.is_nested());
        assert_eq!(ports.items.len(), 2);
    }

    #[test]
    fn mapping_inside_a_top_level_sequence() {
        let meta = Mapping::new().with(
            "tags",
            vec![Value::Mapping(Mapping::new().with("a", 1i64))],
        );
        let table = render(&meta, false, &FormattingOptions::default());
        let Rendered::List(tags) = &table.rows[0].value else {
            panic!("expected list");
        };
        assert_eq!(tags.style, ListStyle::FLAT);
        assert_eq!(tags.items[0].label, None);

        let Rendered::List(entry) = &tags.items[0].value else {
            panic!("expected list");
        };
        assert_eq!(entry.style, ListStyle::NESTED);
        assert_eq!(
            entry.items,
            vec![RenderedItem {
                label: Some("A: ".to_string()),
                value: text("1"),
            }]
        );
    }

    #[test]
    fn sequence_elements_keep_the_callers_flag() {
        let opts = FormattingOptions::default();
        let value = Value::from(vec![Value::from(vec!["a"])]);

        let Rendered::List(outer) = render_value(&value, &opts, false) else {
            panic!("expected list");
        };
        let Rendered::List(inner) = &outer.items[0].value else {
            panic!("expected list");
        };
        assert_eq!(outer.style, ListStyle::FLAT);
        assert_eq!(inner.style, ListStyle::FLAT);

        let Rendered::List(outer) = render_value(&value, &opts, true) else {
            panic!("expected list");
        };
        let Rendered::List(inner) = &outer.items[0].value else {
            panic!("expected list");
        };
        assert_eq!(outer.style, ListStyle::NESTED);
        assert_eq!(inner.style, ListStyle::NESTED);
    }

    #[test]
    fn pre_rendered_node_is_passed_through_untouched() {
        let node = Text::from(vec![
            Line::from(vec![Span::styled("up", Style::default().fg(Color::Green))]),
            Line::from("since 3d"),
        ]);
        let meta = Mapping::new()
            .with("status", Value::Node(node.clone()))
            .with("nested", Mapping::new().with("inner", Value::Node(node.clone())));
        let table = render(&meta, false, &FormattingOptions::default());

        assert_eq!(table.rows[0].value, Rendered::Node(node.clone()));
        let Rendered::List(list) = &table.rows[1].value else {
            panic!("expected list");
        };
        assert_eq!(list.items[0].value, Rendered::Node(node));
    }

    #[test]
    fn empty_containers_yield_empty_lists() {
        let opts = FormattingOptions::default();
        assert_eq!(render_list(&[], &opts, false).items.len(), 0);
        assert_eq!(render_map(&Mapping::new(), &opts, true).items.len(), 0);
    }

    #[test]
    fn re_rendering_is_structurally_identical() {
        let opts = FormattingOptions::default();
        let meta = sample();
        assert_eq!(render(&meta, false, &opts), render(&meta, false, &opts));
    }
}
