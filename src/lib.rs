//! Structured metadata rendering for the terminal.
//!
//! [`core`] turns an arbitrary, possibly nested key-value [`Metadata`] tree
//! into a two-column [`Table`]; [`ui`] draws that table with Ratatui.
//!
//! ```no_run
//! use metatable::{render, FormattingOptions, Mapping};
//!
//! let meta = Mapping::new()
//!     .with("name", "svc-a")
//!     .with("tags", vec!["x", "y"]);
//! let table = render(&meta, false, &FormattingOptions::default());
//! print!("{}", metatable::ui::metadata_table::render_to_string(&table, 80));
//! ```

pub mod config;
pub mod core;
pub mod ui;

pub use crate::core::format::{render, FormattingOptions, Rendered, Table};
pub use crate::core::title::{start_case, TitleFormat};
pub use crate::core::value::{Mapping, Metadata, Scalar, Value};
