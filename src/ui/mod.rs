//! UI / rendering layer — everything that touches Ratatui widgets.
//!
//! This layer takes the formatted *core* table and draws it into a terminal
//! buffer.  No file I/O happens here.

pub mod layout;
pub mod metadata_table;
pub mod popup;
pub mod theme;
