//! Core model – the metadata value tree, key titles, formatting, and loading.
//!
//! Nothing in this module draws to the terminal.  The only Ratatui type used
//! is `Text`, which carries pre-rendered nodes through untouched.

pub mod format;
pub mod source;
pub mod title;
pub mod value;
