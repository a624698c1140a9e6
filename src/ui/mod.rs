//! Terminal presentation.
//!
//! - [`render`] turns messages into styled ratatui lines using
//!   [`crate::markdown`] and [`crate::highlight`].
//! - [`theme`] holds the colour policy: role headers, code block chrome and
//!   per-category overrides from the config.
//! - [`ansi`] writes styled lines to a plain terminal stream.

pub mod ansi;
pub mod render;
pub mod theme;
