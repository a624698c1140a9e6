//! Schoolbot is a terminal chat client for OpenAI-compatible completion APIs
//! that renders fenced code blocks in assistant replies with syntax colours.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`markdown`] splits a message into prose runs and fenced code blocks in a
//!   single pass, keeping byte ranges for every piece.
//! - [`highlight`] turns one line of code into coloured segments using
//!   per-language regex rule tables.
//! - [`core`] owns the chat history, configuration and the background
//!   completion task.
//! - [`ui`] maps messages to styled terminal lines and writes them out.
//! - [`api`] defines the request/response payloads.
//!
//! `markdown` and `highlight` are pure: no I/O, no logging and no shared
//! mutable state, so they can be called from any thread.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`].

pub mod api;
pub mod cli;
pub mod core;
pub mod highlight;
pub mod markdown;
pub mod ui;
pub mod utils;
