//! Fenced code block extraction for chat messages.
//!
//! A single scan yields both the code blocks and the prose around them, tagged
//! with byte ranges into the original message, so rendering never has to
//! re-discover fence positions on its own.

mod blocks;

#[cfg(test)]
mod tests;

pub use blocks::{
    extract_code_blocks, split_message, CodeBlock, MessagePiece, TextRun, PLAINTEXT_LANGUAGE,
};
