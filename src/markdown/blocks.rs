use memchr::memmem;
use std::ops::Range;

pub(super) const FENCE: &str = "```";
pub const PLAINTEXT_LANGUAGE: &str = "plaintext";

/// A run of prose between (or around) fenced code blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun<'a> {
    pub text: &'a str,
    /// Byte range of `text` within the scanned message.
    pub range: Range<usize>,
}

/// A fenced code block lifted out of a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    /// Ordinal among the code blocks of the message, starting at zero.
    pub index: usize,
    /// Lower-cased fence tag, or `"plaintext"` when the fence had none.
    pub language: String,
    /// Fence body with trailing whitespace removed.
    pub code: String,
    /// Byte range of the whole block, opening and closing fences included.
    pub range: Range<usize>,
    /// Byte range of the untrimmed body.
    pub body_range: Range<usize>,
    tagged: bool,
}

impl CodeBlock {
    /// Whether the opening fence carried a language tag.
    pub fn has_language(&self) -> bool {
        self.tagged
    }

    pub fn line_count(&self) -> usize {
        self.code.lines().count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessagePiece<'a> {
    Text(TextRun<'a>),
    Code(CodeBlock),
}

impl<'a> MessagePiece<'a> {
    pub fn range(&self) -> Range<usize> {
        match self {
            MessagePiece::Text(run) => run.range.clone(),
            MessagePiece::Code(block) => block.range.clone(),
        }
    }

    pub fn as_code(&self) -> Option<&CodeBlock> {
        match self {
            MessagePiece::Code(block) => Some(block),
            MessagePiece::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&'a str> {
        match self {
            MessagePiece::Text(run) => Some(run.text),
            MessagePiece::Code(_) => None,
        }
    }
}

struct OpeningFence<'a> {
    tag: &'a str,
    body_start: usize,
}

/// An opening fence must start a line and be followed by an optional word-character
/// tag, optional horizontal whitespace, then a newline.
fn parse_opening(message: &str, at: usize) -> Option<OpeningFence<'_>> {
    let bytes = message.as_bytes();
    if at > 0 && bytes[at - 1] != b'\n' {
        return None;
    }

    let tag_start = at + FENCE.len();
    let tag_len = bytes[tag_start..]
        .iter()
        .take_while(|&&b| b.is_ascii_alphanumeric() || b == b'_')
        .count();
    let tag_end = tag_start + tag_len;

    let pad = bytes[tag_end..]
        .iter()
        .take_while(|&&b| matches!(b, b' ' | b'\t' | b'\r'))
        .count();
    let newline = tag_end + pad;
    if bytes.get(newline) != Some(&b'\n') {
        return None;
    }

    Some(OpeningFence {
        tag: &message[tag_start..tag_end],
        body_start: newline + 1,
    })
}

fn trim_code(body: &str) -> &str {
    body.trim_end_matches(|c| matches!(c, ' ' | '\t' | '\r' | '\n'))
}

fn push_text_run<'a>(pieces: &mut Vec<MessagePiece<'a>>, message: &'a str, range: Range<usize>) {
    let text = &message[range.clone()];
    // A lone newline hugging a fence would only render as a blank line.
    if text.is_empty() || text == "\n" {
        return;
    }
    pieces.push(MessagePiece::Text(TextRun { text, range }));
}

/// Split a message into plain-text runs and fenced code blocks, in document order.
///
/// Fences pair up non-greedily: an opening fence is closed by the next ```` ``` ````
/// after its newline. An opening fence with no close is left in the surrounding
/// text. A message without any code block comes back as exactly one text run,
/// even when it is empty.
pub fn split_message(message: &str) -> Vec<MessagePiece<'_>> {
    let bytes = message.as_bytes();
    let finder = memmem::Finder::new(FENCE);
    let mut pieces = Vec::new();
    let mut text_start = 0;
    let mut cursor = 0;
    let mut index = 0;

    while let Some(found) = finder.find(&bytes[cursor..]) {
        let open = cursor + found;
        let Some(opening) = parse_opening(message, open) else {
            cursor = open + 1;
            continue;
        };
        // Any later opening fence would have served as this one's close.
        let Some(close) = finder
            .find(&bytes[opening.body_start..])
            .map(|offset| opening.body_start + offset)
        else {
            break;
        };

        let end = close + FENCE.len();
        let body = &message[opening.body_start..close];
        let language = if opening.tag.is_empty() {
            PLAINTEXT_LANGUAGE.to_string()
        } else {
            opening.tag.to_ascii_lowercase()
        };

        push_text_run(&mut pieces, message, text_start..open);
        pieces.push(MessagePiece::Code(CodeBlock {
            index,
            language,
            code: trim_code(body).to_string(),
            range: open..end,
            body_range: opening.body_start..close,
            tagged: !opening.tag.is_empty(),
        }));

        index += 1;
        text_start = end;
        cursor = end;
    }

    if index == 0 {
        return vec![MessagePiece::Text(TextRun {
            text: message,
            range: 0..message.len(),
        })];
    }

    push_text_run(&mut pieces, message, text_start..message.len());
    pieces
}

/// The code blocks of a message, in order. Same scan as [`split_message`].
pub fn extract_code_blocks(message: &str) -> Vec<CodeBlock> {
    split_message(message)
        .into_iter()
        .filter_map(|piece| match piece {
            MessagePiece::Code(block) => Some(block),
            MessagePiece::Text(_) => None,
        })
        .collect()
}
