//! Message → styled terminal lines.
//!
//! Every message starts with its role header. The body follows, indented by
//! [`BODY_INDENT`] columns. Prose runs are word-wrapped to the available width.
//! Fenced code gets a `[language]` label line, then one line per source line,
//! painted segment by segment on the code background. Code is never wrapped, so
//! what the user copies matches what the model sent.

use crate::core::constants::BODY_INDENT;
use crate::core::message::Message;
use crate::highlight::{highlighted_segments, Segment};
use crate::markdown::{split_message, CodeBlock, MessagePiece};
use crate::ui::theme::Theme;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub fn render_message(
    message: &Message,
    theme: &Theme,
    width: Option<usize>,
) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(
        message.role.label(),
        theme.header_style(message.role),
    ))];

    let body_width = width.map(|w| w.saturating_sub(BODY_INDENT).max(1));
    for piece in split_message(&message.content) {
        match piece {
            MessagePiece::Text(run) => {
                lines.extend(render_prose(run.text, theme.body_style, body_width));
            }
            MessagePiece::Code(block) => lines.extend(render_code_block(&block, theme)),
        }
    }
    lines
}

/// Render a transcript, one blank line between messages.
pub fn render_transcript(
    messages: &[Message],
    theme: &Theme,
    width: Option<usize>,
) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for (i, message) in messages.iter().enumerate() {
        if i > 0 {
            lines.push(Line::default());
        }
        lines.extend(render_message(message, theme, width));
    }
    lines
}

pub fn render_code_block(block: &CodeBlock, theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(vec![
        indent(),
        Span::styled(format!("[{}]", block.language), theme.code_label_style),
    ])];

    for mut line in render_code(&block.code, &block.language, theme) {
        line.spans.insert(0, indent());
        lines.push(line);
    }
    lines
}

/// Highlighted source with no label or indent, one line per source line.
pub fn render_code(code: &str, language: &str, theme: &Theme) -> Vec<Line<'static>> {
    highlighted_segments(code, language)
        .iter()
        .map(|segments| Line::from(code_spans(segments, theme)))
        .collect()
}

fn code_spans(segments: &[Segment<'_>], theme: &Theme) -> Vec<Span<'static>> {
    segments
        .iter()
        .map(|segment| Span::styled(segment.text.to_string(), theme.segment_style(segment)))
        .collect()
}

fn indent() -> Span<'static> {
    Span::raw(" ".repeat(BODY_INDENT))
}

/// Prose between fences. The newlines that sit against a fence are layout,
/// not content, so they are dropped here.
fn render_prose(text: &str, style: Style, width: Option<usize>) -> Vec<Line<'static>> {
    let text = text.trim_matches('\n');
    if text.is_empty() {
        return Vec::new();
    }

    let mut lines = Vec::new();
    for source_line in text.lines() {
        let rows = match width {
            Some(width) => wrap_words(source_line, width),
            None => vec![source_line.to_string()],
        };
        for row in rows {
            lines.push(Line::from(vec![indent(), Span::styled(row, style)]));
        }
    }
    lines
}

/// Greedy word wrap by display width. Words wider than `width` are split by character.
pub(crate) fn wrap_words(line: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for word in line.split_whitespace() {
        let word_width = UnicodeWidthStr::width(word);
        let needed = if current.is_empty() {
            word_width
        } else {
            current_width + 1 + word_width
        };

        if needed <= width {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
            current_width = needed;
            continue;
        }

        if !current.is_empty() {
            rows.push(std::mem::take(&mut current));
            current_width = 0;
        }

        if word_width <= width {
            current.push_str(word);
            current_width = word_width;
            continue;
        }

        for ch in word.chars() {
            let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
            if current_width + ch_width > width && !current.is_empty() {
                rows.push(std::mem::take(&mut current));
                current_width = 0;
            }
            current.push(ch);
            current_width += ch_width;
        }
    }

    if !current.is_empty() || rows.is_empty() {
        rows.push(current);
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlight::RuleCategory;
    use crate::utils::color::Rgba;

    fn plain(line: &Line<'_>) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    #[test]
    fn header_comes_first_and_body_is_indented() {
        let lines = render_message(&Message::user("hello there"), &Theme::dark_default(), None);
        assert_eq!(plain(&lines[0]), "> YOU");
        assert_eq!(plain(&lines[1]), "  hello there");
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn code_blocks_get_a_label_and_coloured_lines() {
        let theme = Theme::dark_default();
        let message = Message::assistant("Here:\n```python\ndef f():\n    return 1\n```\nDone.");
        let lines = render_message(&message, &theme, None);
        let text: Vec<String> = lines.iter().map(plain).collect();
        assert_eq!(
            text,
            vec![
                "> BOT",
                "  Here:",
                "  [python]",
                "  def f():",
                "      return 1",
                "  Done.",
            ]
        );

        let def_span = &lines[3].spans[1];
        assert_eq!(def_span.content, "def");
        assert_eq!(
            def_span.style.fg,
            Some(RuleCategory::Keyword.default_color().to_tui())
        );
        assert_eq!(def_span.style.bg, theme.code_bg);
        assert_eq!(lines[2].spans[1].style, theme.code_label_style);
    }

    #[test]
    fn untagged_code_is_labelled_plaintext_and_left_uncoloured() {
        let lines = render_message(
            &Message::assistant("```\nint x = 5;\n```"),
            &Theme::dark_default(),
            None,
        );
        assert_eq!(plain(&lines[1]), "  [plaintext]");
        assert!(lines[2].spans[1..]
            .iter()
            .all(|span| span.style.fg.is_none()));
    }

    #[test]
    fn empty_code_lines_keep_their_row() {
        let lines = render_message(
            &Message::assistant("```c\nint a;\n\nint b;\n```"),
            &Theme::dark_default(),
            None,
        );
        assert_eq!(lines.len(), 5);
        assert_eq!(plain(&lines[3]), "  ");
    }

    #[test]
    fn prose_wraps_but_code_does_not() {
        let long_code = "x".repeat(40);
        let message = Message::assistant(format!(
            "one two three four five\n```\n{long_code}\n```"
        ));
        let lines = render_message(&message, &Theme::dark_default(), Some(12));
        let text: Vec<String> = lines.iter().map(plain).collect();
        assert_eq!(text[1], "  one two");
        assert_eq!(text[2], "  three four");
        assert_eq!(text[3], "  five");
        assert_eq!(text.last().unwrap(), &format!("  {long_code}"));
    }

    #[test]
    fn system_messages_use_the_system_header() {
        let theme = Theme::dark_default();
        let lines = render_message(&Message::system("Error: nope"), &theme, None);
        assert_eq!(lines[0].spans[0].style, theme.system_header_style);
        assert_eq!(
            theme.system_header_style.fg,
            Some(Rgba::opaque(1.0, 0.4, 0.4).to_tui())
        );
    }

    #[test]
    fn transcript_separates_messages() {
        let messages = [Message::user("q"), Message::assistant("a")];
        let lines = render_transcript(&messages, &Theme::monochrome(), None);
        let text: Vec<String> = lines.iter().map(plain).collect();
        assert_eq!(text, vec!["> YOU", "  q", "", "> BOT", "  a"]);
    }

    #[test]
    fn raw_code_has_no_chrome() {
        let lines = render_code("x = 1\n# done\n", "py", &Theme::dark_default());
        let text: Vec<String> = lines.iter().map(plain).collect();
        assert_eq!(text, vec!["x = 1", "# done"]);
        assert_eq!(
            lines[1].spans[0].style.fg,
            Some(RuleCategory::Comment.default_color().to_tui())
        );
    }

    #[test]
    fn wrap_words_splits_long_words_by_width() {
        assert_eq!(wrap_words("abcdefgh", 3), vec!["abc", "def", "gh"]);
        assert_eq!(
            wrap_words("日本語テキスト", 4),
            vec!["日本", "語テ", "キス", "ト"]
        );
        assert_eq!(wrap_words("", 10), vec![""]);
        assert_eq!(wrap_words("a b", 10), vec!["a b"]);
    }
}
