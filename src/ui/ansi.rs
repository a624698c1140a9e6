use std::io::{self, Write};

use ratatui::crossterm::{
    queue,
    style::{Attribute, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;

fn queue_style<W: Write>(writer: &mut W, style: Style) -> io::Result<()> {
    if let Some(fg) = style.fg {
        queue!(writer, SetForegroundColor(fg.into()))?;
    }
    if let Some(bg) = style.bg {
        queue!(writer, SetBackgroundColor(bg.into()))?;
    }
    if style.add_modifier.contains(Modifier::BOLD) {
        queue!(writer, SetAttribute(Attribute::Bold))?;
    }
    if style.add_modifier.contains(Modifier::ITALIC) {
        queue!(writer, SetAttribute(Attribute::Italic))?;
    }
    Ok(())
}

fn is_unstyled(style: Style) -> bool {
    style.fg.is_none() && style.bg.is_none() && style.add_modifier.is_empty()
}

/// Write one line, resetting attributes after every styled span.
pub fn write_line<W: Write>(writer: &mut W, line: &Line<'_>) -> io::Result<()> {
    for span in &line.spans {
        let style = line.style.patch(span.style);
        if is_unstyled(style) {
            queue!(writer, Print(span.content.as_ref()))?;
            continue;
        }
        queue_style(writer, style)?;
        queue!(
            writer,
            Print(span.content.as_ref()),
            SetAttribute(Attribute::Reset),
            ResetColor
        )?;
    }
    queue!(writer, Print("\n"))
}

pub fn write_lines<W: Write>(writer: &mut W, lines: &[Line<'_>]) -> io::Result<()> {
    for line in lines {
        write_line(writer, line)?;
    }
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::crossterm::style::Color as CColor;
    use ratatui::style::Color;
    use ratatui::text::Span;

    fn render(lines: &[Line<'_>]) -> String {
        let mut out = Vec::new();
        write_lines(&mut out, lines).expect("write to Vec");
        String::from_utf8(out).expect("utf8")
    }

    #[test]
    fn unstyled_lines_are_plain_text() {
        let out = render(&[Line::from("hello"), Line::default()]);
        assert_eq!(out, "hello\n\n");
    }

    #[test]
    fn styled_spans_are_wrapped_in_escapes_and_reset() {
        let line = Line::from(vec![
            Span::raw("  "),
            Span::styled("fn", Style::default().fg(Color::Rgb(219, 120, 219))),
        ]);
        let out = render(&[line]);
        assert!(out.starts_with("  \x1b["));
        assert!(out.contains("38;2;219;120;219"));
        assert!(out.contains("fn"));
        assert!(out.ends_with("m\n"));
    }

    #[test]
    fn indexed_colours_map_to_ansi_values() {
        assert_eq!(CColor::from(Color::Indexed(42)), CColor::AnsiValue(42));
        assert_eq!(CColor::from(Color::LightRed), CColor::Red);
    }

    #[test]
    fn background_colours_use_the_background_escape() {
        let line = Line::from(Span::styled("x", Style::default().bg(Color::Indexed(236))));
        let out = render(&[line]);
        assert!(out.contains("48;5;236"));
    }
}
