//! Offline `render` and `highlight` commands

use std::error::Error;
use std::fs;
use std::io::{self, Read};
use std::path::Path;

use tracing::warn;

use crate::cli::{output_theme, terminal_width};
use crate::core::config::Config;
use crate::core::message::Message;
use crate::highlight::Language;
use crate::ui::ansi::write_lines;
use crate::ui::render::{render_code, render_message};

/// Read a file, or all of stdin when `file` is absent or `-`.
pub(crate) fn read_source(file: Option<&Path>) -> io::Result<String> {
    match file {
        Some(path) if path != Path::new("-") => fs::read_to_string(path),
        _ => {
            let mut contents = String::new();
            io::stdin().read_to_string(&mut contents)?;
            Ok(contents)
        }
    }
}

pub fn run_render(file: Option<&Path>, config: &Config) -> Result<(), Box<dyn Error>> {
    let content = read_source(file)?;
    let theme = output_theme(config);
    let lines = render_message(&Message::assistant(content), &theme, terminal_width());
    write_lines(&mut io::stdout().lock(), &lines)?;
    Ok(())
}

pub fn run_highlight(
    language: &str,
    file: Option<&Path>,
    config: &Config,
) -> Result<(), Box<dyn Error>> {
    if Language::from_tag(language).is_none() {
        warn!(language, "no highlighting rules for language; printing plain text");
    }
    let code = read_source(file)?;
    let theme = output_theme(config);
    let lines = render_code(&code, language, &theme);
    write_lines(&mut io::stdout().lock(), &lines)?;
    Ok(())
}
