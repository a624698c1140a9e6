//! Regex-driven syntax highlighting for fenced code.
//!
//! Each supported language owns an ordered list of [`HighlightRule`]s. A line is
//! highlighted by collecting every rule's matches, ordering them by start offset
//! (rule order breaks ties), and sweeping left to right: a candidate is kept only
//! if it starts at or after the end of the last kept one. Kept candidates become
//! coloured [`Segment`]s and the gaps between them become plain segments, so the
//! segments of a line always concatenate back to the line.
//!
//! Offsets are UTF-8 byte offsets as reported by the regex engine, which always
//! fall on character boundaries.

mod rules;


pub use rules::{HighlightRule, RuleCategory};

use crate::utils::color::Rgba;
use std::ops::Range;
use std::sync::LazyLock;

/// Canonical language buckets that fence tags resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    CFamily,
    Python,
    WebScript,
    Java,
    Rust,
}

static C_FAMILY_RULES: LazyLock<Vec<HighlightRule>> =
    LazyLock::new(|| rules::compile(rules::C_FAMILY));
static PYTHON_RULES: LazyLock<Vec<HighlightRule>> = LazyLock::new(|| rules::compile(rules::PYTHON));
static WEB_SCRIPT_RULES: LazyLock<Vec<HighlightRule>> =
    LazyLock::new(|| rules::compile(rules::WEB_SCRIPT));
static JAVA_RULES: LazyLock<Vec<HighlightRule>> = LazyLock::new(|| rules::compile(rules::JAVA));
static RUST_RULES: LazyLock<Vec<HighlightRule>> = LazyLock::new(|| rules::compile(rules::RUST));

impl Language {
    /// Resolve a fence tag (case-insensitive) to its canonical language.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "c" | "cpp" | "c++" | "cc" | "cxx" => Some(Language::CFamily),
            "python" | "py" => Some(Language::Python),
            "javascript" | "js" | "typescript" | "ts" => Some(Language::WebScript),
            "java" => Some(Language::Java),
            "rust" | "rs" => Some(Language::Rust),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Language::CFamily => "c-family",
            Language::Python => "python",
            Language::WebScript => "web-script",
            Language::Java => "java",
            Language::Rust => "rust",
        }
    }

    /// The language's rules in priority order. Compiled once, shared afterwards.
    pub fn rules(self) -> &'static [HighlightRule] {
        match self {
            Language::CFamily => &C_FAMILY_RULES,
            Language::Python => &PYTHON_RULES,
            Language::WebScript => &WEB_SCRIPT_RULES,
            Language::Java => &JAVA_RULES,
            Language::Rust => &RUST_RULES,
        }
    }
}

/// Rules for a fence tag; unknown tags (including `plaintext`) get none.
pub fn rules_for(language: &str) -> &'static [HighlightRule] {
    match Language::from_tag(language) {
        Some(lang) => lang.rules(),
        None => &[],
    }
}

/// A contiguous piece of one line, coloured by a rule or left plain.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment<'a> {
    pub text: &'a str,
    /// Byte range of `text` within the line.
    pub range: Range<usize>,
    pub category: Option<RuleCategory>,
    pub color: Option<Rgba>,
}

impl<'a> Segment<'a> {
    fn plain(line: &'a str, range: Range<usize>) -> Self {
        Self {
            text: &line[range.clone()],
            range,
            category: None,
            color: None,
        }
    }

    pub fn is_plain(&self) -> bool {
        self.color.is_none()
    }
}

#[derive(Debug, Clone, Copy)]
struct Highlight {
    start: usize,
    end: usize,
    rule: usize,
}

fn candidates(line: &str, rules: &[HighlightRule]) -> Vec<Highlight> {
    let mut found = Vec::new();
    for (rule, highlight_rule) in rules.iter().enumerate() {
        highlight_rule.for_each_span(line, |span| {
            found.push(Highlight {
                start: span.start,
                end: span.end,
                rule,
            })
        });
    }
    // Stable: equal starts keep rule order, then match order.
    found.sort_by_key(|h| h.start);
    found
}

fn sweep(candidates: Vec<Highlight>) -> Vec<Highlight> {
    let mut last_end = 0;
    candidates
        .into_iter()
        .filter(|h| {
            if h.start >= last_end {
                last_end = h.end;
                true
            } else {
                false
            }
        })
        .collect()
}

/// Split one line into segments under `rules`.
///
/// An empty line yields no segments; a line nothing matches yields a single
/// plain segment.
pub fn highlight_line<'a>(line: &'a str, rules: &[HighlightRule]) -> Vec<Segment<'a>> {
    if line.is_empty() {
        return Vec::new();
    }

    let accepted = sweep(candidates(line, rules));
    let mut segments = Vec::with_capacity(accepted.len() * 2 + 1);
    let mut pos = 0;
    for h in accepted {
        if h.start > pos {
            segments.push(Segment::plain(line, pos..h.start));
        }
        let rule = &rules[h.rule];
        segments.push(Segment {
            text: &line[h.start..h.end],
            range: h.start..h.end,
            category: Some(rule.category()),
            color: Some(rule.color()),
        });
        pos = h.end;
    }
    if pos < line.len() {
        segments.push(Segment::plain(line, pos..line.len()));
    }
    segments
}

/// Highlight every line of a code block, one segment list per line.
pub fn highlighted_segments<'a>(code: &'a str, language: &str) -> Vec<Vec<Segment<'a>>> {
    let rules = rules_for(language);
    code.lines().map(|line| highlight_line(line, rules)).collect()
}
