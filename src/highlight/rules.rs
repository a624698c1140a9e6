//! Rule categories and the built-in per-language pattern tables.

use crate::utils::color::Rgba;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleCategory {
    Keyword,
    /// `#include`, `#define` and friends (C family only).
    Preprocessor,
    String,
    Comment,
    Number,
    /// Call sites in the C family, definition names in Python.
    Function,
}

impl RuleCategory {
    pub const ALL: [RuleCategory; 6] = [
        RuleCategory::Keyword,
        RuleCategory::Preprocessor,
        RuleCategory::String,
        RuleCategory::Comment,
        RuleCategory::Number,
        RuleCategory::Function,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RuleCategory::Keyword => "keyword",
            RuleCategory::Preprocessor => "preprocessor",
            RuleCategory::String => "string",
            RuleCategory::Comment => "comment",
            RuleCategory::Number => "number",
            RuleCategory::Function => "function",
        }
    }

    pub fn default_color(self) -> Rgba {
        match self {
            RuleCategory::Keyword => Rgba::opaque(0.86, 0.47, 0.86),
            RuleCategory::Preprocessor => Rgba::opaque(0.7, 0.7, 0.4),
            RuleCategory::String => Rgba::opaque(0.9, 0.7, 0.4),
            RuleCategory::Comment => Rgba::opaque(0.5, 0.5, 0.5),
            RuleCategory::Number => Rgba::opaque(0.6, 0.85, 0.6),
            RuleCategory::Function => Rgba::opaque(0.8, 0.8, 0.5),
        }
    }
}

/// One lexical pattern and the colour its matches receive.
///
/// Patterns run against a whole line. When the pattern has a capture group,
/// only group 1 is highlighted; this stands in for lookaround, which the
/// `regex` crate does not support.
#[derive(Debug, Clone)]
pub struct HighlightRule {
    category: RuleCategory,
    pattern: Regex,
    color: Rgba,
}

impl HighlightRule {
    pub fn new(category: RuleCategory, pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            category,
            pattern: Regex::new(pattern)?,
            color: category.default_color(),
        })
    }

    pub fn with_color(mut self, color: Rgba) -> Self {
        self.color = color;
        self
    }

    fn builtin(category: RuleCategory, pattern: &str) -> Self {
        Self::new(category, pattern).unwrap_or_else(|err| {
            panic!(
                "built-in {} pattern failed to compile: {err}",
                category.as_str()
            )
        })
    }

    pub fn category(&self) -> RuleCategory {
        self.category
    }

    pub fn color(&self) -> Rgba {
        self.color
    }

    /// Visit every non-empty span this rule claims on `line`, left to right.
    pub(super) fn for_each_span(&self, line: &str, mut visit: impl FnMut(Range<usize>)) {
        if self.pattern.captures_len() > 1 {
            for caps in self.pattern.captures_iter(line) {
                if let Some(m) = caps.get(1).or_else(|| caps.get(0)) {
                    if !m.is_empty() {
                        visit(m.range());
                    }
                }
            }
        } else {
            for m in self.pattern.find_iter(line) {
                if !m.is_empty() {
                    visit(m.range());
                }
            }
        }
    }
}

impl PartialEq for HighlightRule {
    fn eq(&self, other: &Self) -> bool {
        self.category == other.category
            && self.color == other.color
            && self.pattern.as_str() == other.pattern.as_str()
    }
}

type PatternTable = &'static [(RuleCategory, &'static str)];

const DOUBLE_QUOTED: &str = r#""(?:[^"\\]|\\.)*""#;
const SLASH_COMMENT: &str = r"//.*";
const DECIMAL: &str = r"\b\d+\.?\d*\b";

pub(super) const C_FAMILY: PatternTable = &[
    (
        RuleCategory::Keyword,
        r"\b(?:alignas|alignof|and|and_eq|asm|auto|bitand|bitor|bool|break|case|catch|char|char8_t|char16_t|char32_t|class|compl|concept|const|consteval|constexpr|constinit|const_cast|continue|co_await|co_return|co_yield|decltype|default|delete|do|double|dynamic_cast|else|enum|explicit|export|extern|false|float|for|friend|goto|if|inline|int|long|mutable|namespace|new|noexcept|not|not_eq|nullptr|operator|or|or_eq|private|protected|public|register|reinterpret_cast|requires|return|short|signed|sizeof|static|static_assert|static_cast|struct|switch|template|this|thread_local|throw|true|try|typedef|typeid|typename|union|unsigned|using|virtual|void|volatile|wchar_t|while|xor|xor_eq)\b",
    ),
    (RuleCategory::Preprocessor, r"^\s*#\s*\w+"),
    (RuleCategory::String, DOUBLE_QUOTED),
    (RuleCategory::Comment, SLASH_COMMENT),
    (RuleCategory::Number, r"\b\d+\.?\d*f?\b"),
    (RuleCategory::Function, r"\b(\w+)\s*\("),
];

pub(super) const PYTHON: PatternTable = &[
    (
        RuleCategory::Keyword,
        r"\b(?:False|None|True|and|as|assert|async|await|break|class|continue|def|del|elif|else|except|finally|for|from|global|if|import|in|is|lambda|nonlocal|not|or|pass|raise|return|try|while|with|yield)\b",
    ),
    (
        RuleCategory::String,
        r#""(?:[^"\\]|\\.)*"|'(?:[^'\\]|\\.)*'"#,
    ),
    (RuleCategory::Comment, r"#.*"),
    (RuleCategory::Number, DECIMAL),
    (RuleCategory::Function, r"def\s(\w+)"),
];

pub(super) const WEB_SCRIPT: PatternTable = &[
    (
        RuleCategory::Keyword,
        r"\b(?:async|await|break|case|catch|class|const|continue|debugger|default|delete|do|else|enum|export|extends|false|finally|for|function|if|import|in|instanceof|let|new|null|return|super|switch|this|throw|true|try|typeof|var|void|while|with|yield)\b",
    ),
    (
        RuleCategory::String,
        r#""(?:[^"\\]|\\.)*"|'(?:[^'\\]|\\.)*'|`(?:[^`\\]|\\.)*`"#,
    ),
    (RuleCategory::Comment, SLASH_COMMENT),
    (RuleCategory::Number, DECIMAL),
];

pub(super) const JAVA: PatternTable = &[
    (
        RuleCategory::Keyword,
        r"\b(?:abstract|assert|boolean|break|byte|case|catch|char|class|const|continue|default|do|double|else|enum|extends|final|finally|float|for|goto|if|implements|import|instanceof|int|interface|long|native|new|package|private|protected|public|return|short|static|strictfp|super|switch|synchronized|this|throw|throws|transient|try|void|volatile|while)\b",
    ),
    (RuleCategory::String, DOUBLE_QUOTED),
    (RuleCategory::Comment, SLASH_COMMENT),
    (RuleCategory::Number, r"\b\d+\.?\d*[fFdDlL]?\b"),
];

pub(super) const RUST: PatternTable = &[
    (
        RuleCategory::Keyword,
        r"\b(?:as|async|await|break|const|continue|crate|dyn|else|enum|extern|false|fn|for|if|impl|in|let|loop|match|mod|move|mut|pub|ref|return|self|Self|static|struct|super|trait|true|type|unsafe|use|where|while)\b",
    ),
    (RuleCategory::String, DOUBLE_QUOTED),
    (RuleCategory::Comment, SLASH_COMMENT),
    (RuleCategory::Number, DECIMAL),
];

pub(super) fn compile(table: PatternTable) -> Vec<HighlightRule> {
    table
        .iter()
        .map(|&(category, pattern)| HighlightRule::builtin(category, pattern))
        .collect()
}
