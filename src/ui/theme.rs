use crate::core::config::Config;
use crate::core::message::Role;
use crate::highlight::{RuleCategory, Segment};
use crate::utils::color::{quantize_color, ColorDepth, Rgba};
use ratatui::style::{Color, Modifier, Style};
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
pub struct Theme {
    pub user_header_style: Style,
    pub assistant_header_style: Style,
    pub system_header_style: Style,
    pub body_style: Style,

    // Code blocks
    pub code_label_style: Style,
    pub code_text_style: Style,
    pub code_bg: Option<Color>,
    /// Replaces a rule's own colour for every segment of that category.
    pub category_colors: BTreeMap<RuleCategory, Color>,
    /// When false, code lines are drawn without per-segment colour.
    pub syntax: bool,
}

impl Theme {
    pub fn dark_default() -> Self {
        Theme {
            user_header_style: Style::default()
                .fg(Rgba::opaque(0.5, 0.8, 1.0).to_tui())
                .add_modifier(Modifier::BOLD),
            assistant_header_style: Style::default()
                .fg(Rgba::opaque(0.6, 1.0, 0.6).to_tui())
                .add_modifier(Modifier::BOLD),
            system_header_style: Style::default()
                .fg(Rgba::opaque(1.0, 0.4, 0.4).to_tui())
                .add_modifier(Modifier::BOLD),
            body_style: Style::default(),

            code_label_style: Style::default().fg(Rgba::opaque(0.6, 0.6, 0.6).to_tui()),
            code_text_style: Style::default(),
            code_bg: Some(Rgba::opaque(0.12, 0.12, 0.15).to_tui()),
            category_colors: BTreeMap::new(),
            syntax: true,
        }
    }

    /// No colours at all; for piping into files.
    pub fn monochrome() -> Self {
        Theme {
            user_header_style: Style::default().add_modifier(Modifier::BOLD),
            assistant_header_style: Style::default().add_modifier(Modifier::BOLD),
            system_header_style: Style::default().add_modifier(Modifier::BOLD),
            body_style: Style::default(),
            code_label_style: Style::default(),
            code_text_style: Style::default(),
            code_bg: None,
            category_colors: BTreeMap::new(),
            syntax: false,
        }
    }

    /// Apply the user's syntax toggle and per-category colours.
    pub fn with_config(mut self, config: &Config) -> Self {
        self.syntax = self.syntax && config.syntax_enabled();
        for (category, color) in &config.highlight {
            self.category_colors.insert(*category, color.to_tui());
        }
        self
    }

    pub fn header_style(&self, role: Role) -> Style {
        match role {
            Role::User => self.user_header_style,
            Role::Assistant => self.assistant_header_style,
            Role::System => self.system_header_style,
        }
    }

    pub fn segment_style(&self, segment: &Segment<'_>) -> Style {
        let mut style = self.code_text_style;
        if let Some(bg) = self.code_bg {
            style = style.bg(bg);
        }
        if !self.syntax {
            return style;
        }
        let override_color = segment
            .category
            .and_then(|category| self.category_colors.get(&category).copied());
        match override_color.or_else(|| segment.color.map(Rgba::to_tui)) {
            Some(fg) => style.fg(fg),
            None => style,
        }
    }

    /// Map every colour to what the terminal can show.
    pub fn quantized(mut self, depth: ColorDepth) -> Self {
        if depth == ColorDepth::Truecolor {
            return self;
        }
        let q = |style: Style| Style {
            fg: style.fg.map(|c| quantize_color(c, depth)),
            bg: style.bg.map(|c| quantize_color(c, depth)),
            ..style
        };
        self.user_header_style = q(self.user_header_style);
        self.assistant_header_style = q(self.assistant_header_style);
        self.system_header_style = q(self.system_header_style);
        self.body_style = q(self.body_style);
        self.code_label_style = q(self.code_label_style);
        self.code_text_style = q(self.code_text_style);
        self.code_bg = self.code_bg.map(|c| quantize_color(c, depth));
        // Rule colours are resolved per segment, so pin every category here.
        for category in RuleCategory::ALL {
            let color = self
                .category_colors
                .get(&category)
                .copied()
                .unwrap_or_else(|| category.default_color().to_tui());
            self.category_colors
                .insert(category, quantize_color(color, depth));
        }
        self
    }
}
