//! Markdown format implementation for level-2 ATX headings (`## ` syntax).
//!
//! Guides are split only on `##` headings. Deeper headings (`###`) and anything else stay inside
//! the body of the enclosing section. Bodies are coloured with syntect's markdown grammar.

use std::sync::LazyLock;

use ratatui::{
    style::{Color, Style},
    text::{Line, Span},
};
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

use crate::formats::Format;

static SYNTAXES: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static THEMES: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

const THEME: &str = "base16-ocean.dark";

/// Level-2 markdown headings as section boundaries.
pub struct MarkdownFormat;

impl Format for MarkdownFormat {
    fn heading_marker(&self) -> &'static str {
        "##"
    }

    /// A heading is the marker at line start, then at least one whitespace character, then at
    /// least one more character of heading text (which may itself be whitespace).
    fn is_heading(&self, line: &str) -> bool {
        let Some(rest) = line.strip_prefix(self.heading_marker()) else {
            return false;
        };
        let mut chars = rest.chars();
        matches!(chars.next(), Some(c) if c.is_whitespace()) && chars.next().is_some()
    }

    fn format_body(&self, content: &str) -> Vec<Line<'static>> {
        let syntax = SYNTAXES
            .find_syntax_by_extension("md")
            .unwrap_or_else(|| SYNTAXES.find_syntax_plain_text());
        let Some(theme) = THEMES.themes.get(THEME) else {
            return content.lines().map(|l| Line::raw(l.to_string())).collect();
        };
        let mut highlighter = HighlightLines::new(syntax, theme);

        LinesWithEndings::from(content)
            .map(|line| match highlighter.highlight_line(line, &SYNTAXES) {
                Ok(ranges) => Line::from(
                    ranges
                        .into_iter()
                        .map(|(style, piece)| {
                            let fg = style.foreground;
                            Span::styled(
                                piece.trim_end_matches(['\n', '\r']).to_string(),
                                Style::default().fg(Color::Rgb(fg.r, fg.g, fg.b)),
                            )
                        })
                        .collect::<Vec<_>>(),
                ),
                Err(_) => Line::raw(line.trim_end_matches(['\n', '\r']).to_string()),
            })
            .collect()
    }
}
