//! The UI renders the application state into something visible and vim-able.
//!
//! The draw function dispatches based on the current view: the search screen, the current page
//! of a guide (also under prompts and the command line), or the section editor.

use crate::app_state::{AppState, SearchFocus, View};
use crate::formats::markdown::MarkdownFormat;
use crate::formats::Format;
use crate::session::GuideStatus;
use edtui::{EditorTheme, EditorView, SyntaxHighlighter};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

const SEARCH_HELP: &str = "Enter: Search / Open | Tab: Switch focus | ↑/↓: Select | Esc: Quit";
const GUIDE_HELP: &str = "←/→: Page | ↑/↓: Section | Enter: Edit | t: Title | r: Regenerate | d: Delete | c: Copy | n: Listen | :w Save | :e Export | q: Back";
const DETAIL_HELP: &str = "Esc (normal mode): Keep edits | :w Keep | :x Keep & Close | :q Discard";

/// Renders the active view based on current application state.
pub fn draw(f: &mut Frame, app: &mut AppState) {
    match app.current_view {
        View::Search => draw_search(f, app),
        View::Guide | View::Prompt => draw_guide(f, app),
        View::Command if app.editor_state.is_none() => draw_guide(f, app),
        View::Detail | View::Command => draw_detail(f, app),
    }
}

fn bottom_bar(app: &AppState, help: &str) -> Paragraph<'static> {
    let (text, title) = match (app.current_view, &app.prompt) {
        (View::Prompt, Some(prompt)) => (format!("{}: {}", prompt.label(), prompt.input), "Input"),
        (View::Command, _) => (format!(":{}", app.command_buffer), "Command"),
        _ => (
            app.message.clone().unwrap_or_else(|| help.to_string()),
            "",
        ),
    };
    Paragraph::new(text).block(Block::default().borders(Borders::ALL).title(title))
}

fn focus_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    }
}

fn draw_search(f: &mut Frame, app: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Location input
            Constraint::Min(0),    // Results
            Constraint::Length(6), // Selected place
            Constraint::Length(3), // Help
        ])
        .split(f.area());

    let input = Paragraph::new(app.search_input.as_str()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(focus_style(app.search_focus == SearchFocus::Input))
            .title("Location"),
    );
    f.render_widget(input, chunks[0]);

    let items: Vec<ListItem> = app
        .places
        .iter()
        .map(|place| {
            let marker = if place.has_details { "★ " } else { "  " };
            ListItem::new(Line::from(vec![
                Span::styled(marker, Style::default().fg(Color::Yellow)),
                Span::styled(
                    place.name.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
            ]))
        })
        .collect();
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(focus_style(app.search_focus == SearchFocus::Results))
                .title(format!("Places ({})", app.places.len())),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    let mut state = ListState::default().with_selected(
        (!app.places.is_empty()).then_some(app.selected_place),
    );
    f.render_stateful_widget(list, chunks[1], &mut state);

    if let Some(place) = app.places.get(app.selected_place) {
        let text = Text::from(vec![
            Line::raw(place.description.clone()),
            Line::styled(place.image(), Style::default().fg(Color::DarkGray)),
        ]);
        let detail = Paragraph::new(text)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title(place.name.clone()));
        f.render_widget(detail, chunks[2]);
    }

    f.render_widget(bottom_bar(app, SEARCH_HELP), chunks[3]);
}

fn draw_guide(f: &mut Frame, app: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Page
            Constraint::Length(3), // Help / prompt / command
        ])
        .split(f.area());

    let mut header = vec![Span::styled(
        app.guide_title(),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    if let Some(indicator) = app.page_indicator() {
        header.push(Span::raw(format!("  {indicator}")));
    }
    if app.is_speaking() {
        header.push(Span::styled("  ♪ listening", Style::default().fg(Color::Green)));
    }
    let header = Paragraph::new(Line::from(header)).block(Block::default().borders(Borders::ALL));
    f.render_widget(header, chunks[0]);

    draw_page(f, app, chunks[1]);

    f.render_widget(bottom_bar(app, GUIDE_HELP), chunks[2]);
}

fn draw_page(f: &mut Frame, app: &AppState, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("Sections");

    if let GuideStatus::Error(message) = app.session.status() {
        let error = Paragraph::new(message.clone())
            .style(Style::default().fg(Color::Red))
            .block(block);
        f.render_widget(error, area);
        return;
    }

    let format = MarkdownFormat;
    let buffer = app.session.buffer();
    if buffer.is_empty() {
        f.render_widget(Paragraph::new("No sections on this page.").block(block), area);
        return;
    }

    let items: Vec<ListItem> = (0..buffer.len())
        .map(|i| {
            let mut lines = vec![Line::from(vec![
                Span::styled(
                    format!("{} ", format.heading_marker()),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(
                    buffer.title(i).unwrap_or_default().to_string(),
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
            ])];
            lines.extend(format.format_body(buffer.content(i).unwrap_or_default()));
            lines.push(Line::raw(""));
            ListItem::new(Text::from(lines))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_symbol("▌")
        .highlight_style(Style::default().add_modifier(Modifier::BOLD));
    let mut state = ListState::default().with_selected(Some(app.selected_section));
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_detail(f: &mut Frame, app: &mut AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Breadcrumb
            Constraint::Min(0),    // Editor
            Constraint::Length(3), // Help
        ])
        .split(f.area());

    let title = app
        .session
        .buffer()
        .title(app.selected_section)
        .unwrap_or_default()
        .to_string();
    let mut breadcrumb_parts = vec![app.session.place().to_string()];
    if let Some(indicator) = app.page_indicator() {
        breadcrumb_parts.push(indicator);
    }
    breadcrumb_parts.push(title.clone());

    let breadcrumb_widget = Paragraph::new(breadcrumb_parts.join(" > "))
        .block(Block::default().borders(Borders::ALL).title("Navigation"));
    f.render_widget(breadcrumb_widget, chunks[0]);

    f.render_widget(bottom_bar(app, DETAIL_HELP), chunks[2]);

    if let Some(ref mut editor_state) = app.editor_state {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!("Section: {title}"));
        let inner = block.inner(chunks[1]);
        f.render_widget(block, chunks[1]);

        let syntax_highlighter = SyntaxHighlighter::new("dracula", "md");
        let editor = EditorView::new(editor_state)
            .theme(EditorTheme::default())
            .syntax_highlighter(Some(syntax_highlighter))
            .wrap(true);

        f.render_widget(editor, inner);
    }
}
