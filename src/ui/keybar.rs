use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::state::{AppState, InputMode, Screen};
use crate::ui::theme::palette;

pub fn draw_keybar(f: &mut Frame, area: Rect, state: &AppState) {
    let colors = palette(state.theme());
    let bindings: Vec<(&str, &str)> = match (state.screen, state.input_mode) {
        (Screen::Catalog, _) => vec![
            ("↑/↓", "move"),
            ("Enter", "open / fold"),
            ("Ctrl+T", "theme"),
            ("q", "quit"),
        ],
        (Screen::Quiz, _) if state.results_visible() => vec![
            ("↑/↓", "scroll"),
            ("Ctrl+A/O", "all/single"),
            ("Ctrl+S", "resubmit"),
            ("Ctrl+L", "quiz list"),
            ("Ctrl+Q", "quit"),
        ],
        (Screen::Quiz, InputMode::TextInput) => vec![
            ("←/→", "cursor"),
            ("↑/↓", "prev/next"),
            ("Esc", "done editing"),
            ("Ctrl+S", "submit"),
            ("Ctrl+Q", "quit"),
        ],
        (Screen::Quiz, InputMode::ChoiceSelect) => vec![
            ("a-d", "answer"),
            ("arrows", "prev/next"),
            ("Ctrl+A/O", "all/single"),
            ("Ctrl+S", "submit"),
            ("?", "help"),
            ("Ctrl+Q", "quit"),
        ],
        (Screen::Quiz, InputMode::Navigation) => vec![
            ("arrows", "prev/next"),
            ("Ctrl+A/O", "all/single"),
            ("Ctrl+S", "submit"),
            ("?", "help"),
            ("Ctrl+Q", "quit"),
        ],
    };

    let mut spans: Vec<Span> = vec![Span::raw(" ")];
    for (i, (key, action)) in bindings.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("   "));
        }
        spans.push(Span::styled(
            key.to_string(),
            Style::default().fg(colors.accent).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(format!(" {}", action)));
    }

    let widget = Paragraph::new(Line::from(spans))
        .style(Style::default().bg(colors.key_bg).fg(colors.fg));
    f.render_widget(widget, area);
}
