use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::state::{AppState, Screen};
use crate::ui::question::display_width;
use crate::ui::theme::palette;

pub fn draw_titlebar(f: &mut Frame, area: Rect, state: &AppState) {
    let colors = palette(state.theme());
    let title = match (&state.screen, &state.session) {
        (Screen::Quiz, Some(session)) => session.quiz().title.clone(),
        _ => "Quizzes".to_string(),
    };

    let right_text = state
        .session
        .as_ref()
        .filter(|_| state.screen == Screen::Quiz)
        .and_then(|s| s.latest_notice())
        .map(|n| format!(" {} ", n.text))
        .unwrap_or_default();
    let theme_text = format!(" {} ", state.theme().name());

    let title_text = format!("[ {} ]", title);
    let available = area.width as usize;
    let title_len = display_width(&title_text);
    let right_len = display_width(&right_text) + display_width(&theme_text);
    let center_pad = available.saturating_sub(title_len) / 2;
    let right_pad = available.saturating_sub(center_pad + title_len + right_len);

    let line = Line::from(vec![
        Span::raw(" ".repeat(center_pad)),
        Span::styled(
            title_text,
            Style::default().fg(colors.fg).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" ".repeat(right_pad)),
        Span::styled(right_text, Style::default().fg(colors.answered)),
        Span::styled(theme_text, Style::default().fg(colors.muted)),
    ]);

    let widget = Paragraph::new(line)
        .style(Style::default().bg(colors.bar_bg))
        .alignment(Alignment::Left);
    f.render_widget(widget, area);
}
