use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Gauge, Paragraph};
use ratatui::Frame;

use crate::navigation::{Mode, ModeButton};
use crate::state::AppState;
use crate::ui::theme::palette;

pub fn draw_statusbar(f: &mut Frame, area: Rect, state: &AppState) {
    let Some(session) = state.session.as_ref() else {
        return;
    };
    let colors = palette(state.theme());
    let progress = session.progress();
    let info = session.nav_info();

    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(colors.answered).bg(colors.bar_bg))
        .ratio((progress.percent() / 100.0).clamp(0.0, 1.0))
        .label(format!("{}/{}", progress.answered, progress.total));
    f.render_widget(gauge, halves[0]);

    let enabled = Style::default().fg(colors.fg);
    let disabled = Style::default().fg(colors.muted);
    let mut spans = vec![Span::raw("  ")];
    if session.navigator().mode() == Mode::Single && session.layout().questions_visible {
        spans.push(Span::styled(
            "◀ prev",
            if info.prev_disabled { disabled } else { enabled },
        ));
        spans.push(Span::styled(format!("  {}  ", info.label()), enabled));
        spans.push(Span::styled(
            "next ▶",
            if info.next_disabled { disabled } else { enabled },
        ));
    }
    let (single_style, all_style) = match session.navigator().active_button() {
        ModeButton::Single => (Style::default().fg(colors.accent), disabled),
        ModeButton::All => (disabled, Style::default().fg(colors.accent)),
    };
    spans.push(Span::raw("   "));
    spans.push(Span::styled("[single]", single_style));
    spans.push(Span::raw(" "));
    spans.push(Span::styled("[all]", all_style));
    if session.is_submitting() {
        spans.push(Span::styled("   submitting…", Style::default().fg(colors.warning)));
    }

    let widget = Paragraph::new(Line::from(spans)).style(Style::default().bg(colors.bar_bg));
    f.render_widget(widget, halves[1]);
}
