use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::session::SubmitPrompt;
use crate::state::{AppState, Dialog};
use crate::ui::question::wrap_text;
use crate::ui::theme::{palette, Palette};

pub fn draw_dialog(f: &mut Frame, area: Rect, state: &AppState) {
    let Some(dialog) = state.top_dialog() else {
        return;
    };
    let colors = palette(state.theme());

    match dialog {
        Dialog::ConfirmSubmit(prompt) => draw_confirm_submit(f, area, prompt, &colors),
        Dialog::ConfirmQuit => draw_confirm_quit(f, area, state, &colors),
        Dialog::Alert(message) => draw_alert(f, area, message, &colors),
        Dialog::Help => draw_help(f, area, &colors),
    }
}

pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

fn confirm_row(colors: &Palette) -> Line<'static> {
    Line::from(vec![
        Span::styled("   [Enter] Confirm", Style::default().fg(colors.selected)),
        Span::raw("    "),
        Span::styled("[Esc] Cancel", Style::default().fg(colors.muted)),
    ])
}

fn render_box(f: &mut Frame, rect: Rect, lines: Vec<Line>, border: Color, colors: &Palette) {
    f.render_widget(Clear, rect);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .style(Style::default().bg(colors.bg).fg(colors.fg));
    let widget = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    f.render_widget(widget, rect);
}

fn draw_confirm_submit(f: &mut Frame, area: Rect, prompt: &SubmitPrompt, colors: &Palette) {
    let mut lines: Vec<Line> = vec![
        Line::from(""),
        Line::from(Span::styled(
            "   Submit your answers?",
            Style::default().fg(colors.warning).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    for row in wrap_text(&prompt.message(), 40) {
        lines.push(Line::from(format!("   {}", row)));
    }
    let unanswered = prompt.total().saturating_sub(prompt.answered());
    if unanswered > 0 {
        lines.push(Line::from(Span::styled(
            "   Only selected options are scored.",
            Style::default().fg(colors.muted),
        )));
    }
    lines.push(Line::from(""));
    lines.push(confirm_row(colors));
    lines.push(Line::from(""));

    let rect = centered_rect(48, lines.len() as u16 + 2, area);
    render_box(f, rect, lines, colors.warning, colors);
}

fn draw_confirm_quit(f: &mut Frame, area: Rect, state: &AppState, colors: &Palette) {
    let pending = state
        .session
        .as_ref()
        .map(|s| s.has_pending_save())
        .unwrap_or(false);
    let detail = if pending {
        "   Your latest answer is saved first."
    } else {
        "   Saved answers stay on the server."
    };
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "   Quit?",
            Style::default().fg(colors.warning).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(detail),
        Line::from(""),
        confirm_row(colors),
        Line::from(""),
    ];

    let rect = centered_rect(44, lines.len() as u16 + 2, area);
    render_box(f, rect, lines, colors.warning, colors);
}

fn draw_alert(f: &mut Frame, area: Rect, message: &str, colors: &Palette) {
    let mut lines = vec![Line::from("")];
    for row in wrap_text(message, 40) {
        lines.push(Line::from(Span::styled(
            format!("   {}", row),
            Style::default().add_modifier(Modifier::BOLD),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "            [Enter] OK",
        Style::default().fg(colors.selected),
    )));
    lines.push(Line::from(""));

    let rect = centered_rect(48, lines.len() as u16 + 2, area);
    render_box(f, rect, lines, colors.incorrect, colors);
}

fn draw_help(f: &mut Frame, area: Rect, colors: &Palette) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "   Key Bindings",
            Style::default().fg(colors.accent).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("   arrows     Previous/Next question"),
        Line::from("   Home/End   First/Last question"),
        Line::from("   a-d        Select option"),
        Line::from("   Enter      Edit open answer"),
        Line::from("   Ctrl+A     Show all questions"),
        Line::from("   Ctrl+O     Show one question"),
        Line::from("   Ctrl+S     Submit answers"),
        Line::from("   Ctrl+T     Light/dark theme"),
        Line::from("   Ctrl+L     Back to quiz list"),
        Line::from("   Ctrl+Q     Quit"),
        Line::from("   ?          This help"),
        Line::from(""),
        Line::from(Span::styled(
            "        [Esc] Close",
            Style::default().fg(colors.muted),
        )),
        Line::from(""),
    ];

    let rect = centered_rect(44, lines.len() as u16 + 2, area);
    f.render_widget(Clear, rect);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .border_style(Style::default().fg(colors.accent))
        .style(Style::default().bg(colors.bg).fg(colors.fg));
    f.render_widget(Paragraph::new(lines).block(block), rect);
}
