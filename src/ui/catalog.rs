use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::catalog::CatalogRow;
use crate::state::AppState;
use crate::ui::theme::palette;

/// First row on screen, chosen so the cursor stays visible.
pub fn scroll_offset(cursor: usize, visible: usize) -> usize {
    if visible == 0 {
        return 0;
    }
    cursor.saturating_sub(visible - 1)
}

pub fn draw_catalog(f: &mut Frame, area: Rect, state: &AppState) {
    let colors = palette(state.theme());
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Quizzes ")
        .title_style(Style::default().add_modifier(Modifier::BOLD))
        .border_style(Style::default().fg(colors.muted))
        .style(Style::default().bg(colors.bg).fg(colors.fg));

    if let Some(message) = &state.catalog.message {
        let p = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("  {}", message),
                Style::default().fg(colors.warning),
            )),
        ])
        .block(block);
        f.render_widget(p, area);
        return;
    }

    let rows = state.catalog.rows(&state.prefs);
    if rows.is_empty() {
        f.render_widget(Paragraph::new("  No quizzes found.").block(block), area);
        return;
    }

    let visible = area.height.saturating_sub(2) as usize;
    let cursor = state.catalog.cursor();
    let offset = scroll_offset(cursor, visible);
    let mut lines = Vec::new();
    for (i, row) in rows.iter().enumerate().skip(offset).take(visible) {
        let mut style = Style::default().fg(colors.fg);
        if i == cursor {
            style = style.bg(colors.highlight_bg).add_modifier(Modifier::BOLD);
        }
        let line = match row {
            CatalogRow::Section {
                name,
                collapsed,
                count,
            } => Line::from(vec![
                Span::styled(if *collapsed { " ▸ " } else { " ▾ " }, style.fg(colors.accent)),
                Span::styled(name.to_string(), style.fg(colors.accent)),
                Span::styled(format!(" ({})", count), style.fg(colors.muted)),
            ]),
            CatalogRow::Item(item) => {
                let count = item
                    .count
                    .map(|c| format!("  {} questions", c))
                    .unwrap_or_default();
                Line::from(vec![
                    Span::styled(format!("     {}", item.title), style),
                    Span::styled(count, style.fg(colors.muted)),
                ])
            }
        };
        lines.push(line);
    }

    f.render_widget(Paragraph::new(lines).block(block), area);
}

/// Catalog row under a click at screen row `y`.
pub fn row_hit(state: &AppState, area: Rect, y: u16) -> Option<usize> {
    if y <= area.y || y >= area.y + area.height.saturating_sub(1) {
        return None;
    }
    let visible = area.height.saturating_sub(2) as usize;
    let offset = scroll_offset(state.catalog.cursor(), visible);
    let row = (y - area.y - 1) as usize + offset;
    (row < state.catalog.rows(&state.prefs).len()).then_some(row)
}
