use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState};
use ratatui::Frame;

use crate::results::{ResultEntry, ResultStatus, ResultsView, ScoreSummary};
use crate::state::AppState;
use crate::ui::question::wrap_text;
use crate::ui::theme::{palette, Palette};

fn status_color(status: ResultStatus, colors: &Palette) -> ratatui::style::Color {
    match status {
        ResultStatus::Correct => colors.correct,
        ResultStatus::Incorrect => colors.incorrect,
        ResultStatus::Open => colors.open,
    }
}

fn entry_lines(entry: &ResultEntry, width: usize, colors: &Palette) -> Vec<Line<'static>> {
    let color = status_color(entry.status, colors);
    let mut lines = Vec::new();

    let text_rows = wrap_text(&entry.text, width.saturating_sub(8));
    for (i, row) in text_rows.into_iter().enumerate() {
        let lead = if i == 0 {
            format!(" {} {:>2}. ", entry.status.symbol(), entry.number)
        } else {
            "       ".to_string()
        };
        lines.push(Line::from(vec![
            Span::styled(lead, Style::default().fg(color).add_modifier(Modifier::BOLD)),
            Span::styled(row, Style::default().fg(colors.fg)),
        ]));
    }

    let label = Style::default().fg(colors.muted);
    lines.push(Line::from(vec![
        Span::styled("       Your answer: ", label),
        Span::styled(entry.user_answer_display().to_string(), Style::default().fg(color)),
    ]));
    if let Some(correct) = &entry.correct_answer {
        lines.push(Line::from(vec![
            Span::styled("       Correct answer: ", label),
            Span::styled(correct.clone(), Style::default().fg(colors.correct)),
        ]));
    }
    if let Some(explanation) = &entry.explanation {
        lines.push(Line::from(Span::styled("       Explanation:", label)));
        for row in wrap_text(explanation, width.saturating_sub(10)) {
            lines.push(Line::from(Span::styled(
                format!("         {}", row),
                Style::default().fg(colors.fg),
            )));
        }
    }
    lines.push(Line::from(""));
    lines
}

fn summary_lines(view: &ResultsView, width: usize, colors: &Palette) -> Vec<Line<'static>> {
    let color = match view.summary {
        ScoreSummary::Scored { percent, .. } if percent >= 60 => colors.correct,
        ScoreSummary::Scored { .. } => colors.incorrect,
        ScoreSummary::OpenOnly { .. } => colors.open,
    };
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("  {}", view.summary.headline()),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
    ];
    if let Some(detail) = view.summary.detail() {
        for row in wrap_text(&detail, width.saturating_sub(4)) {
            lines.push(Line::from(Span::styled(
                format!("  {}", row),
                Style::default().fg(colors.muted),
            )));
        }
    }
    lines.push(Line::from(""));
    lines
}

pub fn draw_results(f: &mut Frame, area: Rect, state: &AppState) {
    let Some(view) = state.session.as_ref().and_then(|s| s.results()) else {
        return;
    };
    let colors = palette(state.theme());
    let width = area.width.saturating_sub(3) as usize;

    let mut lines = summary_lines(view, width, &colors);
    for entry in &view.entries {
        lines.extend(entry_lines(entry, width, &colors));
    }

    let visible_height = area.height.saturating_sub(2) as usize;
    let total_content_lines = lines.len();
    let scroll = state
        .result_scroll
        .min(total_content_lines.saturating_sub(visible_height));
    let display_lines: Vec<Line> = lines.into_iter().skip(scroll).collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Results ")
        .title_style(Style::default().add_modifier(Modifier::BOLD))
        .border_style(Style::default().fg(colors.muted))
        .style(Style::default().bg(colors.bg).fg(colors.fg));
    f.render_widget(Paragraph::new(display_lines).block(block), area);

    if total_content_lines > visible_height {
        let mut scrollbar_state = ScrollbarState::new(total_content_lines)
            .position(scroll)
            .viewport_content_length(visible_height);
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight);
        f.render_stateful_widget(scrollbar, area, &mut scrollbar_state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::Theme;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn open_entry_has_no_correct_answer_row() {
        let entry = ResultEntry {
            number: 4,
            text: "Describe a worklist algorithm.".into(),
            status: ResultStatus::Open,
            user_answer: None,
            correct_answer: None,
            explanation: Some("Any fixpoint iteration works.".into()),
        };
        let lines = entry_lines(&entry, 60, &palette(Theme::Light));
        let rendered: Vec<String> = lines.iter().map(text).collect();
        assert!(rendered[0].contains("📝"));
        assert!(rendered.iter().any(|l| l.contains("Not answered")));
        assert!(!rendered.iter().any(|l| l.contains("Correct answer")));
        assert!(rendered.iter().any(|l| l.contains("fixpoint")));
    }
}
