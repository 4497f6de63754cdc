use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState};
use ratatui::Frame;

use crate::model::{Question, QuestionKind};
use crate::state::{AppState, InputMode};
use crate::ui::theme::{palette, Palette};

const PLACEHOLDER: &str = "Type your answer...";

/// Rendered lines of one question card plus where its options landed.
pub struct CardLines {
    pub index: usize,
    pub lines: Vec<Line<'static>>,
    /// (line within the card, option index)
    pub choice_rows: Vec<(usize, usize)>,
}

pub(crate) fn display_width(text: &str) -> usize {
    Span::raw(text).width()
}

fn char_width(c: char) -> usize {
    let mut buf = [0u8; 4];
    display_width(c.encode_utf8(&mut buf))
}

/// Word-wrap to `width` display columns. Words wider than a row, and text
/// without spaces, are broken anywhere.
pub(crate) fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }
    let mut rows = Vec::new();
    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut current_width = 0;
        for word in paragraph.split(' ') {
            let word_width = display_width(word);
            let sep = usize::from(!current.is_empty());
            if current_width + sep + word_width <= width {
                if sep == 1 {
                    current.push(' ');
                }
                current.push_str(word);
                current_width += sep + word_width;
                continue;
            }
            if !current.is_empty() {
                rows.push(std::mem::take(&mut current));
                current_width = 0;
            }
            for c in word.chars() {
                let w = char_width(c);
                if current_width + w > width && !current.is_empty() {
                    rows.push(std::mem::take(&mut current));
                    current_width = 0;
                }
                current.push(c);
                current_width += w;
            }
        }
        rows.push(current);
    }
    rows
}

/// Hard-wrap for the answer box, keeping each row's starting char offset so
/// the cursor can be placed.
fn wrap_chars(text: &str, width: usize) -> Vec<(usize, String)> {
    let mut rows = vec![(0, String::new())];
    let mut row_width = 0;
    for (i, c) in text.chars().enumerate() {
        if c == '\n' {
            rows.push((i + 1, String::new()));
            row_width = 0;
            continue;
        }
        let w = char_width(c);
        if row_width + w > width && row_width > 0 {
            rows.push((i, String::new()));
            row_width = 0;
        }
        if let Some((_, row)) = rows.last_mut() {
            row.push(c);
        }
        row_width += w;
    }
    rows
}

fn answer_box(
    lines: &mut Vec<Line<'static>>,
    text: &str,
    cursor: Option<usize>,
    width: usize,
    colors: &Palette,
) {
    let inner = width.saturating_sub(8).max(1);
    let border = Style::default().fg(colors.muted);
    lines.push(Line::from(Span::styled(format!("   ┌{}┐", "─".repeat(inner + 2)), border)));

    if text.is_empty() && cursor.is_none() {
        let pad = inner.saturating_sub(display_width(PLACEHOLDER));
        lines.push(Line::from(vec![
            Span::styled("   │ ", border),
            Span::styled(PLACEHOLDER, Style::default().fg(colors.muted)),
            Span::raw(" ".repeat(pad)),
            Span::styled(" │", border),
        ]));
    } else {
        let rows = wrap_chars(text, inner);
        let cursor_row = cursor.map(|c| rows.iter().rposition(|(start, _)| *start <= c).unwrap_or(0));
        let text_style = Style::default().fg(colors.fg);
        let cursor_style = Style::default().add_modifier(Modifier::REVERSED);
        for (r, (start, row)) in rows.iter().enumerate() {
            let mut spans = vec![Span::styled("   │ ", border)];
            let mut used = display_width(row);
            match (cursor, cursor_row) {
                (Some(c), Some(cr)) if cr == r => {
                    let col = c - start;
                    let before: String = row.chars().take(col).collect();
                    let at: Option<char> = row.chars().nth(col);
                    let after: String = row.chars().skip(col + 1).collect();
                    spans.push(Span::styled(before, text_style));
                    match at {
                        Some(ch) => spans.push(Span::styled(ch.to_string(), cursor_style)),
                        None => {
                            spans.push(Span::styled(" ", cursor_style));
                            used += 1;
                        }
                    }
                    spans.push(Span::styled(after, text_style));
                }
                _ => spans.push(Span::styled(row.clone(), text_style)),
            }
            spans.push(Span::raw(" ".repeat(inner.saturating_sub(used))));
            spans.push(Span::styled(" │", border));
            lines.push(Line::from(spans));
        }
    }
    lines.push(Line::from(Span::styled(format!("   └{}┘", "─".repeat(inner + 2)), border)));
}

fn card_lines(state: &AppState, question: &Question, index: usize, width: usize) -> CardLines {
    let colors = palette(state.theme());
    let mut lines: Vec<Line<'static>> = Vec::new();
    let mut choice_rows = Vec::new();
    let Some(session) = state.session.as_ref() else {
        return CardLines { index, lines, choice_rows };
    };
    let focused = index == state.focused_index();
    let total = session.quiz().total();

    let kind = if question.is_choice() { "choice" } else { "open" };
    let mut header = vec![
        Span::styled(
            format!("{} Question {} / {}", if focused { "▸" } else { " " }, index, total),
            Style::default().fg(colors.accent).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("  [{}]", kind), Style::default().fg(colors.muted)),
    ];
    if let Some(notice) = session.notice(&question.id) {
        header.push(Span::styled(
            format!("  {}", notice.text),
            Style::default().fg(colors.answered),
        ));
    }
    lines.push(Line::from(header));

    for row in wrap_text(&question.text, width.saturating_sub(4)) {
        lines.push(Line::from(Span::styled(
            format!("  {}", row),
            Style::default().fg(colors.fg).add_modifier(Modifier::BOLD),
        )));
    }
    lines.push(Line::from(""));

    match &question.kind {
        QuestionKind::Choice(choices) => {
            let selected = session.answers().selected_choice(&question.id);
            for (i, choice) in choices.iter().enumerate() {
                let is_selected = selected.map(|s| s.starts_with(choice.label)).unwrap_or(false);
                let under_cursor = focused
                    && state.input_mode == InputMode::ChoiceSelect
                    && state.choice_cursor == i;
                let mut style = if is_selected {
                    Style::default().fg(colors.selected).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(colors.fg)
                };
                if under_cursor {
                    style = style.bg(colors.highlight_bg);
                }
                let radio = if is_selected { "(●)" } else { "( )" };
                let prefix = format!("   {} {}. ", radio, choice.label);
                let prefix_width = display_width(&prefix);
                choice_rows.push((lines.len(), i));
                let wrapped = wrap_text(&choice.text, width.saturating_sub(prefix_width + 1));
                for (row_no, row) in wrapped.into_iter().enumerate() {
                    let lead = if row_no == 0 {
                        prefix.clone()
                    } else {
                        " ".repeat(prefix_width)
                    };
                    lines.push(Line::from(vec![
                        Span::styled(lead, style),
                        Span::styled(row, style),
                    ]));
                }
            }
        }
        QuestionKind::Open => {
            let editing = focused && state.input_mode == InputMode::TextInput;
            if editing {
                answer_box(&mut lines, &state.text_input, Some(state.text_cursor), width, &colors);
            } else {
                answer_box(&mut lines, session.answers().text(&question.id), None, width, &colors);
            }
        }
    }
    lines.push(Line::from(""));

    CardLines {
        index,
        lines,
        choice_rows,
    }
}

/// Cards currently on screen, in order.
pub fn visible_cards(state: &AppState, width: usize) -> Vec<CardLines> {
    let Some(session) = state.session.as_ref() else {
        return Vec::new();
    };
    let nav = session.navigator();
    session
        .questions()
        .iter()
        .enumerate()
        .map(|(i, q)| (i + 1, q))
        .filter(|(index, _)| nav.is_active(*index))
        .map(|(index, q)| card_lines(state, q, index, width))
        .collect()
}

/// First content line of each visible card, for scrolling a card into view.
pub fn card_offsets(state: &AppState, width: usize) -> Vec<(usize, usize)> {
    let mut offset = 0;
    visible_cards(state, width)
        .into_iter()
        .map(|card| {
            let start = offset;
            offset += card.lines.len();
            (card.index, start)
        })
        .collect()
}

/// Option under a click at content line `line`, as (question index, option index).
pub fn choice_hit(state: &AppState, width: usize, line: usize) -> Option<(usize, usize)> {
    let mut offset = 0;
    for card in visible_cards(state, width) {
        let len = card.lines.len();
        if line >= offset + len {
            offset += len;
            continue;
        }
        let local = line - offset;
        let first = card.choice_rows.first()?.0;
        // The last line of a card is the blank separator.
        if local < first || local + 1 >= len {
            return None;
        }
        return card
            .choice_rows
            .iter()
            .rev()
            .find(|(row, _)| *row <= local)
            .map(|(_, choice)| (card.index, *choice));
    }
    None
}

pub fn draw_question(f: &mut Frame, area: Rect, state: &AppState) {
    let colors = palette(state.theme());
    let width = area.width.saturating_sub(1) as usize;
    let cards = visible_cards(state, width);
    if cards.is_empty() {
        let p = Paragraph::new("No questions").block(Block::default().borders(Borders::ALL));
        f.render_widget(p, area);
        return;
    }

    let lines: Vec<Line> = cards.into_iter().flat_map(|card| card.lines).collect();

    let total_content_lines = lines.len();
    let visible_height = area.height as usize;
    let scroll = state
        .question_scroll
        .min(total_content_lines.saturating_sub(visible_height));
    let display_lines: Vec<Line> = lines.into_iter().skip(scroll).collect();

    let widget = Paragraph::new(display_lines).style(Style::default().bg(colors.bg).fg(colors.fg));
    f.render_widget(widget, area);

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

    #[test]
    fn wrap_breaks_at_spaces() {
        assert_eq!(
            wrap_text("depth first search visits", 12),
            vec!["depth first", "search", "visits"]
        );
    }

    #[test]
    fn wrap_breaks_wide_text_without_spaces() {
        // Each CJK char is two columns wide.
        let rows = wrap_text("深度优先搜索", 5);
        assert_eq!(rows, vec!["深度", "优先", "搜索"]);
    }

    #[test]
    fn wrap_keeps_empty_text() {
        assert_eq!(wrap_text("", 10), vec![String::new()]);
    }

    #[test]
    fn char_wrap_tracks_offsets() {
        let rows = wrap_chars("abcdef\ngh", 4);
        assert_eq!(
            rows,
            vec![(0, "abcd".to_string()), (4, "ef".to_string()), (7, "gh".to_string())]
        );
    }
}
