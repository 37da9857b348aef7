use std::ops::Range;

use itertools::Itertools;
use keytype::{
    evaluator::{CharacterState, WordState},
    session::{Phase, Session, TIME_OPTIONS},
};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};
use unicode_width::UnicodeWidthChar;

use crate::App;

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;
/// Lines of words shown at once; the active word sits on the second one
const VISIBLE_LINES: usize = 3;

const RESULTS_WIDTH: u16 = 40;
const RESULTS_HEIGHT: u16 = 9;

struct Palette {
    bold: Style,
    pending: Style,
    correct: Style,
    incorrect: Style,
    extra: Style,
    selected: Style,
    italic: Style,
}

impl Palette {
    fn new() -> Self {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        Self {
            bold,
            pending: Style::default().patch(bold).add_modifier(Modifier::DIM),
            correct: Style::default().patch(bold).fg(Color::Green),
            incorrect: Style::default().patch(bold).fg(Color::Red),
            extra: Style::default().fg(Color::Red).add_modifier(Modifier::DIM),
            selected: Style::default().patch(bold).fg(Color::Yellow),
            italic: Style::default().add_modifier(Modifier::ITALIC),
        }
    }

    fn char_style(&self, state: CharacterState) -> Style {
        match state {
            CharacterState::Pending => self.pending,
            CharacterState::Correct => self.correct,
            CharacterState::Incorrect => self.incorrect,
            CharacterState::Extra => self.extra,
        }
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let session = &self.session;
        let palette = Palette::new();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(1),                    // duration selector
                Constraint::Length(1),                    // padding
                Constraint::Length(1),                    // live stats
                Constraint::Length(1),                    // padding
                Constraint::Length(VISIBLE_LINES as u16), // words
                Constraint::Min(0),
                Constraint::Length(1), // legend
            ])
            .split(area);

        duration_selector(session, &palette).render(chunks[0], buf);

        if session.phase() != Phase::Idle {
            let stats = session.stats();
            Paragraph::new(Span::styled(
                format!(
                    "{}s   {} wpm   {}% acc",
                    session.timer().remaining_secs,
                    stats.wpm,
                    stats.accuracy
                ),
                palette.bold,
            ))
            .alignment(Alignment::Center)
            .render(chunks[2], buf);
        }

        Paragraph::new(word_lines(session, &palette, chunks[4].width as usize))
            .render(chunks[4], buf);

        Paragraph::new(Span::styled(
            "(tab) restart / (←/→) time / (esc)ape",
            palette.italic,
        ))
        .render(chunks[6], buf);

        if session.phase() == Phase::Finished {
            render_results(session, &palette, area, buf);
        }
    }
}

fn duration_selector<'a>(session: &Session, palette: &Palette) -> Paragraph<'a> {
    let selected = session.timer().selected_secs;
    let mut spans = vec![
        Span::styled("keytype", palette.bold.fg(Color::Cyan)),
        Span::raw("   time "),
    ];
    spans.extend(TIME_OPTIONS.iter().map(|&secs| {
        let style = if secs == selected {
            palette.selected
        } else {
            palette.pending
        };
        Span::styled(format!(" {secs} "), style)
    }));
    Paragraph::new(Line::from(spans))
}

fn char_width(c: char) -> usize {
    c.width().unwrap_or(0)
}

/// Display width of a word, including the trailing cursor cell when the
/// cursor sits past the last character
fn word_width(state: &WordState, cursor: Option<usize>) -> usize {
    let width: usize = state.chars.iter().map(|cell| char_width(cell.char)).sum();
    match cursor {
        Some(pos) if pos >= state.chars.len() => width + 1,
        _ => width,
    }
}

/// Greedy wrap of words, separated by one space, into lines of `max_width` columns.
/// A word wider than a line gets a line of its own.
fn wrap_words(widths: &[usize], max_width: usize) -> Vec<Range<usize>> {
    let mut lines = vec![];
    let mut start = 0;
    let mut used = 0;

    for (idx, &width) in widths.iter().enumerate() {
        if idx == start {
            used = width;
        } else if used + 1 + width > max_width {
            lines.push(start..idx);
            start = idx;
            used = width;
        } else {
            used += 1 + width;
        }
    }
    if start < widths.len() {
        lines.push(start..widths.len());
    }
    lines
}

/// Index of the first line to show so the active word stays on the second visible line
fn first_visible_line(lines: &[Range<usize>], active_word: usize) -> usize {
    let active_line = lines
        .iter()
        .position(|line| line.contains(&active_word))
        .unwrap_or(lines.len().saturating_sub(1));
    active_line.saturating_sub(1)
}

fn word_spans<'a>(
    state: &WordState,
    cursor: Option<usize>,
    palette: &Palette,
) -> Vec<Span<'a>> {
    let cursor_style = Modifier::UNDERLINED | Modifier::REVERSED;
    let error_word = state.completed && state.has_error;

    let mut spans = state
        .chars
        .iter()
        .enumerate()
        .map(|(idx, cell)| {
            let mut style = palette.char_style(cell.state);
            if error_word {
                style = style.add_modifier(Modifier::UNDERLINED);
            }
            if cursor == Some(idx) {
                style = style.add_modifier(cursor_style);
            }
            Span::styled(cell.char.to_string(), style)
        })
        .collect_vec();

    if matches!(cursor, Some(pos) if pos >= state.chars.len()) {
        spans.push(Span::styled(" ", palette.pending.add_modifier(cursor_style)));
    }
    spans
}

fn word_lines<'a>(session: &Session, palette: &Palette, max_width: usize) -> Vec<Line<'a>> {
    let states = session.word_states();
    let active = session.active_word();
    let show_cursor = session.phase() != Phase::Finished;
    let cursor_for = |idx: usize| (show_cursor && idx == active).then_some(session.active_char());

    let widths = states
        .iter()
        .enumerate()
        .map(|(idx, state)| word_width(state, cursor_for(idx)))
        .collect_vec();
    let lines = wrap_words(&widths, max_width.max(1));
    let first = first_visible_line(&lines, active);

    lines
        .iter()
        .skip(first)
        .take(VISIBLE_LINES)
        .map(|range| {
            let spans = range
                .clone()
                .map(|idx| word_spans(&states[idx], cursor_for(idx), palette))
                .interleave_shortest(std::iter::repeat(vec![Span::raw(" ")]))
                .flatten()
                .collect_vec();
            Line::from(spans)
        })
        .collect()
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

fn render_results(session: &Session, palette: &Palette, area: Rect, buf: &mut Buffer) {
    let stats = session.stats();
    let popup = centered_rect(RESULTS_WIDTH, RESULTS_HEIGHT, area);

    let text = vec![
        Line::from(Span::styled("Test Complete!", palette.bold.fg(Color::Cyan))),
        Line::from(""),
        Line::from(vec![
            Span::styled(format!("{} wpm", stats.wpm), palette.bold),
            Span::raw("   "),
            Span::styled(format!("{}% acc", stats.accuracy), palette.bold),
        ]),
        Line::from(format!(
            "{} raw   {} words",
            stats.raw_wpm,
            session.active_word()
        )),
        Line::from(""),
        Line::from(Span::styled("(tab) try again / (esc)ape", palette.italic)),
    ];

    Clear.render(popup, buf);
    Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title("results"))
        .alignment(Alignment::Center)
        .render(popup, buf);
}
