//! Terminal UI rendering with ratatui

use crate::input::{KeyBindings, key_label};
use blockfall::board::{Cell, GRID_HEIGHT, GRID_WIDTH};
use blockfall::{GameSession, GuideLine, Lifecycle, Piece, PieceColor, Settings};
use crossterm::event::KeyCode;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

const EMPTY: &str = "  ";

/// Total width needed: board(22) + side panel(24) = 46
const GAME_WIDTH: u16 = 46;
/// Total height needed: board(20) + 2 for borders = 22
const GAME_HEIGHT: u16 = 22;

fn rgb(color: PieceColor) -> Color {
    Color::Rgb(color.r, color.g, color.b)
}

/// Render the board, side panels and any lifecycle overlay
pub fn render_game<S>(
    frame: &mut Frame,
    game: &GameSession<S>,
    settings: &Settings,
    bindings: &KeyBindings,
) {
    let area = frame.area();
    let game_area = center_rect(area, GAME_WIDTH, GAME_HEIGHT);

    // Main layout: board | score + next + controls
    let main_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(22), // Board (10*2 + 2 for borders)
            Constraint::Length(24), // Side panel
        ])
        .split(game_area);

    render_board(frame, main_layout[0], game, settings);

    let side_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Score
            Constraint::Length(6), // Next
            Constraint::Min(9),    // Controls
        ])
        .split(main_layout[1]);

    render_score(frame, side_layout[0], game.score(), game.lines());
    render_next(frame, side_layout[1], game.next_piece(), settings);
    render_controls(frame, side_layout[2], bindings);

    match game.lifecycle() {
        Lifecycle::NotStarted => {
            let start = first_key(&bindings.start);
            render_overlay(frame, area, "BLOCKFALL", &[format!("Press {start} to start")]);
        }
        Lifecycle::GameOver => {
            let start = first_key(&bindings.start);
            render_overlay(
                frame,
                area,
                "GAME OVER",
                &[
                    format!("Final score: {}", game.score()),
                    format!("Press {start} to play again"),
                ],
            );
        }
        Lifecycle::Running => {}
    }
}

fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

fn first_key(keys: &[KeyCode]) -> String {
    keys.first().map(key_label).unwrap_or_else(|| "?".to_string())
}

/// Which side(s) of a cell carry a guide mark
fn guide_mark(guide: &GuideLine, top: i32, col: i32, row: i32) -> Option<(bool, bool)> {
    if row < top || row >= guide.stop_y {
        return None;
    }
    let left = col == guide.left;
    let right = col == guide.right;
    (left || right).then_some((left, right))
}

fn render_board<S>(frame: &mut Frame, area: Rect, game: &GameSession<S>, settings: &Settings) {
    let (block_char, guide_char) = settings.visual.block_chars();

    let block = Block::default()
        .title(" BLOCKFALL ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let grid = game.display_grid();

    // Guides start on the row under the piece
    let guide = if settings.visual.show_guides {
        game.guide_line().zip(game.current_piece()).map(|(guide, piece)| {
            let top = game.position().y + piece.shape().height() as i32;
            (guide, top)
        })
    } else {
        None
    };
    let guide_style = Style::default().fg(Color::Cyan).dim();

    let mut lines: Vec<Line> = Vec::with_capacity(GRID_HEIGHT);
    for row in 0..GRID_HEIGHT as i32 {
        let mut spans = Vec::with_capacity(GRID_WIDTH);
        for col in 0..GRID_WIDTH as i32 {
            let span = match grid.get(col, row) {
                Some(Cell::Filled(color)) => {
                    Span::styled(block_char, Style::default().fg(rgb(color)))
                }
                _ => match guide.and_then(|(g, top)| guide_mark(&g, top, col, row)) {
                    Some((true, true)) => {
                        Span::styled(format!("{guide_char}{guide_char}"), guide_style)
                    }
                    Some((true, false)) => Span::styled(format!("{guide_char} "), guide_style),
                    Some((false, true)) => Span::styled(format!(" {guide_char}"), guide_style),
                    _ => Span::raw(EMPTY),
                },
            };
            spans.push(span);
        }
        lines.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_score(frame: &mut Frame, area: Rect, score: u64, lines_cleared: u32) {
    let block = Block::default()
        .title(" SCORE ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = vec![
        Line::styled(format!("{score}"), Style::default().fg(Color::Yellow).bold()),
        Line::styled(format!("{lines_cleared} lines"), Style::default().fg(Color::Green)),
    ];
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

fn render_next(frame: &mut Frame, area: Rect, next: Option<&Piece>, settings: &Settings) {
    let block = Block::default()
        .title(" NEXT ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(piece) = next else {
        return;
    };
    let (block_char, _) = settings.visual.block_chars();
    let style = Style::default().fg(rgb(piece.color()));
    let shape = piece.shape();

    // Preview sized to the piece itself
    let lines: Vec<Line> = (0..shape.height())
        .map(|row| {
            let spans: Vec<Span> = (0..shape.width())
                .map(|col| {
                    if shape.is_filled(row, col) {
                        Span::styled(block_char, style)
                    } else {
                        Span::raw(EMPTY)
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

fn render_controls(frame: &mut Frame, area: Rect, bindings: &KeyBindings) {
    let block = Block::default()
        .title(" CONTROLS ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let entries = [
        (&bindings.move_left, "Left"),
        (&bindings.move_right, "Right"),
        (&bindings.rotate, "Rotate"),
        (&bindings.soft_drop, "Drop"),
        (&bindings.hard_drop, "Instant drop"),
        (&bindings.abort, "Stop"),
        (&bindings.quit, "Quit"),
    ];

    let lines: Vec<Line> = entries
        .iter()
        .map(|(keys, label)| {
            let names: Vec<String> = keys.iter().map(key_label).collect();
            Line::from(vec![
                Span::styled(
                    format!("{:>7}", names.join("/")),
                    Style::default().fg(Color::White).bold(),
                ),
                Span::styled(format!(" {label}"), Style::default().fg(Color::Gray)),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_overlay(frame: &mut Frame, area: Rect, title: &str, subtitles: &[String]) {
    let popup_width = 30u16;
    let popup_height = 4 + subtitles.len() as u16;
    let popup_area = center_rect(area, popup_width, popup_height);

    // Clear the background
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .style(Style::default().bg(Color::Black));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let mut text = vec![
        Line::styled(title, Style::default().fg(Color::Yellow).bold()),
        Line::raw(""),
    ];
    text.extend(
        subtitles
            .iter()
            .map(|s| Line::styled(s.as_str(), Style::default().fg(Color::Gray))),
    );

    let paragraph = Paragraph::new(text).alignment(Alignment::Center);
    frame.render_widget(paragraph, inner);
}
